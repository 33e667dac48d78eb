//! How a target type declares its grammar.
//!
//! A type implementing [`Parse`] describes itself as exactly one of three
//! shapes:
//!
//! * a terminal, with a leaf matcher over the text of a single token;
//! * an alternation, an ordered list of candidate types, each wrapped into the
//!   target type when it matches;
//! * a sequence, a list of components each governed by a repetition
//!   [`Policy`], plus an assembler that builds the target value from the parsed
//!   slots.
//!
//! Shapes are built once per [`Mirror`](crate::Mirror) and then reused for the
//! lifetime of that engine.

use std::any::{Any, TypeId};

use derive_more::{Display, From};
use linear_map::LinearMap;

use crate::error::{DeclarationError, Result};
use crate::mirror::{Mirror, Parsed};
use crate::rendering::Outline;
use crate::util::simple_name;
use crate::Text;

/// A type that can be parsed out of a token stream.
pub trait Parse: Clone + 'static {
    fn shape() -> Shape<Self>;

    /// The name used for this type in rendered grammars and diagnostics.
    fn name() -> String {
        simple_name(std::any::type_name::<Self>())
    }
}

/// Type-erased slot value, as produced by a component before assembly.
pub(crate) type Value = Box<dyn Any>;

type Step<T> = Box<dyn Fn(&mut Mirror, &Text) -> Result<Option<Parsed<T>>>>;

pub enum Shape<T> {
    Terminal(fn(&str) -> Option<T>),
    Alternation(Vec<Alternative<T>>),
    Sequence(Sequence<T>),
}

impl<T> Shape<T> {
    /// Checks the declaration and puts sequence components into the order
    /// they are attempted in.
    pub(crate) fn validated(self, name: &str) -> Result<Self, DeclarationError> {
        match self {
            Shape::Sequence(sequence) => Ok(Shape::Sequence(sequence.validated(name)?)),
            Shape::Alternation(alternatives) if alternatives.is_empty() => {
                Err(DeclarationError::new(name, "an alternation needs at least one alternative"))
            }
            shape => Ok(shape),
        }
    }

    pub(crate) fn outline(&self) -> Outline {
        match self {
            Shape::Terminal(_) => Outline::Terminal,
            Shape::Alternation(alternatives) => {
                Outline::Alternation(alternatives.iter().map(|a| a.shape).collect())
            }
            Shape::Sequence(sequence) => Outline::Sequence(
                sequence.components.iter()
                    .map(|c| (c.element.map(|e| e.shape), c.policy.clone()))
                    .collect()),
        }
    }
}

/// Type-erased handle on a [`Parse`] type.
#[derive(Copy, Clone)]
pub struct ShapeRef {
    id: TypeId,
    name: fn() -> String,
    outline: fn() -> Result<Outline, DeclarationError>,
}

impl ShapeRef {
    pub fn of<A: Parse>() -> Self {
        ShapeRef { id: TypeId::of::<A>(), name: A::name, outline: outline_of::<A> }
    }

    pub fn id(&self) -> TypeId { self.id }
    pub fn name(&self) -> String { (self.name)() }
    pub(crate) fn outline(&self) -> Result<Outline, DeclarationError> { (self.outline)() }
}

impl std::fmt::Debug for ShapeRef {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(w, "shape[{}]", self.name())
    }
}

fn outline_of<A: Parse>() -> Result<Outline, DeclarationError> {
    Ok(A::shape().validated(&A::name())?.outline())
}

pub struct Alternative<T> {
    pub(crate) shape: ShapeRef,
    pub(crate) parse: Step<T>,
}

impl<T: 'static> Alternative<T> {
    /// An alternative matching `A`, stored into the target via `wrap`
    /// (typically an enum variant constructor).
    pub fn of<A: Parse>(wrap: fn(A) -> T) -> Self {
        Alternative {
            shape: ShapeRef::of::<A>(),
            parse: Box::new(move |mirror: &mut Mirror, text: &Text| {
                Ok(mirror.parse_one::<A>(text)?.map(|parsed| parsed.map(wrap)))
            }),
        }
    }
}

pub struct Sequence<T> {
    pub(crate) components: Vec<Component>,
    pub(crate) assemble: Box<dyn Fn(&mut Fields) -> Result<T>>,
}

impl<T> Sequence<T> {
    pub fn new(assemble: impl Fn(&mut Fields) -> Result<T> + 'static) -> Self {
        Sequence { components: Vec::new(), assemble: Box::new(assemble) }
    }

    pub fn component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    fn validated(mut self, name: &str) -> Result<Self, DeclarationError> {
        if self.components.is_empty() {
            return Err(DeclarationError::new(name, "it does not declare any components"));
        }
        for (i, c) in self.components.iter().enumerate() {
            if self.components[..i].iter().any(|d| d.slot == c.slot) {
                return Err(DeclarationError::new(name, format!("slot `{}` is declared twice", c.slot)));
            }
            if let Policy::Delimited { delimiter, .. } = &c.policy {
                if delimiter.0.is_empty() {
                    return Err(DeclarationError::new(name, format!("slot `{}` has an empty delimiter", c.slot)));
                }
            }
        }
        // Stable: equal priorities keep declaration order.
        self.components.sort_by_key(|c| c.priority);
        Ok(self)
    }
}

/// Keyword or delimiter text.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Display, From)]
pub struct Literal(String);

impl Literal {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for Literal { fn from(s: &str) -> Self { Literal(s.to_string()) } }

impl AsRef<str> for Literal { fn as_ref(&self) -> &str { &self.0 } }

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Policy {
    Required,
    Optional,
    OneOrMore,
    ZeroOrMore,
    Keyword(Literal),
    Delimited { delimiter: Literal, trailing_allowed: bool, empty_allowed: bool },
}

impl Policy {
    /// The annotation a rendered grammar puts after the element name.
    pub fn suffix(&self) -> String {
        match self {
            Policy::Required => String::new(),
            Policy::Optional => "?".to_string(),
            Policy::OneOrMore => "+".to_string(),
            Policy::ZeroOrMore => "*".to_string(),
            Policy::Keyword(literal) => format!("`{}`", literal),
            Policy::Delimited { delimiter, .. } => format!("~\"{}\"", delimiter),
        }
    }
}

/// The monomorphic pieces the engine needs to drive one element type.
#[derive(Copy, Clone)]
pub(crate) struct Element {
    pub(crate) shape: ShapeRef,
    pub(crate) parse: fn(&mut Mirror, &Text) -> Result<Option<Parsed<Value>>>,
    pub(crate) collect: fn(Vec<Value>) -> Result<Value>,
    pub(crate) wrap: fn(Option<Value>) -> Result<Value>,
}

impl Element {
    fn of<A: Parse>() -> Self {
        Element {
            shape: ShapeRef::of::<A>(),
            parse: parse_erased::<A>,
            collect: collect_erased::<A>,
            wrap: wrap_erased::<A>,
        }
    }
}

fn parse_erased<A: Parse>(mirror: &mut Mirror, text: &Text) -> Result<Option<Parsed<Value>>> {
    Ok(mirror.parse_one::<A>(text)?.map(|parsed| parsed.map(|a| Box::new(a) as Value)))
}

// Every value handed to these came out of `parse_erased::<A>`, so a failed
// downcast means an element was wired to the wrong type.
fn downcast_element<A: Parse>(value: Value) -> Result<A> {
    match value.downcast::<A>() {
        Ok(a) => Ok(*a),
        Err(_) => Err(DeclarationError::new(A::name(), "element value has the wrong type").into()),
    }
}

pub(crate) fn collect_erased<A: Parse>(values: Vec<Value>) -> Result<Value> {
    let items = values.into_iter().map(downcast_element::<A>).collect::<Result<Vec<A>>>()?;
    Ok(Box::new(items))
}

pub(crate) fn wrap_erased<A: Parse>(value: Option<Value>) -> Result<Value> {
    let item: Option<A> = value.map(downcast_element::<A>).transpose()?;
    Ok(Box::new(item))
}

/// One member of a [`Sequence`].
///
/// Components are attempted in ascending `priority` order, which need not be
/// the order they were declared in. The parsed value lands in `slot`:
///
/// | policy | slot type |
/// |---|---|
/// | required | `A` |
/// | optional | `Option<A>` |
/// | one-or-more, zero-or-more, delimited | `Vec<A>` |
/// | keyword | `String` |
pub struct Component {
    pub(crate) slot: &'static str,
    pub(crate) priority: i32,
    pub(crate) policy: Policy,
    pub(crate) label: Option<String>,
    pub(crate) element: Option<Element>,
}

impl Component {
    fn with<A: Parse>(slot: &'static str, priority: i32, policy: Policy) -> Self {
        Component { slot, priority, policy, label: None, element: Some(Element::of::<A>()) }
    }

    pub fn required<A: Parse>(slot: &'static str, priority: i32) -> Self {
        Self::with::<A>(slot, priority, Policy::Required)
    }

    pub fn optional<A: Parse>(slot: &'static str, priority: i32) -> Self {
        Self::with::<A>(slot, priority, Policy::Optional)
    }

    pub fn one_or_more<A: Parse>(slot: &'static str, priority: i32) -> Self {
        Self::with::<A>(slot, priority, Policy::OneOrMore)
    }

    pub fn zero_or_more<A: Parse>(slot: &'static str, priority: i32) -> Self {
        Self::with::<A>(slot, priority, Policy::ZeroOrMore)
    }

    pub fn keyword(slot: &'static str, priority: i32, literal: impl Into<Literal>) -> Self {
        Component { slot, priority, policy: Policy::Keyword(literal.into()), label: None, element: None }
    }

    /// Elements of `A` separated by `delimiter`. Neither an empty list nor a
    /// trailing delimiter is accepted unless allowed explicitly.
    pub fn delimited<A: Parse>(slot: &'static str, priority: i32, delimiter: impl Into<Literal>) -> Self {
        Self::with::<A>(slot, priority, Policy::Delimited {
            delimiter: delimiter.into(),
            trailing_allowed: false,
            empty_allowed: false,
        })
    }

    /// Failing this component becomes a [`ParseError`](crate::ParseError)
    /// carrying `label`, instead of a silent non-match.
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn trailing_allowed(mut self, allowed: bool) -> Self {
        if let Policy::Delimited { trailing_allowed, .. } = &mut self.policy {
            *trailing_allowed = allowed;
        }
        self
    }

    pub fn empty_allowed(mut self, allowed: bool) -> Self {
        if let Policy::Delimited { empty_allowed, .. } = &mut self.policy {
            *empty_allowed = allowed;
        }
        self
    }

    pub fn slot(&self) -> &'static str { self.slot }
    pub fn priority(&self) -> i32 { self.priority }
    pub fn policy(&self) -> &Policy { &self.policy }
    pub fn label(&self) -> Option<&str> { self.label.as_deref() }
}

/// The parsed slot values of a sequence, handed to its assembler.
pub struct Fields {
    shape: String,
    values: LinearMap<&'static str, Value>,
}

impl Fields {
    pub(crate) fn new(shape: String) -> Self {
        Fields { shape, values: LinearMap::new() }
    }

    pub(crate) fn insert(&mut self, slot: &'static str, value: Value) {
        self.values.insert(slot, value);
    }

    /// Moves the value out of `slot`. Asking for a slot no component filled,
    /// or with the wrong type, is a declaration error.
    pub fn take<V: 'static>(&mut self, slot: &str) -> Result<V> {
        let value = self.values.remove(slot).ok_or_else(|| {
            DeclarationError::new(&self.shape, format!("no component fills slot `{}`", slot))
        })?;
        match value.downcast::<V>() {
            Ok(v) => Ok(*v),
            Err(_) => Err(DeclarationError::new(&self.shape, format!(
                "slot `{}` does not hold a `{}`", slot, simple_name(std::any::type_name::<V>()))).into()),
        }
    }
}

#[cfg(test)]
#[path = "tests/shape.rs"]
mod tests_for_shape;
