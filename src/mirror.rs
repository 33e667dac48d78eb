//! The grammar engine: a recursive, backtracking, memoizing matcher driven by
//! the [`Shape`] each target type declares.
//!
//! Two outcomes of a parse attempt are kept apart throughout:
//!
//! * `Ok(None)`: the shape does not start here. The caller may try something
//!   else (another alternative, the end of a repetition, an optional default).
//! * `Err(_)`: a labeled component of a sequence failed after the sequence was
//!   entered, or a grammar declaration is unusable. This propagates through
//!   every enclosing alternation and sequence.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{DeclarationError, ParseError, Result};
use crate::memo::{Key, Memo, MemoStats};
use crate::shape::{Alternative, Component, Element, Fields, Parse, Policy, Sequence, Shape, Value};
use crate::Text;

/// A successful match: the value and the input left after it.
#[derive(Clone, PartialEq, Debug)]
pub struct Parsed<T> {
    pub rest: Text,
    pub value: T,
}

impl<T> Parsed<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed { rest: self.rest, value: f(self.value) }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Config {
    /// Turning this off never changes a result, only how long it takes.
    pub memoize: bool,
}

impl Default for Config {
    fn default() -> Self { Config { memoize: true } }
}

/// One parsing engine. The memo table lives here, so independent parses
/// should use independent `Mirror`s; reusing one across inputs is correct but
/// drops the table on every switch.
pub struct Mirror {
    config: Config,
    memo: Memo,
    /// The input the memo table currently describes. Holding on to it keeps
    /// its backing sequence alive, so identity comparisons stay meaningful.
    source: Option<Text>,
    shapes: HashMap<TypeId, Rc<dyn Any>>,
}

impl Default for Mirror {
    fn default() -> Self { Mirror::new() }
}

impl Mirror {
    pub fn new() -> Self {
        Mirror::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Mirror { config, memo: Memo::new(config.memoize), source: None, shapes: HashMap::new() }
    }

    pub fn config(&self) -> Config { self.config }

    pub fn stats(&self) -> MemoStats { self.memo.stats() }

    /// Number of results currently remembered.
    pub fn memo_len(&self) -> usize { self.memo.len() }

    /// Attempts to parse a `T` at the start of `text`.
    pub fn parse_one<T: Parse>(&mut self, text: &Text) -> Result<Option<Parsed<T>>> {
        if text.end() {
            return Ok(None);
        }
        self.observe(text);
        let key = Key { shape: TypeId::of::<T>(), size: text.size() };
        if let Some(remembered) = self.memo.get::<T>(key) {
            return Ok(remembered);
        }

        let shape = self.shape::<T>()?;
        let result = match &*shape {
            Shape::Alternation(alternatives) => self.parse_alternation::<T>(alternatives, text)?,
            Shape::Terminal(matcher) => parse_terminal(*matcher, text),
            Shape::Sequence(sequence) => self.parse_sequence::<T>(sequence, text)?,
        };
        self.memo.remember(key, &result);
        Ok(result)
    }

    /// Parses a `T` that must span all of `text`.
    pub fn parse_complete<T: Parse>(&mut self, text: &Text) -> Result<T> {
        match self.parse_one::<T>(text)? {
            None => Err(ParseError::new(format!("expected {}", T::name()), text.first().into_owned()).into()),
            Some(Parsed { rest, value }) if rest.end() => Ok(value),
            Some(Parsed { rest, .. }) => {
                Err(ParseError::new("unexpected trailing input", rest.first().into_owned()).into())
            }
        }
    }

    fn observe(&mut self, text: &Text) {
        let switched = match &self.source {
            Some(source) => !source.same_source(text),
            None => true,
        };
        if switched {
            debug!(remembered = self.memo.len(), "new input, dropping memo table");
            self.memo.clear();
            self.source = Some(text.clone());
        }
    }

    /// The checked shape of `T`, built on first use.
    fn shape<T: Parse>(&mut self) -> Result<Rc<Shape<T>>> {
        if let Some(shape) = self.shapes.get(&TypeId::of::<T>()) {
            if let Ok(shape) = shape.clone().downcast::<Shape<T>>() {
                return Ok(shape);
            }
        }
        let name = T::name();
        let shape = Rc::new(T::shape().validated(&name)?);
        debug!(shape = %name, "registered");
        self.shapes.insert(TypeId::of::<T>(), shape.clone());
        Ok(shape)
    }

    fn parse_alternation<T: Parse>(&mut self, alternatives: &[Alternative<T>], text: &Text) -> Result<Option<Parsed<T>>> {
        trace!(shape = %T::name(), at = %text, "alternation");
        for alternative in alternatives {
            if let Some(parsed) = (alternative.parse)(self, text)? {
                trace!(shape = %T::name(), chose = %alternative.shape.name(), "alternation matched");
                return Ok(Some(parsed));
            }
        }
        Ok(None)
    }

    fn parse_sequence<T: Parse>(&mut self, sequence: &Sequence<T>, text: &Text) -> Result<Option<Parsed<T>>> {
        trace!(shape = %T::name(), at = %text, "sequence");
        let mut fields = Fields::new(T::name());
        let mut text = text.clone();
        for component in &sequence.components {
            match self.parse_component(component, &text)? {
                Some(Parsed { rest, value }) => {
                    fields.insert(component.slot, value);
                    text = rest;
                }
                None => {
                    if let Some(label) = &component.label {
                        return Err(ParseError::new(label.clone(), text.first().into_owned()).into());
                    }
                    trace!(shape = %T::name(), slot = component.slot, "sequence failed");
                    return Ok(None);
                }
            }
        }
        let value = (sequence.assemble)(&mut fields)?;
        Ok(Some(Parsed { rest: text, value }))
    }

    fn parse_component(&mut self, component: &Component, text: &Text) -> Result<Option<Parsed<Value>>> {
        let element = match (&component.policy, component.element) {
            (Policy::Keyword(literal), _) => return Ok(parse_keyword(literal.as_str(), text)),
            (_, Some(element)) => element,
            (_, None) => {
                return Err(DeclarationError::new(component.slot, "component has no element type").into());
            }
        };
        match &component.policy {
            Policy::Required => (element.parse)(self, text),
            Policy::Optional => self.parse_optional(element, text),
            Policy::OneOrMore => self.parse_repeated(element, text, 1),
            Policy::ZeroOrMore => self.parse_repeated(element, text, 0),
            Policy::Delimited { delimiter, trailing_allowed, empty_allowed } => {
                self.parse_delimited(element, text, delimiter.as_str(), *trailing_allowed, *empty_allowed)
            }
            Policy::Keyword(_) => Ok(None),
        }
    }

    fn parse_optional(&mut self, element: Element, text: &Text) -> Result<Option<Parsed<Value>>> {
        let parsed = match (element.parse)(self, text)? {
            Some(Parsed { rest, value }) => Parsed { rest, value: (element.wrap)(Some(value))? },
            None => Parsed { rest: text.clone(), value: (element.wrap)(None)? },
        };
        Ok(Some(parsed))
    }

    fn parse_repeated(&mut self, element: Element, text: &Text, at_least: usize) -> Result<Option<Parsed<Value>>> {
        let mut items = Vec::new();
        let mut text = text.clone();
        while let Some(Parsed { rest, value }) = (element.parse)(self, &text)? {
            items.push(value);
            let stalled = rest.size() == text.size();
            text = rest;
            // An element that matched without consuming anything would match
            // forever.
            if stalled {
                break;
            }
        }
        trace!(element = %element.shape.name(), count = items.len(), "repetition");
        if items.len() < at_least {
            return Ok(None);
        }
        Ok(Some(Parsed { rest: text, value: (element.collect)(items)? }))
    }

    fn parse_delimited(
        &mut self,
        element: Element,
        text: &Text,
        delimiter: &str,
        trailing_allowed: bool,
        empty_allowed: bool,
    ) -> Result<Option<Parsed<Value>>> {
        let mut items = Vec::new();
        let mut text = text.clone();
        loop {
            let Some(Parsed { rest, value }) = (element.parse)(self, &text)? else {
                // Either nothing at all, or a delimiter with nothing after it.
                if items.is_empty() && !empty_allowed {
                    return Ok(None);
                }
                if !items.is_empty() && !trailing_allowed {
                    return Ok(None);
                }
                break;
            };
            items.push(value);
            text = rest;
            if !text.begins(delimiter) {
                break;
            }
            text = text.take_one();
        }
        trace!(element = %element.shape.name(), count = items.len(), "delimited list");
        Ok(Some(Parsed { rest: text, value: (element.collect)(items)? }))
    }
}

fn parse_terminal<T>(matcher: fn(&str) -> Option<T>, text: &Text) -> Option<Parsed<T>> {
    let value = text.first().text().and_then(matcher)?;
    Some(Parsed { rest: text.take_one(), value })
}

fn parse_keyword(literal: &str, text: &Text) -> Option<Parsed<Value>> {
    if text.begins(literal) {
        return Some(Parsed { rest: text.take_one(), value: Box::new(literal.to_string()) });
    }
    None
}

/// Parses a `T` at the start of `text` with a fresh engine.
pub fn parse_one<T: Parse>(text: &Text) -> Result<Option<Parsed<T>>> {
    Mirror::new().parse_one::<T>(text)
}

#[cfg(test)]
#[path = "tests/mirror.rs"]
mod tests_for_mirror;
