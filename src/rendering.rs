//! Renders the grammar a type declares as EBNF-like text, one block per
//! reachable shape:
//!
//! ```text
//! Expr = Term
//!        Tail*
//!
//! Term = ....
//!
//! Tail = `+`
//!        Term
//! ```

use std::collections::{HashSet, VecDeque};

use crate::error::Result;
use crate::shape::{Parse, Policy, ShapeRef};

/// The structure of one shape with the parsing machinery stripped away.
pub(crate) enum Outline {
    Terminal,
    Alternation(Vec<ShapeRef>),
    /// Components in the order they are attempted; keywords have no element.
    Sequence(Vec<(Option<ShapeRef>, Policy)>),
}

impl Outline {
    fn dependencies(&self) -> Vec<ShapeRef> {
        match self {
            Outline::Terminal => vec![],
            Outline::Alternation(alternatives) => alternatives.clone(),
            Outline::Sequence(components) => components.iter().filter_map(|(element, _)| *element).collect(),
        }
    }
}

pub(crate) trait Rendered {
    fn rendered(&self) -> String;
}

struct Block<'a> {
    name: String,
    outline: &'a Outline,
}

impl Rendered for Block<'_> {
    fn rendered(&self) -> String {
        let head = format!("{} = ", self.name);
        let lines: Vec<String> = match self.outline {
            Outline::Terminal => return format!("{}....", head),
            Outline::Alternation(alternatives) => alternatives.iter().map(|a| a.name()).collect(),
            Outline::Sequence(components) => components.iter()
                .map(|(element, policy)| match element {
                    Some(element) => format!("{}{}", element.name(), policy.suffix()),
                    None => policy.suffix(),
                })
                .collect(),
        };
        // Continuation lines line up under the first entry; alternatives put
        // their bar under the `=`.
        let pad = match self.outline {
            Outline::Alternation(_) => format!("{}| ", " ".repeat(head.len().saturating_sub(2))),
            _ => " ".repeat(head.len()),
        };
        format!("{}{}", head, lines.join(&format!("\n{}", pad)))
    }
}

/// Renders the grammar of `T` and of every shape reachable from it.
///
/// Shapes are visited breadth first, alternatives in declaration order and
/// sequence components in the order they are attempted, so the output is
/// stable from run to run. Each shape is rendered once, even when the grammar
/// is recursive.
pub fn grammar<T: Parse>() -> Result<String> {
    let root = ShapeRef::of::<T>();
    let mut seen = HashSet::from([root.id()]);
    let mut frontier = VecDeque::from([root]);
    let mut blocks = Vec::new();
    while let Some(shape) = frontier.pop_front() {
        let outline = shape.outline()?;
        for dependency in outline.dependencies() {
            if seen.insert(dependency.id()) {
                frontier.push_back(dependency);
            }
        }
        blocks.push(Block { name: shape.name(), outline: &outline }.rendered());
    }
    Ok(blocks.join("\n\n"))
}

#[cfg(test)]
#[path = "tests/rendering.rs"]
mod tests_for_rendering;
