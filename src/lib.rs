//! Mirror: parse a stream of tokens into typed values by matching each type's
//! declared grammar.
//!
//! A target type implements [`Parse`] and says whether it is a terminal (a
//! leaf matcher over one token's text), an alternation (the first of several
//! candidate types that matches), or a sequence (components with repetition
//! policies, attempted in priority order). The engine in [`Mirror`] walks
//! those declarations recursively over a [`Text`], backtracking on failure and
//! remembering every (shape, position) result so that recursive grammars do
//! not re-derive the same sub-parse twice.
//!
//! ```
//! use mirror::{Component, Parse, Sequence, Shape, Text, Token};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Num(i64);
//!
//! impl Parse for Num {
//!     fn shape() -> Shape<Self> {
//!         Shape::Terminal(|s| s.parse().ok().map(Num))
//!     }
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Nums(Vec<Num>);
//!
//! impl Parse for Nums {
//!     fn shape() -> Shape<Self> {
//!         Shape::Sequence(Sequence::new(|f| Ok(Nums(f.take("items")?)))
//!             .component(Component::delimited::<Num>("items", 0, ",")))
//!     }
//! }
//!
//! let tokens = ["1", ",", "2"].iter().enumerate()
//!     .map(|(i, s)| Token::new("doc", *s, 1, i + 1))
//!     .collect();
//! let nums: Nums = mirror::Mirror::new().parse_complete(&Text::new(tokens)).unwrap();
//! assert_eq!(nums, Nums(vec![Num(1), Num(2)]));
//! ```
//!
//! Tokenizing is left to the caller: the engine only ever looks at the text
//! of each [`Token`].

mod error;
mod memo;
mod mirror;
mod rendering;
mod shape;
mod text;
mod token;
mod util;

pub use error::{DeclarationError, Error, ParseError, Result};
pub use memo::MemoStats;
pub use mirror::{parse_one, Config, Mirror, Parsed};
pub use rendering::grammar;
pub use shape::{Alternative, Component, Fields, Literal, Parse, Policy, Sequence, Shape, ShapeRef};
pub use text::Text;
pub use token::Token;
