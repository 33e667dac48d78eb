//! A `Text` is a view into a shared sequence of tokens. Advancing a `Text`
//! produces a new view; the backing sequence is never touched, so views are
//! cheap to clone and safe to hold onto while backtracking.

use std::borrow::Cow;
use std::sync::Arc;

use crate::Token;

#[derive(Clone, Debug)]
pub struct Text {
    tokens: Arc<[Token]>,
    offset: usize,
}

impl Text {
    pub fn new(tokens: Vec<Token>) -> Self {
        Text { tokens: tokens.into(), offset: 0 }
    }

    /// Number of tokens left in this view.
    pub fn size(&self) -> usize {
        self.tokens.len() - self.offset
    }

    pub fn end(&self) -> bool {
        self.size() == 0
    }

    /// The current token, or the end-of-input sentinel once exhausted.
    pub fn first(&self) -> Cow<'_, Token> {
        match self.tokens.get(self.offset) {
            Some(token) => Cow::Borrowed(token),
            None => {
                let source = self.tokens.first().map(|t| t.source()).unwrap_or("");
                Cow::Owned(Token::end_of(source))
            }
        }
    }

    /// Lookahead: the token `i` positions past the current one.
    pub fn get(&self, i: usize) -> Option<&Token> {
        self.offset.checked_add(i).and_then(|j| self.tokens.get(j))
    }

    pub fn begins(&self, literal: &str) -> bool {
        self.get(0).and_then(Token::text) == Some(literal)
    }

    pub fn begins_all(&self, literals: &[&str]) -> bool {
        if literals.len() > self.size() {
            return false;
        }
        literals.iter().enumerate().all(|(i, lit)| self.get(i).and_then(Token::text) == Some(*lit))
    }

    /// A view advanced by `n` tokens. Advancing past the end stops at the end.
    pub fn take(&self, n: usize) -> Text {
        let offset = std::cmp::min(self.offset.saturating_add(n), self.tokens.len());
        Text { tokens: self.tokens.clone(), offset }
    }

    pub fn take_one(&self) -> Text {
        self.take(1)
    }

    /// Whether `self` and `other` are views into the very same token sequence.
    pub fn same_source(&self, other: &Text) -> bool {
        Arc::ptr_eq(&self.tokens, &other.tokens)
    }
}

impl From<Vec<Token>> for Text {
    fn from(tokens: Vec<Token>) -> Self { Text::new(tokens) }
}

impl PartialEq for Text {
    fn eq(&self, other: &Text) -> bool {
        self.same_source(other) && self.offset == other.offset
    }
}

impl Eq for Text {}

impl std::fmt::Display for Text {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.first().text() {
            Some(text) => write!(w, "{}...", text),
            None => write!(w, "EOF"),
        }
    }
}

#[cfg(test)]
#[path = "tests/text.rs"]
mod tests_for_text;
