/// A single lexical unit, as handed to us by whatever tokenizer produced the
/// input. Tokens are never mutated once built.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Token {
    source: String,
    /// `None` only for the end-of-input sentinel.
    text: Option<String>,
    line: usize,
    column: usize,
}

impl Token {
    pub fn new(source: impl Into<String>, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token { source: source.into(), text: Some(text.into()), line, column }
    }

    /// The sentinel returned when a cursor has run off the end of `source`.
    /// It is synthesized on demand and never stored in a token sequence.
    pub fn end_of(source: impl Into<String>) -> Self {
        Token { source: source.into(), text: None, line: 0, column: 0 }
    }

    /// A copy of this token with `c` added to its text.
    pub fn append(&self, c: char) -> Self {
        let mut text = self.text.clone().unwrap_or_default();
        text.push(c);
        Token { source: self.source.clone(), text: Some(text), line: self.line, column: self.column }
    }

    pub fn is_end(&self) -> bool { self.text.is_none() }

    pub fn source(&self) -> &str { &self.source }
    pub fn text(&self) -> Option<&str> { self.text.as_deref() }
    pub fn line(&self) -> usize { self.line }
    pub fn column(&self) -> usize { self.column }
}

impl std::fmt::Display for Token {
    fn fmt(&self, w: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.text {
            Some(text) => write!(w, "`{}` at line {}, column {} in {}", text, self.line, self.column, self.source),
            None => write!(w, "end of {}", self.source),
        }
    }
}

#[cfg(test)]
#[path = "tests/token.rs"]
mod tests_for_token;
