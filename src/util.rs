/// Strips module paths from a Rust type name, including inside generic
/// arguments: `a::b::Pair<c::X, Y>` becomes `Pair<X, Y>`.
pub(crate) fn simple_name(full: &str) -> String {
    let mut name = String::new();
    let mut word = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
        } else if c == ':' {
            word.clear();
        } else {
            name.push_str(&word);
            word.clear();
            name.push(c);
        }
    }
    name.push_str(&word);
    name
}
