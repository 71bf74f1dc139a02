use crate::VERSION;

/// Tokenises input. `fn not_a_symbol()` in docs is still a comment.
pub struct Parser {
    input: String,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        let _ = "fn fake() {}";
        Parser {
            input: format!("{VERSION}{input}"),
        }
    }
}
