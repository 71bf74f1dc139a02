mod parser;

pub use parser::Parser;

pub const VERSION: &str = "1.0";
