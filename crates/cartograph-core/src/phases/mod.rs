pub mod imports;
pub mod parsing;
pub mod project;
pub mod structure;
