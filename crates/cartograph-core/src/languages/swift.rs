//! Swift strategy.

use super::lexer::{Delimiters, StringRule};
use super::patterns::{ImportRule, PatternLanguage, SymbolRule};
use super::ImportSyntax;
use crate::config::SymbolKind;

macro_rules! swift_decl {
    ($tail:literal) => {
        concat!(
            r"^\s*(?:@\w+(?:\([^)]*\))?\s+)*(?:(?:public|private|fileprivate|internal|open|package|final|static|class|override|mutating|nonmutating|required|convenience|lazy|weak|unowned|indirect|nonisolated|dynamic)\s+)*",
            $tail
        )
    };
}

pub static SWIFT: PatternLanguage = PatternLanguage {
    name: "Swift",
    extensions: &["swift"],
    delimiters: Delimiters {
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        nested_comments: true,
        regex_literals: false,
        strings: &[
            StringRule::multiline("\"\"\"", "\"\"\""),
            StringRule::plain("\"", "\""),
        ],
    },
    symbol_rules: &[
        SymbolRule::new(SymbolKind::Enum, swift_decl!(r"enum\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Struct, swift_decl!(r"struct\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Interface, swift_decl!(r"protocol\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Class, swift_decl!(r"(?:class|actor)\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::TypeAlias, swift_decl!(r"typealias\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Function, swift_decl!(r"func\s+(?P<name>\w+)")),
        SymbolRule::new(
            SymbolKind::Constant,
            r"^(?:(?:public|private|fileprivate|internal|package)\s+)?let\s+(?P<name>\w+)",
        ),
    ],
    import_rules: &[ImportRule::Line(
        r"^\s*(?:@testable\s+)?import\s+(?:(?:typealias|struct|class|enum|protocol|let|var|func)\s+)?(?P<spec>[\w.]+)",
    )],
    // `class func` and `class var` are members, not classes.
    excluded_names: &["func", "var", "let", "subscript", "init"],
    import_syntax: ImportSyntax::ModuleDirectory,
    resolve_extensions: &["swift"],
};
