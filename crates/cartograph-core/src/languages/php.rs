//! PHP strategy.

use super::lexer::{Delimiters, StringRule};
use super::patterns::{ImportRule, PatternLanguage, SymbolRule};
use super::ImportSyntax;
use crate::config::SymbolKind;

pub static PHP: PatternLanguage = PatternLanguage {
    name: "PHP",
    extensions: &["php"],
    delimiters: Delimiters {
        line_comments: &["//", "#"],
        block_comment: Some(("/*", "*/")),
        nested_comments: false,
        regex_literals: false,
        strings: &[
            StringRule::multiline("\"", "\""),
            StringRule::multiline("'", "'"),
        ],
    },
    symbol_rules: &[
        SymbolRule::new(SymbolKind::Interface, r"^\s*interface\s+(?P<name>\w+)"),
        SymbolRule::new(SymbolKind::Trait, r"^\s*trait\s+(?P<name>\w+)"),
        SymbolRule::new(SymbolKind::Enum, r"^\s*enum\s+(?P<name>\w+)"),
        SymbolRule::new(
            SymbolKind::Class,
            r"^\s*(?:(?:abstract|final|readonly)\s+)*class\s+(?P<name>\w+)",
        ),
        SymbolRule::new(
            SymbolKind::Constant,
            r"^\s*(?:(?:public|protected|private|final)\s+)*const\s+(?:\w+\s+)?(?P<name>\w+)\s*=",
        ),
        SymbolRule::new(
            SymbolKind::Function,
            r"^\s*(?:(?:public|protected|private|static|abstract|final)\s+)*function\s+&?(?P<name>\w+)\s*\(",
        ),
    ],
    import_rules: &[
        ImportRule::Line(r"^\s*use\s+(?:function\s+|const\s+)?(?P<spec>\\?[\w\\]+)"),
        ImportRule::Line(
            r#"\b(?:require|include)(?:_once)?\s*\(?\s*(?P<spec>'[^']*'|"[^"]*")"#,
        ),
    ],
    excluded_names: &[],
    import_syntax: ImportSyntax::FilePath,
    resolve_extensions: &["php"],
};
