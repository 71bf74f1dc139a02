//! Go strategy.

use super::lexer::{Delimiters, StringRule};
use super::patterns::{ImportRule, PatternLanguage, SymbolRule};
use super::ImportSyntax;
use crate::config::SymbolKind;

pub static GO: PatternLanguage = PatternLanguage {
    name: "Go",
    extensions: &["go"],
    delimiters: Delimiters {
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        nested_comments: false,
        regex_literals: false,
        strings: &[
            StringRule::raw("`", "`"),
            StringRule::plain("\"", "\""),
            StringRule::plain("'", "'"),
        ],
    },
    symbol_rules: &[
        SymbolRule::new(
            SymbolKind::Struct,
            r"^type\s+(?P<name>\w+)(?:\[[^\]]*\])?\s+struct\b",
        ),
        SymbolRule::new(
            SymbolKind::Interface,
            r"^type\s+(?P<name>\w+)(?:\[[^\]]*\])?\s+interface\b",
        ),
        SymbolRule::new(SymbolKind::TypeAlias, r"^type\s+(?P<name>\w+)"),
        SymbolRule::new(
            SymbolKind::Function,
            r"^func\s+(?:\([^)]*\)\s*)?(?P<name>\w+)",
        ),
        SymbolRule::new(SymbolKind::Constant, r"^const\s+(?P<name>\w+)"),
    ],
    import_rules: &[
        ImportRule::Line(r#"^\s*import\s+(?:[\w.]+\s+)?(?P<spec>"[^"]*"|`[^`]*`)"#),
        ImportRule::Block {
            open: r"^\s*import\s*\(",
            item: r#"(?P<spec>"[^"]*"|`[^`]*`)"#,
            close: r"\)",
        },
    ],
    excluded_names: &[],
    import_syntax: ImportSyntax::GoPackage,
    resolve_extensions: &["go"],
};
