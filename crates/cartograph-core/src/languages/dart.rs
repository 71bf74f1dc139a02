//! Dart strategy.

use super::lexer::{Delimiters, StringRule};
use super::patterns::{ImportRule, PatternLanguage, SymbolRule};
use super::ImportSyntax;
use crate::config::SymbolKind;

pub static DART: PatternLanguage = PatternLanguage {
    name: "Dart",
    extensions: &["dart"],
    delimiters: Delimiters {
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        nested_comments: true,
        regex_literals: false,
        strings: &[
            StringRule::multiline("'''", "'''"),
            StringRule::multiline("\"\"\"", "\"\"\""),
            StringRule::plain("'", "'"),
            StringRule::plain("\"", "\""),
        ],
    },
    symbol_rules: &[
        SymbolRule::new(SymbolKind::Struct, r"^\s*extension\s+type\s+(?P<name>\w+)"),
        SymbolRule::new(SymbolKind::Enum, r"^\s*enum\s+(?P<name>\w+)"),
        SymbolRule::new(SymbolKind::Trait, r"^\s*(?:base\s+)?mixin\s+(?P<name>\w+)"),
        SymbolRule::new(
            SymbolKind::Class,
            r"^\s*(?:(?:abstract|base|final|interface|sealed|mixin)\s+)*class\s+(?P<name>\w+)",
        ),
        SymbolRule::new(
            SymbolKind::TypeAlias,
            r"^\s*typedef\s+(?P<name>\w+)\s*(?:<[^>]*>)?\s*=",
        ),
        SymbolRule::new(
            SymbolKind::Constant,
            r"^\s*(?:static\s+)?const\s+(?:[\w<>?]+\s+)?(?P<name>\w+)\s*=",
        ),
        SymbolRule::new(
            SymbolKind::Function,
            r"^\s*(?:(?:static|external|abstract)\s+)*(?P<ret>[\w<>?,\[\]]+(?:<[^()]*>)?\??)\s+(?P<name>\w+)\s*(?:<[^>]*>)?\s*\(",
        ),
    ],
    import_rules: &[ImportRule::Line(
        r#"^\s*(?:import|export|part)\s+(?P<spec>'[^']*'|"[^"]*")"#,
    )],
    // `mixin class` is a class, and statements can look like typed calls.
    excluded_names: &[
        "class", "if", "for", "while", "switch", "catch", "return", "new", "await", "yield",
        "else", "throw", "case", "assert",
    ],
    import_syntax: ImportSyntax::FilePath,
    resolve_extensions: &["dart"],
};
