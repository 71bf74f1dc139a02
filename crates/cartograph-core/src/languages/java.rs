//! Java strategy.

use super::lexer::{Delimiters, StringRule};
use super::patterns::{ImportRule, PatternLanguage, SymbolRule};
use super::ImportSyntax;
use crate::config::SymbolKind;

/// Prefix every Java declaration may carry: annotations, then modifiers.
macro_rules! java_decl {
    ($tail:literal) => {
        concat!(
            r"^\s*(?:@\w+(?:\([^)]*\))?\s+)*(?:(?:public|protected|private|static|abstract|final|sealed|non-sealed|strictfp|default|synchronized|native|transient|volatile)\s+)*",
            $tail
        )
    };
}

pub static JAVA: PatternLanguage = PatternLanguage {
    name: "Java",
    extensions: &["java"],
    delimiters: Delimiters {
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        nested_comments: false,
        regex_literals: false,
        strings: &[
            StringRule::multiline("\"\"\"", "\"\"\""),
            StringRule::plain("\"", "\""),
            StringRule::plain("'", "'"),
        ],
    },
    symbol_rules: &[
        SymbolRule::new(SymbolKind::Decorator, java_decl!(r"@interface\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Struct, java_decl!(r"record\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Enum, java_decl!(r"enum\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Interface, java_decl!(r"interface\s+(?P<name>\w+)")),
        SymbolRule::new(SymbolKind::Class, java_decl!(r"class\s+(?P<name>\w+)")),
        SymbolRule::new(
            SymbolKind::Constant,
            java_decl!(r"[\w.]+(?:<[^()]*>)?(?:\[\])*\s+(?P<name>[A-Z][A-Z0-9_]*)\s*="),
        ),
        SymbolRule::new(
            SymbolKind::Function,
            java_decl!(
                r"(?:<[^>]+>\s+)?(?P<ret>[\w.\[\]?]+(?:<[^()]*>)?(?:\[\])*)\s+(?P<name>\w+)\s*\("
            ),
        ),
    ],
    import_rules: &[ImportRule::Line(
        r"^\s*import\s+(?:static\s+)?(?P<spec>[\w.]+(?:\.\*)?)\s*;",
    )],
    excluded_names: &[
        "if", "for", "while", "switch", "catch", "synchronized", "return", "throw", "new", "try",
        "else", "case", "do", "assert", "yield",
    ],
    import_syntax: ImportSyntax::Dotted,
    resolve_extensions: &["java", "kt"],
};
