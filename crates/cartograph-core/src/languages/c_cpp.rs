//! C and C++ strategies. Both share one rule table; the C++-only rules
//! simply never match C sources.

use super::lexer::{Delimiters, StringRule};
use super::patterns::{ImportRule, PatternLanguage, SymbolRule};
use super::ImportSyntax;
use crate::config::SymbolKind;

const DELIMITERS: Delimiters = Delimiters {
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    nested_comments: false,
    regex_literals: false,
    strings: &[StringRule::plain("\"", "\""), StringRule::plain("'", "'")],
};

const SYMBOL_RULES: &[SymbolRule] = &[
    SymbolRule::new(
        SymbolKind::Class,
        r"^\s*(?:template\s*<[^>]*>\s*)?class\s+(?:\w+\s+)?(?P<name>\w+)\s*(?:final\s*)?(?::|\{|$)",
    ),
    SymbolRule::new(
        SymbolKind::Struct,
        r"^\s*(?:template\s*<[^>]*>\s*)?(?:typedef\s+)?struct\s+(?P<name>\w+)\s*(?::|\{|$)",
    ),
    SymbolRule::new(
        SymbolKind::Enum,
        r"^\s*(?:typedef\s+)?enum\s+(?:class\s+|struct\s+)?(?P<name>\w+)",
    ),
    SymbolRule::new(SymbolKind::TypeAlias, r"^\s*using\s+(?P<name>\w+)\s*="),
    SymbolRule::new(SymbolKind::TypeAlias, r"^\s*typedef\s+[^;]*?\b(?P<name>\w+)\s*;"),
    SymbolRule::new(SymbolKind::Constant, r"^\s*#\s*define\s+(?P<name>\w+)(?:\s|$)"),
    SymbolRule::new(
        SymbolKind::Constant,
        r"^\s*(?:static\s+|inline\s+)*(?:constexpr|const)\s+[\w:<>]+\s+(?P<name>\w+)\s*=",
    ),
    SymbolRule::new(
        SymbolKind::Function,
        r"^\s*(?:template\s*<[^>]*>\s*)?(?:(?:static|inline|virtual|extern|explicit|constexpr|friend)\s+)*(?P<ret>[\w:<>,]+)(?:\s*[*&]+\s*|\s+)(?P<name>[\w:~]+)\s*\(",
    ),
];

const IMPORT_RULES: &[ImportRule] = &[ImportRule::Line(
    r#"^\s*#\s*include\s*(?P<spec>"[^"]*"|<[^>]*>)"#,
)];

const EXCLUDED: &[&str] = &[
    "if", "while", "for", "switch", "return", "else", "new", "delete", "throw", "case", "goto",
    "sizeof", "do", "using", "namespace", "typedef",
];

const RESOLVE_EXTENSIONS: &[&str] = &["h", "hpp", "hh", "hxx", "c", "cc", "cpp", "cxx"];

pub static C: PatternLanguage = PatternLanguage {
    name: "C",
    extensions: &["c", "h"],
    delimiters: DELIMITERS,
    symbol_rules: SYMBOL_RULES,
    import_rules: IMPORT_RULES,
    excluded_names: EXCLUDED,
    import_syntax: ImportSyntax::FilePath,
    resolve_extensions: RESOLVE_EXTENSIONS,
};

pub static CPP: PatternLanguage = PatternLanguage {
    name: "C++",
    extensions: &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
    delimiters: DELIMITERS,
    symbol_rules: SYMBOL_RULES,
    import_rules: IMPORT_RULES,
    excluded_names: EXCLUDED,
    import_syntax: ImportSyntax::FilePath,
    resolve_extensions: RESOLVE_EXTENSIONS,
};
