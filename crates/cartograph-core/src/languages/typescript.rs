//! TypeScript and JavaScript strategies.

use super::lexer::{Delimiters, StringRule};
use super::patterns::{ImportRule, PatternLanguage, SymbolRule};
use super::ImportSyntax;
use crate::config::SymbolKind;

const DELIMITERS: Delimiters = Delimiters {
    line_comments: &["//"],
    block_comment: Some(("/*", "*/")),
    nested_comments: false,
    regex_literals: true,
    strings: &[
        StringRule::multiline("`", "`"),
        StringRule::plain("\"", "\""),
        StringRule::plain("'", "'"),
    ],
};

const SYMBOL_RULES: &[SymbolRule] = &[
    SymbolRule::new(
        SymbolKind::Class,
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?class\s+(?P<name>\w+)",
    ),
    SymbolRule::new(
        SymbolKind::Interface,
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?interface\s+(?P<name>\w+)",
    ),
    SymbolRule::new(
        SymbolKind::Enum,
        r"^\s*(?:export\s+)?(?:declare\s+)?(?:const\s+)?enum\s+(?P<name>\w+)",
    ),
    SymbolRule::new(
        SymbolKind::TypeAlias,
        r"^\s*(?:export\s+)?(?:declare\s+)?type\s+(?P<name>\w+)\s*(?:<[^=]*>)?\s*=",
    ),
    SymbolRule::new(
        SymbolKind::Function,
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:async\s+)?function\s*\*?\s*(?P<name>\w+)",
    ),
    // const handler = async (req: Request): Promise<void> => ...
    SymbolRule::new(
        SymbolKind::Function,
        r"^\s*(?:export\s+)?(?:const|let|var)\s+(?P<name>\w+)\s*(?::[^=]+)?=\s*(?:async\s+)?(?:\([^)]*\)|\w+)\s*(?::[^=]+)?=>",
    ),
    SymbolRule::new(
        SymbolKind::Function,
        r"^\s*(?:export\s+)?(?:const|let|var)\s+(?P<name>\w+)\s*=\s*(?:async\s+)?function\b",
    ),
    SymbolRule::new(
        SymbolKind::Constant,
        r"^\s*(?:export\s+)?const\s+(?P<name>[A-Z][A-Z0-9_]*)\s*(?::[^=]+)?=",
    ),
    SymbolRule::new(SymbolKind::Decorator, r"^\s*@(?P<name>[\w.]+)"),
    // Class methods, only when the line opens the body. Parameter lists
    // holding a call or callback (`it("x", function () {`) are not methods.
    SymbolRule::new(
        SymbolKind::Function,
        r"^\s*(?:(?:public|private|protected|static|abstract|async|override|readonly|get|set)\s+)*\*?(?P<name>\w+)\s*(?:<[^>]*>)?\s*\([^()]*\)\s*(?::\s*[^{;=]+)?\{\s*$",
    ),
];

const IMPORT_RULES: &[ImportRule] = &[
    ImportRule::Line(r#"\bfrom\s+(?P<spec>'[^']*'|"[^"]*")"#),
    ImportRule::Line(r#"^\s*import\s+(?P<spec>'[^']*'|"[^"]*")"#),
    ImportRule::Line(r#"\brequire\s*\(\s*(?P<spec>'[^']*'|"[^"]*")\s*\)"#),
    ImportRule::Line(r#"\bimport\s*\(\s*(?P<spec>'[^']*'|"[^"]*")\s*\)"#),
];

const EXCLUDED: &[&str] = &[
    "if", "for", "while", "switch", "catch", "with", "return", "function", "super", "typeof",
    "await", "extends", "implements",
];

const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "d.ts", "js", "jsx", "mjs", "cjs"];

pub static TYPESCRIPT: PatternLanguage = PatternLanguage {
    name: "TypeScript",
    extensions: &["ts", "tsx", "mts", "cts"],
    delimiters: DELIMITERS,
    symbol_rules: SYMBOL_RULES,
    import_rules: IMPORT_RULES,
    excluded_names: EXCLUDED,
    import_syntax: ImportSyntax::FilePath,
    resolve_extensions: RESOLVE_EXTENSIONS,
};

pub static JAVASCRIPT: PatternLanguage = PatternLanguage {
    name: "JavaScript",
    extensions: &["js", "jsx", "mjs", "cjs"],
    delimiters: DELIMITERS,
    symbol_rules: SYMBOL_RULES,
    import_rules: IMPORT_RULES,
    excluded_names: EXCLUDED,
    import_syntax: ImportSyntax::FilePath,
    resolve_extensions: RESOLVE_EXTENSIONS,
};
