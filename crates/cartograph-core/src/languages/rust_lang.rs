//! Rust strategy.

use super::lexer::{Delimiters, StringRule};
use super::patterns::{ImportRule, PatternLanguage, SymbolRule};
use super::ImportSyntax;
use crate::config::SymbolKind;

pub static RUST: PatternLanguage = PatternLanguage {
    name: "Rust",
    extensions: &["rs"],
    delimiters: Delimiters {
        line_comments: &["//"],
        block_comment: Some(("/*", "*/")),
        nested_comments: true,
        regex_literals: false,
        strings: &[
            StringRule::raw("r##\"", "\"##"),
            StringRule::raw("r#\"", "\"#"),
            StringRule::raw("r\"", "\""),
            StringRule::multiline("\"", "\""),
            StringRule::char_literal(),
        ],
    },
    symbol_rules: &[
        SymbolRule::new(
            SymbolKind::Struct,
            r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?(?:struct|union)\s+(?P<name>\w+)",
        ),
        SymbolRule::new(
            SymbolKind::Enum,
            r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?enum\s+(?P<name>\w+)",
        ),
        SymbolRule::new(
            SymbolKind::Trait,
            r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?(?:unsafe\s+)?(?:auto\s+)?trait\s+(?P<name>\w+)",
        ),
        SymbolRule::new(
            SymbolKind::TypeAlias,
            r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?type\s+(?P<name>\w+)",
        ),
        SymbolRule::new(
            SymbolKind::Constant,
            r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?(?:const|static)\s+(?:mut\s+)?(?P<name>\w+)\s*:",
        ),
        SymbolRule::new(
            SymbolKind::Function,
            r#"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?(?:default\s+)?(?:(?:const|async|unsafe|extern(?:\s+"[^"]*")?)\s+)*fn\s+(?P<name>\w+)"#,
        ),
    ],
    import_rules: &[
        ImportRule::Line(r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?mod\s+(?P<spec>\w+)\s*;"),
        ImportRule::Statement {
            start: r"^\s*(?:pub(?:\s*\([^)]*\))?\s+)?use\s",
            terminator: ';',
            expand: expand_use_statement,
        },
    ],
    excluded_names: &[],
    import_syntax: ImportSyntax::RustPath,
    resolve_extensions: &["rs"],
};

/// Flatten a `use` statement into one path per imported item.
///
/// `use crate::{a::B, c::{d, e as f}};` yields `crate::a::B`, `crate::c::d`
/// and `crate::c::e`. `mod x;` is reported separately as plain `x`.
pub fn expand_use_statement(statement: &str) -> Vec<String> {
    let Some(start) = statement.find("use") else {
        return Vec::new();
    };
    let tree = statement[start + 3..].trim().trim_end_matches(';');
    let mut out = Vec::new();
    expand_tree("", tree, &mut out);
    out
}

fn expand_tree(prefix: &str, tree: &str, out: &mut Vec<String>) {
    let tree = tree.trim().trim_start_matches("::");
    if tree.is_empty() {
        return;
    }

    if let Some(open) = tree.find('{') {
        let head = tree[..open].trim().trim_end_matches("::");
        let base = join_path(prefix, head);
        let close = matching_brace(tree, open).unwrap_or(tree.len());
        for part in split_top_level(&tree[open + 1..close]) {
            expand_tree(&base, part, out);
        }
        return;
    }

    // `e as f` imports `e`.
    let item: String = tree
        .split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let path = if item == "self" {
        prefix.to_string()
    } else {
        join_path(prefix, &item)
    };
    if !path.is_empty() {
        out.push(path);
    }
}

fn join_path(prefix: &str, tail: &str) -> String {
    match (prefix.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}::{tail}"),
    }
}

fn matching_brace(s: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}
