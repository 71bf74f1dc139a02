//! Python strategy, backed by the tree-sitter grammar.

use tree_sitter::{Node, Parser};

use super::{clean_signature, ExtractBudget, Extraction, ImportSyntax, LanguageStrategy};
use crate::config::{RawImport, Symbol, SymbolKind};
use crate::error::ExtractError;

/// Nodes visited between deadline checks.
const BUDGET_CHECK_INTERVAL: usize = 2048;

pub struct PythonStrategy;

impl Default for PythonStrategy {
    fn default() -> Self {
        Self
    }
}

struct Walk<'a> {
    source: &'a [u8],
    budget: &'a ExtractBudget,
    visited: usize,
    out: Extraction,
}

impl PythonStrategy {
    pub fn new() -> Self {
        Self
    }

    fn text<'s>(node: &Node, source: &'s [u8]) -> &'s str {
        node.utf8_text(source).unwrap_or("")
    }

    fn symbol(kind: SymbolKind, name: &str, node: &Node, signature: &str) -> Symbol {
        Symbol {
            kind,
            name: name.to_string(),
            line: node.start_position().row + 1,
            end_line: Some(node.end_position().row + 1),
            signature: clean_signature(signature),
        }
    }

    /// Header of a class or function: everything before the body.
    fn header<'s>(node: &Node, source: &'s [u8]) -> &'s str {
        let end = node
            .child_by_field_name("body")
            .map_or(node.end_byte(), |body| body.start_byte());
        std::str::from_utf8(&source[node.start_byte()..end]).unwrap_or("")
    }

    fn walk_node(&self, node: &Node, walk: &mut Walk<'_>) -> Result<(), ExtractError> {
        for i in 0..node.child_count() {
            let child = match node.child(i) {
                Some(c) => c,
                None => continue,
            };

            walk.visited += 1;
            if walk.visited % BUDGET_CHECK_INTERVAL == 0 {
                walk.budget.check()?;
            }

            match child.kind() {
                "class_definition" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        let name = Self::text(&name, walk.source);
                        let header = Self::header(&child, walk.source);
                        walk.out
                            .symbols
                            .push(Self::symbol(SymbolKind::Class, name, &child, header));
                    }
                    self.walk_node(&child, walk)?;
                }
                "function_definition" => {
                    if let Some(name) = child.child_by_field_name("name") {
                        let name = Self::text(&name, walk.source);
                        let header = Self::header(&child, walk.source);
                        walk.out
                            .symbols
                            .push(Self::symbol(SymbolKind::Function, name, &child, header));
                    }
                    self.walk_node(&child, walk)?;
                }
                "decorator" => {
                    if let Some(name) = Self::decorator_name(&child, walk.source) {
                        let text = Self::text(&child, walk.source);
                        walk.out
                            .symbols
                            .push(Self::symbol(SymbolKind::Decorator, name, &child, text));
                    }
                }
                "type_alias_statement" => {
                    if let Some(left) = child.child_by_field_name("left") {
                        let name = Self::text(&left, walk.source);
                        let text = Self::text(&child, walk.source);
                        walk.out
                            .symbols
                            .push(Self::symbol(SymbolKind::TypeAlias, name, &child, text));
                    }
                }
                "expression_statement" if node.kind() == "module" => {
                    self.module_assignment(&child, walk);
                }
                "import_statement" => Self::import_names(&child, walk),
                "import_from_statement" => Self::import_from(&child, walk),
                _ => self.walk_node(&child, walk)?,
            }
        }
        Ok(())
    }

    fn decorator_name<'s>(node: &Node, source: &'s [u8]) -> Option<&'s str> {
        let expr = node.named_child(0)?;
        let target = if expr.kind() == "call" {
            expr.child_by_field_name("function")?
        } else {
            expr
        };
        Some(Self::text(&target, source))
    }

    /// Module-level `NAME = ...` in capitals is a constant;
    /// `Name: TypeAlias = ...` is a type alias.
    fn module_assignment(&self, stmt: &Node, walk: &mut Walk<'_>) {
        let Some(assignment) = stmt.named_child(0) else {
            return;
        };
        if assignment.kind() != "assignment" {
            return;
        }
        let Some(left) = assignment.child_by_field_name("left") else {
            return;
        };
        if left.kind() != "identifier" {
            return;
        }
        let name = Self::text(&left, walk.source);
        let text = Self::text(stmt, walk.source);
        let annotated_alias = assignment
            .child_by_field_name("type")
            .map(|t| Self::text(&t, walk.source))
            .is_some_and(|t| t == "TypeAlias" || t.ends_with(".TypeAlias"));

        if annotated_alias {
            walk.out
                .symbols
                .push(Self::symbol(SymbolKind::TypeAlias, name, stmt, text));
        } else if is_constant_name(name) {
            walk.out
                .symbols
                .push(Self::symbol(SymbolKind::Constant, name, stmt, text));
        }
    }

    /// `import a.b, c as d`
    fn import_names(stmt: &Node, walk: &mut Walk<'_>) {
        let line = stmt.start_position().row + 1;
        for i in 0..stmt.named_child_count() {
            let Some(child) = stmt.named_child(i) else {
                continue;
            };
            let module = match child.kind() {
                "dotted_name" => Some(child),
                "aliased_import" => child.child_by_field_name("name"),
                _ => None,
            };
            if let Some(module) = module {
                walk.out.imports.push(RawImport {
                    specifier: Self::text(&module, walk.source).to_string(),
                    line,
                });
            }
        }
    }

    /// `from a.b import c` records `a.b`. `from . import c` has no module
    /// beyond the dots, so each imported name becomes `.c`.
    fn import_from(stmt: &Node, walk: &mut Walk<'_>) {
        let line = stmt.start_position().row + 1;
        let Some(module) = stmt.child_by_field_name("module_name") else {
            return;
        };
        let module_text = Self::text(&module, walk.source).trim();

        if !module_text.is_empty() && module_text.chars().all(|c| c == '.') {
            for i in 0..stmt.named_child_count() {
                let Some(child) = stmt.named_child(i) else {
                    continue;
                };
                if child.id() == module.id() {
                    continue;
                }
                let imported = match child.kind() {
                    "dotted_name" => Some(child),
                    "aliased_import" => child.child_by_field_name("name"),
                    _ => None,
                };
                if let Some(imported) = imported {
                    walk.out.imports.push(RawImport {
                        specifier: format!("{module_text}{}", Self::text(&imported, walk.source)),
                        line,
                    });
                }
            }
            return;
        }

        walk.out.imports.push(RawImport {
            specifier: module_text.to_string(),
            line,
        });
    }

    fn first_error_line(node: &Node) -> usize {
        if node.is_error() || node.is_missing() {
            return node.start_position().row + 1;
        }
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                if child.has_error() {
                    return Self::first_error_line(&child);
                }
            }
        }
        node.start_position().row + 1
    }
}

impl LanguageStrategy for PythonStrategy {
    fn language_name(&self) -> &str {
        "Python"
    }

    fn extensions(&self) -> &[&str] {
        &["py", "pyi"]
    }

    fn extract(&self, source: &str, budget: &ExtractBudget) -> Result<Extraction, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| ExtractError::Grammar(e.to_string()))?;
        if let Some(remaining) = budget.remaining() {
            parser.set_timeout_micros(remaining.as_micros().max(1) as u64);
        }

        let tree = parser.parse(source, None).ok_or(ExtractError::Timeout {
            timeout_ms: budget.timeout_ms(),
        })?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(ExtractError::Syntax {
                line: Self::first_error_line(&root),
            });
        }

        let mut walk = Walk {
            source: source.as_bytes(),
            budget,
            visited: 0,
            out: Extraction::default(),
        };
        self.walk_node(&root, &mut walk)?;
        Ok(walk.out)
    }

    fn import_syntax(&self) -> ImportSyntax {
        ImportSyntax::PythonModule
    }

    fn resolve_extensions(&self) -> &[&str] {
        &["py"]
    }
}

/// `MAX_RETRIES`, `_DEFAULT_TIMEOUT`: capitals, digits and underscores with
/// at least one letter.
fn is_constant_name(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_uppercase())
        && name
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Extraction {
        PythonStrategy::new()
            .extract(source, &ExtractBudget::unlimited())
            .unwrap()
    }

    fn names(ex: &Extraction, kind: SymbolKind) -> Vec<&str> {
        ex.symbols
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.name.as_str())
            .collect()
    }

    #[test]
    fn classes_functions_and_methods() {
        let ex = extract(
            "class Repo:\n    def get(self, key):\n        return key\n\ndef main() -> int:\n    return 0\n",
        );
        assert_eq!(names(&ex, SymbolKind::Class), vec!["Repo"]);
        assert_eq!(names(&ex, SymbolKind::Function), vec!["get", "main"]);

        let main = ex.symbols.iter().find(|s| s.name == "main").unwrap();
        assert_eq!(main.line, 5);
        assert!(main.end_line.is_some_and(|end| end >= 6));
        assert_eq!(main.signature, "def main() -> int:");
    }

    #[test]
    fn decorators_precede_their_target() {
        let ex = extract("@app.route(\"/\")\n@cached\ndef index():\n    pass\n");
        let kinds: Vec<(SymbolKind, &str)> =
            ex.symbols.iter().map(|s| (s.kind, s.name.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (SymbolKind::Decorator, "app.route"),
                (SymbolKind::Decorator, "cached"),
                (SymbolKind::Function, "index"),
            ]
        );
    }

    #[test]
    fn module_constants_and_aliases() {
        let ex = extract(
            "MAX_SIZE = 10\nlower = 1\nUserId: TypeAlias = int\n\ndef f():\n    LOCAL = 2\n",
        );
        assert_eq!(names(&ex, SymbolKind::Constant), vec!["MAX_SIZE"]);
        assert_eq!(names(&ex, SymbolKind::TypeAlias), vec!["UserId"]);
    }

    #[test]
    fn imports_of_every_form() {
        let ex = extract(
            "import os, pkg.mod as m\nfrom .models import User\nfrom .. import utils, helpers as h\nfrom pkg.sub import *\n",
        );
        let specs: Vec<(&str, usize)> = ex
            .imports
            .iter()
            .map(|i| (i.specifier.as_str(), i.line))
            .collect();
        assert_eq!(
            specs,
            vec![
                ("os", 1),
                ("pkg.mod", 1),
                (".models", 2),
                ("..utils", 3),
                ("..helpers", 3),
                ("pkg.sub", 4),
            ]
        );
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = PythonStrategy::new()
            .extract("def ok():\n    pass\n\ndef broken(:\n", &ExtractBudget::unlimited())
            .unwrap_err();
        assert!(matches!(err, ExtractError::Syntax { .. }));
    }

    #[test]
    fn constant_names() {
        assert!(is_constant_name("MAX_2"));
        assert!(is_constant_name("_PRIVATE"));
        assert!(!is_constant_name("Mixed"));
        assert!(!is_constant_name("__"));
    }
}
