//! Table-driven strategy shared by every language without a grammar.
//!
//! A [`PatternLanguage`] describes a language as data: its comment and string
//! delimiters, an ordered list of declaration recognisers, and the shape of
//! its import statements. [`PatternStrategy`] compiles the table once and
//! runs it over the lexer's comment- and string-free view of each line.
//!
//! Recognisers are tried in priority order. A match claims the byte span it
//! covers on that line, and a later recogniser whose match overlaps a claimed
//! span is ignored, so `data class Foo` is a struct and never also a class.

use std::ops::Range;

use regex::Regex;

use super::lexer::{Delimiters, LexedLine, Lexer};
use super::{clean_signature, ExtractBudget, Extraction, ImportSyntax, LanguageStrategy};
use crate::config::{RawImport, Symbol, SymbolKind};
use crate::error::ExtractError;

/// Lines scanned between deadline checks.
const BUDGET_CHECK_INTERVAL: usize = 256;

/// One declaration recogniser. The pattern must capture the declared name in
/// a group called `name`; an optional `ret` group is also checked against the
/// language's excluded words.
#[derive(Debug, Clone, Copy)]
pub struct SymbolRule {
    pub kind: SymbolKind,
    pub pattern: &'static str,
}

impl SymbolRule {
    pub const fn new(kind: SymbolKind, pattern: &'static str) -> Self {
        Self { kind, pattern }
    }
}

/// The shape of an import statement. Patterns capture the specifier in a
/// group called `spec`.
#[derive(Debug, Clone, Copy)]
pub enum ImportRule {
    /// Every match on a single line.
    Line(&'static str),
    /// A parenthesised list: `open` starts it, `item` matches each entry on
    /// the following lines, `close` ends it.
    Block {
        open: &'static str,
        item: &'static str,
        close: &'static str,
    },
    /// A statement opened by `start` and ended by `terminator`, possibly
    /// several lines later. The whole statement is handed to `expand`.
    Statement {
        start: &'static str,
        terminator: char,
        expand: fn(&str) -> Vec<String>,
    },
}

/// A language described as data.
#[derive(Debug)]
pub struct PatternLanguage {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub delimiters: Delimiters,
    pub symbol_rules: &'static [SymbolRule],
    pub import_rules: &'static [ImportRule],
    /// Keywords that recognisers may capture by accident (`if`, `return`).
    pub excluded_names: &'static [&'static str],
    pub import_syntax: ImportSyntax,
    pub resolve_extensions: &'static [&'static str],
}

struct CompiledSymbolRule {
    kind: SymbolKind,
    regex: Regex,
}

enum CompiledImportRule {
    Line(Regex),
    Block {
        open: Regex,
        item: Regex,
        close: Regex,
    },
    Statement {
        start: Regex,
        terminator: char,
        expand: fn(&str) -> Vec<String>,
    },
}

/// An import statement still collecting lines.
enum PendingImport {
    Block { rule: usize },
    Statement { rule: usize, line: usize, buffer: String },
}

pub struct PatternStrategy {
    language: &'static PatternLanguage,
    symbol_rules: Vec<CompiledSymbolRule>,
    import_rules: Vec<CompiledImportRule>,
}

impl PatternStrategy {
    /// Compile a language table. The tables are static, so an invalid
    /// pattern is a programming error.
    pub fn new(language: &'static PatternLanguage) -> Self {
        let symbol_rules = compile_symbol_rules(language.symbol_rules);
        let import_rules = language
            .import_rules
            .iter()
            .map(|rule| match *rule {
                ImportRule::Line(pattern) => CompiledImportRule::Line(Regex::new(pattern).unwrap()),
                ImportRule::Block { open, item, close } => CompiledImportRule::Block {
                    open: Regex::new(open).unwrap(),
                    item: Regex::new(item).unwrap(),
                    close: Regex::new(close).unwrap(),
                },
                ImportRule::Statement {
                    start,
                    terminator,
                    expand,
                } => CompiledImportRule::Statement {
                    start: Regex::new(start).unwrap(),
                    terminator,
                    expand,
                },
            })
            .collect();
        Self {
            language,
            symbol_rules,
            import_rules,
        }
    }

    /// The strategy for `language` with `leading` recognisers tried before
    /// the language's own, so they claim their spans first.
    pub fn with_leading_rules(
        language: &'static PatternLanguage,
        leading: &'static [SymbolRule],
    ) -> Self {
        let mut strategy = Self::new(language);
        let mut rules = compile_symbol_rules(leading);
        rules.append(&mut strategy.symbol_rules);
        strategy.symbol_rules = rules;
        strategy
    }

    pub fn language(&self) -> &'static PatternLanguage {
        self.language
    }

    fn is_excluded(&self, word: &str) -> bool {
        self.language.excluded_names.contains(&word)
    }

    fn collect_symbols(&self, line: &LexedLine<'_>, symbols: &mut Vec<Symbol>) {
        let mut claimed: Vec<Range<usize>> = Vec::new();
        let mut found: Vec<(usize, Symbol)> = Vec::new();

        for rule in &self.symbol_rules {
            for caps in rule.regex.captures_iter(&line.code) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
                    continue;
                };
                if claimed.iter().any(|span| overlaps(span, &whole.range())) {
                    continue;
                }
                if self.is_excluded(name.as_str())
                    || caps.name("ret").is_some_and(|r| self.is_excluded(r.as_str()))
                {
                    continue;
                }
                claimed.push(whole.range());
                found.push((
                    name.start(),
                    Symbol {
                        kind: rule.kind,
                        name: name.as_str().to_string(),
                        line: line.number,
                        end_line: None,
                        signature: clean_signature(&line.text[whole.start()..]),
                    },
                ));
            }
        }

        found.sort_by_key(|(column, _)| *column);
        symbols.extend(found.into_iter().map(|(_, symbol)| symbol));
    }

    fn collect_imports(
        &self,
        line: &LexedLine<'_>,
        pending: &mut Option<PendingImport>,
        imports: &mut Vec<RawImport>,
    ) {
        match pending.take() {
            Some(PendingImport::Block { rule }) => {
                if let CompiledImportRule::Block { item, close, .. } = &self.import_rules[rule] {
                    let end = close.find(&line.code).map_or(line.code.len(), |m| m.start());
                    push_specs(item, line, 0, end, imports);
                    if end == line.code.len() {
                        *pending = Some(PendingImport::Block { rule });
                    }
                }
                return;
            }
            Some(PendingImport::Statement {
                rule,
                line: start_line,
                mut buffer,
            }) => {
                if let CompiledImportRule::Statement {
                    terminator, expand, ..
                } = &self.import_rules[rule]
                {
                    buffer.push(' ');
                    match line.code.find(*terminator) {
                        Some(end) => {
                            buffer.push_str(&line.code[..end]);
                            push_expanded(expand(&buffer), start_line, imports);
                        }
                        None => {
                            buffer.push_str(&line.code);
                            *pending = Some(PendingImport::Statement {
                                rule,
                                line: start_line,
                                buffer,
                            });
                        }
                    }
                }
                return;
            }
            None => {}
        }

        for (idx, rule) in self.import_rules.iter().enumerate() {
            match rule {
                CompiledImportRule::Line(regex) => {
                    push_specs(regex, line, 0, line.code.len(), imports);
                }
                CompiledImportRule::Block { open, item, close } => {
                    let Some(opened) = open.find(&line.code) else {
                        continue;
                    };
                    let from = opened.end();
                    match close.find(&line.code[from..]) {
                        Some(closed) => push_specs(item, line, from, from + closed.start(), imports),
                        None => {
                            push_specs(item, line, from, line.code.len(), imports);
                            *pending = Some(PendingImport::Block { rule: idx });
                        }
                    }
                    return;
                }
                CompiledImportRule::Statement {
                    start,
                    terminator,
                    expand,
                } => {
                    let Some(started) = start.find(&line.code) else {
                        continue;
                    };
                    let body = &line.code[started.start()..];
                    match body.find(*terminator) {
                        Some(end) => push_expanded(expand(&body[..end]), line.number, imports),
                        None => {
                            *pending = Some(PendingImport::Statement {
                                rule: idx,
                                line: line.number,
                                buffer: body.to_string(),
                            });
                        }
                    }
                    return;
                }
            }
        }
    }
}

impl LanguageStrategy for PatternStrategy {
    fn language_name(&self) -> &str {
        self.language.name
    }

    fn extensions(&self) -> &[&str] {
        self.language.extensions
    }

    fn extract(&self, source: &str, budget: &ExtractBudget) -> Result<Extraction, ExtractError> {
        let mut lexer = Lexer::new(&self.language.delimiters);
        let mut extraction = Extraction::default();
        let mut pending = None;

        for (idx, raw) in source.lines().enumerate() {
            if idx % BUDGET_CHECK_INTERVAL == 0 {
                budget.check()?;
            }
            let line = lexer.scan_line(idx + 1, raw);
            if line.is_blank() {
                continue;
            }
            self.collect_imports(&line, &mut pending, &mut extraction.imports);
            self.collect_symbols(&line, &mut extraction.symbols);
        }

        Ok(extraction)
    }

    fn import_syntax(&self) -> ImportSyntax {
        self.language.import_syntax
    }

    fn resolve_extensions(&self) -> &[&str] {
        self.language.resolve_extensions
    }
}

fn compile_symbol_rules(rules: &[SymbolRule]) -> Vec<CompiledSymbolRule> {
    rules
        .iter()
        .map(|rule| CompiledSymbolRule {
            kind: rule.kind,
            regex: Regex::new(rule.pattern).unwrap(),
        })
        .collect()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Push every `spec` capture of `regex` within `code[from..to]`. The
/// specifier text is read from the string-preserving view at the same offsets.
fn push_specs(
    regex: &Regex,
    line: &LexedLine<'_>,
    from: usize,
    to: usize,
    imports: &mut Vec<RawImport>,
) {
    for caps in regex.captures_iter(&line.code[from..to]) {
        let Some(spec) = caps.name("spec") else {
            continue;
        };
        let range = from + spec.start()..from + spec.end();
        let specifier = strip_quotes(&line.text[range]);
        if !specifier.is_empty() {
            imports.push(RawImport {
                specifier: specifier.to_string(),
                line: line.number,
            });
        }
    }
}

fn push_expanded(specs: Vec<String>, line: usize, imports: &mut Vec<RawImport>) {
    imports.extend(
        specs
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(|specifier| RawImport { specifier, line }),
    );
}

/// Strip one layer of matching quotes or angle brackets.
pub fn strip_quotes(spec: &str) -> &str {
    let spec = spec.trim();
    for (open, close) in [('"', '"'), ('\'', '\''), ('`', '`'), ('<', '>')] {
        if spec.len() >= 2 && spec.starts_with(open) && spec.ends_with(close) {
            return &spec[1..spec.len() - 1];
        }
    }
    spec
}
