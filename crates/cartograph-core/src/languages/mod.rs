//! Language strategy trait and registry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::{RawImport, Symbol};
use crate::error::ExtractError;

pub mod c_cpp;
pub mod dart;
pub mod flutter;
pub mod go_lang;
pub mod java;
pub mod kotlin;
pub mod lexer;
pub mod patterns;
pub mod php;
pub mod python;
pub mod rust_lang;
pub mod swift;
pub mod typescript;

/// Signatures longer than this are cut at a character boundary.
pub const MAX_SIGNATURE_CHARS: usize = 160;

/// Everything a strategy pulls out of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub symbols: Vec<Symbol>,
    pub imports: Vec<RawImport>,
}

/// How a language's import specifiers map onto project paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportSyntax {
    /// Quoted relative or root-relative paths (JS/TS, C/C++, Dart, PHP).
    FilePath,
    /// Dot-separated type names, `.*` for packages (Java, Kotlin).
    Dotted,
    /// A dotted name that names a whole module directory (Swift).
    ModuleDirectory,
    /// Python module names, leading dots for relative imports.
    PythonModule,
    /// `::` paths with `crate`, `self` and `super` anchors.
    RustPath,
    /// Go import paths, prefixed by the module path from `go.mod`.
    GoPackage,
}

/// Wall-clock allowance for a single file's extraction.
#[derive(Debug, Clone, Copy)]
pub struct ExtractBudget {
    deadline: Option<Instant>,
    timeout_ms: u64,
}

impl ExtractBudget {
    /// A budget of `timeout_ms` starting now. Zero means unlimited.
    pub fn new(timeout_ms: u64) -> Self {
        let deadline = (timeout_ms > 0).then(|| Instant::now() + Duration::from_millis(timeout_ms));
        Self {
            deadline,
            timeout_ms,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0)
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Time left before the deadline, `None` when unlimited.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    pub fn check(&self) -> Result<(), ExtractError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ExtractError::Timeout {
                timeout_ms: self.timeout_ms,
            }),
            _ => Ok(()),
        }
    }
}

/// Trait that all language strategies implement.
pub trait LanguageStrategy: Send + Sync {
    /// Human-readable language name (e.g. "Kotlin").
    fn language_name(&self) -> &str;

    /// File extensions this strategy handles, lower-case without the dot.
    fn extensions(&self) -> &[&str];

    /// Extract symbols and raw imports from decoded source text.
    fn extract(&self, source: &str, budget: &ExtractBudget) -> Result<Extraction, ExtractError>;

    fn import_syntax(&self) -> ImportSyntax;

    /// Extensions probed when resolving an import to a file.
    fn resolve_extensions(&self) -> &[&str] {
        self.extensions()
    }
}

/// Registry mapping file extensions to strategies.
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn LanguageStrategy>>,
    extension_map: HashMap<String, usize>,
}

impl StrategyRegistry {
    /// Build the registry with every built-in strategy.
    pub fn new() -> Self {
        Self::with_strategies(builtin_strategies(false))
    }

    /// Like [`StrategyRegistry::new`], with Flutter recognisers on `.dart`.
    pub fn for_flutter() -> Self {
        Self::with_strategies(builtin_strategies(true))
    }

    /// Build a registry from an explicit list. Later strategies do not
    /// override an extension already claimed by an earlier one.
    pub fn with_strategies(strategies: Vec<Box<dyn LanguageStrategy>>) -> Self {
        let mut extension_map = HashMap::new();
        for (i, strategy) in strategies.iter().enumerate() {
            for ext in strategy.extensions() {
                extension_map.entry(ext.to_ascii_lowercase()).or_insert(i);
            }
        }
        Self {
            strategies,
            extension_map,
        }
    }

    /// Get the strategy for a given file extension, if one exists.
    pub fn get_by_extension(&self, ext: &str) -> Option<&dyn LanguageStrategy> {
        self.extension_map
            .get(&ext.to_ascii_lowercase())
            .map(|&i| self.strategies[i].as_ref())
    }

    /// Get the language name for a file extension.
    pub fn language_for_extension(&self, ext: &str) -> Option<&str> {
        self.get_by_extension(ext).map(|s| s.language_name())
    }

    /// All registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.extension_map.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Every built-in strategy, in registration order.
fn builtin_strategies(flutter: bool) -> Vec<Box<dyn LanguageStrategy>> {
    let dart_strategy: Box<dyn LanguageStrategy> = if flutter {
        Box::new(flutter::strategy())
    } else {
        Box::new(patterns::PatternStrategy::new(&dart::DART))
    };
    vec![
        Box::new(python::PythonStrategy::new()),
        Box::new(patterns::PatternStrategy::new(&typescript::TYPESCRIPT)),
        Box::new(patterns::PatternStrategy::new(&typescript::JAVASCRIPT)),
        Box::new(patterns::PatternStrategy::new(&go_lang::GO)),
        Box::new(patterns::PatternStrategy::new(&rust_lang::RUST)),
        Box::new(patterns::PatternStrategy::new(&java::JAVA)),
        Box::new(patterns::PatternStrategy::new(&kotlin::KOTLIN)),
        Box::new(patterns::PatternStrategy::new(&c_cpp::C)),
        Box::new(patterns::PatternStrategy::new(&c_cpp::CPP)),
        Box::new(patterns::PatternStrategy::new(&swift::SWIFT)),
        dart_strategy,
        Box::new(patterns::PatternStrategy::new(&php::PHP)),
    ]
}

/// Collapse whitespace runs and cap the length of a declaration signature.
pub fn clean_signature(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_SIGNATURE_CHARS {
        collapsed
    } else {
        collapsed.chars().take(MAX_SIGNATURE_CHARS).collect()
    }
}
