//! Core data types and configuration for Cartograph analysis.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Kind of symbol extracted from source code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Interface,
    Struct,
    Enum,
    Function,
    Trait,
    TypeAlias,
    Constant,
    Decorator,
    /// A Flutter widget class.
    Widget,
    /// The `State<T>` companion of a stateful widget.
    WidgetState,
    /// A Flutter state holder: `ChangeNotifier`, `Cubit`, `Bloc` and friends.
    Notifier,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Function => "function",
            Self::Trait => "trait",
            Self::TypeAlias => "type_alias",
            Self::Constant => "constant",
            Self::Decorator => "decorator",
            Self::Widget => "widget",
            Self::WidgetState => "widget_state",
            Self::Notifier => "notifier",
        }
    }

    /// Parse from the serialised name.
    pub fn from_str_value(s: &str) -> Option<Self> {
        match s {
            "class" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "struct" => Some(Self::Struct),
            "enum" => Some(Self::Enum),
            "function" => Some(Self::Function),
            "trait" => Some(Self::Trait),
            "type_alias" => Some(Self::TypeAlias),
            "constant" => Some(Self::Constant),
            "decorator" => Some(Self::Decorator),
            "widget" => Some(Self::Widget),
            "widget_state" => Some(Self::WidgetState),
            "notifier" => Some(Self::Notifier),
            _ => None,
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of extracting a single file.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParseStatus {
    #[default]
    Ok,
    Degraded,
    Skipped,
}

impl ParseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Degraded => "degraded",
            Self::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named declaration discovered in a source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub name: String,
    pub line: usize,
    /// Only known when the strategy has exact spans (grammar-aware parsing).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    pub signature: String,
}

/// A discovered file and everything extracted from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    pub language: Option<String>,
    pub size: u64,
    pub lines: usize,
    pub status: ParseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

/// Raw import statement extracted from source, before resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawImport {
    pub specifier: String,
    pub line: usize,
}

/// An import statement after resolution. `to_file` is `None` for external
/// or unresolvable specifiers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportEdge {
    pub from_file: String,
    pub specifier: String,
    pub to_file: Option<String>,
}

/// A closed loop in the dependency graph, rotated so the smallest path is first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cycle {
    pub files: Vec<String>,
}

impl Cycle {
    /// Rotate `files` so the lexicographically smallest path leads.
    pub fn normalized(mut files: Vec<String>) -> Self {
        if let Some((min_pos, _)) = files.iter().enumerate().min_by(|a, b| a.1.cmp(b.1)) {
            files.rotate_left(min_pos);
        }
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Directories skipped wherever they appear, regardless of the allow-list.
pub const IGNORED_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "vendor",
    "venv",
    ".venv",
    "env",
    ".env",
    "Pods",
    "__pycache__",
    ".tox",
    ".eggs",
    "dist",
    "build",
    "target",
    "out",
    "bin",
    "obj",
    ".next",
    ".nuxt",
    "DerivedData",
    "coverage",
    ".nyc_output",
    ".pytest_cache",
    ".mypy_cache",
    ".idea",
    ".vscode",
    ".vs",
];

/// File name suffixes that are never source files worth listing.
pub const IGNORED_FILE_SUFFIXES: &[&str] = &[
    ".min.js",
    ".min.css",
    ".map",
    ".lock",
    ".pyc",
    ".pyo",
    ".class",
    ".o",
    ".so",
];

/// Exact file names that are never listed.
pub const IGNORED_FILE_NAMES: &[&str] = &[".DS_Store", "Thumbs.db"];

/// Configuration for an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub root: String,
    pub output_path: Option<String>,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Extension allow-list. `None` means every file is listed.
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default = "default_source_roots")]
    pub source_roots: Vec<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_parse_timeout_ms")]
    pub parse_timeout_ms: u64,
    /// Worker threads for extraction; 0 uses available parallelism.
    #[serde(default)]
    pub jobs: usize,
}

fn default_max_depth() -> usize {
    10
}
fn default_source_roots() -> Vec<String> {
    [
        "src",
        "lib",
        "app",
        "pkg",
        "internal",
        "Sources",
        "src/main/java",
        "src/main/kotlin",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
fn default_max_file_size() -> u64 {
    1_000_000
}
fn default_parse_timeout_ms() -> u64 {
    5_000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            output_path: None,
            max_depth: default_max_depth(),
            extensions: None,
            exclude_patterns: Vec::new(),
            source_roots: default_source_roots(),
            max_file_size: default_max_file_size(),
            parse_timeout_ms: default_parse_timeout_ms(),
            jobs: 0,
        }
    }
}

impl AnalysisConfig {
    /// The allow-list normalised to lower-case extensions without a leading dot.
    pub fn normalized_extensions(&self) -> Option<Vec<String>> {
        self.extensions.as_ref().map(|exts| {
            let mut out: Vec<String> = exts
                .iter()
                .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
            out.sort();
            out.dedup();
            out
        })
    }

    /// Whether the allow-list explicitly names `ext`.
    pub fn allows_extension(&self, ext: &str) -> bool {
        match self.normalized_extensions() {
            Some(exts) => exts.iter().any(|e| e == ext),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Project profile
// ---------------------------------------------------------------------------

/// What the project's manifests and layout say about it as a whole.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectProfile {
    /// Kind named by the first recognised manifest, such as `Node.js`.
    pub project_type: Option<String>,
    /// Recognised manifests present at the root, in recognition order.
    #[serde(default)]
    pub config_files: Vec<String>,
    /// Languages with a strategy, most files first.
    #[serde(default)]
    pub languages: Vec<String>,
    /// `name` from `package.json`.
    pub package_name: Option<String>,
    pub package_manager: Option<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<ExternalDependency>,
    #[serde(default)]
    pub entry_points: Vec<EntryPoint>,
    /// `pubspec.yaml` depends on the Flutter SDK.
    #[serde(default)]
    pub flutter: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DependencyScope {
    Production,
    Development,
}

/// A third-party package declared in a manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExternalDependency {
    pub name: String,
    /// Version constraint as written; a whole requirement line for pip.
    pub version: String,
    pub scope: DependencyScope,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryPoint {
    pub path: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Report document schema
// ---------------------------------------------------------------------------

/// The single structured artifact produced by a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportDocument {
    #[serde(default = "default_version")]
    pub version: String,
    pub header: ReportHeader,
    pub stats: ReportStats,
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub files: Vec<SourceFile>,
    #[serde(default)]
    pub edges: Vec<EdgeOutput>,
    #[serde(default)]
    pub cycles: Vec<Cycle>,
}

fn default_version() -> String {
    "1.0".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportHeader {
    pub project: String,
    pub root: String,
    pub tool_version: String,
    pub max_depth: usize,
    pub extensions: Option<Vec<String>>,
    #[serde(flatten)]
    pub profile: ProjectProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportStats {
    pub files: usize,
    pub directories: usize,
    pub lines: usize,
    pub parsed: usize,
    pub degraded: usize,
    pub skipped: usize,
    pub symbols: usize,
    pub resolved_imports: usize,
    pub unresolved_imports: usize,
    pub internal_edges: usize,
    pub cycles: usize,
    pub files_by_extension: BTreeMap<String, usize>,
    pub lines_by_extension: BTreeMap<String, usize>,
    pub languages: BTreeMap<String, usize>,
    pub symbols_by_kind: BTreeMap<String, usize>,
}

/// A directory in the walked tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub depth: usize,
    pub file_count: usize,
}

/// A resolved internal edge in the output document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EdgeOutput {
    pub from: String,
    pub to: String,
    pub specifier: String,
}
