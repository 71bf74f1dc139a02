//! Shared test helpers for integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use cartograph_core::config::{AnalysisConfig, ImportEdge, ReportDocument, SourceFile};
use cartograph_core::languages::{ExtractBudget, Extraction, LanguageStrategy, StrategyRegistry};
use cartograph_core::phases::parsing::FileRecord;
use cartograph_core::phases::structure::WalkResult;

// ---------------------------------------------------------------------------
// Fixture path resolution
// ---------------------------------------------------------------------------

/// Resolve `tests/fixtures/{name}` relative to the workspace root.
pub fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .join("../../tests/fixtures")
        .join(name)
        .canonicalize()
        .unwrap_or_else(|_| {
            Path::new(manifest_dir)
                .join("../../tests/fixtures")
                .join(name)
        })
}

pub fn config_for(root: &Path) -> AnalysisConfig {
    AnalysisConfig {
        root: root.to_string_lossy().to_string(),
        jobs: 2,
        ..Default::default()
    }
}

/// Build a throwaway project from `(relative path, contents)` pairs.
pub fn write_tree(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (rel, contents) in files {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&path, contents).expect("Failed to write file");
    }
    dir
}

// ---------------------------------------------------------------------------
// Phase runners
// ---------------------------------------------------------------------------

pub struct PhaseResult {
    pub config: AnalysisConfig,
    pub walk: WalkResult,
    pub records: Vec<FileRecord>,
    pub imports: Vec<ImportEdge>,
}

/// Run the structure phase with `config`.
pub fn run_structure_with(config: &AnalysisConfig) -> WalkResult {
    cartograph_core::phases::structure::run_structure_phase(config)
        .expect("Structure phase failed")
}

/// Run the structure phase on a fixture directory.
pub fn run_structure(fixture_name: &str) -> WalkResult {
    run_structure_with(&config_for(&fixture_path(fixture_name)))
}

/// Run structure + parsing + imports with `config`.
pub fn run_phases_with(config: AnalysisConfig) -> PhaseResult {
    let registry = StrategyRegistry::new();
    let walk = run_structure_with(&config);
    let records = cartograph_core::phases::parsing::run_parsing_phase(&config, &walk, &registry)
        .expect("Parsing phase failed");
    let imports = cartograph_core::phases::imports::run_imports_phase(
        &config,
        &walk.root,
        &records,
        &registry,
    );
    PhaseResult {
        config,
        walk,
        records,
        imports,
    }
}

/// Run structure + parsing + imports on a fixture directory.
pub fn run_phases(fixture_name: &str) -> PhaseResult {
    run_phases_with(config_for(&fixture_path(fixture_name)))
}

/// Run the whole pipeline on a fixture directory.
pub fn run_document(fixture_name: &str) -> ReportDocument {
    let config = config_for(&fixture_path(fixture_name));
    cartograph_core::pipeline::run_pipeline(&config, None)
        .expect("Pipeline failed")
        .document
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// Walked file paths.
pub fn file_paths(walk: &WalkResult) -> Vec<String> {
    walk.files.iter().map(|f| f.path.clone()).collect()
}

/// Directory paths from the walk, without the root.
pub fn folder_paths(walk: &WalkResult) -> Vec<String> {
    walk.directories
        .iter()
        .filter(|d| d.path != ".")
        .map(|d| d.path.clone())
        .collect()
}

/// The extracted record for `path`.
pub fn source_file<'a>(records: &'a [FileRecord], path: &str) -> &'a SourceFile {
    &records
        .iter()
        .find(|r| r.file.path == path)
        .unwrap_or_else(|| panic!("No record for {path}"))
        .file
}

/// Symbol names of a file, in the order they were extracted.
pub fn symbol_names(file: &SourceFile) -> Vec<String> {
    file.symbols.iter().map(|s| s.name.clone()).collect()
}

/// Resolved import pairs (from_file, to_file).
pub fn import_targets(imports: &[ImportEdge]) -> Vec<(String, String)> {
    imports
        .iter()
        .filter_map(|e| Some((e.from_file.clone(), e.to_file.clone()?)))
        .collect()
}

/// Specifiers that resolved to nothing.
pub fn unresolved_specifiers(imports: &[ImportEdge]) -> Vec<String> {
    imports
        .iter()
        .filter(|e| e.to_file.is_none())
        .map(|e| e.specifier.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Single-file extraction (for language strategy tests)
// ---------------------------------------------------------------------------

/// Extract an in-memory source as if it were a file with `ext`.
pub fn extract_source(ext: &str, source: &str) -> Extraction {
    let registry = StrategyRegistry::new();
    let strategy = registry
        .get_by_extension(ext)
        .expect("No strategy for extension");
    strategy
        .extract(source, &ExtractBudget::unlimited())
        .expect("Extraction failed")
}

/// Extract a fixture file.
pub fn extract_fixture(fixture_name: &str, file_name: &str) -> Extraction {
    let path = fixture_path(fixture_name).join(file_name);
    let source = fs::read_to_string(&path).expect("Failed to read fixture file");
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    extract_source(&ext, &source)
}
