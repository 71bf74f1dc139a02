//! Report assembly and JSON serialisation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::{
    AnalysisConfig, Cycle, EdgeOutput, ImportEdge, ParseStatus, ProjectProfile, ReportDocument,
    ReportHeader, ReportStats,
};
use crate::error::AnalysisError;
use crate::graph::dependency_graph::DependencyGraph;
use crate::phases::parsing::FileRecord;
use crate::phases::structure::{extension_of, files_by_extension, WalkResult};

pub const REPORT_VERSION: &str = "1.0";

/// Assemble the report document from the results of every phase.
///
/// Nothing time-dependent is written, so an unchanged tree always produces
/// the same document.
pub fn build_document(
    config: &AnalysisConfig,
    walk: &WalkResult,
    profile: ProjectProfile,
    records: &[FileRecord],
    imports: &[ImportEdge],
    graph: &DependencyGraph,
    cycles: &[Cycle],
) -> ReportDocument {
    let project = walk
        .root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let header = ReportHeader {
        project,
        root: walk.root.to_string_lossy().to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        max_depth: config.max_depth,
        extensions: config.normalized_extensions(),
        profile,
    };

    let mut files: Vec<_> = records.iter().map(|r| r.file.clone()).collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let edges = graph
        .edges()
        .into_iter()
        .map(|(from, to, specifier)| EdgeOutput {
            from: from.to_string(),
            to: to.to_string(),
            specifier: specifier.to_string(),
        })
        .collect();

    let mut cycles = cycles.to_vec();
    cycles.sort();

    ReportDocument {
        version: REPORT_VERSION.to_string(),
        header,
        stats: build_stats(walk, records, imports, graph, cycles.len()),
        tree: walk.directories.clone(),
        files,
        edges,
        cycles,
    }
}

fn build_stats(
    walk: &WalkResult,
    records: &[FileRecord],
    imports: &[ImportEdge],
    graph: &DependencyGraph,
    cycle_count: usize,
) -> ReportStats {
    let mut stats = ReportStats {
        files: walk.files.len(),
        directories: walk.directories.iter().filter(|d| d.path != ".").count(),
        files_by_extension: files_by_extension(&walk.files),
        internal_edges: graph.edge_count(),
        cycles: cycle_count,
        ..Default::default()
    };

    let mut lines_by_extension: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        let file = &record.file;
        stats.lines += file.lines;
        match file.status {
            ParseStatus::Ok => stats.parsed += 1,
            ParseStatus::Degraded => stats.degraded += 1,
            ParseStatus::Skipped => stats.skipped += 1,
        }

        let ext = extension_of(Path::new(&file.path));
        let key = if ext.is_empty() { "(none)".to_string() } else { ext };
        *lines_by_extension.entry(key).or_insert(0) += file.lines;

        if let Some(ref language) = file.language {
            *stats.languages.entry(language.clone()).or_insert(0) += 1;
        }
        stats.symbols += file.symbols.len();
        for symbol in &file.symbols {
            *stats
                .symbols_by_kind
                .entry(symbol.kind.as_str().to_string())
                .or_insert(0) += 1;
        }
    }
    stats.lines_by_extension = lines_by_extension;

    for edge in imports {
        if edge.to_file.is_some() {
            stats.resolved_imports += 1;
        } else {
            stats.unresolved_imports += 1;
        }
    }
    stats
}

/// Serialise the document as pretty-printed JSON.
pub fn to_json(doc: &ReportDocument) -> Result<String, AnalysisError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Write the document to `path`, creating parent directories as needed.
pub fn write_document(doc: &ReportDocument, path: &Path) -> Result<(), AnalysisError> {
    let json = to_json(doc)?;
    let write_err = |source| AnalysisError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, json).map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::{SourceFile, Symbol, SymbolKind, TreeEntry};
    use crate::phases::structure::WalkedFile;

    fn walked(path: &str) -> WalkedFile {
        WalkedFile {
            path: path.to_string(),
            abs_path: PathBuf::from("/proj").join(path),
            extension: extension_of(Path::new(path)),
            size: 10,
        }
    }

    fn record(path: &str, status: ParseStatus, symbols: Vec<Symbol>) -> FileRecord {
        FileRecord {
            file: SourceFile {
                path: path.to_string(),
                language: Some("Python".to_string()),
                size: 10,
                lines: 4,
                status,
                reason: None,
                symbols,
            },
            imports: Vec::new(),
        }
    }

    fn function(name: &str) -> Symbol {
        Symbol {
            kind: SymbolKind::Function,
            name: name.to_string(),
            line: 1,
            end_line: Some(2),
            signature: format!("def {name}()"),
        }
    }

    fn fixture() -> (WalkResult, Vec<FileRecord>, Vec<ImportEdge>) {
        let walk = WalkResult {
            root: PathBuf::from("/proj"),
            files: vec![walked("README"), walked("a.py"), walked("pkg/b.py")],
            directories: vec![
                TreeEntry {
                    path: ".".into(),
                    depth: 0,
                    file_count: 2,
                },
                TreeEntry {
                    path: "pkg".into(),
                    depth: 1,
                    file_count: 1,
                },
            ],
        };
        let records = vec![
            record("pkg/b.py", ParseStatus::Degraded, Vec::new()),
            record("a.py", ParseStatus::Ok, vec![function("main"), function("run")]),
        ];
        let imports = vec![
            ImportEdge {
                from_file: "a.py".into(),
                specifier: "pkg.b".into(),
                to_file: Some("pkg/b.py".into()),
            },
            ImportEdge {
                from_file: "a.py".into(),
                specifier: "os".into(),
                to_file: None,
            },
        ];
        (walk, records, imports)
    }

    fn document() -> ReportDocument {
        let (walk, records, imports) = fixture();
        let files: Vec<SourceFile> = records.iter().map(|r| r.file.clone()).collect();
        let graph = DependencyGraph::build(&files, &imports);
        build_document(
            &AnalysisConfig::default(),
            &walk,
            ProjectProfile::default(),
            &records,
            &imports,
            &graph,
            &[],
        )
    }

    #[test]
    fn header_names_project() {
        let doc = document();
        assert_eq!(doc.version, "1.0");
        assert_eq!(doc.header.project, "proj");
        assert_eq!(doc.header.max_depth, 10);
        assert!(doc.header.extensions.is_none());
    }

    #[test]
    fn stats_are_counted() {
        let stats = document().stats;
        assert_eq!(stats.files, 3);
        assert_eq!(stats.directories, 1);
        assert_eq!(stats.lines, 8);
        assert_eq!(stats.parsed, 1);
        assert_eq!(stats.degraded, 1);
        assert_eq!(stats.skipped, 0);
        assert_eq!(stats.symbols, 2);
        assert_eq!(stats.symbols_by_kind.get("function"), Some(&2));
        assert_eq!(stats.resolved_imports, 1);
        assert_eq!(stats.unresolved_imports, 1);
        assert_eq!(stats.internal_edges, 1);
        assert_eq!(stats.files_by_extension.get("(none)"), Some(&1));
        assert_eq!(stats.files_by_extension.get("py"), Some(&2));
        assert_eq!(stats.lines_by_extension.get("py"), Some(&8));
        assert_eq!(stats.languages.get("Python"), Some(&2));
    }

    #[test]
    fn files_and_edges_are_sorted() {
        let doc = document();
        let paths: Vec<&str> = doc.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["a.py", "pkg/b.py"]);
        assert_eq!(
            doc.edges,
            vec![EdgeOutput {
                from: "a.py".into(),
                to: "pkg/b.py".into(),
                specifier: "pkg.b".into(),
            }]
        );
    }

    #[test]
    fn json_is_stable_and_has_no_timestamps() {
        let first = to_json(&document()).unwrap();
        let second = to_json(&document()).unwrap();
        assert_eq!(first, second);
        assert!(!first.contains("timestamp"));
        assert!(first.contains("\"symbols_by_kind\""));
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/report.json");
        write_document(&document(), &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let parsed: ReportDocument = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, document());
    }
}
