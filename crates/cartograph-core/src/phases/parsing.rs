//! Phase 3: Read every listed file and run its language strategy, in parallel.

use std::fs;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::{AnalysisConfig, ParseStatus, RawImport, SourceFile};
use crate::error::{AnalysisError, ExtractError};
use crate::languages::{ExtractBudget, Extraction, LanguageStrategy, StrategyRegistry};
use crate::phases::structure::{WalkResult, WalkedFile};

/// A file's extracted record plus its unresolved imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub file: SourceFile,
    pub imports: Vec<RawImport>,
}

/// Run the parsing phase.
///
/// Files with a registered strategy are extracted. Files without one get a
/// `skipped` record only when the allow-list names their extension. A failure
/// in one file degrades that file's record and never aborts the run.
pub fn run_parsing_phase(
    config: &AnalysisConfig,
    walk: &WalkResult,
    registry: &StrategyRegistry,
) -> Result<Vec<FileRecord>, AnalysisError> {
    let explicit = config.normalized_extensions();
    let candidates: Vec<&WalkedFile> = walk
        .files
        .iter()
        .filter(|f| {
            registry.get_by_extension(&f.extension).is_some()
                || explicit
                    .as_ref()
                    .is_some_and(|exts| exts.iter().any(|e| *e == f.extension))
        })
        .collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()?;
    let mut records: Vec<FileRecord> = pool.install(|| {
        candidates
            .par_iter()
            .map(|walked| process_file(config, registry, walked))
            .collect()
    });
    records.sort_by(|a, b| a.file.path.cmp(&b.file.path));

    let degraded = records
        .iter()
        .filter(|r| r.file.status == ParseStatus::Degraded)
        .count();
    info!(
        "extracted {} files ({} degraded) with {} workers",
        records.len(),
        degraded,
        pool.current_num_threads()
    );
    Ok(records)
}

/// Extract a single file. Never fails: problems become a degraded record.
pub fn process_file(
    config: &AnalysisConfig,
    registry: &StrategyRegistry,
    walked: &WalkedFile,
) -> FileRecord {
    let strategy = registry.get_by_extension(&walked.extension);
    let mut file = SourceFile {
        path: walked.path.clone(),
        language: strategy.map(|s| s.language_name().to_string()),
        size: walked.size,
        lines: 0,
        status: ParseStatus::Ok,
        reason: None,
        symbols: Vec::new(),
    };

    let Some(strategy) = strategy else {
        file.status = ParseStatus::Skipped;
        file.reason = Some(format!("no strategy for .{}", walked.extension));
        file.lines = read_source(config, walked)
            .map(|source| source.lines().count())
            .unwrap_or(0);
        return FileRecord {
            file,
            imports: Vec::new(),
        };
    };

    let source = match read_source(config, walked) {
        Ok(source) => source,
        Err(err) => {
            warn!("{}: {}", walked.path, err);
            file.status = ParseStatus::Degraded;
            file.reason = Some(err.to_string());
            return FileRecord {
                file,
                imports: Vec::new(),
            };
        }
    };
    file.lines = source.lines().count();

    match extract_with(strategy, &source, config.parse_timeout_ms) {
        Ok(extraction) => {
            debug!(
                "{}: {} symbols, {} imports",
                walked.path,
                extraction.symbols.len(),
                extraction.imports.len()
            );
            file.symbols = extraction.symbols;
            FileRecord {
                file,
                imports: extraction.imports,
            }
        }
        Err(err) => {
            warn!("{}: {}", walked.path, err);
            file.status = ParseStatus::Degraded;
            file.reason = Some(err.to_string());
            FileRecord {
                file,
                imports: Vec::new(),
            }
        }
    }
}

fn read_source(config: &AnalysisConfig, walked: &WalkedFile) -> Result<String, ExtractError> {
    if walked.size > config.max_file_size {
        return Err(ExtractError::TooLarge {
            size: walked.size,
            limit: config.max_file_size,
        });
    }
    let bytes = fs::read(&walked.abs_path)?;
    String::from_utf8(bytes).map_err(|_| ExtractError::InvalidUtf8)
}

fn extract_with(
    strategy: &dyn LanguageStrategy,
    source: &str,
    timeout_ms: u64,
) -> Result<Extraction, ExtractError> {
    let budget = ExtractBudget::new(timeout_ms);
    strategy.extract(source, &budget)
}
