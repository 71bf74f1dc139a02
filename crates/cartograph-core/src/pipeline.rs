//! Sequential phase orchestrator with timing.

use std::time::Instant;

use log::info;

use crate::config::{AnalysisConfig, ReportDocument, SourceFile};
use crate::error::AnalysisError;
use crate::graph::cycles::find_cycles;
use crate::graph::dependency_graph::DependencyGraph;
use crate::languages::StrategyRegistry;
use crate::output::build_document;
use crate::phases;

/// Phase labels for progress reporting.
const PHASE_LABELS: &[(&str, &str)] = &[
    ("structure", "Mapping file tree"),
    ("project", "Profiling project"),
    ("parsing", "Extracting symbols"),
    ("imports", "Resolving imports"),
    ("graph", "Building dependency graph"),
    ("cycles", "Detecting cycles"),
    ("report", "Assembling report"),
];

/// Progress callback type: (phase_name, label).
pub type ProgressCallback = Box<dyn FnMut(&str, &str)>;

/// The document plus how long each phase took, in seconds.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub document: ReportDocument,
    /// In execution order.
    pub timings: Vec<(String, f64)>,
    pub total_ms: f64,
}

struct PhaseClock {
    progress: Option<ProgressCallback>,
    timings: Vec<(String, f64)>,
}

impl PhaseClock {
    fn run<T>(&mut self, name: &str, phase: impl FnOnce() -> T) -> T {
        if let Some(ref mut cb) = self.progress {
            let label = PHASE_LABELS
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, l)| *l)
                .unwrap_or(name);
            cb(name, label);
        }

        let start = Instant::now();
        let out = phase();
        let elapsed = start.elapsed().as_secs_f64();
        info!("phase {name} finished in {:.1}ms", elapsed * 1000.0);
        self.timings.push((name.to_string(), elapsed));
        out
    }
}

/// Execute the analysis pipeline and return the report document.
///
/// Only an invalid root or a failure to start the worker pool aborts the
/// run; every per-file problem ends up in the document instead.
pub fn run_pipeline(
    config: &AnalysisConfig,
    progress_callback: Option<ProgressCallback>,
) -> Result<PipelineRun, AnalysisError> {
    let mut registry = StrategyRegistry::new();
    let mut clock = PhaseClock {
        progress: progress_callback,
        timings: Vec::new(),
    };
    let total_start = Instant::now();

    let walk = clock.run("structure", || phases::structure::run_structure_phase(config))?;
    info!(
        "found {} files in {} directories under {}",
        walk.files.len(),
        walk.directories.len(),
        walk.root.display()
    );

    let profile = clock.run("project", || {
        phases::project::run_project_phase(&walk, &registry)
    });
    if profile.flutter {
        registry = StrategyRegistry::for_flutter();
    }

    let records = clock.run("parsing", || {
        phases::parsing::run_parsing_phase(config, &walk, &registry)
    })?;

    let imports = clock.run("imports", || {
        phases::imports::run_imports_phase(config, &walk.root, &records, &registry)
    });

    let graph = clock.run("graph", || {
        let files: Vec<SourceFile> = records.iter().map(|r| r.file.clone()).collect();
        DependencyGraph::build(&files, &imports)
    });
    info!(
        "dependency graph has {} files and {} edges",
        graph.file_count(),
        graph.edge_count()
    );

    let cycles = clock.run("cycles", || find_cycles(&graph));
    info!("found {} cycles", cycles.len());

    let document = clock.run("report", || {
        build_document(config, &walk, profile, &records, &imports, &graph, &cycles)
    });

    Ok(PipelineRun {
        document,
        timings: clock.timings,
        total_ms: total_start.elapsed().as_secs_f64() * 1000.0,
    })
}
