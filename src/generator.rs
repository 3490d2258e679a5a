//! The stub generation pipeline.
//!
//! A run has two halves. First every eligible module is read, parsed,
//! classified and rendered; this is pure per module and runs on the rayon
//! pool. Only when every module rendered successfully does the second half
//! touch the filesystem, so a single unparseable module leaves all existing
//! stubs untouched.

use crate::config::StubgenConfig;
use crate::core::stub::ClassStub;
use crate::emitter::render_module;
use crate::errors::{Ambiguity, Result};
use crate::extraction::classify;
use crate::io::{find_modules, is_up_to_date, read_file, stub_path_for, write_stub};
use crate::observability::{
    increment_processed, set_current_file, set_phase, set_progress, StubgenPhase,
};
use crate::parser::parse_module;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Render modules on the rayon pool
    pub parallel: bool,
    /// Compare against existing stubs instead of writing
    pub check_only: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            check_only: false,
        }
    }
}

/// Per-module counts gathered while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleReport {
    pub convention_classes: usize,
    pub plain_classes: usize,
    pub ambiguities: Vec<Ambiguity>,
}

impl ModuleReport {
    pub fn class_count(&self) -> usize {
        self.convention_classes + self.plain_classes
    }
}

/// A module's stub text, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedModule {
    pub source: PathBuf,
    pub output: PathBuf,
    pub content: String,
    pub report: ModuleReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleOutcome {
    Written,
    SkippedEmpty,
    UpToDate,
    Stale,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Stub path and what happened to it, in discovery order
    pub outcomes: Vec<(PathBuf, ModuleOutcome)>,
    pub convention_classes: usize,
    pub plain_classes: usize,
    pub ambiguities: usize,
}

impl RunReport {
    pub fn count(&self, outcome: ModuleOutcome) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == outcome).count()
    }

    pub fn stale(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == ModuleOutcome::Stale)
            .map(|(path, _)| path.as_path())
    }

    pub fn has_stale(&self) -> bool {
        self.stale().next().is_some()
    }
}

/// Turn one module's source text into its stub text.
///
/// Pure: no filesystem access, and the same input always gives the same
/// output.
pub fn generate_module(text: &str, path: &Path, config: &StubgenConfig) -> Result<RenderedModule> {
    let module = {
        let _phase = set_phase(StubgenPhase::Parsing);
        parse_module(text, path)?
    };

    let _phase = set_phase(StubgenPhase::Extraction);
    let mut report = ModuleReport::default();
    let mut stubs: Vec<ClassStub> = Vec::with_capacity(module.classes.len());
    for class in &module.classes {
        let classification = classify(class, &config.convention);
        if classification.shape.is_convention() {
            report.convention_classes += 1;
        } else {
            report.plain_classes += 1;
        }
        report.ambiguities.extend(classification.ambiguities);
        stubs.push(classification.shape.to_stub(&config.convention));
    }

    let _phase = set_phase(StubgenPhase::Rendering);
    Ok(RenderedModule {
        source: path.to_path_buf(),
        output: stub_path_for(path),
        content: render_module(&stubs, &config.emit),
        report,
    })
}

/// Read and render one module from disk.
pub fn render_file(path: &Path, config: &StubgenConfig) -> Result<RenderedModule> {
    let _file = set_current_file(path);
    let span = tracing::info_span!("module", path = %path.display());
    let _entered = span.enter();

    let text = read_file(path)?;
    let rendered = generate_module(&text, path, config)?;
    tracing::debug!(
        convention = rendered.report.convention_classes,
        plain = rendered.report.plain_classes,
        "rendered"
    );
    increment_processed();
    Ok(rendered)
}

/// Render every module under `source_dir`, then write or check the stubs.
pub fn run(source_dir: &Path, config: &StubgenConfig, options: &RunOptions) -> Result<RunReport> {
    let modules = {
        let _phase = set_phase(StubgenPhase::Discovery);
        find_modules(source_dir, &config.exclude)?
    };
    tracing::info!(
        "Found {} modules in {}",
        modules.len(),
        source_dir.display()
    );
    set_progress(0, modules.len());

    let rendered = render_all(&modules, config, options.parallel)?;

    let mut report = RunReport::default();
    for module in &rendered {
        for ambiguity in &module.report.ambiguities {
            tracing::warn!(module = %module.source.display(), "{}", ambiguity);
        }
        report.convention_classes += module.report.convention_classes;
        report.plain_classes += module.report.plain_classes;
        report.ambiguities += module.report.ambiguities.len();
    }

    let _phase = set_phase(StubgenPhase::Writing);
    for module in rendered {
        let outcome = settle(&module, config, options)?;
        tracing::debug!(path = %module.output.display(), ?outcome);
        report.outcomes.push((module.output, outcome));
    }

    Ok(report)
}

/// Render all modules, keeping discovery order. The first failing module in
/// that order decides the error, whether or not rendering ran in parallel.
fn render_all(
    modules: &[PathBuf],
    config: &StubgenConfig,
    parallel: bool,
) -> Result<Vec<RenderedModule>> {
    let results: Vec<Result<RenderedModule>> = if parallel {
        modules
            .par_iter()
            .map(|path| render_file(path, config))
            .collect()
    } else {
        modules
            .iter()
            .map(|path| render_file(path, config))
            .collect()
    };
    results.into_iter().collect()
}

fn settle(
    module: &RenderedModule,
    config: &StubgenConfig,
    options: &RunOptions,
) -> Result<ModuleOutcome> {
    if config.skip_empty_modules && module.report.class_count() == 0 {
        return Ok(ModuleOutcome::SkippedEmpty);
    }
    if options.check_only {
        return Ok(if is_up_to_date(&module.output, &module.content)? {
            ModuleOutcome::UpToDate
        } else {
            ModuleOutcome::Stale
        });
    }
    write_stub(&module.output, &module.content)?;
    Ok(ModuleOutcome::Written)
}
