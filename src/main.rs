use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process::ExitCode;
use ugen_stubgen::cli::Cli;
use ugen_stubgen::config::load_config;
use ugen_stubgen::generator::{self, ModuleOutcome, RunOptions, RunReport};
use ugen_stubgen::observability::{init_logging, install_panic_hook, level_for};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(level_for(cli.verbosity, cli.quiet));
    install_panic_hook();

    let loaded = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let source_dir = cli.path.clone().unwrap_or_else(|| loaded.source_dir());
    let options = RunOptions {
        parallel: !cli.no_parallel,
        check_only: cli.check,
    };

    let report = generator::run(&source_dir, &loaded.config, &options)
        .with_context(|| format!("Stub generation failed for {}", source_dir.display()))?;

    if !cli.quiet {
        print_summary(&report, &options);
    }

    if options.check_only && report.has_stale() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

// Side effect: summary on stdout
fn print_summary(report: &RunReport, options: &RunOptions) {
    let classes = format!(
        "{} convention, {} plain classes",
        report.convention_classes, report.plain_classes
    );

    if options.check_only {
        for path in report.stale() {
            println!("{} {}", "stale".yellow().bold(), path.display());
        }
        let stale = report.count(ModuleOutcome::Stale);
        let status = if stale == 0 {
            "up to date".green().bold()
        } else {
            format!("{stale} stale").red().bold()
        };
        println!(
            "{}: {} of {} stubs checked ({classes})",
            status,
            report.count(ModuleOutcome::UpToDate),
            report.outcomes.len()
        );
    } else {
        println!(
            "{} {} stubs ({classes})",
            "Wrote".green().bold(),
            report.count(ModuleOutcome::Written)
        );
    }

    let skipped = report.count(ModuleOutcome::SkippedEmpty);
    if skipped > 0 {
        println!("{}", format!("Skipped {skipped} modules without classes").dimmed());
    }
    if report.ambiguities > 0 {
        println!(
            "{}",
            format!(
                "{} ambiguous declarations fell back to defaults (see warnings)",
                report.ambiguities
            )
            .yellow()
        );
    }
}
