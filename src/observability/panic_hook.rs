//! Panic hook that prints a crash report with the run context.
//!
//! The report names the phase, the module being processed and how many
//! modules were done, so a crash on one odd source file can be reproduced.

use super::context::{get_current_context, get_progress, RunContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str = "================================================================";

/// Replace the default panic hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("{}", crash_report(info));
    }));
}

fn crash_report(info: &PanicHookInfo<'_>) -> String {
    let mut lines = vec![
        RULE.to_string(),
        format!("ugen-stubgen {VERSION} crashed ({})", std::env::consts::OS),
        RULE.to_string(),
        format!("panic: {}", panic_message(info)),
    ];
    if let Some(location) = info.location() {
        lines.push(format!(
            "at: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ));
    }

    let (processed, total) = get_progress();
    lines.extend(context_lines(&get_current_context(), processed, total));
    if let Some(metadata) = Span::current().metadata() {
        lines.push(format!("span: {}", metadata.name()));
    }

    lines.push(RULE.to_string());
    if std::env::var("RUST_BACKTRACE").is_ok() {
        lines.push(std::backtrace::Backtrace::capture().to_string());
    } else {
        lines.push("run with RUST_BACKTRACE=1 for a stack trace".to_string());
    }
    lines.join("\n")
}

fn context_lines(context: &RunContext, processed: usize, total: usize) -> Vec<String> {
    let mut lines = Vec::new();
    match context.phase {
        Some(phase) => lines.push(format!("phase: {phase}")),
        None => lines.push("phase: (not started)".to_string()),
    }
    if let Some(file) = &context.current_file {
        lines.push(format!("module: {}", file.display()));
    }
    if total > 0 {
        lines.push(format!("progress: {processed} / {total} modules"));
    }
    lines
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
