use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ugen-stubgen")]
#[command(about = "Generate .pyi stubs for UGen modules", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory of UGen modules (overrides `source_dir` from the config)
    pub path: Option<PathBuf>,

    /// Configuration file (default: search for .ugen-stubs.toml upwards)
    #[arg(short, long, env = "UGEN_STUBGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Render stubs and report the ones that differ on disk, without writing
    #[arg(long)]
    pub check: bool,

    /// Render modules one at a time
    #[arg(long = "no-parallel")]
    pub no_parallel: bool,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}
