use clap::Parser;
use std::path::PathBuf;

/// Shared chip ledger with a scriptable table session
#[derive(Parser, Debug)]
#[command(name = "chip-ledger")]
#[command(about = "Track a shared chip ledger through a scripted table session", long_about = None)]
pub struct CliArgs {
    /// Command script to replay; reads stdin when omitted
    #[arg(value_name = "SCRIPT", help = "Path to a table command script")]
    pub script: Option<PathBuf>,

    /// Print the final roster as JSON instead of text
    #[arg(long = "json")]
    pub json: bool,

    /// Log filter directive, e.g. "info" or "chip_ledger=debug"
    #[arg(long = "log", value_name = "FILTER", default_value = "warn")]
    pub log: String,
}
