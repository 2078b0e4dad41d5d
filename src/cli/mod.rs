// CLI module
// Argument parsing and the scripted session adapter

mod args;
pub mod session;

pub use args::CliArgs;
pub use session::Session;

use clap::Parser;

/// Parse command-line arguments using clap
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}
