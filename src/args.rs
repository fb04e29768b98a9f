use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

/// Command-line arguments for the webext-pack tool
#[derive(Debug)]
pub struct Args {
    /// Enable verbose output
    pub verbose: bool,

    /// Path to the extension directory to package
    pub path: Option<PathBuf>,

    /// Path to alternative packaging manifest file
    pub manifest: Option<PathBuf>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        let matches = Command::new("webext-pack")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Release packaging tool for browser extensions")
            .arg(
                Arg::new("path")
                    .short('p')
                    .long("path")
                    .value_name("PATH")
                    .help("Path to the extension directory (defaults to the current directory)")
            )
            .arg(
                Arg::new("manifest")
                    .short('m')
                    .long("manifest")
                    .value_name("FILE")
                    .help("Path to alternative packaging manifest file (e.g., release.toml)")
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .action(ArgAction::SetTrue)
                    .help("Enable verbose output")
            )
            .get_matches();

        Self {
            verbose: matches.get_flag("verbose"),
            path: matches.get_one::<String>("path").map(PathBuf::from),
            manifest: matches.get_one::<String>("manifest").map(PathBuf::from),
        }
    }
}
