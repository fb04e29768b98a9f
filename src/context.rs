use std::path::PathBuf;

/// Context passed throughout the application containing global configuration
#[derive(Clone)]
pub struct Context {
    /// Enable verbose output (show source path to archive entry mappings)
    pub verbose: bool,

    /// Directory containing the extension sources; all relative paths in
    /// the packaging manifest are resolved against it
    pub base_dir: PathBuf,
}

impl Context {
    pub fn new(base_dir: PathBuf, verbose: bool) -> Self {
        Self { verbose, base_dir }
    }
}
