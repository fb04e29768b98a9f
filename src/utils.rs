use crate::result::Result;
use std::fs;
use std::path::Path;

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Render a byte count as kilobytes with two decimal digits
pub fn format_size_kb(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0)
}
