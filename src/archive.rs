use crate::context::Context;
use crate::manifest::Manifest;
use crate::result::Result;
use crate::utils;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Package the extension sources into a deflate-compressed zip archive.
///
/// Files from the manifest's inclusion list are added in list order under
/// their own relative names; a missing file is reported and skipped. Icon
/// assets are added afterwards under their base-relative names. Any prior
/// artifact at the output path is deleted first.
pub fn create_zip(ctx: &Context, manifest: &Manifest) -> Result<PathBuf> {
    let archive_path = manifest.archive_path();

    // Ensure output folder exists
    utils::ensure_dir(&manifest.output_folder)?;

    // Drop any artifact left over from a previous run
    if archive_path.exists() {
        fs::remove_file(&archive_path)?;
        cliclack::log::info("Removed stale release archive")?;
    }

    let file = File::create(&archive_path)?;
    let mut zip = ZipWriter::new(file);

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    // Top-level extension files, in manifest order
    for name in &manifest.include {
        let source = ctx.base_dir.join(name);
        if !source.exists() {
            cliclack::log::warning(format!("Missing file skipped: {}", name))?;
            continue;
        }

        if ctx.verbose {
            println!("Adding {} as {}", source.display(), name);
        }

        append_file(&mut zip, &source, name, options)?;
        cliclack::log::step(format!("Added file: {}", name))?;
    }

    // Icon assets, entered under their base-relative paths
    if manifest.icon_dir.exists() {
        for icon in collect_icons(&manifest.icon_dir, &manifest.icon_extensions) {
            let entry_name = icon
                .strip_prefix(&ctx.base_dir)?
                .to_string_lossy()
                .to_string();

            if ctx.verbose {
                println!("Adding {} as {}", icon.display(), entry_name);
            }

            append_file(&mut zip, &icon, &entry_name, options)?;
            cliclack::log::step(format!("Added icon: {}", entry_name))?;
        }
    }

    zip.finish()?;

    let size = fs::metadata(&archive_path)?.len();
    cliclack::log::success(format!(
        "{}: {} KB",
        manifest.filename,
        utils::format_size_kb(size)
    ))?;

    Ok(archive_path)
}

/// Collect icon files beneath the icon root, sorted for deterministic
/// archive output. Extension matching is a case-sensitive suffix check.
fn collect_icons(icon_dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut icons: Vec<PathBuf> = WalkDir::new(icon_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_icon_extension(p, extensions))
        .collect();

    icons.sort();
    icons
}

fn has_icon_extension(path: &Path, extensions: &[String]) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| extensions.iter().any(|ext| n.ends_with(ext.as_str())))
        .unwrap_or(false)
}

fn append_file(
    zip: &mut ZipWriter<File>,
    source: &Path,
    entry_name: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(entry_name, options)?;

    let mut f = File::open(source)?;
    let mut buffer = Vec::new();
    f.read_to_end(&mut buffer)?;
    zip.write_all(&buffer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn ctx(dir: &Path) -> Context {
        Context::new(dir.to_path_buf(), false)
    }

    fn manifest(ctx: &Context) -> Manifest {
        Manifest::load(ctx).unwrap()
    }

    /// Archive entry names in central-directory (insertion) order
    fn entry_names(archive_path: &Path) -> Vec<String> {
        let file = File::open(archive_path).unwrap();
        let mut archive = ZipArchive::new(file).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_archives_only_existing_inclusion_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("manifest.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("popup.js"), "let p;").unwrap();
        fs::write(temp_dir.path().join("README.md"), "# ext").unwrap();

        let ctx = ctx(temp_dir.path());
        let archive_path = create_zip(&ctx, &manifest(&ctx)).unwrap();

        assert_eq!(
            entry_names(&archive_path),
            vec!["manifest.json", "popup.js", "README.md"]
        );
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("manifest.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("background.js"), "void 0;").unwrap();

        let ctx = ctx(temp_dir.path());
        let m = manifest(&ctx);
        let first = create_zip(&ctx, &m).unwrap();
        let first_entries = entry_names(&first);
        let second = create_zip(&ctx, &m).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_entries, entry_names(&second));

        let artifacts = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".zip"))
            .count();
        assert_eq!(artifacts, 1);
    }

    #[test]
    fn test_icon_extension_filter_is_case_sensitive() {
        let temp_dir = TempDir::new().unwrap();
        let icon_dir = temp_dir.path().join("icons");
        fs::create_dir(&icon_dir).unwrap();
        fs::write(icon_dir.join("a.png"), [0u8; 4]).unwrap();
        fs::write(icon_dir.join("b.svg"), "<svg/>").unwrap();
        fs::write(icon_dir.join("c.txt"), "notes").unwrap();
        fs::write(icon_dir.join("d.PNG"), [0u8; 4]).unwrap();

        let ctx = ctx(temp_dir.path());
        let archive_path = create_zip(&ctx, &manifest(&ctx)).unwrap();

        assert_eq!(
            entry_names(&archive_path),
            vec![
                Path::new("icons").join("a.png").to_string_lossy().to_string(),
                Path::new("icons").join("b.svg").to_string_lossy().to_string(),
            ]
        );
    }

    #[test]
    fn test_icons_are_collected_recursively_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let icon_dir = temp_dir.path().join("icons");
        fs::create_dir_all(icon_dir.join("small")).unwrap();
        fs::write(icon_dir.join("toolbar.png"), [0u8; 4]).unwrap();
        fs::write(icon_dir.join("small").join("icon16.png"), [0u8; 4]).unwrap();

        let icons = collect_icons(&icon_dir, &[".png".to_string(), ".svg".to_string()]);

        assert_eq!(
            icons,
            vec![
                icon_dir.join("small").join("icon16.png"),
                icon_dir.join("toolbar.png"),
            ]
        );
    }

    #[test]
    fn test_overwrite_replaces_stale_archive() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("manifest.json"), "{}").unwrap();

        let ctx = ctx(temp_dir.path());
        let m = manifest(&ctx);
        fs::write(m.archive_path(), "stale bytes, not a zip").unwrap();

        let archive_path = create_zip(&ctx, &m).unwrap();

        assert_eq!(entry_names(&archive_path), vec!["manifest.json"]);
    }

    #[test]
    fn test_no_icon_directory_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("manifest.json"), "{}").unwrap();

        let ctx = ctx(temp_dir.path());
        let archive_path = create_zip(&ctx, &manifest(&ctx)).unwrap();

        assert_eq!(entry_names(&archive_path), vec!["manifest.json"]);
    }

    #[test]
    fn test_reported_size_matches_artifact() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("manifest.json"), "{}".repeat(512)).unwrap();

        let ctx = ctx(temp_dir.path());
        let archive_path = create_zip(&ctx, &manifest(&ctx)).unwrap();

        let bytes = fs::metadata(&archive_path).unwrap().len();
        assert!(bytes > 0);
        let rendered: f64 = utils::format_size_kb(bytes).parse().unwrap();
        assert!((rendered - bytes as f64 / 1024.0).abs() < 0.005);
    }

    #[test]
    fn test_output_folder_is_created() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("manifest.json"), "{}").unwrap();

        let ctx = ctx(temp_dir.path());
        let mut m = manifest(&ctx);
        m.output_folder = temp_dir.path().join("dist");

        let archive_path = create_zip(&ctx, &m).unwrap();

        assert!(archive_path.starts_with(temp_dir.path().join("dist")));
        assert!(archive_path.exists());
    }
}
