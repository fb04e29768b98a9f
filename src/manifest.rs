use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default packaging manifest filename, looked up in the extension directory
pub const MANIFEST_FILENAME: &str = "pack.toml";

const DEFAULT_NAME: &str = "gemini-summarizer";
const DEFAULT_VERSION: &str = "1.3.0";
const DEFAULT_FILENAME: &str = "$NAME-v$VERSION.zip";
const DEFAULT_ICON_DIR: &str = "icons";
const DEFAULT_ICON_EXTENSIONS: &[&str] = &[".png", ".svg"];

/// Extension source files always considered for packaging
const DEFAULT_INCLUDE: &[&str] = &[
    "manifest.json",
    "background.js",
    "popup.html",
    "popup.js",
    "popup.css",
    "config.html",
    "config.js",
    "config.css",
    "content-extractor.js",
    "offscreen.html",
    "offscreen.js",
    "README.md",
];

/// Raw packaging configuration as written in pack.toml; every field is
/// optional and falls back to the built-in defaults
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PackToml {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub include: Option<Vec<String>>,

    #[serde(rename = "icon-dir", default)]
    pub icon_dir: Option<String>,

    #[serde(rename = "icon-extensions", default)]
    pub icon_extensions: Option<Vec<String>>,

    #[serde(rename = "output-folder", default)]
    pub output_folder: Option<String>,
}

/// Parsed and processed packaging configuration
pub struct Manifest {
    pub name: String,
    pub version: String,
    /// Resolved archive filename
    pub filename: String,
    /// Relative paths of the files to include, in packaging order
    pub include: Vec<String>,
    pub icon_dir: PathBuf,
    pub icon_extensions: Vec<String>,
    pub output_folder: PathBuf,
}

impl Manifest {
    /// Load the packaging manifest from the extension directory, falling
    /// back to the built-in configuration when no pack.toml is present
    pub fn load(ctx: &Context) -> Result<Self> {
        let manifest_path = ctx.base_dir.join(MANIFEST_FILENAME);
        if manifest_path.exists() {
            Self::load_from(ctx, &manifest_path)
        } else {
            Self::from_config(ctx, PackToml::default())
        }
    }

    /// Load the packaging manifest from an explicit file
    pub fn load_from(ctx: &Context, path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ManifestNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let config: PackToml = toml::from_str(&content)?;
        Self::from_config(ctx, config)
    }

    fn from_config(ctx: &Context, config: PackToml) -> Result<Self> {
        let name = config.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
        let version = config.version.unwrap_or_else(|| DEFAULT_VERSION.to_string());

        let filename = expand_template(
            config.filename.as_deref().unwrap_or(DEFAULT_FILENAME),
            &name,
            &version,
        );
        if filename.is_empty() {
            return Err(Error::custom("archive filename resolved to an empty string"));
        }

        let include = config
            .include
            .unwrap_or_else(|| DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect());

        let icon_dir = ctx
            .base_dir
            .join(config.icon_dir.as_deref().unwrap_or(DEFAULT_ICON_DIR));

        let icon_extensions = config.icon_extensions.unwrap_or_else(|| {
            DEFAULT_ICON_EXTENSIONS.iter().map(|s| s.to_string()).collect()
        });

        let output_folder = config
            .output_folder
            .map(|f| ctx.base_dir.join(expand_template(&f, &name, &version)))
            .unwrap_or_else(|| ctx.base_dir.clone());

        Ok(Manifest {
            name,
            version,
            filename,
            include,
            icon_dir,
            icon_extensions,
            output_folder,
        })
    }

    /// Full path of the archive this manifest produces
    pub fn archive_path(&self) -> PathBuf {
        self.output_folder.join(&self.filename)
    }
}

/// Resolve $NAME and $VERSION references in a manifest string
fn expand_template(input: &str, name: &str, version: &str) -> String {
    input.replace("$NAME", name).replace("$VERSION", version)
}
