mod archive;
mod args;
mod context;
mod error;
mod manifest;
mod result;
mod utils;

use args::Args;
use context::Context;
use manifest::Manifest;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    // Parse command-line arguments
    let Args {
        verbose,
        path,
        manifest: pack_manifest,
    } = Args::parse();

    let base_dir = match path {
        Some(p) => p,
        None => std::env::current_dir()?,
    };

    // Create context
    let ctx = Context::new(base_dir, verbose);

    // Use cliclack for nice UI
    cliclack::intro("webext-pack")?;

    // Load packaging manifest
    let manifest = {
        let spinner = cliclack::spinner();
        spinner.start("Loading packaging manifest...");
        let result = if let Some(manifest_path) = pack_manifest {
            Manifest::load_from(&ctx, &manifest_path)
        } else {
            Manifest::load(&ctx)
        };
        match result {
            Ok(m) => {
                spinner.stop(format!("Packaging {} v{}", m.name, m.version));
                m
            }
            Err(e) => {
                spinner.error("Failed to load packaging manifest");
                return Err(e);
            }
        }
    };

    archive::create_zip(&ctx, &manifest)?;

    cliclack::outro("Release package is ready for the Chrome Web Store!")?;
    Ok(())
}
