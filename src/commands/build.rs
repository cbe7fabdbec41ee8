//! # Build Command Implementation
//!
//! Runs the full pipeline: every source is fetched concurrently into the
//! output folder, then the repository index and its checksum are written.
//!
//! Settings come from `.addon-repo.yaml` (or the file named with `--config`)
//! and are overridden by the command line.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::Args;

use addon_repo::config::{self, RepoConfig};
use addon_repo::defaults::CONFIG_FILE;
use addon_repo::output::{emoji, OutputConfig};
use addon_repo::suggestions;

/// Fetch every source and write the repository
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Addon sources: git URLs (`url#branch:subpath`), folders or zip files.
    ///
    /// When given, they replace the `sources` list of the configuration file.
    #[arg(value_name = "SOURCES")]
    pub sources: Vec<String>,

    /// Folder the repository is written to [default: ./repo]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Write a gzip-compressed addons.xml.gz index
    #[arg(short = 'z', long)]
    pub compress: bool,

    /// Path to the configuration file.
    ///
    /// Defaults to `.addon-repo.yaml` in the current directory when present.
    #[arg(short, long, value_name = "FILE", env = "ADDON_REPO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only report errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `build` command.
pub fn execute(args: BuildArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let start_time = Instant::now();

    let settings = load_config(args.config.as_deref())?.merge_cli(
        args.sources,
        args.output,
        args.compress,
    );
    if settings.sources.is_empty() {
        return Err(suggestions::no_sources());
    }
    settings.validate()?;

    if !args.quiet {
        println!(
            "{} Building repository from {} source(s) into {}",
            emoji(&out, "🔨", "[BUILD]"),
            settings.sources.len(),
            out.path(&settings.output)
        );
    }

    let report = match settings.into_builder().build() {
        Ok(report) => report,
        Err(e) => {
            if !args.quiet {
                println!("{} Build failed", emoji(&out, "❌", "[ERR]"));
            }
            return Err(e.into());
        }
    };

    if !args.quiet {
        for addon in &report.addons {
            println!(
                "{} {} -> {}",
                emoji(&out, "📦", "[ADDON]"),
                out.addon(&addon.id, &addon.version),
                out.path(&report.archive_path(addon))
            );
        }
        println!(
            "{} Index: {}",
            emoji(&out, "📄", "[INDEX]"),
            out.path(&report.index_path)
        );
        println!(
            "{} Built {} addon(s) in {:.2}s",
            emoji(&out, "✅", "[OK]"),
            report.addons.len(),
            start_time.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// An explicit config path must exist; the default file is optional.
fn load_config(explicit: Option<&Path>) -> Result<RepoConfig> {
    match explicit {
        Some(path) if !path.is_file() => Err(suggestions::config_not_found(path)),
        Some(path) => Ok(config::from_file(path)?),
        None if Path::new(CONFIG_FILE).is_file() => Ok(config::from_file(CONFIG_FILE)?),
        None => Ok(RepoConfig::default()),
    }
}
