//! Command line and config file handling.
//!
//! Settings come from three layers, highest priority first: command line
//! flags, `$XDG_CONFIG_HOME/jjview/config.toml`, built-in defaults. A missing
//! config file is normal; a malformed one is reported and then ignored.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_THEME: &str = "catppuccin-mocha";
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;
pub const DEFAULT_SCROLL_LINES: u16 = 3;

/// Live terminal browser for a jj repository.
#[derive(Debug, Default, Parser)]
#[command(name = "jjview", version, about)]
pub struct Cli {
    /// Workspace to browse. Defaults to the one containing the current directory.
    #[arg(short = 'R', long, value_name = "PATH")]
    pub repository: Option<PathBuf>,

    /// Revset for the revisions listing.
    #[arg(short, long, value_name = "REVSET")]
    pub revset: Option<String>,

    /// Do not refresh automatically when files change.
    #[arg(long)]
    pub no_watch: bool,

    /// Path to the jj executable.
    #[arg(long, value_name = "PATH")]
    pub jj: Option<PathBuf>,
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub theme: Option<String>,
    pub jj_binary: Option<PathBuf>,
    pub revset: Option<String>,
    pub debounce_ms: Option<u64>,
    pub scroll_lines: Option<u16>,
    pub watch: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Fully resolved settings used by the rest of the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Starting point for the workspace lookup.
    pub repository: PathBuf,
    pub revset: Option<String>,
    pub jj_binary: PathBuf,
    pub theme: String,
    pub debounce: Duration,
    pub scroll_lines: u16,
    pub watch: bool,
}

impl Settings {
    /// Layers `cli` over `file` over the defaults.
    pub fn resolve(cli: Cli, file: FileConfig) -> Self {
        Self {
            repository: cli.repository.unwrap_or_else(|| PathBuf::from(".")),
            revset: cli.revset.or(file.revset).filter(|r| !r.trim().is_empty()),
            jj_binary: cli.jj.or(file.jj_binary).unwrap_or_else(|| PathBuf::from("jj")),
            theme: file.theme.unwrap_or_else(|| DEFAULT_THEME.to_owned()),
            debounce: Duration::from_millis(file.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)),
            scroll_lines: file.scroll_lines.unwrap_or(DEFAULT_SCROLL_LINES).max(1),
            watch: !cli.no_watch && file.watch.unwrap_or(true),
        }
    }
}

/// Returns the path to the jjview config file.
///
/// Prefers `$XDG_CONFIG_HOME/jjview/config.toml`; falls back to
/// `~/.config/jjview/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("jjview").join("config.toml")
}

/// Resolves an XDG base directory, falling back to `$HOME/<fallback>`.
pub(crate) fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(fallback)))
        .unwrap_or_else(|| PathBuf::from(fallback))
}

/// Loads the config file at `path`. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(FileConfig::default());
        }
        Err(source) => return Err(ConfigError::Read { path: path.to_owned(), source }),
    };
    toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
}
