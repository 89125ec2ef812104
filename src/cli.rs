//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --source takes precedence over the positional SOURCE.
//! - --debug is a shorthand for --log-level debug.
//! - An empty --dest means "no explicit destination".

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// Stage a folder or zip archive into a destination directory.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move a folder's contents (or a zip archive's) into a destination, with confirmed cleanup"
)]
pub struct Args {
    /// Folder or .zip archive to stage.
    #[arg(value_name = "SOURCE", value_hint = ValueHint::AnyPath)]
    pub source_pos: Option<PathBuf>,

    /// Explicit source option; overrides the positional SOURCE.
    #[arg(
        long = "source",
        short = 's',
        value_name = "PATH",
        value_hint = ValueHint::AnyPath,
        help = "Folder or .zip archive to stage (overrides positional)"
    )]
    pub source: Option<PathBuf>,

    /// Name of the folder created on the volume when --dest is not given.
    #[arg(long, short = 'n', value_name = "NAME", help = "New folder name on the volume (default: New Folder)")]
    pub name: Option<String>,

    /// Explicit destination directory; wins over --volume/--name.
    #[arg(long, value_name = "DIR", value_hint = ValueHint::DirPath, help = "Destination directory (optional)")]
    pub dest: Option<String>,

    /// Volume root used when no destination is given. Used as-is, even if not listed.
    #[arg(long, value_name = "ROOT", value_hint = ValueHint::DirPath, help = "Volume root used when --dest is absent")]
    pub volume: Option<PathBuf>,

    /// Print the detected volumes and exit.
    #[arg(long, help = "List mounted volumes usable as a destination root and exit")]
    pub list_volumes: bool,

    /// Ask for cleanup confirmation even when stdin is not a terminal.
    #[arg(long, conflicts_with = "no_prompt", help = "Always ask whether to delete the moved folder")]
    pub prompt: bool,

    /// Never ask for cleanup confirmation.
    #[arg(long, help = "Do not offer to delete the moved folder afterwards")]
    pub no_prompt: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(short = 'd', long, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Append logs to this file in addition to stderr.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath, help = "Also write logs to FILE")]
    pub log_file: Option<PathBuf>,

    /// Print where the config file is looked up, then exit.
    #[arg(long, help = "Print the config file location used by stage_move and exit")]
    pub print_config: bool,

    /// Write a template config file to the config location, then exit.
    #[arg(long, help = "Create a template config file and exit")]
    pub init_config: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,
}

impl Args {
    /// Effective source path: `--source` if provided, else positional SOURCE.
    pub fn resolved_source(&self) -> Option<PathBuf> {
        self.source
            .as_deref()
            .or(self.source_pos.as_deref())
            .map(|p| Self::sanitize_str(&p.to_string_lossy()))
    }

    /// Effective destination: `--dest` unless empty after sanitizing.
    pub fn resolved_dest(&self) -> Option<PathBuf> {
        self.dest
            .as_deref()
            .map(Self::sanitize_str)
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Explicit volume root, if given.
    pub fn resolved_volume(&self) -> Option<PathBuf> {
        self.volume
            .as_deref()
            .map(|p| Self::sanitize_str(&p.to_string_lossy()))
    }

    fn sanitize_str(s: &str) -> PathBuf {
        // Trim surrounding quotes left behind by PowerShell or CMD quoting.
        let trimmed = s.trim();
        let mut inner = if trimmed.len() >= 2
            && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
                || (trimmed.starts_with('\'') && trimmed.ends_with('\'')))
        {
            trimmed[1..trimmed.len() - 1].to_string()
        } else {
            trimmed.trim_matches(|c| c == '\'' || c == '"').to_string()
        };

        // Drop ONE trailing separator, but never reduce "/" or "C:\" to nothing.
        let is_root = inner.len() <= 1 || (inner.len() == 3 && inner.as_bytes()[1] == b':');
        if !is_root && (inner.ends_with('\\') || inner.ends_with('/')) {
            inner.pop();
        }

        PathBuf::from(inner)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(name) = &self.name {
            cfg.folder_name = name.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(file.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
