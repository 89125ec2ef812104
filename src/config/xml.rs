//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - Writes a commented template on request, never overwriting an existing file.
//!
//! Unknown elements are rejected so typos surface instead of being ignored.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{default_config_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use super::{CONFIG_ENV, FOLDER_NAME_DEFAULT};

use crate::platform::write_new_file_0600;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    folder_name: Option<String>,
    default_volume: Option<String>,
    temp_root: Option<String>,
    log_level: Option<String>,
    log_file: Option<String>,
}

/// Trimmed, non-empty text of an optional element.
fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(name) = non_empty(parsed.folder_name.as_deref()) {
        cfg.folder_name = name.to_string();
    }
    cfg.default_volume = non_empty(parsed.default_volume.as_deref()).map(PathBuf::from);
    cfg.temp_root = non_empty(parsed.temp_root.as_deref()).map(PathBuf::from);
    cfg.log_file = non_empty(parsed.log_file.as_deref()).map(PathBuf::from);

    if let Some(level) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = level.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path. Missing elements keep their defaults.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig =
        from_xml_str(&contents).with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Load the active config.
///
/// - `$STAGE_MOVE_CONFIG` set: that file must exist and parse.
/// - Otherwise the default location is used when present; a missing file means defaults.
///
/// Returns the config and the file it came from, if any.
pub fn load_config() -> Result<(Config, Option<PathBuf>)> {
    let explicit = env::var_os(CONFIG_ENV).is_some();
    let path = default_config_path()?;

    if !path.exists() {
        if explicit {
            bail!("{} points to a missing file: {}", CONFIG_ENV, path.display());
        }
        debug!(path = %path.display(), "No config file; using defaults");
        return Ok((Config::default(), None));
    }
    if path.is_dir() {
        bail!("config path is a directory, expected a file: {}", path.display());
    }

    let cfg = load_config_from_xml_path(&path)?;
    debug!(path = %path.display(), "Loaded config");
    Ok((cfg, Some(path)))
}

/// Write a commented template config to `path`. Refuses symlinked ancestors and
/// existing files; the file is created owner-only on Unix.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!("Refusing to create config: ancestor of {} is a symlink", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create '{}'", parent.display()))?;
    }

    let content = format!(
        "<!--\n  stage_move configuration (XML)\n\n  folder_name     -> folder created on the volume when no destination is given\n  default_volume  -> volume root to use when mounted (e.g. D:\\ or /mnt/data)\n  temp_root       -> where zip archives are extracted (system temp dir if empty)\n  log_level       -> quiet | normal | info | debug\n  log_file        -> path to a log file (optional; stderr is always used)\n\n  CLI flags override XML values.\n-->\n<config>\n  <folder_name>{}</folder_name>\n  <default_volume></default_volume>\n  <temp_root></temp_root>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n</config>\n",
        FOLDER_NAME_DEFAULT
    );

    write_new_file_0600(path, content.as_bytes())
        .with_context(|| format!("write template config '{}'", path.display()))?;
    info!("Created template config at {}", path.display());
    Ok(())
}
