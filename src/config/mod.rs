//! Config module.
//! Provides configuration types, the config file location and XML loading.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{create_template_config, load_config, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "STAGE_MOVE_CONFIG";

/// Folder created on the chosen volume when no destination is given.
pub const FOLDER_NAME_DEFAULT: &str = "New Folder";
