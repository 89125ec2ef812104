use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use stage_move::config::{CONFIG_ENV, load_config};
use stage_move::{Config, LogLevel, default_config_path};

struct EnvGuard;

impl EnvGuard {
    fn set(value: &std::path::Path) -> Self {
        unsafe {
            std::env::set_var(CONFIG_ENV, value);
        }
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            std::env::remove_var(CONFIG_ENV);
        }
    }
}

#[test]
#[serial]
fn env_path_is_used_and_parsed() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("custom.xml");
    fs::write(
        &cfg_path,
        r#"<config>
  <folder_name>Staged</folder_name>
  <default_volume>/mnt/data</default_volume>
  <temp_root></temp_root>
  <log_level>debug</log_level>
</config>"#,
    )
    .unwrap();
    let _env = EnvGuard::set(&cfg_path);

    assert_eq!(default_config_path().unwrap(), cfg_path);
    let (cfg, from) = load_config().unwrap();
    assert_eq!(from, Some(cfg_path));
    assert_eq!(
        cfg,
        Config {
            folder_name: "Staged".into(),
            default_volume: Some(PathBuf::from("/mnt/data")),
            log_level: LogLevel::Debug,
            ..Config::default()
        }
    );
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    let td = tempdir().unwrap();
    let _env = EnvGuard::set(&td.path().join("absent.xml"));
    let err = load_config().unwrap_err();
    assert!(err.to_string().contains(CONFIG_ENV));
}

#[test]
#[serial]
fn directory_as_config_is_an_error() {
    let td = tempdir().unwrap();
    let _env = EnvGuard::set(td.path());
    assert!(load_config().is_err());
}

#[test]
#[serial]
fn malformed_xml_is_an_error() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("broken.xml");
    fs::write(&cfg_path, "<config><folder_name>x</config>").unwrap();
    let _env = EnvGuard::set(&cfg_path);
    assert!(load_config().is_err());
}
