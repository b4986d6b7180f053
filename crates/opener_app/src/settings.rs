use std::fs;
use std::path::{Path, PathBuf};

use opener_core::{delay_from_secs, ConfigPatch};
use opener_logging::{opener_info, opener_warn};
use serde::{Deserialize, Serialize};

use crate::cli::TargetChoice;

pub const DEFAULT_SETTINGS_FILENAME: &str = "bulk_open.ron";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct PersistedSettings {
    target: Option<TargetChoice>,
    batch_size: Option<usize>,
    concurrency: Option<usize>,
    min_delay_secs: Option<f64>,
    max_delay_secs: Option<f64>,
    browser: Option<String>,
    export_dir: Option<PathBuf>,
}

/// Defaults read from the settings file; command-line flags override them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub config: ConfigPatch,
    pub browser: Option<String>,
    pub export_dir: Option<PathBuf>,
}

/// Load settings from `path`, or from the default file when `path` is `None`.
///
/// A missing default file is silent. Unreadable or malformed files are logged
/// and ignored.
pub(crate) fn load_settings(path: Option<&Path>) -> Settings {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILENAME), false),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !explicit => {
            return Settings::default();
        }
        Err(err) => {
            opener_warn!("Failed to read settings from {:?}: {}", path, err);
            return Settings::default();
        }
    };

    match parse_settings(&content) {
        Ok(settings) => {
            opener_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            opener_warn!("Failed to parse settings from {:?}: {}", path, err);
            Settings::default()
        }
    }
}

fn parse_settings(content: &str) -> Result<Settings, ron::error::SpannedError> {
    let persisted: PersistedSettings = ron::from_str(content)?;
    Ok(Settings {
        config: ConfigPatch {
            target: persisted.target.map(Into::into),
            batch_size: persisted.batch_size,
            concurrency: persisted.concurrency,
            min_delay: persisted.min_delay_secs.and_then(checked_delay),
            max_delay: persisted.max_delay_secs.and_then(checked_delay),
        },
        browser: persisted.browser,
        export_dir: persisted.export_dir,
    })
}

fn checked_delay(secs: f64) -> Option<std::time::Duration> {
    match delay_from_secs(secs) {
        Ok(delay) => Some(delay),
        Err(err) => {
            opener_warn!("Ignoring delay setting: {}", err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use opener_core::OpenTarget;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn parses_partial_settings() {
        let settings = parse_settings(
            r#"(
                target: Some(window),
                concurrency: Some(3),
                min_delay_secs: Some(0.25),
                browser: Some("firefox"),
            )"#,
        )
        .unwrap();

        assert_eq!(settings.config.target, Some(OpenTarget::Window));
        assert_eq!(settings.config.concurrency, Some(3));
        assert_eq!(settings.config.batch_size, None);
        assert_eq!(settings.config.min_delay, Some(Duration::from_millis(250)));
        assert_eq!(settings.browser.as_deref(), Some("firefox"));
    }

    #[test]
    fn invalid_delay_is_dropped() {
        let settings = parse_settings("(max_delay_secs: Some(-4.0))").unwrap();
        assert_eq!(settings.config.max_delay, None);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.ron");
        fs::write(&path, "(concurrency: \"lots\")").unwrap();

        assert_eq!(load_settings(Some(&path)), Settings::default());
    }

    #[test]
    fn missing_explicit_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.ron");
        assert_eq!(load_settings(Some(&path)), Settings::default());
    }
}
