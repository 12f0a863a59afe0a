use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppshipError, Result};

/// Complete per-app configuration, read from `app.toml` in the app directory.
///
/// Loaded and validated once at startup, then passed by reference into the
/// components that need it.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub app: AppConfig,

    pub connect: ConnectConfig,

    #[serde(default)]
    pub screenshots: ScreenshotConfig,
}

/// Build settings for the Xcode project being published.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Optional .xcworkspace path; projects without one build from the
    /// project file alone.
    pub workspace: Option<String>,

    pub project: String,

    pub scheme: String,

    /// Numeric App Store application identifier.
    pub app_id: u64,

    pub bundle_id: String,

    #[serde(default)]
    pub uses_encryption: bool,

    #[serde(default)]
    pub uses_idfa: bool,
}

/// App Store Connect account settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ConnectConfig {
    pub username: String,

    pub team_name: String,
}

/// Screenshot capture settings; both lists are comma-separated.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScreenshotConfig {
    #[serde(default)]
    pub devices: String,

    #[serde(default)]
    pub languages: String,
}

impl ScreenshotConfig {
    pub fn device_list(&self) -> Vec<String> {
        split_list(&self.devices)
    }

    pub fn language_list(&self) -> Vec<String> {
        split_list(&self.languages)
    }
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Name used for scratch directories tied to this project/scheme pair.
    pub fn temp_dir_name(&self) -> String {
        let project_stem = Path::new(&self.app.project)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("project");
        format!("{}-{}", project_stem, self.app.scheme)
    }

    /// Common flags for every deliver invocation: credentials, submission
    /// information and the metadata path inside the app directory.
    pub fn deliver_options(&self, app_dir: &Path) -> String {
        let submission_information = format!(
            "{{\"export_compliance_uses_encryption\": {}, \"add_id_info_uses_idfa\": {}}}",
            self.app.uses_encryption, self.app.uses_idfa
        );

        format!(
            "--force --run_precheck_before_submit false --username {} --team_name \"{}\" \
             --submission_information '{}' --metadata_path '{}/fastlane/metadata'",
            self.connect.username,
            self.connect.team_name,
            submission_information,
            app_dir.display()
        )
    }
}

/// Load and validate configuration from `<app_dir>/app.toml`.
pub fn load_config(app_dir: &Path) -> Result<Config> {
    let config_path = app_dir.join("app.toml");
    let config_str = fs::read_to_string(&config_path).map_err(|e| {
        AppshipError::config(format!("cannot read {}: {}", config_path.display(), e))
    })?;

    let config: Config = toml::from_str(&config_str)
        .map_err(|e| AppshipError::config(format!("{}: {}", config_path.display(), e)))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.app.project.trim().is_empty() {
        return Err(AppshipError::config("app.project must not be empty"));
    }
    if config.app.scheme.trim().is_empty() {
        return Err(AppshipError::config("app.scheme must not be empty"));
    }
    if config.connect.username.trim().is_empty() {
        return Err(AppshipError::config("connect.username must not be empty"));
    }
    Ok(())
}
