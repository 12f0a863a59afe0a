//! Release pipelines and action dispatch.
//!
//! Actions form a closed set: the dispatcher resolves an operator-supplied
//! name with one exhaustive match, and the help listing is enumerated at
//! compile time. Workflows are best-effort forward sequences: a failing stage
//! aborts the remainder, completed stages are never rolled back, and a git
//! tag marks only successful terminal states.

use std::fs;
use std::path::{Path, PathBuf};

use crate::command::Runner;
use crate::config::Config;
use crate::error::{AppshipError, Result};
use crate::git::Scm;
use crate::project::ProjectState;
use crate::reconcile::{Reconciler, VersionPrompt};
use crate::remote::RemoteState;
use crate::ui::formatter::{display_error, display_help, display_status, display_warning};

/// Everything an operator can ask for on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Build,
    UploadBinary,
    UploadMetadata,
    UploadScreenshots,
    ReplaceScreenshots,
    Testflight,
    Release,
    Submit,
    Versions,
    VersionCheck,
    Snapshot,
    Help,
}

impl Action {
    pub fn all() -> &'static [Action] {
        &[
            Action::Build,
            Action::UploadBinary,
            Action::UploadMetadata,
            Action::UploadScreenshots,
            Action::ReplaceScreenshots,
            Action::Testflight,
            Action::Release,
            Action::Submit,
            Action::Versions,
            Action::VersionCheck,
            Action::Snapshot,
            Action::Help,
        ]
    }

    pub fn from_name(name: &str) -> Option<Action> {
        Action::all().iter().copied().find(|a| a.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Build => "build",
            Action::UploadBinary => "upload_binary",
            Action::UploadMetadata => "upload_metadata",
            Action::UploadScreenshots => "upload_screenshots",
            Action::ReplaceScreenshots => "replace_screenshots",
            Action::Testflight => "testflight",
            Action::Release => "release",
            Action::Submit => "submit",
            Action::Versions => "versions",
            Action::VersionCheck => "version_check",
            Action::Snapshot => "snapshot",
            Action::Help => "help",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Action::Build => "Builds the .ipa file",
            Action::UploadBinary => "Uploads the .ipa file to App Store Connect",
            Action::UploadMetadata => "Uploads the metadata to App Store Connect",
            Action::UploadScreenshots => "Uploads screenshots to App Store Connect",
            Action::ReplaceScreenshots => "Replaces all screenshots on App Store Connect",
            Action::Testflight => {
                "Reconciles the build number, builds the .ipa file, then uploads it to TestFlight"
            }
            Action::Release => {
                "Reconciles the build number, builds, uploads metadata and binary, submits for review"
            }
            Action::Submit => "Submits the latest uploaded build for review",
            Action::Versions => "Shows local and remote version state",
            Action::VersionCheck => "Reconciles build number and marketing version, no build",
            Action::Snapshot => "Captures screenshots for all configured devices and languages",
            Action::Help => "Shows available actions",
        }
    }
}

/// Executes release actions for one app.
///
/// Holds borrowed collaborators so tests can substitute mocks for every
/// external system.
pub struct Publisher<'a> {
    config: &'a Config,
    app_dir: &'a Path,
    runner: &'a dyn Runner,
    remote: &'a dyn RemoteState,
    project: &'a dyn ProjectState,
    scm: &'a dyn Scm,
    prompt: &'a dyn VersionPrompt,
}

impl<'a> Publisher<'a> {
    pub fn new(
        config: &'a Config,
        app_dir: &'a Path,
        runner: &'a dyn Runner,
        remote: &'a dyn RemoteState,
        project: &'a dyn ProjectState,
        scm: &'a dyn Scm,
        prompt: &'a dyn VersionPrompt,
    ) -> Self {
        Publisher {
            config,
            app_dir,
            runner,
            remote,
            project,
            scm,
            prompt,
        }
    }

    /// Resolve an action name and run it.
    ///
    /// An unknown name is the one recovered failure mode: it logs an error
    /// and prints the help listing instead of propagating, so a typo never
    /// kills a batch on its own.
    pub fn dispatch(&self, name: &str) -> Result<()> {
        match Action::from_name(name) {
            Some(action) => self.run(action),
            None => {
                display_error(&format!("Unknown action \"{}\"", name));
                self.help();
                Ok(())
            }
        }
    }

    pub fn run(&self, action: Action) -> Result<()> {
        match action {
            Action::Build => self.build(),
            Action::UploadBinary => self.upload_binary(),
            Action::UploadMetadata => self.upload_metadata(),
            Action::UploadScreenshots => self.upload_screenshots(false),
            Action::ReplaceScreenshots => self.upload_screenshots(true),
            Action::Testflight => self.testflight(),
            Action::Release => self.release(),
            Action::Submit => self.submit(),
            Action::Versions => self.versions(),
            Action::VersionCheck => self.version_check(),
            Action::Snapshot => self.snapshot(),
            Action::Help => {
                self.help();
                Ok(())
            }
        }
    }

    fn help(&self) {
        let entries: Vec<(&str, &str)> = Action::all()
            .iter()
            .map(|a| (a.name(), a.describe()))
            .collect();
        display_help(&entries);
    }

    fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(self.remote, self.project, self.config.app.app_id)
    }

    /// Safety gate: a published build's provenance must be a committed,
    /// identifiable source state.
    fn ensure_git_clean(&self) -> Result<()> {
        if self.scm.is_clean()? {
            Ok(())
        } else {
            Err(AppshipError::DirtyWorkingTree)
        }
    }

    /// Reconcile the build number and commit the resulting bump.
    fn reconcile_build_number(&self) -> Result<()> {
        if self.reconciler().reconcile_build_number()?.is_some() {
            self.scm.commit_all("Bump build number")?;
        }
        Ok(())
    }

    fn deliver_options(&self) -> String {
        self.config.deliver_options(self.app_dir)
    }

    fn workspace_flag(&self) -> String {
        match &self.config.app.workspace {
            Some(workspace) => format!("--workspace {} ", workspace),
            None => String::new(),
        }
    }

    fn tag_current_version(&self) -> Result<()> {
        let version = self.project.marketing_version()?;
        display_status(&format!("Tagging commit as {}", version));
        self.scm.force_tag(&version)
    }

    fn build(&self) -> Result<()> {
        self.runner.run(&format!(
            "fastlane gym {}--scheme \"{}\"",
            self.workspace_flag(),
            self.config.app.scheme
        ))
    }

    fn upload_binary(&self) -> Result<()> {
        self.runner.run(&format!(
            "fastlane deliver {} --skip_screenshots --skip_metadata",
            self.deliver_options()
        ))?;
        self.tag_current_version()
    }

    // Metadata uploads run for a long time; stream their output live.
    fn upload_metadata(&self) -> Result<()> {
        self.runner.run_live(&format!(
            "fastlane deliver {} --skip_binary_upload --skip_screenshots",
            self.deliver_options()
        ))?;
        self.tag_current_version()
    }

    fn upload_screenshots(&self, overwrite: bool) -> Result<()> {
        let overwrite_flag = if overwrite {
            " --overwrite_screenshots"
        } else {
            ""
        };
        self.runner.run(&format!(
            "fastlane deliver {} --skip_binary_upload --skip_metadata --force{}",
            self.deliver_options(),
            overwrite_flag
        ))?;
        self.tag_current_version()
    }

    fn testflight(&self) -> Result<()> {
        self.ensure_git_clean()?;
        self.reconcile_build_number()?;
        self.build()?;
        self.upload_binary()
    }

    fn release(&self) -> Result<()> {
        self.reconcile_build_number()?;
        self.build()?;
        self.runner.run(&format!(
            "fastlane deliver {} --submit_for_review --skip_screenshots",
            self.deliver_options()
        ))?;
        self.tag_current_version()
    }

    fn submit(&self) -> Result<()> {
        self.runner.run_live(&format!(
            "fastlane deliver submit_build {} --skip_screenshots --skip_metadata",
            self.deliver_options()
        ))
    }

    /// Read-only report of local and remote version state.
    fn versions(&self) -> Result<()> {
        let app_id = self.config.app.app_id;

        println!("Local marketing version: {}", self.project.marketing_version()?);
        println!("Local build number:      {}", self.project.build_number()?);

        match self.remote.latest_build(app_id)? {
            Some(build) => println!(
                "Latest remote build:     {} (uploaded {})",
                build.version, build.uploaded_date
            ),
            None => println!("Latest remote build:     none"),
        }

        match self.remote.latest_app_version(app_id)? {
            Some(version) => println!(
                "Latest remote version:   {} ({}, created {})",
                version.version_string, version.state, version.created_date
            ),
            None => println!("Latest remote version:   none"),
        }

        Ok(())
    }

    fn version_check(&self) -> Result<()> {
        self.reconcile_build_number()?;
        self.reconciler().reconcile_marketing_version(self.prompt)
    }

    /// Screenshot capture pass-through.
    ///
    /// Builds the app bundle once, then captures per device and language.
    /// Directories that already hold more than 4 screenshots are skipped so
    /// an interrupted run can resume. The capture tool spells Norwegian as
    /// "no-NO" while the store expects "no"; the remap is specific to that
    /// tool, not general locale handling.
    fn snapshot(&self) -> Result<()> {
        let devices = self.config.screenshots.device_list();
        let languages = self.config.screenshots.language_list();
        if devices.is_empty() || languages.is_empty() {
            display_warning("No screenshot devices or languages configured; nothing to do");
            return Ok(());
        }

        let derived_data_dir = derived_data_dir(&self.config.temp_dir_name());
        fs::create_dir_all(&derived_data_dir)?;

        let xcodebuild_workspace = match &self.config.app.workspace {
            Some(workspace) => format!("-workspace {} ", workspace),
            None => String::new(),
        };

        // Build the app bundle once, against the first device.
        self.runner.run(&format!(
            "xcodebuild {}-scheme \"{}\" -derivedDataPath {} \
             -destination \"platform=iOS Simulator,name={}\" \
             FASTLANE_SNAPSHOT=YES FASTLANE_LANGUAGE=en-US build-for-testing",
            xcodebuild_workspace,
            self.config.app.scheme,
            derived_data_dir.display(),
            devices[0]
        ))?;

        let snapshot_workspace = match &self.config.app.workspace {
            Some(workspace) => format!("workspace:\"{}\" ", workspace),
            None => String::new(),
        };

        for device in &devices {
            for language in &languages {
                if self.existing_screenshots(language, device) > 4 {
                    display_warning(&format!("Skipped {} / {}", device, language));
                    continue;
                }

                let capture_language = if language == "no" { "no-NO" } else { language };

                self.runner.run(&format!(
                    "nice -n 20 fastlane run snapshot {}scheme:\"{}\" devices:\"{}\" \
                     languages:\"{}\" test_without_building:true derived_data_path:\"{}\"",
                    snapshot_workspace,
                    self.config.app.scheme,
                    device,
                    capture_language,
                    derived_data_dir.display()
                ))?;

                // Move the capture tool's "no-NO" output back to "no".
                if capture_language == "no-NO" {
                    self.runner
                        .run("rsync -r fastlane/screenshots/no-NO fastlane/screenshots/no")?;
                    self.runner.run("rm -rf fastlane/screenshots/no-NO")?;
                }
            }
        }

        Ok(())
    }

    fn existing_screenshots(&self, language: &str, device: &str) -> usize {
        let dir = self
            .app_dir
            .join("fastlane")
            .join("screenshots")
            .join(language);

        match fs::read_dir(dir) {
            Ok(entries) => entries
                .flatten()
                .filter(|entry| {
                    entry
                        .file_name()
                        .to_string_lossy()
                        .starts_with(device)
                })
                .count(),
            Err(_) => 0,
        }
    }
}

fn derived_data_dir(temp_dir_name: &str) -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("appship")
        .join(temp_dir_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trip() {
        for action in Action::all() {
            assert_eq!(Action::from_name(action.name()), Some(*action));
        }
    }

    #[test]
    fn test_unknown_action_name() {
        assert_eq!(Action::from_name("deploy"), None);
        assert_eq!(Action::from_name(""), None);
    }

    #[test]
    fn test_every_action_has_description() {
        for action in Action::all() {
            assert!(!action.describe().is_empty());
        }
    }
}
