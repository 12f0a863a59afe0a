//! Version reconciliation against published remote state.
//!
//! Ensures the local build number and marketing version are safe to publish
//! next: the distribution service is authoritative for the next build number
//! (local state is not synchronized across machines), and a marketing version
//! that is already past its editable review stage forces a new one, with the
//! operator supplying it interactively.

use crate::error::{AppshipError, Result};
use crate::project::ProjectState;
use crate::remote::{RemoteState, ReviewState};
use crate::ui::formatter::{display_success, display_warning};
use crate::version::Version;

/// Decision point for the next marketing version when a new one is required.
pub trait VersionPrompt {
    fn next_version(&self, local: &Version, remote: &Version) -> Result<Version>;
}

/// Whether a new marketing version is required before the next release.
///
/// True when the local version lags the published one (stale checkout,
/// defensive) or when it equals a version that is already past the editable
/// review stage. Local strictly ahead, or equal-and-still-editable, needs no
/// change.
pub fn needs_new_version(local: &Version, remote: &Version, state: &ReviewState) -> bool {
    if local < remote {
        return true;
    }
    local == remote && !state.is_editable()
}

/// Reconciles local project version state against the distribution service.
pub struct Reconciler<'a> {
    remote: &'a dyn RemoteState,
    project: &'a dyn ProjectState,
    app_id: u64,
}

impl<'a> Reconciler<'a> {
    pub fn new(remote: &'a dyn RemoteState, project: &'a dyn ProjectState, app_id: u64) -> Self {
        Reconciler {
            remote,
            project,
            app_id,
        }
    }

    /// Set the local build number to one past the latest remote build.
    ///
    /// The remote is always authoritative; the prior local value is never
    /// trusted to be ahead. With no remote build yet (first-ever release) the
    /// local number is left untouched. Returns the applied number, if any.
    ///
    /// Repeated calls yield the same candidate until a new upload lands; a
    /// call racing a concurrent upload can hand out a stale candidate
    /// (single-operator use is assumed).
    pub fn reconcile_build_number(&self) -> Result<Option<u32>> {
        let build = match self.remote.latest_build(self.app_id)? {
            Some(build) => build,
            None => {
                display_warning("No remote build found; leaving build number untouched");
                return Ok(None);
            }
        };

        let remote_number = build.version.trim().parse::<u32>().map_err(|_| {
            AppshipError::version(format!(
                "remote build label is not a number: {}",
                build.version
            ))
        })?;

        let candidate = remote_number + 1;
        self.project.set_build_number(candidate)?;
        display_success(&format!(
            "Build number set to {} (latest remote build is {})",
            candidate, remote_number
        ));
        Ok(Some(candidate))
    }

    /// Ensure the local marketing version can be published next.
    ///
    /// Malformed local or remote version strings abort with an error rather
    /// than guessing. When a new version is needed, blocks on `prompt` and
    /// applies the answer to the project.
    pub fn reconcile_marketing_version(&self, prompt: &dyn VersionPrompt) -> Result<()> {
        let record = match self.remote.latest_app_version(self.app_id)? {
            Some(record) => record,
            None => {
                display_warning("No remote app version found; nothing published yet");
                return Ok(());
            }
        };

        let local = Version::parse(&self.project.marketing_version()?)?;
        let remote = Version::parse(&record.version_string)?;

        if needs_new_version(&local, &remote, &record.state) {
            let next = prompt.next_version(&local, &remote)?;
            self.project.set_marketing_version(&next.to_string())?;
            display_success(&format!("Marketing version set to {}", next));
        } else {
            display_success(&format!(
                "Marketing version {} is fine (remote is {} in state {})",
                local, remote, record.state
            ));
        }
        Ok(())
    }
}
