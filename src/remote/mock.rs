use crate::error::{AppshipError, Result};
use crate::remote::{AppVersionRecord, BuildRecord, RemoteState, ReviewState};

/// Mock remote state for testing without App Store Connect.
pub struct MockRemote {
    build: Option<BuildRecord>,
    app_version: Option<AppVersionRecord>,
    unavailable: bool,
}

impl MockRemote {
    /// Remote with no records yet (first-ever release).
    pub fn empty() -> Self {
        MockRemote {
            build: None,
            app_version: None,
            unavailable: false,
        }
    }

    /// Remote whose every call fails, as if the service were unreachable.
    pub fn unavailable() -> Self {
        MockRemote {
            build: None,
            app_version: None,
            unavailable: true,
        }
    }

    pub fn with_build(mut self, version: impl Into<String>) -> Self {
        self.build = Some(BuildRecord {
            version: version.into(),
            uploaded_date: "2024-01-01T10:00:00Z".to_string(),
        });
        self
    }

    pub fn with_app_version(mut self, version: impl Into<String>, state: ReviewState) -> Self {
        self.app_version = Some(AppVersionRecord {
            version_string: version.into(),
            created_date: "2024-01-01T10:00:00Z".to_string(),
            state,
        });
        self
    }
}

impl RemoteState for MockRemote {
    fn latest_build(&self, _app_id: u64) -> Result<Option<BuildRecord>> {
        if self.unavailable {
            return Err(AppshipError::remote("service unreachable"));
        }
        Ok(self.build.clone())
    }

    fn latest_app_version(&self, _app_id: u64) -> Result<Option<AppVersionRecord>> {
        if self.unavailable {
            return Err(AppshipError::remote("service unreachable"));
        }
        Ok(self.app_version.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_remote() {
        let remote = MockRemote::empty();
        assert_eq!(remote.latest_build(1).unwrap(), None);
        assert_eq!(remote.latest_app_version(1).unwrap(), None);
    }

    #[test]
    fn test_configured_records() {
        let remote = MockRemote::empty()
            .with_build("42")
            .with_app_version("1.2.0", ReviewState::ReadyForSale);

        assert_eq!(remote.latest_build(1).unwrap().unwrap().version, "42");
        let version = remote.latest_app_version(1).unwrap().unwrap();
        assert_eq!(version.version_string, "1.2.0");
        assert_eq!(version.state, ReviewState::ReadyForSale);
    }

    #[test]
    fn test_unavailable_remote_errors() {
        let remote = MockRemote::unavailable();
        assert!(remote.latest_build(1).is_err());
        assert!(remote.latest_app_version(1).is_err());
    }
}
