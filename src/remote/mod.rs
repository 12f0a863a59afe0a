//! Distribution-service state abstraction.
//!
//! The [RemoteState] trait is the read-only boundary to App Store Connect:
//! the most recent build and the most recent app-store version known for an
//! application. Implementations:
//!
//! - [connect::ConnectClient]: real implementation shelling out to the
//!   toolchain's connect query actions
//! - [mock::MockRemote]: test implementation with canned records
//!
//! Records are fetched fresh per call; nothing is cached. "No records yet" is
//! a legitimate `Ok(None)` outcome and is distinct from the service being
//! unreachable, which is an error.

pub mod connect;
pub mod mock;

pub use connect::ConnectClient;
pub use mock::MockRemote;

use std::fmt;

use crate::error::Result;

/// One build known to the distribution service.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildRecord {
    /// Build number as uploaded (e.g. "42").
    pub version: String,
    /// RFC 3339 upload timestamp.
    pub uploaded_date: String,
}

/// One app-store version entry.
#[derive(Debug, Clone, PartialEq)]
pub struct AppVersionRecord {
    pub version_string: String,
    /// RFC 3339 creation timestamp.
    pub created_date: String,
    pub state: ReviewState,
}

/// App Store review state of a version entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewState {
    PrepareForSubmission,
    WaitingForReview,
    InReview,
    PendingDeveloperRelease,
    ReadyForSale,
    Rejected,
    /// States the service may add; never treated as editable.
    Other(String),
}

impl ReviewState {
    pub fn parse(text: &str) -> Self {
        match text {
            "PREPARE_FOR_SUBMISSION" => ReviewState::PrepareForSubmission,
            "WAITING_FOR_REVIEW" => ReviewState::WaitingForReview,
            "IN_REVIEW" => ReviewState::InReview,
            "PENDING_DEVELOPER_RELEASE" => ReviewState::PendingDeveloperRelease,
            "READY_FOR_SALE" => ReviewState::ReadyForSale,
            "REJECTED" => ReviewState::Rejected,
            other => ReviewState::Other(other.to_string()),
        }
    }

    /// Whether the version entry can still be edited and resubmitted under
    /// the same version number.
    pub fn is_editable(&self) -> bool {
        matches!(self, ReviewState::PrepareForSubmission)
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ReviewState::PrepareForSubmission => "PREPARE_FOR_SUBMISSION",
            ReviewState::WaitingForReview => "WAITING_FOR_REVIEW",
            ReviewState::InReview => "IN_REVIEW",
            ReviewState::PendingDeveloperRelease => "PENDING_DEVELOPER_RELEASE",
            ReviewState::ReadyForSale => "READY_FOR_SALE",
            ReviewState::Rejected => "REJECTED",
            ReviewState::Other(other) => other,
        };
        write!(f, "{}", text)
    }
}

/// Read-only accessor for the latest published state of an application.
pub trait RemoteState {
    /// Most recent build for the app, or `None` if nothing was uploaded yet.
    fn latest_build(&self, app_id: u64) -> Result<Option<BuildRecord>>;

    /// Most recent app-store version entry, or `None` if nothing was
    /// published yet.
    fn latest_app_version(&self, app_id: u64) -> Result<Option<AppVersionRecord>>;
}

/// Pick the record with the maximum timestamp; the first record seen wins
/// ties, so repeated queries over the same data are deterministic. RFC 3339
/// timestamps order correctly under plain string comparison.
pub fn latest_by<T, F>(records: Vec<T>, timestamp: F) -> Option<T>
where
    F: Fn(&T) -> &str,
{
    let mut latest: Option<T> = None;
    for record in records {
        match &latest {
            Some(current) if timestamp(&record) <= timestamp(current) => {}
            _ => latest = Some(record),
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(version: &str, uploaded: &str) -> BuildRecord {
        BuildRecord {
            version: version.to_string(),
            uploaded_date: uploaded.to_string(),
        }
    }

    #[test]
    fn test_latest_by_picks_max_timestamp() {
        let records = vec![
            build("40", "2024-01-01T10:00:00Z"),
            build("42", "2024-03-01T10:00:00Z"),
            build("41", "2024-02-01T10:00:00Z"),
        ];
        let latest = latest_by(records, |r| &r.uploaded_date).unwrap();
        assert_eq!(latest.version, "42");
    }

    #[test]
    fn test_latest_by_first_seen_wins_ties() {
        let records = vec![
            build("first", "2024-01-01T10:00:00Z"),
            build("second", "2024-01-01T10:00:00Z"),
        ];
        let latest = latest_by(records, |r| &r.uploaded_date).unwrap();
        assert_eq!(latest.version, "first");
    }

    #[test]
    fn test_latest_by_empty() {
        let records: Vec<BuildRecord> = Vec::new();
        assert!(latest_by(records, |r| &r.uploaded_date).is_none());
    }

    #[test]
    fn test_review_state_parse_round_trip() {
        for s in [
            "PREPARE_FOR_SUBMISSION",
            "WAITING_FOR_REVIEW",
            "IN_REVIEW",
            "PENDING_DEVELOPER_RELEASE",
            "READY_FOR_SALE",
            "REJECTED",
        ] {
            assert_eq!(ReviewState::parse(s).to_string(), s);
        }
    }

    #[test]
    fn test_review_state_unknown_is_other_and_not_editable() {
        let state = ReviewState::parse("DEVELOPER_REMOVED_FROM_SALE");
        assert_eq!(state, ReviewState::Other("DEVELOPER_REMOVED_FROM_SALE".to_string()));
        assert!(!state.is_editable());
    }

    #[test]
    fn test_only_prepare_for_submission_is_editable() {
        assert!(ReviewState::PrepareForSubmission.is_editable());
        assert!(!ReviewState::ReadyForSale.is_editable());
        assert!(!ReviewState::InReview.is_editable());
    }
}
