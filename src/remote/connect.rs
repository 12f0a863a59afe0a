use regex::Regex;

use crate::command::Runner;
use crate::config::ConnectConfig;
use crate::error::{AppshipError, Result};
use crate::remote::{latest_by, AppVersionRecord, BuildRecord, RemoteState, ReviewState};

/// App Store Connect client backed by the toolchain's connect query actions.
///
/// Each query is one blocking external command whose captured output contains
/// tab-separated record lines (one per build or version entry); everything
/// else the tool prints is ignored. A successful query with no record lines
/// means the app has no records yet.
pub struct ConnectClient<'a> {
    runner: &'a dyn Runner,
    connect: &'a ConnectConfig,
}

impl<'a> ConnectClient<'a> {
    pub fn new(runner: &'a dyn Runner, connect: &'a ConnectConfig) -> Self {
        ConnectClient { runner, connect }
    }

    fn query(&self, action: &str, app_id: u64) -> Result<String> {
        let command = format!(
            "fastlane run {} app_id:{} username:{} team_name:\"{}\"",
            action, app_id, self.connect.username, self.connect.team_name
        );

        let output = self.runner.capture(&command)?;
        if !output.success {
            return Err(AppshipError::remote(format!(
                "{} failed with exit code {}",
                action, output.code
            )));
        }
        Ok(output.stdout)
    }
}

/// Extract build records from query output: `<label>\t<uploaded_date>`.
fn parse_build_lines(text: &str) -> Vec<BuildRecord> {
    let mut records = Vec::new();
    if let Ok(re) = Regex::new(r"(?m)^(\d+)\t(\S+)$") {
        for caps in re.captures_iter(text) {
            records.push(BuildRecord {
                version: caps[1].to_string(),
                uploaded_date: caps[2].to_string(),
            });
        }
    }
    records
}

/// Extract version records from query output:
/// `<version>\t<created_date>\t<state>`.
fn parse_version_lines(text: &str) -> Vec<AppVersionRecord> {
    let mut records = Vec::new();
    if let Ok(re) = Regex::new(r"(?m)^(\d+(?:\.\d+)*)\t(\S+)\t([A-Z_]+)$") {
        for caps in re.captures_iter(text) {
            records.push(AppVersionRecord {
                version_string: caps[1].to_string(),
                created_date: caps[2].to_string(),
                state: ReviewState::parse(&caps[3]),
            });
        }
    }
    records
}

impl RemoteState for ConnectClient<'_> {
    fn latest_build(&self, app_id: u64) -> Result<Option<BuildRecord>> {
        let output = self.query("connect_builds", app_id)?;
        Ok(latest_by(parse_build_lines(&output), |r| &r.uploaded_date))
    }

    fn latest_app_version(&self, app_id: u64) -> Result<Option<AppVersionRecord>> {
        let output = self.query("connect_versions", app_id)?;
        Ok(latest_by(parse_version_lines(&output), |r| &r.created_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MockRunner;

    fn connect_config() -> ConnectConfig {
        ConnectConfig {
            username: "dev@example.com".to_string(),
            team_name: "Example Team".to_string(),
        }
    }

    #[test]
    fn test_latest_build_parses_and_selects() {
        let runner = MockRunner::new().capture_response(
            "connect_builds",
            "[fastlane] querying builds\n\
             41\t2024-02-01T10:00:00Z\n\
             42\t2024-03-01T10:00:00Z\n\
             40\t2024-01-01T10:00:00Z\n\
             [fastlane] done\n",
        );
        let connect = connect_config();
        let client = ConnectClient::new(&runner, &connect);

        let latest = client.latest_build(123).unwrap().unwrap();
        assert_eq!(latest.version, "42");
        assert!(runner.saw("app_id:123"));
    }

    #[test]
    fn test_latest_build_none_when_no_records() {
        let runner = MockRunner::new().capture_response("connect_builds", "no builds yet\n");
        let connect = connect_config();
        let client = ConnectClient::new(&runner, &connect);

        assert_eq!(client.latest_build(123).unwrap(), None);
    }

    #[test]
    fn test_query_failure_is_remote_error() {
        let runner = MockRunner::new().capture_failure("connect_builds", "503 service unavailable");
        let connect = connect_config();
        let client = ConnectClient::new(&runner, &connect);

        let err = client.latest_build(123).unwrap_err();
        assert!(matches!(err, AppshipError::Remote(_)));
    }

    #[test]
    fn test_latest_app_version_parses_state() {
        let runner = MockRunner::new().capture_response(
            "connect_versions",
            "1.1.0\t2024-01-01T09:00:00Z\tREADY_FOR_SALE\n\
             1.2.0\t2024-04-01T09:00:00Z\tPREPARE_FOR_SUBMISSION\n",
        );
        let connect = connect_config();
        let client = ConnectClient::new(&runner, &connect);

        let latest = client.latest_app_version(123).unwrap().unwrap();
        assert_eq!(latest.version_string, "1.2.0");
        assert_eq!(latest.state, ReviewState::PrepareForSubmission);
    }

    #[test]
    fn test_parse_lines_ignore_tool_noise() {
        let builds = parse_build_lines("step 1\n42\t2024-01-01T00:00:00Z\nSuccess!\n");
        assert_eq!(builds.len(), 1);

        let versions =
            parse_version_lines("+-----+\n| x |\n2.0.1\t2024-05-05T00:00:00Z\tIN_REVIEW\n");
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].state, ReviewState::InReview);
    }
}
