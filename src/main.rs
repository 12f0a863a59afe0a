use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use appship::command::ShellRunner;
use appship::config;
use appship::git::GitRepo;
use appship::pipeline::Publisher;
use appship::project::XcodeProject;
use appship::remote::ConnectClient;
use appship::ui::{self, ConsolePrompt};

#[derive(clap::Parser)]
#[command(name = "appship", about = "Publish iOS apps to App Store Connect")]
struct Args {
    #[arg(help = "Path to the directory containing the app.toml file")]
    path: PathBuf,

    #[arg(help = "Action(s) to take, in order (default: help)")]
    actions: Vec<String>,

    #[arg(short, long, help = "Log more for debugging purposes")]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::display_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let app_dir = args.path.canonicalize()?;
    let config = config::load_config(&app_dir)?;

    if args.debug {
        ui::display_status(&format!(
            "Publishing {} (app id {}) from {}",
            config.app.bundle_id,
            config.app.app_id,
            app_dir.display()
        ));
    }

    // All toolchain commands (agvtool, fastlane, git) run against the app's
    // own directory.
    env::set_current_dir(&app_dir)?;

    let runner = ShellRunner::new(app_dir.join("command.log"));
    let scm = GitRepo::open(&app_dir)?;
    let remote = ConnectClient::new(&runner, &config.connect);
    let project = XcodeProject::new(&runner);
    let prompt = ConsolePrompt;

    let publisher = Publisher::new(
        &config, &app_dir, &runner, &remote, &project, &scm, &prompt,
    );

    let mut actions = args.actions;
    if actions.is_empty() {
        actions.push("help".to_string());
    }

    for action in &actions {
        publisher.dispatch(action)?;
    }

    Ok(())
}
