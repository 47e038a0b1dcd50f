//! contrast-go installer CLI entrypoint.
//!
//! This binary reads the Go environment, downloads the requested
//! contrast-go release for the host platform, and installs it where
//! `go install` would place a binary.

use std::io::Write;

use clap::Parser;
use contrast_go_installer::artefact::download::{ArtifactClient, HttpClient};
use contrast_go_installer::artefact::naming::ARTIFACT_NAME;
use contrast_go_installer::cli::Cli;
use contrast_go_installer::error::InstallError;
use contrast_go_installer::go_env::{CommandExecutor, GoEnv, GoEnvError, SystemCommandExecutor};
use contrast_go_installer::install_flow::{InstallRequest, Platform, install_for_host};
use contrast_go_installer::logging::init_logging;
use contrast_go_installer::lookup::{ExecutableLookup, SearchPathLookup};
use contrast_go_installer::output::{success_message, write_stderr_line};

/// Exit status for every failure, matching usage errors.
const FAILURE_EXIT_CODE: i32 = 2;

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("There was a problem reading the Go environment: {0}")]
    GoEnv(#[source] GoEnvError),

    #[error("Unable to find install path: {0}")]
    InstallPath(#[source] GoEnvError),

    #[error(transparent)]
    Install(#[from] InstallError),
}

struct Services<'a> {
    executor: &'a dyn CommandExecutor,
    client: &'a dyn ArtifactClient,
    lookup: &'a dyn ExecutableLookup,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let services = Services {
        executor: &SystemCommandExecutor,
        client: &HttpClient,
        lookup: &SearchPathLookup::new(),
    };
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &services, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, services: &Services<'_>, stderr: &mut dyn Write) -> Result<(), RunError> {
    let env = GoEnv::discover(services.executor).map_err(RunError::GoEnv)?;
    let destination = env
        .install_dir()
        .map_err(RunError::InstallPath)?
        .join(ARTIFACT_NAME);

    let request = InstallRequest::new(
        cli.source.as_str(),
        cli.version.as_str(),
        Platform::new(env.os, env.arch),
        destination,
    );
    let installed = install_for_host(&request, services.client, services.lookup, stderr)?;

    write_stderr_line(
        stderr,
        success_message(&request.version, &installed, &request.destination),
    );
    Ok(())
}

fn exit_code_for_run_result(result: Result<(), RunError>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            FAILURE_EXIT_CODE
        }
    }
}
