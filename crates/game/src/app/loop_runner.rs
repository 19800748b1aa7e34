use std::process::ExitCode;

use engine::run_app;
use tracing::error;

use super::bootstrap::{build_app, LaunchError};

pub(crate) fn run() -> ExitCode {
    match launch() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}

fn launch() -> Result<(), LaunchError> {
    let app = build_app()?;
    run_app(app.config, app.game)?;
    Ok(())
}
