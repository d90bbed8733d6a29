//! Binary entrypoint for the `fleetdesk` CLI.

use std::process::ExitCode;

use fleetdesk::Error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Recording is handled in commands::dispatch via FLEETDESK_RECORD=<dir>.
    match fleetdesk::run(std::env::args()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Usage(message)) => {
            eprintln!("{}", message.trim_end());
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
