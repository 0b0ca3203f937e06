use std::io;
use std::process::ExitCode;

use passman::args;
use passman::cli::{self, EXIT_OK, EXIT_USAGE};
use passman::config::Settings;
use passman::error::SessionError;
use passman::masterpw::TerminalPrompt;

fn main() -> ExitCode {
    let request = match args::parse_request(std::env::args().skip(1)) {
        Ok(request) => request,
        Err(err) => {
            println!("{err}");
            println!("{}", args::USAGE);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let settings = Settings::from_env();
    let mut stdout = io::stdout().lock();

    match cli::run(&request, &settings, &mut TerminalPrompt, &mut stdout) {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(SessionError::Operation(err)) => {
            println!("ex: {err}");
            println!("ex: {err:?}");
            ExitCode::from(cli::EXIT_OPERATION)
        }
        Err(err) => {
            println!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
