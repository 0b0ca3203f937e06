//! Creates the master password file that `passman` unlocks with.

use std::path::PathBuf;
use std::process::ExitCode;

use passman::cli::{EXIT_OK, EXIT_OPERATION, EXIT_USAGE};
use passman::crypto;
use passman::masterpw::{MasterPassword, PasswordPrompt, TerminalPrompt};

const USAGE: &str = "\
Use: <empw.dat>
     <empw.dat>          - path of the master password file to create";

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [path] = args.as_slice() else {
        println!("{USAGE}");
        return ExitCode::from(EXIT_USAGE);
    };

    match create(PathBuf::from(path)) {
        Ok(()) => {
            println!("master password file {path} created");
            ExitCode::from(EXIT_OK)
        }
        Err(err) => {
            println!("ex: {err}");
            println!("ex: {err:?}");
            ExitCode::from(EXIT_OPERATION)
        }
    }
}

fn create(path: PathBuf) -> anyhow::Result<()> {
    crypto::init()?;

    let mut prompt = TerminalPrompt;
    let password = prompt.read_password(1, 2)?;
    if password.is_empty() {
        anyhow::bail!("empty master password not allowed");
    }
    if prompt.read_password(2, 2)? != password {
        anyhow::bail!("master passwords do not match");
    }

    MasterPassword::create(&path, password.expose())?;
    Ok(())
}
