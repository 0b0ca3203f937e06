use anyhow::{Context, Result};
use std::io::Write;

use crate::args::{Operation, OperationRequest};
use crate::config::{self, Settings, StoreInitPolicy};
use crate::crypto::{self, Encryptor};
use crate::error::{OperationError, SessionError};
use crate::logging::Logger;
use crate::masterpw::{MasterPassword, PasswordPrompt, DEFAULT_RETRY_LIMIT};
use crate::models::SecureString;
use crate::passman::PassMan;
use crate::store::PasswordStore;

pub const EXIT_OK: u8 = 0;
pub const EXIT_OPERATION: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_CONFIG: u8 = 3;
pub const EXIT_MASTER_PASSWORD: u8 = 4;

/// Runs one invocation: salt, logger, master password, store, then the
/// requested operation. Everything the user sees goes to `out`.
pub fn run<W: Write>(
    request: &OperationRequest,
    settings: &Settings,
    prompt: &mut dyn PasswordPrompt,
    out: &mut W,
) -> Result<(), SessionError> {
    let salt = config::read_salt(&request.config_path)?;

    let logger = Logger::new(request.verbose);
    if let Ok(cwd) = std::env::current_dir() {
        writeln!(out, "Working Directory = {}", cwd.display())?;
    }

    crypto::init().map_err(|err| SessionError::Operation(err.into()))?;

    let mut master = MasterPassword::new(&request.master_password_path);
    master.set_retry_limit(DEFAULT_RETRY_LIMIT);
    master.set_logger(logger.clone());
    let master_password = master.retrieve(prompt)?;

    let store = PasswordStore::bind(&request.password_store_path);
    let store = match store {
        Ok(store) => {
            if !store.exists() {
                logger.info(format!(
                    "password store {} does not exist yet, starting empty",
                    store.path().display()
                ));
            }
            Ok(store)
        }
        Err(err) if settings.store_policy == StoreInitPolicy::Strict => {
            logger.error(&err);
            return Err(SessionError::StoreInit(err));
        }
        Err(err) => {
            logger.warn(&err);
            writeln!(out, "Can't open password store: {err}")?;
            Err(err)
        }
    };

    let mut passman = PassMan::new(store, master_password, logger);
    let mut encryptor = Encryptor::new();
    encryptor.set_salt(&salt);

    let mut handler = CliHandler {
        passman: &mut passman,
        out,
    };
    handler
        .run(encryptor, &request.operation)
        .map_err(SessionError::Operation)
}

struct CliHandler<'a, W: Write> {
    passman: &'a mut PassMan,
    out: &'a mut W,
}

impl<W: Write> CliHandler<'_, W> {
    fn run(&mut self, encryptor: Encryptor, operation: &Operation) -> Result<()> {
        self.passman
            .set_default_encryptor(encryptor)
            .context("failed to configure encryptor")?;

        match operation {
            Operation::List => self.handle_list(),
            Operation::Set { key, value } => self.handle_set(key, value),
            Operation::Delete { key } => self.handle_delete(key),
        }
    }

    fn handle_list(&mut self) -> Result<()> {
        writeln!(self.out, "Listing mode: ")?;

        for handle in self.passman.list_handles()? {
            let Some(value) = self.passman.retrieve_password(&handle)? else {
                continue;
            };
            writeln!(self.out, "\"{handle}\": \"{value}\"")?;
        }

        Ok(())
    }

    fn handle_set(&mut self, key: &str, value: &str) -> Result<()> {
        writeln!(self.out, "Setting mode: ")?;
        self.print_old_value(key, false)?;

        self.passman
            .store_password(key, &SecureString::from(value))
            .with_context(|| format!("failed to store value for key \"{key}\""))?;
        writeln!(self.out, "  new value is set to: \"{value}\"")?;

        Ok(())
    }

    fn handle_delete(&mut self, key: &str) -> Result<()> {
        writeln!(self.out, "Deletion mode: ")?;
        if !self.print_old_value(key, true)? {
            return Err(OperationError::KeyNotFound(key.to_string()).into());
        }

        self.passman
            .remove_password(key)
            .with_context(|| format!("failed to delete key \"{key}\""))?;
        writeln!(self.out, "  deleted")?;

        Ok(())
    }

    /// Prints the current value of `key`; returns whether it exists.
    fn print_old_value(&mut self, key: &str, deleting: bool) -> Result<bool> {
        writeln!(self.out, "  retrieving old value")?;

        match self.passman.retrieve_password(key)? {
            Some(old) => {
                writeln!(self.out, "  old value: \"{old}\"")?;
                Ok(true)
            }
            None if deleting => {
                writeln!(self.out, "  value with key \"{key}\" does not exist, cannot delete")?;
                Ok(false)
            }
            None => {
                writeln!(self.out, "  value with key \"{key}\" does not exist")?;
                Ok(false)
            }
        }
    }
}
