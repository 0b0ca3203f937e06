//! Command-line grammar.
//!
//! ```text
//! passman [-v] <empw.dat> <txnPassStore.dat> <passman.cnf> <-l | -s key value | -d key>
//! ```
//!
//! Flags and paths may be interleaved. `-s` and `-d` take their operands
//! from the following tokens verbatim, even when those look like flags.

use std::path::PathBuf;
use thiserror::Error;

pub const LIST_PARAM: &str = "-l";
pub const SET_PARAM: &str = "-s";
pub const DELETE_PARAM: &str = "-d";
pub const VERBOSE_PARAM: &str = "-v";

pub const USAGE: &str = "\
Use: [-v] <empw.dat> <txnPassStore.dat> <passman.cnf> <-l | -s key value | -d key>
     -v                  - verbose mode to log passman messages
     <empw.dat>          - path to empw.dat, master password file
     <txnPassStore.dat>  - path to txnPassStore password database
     <passman.cnf>       - path to passman configuration file
     -l                  - list all passwords
     -s <key> <value>    - modify key with value
     -d <key>            - delete key";

/// Malformed, conflicting or incomplete tokens. `position` is the index of
/// the offending token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("only one operation supported, the second operation was: {flag}")]
    SecondOperation { flag: String, position: usize },

    #[error("for -s, two arguments are needed")]
    MissingSetArguments { position: usize },

    #[error("for -d, an argument is needed")]
    MissingDeleteArgument { position: usize },

    #[error("parameter is unexpected: {parameter}")]
    UnexpectedParameter { parameter: String, position: usize },
}

/// Well-formed arguments that leave something required out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParametersError {
    #[error("nothing to do, no operation specified in the arguments")]
    NoOperation,

    #[error("master password file path not specified (usually empw.dat)")]
    MissingMasterPasswordPath,

    #[error("password store file path not specified (usually txnPassStore.dat)")]
    MissingStorePath,

    #[error("passman configuration file path not specified (usually passman.cnf)")]
    MissingConfigPath,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Parameters are invalid: {0}")]
    Parse(#[from] ParseError),

    #[error("Error in parameters: {0}")]
    Parameters(#[from] ParametersError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Unselected,
    List,
    Set,
    Delete,
}

/// Arguments as scanned, before required ones are checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub mode: Mode,
    pub master_password_path: Option<PathBuf>,
    pub password_store_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub key: Option<String>,
    pub value: Option<String>,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    List,
    Set { key: String, value: String },
    Delete { key: String },
}

/// A validated request: an operation and all three paths are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub operation: Operation,
    pub master_password_path: PathBuf,
    pub password_store_path: PathBuf,
    pub config_path: PathBuf,
    pub verbose: bool,
}

impl ParsedArgs {
    pub fn parse<I, S>(tokens: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let mut args = ParsedArgs::default();
        let mut positional = 0usize;
        let mut i = 0usize;

        while i < tokens.len() {
            let token = tokens[i].as_str();
            match token {
                LIST_PARAM => {
                    args.select(Mode::List, token, i)?;
                }
                SET_PARAM => {
                    args.select(Mode::Set, token, i)?;
                    let (Some(key), Some(value)) = (tokens.get(i + 1), tokens.get(i + 2)) else {
                        return Err(ParseError::MissingSetArguments { position: i });
                    };
                    args.key = Some(key.clone());
                    args.value = Some(value.clone());
                    i += 2;
                }
                DELETE_PARAM => {
                    args.select(Mode::Delete, token, i)?;
                    let Some(key) = tokens.get(i + 1) else {
                        return Err(ParseError::MissingDeleteArgument { position: i });
                    };
                    args.key = Some(key.clone());
                    i += 1;
                }
                VERBOSE_PARAM => args.verbose = true,
                path => {
                    let slot = match positional {
                        0 => &mut args.master_password_path,
                        1 => &mut args.password_store_path,
                        2 => &mut args.config_path,
                        _ => {
                            return Err(ParseError::UnexpectedParameter {
                                parameter: path.to_string(),
                                position: i,
                            })
                        }
                    };
                    *slot = Some(PathBuf::from(path));
                    positional += 1;
                }
            }
            i += 1;
        }

        Ok(args)
    }

    fn select(&mut self, mode: Mode, flag: &str, position: usize) -> Result<(), ParseError> {
        if self.mode != Mode::Unselected {
            return Err(ParseError::SecondOperation {
                flag: flag.to_string(),
                position,
            });
        }
        self.mode = mode;
        Ok(())
    }

    pub fn validate(self) -> Result<OperationRequest, ParametersError> {
        let operation = match self.mode {
            Mode::Unselected => return Err(ParametersError::NoOperation),
            Mode::List => Operation::List,
            Mode::Set => Operation::Set {
                key: self.key.unwrap_or_default(),
                value: self.value.unwrap_or_default(),
            },
            Mode::Delete => Operation::Delete {
                key: self.key.unwrap_or_default(),
            },
        };

        Ok(OperationRequest {
            operation,
            master_password_path: self
                .master_password_path
                .ok_or(ParametersError::MissingMasterPasswordPath)?,
            password_store_path: self
                .password_store_path
                .ok_or(ParametersError::MissingStorePath)?,
            config_path: self.config_path.ok_or(ParametersError::MissingConfigPath)?,
            verbose: self.verbose,
        })
    }
}

/// Scans and validates in one go.
pub fn parse_request<I, S>(tokens: I) -> Result<OperationRequest, UsageError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Ok(ParsedArgs::parse(tokens)?.validate()?)
}
