use std::fmt;

use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter used in verbose mode.
pub const LOG_FILTER_ENV_VAR: &str = "PASSMAN_LOG";

/// Diagnostic sink handed to every component that wants to talk.
///
/// Verbose loggers own their own dispatcher; nothing is installed globally,
/// so two loggers in one process never see each other's events.
#[derive(Clone, Default)]
pub struct Logger {
    dispatch: Option<Dispatch>,
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        if verbose {
            Self::with_writer(std::io::stdout)
        } else {
            Self::silent()
        }
    }

    pub fn silent() -> Self {
        Self { dispatch: None }
    }

    pub fn with_writer<W>(make_writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = EnvFilter::try_from_env(LOG_FILTER_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new("debug"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(make_writer)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();

        Self {
            dispatch: Some(Dispatch::new(subscriber)),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.dispatch.is_some()
    }

    pub fn debug(&self, message: impl fmt::Display) {
        if let Some(dispatch) = &self.dispatch {
            tracing::dispatcher::with_default(dispatch, || tracing::debug!("{message}"));
        }
    }

    pub fn info(&self, message: impl fmt::Display) {
        if let Some(dispatch) = &self.dispatch {
            tracing::dispatcher::with_default(dispatch, || tracing::info!("{message}"));
        }
    }

    pub fn warn(&self, message: impl fmt::Display) {
        if let Some(dispatch) = &self.dispatch {
            tracing::dispatcher::with_default(dispatch, || tracing::warn!("{message}"));
        }
    }

    pub fn error(&self, message: impl fmt::Display) {
        if let Some(dispatch) = &self.dispatch {
            tracing::dispatcher::with_default(dispatch, || tracing::error!("{message}"));
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("verbose", &self.is_verbose())
            .finish()
    }
}
