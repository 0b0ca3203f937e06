pub mod args;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod masterpw;
pub mod models;
pub mod passman;
pub mod store;

// Re-export commonly used types for tests and external use
pub use args::{parse_request, Operation, OperationRequest};
pub use error::SessionError;
pub use models::SecureString;
pub use passman::PassMan;
pub use store::PasswordStore;
