//! Single-file transfer: retry loop, content validation and installation.

pub mod client;
pub mod installer;
pub mod retry;
pub mod validator;

pub use client::{TransferClient, TransferOutcome};
pub use installer::{install, install_blocking, install_with};
pub use retry::{RetryConfig, with_retry};
pub use validator::validate;
