pub mod calibration;
pub mod document;
pub mod motion;
pub mod telemetry;
pub mod user_account;

pub use document::{from_document, to_document, Document, DocumentError};
pub use user_account::UserAccount;
