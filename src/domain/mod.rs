pub mod message;
pub mod types;

pub use message::NotificationRequest;
pub use types::{format_float, ClassificationResult, NormalizedDocument, Verdict};
