pub mod env;
mod loader;

pub use env::{AppConfig, DirectoryConfig, SmtpConfig, WebContentConfig};
pub use loader::load_config;
