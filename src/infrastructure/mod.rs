pub mod directories;
pub mod logging;
pub mod notifier;
