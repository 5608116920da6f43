mod runtime;
mod session;
mod shutdown;
mod startup;
mod types;

#[cfg(test)]
mod tests;

pub use runtime::install_signal_handlers;
pub use session::Session;
pub use startup::{apply_niceness, create_compositor, create_controller};
pub use types::{HardwareSession, ShutdownReason};
