//! Utility modules for filesystem, child processes, and logging.

pub mod fs;
pub mod jpeg;
pub mod keychain;
pub mod logging;
pub mod path;
