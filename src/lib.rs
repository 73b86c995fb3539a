//! contui stylesheet tooling.
//!
//! Re-exports the [`tcss`] syntax layer and adds the pieces an application
//! around it needs: a file logger and a crate-level error type.
//!
//! ```rust
//! use contui::tcss::parser::parse_stylesheet;
//!
//! let sheet = parse_stylesheet("Screen { layout: vertical; }", None);
//! assert_eq!(sheet.len(), 1);
//! ```

pub mod error;
mod log_init;

pub use error::{ContuiError, Result};
pub use log;
pub use log_init::{init_logger, init_logger_with_level};
pub use tcss;
