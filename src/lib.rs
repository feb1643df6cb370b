//! Terminal markup compiler.
//!
//! Re-exports the [`fmtcodes`] crate and adds a file logger for binaries.
//!
//! ```
//! let out = fmtcodes_rs::render("[b](hello) world");
//! assert_eq!(fmtcodes_rs::strip_escaped(&out).text, "hello world");
//! ```

pub mod log_init;

pub use fmtcodes::*;
