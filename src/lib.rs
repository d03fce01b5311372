//! gotint - colorized output for `go test`
//!
//! gotint wraps `go test`, switches it into `-json` mode, and re-emits each
//! event's output text wrapped in ANSI color sequences while the run is
//! still in progress. Lines are colored by a fixed prefix table plus sticky
//! per-test state, so a log line printed two lines after a `--- FAIL:`
//! report comes out red too. Benchmark events, which test2json attributes
//! to the wrong (or no) test, are repaired on the fly.
//!
//! # Architecture
//!
//! - [`event`]: typed events and the streaming JSON decoder
//! - [`colorize`]: the stateful classification and coloring engine
//! - [`runner`]: spawning `go test` and wiring its output into the engine
//! - [`error`]: error types and Result alias
//!
//! # Example
//!
//! ```no_run
//! use gotint::colorize::Colorizer;
//!
//! # fn main() -> gotint::Result<()> {
//! let stream = br#"{"Action":"output","Package":"example.com/pkg","Test":"TestX","Output":"--- PASS: TestX (0.00s)\n"}"#;
//! let mut colored = Vec::new();
//! let mut colorizer = Colorizer::new();
//! colorizer.process(&stream[..], &mut colored)?;
//! # Ok(())
//! # }
//! ```

pub mod colorize;
pub mod error;
pub mod event;
pub mod runner;

pub use error::{Error, Result};
