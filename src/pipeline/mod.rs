//! Pipeline stages for invoice conversion.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the renderer contract lives in a single place.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ launch ──▶ process ──▶ validate (PDF only)
//! (bytes)   (argv)     (spawn+IO)  (%PDF check)
//! ```
//!
//! 1. [`input`]    — load a payload from a file or stdin (CLI callers)
//! 2. [`launch`]   — build the fixed renderer command line
//! 3. [`process`]  — spawn the renderer, stream stdin while draining
//!    stdout/stderr, resolve on exit status, enforce the optional timeout
//! 4. [`validate`] — confirm PDF output decodes to a `%PDF` stream,
//!    stripping any preamble
//!
//! [`encode`] holds the Base64 helpers used by validation and persistence.

pub mod encode;
pub mod input;
pub mod launch;
pub mod process;
pub mod validate;
