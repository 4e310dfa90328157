//! Host APIs the session gateway talks through.
//!
//! - [`http`] - HTTP transport (reqwest, cookie jar, browser headers)
//! - [`sleep`] - Suspension for backoff and pacing
//! - [`memory`] - Scripted in-memory doubles

pub mod http;
pub mod memory;
pub mod sleep;

pub use http::{ReqwestTransport, Transport};
pub use memory::{RecordingSleeper, ScriptedTransport};
pub use sleep::{Sleeper, TokioSleeper};
