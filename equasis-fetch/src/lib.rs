// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Equasis Fetch
//!
//! Authenticated document fetching for the Equasis client.
//!
//! ## Retry Policy
//!
//! [`RetryPolicy`] is a pure decision function: given the attempt number and
//! the [`ErrorClass`](equasis_core::ErrorClass) of a failure, it decides
//! whether to retry and how long to wait. It never sleeps itself.
//!
//! ## Session Gateway
//!
//! [`SessionGateway`] owns the authenticated session. It logs in lazily,
//! wraps every request in the retry loop, and re-authenticates exactly once
//! when a response shows the session has expired.
//!
//! ## Host APIs
//!
//! The [`host`] module holds the seams the gateway talks through:
//!
//! - [`host::http`] - [`Transport`] trait and the reqwest implementation
//! - [`host::sleep`] - [`Sleeper`] trait and the tokio implementation
//! - [`host::memory`] - Scripted in-memory doubles for offline runs and tests
//!
//! ## Example
//!
//! ```ignore
//! use equasis_fetch::{Credentials, FetchContext, FetchRequest, SessionGateway};
//!
//! let ctx = FetchContext::new()?;
//! let mut gateway = SessionGateway::new(ctx, Credentials::new("me@example.com", "secret"));
//! let doc = gateway.fetch(&FetchRequest::ship_tab(TabKind::ShipInfo, "9074729")).await?;
//! ```

pub mod context;
pub mod error;
pub mod host;
pub mod request;
pub mod retry;
pub mod session;

// Errors
pub use error::FetchError;

// Host APIs
pub use host::{
    http::{ReqwestTransport, Transport},
    memory::{RecordingSleeper, ScriptedTransport},
    sleep::{Sleeper, TokioSleeper},
};

// Requests, policy, session
pub use context::{DEFAULT_BASE_URL, FetchContext, FetchContextBuilder, FetchSettings};
pub use request::{FetchRequest, Method, RawDocument, ResponseShape};
pub use retry::{RetryDecision, RetryPolicy};
pub use session::{Credentials, SessionGateway, SessionState};
