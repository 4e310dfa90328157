//! Scripted in-memory host doubles.
//!
//! [`ScriptedTransport`] replays queued responses in order and records every
//! request it sees; [`RecordingSleeper`] records waits without suspending.
//! Together they let the whole collection path run offline and instantly.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::http::Transport;
use super::sleep::Sleeper;
use crate::error::FetchError;
use crate::request::{FetchRequest, RawDocument};

/// Base URL reported in scripted responses.
const SCRIPTED_BASE: &str = "https://www.equasis.org";

// ============================================================================
// Scripted Transport
// ============================================================================

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Result<RawDocument, FetchError>>,
    requests: Vec<FetchRequest>,
    resets: usize,
}

/// Transport that replays a queue of responses.
///
/// Once the queue is empty every call fails with
/// [`FetchError::Unexpected`].
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
}

impl ScriptedTransport {
    /// Creates an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response or error.
    pub fn push(&self, response: Result<RawDocument, FetchError>) -> &Self {
        if let Ok(mut script) = self.script.lock() {
            script.responses.push_back(response);
        }
        self
    }

    /// Queues a 200 response for a restricted page.
    pub fn push_page(&self, path: &str, body: impl Into<String>) -> &Self {
        self.push(Ok(RawDocument::ok(format!("{SCRIPTED_BASE}{path}"), body)))
    }

    /// Queues a response with the given status.
    pub fn push_status(&self, status: u16) -> &Self {
        self.push(Ok(RawDocument::new(status, SCRIPTED_BASE, String::new())))
    }

    /// Queues an error.
    pub fn push_error(&self, error: FetchError) -> &Self {
        self.push(Err(error))
    }

    /// Queues the two exchanges of a successful login.
    pub fn push_login_ok(&self) -> &Self {
        self.push_page(
            "/EquasisWeb/authen/HomePage",
            "<form><input name=\"j_email\"><input name=\"j_password\"></form>",
        )
        .push_page("/EquasisWeb/restricted/HomePage", "<p>Welcome to Equasis</p>")
    }

    /// Queues a login whose form submission is rejected.
    pub fn push_login_rejected(&self) -> &Self {
        let form = "<form><input name=\"j_email\"><input name=\"j_password\"></form>";
        self.push_page("/EquasisWeb/authen/HomePage", form)
            .push_page("/EquasisWeb/authen/HomePage", form)
    }

    /// Queues the login page served in place of a restricted document.
    pub fn push_expired(&self) -> &Self {
        self.push_page(
            "/EquasisWeb/authen/HomePage",
            "<form><input name=\"j_password\"></form>",
        )
    }

    /// Returns every request executed so far.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.script
            .lock()
            .map(|s| s.requests.clone())
            .unwrap_or_default()
    }

    /// Returns the number of requests executed so far.
    pub fn request_count(&self) -> usize {
        self.script.lock().map(|s| s.requests.len()).unwrap_or(0)
    }

    /// Returns the number of queued responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.responses.len()).unwrap_or(0)
    }

    /// Returns how many times the session was reset.
    pub fn resets(&self) -> usize {
        self.script.lock().map(|s| s.resets).unwrap_or(0)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &FetchRequest) -> Result<RawDocument, FetchError> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| FetchError::Unexpected("script lock poisoned".to_string()))?;
        script.requests.push(request.clone());
        script.responses.pop_front().unwrap_or_else(|| {
            Err(FetchError::Unexpected(format!(
                "no scripted response for {}",
                request.path
            )))
        })
    }

    fn reset(&self) -> Result<(), FetchError> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| FetchError::Unexpected("script lock poisoned".to_string()))?;
        script.resets += 1;
        Ok(())
    }
}

// ============================================================================
// Recording Sleeper
// ============================================================================

/// Sleeper that records requested waits and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Creates a sleeper with no recorded waits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded wait, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Returns the sum of recorded waits.
    pub fn total(&self) -> Duration {
        self.sleeps().iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut sleeps) = self.sleeps.lock() {
            sleeps.push(duration);
        }
    }
}
