//! The session gateway.
//!
//! [`SessionGateway`] is the only owner of the authenticated session. It is
//! created once by the calling layer and passed by `&mut` into collectors;
//! there is no ambient session state anywhere else.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::context::{FetchContext, FetchSettings};
use crate::error::FetchError;
use crate::request::{FetchRequest, RawDocument, ResponseShape};

// ============================================================================
// Credentials
// ============================================================================

/// Username and password for the portal.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Session State
// ============================================================================

/// Authentication state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No login performed yet, or logged out.
    Unauthenticated,
    /// Logged in.
    Authenticated,
    /// The portal served its login page in place of a restricted document.
    Expired,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticated => "authenticated",
            Self::Expired => "expired",
        })
    }
}

// ============================================================================
// Session Gateway
// ============================================================================

/// Owns the authenticated session and fetches documents through it.
pub struct SessionGateway {
    context: FetchContext,
    credentials: Credentials,
    state: SessionState,
    requests_sent: u32,
}

impl SessionGateway {
    /// Creates a gateway. No request is made until the first fetch.
    pub fn new(context: FetchContext, credentials: Credentials) -> Self {
        Self {
            context,
            credentials,
            state: SessionState::Unauthenticated,
            requests_sent: 0,
        }
    }

    /// Returns the session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the number of outbound requests made so far, retries and
    /// logins included.
    pub fn requests_sent(&self) -> u32 {
        self.requests_sent
    }

    /// Returns the fetch settings.
    pub fn settings(&self) -> &FetchSettings {
        &self.context.settings
    }

    /// Waits through the context's sleeper.
    pub async fn pause(&self, duration: Duration) {
        self.context.sleeper.sleep(duration).await;
    }

    /// Logs in, replacing any existing session.
    ///
    /// A rejected login is terminal and never retried.
    #[instrument(skip(self), fields(user = %self.credentials.username))]
    pub async fn login(&mut self) -> Result<(), FetchError> {
        debug!(state = %self.state, "Logging in");

        self.execute(&FetchRequest::login_page()).await?;
        let submit = FetchRequest::login(self.credentials.username(), self.credentials.password());
        let response = self.execute(&submit).await?;

        if response.shows_logged_in() {
            self.state = SessionState::Authenticated;
            info!("Logged in to Equasis");
            Ok(())
        } else {
            self.state = SessionState::Unauthenticated;
            warn!("Login rejected");
            Err(FetchError::Authentication(
                "login rejected, check credentials".to_string(),
            ))
        }
    }

    /// Drops the session. The next fetch logs in again.
    pub fn logout(&mut self) -> Result<(), FetchError> {
        self.context.transport.reset()?;
        self.state = SessionState::Unauthenticated;
        debug!("Logged out");
        Ok(())
    }

    /// Fetches one document, logging in first if needed.
    ///
    /// If the portal answers a restricted request with its login page, the
    /// gateway logs in once more and replays the request once. A second
    /// expiry within the same call fails with
    /// [`FetchError::Authentication`].
    #[instrument(skip(self, request), fields(path = %request.path))]
    pub async fn fetch(&mut self, request: &FetchRequest) -> Result<RawDocument, FetchError> {
        if self.state != SessionState::Authenticated {
            self.login().await?;
        }

        let document = self.execute(request).await?;
        if !self.is_expired(request, &document) {
            return Ok(document);
        }

        self.state = SessionState::Expired;
        warn!(state = %self.state, "Session expired, re-authenticating");
        self.login().await?;

        let document = self.execute(request).await?;
        if self.is_expired(request, &document) {
            self.state = SessionState::Expired;
            return Err(FetchError::Authentication(
                "session expired again after re-authentication".to_string(),
            ));
        }
        Ok(document)
    }

    fn is_expired(&self, request: &FetchRequest, document: &RawDocument) -> bool {
        request.shape == ResponseShape::Restricted && document.is_login_page()
    }

    /// Runs one request inside the retry loop.
    async fn execute(&mut self, request: &FetchRequest) -> Result<RawDocument, FetchError> {
        let mut attempt: u32 = 1;

        loop {
            self.requests_sent += 1;
            debug!(attempt, path = %request.path, "Sending request");

            let result = self
                .context
                .transport
                .execute(request)
                .await
                .and_then(|doc| match FetchError::from_status(doc.status) {
                    Some(err) => Err(err),
                    None => Ok(doc),
                });

            let err = match result {
                Ok(doc) => return Ok(doc),
                Err(err) => err,
            };

            let decision = self.context.settings.retry.decide(attempt, err.class());
            let Some(delay) = decision.delay() else {
                if err.class().is_retryable() {
                    warn!(attempt, error = %err, "Retries exhausted");
                } else {
                    debug!(attempt, error = %err, class = %err.class(), "Not retrying");
                }
                return Err(err);
            };

            warn!(
                attempt,
                error = %err,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Request failed, retrying"
            );
            self.context.sleeper.sleep(delay).await;
            attempt += 1;
        }
    }
}

impl fmt::Debug for SessionGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGateway")
            .field("credentials", &self.credentials)
            .field("state", &self.state)
            .field("requests_sent", &self.requests_sent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::host::memory::{RecordingSleeper, ScriptedTransport};
    use crate::retry::RetryPolicy;
    use equasis_core::TabKind;

    const SHIP_PATH: &str = "/EquasisWeb/restricted/ShipInfo";

    fn gateway(
        transport: &Arc<ScriptedTransport>,
        sleeper: &Arc<RecordingSleeper>,
    ) -> SessionGateway {
        let settings =
            FetchSettings::default().with_retry(RetryPolicy::default().with_jitter(0.0));
        let ctx = FetchContext::builder()
            .transport(transport.clone())
            .sleeper(sleeper.clone())
            .settings(settings)
            .build()
            .unwrap();
        SessionGateway::new(ctx, Credentials::new("me@example.com", "secret"))
    }

    fn ship_request() -> FetchRequest {
        FetchRequest::ship_tab(TabKind::ShipInfo, "9074729")
    }

    #[tokio::test]
    async fn test_logs_in_lazily_once() {
        let transport = Arc::new(ScriptedTransport::new());
        let sleeper = Arc::new(RecordingSleeper::new());
        transport
            .push_login_ok()
            .push_page(SHIP_PATH, "first")
            .push_page(SHIP_PATH, "second");

        let mut gw = gateway(&transport, &sleeper);
        assert_eq!(gw.state(), SessionState::Unauthenticated);

        assert_eq!(gw.fetch(&ship_request()).await.unwrap().body, "first");
        assert_eq!(gw.fetch(&ship_request()).await.unwrap().body, "second");

        assert_eq!(gw.state(), SessionState::Authenticated);
        assert_eq!(gw.requests_sent(), 4);
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_login_is_terminal() {
        let transport = Arc::new(ScriptedTransport::new());
        let sleeper = Arc::new(RecordingSleeper::new());
        transport.push_login_rejected();

        let mut gw = gateway(&transport, &sleeper);
        let err = gw.fetch(&ship_request()).await.unwrap_err();

        assert!(matches!(err, FetchError::Authentication(_)));
        assert_eq!(gw.state(), SessionState::Unauthenticated);
        assert_eq!(transport.request_count(), 2);
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_after_four_attempts() {
        let transport = Arc::new(ScriptedTransport::new());
        let sleeper = Arc::new(RecordingSleeper::new());
        transport.push_login_ok();
        for _ in 0..4 {
            transport.push_status(503);
        }

        let mut gw = gateway(&transport, &sleeper);
        let err = gw.fetch(&ship_request()).await.unwrap_err();

        assert_eq!(err, FetchError::Server { status: 503 });
        assert_eq!(gw.requests_sent(), 2 + 4);
        assert_eq!(
            sleeper.sleeps(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    #[tokio::test]
    async fn test_transient_error_then_success() {
        let transport = Arc::new(ScriptedTransport::new());
        let sleeper = Arc::new(RecordingSleeper::new());
        transport
            .push_login_ok()
            .push_error(FetchError::Network("connection reset".to_string()))
            .push_page(SHIP_PATH, "ok");

        let mut gw = gateway(&transport, &sleeper);
        let doc = gw.fetch(&ship_request()).await.unwrap();

        assert_eq!(doc.body, "ok");
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(1)]);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::new());
        let sleeper = Arc::new(RecordingSleeper::new());
        transport.push_login_ok().push_status(404);

        let mut gw = gateway(&transport, &sleeper);
        let err = gw.fetch(&ship_request()).await.unwrap_err();

        assert!(matches!(err, FetchError::NotFound(_)));
        assert_eq!(transport.request_count(), 3);
        assert!(sleeper.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_restricted_fetch_is_not_retried() {
        for status in [401, 403] {
            let transport = Arc::new(ScriptedTransport::new());
            let sleeper = Arc::new(RecordingSleeper::new());
            transport.push_login_ok().push_status(status);

            let mut gw = gateway(&transport, &sleeper);
            gw.login().await.unwrap();
            let before = gw.requests_sent();
            let err = gw.fetch(&ship_request()).await.unwrap_err();

            assert!(matches!(err, FetchError::Authentication(_)), "status {status}");
            assert_eq!(gw.requests_sent() - before, 1, "status {status}");
            assert_eq!(transport.remaining(), 0);
            assert!(sleeper.sleeps().is_empty(), "status {status}");
        }
    }

    #[tokio::test]
    async fn test_reauthenticates_once_on_expiry() {
        let transport = Arc::new(ScriptedTransport::new());
        let sleeper = Arc::new(RecordingSleeper::new());
        transport
            .push_login_ok()
            .push_expired()
            .push_login_ok()
            .push_page(SHIP_PATH, "replayed");

        let mut gw = gateway(&transport, &sleeper);
        let doc = gw.fetch(&ship_request()).await.unwrap();

        assert_eq!(doc.body, "replayed");
        assert_eq!(gw.state(), SessionState::Authenticated);
        assert_eq!(transport.request_count(), 6);
        assert_eq!(transport.requests()[5], ship_request());
    }

    #[tokio::test]
    async fn test_second_expiry_is_authentication_failure() {
        let transport = Arc::new(ScriptedTransport::new());
        let sleeper = Arc::new(RecordingSleeper::new());
        transport
            .push_login_ok()
            .push_expired()
            .push_login_ok()
            .push_expired();

        let mut gw = gateway(&transport, &sleeper);
        let err = gw.fetch(&ship_request()).await.unwrap_err();

        assert!(matches!(err, FetchError::Authentication(_)));
        assert_eq!(gw.state(), SessionState::Expired);
        assert_eq!(transport.remaining(), 0);
    }

    #[tokio::test]
    async fn test_logout_resets_session() {
        let transport = Arc::new(ScriptedTransport::new());
        let sleeper = Arc::new(RecordingSleeper::new());
        transport
            .push_login_ok()
            .push_page(SHIP_PATH, "a")
            .push_login_ok()
            .push_page(SHIP_PATH, "b");

        let mut gw = gateway(&transport, &sleeper);
        gw.fetch(&ship_request()).await.unwrap();
        gw.logout().unwrap();
        assert_eq!(gw.state(), SessionState::Unauthenticated);
        assert_eq!(transport.resets(), 1);

        assert_eq!(gw.fetch(&ship_request()).await.unwrap().body, "b");
        assert_eq!(transport.request_count(), 6);
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("me@example.com", "hunter2");
        let debug = format!("{creds:?}");
        assert!(debug.contains("me@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
