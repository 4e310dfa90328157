//! Request locators and raw responses.

use equasis_core::TabKind;
use url::Url;

use crate::error::FetchError;

/// Login page, fetched first and then posted to.
pub const LOGIN_PATH: &str = "/EquasisWeb/authen/HomePage";
/// Company search.
pub const COMPANY_PATH: &str = "/EquasisWeb/restricted/CompanyInfo";
/// Ship info tab and ship name search.
pub const SHIP_INFO_PATH: &str = "/EquasisWeb/restricted/ShipInfo";
/// Inspections tab.
pub const SHIP_INSPECTION_PATH: &str = "/EquasisWeb/restricted/ShipInspection";
/// History tab.
pub const SHIP_HISTORY_PATH: &str = "/EquasisWeb/restricted/ShipHistory";

// ============================================================================
// Fetch Request
// ============================================================================

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// POST with a form body.
    Post,
}

/// What kind of page the request expects back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A public page; never checked for session expiry.
    Public,
    /// A page behind the login; a login form in its place means the
    /// session expired.
    Restricted,
}

/// One retrievable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL.
    pub path: String,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Form fields for POST requests, in order.
    pub form: Vec<(String, String)>,
    /// Expected response shape.
    pub shape: ResponseShape,
}

impl FetchRequest {
    /// Creates a restricted GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            form: Vec::new(),
            shape: ResponseShape::Restricted,
        }
    }

    /// Creates a restricted POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    /// Adds a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a form field.
    pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    /// Marks the request as not requiring a session.
    pub fn public(mut self) -> Self {
        self.shape = ResponseShape::Public;
        self
    }

    /// Returns the value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Resolves the full URL against a base.
    pub fn url(&self, base: &Url) -> Result<Url, FetchError> {
        let mut url = base.join(&self.path)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        Ok(url)
    }

    // ------------------------------------------------------------------------
    // Equasis endpoints
    // ------------------------------------------------------------------------

    /// The login page.
    pub fn login_page() -> Self {
        Self::get(LOGIN_PATH).with_query("fs", "HomePage").public()
    }

    /// The login form submission.
    pub fn login(username: &str, password: &str) -> Self {
        Self::post(LOGIN_PATH)
            .with_query("fs", "HomePage")
            .with_form("j_email", username)
            .with_form("j_password", password)
            .with_form("submit", "Ok")
            .public()
    }

    /// One vessel tab for an IMO number.
    pub fn ship_tab(tab: TabKind, imo: &str) -> Self {
        let path = match tab {
            TabKind::ShipInfo => SHIP_INFO_PATH,
            TabKind::Inspections => SHIP_INSPECTION_PATH,
            TabKind::ShipHistory => SHIP_HISTORY_PATH,
        };
        Self::get(path)
            .with_query("fs", "ShipInfo")
            .with_query("P_IMO", imo)
    }

    /// Company search listing the company's fleet.
    pub fn company_fleet(company: &str) -> Self {
        Self::post(COMPANY_PATH)
            .with_query("fs", "ShipInfo")
            .with_form("P_ENTCOMP", company)
            .with_form("submit", "Search")
    }

    /// Vessel search by name.
    pub fn ship_search(name: &str) -> Self {
        Self::post(SHIP_INFO_PATH)
            .with_query("fs", "ShipList")
            .with_form("P_ENTSHIP", name)
            .with_form("submit", "Search")
    }
}

// ============================================================================
// Raw Document
// ============================================================================

/// An unparsed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// HTTP status code.
    pub status: u16,
    /// Final URL after redirects.
    pub url: String,
    /// Response body.
    pub body: String,
}

impl RawDocument {
    /// Creates a document.
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Creates a 200 response.
    pub fn ok(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(200, url, body)
    }

    /// Returns true if the response is the login page.
    pub fn is_login_page(&self) -> bool {
        self.url.contains("/authen/") || self.body.contains("j_password")
    }

    /// Returns true if the response shows a successful login.
    pub fn shows_logged_in(&self) -> bool {
        self.url.contains("restricted") || self.body.contains("Welcome")
    }
}
