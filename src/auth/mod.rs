//! Vendor account login
//!
//! The vendor's services accept OAuth tokens obtained by trading a single
//! sign-on service ticket. The ticket comes from the web sign-in form:
//!
//! 1. GET the sign-in page and scrape its `_csrf` token.
//! 2. POST the credentials with that token in the same cookie session.
//! 3. Scrape the service ticket from the embed URL in the response.
//! 4. POST the ticket to the token endpoint.
//!
//! Tokens are stored in the vendor's own SDK manager configuration file so
//! that the graphical SDK manager shares the session.

pub mod vendor;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{CiqwError, Result};

pub use vendor::VendorConfig;

/// Service the sign-in is performed for
pub const SSO_SERVICE: &str = "https://sso.garmin.com/sso/embed";

/// Sign-in form
pub const SSO_SIGNIN: &str = "https://sso.garmin.com/sso/signin";

/// OAuth token endpoint
pub const TOKEN_URL: &str = "https://services.garmin.com/api/oauth/token";

/// Client id the SDK manager registers as
pub const CLIENT_ID: &str = "CIQ_SDK_MANAGER";

/// Browser-like agent; the sign-in form rejects unknown clients
const USER_AGENT: &str = "Mozilla/5.0";

/// Tokens returned by the token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub refresh_token: String,
}

fn auth_failed(reason: impl ToString) -> CiqwError {
    CiqwError::AuthFailed {
        reason: reason.to_string(),
    }
}

/// CSRF token of the sign-in form
pub fn extract_csrf(html: &str) -> Result<Option<String>> {
    let input = Regex::new(r#"<input\b[^>]*\bname\s*=\s*["']_csrf["'][^>]*>"#).map_err(auth_failed)?;
    let value = Regex::new(r#"\bvalue\s*=\s*["']([^"']*)["']"#).map_err(auth_failed)?;

    Ok(input
        .find(html)
        .and_then(|tag| value.captures(tag.as_str()))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string()))
}

/// Service ticket from the sign-in response
///
/// The response embeds the ticket in a JavaScript string, so the URL may
/// have escaped slashes.
pub fn extract_ticket(html: &str) -> Result<Option<String>> {
    let ticket = Regex::new(r#"sso\\?/embed\?ticket=([^"'&\s\\]+)"#).map_err(auth_failed)?;
    Ok(ticket
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string()))
}

/// Client for the sign-in and token endpoints
pub struct SsoClient {
    client: reqwest::blocking::Client,
}

impl SsoClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(auth_failed)?;
        Ok(Self { client })
    }

    fn signin_url() -> String {
        format!("{SSO_SIGNIN}?service={SSO_SERVICE}")
    }

    fn text(response: reqwest::blocking::Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            return Err(auth_failed(format!("server returned {status}")));
        }
        response.text().map_err(auth_failed)
    }

    /// Sign in with credentials; returns the service ticket
    pub fn ticket(&self, username: &str, password: &str) -> Result<String> {
        let signin = Self::signin_url();

        info!("Getting login page");
        let form = Self::text(self.client.get(&signin).send().map_err(auth_failed)?)?;
        let csrf = extract_csrf(&form)?
            .ok_or_else(|| auth_failed("sign-in page has no CSRF token"))?;

        info!("Sending login");
        let response = self
            .client
            .post(&signin)
            .header(reqwest::header::REFERER, signin.as_str())
            .form(&[
                ("username", username),
                ("password", password),
                ("_csrf", csrf.as_str()),
                ("embed", "true"),
            ])
            .send()
            .map_err(auth_failed)?;
        let body = Self::text(response)?;

        let ticket = extract_ticket(&body)?
            .ok_or_else(|| auth_failed("no service ticket in response, check your credentials"))?;
        info!("Received ticket");
        Ok(ticket)
    }

    /// Trade a service ticket for OAuth tokens
    pub fn exchange(&self, ticket: &str) -> Result<OAuthToken> {
        debug!("Exchanging service ticket at {}", TOKEN_URL);
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "service_ticket"),
                ("client_id", CLIENT_ID),
                ("service_ticket", ticket),
                ("service_url", SSO_SERVICE),
            ])
            .send()
            .map_err(auth_failed)?;
        let body = Self::text(response)?;

        serde_json::from_str(&body).map_err(|e| auth_failed(format!("invalid token response: {e}")))
    }

    /// Sign in and obtain tokens
    pub fn login(&self, username: &str, password: &str) -> Result<OAuthToken> {
        let ticket = self.ticket(username, password)?;
        self.exchange(&ticket)
    }
}
