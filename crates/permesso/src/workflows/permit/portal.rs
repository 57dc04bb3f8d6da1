//! HTTP access to the Polizia di Stato "stranieri" status page.
//!
//! The portal serves its verdict as a plain HTML page. It is picky about what
//! looks like a browser, so the client replays the header set of a desktop
//! Chrome session, the cookie-banner dismissal cookie, and a `Referer` pointing
//! at the same query. The site's certificate chain is routinely incomplete, so
//! certificate validation is off for this client only.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;

use super::classifier::StatusSource;
use super::code::PermitCode;
use crate::config::PortalConfig;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
     image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const CONSENT_COOKIE: &str = "cookieconsent_status=dismiss";

#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("portal request timed out")]
    Timeout,
    #[error("portal answered with HTTP {0}")]
    Status(u16),
    #[error("portal request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("unable to build portal client: {0}")]
    Client(#[source] reqwest::Error),
}

impl From<reqwest::Error> for PortalError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            PortalError::Timeout
        } else if let Some(status) = value.status() {
            PortalError::Status(status.as_u16())
        } else {
            PortalError::Request(value)
        }
    }
}

/// Query parameters the portal's search form submits.
pub fn query_params(code: &PermitCode) -> [(&'static str, &str); 4] {
    [
        ("lang", "italian"),
        ("mime", ""),
        ("pratica", code.normalized()),
        ("invia", "Invia"),
    ]
}

/// The URL a browser would have been on after submitting the form.
pub fn referer(base_url: &str, code: &PermitCode) -> String {
    format!(
        "{base_url}?lang=italian&mime=&pratica={}&invia=Invia",
        code.normalized()
    )
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let fixed: [(&'static str, &'static str); 12] = [
        ("sec-ch-ua", "\"Not(A:Brand\";v=\"8\", \"Chromium\";v=\"144\""),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", "\"Windows\""),
        ("accept-language", "en-US,en;q=0.9"),
        ("upgrade-insecure-requests", "1"),
        ("accept", ACCEPT),
        ("sec-fetch-site", "same-origin"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-user", "?1"),
        ("sec-fetch-dest", "document"),
        ("priority", "u=0, i"),
        ("cookie", CONSENT_COOKIE),
    ];
    for (name, value) in fixed {
        headers.insert(name, HeaderValue::from_static(value));
    }
    headers
}

/// Production [`StatusSource`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct PortalClient {
    client: Client,
    base_url: String,
}

impl PortalClient {
    pub fn new(config: &PortalConfig) -> Result<Self, PortalError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(browser_headers())
            .danger_accept_invalid_certs(true)
            .timeout(config.timeout)
            .build()
            .map_err(PortalError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl StatusSource for PortalClient {
    async fn fetch(&self, code: &PermitCode) -> Result<String, PortalError> {
        let referer = referer(&self.base_url, code);
        let response = self
            .client
            .get(&self.base_url)
            .query(&query_params(code))
            .header(header::REFERER, referer)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}
