use async_trait::async_trait;
use tracing::{debug, error};

use super::code::PermitCode;
use super::portal::PortalError;
use super::verdict::StatusVerdict;

/// Page vocabulary checked in order; the first token found decides.
/// "la consegna" must stay ahead of "in trattazione" because ready pages
/// can still mention the processing phase.
pub const CLASSIFICATION_RULES: &[(&str, StatusVerdict)] = &[
    ("la consegna", StatusVerdict::Ready),
    ("in trattazione", StatusVerdict::Processing),
];

/// Anything able to fetch the status page for a permit code.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, code: &PermitCode) -> Result<String, PortalError>;
}

#[async_trait]
impl<S> StatusSource for std::sync::Arc<S>
where
    S: StatusSource + ?Sized,
{
    async fn fetch(&self, code: &PermitCode) -> Result<String, PortalError> {
        (**self).fetch(code).await
    }
}

/// Map a fetched page to a verdict. Never yields `QueryError`.
pub fn classify_body(body: &str) -> StatusVerdict {
    let body = body.to_lowercase();
    CLASSIFICATION_RULES
        .iter()
        .find(|(token, _)| body.contains(token))
        .map(|(_, verdict)| *verdict)
        .unwrap_or(StatusVerdict::Unknown)
}

/// One query per call, no retries and no caching.
#[derive(Debug, Clone)]
pub struct StatusClassifier<S> {
    source: S,
}

impl<S> StatusClassifier<S>
where
    S: StatusSource,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn classify(&self, code: &PermitCode) -> StatusVerdict {
        match self.source.fetch(code).await {
            Ok(body) => {
                let verdict = classify_body(&body);
                debug!(code = code.normalized(), status = verdict.label(), "permit classified");
                verdict
            }
            Err(err) => {
                error!(code = code.normalized(), error = %err, "permit status request failed");
                StatusVerdict::QueryError
            }
        }
    }
}
