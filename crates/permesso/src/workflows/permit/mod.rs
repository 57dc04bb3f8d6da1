//! Residence-permit status lookup: code normalization, portal query,
//! page classification, reply rendering and per-event routing.

pub mod classifier;
pub mod code;
pub mod format;
pub mod portal;
pub mod router;
pub mod screens;
pub mod verdict;

pub use classifier::{classify_body, StatusClassifier, StatusSource, CLASSIFICATION_RULES};
pub use code::{
    current_year, is_code, normalize, normalize_for_year, year_prefix, InvalidCodeFormat,
    PermitCode,
};
pub use format::{format_result, DisplayBlock};
pub use portal::{PortalClient, PortalError};
pub use router::{route, route_now, ConversationEvent, PermitStatusService, Route};
pub use screens::{
    checking_placeholder, rejection, Button, ButtonTag, Keyboard, Origin, Reply, Screen,
};
pub use verdict::StatusVerdict;
