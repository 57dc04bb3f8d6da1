use serde::Serialize;

/// Classified outcome of a single portal query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusVerdict {
    Ready,
    Processing,
    Unknown,
    #[serde(rename = "error")]
    QueryError,
}

impl StatusVerdict {
    pub const ALL: [StatusVerdict; 4] = [
        StatusVerdict::Ready,
        StatusVerdict::Processing,
        StatusVerdict::Unknown,
        StatusVerdict::QueryError,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusVerdict::Ready => "ready",
            StatusVerdict::Processing => "processing",
            StatusVerdict::Unknown => "unknown",
            StatusVerdict::QueryError => "error",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StatusVerdict::Ready => "Ready for Pickup!",
            StatusVerdict::Processing => "Being Processed",
            StatusVerdict::Unknown => "Not Yet Started",
            StatusVerdict::QueryError => "Connection Error",
        }
    }

    /// HTML fragment shown under the status line.
    pub fn description(self) -> &'static str {
        match self {
            StatusVerdict::Ready => {
                "Your permit is <b>ready</b>!\n\
                 You can now book an appointment to pick it up\n\
                 at your local Questura office."
            }
            StatusVerdict::Processing => {
                "Your application is currently <b>being processed</b>.\n\
                 The Questura has started working on your permit.\n\
                 Please check back later for updates."
            }
            StatusVerdict::Unknown => {
                "No information is available for this permit code.\n\
                 Processing has <b>not started yet</b>, or the code\n\
                 may be incorrect. Double-check and try again."
            }
            StatusVerdict::QueryError => {
                "Could not reach the Polizia di Stato server.\n\
                 Please try again in a few minutes."
            }
        }
    }

    /// [`Self::description`] without markup, for non-chat consumers.
    pub fn plain_description(self) -> String {
        self.description().replace("<b>", "").replace("</b>", "")
    }

    pub fn emoji(self) -> &'static str {
        match self {
            StatusVerdict::Ready => "\u{2705}",
            StatusVerdict::Processing => "\u{23f3}",
            StatusVerdict::Unknown => "\u{274c}",
            StatusVerdict::QueryError => "\u{26a0}\u{fe0f}",
        }
    }

    /// Colored dot used on the status line.
    pub fn indicator(self) -> &'static str {
        match self {
            StatusVerdict::Ready => "\u{1f7e2}",
            StatusVerdict::Processing => "\u{1f7e1}",
            StatusVerdict::Unknown => "\u{1f534}",
            StatusVerdict::QueryError => "\u{26a0}\u{fe0f}",
        }
    }
}
