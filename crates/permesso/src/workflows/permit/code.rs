use chrono::{Datelike, Local};

const MIN_CODE_LEN: usize = 6;
const MAX_CODE_LEN: usize = 20;
const SHORT_CODE_LEN: usize = 6;

/// A permit code as typed by the user together with the canonical form sent
/// to the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitCode {
    raw: String,
    normalized: String,
}

impl PermitCode {
    /// Validate and normalize in one step using the current local year.
    pub fn parse(text: &str) -> Result<Self, InvalidCodeFormat> {
        Self::parse_for_year(text, current_year())
    }

    pub fn parse_for_year(text: &str, year: i32) -> Result<Self, InvalidCodeFormat> {
        if is_code(text) {
            Ok(normalize_for_year(text, year))
        } else {
            Err(InvalidCodeFormat {
                input: text.trim().to_string(),
            })
        }
    }

    /// Input as typed, minus surrounding whitespace.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Raised when free text does not have the shape of a permit code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a permit code: expected 6-20 letters or digits")]
pub struct InvalidCodeFormat {
    pub input: String,
}

/// True when the trimmed text is 6 to 20 ASCII letters or digits.
pub fn is_code(text: &str) -> bool {
    let trimmed = text.trim();
    (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&trimmed.len())
        && trimmed.chars().all(|ch| ch.is_ascii_alphanumeric())
}

/// Normalize using the current local year.
pub fn normalize(text: &str) -> PermitCode {
    normalize_for_year(text, current_year())
}

/// Trim and uppercase; six bare digits get the two-digit year prepended.
/// Anything else is passed through for the portal to judge.
pub fn normalize_for_year(text: &str, year: i32) -> PermitCode {
    let raw = text.trim().to_string();
    let upper = raw.to_uppercase();

    let normalized = if is_short_code(&upper) {
        format!("{}{upper}", year_prefix(year))
    } else {
        upper
    };

    PermitCode { raw, normalized }
}

/// Two-digit, zero-padded year prefix (2026 -> "26", 2105 -> "05").
pub fn year_prefix(year: i32) -> String {
    format!("{:02}", year.rem_euclid(100))
}

pub fn current_year() -> i32 {
    Local::now().year()
}

fn is_short_code(value: &str) -> bool {
    value.len() == SHORT_CODE_LEN && value.chars().all(|ch| ch.is_ascii_digit())
}
