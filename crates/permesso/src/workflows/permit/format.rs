use std::fmt;

use super::code::PermitCode;
use super::verdict::StatusVerdict;

pub(crate) const RULE_WIDTH: usize = 28;

/// HTML text ready to be sent with Telegram's HTML parse mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayBlock(String);

impl DisplayBlock {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DisplayBlock> for String {
    fn from(value: DisplayBlock) -> Self {
        value.0
    }
}

/// Render the result card for one lookup. The code line shows what the user
/// typed, not the normalized form.
pub fn format_result(code: &PermitCode, verdict: StatusVerdict) -> DisplayBlock {
    let banner = "=".repeat(RULE_WIDTH);
    let closing = "\u{2500}".repeat(RULE_WIDTH);
    let shown_code = html_escape::encode_text(code.raw());
    let title = verdict.title();

    DisplayBlock(format!(
        "{banner}\n\
         {emoji}  <b>{title}</b>\n\
         {banner}\n\
         \n\
         \u{1f4c4}  <b>Permit Code:</b>  <code>{shown_code}</code>\n\
         {dot}  <b>Status:</b>  {title}\n\
         \n\
         {description}\n\
         \n\
         {closing}",
        emoji = verdict.emoji(),
        dot = verdict.indicator(),
        description = verdict.description(),
    ))
}
