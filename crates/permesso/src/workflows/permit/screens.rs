//! Fixed screens shown by the bot and the inline keyboards attached to them.
//!
//! Everything here is transport-neutral: a [`Reply`] is HTML text plus an
//! optional grid of callback buttons, which the Telegram layer maps onto its
//! own markup types.

use super::code::year_prefix;
use super::format::{DisplayBlock, RULE_WIDTH};

const WIDE_RULE_WIDTH: usize = 30;

/// Callback payloads carried by inline buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTag {
    Check,
    Help,
    Home,
}

impl ButtonTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonTag::Check => "check",
            ButtonTag::Help => "help",
            ButtonTag::Home => "home",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "check" => Some(ButtonTag::Check),
            "help" => Some(ButtonTag::Help),
            "home" => Some(ButtonTag::Home),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub tag: ButtonTag,
}

/// Rows of buttons, one button per row in every layout the bot uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    fn column(buttons: &[(&'static str, ButtonTag)]) -> Self {
        Self {
            rows: buttons
                .iter()
                .map(|&(label, tag)| vec![Button { label, tag }])
                .collect(),
        }
    }

    pub fn main_menu() -> Self {
        Self::column(&[
            ("\u{1f50d}  Check Permit Status", ButtonTag::Check),
            ("\u{2139}\u{fe0f}  Help", ButtonTag::Help),
        ])
    }

    pub fn after_result() -> Self {
        Self::column(&[
            ("\u{1f504}  Check Another", ButtonTag::Check),
            ("\u{1f3e0}  Main Menu", ButtonTag::Home),
        ])
    }

    pub fn back_home() -> Self {
        Self::column(&[("\u{1f3e0}  Main Menu", ButtonTag::Home)])
    }

    pub fn check_now() -> Self {
        Self::column(&[("\u{1f50d}  Check Now", ButtonTag::Check)])
    }

    pub fn tags(&self) -> Vec<ButtonTag> {
        self.rows.iter().flatten().map(|button| button.tag).collect()
    }
}

/// Outbound message: HTML text plus optional buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

impl From<DisplayBlock> for Reply {
    fn from(value: DisplayBlock) -> Self {
        Reply::new(value.into_string())
    }
}

/// The three navigable screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    CheckPrompt,
    Help,
}

/// Whether a screen was asked for by a typed command or an inline button.
/// Buttons edit the message in place and get the longer copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Command,
    Button,
}

impl Screen {
    pub fn render(self, origin: Origin, year: i32) -> Reply {
        match (self, origin) {
            (Screen::Home, _) => home(year),
            (Screen::CheckPrompt, Origin::Command) => Reply::new(check_prompt(year, false)),
            (Screen::CheckPrompt, Origin::Button) => Reply::new(check_prompt(year, true)),
            (Screen::Help, Origin::Command) => short_help(),
            (Screen::Help, Origin::Button) => full_help(),
        }
    }
}

fn home(year: i32) -> Reply {
    let text = format!(
        "\u{1f1ee}\u{1f1f9}  <b>Permesso di Soggiorno Tracker</b>\n\
         {heavy}\n\
         \n\
         Welcome! I can check the status of your\n\
         <b>Italian residence permit</b> (Permesso di Soggiorno)\n\
         directly from the Polizia di Stato portal.\n\
         \n\
         \u{1f4cc} <b>How it works:</b>\n  \
         Just send me your permit code anytime!\n  \
         (e.g. <code>26BO123456</code> or just <code>123456</code>)\n\
         \n\
         \u{1f4a1} <i>Tip: If you send only 6 digits, the current\n\
         year (<code>{prefix}</code>) is added automatically.</i>\n\
         \n\
         {light}\n\
         \u{1f447}  <i>Choose an option or just type your code</i>",
        heavy = "\u{2501}".repeat(WIDE_RULE_WIDTH),
        light = "\u{2500}".repeat(WIDE_RULE_WIDTH),
        prefix = year_prefix(year),
    );
    Reply::new(text).with_keyboard(Keyboard::main_menu())
}

fn check_prompt(year: i32, with_tip: bool) -> String {
    let prefix = year_prefix(year);
    let mut text = format!(
        "\u{1f4dd}  <b>Enter Your Permit Code</b>\n\
         {rule}\n\
         \n\
         Please type or paste your permit code.\n\
         \n\
         \u{1f4cb}  <b>Accepted formats:</b>\n  \
         \u{2022}  Full code:  <code>{prefix}BO123456</code>  (10 chars)\n  \
         \u{2022}  Short code: <code>123456</code>  (6 digits)\n",
        rule = "\u{2500}".repeat(RULE_WIDTH),
    );
    if with_tip {
        text.push_str(&format!(
            "\n\u{1f4a1} <i>If you send 6 digits, the current year\n\
             prefix (<code>{prefix}</code>) is added automatically.</i>"
        ));
    }
    text
}

fn full_help() -> Reply {
    let heavy = "\u{2501}".repeat(RULE_WIDTH);
    let light = "\u{2500}".repeat(RULE_WIDTH);
    let text = format!(
        "\u{2139}\u{fe0f}  <b>Help &amp; Information</b>\n\
         {heavy}\n\
         \n\
         \u{1f4d6}  <b>What is this bot?</b>\n\
         This bot checks the status of your Italian\n\
         residence permit (Permesso di Soggiorno) by\n\
         querying the official Polizia di Stato portal.\n\
         \n\
         \u{1f4cb}  <b>Accepted Formats:</b>\n  \
         \u{2022}  <code>26BO123456</code>  \u{2014} full 10-char code\n  \
         \u{2022}  <code>123456</code>  \u{2014} 6 digits (year auto-added)\n\
         \n\
         \u{1f6a6}  <b>Status Meanings:</b>\n\
         \n\
         \u{1f7e2}  <b>Ready for Pickup</b>\n  \
         Your permit is ready! Book an appointment\n  \
         at your Questura to collect it.\n\
         \n\
         \u{1f7e1}  <b>Being Processed</b>\n  \
         Your application is in progress.\n  \
         Check back periodically.\n\
         \n\
         \u{1f534}  <b>Not Yet Started</b>\n  \
         No info found. Processing hasn't begun\n  \
         or the code might be wrong.\n\
         \n\
         {light}\n\
         \u{1f4ac}  <b>Commands:</b>\n  \
         /start  \u{2014} Main menu\n  \
         /check  \u{2014} Prompt for a permit code\n  \
         /help   \u{2014} This help message\n\
         \n\
         {light}\n"
    );
    Reply::new(text).with_keyboard(Keyboard::back_home())
}

fn short_help() -> Reply {
    let text = format!(
        "\u{2139}\u{fe0f}  <b>Help &amp; Information</b>\n\
         {heavy}\n\
         \n\
         \u{1f6a6}  <b>Status Meanings:</b>\n\
         \n\
         \u{1f7e2}  <b>Ready for Pickup</b> \u{2014} Book an appointment!\n\
         \u{1f7e1}  <b>Being Processed</b> \u{2014} Check back later.\n\
         \u{1f534}  <b>Not Yet Started</b> \u{2014} Processing hasn't begun.\n\
         \n\
         \u{1f4cb}  <b>Formats:</b>  <code>26BO123456</code> or <code>123456</code>\n\
         \n\
         \u{1f4ac}  <b>Commands:</b>  /start  /check  /help",
        heavy = "\u{2501}".repeat(RULE_WIDTH),
    );
    Reply::new(text).with_keyboard(Keyboard::check_now())
}

/// Sent for free text that is not shaped like a permit code.
pub fn rejection() -> Reply {
    Reply::new(
        "\u{1f914}  That doesn't look like a permit code.\n\n\
         Send a <b>6-digit</b> or <b>10-character</b> alphanumeric code,\n\
         or tap /start to see the menu.",
    )
}

/// Interim message shown while the portal is queried; edited into the result.
pub fn checking_placeholder() -> Reply {
    Reply::new("\u{23f3}  <i>Checking your permit status, please wait\u{2026}</i>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_offers_check_and_help() {
        let reply = Screen::Home.render(Origin::Command, 2026);
        assert!(reply.text.contains("Permesso di Soggiorno Tracker"));
        assert!(reply.text.contains("year (<code>26</code>)"));
        let keyboard = reply.keyboard.expect("menu keyboard");
        assert_eq!(keyboard.tags(), vec![ButtonTag::Check, ButtonTag::Help]);
        assert_eq!(keyboard.rows.len(), 2);
    }

    #[test]
    fn home_is_identical_for_command_and_button() {
        assert_eq!(
            Screen::Home.render(Origin::Command, 2026),
            Screen::Home.render(Origin::Button, 2026)
        );
    }

    #[test]
    fn check_prompt_uses_current_year_in_example() {
        let command = Screen::CheckPrompt.render(Origin::Command, 2027);
        assert!(command.text.contains("<code>27BO123456</code>  (10 chars)"));
        assert!(command.keyboard.is_none());
        assert!(!command.text.contains("added automatically"));

        let button = Screen::CheckPrompt.render(Origin::Button, 2027);
        assert!(button.text.contains("prefix (<code>27</code>) is added automatically"));
    }

    #[test]
    fn help_variants_carry_legend_and_navigation() {
        let long = Screen::Help.render(Origin::Button, 2026);
        assert!(long.text.contains("What is this bot?"));
        assert!(long.text.contains("/check  \u{2014} Prompt for a permit code"));
        assert_eq!(long.keyboard.expect("keyboard").tags(), vec![ButtonTag::Home]);

        let short = Screen::Help.render(Origin::Command, 2026);
        assert!(short.text.contains("<b>Commands:</b>  /start  /check  /help"));
        assert_eq!(short.keyboard.expect("keyboard").tags(), vec![ButtonTag::Check]);

        for reply in [long.text, short.text] {
            assert!(reply.contains("Ready for Pickup"));
            assert!(reply.contains("Being Processed"));
            assert!(reply.contains("Not Yet Started"));
        }
    }

    #[test]
    fn button_tags_round_trip_through_callback_data() {
        for tag in [ButtonTag::Check, ButtonTag::Help, ButtonTag::Home] {
            assert_eq!(ButtonTag::parse(tag.as_str()), Some(tag));
        }
        assert_eq!(ButtonTag::parse("HOME"), None);
    }
}
