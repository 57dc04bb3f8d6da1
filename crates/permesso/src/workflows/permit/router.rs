use tracing::info;

use super::classifier::{StatusClassifier, StatusSource};
use super::code::{current_year, is_code, normalize_for_year, PermitCode};
use super::format::format_result;
use super::screens::{rejection, ButtonTag, Keyboard, Origin, Reply, Screen};
use super::verdict::StatusVerdict;

/// One inbound user event, stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationEvent {
    /// Command name without the leading slash or `@bot` suffix.
    Command(String),
    /// Command suffixed with another bot's username.
    ForeignCommand,
    /// Callback data attached to an inline button.
    ButtonPress(String),
    FreeText(String),
}

impl ConversationEvent {
    /// Split a raw chat message into a command or free text.
    ///
    /// With `bot_username` set to `PermessoBot`, `/Start@PermessoBot now`
    /// becomes `Command("start")` while `/start@OtherBot` is a
    /// [`ForeignCommand`](Self::ForeignCommand). Usernames compare
    /// case-insensitively. Anything not starting with `/` is free text.
    pub fn from_message(text: &str, bot_username: &str) -> Self {
        let trimmed = text.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return ConversationEvent::FreeText(trimmed.to_string());
        };

        let word = rest.split_whitespace().next().unwrap_or_default();
        match word.split_once('@') {
            Some((_, addressee)) if !addressee.eq_ignore_ascii_case(bot_username) => {
                ConversationEvent::ForeignCommand
            }
            Some((name, _)) => ConversationEvent::Command(name.to_ascii_lowercase()),
            None => ConversationEvent::Command(word.to_ascii_lowercase()),
        }
    }
}

/// What the transport should do with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Show a fixed screen or the rejection message.
    Reply(Reply),
    /// Send the placeholder, look the code up, then replace the placeholder.
    Resolve(PermitCode),
    /// Unrecognized command or button; nothing is sent.
    Ignore,
}

/// Decide the response for a single event. No state is read or kept; the
/// year only feeds the prompt copy and short-code prefix.
pub fn route(event: &ConversationEvent, year: i32) -> Route {
    match event {
        ConversationEvent::Command(name) => match name.as_str() {
            "start" | "home" => screen(Screen::Home, Origin::Command, year),
            "check" => screen(Screen::CheckPrompt, Origin::Command, year),
            "help" => screen(Screen::Help, Origin::Command, year),
            _ => Route::Ignore,
        },
        ConversationEvent::ForeignCommand => Route::Ignore,
        ConversationEvent::ButtonPress(tag) => match ButtonTag::parse(tag) {
            Some(ButtonTag::Home) => screen(Screen::Home, Origin::Button, year),
            Some(ButtonTag::Check) => screen(Screen::CheckPrompt, Origin::Button, year),
            Some(ButtonTag::Help) => screen(Screen::Help, Origin::Button, year),
            None => Route::Ignore,
        },
        ConversationEvent::FreeText(text) if is_code(text) => {
            Route::Resolve(normalize_for_year(text, year))
        }
        ConversationEvent::FreeText(_) => Route::Reply(rejection()),
    }
}

/// [`route`] evaluated against today's date.
pub fn route_now(event: &ConversationEvent) -> Route {
    route(event, current_year())
}

fn screen(screen: Screen, origin: Origin, year: i32) -> Route {
    Route::Reply(screen.render(origin, year))
}

/// Performs the `Resolve` step: one portal query, one rendered card.
#[derive(Debug, Clone)]
pub struct PermitStatusService<S> {
    classifier: StatusClassifier<S>,
}

impl<S> PermitStatusService<S>
where
    S: StatusSource,
{
    pub fn new(source: S) -> Self {
        Self {
            classifier: StatusClassifier::new(source),
        }
    }

    pub fn classifier(&self) -> &StatusClassifier<S> {
        &self.classifier
    }

    pub async fn lookup(&self, code: &PermitCode) -> StatusVerdict {
        let verdict = self.classifier.classify(code).await;
        info!(
            code = code.normalized(),
            status = verdict.label(),
            "permit lookup completed"
        );
        verdict
    }

    pub async fn resolve(&self, code: &PermitCode) -> Reply {
        let verdict = self.lookup(code).await;
        Reply::from(format_result(code, verdict)).with_keyboard(Keyboard::after_result())
    }
}
