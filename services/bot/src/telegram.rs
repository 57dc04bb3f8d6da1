//! Telegram transport: turns updates into [`ConversationEvent`]s, asks the
//! router what to do, and sends or edits messages accordingly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use permesso::workflows::permit::{
    checking_placeholder, route_now, ConversationEvent, Keyboard, Reply, Route,
};
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, Me, MessageId, ParseMode};
use teloxide::utils::command::BotCommands;
use teloxide::RequestError;
use tracing::{info, warn};

use crate::infra::PermitService;

/// Commands advertised in the Telegram client menu. Parsing itself goes
/// through [`ConversationEvent::from_message`].
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase")]
pub(crate) enum MenuCommand {
    #[command(description = "Main menu")]
    Start,
    #[command(description = "Prompt for a permit code")]
    Check,
    #[command(description = "Status legend and commands")]
    Help,
}

pub(crate) fn schema() -> UpdateHandler<RequestError> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback))
}

/// Register the command menu, then poll until interrupted. `readiness` is
/// raised once the dispatcher is built and lowered when polling stops.
pub(crate) async fn run(bot: Bot, service: Arc<PermitService>, readiness: Arc<AtomicBool>) {
    if let Err(err) = bot.set_my_commands(MenuCommand::bot_commands()).await {
        warn!(error = %err, "unable to register bot command menu");
    }

    let mut dispatcher = Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![service])
        .enable_ctrlc_handler()
        .build();

    info!("telegram dispatcher starting");
    readiness.store(true, Ordering::Release);
    dispatcher.dispatch().await;
    readiness.store(false, Ordering::Release);
}

async fn on_message(
    bot: Bot,
    msg: Message,
    me: Me,
    service: Arc<PermitService>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    match route_now(&ConversationEvent::from_message(text, me.username())) {
        Route::Reply(reply) => {
            send(&bot, chat_id, reply).await?;
        }
        Route::Resolve(code) => {
            let placeholder = send(&bot, chat_id, checking_placeholder()).await?;
            let reply = service.resolve(&code).await;
            edit(&bot, chat_id, placeholder.id, reply).await?;
        }
        Route::Ignore => {}
    }

    Ok(())
}

async fn on_callback(bot: Bot, query: CallbackQuery) -> ResponseResult<()> {
    bot.answer_callback_query(query.id.clone()).await?;

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };
    let Route::Reply(reply) = route_now(&ConversationEvent::ButtonPress(data.to_string())) else {
        return Ok(());
    };

    match query.message.as_ref() {
        Some(message) => {
            edit(&bot, message.chat().id, message.id(), reply).await?;
        }
        None => {
            send(&bot, ChatId::from(query.from.id), reply).await?;
        }
    }

    Ok(())
}

async fn send(bot: &Bot, chat_id: ChatId, reply: Reply) -> ResponseResult<Message> {
    let request = bot
        .send_message(chat_id, reply.text)
        .parse_mode(ParseMode::Html);
    match reply.keyboard {
        Some(keyboard) => request.reply_markup(markup(&keyboard)).await,
        None => request.await,
    }
}

async fn edit(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    reply: Reply,
) -> ResponseResult<Message> {
    let request = bot
        .edit_message_text(chat_id, message_id, reply.text)
        .parse_mode(ParseMode::Html);
    match reply.keyboard {
        Some(keyboard) => request.reply_markup(markup(&keyboard)).await,
        None => request.await,
    }
}

pub(crate) fn markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label, button.tag.as_str()))
            .collect::<Vec<_>>()
    }))
}
