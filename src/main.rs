mod config;
mod shopping;

use std::sync::Arc;
use tokio::sync::Mutex;

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use tracing::{info, warn};
use tracing_subscriber::prelude::*;

use config::Config;
use shopping::{parse_command, Action, Event, ListStore, MenuButton, ShoppingEngine};

struct BotState {
    engine: Mutex<ShoppingEngine>,
    bot_username: Option<String>,
}

impl BotState {
    async fn new(config: &Config, bot: &Bot) -> Self {
        // Get bot info; the username is needed to match /command@BotName.
        let bot_username = match bot.get_me().await {
            Ok(me) => {
                info!("Bot user ID: {}, username: @{}", me.id, me.username());
                Some(me.username().to_string())
            }
            Err(e) => {
                warn!("Failed to get bot info: {e}");
                None
            }
        };

        let store = ListStore::load_or_new(&config.data_dir.join("shopping_lists.json"));

        Self {
            engine: Mutex::new(ShoppingEngine::new(store)),
            bot_username,
        }
    }
}

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cartbot.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(&config.telegram_bot_token);

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("cartbot.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    info!("🛒 Starting cartbot...");
    info!("Loaded config from {config_path}");

    let state = Arc::new(BotState::new(&config, &bot).await);

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback_query));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<BotState>) -> ResponseResult<()> {
    let user = match msg.from {
        Some(ref u) => u,
        None => return Ok(()),
    };
    let text = match msg.text() {
        Some(t) => t,
        None => return Ok(()),
    };
    let user_id = user.id.0 as i64;

    let event = if text.starts_with('/') {
        match parse_command(text, state.bot_username.as_deref()) {
            Some((name, args)) => Event::Command { name, args, user_id },
            // Addressed to another bot.
            None => return Ok(()),
        }
    } else {
        Event::Text {
            body: text.to_string(),
            user_id,
        }
    };

    let action = state.engine.lock().await.handle(event);
    apply_action(&bot, msg.chat.id, None, action).await;
    Ok(())
}

async fn handle_callback_query(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> ResponseResult<()> {
    let payload = match q.data {
        Some(ref data) => data.clone(),
        None => return Ok(()),
    };
    let user_id = q.from.id.0 as i64;

    // Clear the client-side spinner regardless of what happens next.
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!("Failed to answer callback query: {e}");
    }

    let origin = q.regular_message().map(|m| (m.chat.id, m.id));
    let action = state
        .engine
        .lock()
        .await
        .handle(Event::ButtonPress { payload, user_id });

    let chat_id = origin.map(|(chat_id, _)| chat_id).unwrap_or(ChatId(user_id));
    apply_action(&bot, chat_id, origin.map(|(_, message_id)| message_id), action).await;
    Ok(())
}

/// Send or edit per the engine's decision. Telegram failures are logged, not
/// propagated.
async fn apply_action(bot: &Bot, chat_id: ChatId, origin: Option<MessageId>, action: Action) {
    match action {
        Action::Reply { text, menu } => send_reply(bot, chat_id, &text, menu).await,
        Action::EditOrigin { text, menu } => match origin {
            Some(message_id) => {
                let mut request = bot
                    .edit_message_text(chat_id, message_id, &text)
                    .parse_mode(ParseMode::Html);
                if let Some(menu) = menu {
                    request = request.reply_markup(keyboard(menu));
                }
                if let Err(e) = request.await {
                    warn!("Failed to edit message: {e}");
                }
            }
            // The origin message is inaccessible; fall back to a fresh reply.
            None => send_reply(bot, chat_id, &text, menu).await,
        },
    }
}

async fn send_reply(bot: &Bot, chat_id: ChatId, text: &str, menu: Option<Vec<Vec<MenuButton>>>) {
    let mut request = bot.send_message(chat_id, text).parse_mode(ParseMode::Html);
    if let Some(menu) = menu {
        request = request.reply_markup(keyboard(menu));
    }
    if let Err(e) = request.await {
        warn!("Failed to send reply: {e}");
    }
}

fn keyboard(menu: Vec<Vec<MenuButton>>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(menu.into_iter().map(|row| {
        row.into_iter()
            .map(|button| InlineKeyboardButton::callback(button.label, button.payload))
    }))
}
