mod config;
mod input;
mod quiz;

use std::sync::Arc;

use config::Config;
use dotenv::dotenv;
use input::{classify, Command, Input, RETRY_BUTTON};
use log::{debug, info};
use quiz::{
    flow::SubmitOutcome,
    render::{render, ActivePrompt, BACK_BUTTON},
    submit::HttpSubmitter,
    Advance, QuizFlow, QuizKind,
};
use teloxide::{
    dispatching::dialogue::{ErasedStorage, InMemStorage, Storage},
    prelude::*,
    types::{ChatAction, KeyboardButton, KeyboardMarkup},
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    ReceiveQuizChoice,
    Answering {
        flow: QuizFlow,
    },
}

type AnswerStorage = std::sync::Arc<ErasedStorage<State>>;

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting questionnaire bot...");

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            return;
        }
    };
    let submitter = match HttpSubmitter::new(&config.submit_base_url, config.submit_timeout) {
        Ok(submitter) => Arc::new(submitter),
        Err(err) => {
            log::error!("Failed to build the submission client: {}", err);
            return;
        }
    };
    info!(
        "Submitting answers to {} (timeout {:?})",
        submitter.base_url(),
        config.submit_timeout
    );

    let bot = Bot::from_env();

    // Answers only live for the length of a conversation.
    let storage: AnswerStorage = InMemStorage::<State>::new().erase();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveQuizChoice].endpoint(receive_quiz_choice))
            .branch(dptree::case![State::Answering { flow }].endpoint(answering)),
    )
    .dependencies(dptree::deps![storage, submitter, config])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "你好！我會以對話方式陪你完成問卷。請選擇要進行的問卷：";
const ANSWER_HINT: &str = "請點選選項，或直接輸入補充文字。輸入 /restart 可重新選擇問卷。";

fn quiz_choice_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![QuizKind::ALL
        .iter()
        .map(|kind| KeyboardButton::new(kind.catalog().title))
        .collect::<Vec<_>>()])
}

fn prompt_keyboard(active: &ActivePrompt) -> KeyboardMarkup {
    let mut rows: Vec<Vec<KeyboardButton>> = active
        .labels
        .iter()
        .map(|label| vec![KeyboardButton::new(label.clone())])
        .collect();

    let mut navigation = Vec::new();
    if active.can_go_back {
        navigation.push(KeyboardButton::new(BACK_BUTTON));
    }
    navigation.push(KeyboardButton::new(active.next_label));
    rows.push(navigation);

    KeyboardMarkup::new(rows)
}

fn retry_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(BACK_BUTTON),
        KeyboardButton::new(RETRY_BUTTON),
    ]])
}

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    // `/start insurance` picks the questionnaire directly.
    let requested = msg
        .text()
        .and_then(|text| text.strip_prefix("/start"))
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .and_then(|arg| arg.parse::<QuizKind>().ok());

    if let Some(kind) = requested {
        return begin_quiz(bot, dialogue, msg.chat.id, kind).await;
    }

    bot.send_message(msg.chat.id, GREETING_TEXT)
        .reply_markup(quiz_choice_keyboard())
        .await?;
    dialogue.update(State::ReceiveQuizChoice).await?;
    Ok(())
}

async fn receive_quiz_choice(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    let kind = msg
        .text()
        .and_then(|text| QuizKind::from_title(text).or_else(|| text.parse().ok()));

    match kind {
        Some(kind) => begin_quiz(bot, dialogue, msg.chat.id, kind).await,
        None => {
            bot.send_message(msg.chat.id, "請選擇其中一份問卷")
                .reply_markup(quiz_choice_keyboard())
                .await?;
            Ok(())
        }
    }
}

async fn begin_quiz(
    bot: Bot,
    dialogue: QuizDialogue,
    chat_id: ChatId,
    kind: QuizKind,
) -> HandlerResult {
    info!("Chat {} started the {} questionnaire", chat_id.0, kind);
    let flow = QuizFlow::new(kind);

    let transcript = render(&flow);
    if let Some(welcome) = transcript.lines.first() {
        bot.send_message(chat_id, welcome.text.clone()).await?;
    }
    send_active_question(&bot, chat_id, &flow).await?;

    dialogue.update(State::Answering { flow }).await?;
    Ok(())
}

async fn send_active_question(bot: &Bot, chat_id: ChatId, flow: &QuizFlow) -> HandlerResult {
    let transcript = render(flow);
    let Some(active) = transcript.active else {
        return Ok(());
    };

    let text = format!(
        "{}\n\n{}\n{}\n\n{}",
        active.question.text,
        active.hint(),
        active.selection_text(),
        transcript.progress
    );
    bot.send_message(chat_id, text)
        .reply_markup(prompt_keyboard(&active))
        .await?;
    Ok(())
}

async fn answering(
    bot: Bot,
    dialogue: QuizDialogue,
    flow: QuizFlow,
    msg: Message,
    submitter: Arc<HttpSubmitter>,
    config: Arc<Config>,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let Some(text) = msg.text() else {
        bot.send_message(chat_id, "請點選選項，或直接輸入補充文字").await?;
        return Ok(());
    };

    let mut flow = flow;
    match classify(text, &flow) {
        Input::Command(Command::History) => {
            bot.send_message(chat_id, render(&flow).to_text()).await?;
            return Ok(());
        }
        Input::Command(Command::Restart) => {
            bot.send_message(chat_id, GREETING_TEXT)
                .reply_markup(quiz_choice_keyboard())
                .await?;
            dialogue.update(State::ReceiveQuizChoice).await?;
            return Ok(());
        }
        Input::Command(Command::Start(Some(kind))) => {
            return begin_quiz(bot, dialogue, chat_id, kind).await;
        }
        Input::Command(Command::Start(None) | Command::Unknown) => {
            bot.send_message(chat_id, ANSWER_HINT).await?;
            return Ok(());
        }
        Input::Next => match flow.advance() {
            Advance::Blocked(notice) => {
                bot.send_message(chat_id, notice.to_string()).await?;
            }
            Advance::Moved => {
                send_active_question(&bot, chat_id, &flow).await?;
            }
            Advance::Finished => {
                if let Some(line) = render(&flow).lines.last() {
                    bot.send_message(chat_id, line.text.clone()).await?;
                }
                if submit_answers(&bot, chat_id, &mut flow, &submitter, &config).await? {
                    dialogue.update(State::ReceiveQuizChoice).await?;
                    return Ok(());
                }
            }
        },
        Input::Back => {
            if flow.retreat() {
                send_active_question(&bot, chat_id, &flow).await?;
            } else {
                bot.send_message(chat_id, "這已經是第一題了").await?;
            }
        }
        Input::Choose(label) => {
            flow.choose(label)?;
            if let Some(active) = render(&flow).active {
                bot.send_message(chat_id, active.selection_text()).await?;
            }
        }
        Input::StaleOption => {
            bot.send_message(chat_id, "這是其他題目的選項，請使用目前題目的選項").await?;
            send_active_question(&bot, chat_id, &flow).await?;
            return Ok(());
        }
        Input::FreeText(text) => {
            if let Some(question) = flow.active_question() {
                flow.append_free_text(question.id, text)?;
            }
            send_active_question(&bot, chat_id, &flow).await?;
        }
        Input::Finished => {
            bot.send_message(chat_id, "問卷已完成，請按「重新送出」或回到上一題")
                .reply_markup(retry_keyboard())
                .await?;
        }
    }

    dialogue.update(State::Answering { flow }).await?;
    Ok(())
}

/// Returns `true` once the answers were accepted and the conversation can
/// leave the questionnaire.
async fn submit_answers(
    bot: &Bot,
    chat_id: ChatId,
    flow: &mut QuizFlow,
    submitter: &HttpSubmitter,
    config: &Config,
) -> Result<bool, Box<dyn std::error::Error + Send + Sync>> {
    // Nice to have; the submission goes ahead either way.
    let _ = bot.send_chat_action(chat_id, ChatAction::Typing).await;

    match flow.submit(submitter).await {
        Ok(SubmitOutcome::Redirect(view)) => {
            bot.send_message(
                chat_id,
                format!(
                    "分析完成！查看結果：{}\n\n想再做一份問卷嗎？",
                    view.url(&config.submit_base_url)
                ),
            )
            .reply_markup(quiz_choice_keyboard())
            .await?;
            Ok(true)
        }
        Ok(SubmitOutcome::Retry(notice)) => {
            bot.send_message(chat_id, notice.to_string())
                .reply_markup(retry_keyboard())
                .await?;
            Ok(false)
        }
        Err(err) => {
            debug!("Chat {} submission refused: {}", chat_id.0, err);
            if let Some(notice) = err.notice() {
                bot.send_message(chat_id, notice.to_string()).await?;
            }
            send_active_question(bot, chat_id, flow).await?;
            Ok(false)
        }
    }
}
