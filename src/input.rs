//! Maps a chat message received mid-questionnaire to what the user meant.

use crate::quiz::{
    render::{BACK_BUTTON, NEXT_BUTTON, SUBMIT_BUTTON},
    QuizFlow, QuizKind,
};

pub const RETRY_BUTTON: &str = "重新送出";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start` with an optional quiz id to jump straight into.
    Start(Option<QuizKind>),
    History,
    Restart,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Command(Command),
    Next,
    Back,
    Choose(&'a str),
    /// An option label that belongs to another question, usually from an
    /// old keyboard.
    StaleOption,
    FreeText(&'a str),
    /// Free text after the last question; there is nothing to attach it to.
    Finished,
}

fn parse_command(text: &str) -> Command {
    let mut parts = text.splitn(2, char::is_whitespace);
    // Commands may be addressed as `/history@SomeBot` in group chats.
    let name = parts
        .next()
        .unwrap_or_default()
        .split('@')
        .next()
        .unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "/start" => Command::Start(arg.parse().ok()),
        "/history" => Command::History,
        "/restart" => Command::Restart,
        _ => Command::Unknown,
    }
}

pub fn classify<'a>(text: &'a str, flow: &QuizFlow) -> Input<'a> {
    let text = text.trim();
    if text.starts_with('/') {
        return Input::Command(parse_command(text));
    }
    match text {
        NEXT_BUTTON | SUBMIT_BUTTON | RETRY_BUTTON => return Input::Next,
        BACK_BUTTON => return Input::Back,
        _ => {}
    }

    let Some(question) = flow.active_question() else {
        return Input::Finished;
    };
    if question.has_label(text) {
        return Input::Choose(text);
    }
    let stale = flow
        .catalog()
        .questions
        .iter()
        .any(|q| q.id != question.id && q.has_label(text));
    if stale {
        Input::StaleOption
    } else {
        Input::FreeText(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{flow::Notice, Advance};

    #[test]
    fn start_with_quiz_id_is_a_command_not_an_answer() {
        let mut flow = QuizFlow::new(QuizKind::Insurance);
        assert_eq!(
            classify("/start values", &flow),
            Input::Command(Command::Start(Some(QuizKind::Values)))
        );
        assert_eq!(flow.advance(), Advance::Blocked(Notice::NoChoice));
        assert_eq!(flow.slot("Q1").unwrap().free_text, "");
    }

    #[test]
    fn commands_are_recognised() {
        let flow = QuizFlow::new(QuizKind::Values);
        assert_eq!(classify("/start", &flow), Input::Command(Command::Start(None)));
        assert_eq!(
            classify("/start health", &flow),
            Input::Command(Command::Start(None))
        );
        assert_eq!(classify("/history", &flow), Input::Command(Command::History));
        assert_eq!(
            classify("/restart@QuizBot", &flow),
            Input::Command(Command::Restart)
        );
        assert_eq!(classify("/help", &flow), Input::Command(Command::Unknown));
    }

    #[test]
    fn navigation_buttons_map_to_moves() {
        let flow = QuizFlow::new(QuizKind::Values);
        assert_eq!(classify(NEXT_BUTTON, &flow), Input::Next);
        assert_eq!(classify(SUBMIT_BUTTON, &flow), Input::Next);
        assert_eq!(classify(RETRY_BUTTON, &flow), Input::Next);
        assert_eq!(classify(BACK_BUTTON, &flow), Input::Back);
    }

    #[test]
    fn labels_of_the_active_question_are_choices() {
        let flow = QuizFlow::new(QuizKind::Insurance);
        assert_eq!(classify("A. 我自己", &flow), Input::Choose("A. 我自己"));
    }

    #[test]
    fn labels_of_other_questions_are_stale() {
        let mut flow = QuizFlow::new(QuizKind::Insurance);
        flow.choose("A. 我自己").unwrap();
        flow.advance();
        assert_eq!(classify("B. 配偶 / 伴侶", &flow), Input::StaleOption);
    }

    #[test]
    fn anything_else_is_free_text() {
        let flow = QuizFlow::new(QuizKind::Insurance);
        assert_eq!(classify("  還有太太 ", &flow), Input::FreeText("還有太太"));
    }

    #[test]
    fn text_after_the_last_question_is_not_recorded() {
        let mut flow = QuizFlow::new(QuizKind::Values);
        while flow.active_question().is_some() {
            flow.choose("A").unwrap();
            flow.advance();
        }
        assert_eq!(classify("補充一下", &flow), Input::Finished);
        assert_eq!(classify(RETRY_BUTTON, &flow), Input::Next);
    }
}
