use std::fmt;

use super::flow::{AnswerSlot, QuizFlow};
use super::Question;

pub const NEXT_BUTTON: &str = "下一題";
pub const SUBMIT_BUTTON: &str = "送出結果";
pub const BACK_BUTTON: &str = "上一題";
const UNANSWERED: &str = "（未作答）";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Bot,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub speaker: Speaker,
    pub text: String,
}

impl Line {
    fn bot(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Bot,
            text: text.into(),
        }
    }

    fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "進度：{} / {}", self.done, self.total)
    }
}

/// The interactive part of the transcript: the question waiting for input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePrompt {
    pub question: &'static Question,
    pub labels: Vec<String>,
    pub selected: Vec<String>,
    pub free_text: String,
    pub can_go_back: bool,
    pub next_label: &'static str,
}

impl ActivePrompt {
    pub fn hint(&self) -> &'static str {
        if self.question.multi {
            "此題可複選：點選多個，再按「下一題」確認。"
        } else {
            "此題為單選：點選一個，再按「下一題」確認。"
        }
    }

    /// Short status line echoed after each selection.
    pub fn selection_text(&self) -> String {
        let mut text = if self.selected.is_empty() {
            "目前尚未選擇".to_string()
        } else {
            format!("目前選擇：{}", self.selected.join("、"))
        };
        if !self.free_text.is_empty() {
            text.push_str(&format!("\n（補充）{}", self.free_text));
        }
        text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub lines: Vec<Line>,
    pub active: Option<ActivePrompt>,
    pub progress: Progress,
}

impl Transcript {
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line.speaker {
                Speaker::Bot => format!("AI：{}", line.text),
                Speaker::User => format!("你：{}", line.text),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn answer_text(question: &Question, slot: &AnswerSlot) -> String {
    if question.multi {
        if slot.multi.is_empty() {
            UNANSWERED.to_string()
        } else {
            slot.multi.join("、")
        }
    } else {
        slot.choice
            .clone()
            .unwrap_or_else(|| UNANSWERED.to_string())
    }
}

pub fn render(flow: &QuizFlow) -> Transcript {
    let catalog = flow.catalog();
    let index = flow.index().min(catalog.len());
    let empty = AnswerSlot::default();

    let mut lines = vec![Line::bot(format!(
        "歡迎進行「{}」。我們會以對話方式一題一題完成。",
        catalog.title
    ))];

    for question in &catalog.questions[..index] {
        let slot = flow.slot(question.id).unwrap_or(&empty);
        lines.push(Line::bot(question.text));
        lines.push(Line::user(answer_text(question, slot)));
        if !slot.free_text.trim().is_empty() {
            lines.push(Line::user(format!("（補充）{}", slot.free_text)));
        }
    }

    let progress = Progress {
        done: index,
        total: catalog.len(),
    };

    let Some(question) = flow.active_question() else {
        lines.push(Line::bot("已完成問卷，正在送出並生成分析結果…"));
        return Transcript {
            lines,
            active: None,
            progress,
        };
    };

    let slot = flow.slot(question.id).unwrap_or(&empty);
    lines.push(Line::bot(question.text));
    let selected = if question.multi {
        slot.multi.clone()
    } else {
        slot.choice.iter().cloned().collect()
    };

    Transcript {
        lines,
        active: Some(ActivePrompt {
            question,
            labels: question.labels(),
            selected,
            free_text: slot.free_text.clone(),
            can_go_back: index > 0,
            next_label: if index + 1 == catalog.len() {
                SUBMIT_BUTTON
            } else {
                NEXT_BUTTON
            },
        }),
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::QuizKind;

    #[test]
    fn fresh_flow_shows_welcome_and_first_question() {
        let flow = QuizFlow::new(QuizKind::Values);
        let transcript = render(&flow);

        assert_eq!(transcript.lines.len(), 2);
        assert!(transcript.lines[0].text.contains("價值觀分析系統"));
        assert_eq!(transcript.lines[1], Line::bot("Q1. 你的年齡區間？"));

        let active = transcript.active.unwrap();
        assert_eq!(active.question.id, "V1");
        assert_eq!(active.labels[0], "A. 18 以下");
        assert!(!active.can_go_back);
        assert_eq!(active.next_label, NEXT_BUTTON);
        assert_eq!(transcript.progress.to_string(), "進度：0 / 12");
    }

    #[test]
    fn completed_questions_echo_their_answers() {
        let mut flow = QuizFlow::new(QuizKind::Insurance);
        flow.choose("A. 我自己").unwrap();
        flow.append_free_text("Q1", "還有太太").unwrap();
        flow.advance();

        let transcript = render(&flow);
        let texts: Vec<_> = transcript.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts[1..],
            [
                "Q1. 這份保險主要是要幫誰規劃？",
                "A. 我自己",
                "（補充）還有太太",
                "Q2. 被保險人的年齡大約是？",
            ]
        );
        assert_eq!(transcript.lines[2].speaker, Speaker::User);
        assert!(transcript.active.unwrap().can_go_back);
    }

    #[test]
    fn free_text_only_answer_renders_placeholder() {
        let mut flow = QuizFlow::new(QuizKind::Insurance);
        for _ in 0..4 {
            let first = flow.active_question().unwrap().options[0].label();
            flow.choose(&first).unwrap();
            flow.advance();
        }
        flow.append_free_text("Q5", "都擔心").unwrap();
        flow.advance();

        let transcript = render(&flow);
        let q5 = transcript
            .lines
            .iter()
            .position(|l| l.text.starts_with("Q5."))
            .unwrap();
        assert_eq!(transcript.lines[q5 + 1].text, UNANSWERED);
        assert_eq!(transcript.lines[q5 + 2].text, "（補充）都擔心");
    }

    #[test]
    fn multi_selection_is_listed_in_prompt() {
        let mut flow = QuizFlow::new(QuizKind::Insurance);
        for _ in 0..4 {
            let first = flow.active_question().unwrap().options[0].label();
            flow.choose(&first).unwrap();
            flow.advance();
        }
        flow.choose("A. 生病住院、手術費太高").unwrap();
        flow.choose("C. 將來失能或需要人長期照顧").unwrap();

        let active = render(&flow).active.unwrap();
        assert!(active.hint().contains("複選"));
        assert_eq!(
            active.selection_text(),
            "目前選擇：A. 生病住院、手術費太高、C. 將來失能或需要人長期照顧"
        );
    }

    #[test]
    fn last_question_offers_submit_and_finish_has_no_prompt() {
        let mut flow = QuizFlow::new(QuizKind::Values);
        while flow.index() + 1 < flow.catalog().len() {
            flow.choose("B").unwrap();
            flow.advance();
        }
        assert_eq!(render(&flow).active.unwrap().next_label, SUBMIT_BUTTON);

        flow.append_free_text("V12", "安心").unwrap();
        flow.advance();
        let transcript = render(&flow);
        assert!(transcript.active.is_none());
        assert_eq!(transcript.progress.to_string(), "進度：12 / 12");
        assert!(transcript.to_text().ends_with("AI：已完成問卷，正在送出並生成分析結果…"));
    }
}
