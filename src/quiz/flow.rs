use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info, warn};
use serde::Serialize;

use super::submit::{Receipt, ResultView, SubmissionPayload, SubmitError, Submitter};
use super::{Catalog, Question, QuizKind};

const FREE_TEXT_SEPARATOR: &str = " / ";

/// The recorded answer for one question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerSlot {
    pub choice: Option<String>,
    pub multi: Vec<String>,
    pub free_text: String,
}

impl AnswerSlot {
    pub fn is_answered(&self, multi: bool) -> bool {
        let has_text = !self.free_text.trim().is_empty();
        if multi {
            !self.multi.is_empty() || has_text
        } else {
            self.choice.as_deref().map_or(false, |c| !c.trim().is_empty()) || has_text
        }
    }
}

/// Messages shown to the user in place when an action can't go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoSelection,
    NoChoice,
    Unanswered(&'static str),
    SubmitInFlight,
    SubmitRejected,
    ConnectionFailed,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoSelection => {
                f.write_str("此題尚未選擇任何選項；你也可以輸入補充文字，再按下一題。")
            }
            Notice::NoChoice => {
                f.write_str("此題尚未選擇；你可以點選一個選項，或輸入補充文字後再按下一題。")
            }
            Notice::Unanswered(id) => write!(f, "題目 {} 尚未作答，請完成後再送出。", id),
            Notice::SubmitInFlight => f.write_str("正在送出中，請稍候。"),
            Notice::SubmitRejected => f.write_str("送出失敗，請按「重新送出」再試一次。"),
            Notice::ConnectionFailed => f.write_str("系統連線失敗，請稍後再試。"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("question {0} is not the active question")]
    Inactive(String),
    #[error("a submission is already in flight")]
    SubmitInFlight,
    #[error("the questionnaire is not finished")]
    NotFinished,
    #[error("question {0} has no answer")]
    Unanswered(&'static str),
}

impl FlowError {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            FlowError::SubmitInFlight => Some(Notice::SubmitInFlight),
            FlowError::Unanswered(id) => Some(Notice::Unanswered(*id)),
            FlowError::Inactive(_) | FlowError::NotFinished => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Blocked(Notice),
    Moved,
    /// The last question was answered; the flow should be submitted.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Redirect(ResultView),
    Retry(Notice),
}

/// Question-flow controller for one conversation.
///
/// `index` runs from 0 to the catalog length; the length itself means the
/// questionnaire is finished. Slots are created when their question becomes
/// active and are only mutated while it stays active.
#[derive(Debug, Clone)]
pub struct QuizFlow {
    catalog: &'static Catalog,
    index: usize,
    answers: BTreeMap<&'static str, AnswerSlot>,
    submitting: bool,
}

impl QuizFlow {
    pub fn new(kind: QuizKind) -> Self {
        Self::with_catalog(kind.catalog())
    }

    pub fn with_catalog(catalog: &'static Catalog) -> Self {
        let mut flow = Self {
            catalog,
            index: 0,
            answers: BTreeMap::new(),
            submitting: false,
        };
        flow.ensure_active_slot();
        flow
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.catalog.len()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn active_question(&self) -> Option<&'static Question> {
        self.catalog.questions.get(self.index)
    }

    pub fn slot(&self, question_id: &str) -> Option<&AnswerSlot> {
        self.answers.get(question_id)
    }

    fn ensure_active_slot(&mut self) {
        if let Some(q) = self.active_question() {
            self.answers.entry(q.id).or_default();
        }
    }

    fn active_slot_mut(&mut self, question_id: &str) -> Result<&mut AnswerSlot, FlowError> {
        match self.active_question() {
            Some(q) if q.id == question_id => Ok(self.answers.entry(q.id).or_default()),
            _ => Err(FlowError::Inactive(question_id.to_string())),
        }
    }

    pub fn select_single(&mut self, question_id: &str, label: &str) -> Result<(), FlowError> {
        self.active_slot_mut(question_id)?.choice = Some(label.to_string());
        Ok(())
    }

    /// Returns whether `label` is selected after the toggle.
    pub fn toggle_multi(&mut self, question_id: &str, label: &str) -> Result<bool, FlowError> {
        let slot = self.active_slot_mut(question_id)?;
        match slot.multi.iter().position(|l| l == label) {
            Some(pos) => {
                slot.multi.remove(pos);
                Ok(false)
            }
            None => {
                slot.multi.push(label.to_string());
                Ok(true)
            }
        }
    }

    /// Picks an option on the active question, toggling it for multi-select.
    pub fn choose(&mut self, label: &str) -> Result<(), FlowError> {
        let question = self
            .active_question()
            .ok_or_else(|| FlowError::Inactive(label.to_string()))?;
        if question.multi {
            self.toggle_multi(question.id, label).map(|_| ())
        } else {
            self.select_single(question.id, label)
        }
    }

    pub fn append_free_text(&mut self, question_id: &str, text: &str) -> Result<(), FlowError> {
        let slot = self.active_slot_mut(question_id)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        if slot.free_text.is_empty() {
            slot.free_text = text.to_string();
        } else {
            slot.free_text.push_str(FREE_TEXT_SEPARATOR);
            slot.free_text.push_str(text);
        }
        Ok(())
    }

    pub fn advance(&mut self) -> Advance {
        let Some(question) = self.active_question() else {
            return Advance::Finished;
        };
        let answered = self
            .slot(question.id)
            .map_or(false, |slot| slot.is_answered(question.multi));
        if !answered {
            debug!("{}: {} left unanswered", self.catalog.id, question.id);
            return Advance::Blocked(if question.multi {
                Notice::NoSelection
            } else {
                Notice::NoChoice
            });
        }

        self.index += 1;
        self.ensure_active_slot();
        debug!("{}: advanced to {}", self.catalog.id, self.index);
        if self.is_finished() {
            Advance::Finished
        } else {
            Advance::Moved
        }
    }

    /// Steps back one question. Returns whether the index changed.
    pub fn retreat(&mut self) -> bool {
        if self.index == 0 || self.submitting {
            return false;
        }
        self.index -= 1;
        debug!("{}: went back to {}", self.catalog.id, self.index);
        true
    }

    /// Claims the in-flight guard and builds the payload.
    ///
    /// Every question is validated again. `advance` already refuses to leave
    /// an unanswered question, so this only guards against a flow whose index
    /// was moved past a hole by other means; such a flow is sent back to that
    /// question instead of being submitted.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, FlowError> {
        if self.submitting {
            return Err(FlowError::SubmitInFlight);
        }
        if !self.is_finished() {
            return Err(FlowError::NotFinished);
        }
        for (i, question) in self.catalog.questions.iter().enumerate() {
            let answered = self
                .slot(question.id)
                .map_or(false, |slot| slot.is_answered(question.multi));
            if !answered {
                self.index = i;
                self.ensure_active_slot();
                return Err(FlowError::Unanswered(question.id));
            }
        }

        self.submitting = true;
        Ok(SubmissionPayload {
            quiz_id: self.catalog.id.to_string(),
            answers: self
                .answers
                .iter()
                .map(|(id, slot)| (id.to_string(), slot.clone()))
                .collect(),
        })
    }

    pub fn finish_submit(&mut self, result: Result<Receipt, SubmitError>) -> SubmitOutcome {
        match result {
            Ok(receipt) => {
                info!("{}: submitted as {}", self.catalog.id, receipt.user_id);
                SubmitOutcome::Redirect(ResultView {
                    user_id: receipt.user_id,
                })
            }
            Err(err) => {
                warn!("{}: submission failed: {}", self.catalog.id, err);
                self.submitting = false;
                SubmitOutcome::Retry(err.notice())
            }
        }
    }

    pub async fn submit<S>(&mut self, submitter: &S) -> Result<SubmitOutcome, FlowError>
    where
        S: Submitter + ?Sized,
    {
        let payload = self.begin_submit()?;
        let result = submitter.submit(&payload).await;
        Ok(self.finish_submit(result))
    }
}
