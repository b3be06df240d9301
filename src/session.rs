//! Chat session state machine.
//!
//! A session is either `Active` or `Ended`. While active it accumulates an
//! append-only transcript of question/answer exchanges; once ended nothing
//! can be appended and only constructing a new session returns to active.

use thiserror::Error;

/// One question/answer pair exchanged with the model. Immutable once
/// recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Active,
    Ended,
}

/// Errors from transcript mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("chat has ended; start a new session to continue")]
    ChatEnded,
    #[error("question is empty")]
    EmptyQuestion,
}

/// How a submitted question should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionCheck {
    /// Forward to the model, then record the pair.
    Accept,
    /// Blank question: skip silently, no model call.
    Ignore,
    /// Session has ended: refuse, no model call.
    Reject,
}

/// An interactive chat session: state plus an owned, append-only transcript.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    state: ChatState,
    history: Vec<Exchange>,
}

impl Default for ChatState {
    fn default() -> Self {
        ChatState::Active
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        self.state == ChatState::Ended
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    /// Classifies a submission without mutating anything. The caller makes
    /// the model call only on [`QuestionCheck::Accept`].
    pub fn check_question(&self, question: &str) -> QuestionCheck {
        if self.is_ended() {
            QuestionCheck::Reject
        } else if question.trim().is_empty() {
            QuestionCheck::Ignore
        } else {
            QuestionCheck::Accept
        }
    }

    /// Appends an exchange to the transcript.
    ///
    /// Rejected after [`ChatSession::end`]; a submission after the session
    /// ended must never be merged into history. Blank questions are refused
    /// here too, so the invariant holds even if the caller skipped
    /// [`ChatSession::check_question`].
    pub fn record(
        &mut self,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.is_ended() {
            return Err(SessionError::ChatEnded);
        }
        let question = question.into();
        if question.trim().is_empty() {
            return Err(SessionError::EmptyQuestion);
        }
        self.history.push(Exchange {
            question,
            answer: answer.into(),
        });
        Ok(())
    }

    /// Ends the chat. One-way within the session; calling it again is a
    /// no-op.
    pub fn end(&mut self) {
        self.state = ChatState::Ended;
    }
}

/// Formats the transcript in a human-readable form for the terminal.
pub fn format_transcript(history: &[Exchange], responder_label: &str) -> String {
    let mut output = String::new();
    for exchange in history {
        output.push_str(&format!("You: {}\n", exchange.question));
        output.push_str(&format!("{}: {}\n\n", responder_label, exchange.answer));
    }
    output.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_one_entry() -> ChatSession {
        let mut session = ChatSession::new();
        session.record("What grew?", "Sales grew 10%.").unwrap();
        session
    }

    #[test]
    fn test_new_session_is_active_and_empty() {
        let session = ChatSession::new();
        assert_eq!(session.state(), ChatState::Active);
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut session = ChatSession::new();
        session.record("q1", "a1").unwrap();
        session.record("q2", "a2").unwrap();
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[0].question, "q1");
        assert_eq!(session.history()[1].answer, "a2");
    }

    #[test]
    fn test_record_after_end_never_changes_history() {
        let mut session = session_with_one_entry();
        session.end();
        let result = session.record("too late", "answer");
        assert_eq!(result, Err(SessionError::ChatEnded));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_blank_question_never_changes_history() {
        let mut session = ChatSession::new();
        assert_eq!(
            session.record("   ", "answer"),
            Err(SessionError::EmptyQuestion)
        );
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_end_is_idempotent_and_irreversible() {
        let mut session = ChatSession::new();
        session.end();
        assert!(session.is_ended());
        session.end();
        assert!(session.is_ended());
    }

    #[test]
    fn test_check_question_classification() {
        let mut session = ChatSession::new();
        assert_eq!(session.check_question("What grew?"), QuestionCheck::Accept);
        assert_eq!(session.check_question(""), QuestionCheck::Ignore);
        assert_eq!(session.check_question("  \t"), QuestionCheck::Ignore);
        session.end();
        assert_eq!(session.check_question("What grew?"), QuestionCheck::Reject);
    }

    #[test]
    fn test_format_transcript() {
        let session = session_with_one_entry();
        let transcript = format_transcript(session.history(), "Gemini");
        assert!(transcript.contains("You: What grew?"));
        assert!(transcript.contains("Gemini: Sales grew 10%."));
    }
}
