//! Spoiler-free emoji summary of a finished session.
use crate::compare::Verdict;
use crate::constants::{MAX_ATTEMPTS, SHARE_LOSS_MARK, SHARE_MARK_CORRECT, SHARE_MARK_OTHER};
use crate::session::{GameSession, SessionStatus};

/// Marker for one verdict; partial matches are not revealed.
#[must_use]
pub const fn mark(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Correct => SHARE_MARK_CORRECT,
        Verdict::Partial | Verdict::Incorrect => SHARE_MARK_OTHER,
    }
}

/// Shareable text for a terminal session, `None` while still in progress.
///
/// ```text
/// {title} {date}
/// {attempts or X}/7
///
/// 🟩⬜🟩🟩⬜
/// ```
#[must_use]
pub fn share_text(title: &str, session: &GameSession) -> Option<String> {
    let score = match session.status() {
        SessionStatus::InProgress => return None,
        SessionStatus::Won => session.attempts().to_string(),
        SessionStatus::Lost => SHARE_LOSS_MARK.to_string(),
    };
    let mut text = format!("{title} {}\n{score}/{MAX_ATTEMPTS}\n\n", session.date());
    for row in session.rows() {
        for verdict in &row.verdicts {
            text.push_str(mark(verdict.verdict));
        }
        text.push('\n');
    }
    Some(text)
}
