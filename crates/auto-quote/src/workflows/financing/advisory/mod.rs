//! Best-effort term recommendation from an external advisor.
//!
//! The advisor only ever sees a finished menu; whatever it answers is checked
//! against the menu's terms before anything is marked recommended.

mod http;

pub use http::HttpAdvisor;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::domain::{CreditProfile, FinancingOption};

#[async_trait]
pub trait AdvisoryGateway: Send + Sync {
    /// Returns a term in months, or `None` when the advisor has no opinion.
    async fn recommend(
        &self,
        menu: &[FinancingOption],
        profile: &CreditProfile,
    ) -> Result<Option<u32>, AdvisoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory transport failed: {0}")]
    Transport(String),
    #[error("advisory response malformed: {0}")]
    Malformed(String),
}

/// Outcome of the advisory step, reported next to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryStatus {
    Accepted,
    NoOpinion,
    Rejected,
    Unavailable,
    TimedOut,
    Skipped,
}

impl AdvisoryStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AdvisoryStatus::Accepted => "accepted",
            AdvisoryStatus::NoOpinion => "no opinion",
            AdvisoryStatus::Rejected => "rejected (term not offered)",
            AdvisoryStatus::Unavailable => "unavailable",
            AdvisoryStatus::TimedOut => "timed out",
            AdvisoryStatus::Skipped => "skipped",
        }
    }
}

/// Advisor that never has an opinion; used when no endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAdvisor;

#[async_trait]
impl AdvisoryGateway for NoAdvisor {
    async fn recommend(
        &self,
        _menu: &[FinancingOption],
        _profile: &CreditProfile,
    ) -> Result<Option<u32>, AdvisoryError> {
        Ok(None)
    }
}

/// Pulls a term out of free-text advisor output.
///
/// The first run of ASCII digits wins. Text without digits counts as "no
/// opinion" only when it says so; anything else is malformed.
pub fn parse_recommended_term(text: &str) -> Result<Option<u32>, AdvisoryError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let digits: String = trimmed
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        let lowered = trimmed.to_ascii_lowercase();
        if lowered.contains("none") || lowered.contains("no opinion") || lowered.contains("n/a") {
            return Ok(None);
        }
        return Err(AdvisoryError::Malformed(format!(
            "expected a term in months, got '{}'",
            truncate(trimmed, 80)
        )));
    }

    digits
        .parse::<u32>()
        .map(Some)
        .map_err(|_| AdvisoryError::Malformed(format!("term '{digits}' is out of range")))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_embedded_terms() {
        assert_eq!(parse_recommended_term("60").expect("parses"), Some(60));
        assert_eq!(
            parse_recommended_term("I'd recommend the 48-month term.").expect("parses"),
            Some(48)
        );
    }

    #[test]
    fn treats_explicit_abstention_as_no_opinion() {
        assert_eq!(parse_recommended_term("").expect("parses"), None);
        assert_eq!(parse_recommended_term("None").expect("parses"), None);
        assert_eq!(parse_recommended_term("no opinion").expect("parses"), None);
    }

    #[test]
    fn rejects_chatter_without_a_term() {
        assert!(matches!(
            parse_recommended_term("the shortest one"),
            Err(AdvisoryError::Malformed(_))
        ));
        assert!(matches!(
            parse_recommended_term("99999999999999"),
            Err(AdvisoryError::Malformed(_))
        ));
    }
}
