//! Keyword-based tier classification of free-text job titles.

use std::sync::OnceLock;

use regex::{RegexSet, RegexSetBuilder};
use tracing::trace;

use crate::domain::error::DomainError;
use crate::domain::Tier;

pub const BOARD_KEYWORDS: [&str; 5] = ["board", "president", "chair", "executive", "ceo"];
pub const DIRECTOR_KEYWORDS: [&str; 5] = ["director", "vice", "coordinator", "head", "chief"];
pub const MANAGER_KEYWORDS: [&str; 5] = ["manager", "officer", "secretary", "treasurer", "minister"];

/// Compiled keyword sets, checked in tier order; first hit wins.
///
/// Keywords are literal, case-insensitive substrings.
#[derive(Debug, Clone)]
pub struct TierRules {
    board: RegexSet,
    director: RegexSet,
    manager: RegexSet,
}

impl Default for TierRules {
    fn default() -> Self {
        Self::from_keywords(&BOARD_KEYWORDS, &DIRECTOR_KEYWORDS, &MANAGER_KEYWORDS)
            .expect("built-in tier keywords are valid literals")
    }
}

impl TierRules {
    pub fn from_keywords<S: AsRef<str>>(
        board: &[S],
        director: &[S],
        manager: &[S],
    ) -> Result<Self, DomainError> {
        Ok(Self {
            board: compile("board", board)?,
            director: compile("director", director)?,
            manager: compile("manager", manager)?,
        })
    }

    /// Classify a position; `None` and blank titles fall through to `Tier::Member`.
    pub fn classify(&self, position: Option<&str>) -> Tier {
        let Some(position) = position.map(str::trim).filter(|p| !p.is_empty()) else {
            return Tier::Member;
        };
        let tier = if self.board.is_match(position) {
            Tier::Board
        } else if self.director.is_match(position) {
            Tier::Director
        } else if self.manager.is_match(position) {
            Tier::Manager
        } else {
            Tier::Member
        };
        trace!(position, tier = tier.as_u8(), "classified");
        tier
    }
}

fn compile<S: AsRef<str>>(tier: &'static str, keywords: &[S]) -> Result<RegexSet, DomainError> {
    let patterns = keywords
        .iter()
        .map(|k| k.as_ref().trim())
        .filter(|k| !k.is_empty())
        .map(regex::escape);
    RegexSetBuilder::new(patterns)
        .case_insensitive(true)
        .build()
        .map_err(|e| DomainError::InvalidKeyword {
            tier,
            message: e.to_string(),
        })
}

/// Classify with the built-in keyword sets.
pub fn classify_tier(position: Option<&str>) -> Tier {
    static DEFAULT_RULES: OnceLock<TierRules> = OnceLock::new();
    DEFAULT_RULES.get_or_init(TierRules::default).classify(position)
}
