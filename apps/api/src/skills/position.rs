use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::vocabulary::PositionRule;

/// How a rule's skill list is tested against the matched skills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMatch {
    /// Any one listed skill triggers the rule.
    #[default]
    AnyOf,
    /// Every listed skill must be present.
    AllOf,
}

impl FromStr for RuleMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any_of" | "any" => Ok(RuleMatch::AnyOf),
            "all_of" | "all" => Ok(RuleMatch::AllOf),
            other => Err(format!("unknown position match mode '{other}' (expected any_of|all_of)")),
        }
    }
}

/// Walks `rules` in declared order and returns the first satisfied label.
///
/// First match, not best match: when several roles fit, declaration order decides.
/// The order of `matched` never affects the result.
pub fn infer_position(matched: &[String], rules: &[PositionRule], mode: RuleMatch) -> Option<String> {
    let has = |skill: &String| matched.iter().any(|m| m.eq_ignore_ascii_case(skill));
    rules
        .iter()
        .find(|rule| match mode {
            RuleMatch::AnyOf => rule.skills.iter().any(has),
            RuleMatch::AllOf => !rule.skills.is_empty() && rule.skills.iter().all(has),
        })
        .map(|rule| rule.label.clone())
}
