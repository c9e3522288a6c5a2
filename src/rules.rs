// 🏷️ Classification Rules - Rules as Data
// Keyword rules for the per-row registry classifications:
// registration cause, lien (근저당), seizure (압류/가압류), ownership type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registration category when no rule matches
pub const DEFAULT_CATEGORY: &str = "기타";

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CauseRule {
    /// Rule ID for tracking
    pub id: String,

    /// Any of these substrings matches
    pub keywords: Vec<String>,

    /// Category to assign, e.g. "매매"
    pub category: String,

    /// Priority (higher = applied first)
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    0
}

impl CauseRule {
    pub fn new(id: &str, keywords: &[&str], category: &str) -> Self {
        CauseRule {
            id: id.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            category: category.to_string(),
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn matches(&self, text: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && text.contains(k.as_str()))
    }
}

// ============================================================================
// RULE ENGINE (registration cause)
// ============================================================================

#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<CauseRule>,
}

impl RuleEngine {
    /// Engine with the standard registry causes
    pub fn new() -> Self {
        RuleEngine::from_rules(Self::default_rules())
    }

    /// Standard rules plus extra ones; at equal priority the extra rules go first
    pub fn with_extra_rules(extra: Vec<CauseRule>) -> Self {
        let mut rules = extra;
        rules.extend(Self::default_rules());
        RuleEngine::from_rules(rules)
    }

    /// Create engine from a list of rules
    pub fn from_rules(mut rules: Vec<CauseRule>) -> Self {
        // Stable sort keeps list order within a priority
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        RuleEngine { rules }
    }

    fn default_rules() -> Vec<CauseRule> {
        vec![
            CauseRule::new("sale", &["매매"], "매매"),
            CauseRule::new("gift", &["증여"], "증여"),
            CauseRule::new("inheritance", &["상속"], "상속"),
            CauseRule::new("auction", &["경락", "경매"], "경매"),
        ]
    }

    /// Categorize a registration from its purpose (등기목적) and cause (등기원인)
    pub fn classify_registration(&self, purpose: &str, cause: &str) -> String {
        let combined = format!("{} {}", purpose, cause);

        self.rules
            .iter()
            .find(|rule| rule.matches(&combined))
            .map(|rule| rule.category.clone())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// LIEN (근저당)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LienStatus {
    #[serde(rename = "Y")]
    Registered,
    #[serde(rename = "N")]
    None,
}

impl LienStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LienStatus::Registered => "Y",
            LienStatus::None => "N",
        }
    }
}

pub fn lien_status(right_type: &str, right_content: &str) -> LienStatus {
    if right_type.contains("근저당") || right_content.contains("근저당") {
        LienStatus::Registered
    } else {
        LienStatus::None
    }
}

// ============================================================================
// SEIZURE (압류 / 가압류)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Seizure {
    /// 압류
    pub attachment: bool,
    /// 가압류
    pub provisional: bool,
}

impl Seizure {
    pub fn is_clear(&self) -> bool {
        !self.attachment && !self.provisional
    }
}

impl fmt::Display for Seizure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.attachment, self.provisional) {
            (true, true) => f.write_str("압류, 가압류"),
            (true, false) => f.write_str("압류"),
            (false, true) => f.write_str("가압류"),
            (false, false) => f.write_str("없음"),
        }
    }
}

/// Seizure flags of one registered right.
///
/// A 압류 that is only the tail of 가압류 does not count as an attachment, so
/// a lone 가압류 reports "가압류" rather than "압류, 가압류".
pub fn seizure_status(right_type: &str, right_content: &str) -> Seizure {
    let combined = format!("{} {}", right_type, right_content);

    let attachment = combined
        .match_indices("압류")
        .any(|(pos, _)| !combined[..pos].ends_with('가'));

    Seizure {
        attachment,
        provisional: combined.contains("가압류"),
    }
}

// ============================================================================
// OWNERSHIP TYPE (공유자 / 단독소유자)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnershipType {
    #[serde(rename = "공유자")]
    CoOwner,
    #[serde(rename = "단독소유자")]
    SoleOwner,
}

impl OwnershipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnershipType::CoOwner => "공유자",
            OwnershipType::SoleOwner => "단독소유자",
        }
    }
}

/// Co-owner when the division mentions 공유 or the share column holds a bare "-"
pub fn ownership_type(division: &str, share_marker: &str) -> OwnershipType {
    if division.contains("공유") || share_marker.trim() == "-" {
        OwnershipType::CoOwner
    } else {
        OwnershipType::SoleOwner
    }
}

// ============================================================================
// TESTS
// ============================================================================
