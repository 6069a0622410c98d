use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single accommodation offer. Display fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub is_scam: bool,

    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub green_flags: Vec<String>,

    /// Title, price, image and whatever else the supplier sends.
    #[serde(flatten)]
    pub display: Map<String, Value>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "listing id must be a string or number, got {other}"
        ))),
    }
}

impl Listing {
    pub fn new(id: impl Into<String>, is_scam: bool, flags: Vec<String>) -> Self {
        let (red_flags, green_flags) = if is_scam { (flags, vec![]) } else { (vec![], flags) };
        Self {
            id: id.into(),
            is_scam,
            red_flags,
            green_flags,
            display: Map::new(),
        }
    }

    /// A display field rendered as text; numbers are formatted as-is.
    pub fn display_text(&self, key: &str) -> Option<String> {
        match self.display.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The flag list that matters for this listing's ground truth.
    pub fn relevant_flags(&self) -> &[String] {
        if self.is_scam {
            &self.red_flags
        } else {
            &self.green_flags
        }
    }
}

/// Reading level of the player. Ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    A1,
    A2,
    B1,
    /// B2 and everything above it.
    B2Plus,
}

impl Difficulty {
    /// Total mapping from a free-form level tag. Unknown tags get the full level.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "A1" => Difficulty::A1,
            "A2" => Difficulty::A2,
            "B1" => Difficulty::B1,
            _ => Difficulty::B2Plus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::A1 => "A1",
            Difficulty::A2 => "A2",
            Difficulty::B1 => "B1",
            Difficulty::B2Plus => "B2+",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback shown after a decision, keyed on the listing's ground truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Explanation {
    Scam { flags: Vec<String>, tips: Vec<String> },
    Legitimate { flags: Vec<String>, tips: Vec<String> },
}

impl Explanation {
    pub fn flags(&self) -> &[String] {
        match self {
            Explanation::Scam { flags, .. } | Explanation::Legitimate { flags, .. } => flags,
        }
    }

    pub fn tips(&self) -> &[String] {
        match self {
            Explanation::Scam { tips, .. } | Explanation::Legitimate { tips, .. } => tips,
        }
    }

    pub fn is_scam(&self) -> bool {
        matches!(self, Explanation::Scam { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub listing: Listing,
    /// `true` means the player judged the listing legitimate.
    pub user_choice: bool,
    pub is_correct: bool,
    pub explanation: Explanation,
    pub points_awarded: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Expert,
    Advanced,
    Intermediate,
    Beginner,
    Novice,
}

impl Rating {
    /// Bands are inclusive on their lower bound, checked top-down.
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p >= 90 => Rating::Expert,
            p if p >= 80 => Rating::Advanced,
            p if p >= 70 => Rating::Intermediate,
            p if p >= 60 => Rating::Beginner,
            _ => Rating::Novice,
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalScore {
    pub score: u32,
    pub total: usize,
    /// 0 for an empty session.
    pub percentage: u32,
    pub rating: Rating,
    pub history: Vec<DecisionRecord>,
}

/// Which way a card left the screen. Right accepts, left rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn from_offset(dx: f64) -> Self {
        if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    }

    /// The boolean handed to the decision engine.
    pub fn accepts(&self) -> bool {
        matches!(self, SwipeDirection::Right)
    }

    pub fn sign(&self) -> f64 {
        match self {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        }
    }
}
