use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured nutrition facts extracted from a label photograph.
///
/// Every field except `raw_text` is best-effort: an unmatched field stays
/// `None` (serialized as `null`), which downstream consumers must treat as
/// "not found" rather than "measured as zero". `raw_text` always holds the
/// verbatim OCR blob, even when nothing else could be extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub calories: Option<u32>,
    pub fat: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub protein: Option<f64>,
    pub ingredients: Vec<String>,
    pub raw_text: String,
}

impl NutritionRecord {
    /// An empty record carrying only the source text.
    pub fn empty(raw_text: impl Into<String>) -> Self {
        NutritionRecord {
            calories: None,
            fat: None,
            carbohydrates: None,
            protein: None,
            ingredients: Vec::new(),
            raw_text: raw_text.into(),
        }
    }

    /// True when no numeric field matched and no ingredients were found.
    pub fn is_empty(&self) -> bool {
        self.calories.is_none()
            && self.fat.is_none()
            && self.carbohydrates.is_none()
            && self.protein.is_none()
            && self.ingredients.is_empty()
    }
}

/// Narrative health assessment returned by an analysis provider.
///
/// The provider is prompted to answer with this exact JSON shape, but model
/// output drifts; every list defaults to empty and `health_score` accepts
/// either a JSON number or a quoted number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub summary: String,
    #[serde(deserialize_with = "score_from_number_or_string")]
    pub health_score: u8,
    #[serde(default)]
    pub positive_aspects: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
    #[serde(default)]
    pub allergen_warnings: Vec<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub fit_for_user: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

fn score_from_number_or_string<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| de::Error::custom("health_score out of range")),
        Value::String(s) => s
            .trim()
            .parse::<u8>()
            .map_err(|_| de::Error::custom(format!("invalid health_score: {:?}", s))),
        other => Err(de::Error::custom(format!(
            "health_score must be a number, got {}",
            other
        ))),
    }
}

/// Display-ready verdict derived from an [`Analysis`], for frontend rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub title: String,
    /// Hex color keyed off the health score
    pub color: String,
    pub icon: String,
    pub health_score: u8,
    pub positive_aspects: Vec<String>,
    pub concerns: Vec<String>,
    pub alternatives: Vec<String>,
    pub tips: Vec<String>,
    pub fit_for_user: Option<String>,
    pub explanation: Option<String>,
}

impl Verdict {
    /// Map a health score to the traffic-light verdict shown in the UI.
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let (color, icon) = match analysis.health_score {
            8..=u8::MAX => ("#4CAF50", "thumb_up"),
            6..=7 => ("#FFC107", "thumbs_up_down"),
            _ => ("#F44336", "thumb_down"),
        };

        Verdict {
            title: analysis.summary.clone(),
            color: color.to_string(),
            icon: icon.to_string(),
            health_score: analysis.health_score,
            positive_aspects: analysis.positive_aspects.clone(),
            concerns: analysis.concerns.clone(),
            alternatives: analysis.alternatives.clone(),
            tips: analysis.tips.clone(),
            fit_for_user: analysis.fit_for_user.clone(),
            explanation: analysis.explanation.clone(),
        }
    }
}

/// Complete result of a product scan: the parsed record plus, when analysis
/// was requested, the narrative assessment and its display verdict.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub product_name: Option<String>,
    pub record: NutritionRecord,
    pub analysis: Option<Analysis>,
    pub verdict: Option<Verdict>,
}
