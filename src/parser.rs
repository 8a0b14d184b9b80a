//! Rule-based extraction of nutrition facts from OCR text.
//!
//! OCR output from label photographs is noisy: spacing, punctuation, and the
//! order of value and unit vary from shot to shot ("Fat: 10g", "10g fat",
//! "fat (10g)"). Rather than a grammar, each field carries a prioritized list
//! of regex patterns tried per line; the first line in document order that
//! both names the field and yields a parseable number wins, and later lines
//! never overwrite it.
//!
//! Ingredients are the one deliberate exception: every line containing
//! "ingredients" re-triggers extraction of the line below it, so the LAST
//! trigger in the document wins. This asymmetry is preserved on purpose as
//! observed labeling-data behavior; see DESIGN.md before unifying it.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::model::NutritionRecord;

static CALORIE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"calories[:\s]*(\d+)",
        r"(\d+)\s*calories",
        r"kcal[:\s]*(\d+)",
        r"(\d+)\s*kcal",
    ])
});

static FAT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"fat[:\s]*\(?(\d+\.?\d*)\s*g",
        r"(\d+\.?\d*)\s*g\s*(?:of\s+)?fat",
    ])
});

static CARB_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"carb[^:\d]*[:\s]*\(?(\d+\.?\d*)\s*g",
        r"(\d+\.?\d*)\s*g\s*(?:of\s+)?carb",
    ])
});

static PROTEIN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"protein[:\s]*\(?(\d+\.?\d*)\s*g",
        r"(\d+\.?\d*)\s*g\s*(?:of\s+)?protein",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invalid built-in pattern"))
        .collect()
}

/// Parse a free-form OCR text blob into a [`NutritionRecord`].
///
/// Total over all string inputs: the empty string, binary garbage, and text
/// with no recognizable structure all produce a record (with every field
/// absent in the worst case). `raw_text` is always the input, verbatim.
/// Pure and stateless, so safe to call concurrently.
pub fn parse_nutrition_facts(text: &str) -> NutritionRecord {
    let mut record = NutritionRecord::empty(text);

    // Original casing is kept for stored ingredient text; the lowered copy
    // exists only for keyword gating and pattern matching.
    let lines: Vec<&str> = text.split('\n').collect();
    let lowered: Vec<String> = lines.iter().map(|l| l.to_lowercase()).collect();

    for (i, lower) in lowered.iter().enumerate() {
        if record.calories.is_none() && (lower.contains("calories") || lower.contains("kcal")) {
            record.calories = match_first::<u32>(lower, &CALORIE_PATTERNS);
        }

        // "Saturated Fat 6g" is a sub-entry of total fat and must not claim
        // the fat field on its own.
        if record.fat.is_none() && lower.contains("fat") && !lower.contains("saturated") {
            record.fat = match_first::<f64>(lower, &FAT_PATTERNS);
        }

        if record.carbohydrates.is_none()
            && (lower.contains("carbohydrate") || lower.contains("carbs"))
        {
            record.carbohydrates = match_first::<f64>(lower, &CARB_PATTERNS);
        }

        if record.protein.is_none() && lower.contains("protein") {
            record.protein = match_first::<f64>(lower, &PROTEIN_PATTERNS);
        }

        // Last trigger wins; a trigger on the final line extracts nothing and
        // leaves any earlier extraction in place.
        if lower.contains("ingredients") {
            if let Some(following) = lines.get(i + 1) {
                record.ingredients = split_ingredients(following);
            }
        }
    }

    debug!(
        "parsed record: calories={:?} fat={:?} carbs={:?} protein={:?} ingredients={}",
        record.calories,
        record.fat,
        record.carbohydrates,
        record.protein,
        record.ingredients.len()
    );

    record
}

/// Try each pattern in priority order against one line; the first pattern
/// whose capture parses as `T` wins. A match that fails to parse (malformed
/// OCR digits) falls through to the next pattern rather than aborting.
fn match_first<T: FromStr>(line: &str, patterns: &[Regex]) -> Option<T> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<T>().ok())
    })
}

/// Split an ingredient line on comma and period, trimming whitespace and
/// dropping tokens that are empty after trimming.
fn split_ingredients(line: &str) -> Vec<String> {
    line.split([',', '.'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
