use crate::model::NutritionRecord;
use crate::profile::UserProfile;

/// The instruction block sent with every nutrition analysis request.
///
/// Loaded from `prompt.txt` at compile time using the `include_str!` macro,
/// making it easy to edit without dealing with Rust string syntax.
pub const ANALYSIS_PROMPT: &str = include_str!("prompt.txt");

/// Render the complete analysis prompt for a scanned product.
///
/// Absent numeric fields are rendered as "unknown" so the model never
/// confuses a failed extraction with a measured zero. Profile sections are
/// only emitted when a profile is supplied.
pub fn build_analysis_prompt(
    record: &NutritionRecord,
    profile: Option<&UserProfile>,
    product_name: Option<&str>,
) -> String {
    let mut prompt = String::from(ANALYSIS_PROMPT);

    prompt.push_str("\n## Product Information\n");
    if let Some(name) = product_name {
        prompt.push_str(&format!("- Product Name: {}\n", name));
    }
    prompt.push_str(&format!(
        "- Calories: {} kcal\n",
        fmt_opt(record.calories.map(|c| c.to_string()))
    ));
    prompt.push_str(&format!(
        "- Fat: {}g\n",
        fmt_opt(record.fat.map(|v| v.to_string()))
    ));
    prompt.push_str(&format!(
        "- Carbohydrates: {}g\n",
        fmt_opt(record.carbohydrates.map(|v| v.to_string()))
    ));
    prompt.push_str(&format!(
        "- Protein: {}g\n",
        fmt_opt(record.protein.map(|v| v.to_string()))
    ));
    prompt.push_str(&format!("- Ingredients: {}\n", join_or_unknown(&record.ingredients)));
    prompt.push_str(&format!("- Raw OCR Text: {}\n", record.raw_text));

    if let Some(profile) = profile {
        prompt.push_str("\n## User Profile\n");
        prompt.push_str(&format!(
            "- Name: {}\n",
            profile.name.as_deref().unwrap_or("User")
        ));
        prompt.push_str(&format!(
            "- Weight Goal: {}\n",
            profile.weight_goal.as_deref().unwrap_or("Not specified")
        ));
        prompt.push_str(&format!(
            "- Dietary Restrictions: {}\n",
            join_or_none(&profile.dietary_restrictions)
        ));
        prompt.push_str(&format!("- Allergies: {}\n", join_or_none(&profile.allergies)));
        prompt.push_str(&format!(
            "- Health Conditions: {}\n",
            join_or_none(&profile.health_conditions)
        ));
        prompt.push_str(&format!(
            "- Daily Calorie Target: {}\n",
            profile
                .daily_calorie_target
                .map(|t| t.to_string())
                .unwrap_or_else(|| "Not specified".to_string())
        ));
        prompt.push_str(&format!(
            "- Activity Level: {}\n",
            profile.activity_level.as_deref().unwrap_or("Not specified")
        ));

        prompt.push_str(
            "\n## Personalization Requirements\n\
             1. Evaluate if this food aligns with the user's dietary preferences and restrictions\n\
             2. Assess if any ingredients conflict with the user's allergies (highlight these as warnings)\n\
             3. Determine if this food is appropriate for their weight goal and health conditions\n\
             4. Suggest how this food might fit into their daily calorie target\n",
        );
    }

    prompt
}

fn fmt_opt(value: Option<String>) -> String {
    value.unwrap_or_else(|| "unknown".to_string())
}

fn join_or_unknown(items: &[String]) -> String {
    if items.is_empty() {
        "unknown".to_string()
    } else {
        items.join(", ")
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}
