use super::domain::{Category, CategoryQuestion};

/// One prompt per category, in assessment order. Only the profession is interpolated;
/// the scenario is shown alongside the questions rather than inside them.
///
/// `profession` is the name the respondent gave, not the folded [`Profession`], so an
/// unlisted job still reads naturally in the prompt.
///
/// [`Profession`]: super::domain::Profession
pub fn generate_questions(profession: &str) -> Vec<CategoryQuestion> {
    Category::ALL
        .into_iter()
        .map(|category| CategoryQuestion {
            category,
            prompt: question_for(category, profession),
        })
        .collect()
}

pub fn question_for(category: Category, profession: &str) -> String {
    match category {
        Category::SelfAwareness => format!(
            "Reflecting on this {profession} scenario, what specific emotions are you feeling right now and why?"
        ),
        Category::EmotionalRegulation => "How would you manage your immediate emotional reaction upon hearing this to ensure you remain professional?".to_string(),
        Category::ConflictResolution => format!(
            "As a {profession}, what specific steps would you take to address the conflict or tension in this situation?"
        ),
        Category::EmotionalResilience => {
            "If the situation worsens, how will you maintain your focus and morale?".to_string()
        }
        Category::EmpathyCulturalAwareness => "Try to see the situation from the other person's perspective. What might they be feeling or experiencing?".to_string(),
    }
}
