use crate::ScoreRequest;
use esco_highlight::LabelEntry;

/// The JSON object the model is asked to answer with.
pub const RESPONSE_SHAPE: &str =
    r#"{"score":0.0,"explanation":"","explanation_short":"","recommend":false}"#;

/// Build the assessment prompt for one (activity, person) pair.
pub fn build_prompt(request: &ScoreRequest) -> String {
    let person = request.person_index + 1;
    let needed = skill_list(&request.labels, |e| e.needed);
    let optional = skill_list(&request.labels, |e| e.optional);
    let trainable = skill_list(&request.labels, |e| e.trainable);
    let skills = request.person_skills.join(", ");
    let goal = &request.goal;
    let interests = &request.interests;
    let activity = &request.activity_text;

    format!(
        "Person {person} has the following skills: {skills}.
User Goal: {goal}
User Interests: {interests}

Task:
Decide whether Person {person} can carry out the activity below, taking their skills, goal and interests into account.

Activity Text:
{activity}

Needed Skills:
{needed}

Optional Skills:
{optional}

Trainable Skills:
{trainable}

Response (JSON):
{RESPONSE_SHAPE}

Response fields:
- score: number between 0.0 and 1.0; how well Person {person} covers the needed skills (1.0 = complete match, 0.0 = no match).
- explanation: markdown text explaining the score; name the matching and missing skills, the relevant spans of the activity text, and how the activity relates to the goal and interests.
- explanation_short: a one-sentence summary of the match, followed by one sentence on the goal fit and one on the interest fit.
- recommend: true if Person {person} should be recommended for the activity.

Format the explanations with markdown headings, bullet points and bold text where useful.

IMPORTANT: ALWAYS ANSWER WITH EXACTLY THIS JSON SHAPE.

Response (JSON):
{RESPONSE_SHAPE}"
    )
}

fn skill_list(labels: &[LabelEntry], flag: impl Fn(&LabelEntry) -> bool) -> String {
    labels
        .iter()
        .filter(|e| flag(e))
        .filter_map(LabelEntry::skill_name)
        .collect::<Vec<_>>()
        .join(", ")
}
