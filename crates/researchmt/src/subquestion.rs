//! Sub-question outline and the composed prompt sent to every engine.

const THEMES: [&str; 10] = [
    "Background and definitions",
    "Current landscape and trends",
    "Opportunities and benefits",
    "Risks and limitations",
    "Key metrics and benchmarks",
    "Case studies and evidence",
    "Counterarguments and alternatives",
    "Forecast (3-5 years)",
    "Implementation considerations",
    "Sources to monitor",
];

/// Questions shorter than this get the bare themes without a topic suffix.
const MIN_TOPIC_LEN: usize = 12;

const INSTRUCTIONS: [&str; 4] = [
    "- Provide concise bullet points grouped by themes",
    "- Prefer facts, data, and concrete examples; mark uncertainties explicitly",
    "- Note any conflicting evidence or viewpoints",
    "- End with 3-5 actionable recommendations",
];

/// Ten themed sub-questions, suffixed with the question topic when the
/// trimmed question is long enough to be one.
pub fn generate_subquestions(question: &str) -> Vec<String> {
    let q = question.trim();
    if q.chars().count() < MIN_TOPIC_LEN {
        return THEMES.iter().map(|t| t.to_string()).collect();
    }
    let topic = q.trim_end_matches('?');
    THEMES.iter().map(|t| format!("{t} for: {topic}")).collect()
}

pub fn build_prompt(question: &str, subquestions: &[String]) -> String {
    let mut lines = vec![
        format!("Primary question: {question}"),
        String::new(),
        "Breakdown into sub-questions:".to_string(),
    ];
    lines.extend(
        subquestions
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {s}", i + 1)),
    );
    lines.push(String::new());
    lines.push("Instructions:".to_string());
    lines.extend(INSTRUCTIONS.iter().map(|i| i.to_string()));
    lines.join("\n")
}
