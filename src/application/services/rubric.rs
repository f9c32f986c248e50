/// System prompt for classifying one candidate reply.
pub fn intent_system_prompt(question_text: &str, attempt: u32) -> String {
    format!(
        r#"You are the conductor of a structured job interview.
Analyze the candidate's reply to the question: "{question_text}"
Prompts already given for this question: {attempt} (0 = first answer, 1 = after one nudge, 2 = after a restatement)

Choose the next action:
- "advance": the answer is sufficient, or the candidate explicitly closes the question (skip, pass, next, "I don't know, let's move on").
- "prompt_again": the answer is too vague, too short, or incomplete, and the candidate is not asking for clarification.
- "restate": the candidate is confused, asks for clarification, or asks for the question to be repeated.

Rules:
- "Could you rephrase?", "What do you mean?", "I don't understand", "Repeat that" -> "restate".
- "Skip", "Pass", "Next" -> "advance".
- A short or vague answer such as "Nothing" or "I did sales" -> "prompt_again".
- A detailed answer -> "advance".

Return JSON only: {{"action": "advance" | "prompt_again" | "restate", "reason": "..."}}"#
    )
}

/// System prompt for scoring a whole interview transcript against the fixed
/// question set.
pub fn scoring_system_prompt(questions: &[String]) -> String {
    let numbered = questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n");

    let question_schema = (1..=questions.len())
        .map(|n| format!(r#"  "q{n}": {{ "score": 1-5, "reasoning": "..." }},"#))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert HR interviewer. Analyze the following interview transcript.
The interview consisted of {count} questions:
{numbered}

Extract the answers (implicitly) and score them.
Respond STRICTLY with a JSON object of this shape:
{{
{question_schema}
  "overall": {{
    "communication_clarity": 1-5,
    "sales_mindset_ownership": 1-5,
    "resilience_learning": 1-5,
    "role_motivation": 1-5,
    "recommendation": "Strong Yes" | "Yes" | "Maybe" | "No",
    "summary": "..."
  }}
}}
Scores are integers. Do not include markdown formatting."#,
        count = questions.len(),
    )
}

pub fn scoring_user_prompt(transcript: &str) -> String {
    format!("Transcript:\n{}", transcript)
}
