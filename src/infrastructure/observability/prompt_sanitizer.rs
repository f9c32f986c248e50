use std::sync::LazyLock;

use regex::Regex;

const MAX_VISIBLE_CHARS: usize = 100;

static SECRET_PATTERNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(bearer|basic)\s+[A-Za-z0-9+/=._\-]{16,}|\b(api_key|xi-api-key|password|secret|token|sig)=[^\s&"']+"#,
    )
    .unwrap()
});

/// Shortens transcripts and prompts for logging and masks credentials.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = trimmed.chars().count();
    let visible = if total > MAX_VISIBLE_CHARS {
        let head: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
        format!("{}... ({} chars total)", head, total)
    } else {
        trimmed.to_string()
    };

    SECRET_PATTERNS
        .replace_all(&visible, |caps: &regex::Captures<'_>| match caps.get(1) {
            Some(scheme) => format!("{} [REDACTED]", scheme.as_str()),
            None => format!("{}=[REDACTED]", &caps[2]),
        })
        .into_owned()
}
