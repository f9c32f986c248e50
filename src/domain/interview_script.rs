use serde::Deserialize;

use super::{CacheKey, Expression};

/// The fixed prompts an interview is conducted with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InterviewScript {
    pub intro: String,
    pub questions: Vec<String>,
    pub outro: String,
    pub nudge: String,
    pub restate: String,
}

/// Text and expression for one pre-rendered avatar clip.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarScript {
    pub key: CacheKey,
    pub text: String,
    pub expression: Expression,
}

impl Default for InterviewScript {
    fn default() -> Self {
        Self {
            intro: "Hi, my name is Salman. I'll be conducting your interview today. I'm going to \
                    ask you three questions. Please answer naturally. Let's begin."
                .to_string(),
            questions: vec![
                "Walk me through your sales experience and the types of products you've sold."
                    .to_string(),
                "Describe a time you missed target. What did you change afterward?".to_string(),
                "Why National Foods, and why this sales role?".to_string(),
            ],
            outro: "Thank you. This concludes the interview. We will be in touch soon.".to_string(),
            nudge: "Could you elaborate a bit more on that? I'd love to hear more details."
                .to_string(),
            restate: "Let me rephrase that for you.".to_string(),
        }
    }
}

impl InterviewScript {
    pub fn question_key(index: usize) -> CacheKey {
        CacheKey::new(format!("q{}", index + 1))
    }

    /// Text spoken for a script key. A bare question number (`"2"`) is
    /// accepted as well as its `q2` key.
    pub fn script_text(&self, key: &str) -> Option<&str> {
        match key {
            "intro" => Some(self.intro.as_str()),
            "outro" => Some(self.outro.as_str()),
            "nudge" => Some(self.nudge.as_str()),
            "restate" => Some(self.restate.as_str()),
            _ => {
                let number: usize = key.strip_prefix('q').unwrap_or(key).parse().ok()?;
                self.questions.get(number.checked_sub(1)?).map(String::as_str)
            }
        }
    }

    /// Every clip the avatar needs for one interview: intro, each question,
    /// outro, and the nudge/restate prompts.
    pub fn avatar_scripts(&self) -> Vec<AvatarScript> {
        let mut scripts = vec![AvatarScript {
            key: CacheKey::new("intro"),
            text: self.intro.clone(),
            expression: Expression::Happy,
        }];

        scripts.extend(self.questions.iter().enumerate().map(|(i, text)| AvatarScript {
            key: Self::question_key(i),
            text: text.clone(),
            expression: Expression::Neutral,
        }));

        scripts.extend([
            AvatarScript {
                key: CacheKey::new("outro"),
                text: self.outro.clone(),
                expression: Expression::Happy,
            },
            AvatarScript {
                key: CacheKey::new("nudge"),
                text: self.nudge.clone(),
                expression: Expression::Neutral,
            },
            AvatarScript {
                key: CacheKey::new("restate"),
                text: self.restate.clone(),
                expression: Expression::Neutral,
            },
        ]);

        scripts
    }
}
