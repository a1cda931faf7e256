//! Assistant persona definition

use serde::{Deserialize, Serialize};

/// System prompt for the default persona
const LEO_PROMPT: &str = "You are Leo, a helpful and friendly AI assistant. \
You speak clearly, stay concise, and maintain a conversational tone. \
You blend warmth with intelligence, avoid being overly formal, \
and gently steer the conversation back if the user goes off-topic.";

/// The assistant's voice-facing identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Display name
    pub name: String,
    /// System prompt injected ahead of every conversation
    pub system_prompt: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Leo".to_string(),
            system_prompt: LEO_PROMPT.to_string(),
        }
    }
}

impl Persona {
    /// Create a custom persona
    #[must_use]
    pub fn new(name: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_persona_is_leo() {
        let persona = Persona::default();
        assert_eq!(persona.name, "Leo");
        assert!(persona.system_prompt.starts_with("You are Leo"));
    }
}
