//! Prefix-triggered special skills
//!
//! A transcript like `news: climate` bypasses the LLM entirely and is
//! answered by the matching skill. Skill replies are text-only; the agent
//! pipeline skips synthesis for them.

mod news;
mod search;

pub use news::NewsSkill;
pub use search::WebSearchSkill;

use async_trait::async_trait;

use crate::Result;

/// A skill answers a query on its own, without the LLM
#[async_trait]
pub trait Skill: Send + Sync {
    /// Transcript prefix that triggers this skill, e.g. `search:`
    fn prefix(&self) -> &'static str;

    /// Skill name for logging
    fn name(&self) -> &'static str;

    /// Answer the query (the transcript with the prefix stripped)
    ///
    /// # Errors
    ///
    /// Returns error if the skill cannot produce a reply. Upstream service
    /// hiccups should degrade to a friendly reply instead of an error.
    async fn run(&self, query: &str) -> Result<String>;
}

/// Dispatches transcripts to the first skill whose prefix matches
#[derive(Default)]
pub struct SkillRegistry {
    skills: Vec<Box<dyn Skill>>,
}

impl SkillRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a skill to the registry
    pub fn register(&mut self, skill: Box<dyn Skill>) {
        self.skills.push(skill);
    }

    /// Find the skill whose prefix opens the transcript
    ///
    /// Matching is ASCII case-insensitive; the returned query has the prefix
    /// stripped and surrounding whitespace trimmed.
    #[must_use]
    pub fn dispatch<'a, 'b>(&'a self, text: &'b str) -> Option<(&'a dyn Skill, &'b str)> {
        for skill in &self.skills {
            let prefix = skill.prefix();
            if let Some(head) = text.get(..prefix.len()) {
                if head.eq_ignore_ascii_case(prefix) {
                    let query = text[prefix.len()..].trim();
                    return Some((skill.as_ref(), query));
                }
            }
        }
        None
    }
}
