//! Prompt construction and response parsing.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{BenchError, Result};

const PLACEHOLDER: &str = "{translation_text}";

/// Default instruction sent to the agent. The agent is expected to answer
/// inside a `<translation>` tag.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "
Two aligned Bible text files are in this project (line-by-line verse correspondence).
Blank lines indicate untranslated verses.
Before translating, analyze relevant parts of both source and target texts to understand translation patterns.
Translate this text:
{translation_text}

Provide your answer in this format:
<translation>your translation here</translation>
";

/// An instruction template with a `{translation_text}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(PLACEHOLDER) {
            return Err(BenchError::Config(format!(
                "prompt template must contain {PLACEHOLDER}"
            )));
        }
        Ok(Self { template })
    }

    pub fn render(&self, source_text: &str) -> String {
        self.template.replace(PLACEHOLDER, source_text)
    }
}

fn translation_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(r"(?is)<translation>(.*?)</translation>").expect("translation tag regex is valid")
    })
}

/// Trimmed content of the first `<translation>` tag (case-insensitive,
/// may span lines), or the whole trimmed output when no tag is present.
pub fn extract_translation(output: &str) -> String {
    match translation_tag().captures(output).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim().to_string(),
        None => output.trim().to_string(),
    }
}
