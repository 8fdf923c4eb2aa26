//! Persona document model.
//!
//! A persona is a named system prompt plus the example exchanges that show
//! how the assistant is expected to answer. Values are read-only once built;
//! every constructor validates before handing a value out.

use serde::Serialize;

use super::error::{PersonaError, PersonaResult};

pub(crate) const IN_MEMORY_ORIGIN: &str = "<in-memory>";

/// One illustrative exchange between a user and the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamplePair {
    user: String,
    ai: String,
}

impl ExamplePair {
    pub fn new(user: impl Into<String>, ai: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            ai: ai.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn ai(&self) -> &str {
        &self.ai
    }

    /// First non-blank line of the user text, used as a short title.
    pub fn title(&self) -> &str {
        self.user
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

/// A loaded persona document.
///
/// `supported_languages` and `capabilities` are optional in documents and
/// are omitted on serialization when empty, so a reload yields the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaConfig {
    name: String,
    system_prompt: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    supported_languages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    capabilities: Vec<String>,
    // Kept last: TOML requires plain values before arrays of tables.
    examples: Vec<ExamplePair>,
}

impl PersonaConfig {
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        examples: Vec<ExamplePair>,
    ) -> PersonaResult<Self> {
        let config = Self {
            name: name.into(),
            system_prompt: system_prompt.into(),
            supported_languages: Vec::new(),
            capabilities: Vec::new(),
            examples,
        };
        config.validate(IN_MEMORY_ORIGIN)?;
        Ok(config)
    }

    pub fn with_supported_languages(mut self, languages: Vec<String>) -> PersonaResult<Self> {
        self.supported_languages = languages;
        self.validate(IN_MEMORY_ORIGIN)?;
        Ok(self)
    }

    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> PersonaResult<Self> {
        self.capabilities = capabilities;
        self.validate(IN_MEMORY_ORIGIN)?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn examples(&self) -> &[ExamplePair] {
        &self.examples
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    pub(crate) fn from_parts(
        origin: &str,
        name: String,
        system_prompt: String,
        supported_languages: Vec<String>,
        capabilities: Vec<String>,
        examples: Vec<ExamplePair>,
    ) -> PersonaResult<Self> {
        let config = Self {
            name,
            system_prompt,
            supported_languages,
            capabilities,
            examples,
        };
        config.validate(origin)?;
        Ok(config)
    }

    fn validate(&self, origin: &str) -> PersonaResult<()> {
        require_text(origin, "name", &self.name)?;
        require_text(origin, "system_prompt", &self.system_prompt)?;

        for (index, language) in self.supported_languages.iter().enumerate() {
            require_text(origin, &format!("supported_languages[{index}]"), language)?;
        }
        for (index, capability) in self.capabilities.iter().enumerate() {
            require_text(origin, &format!("capabilities[{index}]"), capability)?;
        }
        for (index, example) in self.examples.iter().enumerate() {
            require_text(origin, &format!("examples[{index}].user"), &example.user)?;
            require_text(origin, &format!("examples[{index}].ai"), &example.ai)?;
        }

        Ok(())
    }
}

fn require_text(origin: &str, key_path: &str, value: &str) -> PersonaResult<()> {
    if value.trim().is_empty() {
        Err(PersonaError::invalid_field(origin, key_path, "must not be empty"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ExamplePair, PersonaConfig};

    #[test]
    fn new_accepts_empty_example_list() {
        let persona = PersonaConfig::new("X", "Y", Vec::new()).expect("valid persona");
        assert_eq!(persona.name(), "X");
        assert_eq!(persona.system_prompt(), "Y");
        assert!(persona.examples().is_empty());
        assert!(persona.supported_languages().is_empty());
    }

    #[test]
    fn new_rejects_blank_name() {
        let err = PersonaConfig::new("   ", "Y", Vec::new()).expect_err("blank name");
        assert!(err.is_parse());
        assert!(err.to_string().contains("name: must not be empty"));
    }

    #[test]
    fn new_reports_key_path_of_blank_example_field() {
        let examples = vec![
            ExamplePair::new("question", "answer"),
            ExamplePair::new("second question", "\n\t"),
        ];
        let err = PersonaConfig::new("X", "Y", examples).expect_err("blank ai");
        assert!(err.to_string().contains("examples[1].ai: must not be empty"));
    }

    #[test]
    fn with_capabilities_rejects_blank_entry() {
        let persona = PersonaConfig::new("X", "Y", Vec::new()).expect("valid persona");
        let err = persona
            .with_capabilities(vec!["Code review".to_string(), String::new()])
            .expect_err("blank capability");
        assert!(err.to_string().contains("capabilities[1]: must not be empty"));
    }

    #[test]
    fn stored_text_is_not_trimmed() {
        let examples = vec![ExamplePair::new("  indented?\n", "```\n  code\n```\n")];
        let persona = PersonaConfig::new("X", "Y\n", examples).expect("valid persona");
        assert_eq!(persona.system_prompt(), "Y\n");
        assert_eq!(persona.examples()[0].ai(), "```\n  code\n```\n");
    }

    #[test]
    fn title_uses_first_non_blank_line() {
        let pair = ExamplePair::new("\n  What is wrong here?\nfor (;;) {}", "answer");
        assert_eq!(pair.title(), "What is wrong here?");
    }
}
