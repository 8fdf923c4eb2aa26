//! Prompt assembly on top of a persona.
//!
//! Nothing here talks to a model. These helpers select example exchanges and
//! lay out the text or message list a model client would send.

use serde::Serialize;

use crate::persona::{ExamplePair, PersonaConfig};

pub const DEFAULT_MAX_EXAMPLES: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRequest {
    pub user_prompt: String,
    pub language: Option<String>,
    pub context: Option<String>,
}

impl PromptRequest {
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            user_prompt: user_prompt.into(),
            language: None,
            context: None,
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Examples whose question or answer mentions `language`, ignoring case.
/// The match is a plain substring test, so an empty language matches every
/// example.
pub fn language_examples<'a>(persona: &'a PersonaConfig, language: &str) -> Vec<&'a ExamplePair> {
    let needle = language.to_lowercase();
    persona
        .examples()
        .iter()
        .filter(|example| {
            example.user().to_lowercase().contains(&needle)
                || example.ai().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Ranks examples by how many whitespace-separated words of `user_prompt`
/// occur in them and returns the best `max`. Repeated words count again;
/// ties keep document order.
pub fn relevant_examples<'a>(
    persona: &'a PersonaConfig,
    user_prompt: &str,
    max: usize,
) -> Vec<&'a ExamplePair> {
    let prompt = user_prompt.to_lowercase();
    let keywords: Vec<&str> = prompt.split_whitespace().collect();
    if keywords.is_empty() || max == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(&ExamplePair, usize)> = persona
        .examples()
        .iter()
        .map(|example| {
            let text = format!("{} {}", example.user(), example.ai()).to_lowercase();
            let score = keywords
                .iter()
                .filter(|keyword| text.contains(**keyword))
                .count();
            (example, score)
        })
        .filter(|(_, score)| *score > 0)
        .collect();

    scored.sort_by(|left, right| right.1.cmp(&left.1));
    scored
        .into_iter()
        .take(max)
        .map(|(example, _)| example)
        .collect()
}

/// The system prompt followed by the request body.
pub fn build_enhanced_prompt(persona: &PersonaConfig, request: &PromptRequest) -> String {
    format!("{}\n\n{}", persona.system_prompt(), request_body(request))
}

/// Language and context lines, then the user request itself.
pub fn request_body(request: &PromptRequest) -> String {
    let mut body = String::new();

    if let Some(language) = non_blank(request.language.as_deref()) {
        body.push_str(&format!("Use the {language} programming language.\n\n"));
    }
    if let Some(context) = non_blank(request.context.as_deref()) {
        body.push_str(&format!("Context: {context}\n\n"));
    }
    body.push_str(&format!("User request: {}", request.user_prompt));

    body
}

/// System prompt, then each example as a user/assistant turn, then the request.
pub fn few_shot_messages(
    persona: &PersonaConfig,
    examples: &[&ExamplePair],
    request: &PromptRequest,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(examples.len() * 2 + 2);
    messages.push(ChatMessage::new(Role::System, persona.system_prompt()));

    for example in examples {
        messages.push(ChatMessage::new(Role::User, example.user()));
        messages.push(ChatMessage::new(Role::Assistant, example.ai()));
    }

    messages.push(ChatMessage::new(Role::User, request_body(request)));
    messages
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
