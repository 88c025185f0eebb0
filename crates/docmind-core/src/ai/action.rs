//! Editing actions offered by the AI menu and their prompt templates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A predefined rewrite applied to the user's selected text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiAction {
    ImproveWriting,
    FixSpellingGrammar,
    MakeShorter,
    MakeLonger,
    Simplify,
    ChangeTone,
    Summarize,
    ContinueWriting,
    Translate,
    Custom,
}

impl AiAction {
    /// Every action, in the order the config endpoint advertises them.
    pub const ALL: [AiAction; 10] = [
        AiAction::ImproveWriting,
        AiAction::FixSpellingGrammar,
        AiAction::MakeShorter,
        AiAction::MakeLonger,
        AiAction::Simplify,
        AiAction::ChangeTone,
        AiAction::Summarize,
        AiAction::ContinueWriting,
        AiAction::Translate,
        AiAction::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AiAction::ImproveWriting => "improve_writing",
            AiAction::FixSpellingGrammar => "fix_spelling_grammar",
            AiAction::MakeShorter => "make_shorter",
            AiAction::MakeLonger => "make_longer",
            AiAction::Simplify => "simplify",
            AiAction::ChangeTone => "change_tone",
            AiAction::Summarize => "summarize",
            AiAction::ContinueWriting => "continue_writing",
            AiAction::Translate => "translate",
            AiAction::Custom => "custom",
        }
    }

    /// Instruction placed before the content. `Custom` has none.
    pub fn template(&self) -> Option<&'static str> {
        match self {
            AiAction::ImproveWriting => {
                Some("Improve the following text while maintaining its meaning and style:")
            }
            AiAction::FixSpellingGrammar => {
                Some("Fix spelling and grammar errors in the following text:")
            }
            AiAction::MakeShorter => {
                Some("Make the following text more concise while keeping the main points:")
            }
            AiAction::MakeLonger => {
                Some("Expand the following text with more details and explanations:")
            }
            AiAction::Simplify => Some("Simplify the following text to make it easier to understand:"),
            AiAction::ChangeTone => Some("Rewrite the following text in a professional tone:"),
            AiAction::Summarize => Some("Summarize the following text:"),
            AiAction::ContinueWriting => Some("Continue writing from the following text:"),
            AiAction::Translate => Some("Translate the following text to English:"),
            AiAction::Custom => None,
        }
    }

    /// Apply this action to `content`.
    pub fn apply(&self, content: &str) -> String {
        match self.template() {
            Some(template) => format!("{template}\n\n{content}"),
            None => content.to_string(),
        }
    }

    /// Action keywords as strings, in advertised order.
    pub fn keywords() -> Vec<&'static str> {
        Self::ALL.iter().map(AiAction::as_str).collect()
    }
}

impl fmt::Display for AiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AiAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("unknown AI action: '{s}'"))
    }
}

/// Build the prompt sent to the model for a generate request.
///
/// A non-empty `prompt` is used verbatim and the action is ignored. An
/// unknown action keyword falls back to the raw content.
pub fn resolve_prompt(action: Option<&str>, content: &str, prompt: Option<&str>) -> String {
    if let Some(prompt) = prompt.filter(|p| !p.is_empty()) {
        return prompt.to_string();
    }

    match action {
        Some(keyword) => match keyword.parse::<AiAction>() {
            Ok(action) => action.apply(content),
            Err(_) => content.to_string(),
        },
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_in_advertised_order() {
        assert_eq!(
            AiAction::keywords(),
            vec![
                "improve_writing",
                "fix_spelling_grammar",
                "make_shorter",
                "make_longer",
                "simplify",
                "change_tone",
                "summarize",
                "continue_writing",
                "translate",
                "custom",
            ]
        );
    }

    #[test]
    fn test_every_action_maps_to_its_template() {
        let expected = [
            ("improve_writing", "Improve the following text while maintaining its meaning and style:"),
            ("fix_spelling_grammar", "Fix spelling and grammar errors in the following text:"),
            ("make_shorter", "Make the following text more concise while keeping the main points:"),
            ("make_longer", "Expand the following text with more details and explanations:"),
            ("simplify", "Simplify the following text to make it easier to understand:"),
            ("change_tone", "Rewrite the following text in a professional tone:"),
            ("summarize", "Summarize the following text:"),
            ("continue_writing", "Continue writing from the following text:"),
            ("translate", "Translate the following text to English:"),
        ];
        for (keyword, template) in expected {
            assert_eq!(
                resolve_prompt(Some(keyword), "hello world", None),
                format!("{template}\n\nhello world"),
                "action {keyword}"
            );
        }
    }

    #[test]
    fn test_custom_uses_raw_content() {
        assert_eq!(resolve_prompt(Some("custom"), "raw text", None), "raw text");
        assert!(AiAction::Custom.template().is_none());
    }

    #[test]
    fn test_unknown_action_falls_back_to_content() {
        assert_eq!(resolve_prompt(Some("rhyme"), "roses", None), "roses");
        assert_eq!(resolve_prompt(Some("SUMMARIZE"), "roses", None), "roses");
    }

    #[test]
    fn test_prompt_wins_over_action() {
        assert_eq!(
            resolve_prompt(Some("summarize"), "ignored", Some("Write a haiku")),
            "Write a haiku"
        );
    }

    #[test]
    fn test_empty_prompt_is_ignored() {
        assert_eq!(
            resolve_prompt(Some("summarize"), "text", Some("")),
            "Summarize the following text:\n\ntext"
        );
    }

    #[test]
    fn test_no_action_no_prompt() {
        assert_eq!(resolve_prompt(None, "just content", None), "just content");
    }

    #[test]
    fn test_action_serde() {
        let json = serde_json::to_string(&AiAction::FixSpellingGrammar).unwrap();
        assert_eq!(json, "\"fix_spelling_grammar\"");
    }
}
