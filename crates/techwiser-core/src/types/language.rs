//! Response languages for generated user-facing text

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language the generated app's user-facing text should be written in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Mr,
}

impl Language {
    /// All supported languages, in menu order
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Mr];

    /// Parse a language code ("en", "hi", "mr")
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Language::En),
            "hi" => Some(Language::Hi),
            "mr" => Some(Language::Mr),
            _ => None,
        }
    }

    /// Short language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
        }
    }

    /// English name of the language, as used in the prompt prefix
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Mr => "Marathi",
        }
    }

    /// BCP 47 locale used for speech recognition
    pub fn speech_locale(&self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Hi => "hi-IN",
            Language::Mr => "mr-IN",
        }
    }

    /// Instruction prepended to every prompt, e.g. `"[Respond in Hindi] "`
    pub fn instruction_prefix(&self) -> String {
        format!("[Respond in {}] ", self.display_name())
    }

    /// Prefix a prompt with the language instruction
    pub fn apply(&self, prompt: &str) -> String {
        format!("{}{}", self.instruction_prefix(), prompt)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_prefix() {
        assert_eq!(Language::En.instruction_prefix(), "[Respond in English] ");
        assert_eq!(Language::Hi.instruction_prefix(), "[Respond in Hindi] ");
        assert_eq!(Language::Mr.instruction_prefix(), "[Respond in Marathi] ");
    }

    #[test]
    fn test_apply() {
        assert_eq!(
            Language::Hi.apply("Build a todo app"),
            "[Respond in Hindi] Build a todo app"
        );
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("mr"), Some(Language::Mr));
        assert_eq!(Language::from_code(" HI "), Some(Language::Hi));
        assert_eq!(Language::from_code("fr"), None);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_serde_codes() {
        let lang: Language = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(lang, Language::Hi);
        assert_eq!(serde_json::to_string(&Language::Mr).unwrap(), "\"mr\"");
    }
}
