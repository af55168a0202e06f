//! Supported languages and their localized resource records.
//!
//! Every user-facing string the core can emit on its own (degraded-mode
//! notes, reflection gate messages, apologies) lives here as a named field,
//! so adding a language means adding one complete record — never branching
//! logic elsewhere in the pipeline.

use serde::{Deserialize, Serialize};

/// Closed set of supported response languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Arabic,
    French,
}

/// Localized strings for one language.
///
/// All fields are required; completeness across languages is checked at
/// compile time by construction.
#[derive(Debug, Clone, Copy)]
pub struct LanguageResources {
    /// ISO-ish short code ("en", "ar", "fr")
    pub code: &'static str,
    /// Display name in the language itself, embedded into prompts
    pub name: &'static str,
    /// Opening question shown by the caller layer
    pub welcome: &'static str,
    /// Progress indicator shown while generating
    pub thinking: &'static str,
    /// Farewell shown by the caller layer
    pub bye: &'static str,
    /// Substituted for retrieved context when the index is unreachable
    pub degraded_note: &'static str,
    /// Returned when there is too little history for a reflection
    pub reflection_gate: &'static str,
    /// Returned in place of a response when generation fails
    pub response_apology: &'static str,
    /// Returned in place of a reflection when generation fails
    pub reflection_apology: &'static str,
}

const ENGLISH: LanguageResources = LanguageResources {
    code: "en",
    name: "English",
    welcome: "How are you feeling today? What's on your mind?",
    thinking: "Thinking...",
    bye: "Take care of yourself. Remember that healing takes time, and you're making progress. I'm here when you need me.",
    degraded_note: "Note: I couldn't access my knowledge base at the moment, but I'll still do my best to help you.",
    reflection_gate: "Not enough conversation history for a meaningful reflection yet.",
    response_apology: "I'm sorry, I ran into a problem while responding. I'm still here — please try again in a moment.",
    reflection_apology: "I couldn't generate a reflection at this time.",
};

const ARABIC: LanguageResources = LanguageResources {
    code: "ar",
    name: "العربية",
    welcome: "كيف تشعر اليوم؟ ما الذي يدور في ذهنك؟",
    thinking: "جاري التفكير...",
    bye: "اعتن بنفسك. تذكر أن الشفاء يستغرق وقتاً، وأنت تحرز تقدماً. أنا هنا عندما تحتاجني.",
    degraded_note: "ملاحظة: لم أتمكن من الوصول إلى قاعدة معرفتي في الوقت الحالي، لكنني سأبذل قصارى جهدي لمساعدتك.",
    reflection_gate: "لا يوجد تاريخ محادثة كافٍ للتفكير المفيد بعد.",
    response_apology: "أنا آسف، لقد واجهت مشكلة أثناء الرد. ما زلت هنا، يرجى المحاولة مرة أخرى بعد قليل.",
    reflection_apology: "لم أتمكن من إنشاء تفكير في هذا الوقت.",
};

const FRENCH: LanguageResources = LanguageResources {
    code: "fr",
    name: "Français",
    welcome: "Comment vous sentez-vous aujourd'hui ? Qu'est-ce qui vous préoccupe ?",
    thinking: "Réflexion en cours...",
    bye: "Prenez soin de vous. N'oubliez pas que la guérison prend du temps, et vous faites des progrès. Je suis là quand vous avez besoin de moi.",
    degraded_note: "Remarque: Je n'ai pas pu accéder à ma base de connaissances pour le moment, mais je ferai de mon mieux pour vous aider.",
    reflection_gate: "Pas encore assez d'historique de conversation pour une réflexion significative.",
    response_apology: "Je suis désolé, j'ai rencontré un problème en répondant. Je suis toujours là — veuillez réessayer dans un instant.",
    reflection_apology: "Je n'ai pas pu générer une réflexion pour le moment.",
};

impl Language {
    /// All supported languages, in display order.
    pub const ALL: [Language; 3] = [Language::English, Language::Arabic, Language::French];

    /// Parse a language name or short code.
    ///
    /// Accepts "english"/"en", "arabic"/"ar", "french"/"fr" (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Some(Language::English),
            "arabic" | "ar" => Some(Language::Arabic),
            "french" | "fr" => Some(Language::French),
            _ => None,
        }
    }

    /// Get the canonical lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Arabic => "arabic",
            Language::French => "french",
        }
    }

    /// Get the localized resource record for this language.
    pub fn resources(&self) -> &'static LanguageResources {
        match self {
            Language::English => &ENGLISH,
            Language::Arabic => &ARABIC,
            Language::French => &FRENCH,
        }
    }

    /// Display name used in language directives ("English", "العربية", ...).
    pub fn display_name(&self) -> &'static str {
        self.resources().name
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
