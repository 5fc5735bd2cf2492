pub mod espeak;

use thiserror::Error;

use crate::config::Config;
use crate::speech::espeak::EspeakEngine;

pub const DEFAULT_LOCALE: &str = "en-US";

/// Language name to BCP 47 tag. Names not listed speak with `DEFAULT_LOCALE`.
const LOCALES: &[(&str, &str)] = &[
    ("English", "en-US"),
    ("Spanish", "es-ES"),
    ("French", "fr-FR"),
    ("German", "de-DE"),
    ("Italian", "it-IT"),
    ("Portuguese", "pt-PT"),
    ("Russian", "ru-RU"),
    ("Japanese", "ja-JP"),
    ("Korean", "ko-KR"),
    ("Chinese", "zh-CN"),
    ("Hindi", "hi-IN"),
    ("Nepali", "ne-NP"),
];

/// Tags whose voices are often missing, paired with a commonly installed
/// voice that reads the same script.
const VOICE_FALLBACKS: &[(&str, &str)] = &[("ne-NP", "hi-IN")];

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("failed to start speech engine: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    pub rate: f32,
}

/// Host text-to-speech capability.
pub trait SpeechEngine {
    /// Language tags of the installed voices.
    fn installed_voices(&mut self) -> Vec<String>;
    fn cancel(&mut self);
    fn say(&mut self, utterance: &Utterance) -> Result<(), SpeechError>;
}

/// Anything the practice flow can announce messages through.
pub trait Speaker {
    fn speak(&mut self, text: &str, language: &str);
}

pub fn locale_for(language: &str) -> &'static str {
    LOCALES
        .iter()
        .find(|(name, _)| *name == language)
        .map(|(_, tag)| *tag)
        .unwrap_or(DEFAULT_LOCALE)
}

fn primary_subtag(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or(tag)
        .to_ascii_lowercase()
}

fn has_voice_for(voices: &[String], tag: &str) -> bool {
    let wanted = primary_subtag(tag);
    voices.iter().any(|v| primary_subtag(v) == wanted)
}

pub struct Announcer {
    engine: Option<Box<dyn SpeechEngine>>,
    rate: f32,
    voices: Option<Vec<String>>,
}

impl Announcer {
    pub fn new(engine: Box<dyn SpeechEngine>, rate: f32) -> Self {
        Self {
            engine: Some(engine),
            rate,
            voices: None,
        }
    }

    /// An announcer with no engine: every `speak` is logged and dropped.
    pub fn silent() -> Self {
        Self {
            engine: None,
            rate: 1.0,
            voices: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        if !config.speech_enabled {
            log::info!("speech disabled by configuration");
            return Self::silent();
        }
        match EspeakEngine::detect(&config.speech_command) {
            Some(engine) => Self::new(Box::new(engine), config.speech_rate),
            None => {
                log::warn!(
                    "text-to-speech not available: `{}` could not be run",
                    config.speech_command
                );
                Self::silent()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    /// Resolve the tag to speak with, substituting a related voice when the
    /// preferred one is not installed.
    fn resolve_locale(&mut self, language: &str) -> String {
        let tag = locale_for(language);
        let Some((_, fallback)) = VOICE_FALLBACKS.iter().find(|(from, _)| *from == tag) else {
            return tag.to_string();
        };
        let Some(engine) = self.engine.as_mut() else {
            return tag.to_string();
        };
        let voices = self.voices.get_or_insert_with(|| engine.installed_voices());
        if has_voice_for(voices, tag) {
            tag.to_string()
        } else {
            log::info!("no {tag} voice installed, falling back to {fallback}");
            fallback.to_string()
        }
    }
}

impl Speaker for Announcer {
    fn speak(&mut self, text: &str, language: &str) {
        if self.engine.is_none() {
            log::debug!("speech unavailable, dropping: {text}");
            return;
        }
        let locale = self.resolve_locale(language);
        let utterance = Utterance {
            text: text.to_string(),
            locale,
            rate: self.rate,
        };
        if let Some(engine) = self.engine.as_mut() {
            engine.cancel();
            if let Err(e) = engine.say(&utterance) {
                log::warn!("speech failed: {e}");
            }
        }
    }
}
