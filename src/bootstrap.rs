use crate::practice::charset::CharacterSet;
use crate::store::session_store::SessionStore;

/// What the practice screen starts from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSeed {
    pub language: String,
    pub charset: CharacterSet,
}

impl SessionSeed {
    pub fn letter_label(&self) -> Option<String> {
        self.charset.letter_label()
    }

    pub fn digit_label(&self) -> Option<String> {
        self.charset.digit_label()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bootstrap {
    Ready(SessionSeed),
    /// Nothing usable was stored; go back to language selection.
    Redirect,
}

/// Read the stored selection. Any missing or unparsable key redirects.
pub fn load(store: &SessionStore) -> Bootstrap {
    let (Some(language), Some(alphabets), Some(digits)) = (
        store.load_language(),
        store.load_alphabets(),
        store.load_digits(),
    ) else {
        log::info!("no stored language selection, redirecting home");
        return Bootstrap::Redirect;
    };
    Bootstrap::Ready(SessionSeed {
        language,
        charset: CharacterSet { alphabets, digits },
    })
}
