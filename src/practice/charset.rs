use icu_normalizer::ComposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};

/// Letter groupings for one language. Scripts without case only fill
/// `general`; cased scripts fill `uppercase` and `lowercase`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uppercase: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowercase: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSet {
    pub alphabets: Alphabets,
    #[serde(default)]
    pub digits: Vec<String>,
}

fn non_empty(seq: &Option<Vec<String>>) -> Option<&[String]> {
    seq.as_deref().filter(|s| !s.is_empty())
}

fn normalize_all(nfc: &ComposingNormalizerBorrowed<'_>, glyphs: &mut Vec<String>) {
    glyphs.retain(|g| !g.trim().is_empty());
    for glyph in glyphs.iter_mut() {
        let composed = nfc.normalize(glyph.trim()).into_owned();
        *glyph = composed;
    }
}

impl Alphabets {
    /// The practice sequence for letters: the general form when present,
    /// otherwise uppercase followed by lowercase.
    pub fn letters(&self) -> Vec<String> {
        if let Some(general) = non_empty(&self.general) {
            return general.to_vec();
        }
        let mut letters = self.uppercase.clone().unwrap_or_default();
        letters.extend(self.lowercase.iter().flatten().cloned());
        letters
    }

    /// `(first-last)` over the letter sequence, pairing the first uppercase
    /// letter with the last lowercase one for cased scripts.
    pub fn label(&self) -> Option<String> {
        let (first, last) = if let Some(general) = non_empty(&self.general) {
            (general.first()?, general.last()?)
        } else {
            let upper = non_empty(&self.uppercase)?;
            let last = match non_empty(&self.lowercase) {
                Some(lower) => lower.last()?,
                None => upper.last()?,
            };
            (upper.first()?, last)
        };
        Some(format!("({first}-{last})"))
    }
}

impl CharacterSet {
    pub fn letters(&self) -> Vec<String> {
        self.alphabets.letters()
    }

    pub fn digits(&self) -> Vec<String> {
        self.digits.clone()
    }

    pub fn letter_label(&self) -> Option<String> {
        self.alphabets.label()
    }

    pub fn digit_label(&self) -> Option<String> {
        let first = self.digits.first()?;
        let last = self.digits.last()?;
        Some(format!("({first}-{last})"))
    }

    /// Compose every glyph to NFC and drop blank entries, so glyphs that
    /// arrive decomposed compare and render like their composed forms.
    pub fn normalized(mut self) -> Self {
        let nfc = ComposingNormalizerBorrowed::new_nfc();
        for seq in [
            &mut self.alphabets.general,
            &mut self.alphabets.uppercase,
            &mut self.alphabets.lowercase,
        ]
        .into_iter()
        .flatten()
        {
            normalize_all(&nfc, seq);
        }
        normalize_all(&nfc, &mut self.digits);
        self
    }
}
