use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::practice::charset::{Alphabets, CharacterSet};

pub const LANGUAGE_KEY: &str = "chalk_language";
pub const ALPHABETS_KEY: &str = "chalk_alphabets";
pub const DIGITS_KEY: &str = "chalk_digits";

/// Client-local storage for the chosen language and its character set.
///
/// Lives under the cache directory: the host may clear it at any time and
/// the app never does. Each key is one JSON file.
pub struct SessionStore {
    base_dir: PathBuf,
}

impl SessionStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("chalk")
            .join("session");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// `None` when the key is absent or its content does not parse.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let content = fs::read_to_string(self.file_path(key)).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("ignoring unparsable {key}: {e}");
                None
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_language(&self) -> Option<String> {
        self.load::<String>(LANGUAGE_KEY)
            .filter(|lang| !lang.trim().is_empty())
    }

    pub fn load_alphabets(&self) -> Option<Alphabets> {
        self.load(ALPHABETS_KEY)
    }

    pub fn load_digits(&self) -> Option<Vec<String>> {
        self.load(DIGITS_KEY)
    }

    /// Persist a freshly fetched character set for `language`.
    pub fn save_selection(&self, language: &str, charset: &CharacterSet) -> Result<()> {
        self.save(LANGUAGE_KEY, language)?;
        self.save(ALPHABETS_KEY, &charset.alphabets)?;
        self.save(DIGITS_KEY, &charset.digits)?;
        Ok(())
    }
}
