use std::process::{Child, Command, Stdio};

use crate::speech::{SpeechEngine, SpeechError, Utterance};

/// espeak-ng's default speaking speed in words per minute.
const DEFAULT_WPM: f32 = 175.0;

/// Speaks through the `espeak-ng` command line synthesizer, one child
/// process per utterance.
pub struct EspeakEngine {
    command: String,
    child: Option<Child>,
}

impl EspeakEngine {
    /// Returns an engine if `command --version` runs successfully.
    pub fn detect(command: &str) -> Option<Self> {
        let status = Command::new(command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .ok()?;
        if !status.success() {
            return None;
        }
        Some(Self {
            command: command.to_string(),
            child: None,
        })
    }
}

/// espeak voice names are mostly bare language codes.
fn voice_name(locale: &str) -> String {
    match locale {
        "en-US" => "en-us".to_string(),
        "zh-CN" => "cmn".to_string(),
        other => other
            .split('-')
            .next()
            .unwrap_or(other)
            .to_ascii_lowercase(),
    }
}

fn words_per_minute(rate: f32) -> u32 {
    (DEFAULT_WPM * rate).round().max(80.0) as u32
}

/// Language column of `espeak-ng --voices` output.
fn parse_voice_list(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|lang| lang.to_string())
        .collect()
}

impl SpeechEngine for EspeakEngine {
    fn installed_voices(&mut self) -> Vec<String> {
        match Command::new(&self.command)
            .arg("--voices")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(out) => parse_voice_list(&String::from_utf8_lossy(&out.stdout)),
            Err(e) => {
                log::warn!("could not list voices: {e}");
                Vec::new()
            }
        }
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn say(&mut self, utterance: &Utterance) -> Result<(), SpeechError> {
        let child = Command::new(&self.command)
            .arg("-v")
            .arg(voice_name(&utterance.locale))
            .arg("-s")
            .arg(words_per_minute(utterance.rate).to_string())
            .arg("--")
            .arg(&utterance.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        self.child = Some(child);
        Ok(())
    }
}

impl Drop for EspeakEngine {
    fn drop(&mut self) {
        self.cancel();
    }
}
