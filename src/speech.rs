//! Text-to-speech through a host command-line synthesizer.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use thiserror::Error;

pub const DEFAULT_RATE: f32 = 0.9;
pub const CANDIDATE_COMMANDS: &[&str] = &["espeak-ng", "espeak", "say", "spd-say"];

/// Words per minute most synthesizers use at rate 1.0.
const BASE_WPM: f32 = 175.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("text-to-speech is not available on this system")]
    NotSupported,
    #[error("text-to-speech failed: {0}")]
    Failed(String),
}

pub trait Speaker {
    /// Start speaking `text`. Ignored while a previous utterance is playing.
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
    fn is_speaking(&mut self) -> bool;
}

/// Speaker used when speech is turned off.
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&mut self, _text: &str) -> Result<(), SpeechError> {
        Err(SpeechError::NotSupported)
    }

    fn is_speaking(&mut self) -> bool {
        false
    }
}

pub struct CommandSpeaker {
    program: Option<PathBuf>,
    rate: f32,
    child: Option<Child>,
}

impl CommandSpeaker {
    /// `command` empty means the first synthesizer found on `PATH`.
    pub fn new(command: &str, rate: f32) -> Self {
        let program = if command.trim().is_empty() {
            CANDIDATE_COMMANDS.iter().find_map(|name| find_on_path(name))
        } else {
            Some(PathBuf::from(command.trim()))
        };
        if let Some(program) = &program {
            tracing::debug!(program = %program.display(), "speech command selected");
        }
        Self {
            program,
            rate,
            child: None,
        }
    }

    pub fn program(&self) -> Option<&Path> {
        self.program.as_deref()
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        if self.program.is_none() {
            return Err(SpeechError::NotSupported);
        }
        if text.trim().is_empty() || self.is_speaking() {
            return Ok(());
        }
        let Some(program) = &self.program else {
            return Err(SpeechError::NotSupported);
        };
        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let child = Command::new(program)
            .args(synth_args(&name, self.rate))
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::Failed(format!("{}: {e}", program.display())))?;
        self.child = Some(child);
        Ok(())
    }

    fn is_speaking(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(_)) | Err(_) => {
                self.child = None;
                false
            }
        }
    }
}

/// Voice and rate arguments for a known synthesizer. Unknown programs get
/// only the text.
pub fn synth_args(program: &str, rate: f32) -> Vec<String> {
    let wpm = (BASE_WPM * rate).round() as i32;
    match program {
        "espeak-ng" | "espeak" => vec![
            "-v".to_string(),
            "en-us".to_string(),
            "-s".to_string(),
            wpm.to_string(),
        ],
        "say" => vec!["-r".to_string(), wpm.to_string()],
        "spd-say" => {
            let relative = ((rate - 1.0) * 100.0).round().clamp(-100.0, 100.0) as i32;
            vec![
                "-l".to_string(),
                "en".to_string(),
                "-r".to_string(),
                relative.to_string(),
            ]
        }
        _ => Vec::new(),
    }
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_speaker_reports_not_supported() {
        let mut speaker = SilentSpeaker;
        assert_eq!(speaker.speak("hello"), Err(SpeechError::NotSupported));
        assert!(!speaker.is_speaking());
    }

    #[test]
    fn espeak_rate_scales_words_per_minute() {
        assert_eq!(synth_args("espeak-ng", 0.8), vec!["-v", "en-us", "-s", "140"]);
        assert_eq!(synth_args("say", 1.0), vec!["-r", "175"]);
    }

    #[test]
    fn spd_say_rate_is_relative() {
        assert_eq!(synth_args("spd-say", 0.9), vec!["-l", "en", "-r", "-10"]);
        assert_eq!(synth_args("spd-say", 5.0), vec!["-l", "en", "-r", "100"]);
    }

    #[test]
    fn unknown_program_gets_no_extra_args() {
        assert!(synth_args("my-tts", 0.9).is_empty());
    }

    #[test]
    fn missing_program_fails_to_spawn() {
        let mut speaker = CommandSpeaker::new("/nonexistent/fsidrill-tts", DEFAULT_RATE);
        assert!(matches!(speaker.speak("hello"), Err(SpeechError::Failed(_))));
        assert!(!speaker.is_speaking());
    }

    #[cfg(unix)]
    #[test]
    fn request_while_speaking_is_ignored() {
        if !Path::new("/bin/sleep").exists() {
            return;
        }
        // `sleep` gets no synth args, so the text becomes its duration.
        let mut speaker = CommandSpeaker::new("/bin/sleep", DEFAULT_RATE);
        assert_eq!(speaker.speak("2"), Ok(()));
        assert!(speaker.is_speaking());
        let first = speaker.child.as_ref().map(|c| c.id());

        assert_eq!(speaker.speak("0"), Ok(()));
        assert_eq!(speaker.child.as_ref().map(|c| c.id()), first);

        if let Some(mut child) = speaker.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    #[test]
    fn blank_text_is_ignored() {
        let mut speaker = CommandSpeaker::new("/nonexistent/fsidrill-tts", DEFAULT_RATE);
        assert_eq!(speaker.speak("  "), Ok(()));
    }
}
