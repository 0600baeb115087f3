use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rust_i18n::t;

use crate::config::Config;
use crate::drill::sample::load_sample;
use crate::drill::{DrillKind, DrillSet};
use crate::generator::{
    GeminiClient, GenerationClient, GenerationJob, GenerationOutcome, Orchestrator,
};
use crate::session::PracticeSession;
use crate::session::answer::Verdict;
use crate::source::SourceText;
use crate::speech::{CommandSpeaker, SilentSpeaker, Speaker};
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::components::toast::{Toast, ToastKind};
use crate::ui::components::word_picker::WordPicker;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    OpenFile,
    PasteText,
    Generating,
    Drills,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsField {
    ApiKey,
    Model,
    Theme,
    Locale,
    Speech,
}

impl SettingsField {
    pub const ALL: [SettingsField; 5] = [
        SettingsField::ApiKey,
        SettingsField::Model,
        SettingsField::Theme,
        SettingsField::Locale,
        SettingsField::Speech,
    ];

    /// Edited through a text input rather than cycled.
    pub fn is_text(self) -> bool {
        matches!(self, SettingsField::ApiKey | SettingsField::Model)
    }
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    /// Where settings are saved. `None` keeps them in memory only.
    config_path: Option<PathBuf>,
    /// Key from the command line. Used for generation, never saved.
    api_key_override: Option<String>,
    pub orchestrator: Orchestrator,
    client: Arc<dyn GenerationClient>,
    speaker: Box<dyn Speaker>,
    pub session: Option<PracticeSession>,
    /// Active text input: file path, pasted text, an answer or a setting.
    pub input: Option<LineInput>,
    pub input_error: Option<String>,
    pub picker: Option<WordPicker>,
    pub toast: Option<Toast>,
    pub settings_selected: usize,
    pub generating_source: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let speaker = speaker_for(&config);
        Self::with_ports(config, config_path, Arc::new(GeminiClient::new()), speaker)
    }

    pub fn with_ports(
        config: Config,
        config_path: Option<PathBuf>,
        client: Arc<dyn GenerationClient>,
        speaker: Box<dyn Speaker>,
    ) -> Self {
        rust_i18n::set_locale(&config.locale);
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let mut menu = Menu::new(theme);
        menu.api_key_set = config.has_api_key();

        Self {
            screen: AppScreen::Home,
            menu,
            theme,
            orchestrator: Orchestrator::new(config.generation_settings()),
            config,
            config_path,
            api_key_override: None,
            client,
            speaker,
            session: None,
            input: None,
            input_error: None,
            picker: None,
            toast: None,
            settings_selected: 0,
            generating_source: None,
            should_quit: false,
        }
    }

    pub fn override_api_key(&mut self, key: String) {
        self.api_key_override = Some(key).filter(|k| !k.trim().is_empty());
        self.refresh_generation_settings();
    }

    fn refresh_generation_settings(&mut self) {
        let mut settings = self.config.generation_settings();
        if let Some(key) = &self.api_key_override {
            settings.api_key = key.clone();
        }
        self.menu.api_key_set = !settings.api_key.trim().is_empty();
        self.orchestrator.set_settings(settings);
    }

    pub fn client(&self) -> Arc<dyn GenerationClient> {
        Arc::clone(&self.client)
    }

    pub fn notify(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toast = Some(Toast::new(kind, message));
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| t.is_expired_at(now)) {
            self.toast = None;
        }
    }

    pub fn go_home(&mut self) {
        self.input = None;
        self.input_error = None;
        self.picker = None;
        self.screen = AppScreen::Home;
    }

    pub fn activate_menu(&mut self, action: MenuAction) {
        match action {
            MenuAction::OpenFile => self.open_file_prompt(),
            MenuAction::PasteText => self.paste_text_prompt(),
            MenuAction::Sample => self.start_sample(),
            MenuAction::Settings => self.go_to_settings(),
            MenuAction::Quit => self.should_quit = true,
        }
    }

    pub fn open_file_prompt(&mut self) {
        self.input = Some(LineInput::source_path(""));
        self.input_error = None;
        self.screen = AppScreen::OpenFile;
    }

    pub fn paste_text_prompt(&mut self) {
        self.input = Some(LineInput::new(""));
        self.input_error = None;
        self.screen = AppScreen::PasteText;
    }

    pub fn start_sample(&mut self) {
        match load_sample() {
            Some(set) => {
                self.start_session(set);
                self.notify(ToastKind::Success, t!("toast.sample_loaded").to_string());
            }
            None => self.notify(ToastKind::Error, t!("toast.sample_missing").to_string()),
        }
    }

    pub fn start_session(&mut self, set: DrillSet) {
        self.session = Some(PracticeSession::new(set));
        self.input = None;
        self.input_error = None;
        self.picker = None;
        self.screen = AppScreen::Drills;
    }

    /// Discard the current drill set.
    pub fn new_session(&mut self) {
        self.session = None;
        self.go_home();
    }

    /// Read the path typed on the open-file screen. Errors stay on screen.
    pub fn submit_file_path(&mut self) -> Option<GenerationJob> {
        let raw = self.input.as_ref()?.value().trim().to_string();
        match SourceText::from_file(&expand_home(&raw)) {
            Ok(source) => self.request_generation(source),
            Err(e) => {
                tracing::warn!(error = %e, "could not open source file");
                self.input_error = Some(e.to_string());
                None
            }
        }
    }

    pub fn submit_pasted_text(&mut self) -> Option<GenerationJob> {
        let text = self.input.as_ref()?.value().to_string();
        match SourceText::inline(&text) {
            Ok(source) => self.request_generation(source),
            Err(e) => {
                self.input_error = Some(e.to_string());
                None
            }
        }
    }

    /// Start a generation unless one is already running. The returned job
    /// must be run off the UI thread and handed to `finish_generation`.
    pub fn request_generation(&mut self, source: SourceText) -> Option<GenerationJob> {
        if self.orchestrator.is_in_flight() {
            self.notify(ToastKind::Error, t!("toast.busy").to_string());
            return None;
        }
        match self.orchestrator.begin(&source) {
            Ok(job) => {
                self.generating_source = Some(source.name);
                self.input = None;
                self.input_error = None;
                self.screen = AppScreen::Generating;
                Some(job)
            }
            Err(e) => {
                self.notify(ToastKind::Error, e.to_string());
                None
            }
        }
    }

    /// Apply a finished job. Failure keeps whatever set was active before.
    pub fn finish_generation(&mut self, outcome: GenerationOutcome) {
        self.generating_source = None;
        match self.orchestrator.complete(outcome) {
            Ok(set) => {
                let total = set.total();
                let empty = set.is_empty();
                self.start_session(set);
                if empty {
                    self.notify(ToastKind::Error, t!("toast.empty_set").to_string());
                } else {
                    self.notify(ToastKind::Success, t!("toast.generated", count = total).to_string());
                }
            }
            Err(e) => {
                self.screen = if self.session.is_some() {
                    AppScreen::Drills
                } else {
                    AppScreen::Home
                };
                self.notify(ToastKind::Error, e.to_string());
            }
        }
    }

    pub fn speak(&mut self, text: &str) {
        if let Err(e) = self.speaker.speak(text) {
            tracing::warn!(error = %e, "speech failed");
            self.notify(ToastKind::Error, e.to_string());
        }
    }

    /// Speak the selected sentence or dialogue turn.
    pub fn speak_current(&mut self) {
        if let Some(text) = self.session.as_ref().and_then(PracticeSession::speech_text) {
            self.speak(&text);
        }
    }

    pub fn open_picker(&mut self) {
        let Some(sub) = self.session.as_mut().and_then(|s| s.current_substitution()) else {
            return;
        };
        let choices = sub.choices();
        if choices.is_empty() {
            return;
        }
        let word_type = sub.focused_word().and_then(|w| w.word_type);
        let current = sub.focused_word().map(|w| w.core().to_string());
        let mut picker = WordPicker::new(choices, word_type);
        if let Some(current) = current {
            if let Some(index) = picker.choices.iter().position(|c| *c == current) {
                picker.selected = index;
            }
        }
        self.picker = Some(picker);
    }

    pub fn apply_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let Some(choice) = picker.current() else {
            return;
        };
        if let Some(sub) = self.session.as_mut().and_then(|s| s.current_substitution()) {
            sub.apply(choice);
        }
    }

    pub fn is_editing_answer(&self) -> bool {
        self.screen == AppScreen::Drills && self.input.is_some()
    }

    pub fn start_answer_edit(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        if !session.is_answer_tab() {
            return;
        }
        let previous = session
            .current_answer()
            .map(|a| a.submitted.clone())
            .unwrap_or_default();
        self.input = Some(LineInput::new(&previous));
    }

    pub fn submit_answer(&mut self) -> Option<Verdict> {
        let answer = self.input.as_ref()?.value().to_string();
        self.session.as_mut()?.check(&answer)
    }

    pub fn stop_answer_edit(&mut self) {
        self.input = None;
    }

    pub fn select_tab(&mut self, kind: DrillKind) {
        self.input = None;
        self.picker = None;
        if let Some(session) = self.session.as_mut() {
            session.select_tab(kind);
        }
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.input = None;
        self.screen = AppScreen::Settings;
    }

    pub fn settings_field(&self) -> SettingsField {
        SettingsField::ALL[self.settings_selected.min(SettingsField::ALL.len() - 1)]
    }

    pub fn settings_next(&mut self) {
        if self.settings_selected + 1 < SettingsField::ALL.len() {
            self.settings_selected += 1;
        }
    }

    pub fn settings_prev(&mut self) {
        self.settings_selected = self.settings_selected.saturating_sub(1);
    }

    /// Enter on a settings row: open an editor or cycle the value.
    pub fn settings_activate(&mut self) {
        match self.settings_field() {
            SettingsField::ApiKey => self.input = Some(LineInput::secret(&self.config.api_key)),
            SettingsField::Model => self.input = Some(LineInput::new(&self.config.model)),
            _ => self.settings_cycle(true),
        }
    }

    pub fn settings_cycle(&mut self, forward: bool) {
        match self.settings_field() {
            SettingsField::Theme => {
                let themes = Theme::available_themes();
                if let Some(next) = cycle(&themes, &self.config.theme, forward) {
                    self.config.theme = next;
                }
                if let Some(new_theme) = Theme::load(&self.config.theme) {
                    let theme: &'static Theme = Box::leak(Box::new(new_theme));
                    self.theme = theme;
                    self.menu.theme = theme;
                }
            }
            SettingsField::Locale => {
                let locales: Vec<String> = crate::config::SUPPORTED_LOCALES
                    .iter()
                    .map(|l| l.to_string())
                    .collect();
                if let Some(next) = cycle(&locales, &self.config.locale, forward) {
                    self.config.locale = next;
                }
                rust_i18n::set_locale(&self.config.locale);
            }
            SettingsField::Speech => {
                self.config.speech_enabled = !self.config.speech_enabled;
                self.speaker = speaker_for(&self.config);
            }
            SettingsField::ApiKey | SettingsField::Model => {}
        }
    }

    pub fn settings_commit_edit(&mut self) {
        let Some(input) = self.input.take() else {
            return;
        };
        let value = input.value().trim().to_string();
        let key_changed = match self.settings_field() {
            SettingsField::ApiKey => {
                let changed = self.config.api_key != value;
                self.config.api_key = value;
                changed
            }
            SettingsField::Model => {
                self.config.model = value;
                false
            }
            _ => false,
        };
        self.config.normalize();
        self.refresh_generation_settings();
        // The key is written as soon as it is edited.
        if key_changed {
            self.persist_config();
        }
    }

    pub fn settings_cancel_edit(&mut self) {
        self.input = None;
    }

    fn persist_config(&mut self) {
        let Some(path) = &self.config_path else {
            return;
        };
        match self.config.save_to(path) {
            Ok(()) => self.notify(ToastKind::Success, t!("toast.saved").to_string()),
            Err(e) => {
                tracing::error!(error = %e, "failed to save config");
                self.notify(
                    ToastKind::Error,
                    t!("toast.save_failed", error = e).to_string(),
                );
            }
        }
    }

    /// Persist the configuration and return to the menu.
    pub fn save_settings(&mut self) {
        self.refresh_generation_settings();
        self.persist_config();
        self.go_home();
    }
}

pub fn speaker_for(config: &Config) -> Box<dyn Speaker> {
    if config.speech_enabled {
        Box::new(CommandSpeaker::new(&config.speech_command, config.speech_rate))
    } else {
        Box::new(SilentSpeaker)
    }
}

fn cycle(options: &[String], current: &str, forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|o| o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    Some(options[next].clone())
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    match (raw.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches(['/', '\\'])),
        _ => Path::new(raw).to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use crate::generator::{GenerationError, GenerationRequest};
    use crate::speech::SpeechError;

    struct FakeClient {
        reply: Result<String, GenerationError>,
    }

    impl GenerationClient for FakeClient {
        fn send(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
            self.reply.clone()
        }
    }

    fn reply(text: &str) -> Arc<dyn GenerationClient> {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        });
        Arc::new(FakeClient {
            reply: Ok(body.to_string()),
        })
    }

    struct RecordingSpeaker {
        spoken: Rc<RefCell<Vec<String>>>,
        fail: bool,
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
            if self.fail {
                return Err(SpeechError::NotSupported);
            }
            self.spoken.borrow_mut().push(text.to_string());
            Ok(())
        }

        fn is_speaking(&mut self) -> bool {
            false
        }
    }

    fn app_with(api_key: &str, client: Arc<dyn GenerationClient>) -> (App, Rc<RefCell<Vec<String>>>) {
        let spoken = Rc::new(RefCell::new(Vec::new()));
        let speaker = RecordingSpeaker {
            spoken: Rc::clone(&spoken),
            fail: false,
        };
        let config = Config {
            api_key: api_key.to_string(),
            ..Config::default()
        };
        (App::with_ports(config, None, client, Box::new(speaker)), spoken)
    }

    fn type_text(input: &mut LineInput, text: &str) {
        for ch in text.chars() {
            input.handle(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
    }

    const CAT_REPLY: &str = r#"{"title": "Cats", "substitution": [{"sentence": "The cat sat on the mat.", "korean": "고양이가 매트 위에 앉았다.", "targetWord": "cat", "wordType": "subject", "alternatives": ["dog", "bird"]}]}"#;

    #[test]
    fn test_sample_starts_a_session() {
        let (mut app, _) = app_with("", reply("{}"));
        app.activate_menu(MenuAction::Sample);
        assert_eq!(app.screen, AppScreen::Drills);
        assert!(app.session.is_some());
        assert!(app.toast.as_ref().is_some_and(|t| t.kind == ToastKind::Success));
    }

    #[test]
    fn test_missing_key_keeps_state() {
        let (mut app, _) = app_with("", reply(CAT_REPLY));
        app.start_sample();
        let before = app.session.as_ref().unwrap().set().id.clone();

        let source = SourceText::inline("The cat sat on the mat.").unwrap();
        assert!(app.request_generation(source).is_none());
        assert_eq!(app.screen, AppScreen::Drills);
        assert_eq!(app.session.as_ref().unwrap().set().id, before);
        assert!(app.toast.as_ref().is_some_and(|t| t.kind == ToastKind::Error));
    }

    #[test]
    fn test_generation_round_trip_replaces_session() {
        let (mut app, _) = app_with("key", reply(CAT_REPLY));
        app.paste_text_prompt();
        type_text(app.input.as_mut().unwrap(), "The cat sat on the mat.");
        let job = app.submit_pasted_text().unwrap();
        assert_eq!(app.screen, AppScreen::Generating);
        assert!(app.orchestrator.is_in_flight());

        let outcome = job.run(app.client().as_ref());
        app.finish_generation(outcome);
        assert_eq!(app.screen, AppScreen::Drills);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.set().title, "Cats");
        assert_eq!(session.set().substitution.len(), 1);
    }

    #[test]
    fn test_second_request_while_in_flight_is_refused() {
        let (mut app, _) = app_with("key", reply(CAT_REPLY));
        let source = SourceText::inline("text").unwrap();
        let job = app.request_generation(source.clone());
        assert!(job.is_some());
        assert!(app.request_generation(source).is_none());
        assert!(app.toast.as_ref().is_some_and(|t| t.kind == ToastKind::Error));
    }

    #[test]
    fn test_malformed_reply_keeps_previous_set() {
        let (mut app, _) = app_with("key", reply("not json at all"));
        app.start_sample();
        let before = app.session.as_ref().unwrap().set().clone();

        let job = app
            .request_generation(SourceText::inline("text").unwrap())
            .unwrap();
        let outcome = job.run(app.client().as_ref());
        app.finish_generation(outcome);

        assert_eq!(app.screen, AppScreen::Drills);
        assert_eq!(app.session.as_ref().unwrap().set(), &before);
        assert!(app.toast.as_ref().is_some_and(|t| t.kind == ToastKind::Error));
    }

    #[test]
    fn test_failure_without_session_returns_home() {
        let client: Arc<dyn GenerationClient> = Arc::new(FakeClient {
            reply: Err(GenerationError::Transport("offline".to_string())),
        });
        let (mut app, _) = app_with("key", client);
        let job = app
            .request_generation(SourceText::inline("text").unwrap())
            .unwrap();
        let outcome = job.run(app.client().as_ref());
        app.finish_generation(outcome);
        assert_eq!(app.screen, AppScreen::Home);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_unsupported_file_shows_inline_error() {
        let (mut app, _) = app_with("key", reply("{}"));
        app.open_file_prompt();
        type_text(app.input.as_mut().unwrap(), "/tmp/slides.pdf");
        assert!(app.submit_file_path().is_none());
        assert_eq!(app.screen, AppScreen::OpenFile);
        assert!(app.input_error.is_some());
    }

    #[test]
    fn test_file_generation_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cats.md");
        std::fs::write(&path, "The cat sat on the mat.").unwrap();

        let (mut app, _) = app_with("key", reply("{}"));
        app.open_file_prompt();
        type_text(app.input.as_mut().unwrap(), &path.display().to_string());
        let job = app.submit_file_path().unwrap();
        assert_eq!(job.source_name(), "cats");
        assert_eq!(app.generating_source.as_deref(), Some("cats"));
    }

    #[test]
    fn test_picker_substitutes_focused_word() {
        let (mut app, _) = app_with("key", reply(CAT_REPLY));
        let job = app
            .request_generation(SourceText::inline("text").unwrap())
            .unwrap();
        let outcome = job.run(app.client().as_ref());
        app.finish_generation(outcome);

        app.open_picker();
        let picker = app.picker.as_mut().unwrap();
        assert_eq!(picker.choices, vec!["cat", "dog", "bird"]);
        picker.next();
        app.apply_picker();
        assert!(app.picker.is_none());

        let session = app.session.as_ref().unwrap();
        assert_eq!(session.substitutions[0].text(), "The dog sat on the mat.");
        assert_eq!(session.set().substitution[0].sentence.text(), "The cat sat on the mat.");
    }

    #[test]
    fn test_answer_edit_and_check() {
        let (mut app, _) = app_with("", reply("{}"));
        app.start_sample();
        app.select_tab(DrillKind::Expansion);
        let expected = app.session.as_ref().unwrap().set().expansion[0].answer.clone();

        app.start_answer_edit();
        assert!(app.is_editing_answer());
        type_text(app.input.as_mut().unwrap(), &expected.to_lowercase());
        assert_eq!(app.submit_answer(), Some(Verdict::Correct));

        app.stop_answer_edit();
        assert!(!app.is_editing_answer());
    }

    #[test]
    fn test_answer_edit_ignored_on_substitution_tab() {
        let (mut app, _) = app_with("", reply("{}"));
        app.start_sample();
        app.start_answer_edit();
        assert!(app.input.is_none());
    }

    #[test]
    fn test_speak_current_and_failure_toast() {
        let (mut app, spoken) = app_with("", reply("{}"));
        app.start_sample();
        app.speak_current();
        let first = app.session.as_ref().unwrap().set().substitution[0].sentence.text();
        assert_eq!(spoken.borrow().as_slice(), &[first]);

        app.speaker = Box::new(RecordingSpeaker {
            spoken: Rc::clone(&spoken),
            fail: true,
        });
        app.dismiss_toast();
        app.speak_current();
        assert!(app.toast.as_ref().is_some_and(|t| t.kind == ToastKind::Error));
    }

    #[test]
    fn test_settings_edit_updates_orchestrator_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut app = App::with_ports(
            Config::default(),
            Some(path.clone()),
            reply("{}"),
            Box::new(SilentSpeaker),
        );
        app.go_to_settings();
        assert_eq!(app.settings_field(), SettingsField::ApiKey);
        app.settings_activate();
        type_text(app.input.as_mut().unwrap(), "new-key");
        app.settings_commit_edit();
        assert_eq!(app.config.api_key, "new-key");
        assert_eq!(app.orchestrator.settings().api_key, "new-key");
        assert!(app.menu.api_key_set);

        app.save_settings();
        assert_eq!(app.screen, AppScreen::Home);
        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.api_key, "new-key");
    }

    #[test]
    fn test_api_key_edit_is_saved_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut app = App::with_ports(
            Config::default(),
            Some(path.clone()),
            reply("{}"),
            Box::new(SilentSpeaker),
        );
        app.go_to_settings();
        app.settings_activate();
        type_text(app.input.as_mut().unwrap(), "fresh-key");
        app.settings_commit_edit();

        // Still on the settings screen; nothing else has saved yet.
        assert_eq!(app.screen, AppScreen::Settings);
        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.api_key, "fresh-key");
        assert!(app.toast.as_ref().is_some_and(|t| t.kind == ToastKind::Success));
    }

    #[test]
    fn test_model_edit_waits_for_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut app = App::with_ports(
            Config::default(),
            Some(path.clone()),
            reply("{}"),
            Box::new(SilentSpeaker),
        );
        app.go_to_settings();
        app.settings_next();
        assert_eq!(app.settings_field(), SettingsField::Model);
        app.settings_activate();
        type_text(app.input.as_mut().unwrap(), "-lite");
        app.settings_commit_edit();
        assert!(!path.exists());
    }

    #[test]
    fn test_settings_cycle_speech_and_theme() {
        let (mut app, _) = app_with("", reply("{}"));
        app.go_to_settings();
        while app.settings_field() != SettingsField::Speech {
            app.settings_next();
        }
        app.settings_activate();
        assert!(!app.config.speech_enabled);

        app.settings_prev();
        app.settings_prev();
        assert_eq!(app.settings_field(), SettingsField::Theme);
        let before = app.config.theme.clone();
        app.settings_cycle(true);
        assert_ne!(app.config.theme, before);
        app.settings_cycle(false);
        assert_eq!(app.config.theme, before);
    }

    #[test]
    fn test_api_key_override_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut app = App::with_ports(
            Config::default(),
            Some(path.clone()),
            reply(CAT_REPLY),
            Box::new(SilentSpeaker),
        );
        app.override_api_key("cli-key".to_string());
        assert!(app.menu.api_key_set);
        assert!(app
            .request_generation(SourceText::inline("text").unwrap())
            .is_some());
        assert_eq!(app.orchestrator.settings().api_key, "cli-key");

        app.go_to_settings();
        app.save_settings();
        let saved = Config::load_from(&path).unwrap();
        assert!(saved.api_key.is_empty());
    }

    #[test]
    fn test_toast_expires_on_tick() {
        let (mut app, _) = app_with("", reply("{}"));
        app.notify(ToastKind::Success, "hello");
        let shown = app.toast.as_ref().unwrap().shown_at;
        app.tick(shown);
        assert!(app.toast.is_some());
        app.tick(shown + crate::ui::components::toast::TOAST_DURATION);
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_new_session_discards_set() {
        let (mut app, _) = app_with("", reply("{}"));
        app.start_sample();
        app.new_session();
        assert!(app.session.is_none());
        assert_eq!(app.screen, AppScreen::Home);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/tmp/a.txt"), PathBuf::from("/tmp/a.txt"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/notes.md"), home.join("notes.md"));
        }
    }
}
