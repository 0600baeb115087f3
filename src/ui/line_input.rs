use std::path::{Path, MAIN_SEPARATOR};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::source::is_supported;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    Text,
    /// Tab completes directories and `.txt`/`.md` files.
    SourcePath,
    /// Rendered as bullets.
    Secret,
}

const MASK_CHAR: char = '•';
const MAX_SCANNED_ENTRIES: usize = 1000;
const MAX_CANDIDATES: usize = 100;

/// One editing step decoded from a key press.
enum Edit {
    CursorLeft,
    CursorRight,
    CursorStart,
    CursorEnd,
    EraseBack,
    EraseForward,
    EraseWord,
    Clear,
    Insert(char),
    Complete { forward: bool },
}

/// Cycling state kept between consecutive Tab presses.
struct Completion {
    candidates: Vec<String>,
    index: usize,
}

/// Single-line editor. Text is held as chars so the cursor never lands
/// inside a multi-byte Hangul syllable.
pub struct LineInput {
    chars: Vec<char>,
    cursor: usize,
    kind: InputKind,
    completion: Option<Completion>,
    /// Set when the directory listing behind the last Tab failed.
    pub completion_error: bool,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self::with_kind(text, InputKind::Text)
    }

    pub fn source_path(text: &str) -> Self {
        Self::with_kind(text, InputKind::SourcePath)
    }

    pub fn secret(text: &str) -> Self {
        Self::with_kind(text, InputKind::Secret)
    }

    fn with_kind(text: &str, kind: InputKind) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self {
            cursor: chars.len(),
            chars,
            kind,
            completion: None,
            completion_error: false,
        }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Text before the cursor, the char under it (None at the end), and the rest.
    /// Secret inputs come back masked.
    pub fn render_parts(&self) -> (String, Option<char>, String) {
        let shown = |c: &char| if self.kind == InputKind::Secret { MASK_CHAR } else { *c };
        let before = self.chars[..self.cursor].iter().map(shown).collect();
        let under = self.chars.get(self.cursor).map(shown);
        let after = self
            .chars
            .get(self.cursor + 1..)
            .unwrap_or_default()
            .iter()
            .map(shown)
            .collect();
        (before, under, after)
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            _ => {}
        }
        let Some(edit) = self.decode(key) else {
            return InputResult::Continue;
        };
        if let Edit::Complete { forward } = edit {
            self.complete(forward);
        } else {
            self.completion = None;
            self.completion_error = false;
            self.apply(edit);
        }
        InputResult::Continue
    }

    fn decode(&self, key: KeyEvent) -> Option<Edit> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let paths = self.kind == InputKind::SourcePath;
        Some(match key.code {
            KeyCode::Left => Edit::CursorLeft,
            KeyCode::Right => Edit::CursorRight,
            KeyCode::Home => Edit::CursorStart,
            KeyCode::End => Edit::CursorEnd,
            KeyCode::Backspace => Edit::EraseBack,
            KeyCode::Delete => Edit::EraseForward,
            KeyCode::Tab if paths => Edit::Complete { forward: true },
            KeyCode::BackTab if paths => Edit::Complete { forward: false },
            KeyCode::Char(c) if ctrl => match c {
                'a' => Edit::CursorStart,
                'e' => Edit::CursorEnd,
                'u' => Edit::Clear,
                'w' => Edit::EraseWord,
                _ => return None,
            },
            KeyCode::Char(c) => Edit::Insert(c),
            _ => return None,
        })
    }

    fn apply(&mut self, edit: Edit) {
        let len = self.chars.len();
        match edit {
            Edit::CursorLeft => self.cursor = self.cursor.saturating_sub(1),
            Edit::CursorRight => self.cursor = (self.cursor + 1).min(len),
            Edit::CursorStart => self.cursor = 0,
            Edit::CursorEnd => self.cursor = len,
            Edit::EraseBack if self.cursor > 0 => {
                self.cursor -= 1;
                self.chars.remove(self.cursor);
            }
            Edit::EraseForward if self.cursor < len => {
                self.chars.remove(self.cursor);
            }
            Edit::EraseWord => {
                // Trailing blanks go with the word, like a shell's ^W.
                let head = &self.chars[..self.cursor];
                let word_end = head.iter().rposition(|c| !c.is_whitespace()).map_or(0, |i| i + 1);
                let start = head[..word_end]
                    .iter()
                    .rposition(|c| c.is_whitespace())
                    .map_or(0, |i| i + 1);
                self.chars.drain(start..self.cursor);
                self.cursor = start;
            }
            Edit::Clear => {
                self.chars.clear();
                self.cursor = 0;
            }
            Edit::Insert(c) => {
                self.chars.insert(self.cursor, c);
                self.cursor += 1;
            }
            _ => {}
        }
    }

    /// Insert pasted text at the cursor. Line breaks become spaces.
    pub fn insert_str(&mut self, pasted: &str) {
        self.completion = None;
        self.completion_error = false;
        let flattened: Vec<char> = pasted
            .chars()
            .map(|c| if matches!(c, '\n' | '\r') { ' ' } else { c })
            .collect();
        let added = flattened.len();
        self.chars.splice(self.cursor..self.cursor, flattened);
        self.cursor += added;
    }

    fn set_text(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    fn complete(&mut self, forward: bool) {
        if self.cursor < self.chars.len() {
            return;
        }
        if let Some(state) = &mut self.completion {
            let count = state.candidates.len();
            state.index = if forward {
                (state.index + 1) % count
            } else {
                (state.index + count - 1) % count
            };
            let next = state.candidates[state.index].clone();
            self.set_text(&next);
            return;
        }

        self.completion_error = false;
        let typed = self.value();
        let candidates = self.list_candidates(&typed);
        if let Some(first) = candidates.first().cloned() {
            self.set_text(&first);
            self.completion = Some(Completion { candidates, index: 0 });
        }
    }

    fn list_candidates(&mut self, typed: &str) -> Vec<String> {
        // Either separator splits the typed path, whatever the platform.
        let split = typed.rfind(['/', '\\']).map_or(0, |i| i + 1);
        let (dir, partial) = typed.split_at(split);

        // `~` is expanded for the lookup only; the candidates keep it.
        let lookup = match dir.strip_prefix('~').zip(dirs::home_dir()) {
            Some((rest, home)) => format!("{}{rest}", home.display()),
            None if dir.is_empty() => ".".to_string(),
            None => dir.to_string(),
        };

        let Ok(listing) = std::fs::read_dir(&lookup) else {
            self.completion_error = true;
            return Vec::new();
        };
        let entries = listing.map(|entry| {
            entry.map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                (e.file_name().to_string_lossy().into_owned(), is_dir)
            })
        });
        self.collect_completions(entries, dir, partial)
    }

    /// Directories and source files under `dir` starting with `partial`,
    /// directories first and then alphabetical.
    fn collect_completions(
        &mut self,
        entries: impl Iterator<Item = std::io::Result<(String, bool)>>,
        dir: &str,
        partial: &str,
    ) -> Vec<String> {
        let show_hidden = partial.starts_with('.');
        let mut dirs_found = Vec::new();
        let mut files_found = Vec::new();

        for entry in entries.take(MAX_SCANNED_ENTRIES) {
            let Ok((name, is_dir)) = entry else {
                self.completion_error = true;
                return Vec::new();
            };
            let hidden = name.starts_with('.') && !show_hidden;
            if hidden || !name.starts_with(partial) {
                continue;
            }
            if is_dir {
                dirs_found.push(format!("{dir}{name}{MAIN_SEPARATOR}"));
            } else if is_supported(Path::new(&name)) {
                files_found.push(format!("{dir}{name}"));
            }
        }

        dirs_found.sort();
        files_found.sort();
        dirs_found
            .into_iter()
            .chain(files_found)
            .take(MAX_CANDIDATES)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn candidates(input: &LineInput) -> &[String] {
        input
            .completion
            .as_ref()
            .map_or(&[], |c| c.candidates.as_slice())
    }

    #[test]
    fn insert_at_start_middle_end() {
        let mut input = LineInput::new("ac");
        input.handle(key(KeyCode::Char('d')));
        assert_eq!(input.value(), "acd");

        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Char('z')));
        assert_eq!(input.value(), "zacd");
        assert_eq!(input.cursor, 1);

        input.handle(key(KeyCode::Right));
        input.handle(key(KeyCode::Char('b')));
        assert_eq!(input.value(), "zabcd");
        assert_eq!(input.cursor, 3);
    }

    #[test]
    fn hangul_editing_respects_char_boundaries() {
        let mut input = LineInput::new("안녕");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Char('하')));
        assert_eq!(input.value(), "안하녕");
        input.handle(key(KeyCode::Backspace));
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "안");
    }

    #[test]
    fn backspace_at_boundaries() {
        let mut input = LineInput::new("ab");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "a");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn delete_at_boundaries() {
        let mut input = LineInput::new("ab");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "b");
        assert_eq!(input.cursor, 0);

        input.handle(key(KeyCode::End));
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "b");
    }

    #[test]
    fn ctrl_w_word_delete() {
        let mut input = LineInput::new("foo bar  ");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "foo ");

        let mut input2 = LineInput::new("  foo");
        input2.handle(ctrl('w'));
        assert_eq!(input2.value(), "  ");
    }

    #[test]
    fn ctrl_a_e_u() {
        let mut input = LineInput::new("test");
        input.handle(ctrl('a'));
        assert_eq!(input.cursor, 0);
        input.handle(ctrl('e'));
        assert_eq!(input.cursor, 4);
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn submit_and_cancel() {
        let mut input = LineInput::new("test");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut input = LineInput::new("");
        input.insert_str("The cat sat.\nOn the mat.");
        assert_eq!(input.value(), "The cat sat. On the mat.");
        assert_eq!(input.cursor, 24);
    }

    #[test]
    fn render_parts_positions() {
        let mut input = LineInput::new("abc");
        assert_eq!(input.render_parts(), ("abc".to_string(), None, String::new()));
        input.cursor = 1;
        assert_eq!(
            input.render_parts(),
            ("a".to_string(), Some('b'), "c".to_string())
        );
    }

    #[test]
    fn secret_input_is_masked() {
        let mut input = LineInput::secret("key");
        input.cursor = 0;
        let (before, ch, after) = input.render_parts();
        assert_eq!(before, "");
        assert_eq!(ch, Some('•'));
        assert_eq!(after, "••");
        assert_eq!(input.value(), "key");
    }

    #[test]
    fn tab_is_ignored_outside_path_inputs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        let path = format!("{}/", dir.path().display());
        let mut input = LineInput::new(&path);
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), path);
        assert!(input.completion.is_none());
    }

    #[test]
    fn tab_at_midline_is_noop() {
        let mut input = LineInput::source_path("hello");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Right));
        assert_eq!(input.handle(key(KeyCode::Tab)), InputResult::Continue);
        assert_eq!(input.value(), "hello");
        assert_eq!(input.cursor, 1);
    }

    #[test]
    fn completion_error_on_bad_dir_clears_on_key() {
        let mut input = LineInput::source_path("/nonexistent_zzz_dir/");
        input.handle(key(KeyCode::Tab));
        assert!(input.completion_error);
        assert!(input.completion.is_none());

        input.handle(key(KeyCode::Left));
        assert!(!input.completion_error);
    }

    #[test]
    fn tab_completion_cycles_and_backtab_reverses() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alpha.txt"), "").unwrap();
        std::fs::write(dir.path().join("beta.md"), "").unwrap();
        std::fs::create_dir(dir.path().join("gamma_dir")).unwrap();
        let path = format!("{}/", dir.path().display());

        let mut input = LineInput::source_path(&path);
        input.handle(key(KeyCode::Tab));

        assert_eq!(candidates(&input).len(), 3);
        assert!(input.value().ends_with("gamma_dir/"));

        input.handle(key(KeyCode::Tab));
        assert!(input.value().ends_with("alpha.txt"));
        input.handle(key(KeyCode::Tab));
        assert!(input.value().ends_with("beta.md"));
        input.handle(key(KeyCode::Tab));
        assert!(input.value().ends_with("gamma_dir/"));
        input.handle(key(KeyCode::BackTab));
        assert!(input.value().ends_with("beta.md"));
    }

    #[test]
    fn completion_skips_unsupported_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lesson.txt"), "").unwrap();
        std::fs::write(dir.path().join("lesson.pdf"), "").unwrap();
        let path = format!("{}/less", dir.path().display());

        let mut input = LineInput::source_path(&path);
        input.handle(key(KeyCode::Tab));
        assert_eq!(candidates(&input).len(), 1);
        assert!(input.value().ends_with("lesson.txt"));
    }

    #[test]
    fn completion_hidden_file_filtering() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".hidden.md"), "").unwrap();
        std::fs::write(dir.path().join("visible.md"), "").unwrap();

        let path = format!("{}/", dir.path().display());
        let mut input = LineInput::source_path(&path);
        input.handle(key(KeyCode::Tab));
        assert_eq!(candidates(&input).len(), 1);
        assert!(candidates(&input)[0].ends_with("visible.md"));

        let path_dot = format!("{}/.h", dir.path().display());
        let mut input2 = LineInput::source_path(&path_dot);
        input2.handle(key(KeyCode::Tab));
        assert_eq!(candidates(&input2).len(), 1);
        assert!(candidates(&input2)[0].ends_with(".hidden.md"));
    }

    #[test]
    fn collect_completions_entry_error_sets_error_and_returns_empty() {
        let mut input = LineInput::source_path("");
        let entries: Vec<std::io::Result<(String, bool)>> = vec![
            Ok(("alpha.txt".to_string(), false)),
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "mock")),
        ];
        let result = input.collect_completions(entries.into_iter(), "/some/dir/", "");
        assert!(result.is_empty());
        assert!(input.completion_error);
    }

    #[test]
    fn collect_completions_orders_directories_first() {
        let mut input = LineInput::source_path("");
        let entries: Vec<std::io::Result<(String, bool)>> = vec![
            Ok(("zeta.md".to_string(), false)),
            Ok(("alpha_dir".to_string(), true)),
            Ok(("beta.txt".to_string(), false)),
            Ok(("image.png".to_string(), false)),
        ];
        let result = input.collect_completions(entries.into_iter(), "pfx/", "");
        let sep = std::path::MAIN_SEPARATOR;
        assert_eq!(
            result,
            vec![
                format!("pfx/alpha_dir{sep}"),
                "pfx/beta.txt".to_string(),
                "pfx/zeta.md".to_string()
            ]
        );
    }

    #[test]
    fn collect_completions_caps_candidates() {
        let mut input = LineInput::source_path("");
        let entries: Vec<std::io::Result<(String, bool)>> = (0..1200)
            .map(|i| Ok((format!("file_{i:04}.txt"), false)))
            .collect();
        let result = input.collect_completions(entries.into_iter(), "", "");
        assert_eq!(result.len(), 100);
    }
}
