use crate::drill::{SubstitutionDrill, Word, sentence_text};

/// Working copy of one substitution sentence. Only this copy changes; the
/// drill in the set keeps its original words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubstitutionState {
    original: Vec<Word>,
    pub words: Vec<Word>,
    /// Index into `interactive_positions()`.
    pub focus: usize,
}

impl SubstitutionState {
    pub fn new(drill: &SubstitutionDrill) -> Self {
        Self {
            original: drill.sentence.english.clone(),
            words: drill.sentence.english.clone(),
            focus: 0,
        }
    }

    pub fn interactive_positions(&self) -> Vec<usize> {
        self.words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_interactive)
            .map(|(i, _)| i)
            .collect()
    }

    /// Token index of the focused interactive word.
    pub fn focused_position(&self) -> Option<usize> {
        self.interactive_positions().get(self.focus).copied()
    }

    pub fn focused_word(&self) -> Option<&Word> {
        self.focused_position().map(|i| &self.words[i])
    }

    pub fn focus_next(&mut self) {
        let count = self.interactive_positions().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.interactive_positions().len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    /// Picker entries for the focused word: the original word first, then
    /// its alternatives, without duplicates.
    pub fn choices(&self) -> Vec<String> {
        let Some(pos) = self.focused_position() else {
            return Vec::new();
        };
        let mut choices = vec![self.original[pos].core().to_string()];
        for alt in self.original[pos].alternatives() {
            let alt = alt.trim();
            if !alt.is_empty() && !choices.iter().any(|c| c.eq_ignore_ascii_case(alt)) {
                choices.push(alt.to_string());
            }
        }
        choices
    }

    pub fn apply(&mut self, choice: &str) {
        if let Some(pos) = self.focused_position() {
            let mut word = self.original[pos].clone();
            word.substitute(choice);
            self.words[pos] = word;
        }
    }

    pub fn reset(&mut self) {
        self.words = self.original.clone();
        self.focus = 0;
    }

    pub fn is_modified(&self) -> bool {
        self.words != self.original
    }

    pub fn text(&self) -> String {
        sentence_text(&self.words)
    }
}
