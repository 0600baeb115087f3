//! Practice state for one drill set: selected tab, selected drill per tab and
//! the learner's local edits and answers.

pub mod answer;
pub mod substitution;

use crate::drill::check::{check_exact, check_response};
use crate::drill::{DrillKind, DrillSet};

use answer::{AnswerState, Verdict};
use substitution::SubstitutionState;

pub struct PracticeSession {
    set: DrillSet,
    tab: DrillKind,
    selected: [usize; 5],
    pub substitutions: Vec<SubstitutionState>,
    pub responses: Vec<AnswerState>,
    pub transformations: Vec<AnswerState>,
    pub expansions: Vec<AnswerState>,
    /// Selected turn per integration drill.
    pub turns: Vec<usize>,
}

impl PracticeSession {
    pub fn new(set: DrillSet) -> Self {
        let tab = DrillKind::ALL
            .into_iter()
            .find(|&kind| set.count(kind) > 0)
            .unwrap_or(DrillKind::Substitution);
        Self {
            substitutions: set.substitution.iter().map(SubstitutionState::new).collect(),
            responses: vec![AnswerState::default(); set.response.len()],
            transformations: vec![AnswerState::default(); set.transformation.len()],
            expansions: vec![AnswerState::default(); set.expansion.len()],
            turns: vec![0; set.integration.len()],
            set,
            tab,
            selected: [0; 5],
        }
    }

    pub fn set(&self) -> &DrillSet {
        &self.set
    }

    pub fn tab(&self) -> DrillKind {
        self.tab
    }

    pub fn select_tab(&mut self, kind: DrillKind) {
        self.tab = kind;
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
    }

    /// Selected drill index on the current tab.
    pub fn selected(&self) -> usize {
        self.selected[self.tab.index()]
    }

    pub fn next_drill(&mut self) {
        let count = self.set.count(self.tab);
        let slot = &mut self.selected[self.tab.index()];
        if *slot + 1 < count {
            *slot += 1;
        }
    }

    pub fn prev_drill(&mut self) {
        let slot = &mut self.selected[self.tab.index()];
        *slot = slot.saturating_sub(1);
    }

    pub fn current_substitution(&mut self) -> Option<&mut SubstitutionState> {
        if self.tab != DrillKind::Substitution {
            return None;
        }
        let index = self.selected();
        self.substitutions.get_mut(index)
    }

    /// Answer state of the selected card on an answer tab.
    pub fn current_answer(&self) -> Option<&AnswerState> {
        let index = self.selected();
        match self.tab {
            DrillKind::Response => self.responses.get(index),
            DrillKind::Transformation => self.transformations.get(index),
            DrillKind::Expansion => self.expansions.get(index),
            _ => None,
        }
    }

    fn current_answer_mut(&mut self) -> Option<&mut AnswerState> {
        let index = self.selected();
        match self.tab {
            DrillKind::Response => self.responses.get_mut(index),
            DrillKind::Transformation => self.transformations.get_mut(index),
            DrillKind::Expansion => self.expansions.get_mut(index),
            _ => None,
        }
    }

    pub fn is_answer_tab(&self) -> bool {
        matches!(
            self.tab,
            DrillKind::Response | DrillKind::Transformation | DrillKind::Expansion
        )
    }

    /// Check `answer` against the selected card. `None` when the current tab
    /// has no answer card.
    pub fn check(&mut self, answer: &str) -> Option<Verdict> {
        let index = self.selected();
        let correct = match self.tab {
            DrillKind::Response => check_response(self.set.response.get(index)?, answer),
            DrillKind::Transformation => {
                check_exact(&self.set.transformation.get(index)?.answer, answer)
            }
            DrillKind::Expansion => check_exact(&self.set.expansion.get(index)?.answer, answer),
            _ => return None,
        };
        let state = self.current_answer_mut()?;
        Some(state.record(answer, correct))
    }

    pub fn toggle_reveal(&mut self) {
        if let Some(state) = self.current_answer_mut() {
            state.toggle_reveal();
        }
    }

    /// Reset the selected card: the substitution sentence or the answer.
    pub fn reset_current(&mut self) {
        if let Some(sub) = self.current_substitution() {
            sub.reset();
        } else if let Some(state) = self.current_answer_mut() {
            state.reset();
        }
    }

    pub fn current_turn(&self) -> Option<usize> {
        if self.tab != DrillKind::Integration {
            return None;
        }
        self.turns.get(self.selected()).copied()
    }

    pub fn next_turn(&mut self) {
        let index = self.selected();
        if self.tab != DrillKind::Integration {
            return;
        }
        let count = self.set.integration.get(index).map_or(0, |d| d.sentences.len());
        if let Some(turn) = self.turns.get_mut(index) {
            if *turn + 1 < count {
                *turn += 1;
            }
        }
    }

    pub fn prev_turn(&mut self) {
        let index = self.selected();
        if self.tab != DrillKind::Integration {
            return;
        }
        if let Some(turn) = self.turns.get_mut(index) {
            *turn = turn.saturating_sub(1);
        }
    }

    /// English text the speak key should read for the selected card. Answer
    /// cards read the answer once it is revealed.
    pub fn speech_text(&self) -> Option<String> {
        let index = self.selected();
        let revealed = self.current_answer().is_some_and(|a| a.revealed);
        let text = match self.tab {
            DrillKind::Substitution => self.substitutions.get(index)?.text(),
            DrillKind::Response => {
                let drill = self.set.response.get(index)?;
                if revealed {
                    drill.sentence.text()
                } else {
                    drill.prompt.clone()
                }
            }
            DrillKind::Transformation => {
                let drill = self.set.transformation.get(index)?;
                if revealed {
                    drill.answer.clone()
                } else {
                    drill.sentence.text()
                }
            }
            DrillKind::Expansion => {
                let drill = self.set.expansion.get(index)?;
                if revealed {
                    drill.answer.clone()
                } else {
                    drill.sentence.text()
                }
            }
            DrillKind::Integration => {
                let drill = self.set.integration.get(index)?;
                let turn = self.turns.get(index).copied().unwrap_or(0);
                drill.sentences.get(turn)?.text()
            }
        };
        Some(text).filter(|t| !t.trim().is_empty())
    }
}
