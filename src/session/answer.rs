#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    pub fn from_bool(correct: bool) -> Self {
        if correct {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

/// Learner's attempt at one answer card.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerState {
    pub submitted: String,
    pub verdict: Option<Verdict>,
    pub revealed: bool,
}

impl AnswerState {
    pub fn record(&mut self, answer: &str, correct: bool) -> Verdict {
        let verdict = Verdict::from_bool(correct);
        self.submitted = answer.to_string();
        self.verdict = Some(verdict);
        verdict
    }

    pub fn toggle_reveal(&mut self) {
        self.revealed = !self.revealed;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
