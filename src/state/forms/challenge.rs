//! Arithmetic security challenge shown on the final step
//!
//! This is a UX gate against accidental submissions, not a trust boundary.

use rand::Rng;

/// Operands are drawn from this inclusive range
const OPERAND_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeState {
    pub operand1: u32,
    pub operand2: u32,
    pub user_answer: String,
}

impl ChallengeState {
    /// Generate a challenge with fresh random operands
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self::with_operands(
            rng.gen_range(OPERAND_RANGE),
            rng.gen_range(OPERAND_RANGE),
        )
    }

    pub fn with_operands(operand1: u32, operand2: u32) -> Self {
        Self {
            operand1,
            operand2,
            user_answer: String::new(),
        }
    }

    /// Replace the operands and clear the answer
    pub fn refresh(&mut self) {
        *self = Self::generate();
    }

    pub fn question(&self) -> String {
        format!("{} + {} = ?", self.operand1, self.operand2)
    }

    /// Whether the answer parses to the operand sum
    pub fn is_solved(&self) -> bool {
        self.user_answer
            .trim()
            .parse::<u32>()
            .is_ok_and(|answer| answer == self.operand1 + self.operand2)
    }
}

impl Default for ChallengeState {
    fn default() -> Self {
        Self::generate()
    }
}
