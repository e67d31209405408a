//! Sequence-length budgeting for the training collator

use vla_tokenizer::STRUCTURAL_DELIMITER_COUNT;

/// Token budget for the free-text portion of an encoded sequence
///
/// The encoder never truncates; the training collator enforces the maximum
/// sequence length. This struct makes the reserved-length arithmetic
/// explicit: out of the total context length, one begin/end marker, the 12
/// structural delimiters and every visual/action token are spoken for, and
/// whatever remains is available for the description text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceBudget {
    /// Total context length of the model
    pub max_seq_len: usize,
    /// Visual tokens on the input side
    pub input_visual_tokens: usize,
    /// Action tokens on the input side
    pub input_action_tokens: usize,
    /// Visual tokens on the output side
    pub output_visual_tokens: usize,
    /// Action tokens on the output side
    pub output_action_tokens: usize,
}

impl SequenceBudget {
    /// Combined visual/action token count across both sides
    pub fn modality_tokens(&self) -> usize {
        self.input_visual_tokens
            + self.input_action_tokens
            + self.output_visual_tokens
            + self.output_action_tokens
    }

    /// Tokens left for the free-text description fields
    ///
    /// Saturates at zero when the modality tokens alone exceed the context
    /// length; the collator should reject such configurations.
    pub fn free_text_tokens(&self) -> usize {
        self.max_seq_len
            .saturating_sub(1) // begin/end marker
            .saturating_sub(STRUCTURAL_DELIMITER_COUNT)
            .saturating_sub(self.modality_tokens())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_text_budget() {
        // 4 input + 4 output frames of 256 visual tokens, 7 action tokens each
        let budget = SequenceBudget {
            max_seq_len: 2304,
            input_visual_tokens: 4 * 256,
            input_action_tokens: 4 * 7,
            output_visual_tokens: 4 * 256,
            output_action_tokens: 4 * 7,
        };

        assert_eq!(budget.modality_tokens(), 8 * 256 + 8 * 7);
        assert_eq!(budget.free_text_tokens(), 2304 - 1 - 12 - 8 * 256 - 8 * 7);
    }

    #[test]
    fn test_budget_saturates_at_zero() {
        let budget = SequenceBudget {
            max_seq_len: 100,
            input_visual_tokens: 256,
            input_action_tokens: 0,
            output_visual_tokens: 0,
            output_action_tokens: 0,
        };

        assert_eq!(budget.free_text_tokens(), 0);
    }
}
