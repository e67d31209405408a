//! Structural delimiter handling

use serde::{Deserialize, Serialize};

/// Structural delimiters used to frame the multi-modal sequence format
///
/// Each semantic field of an encoded example is wrapped by a begin/end
/// delimiter pair. The `_i` suffix marks input-side fields, `_o` output-side
/// fields. The end-of-sequence and pad markers are carried here as well so
/// that every reserved surface token is registered in one place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delimiters {
    /// Begin of input text (task + input plan description)
    bot_i: String,
    /// End of input text
    eot_i: String,
    /// Begin of input visual tokens
    bov_i: String,
    /// End of input visual tokens
    eov_i: String,
    /// Begin of input action tokens
    boa_i: String,
    /// End of input action tokens
    eoa_i: String,
    /// Begin of output text (output plan description)
    bot_o: String,
    /// End of output text
    eot_o: String,
    /// Begin of output visual tokens
    bov_o: String,
    /// End of output visual tokens
    eov_o: String,
    /// Begin of output action tokens
    boa_o: String,
    /// End of output action tokens
    eoa_o: String,
    /// End of Sequence marker - closes every encoded example
    eos: String,
    /// Padding marker - used for batching by the training collator
    pad: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            bot_i: "<bot_i>".to_string(),
            eot_i: "<eot_i>".to_string(),
            bov_i: "<bov_i>".to_string(),
            eov_i: "<eov_i>".to_string(),
            boa_i: "<boa_i>".to_string(),
            eoa_i: "<eoa_i>".to_string(),
            bot_o: "<bot_o>".to_string(),
            eot_o: "<eot_o>".to_string(),
            bov_o: "<bov_o>".to_string(),
            eov_o: "<eov_o>".to_string(),
            boa_o: "<boa_o>".to_string(),
            eoa_o: "<eoa_o>".to_string(),
            eos: "<|eos|>".to_string(),
            pad: "<|pad|>".to_string(),
        }
    }
}

impl Delimiters {
    /// Create a new Delimiters instance with default spellings
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin of input text delimiter
    pub fn bot_i(&self) -> &str {
        &self.bot_i
    }

    /// End of input text delimiter
    pub fn eot_i(&self) -> &str {
        &self.eot_i
    }

    /// Begin of input visual delimiter
    pub fn bov_i(&self) -> &str {
        &self.bov_i
    }

    /// End of input visual delimiter
    pub fn eov_i(&self) -> &str {
        &self.eov_i
    }

    /// Begin of input action delimiter
    pub fn boa_i(&self) -> &str {
        &self.boa_i
    }

    /// End of input action delimiter
    pub fn eoa_i(&self) -> &str {
        &self.eoa_i
    }

    /// Begin of output text delimiter
    pub fn bot_o(&self) -> &str {
        &self.bot_o
    }

    /// End of output text delimiter
    pub fn eot_o(&self) -> &str {
        &self.eot_o
    }

    /// Begin of output visual delimiter
    pub fn bov_o(&self) -> &str {
        &self.bov_o
    }

    /// End of output visual delimiter
    pub fn eov_o(&self) -> &str {
        &self.eov_o
    }

    /// Begin of output action delimiter
    pub fn boa_o(&self) -> &str {
        &self.boa_o
    }

    /// End of output action delimiter
    pub fn eoa_o(&self) -> &str {
        &self.eoa_o
    }

    /// End of Sequence marker
    pub fn eos(&self) -> &str {
        &self.eos
    }

    /// Padding marker
    pub fn pad(&self) -> &str {
        &self.pad
    }

    /// The 12 structural field delimiters, in encoding order
    pub fn structural(&self) -> Vec<&str> {
        vec![
            self.bot_i(),
            self.eot_i(),
            self.bov_i(),
            self.eov_i(),
            self.boa_i(),
            self.eoa_i(),
            self.bot_o(),
            self.eot_o(),
            self.bov_o(),
            self.eov_o(),
            self.boa_o(),
            self.eoa_o(),
        ]
    }

    /// All reserved delimiter tokens, including the eos and pad markers
    pub fn all(&self) -> Vec<&str> {
        let mut tokens = self.structural();
        tokens.push(self.eos());
        tokens.push(self.pad());
        tokens
    }

    /// Check if a token is one of the reserved delimiter tokens
    pub fn is_special(&self, token: &str) -> bool {
        self.all().contains(&token)
    }
}

/// Number of structural field delimiters in an encoded sequence
pub const STRUCTURAL_DELIMITER_COUNT: usize = 12;
