//! Sequence codec for the VLA token stream format
//!
//! This crate packs a structured multi-modal example (task text, plan
//! descriptions, visual token ids, action token ids) into one delimited text
//! stream for a causal language model, and recovers structured fields from a
//! generated stream for scoring:
//! - [`SequenceEncoder`] serializes the six semantic fields in a fixed order
//! - [`SequenceDecoder`] extracts fields back out, validating delimiters
//! - [`score::agreement_ratio`] measures position-aligned token agreement
//!
//! Encoding and decoding are pure functions over a read-only vocabulary;
//! they hold no shared state and are safe to map over examples in parallel.

pub mod decoder;
pub mod encoder;
pub mod score;

pub use decoder::{DecodedSequence, SequenceDecoder};
pub use encoder::{EncodedExample, SequenceEncoder};
pub use score::{agreement_ratio, ScoreError};

use std::fmt;
use thiserror::Error;
use vla_tokenizer::{Delimiters, VocabularyError};

/// The six semantic fields of an encoded sequence, in stream order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Task description + input plan description
    TextIn,
    /// Input visual token ids
    VisualIn,
    /// Input action token ids
    ActionIn,
    /// Output plan description
    TextOut,
    /// Output visual token ids
    VisualOut,
    /// Output action token ids
    ActionOut,
}

impl Field {
    /// Opening delimiter for this field
    pub fn open<'d>(&self, delimiters: &'d Delimiters) -> &'d str {
        match self {
            Field::TextIn => delimiters.bot_i(),
            Field::VisualIn => delimiters.bov_i(),
            Field::ActionIn => delimiters.boa_i(),
            Field::TextOut => delimiters.bot_o(),
            Field::VisualOut => delimiters.bov_o(),
            Field::ActionOut => delimiters.boa_o(),
        }
    }

    /// Closing delimiter for this field
    pub fn close<'d>(&self, delimiters: &'d Delimiters) -> &'d str {
        match self {
            Field::TextIn => delimiters.eot_i(),
            Field::VisualIn => delimiters.eov_i(),
            Field::ActionIn => delimiters.eoa_i(),
            Field::TextOut => delimiters.eot_o(),
            Field::VisualOut => delimiters.eov_o(),
            Field::ActionOut => delimiters.eoa_o(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::TextIn => "input text",
            Field::VisualIn => "input visual",
            Field::ActionIn => "input action",
            Field::TextOut => "output text",
            Field::VisualOut => "output visual",
            Field::ActionOut => "output action",
        };
        f.write_str(name)
    }
}

/// Which delimiter of a field's pair was involved in an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterPosition {
    Opening,
    Closing,
}

impl fmt::Display for DelimiterPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelimiterPosition::Opening => f.write_str("opening"),
            DelimiterPosition::Closing => f.write_str("closing"),
        }
    }
}

/// Errors that can occur while encoding or decoding a sequence
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{field} field: {position} delimiter `{token}` not found")]
    MissingDelimiter {
        field: Field,
        position: DelimiterPosition,
        token: String,
    },
    #[error("{field} field: surface chunk `{chunk}` is not a reserved token")]
    MalformedSurface { field: Field, chunk: String },
    #[error("{field} field: id {id} is outside the reserved range")]
    IdOutOfRange { field: Field, id: u32 },
    #[error("{field} field: content contains reserved delimiter `{token}`")]
    DelimiterInContent { field: Field, token: String },
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

impl CodecError {
    /// Whether this error can be produced by untrusted generated text
    ///
    /// Such failures are per-example and recoverable: the evaluation loop
    /// records and skips the example instead of aborting the batch.
    /// Vocabulary and content errors are configuration or caller bugs and
    /// stay fatal.
    pub fn is_malformed_generation(&self) -> bool {
        matches!(
            self,
            CodecError::MissingDelimiter { .. }
                | CodecError::MalformedSurface { .. }
                | CodecError::IdOutOfRange { .. }
        )
    }
}

/// Borrowed view of the six fields the encoder serializes
///
/// Every field must be supplied; the token id sequences may be empty, which
/// encodes as an empty span between the matching delimiters.
#[derive(Debug, Clone, Copy)]
pub struct SequenceFields<'a> {
    pub task_description: &'a str,
    pub input_plan_description: &'a str,
    pub output_plan_description: &'a str,
    pub input_visual: &'a [u32],
    pub input_action: &'a [u32],
    pub output_visual: &'a [u32],
    pub output_action: &'a [u32],
}
