//! Sequence decoding and field extraction

use crate::{CodecError, DelimiterPosition, Field};
use vla_tokenizer::{Delimiters, ReservedRange, Vocabulary};

/// Structured fields recovered from a flat sequence string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSequence {
    /// Task + input plan description (the `<bot_i>` span)
    pub input_text: String,
    /// Input visual token ids
    pub input_visual: Vec<u32>,
    /// Input action token ids
    pub input_action: Vec<u32>,
    /// Output plan description (the `<bot_o>` span)
    pub output_text: String,
    /// Output visual token ids
    pub output_visual: Vec<u32>,
    /// Output action token ids
    pub output_action: Vec<u32>,
}

/// Extracts structured fields from generated or ground-truth text
///
/// Generated text is untrusted: every extraction validates that both
/// delimiters of the field are present and that token spans parse cleanly
/// into ids inside the reserved ranges. A failed extraction is a defined,
/// per-example error, never a silently wrong field.
#[derive(Debug, Clone)]
pub struct SequenceDecoder {
    delimiters: Delimiters,
    visual: ReservedRange,
    action: ReservedRange,
}

impl SequenceDecoder {
    /// Create a decoder over a fully registered vocabulary
    ///
    /// # Errors
    /// Fails if the delimiters or either reserved range have not been
    /// registered on the vocabulary.
    pub fn new(vocab: &Vocabulary) -> Result<Self, CodecError> {
        Ok(Self {
            delimiters: vocab.delimiters()?.clone(),
            visual: vocab.visual_range()?.clone(),
            action: vocab.action_range()?.clone(),
        })
    }

    /// Extract the raw span of one field
    ///
    /// Locates the first occurrence of the field's closing delimiter, then
    /// the last occurrence of its opening delimiter before that point, and
    /// returns the substring strictly between them. Searching for the close
    /// first keeps the extraction tolerant of the opening delimiter showing
    /// up earlier in unrelated text.
    ///
    /// # Errors
    /// [`CodecError::MissingDelimiter`] if either delimiter is absent.
    pub fn extract_field<'a>(&self, text: &'a str, field: Field) -> Result<&'a str, CodecError> {
        let close = field.close(&self.delimiters);
        let end = text
            .find(close)
            .ok_or_else(|| CodecError::MissingDelimiter {
                field,
                position: DelimiterPosition::Closing,
                token: close.to_string(),
            })?;
        let head = &text[..end];

        let open = field.open(&self.delimiters);
        let start = head
            .rfind(open)
            .ok_or_else(|| CodecError::MissingDelimiter {
                field,
                position: DelimiterPosition::Opening,
                token: open.to_string(),
            })?;

        Ok(&head[start + open.len()..])
    }

    /// Task + input plan description from the `<bot_i>` span
    pub fn input_text<'a>(&self, text: &'a str) -> Result<&'a str, CodecError> {
        self.extract_field(text, Field::TextIn)
    }

    /// Output plan description from the `<bot_o>` span
    pub fn output_text<'a>(&self, text: &'a str) -> Result<&'a str, CodecError> {
        self.extract_field(text, Field::TextOut)
    }

    /// Input visual token ids from the `<bov_i>` span
    pub fn input_visual_ids(&self, text: &str) -> Result<Vec<u32>, CodecError> {
        let span = self.extract_field(text, Field::VisualIn)?;
        self.parse_surface_ids(span, &self.visual, Field::VisualIn)
    }

    /// Input action token ids from the `<boa_i>` span
    pub fn input_action_ids(&self, text: &str) -> Result<Vec<u32>, CodecError> {
        let span = self.extract_field(text, Field::ActionIn)?;
        self.parse_surface_ids(span, &self.action, Field::ActionIn)
    }

    /// Output visual token ids from the `<bov_o>` span
    pub fn output_visual_ids(&self, text: &str) -> Result<Vec<u32>, CodecError> {
        let span = self.extract_field(text, Field::VisualOut)?;
        self.parse_surface_ids(span, &self.visual, Field::VisualOut)
    }

    /// Output action token ids from the `<boa_o>` span
    pub fn output_action_ids(&self, text: &str) -> Result<Vec<u32>, CodecError> {
        let span = self.extract_field(text, Field::ActionOut)?;
        self.parse_surface_ids(span, &self.action, Field::ActionOut)
    }

    /// Recover all six structured fields from a flat sequence string
    pub fn decode(&self, text: &str) -> Result<DecodedSequence, CodecError> {
        Ok(DecodedSequence {
            input_text: self.input_text(text)?.to_string(),
            input_visual: self.input_visual_ids(text)?,
            input_action: self.input_action_ids(text)?,
            output_text: self.output_text(text)?.to_string(),
            output_visual: self.output_visual_ids(text)?,
            output_action: self.output_action_ids(text)?,
        })
    }

    /// Parse a span of concatenated reserved surface tokens back into ids
    ///
    /// Splits on the range's shared surface prefix, discards empty chunks
    /// produced by the split, strips the trailing `>` and parses the digits
    /// to an id. Each id must fall inside the field's reserved range.
    fn parse_surface_ids(
        &self,
        span: &str,
        range: &ReservedRange,
        field: Field,
    ) -> Result<Vec<u32>, CodecError> {
        let mut ids = Vec::new();
        for chunk in span.split(range.prefix()) {
            if chunk.is_empty() {
                continue;
            }
            let id = chunk
                .strip_suffix('>')
                .and_then(|digits| digits.parse::<u32>().ok())
                .ok_or_else(|| CodecError::MalformedSurface {
                    field,
                    chunk: chunk.to_string(),
                })?;
            if !range.contains(id) {
                return Err(CodecError::IdOutOfRange { field, id });
            }
            ids.push(id);
        }
        Ok(ids)
    }
}
