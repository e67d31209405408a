//! Sequence encoding

use crate::{CodecError, Field, SequenceFields};
use vla_tokenizer::{Delimiters, ReservedRange, Vocabulary};

/// An example encoded as prompt and completion halves
///
/// The prompt runs through the closing input-action delimiter (the response
/// boundary used by the completion-only training collator); the completion
/// carries the output fields and the end-of-sequence marker. Concatenating
/// the two gives the full training sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedExample {
    pub prompt: String,
    pub completion: String,
}

impl EncodedExample {
    /// The full sequence: prompt followed by completion
    pub fn full(&self) -> String {
        let mut text = String::with_capacity(self.prompt.len() + self.completion.len());
        text.push_str(&self.prompt);
        text.push_str(&self.completion);
        text
    }
}

/// Serializes structured examples into the delimited token stream
///
/// Construction validates eagerly that the vocabulary has its delimiter set
/// and both reserved ranges registered, so a misconfigured vocabulary fails
/// at startup rather than on the first example.
#[derive(Debug)]
pub struct SequenceEncoder<'v> {
    vocab: &'v Vocabulary,
    delimiters: &'v Delimiters,
    visual: &'v ReservedRange,
    action: &'v ReservedRange,
}

impl<'v> SequenceEncoder<'v> {
    /// Create an encoder over a fully registered vocabulary
    ///
    /// # Errors
    /// Fails if the delimiters or either reserved range have not been
    /// registered on the vocabulary.
    pub fn new(vocab: &'v Vocabulary) -> Result<Self, CodecError> {
        Ok(Self {
            vocab,
            delimiters: vocab.delimiters()?,
            visual: vocab.visual_range()?,
            action: vocab.action_range()?,
        })
    }

    /// Encode an example into one flat sequence string
    ///
    /// Field order:
    /// `<bot_i>` task + input plan `<eot_i>` `<bov_i>` input visual `<eov_i>`
    /// `<boa_i>` input action `<eoa_i>` `<bot_o>` output plan `<eot_o>`
    /// `<bov_o>` output visual `<eov_o>` `<boa_o>` output action `<eoa_o>`
    /// eos marker.
    ///
    /// No truncation is performed; enforcing a maximum sequence length is
    /// the caller's responsibility.
    pub fn encode(&self, fields: &SequenceFields<'_>) -> Result<String, CodecError> {
        Ok(self.encode_split(fields)?.full())
    }

    /// Encode an example into prompt and completion halves
    ///
    /// `prompt + completion` equals [`encode`](Self::encode) of the same
    /// fields.
    pub fn encode_split(&self, fields: &SequenceFields<'_>) -> Result<EncodedExample, CodecError> {
        let d = self.delimiters;

        self.check_content(fields.task_description, Field::TextIn)?;
        self.check_content(fields.input_plan_description, Field::TextIn)?;
        self.check_content(fields.output_plan_description, Field::TextOut)?;

        let mut prompt = String::new();
        prompt.push_str(d.bot_i());
        prompt.push_str(fields.task_description);
        prompt.push_str(fields.input_plan_description);
        prompt.push_str(d.eot_i());
        prompt.push_str(d.bov_i());
        self.render_ids(&mut prompt, fields.input_visual, Field::VisualIn)?;
        prompt.push_str(d.eov_i());
        prompt.push_str(d.boa_i());
        self.render_ids(&mut prompt, fields.input_action, Field::ActionIn)?;
        prompt.push_str(d.eoa_i());

        let mut completion = String::new();
        completion.push_str(d.bot_o());
        completion.push_str(fields.output_plan_description);
        completion.push_str(d.eot_o());
        completion.push_str(d.bov_o());
        self.render_ids(&mut completion, fields.output_visual, Field::VisualOut)?;
        completion.push_str(d.eov_o());
        completion.push_str(d.boa_o());
        self.render_ids(&mut completion, fields.output_action, Field::ActionOut)?;
        completion.push_str(d.eoa_o());
        completion.push_str(d.eos());

        Ok(EncodedExample { prompt, completion })
    }

    /// Render a token-id sequence as concatenated surface tokens
    fn render_ids(&self, out: &mut String, ids: &[u32], field: Field) -> Result<(), CodecError> {
        let range = match field {
            Field::VisualIn | Field::VisualOut => self.visual,
            Field::ActionIn | Field::ActionOut => self.action,
            Field::TextIn | Field::TextOut => unreachable!("text fields carry no token ids"),
        };

        for &id in ids {
            if !range.contains(id) {
                return Err(CodecError::IdOutOfRange { field, id });
            }
            out.push_str(self.vocab.id_to_surface(id)?);
        }
        Ok(())
    }

    /// Reject free text that embeds a reserved delimiter
    ///
    /// Delimiters inside field content would make the stream ambiguous on
    /// decode, so this is a caller error rather than something the decoder
    /// should tolerate.
    fn check_content(&self, text: &str, field: Field) -> Result<(), CodecError> {
        for token in self.delimiters.all() {
            if text.contains(token) {
                return Err(CodecError::DelimiterInContent {
                    field,
                    token: token.to_string(),
                });
            }
        }
        Ok(())
    }
}
