//! Vocabulary management

use crate::Delimiters;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during vocabulary operations
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Token not found in vocabulary: {0}")]
    TokenNotFound(String),
    #[error("ID not found in vocabulary: {0}")]
    IdNotFound(u32),
    #[error("Reserved {0} range has not been registered")]
    RangeNotRegistered(&'static str),
    #[error("Reserved {0} range is already registered")]
    RangeAlreadyRegistered(&'static str),
    #[error("Reserved {0} range must contain at least one token")]
    EmptyRange(&'static str),
    #[error("Delimiter tokens have not been registered")]
    DelimitersNotRegistered,
}

/// A contiguous block of vocabulary ids reserved for one modality
///
/// Reserved tokens render as `{prefix}{id}>`, so the surface text embeds the
/// vocabulary id itself (e.g. id 37 in a range with prefix `<v` renders as
/// `<v37>`). This keeps the concatenated surface form losslessly parseable
/// back to ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedRange {
    prefix: String,
    start: u32,
    len: u32,
}

impl ReservedRange {
    /// The shared surface prefix of tokens in this range (e.g. `<v`)
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// First id of the range
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Number of ids in the range
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the range contains no ids
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check whether an id falls inside this range
    pub fn contains(&self, id: u32) -> bool {
        id >= self.start && id < self.start + self.len
    }

    /// Render the surface text for an id in this range
    pub fn surface(&self, id: u32) -> String {
        format!("{}{}>", self.prefix, id)
    }
}

/// Serialized vocabulary data
///
/// This struct is used to save and load the vocabulary, including the
/// reserved ranges and delimiter set so a reloaded vocabulary is usable for
/// encoding without re-registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyData {
    /// Token to ID mapping
    pub vocabulary: HashMap<String, u32>,
    /// Registered delimiter set, if any
    pub delimiters: Option<Delimiters>,
    /// Reserved visual range, if registered
    pub visual_range: Option<ReservedRange>,
    /// Reserved action range, if registered
    pub action_range: Option<ReservedRange>,
}

/// Vocabulary mapping between surface tokens and IDs
///
/// Maintains bidirectional mappings (token -> ID for encoding, ID -> token
/// for decoding) plus the reserved visual/action sub-ranges and the
/// structural delimiter set that must be registered before any sequence
/// codec is built over this vocabulary.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Mapping from token to ID
    token_to_id: HashMap<String, u32>,
    /// Mapping from ID to token
    id_to_token: HashMap<u32, String>,
    /// Next available ID for new tokens
    next_id: u32,
    delimiters: Option<Delimiters>,
    visual_range: Option<ReservedRange>,
    action_range: Option<ReservedRange>,
}

impl Vocabulary {
    /// Create a new empty vocabulary
    pub fn new() -> Self {
        Self {
            token_to_id: HashMap::new(),
            id_to_token: HashMap::new(),
            next_id: 0,
            delimiters: None,
            visual_range: None,
            action_range: None,
        }
    }

    /// Add a token to the vocabulary
    ///
    /// Returns the ID assigned to the token. If the token already exists,
    /// returns its existing ID.
    pub fn add_token(&mut self, token: String) -> u32 {
        if let Some(&id) = self.token_to_id.get(&token) {
            return id;
        }

        let id = self.next_id;
        self.token_to_id.insert(token.clone(), id);
        self.id_to_token.insert(id, token);
        self.next_id += 1;
        id
    }

    /// Get the ID for a surface token
    ///
    /// Returns an error if the token is not in the vocabulary.
    pub fn surface_to_id(&self, token: &str) -> Result<u32, VocabularyError> {
        self.token_to_id
            .get(token)
            .copied()
            .ok_or_else(|| VocabularyError::TokenNotFound(token.to_string()))
    }

    /// Get the surface token for an ID
    ///
    /// Returns an error if the ID is not in the vocabulary.
    pub fn id_to_surface(&self, id: u32) -> Result<&str, VocabularyError> {
        self.id_to_token
            .get(&id)
            .map(|s| s.as_str())
            .ok_or(VocabularyError::IdNotFound(id))
    }

    /// Check if a token exists in the vocabulary
    pub fn contains_token(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    /// Check if an ID exists in the vocabulary
    pub fn contains_id(&self, id: u32) -> bool {
        self.id_to_token.contains_key(&id)
    }

    /// Get the size of the vocabulary
    pub fn size(&self) -> usize {
        self.token_to_id.len()
    }

    /// Check if the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }

    /// Register the structural delimiter set, eos and pad markers
    ///
    /// Must be called (along with both reserved ranges) before a sequence
    /// codec is constructed over this vocabulary.
    pub fn register_delimiters(&mut self, delimiters: Delimiters) {
        for token in delimiters.all() {
            self.add_token(token.to_string());
        }
        self.delimiters = Some(delimiters);
    }

    /// Register the reserved visual range with `count` tokens
    ///
    /// The range is appended beyond the current vocabulary; each token's
    /// surface text is `<v{id}>` where `id` is its assigned vocabulary id.
    /// Registering the range twice is a configuration error.
    pub fn register_visual_range(&mut self, count: u32) -> Result<(), VocabularyError> {
        if self.visual_range.is_some() {
            return Err(VocabularyError::RangeAlreadyRegistered("visual"));
        }
        let range = self.append_range("<v", count, "visual")?;
        self.visual_range = Some(range);
        Ok(())
    }

    /// Register the reserved action range with `count` tokens
    ///
    /// Same contract as [`register_visual_range`](Self::register_visual_range),
    /// with surface prefix `<a`.
    pub fn register_action_range(&mut self, count: u32) -> Result<(), VocabularyError> {
        if self.action_range.is_some() {
            return Err(VocabularyError::RangeAlreadyRegistered("action"));
        }
        let range = self.append_range("<a", count, "action")?;
        self.action_range = Some(range);
        Ok(())
    }

    fn append_range(
        &mut self,
        prefix: &str,
        count: u32,
        name: &'static str,
    ) -> Result<ReservedRange, VocabularyError> {
        if count == 0 {
            return Err(VocabularyError::EmptyRange(name));
        }
        let range = ReservedRange {
            prefix: prefix.to_string(),
            start: self.next_id,
            len: count,
        };
        for _ in 0..count {
            let id = self.next_id;
            let added = self.add_token(range.surface(id));
            debug_assert_eq!(added, id);
        }
        Ok(range)
    }

    /// Get the registered delimiter set
    pub fn delimiters(&self) -> Result<&Delimiters, VocabularyError> {
        self.delimiters
            .as_ref()
            .ok_or(VocabularyError::DelimitersNotRegistered)
    }

    /// Get the reserved visual range
    pub fn visual_range(&self) -> Result<&ReservedRange, VocabularyError> {
        self.visual_range
            .as_ref()
            .ok_or(VocabularyError::RangeNotRegistered("visual"))
    }

    /// Get the reserved action range
    pub fn action_range(&self) -> Result<&ReservedRange, VocabularyError> {
        self.action_range
            .as_ref()
            .ok_or(VocabularyError::RangeNotRegistered("action"))
    }

    /// Load a vocabulary from a directory
    ///
    /// Reads `vocab.json` from the directory and reconstructs the token
    /// mappings, reserved ranges and delimiter set.
    pub fn from_directory<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let vocab_file = path.join("vocab.json");

        if !vocab_file.exists() {
            anyhow::bail!("Vocabulary file not found: {}", vocab_file.display());
        }

        let content = std::fs::read_to_string(&vocab_file)
            .with_context(|| format!("Failed to read vocabulary file: {}", vocab_file.display()))?;

        let data: VocabularyData =
            serde_json::from_str(&content).context("Failed to parse vocabulary JSON")?;

        let mut id_to_token = HashMap::with_capacity(data.vocabulary.len());
        let mut next_id = 0;
        for (token, &id) in &data.vocabulary {
            id_to_token.insert(id, token.clone());
            next_id = next_id.max(id + 1);
        }

        Ok(Self {
            token_to_id: data.vocabulary,
            id_to_token,
            next_id,
            delimiters: data.delimiters,
            visual_range: data.visual_range,
            action_range: data.action_range,
        })
    }

    /// Save the vocabulary to a directory as `vocab.json`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;

        let vocab_file = path.join("vocab.json");

        let data = VocabularyData {
            vocabulary: self.token_to_id.clone(),
            delimiters: self.delimiters.clone(),
            visual_range: self.visual_range.clone(),
            action_range: self.action_range.clone(),
        };

        let content = serde_json::to_string(&data).context("Failed to serialize vocabulary")?;

        std::fs::write(&vocab_file, content)
            .with_context(|| format!("Failed to write vocabulary file: {}", vocab_file.display()))?;

        Ok(())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}
