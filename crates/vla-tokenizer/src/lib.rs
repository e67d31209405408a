//! Vocabulary collaborator for the VLA sequence format
//!
//! This crate provides:
//! - Bidirectional id <-> surface-token lookup
//! - Structural delimiter registration
//! - Reserved visual/action token ranges
//! - Vocabulary persistence as JSON
//!
//! # Example
//!
//! ```
//! use vla_tokenizer::{Delimiters, Vocabulary};
//!
//! let mut vocab = Vocabulary::new();
//! vocab.register_delimiters(Delimiters::default());
//! vocab.register_visual_range(2048).expect("visual range");
//! vocab.register_action_range(256).expect("action range");
//!
//! let visual = vocab.visual_range().expect("registered").clone();
//! let surface = vocab.id_to_surface(visual.start()).expect("in vocab");
//! assert!(surface.starts_with("<v"));
//! ```

pub mod delimiters;
pub mod vocab;

pub use delimiters::{Delimiters, STRUCTURAL_DELIMITER_COUNT};
pub use vocab::{ReservedRange, Vocabulary, VocabularyData, VocabularyError};
