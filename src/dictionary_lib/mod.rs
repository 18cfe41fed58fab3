//! Dictionary types: the matching trie, dictionary sources, and the named store.
//!
//! - [`Trie`]: prefix tree with longest-match rewriting; one per conversion stage.
//! - [`DictSource`] / [`DictGroup`]: dictionaries in their two accepted shapes,
//!   and ordered sets of them merged into one stage.
//! - [`DictionaryStore`]: dictionaries by name, with file and CBOR/Zstd persistence.

mod dict_source;
mod dictionary_store;
mod trie;

pub use dict_source::{DictGroup, DictSource, FIELD_DELIMITER, RECORD_DELIMITER};
pub use dictionary_store::{DictionaryError, DictionaryStore, REVERSE_DICT_MAPPINGS};
pub use trie::Trie;
