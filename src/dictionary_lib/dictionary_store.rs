//! Named dictionary registry handed to the converter by the acquisition side.
//!
//! This module defines [`DictionaryStore`], a map from dictionary names
//! (`"STCharacters"`, `"TWPhrasesIT"`, ...) to [`DictSource`]s. Presets refer to
//! dictionaries by name; the store resolves those names into groups and reports
//! the names it cannot supply.
//!
//! Stores are prepared offline: loaded from a directory of OpenCC `.txt`
//! files, completed with derived reverse dictionaries, and saved as CBOR or
//! Zstd-compressed CBOR so applications can load them in one call.

use serde::{Deserialize, Serialize};
use serde_cbor::{from_reader, from_slice};
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::{fs, io};
use zstd::{Decoder, Encoder};

use crate::debug_note;
use crate::dictionary_lib::{DictGroup, DictSource};

// Define a global mutable variable to store the error message
static LAST_ERROR: Mutex<Option<String>> = Mutex::new(None);

/// Reverse dictionaries OpenCC does not ship, and the forward dictionaries
/// they are derived from (entries swapped, sources concatenated in order).
pub const REVERSE_DICT_MAPPINGS: [(&str, &[&str]); 4] = [
    ("HKVariantsRev", &["HKVariants"]),
    ("TWVariantsRev", &["TWVariants"]),
    ("JPVariantsRev", &["JPVariants"]),
    ("TWPhrasesRev", &["TWPhrasesIT", "TWPhrasesName", "TWPhrasesOther"]),
];

/// A collection of named dictionaries.
///
/// Names are kept in sorted order so serialized stores are byte-stable.
///
/// # Example
/// ```
/// use opencc_trie::dictionary_lib::{DictSource, DictionaryStore};
///
/// let mut store = DictionaryStore::new();
/// store.insert("STCharacters", DictSource::from("汉 漢|语 語"));
///
/// let (group, missing) = store.group(&["STCharacters", "STPhrases"]);
/// assert_eq!(group.len(), 1);
/// assert_eq!(missing, vec!["STPhrases".to_string()]);
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct DictionaryStore {
    #[serde(default)]
    dicts: BTreeMap<String, DictSource>,
}

impl DictionaryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the dictionary stored under `name`, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, dict: DictSource) -> Option<DictSource> {
        self.dicts.insert(name.into(), dict)
    }

    pub fn get(&self, name: &str) -> Option<&DictSource> {
        self.dicts.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.dicts.contains_key(name)
    }

    /// Dictionary names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dicts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dicts.is_empty()
    }

    /// Resolves `names` into one dictionary group, keeping the requested order.
    ///
    /// Returns the group of dictionaries found and the names that are missing.
    /// A missing name is never an error; the caller decides how to report it.
    pub fn group<S: AsRef<str>>(&self, names: &[S]) -> (DictGroup, Vec<String>) {
        let mut group = DictGroup::with_capacity(names.len());
        let mut missing = Vec::new();

        for name in names {
            let name = name.as_ref();
            match self.dicts.get(name) {
                Some(dict) => group.push(dict.clone()),
                None => missing.push(name.to_string()),
            }
        }

        (group, missing)
    }

    /// Loads every `*.txt` file in `base_dir` as an OpenCC official dictionary,
    /// named after the file stem. Files are read in sorted file-name order.
    ///
    /// Files that cannot be read as UTF-8 are skipped with a debug note; only a
    /// failure to list the directory itself is an error.
    pub fn from_dir<P: AsRef<Path>>(base_dir: P) -> Result<Self, DictionaryError> {
        let base_dir = base_dir.as_ref();
        let entries = fs::read_dir(base_dir).map_err(|err| {
            let msg = format!("Failed to read directory {}: {}", base_dir.display(), err);
            Self::set_last_error(&msg);
            DictionaryError::IoError(msg)
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        paths.sort();

        let mut store = Self::new();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            match fs::read_to_string(&path) {
                Ok(content) => {
                    store.insert(name, DictSource::from_opencc_text(&content));
                }
                Err(err) => {
                    debug_note!("skipping unreadable dictionary {}: {}", path.display(), err);
                }
            }
        }

        Ok(store)
    }

    /// Saves every dictionary as `<name>.txt` in `base_dir`, one `key<TAB>value` per line.
    ///
    /// The output is readable again with [`from_dir`](Self::from_dir).
    pub fn to_dicts<P: AsRef<Path>>(&self, base_dir: P) -> Result<(), DictionaryError> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?; // ensure base_dir exists

        for (name, dict) in &self.dicts {
            let path = base_dir.join(format!("{}.txt", name));
            let mut writer = BufWriter::new(File::create(&path)?);
            for (key, value) in dict.entries() {
                writeln!(writer, "{}\t{}", key, value)?;
            }
            writer.flush()?;
        }

        Ok(())
    }

    /// Builds `target` by swapping key and value of every entry of `sources`,
    /// concatenated in the given order. Missing sources are skipped.
    ///
    /// Returns `false` (and leaves the store unchanged) when none of the
    /// sources is present.
    pub fn derive_reverse(&mut self, target: &str, sources: &[&str]) -> bool {
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut found = false;

        for source in sources {
            if let Some(dict) = self.dicts.get(*source) {
                found = true;
                pairs.extend(
                    dict.entries()
                        .into_iter()
                        .map(|(key, value)| (value.to_string(), key.to_string())),
                );
            }
        }

        if found {
            self.insert(target, DictSource::Pairs(pairs));
        }
        found
    }

    /// Derives every dictionary in [`REVERSE_DICT_MAPPINGS`] whose sources are
    /// available. Returns the names that could not be derived.
    pub fn with_standard_reverses(&mut self) -> Vec<String> {
        let mut not_derived = Vec::new();
        for (target, sources) in REVERSE_DICT_MAPPINGS {
            if !self.derive_reverse(target, sources) {
                debug_note!("reverse dictionary {} not derived: no source present", target);
                not_derived.push(target.to_string());
            }
        }
        not_derived
    }

    /// Serializes the store to a CBOR file.
    pub fn serialize_to_cbor<P: AsRef<Path>>(&self, path: P) -> Result<(), DictionaryError> {
        let cbor_data = serde_cbor::to_vec(self).map_err(Self::record)?;
        fs::write(path.as_ref(), cbor_data).map_err(Self::record)
    }

    /// Deserializes the store from a CBOR file.
    pub fn deserialize_from_cbor<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let cbor_data = fs::read(path.as_ref()).map_err(Self::record)?;
        from_slice(&cbor_data).map_err(Self::record)
    }

    /// Saves the store to a Zstd-compressed CBOR file on disk.
    pub fn save_compressed<P: AsRef<Path>>(&self, path: P) -> Result<(), DictionaryError> {
        let file = File::create(path.as_ref()).map_err(Self::record)?;
        let writer = BufWriter::new(file);
        let mut encoder = Encoder::new(writer, 19).map_err(Self::record)?;
        serde_cbor::to_writer(&mut encoder, self).map_err(Self::record)?;
        encoder.finish().map_err(Self::record)?.flush()?;
        Ok(())
    }

    /// Loads a store from a Zstd-compressed CBOR file on disk.
    pub fn load_compressed<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
        let file = File::open(path.as_ref()).map_err(Self::record)?;
        let reader = BufReader::new(file);
        let mut decoder = Decoder::new(reader).map_err(Self::record)?;
        let store: DictionaryStore = from_reader(&mut decoder).map_err(Self::record)?;
        Ok(store)
    }

    /// Records the last error message encountered during store operations.
    pub fn set_last_error(err_msg: &str) {
        if let Ok(mut last_error) = LAST_ERROR.lock() {
            *last_error = Some(err_msg.to_string());
        }
    }

    /// Retrieves the last error message set during loading or saving.
    pub fn get_last_error() -> Option<String> {
        LAST_ERROR.lock().ok().and_then(|last_error| last_error.clone())
    }

    fn record<E: Into<DictionaryError>>(err: E) -> DictionaryError {
        let err = err.into();
        Self::set_last_error(&err.to_string());
        err
    }
}

impl FromIterator<(String, DictSource)> for DictionaryStore {
    fn from_iter<I: IntoIterator<Item = (String, DictSource)>>(iter: I) -> Self {
        Self {
            dicts: iter.into_iter().collect(),
        }
    }
}

/// Represents possible errors that can occur while loading, parsing, or saving dictionaries.
///
/// Conversion itself never fails; this type only appears on the storage side.
///
/// # Variants
/// - `IoError(String)`: An error occurred during file access, reading, or writing.
/// - `ParseError(String)`: An error occurred while decoding or encoding CBOR.
#[derive(Debug)]
pub enum DictionaryError {
    IoError(String),
    ParseError(String),
}

impl std::fmt::Display for DictionaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DictionaryError::IoError(msg) => write!(f, "I/O Error: {}", msg),
            DictionaryError::ParseError(msg) => write!(f, "Parse Error: {}", msg),
        }
    }
}

impl Error for DictionaryError {}

impl From<io::Error> for DictionaryError {
    fn from(err: io::Error) -> Self {
        DictionaryError::IoError(err.to_string())
    }
}

impl From<serde_cbor::Error> for DictionaryError {
    fn from(err: serde_cbor::Error) -> Self {
        DictionaryError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> DictionaryStore {
        let mut store = DictionaryStore::new();
        store.insert("HKVariants", DictSource::from("僞 偽|兌 兑"));
        store.insert("TWPhrasesIT", DictSource::from("軟件 軟體|硬件 硬體"));
        store.insert("TWPhrasesOther", DictSource::from("意大利 義大利"));
        store
    }

    #[test]
    fn test_group_keeps_request_order() {
        let store = sample_store();
        let (group, missing) = store.group(&["TWPhrasesOther", "TWPhrasesName", "TWPhrasesIT"]);
        assert_eq!(
            group,
            vec![DictSource::from("意大利 義大利"), DictSource::from("軟件 軟體|硬件 硬體")]
        );
        assert_eq!(missing, vec!["TWPhrasesName".to_string()]);
    }

    #[test]
    fn test_derive_reverse_concatenates_sources() {
        let mut store = sample_store();
        assert!(store.derive_reverse(
            "TWPhrasesRev",
            &["TWPhrasesIT", "TWPhrasesName", "TWPhrasesOther"]
        ));
        let rev = store.get("TWPhrasesRev").unwrap();
        assert_eq!(
            rev.entries(),
            vec![("軟體", "軟件"), ("硬體", "硬件"), ("義大利", "意大利")]
        );
    }

    #[test]
    fn test_derive_reverse_without_sources_is_noop() {
        let mut store = sample_store();
        assert!(!store.derive_reverse("JPVariantsRev", &["JPVariants"]));
        assert!(!store.contains("JPVariantsRev"));
    }

    #[test]
    fn test_with_standard_reverses_reports_missing() {
        let mut store = sample_store();
        let missing = store.with_standard_reverses();
        assert_eq!(missing, vec!["TWVariantsRev".to_string(), "JPVariantsRev".to_string()]);
        assert_eq!(
            store.get("HKVariantsRev").unwrap().entries(),
            vec![("偽", "僞"), ("兑", "兌")]
        );
        assert!(store.contains("TWPhrasesRev"));
    }

    #[test]
    fn test_names_are_sorted() {
        let store = sample_store();
        let names: Vec<&str> = store.names().collect();
        assert_eq!(names, vec!["HKVariants", "TWPhrasesIT", "TWPhrasesOther"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_from_dir_missing_directory_sets_last_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DictionaryStore::from_dir(dir.path().join("absent"));
        assert!(matches!(result, Err(DictionaryError::IoError(_))));
        assert!(DictionaryStore::get_last_error().is_some());
    }

    #[test]
    fn test_cbor_errors_are_typed_and_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let missing = DictionaryStore::deserialize_from_cbor(dir.path().join("absent.cbor"));
        assert!(matches!(missing, Err(DictionaryError::IoError(_))));

        let garbage = dir.path().join("garbage.cbor");
        fs::write(&garbage, b"\xff\xff not cbor").unwrap();
        let parsed = DictionaryStore::deserialize_from_cbor(&garbage);
        assert!(matches!(parsed, Err(DictionaryError::ParseError(_))));
        assert!(DictionaryStore::get_last_error().is_some());

        let unwritable = sample_store().serialize_to_cbor(dir.path().join("no/such/dir.cbor"));
        assert!(matches!(unwritable, Err(DictionaryError::IoError(_))));
    }

    #[test]
    fn test_display_error() {
        let err = DictionaryError::ParseError("bad".to_string());
        assert_eq!(err.to_string(), "Parse Error: bad");
    }
}
