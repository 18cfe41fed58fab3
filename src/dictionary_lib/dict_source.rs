//! Dictionary sources and the permissive parsers that turn them into entries.
//!
//! A dictionary reaches the engine in one of two shapes, modelled by [`DictSource`]:
//!
//! - [`DictSource::Joined`]: one string of `key value` records joined by `|`,
//!   e.g. `"软件 軟體|硬件 硬體"`.
//! - [`DictSource::Pairs`]: an explicit, ordered list of `(key, value)` pairs.
//!
//! The shape is resolved once, in [`DictSource::entries`], before anything is
//! inserted into a [`Trie`](crate::dictionary_lib::Trie); the matching loop never
//! sees it. Malformed records are dropped silently in both shapes.
//!
//! This module also reads the on-disk text formats used to prepare dictionaries
//! offline: OpenCC's official `key<TAB>candidates` files and tab-separated
//! custom dictionaries with `#` comments.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dictionary_lib::DictionaryError;

/// Separates records in a [`DictSource::Joined`] string.
pub const RECORD_DELIMITER: char = '|';
/// Separates key from value inside one joined record.
pub const FIELD_DELIMITER: char = ' ';

/// One dictionary, in either accepted shape.
///
/// With serde the two shapes are distinguished structurally (`untagged`): a JSON
/// string is `Joined`, a JSON array of two-element arrays is `Pairs`.
///
/// # Example
/// ```
/// use opencc_trie::dictionary_lib::DictSource;
///
/// let joined = DictSource::from("测试 測試|成功");
/// assert_eq!(joined.entries(), vec![("测试", "測試")]);
///
/// let pairs: DictSource = vec![("电脑", "電腦"), ("", "空")].into_iter().collect();
/// assert_eq!(pairs.entries(), vec![("电脑", "電腦")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DictSource {
    Joined(String),
    Pairs(Vec<(String, String)>),
}

/// An ordered set of dictionaries merged into one matching stage.
pub type DictGroup = Vec<DictSource>;

impl DictSource {
    /// Returns the well-formed `(key, value)` entries, in source order.
    ///
    /// - `Joined`: records are split on `|`; each record is split on single
    ///   spaces and its first two fields taken as key and value. A record whose
    ///   key or value field is missing or empty is dropped. Fields past the
    ///   second are ignored.
    /// - `Pairs`: a pair with an empty key or an empty value is dropped.
    ///
    /// Duplicates are kept; the trie resolves them last-write-wins.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        match self {
            DictSource::Joined(text) => text
                .split(RECORD_DELIMITER)
                .filter_map(parse_record)
                .collect(),
            DictSource::Pairs(pairs) => pairs
                .iter()
                .filter(|(key, value)| !key.is_empty() && !value.is_empty())
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect(),
        }
    }

    /// Number of well-formed entries (duplicates counted).
    pub fn entry_count(&self) -> usize {
        self.entries().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Parses an OpenCC official dictionary file body.
    ///
    /// Each line is `key<TAB>candidate1 candidate2 ...`; only the first
    /// candidate is kept. Lines without a key or a candidate are dropped.
    ///
    /// ```
    /// use opencc_trie::dictionary_lib::DictSource;
    ///
    /// let dict = DictSource::from_opencc_text("干\t幹 乾 干\n\n了\t\n");
    /// assert_eq!(dict.entries(), vec![("干", "幹")]);
    /// ```
    pub fn from_opencc_text(content: &str) -> Self {
        let pairs = content
            .trim()
            .lines()
            .filter_map(|line| {
                let mut fields = line.split('\t');
                let key = fields.next()?;
                let value = fields.next()?.split(' ').next()?;
                if key.is_empty() || value.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.to_string()))
            })
            .collect();
        DictSource::Pairs(pairs)
    }

    /// Parses a custom dictionary body: one `key<TAB>value` per line, key and
    /// value trimmed, blank lines and lines starting with `#` skipped.
    pub fn from_custom_text(content: &str) -> Self {
        let pairs = content
            .lines()
            .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
            .filter_map(|line| {
                let mut fields = line.split('\t');
                let key = fields.next()?.trim();
                let value = fields.next()?.trim();
                if key.is_empty() || value.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.to_string()))
            })
            .collect();
        DictSource::Pairs(pairs)
    }

    /// Reads a custom dictionary file (see [`from_custom_text`](Self::from_custom_text)).
    ///
    /// Returns `Ok(None)` when the file does not exist or holds no valid entry,
    /// and `Err` only when an existing file cannot be read as UTF-8 text.
    pub fn from_custom_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>, DictionaryError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(DictionaryError::IoError(format!(
                    "Failed to read custom dictionary {}: {}",
                    path.display(),
                    err
                )))
            }
        };

        let dict = Self::from_custom_text(&content);
        Ok(if dict.is_empty() { None } else { Some(dict) })
    }

    /// Returns a dictionary with every entry's key and value swapped.
    pub fn reversed(&self) -> Self {
        DictSource::Pairs(
            self.entries()
                .into_iter()
                .map(|(key, value)| (value.to_string(), key.to_string()))
                .collect(),
        )
    }

    /// Renders the compact joined form `key value|key value`.
    ///
    /// Single-character identity mappings are left out, since they never change
    /// converted text. Entries containing a delimiter character cannot be
    /// represented and are skipped.
    ///
    /// ```
    /// use opencc_trie::dictionary_lib::DictSource;
    ///
    /// let dict: DictSource = vec![("干", "干"), ("干杯", "乾杯"), ("后", "後")]
    ///     .into_iter()
    ///     .collect();
    /// assert_eq!(dict.to_joined(), "干杯 乾杯|后 後");
    /// ```
    pub fn to_joined(&self) -> String {
        let mut joined = String::new();
        for (key, value) in self.entries() {
            if key == value && key.chars().count() == 1 {
                continue;
            }
            if has_delimiter(key) || has_delimiter(value) {
                crate::debug_note!("entry not representable in joined form: {:?} -> {:?}", key, value);
                continue;
            }
            if !joined.is_empty() {
                joined.push(RECORD_DELIMITER);
            }
            joined.push_str(key);
            joined.push(FIELD_DELIMITER);
            joined.push_str(value);
        }
        joined
    }
}

impl From<&str> for DictSource {
    fn from(text: &str) -> Self {
        DictSource::Joined(text.to_string())
    }
}

impl From<String> for DictSource {
    fn from(text: String) -> Self {
        DictSource::Joined(text)
    }
}

impl From<Vec<(String, String)>> for DictSource {
    fn from(pairs: Vec<(String, String)>) -> Self {
        DictSource::Pairs(pairs)
    }
}

impl<K, V> FromIterator<(K, V)> for DictSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DictSource::Pairs(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[inline]
fn parse_record(record: &str) -> Option<(&str, &str)> {
    let mut fields = record.split(FIELD_DELIMITER);
    let key = fields.next()?;
    let value = fields.next()?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

#[inline]
fn has_delimiter(text: &str) -> bool {
    text.contains(|c: char| c == RECORD_DELIMITER || c == FIELD_DELIMITER)
}
