//! Locale codes and the preset tables that map a conversion direction to
//! named dictionary groups.
//!
//! Every conversion goes through OpenCC's internal standard traditional form
//! ([`Locale::T`]): the source locale contributes a "variant → standard" group
//! and the target locale a "standard → variant" group. [`PresetTable`] holds
//! those two immutable maps and is always passed explicitly to whoever
//! resolves a direction; [`PresetTable::standard`] is the table OpenCC ships.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::dictionary_lib::DictSource;

/// Name of the optional mainland ↔ Taiwan phrase list in the custom directory.
pub const CUSTOM_PHRASES_FILE: &str = "CNTWPhrases.txt";
/// Name of the optional character-fix list in the custom directory.
pub const CHAR_FIXES_FILE: &str = "CharFixes.txt";

/// A Chinese orthographic standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Simplified Chinese (Mainland China).
    Cn,
    /// Traditional Chinese (Taiwan).
    Tw,
    /// Traditional Chinese (Taiwan) with phrase conversion.
    Twp,
    /// Traditional Chinese (Hong Kong).
    Hk,
    /// Japanese Shinjitai.
    Jp,
    /// OpenCC standard Traditional Chinese.
    T,
}

impl Locale {
    pub const ALL: [Locale; 6] = [
        Locale::Cn,
        Locale::Tw,
        Locale::Twp,
        Locale::Hk,
        Locale::Jp,
        Locale::T,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Cn => "cn",
            Locale::Tw => "tw",
            Locale::Twp => "twp",
            Locale::Hk => "hk",
            Locale::Jp => "jp",
            Locale::T => "t",
        }
    }

    /// The internal standard form never needs a dictionary of its own.
    #[inline]
    pub fn is_standard(&self) -> bool {
        *self == Locale::T
    }
}

impl TryFrom<&str> for Locale {
    type Error = String;

    /// Parses a locale code, ignoring ASCII case and surrounding whitespace.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cn" => Ok(Locale::Cn),
            "tw" => Ok(Locale::Tw),
            "twp" => Ok(Locale::Twp),
            "hk" => Ok(Locale::Hk),
            "jp" => Ok(Locale::Jp),
            "t" => Ok(Locale::T),
            _ => Err(format!("Unknown locale: {}", value)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static STANDARD_PRESETS: Lazy<PresetTable> = Lazy::new(|| {
    PresetTable::new(
        &[
            (Locale::Cn, &["STCharacters", "STPhrases"]),
            (Locale::Hk, &["HKVariantsRev", "HKVariantsRevPhrases"]),
            (Locale::Tw, &["TWVariantsRev", "TWVariantsRevPhrases"]),
            (
                Locale::Twp,
                &["TWVariantsRev", "TWVariantsRevPhrases", "TWPhrasesRev"],
            ),
            (
                Locale::Jp,
                &["JPVariantsRev", "JPShinjitaiCharacters", "JPShinjitaiPhrases"],
            ),
        ],
        &[
            (Locale::Cn, &["TSCharacters", "TSPhrases"]),
            (Locale::Hk, &["HKVariants"]),
            (Locale::Tw, &["TWVariants"]),
            (
                Locale::Twp,
                &["TWVariants", "TWPhrasesIT", "TWPhrasesName", "TWPhrasesOther"],
            ),
            (Locale::Jp, &["JPVariants"]),
        ],
    )
});

/// Dictionary names for each locale, in both directions.
///
/// # Example
/// ```
/// use opencc_trie::{Locale, PresetTable};
///
/// let presets = PresetTable::standard();
/// assert_eq!(
///     presets.dict_files(Locale::Cn, Locale::Tw),
///     vec!["STCharacters", "STPhrases", "TWVariants"]
/// );
/// assert_eq!(
///     presets.resolve_groups(Locale::Cn, Locale::Tw),
///     vec![vec!["STCharacters", "STPhrases"], vec!["TWVariants"]]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetTable {
    /// Variant → standard dictionaries, keyed by source locale.
    to_standard: BTreeMap<Locale, Vec<String>>,
    /// Standard → variant dictionaries, keyed by target locale.
    from_standard: BTreeMap<Locale, Vec<String>>,
}

impl PresetTable {
    pub fn new(to_standard: &[(Locale, &[&str])], from_standard: &[(Locale, &[&str])]) -> Self {
        fn collect(items: &[(Locale, &[&str])]) -> BTreeMap<Locale, Vec<String>> {
            items
                .iter()
                .map(|(locale, names)| (*locale, names.iter().map(|n| n.to_string()).collect()))
                .collect()
        }

        Self {
            to_standard: collect(to_standard),
            from_standard: collect(from_standard),
        }
    }

    /// The presets OpenCC ships, built once per process.
    pub fn standard() -> &'static PresetTable {
        &STANDARD_PRESETS
    }

    /// Sets the variant → standard dictionaries of `locale`.
    pub fn with_to_standard<S: Into<String>>(
        mut self,
        locale: Locale,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.to_standard
            .insert(locale, names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the standard → variant dictionaries of `locale`.
    pub fn with_from_standard<S: Into<String>>(
        mut self,
        locale: Locale,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.from_standard
            .insert(locale, names.into_iter().map(Into::into).collect());
        self
    }

    /// Dictionaries that bring `locale` text to the standard form.
    pub fn to_standard(&self, locale: Locale) -> &[String] {
        if locale.is_standard() {
            return &[];
        }
        self.to_standard
            .get(&locale)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Dictionaries that bring standard text to `locale`.
    pub fn from_standard(&self, locale: Locale) -> &[String] {
        if locale.is_standard() {
            return &[];
        }
        self.from_standard
            .get(&locale)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every dictionary name needed for `from → to`, source side first.
    pub fn dict_files(&self, from: Locale, to: Locale) -> Vec<String> {
        self.to_standard(from)
            .iter()
            .chain(self.from_standard(to))
            .cloned()
            .collect()
    }

    /// The names for `from → to` as ordered groups: the source side, then the
    /// target side. A side with no dictionaries contributes no group.
    pub fn resolve_groups(&self, from: Locale, to: Locale) -> Vec<Vec<String>> {
        [self.to_standard(from), self.from_standard(to)]
            .into_iter()
            .filter(|names| !names.is_empty())
            .map(<[String]>::to_vec)
            .collect()
    }

    /// Every distinct dictionary name the table refers to, sorted.
    pub fn all_dict_files(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .to_standard
            .values()
            .chain(self.from_standard.values())
            .flatten()
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// How to build an [`OpenCC`](crate::OpenCC) converter for one direction.
///
/// # Example
/// ```
/// use opencc_trie::{ConverterOptions, Locale};
///
/// let options = ConverterOptions::new(Locale::Cn, Locale::Twp)
///     .with_char_fixes(false)
///     .with_custom_dir("data/custom");
///
/// assert!(options.loads_custom_phrases());
/// assert!(!options.apply_char_fixes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOptions {
    pub from: Locale,
    pub to: Locale,
    /// Load [`CUSTOM_PHRASES_FILE`]. `None` loads it when either side is [`Locale::Twp`].
    pub load_custom_phrases: Option<bool>,
    /// Append [`CHAR_FIXES_FILE`] as the last stage. On by default.
    pub apply_char_fixes: bool,
    /// Directory holding the custom dictionary files. `None` disables both.
    pub custom_dir: Option<PathBuf>,
    /// Caller overrides, applied after the standard and custom phrase stages.
    pub custom_dict: Option<DictSource>,
}

impl ConverterOptions {
    pub fn new(from: Locale, to: Locale) -> Self {
        Self {
            from,
            to,
            load_custom_phrases: None,
            apply_char_fixes: true,
            custom_dir: None,
            custom_dict: None,
        }
    }

    pub fn with_custom_phrases(mut self, load: bool) -> Self {
        self.load_custom_phrases = Some(load);
        self
    }

    pub fn with_char_fixes(mut self, apply: bool) -> Self {
        self.apply_char_fixes = apply;
        self
    }

    pub fn with_custom_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.custom_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_custom_dict(mut self, dict: impl Into<DictSource>) -> Self {
        self.custom_dict = Some(dict.into());
        self
    }

    /// Whether the custom phrase list takes part in this direction.
    pub fn loads_custom_phrases(&self) -> bool {
        self.load_custom_phrases
            .unwrap_or(self.from == Locale::Twp || self.to == Locale::Twp)
    }

    /// The custom phrase list maps mainland → Taiwan; `twp → cn` reads it backwards.
    pub fn reverses_custom_phrases(&self) -> bool {
        self.from == Locale::Twp && self.to == Locale::Cn
    }
}
