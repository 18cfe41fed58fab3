//! # opencc-trie
//!
//! Chinese variant conversion (Simplified, Taiwan, Hong Kong and Japanese
//! Shinjitai forms) by dictionary substitution.
//!
//! Each conversion stage is a [`Trie`](dictionary_lib::Trie) built from one
//! ordered group of dictionaries; text is rewritten in a single left-to-right
//! pass that always takes the longest key matching at the current position.
//! A [`Pipeline`] chains stages so every stage sees the previous one's output.
//!
//! [`OpenCC`] assembles a pipeline for a `from → to` direction out of a
//! [`DictionaryStore`](dictionary_lib::DictionaryStore) and a [`PresetTable`],
//! layering optional custom phrase, user and character-fix stages on top.
//!
//! ## Example
//! ```
//! use opencc_trie::dictionary_lib::{DictSource, DictionaryStore};
//! use opencc_trie::{ConverterOptions, Locale, OpenCC, PresetTable};
//!
//! let mut store = DictionaryStore::new();
//! store.insert("STCharacters", DictSource::from("汉 漢|语 語|软 軟|件 件"));
//! store.insert("STPhrases", DictSource::from("软件 軟件"));
//! store.insert("TWVariants", DictSource::from(""));
//! store.insert("TWPhrasesIT", DictSource::from("軟件 軟體"));
//!
//! let options = ConverterOptions::new(Locale::Cn, Locale::Twp);
//! let opencc = OpenCC::new(&options, &store, PresetTable::standard());
//!
//! assert_eq!(opencc.convert("汉语软件"), "漢語軟體");
//! // TWPhrasesName and TWPhrasesOther are not in the store.
//! assert_eq!(opencc.warnings().len(), 2);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::dictionary_lib::{DictGroup, DictSource, DictionaryStore};
use crate::presets::{CHAR_FIXES_FILE, CUSTOM_PHRASES_FILE};

pub mod dictionary_lib;
pub mod markup;
pub mod pipeline;
pub mod presets;
pub mod utils;

pub use pipeline::Pipeline;
pub use presets::{ConverterOptions, Locale, PresetTable};

/// Something that was left out while building a converter.
///
/// Building never fails; whatever cannot be resolved is omitted from the
/// pipeline and reported here instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// A preset names a dictionary the store does not hold.
    MissingDictionary { name: String },
    /// A custom dictionary file exists but could not be read.
    UnreadableCustomDictionary { path: PathBuf, message: String },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::MissingDictionary { name } => {
                write!(f, "Dictionary {} not found, stage omitted", name)
            }
            BuildWarning::UnreadableCustomDictionary { path, message } => {
                write!(
                    f,
                    "Custom dictionary {} skipped: {}",
                    path.display(),
                    message
                )
            }
        }
    }
}

/// A ready-to-use converter for one `from → to` direction.
#[derive(Debug, Clone)]
pub struct OpenCC {
    pipeline: Pipeline,
    warnings: Vec<BuildWarning>,
    is_parallel: bool,
}

impl OpenCC {
    /// Builds a converter for `options.from → options.to`.
    ///
    /// Stages, in order:
    /// 1. the source locale's variant → standard group,
    /// 2. the target locale's standard → variant group,
    /// 3. the custom phrase list from `custom_dir` (see
    ///    [`ConverterOptions::loads_custom_phrases`]),
    /// 4. `options.custom_dict`,
    /// 5. the character-fix list from `custom_dir`, when `apply_char_fixes` is set.
    ///
    /// Dictionaries missing from `store` are left out of their group and
    /// reported in [`warnings`](Self::warnings); a group left empty is dropped.
    /// Missing custom files are skipped silently.
    pub fn new(options: &ConverterOptions, store: &DictionaryStore, presets: &PresetTable) -> Self {
        let mut groups: Vec<DictGroup> = Vec::new();
        let mut warnings: Vec<BuildWarning> = Vec::new();

        for names in presets.resolve_groups(options.from, options.to) {
            let (group, missing) = store.group(&names);
            for name in missing {
                debug_note!("Dictionary {} not found, stage omitted", name);
                warnings.push(BuildWarning::MissingDictionary { name });
            }
            if !group.is_empty() {
                groups.push(group);
            }
        }

        let custom_dir = options.custom_dir.as_deref();

        if options.loads_custom_phrases() {
            if let Some(phrases) = read_custom(custom_dir, CUSTOM_PHRASES_FILE, &mut warnings) {
                let phrases = if options.reverses_custom_phrases() {
                    phrases.reversed()
                } else {
                    phrases
                };
                groups.push(vec![phrases]);
            }
        }

        if let Some(dict) = &options.custom_dict {
            groups.push(vec![dict.clone()]);
        }

        if options.apply_char_fixes {
            if let Some(fixes) = read_custom(custom_dir, CHAR_FIXES_FILE, &mut warnings) {
                groups.push(vec![fixes]);
            }
        }

        Self {
            pipeline: Pipeline::build(&groups),
            warnings,
            is_parallel: true,
        }
    }

    /// Builds a converter directly from dictionary groups, one stage each.
    pub fn from_groups(groups: &[DictGroup]) -> Self {
        Self::from_pipeline(Pipeline::build(groups))
    }

    pub fn from_pipeline(pipeline: Pipeline) -> Self {
        OpenCC {
            pipeline,
            warnings: Vec::new(),
            is_parallel: true,
        }
    }

    /// Returns a converter with `dict` appended as the final stage, so its
    /// mappings take priority over every existing stage.
    ///
    /// ```
    /// use opencc_trie::dictionary_lib::DictSource;
    /// use opencc_trie::OpenCC;
    ///
    /// let base = OpenCC::from_groups(&[vec![DictSource::from("自定义 自定義")]]);
    /// let custom = base.with_custom_dict(DictSource::from("自定義 自訂"));
    /// assert_eq!(base.convert("自定义"), "自定義");
    /// assert_eq!(custom.convert("自定义"), "自訂");
    /// ```
    pub fn with_custom_dict(&self, dict: DictSource) -> Self {
        OpenCC {
            pipeline: self.pipeline.with_group(&vec![dict]),
            warnings: self.warnings.clone(),
            is_parallel: self.is_parallel,
        }
    }

    pub fn convert(&self, input: &str) -> String {
        self.pipeline.convert(input)
    }

    /// Converts many independent texts, in parallel unless disabled with
    /// [`set_parallel`](Self::set_parallel). Output order matches input order.
    pub fn convert_batch<S>(&self, inputs: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        self.pipeline.convert_batch(inputs, self.is_parallel)
    }

    pub fn set_parallel(&mut self, is_parallel: bool) {
        self.is_parallel = is_parallel;
    }

    pub fn get_parallel(&self) -> bool {
        self.is_parallel
    }

    /// Everything that was omitted while building this converter.
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The converter as a plain `convert(text) -> text` function.
    pub fn into_fn(self) -> impl Fn(&str) -> String + Clone + Send + Sync + 'static {
        self.pipeline.into_fn()
    }
}

/// Reads `file_name` from the custom directory, if there is one.
fn read_custom(
    custom_dir: Option<&Path>,
    file_name: &str,
    warnings: &mut Vec<BuildWarning>,
) -> Option<DictSource> {
    let path = custom_dir?.join(file_name);
    match DictSource::from_custom_file(&path) {
        Ok(dict) => dict,
        Err(err) => {
            debug_note!("{}", err);
            warnings.push(BuildWarning::UnreadableCustomDictionary {
                path,
                message: err.to_string(),
            });
            None
        }
    }
}
