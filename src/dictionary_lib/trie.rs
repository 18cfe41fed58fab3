//! Prefix tree over Unicode scalar values with single-pass longest-match rewriting.
//!
//! This module defines [`Trie`], the matching structure behind every conversion
//! stage. A trie maps keys (sequences of `char`) to replacement strings and
//! rewrites text by scanning it once, left to right, always preferring the
//! **longest** key that matches literally at the current position.
//!
//! ## Example
//! ```
//! use opencc_trie::dictionary_lib::Trie;
//!
//! let mut trie = Trie::new();
//! trie.insert("中", "中");
//! trie.insert("中国", "中國");
//! trie.insert("中国人", "中國人");
//!
//! assert_eq!(trie.convert("中国人民"), "中國人民");
//! ```
//!
//! ## Unicode note
//! Keys and input are walked with [`str::chars`], so a character outside the
//! Basic Multilingual Plane is one edge in the tree and one step of the scan.
//! It is never split into surrogate halves or bytes.

use rustc_hash::FxHashMap;

use crate::debug_note;
use crate::dictionary_lib::{DictGroup, DictSource};

#[derive(Debug, Default, Clone)]
struct TrieNode {
    children: FxHashMap<char, TrieNode>,
    /// Replacement for the key that ends exactly at this node.
    value: Option<Box<str>>,
}

/// A prefix tree mapping `char` sequences to replacement strings.
///
/// `Trie` is filled once (via [`insert`](Self::insert), [`load_dict`](Self::load_dict)
/// or [`load_group`](Self::load_group)) and then only read. [`convert`](Self::convert)
/// takes `&self`, so a built trie can be shared across threads without locking.
///
/// # Key collisions
/// Inserting a key that already exists **overwrites** its value (last-write-wins
/// by insertion order), so later dictionaries in a group override earlier ones.
///
/// # Example
/// ```
/// use opencc_trie::dictionary_lib::Trie;
///
/// let mut trie = Trie::new();
/// assert!(trie.insert("软件", "软体"));
/// assert!(trie.insert("软件", "軟體")); // overwrite
/// assert!(!trie.insert("", "x"));      // empty keys are rejected
///
/// assert_eq!(trie.len(), 1);
/// assert_eq!(trie.get("软件"), Some("軟體"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Trie {
    root: TrieNode,
    len: usize,
    max_key_len: usize,
}

impl Trie {
    /// Creates an empty trie. Converting with it is the identity function.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a trie from one dictionary group, loading each dictionary in order.
    pub fn from_group(group: &DictGroup) -> Self {
        let mut trie = Self::new();
        trie.load_group(group);
        trie
    }

    /// Inserts `key → value`, creating intermediate nodes as needed.
    ///
    /// Returns `false` (and leaves the trie unchanged) when `key` is empty.
    /// Re-inserting an existing key replaces its value and returns `true`.
    ///
    /// # Complexity
    /// `O(m)` where `m` is the number of `char`s in `key`.
    pub fn insert(&mut self, key: &str, value: &str) -> bool {
        if key.is_empty() {
            debug_note!("empty dictionary key rejected (value={:?})", value);
            return false;
        }

        let mut node = &mut self.root;
        let mut depth = 0usize;
        for ch in key.chars() {
            node = node.children.entry(ch).or_default();
            depth += 1;
        }

        if node.value.replace(Box::from(value)).is_none() {
            self.len += 1;
        }
        self.max_key_len = self.max_key_len.max(depth);
        true
    }

    /// Loads every well-formed entry of `dict`, in order.
    ///
    /// Malformed records are skipped by [`DictSource::entries`]; nothing is
    /// reported to the caller. Returns the number of entries inserted.
    pub fn load_dict(&mut self, dict: &DictSource) -> usize {
        let mut inserted = 0usize;
        for (key, value) in dict.entries() {
            if self.insert(key, value) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Loads every dictionary of `group` in group order.
    ///
    /// The group shares one key namespace: a key that appears in a later
    /// dictionary overwrites the value from an earlier one.
    pub fn load_group(&mut self, group: &DictGroup) -> usize {
        group.iter().map(|dict| self.load_dict(dict)).sum()
    }

    /// Returns the replacement stored for exactly `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        let mut node = &self.root;
        for ch in key.chars() {
            node = node.children.get(&ch)?;
        }
        node.value.as_deref()
    }

    /// Returns `true` if `key` is stored with a replacement.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of distinct keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length in `char`s of the longest stored key (`0` when empty).
    #[inline]
    pub fn max_key_len(&self) -> usize {
        self.max_key_len
    }

    /// Rewrites `input` using longest-match substitution.
    ///
    /// The scan runs once, left to right. At each position it walks the tree
    /// along the following characters until no child exists or the input ends,
    /// remembering the **deepest** node on that walk that carries a value.
    ///
    /// - If a value was seen, it is emitted and the scan resumes right after
    ///   the key that produced it, even when the walk looked further into a
    ///   longer path that ended without a value.
    /// - Otherwise the current character is kept as-is and the scan moves one
    ///   character forward. Runs of kept characters are copied as one slice.
    ///
    /// A start position is never revisited. Empty input returns an empty string,
    /// and input containing no key is returned unchanged.
    ///
    /// # Example
    /// ```
    /// use opencc_trie::dictionary_lib::Trie;
    ///
    /// let mut trie = Trie::new();
    /// trie.insert("ab", "X");
    /// trie.insert("abcd", "Y");
    ///
    /// // "abc" walks toward "abcd", dead-ends, and falls back to "ab".
    /// assert_eq!(trie.convert("abcx"), "Xcx");
    /// assert_eq!(trie.convert("abcd!"), "Y!");
    /// ```
    pub fn convert(&self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        // Byte offset where the current run of unmatched text started.
        let mut pending: Option<usize> = None;
        let mut pos = 0usize;

        while pos < input.len() {
            let rest = &input[pos..];

            match self.longest_match(rest) {
                Some((value, matched_bytes)) => {
                    if let Some(start) = pending.take() {
                        output.push_str(&input[start..pos]);
                    }
                    output.push_str(value);
                    pos += matched_bytes;
                }
                None => {
                    if pending.is_none() {
                        pending = Some(pos);
                    }
                    match rest.chars().next() {
                        Some(ch) => pos += ch.len_utf8(),
                        None => break,
                    }
                }
            }
        }

        if let Some(start) = pending {
            output.push_str(&input[start..]);
        }
        output
    }

    /// Walks from the root along `text` and returns the value of the deepest
    /// terminal node seen, with the byte length of the key that reached it.
    #[inline]
    fn longest_match<'a>(&'a self, text: &str) -> Option<(&'a str, usize)> {
        let mut node = &self.root;
        let mut best: Option<(&'a str, usize)> = None;

        for (offset, ch) in text.char_indices() {
            node = match node.children.get(&ch) {
                Some(next) => next,
                None => break,
            };
            if let Some(value) = node.value.as_deref() {
                best = Some((value, offset + ch.len_utf8()));
            }
        }

        best
    }
}
