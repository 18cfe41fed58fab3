/// Print a developer note to **stderr** in *debug* builds; **no-op** in release.
///
/// This macro accepts the same syntax as [`eprintln!`], but it only emits output
/// when `cfg(debug_assertions)` is enabled (i.e., debug/profile builds). In
/// release builds the branch is compiled out, so library users never see it.
///
/// # Examples
/// ```
/// use opencc_trie::debug_note; // bring the macro into scope
///
/// // Shown during development (debug builds), silent in release:
/// debug_note!("dictionary not found, stage omitted: {}", "TWPhrasesIT");
/// ```
///
/// # Use cases
/// - Empty keys rejected while filling a trie
/// - Dictionaries a preset names but the store cannot supply
/// - Unreadable files skipped while loading a dictionary directory
#[macro_export]
macro_rules! debug_note {
    ($($arg:tt)*) => {
        #[allow(unused)]
        {
            if cfg!(debug_assertions) {
                eprintln!($($arg)*);
            }
        }
    };
}
