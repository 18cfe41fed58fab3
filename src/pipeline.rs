use std::sync::Arc;

use rayon::prelude::*;

use crate::dictionary_lib::{DictGroup, DictSource, Trie};

/// An ordered chain of conversion stages, each a fully built [`Trie`].
///
/// Stage *i*'s output is stage *i+1*'s input, so a pipeline with *N* stages
/// makes exactly *N* left-to-right passes over the text. Stages are built
/// independently (one per [`DictGroup`]) and share no nodes, so a key in one
/// group can never collide with a key in another.
///
/// A pipeline is immutable once built. Cloning is cheap (the stages sit behind
/// an [`Arc`]) and [`convert`](Self::convert) takes `&self`, so one pipeline can
/// serve any number of threads without locks. Each trie is reference counted
/// on its own, so pipelines derived with [`with_group`](Self::with_group) share
/// the stages they have in common.
///
/// # Example
/// ```
/// use opencc_trie::dictionary_lib::DictSource;
/// use opencc_trie::Pipeline;
///
/// let pipeline = Pipeline::build(&[
///     vec![DictSource::from("软 軟|件 體")],
///     vec![DictSource::from("軟體 軟件")],
/// ]);
///
/// // Stage 2 only ever sees stage 1's output.
/// assert_eq!(pipeline.convert("软件"), "軟件");
/// assert_eq!(pipeline.stage_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Arc<[Arc<Trie>]>,
}

impl Pipeline {
    /// A pipeline with no stages: converting returns the input unchanged.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Builds one stage per group, in group order.
    ///
    /// Each group is loaded into a fresh trie, its dictionaries in group order.
    /// Groups are independent, so they are built in parallel; the resulting
    /// stage order always matches `groups`. An empty group yields a stage that
    /// leaves text unchanged.
    pub fn build(groups: &[DictGroup]) -> Self {
        let stages: Vec<Trie> = groups.par_iter().map(Trie::from_group).collect();
        Self::from_stages(stages)
    }

    /// Wraps exactly one dictionary as a one-group, one-stage pipeline.
    ///
    /// ```
    /// use opencc_trie::dictionary_lib::DictSource;
    /// use opencc_trie::Pipeline;
    ///
    /// let pipeline = Pipeline::single(DictSource::from("测试 測試|代码 代碼"));
    /// assert_eq!(pipeline.convert("测试代码"), "測試代碼");
    /// ```
    pub fn single(dict: DictSource) -> Self {
        Self::build(&[vec![dict]])
    }

    /// Assembles a pipeline from already built tries.
    pub fn from_stages(stages: Vec<Trie>) -> Self {
        Self {
            stages: stages.into_iter().map(Arc::new).collect(),
        }
    }

    /// Returns a new pipeline with `group` appended as the last stage.
    ///
    /// Appended groups run after every existing stage and therefore take
    /// priority over them; this is how user overrides are layered on top of
    /// standard mappings.
    pub fn with_group(&self, group: &DictGroup) -> Self {
        let mut stages: Vec<Arc<Trie>> = self.stages.to_vec();
        stages.push(Arc::new(Trie::from_group(group)));
        Self {
            stages: stages.into(),
        }
    }

    #[inline]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    #[inline]
    pub fn stages(&self) -> &[Arc<Trie>] {
        &self.stages
    }

    /// Folds `input` through every stage in order.
    pub fn convert(&self, input: &str) -> String {
        let mut stages = self.stages.iter();
        let Some(first) = stages.next() else {
            return input.to_string();
        };

        let mut text = first.convert(input);
        for stage in stages {
            text = stage.convert(&text);
        }
        text
    }

    /// Converts independent inputs, returning outputs in input order.
    ///
    /// With `is_parallel` the inputs are spread over the rayon thread pool.
    /// Every input is still converted whole; inputs are never split.
    pub fn convert_batch<S>(&self, inputs: &[S], is_parallel: bool) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        if is_parallel {
            inputs
                .par_iter()
                .map(|input| self.convert(input.as_ref()))
                .collect()
        } else {
            inputs
                .iter()
                .map(|input| self.convert(input.as_ref()))
                .collect()
        }
    }

    /// Turns the pipeline into a plain `convert(text) -> text` function.
    ///
    /// The closure owns a handle to the stages and can be cloned and sent to
    /// other threads freely.
    pub fn into_fn(self) -> impl Fn(&str) -> String + Clone + Send + Sync + 'static {
        move |input: &str| self.convert(input)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::from_stages(Vec::new())
    }
}
