//! Converting the human-readable text of a markup tree, and putting it back.
//!
//! [`MarkupConverter`] walks any tree that implements [`MarkupTree`], runs a
//! `convert(text) -> text` function over the text that belongs to the source
//! language, and records every value it replaced in a [`RestoreTable`].
//! Handing that table back to [`MarkupConverter::restore`] undoes the
//! conversion exactly. The table is consumed by the restore, so its lifetime
//! is one convert/restore cycle.
//!
//! Scope rules:
//! - an element with the opt-out class (`ignore-opencc`) is skipped with its subtree;
//! - an element whose `lang` equals `from_lang` is re-tagged `to_lang` and
//!   starts a converting scope; any other non-empty `lang` ends it;
//! - `SCRIPT`, `STYLE`, `TEXTAREA`, `INPUT`, `CODE` and `PRE` are not entered
//!   (their `lang` is still re-tagged);
//! - in scope, text nodes are converted, as are `content` of
//!   `<meta name="description|keywords">` and `alt` of `<img>`.
//!
//! [`Document`] is a small owned tree that implements [`MarkupTree`].

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

/// Identifies a node within one tree.
pub type NodeId = usize;

/// Class that opts an element and its subtree out of conversion.
pub const IGNORE_CLASS: &str = "ignore-opencc";

/// Elements whose content is never converted.
pub static SKIP_TAGS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    ["SCRIPT", "STYLE", "TEXTAREA", "INPUT", "CODE", "PRE"]
        .iter()
        .cloned()
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The tree root, when it is not itself an element.
    Document,
    Element,
    Text,
    /// Comments, processing instructions and anything else without convertible text.
    Other,
}

/// The access a [`MarkupConverter`] needs to a tree.
pub trait MarkupTree {
    fn root(&self) -> NodeId;

    /// Child ids of `node`, in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn kind(&self, node: NodeId) -> NodeKind;

    /// Tag name of an element; compared ignoring ASCII case.
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Value of a text node.
    fn text(&self, node: NodeId) -> Option<&str>;

    fn set_text(&mut self, node: NodeId, text: String);

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: String);

    /// Whether the element's whitespace-separated `class` list contains `class`.
    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }
}

/// A value replaced during conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Original {
    Text(String),
    Attribute { name: &'static str, value: String },
}

/// Values replaced by one [`MarkupConverter::convert`] call, keyed by node.
#[derive(Debug, Default)]
#[must_use = "the table is needed to restore the tree"]
pub struct RestoreTable {
    originals: Vec<(NodeId, Original)>,
    index: FxHashMap<NodeId, usize>,
    retagged: Vec<NodeId>,
}

impl RestoreTable {
    /// Number of text values replaced.
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty() && self.retagged.is_empty()
    }

    /// Elements whose `lang` was re-tagged.
    pub fn retagged(&self) -> &[NodeId] {
        &self.retagged
    }

    /// The original value recorded for `node`, if it was converted.
    pub fn original(&self, node: NodeId) -> Option<&str> {
        let &slot = self.index.get(&node)?;
        match &self.originals[slot].1 {
            Original::Text(text) => Some(text.as_str()),
            Original::Attribute { value, .. } => Some(value.as_str()),
        }
    }

    fn record(&mut self, node: NodeId, original: Original) {
        self.index.insert(node, self.originals.len());
        self.originals.push((node, original));
    }
}

/// Walks a [`MarkupTree`] converting text tagged with one language.
///
/// # Example
/// ```
/// use opencc_trie::markup::{Document, MarkupConverter};
///
/// let mut doc = Document::new();
/// let body = doc.append_element(doc.root(), "body", &[("lang", "zh-CN")]);
/// let text = doc.append_text(body, "汉语");
///
/// let converter = MarkupConverter::new("zh-CN", "zh-TW");
/// let convert = |s: &str| s.replace("汉语", "漢語");
///
/// let table = converter.convert(&mut doc, &convert);
/// assert_eq!(doc.text_of(text), Some("漢語"));
/// assert_eq!(doc.attribute_of(body, "lang"), Some("zh-TW"));
///
/// converter.restore(&mut doc, table);
/// assert_eq!(doc.text_of(text), Some("汉语"));
/// assert_eq!(doc.attribute_of(body, "lang"), Some("zh-CN"));
/// ```
#[derive(Debug, Clone)]
pub struct MarkupConverter {
    from_lang: String,
    to_lang: String,
    ignore_class: String,
}

impl MarkupConverter {
    pub fn new(from_lang: impl Into<String>, to_lang: impl Into<String>) -> Self {
        Self {
            from_lang: from_lang.into(),
            to_lang: to_lang.into(),
            ignore_class: IGNORE_CLASS.to_string(),
        }
    }

    /// Uses `class` instead of [`IGNORE_CLASS`] as the opt-out marker.
    pub fn with_ignore_class(mut self, class: impl Into<String>) -> Self {
        self.ignore_class = class.into();
        self
    }

    /// Converts the tree in place, returning what is needed to undo it.
    ///
    /// The root starts outside any converting scope.
    pub fn convert<T, F>(&self, tree: &mut T, convert: &F) -> RestoreTable
    where
        T: MarkupTree + ?Sized,
        F: Fn(&str) -> String + ?Sized,
    {
        let mut table = RestoreTable::default();
        let root = tree.root();
        self.process(tree, root, false, convert, &mut table);
        table
    }

    /// Puts back every value and `lang` tag recorded in `table`.
    pub fn restore<T>(&self, tree: &mut T, table: RestoreTable)
    where
        T: MarkupTree + ?Sized,
    {
        for node in table.retagged {
            tree.set_attribute(node, "lang", self.from_lang.clone());
        }
        for (node, original) in table.originals {
            match original {
                Original::Text(text) => tree.set_text(node, text),
                Original::Attribute { name, value } => tree.set_attribute(node, name, value),
            }
        }
    }

    fn process<T, F>(
        &self,
        tree: &mut T,
        node: NodeId,
        mut in_scope: bool,
        convert: &F,
        table: &mut RestoreTable,
    ) where
        T: MarkupTree + ?Sized,
        F: Fn(&str) -> String + ?Sized,
    {
        if tree.kind(node) == NodeKind::Element {
            if tree.has_class(node, &self.ignore_class) {
                return;
            }

            match tree.attribute(node, "lang") {
                Some(lang) if lang == self.from_lang => {
                    in_scope = true;
                    tree.set_attribute(node, "lang", self.to_lang.clone());
                    table.retagged.push(node);
                }
                Some(lang) if !lang.is_empty() => in_scope = false,
                _ => {}
            }

            let tag = tree
                .tag_name(node)
                .map(|tag| tag.to_ascii_uppercase())
                .unwrap_or_default();
            if SKIP_TAGS.contains(tag.as_str()) {
                return;
            }

            if in_scope {
                self.convert_attributes(tree, node, &tag, convert, table);
            }
        }

        for child in tree.children(node) {
            match tree.kind(child) {
                NodeKind::Text if in_scope => {
                    let converted = match tree.text(child) {
                        Some(text) if !text.is_empty() => {
                            table.record(child, Original::Text(text.to_string()));
                            convert(text)
                        }
                        _ => continue,
                    };
                    tree.set_text(child, converted);
                }
                NodeKind::Element => self.process(tree, child, in_scope, convert, table),
                _ => {}
            }
        }
    }

    fn convert_attributes<T, F>(
        &self,
        tree: &mut T,
        node: NodeId,
        tag: &str,
        convert: &F,
        table: &mut RestoreTable,
    ) where
        T: MarkupTree + ?Sized,
        F: Fn(&str) -> String + ?Sized,
    {
        let name = match tag {
            "META" => match tree.attribute(node, "name") {
                Some("description") | Some("keywords") => "content",
                _ => return,
            },
            "IMG" => "alt",
            _ => return,
        };

        let converted = match tree.attribute(node, name) {
            Some(value) if !value.is_empty() => {
                table.record(
                    node,
                    Original::Attribute {
                        name,
                        value: value.to_string(),
                    },
                );
                convert(value)
            }
            _ => return,
        };
        tree.set_attribute(node, name, converted);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeData {
    Document,
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    data: NodeData,
    children: Vec<NodeId>,
}

/// An owned in-memory markup tree.
///
/// Nodes live in one arena and are addressed by [`NodeId`]; the root is a
/// document node. Tag names are stored upper-cased, as HTML reports them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            nodes: vec![Node {
                data: NodeData::Document,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        self.push(
            parent,
            NodeData::Element {
                tag: tag.to_ascii_uppercase(),
                attributes: attributes
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, NodeData::Text(text.to_string()))
    }

    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, NodeData::Comment(text.to_string()))
    }

    /// Text of a text or comment node.
    pub fn text_of(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node)?.data {
            NodeData::Text(text) | NodeData::Comment(text) => Some(text),
            _ => None,
        }
    }

    pub fn attribute_of(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.nodes.get(node)?.data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    /// Concatenated text of every text node under `node`, in document order.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        if let NodeData::Text(text) = &n.data {
            out.push_str(text);
        }
        for &child in &n.children {
            self.collect_text(child, out);
        }
    }

    fn push(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            data,
            children: Vec::new(),
        });
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(id);
        }
        id
    }
}

impl MarkupTree for Document {
    fn root(&self) -> NodeId {
        Document::root(self)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.nodes.get(node).map(|n| &n.data) {
            Some(NodeData::Document) => NodeKind::Document,
            Some(NodeData::Element { .. }) => NodeKind::Element,
            Some(NodeData::Text(_)) => NodeKind::Text,
            Some(NodeData::Comment(_)) | None => NodeKind::Other,
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node)?.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    fn set_text(&mut self, node: NodeId, text: String) {
        if let Some(Node {
            data: NodeData::Text(current),
            ..
        }) = self.nodes.get_mut(node)
        {
            *current = text;
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attribute_of(node, name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: String) {
        if let Some(Node {
            data: NodeData::Element { attributes, .. },
            ..
        }) = self.nodes.get_mut(node)
        {
            match attributes.iter_mut().find(|(key, _)| key == name) {
                Some((_, current)) => *current = value,
                None => attributes.push((name.to_string(), value)),
            }
        }
    }
}
