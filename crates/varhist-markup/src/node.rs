//! Minimal pre-parsed markup tree shared by both parser dialects.
//!
//! Upstream tooling hands this subsystem an already-parsed structural
//! subtree; no XML or I/O happens here. `text` is the node's own content and
//! `tail` is any untagged text that followed the node in the source, which
//! the unrevised dialect relies on heavily.

/// Closed set of structural tags the parsers understand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tag {
    /// A variant-forms section (revised dialect groups units under these).
    Section,
    /// One revised-dialect unit: a form plus its date/grammar/label children.
    Unit,
    /// A variant form.
    Form,
    /// A date code or textual date range.
    Date,
    /// Grammatical annotation.
    Grammar,
    /// A restriction label (regional, irregularity).
    Label,
    /// Section header annotation, inherited by descendant forms.
    Header,
    /// Paragraph boundary.
    Para,
    /// A "Forms" marker restarting the list mid-document.
    FormsStart,
    /// Plain untagged text.
    Text,
}

/// One node of the pre-parsed markup tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub tag: Tag,
    pub text: String,
    /// Untagged text trailing this node in the source.
    pub tail: String,
    /// Structural identifier, when the source assigns one.
    pub id: Option<String>,
    pub children: Vec<Node>,
}

impl Default for Tag {
    fn default() -> Self {
        Tag::Text
    }
}

impl Node {
    pub fn new(tag: Tag, text: &str) -> Self {
        Node {
            tag,
            text: text.to_string(),
            ..Node::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_tail(mut self, tail: &str) -> Self {
        self.tail = tail.to_string();
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: Tag) -> Option<&Node> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All direct children with the given tag.
    pub fn children_tagged(&self, tag: Tag) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |c| c.tag == tag)
    }
}
