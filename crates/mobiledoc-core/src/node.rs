//! Ordered tree model produced by the mobiledoc parser.
//!
//! Every node owns its children, so a node has exactly one parent and the
//! tree can never contain shared or cyclic references. Nodes are assembled
//! during parsing and only read afterwards.

use indexmap::IndexMap;

/// Tag used for the document root and for card containers
pub const DIV: &str = "div";
/// Tag used for plain text runs
pub const TEXT: &str = "";
/// Tag used for fragments produced by atom and card renderers
pub const RAW: &str = "#raw";

/// Bold markup
pub const BOLD: &str = "b";
/// Strong markup, rendered like bold
pub const STRONG: &str = "strong";
/// Italic markup
pub const ITALIC: &str = "i";
/// Emphasis markup, rendered like italic
pub const EMPHASIS: &str = "em";
/// Link markup; the `href` attribute becomes the link target
pub const ANCHOR: &str = "a";
/// Underline markup (content only)
pub const UNDERLINE: &str = "u";
/// Subscript markup (content only)
pub const SUBSCRIPT: &str = "sub";
/// Superscript markup (content only)
pub const SUPERSCRIPT: &str = "sup";
/// Strikethrough markup (content only)
pub const STRIKETHROUGH: &str = "s";
/// Image section; the `src` attribute becomes the image source
pub const IMAGE: &str = "img";
/// List item; a `position` attribute makes it numbered
pub const LIST_ITEM: &str = "li";
/// Ordered list section
pub const ORDERED_LIST: &str = "ol";
/// Unordered list section
pub const UNORDERED_LIST: &str = "ul";
/// Paragraph section
pub const PARAGRAPH: &str = "p";
/// Quote section
pub const BLOCKQUOTE: &str = "blockquote";

/// Inline markup tags that may be opened by a marker
pub const INLINE_ELEMENTS: &[&str] = &[
    BOLD, ITALIC, STRONG, EMPHASIS, ANCHOR, UNDERLINE, SUBSCRIPT, SUPERSCRIPT, STRIKETHROUGH,
];

/// Tags that manage their own spacing through their end token
pub const BLOCK_ELEMENTS: &[&str] = &[
    LIST_ITEM, ORDERED_LIST, UNORDERED_LIST, "h1", "h2", "h3", "h4", PARAGRAPH, BLOCKQUOTE,
];

/// Check if a tag is an inline markup tag
pub fn is_inline(tag: &str) -> bool {
    INLINE_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

/// Check if a tag is block-level
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

/// A node in the intermediate document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Tag name as written in the document (empty for text runs)
    pub tag: String,

    /// Leaf content; a non-empty value makes the node a leaf
    pub value: String,

    /// Attributes in insertion order
    pub attributes: IndexMap<String, String>,

    children: Vec<Node>,
}

impl Node {
    /// Create a new node with a tag and leaf value
    pub fn new(tag: &str, value: &str) -> Self {
        Self {
            tag: tag.to_string(),
            value: value.to_string(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create an element node with no value
    pub fn element(tag: &str) -> Self {
        Self::new(tag, "")
    }

    /// Create an element node with attributes
    pub fn element_with_attrs<'a, I>(tag: &str, attrs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut node = Self::element(tag);
        for (k, v) in attrs {
            node.set_attr(k, v);
        }
        node
    }

    /// Create a text run
    pub fn text(content: &str) -> Self {
        Self::new(TEXT, content)
    }

    /// Create a raw fragment returned by an extension renderer
    pub fn raw(content: &str) -> Self {
        Self::new(RAW, content)
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> String {
        self.tag.to_ascii_lowercase()
    }

    /// Check if this is a plain text run
    pub fn is_text(&self) -> bool {
        self.tag == TEXT
    }

    /// Check if this is a renderer-supplied fragment
    pub fn is_raw(&self) -> bool {
        self.tag == RAW
    }

    /// A node with a non-empty value is rendered as a leaf, whatever its children
    pub fn is_leaf(&self) -> bool {
        !self.value.is_empty()
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Check if an attribute is set
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Set an attribute, replacing any previous value
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    /// Append a child node; ownership moves into this node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Get the children in document order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        if self.is_leaf() {
            return self.value.clone();
        }
        self.children.iter().map(Node::text_content).collect()
    }
}
