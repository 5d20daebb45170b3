//! # mobiledoc
//!
//! Convert mobiledoc documents to Markdown.
//!
//! A mobiledoc is a versioned JSON document made of sections, with inline
//! styling expressed as markers that open and close markups by index.
//! Extensible content is carried by atoms (inline) and cards (block), which
//! are rendered by functions registered under their name.
//!
//! ## Design
//!
//! Conversion runs in two steps:
//!
//! - **Parse**: the document is checked for a supported version and turned
//!   into a [`mobiledoc_core::Node`] tree. Atoms and cards are rendered here.
//! - **Render**: the tree is walked depth-first and streamed as Markdown.
//!
//! The first error aborts the whole conversion.
//!
//! ## Example
//!
//! ```rust
//! use mobiledoc::Mobiledoc;
//!
//! let json = r#"{
//!     "version": "0.3.1",
//!     "atoms": [["mention", "Bob", {}]],
//!     "markups": [["b"]],
//!     "sections": [[1, "p", [[0, [0], 1, "Hello"], [1, [], 0, 0]]]]
//! }"#;
//!
//! let mut doc = Mobiledoc::from_json(json)
//!     .unwrap()
//!     .with_atom("mention", |value, _| format!("@{}", value));
//!
//! assert_eq!(doc.render_to_string().unwrap(), "**Hello** @Bob\n\n");
//! ```

mod inline;
pub mod model;
mod parse;
pub mod renderers;
mod service;

pub use inline::MAX_MARKUP_DEPTH;
pub use mobiledoc_core::{Node, Options, RenderError};
pub use model::{Atom, Card, DocumentTable, Marker, MarkerKind, Markup, Table};
pub use parse::{parse_v03, SectionKind};
pub use renderers::{
    image_card, register_atom_renderer, register_card_renderer, AtomRenderer, CardRenderer, Format,
    RendererKind, Renderers, IMAGE_CARD,
};
pub use service::{render_markdown, Mobiledoc, Version};

/// Error type for mobiledoc operations
#[derive(Debug, thiserror::Error)]
pub enum MobiledocError {
    #[error("unable to decode mobiledoc json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid {context}: {reason}")]
    Decode { context: String, reason: String },

    #[error("unknown {table} {index}: only {len} defined")]
    Reference { table: Table, index: usize, len: usize },

    #[error("unable to locate renderer for {kind} {name:?}")]
    MissingRenderer { kind: RendererKind, name: String },

    #[error("not valid mobiledoc: version not found")]
    MissingVersion,

    #[error("not valid mobiledoc: version must be a string")]
    InvalidVersion,

    #[error("unknown version {0}")]
    UnknownVersion(String),

    #[error("invalid mobiledoc: sections missing")]
    SectionsMissing,

    #[error("marker closes {requested} markups but only {open} are open")]
    MarkupStackUnderflow { requested: usize, open: usize },

    #[error("marker opens markup {depth} levels deep but at most {max} are allowed")]
    MarkupNestingTooDeep { depth: usize, max: usize },

    #[error("unsupported render format {0:?}")]
    UnsupportedFormat(String),

    #[error("mobiledoc source already consumed by a failed parse")]
    SourceConsumed,

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl MobiledocError {
    pub(crate) fn decode(context: &str, reason: impl Into<String>) -> Self {
        MobiledocError::Decode {
            context: context.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MobiledocError>;
