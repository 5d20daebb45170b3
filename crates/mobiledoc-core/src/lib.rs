//! mobiledoc-core - document tree and Markdown rendering
//!
//! This crate provides the intermediate tree produced by the `mobiledoc`
//! parser and the renderer that turns it into Markdown.
//!
//! # Architecture
//!
//! ```text
//! mobiledoc JSON ──parse──▶ ┌───────────┐
//!                           │ Node tree │ ──render──▶ Markdown
//!  atoms / cards ──────────▶└───────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use mobiledoc_core::{serialize, Node, Options};
//!
//! let mut p = Node::element("p");
//! p.add_child(Node::text("This is"));
//! let mut b = Node::element("b");
//! b.add_child(Node::text("bold"));
//! p.add_child(b);
//!
//! assert_eq!(serialize(&p, &Options::default()).unwrap(), "This is **bold**\n\n");
//! ```

pub mod node;
mod options;
mod serialize;

pub use node::Node;
pub use options::Options;
pub use serialize::{render, serialize};

/// Error type for rendering
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unable to write markdown: {0}")]
    Io(#[from] std::io::Error),
}
