//! Marker application: turns a flat marker run into nested inline markup.
//!
//! Opens and closes across a run form a well-nested bracket sequence. The
//! builder owns every open node on its stack and attaches a node to its
//! parent when it is closed, so each node always has exactly one owner.
//!
//! The stack is capped at [`MAX_MARKUP_DEPTH`] entries. Rendering and
//! dropping a tree both walk it recursively, so the cap also bounds how deep
//! those walks go.

use mobiledoc_core::node::is_inline;
use mobiledoc_core::Node;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::debug;

use crate::model::{DocumentTable, Marker, MarkerKind};
use crate::renderers::Renderers;
use crate::{MobiledocError, Result};

/// Maximum number of markups that may be open at once within one section
pub const MAX_MARKUP_DEPTH: usize = 256;

/// An entry on the open-markup stack
#[derive(Debug)]
enum Scope {
    /// A recognized markup, owning its node until it is closed
    Element(Node),
    /// An unrecognized markup; closing it consumes a close without a node
    Skipped,
}

/// Builds the inline content of one block node
#[derive(Debug)]
pub(crate) struct InlineBuilder {
    root: Node,
    open: SmallVec<[Scope; 8]>,
}

impl InlineBuilder {
    pub fn new(root: Node) -> Self {
        Self {
            root,
            open: SmallVec::new(),
        }
    }

    /// The node new content is appended to
    fn current(&mut self) -> &mut Node {
        self.open
            .iter_mut()
            .rev()
            .find_map(|scope| match scope {
                Scope::Element(node) => Some(node),
                Scope::Skipped => None,
            })
            .unwrap_or(&mut self.root)
    }

    /// Open a markup node and make it the insertion point
    pub fn open(&mut self, node: Node) -> Result<()> {
        self.push_scope(Scope::Element(node))
    }

    /// Record an open that produces no node
    pub fn skip(&mut self) -> Result<()> {
        self.push_scope(Scope::Skipped)
    }

    fn push_scope(&mut self, scope: Scope) -> Result<()> {
        if self.open.len() >= MAX_MARKUP_DEPTH {
            return Err(MobiledocError::MarkupNestingTooDeep {
                depth: self.open.len() + 1,
                max: MAX_MARKUP_DEPTH,
            });
        }
        self.open.push(scope);
        Ok(())
    }

    /// Append content at the insertion point. Empty text runs and empty
    /// fragments write nothing, so they are dropped.
    pub fn push(&mut self, node: Node) {
        if (node.is_text() || node.is_raw()) && node.value.is_empty() {
            return;
        }
        self.current().add_child(node);
    }

    /// Close the `count` innermost open markups
    pub fn close(&mut self, count: usize) -> Result<()> {
        if count > self.open.len() {
            return Err(MobiledocError::MarkupStackUnderflow {
                requested: count,
                open: self.open.len(),
            });
        }
        for _ in 0..count {
            self.close_one();
        }
        Ok(())
    }

    fn close_one(&mut self) {
        if let Some(Scope::Element(node)) = self.open.pop() {
            self.current().add_child(node);
        }
    }

    /// Attach any markups left open and return the finished node
    pub fn finish(mut self) -> Node {
        while !self.open.is_empty() {
            self.close_one();
        }
        self.root
    }

    /// Apply one marker: open its markups, emit its content, close scopes
    pub fn apply(&mut self, marker: &Marker, table: &DocumentTable, renderers: &Renderers) -> Result<()> {
        for &index in &marker.open_indexes {
            let markup = table.markup(index)?;
            if is_inline(&markup.tag_name) {
                self.open(markup.to_node())?;
            } else {
                debug!(tag = %markup.tag_name, index, "skipping unsupported markup");
                self.skip()?;
            }
        }

        match &marker.kind {
            MarkerKind::Text(text) => self.push(Node::text(text)),
            MarkerKind::Atom(index) => {
                let atom = table.atom(*index)?;
                self.push(renderers.render_atom(atom)?);
            }
        }

        self.close(marker.close_count)
    }
}

/// Decode a marker run and apply it to `target`
pub(crate) fn apply_markers(
    target: Node,
    markers: &[Value],
    context: &str,
    table: &DocumentTable,
    renderers: &Renderers,
) -> Result<Node> {
    let mut builder = InlineBuilder::new(target);
    for (i, raw) in markers.iter().enumerate() {
        let marker = Marker::from_value(raw, &format!("{} marker {}", context, i))?;
        builder.apply(&marker, table, renderers)?;
    }
    Ok(builder.finish())
}
