//! Name-keyed registries of atom and card renderers.

mod defaults;
mod renderer;

pub use defaults::{image_card, register_atom_renderer, register_card_renderer, IMAGE_CARD};
pub use renderer::{AtomRenderer, CardRenderer, Format, RendererKind};

pub(crate) use defaults::default_renderers;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use mobiledoc_core::node::DIV;
use mobiledoc_core::Node;
use serde_json::Value;

use crate::model::{Atom, Card};
use crate::{MobiledocError, Result};

/// Atom and card renderers for one conversion session
#[derive(Clone, Default)]
pub struct Renderers {
    atoms: IndexMap<String, AtomRenderer>,
    cards: IndexMap<String, CardRenderer>,
}

impl Renderers {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an atom renderer, replacing any previous one with the same name
    pub fn add_atom<F>(&mut self, name: &str, renderer: F) -> &mut Self
    where
        F: Fn(&str, &Value) -> String + Send + Sync + 'static,
    {
        self.atoms.insert(name.to_string(), Arc::new(renderer));
        self
    }

    /// Register a card renderer, replacing any previous one with the same name
    pub fn add_card<F>(&mut self, name: &str, renderer: F) -> &mut Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.cards.insert(name.to_string(), Arc::new(renderer));
        self
    }

    /// Get the atom renderer registered under `name`
    pub fn atom(&self, name: &str) -> Option<&AtomRenderer> {
        self.atoms.get(name)
    }

    /// Get the card renderer registered under `name`
    pub fn card(&self, name: &str) -> Option<&CardRenderer> {
        self.cards.get(name)
    }

    /// Copy every renderer of `other` into this registry; `other` wins on conflicts
    pub fn extend(&mut self, other: &Renderers) {
        for (name, renderer) in &other.atoms {
            self.atoms.insert(name.clone(), Arc::clone(renderer));
        }
        for (name, renderer) in &other.cards {
            self.cards.insert(name.clone(), Arc::clone(renderer));
        }
    }

    /// Render an atom as an inline fragment
    pub fn render_atom(&self, atom: &Atom) -> Result<Node> {
        let renderer = self.atom(&atom.name).ok_or_else(|| MobiledocError::MissingRenderer {
            kind: RendererKind::Atom,
            name: atom.name.clone(),
        })?;
        Ok(Node::raw(&renderer(&atom.value, &atom.payload)))
    }

    /// Render a card as a fragment wrapped in a block container
    pub fn render_card(&self, card: &Card) -> Result<Node> {
        let renderer = self.card(&card.name).ok_or_else(|| MobiledocError::MissingRenderer {
            kind: RendererKind::Card,
            name: card.name.clone(),
        })?;
        let mut wrapper = Node::element(DIV);
        wrapper.add_child(Node::raw(&renderer(&card.payload)));
        Ok(wrapper)
    }
}

impl fmt::Debug for Renderers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderers")
            .field("atoms", &self.atoms.keys().collect::<Vec<_>>())
            .field("cards", &self.cards.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hello_atom() -> Atom {
        Atom {
            name: "hello-atom".to_string(),
            value: "Bob".to_string(),
            payload: json!({}),
        }
    }

    #[test]
    fn test_render_atom() {
        let mut renderers = Renderers::new();
        renderers.add_atom("hello-atom", |value, _| format!("Hello {}", value));

        let node = renderers.render_atom(&hello_atom()).unwrap();
        assert!(node.is_raw());
        assert_eq!(node.value, "Hello Bob");
    }

    #[test]
    fn test_missing_atom_renderer() {
        let err = Renderers::new().render_atom(&hello_atom()).unwrap_err();
        assert!(matches!(
            err,
            MobiledocError::MissingRenderer { kind: RendererKind::Atom, ref name } if name == "hello-atom"
        ));
        assert_eq!(err.to_string(), "unable to locate renderer for atom \"hello-atom\"");
    }

    #[test]
    fn test_render_card_is_wrapped() {
        let mut renderers = Renderers::new();
        renderers.add_card("hr", |_| "---\n\n".to_string());
        let card = Card {
            name: "hr".to_string(),
            payload: json!({}),
        };

        let node = renderers.render_card(&card).unwrap();
        assert_eq!(node.tag, "div");
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].value, "---\n\n");
    }

    #[test]
    fn test_missing_card_renderer() {
        let card = Card {
            name: "missing-card".to_string(),
            payload: json!(null),
        };
        let err = Renderers::new().render_card(&card).unwrap_err();
        assert_eq!(err.to_string(), "unable to locate renderer for card \"missing-card\"");
    }

    #[test]
    fn test_extend_overrides() {
        let mut base = Renderers::new();
        base.add_card("hr", |_| "***".to_string());
        let mut session = Renderers::new();
        session.add_card("hr", |_| "---".to_string());

        base.extend(&session);
        let hr = base.card("hr").unwrap();
        assert_eq!(hr(&json!(null)), "---");
    }
}
