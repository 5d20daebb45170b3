//! Process-wide default renderers.
//!
//! Registration takes the write lock; a conversion takes one snapshot under
//! the read lock and never touches the shared registry again.

use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::debug;

use super::{Format, Renderers};
use crate::Result;

/// Name of the built-in image card
pub const IMAGE_CARD: &str = "image-card";

static DEFAULTS: Lazy<RwLock<Renderers>> = Lazy::new(|| {
    let mut renderers = Renderers::new();
    renderers.add_card(IMAGE_CARD, image_card);
    RwLock::new(renderers)
});

/// Register a process-wide atom renderer for the given output format
pub fn register_atom_renderer<F>(name: &str, format: &str, renderer: F) -> Result<()>
where
    F: Fn(&str, &Value) -> String + Send + Sync + 'static,
{
    let format: Format = format.parse()?;
    debug!(renderer = name, %format, "registering default atom renderer");
    DEFAULTS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .add_atom(name, renderer);
    Ok(())
}

/// Register a process-wide card renderer for the given output format
pub fn register_card_renderer<F>(name: &str, format: &str, renderer: F) -> Result<()>
where
    F: Fn(&Value) -> String + Send + Sync + 'static,
{
    let format: Format = format.parse()?;
    debug!(renderer = name, %format, "registering default card renderer");
    DEFAULTS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .add_card(name, renderer);
    Ok(())
}

/// Snapshot of the process-wide renderers
pub(crate) fn default_renderers() -> Renderers {
    DEFAULTS.read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Render `{"src": ...}` as a Markdown image
pub fn image_card(payload: &Value) -> String {
    match payload.get("src").and_then(Value::as_str) {
        Some(src) => format!("![]({})", src),
        None => String::new(),
    }
}
