//! Renderer function types and the output formats they can target.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::MobiledocError;

/// Renders an atom from its value and payload to a Markdown fragment
pub type AtomRenderer = Arc<dyn Fn(&str, &Value) -> String + Send + Sync>;

/// Renders a card from its payload to a Markdown fragment
pub type CardRenderer = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Output format a renderer produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// CommonMark-style Markdown
    #[default]
    Markdown,
}

impl Format {
    /// Name used when registering renderers
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Markdown => "markdown",
        }
    }
}

impl FromStr for Format {
    type Err = MobiledocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" => Ok(Format::Markdown),
            other => Err(MobiledocError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which kind of extension a renderer serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// Inline extension
    Atom,
    /// Block extension
    Card,
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererKind::Atom => f.write_str("atom"),
            RendererKind::Card => f.write_str("card"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("markdown".parse::<Format>().unwrap(), Format::Markdown);
        assert_eq!(Format::Markdown.to_string(), "markdown");
    }

    #[test]
    fn test_unsupported_format() {
        let err = "html".parse::<Format>().unwrap_err();
        assert!(matches!(err, MobiledocError::UnsupportedFormat(ref f) if f == "html"));
    }
}
