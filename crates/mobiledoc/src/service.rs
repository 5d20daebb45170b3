//! Mobiledoc - the main entry point for mobiledoc to Markdown conversion.

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use mobiledoc_core::{Node, Options};
use serde_json::{Map, Value};
use tracing::debug;

use crate::parse::parse_v03;
use crate::renderers::{default_renderers, Renderers};
use crate::{MobiledocError, Result};

/// Supported document format versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    /// `0.3.0`
    V0_3_0,
    /// `0.3.1`
    V0_3_1,
    /// `0.3.2`
    V0_3_2,
}

impl Version {
    /// The version string as it appears in documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Version::V0_3_0 => "0.3.0",
            Version::V0_3_1 => "0.3.1",
            Version::V0_3_2 => "0.3.2",
        }
    }

    /// Read the `version` field of a document
    pub fn from_document(document: &Map<String, Value>) -> Result<Self> {
        let version = document.get("version").ok_or(MobiledocError::MissingVersion)?;
        version.as_str().ok_or(MobiledocError::InvalidVersion)?.parse()
    }
}

impl FromStr for Version {
    type Err = MobiledocError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0.3.0" => Ok(Version::V0_3_0),
            "0.3.1" => Ok(Version::V0_3_1),
            "0.3.2" => Ok(Version::V0_3_2),
            other => Err(MobiledocError::UnknownVersion(other.to_string())),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the document comes from before it is parsed
enum Source {
    Reader(Box<dyn Read + Send>),
    Document(Map<String, Value>),
}

/// A mobiledoc document and the renderers used to convert it.
///
/// The document is parsed on first use and the resulting tree is cached, so
/// rendering the same instance repeatedly never parses twice.
pub struct Mobiledoc {
    source: Option<Source>,
    renderers: Renderers,
    options: Options,
    root: Option<Node>,
}

impl Mobiledoc {
    /// Create a document that will be decoded from `src`
    pub fn new<R: Read + Send + 'static>(src: R) -> Self {
        Self::with_source(Source::Reader(Box::new(src)))
    }

    /// Create a document from an already decoded top-level object
    pub fn from_document(document: Map<String, Value>) -> Self {
        Self::with_source(Source::Document(document))
    }

    /// Create a document from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_document(serde_json::from_str(json)?))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source: Some(source),
            renderers: Renderers::new(),
            options: Options::default(),
            root: None,
        }
    }

    /// Register an atom renderer for this document only
    pub fn with_atom<F>(mut self, name: &str, renderer: F) -> Self
    where
        F: Fn(&str, &Value) -> String + Send + Sync + 'static,
    {
        self.renderers.add_atom(name, renderer);
        self
    }

    /// Register a card renderer for this document only
    pub fn with_card<F>(mut self, name: &str, renderer: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.renderers.add_card(name, renderer);
        self
    }

    /// Add every renderer in `renderers` to this document
    pub fn with_renderers(mut self, renderers: &Renderers) -> Self {
        self.renderers.extend(renderers);
        self
    }

    /// Use custom Markdown options
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Get the current options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Parse the document if needed and return its tree
    pub fn root(&mut self) -> Result<&Node> {
        if self.root.is_none() {
            let document = match self.source.take() {
                Some(Source::Reader(reader)) => serde_json::from_reader(reader)?,
                Some(Source::Document(document)) => document,
                None => return Err(MobiledocError::SourceConsumed),
            };
            self.root = Some(self.parse(&document)?);
        }
        self.root.as_ref().ok_or(MobiledocError::SourceConsumed)
    }

    /// Render the document as Markdown into `w`
    pub fn render<W: Write + ?Sized>(&mut self, w: &mut W) -> Result<()> {
        self.root()?;
        if let Some(root) = &self.root {
            mobiledoc_core::render(root, w, &self.options)?;
        }
        Ok(())
    }

    /// Render the document to a Markdown string
    pub fn render_to_string(&mut self) -> Result<String> {
        let options = self.options.clone();
        Ok(mobiledoc_core::serialize(self.root()?, &options)?)
    }

    /// Session renderers take precedence over the process-wide defaults
    fn parse(&self, document: &Map<String, Value>) -> Result<Node> {
        let version = Version::from_document(document)?;
        debug!(%version, "parsing mobiledoc");

        let mut renderers = default_renderers();
        renderers.extend(&self.renderers);

        match version {
            Version::V0_3_0 | Version::V0_3_1 | Version::V0_3_2 => parse_v03(document, &renderers),
        }
    }
}

impl fmt::Debug for Mobiledoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mobiledoc")
            .field("renderers", &self.renderers)
            .field("options", &self.options)
            .field("parsed", &self.root.is_some())
            .finish()
    }
}

/// Convert a mobiledoc read from `src` to Markdown written to `w`,
/// using only the process-wide renderers
pub fn render_markdown<R: Read, W: Write + ?Sized>(src: R, w: &mut W) -> Result<()> {
    let document: Map<String, Value> = serde_json::from_reader(src)?;
    Mobiledoc::from_document(document).render(w)
}
