//! Document-format value types and the per-document side tables.
//!
//! Markups, atoms and cards are stored once per document and referenced by
//! index from sections and markers. Everything here is decoded from
//! `serde_json::Value` so that failures can name the element that was wrong.

use std::fmt;

use indexmap::IndexMap;
use mobiledoc_core::Node;
use serde_json::{Map, Value};

use crate::{MobiledocError, Result};

/// One inline style or link definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup {
    /// Tag as written in the document, e.g. `b` or `a`
    pub tag_name: String,
    /// Attribute pairs in document order
    pub attributes: IndexMap<String, String>,
}

impl Markup {
    /// Decode `[tag]` or `[tag, [key, value, ...]]`
    pub fn from_value(value: &Value, context: &str) -> Result<Self> {
        let parts = as_array(value, context)?;
        let tag = parts
            .first()
            .ok_or_else(|| MobiledocError::decode(context, "markup too short"))?;
        let tag_name = as_str(tag, context)?.to_string();

        let mut attributes = IndexMap::new();
        if let Some(raw) = parts.get(1) {
            let flat = as_array(raw, context)?;
            if flat.len() % 2 != 0 {
                return Err(MobiledocError::decode(context, "markup attributes must be in pairs"));
            }
            for pair in flat.chunks_exact(2) {
                attributes.insert(as_str(&pair[0], context)?.to_string(), as_str(&pair[1], context)?.to_string());
            }
        }

        Ok(Self { tag_name, attributes })
    }

    /// Materialize this markup as an element node
    pub fn to_node(&self) -> Node {
        Node::element_with_attrs(
            &self.tag_name,
            self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )
    }
}

/// One instance of extensible inline content
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Renderer name
    pub name: String,
    /// Display text handed to the renderer
    pub value: String,
    /// Arbitrary renderer data
    pub payload: Value,
}

impl Atom {
    /// Decode `[name, value, payload]`
    pub fn from_value(value: &Value, context: &str) -> Result<Self> {
        let parts = as_array(value, context)?;
        if parts.len() != 3 {
            return Err(MobiledocError::decode(
                context,
                format!("atom must have 3 elements, found {}", parts.len()),
            ));
        }
        Ok(Self {
            name: as_str(&parts[0], context)?.to_string(),
            value: as_str(&parts[1], context)?.to_string(),
            payload: parts[2].clone(),
        })
    }
}

/// One instance of extensible block content
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Renderer name
    pub name: String,
    /// Arbitrary renderer data
    pub payload: Value,
}

impl Card {
    /// Decode `[name, payload]`
    pub fn from_value(value: &Value, context: &str) -> Result<Self> {
        let parts = as_array(value, context)?;
        if parts.len() != 2 {
            return Err(MobiledocError::decode(
                context,
                format!("card must have 2 elements, found {}", parts.len()),
            ));
        }
        Ok(Self {
            name: as_str(&parts[0], context)?.to_string(),
            payload: parts[1].clone(),
        })
    }
}

/// Content carried by a marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerKind {
    /// Literal text (marker type 0)
    Text(String),
    /// Index into the atom table (marker type 1)
    Atom(usize),
}

/// One run inside a section's marker list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Text or atom content
    pub kind: MarkerKind,
    /// Markups to open before the content, outermost first
    pub open_indexes: Vec<usize>,
    /// Number of open markups to close after the content
    pub close_count: usize,
}

impl Marker {
    /// Decode `[type, [open...], closeCount, value]`
    pub fn from_value(value: &Value, context: &str) -> Result<Self> {
        let parts = as_array(value, context)?;
        if parts.len() != 4 {
            return Err(MobiledocError::decode(
                context,
                format!("marker must have 4 elements, found {}", parts.len()),
            ));
        }

        let open_indexes = as_array(&parts[1], context)?
            .iter()
            .map(|v| as_index(v, context))
            .collect::<Result<Vec<_>>>()?;
        let close_count = as_index(&parts[2], context)?;

        let kind = match parts[0].as_u64() {
            Some(0) => MarkerKind::Text(as_str(&parts[3], context)?.to_string()),
            Some(1) => MarkerKind::Atom(as_index(&parts[3], context)?),
            _ => {
                return Err(MobiledocError::decode(
                    context,
                    format!("unknown marker type {}", parts[0]),
                ))
            }
        };

        Ok(Self {
            kind,
            open_indexes,
            close_count,
        })
    }
}

/// Which side table an index points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// The `markups` table
    Markups,
    /// The `atoms` table
    Atoms,
    /// The `cards` table
    Cards,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Markups => f.write_str("markup"),
            Table::Atoms => f.write_str("atom"),
            Table::Cards => f.write_str("card"),
        }
    }
}

/// The markups, atoms and cards of one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentTable {
    /// Markup definitions referenced by marker open indexes
    pub markups: Vec<Markup>,
    /// Atoms referenced by atom markers
    pub atoms: Vec<Atom>,
    /// Cards referenced by card sections
    pub cards: Vec<Card>,
}

impl DocumentTable {
    /// Build the tables from the top-level document object.
    ///
    /// Absent (or null) fields yield empty tables.
    pub fn from_document(document: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            markups: decode_table(document, "markups", Markup::from_value)?,
            atoms: decode_table(document, "atoms", Atom::from_value)?,
            cards: decode_table(document, "cards", Card::from_value)?,
        })
    }

    /// Look up a markup, rejecting any index past the end of the table
    pub fn markup(&self, index: usize) -> Result<&Markup> {
        lookup(&self.markups, Table::Markups, index)
    }

    /// Look up an atom, rejecting any index past the end of the table
    pub fn atom(&self, index: usize) -> Result<&Atom> {
        lookup(&self.atoms, Table::Atoms, index)
    }

    /// Look up a card, rejecting any index past the end of the table
    pub fn card(&self, index: usize) -> Result<&Card> {
        lookup(&self.cards, Table::Cards, index)
    }
}

fn lookup<T>(items: &[T], table: Table, index: usize) -> Result<&T> {
    items.get(index).ok_or(MobiledocError::Reference {
        table,
        index,
        len: items.len(),
    })
}

fn decode_table<T>(
    document: &Map<String, Value>,
    field: &str,
    decode: fn(&Value, &str) -> Result<T>,
) -> Result<Vec<T>> {
    let items = match document.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(raw) => as_array(raw, field)?,
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| decode(item, &format!("{}[{}]", field, i)))
        .collect()
}

pub(crate) fn as_array<'a>(value: &'a Value, context: &str) -> Result<&'a [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| MobiledocError::decode(context, format!("expected array, found {}", value)))
}

pub(crate) fn as_str<'a>(value: &'a Value, context: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| MobiledocError::decode(context, format!("expected string, found {}", value)))
}

pub(crate) fn as_index(value: &Value, context: &str) -> Result<usize> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| MobiledocError::decode(context, format!("expected index, found {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_markup_without_attributes() {
        let markup = Markup::from_value(&json!(["b"]), "markups[0]").unwrap();
        assert_eq!(markup.tag_name, "b");
        assert!(markup.attributes.is_empty());
    }

    #[test]
    fn test_markup_with_attributes() {
        let markup = Markup::from_value(&json!(["a", ["href", "https://example.com", "rel", "nofollow"]]), "m").unwrap();
        assert_eq!(markup.attributes.get("href").map(String::as_str), Some("https://example.com"));

        let node = markup.to_node();
        assert_eq!(node.tag, "a");
        assert_eq!(node.attr("rel"), Some("nofollow"));
    }

    #[test]
    fn test_markup_odd_attributes_rejected() {
        let err = Markup::from_value(&json!(["a", ["href"]]), "markups[2]").unwrap_err();
        assert!(err.to_string().contains("markups[2]"));
        assert!(err.to_string().contains("pairs"));
    }

    #[test]
    fn test_markup_empty_rejected() {
        assert!(Markup::from_value(&json!([]), "m").is_err());
    }

    #[test]
    fn test_atom_requires_three_elements() {
        let atom = Atom::from_value(&json!(["mention", "Bob", {"id": 42}]), "a").unwrap();
        assert_eq!(atom.name, "mention");
        assert_eq!(atom.value, "Bob");
        assert_eq!(atom.payload, json!({"id": 42}));

        assert!(Atom::from_value(&json!(["mention", "Bob"]), "a").is_err());
        assert!(Atom::from_value(&json!(["mention", "Bob", {}, 1]), "a").is_err());
    }

    #[test]
    fn test_card_requires_two_elements() {
        let card = Card::from_value(&json!(["hr", {}]), "c").unwrap();
        assert_eq!(card.name, "hr");

        assert!(Card::from_value(&json!(["hr"]), "c").is_err());
        assert!(Card::from_value(&json!([1, {}]), "c").is_err());
    }

    #[test]
    fn test_marker_kinds() {
        let text = Marker::from_value(&json!([0, [0, 1], 2, "hi"]), "m").unwrap();
        assert_eq!(text.kind, MarkerKind::Text("hi".to_string()));
        assert_eq!(text.open_indexes, vec![0, 1]);
        assert_eq!(text.close_count, 2);

        let atom = Marker::from_value(&json!([1, [], 0, 3]), "m").unwrap();
        assert_eq!(atom.kind, MarkerKind::Atom(3));
    }

    #[test]
    fn test_marker_errors() {
        assert!(Marker::from_value(&json!([2, [], 0, "x"]), "m").is_err());
        assert!(Marker::from_value(&json!([0, [], 0]), "m").is_err());
        assert!(Marker::from_value(&json!([0, [-1], 0, "x"]), "m").is_err());
        assert!(Marker::from_value(&json!([1, [], 0, "x"]), "m").is_err());
    }

    #[test]
    fn test_document_table_absent_fields_are_empty() {
        let doc = json!({"markups": null, "sections": []});
        let table = DocumentTable::from_document(doc.as_object().unwrap()).unwrap();
        assert_eq!(table, DocumentTable::default());
    }

    #[test]
    fn test_document_table_names_failing_table() {
        let doc = json!({"markups": [["b"]], "cards": [["image-card"]]});
        let err = DocumentTable::from_document(doc.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("cards[0]"));
    }

    #[test]
    fn test_lookup_rejects_boundary_index() {
        let doc = json!({"markups": [["b"], ["i"]]});
        let table = DocumentTable::from_document(doc.as_object().unwrap()).unwrap();
        assert_eq!(table.markup(1).unwrap().tag_name, "i");

        let err = table.markup(2).unwrap_err();
        assert!(matches!(
            err,
            MobiledocError::Reference {
                table: Table::Markups,
                index: 2,
                len: 2
            }
        ));
        assert!(table.atom(0).is_err());
        assert!(table.card(0).is_err());
    }
}
