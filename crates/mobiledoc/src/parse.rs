//! Parser for mobiledoc 0.3.x documents.

use mobiledoc_core::node::{DIV, IMAGE, LIST_ITEM, ORDERED_LIST};
use mobiledoc_core::Node;
use serde_json::{Map, Value};
use tracing::trace;

use crate::inline::apply_markers;
use crate::model::{as_array, as_index, as_str, DocumentTable};
use crate::renderers::Renderers;
use crate::{MobiledocError, Result};

/// Section kind tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Block of inline markup (kind 1)
    Markup,
    /// Image (kind 2)
    Image,
    /// Ordered or unordered list (kind 3)
    List,
    /// Card (kind 10)
    Card,
    /// Any other tag; skipped
    Unknown(i64),
}

impl From<i64> for SectionKind {
    fn from(value: i64) -> Self {
        match value {
            1 => SectionKind::Markup,
            2 => SectionKind::Image,
            3 => SectionKind::List,
            10 => SectionKind::Card,
            other => SectionKind::Unknown(other),
        }
    }
}

/// Parse a 0.3.x document into a tree rooted at a `div`.
///
/// The first structural error aborts the parse.
pub fn parse_v03(document: &Map<String, Value>, renderers: &Renderers) -> Result<Node> {
    let table = DocumentTable::from_document(document)?;
    let sections = document.get("sections").ok_or(MobiledocError::SectionsMissing)?;
    let sections = as_array(sections, "sections")?;

    let mut root = Node::element(DIV);
    for (i, section) in sections.iter().enumerate() {
        let context = format!("sections[{}]", i);
        if let Some(node) = parse_section(section, &context, &table, renderers)? {
            root.add_child(node);
        }
    }

    trace!(
        sections = sections.len(),
        blocks = root.children().len(),
        "parsed mobiledoc"
    );
    Ok(root)
}

fn parse_section(
    section: &Value,
    context: &str,
    table: &DocumentTable,
    renderers: &Renderers,
) -> Result<Option<Node>> {
    let parts = as_array(section, context)?;
    let kind = parts
        .first()
        .and_then(Value::as_i64)
        .ok_or_else(|| MobiledocError::decode(context, "section kind must be an integer"))?;

    let node = match SectionKind::from(kind) {
        SectionKind::Image => {
            let src = as_str(element(parts, 1, context)?, context)?;
            Node::element_with_attrs(IMAGE, [("src", src)])
        }

        SectionKind::List => {
            let tag = as_str(element(parts, 1, context)?, context)?;
            let ordered = tag.eq_ignore_ascii_case(ORDERED_LIST);
            let items = as_array(element(parts, 2, context)?, context)?;

            let mut list = Node::element(tag);
            for (pos, item) in items.iter().enumerate() {
                let item_context = format!("{} item {}", context, pos);
                let markers = as_array(item, &item_context)?;

                let mut li = Node::element(LIST_ITEM);
                if ordered {
                    li.set_attr("position", &(pos + 1).to_string());
                }
                list.add_child(apply_markers(li, markers, &item_context, table, renderers)?);
            }
            list
        }

        SectionKind::Markup => {
            let tag = as_str(element(parts, 1, context)?, context)?;
            let markers = as_array(element(parts, 2, context)?, context)?;
            apply_markers(Node::element(tag), markers, context, table, renderers)?
        }

        SectionKind::Card => {
            let index = as_index(element(parts, 1, context)?, context)?;
            renderers.render_card(table.card(index)?)?
        }

        SectionKind::Unknown(kind) => {
            trace!(kind, section = context, "skipping unknown section kind");
            return Ok(None);
        }
    };

    Ok(Some(node))
}

fn element<'a>(parts: &'a [Value], index: usize, context: &str) -> Result<&'a Value> {
    parts
        .get(index)
        .ok_or_else(|| MobiledocError::decode(context, format!("section is missing element {}", index)))
}
