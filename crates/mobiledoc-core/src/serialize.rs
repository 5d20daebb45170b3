//! Markdown rendering
//!
//! Walks a [`Node`] tree depth-first and streams Markdown to a writer. Each
//! node emits a start token, its content, then an end token. Rendering never
//! looks back at what it already wrote, so the same tree always produces the
//! same bytes.

use std::io::Write;

use crate::node::{is_block, Node};
use crate::options::Options;
use crate::RenderError;

/// Render a node tree as Markdown into `out`
pub fn render<W: Write + ?Sized>(node: &Node, out: &mut W, options: &Options) -> Result<(), RenderError> {
    render_start(node, out, options)?;

    if node.is_leaf() {
        // Text runs are inline content; extension fragments keep their own spacing
        let value = if node.is_text() {
            node.value.trim()
        } else {
            node.value.as_str()
        };
        out.write_all(value.as_bytes())?;
    } else {
        let mut previous: Option<&Node> = None;
        for child in node.children() {
            if let Some(prev) = previous {
                if !is_block(&prev.tag) {
                    out.write_all(b" ")?;
                }
            }
            render(child, out, options)?;
            previous = Some(child);
        }
    }

    render_end(node, out, options)
}

/// Render a node tree to a Markdown string
pub fn serialize(node: &Node, options: &Options) -> Result<String, RenderError> {
    let mut buf = Vec::with_capacity(4096);
    render(node, &mut buf, options)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn render_start<W: Write + ?Sized>(node: &Node, out: &mut W, options: &Options) -> Result<(), RenderError> {
    match node.tag_name().as_str() {
        "b" | "strong" => out.write_all(options.strong_delimiter.as_bytes())?,
        "i" | "em" => write!(out, "{}", options.em_delimiter)?,
        "h1" => out.write_all(b"# ")?,
        "h2" => out.write_all(b"## ")?,
        "h3" => out.write_all(b"### ")?,
        "h4" => out.write_all(b"#### ")?,
        "a" => out.write_all(b"[")?,
        "img" => out.write_all(b"![")?,
        "li" => match node.attr("position") {
            Some(position) => write!(out, "{}. ", position)?,
            None => write!(out, "{} ", options.bullet_list_marker)?,
        },
        "blockquote" => out.write_all(b"> ")?,
        _ => {}
    }
    Ok(())
}

fn render_end<W: Write + ?Sized>(node: &Node, out: &mut W, options: &Options) -> Result<(), RenderError> {
    match node.tag_name().as_str() {
        "b" | "strong" => out.write_all(options.strong_delimiter.as_bytes())?,
        "i" | "em" => write!(out, "{}", options.em_delimiter)?,
        "a" => {
            out.write_all(b"]")?;
            if let Some(href) = node.attr("href") {
                write!(out, "({})", href)?;
            }
        }
        "img" => {
            out.write_all(b"]")?;
            if let Some(src) = node.attr("src") {
                write!(out, "({})", src)?;
            }
        }
        "li" | "ol" | "ul" => out.write_all(b"\n")?,
        "h1" | "h2" | "h3" | "h4" | "p" | "blockquote" => out.write_all(b"\n\n")?,
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_text(tag: &str, text: &str) -> Node {
        let mut node = Node::element(tag);
        node.add_child(Node::text(text));
        node
    }

    fn md(node: &Node) -> String {
        serialize(node, &Options::default()).unwrap()
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(md(&with_text("p", "hello")), "hello\n\n");
    }

    #[test]
    fn test_headings() {
        assert_eq!(md(&with_text("h1", "One")), "# One\n\n");
        assert_eq!(md(&with_text("h2", "Two")), "## Two\n\n");
        assert_eq!(md(&with_text("h3", "Three")), "### Three\n\n");
        assert_eq!(md(&with_text("H4", "Four")), "#### Four\n\n");
        assert_eq!(md(&with_text("h5", "Five")), "Five");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(md(&with_text("blockquote", "Quote")), "> Quote\n\n");
    }

    #[test]
    fn test_strong_and_emphasis() {
        assert_eq!(md(&with_text("b", "bold")), "**bold**");
        assert_eq!(md(&with_text("strong", "bold")), "**bold**");
        assert_eq!(md(&with_text("i", "it")), "_it_");
        assert_eq!(md(&with_text("em", "it")), "_it_");
    }

    #[test]
    fn test_custom_delimiters() {
        let options = Options {
            em_delimiter: '*',
            strong_delimiter: "__".to_string(),
            ..Default::default()
        };
        assert_eq!(serialize(&with_text("em", "it"), &options).unwrap(), "*it*");
        assert_eq!(serialize(&with_text("b", "bold"), &options).unwrap(), "__bold__");
    }

    #[test]
    fn test_link() {
        let mut a = Node::element_with_attrs("a", [("href", "https://example.com")]);
        a.add_child(Node::text("Link"));
        assert_eq!(md(&a), "[Link](https://example.com)");

        assert_eq!(md(&with_text("a", "bare")), "[bare]");
    }

    #[test]
    fn test_image() {
        let img = Node::element_with_attrs("img", [("src", "http://x/y.png")]);
        assert_eq!(md(&img), "![](http://x/y.png)");
        assert_eq!(md(&Node::element("img")), "![]");
    }

    #[test]
    fn test_lists() {
        let mut ol = Node::element("ol");
        for (i, text) in ["One", "Two"].iter().enumerate() {
            let mut li = with_text("li", text);
            li.set_attr("position", &(i + 1).to_string());
            ol.add_child(li);
        }
        assert_eq!(md(&ol), "1. One\n2. Two\n\n");

        let mut ul = Node::element("ul");
        ul.add_child(with_text("li", "One"));
        ul.add_child(with_text("li", "Two"));
        assert_eq!(md(&ul), "* One\n* Two\n\n");
    }

    #[test]
    fn test_inline_children_are_space_separated() {
        let mut p = Node::element("p");
        p.add_child(Node::text("Hello "));
        p.add_child(with_text("b", "World"));
        p.add_child(Node::text("again"));
        assert_eq!(md(&p), "Hello **World** again\n\n");
    }

    #[test]
    fn test_no_separator_after_block_child() {
        let mut root = Node::element("div");
        root.add_child(with_text("p", "one"));
        root.add_child(with_text("h2", "two"));
        root.add_child(with_text("p", "three"));
        assert_eq!(md(&root), "one\n\n## two\n\nthree\n\n");
    }

    #[test]
    fn test_text_is_not_escaped() {
        assert_eq!(md(&with_text("p", "*not* [a](link) _here_")), "*not* [a](link) _here_\n\n");
    }

    #[test]
    fn test_raw_fragment_is_verbatim() {
        let mut div = Node::element("div");
        div.add_child(Node::raw("---\n\n"));
        assert_eq!(md(&div), "---\n\n");
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut p = Node::element("p");
        p.add_child(Node::text("a"));
        p.add_child(with_text("em", "b"));
        assert_eq!(md(&p), md(&p));
    }

    #[test]
    fn test_empty_root() {
        assert_eq!(md(&Node::element("div")), "");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_error_is_returned() {
        let err = render(&with_text("p", "x"), &mut FailingWriter, &Options::default()).unwrap_err();
        assert!(err.to_string().contains("sink closed"));
    }
}
