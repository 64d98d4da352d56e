//! Parsing and writing HTML for the in-memory document.
use html5ever::{LocalName, Namespace, ParseOpts, QualName, tendril::TendrilSink};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::{SsrElement, SsrNode, SsrText};

const XHTML: &str = "http://www.w3.org/1999/xhtml";

/// Parse `html` as the content of a `<body>`.
///
/// Comments, doctypes and processing instructions are dropped.
pub fn parse_fragment(html: &str) -> Vec<SsrNode> {
    let dom = html5ever::parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        QualName::new(None, Namespace::from(XHTML), LocalName::from("body")),
        vec![],
    )
    .one(html);
    // A parsed fragment lives under a synthetic <html> root.
    let roots = dom.document.children.borrow();
    roots
        .iter()
        .flat_map(|root| {
            root.children
                .borrow()
                .iter()
                .filter_map(convert)
                .collect::<Vec<_>>()
        })
        .collect()
}

fn convert(handle: &Handle) -> Option<SsrNode> {
    match &handle.data {
        NodeData::Text { contents } => {
            let contents = contents.borrow();
            let text: &str = &contents;
            Some(SsrText::new(text).into())
        }
        NodeData::Element { name, attrs, .. } => {
            let element = SsrElement::new(&*name.local);
            {
                let mut data = element.data.get_mut();
                data.attributes = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (String::from(&*attr.name.local), String::from(&*attr.value)))
                    .collect();
            }
            for child in handle.children.borrow().iter().filter_map(convert) {
                element.adopt(child);
            }
            Some(element.into())
        }
        _ => None,
    }
}

// Elements written without a closing tag.
fn tag_is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// Content of these is written as is.
fn tag_is_raw_text(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

pub(crate) fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

pub(crate) fn write_node(node: &SsrNode, raw: bool, out: &mut String) {
    match node {
        SsrNode::Text(text) => {
            let data = text.data.get();
            if raw {
                out.push_str(&data.text);
            } else {
                escape_text(&data.text, out);
            }
        }
        SsrNode::Element(element) => write_element(element, out),
    }
}

pub(crate) fn write_children(element: &SsrElement, out: &mut String) {
    let data = element.data.get();
    let raw = tag_is_raw_text(&data.name);
    for child in data.children.iter() {
        write_node(child, raw, out);
    }
}

fn write_element(element: &SsrElement, out: &mut String) {
    let name = element.data.get().name.clone();
    out.push('<');
    out.push_str(&name);
    for (key, value) in element.data.get().attributes.iter() {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_attribute(value, out);
        out.push('"');
    }
    out.push('>');
    if tag_is_void(&name) {
        return;
    }
    write_children(element, out);
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

#[cfg(test)]
mod test {
    use super::*;

    fn roundtrip(html: &str) -> String {
        let mut out = String::new();
        for node in parse_fragment(html) {
            write_node(&node, false, &mut out);
        }
        out
    }

    #[test]
    fn parses_and_writes() {
        assert_eq!(
            roundtrip(r#"<div id="a"><b>hi</b> there<br></div>"#),
            r#"<div id="a"><b>hi</b> there<br></div>"#
        );
    }

    #[test]
    fn drops_comments() {
        assert_eq!(roundtrip("<p>a<!-- gone -->b</p>"), "<p>ab</p>");
    }

    #[test]
    fn escapes() {
        assert_eq!(
            roundtrip(r#"<p title="say &quot;hi&quot;">1 &lt; 2 &amp;&amp; 3 &gt; 2</p>"#),
            r#"<p title="say &quot;hi&quot;">1 &lt; 2 &amp;&amp; 3 &gt; 2</p>"#
        );
    }

    #[test]
    fn plain_text_fragment() {
        let nodes = parse_fragment("just text");
        assert_eq!(nodes.len(), 1);
        assert!(matches!(&nodes[0], SsrNode::Text(_)));
    }
}
