// Parsed HTML documents and the tree operations the merge stages share

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{parse_document, Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::RefCell;
use std::rc::Rc;

/// An owned, parsed HTML document.
///
/// Stages take the template `Document` by value and hand back a new one, so
/// only one stage can ever hold the tree it is editing.
pub struct Document {
    dom: RcDom,
}

impl Document {
    /// Parse a full HTML document. Malformed markup is repaired by the parser
    /// (missing `<html>`, `<head>` and `<body>` are synthesized), never rejected.
    pub fn parse(html: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(html);
        Self { dom }
    }

    pub fn root(&self) -> &Handle {
        &self.dom.document
    }

    /// The `<head>` element. Always present for parsed documents.
    pub fn head(&self) -> Option<Handle> {
        self.find_first(|h| is_element(h, "head"))
    }

    /// All elements in document order matching `pred`.
    pub fn find_all<F>(&self, pred: F) -> Vec<Handle>
    where
        F: Fn(&Handle) -> bool,
    {
        find_all_within(self.root(), pred)
    }

    pub fn find_first<F>(&self, pred: F) -> Option<Handle>
    where
        F: Fn(&Handle) -> bool,
    {
        find_first_within(self.root(), pred)
    }

    /// Exact serialization, used between stages where text must round-trip.
    pub fn to_html(&self) -> std::io::Result<String> {
        let mut bytes = Vec::new();
        let handle: SerializableHandle = self.dom.document.clone().into();
        serialize(
            &mut bytes,
            &handle,
            SerializeOpts {
                traversal_scope: TraversalScope::ChildrenOnly(None),
                ..Default::default()
            },
        )?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Indented serialization for the final output file.
    ///
    /// Whitespace-only text between elements is dropped and other text is
    /// trimmed onto its own line. Content of `pre`, `textarea` and raw-text
    /// elements (`script`, `style`, ...) is written verbatim.
    pub fn to_pretty_html(&self) -> String {
        let mut out = String::new();
        for child in self.root().children.borrow().iter() {
            write_pretty(&mut out, child, 0);
        }
        out
    }
}

/// Descendants of `node` (excluding `node`) in document order matching `pred`.
pub fn find_all_within<F>(node: &Handle, pred: F) -> Vec<Handle>
where
    F: Fn(&Handle) -> bool,
{
    fn walk<F: Fn(&Handle) -> bool>(node: &Handle, pred: &F, out: &mut Vec<Handle>) {
        for child in node.children.borrow().iter() {
            if pred(child) {
                out.push(child.clone());
            }
            walk(child, pred, out);
        }
    }

    let mut out = Vec::new();
    walk(node, &pred, &mut out);
    out
}

pub fn find_first_within<F>(node: &Handle, pred: F) -> Option<Handle>
where
    F: Fn(&Handle) -> bool,
{
    fn walk<F: Fn(&Handle) -> bool>(node: &Handle, pred: &F) -> Option<Handle> {
        for child in node.children.borrow().iter() {
            if pred(child) {
                return Some(child.clone());
            }
            if let Some(found) = walk(child, pred) {
                return Some(found);
            }
        }
        None
    }

    walk(node, &pred)
}

pub fn is_element(h: &Handle, tag: &str) -> bool {
    match &h.data {
        NodeData::Element { name, .. } => {
            let local: &str = &name.local;
            local.eq_ignore_ascii_case(tag)
        }
        _ => false,
    }
}

pub fn attr(h: &Handle, name: &str) -> Option<String> {
    match &h.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.prefix.is_none() && &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub fn has_attr(h: &Handle, name: &str) -> bool {
    attr(h, name).is_some()
}

/// Set an attribute, replacing the value in place when it already exists so
/// attribute order is preserved. No-op on non-element nodes.
pub fn set_attr(h: &Handle, name: &str, value: &str) {
    let NodeData::Element { attrs, .. } = &h.data else {
        return;
    };
    let mut attrs = attrs.borrow_mut();
    if let Some(existing) = attrs
        .iter_mut()
        .find(|a| a.name.prefix.is_none() && &*a.name.local == name)
    {
        existing.value = StrTendril::from_slice(value);
        return;
    }
    attrs.push(Attribute {
        name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
        value: StrTendril::from_slice(value),
    });
}

/// Class-list membership, matching one whitespace-separated token exactly.
pub fn has_class(h: &Handle, class: &str) -> bool {
    attr(h, "class")
        .map(|v| v.split_ascii_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// `<input type=...>` check; the type keyword is ASCII case-insensitive.
pub fn is_input_of_type(h: &Handle, input_type: &str) -> bool {
    is_element(h, "input")
        && attr(h, "type")
            .map(|t| t.trim().eq_ignore_ascii_case(input_type))
            .unwrap_or(false)
}

/// Visible text with every text node trimmed and empty ones dropped, then
/// concatenated with no separator.
pub fn stripped_text(h: &Handle) -> String {
    fn walk(node: &Handle, out: &mut String) {
        for child in node.children.borrow().iter() {
            match &child.data {
                NodeData::Text { contents } => out.push_str(contents.borrow().trim()),
                NodeData::Element { .. } => walk(child, out),
                _ => {}
            }
        }
    }

    let mut out = String::new();
    walk(h, &mut out);
    out
}

pub fn append_child(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Drop every child of `h` and put a single text node in their place.
pub fn replace_children_with_text(h: &Handle, text: &str) {
    let old = std::mem::take(&mut *h.children.borrow_mut());
    for child in old {
        child.parent.set(None);
    }
    let text_node = Node::new(NodeData::Text {
        contents: RefCell::new(StrTendril::from_slice(text)),
    });
    append_child(h, text_node);
}

/// Copy a subtree into fresh nodes that share nothing with the original.
pub fn deep_clone(node: &Handle) -> Handle {
    let data = match &node.data {
        NodeData::Document => NodeData::Document,
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => NodeData::Doctype {
            name: name.clone(),
            public_id: public_id.clone(),
            system_id: system_id.clone(),
        },
        NodeData::Text { contents } => NodeData::Text {
            contents: RefCell::new(contents.borrow().clone()),
        },
        NodeData::Comment { contents } => NodeData::Comment {
            contents: contents.clone(),
        },
        NodeData::Element {
            name,
            attrs,
            template_contents,
            mathml_annotation_xml_integration_point,
        } => NodeData::Element {
            name: name.clone(),
            attrs: RefCell::new(attrs.borrow().clone()),
            template_contents: RefCell::new(template_contents.borrow().as_ref().map(deep_clone)),
            mathml_annotation_xml_integration_point: *mathml_annotation_xml_integration_point,
        },
        NodeData::ProcessingInstruction { target, contents } => NodeData::ProcessingInstruction {
            target: target.clone(),
            contents: contents.clone(),
        },
    };

    let copy = Node::new(data);
    for child in node.children.borrow().iter() {
        append_child(&copy, deep_clone(child));
    }
    copy
}

fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "basefont"
            | "bgsound"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

// Documents are parsed with scripting enabled, so <noscript> holds raw text too
fn is_raw_text(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" | "plaintext"
    )
}

fn preserves_whitespace(tag: &str) -> bool {
    matches!(tag, "pre" | "textarea" | "listing")
}

/// The parser drops one newline right after `<pre>`, `<textarea>` and
/// `<listing>`; content that starts with one needs an extra to survive.
fn push_leading_newline(out: &mut String, tag: &str, children: &[Handle]) {
    if !preserves_whitespace(tag) {
        return;
    }
    if let Some(NodeData::Text { contents }) = children.first().map(|c| &c.data) {
        if contents.borrow().starts_with('\n') {
            out.push('\n');
        }
    }
}

fn write_doctype(out: &mut String, name: &str, public_id: &str, system_id: &str) {
    out.push_str("<!DOCTYPE ");
    out.push_str(name);
    if !public_id.is_empty() {
        out.push_str(" PUBLIC \"");
        out.push_str(public_id);
        out.push('"');
        if !system_id.is_empty() {
            out.push_str(" \"");
            out.push_str(system_id);
            out.push('"');
        }
    } else if !system_id.is_empty() {
        out.push_str(" SYSTEM \"");
        out.push_str(system_id);
        out.push('"');
    }
    out.push('>');
}

fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn write_start_tag(out: &mut String, name: &QualName, attrs: &[Attribute]) {
    out.push('<');
    out.push_str(&name.local);
    for a in attrs {
        out.push(' ');
        if let Some(prefix) = &a.name.prefix {
            out.push_str(prefix);
            out.push(':');
        }
        out.push_str(&a.name.local);
        out.push_str("=\"");
        escape_attr(&a.value, out);
        out.push('"');
    }
    out.push('>');
}

fn element_children(node: &Handle, template_contents: &RefCell<Option<Handle>>) -> Vec<Handle> {
    match template_contents.borrow().as_ref() {
        Some(contents) => contents.children.borrow().clone(),
        None => node.children.borrow().clone(),
    }
}

fn write_compact(out: &mut String, node: &Handle, raw_parent: bool) {
    match &node.data {
        NodeData::Text { contents } => {
            if raw_parent {
                out.push_str(&contents.borrow());
            } else {
                escape_text(&contents.borrow(), out);
            }
        }
        NodeData::Comment { contents } => {
            out.push_str("<!--");
            out.push_str(contents);
            out.push_str("-->");
        }
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let tag = name.local.to_string();
            write_start_tag(out, name, &attrs.borrow());
            if is_void(&tag) {
                return;
            }
            let children = element_children(node, template_contents);
            push_leading_newline(out, &tag, &children);
            for child in &children {
                write_compact(out, child, is_raw_text(&tag));
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push('>');
        }
        _ => {}
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push(' ');
    }
}

fn write_pretty(out: &mut String, node: &Handle, depth: usize) {
    match &node.data {
        NodeData::Doctype {
            name,
            public_id,
            system_id,
        } => {
            write_doctype(out, name, public_id, system_id);
            out.push('\n');
        }
        NodeData::Text { contents } => {
            let text = contents.borrow();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return;
            }
            indent(out, depth);
            escape_text(trimmed, out);
            out.push('\n');
        }
        NodeData::Comment { contents } => {
            indent(out, depth);
            out.push_str("<!--");
            out.push_str(contents);
            out.push_str("-->\n");
        }
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let tag = name.local.to_string();
            indent(out, depth);
            write_start_tag(out, name, &attrs.borrow());
            if is_void(&tag) {
                out.push('\n');
                return;
            }

            let children = element_children(node, template_contents);
            let raw = is_raw_text(&tag);
            let single_text = children.len() == 1
                && matches!(children[0].data, NodeData::Text { .. });

            if raw || preserves_whitespace(&tag) || single_text || children.is_empty() {
                push_leading_newline(out, &tag, &children);
                for child in &children {
                    if single_text && !raw && !preserves_whitespace(&tag) {
                        if let NodeData::Text { contents } = &child.data {
                            escape_text(contents.borrow().trim(), out);
                        }
                    } else {
                        write_compact(out, child, raw);
                    }
                }
            } else {
                out.push('\n');
                for child in &children {
                    write_pretty(out, child, depth + 1);
                }
                indent(out, depth);
            }
            out.push_str("</");
            out.push_str(&tag);
            out.push_str(">\n");
        }
        NodeData::Document => {
            for child in node.children.borrow().iter() {
                write_pretty(out, child, depth);
            }
        }
        NodeData::ProcessingInstruction { .. } => {}
    }
}
