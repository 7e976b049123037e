// Copy every <script> of the second document into the template's <head>

use crate::dom::{append_child, deep_clone, is_element, Document};

/// Append a copy of each script element found anywhere in `source` to the end
/// of the template head, in source document order. Returns the count copied.
pub fn migrate_scripts(template: Document, source: &Document) -> (Document, usize) {
    let scripts = source.find_all(|h| is_element(h, "script"));
    let Some(head) = template.head() else {
        return (template, 0);
    };

    for script in &scripts {
        append_child(&head, deep_clone(script));
    }

    (template, scripts.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::attr;

    #[test]
    fn test_scripts_appended_in_source_order() {
        let template = Document::parse(
            r#"<html><head><script src="base.js"></script><meta charset="utf-8"></head><body></body></html>"#,
        );
        let source = Document::parse(
            r#"<html><head><script src="a.js"></script></head>
<body><p>x</p><script>var b = 1 < 2;</script></body></html>"#,
        );

        let (merged, count) = migrate_scripts(template, &source);
        assert_eq!(count, 2);

        let head = merged.head().unwrap();
        let children: Vec<_> = head
            .children
            .borrow()
            .iter()
            .filter(|h| is_element(h, "script"))
            .cloned()
            .collect();
        assert_eq!(children.len(), 3);
        assert_eq!(attr(&children[0], "src").as_deref(), Some("base.js"));
        assert_eq!(attr(&children[1], "src").as_deref(), Some("a.js"));

        let html = merged.to_html().unwrap();
        assert!(html.contains("<script>var b = 1 < 2;</script></head>"));
    }

    #[test]
    fn test_source_is_left_untouched() {
        let template = Document::parse("<head></head>");
        let source = Document::parse("<head><script>x()</script></head>");
        let before = source.to_html().unwrap();

        let _ = migrate_scripts(template, &source);
        assert_eq!(source.to_html().unwrap(), before);
    }

    #[test]
    fn test_no_scripts_is_noop() {
        let template = Document::parse("<head><title>t</title></head>");
        let before = template.to_html().unwrap();
        let (merged, count) = migrate_scripts(template, &Document::parse("<p>none</p>"));
        assert_eq!(count, 0);
        assert_eq!(merged.to_html().unwrap(), before);
    }
}
