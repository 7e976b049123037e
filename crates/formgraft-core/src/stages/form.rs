// Copy submission wiring (action, name, onsubmit) onto the template form

use super::target_form;
use crate::dom::{attr, is_element, set_attr, Document};

pub const TRANSPLANTED_ATTRIBUTES: [&str; 3] = ["action", "name", "onsubmit"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTransplant {
    /// Both forms found; lists the attributes that were copied.
    Applied(Vec<String>),
    MissingTemplateForm,
    MissingSourceForm,
}

/// Copy each of `action`, `name` and `onsubmit` present on the first form of
/// `source` onto the template form marked with `form_class`. Attributes the
/// source lacks keep the template's value.
pub fn transplant_form_attributes(
    template: Document,
    source: &Document,
    form_class: &str,
) -> (Document, FormTransplant) {
    let Some(target) = target_form(&template, form_class) else {
        return (template, FormTransplant::MissingTemplateForm);
    };
    let Some(origin) = source.find_first(|h| is_element(h, "form")) else {
        return (template, FormTransplant::MissingSourceForm);
    };

    let mut copied = Vec::new();
    for name in TRANSPLANTED_ATTRIBUTES {
        if let Some(value) = attr(&origin, name) {
            set_attr(&target, name, &value);
            copied.push(name.to_string());
        }
    }

    (template, FormTransplant::Applied(copied))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<body>
<form class="userSurvey__form" action="/tpl" name="tpl" onsubmit="return check()"></form>
</body>"#;

    fn template_form(doc: &Document) -> markup5ever_rcdom::Handle {
        target_form(doc, "userSurvey__form").unwrap()
    }

    #[test]
    fn test_only_present_attributes_copied() {
        let source = Document::parse(r#"<form action="/submit"></form>"#);
        let (doc, outcome) =
            transplant_form_attributes(Document::parse(TEMPLATE), &source, "userSurvey__form");

        assert_eq!(outcome, FormTransplant::Applied(vec!["action".to_string()]));
        let form = template_form(&doc);
        assert_eq!(attr(&form, "action").as_deref(), Some("/submit"));
        assert_eq!(attr(&form, "name").as_deref(), Some("tpl"));
        assert_eq!(attr(&form, "onsubmit").as_deref(), Some("return check()"));
    }

    #[test]
    fn test_all_attributes_copied() {
        let source = Document::parse(
            r#"<form action="/a" name="live" onsubmit="return send(this)" method="post"></form>"#,
        );
        let (doc, outcome) =
            transplant_form_attributes(Document::parse(TEMPLATE), &source, "userSurvey__form");

        assert_eq!(
            outcome,
            FormTransplant::Applied(vec![
                "action".to_string(),
                "name".to_string(),
                "onsubmit".to_string()
            ])
        );
        let form = template_form(&doc);
        assert_eq!(attr(&form, "name").as_deref(), Some("live"));
        assert_eq!(attr(&form, "onsubmit").as_deref(), Some("return send(this)"));
        // Only the three wiring attributes travel
        assert_eq!(attr(&form, "method"), None);
    }

    #[test]
    fn test_first_source_form_wins() {
        let source =
            Document::parse(r#"<form action="/first"></form><form action="/second"></form>"#);
        let (doc, _) =
            transplant_form_attributes(Document::parse(TEMPLATE), &source, "userSurvey__form");
        assert_eq!(attr(&template_form(&doc), "action").as_deref(), Some("/first"));
    }

    #[test]
    fn test_missing_forms_are_skipped() {
        let (_, outcome) = transplant_form_attributes(
            Document::parse(TEMPLATE),
            &Document::parse("<p>no form</p>"),
            "userSurvey__form",
        );
        assert_eq!(outcome, FormTransplant::MissingSourceForm);

        let (doc, outcome) = transplant_form_attributes(
            Document::parse("<form action='/x'></form>"),
            &Document::parse("<form action='/y'></form>"),
            "userSurvey__form",
        );
        assert_eq!(outcome, FormTransplant::MissingTemplateForm);
        assert!(doc.to_html().unwrap().contains(r#"action="/x""#));
    }
}
