// Rename the template's free-text answer field to the live field name

use super::target_form;
use crate::dom::{
    attr, find_first_within, has_attr, is_element, is_input_of_type, set_attr, Document,
};
use markup5ever_rcdom::Handle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRename {
    Renamed { from: String, to: String },
    MissingTextarea,
    MissingSourceInput,
}

/// Give the template textarea named `answer_field` the `name` of the first
/// named `<input type="text">` in `source`. The textarea is looked up inside
/// the target form, or across the whole template when that form is absent.
pub fn rename_answer_field(
    template: Document,
    source: &Document,
    form_class: &str,
    answer_field: &str,
) -> (Document, FieldRename) {
    let is_answer = |h: &Handle| {
        is_element(h, "textarea") && attr(h, "name").as_deref() == Some(answer_field)
    };

    let textarea = match target_form(&template, form_class) {
        Some(form) => find_first_within(&form, is_answer),
        None => template.find_first(is_answer),
    };
    let Some(textarea) = textarea else {
        return (template, FieldRename::MissingTextarea);
    };

    let Some(new_name) = source
        .find_first(|h| is_input_of_type(h, "text") && has_attr(h, "name"))
        .and_then(|input| attr(&input, "name"))
    else {
        return (template, FieldRename::MissingSourceInput);
    };

    set_attr(&textarea, "name", &new_name);
    (
        template,
        FieldRename::Renamed {
            from: answer_field.to_string(),
            to: new_name,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<form class="userSurvey__form">
<textarea name="answers[QUESTION_2_ID]" rows="4" placeholder="Your answer">draft</textarea>
</form>"#;

    fn textarea_html(doc: &Document) -> String {
        let html = doc.to_html().unwrap();
        let start = html.find("<textarea").unwrap();
        let end = html.find("</textarea>").unwrap() + "</textarea>".len();
        html[start..end].to_string()
    }

    #[test]
    fn test_textarea_takes_source_input_name() {
        let source = Document::parse(r#"<form><input type="text" name="answers[Q99]"></form>"#);
        let (doc, outcome) = rename_answer_field(
            Document::parse(TEMPLATE),
            &source,
            "userSurvey__form",
            "answers[QUESTION_2_ID]",
        );

        assert_eq!(
            outcome,
            FieldRename::Renamed {
                from: "answers[QUESTION_2_ID]".to_string(),
                to: "answers[Q99]".to_string()
            }
        );
        assert_eq!(
            textarea_html(&doc),
            r#"<textarea name="answers[Q99]" rows="4" placeholder="Your answer">draft</textarea>"#
        );
    }

    #[test]
    fn test_unnamed_text_inputs_are_skipped() {
        let source = Document::parse(
            r#"<input type="text"><input type="email" name="mail"><input type="text" name="second">"#,
        );
        let (doc, _) = rename_answer_field(
            Document::parse(TEMPLATE),
            &source,
            "userSurvey__form",
            "answers[QUESTION_2_ID]",
        );
        assert!(textarea_html(&doc).contains(r#"name="second""#));
    }

    #[test]
    fn test_missing_pieces_skip() {
        let (_, outcome) = rename_answer_field(
            Document::parse(TEMPLATE),
            &Document::parse("<p>nothing</p>"),
            "userSurvey__form",
            "answers[QUESTION_2_ID]",
        );
        assert_eq!(outcome, FieldRename::MissingSourceInput);

        let (_, outcome) = rename_answer_field(
            Document::parse(r#"<textarea name="other"></textarea>"#),
            &Document::parse(r#"<input type="text" name="x">"#),
            "userSurvey__form",
            "answers[QUESTION_2_ID]",
        );
        assert_eq!(outcome, FieldRename::MissingTextarea);
    }

    #[test]
    fn test_formless_template_searches_whole_document() {
        let (doc, outcome) = rename_answer_field(
            Document::parse(r#"<textarea name="answers[QUESTION_2_ID]"></textarea>"#),
            &Document::parse(r#"<input type="text" name="answers[Q7]">"#),
            "userSurvey__form",
            "answers[QUESTION_2_ID]",
        );
        assert!(matches!(outcome, FieldRename::Renamed { .. }));
        assert!(doc.to_html().unwrap().contains(r#"<textarea name="answers[Q7]">"#));
    }
}
