// The five merge stages, applied in this order by the engine.
//
// Each stage consumes the template document and returns the next version
// together with a small outcome value describing what it changed.

pub mod scripts;
pub mod placeholders;
pub mod form;
pub mod radios;
pub mod fields;

use crate::dom::{has_class, is_element, Document};
use markup5ever_rcdom::Handle;

/// The template form carrying `form_class`.
pub(crate) fn target_form(template: &Document, form_class: &str) -> Option<Handle> {
    template.find_first(|h| is_element(h, "form") && has_class(h, form_class))
}
