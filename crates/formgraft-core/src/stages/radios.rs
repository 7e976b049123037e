// Positional radio option reconciliation between the two documents

use super::target_form;
use crate::dom::{
    attr, find_all_within, has_class, is_element, is_input_of_type, replace_children_with_text,
    set_attr, stripped_text, Document,
};
use crate::error::MergeError;
use crate::model::PairingMode;
use markup5ever_rcdom::Handle;

/// Sizes of the four sequences that were zipped, and how many pairs were applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadioOutcome {
    pub source_radios: usize,
    pub source_labels: usize,
    pub template_radios: usize,
    pub template_labels: usize,
    pub paired: usize,
}

impl RadioOutcome {
    /// Options the second document offers (an option needs both input and label).
    pub fn source_options(&self) -> usize {
        self.source_radios.min(self.source_labels)
    }

    pub fn template_slots(&self) -> usize {
        self.template_radios.min(self.template_labels)
    }

    pub fn is_mismatched(&self) -> bool {
        self.source_options() != self.template_slots()
    }
}

/// Pair the Nth radio input and Nth label of `source` with the Nth radio input
/// and Nth `label_class` label of the template form, for every N covered by
/// all four lists. Template entries past the shortest list are left as-is.
///
/// In [`PairingMode::Strict`] a count mismatch aborts before anything changes.
pub fn reconcile_radios(
    template: Document,
    source: &Document,
    form_class: &str,
    label_class: &str,
    mode: PairingMode,
) -> Result<(Document, RadioOutcome), MergeError> {
    let new_inputs = source.find_all(|h| is_input_of_type(h, "radio"));
    let new_labels = source.find_all(|h| is_element(h, "label"));

    let (old_inputs, old_labels): (Vec<Handle>, Vec<Handle>) =
        match target_form(&template, form_class) {
            Some(form) => (
                find_all_within(&form, |h| is_input_of_type(h, "radio")),
                find_all_within(&form, |h| is_element(h, "label") && has_class(h, label_class)),
            ),
            None => (Vec::new(), Vec::new()),
        };

    let mut outcome = RadioOutcome {
        source_radios: new_inputs.len(),
        source_labels: new_labels.len(),
        template_radios: old_inputs.len(),
        template_labels: old_labels.len(),
        paired: 0,
    };

    if mode == PairingMode::Strict && outcome.is_mismatched() {
        return Err(MergeError::RadioCountMismatch {
            source_count: outcome.source_options(),
            template_count: outcome.template_slots(),
        });
    }

    let pairs = new_inputs
        .iter()
        .zip(&new_labels)
        .zip(old_inputs.iter().zip(&old_labels));

    for ((new_input, new_label), (old_input, old_label)) in pairs {
        let id = attr(new_input, "id").unwrap_or_default();
        set_attr(old_input, "id", &id);
        set_attr(old_input, "name", &attr(new_input, "name").unwrap_or_default());
        set_attr(old_input, "value", &attr(new_input, "value").unwrap_or_default());
        set_attr(old_label, "for", &id);
        replace_children_with_text(old_label, &stripped_text(new_label));
        outcome.paired += 1;
    }

    Ok((template, outcome))
}
