// Textual 【REPLACE: KEY】 substitution over the serialized template

use crate::dom::Document;
use crate::error::MergeError;
use crate::values::PlaceholderValues;
use std::collections::BTreeMap;

/// The literal token a template uses to mark the slot for `key`.
pub fn placeholder_token(key: &str) -> String {
    format!("【REPLACE: {}】", key)
}

/// Serialize the template, replace the token of every key in `keys` that has
/// a value, and re-parse the result.
///
/// Values are inserted verbatim: markup inside a value becomes markup in the
/// document. Keys without a value are skipped and their tokens stay in place.
/// Returns how many tokens were replaced per key.
pub fn substitute_placeholders<'a, I>(
    template: Document,
    keys: I,
    values: &PlaceholderValues,
) -> Result<(Document, BTreeMap<String, usize>), MergeError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut html = template.to_html().map_err(MergeError::Serialize)?;
    let mut counts = BTreeMap::new();

    for key in keys {
        let Some(value) = values.get(key) else {
            continue;
        };
        let token = placeholder_token(key);
        let found = html.matches(token.as_str()).count();
        if found > 0 {
            html = html.replace(token.as_str(), value);
        }
        counts.insert(key.to_string(), found);
    }

    Ok((Document::parse(&html), counts))
}
