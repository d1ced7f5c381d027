use crate::types::Feature;

/// Shown in place of a value the API returned as null.
pub const NULL_PLACEHOLDER: &str = "[null]";

/// Label/value rows for the popup: one row per display attribute, in the
/// feature's (key-ordered) property order.
pub fn rows(feature: &Feature) -> Vec<(String, String)> {
    feature
        .properties
        .iter()
        .map(|(key, value)| {
            let value = value
                .clone()
                .unwrap_or_else(|| NULL_PLACEHOLDER.to_string());
            (key.clone(), value)
        })
        .collect()
}

/// The popup as an HTML table, for copying out of the app. Values are
/// escaped; keys come from the API's own schema and are used as-is.
pub fn table_html(feature: &Feature) -> String {
    let mut html = String::from("<table>");
    for (key, value) in rows(feature) {
        html.push_str("<tr><td>");
        html.push_str(&key);
        html.push_str(":</td><td><strong>");
        html.push_str(&escape(&value));
        html.push_str("</strong></td></tr>");
    }
    html.push_str("</table>");
    html
}

/// Escapes `&`, `<` and `>` for embedding in HTML. `&` first, so entities
/// are not double-escaped.
pub fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
