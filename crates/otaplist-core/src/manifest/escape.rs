//! XML attribute/text escaping

/// Replace the five XML special characters with their named entities.
///
/// `&` is handled first so entities produced by later replacements are
/// not escaped twice.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
