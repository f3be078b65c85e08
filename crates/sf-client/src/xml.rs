//! Lightweight element extraction for SOAP responses.
//!
//! Salesforce SOAP responses are flat and predictable, so these helpers scan
//! for tags instead of building a DOM. Element text is returned unescaped.

use crate::security::xml::unescape;

/// Namespace prefixes Salesforce uses on response elements.
const PREFIXES: [&str; 4] = ["", "sf:", "met:", "tns:"];

/// Extract the text of the first `<tag>` element.
pub fn extract_element(xml: &str, tag: &str) -> Option<String> {
    for prefix in PREFIXES {
        let start_tag = format!("<{prefix}{tag}>");
        let end_tag = format!("</{prefix}{tag}>");
        if let Some(start_idx) = xml.find(&start_tag) {
            let content_start = start_idx + start_tag.len();
            let remaining = &xml[content_start..];
            if let Some(end_idx) = remaining.find(&end_tag) {
                return Some(unescape(&remaining[..end_idx]));
            }
        }
    }
    None
}

/// Extract the text of every `<tag>` element, in document order.
pub fn extract_elements(xml: &str, tag: &str) -> Vec<String> {
    blocks(xml, tag)
        .into_iter()
        .map(|block| {
            let inner = &block[tag.len() + 2..block.len() - tag.len() - 3];
            unescape(inner)
        })
        .collect()
}

/// Return every `<tag>...</tag>` block (tags included), in document order.
pub fn blocks<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let start_tag = format!("<{tag}>");
    let end_tag = format!("</{tag}>");
    let mut results = Vec::new();
    let mut search_from = xml;

    while let Some(start) = search_from.find(&start_tag) {
        let remaining = &search_from[start..];
        match remaining.find(&end_tag) {
            Some(end) => {
                let stop = end + end_tag.len();
                results.push(&remaining[..stop]);
                search_from = &remaining[stop..];
            }
            None => break,
        }
    }
    results
}

/// Remove every `<tag>...</tag>` block so nested fields don't shadow
/// top-level ones.
pub fn strip_blocks(xml: &str, tag: &str) -> String {
    let start_tag = format!("<{tag}>");
    let end_tag = format!("</{tag}>");
    let mut out = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(start) = rest.find(&start_tag) {
        match rest[start..].find(&end_tag) {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + end + end_tag.len()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

/// Parse an `xsd:boolean` element, defaulting to false.
pub fn extract_bool(xml: &str, tag: &str) -> bool {
    extract_element(xml, tag).is_some_and(|s| s == "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_element() {
        let xml = "<result><id>09S000000000001</id><done>false</done></result>";
        assert_eq!(extract_element(xml, "id").as_deref(), Some("09S000000000001"));
        assert_eq!(extract_element(xml, "done").as_deref(), Some("false"));
        assert_eq!(extract_element(xml, "missing"), None);
    }

    #[test]
    fn test_extract_element_with_prefix() {
        let xml = "<sf:sessionId>abc</sf:sessionId>";
        assert_eq!(extract_element(xml, "sessionId").as_deref(), Some("abc"));
    }

    #[test]
    fn test_extract_element_unescapes() {
        let xml = "<fullName>R&amp;D/Quarterly</fullName>";
        assert_eq!(extract_element(xml, "fullName").as_deref(), Some("R&D/Quarterly"));
    }

    #[test]
    fn test_extract_elements() {
        let xml = "<childXmlNames>CustomField</childXmlNames><childXmlNames>ListView</childXmlNames>";
        assert_eq!(extract_elements(xml, "childXmlNames"), vec!["CustomField", "ListView"]);
    }

    #[test]
    fn test_blocks_and_strip() {
        let xml = "<r><a><id>1</id></a><id>top</id><a><id>2</id></a></r>";
        let found = blocks(xml, "a");
        assert_eq!(found, vec!["<a><id>1</id></a>", "<a><id>2</id></a>"]);

        let stripped = strip_blocks(xml, "a");
        assert_eq!(stripped, "<r><id>top</id></r>");
        assert_eq!(extract_element(&stripped, "id").as_deref(), Some("top"));
    }

    #[test]
    fn test_extract_bool() {
        assert!(extract_bool("<done>true</done>", "done"));
        assert!(!extract_bool("<done>false</done>", "done"));
        assert!(!extract_bool("<other/>", "done"));
    }
}
