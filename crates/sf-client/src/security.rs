//! Security utilities for SOAP payloads.
//!
//! Every caller-supplied value that ends up inside a SOAP envelope (type names,
//! folder names, member names, credentials, job ids) MUST pass through
//! [`xml::escape`].
//!
//! ```rust
//! use busbar_sf_client::security::xml;
//!
//! // CORRECT
//! let body = format!("<folder>{}</folder>", xml::escape("R&D <Reports>"));
//!
//! // WRONG - NEVER do this with user input
//! // let body = format!("<folder>{}</folder>", folder);
//! ```

/// XML escaping utilities for injection prevention.
pub mod xml {
    /// Escape a string for safe inclusion in XML content.
    ///
    /// This escapes the five predefined XML entities.
    ///
    /// # Example
    ///
    /// ```rust
    /// use busbar_sf_client::security::xml;
    ///
    /// let safe = xml::escape("Hello <World> & 'Friends'");
    /// assert_eq!(safe, "Hello &lt;World&gt; &amp; &apos;Friends&apos;");
    /// ```
    #[must_use]
    pub fn escape(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }

    /// Reverse [`escape`] for text read back out of a SOAP response.
    ///
    /// Unknown entities are left untouched.
    #[must_use]
    pub fn unescape(value: &str) -> String {
        if !value.contains('&') {
            return value.to_string();
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(idx) = rest.find('&') {
            out.push_str(&rest[..idx]);
            let tail = &rest[idx..];
            let entity = [
                ("&amp;", '&'),
                ("&lt;", '<'),
                ("&gt;", '>'),
                ("&quot;", '"'),
                ("&apos;", '\''),
            ]
            .into_iter()
            .find(|(name, _)| tail.starts_with(name));

            match entity {
                Some((name, ch)) => {
                    out.push(ch);
                    rest = &tail[name.len()..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}
