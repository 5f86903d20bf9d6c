//! XML well-formedness check.
//!
//! This is a structural scan, not a parser: it verifies a single root
//! element, balanced and properly nested tags, and quoted attribute values.
//! Comments, CDATA sections, processing instructions and the DOCTYPE are
//! skipped over. Entities and namespaces are not interpreted.

use serde_json::Value;

use crate::foundation::ValidationResult;
use crate::validators::with_text;

/// Where and why a document stopped being well formed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason} at byte {offset}")]
pub struct MalformedXml {
    /// Byte offset of the offending construct.
    pub offset: usize,
    /// What went wrong.
    pub reason: String,
}

/// Summary of a well-formed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOutline<'a> {
    /// Name of the root element.
    pub root: &'a str,
    /// Number of elements, root included.
    pub elements: usize,
}

/// Scans `input` and returns its outline, or the first structural error.
pub fn scan(input: &str) -> Result<XmlOutline<'_>, MalformedXml> {
    Scanner {
        src: input,
        pos: 0,
        open: Vec::new(),
        root: None,
        elements: 0,
    }
    .run()
}

/// Text must be a well-formed XML document.
#[must_use]
pub fn xml(data: &Value) -> ValidationResult {
    with_text(data, |s| match scan(s) {
        Ok(outline) => ValidationResult::pass()
            .with_detail("root", outline.root)
            .with_detail("elements", outline.elements),
        Err(e) => ValidationResult::fail(format!("Malformed XML: {e}"))
            .with_detail("offset", e.offset),
    })
}

// ============================================================================
// SCANNER
// ============================================================================

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    open: Vec<&'a str>,
    root: Option<&'a str>,
    elements: usize,
}

impl<'a> Scanner<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn error(&self, reason: impl Into<String>) -> MalformedXml {
        MalformedXml {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn skip_past(&mut self, terminator: &str, what: &str) -> Result<(), MalformedXml> {
        match self.rest().find(terminator) {
            Some(i) => {
                self.pos += i + terminator.len();
                Ok(())
            }
            None => Err(self.error(format!("unterminated {what}"))),
        }
    }

    fn name(&mut self) -> Result<&'a str, MalformedXml> {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|&(i, c)| {
                let allowed = if i == 0 {
                    c.is_alphabetic() || matches!(c, '_' | ':')
                } else {
                    c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':')
                };
                !allowed
            })
            .map_or(rest.len(), |(i, _)| i);
        if end == 0 {
            return Err(self.error("expected a name"));
        }
        self.pos += end;
        Ok(&rest[..end])
    }

    fn text(&self, text: &str) -> Result<(), MalformedXml> {
        if self.open.is_empty() && !text.trim().is_empty() {
            return Err(self.error("text outside the root element"));
        }
        Ok(())
    }

    fn run(mut self) -> Result<XmlOutline<'a>, MalformedXml> {
        loop {
            let rest = self.rest();
            let Some(lt) = rest.find('<') else {
                self.text(rest)?;
                self.pos = self.src.len();
                break;
            };
            self.text(&rest[..lt])?;
            self.pos += lt;

            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.pos += 4;
                self.skip_past("-->", "comment")?;
            } else if rest.starts_with("<![CDATA[") {
                if self.open.is_empty() {
                    return Err(self.error("CDATA section outside the root element"));
                }
                self.pos += 9;
                self.skip_past("]]>", "CDATA section")?;
            } else if rest.starts_with("<?") {
                self.pos += 2;
                self.skip_past("?>", "processing instruction")?;
            } else if rest.starts_with("<!") {
                self.doctype()?;
            } else if rest.starts_with("</") {
                self.pos += 2;
                self.close_tag()?;
            } else {
                self.pos += 1;
                self.open_tag()?;
            }
        }

        if let Some(name) = self.open.last() {
            return Err(self.error(format!("element <{name}> is never closed")));
        }
        match self.root {
            Some(root) => Ok(XmlOutline {
                root,
                elements: self.elements,
            }),
            None => Err(self.error("document has no root element")),
        }
    }

    fn doctype(&mut self) -> Result<(), MalformedXml> {
        if self.root.is_some() {
            return Err(self.error("declaration after the root element"));
        }
        // Internal subsets may contain '>' inside brackets.
        let mut depth = 0usize;
        for (i, c) in self.rest().char_indices().skip(2) {
            match c {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                '>' if depth == 0 => {
                    self.pos += i + 1;
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(self.error("unterminated declaration"))
    }

    fn close_tag(&mut self) -> Result<(), MalformedXml> {
        let name = self.name()?;
        self.skip_whitespace();
        if !self.rest().starts_with('>') {
            return Err(self.error(format!("closing tag </{name}> is not terminated")));
        }
        self.pos += 1;
        match self.open.pop() {
            Some(open) if open == name => Ok(()),
            Some(open) => Err(self.error(format!(
                "closing tag </{name}> does not match <{open}>"
            ))),
            None => Err(self.error(format!(
                "closing tag </{name}> has no matching opening tag"
            ))),
        }
    }

    fn open_tag(&mut self) -> Result<(), MalformedXml> {
        if self.open.is_empty() && self.root.is_some() {
            return Err(self.error("document has more than one root element"));
        }
        let name = self.name()?;
        self.elements += 1;
        self.root.get_or_insert(name);

        let mut attributes: Vec<&str> = Vec::new();
        loop {
            let before = self.pos;
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok(());
            }
            if rest.starts_with('>') {
                self.pos += 1;
                self.open.push(name);
                return Ok(());
            }
            if rest.is_empty() {
                return Err(self.error(format!("tag <{name}> is not terminated")));
            }
            if self.pos == before {
                return Err(self.error(format!("expected whitespace before attribute in <{name}>")));
            }

            let attr = self.name()?;
            if attributes.contains(&attr) {
                return Err(self.error(format!("duplicate attribute '{attr}' in <{name}>")));
            }
            attributes.push(attr);

            self.skip_whitespace();
            if !self.rest().starts_with('=') {
                return Err(self.error(format!("attribute '{attr}' in <{name}> has no value")));
            }
            self.pos += 1;
            self.skip_whitespace();
            let quote = match self.rest().chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => {
                    return Err(
                        self.error(format!("attribute '{attr}' in <{name}> must be quoted"))
                    );
                }
            };
            self.pos += 1;
            let rest = self.rest();
            match rest.find(quote) {
                Some(i) if rest[..i].contains('<') => {
                    return Err(self.error(format!("'<' in value of attribute '{attr}'")));
                }
                Some(i) => self.pos += i + 1,
                None => {
                    return Err(self.error(format!("unterminated value of attribute '{attr}'")));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn outline_of_a_document() {
        let doc = r#"<?xml version="1.0"?>
<!DOCTYPE note [<!ELEMENT note (to)>]>
<!-- greeting -->
<note id='1' lang="en">
  <to>Tove</to>
  <empty/>
  <![CDATA[ <not a tag> ]]>
</note>
"#;
        let outline = scan(doc).unwrap();
        assert_eq!(outline, XmlOutline { root: "note", elements: 3 });
    }

    #[rstest]
    #[case("<a><b></a></b>", "does not match")]
    #[case("<a></a><b></b>", "more than one root")]
    #[case("<a>", "never closed")]
    #[case("</a>", "no matching opening tag")]
    #[case("", "no root element")]
    #[case("just text", "outside the root")]
    #[case("<a x=1></a>", "must be quoted")]
    #[case("<a x></a>", "has no value")]
    #[case("<a x='1' x='2'></a>", "duplicate attribute")]
    #[case("<a><!-- open </a>", "unterminated comment")]
    #[case("<a", "not terminated")]
    #[case("<1a></1a>", "expected a name")]
    fn malformed_documents(#[case] doc: &str, #[case] reason: &str) {
        let err = scan(doc).unwrap_err();
        assert!(err.reason.contains(reason), "{doc}: {err}");
    }

    #[test]
    fn validator_reports_root_and_offset() {
        let ok = xml(&json!("<root><child/></root>"));
        assert!(ok.is_valid());
        assert_eq!(ok.detail("root"), Some(&json!("root")));
        assert_eq!(ok.detail("elements"), Some(&json!(2)));

        let bad = xml(&json!("<root><child></root>"));
        assert!(!bad.is_valid());
        assert!(bad.message().unwrap().starts_with("Malformed XML:"));
        assert!(bad.detail("offset").is_some());

        assert!(!xml(&json!({"root": {}})).is_valid());
    }
}
