//! Markup document: XML with one `<file path="...">` element per file
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <project>
//!   <file path="src/main.rs">
//!     <content><![CDATA[fn main() {}]]></content>
//!   </file>
//! </project>
//! ```
//!
//! Content is scrubbed of characters XML 1.0 cannot carry, then embedded as
//! a CDATA block unless it contains `]]>`, in which case it is escaped text.

use once_cell::sync::Lazy;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

use crate::core::error::{Result, SnapError};
use crate::core::model::Document;
use crate::formats::{DocumentEncoder, DocumentFormat};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const ROOT_ELEMENT: &str = "project";
const CDATA_END: &str = "]]>";

/// Control characters illegal in XML 1.0, plus the C1 band except NEL (U+0085)
static ILLEGAL_XML_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F-\x84\x86-\x9F]")
        .expect("Invalid ILLEGAL_XML_CHARS regex")
});

/// Delete characters that cannot appear in an XML document
pub fn strip_illegal_xml_chars(s: &str) -> String {
    ILLEGAL_XML_CHARS.replace_all(s, "").into_owned()
}

#[derive(Debug, Default)]
pub struct MarkupEncoder {
    body: String,
    files: usize,
}

impl MarkupEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentEncoder for MarkupEncoder {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Markup
    }

    fn add_file(&mut self, path: &str, content: &str) {
        let path = strip_illegal_xml_chars(&path.replace('\u{A0}', " "));
        let content = strip_illegal_xml_chars(content);

        self.body
            .push_str(&format!("  <file path=\"{}\">\n", escape(path.as_str())));
        if content.contains(CDATA_END) {
            self.body.push_str(&format!(
                "    <content>{}</content>\n",
                escape(content.as_str())
            ));
        } else {
            self.body
                .push_str(&format!("    <content><![CDATA[{}]]></content>\n", content));
        }
        self.body.push_str("  </file>\n");
        self.files += 1;
    }

    fn file_count(&self) -> usize {
        self.files
    }

    fn finish(&self) -> Result<String> {
        let mut out = String::with_capacity(self.body.len() + 64);
        out.push_str(XML_DECLARATION);
        out.push('\n');
        out.push_str(&format!("<{}>\n", ROOT_ELEMENT));
        out.push_str(&self.body);
        out.push_str(&format!("</{}>\n", ROOT_ELEMENT));
        Ok(out)
    }
}

/// A `<file>` element being read
struct PendingFile {
    path: Option<String>,
    content: String,
}

fn path_attr(element: &BytesStart) -> Result<Option<String>> {
    let attr = element
        .try_get_attribute("path")
        .map_err(|e| SnapError::Markup(e.to_string()))?;
    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|e| SnapError::Markup(e.to_string()))?;
            Ok(Some(value.into_owned()).filter(|p| !p.is_empty()))
        }
        None => Ok(None),
    }
}

/// Parse a markup document into path → content records.
///
/// Only `file` elements directly under the root element count. A file
/// without a `path` attribute is ignored; one without `content` is empty.
pub fn parse_markup(text: &str) -> Result<Document> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut document = Document::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut current: Option<PendingFile> = None;
    let mut in_content = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    1 => saw_root = true,
                    2 if e.name().as_ref() == b"file" => {
                        current = Some(PendingFile {
                            path: path_attr(&e)?,
                            content: String::new(),
                        });
                    }
                    3 if current.is_some() && e.name().as_ref() == b"content" => {
                        in_content = true;
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if depth == 0 {
                    saw_root = true;
                } else if depth == 1 && e.name().as_ref() == b"file" {
                    if let Some(path) = path_attr(&e)? {
                        document.insert(path, String::new());
                    }
                }
            }
            Event::End(_) => {
                if depth == 3 && in_content {
                    in_content = false;
                } else if depth == 2 {
                    if let Some(PendingFile {
                        path: Some(path),
                        content,
                    }) = current.take()
                    {
                        document.insert(path, content);
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) if in_content => {
                let text = t.unescape().map_err(|e| SnapError::Markup(e.to_string()))?;
                if let Some(file) = current.as_mut() {
                    file.content.push_str(&text);
                }
            }
            Event::CData(c) if in_content => {
                if let Some(file) = current.as_mut() {
                    file.content.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(SnapError::Markup(
            "unexpected end of document inside an element".to_string(),
        ));
    }
    if !saw_root {
        return Err(SnapError::Markup("missing root element".to_string()));
    }
    Ok(document)
}
