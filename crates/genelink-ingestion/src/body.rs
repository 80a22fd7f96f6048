//! Extraction of the main body text from JATS full-text XML.
//!
//! Only the first element with local name `body` is read; front matter
//! (title, abstract) and back matter (references) are ignored.

use std::sync::OnceLock;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, warn};

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

/// Body text with whitespace runs collapsed, or an empty string when the
/// document has no `<body>`. Malformed XML yields the raw document with its
/// tags removed.
pub fn extract_body_text(xml: &str) -> String {
    match read_body(xml) {
        Ok(Some(text)) => whitespace_re().replace_all(&text, " ").trim().to_string(),
        Ok(None) => {
            debug!("document has no <body> element");
            String::new()
        }
        Err(e) => {
            warn!(error = %e, "malformed full-text XML, falling back to tag stripping");
            strip_tags(xml)
        }
    }
}

/// Remove every `<…>` tag, leaving text and whitespace untouched.
pub fn strip_tags(xml: &str) -> String {
    tag_re().replace_all(xml, "").into_owned()
}

/// Raw concatenated text of the first `<body>`. The whole document is read
/// so that errors after the body still count as malformed.
fn read_body(xml: &str) -> Result<Option<String>, String> {
    let mut reader = Reader::from_str(xml);

    let mut depth = 0usize;
    // depth of the open <body>, while inside it
    let mut body_depth: Option<usize> = None;
    let mut body: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                if body.is_none() && e.local_name().as_ref() == b"body" {
                    body = Some(String::new());
                    body_depth = Some(depth);
                }
            }
            Ok(Event::End(_)) => {
                if body_depth == Some(depth) {
                    body_depth = None;
                }
                depth = depth.checked_sub(1).ok_or("unbalanced end tag")?;
            }
            Ok(Event::Empty(e)) => {
                if body.is_none() && e.local_name().as_ref() == b"body" {
                    body = Some(String::new());
                }
            }
            Ok(Event::Text(t)) => {
                if body_depth.is_some() {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    if let Some(buf) = body.as_mut() {
                        buf.push_str(&text);
                    }
                }
            }
            Ok(Event::CData(c)) => {
                if body_depth.is_some() {
                    if let Some(buf) = body.as_mut() {
                        buf.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "error at position {}: {}",
                    reader.error_position(),
                    e
                ))
            }
        }
    }

    if depth != 0 {
        return Err(format!("{} unclosed element(s) at end of document", depth));
    }
    Ok(body)
}
