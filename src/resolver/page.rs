use crate::error::ResolveError;
use crate::types::PersonRecord;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::Regex;
use std::borrow::Cow;
use tracing::debug;

const UNKNOWN_ID_MARKER: &str = "You have specified an ID that does not exist in the database";

/// Extracts person records from Mathematics Genealogy Project id pages
#[derive(Debug, Clone)]
pub struct PageParser {
    name: Regex,
    degree: Regex,
    advisor: Regex,
    student: Regex,
    tag: Regex,
}

impl PageParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            name: Regex::new(r"(?is)<h2[^>]*>(.*?)</h2>")?,
            degree: Regex::new(
                r#"(?is)<span\s+style="color:\s*#006633;\s*margin-left:\s*0\.5em">(.*?)</span>([^<]*)"#,
            )?,
            advisor: Regex::new(r#"(?i)Advisor(?:\s*\d+)?:\s*<a\s+href="id\.php\?id=(\d+)""#)?,
            student: Regex::new(r#"(?i)<tr[^>]*>\s*<td>\s*<a\s+href="id\.php\?id=(\d+)""#)?,
            tag: Regex::new(r"<[^>]*>")?,
        })
    }

    /// Parse the page served for `id`.
    pub fn parse(&self, id: u64, html: &str) -> Result<PersonRecord, ResolveError> {
        if html.contains(UNKNOWN_ID_MARKER) {
            return Err(ResolveError::UnknownId(id));
        }

        let name = self
            .name
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| self.clean_text(m.as_str()))
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ResolveError::Parse {
                id,
                reason: "page has no person name".to_string(),
            })?;

        let (institution, year) = match self.degree.captures(html) {
            Some(caps) => {
                let institution = caps
                    .get(1)
                    .map(|m| self.clean_text(m.as_str()))
                    .filter(|institution| !institution.is_empty());
                let year = caps.get(2).and_then(|m| parse_year(m.as_str()));
                (institution, year)
            }
            None => (None, None),
        };

        let ancestor_ids = capture_ids(&self.advisor, html);
        let descendant_ids = capture_ids(&self.student, html);

        debug!(
            "Parsed record {}: {} advisor(s), {} student(s)",
            id,
            ancestor_ids.len(),
            descendant_ids.len()
        );

        Ok(PersonRecord {
            name,
            institution,
            year,
            ancestor_ids,
            descendant_ids,
        })
    }

    /// Drop markup, decode entities and trim. Interior spacing is kept as-is.
    fn clean_text(&self, raw: &str) -> String {
        let stripped = self.tag.replace_all(raw, "");
        let decoded = unescape_with(&stripped, resolve_html5_entity)
            .unwrap_or(Cow::Borrowed(stripped.as_ref()));
        decoded.trim().to_string()
    }
}

/// The year is the text before the first comma, when it is all digits.
fn parse_year(text: &str) -> Option<i32> {
    let candidate = text.split(',').next()?.trim();
    if candidate.is_empty() || !candidate.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    candidate.parse().ok()
}

fn capture_ids(pattern: &Regex, html: &str) -> Vec<u64> {
    pattern
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}
