//! Habit ID generation and resolution
//!
//! Generated IDs use the format: `{8-char-hex}-{slug}`
//! Example: `7f3a91c2-morning-run`

use std::collections::HashMap;

/// Generate a habit ID from its display name
pub fn generate_id(name: &str) -> String {
    let uuid = uuid::Uuid::now_v7().simple().to_string();
    // Tail of a v7 uuid is random; the head is a coarse timestamp
    let hex = &uuid[uuid.len() - 8..];
    let slug = slugify(name);
    if slug.is_empty() {
        hex.to_string()
    } else {
        format!("{}-{}", hex, slug)
    }
}

/// Slugify a name for use in IDs
fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        // Strip apostrophes entirely, replace other non-alphanumeric with hyphens
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Resolves partial references typed on the command line to habit IDs
pub struct IdResolver<'a> {
    ids: &'a HashMap<String, String>, // id -> display name
}

impl<'a> IdResolver<'a> {
    pub fn new(ids: &'a HashMap<String, String>) -> Self {
        Self { ids }
    }

    /// Resolve a partial reference to a full ID
    ///
    /// Returns:
    /// - Ok(Some(id)) if exactly one match (an exact id always wins)
    /// - Ok(None) if no matches
    /// - Err with candidates if ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<String>, Vec<String>> {
        if self.ids.contains_key(reference) {
            return Ok(Some(reference.to_string()));
        }

        let mut matches: Vec<String> = self
            .ids
            .iter()
            .filter(|(id, name)| Self::matches(id, name, reference))
            .map(|(id, _)| id.clone())
            .collect();
        matches.sort();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(matches),
        }
    }

    /// Check if an ID or display name matches a reference
    fn matches(id: &str, name: &str, reference: &str) -> bool {
        if id.starts_with(reference) {
            return true;
        }

        if let Some(slug_start) = id.find('-') {
            let slug_part = &id[slug_start + 1..];
            if slug_part.contains(reference) {
                return true;
            }
        }

        name.eq_ignore_ascii_case(reference)
    }
}
