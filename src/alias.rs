//! Column alias index.
//!
//! Maps the many ways a user may spell a column name ("device type",
//! "DeviceType", "device_type", "devicetype") to the canonical column name
//! used in the dataset schema.
//!
//! For every column the index registers these forms:
//!
//! | form                              | `device_type`  |
//! |-----------------------------------|----------------|
//! | identity                          | `device_type`  |
//! | lowercase                         | `device_type`  |
//! | uppercase                         | `DEVICE_TYPE`  |
//! | title case                        | `Device_Type`  |
//! | separators as spaces, lowercase   | `device type`  |
//! | separators as spaces, title case  | `Device Type`  |
//! | separators stripped, lowercase    | `devicetype`   |
//! | separators stripped, title case   | `Devicetype`   |
//! | punctuation stripped, lowercase   | `devicetype`   |
//!
//! Two columns may collide on a normalized form (`device_type` and
//! `device-type` both produce `devicetype`). The column registered later
//! wins. This is an accepted ambiguity, not an error.

use std::collections::HashMap;

/// Characters treated as word separators inside column names.
const SEPARATORS: [char; 2] = ['_', '-'];

/// A case/format-insensitive lookup from text tokens to column names.
///
/// Built once per dataset schema and never mutated afterwards, so a single
/// index can be shared freely between concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    columns: Vec<String>,
    aliases: HashMap<String, String>,
    /// Lowercase aliases, longest first, used when scanning free text.
    scan_order: Vec<String>,
}

/// A column mention found in free text.
///
/// Offsets are byte offsets into the lowercased text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention<'a> {
    pub column: &'a str,
    pub start: usize,
    pub end: usize,
}

impl AliasIndex {
    /// Build an index from an ordered list of column names.
    pub fn build<S: AsRef<str>>(columns: &[S]) -> Self {
        let mut aliases = HashMap::new();
        let mut canonical = Vec::with_capacity(columns.len());

        for column in columns {
            let column = column.as_ref();
            canonical.push(column.to_string());
            for form in alias_forms(column) {
                if form.trim().is_empty() {
                    continue;
                }
                aliases.insert(form, column.to_string());
            }
        }

        let mut scan_order: Vec<String> = aliases
            .keys()
            .filter(|alias| alias.to_lowercase() == **alias)
            .cloned()
            .collect();
        scan_order.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            columns: canonical,
            aliases,
            scan_order,
        }
    }

    /// Resolve a token to a canonical column name.
    ///
    /// The token is tried as-is and then in each normalized form. There is
    /// no fuzzy matching at this layer.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Some(column) = self.aliases.get(token) {
            return Some(column.as_str());
        }

        let lower = token.to_lowercase();
        [
            lower.clone(),
            space_joined(&lower),
            strip_separators(&lower),
            strip_punctuation(&lower),
        ]
        .iter()
        .find_map(|form| self.aliases.get(form))
        .map(String::as_str)
    }

    /// Find every column mention in `text`, left to right.
    ///
    /// At each word boundary the longest alias starting there wins, and
    /// scanning resumes after it. A column mentioned twice appears twice.
    pub fn mentions(&self, text: &str) -> Vec<Mention<'_>> {
        let lowered = text.to_lowercase();
        let mut found = Vec::new();
        let mut pos = 0;

        while pos < lowered.len() {
            let rest = &lowered[pos..];
            let hit = self.scan_order.iter().find(|alias| {
                rest.starts_with(alias.as_str()) && is_bounded(&lowered, pos, pos + alias.len())
            });

            if let Some(alias) = hit {
                if let Some(column) = self.aliases.get(alias) {
                    found.push(Mention {
                        column: column.as_str(),
                        start: pos,
                        end: pos + alias.len(),
                    });
                }
                pos += alias.len();
                continue;
            }

            pos += rest.chars().next().map_or(1, char::len_utf8);
        }

        found
    }

    /// Canonical column names, in registration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Iterate over `(alias, column)` pairs, sorted by alias.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(alias, column)| (alias.as_str(), column.as_str()))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

/// Every normalized form registered for a column name.
fn alias_forms(column: &str) -> Vec<String> {
    let spaced = space_joined(column);
    let stripped = strip_separators(column);

    let mut forms = vec![
        column.to_string(),
        column.to_lowercase(),
        column.to_uppercase(),
        title_case(column),
        spaced.to_lowercase(),
        title_case(&spaced),
        stripped.to_lowercase(),
        title_case(&stripped),
        strip_punctuation(column).to_lowercase(),
    ];
    forms.dedup();
    forms
}

/// Replace separator characters with spaces.
fn space_joined(s: &str) -> String {
    s.chars()
        .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
        .collect()
}

/// Remove separator characters and whitespace.
fn strip_separators(s: &str) -> String {
    s.chars()
        .filter(|c| !SEPARATORS.contains(c) && !c.is_whitespace())
        .collect()
}

/// Keep only alphanumeric characters.
fn strip_punctuation(s: &str) -> String {
    s.chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Uppercase the first letter of every run of letters, lowercase the rest.
///
/// `"device_type"` becomes `"Device_Type"`, `"deviceType"` becomes
/// `"Devicetype"`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True if `text[start..end]` does not cut a word in half on either side.
fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let inner = &text[start..end];
    let cuts_left = match (text[..start].chars().next_back(), inner.chars().next()) {
        (Some(before), Some(first)) => is_word_char(before) && is_word_char(first),
        _ => false,
    };
    let cuts_right = match (inner.chars().next_back(), text[end..].chars().next()) {
        (Some(last), Some(after)) => is_word_char(last) && is_word_char(after),
        _ => false,
    };
    !cuts_left && !cuts_right
}
