//! Domain types for the cache_dirs option compiler.
//!
//! Field values cross the boundary as plain strings ([`SettingsSubmission`]).
//! [`Settings`] is the typed view built from them right after ingestion, and
//! [`CompiledOptions`] is what gets written to the daemon's config file.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::SettingsError;

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

/// Control field naming the config file the options are written to.
pub const CONFIG_FIELD: &str = "#config";
/// Control field carrying the encoded `field=flag` prefix table.
pub const PREFIX_FIELD: &str = "#prefix";
/// Daemon enable flag.
pub const SERVICE_FIELD: &str = "service";
/// Adaptive depth flag.
pub const ADAPTIVE_FIELD: &str = "adaptive";
/// Depth value, consumed into the trailing depth token.
pub const DEPTH_FIELD: &str = "depth";
/// Comma-separated list of directories to cache.
pub const INCLUDE_FIELD: &str = "include";

/// Fields starting with this marker are control directives, never options.
pub const CONTROL_MARKER: char = '#';

// ---------------------------------------------------------------------------
// SettingsSubmission
// ---------------------------------------------------------------------------

/// Ordered string-keyed, string-valued form submission.
///
/// Keys are unique: pushing an existing key replaces its value in place, the
/// way a posted form array behaves. Iteration order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettingsSubmission {
    fields: Vec<(String, String)>,
}

impl SettingsSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ordered pairs (later duplicates overwrite earlier ones).
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        pairs.into_iter().collect()
    }

    /// Decode an `application/x-www-form-urlencoded` body, preserving order.
    pub fn parse_form(body: &str) -> Self {
        form_urlencoded::parse(body.trim().as_bytes())
            .filter(|(key, _)| !key.is_empty())
            .collect()
    }

    /// Split a single `key=value` argument on its first `=`.
    pub fn parse_field(arg: &str) -> Result<(String, String), SettingsError> {
        match arg.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_owned(), value.to_owned())),
            _ => Err(SettingsError::InvalidField {
                arg: arg.to_owned(),
            }),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `true` when `key` is present with a non-empty value.
    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw value of the `#prefix` control field.
    pub fn prefix_spec(&self) -> Option<&str> {
        self.get(PREFIX_FIELD)
    }

    /// Overlay host-supplied defaults onto the submission.
    ///
    /// A default replaces the submitted value of the same key without moving
    /// it; default keys missing from the submission are appended in order.
    pub fn with_defaults(mut self, defaults: &SettingsSubmission) -> Self {
        for (key, value) in defaults.iter() {
            self.push(key, value);
        }
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SettingsSubmission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut submission = Self::new();
        submission.extend(iter);
        submission
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for SettingsSubmission {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.push(key, value);
        }
    }
}

impl IntoIterator for SettingsSubmission {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

// ---------------------------------------------------------------------------
// PrefixTable
// ---------------------------------------------------------------------------

/// Field name → command-line flag mapping decoded from `#prefix`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixTable(HashMap<String, String>);

impl PrefixTable {
    /// Decode a `field=flag&field=flag` spec.
    ///
    /// Never fails: pairs with an empty field name are dropped, and a spec
    /// with nothing usable yields an empty table.
    pub fn parse(spec: &str) -> Self {
        let table: HashMap<String, String> = form_urlencoded::parse(spec.trim().as_bytes())
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, flag)| (key.into_owned(), flag.into_owned()))
            .collect();
        if table.is_empty() && !spec.trim().is_empty() {
            tracing::warn!(spec, "prefix spec has no usable entries; using empty table");
        }
        Self(table)
    }

    pub fn flag(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Typed settings
// ---------------------------------------------------------------------------

/// Depth value exactly as submitted.
///
/// The literal is passed through into the depth token untouched; only the
/// adaptive-mode check needs a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Depth(String);

impl Depth {
    pub fn new(literal: impl Into<String>) -> Self {
        Self(literal.into())
    }

    pub fn literal(&self) -> &str {
        &self.0
    }

    /// `true` for a positive integer literal of any length (optional leading `+`).
    pub fn is_positive(&self) -> bool {
        let trimmed = self.0.trim();
        let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
        !digits.is_empty()
            && digits.bytes().all(|b| b.is_ascii_digit())
            && digits.bytes().any(|b| b != b'0')
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An option-producing field, kept in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptionField {
    /// Trimmed, non-empty entries of one `include` value (not yet escaped).
    Include { entries: Vec<String> },
    /// Any non-control field without a dedicated meaning.
    Extra { key: String, value: String },
}

/// Typed view of a [`SettingsSubmission`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub path: Option<String>,
    pub enable: bool,
    pub adaptive: bool,
    pub depth: Option<Depth>,
    pub fields: Vec<OptionField>,
}

impl Settings {
    /// Fold the submission into typed settings.
    ///
    /// Empty values count as absent. `#config` discards every option field
    /// accumulated before it; submissions normally put it first.
    pub fn from_submission(submission: &SettingsSubmission) -> Self {
        submission
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .fold(Self::default(), |mut acc, (key, value)| {
                match key {
                    CONFIG_FIELD => {
                        acc.path = Some(value.to_owned());
                        acc.fields.clear();
                    }
                    SERVICE_FIELD => acc.enable = true,
                    ADAPTIVE_FIELD => acc.adaptive = value == "1",
                    DEPTH_FIELD => acc.depth = Some(Depth::new(value)),
                    INCLUDE_FIELD => acc.fields.push(OptionField::Include {
                        entries: split_include(value),
                    }),
                    // `#prefix` and unknown directives produce no option.
                    key if key.starts_with(CONTROL_MARKER) => {}
                    key => acc.fields.push(OptionField::Extra {
                        key: key.to_owned(),
                        value: value.to_owned(),
                    }),
                }
                acc
            })
    }

    /// All include entries across every `include` field, in order.
    pub fn include(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .flat_map(|field| match field {
                OptionField::Include { entries } => entries.as_slice(),
                OptionField::Extra { .. } => &[][..],
            })
            .map(String::as_str)
    }

    /// Pass-through fields, in order.
    pub fn extra(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().filter_map(|field| match field {
            OptionField::Extra { key, value } => Some((key.as_str(), value.as_str())),
            OptionField::Include { .. } => None,
        })
    }
}

fn split_include(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

// ---------------------------------------------------------------------------
// Compiled output
// ---------------------------------------------------------------------------

/// One whitespace-separated unit of the option string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Token {
    /// `-<flag> <value>`
    Flag { flag: String, value: String },
    /// `-<flag> "<value>"` — include entries only.
    Quoted { flag: String, value: String },
    /// `<value>` with no flag.
    Bare { value: String },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Flag { flag, value } => write!(f, "-{flag} {value}"),
            Token::Quoted { flag, value } => write!(f, "-{flag} \"{value}\""),
            Token::Bare { value } => f.write_str(value),
        }
    }
}

/// Result of compiling a submission: target path plus ordered tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompiledOptions {
    pub path: Option<String>,
    pub tokens: Vec<Token>,
}

impl CompiledOptions {
    /// The option string as written to the config file.
    pub fn options_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompiledOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .tokens
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        f.write_str(joined.trim())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
