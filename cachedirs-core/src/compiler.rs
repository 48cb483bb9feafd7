//! Option compiler: settings submission → daemon option string.
//!
//! ## Token order
//!
//! 1. Option fields (`include` entries and pass-through fields) in
//!    submission order, minus anything that preceded `#config`.
//! 2. At most one depth token, always last:
//!    - adaptive: `-d <depth>` for a positive depth, otherwise nothing
//!    - static: `-D <depth>`, or `-D 9999` when no depth was given
//!
//! Compilation is pure and infallible.

use crate::types::{
    CompiledOptions, Depth, OptionField, PrefixTable, Settings, SettingsSubmission, Token,
    INCLUDE_FIELD,
};

/// Depth used in static mode when none was submitted.
pub const UNLIMITED_DEPTH: u32 = 9999;

/// Flag carrying the adaptive-mode depth cap.
pub const ADAPTIVE_DEPTH_FLAG: &str = "d";

/// Flag carrying the static-mode depth.
pub const STATIC_DEPTH_FLAG: &str = "D";

const INCLUDE_ESCAPED: [char; 5] = [' ', '[', ']', '(', ')'];

/// Compile `fields` using the raw `#prefix` spec given in `prefix_spec`.
pub fn compile(fields: &SettingsSubmission, prefix_spec: &str) -> CompiledOptions {
    let prefixes = PrefixTable::parse(prefix_spec);
    let settings = Settings::from_submission(fields);
    compile_settings(&settings, &prefixes)
}

/// [`compile`] with the prefix spec taken from the submission's own `#prefix`.
pub fn compile_submission(fields: &SettingsSubmission) -> CompiledOptions {
    compile(fields, fields.prefix_spec().unwrap_or_default())
}

/// Compile already-typed settings against a decoded prefix table.
pub fn compile_settings(settings: &Settings, prefixes: &PrefixTable) -> CompiledOptions {
    let mut tokens = Vec::new();

    for field in &settings.fields {
        match field {
            OptionField::Include { entries } => {
                let flag = prefixes.flag(INCLUDE_FIELD);
                tokens.extend(entries.iter().map(|entry| {
                    let value = escape_include(entry);
                    match flag {
                        Some(flag) => Token::Quoted {
                            flag: flag.to_owned(),
                            value,
                        },
                        None => Token::Bare { value },
                    }
                }));
            }
            OptionField::Extra { key, value } => {
                let value = value.clone();
                tokens.push(match prefixes.flag(key) {
                    Some(flag) => Token::Flag {
                        flag: flag.to_owned(),
                        value,
                    },
                    None => Token::Bare { value },
                });
            }
        }
    }

    tokens.extend(depth_token(settings.adaptive, settings.depth.as_ref()));

    let compiled = CompiledOptions {
        path: settings.path.clone(),
        tokens,
    };
    tracing::debug!(
        path = compiled.path.as_deref().unwrap_or(""),
        tokens = compiled.tokens.len(),
        "compiled cache_dirs options"
    );
    compiled
}

/// Resolve the trailing depth token.
///
/// The submitted literal is passed through as-is; only adaptive mode looks at
/// its numeric value.
pub fn depth_token(adaptive: bool, depth: Option<&Depth>) -> Option<Token> {
    if adaptive {
        depth
            .filter(|d| d.is_positive())
            .map(|d| Token::Flag {
                flag: ADAPTIVE_DEPTH_FLAG.to_owned(),
                value: d.literal().to_owned(),
            })
    } else {
        let value = depth.map_or_else(|| UNLIMITED_DEPTH.to_string(), |d| d.literal().to_owned());
        Some(Token::Flag {
            flag: STATIC_DEPTH_FLAG.to_owned(),
            value,
        })
    }
}

/// Backslash-escape space, `[`, `]`, `(` and `)` in an include entry.
pub fn escape_include(entry: &str) -> String {
    let mut escaped = String::with_capacity(entry.len());
    for c in entry.chars() {
        if INCLUDE_ESCAPED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(pairs: &[(&str, &str)]) -> SettingsSubmission {
        SettingsSubmission::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn media_and_backup_scenario() {
        let fields = submission(&[
            ("#config", "/cfg"),
            ("#prefix", "include=i&depth=d"),
            ("service", "1"),
            ("adaptive", "0"),
            ("depth", "5"),
            ("include", "/mnt/user/Media,/mnt/user/Backup"),
        ]);
        let compiled = compile(&fields, "include=i&depth=d");
        assert_eq!(compiled.path.as_deref(), Some("/cfg"));
        assert_eq!(
            compiled.options_string(),
            r#"-i "/mnt/user/Media" -i "/mnt/user/Backup" -D 5"#
        );
    }

    #[test]
    fn empty_submission_scenario() {
        let fields = submission(&[
            ("#config", "/cfg"),
            ("service", ""),
            ("adaptive", ""),
            ("depth", ""),
            ("include", ""),
        ]);
        let compiled = compile(&fields, "");
        assert_eq!(compiled.path.as_deref(), Some("/cfg"));
        assert_eq!(compiled.options_string(), "-D 9999");
    }

    #[test]
    fn pass_through_fields_use_prefix_or_go_bare() {
        let fields = submission(&[
            ("#config", "/cfg"),
            ("exclude", "temp"),
            ("include", "/mnt/disk1"),
            ("suffix", "-u"),
        ]);
        let compiled = compile(&fields, "include=i&exclude=e");
        assert_eq!(
            compiled.options_string(),
            r#"-e temp -i "/mnt/disk1" -u -D 9999"#
        );
    }

    #[test]
    fn include_without_prefix_entry_is_bare() {
        let fields = submission(&[("include", "/mnt/My Share")]);
        assert_eq!(
            compile(&fields, "").options_string(),
            r"/mnt/My\ Share -D 9999"
        );
    }

    #[test]
    fn pass_through_values_are_not_escaped() {
        let fields = submission(&[("exclude", "a (b) [c]")]);
        assert_eq!(
            compile(&fields, "exclude=e").options_string(),
            "-e a (b) [c] -D 9999"
        );
    }

    #[test]
    fn unknown_control_fields_are_ignored() {
        let fields = submission(&[("#arg", "whatever"), ("#prefix", "include=i")]);
        assert_eq!(compile(&fields, "include=i").options_string(), "-D 9999");
    }

    #[test]
    fn meta_fields_never_emit_tokens_even_with_prefixes() {
        let fields = submission(&[("service", "1"), ("adaptive", "1"), ("depth", "3")]);
        let compiled = compile(&fields, "service=s&adaptive=a&depth=x");
        assert_eq!(compiled.options_string(), "-d 3");
    }

    #[test]
    fn compile_submission_reads_own_prefix_field() {
        let fields = submission(&[("#prefix", "include=i"), ("include", "/mnt/a")]);
        assert_eq!(
            compile_submission(&fields).options_string(),
            r#"-i "/mnt/a" -D 9999"#
        );
    }

    #[test]
    fn escape_include_only_touches_listed_characters() {
        assert_eq!(escape_include("a b[c](d)"), r"a\ b\[c\]\(d\)");
        assert_eq!(escape_include(r#"x"y\z{}"#), r#"x"y\z{}"#);
    }

    #[test]
    fn missing_path_is_none() {
        let fields = submission(&[("include", "/mnt/a")]);
        assert_eq!(compile(&fields, "include=i").path, None);
    }
}
