//! Style configuration value tree.
//!
//! Configurations are JS object literals, so the value model is a JSON
//! tree plus one extra leaf: [`ConfigValue::Function`], which carries a
//! function literal's source text. Functions must survive the base/override
//! deep merge as callable values, and the merge result must be re-embedded
//! into a freshly generated config program. JSON cannot represent a
//! function, so serialization wraps each function's source in sentinel
//! markers and a second text pass un-quotes the marked fragments back into
//! live code.

use std::fmt::Write as _;

/// Marker opening a serialized function fragment.
const FN_OPEN: &str = "@__kiln_fn__";
/// Marker closing a serialized function fragment.
const FN_CLOSE: &str = "__kiln_fn__@";

/// A function literal captured from a configuration source.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSource {
    /// Declared name, when the literal had one.
    pub name: Option<String>,

    /// Verbatim source text of the literal.
    pub source: String,
}

impl FunctionSource {
    /// Whether this value can be re-emitted as live code.
    pub fn is_callable(&self) -> bool {
        !self.source.trim().is_empty()
    }
}

/// One node of a parsed style configuration.
///
/// Objects preserve insertion order, matching JS object semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<ConfigValue>),
    Object(Vec<(String, ConfigValue)>),
    Function(FunctionSource),
}

impl ConfigValue {
    /// Empty object literal.
    pub fn empty_object() -> Self {
        ConfigValue::Object(Vec::new())
    }

    /// Look up a key on an object value.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        match self {
            ConfigValue::Object(pairs) => {
                pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// String content, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Object pairs, if this is an object value.
    pub fn as_object(&self) -> Option<&[(String, ConfigValue)]> {
        match self {
            ConfigValue::Object(pairs) => Some(pairs),
            _ => None,
        }
    }
}

/// Deep-merge `overlay` onto `base`.
///
/// Object keys merge recursively; arrays concatenate (base first, so base
/// plugins run before override plugins); every other conflict resolves to
/// the overlay value. Function values pass through untouched.
pub fn deep_merge(base: &ConfigValue, overlay: &ConfigValue) -> ConfigValue {
    match (base, overlay) {
        (ConfigValue::Object(base_pairs), ConfigValue::Object(overlay_pairs)) => {
            let mut merged = base_pairs.clone();

            for (key, overlay_value) in overlay_pairs {
                if let Some(slot) = merged.iter_mut().find(|(k, _)| k == key) {
                    slot.1 = deep_merge(&slot.1, overlay_value);
                } else {
                    merged.push((key.clone(), overlay_value.clone()));
                }
            }

            ConfigValue::Object(merged)
        }
        (ConfigValue::Array(base_items), ConfigValue::Array(overlay_items)) => {
            let mut merged = base_items.clone();
            merged.extend(overlay_items.iter().cloned());
            ConfigValue::Array(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Serialize a config tree to JSON text, rendering each function value as
/// a marker-wrapped string of its own source (the "custom replacer" pass).
pub fn to_marked_json(value: &ConfigValue) -> String {
    let mut out = String::new();
    write_json(value, 0, &mut out);
    out
}

fn write_json(value: &ConfigValue, indent: usize, out: &mut String) {
    match value {
        ConfigValue::Null => out.push_str("null"),
        ConfigValue::Bool(b) => {
            let _ = write!(out, "{}", b);
        }
        ConfigValue::Number(n) => {
            // Integers print without a trailing fraction.
            if n.fract() == 0.0 && n.is_finite() && n.abs() < i64::MAX as f64 {
                let _ = write!(out, "{}", *n as i64);
            } else {
                let _ = write!(out, "{}", n);
            }
        }
        ConfigValue::String(s) => write_json_string(s, out),
        ConfigValue::Function(f) => {
            let marked = format!("{}{}{}", FN_OPEN, f.source, FN_CLOSE);
            write_json_string(&marked, out);
        }
        ConfigValue::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                push_indent(indent + 1, out);
                write_json(item, indent + 1, out);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(indent, out);
            out.push(']');
        }
        ConfigValue::Object(pairs) => {
            if pairs.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            for (i, (key, item)) in pairs.iter().enumerate() {
                push_indent(indent + 1, out);
                write_json_string(key, out);
                out.push_str(": ");
                write_json(item, indent + 1, out);
                if i + 1 < pairs.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(indent, out);
            out.push('}');
        }
    }
}

fn push_indent(indent: usize, out: &mut String) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

fn write_json_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Second serialization pass: un-quote every marker-wrapped function
/// fragment, reversing the string escaping of quotes, newlines and
/// backslashes, so the fragments become live code again. Ordinary quoted
/// strings pass through untouched.
pub fn revive_functions(json: &str) -> String {
    let open_pattern = format!("\"{}", FN_OPEN);
    let close_pattern = format!("{}\"", FN_CLOSE);

    let mut out = String::with_capacity(json.len());
    let mut rest = json;

    while let Some(start) = rest.find(&open_pattern) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + open_pattern.len()..];

        match after_open.find(&close_pattern) {
            Some(end) => {
                out.push_str(&unescape_json_fragment(&after_open[..end]));
                rest = &after_open[end + close_pattern.len()..];
            }
            None => {
                // Unterminated marker: emit the remainder untouched.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn unescape_json_fragment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}

/// Regenerate a configuration program from a merged value tree.
///
/// The output is a `module.exports` assignment whose function values are
/// live code, suitable both for re-evaluation and for writing into the
/// ephemeral project as its config file.
pub fn to_config_source(value: &ConfigValue) -> String {
    format!("module.exports = {};\n", revive_functions(&to_marked_json(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(pairs: Vec<(&str, ConfigValue)>) -> ConfigValue {
        ConfigValue::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn s(v: &str) -> ConfigValue {
        ConfigValue::String(v.to_string())
    }

    #[test]
    fn test_merge_override_wins_on_scalars() {
        let base = obj(vec![("darkMode", s("media")), ("important", ConfigValue::Bool(false))]);
        let overlay = obj(vec![("darkMode", s("class"))]);

        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged.get("darkMode").unwrap().as_str(), Some("class"));
        assert_eq!(merged.get("important"), Some(&ConfigValue::Bool(false)));
    }

    #[test]
    fn test_merge_concatenates_arrays() {
        let base = obj(vec![("plugins", ConfigValue::Array(vec![s("a")]))]);
        let overlay = obj(vec![("plugins", ConfigValue::Array(vec![s("b")]))]);

        let merged = deep_merge(&base, &overlay);
        assert_eq!(
            merged.get("plugins"),
            Some(&ConfigValue::Array(vec![s("a"), s("b")]))
        );
    }

    #[test]
    fn test_merge_recurses_into_objects() {
        let base = obj(vec![(
            "theme",
            obj(vec![("colors", obj(vec![("red", s("#f00")), ("blue", s("#00f"))]))]),
        )]);
        let overlay = obj(vec![(
            "theme",
            obj(vec![("colors", obj(vec![("red", s("#ff0000"))]))]),
        )]);

        let merged = deep_merge(&base, &overlay);
        let colors = merged.get("theme").unwrap().get("colors").unwrap();
        assert_eq!(colors.get("red").unwrap().as_str(), Some("#ff0000"));
        assert_eq!(colors.get("blue").unwrap().as_str(), Some("#00f"));
    }

    #[test]
    fn test_functions_survive_merge() {
        let fun = ConfigValue::Function(FunctionSource {
            name: None,
            source: "({ theme }) => theme(\"colors.red.500\")".to_string(),
        });
        let base = obj(vec![("accent", s("#f00"))]);
        let overlay = obj(vec![("accent", fun.clone())]);

        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged.get("accent"), Some(&fun));
        match merged.get("accent").unwrap() {
            ConfigValue::Function(f) => assert!(f.is_callable()),
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_round_trip_unquotes_function_source() {
        let fun = ConfigValue::Function(FunctionSource {
            name: None,
            source: "({ theme }) => theme(\"spacing.4\")".to_string(),
        });
        let value = obj(vec![("pad", fun)]);

        let source = to_config_source(&value);

        // The function must appear as live code, not a quoted string.
        assert!(source.contains(r#""pad": ({ theme }) => theme("spacing.4")"#));
        assert!(!source.contains(FN_OPEN));
        assert!(!source.contains(FN_CLOSE));
    }

    #[test]
    fn test_round_trip_preserves_newlines_in_function_body() {
        let fun = ConfigValue::Function(FunctionSource {
            name: Some("addBase".to_string()),
            source: "function addBase(api) {\n  return api;\n}".to_string(),
        });
        let value = obj(vec![("plugin", fun)]);

        let source = to_config_source(&value);
        assert!(source.contains("function addBase(api) {\n  return api;\n}"));
    }

    #[test]
    fn test_ordinary_strings_untouched_by_revival() {
        let value = obj(vec![("label", s("keep \"quotes\" and \\n literal"))]);
        let source = to_config_source(&value);

        // The escaped string form must remain escaped.
        assert!(source.contains(r#""label": "keep \"quotes\" and \\n literal""#));
    }

    #[test]
    fn test_integer_numbers_print_bare() {
        let value = obj(vec![("columns", ConfigValue::Number(12.0))]);
        assert!(to_marked_json(&value).contains("\"columns\": 12"));
    }
}
