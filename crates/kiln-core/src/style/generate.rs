//! Utility-class CSS generation.
//!
//! Scans the request's markup/script sources for candidate class tokens,
//! resolves each against the (merged or base-only) theme, and emits final
//! CSS. `@tailwind` directives in the combined global stylesheet are
//! replaced in place: `base` becomes the preflight, `components` is
//! dropped, `utilities` becomes the generated rules.

use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;

use crate::style::value::ConfigValue;

/// The default candidate extractor: any run of non-delimiter characters
/// not ending in a colon.
static CANDIDATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^<>"'`\s]*[^<>"'`\s:]"#).expect("extractor pattern is valid")
});

/// Minimal element reset emitted in place of `@tailwind base`.
const PREFLIGHT: &str = r#"*, ::before, ::after {
  box-sizing: border-box;
  border-width: 0;
  border-style: solid;
  border-color: #e5e7eb;
}
html {
  line-height: 1.5;
  -webkit-text-size-adjust: 100%;
  font-family: ui-sans-serif, system-ui, sans-serif;
}
body {
  margin: 0;
  line-height: inherit;
}
h1, h2, h3, h4, h5, h6 {
  margin: 0;
  font-size: inherit;
  font-weight: inherit;
}
p, blockquote, dl, dd, figure, pre {
  margin: 0;
}
img, svg, video, canvas {
  display: block;
  max-width: 100%;
}
button, input, select, textarea {
  margin: 0;
  font: inherit;
  color: inherit;
}
a {
  color: inherit;
  text-decoration: inherit;
}
"#;

// Default theme tables. Overridden wholesale by `theme.<section>` and
// extended by `theme.extend.<section>`.

const DEFAULT_SPACING: &[(&str, &str)] = &[
    ("0", "0px"),
    ("px", "1px"),
    ("0.5", "0.125rem"),
    ("1", "0.25rem"),
    ("1.5", "0.375rem"),
    ("2", "0.5rem"),
    ("2.5", "0.625rem"),
    ("3", "0.75rem"),
    ("3.5", "0.875rem"),
    ("4", "1rem"),
    ("5", "1.25rem"),
    ("6", "1.5rem"),
    ("7", "1.75rem"),
    ("8", "2rem"),
    ("9", "2.25rem"),
    ("10", "2.5rem"),
    ("11", "2.75rem"),
    ("12", "3rem"),
    ("14", "3.5rem"),
    ("16", "4rem"),
    ("20", "5rem"),
    ("24", "6rem"),
    ("32", "8rem"),
    ("40", "10rem"),
    ("48", "12rem"),
    ("56", "14rem"),
    ("64", "16rem"),
];

const DEFAULT_FONT_SIZE: &[(&str, &str, &str)] = &[
    ("xs", "0.75rem", "1rem"),
    ("sm", "0.875rem", "1.25rem"),
    ("base", "1rem", "1.5rem"),
    ("lg", "1.125rem", "1.75rem"),
    ("xl", "1.25rem", "1.75rem"),
    ("2xl", "1.5rem", "2rem"),
    ("3xl", "1.875rem", "2.25rem"),
    ("4xl", "2.25rem", "2.5rem"),
    ("5xl", "3rem", "1"),
    ("6xl", "3.75rem", "1"),
];

const DEFAULT_FONT_WEIGHT: &[(&str, &str)] = &[
    ("thin", "100"),
    ("light", "300"),
    ("normal", "400"),
    ("medium", "500"),
    ("semibold", "600"),
    ("bold", "700"),
    ("extrabold", "800"),
    ("black", "900"),
];

const DEFAULT_RADIUS: &[(&str, &str)] = &[
    ("none", "0px"),
    ("sm", "0.125rem"),
    ("DEFAULT", "0.25rem"),
    ("md", "0.375rem"),
    ("lg", "0.5rem"),
    ("xl", "0.75rem"),
    ("2xl", "1rem"),
    ("3xl", "1.5rem"),
    ("full", "9999px"),
];

const DEFAULT_SHADOW: &[(&str, &str)] = &[
    ("sm", "0 1px 2px 0 rgb(0 0 0 / 0.05)"),
    ("DEFAULT", "0 1px 3px 0 rgb(0 0 0 / 0.1), 0 1px 2px -1px rgb(0 0 0 / 0.1)"),
    ("md", "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)"),
    ("lg", "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)"),
    ("xl", "0 20px 25px -5px rgb(0 0 0 / 0.1), 0 8px 10px -6px rgb(0 0 0 / 0.1)"),
    ("none", "none"),
];

const GRAY: &[(&str, &str)] = &[
    ("50", "#f9fafb"), ("100", "#f3f4f6"), ("200", "#e5e7eb"), ("300", "#d1d5db"),
    ("400", "#9ca3af"), ("500", "#6b7280"), ("600", "#4b5563"), ("700", "#374151"),
    ("800", "#1f2937"), ("900", "#111827"),
];
const SLATE: &[(&str, &str)] = &[
    ("50", "#f8fafc"), ("100", "#f1f5f9"), ("200", "#e2e8f0"), ("300", "#cbd5e1"),
    ("400", "#94a3b8"), ("500", "#64748b"), ("600", "#475569"), ("700", "#334155"),
    ("800", "#1e293b"), ("900", "#0f172a"),
];
const RED: &[(&str, &str)] = &[
    ("50", "#fef2f2"), ("100", "#fee2e2"), ("200", "#fecaca"), ("300", "#fca5a5"),
    ("400", "#f87171"), ("500", "#ef4444"), ("600", "#dc2626"), ("700", "#b91c1c"),
    ("800", "#991b1b"), ("900", "#7f1d1d"),
];
const GREEN: &[(&str, &str)] = &[
    ("50", "#f0fdf4"), ("100", "#dcfce7"), ("200", "#bbf7d0"), ("300", "#86efac"),
    ("400", "#4ade80"), ("500", "#22c55e"), ("600", "#16a34a"), ("700", "#15803d"),
    ("800", "#166534"), ("900", "#14532d"),
];
const BLUE: &[(&str, &str)] = &[
    ("50", "#eff6ff"), ("100", "#dbeafe"), ("200", "#bfdbfe"), ("300", "#93c5fd"),
    ("400", "#60a5fa"), ("500", "#3b82f6"), ("600", "#2563eb"), ("700", "#1d4ed8"),
    ("800", "#1e40af"), ("900", "#1e3a8a"),
];
const INDIGO: &[(&str, &str)] = &[
    ("50", "#eef2ff"), ("100", "#e0e7ff"), ("200", "#c7d2fe"), ("300", "#a5b4fc"),
    ("400", "#818cf8"), ("500", "#6366f1"), ("600", "#4f46e5"), ("700", "#4338ca"),
    ("800", "#3730a3"), ("900", "#312e81"),
];
const YELLOW: &[(&str, &str)] = &[
    ("50", "#fefce8"), ("100", "#fef9c3"), ("200", "#fef08a"), ("300", "#fde047"),
    ("400", "#facc15"), ("500", "#eab308"), ("600", "#ca8a04"), ("700", "#a16207"),
    ("800", "#854d0e"), ("900", "#713f12"),
];

/// Property-less display/layout utilities that need no theme lookup.
const STATIC_UTILITIES: &[(&str, &[(&str, &str)])] = &[
    ("block", &[("display", "block")]),
    ("inline-block", &[("display", "inline-block")]),
    ("inline", &[("display", "inline")]),
    ("flex", &[("display", "flex")]),
    ("inline-flex", &[("display", "inline-flex")]),
    ("grid", &[("display", "grid")]),
    ("hidden", &[("display", "none")]),
    ("flex-row", &[("flex-direction", "row")]),
    ("flex-col", &[("flex-direction", "column")]),
    ("flex-wrap", &[("flex-wrap", "wrap")]),
    ("flex-1", &[("flex", "1 1 0%")]),
    ("items-start", &[("align-items", "flex-start")]),
    ("items-center", &[("align-items", "center")]),
    ("items-end", &[("align-items", "flex-end")]),
    ("justify-start", &[("justify-content", "flex-start")]),
    ("justify-center", &[("justify-content", "center")]),
    ("justify-end", &[("justify-content", "flex-end")]),
    ("justify-between", &[("justify-content", "space-between")]),
    ("text-left", &[("text-align", "left")]),
    ("text-center", &[("text-align", "center")]),
    ("text-right", &[("text-align", "right")]),
    ("italic", &[("font-style", "italic")]),
    ("underline", &[("text-decoration-line", "underline")]),
    ("uppercase", &[("text-transform", "uppercase")]),
    ("lowercase", &[("text-transform", "lowercase")]),
    ("capitalize", &[("text-transform", "capitalize")]),
    ("border", &[("border-width", "1px")]),
    ("w-full", &[("width", "100%")]),
    ("w-screen", &[("width", "100vw")]),
    ("h-full", &[("height", "100%")]),
    ("h-screen", &[("height", "100vh")]),
    ("min-h-screen", &[("min-height", "100vh")]),
    ("mx-auto", &[("margin-left", "auto"), ("margin-right", "auto")]),
    ("cursor-pointer", &[("cursor", "pointer")]),
    ("relative", &[("position", "relative")]),
    ("absolute", &[("position", "absolute")]),
    ("fixed", &[("position", "fixed")]),
    ("overflow-hidden", &[("overflow", "hidden")]),
    ("overflow-auto", &[("overflow", "auto")]),
    ("truncate", &[
        ("overflow", "hidden"),
        ("text-overflow", "ellipsis"),
        ("white-space", "nowrap"),
    ]),
    ("antialiased", &[
        ("-webkit-font-smoothing", "antialiased"),
        ("-moz-osx-font-smoothing", "grayscale"),
    ]),
    ("transition", &[
        ("transition-property", "color, background-color, border-color, opacity, box-shadow, transform"),
        ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ("transition-duration", "150ms"),
    ]),
];

/// Spacing-scale prefixes and the properties each one drives.
const SPACING_PREFIXES: &[(&str, &[&str])] = &[
    ("p-", &["padding"]),
    ("px-", &["padding-left", "padding-right"]),
    ("py-", &["padding-top", "padding-bottom"]),
    ("pt-", &["padding-top"]),
    ("pr-", &["padding-right"]),
    ("pb-", &["padding-bottom"]),
    ("pl-", &["padding-left"]),
    ("m-", &["margin"]),
    ("mx-", &["margin-left", "margin-right"]),
    ("my-", &["margin-top", "margin-bottom"]),
    ("mt-", &["margin-top"]),
    ("mr-", &["margin-right"]),
    ("mb-", &["margin-bottom"]),
    ("ml-", &["margin-left"]),
    ("gap-", &["gap"]),
    ("w-", &["width"]),
    ("h-", &["height"]),
];

/// A color entry: either a single value or a shade map.
#[derive(Debug, Clone)]
enum ColorScale {
    Single(String),
    Shades(Vec<(String, String)>),
}

/// Resolved theme tables the generator works against.
#[derive(Debug, Clone)]
pub struct Theme {
    colors: Vec<(String, ColorScale)>,
    spacing: Vec<(String, String)>,
    font_size: Vec<(String, String, String)>,
    font_weight: Vec<(String, String)>,
    border_radius: Vec<(String, String)>,
    box_shadow: Vec<(String, String)>,
    dark_class_strategy: bool,
}

impl Default for Theme {
    fn default() -> Self {
        let mut colors: Vec<(String, ColorScale)> = vec![
            ("inherit".into(), ColorScale::Single("inherit".into())),
            ("current".into(), ColorScale::Single("currentColor".into())),
            ("transparent".into(), ColorScale::Single("transparent".into())),
            ("white".into(), ColorScale::Single("#ffffff".into())),
            ("black".into(), ColorScale::Single("#000000".into())),
        ];
        for (name, table) in [
            ("gray", GRAY),
            ("slate", SLATE),
            ("red", RED),
            ("green", GREEN),
            ("blue", BLUE),
            ("indigo", INDIGO),
            ("yellow", YELLOW),
        ] {
            colors.push((
                name.to_string(),
                ColorScale::Shades(
                    table.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
                ),
            ));
        }

        Self {
            colors,
            spacing: DEFAULT_SPACING
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            font_size: DEFAULT_FONT_SIZE
                .iter()
                .map(|(k, s, l)| (k.to_string(), s.to_string(), l.to_string()))
                .collect(),
            font_weight: DEFAULT_FONT_WEIGHT
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            border_radius: DEFAULT_RADIUS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            box_shadow: DEFAULT_SHADOW
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            dark_class_strategy: false,
        }
    }
}

impl Theme {
    /// Resolve theme tables from a configuration tree. Sections under
    /// `theme.<name>` replace the defaults; sections under
    /// `theme.extend.<name>` merge over them. Function-valued entries are
    /// skipped; the generator resolves data, not code.
    pub fn from_config(config: &ConfigValue) -> Self {
        let mut theme = Theme::default();

        if let Some(ConfigValue::String(mode)) = config.get("darkMode") {
            theme.dark_class_strategy = mode == "class";
        }

        let Some(theme_value) = config.get("theme") else {
            return theme;
        };

        if let Some(colors) = theme_value.get("colors") {
            theme.colors = convert_colors(colors);
        }
        if let Some(spacing) = theme_value.get("spacing") {
            theme.spacing = convert_string_map(spacing);
        }

        if let Some(extend) = theme_value.get("extend") {
            if let Some(colors) = extend.get("colors") {
                for (name, scale) in convert_colors(colors) {
                    upsert(&mut theme.colors, name, scale);
                }
            }
            if let Some(spacing) = extend.get("spacing") {
                for (name, value) in convert_string_map(spacing) {
                    upsert(&mut theme.spacing, name, value);
                }
            }
            if let Some(radius) = extend.get("borderRadius") {
                for (name, value) in convert_string_map(radius) {
                    upsert(&mut theme.border_radius, name, value);
                }
            }
            if let Some(shadow) = extend.get("boxShadow") {
                for (name, value) in convert_string_map(shadow) {
                    upsert(&mut theme.box_shadow, name, value);
                }
            }
            if let Some(weight) = extend.get("fontWeight") {
                for (name, value) in convert_string_map(weight) {
                    upsert(&mut theme.font_weight, name, value);
                }
            }
        }

        theme
    }

    fn lookup_color(&self, rest: &str) -> Option<String> {
        // Exact single-color name first (`white`, `transparent`, or a
        // caller-defined flat color like `brand`).
        if let Some((_, scale)) = self.colors.iter().find(|(name, _)| name == rest) {
            if let ColorScale::Single(value) = scale {
                return Some(value.clone());
            }
        }

        // `hue-shade` form; hue names may themselves contain dashes, so
        // split on the last one.
        let (hue, shade) = rest.rsplit_once('-')?;
        match self.colors.iter().find(|(name, _)| name == hue) {
            Some((_, ColorScale::Shades(shades))) => shades
                .iter()
                .find(|(k, _)| k == shade)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    fn lookup_spacing(&self, key: &str) -> Option<String> {
        if key == "auto" {
            return Some("auto".to_string());
        }
        if key == "full" {
            return Some("100%".to_string());
        }
        self.spacing
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

fn upsert<T>(entries: &mut Vec<(String, T)>, name: String, value: T) {
    if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == name) {
        slot.1 = value;
    } else {
        entries.push((name, value));
    }
}

fn convert_colors(value: &ConfigValue) -> Vec<(String, ColorScale)> {
    let Some(pairs) = value.as_object() else {
        return Vec::new();
    };

    pairs
        .iter()
        .filter_map(|(name, entry)| match entry {
            ConfigValue::String(color) => {
                Some((name.clone(), ColorScale::Single(color.clone())))
            }
            ConfigValue::Object(shades) => Some((
                name.clone(),
                ColorScale::Shades(
                    shades
                        .iter()
                        .filter_map(|(shade, v)| {
                            v.as_str().map(|s| (shade.clone(), s.to_string()))
                        })
                        .collect(),
                ),
            )),
            // Function-valued entries cannot be resolved as data.
            _ => None,
        })
        .collect()
}

fn convert_string_map(value: &ConfigValue) -> Vec<(String, String)> {
    let Some(pairs) = value.as_object() else {
        return Vec::new();
    };

    pairs
        .iter()
        .filter_map(|(name, entry)| match entry {
            ConfigValue::String(v) => Some((name.clone(), v.clone())),
            ConfigValue::Number(n) => Some((name.clone(), format!("{}", n))),
            _ => None,
        })
        .collect()
}

/// Variant prefixes a candidate may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Variant {
    Hover,
    Focus,
    Dark,
}

impl Variant {
    fn parse(name: &str) -> Option<Variant> {
        match name {
            "hover" => Some(Variant::Hover),
            "focus" => Some(Variant::Focus),
            "dark" => Some(Variant::Dark),
            _ => None,
        }
    }
}

/// One emitted rule.
#[derive(Debug, Clone)]
struct Rule {
    class: String,
    variants: Vec<Variant>,
    declarations: Vec<(String, String)>,
}

/// Extract candidate class tokens from content sources.
pub fn extract_candidates(sources: &[&str]) -> Vec<String> {
    let mut seen: FxHashSet<String> = FxHashSet::default();

    for source in sources {
        for token in CANDIDATE_RE.find_iter(source) {
            seen.insert(token.as_str().to_string());
        }
    }

    let mut candidates: Vec<String> = seen.into_iter().collect();
    candidates.sort();
    candidates
}

/// Resolve one candidate token into a rule, if it names a known utility.
fn resolve(token: &str, theme: &Theme) -> Option<Rule> {
    let mut variants = Vec::new();
    let mut utility = token;

    while let Some((prefix, rest)) = utility.split_once(':') {
        let variant = Variant::parse(prefix)?;
        if !variants.contains(&variant) {
            variants.push(variant);
        }
        utility = rest;
    }

    let declarations = resolve_utility(utility, theme)?;
    variants.sort();

    Some(Rule {
        class: token.to_string(),
        variants,
        declarations,
    })
}

fn resolve_utility(name: &str, theme: &Theme) -> Option<Vec<(String, String)>> {
    if let Some((_, declarations)) = STATIC_UTILITIES.iter().find(|(n, _)| *n == name) {
        return Some(
            declarations
                .iter()
                .map(|(p, v)| (p.to_string(), v.to_string()))
                .collect(),
        );
    }

    for (prefix, properties) in SPACING_PREFIXES {
        if let Some(key) = name.strip_prefix(prefix) {
            if let Some(value) = theme.lookup_spacing(key) {
                return Some(
                    properties
                        .iter()
                        .map(|p| (p.to_string(), value.clone()))
                        .collect(),
                );
            }
        }
    }

    if let Some(rest) = name.strip_prefix("text-") {
        if let Some((_, size, line_height)) =
            theme.font_size.iter().find(|(k, _, _)| k == rest)
        {
            return Some(vec![
                ("font-size".to_string(), size.clone()),
                ("line-height".to_string(), line_height.clone()),
            ]);
        }
        if let Some(color) = theme.lookup_color(rest) {
            return Some(vec![("color".to_string(), color)]);
        }
        return None;
    }

    if let Some(rest) = name.strip_prefix("bg-") {
        return theme
            .lookup_color(rest)
            .map(|color| vec![("background-color".to_string(), color)]);
    }

    if let Some(rest) = name.strip_prefix("border-") {
        return theme
            .lookup_color(rest)
            .map(|color| vec![("border-color".to_string(), color)]);
    }

    if let Some(rest) = name.strip_prefix("font-") {
        return theme
            .font_weight
            .iter()
            .find(|(k, _)| k == rest)
            .map(|(_, weight)| vec![("font-weight".to_string(), weight.clone())]);
    }

    if name == "rounded" {
        return theme
            .border_radius
            .iter()
            .find(|(k, _)| k == "DEFAULT")
            .map(|(_, v)| vec![("border-radius".to_string(), v.clone())]);
    }
    if let Some(rest) = name.strip_prefix("rounded-") {
        return theme
            .border_radius
            .iter()
            .find(|(k, _)| k == rest)
            .map(|(_, v)| vec![("border-radius".to_string(), v.clone())]);
    }

    if name == "shadow" {
        return theme
            .box_shadow
            .iter()
            .find(|(k, _)| k == "DEFAULT")
            .map(|(_, v)| vec![("box-shadow".to_string(), v.clone())]);
    }
    if let Some(rest) = name.strip_prefix("shadow-") {
        return theme
            .box_shadow
            .iter()
            .find(|(k, _)| k == rest)
            .map(|(_, v)| vec![("box-shadow".to_string(), v.clone())]);
    }

    None
}

/// Escape a class token for use in a selector.
fn escape_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len());
    for c in class.chars() {
        match c {
            ':' | '/' | '.' | '[' | ']' | '%' | '#' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}

fn emit_rule(rule: &Rule, theme: &Theme, out: &mut String) {
    let escaped = escape_class(&rule.class);

    let mut selector = format!(".{}", escaped);
    for variant in &rule.variants {
        match variant {
            Variant::Hover => selector.push_str(":hover"),
            Variant::Focus => selector.push_str(":focus"),
            Variant::Dark => {}
        }
    }

    let dark = rule.variants.contains(&Variant::Dark);
    if dark && theme.dark_class_strategy {
        selector = format!(".dark {}", selector);
    }

    let body = {
        let mut body = String::new();
        for (property, value) in &rule.declarations {
            body.push_str(&format!("  {}: {};\n", property, value));
        }
        body
    };

    if dark && !theme.dark_class_strategy {
        out.push_str(&format!(
            "@media (prefers-color-scheme: dark) {{\n{} {{\n{}}}\n}}\n",
            selector, body
        ));
    } else {
        out.push_str(&format!("{} {{\n{}}}\n", selector, body));
    }
}

/// Generate the utility rule block for the given candidates.
fn generate_utilities(theme: &Theme, candidates: &[String]) -> String {
    let mut rules: Vec<Rule> = candidates
        .iter()
        .filter_map(|token| resolve(token, theme))
        .collect();

    // Plain utilities first, then interaction variants, then dark, so
    // overrides layer the way callers expect.
    rules.sort_by(|a, b| a.variants.cmp(&b.variants).then(a.class.cmp(&b.class)));

    let mut out = String::new();
    for rule in &rules {
        emit_rule(rule, theme, &mut out);
    }
    out
}

/// Replace `@tailwind` directives in the global stylesheet with generated
/// content. When no `utilities` directive is present the generated rules
/// are appended, so used classes always make it into the output.
fn render_stylesheet(stylesheet: &str, utilities: &str) -> Result<String, String> {
    let mut out = String::new();
    let mut utilities_emitted = false;

    for line in stylesheet.lines() {
        let trimmed = line.trim();
        if let Some(directive) = trimmed.strip_prefix("@tailwind") {
            let directive = directive.trim().trim_end_matches(';').trim();
            match directive {
                "base" => out.push_str(PREFLIGHT),
                "components" => {}
                "utilities" => {
                    out.push_str(utilities);
                    utilities_emitted = true;
                }
                other => {
                    return Err(format!("unknown @tailwind directive: {:?}", other));
                }
            }
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }

    if !utilities_emitted {
        out.push_str(utilities);
    }

    Ok(out)
}

/// Produce final CSS text from a configuration, the content sources to
/// scan, and the combined global stylesheet.
pub fn generate_css(
    config: &ConfigValue,
    content: &[&str],
    stylesheet: &str,
) -> Result<String, String> {
    let theme = Theme::from_config(config);
    let candidates = extract_candidates(content);
    let utilities = generate_utilities(&theme, &candidates);

    tracing::debug!(
        candidates = candidates.len(),
        "generated utility css ({} bytes)",
        utilities.len()
    );

    render_stylesheet(stylesheet, &utilities)
}
