//! Style compilation.
//!
//! Turns a base configuration plus an optional, untrusted override into
//! final CSS text, never raising past a base-config fallback:
//!
//! 1. No override: evaluate the base configuration and generate.
//! 2. Override present: structurally match and evaluate it, deep-merge
//!    onto the base, and round-trip the merged tree through the
//!    function-preserving serializer so it can be re-embedded as a fresh
//!    config program.
//! 3. Re-evaluate the regenerated program; any failure along the way
//!    degrades to the base-only path with a logged warning.
//! 4. Run the utility-class generator. A generator failure on the merged
//!    path degrades to base-only; on the base-only path it is the one
//!    hard error this module surfaces.
//!
//! The two phases are separable: [`StyleCompiler::prepare`] performs the
//! merge/round-trip (its output feeds project scaffolding), and
//! [`StyleCompiler::generate`] produces CSS, so the pipeline can run
//! generation concurrently with bundling.

mod generate;
mod parse;
mod value;

pub use generate::{Theme, extract_candidates, generate_css};
pub use parse::{EvalError, evaluate_config, strip_comments};
pub use value::{
    ConfigValue, FunctionSource, deep_merge, revive_functions, to_config_source, to_marked_json,
};

use crate::error::{Error, Result};

/// Outcome of the merge phase: the evaluated base configuration plus, when
/// the override survived evaluation and the round-trip, the merged
/// configuration and its regenerated program text.
#[derive(Debug, Clone)]
pub struct PreparedConfig {
    base: ConfigValue,
    merged: Option<(ConfigValue, String)>,
    had_override: bool,
}

impl PreparedConfig {
    /// The configuration program to write into the ephemeral project.
    pub fn config_source(&self) -> String {
        match &self.merged {
            Some((_, source)) => source.clone(),
            None => to_config_source(&self.base),
        }
    }

    /// Whether an override was supplied but dropped during preparation.
    pub fn override_dropped(&self) -> bool {
        self.had_override && self.merged.is_none()
    }

    /// The configuration the generator should try first.
    fn effective(&self) -> &ConfigValue {
        match &self.merged {
            Some((config, _)) => config,
            None => &self.base,
        }
    }
}

/// Result of one style compilation.
#[derive(Debug, Clone)]
pub struct StyleArtifacts {
    /// Final CSS text.
    pub css: String,

    /// Reconstructed configuration program (merged, or base-only after a
    /// fallback).
    pub config_source: String,

    /// Whether any tier of the fallback cascade fired.
    pub used_fallback: bool,
}

/// Compiles base/override configuration pairs into CSS.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleCompiler;

impl StyleCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Merge phase. The base configuration is trusted: failing to
    /// evaluate it is a hard error, not a fallback. Override failures are
    /// absorbed here.
    pub fn prepare(
        &self,
        base_config: &str,
        custom_config: Option<&str>,
    ) -> Result<PreparedConfig> {
        let base = evaluate_config(base_config)
            .map_err(|e| Error::Css(format!("base configuration failed to evaluate: {}", e)))?;

        let override_source = custom_config.filter(|src| !src.trim().is_empty());
        let had_override = override_source.is_some();
        let merged = override_source.and_then(|src| merge_override(&base, src));

        Ok(PreparedConfig {
            base,
            merged,
            had_override,
        })
    }

    /// Generation phase: scan content, resolve against the prepared
    /// configuration, and render the stylesheet.
    pub fn generate(
        &self,
        prepared: &PreparedConfig,
        content: &[&str],
        stylesheet: &str,
    ) -> Result<StyleArtifacts> {
        if prepared.merged.is_some() {
            match generate_css(prepared.effective(), content, stylesheet) {
                Ok(css) => {
                    return Ok(StyleArtifacts {
                        css,
                        config_source: prepared.config_source(),
                        used_fallback: false,
                    });
                }
                Err(message) => {
                    tracing::warn!(
                        "css generation failed with merged config, retrying base-only: {}",
                        message
                    );
                }
            }
        }

        // Base-only tail: reached with no merged config (override absent
        // or dropped) or after a merged-path generation failure. Either
        // way, an override that existed was not honored.
        let css = generate_css(&prepared.base, content, stylesheet).map_err(Error::Css)?;

        Ok(StyleArtifacts {
            css,
            config_source: to_config_source(&prepared.base),
            used_fallback: prepared.had_override,
        })
    }

    /// Both phases in sequence. Used by the standalone CSS endpoint.
    pub fn compile(
        &self,
        base_config: &str,
        custom_config: Option<&str>,
        content: &[&str],
        stylesheet: &str,
    ) -> Result<StyleArtifacts> {
        let prepared = self.prepare(base_config, custom_config)?;
        self.generate(&prepared, content, stylesheet)
    }
}

/// Evaluate and merge an override, round-tripping the merged tree through
/// the function-preserving text representation. Returns `None` on any
/// failure; the caller degrades to base-only.
fn merge_override(base: &ConfigValue, custom_config: &str) -> Option<(ConfigValue, String)> {
    let overlay = match evaluate_config(custom_config) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                "override config failed to evaluate ({}), falling back to base: {}",
                e,
                preview(custom_config)
            );
            return None;
        }
    };

    let merged = deep_merge(base, &overlay);
    let config_source = to_config_source(&merged);

    // The regenerated program must evaluate the same way the inputs did;
    // function fragments revived from the round-trip are part of that
    // program and must parse as live code.
    match evaluate_config(&config_source) {
        Ok(reconstructed) => Some((reconstructed, config_source)),
        Err(e) => {
            tracing::warn!(
                "regenerated merged config failed to re-evaluate ({}), falling back to base",
                e
            );
            None
        }
    }
}

/// Strip `import` lines from a snippet before class scanning. Used by the
/// standalone CSS compilation endpoint, whose inputs are demo snippets
/// with module imports that would otherwise pollute extraction.
pub fn strip_import_lines(source: &str) -> String {
    source
        .lines()
        .filter(|line| !line.trim_start().starts_with("import "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Bounded preview of untrusted input for log lines.
fn preview(source: &str) -> String {
    const LIMIT: usize = 120;
    let mut out: String = source.chars().take(LIMIT).collect();
    if source.chars().count() > LIMIT {
        out.push('…');
    }
    out
}
