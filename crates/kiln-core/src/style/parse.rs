//! Restricted configuration evaluation.
//!
//! Override configurations arrive as source text and are treated as small
//! programs, but they are never executed. The text is normalized (comments
//! stripped, string-aware), structurally matched for a single top-level
//! module-export assignment of an object literal, and that literal is then
//! evaluated by a closed recursive-descent evaluator. The evaluator
//! understands literals, identifier bindings declared before the
//! assignment, spreads, and function literals (captured as source text),
//! and nothing else. There is no module slot beyond the export itself and
//! no ambient process or filesystem capability to reach.

use std::fmt;

use crate::style::value::{ConfigValue, FunctionSource};

/// Evaluation failure. Recovered by the style compiler's fallback cascade,
/// never surfaced past it.
#[derive(Debug, Clone)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Evaluate a configuration source into a value tree.
///
/// Fails if the text contains no `module.exports = { … }` (or
/// `export default { … }`) assignment, or if anything it needs to evaluate
/// falls outside the restricted grammar.
pub fn evaluate_config(source: &str) -> Result<ConfigValue, EvalError> {
    let stripped = strip_comments(source);
    let export = find_export_assignment(&stripped)
        .ok_or_else(|| EvalError::new("no top-level module export assignment found"))?;

    let mut parser = Parser::new(&stripped[..export.prelude_end]);
    parser.eval_prelude()?;

    let mut object_parser = Parser::with_env(&stripped[export.object_start..], parser.env);
    let value = object_parser.parse_value()?;

    match value {
        ConfigValue::Object(_) => Ok(value),
        _ => Err(EvalError::new("module export is not an object literal")),
    }
}

/// Byte offsets of a structural export match.
struct ExportMatch {
    /// End of the text preceding the assignment.
    prelude_end: usize,
    /// Start of the exported object literal (the `{`).
    object_start: usize,
}

/// Locate `module.exports = {` or `export default {` outside string
/// literals. Returns `None` when no such assignment exists.
fn find_export_assignment(src: &str) -> Option<ExportMatch> {
    let bytes = src.as_bytes();
    let mut i = 0;
    let mut string_delim: Option<u8> = None;

    while i < bytes.len() {
        let b = bytes[i];

        if let Some(delim) = string_delim {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == delim {
                string_delim = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'"' | b'\'' | b'`' => {
                string_delim = Some(b);
                i += 1;
            }
            b'm' if src[i..].starts_with("module.exports") => {
                if let Some(object_start) = match_assignment_tail(src, i + "module.exports".len())
                {
                    return Some(ExportMatch {
                        prelude_end: i,
                        object_start,
                    });
                }
                i += 1;
            }
            b'e' if src[i..].starts_with("export default") => {
                let rest = i + "export default".len();
                let object_start = rest + src[rest..].len() - src[rest..].trim_start().len();
                if src[object_start..].starts_with('{') {
                    return Some(ExportMatch {
                        prelude_end: i,
                        object_start,
                    });
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    None
}

/// After `module.exports`, expect `=` then `{`; returns the offset of `{`.
fn match_assignment_tail(src: &str, from: usize) -> Option<usize> {
    let after = &src[from..];
    let mut idx = from + (after.len() - after.trim_start().len());
    if !src[idx..].starts_with('=') {
        return None;
    }
    idx += 1;
    let after_eq = &src[idx..];
    idx += after_eq.len() - after_eq.trim_start().len();
    if src[idx..].starts_with('{') { Some(idx) } else { None }
}

/// Strip line and block comments, string-aware. Comment bytes are replaced
/// with spaces so surrounding offsets stay meaningful.
pub fn strip_comments(src: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Normal,
        Line,
        Block,
        Str(char),
    }

    let mut out = String::with_capacity(src.len());
    let mut state = State::Normal;
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Normal => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Line;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Block;
                }
                '"' | '\'' | '`' => {
                    out.push(c);
                    state = State::Str(c);
                }
                c => out.push(c),
            },
            State::Line => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Normal;
                } else {
                    out.push(' ');
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Normal;
                } else {
                    out.push(if c == '\n' { '\n' } else { ' ' });
                }
            }
            State::Str(delim) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == delim {
                    state = State::Normal;
                }
            }
        }
    }

    out
}

/// Identifier bindings visible to the exported object literal.
type Env = Vec<(String, ConfigValue)>;

/// Recursive-descent evaluator over comment-stripped source.
struct Parser {
    chars: Vec<char>,
    pos: usize,
    env: Env,
    /// End offset of the most recent balanced scan; `scan_balanced` must
    /// not move the cursor, since arrow detection needs lookahead.
    last_scan_end: usize,
}

impl Parser {
    fn new(src: &str) -> Self {
        Self::with_env(src, Vec::new())
    }

    fn with_env(src: &str, env: Env) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            env,
            last_scan_end: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> EvalError {
        EvalError::new(format!("{} at offset {}", message.into(), self.pos))
    }

    fn expect(&mut self, c: char) -> Result<(), EvalError> {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}", c)))
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        let needle: Vec<char> = s.chars().collect();
        self.chars[self.pos..].starts_with(&needle)
    }

    fn read_identifier(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '$') {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(self.chars[start..self.pos].iter().collect())
        }
    }

    /// Evaluate the statements preceding the export assignment. Only
    /// `const`/`let`/`var` bindings of restricted expressions are allowed;
    /// anything else aborts evaluation (and with it, the override).
    fn eval_prelude(&mut self) -> Result<(), EvalError> {
        loop {
            self.skip_ws();
            while self.peek() == Some(';') {
                self.pos += 1;
                self.skip_ws();
            }
            if self.pos >= self.chars.len() {
                return Ok(());
            }

            // "use strict" and friends.
            if matches!(self.peek(), Some('"') | Some('\'')) {
                let _ = self.parse_value()?;
                continue;
            }

            let keyword = self
                .read_identifier()
                .ok_or_else(|| self.error("unsupported statement in prelude"))?;

            if keyword != "const" && keyword != "let" && keyword != "var" {
                return Err(self.error(format!(
                    "unsupported prelude statement starting with {:?}",
                    keyword
                )));
            }

            let name = self
                .read_identifier()
                .ok_or_else(|| self.error("expected binding name"))?;
            self.expect('=')?;
            let value = self.parse_value()?;
            self.env.push((name, value));
        }
    }

    fn parse_value(&mut self) -> Result<ConfigValue, EvalError> {
        self.skip_ws();

        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') | Some('\'') => self.parse_string(),
            Some('`') => self.parse_template(),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '.' => self.parse_number(),
            Some('(') => self.parse_paren_or_arrow(),
            Some(_) => self.parse_word(),
        }
    }

    fn parse_object(&mut self) -> Result<ConfigValue, EvalError> {
        self.expect('{')?;
        let mut pairs: Vec<(String, ConfigValue)> = Vec::new();

        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(ConfigValue::Object(pairs));
                }
                Some(',') => {
                    self.pos += 1;
                }
                Some('.') if self.starts_with("...") => {
                    self.pos += 3;
                    let spread = self.parse_value()?;
                    match spread {
                        ConfigValue::Object(inner) => {
                            for (key, value) in inner {
                                if let Some(slot) =
                                    pairs.iter_mut().find(|(k, _)| *k == key)
                                {
                                    slot.1 = value;
                                } else {
                                    pairs.push((key, value));
                                }
                            }
                        }
                        _ => return Err(self.error("spread of a non-object value")),
                    }
                }
                Some(_) => {
                    let key = self.parse_object_key()?;
                    self.skip_ws();

                    // Method shorthand: `key(params) { body }`.
                    if self.peek() == Some('(') {
                        let captured = self.capture_function_from_params()?;
                        pairs.push((
                            key.clone(),
                            ConfigValue::Function(FunctionSource {
                                name: Some(key),
                                source: format!("function {}", captured),
                            }),
                        ));
                        continue;
                    }

                    self.expect(':')?;
                    let value = self.parse_value()?;
                    pairs.push((key, value));
                }
                None => return Err(self.error("unterminated object literal")),
            }
        }
    }

    fn parse_object_key(&mut self) -> Result<String, EvalError> {
        self.skip_ws();
        match self.peek() {
            Some('"') | Some('\'') => match self.parse_string()? {
                ConfigValue::String(s) => Ok(s),
                _ => unreachable!(),
            },
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
                    self.pos += 1;
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
            _ => self
                .read_identifier()
                .ok_or_else(|| self.error("expected object key")),
        }
    }

    fn parse_array(&mut self) -> Result<ConfigValue, EvalError> {
        self.expect('[')?;
        let mut items = Vec::new();

        loop {
            self.skip_ws();
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    return Ok(ConfigValue::Array(items));
                }
                Some(',') => {
                    self.pos += 1;
                }
                Some('.') if self.starts_with("...") => {
                    self.pos += 3;
                    match self.parse_value()? {
                        ConfigValue::Array(inner) => items.extend(inner),
                        _ => return Err(self.error("spread of a non-array value")),
                    }
                }
                Some(_) => items.push(self.parse_value()?),
                None => return Err(self.error("unterminated array literal")),
            }
        }
    }

    fn parse_string(&mut self) -> Result<ConfigValue, EvalError> {
        self.skip_ws();
        let delim = self.bump().ok_or_else(|| self.error("expected string"))?;
        let mut out = String::new();

        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string literal")),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(other) => out.push(other),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) if c == delim => return Ok(ConfigValue::String(out)),
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_template(&mut self) -> Result<ConfigValue, EvalError> {
        self.expect('`')?;
        let mut out = String::new();

        loop {
            match self.bump() {
                None => return Err(self.error("unterminated template literal")),
                Some('\\') => match self.bump() {
                    Some(other) => out.push(other),
                    None => return Err(self.error("unterminated escape")),
                },
                Some('$') if self.peek() == Some('{') => {
                    return Err(self.error("template interpolation is not supported"));
                }
                Some('`') => return Ok(ConfigValue::String(out)),
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_number(&mut self) -> Result<ConfigValue, EvalError> {
        self.skip_ws();
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '+' || c == '-')
        {
            self.pos += 1;
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map(ConfigValue::Number)
            .map_err(|_| self.error(format!("invalid number {:?}", text)))
    }

    /// `(` either opens an arrow function's parameter list or a
    /// parenthesized expression.
    fn parse_paren_or_arrow(&mut self) -> Result<ConfigValue, EvalError> {
        let start = self.pos;
        let params_end = self.scan_balanced('(', ')')?;

        let mut probe = params_end;
        while matches!(self.chars.get(probe), Some(c) if c.is_whitespace()) {
            probe += 1;
        }

        if self.chars.get(probe) == Some(&'=') && self.chars.get(probe + 1) == Some(&'>') {
            let source = self.capture_arrow_from(start, probe + 2)?;
            return Ok(ConfigValue::Function(FunctionSource {
                name: None,
                source,
            }));
        }

        // Parenthesized expression: evaluate the inside.
        self.pos = start;
        self.expect('(')?;
        let value = self.parse_value()?;
        self.expect(')')?;
        Ok(value)
    }

    /// Identifier-leading value: keyword literal, single-parameter arrow,
    /// `function` literal, or an environment lookup with an optional
    /// member-access chain.
    fn parse_word(&mut self) -> Result<ConfigValue, EvalError> {
        self.skip_ws();
        let start = self.pos;

        let after_keyword = self.chars.get(self.pos + "function".len()).copied();
        if self.starts_with("function")
            && !matches!(after_keyword, Some(c) if c.is_alphanumeric() || c == '_' || c == '$')
        {
            return self.capture_function_literal();
        }

        let word = self
            .read_identifier()
            .ok_or_else(|| self.error("expected a value"))?;

        // Single-parameter arrow: `theme => …`.
        let mut probe = self.pos;
        while matches!(self.chars.get(probe), Some(c) if c.is_whitespace()) {
            probe += 1;
        }
        if self.chars.get(probe) == Some(&'=') && self.chars.get(probe + 1) == Some(&'>') {
            let source = self.capture_arrow_from(start, probe + 2)?;
            return Ok(ConfigValue::Function(FunctionSource {
                name: None,
                source,
            }));
        }

        match word.as_str() {
            "true" => return Ok(ConfigValue::Bool(true)),
            "false" => return Ok(ConfigValue::Bool(false)),
            "null" | "undefined" => return Ok(ConfigValue::Null),
            "require" => {
                return Err(self.error("require() is not available in override configs"));
            }
            _ => {}
        }

        let mut value = self
            .env
            .iter()
            .rev()
            .find(|(name, _)| *name == word)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| self.error(format!("unknown identifier {:?}", word)))?;

        // Member access chain: `colors.red` or `colors["red"]`.
        loop {
            self.skip_ws();
            if self.peek() == Some('.') && !self.starts_with("...") {
                self.pos += 1;
                let member = self
                    .read_identifier()
                    .ok_or_else(|| self.error("expected member name"))?;
                value = value
                    .get(&member)
                    .cloned()
                    .ok_or_else(|| self.error(format!("unknown member {:?}", member)))?;
            } else if self.peek() == Some('[') {
                self.pos += 1;
                let key = match self.parse_value()? {
                    ConfigValue::String(s) => s,
                    ConfigValue::Number(n) => {
                        if n.fract() == 0.0 {
                            format!("{}", n as i64)
                        } else {
                            format!("{}", n)
                        }
                    }
                    _ => return Err(self.error("unsupported computed member key")),
                };
                self.expect(']')?;
                value = value
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| self.error(format!("unknown member {:?}", key)))?;
            } else {
                return Ok(value);
            }
        }
    }

    /// Capture a `function` literal's source verbatim.
    fn capture_function_literal(&mut self) -> Result<ConfigValue, EvalError> {
        let start = self.pos;
        self.pos += "function".len();

        let name = self.read_identifier();
        self.skip_ws();
        self.scan_balanced('(', ')')?;
        self.pos = self.last_scan_end;
        self.skip_ws();
        self.scan_balanced('{', '}')?;
        self.pos = self.last_scan_end;

        let source: String = self.chars[start..self.pos].iter().collect();
        Ok(ConfigValue::Function(FunctionSource { name, source }))
    }

    /// Capture `(params) { body }` starting at the parameter list; the
    /// cursor must sit on `(`. Used for object method shorthand.
    fn capture_function_from_params(&mut self) -> Result<String, EvalError> {
        let start = self.pos;
        self.scan_balanced('(', ')')?;
        self.pos = self.last_scan_end;
        self.skip_ws();
        self.scan_balanced('{', '}')?;
        self.pos = self.last_scan_end;
        Ok(self.chars[start..self.pos].iter().collect())
    }

    /// Capture an arrow function's full source, given the offset where its
    /// literal starts and the offset just past `=>`.
    fn capture_arrow_from(&mut self, start: usize, body_start: usize) -> Result<String, EvalError> {
        self.pos = body_start;
        self.skip_ws();

        if self.peek() == Some('{') {
            self.scan_balanced('{', '}')?;
            self.pos = self.last_scan_end;
        } else {
            // Expression body: consume until a delimiter at depth zero.
            let mut depth: i32 = 0;
            let mut string_delim: Option<char> = None;
            while let Some(c) = self.peek() {
                if let Some(delim) = string_delim {
                    if c == '\\' {
                        self.pos += 2;
                        continue;
                    }
                    if c == delim {
                        string_delim = None;
                    }
                    self.pos += 1;
                    continue;
                }
                match c {
                    '"' | '\'' | '`' => {
                        string_delim = Some(c);
                        self.pos += 1;
                    }
                    '(' | '[' | '{' => {
                        depth += 1;
                        self.pos += 1;
                    }
                    ')' | ']' | '}' => {
                        if depth == 0 {
                            break;
                        }
                        depth -= 1;
                        self.pos += 1;
                    }
                    ',' | ';' if depth == 0 => break,
                    _ => self.pos += 1,
                }
            }
        }

        Ok(self.chars[start..self.pos].iter().collect::<String>().trim_end().to_string())
    }

    /// Scan a balanced bracket pair starting at the cursor, string-aware.
    /// Leaves the cursor untouched and records the end in `last_scan_end`.
    fn scan_balanced(&mut self, open: char, close: char) -> Result<usize, EvalError> {
        self.skip_ws();
        if self.peek() != Some(open) {
            return Err(self.error(format!("expected {:?}", open)));
        }

        let mut i = self.pos;
        let mut depth = 0;
        let mut string_delim: Option<char> = None;

        while let Some(&c) = self.chars.get(i) {
            if let Some(delim) = string_delim {
                if c == '\\' {
                    i += 2;
                    continue;
                }
                if c == delim {
                    string_delim = None;
                }
                i += 1;
                continue;
            }
            match c {
                '"' | '\'' | '`' => string_delim = Some(c),
                c if c == open => depth += 1,
                c if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        self.last_scan_end = i + 1;
                        return Ok(i + 1);
                    }
                }
                _ => {}
            }
            i += 1;
        }

        Err(self.error(format!("unbalanced {:?}", open)))
    }
}
