//! Raw configuration sources.
//!
//! A source hands the registry untyped pairs exactly once, at startup. Type
//! checking happens in the registry, so a source may well produce values the
//! registry refuses.

use std::env::consts;
use std::path::Path;

use super::error::ConfigError;

/// Version triple reported through `MAJOR`, `MINOR` and `TEENY`.
pub const LANGUAGE_VERSION: (u32, u32, u32) = (3, 3, 0);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Nil,
    List(Vec<RawValue>),
}

impl RawValue {
    pub fn str(s: impl Into<String>) -> Self {
        RawValue::Str(s.into())
    }

    /// Class name of the value as a script would see it.
    pub fn kind(&self) -> &'static str {
        match self {
            RawValue::Str(_) => "String",
            RawValue::Int(_) => "Integer",
            RawValue::Bool(true) => "TrueClass",
            RawValue::Bool(false) => "FalseClass",
            RawValue::Nil => "NilClass",
            RawValue::List(_) => "Array",
        }
    }
}

pub trait ConfigSource {
    fn pairs(&self) -> Result<Vec<(RawValue, RawValue)>, ConfigError>;

    /// Whether the described tree is an installed one; controls `TOPDIR`.
    fn installed(&self) -> bool {
        false
    }
}

/// Table derived from the compile target and an installation prefix.
#[derive(Debug, Clone)]
pub struct BuildSource {
    pub prefix: String,
    pub enable_shared: bool,
    pub installed: bool,
}

impl Default for BuildSource {
    fn default() -> Self {
        Self {
            prefix: "/usr/local".to_string(),
            enable_shared: true,
            installed: false,
        }
    }
}

impl BuildSource {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Self::default()
        }
    }

    fn shared_library(&self) -> (String, &'static str) {
        let (major, minor, teeny) = LANGUAGE_VERSION;
        match consts::OS {
            "windows" => (format!("ruby{major}{minor}{teeny}.dll"), "PATH"),
            "macos" => (format!("libruby.{major}.{minor}.dylib"), "DYLD_LIBRARY_PATH"),
            _ => (
                format!("libruby.so.{major}.{minor}.{teeny}"),
                "LD_LIBRARY_PATH",
            ),
        }
    }
}

impl ConfigSource for BuildSource {
    fn pairs(&self) -> Result<Vec<(RawValue, RawValue)>, ConfigError> {
        let (major, minor, teeny) = LANGUAGE_VERSION;
        let version = format!("{major}.{minor}.{teeny}");
        let prefix = self.prefix.trim_end_matches('/');
        let rubylibdir = format!("{prefix}/lib/ruby/{version}");
        let arch = format!("{}-{}", consts::ARCH, consts::OS);
        let (libruby_so, libpathenv) = self.shared_library();
        let libruby_a = "libruby-static.a".to_string();
        let libruby = if self.enable_shared {
            libruby_so.clone()
        } else {
            libruby_a.clone()
        };
        let strip = if consts::OS == "macos" {
            "strip -A -n"
        } else {
            "strip -S -x"
        };

        let table: Vec<(&str, String)> = vec![
            ("prefix", prefix.to_string()),
            ("bindir", format!("{prefix}/bin")),
            ("libdir", format!("{prefix}/lib")),
            ("libdirname", "libdir".to_string()),
            ("archdir", format!("{rubylibdir}/{arch}")),
            ("rubylibdir", rubylibdir),
            ("sitelibdir", format!("{prefix}/lib/ruby/site_ruby/{version}")),
            ("arch", arch),
            ("host_os", consts::OS.to_string()),
            ("target_os", consts::OS.to_string()),
            ("DLEXT", consts::DLL_EXTENSION.to_string()),
            ("EXEEXT", consts::EXE_SUFFIX.to_string()),
            (
                "ENABLE_SHARED",
                if self.enable_shared { "yes" } else { "no" }.to_string(),
            ),
            ("LIBRUBY", libruby),
            ("LIBRUBY_SO", libruby_so),
            ("LIBRUBY_A", libruby_a),
            ("LIBPATHENV", libpathenv.to_string()),
            ("AR", "ar".to_string()),
            ("STRIP", strip.to_string()),
            ("CC", "cc".to_string()),
            ("CPP", "cc -E".to_string()),
            ("MAJOR", major.to_string()),
            ("MINOR", minor.to_string()),
            ("TEENY", teeny.to_string()),
            ("ruby_version", version.clone()),
            ("RUBY_PROGRAM_VERSION", version),
        ];
        Ok(table
            .into_iter()
            .map(|(k, v)| (RawValue::str(k), RawValue::Str(v)))
            .collect())
    }

    fn installed(&self) -> bool {
        self.installed
    }
}

/// `KEY = value` lines. `#` starts a comment line.
///
/// Quoted values are strings. Bare `nil`, `true`, `false`, integers and
/// `[a, b]` lists keep their own types; any other bare word is a string.
#[derive(Debug, Clone)]
pub struct TextSource {
    text: String,
    installed: bool,
}

impl TextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            installed: false,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        std::fs::read_to_string(path)
            .map(Self::new)
            .map_err(|e| ConfigError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
    }

    pub fn installed(mut self, installed: bool) -> Self {
        self.installed = installed;
        self
    }
}

impl ConfigSource for TextSource {
    fn pairs(&self) -> Result<Vec<(RawValue, RawValue)>, ConfigError> {
        let mut out = Vec::new();
        for (idx, line) in self.text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let malformed = || ConfigError::MalformedLine {
                line: idx + 1,
                text: trimmed.to_string(),
            };
            let (key, value) = trimmed.split_once('=').ok_or_else(malformed)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(malformed());
            }
            let value = parse_value(value.trim()).ok_or_else(malformed)?;
            out.push((RawValue::str(key), value));
        }
        Ok(out)
    }

    fn installed(&self) -> bool {
        self.installed
    }
}

fn parse_value(text: &str) -> Option<RawValue> {
    if let Some(quoted) = unquote(text) {
        return quoted.map(RawValue::Str);
    }
    if let Some(inner) = text.strip_prefix('[') {
        let inner = inner.strip_suffix(']')?.trim();
        if inner.is_empty() {
            return Some(RawValue::List(Vec::new()));
        }
        return split_items(inner)?
            .into_iter()
            .map(|item| parse_value(item.trim()))
            .collect::<Option<Vec<_>>>()
            .map(RawValue::List);
    }
    Some(match text {
        "nil" => RawValue::Nil,
        "true" => RawValue::Bool(true),
        "false" => RawValue::Bool(false),
        _ => match text.parse::<i64>() {
            Ok(n) => RawValue::Int(n),
            Err(_) => RawValue::str(text),
        },
    })
}

/// `None` if `text` is not quoted at all, `Some(None)` if the quoting is broken.
/// Splits list items on top-level commas. Commas inside quotes or nested
/// brackets stay with their item. `None` on an unterminated quote.
fn split_items(inner: &str) -> Option<Vec<&str>> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in inner.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if quote.is_some() {
        return None;
    }
    items.push(&inner[start..]);
    Some(items)
}

fn unquote(text: &str) -> Option<Option<String>> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &text[1..];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => return Some(None),
            },
            c if c == quote => {
                return Some(chars.as_str().trim().is_empty().then_some(out));
            }
            c => out.push(c),
        }
    }
    Some(None)
}

/// In-memory pairs, for embedders and tests.
#[derive(Debug, Clone, Default)]
pub struct PairsSource {
    pairs: Vec<(RawValue, RawValue)>,
    installed: bool,
}

impl PairsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn str(self, key: &str, value: &str) -> Self {
        self.raw(RawValue::str(key), RawValue::str(value))
    }

    pub fn raw(mut self, key: RawValue, value: RawValue) -> Self {
        self.pairs.push((key, value));
        self
    }

    pub fn installed(mut self, installed: bool) -> Self {
        self.installed = installed;
        self
    }
}

impl ConfigSource for PairsSource {
    fn pairs(&self) -> Result<Vec<(RawValue, RawValue)>, ConfigError> {
        Ok(self.pairs.clone())
    }

    fn installed(&self) -> bool {
        self.installed
    }
}
