//! Identifier rules for constants and instance variables.

use std::sync::OnceLock;

use regex::Regex;

fn constant_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").expect("constant pattern"))
}

fn ivar_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@[A-Za-z_][A-Za-z0-9_]*$").expect("ivar pattern"))
}

pub fn is_constant_name(name: &str) -> bool {
    constant_re().is_match(name)
}

pub fn is_ivar_name(name: &str) -> bool {
    ivar_re().is_match(name)
}

/// Constant spellings an encoding name is registered under on `Encoding`.
///
/// Non-alphanumerics become `_`, a leading lowercase letter is capitalized, and
/// the all-uppercase spelling is added when it differs. Names that still do not
/// form a constant (e.g. `646`) yield nothing.
pub fn encoding_constant_names(name: &str) -> Vec<String> {
    let mut base: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if let Some(first) = base.chars().next() {
        if first.is_ascii_lowercase() {
            base.replace_range(0..1, &first.to_ascii_uppercase().to_string());
        }
    }
    let mut out = Vec::with_capacity(2);
    if is_constant_name(&base) {
        let upper = base.to_ascii_uppercase();
        out.push(base.clone());
        if upper != base {
            out.push(upper);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_names_start_uppercase() {
        assert!(is_constant_name("BasicObject"));
        assert!(is_constant_name("UTF_8"));
        assert!(!is_constant_name("kernel"));
        assert!(!is_constant_name("Foo-Bar"));
        assert!(!is_constant_name(""));
    }

    #[test]
    fn ivar_names_need_sigil() {
        assert!(is_ivar_name("@test"));
        assert!(is_ivar_name("@_x1"));
        assert!(!is_ivar_name("test"));
        assert!(!is_ivar_name("@1x"));
        assert!(!is_ivar_name("@@cvar"));
    }

    #[test]
    fn encoding_names_map_to_constants() {
        assert_eq!(encoding_constant_names("UTF-8"), vec!["UTF_8"]);
        assert_eq!(encoding_constant_names("Shift_JIS"), vec!["Shift_JIS", "SHIFT_JIS"]);
        assert_eq!(encoding_constant_names("eucJP"), vec!["EucJP", "EUCJP"]);
        assert_eq!(
            encoding_constant_names("ANSI_X3.4-1968"),
            vec!["ANSI_X3_4_1968"]
        );
        assert!(encoding_constant_names("646").is_empty());
    }
}
