//! Template-to-pattern compiler.
//!
//! A template is tokenized into literal spans and `{name}` placeholder spans,
//! and the tokens feed a pattern builder with an explicit substitution table:
//!
//! | placeholder            | pattern                          |
//! |------------------------|----------------------------------|
//! | first `{otp}`          | named capture, 3-12 of `[A-Za-z0-9-]` |
//! | later `{otp}`          | same character class, unnamed group |
//! | `{random}`             | 3-15 alphanumerics               |
//! | `{date}` `{datetime}` `{time}` and anything else | unbounded wildcard |
//!
//! Literal text is regex-escaped, then made tolerant of carrier noise:
//! whitespace runs match zero-or-more whitespace, colons become optional
//! (ASCII or fullwidth), and periods become unbounded wildcards. The period
//! rewrite is deliberately broad and can over-match; it exists to survive
//! gateways that drop or duplicate punctuation and is kept as-is rather than
//! tightened.
//!
//! Templates without an `{otp}` placeholder compile to nothing: an order
//! carrying only such templates can never capture a code.

use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Pattern for the first `{otp}` occurrence: the only named capture.
const OTP_CAPTURE: &str = r"(?P<otp>[A-Za-z0-9\-]{3,12})";

/// Later `{otp}` occurrences become plain groups so a template repeating the
/// placeholder does not produce a duplicate capture name.
const OTP_GROUP: &str = r"([A-Za-z0-9\-]{3,12})";

/// Pattern for `{random}`.
const RANDOM: &str = "[A-Za-z0-9]{3,15}";

/// Unbounded wildcard used for date/time and unknown placeholders.
const WILDCARD: &str = ".*";

/// Collapses line breaks and whitespace runs into single spaces and trims.
///
/// Applied to both templates and candidate messages, which neutralizes SMS
/// gateway line-wrapping: two texts that differ only in where line breaks
/// fall normalize to identical strings.
pub fn normalize_single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One span of a tokenized template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    /// Literal text to match (after tolerance rewrites)
    Literal(&'a str),
    /// A `{name}` placeholder; holds the inner name, possibly empty
    Placeholder(&'a str),
}

/// Splits a normalized template into literal and placeholder spans.
///
/// A `{` opens a placeholder ending at the next `}`; an unterminated `{`
/// is treated as literal text.
fn tokenize(template: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        match rest[open..].find('}') {
            Some(close) => {
                if open > 0 {
                    tokens.push(Token::Literal(&rest[..open]));
                }
                tokens.push(Token::Placeholder(&rest[open + 1..open + close]));
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    if !rest.is_empty() {
        tokens.push(Token::Literal(rest));
    }
    tokens
}

/// Escapes a literal span and applies the whitespace/punctuation tolerance
/// rewrites.
fn literal_pattern(literal: &str) -> String {
    let mut pattern = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            pattern.push_str(r"\s*");
        } else if c == ':' {
            pattern.push_str("[:：]?");
        } else if c == '.' {
            pattern.push_str(WILDCARD);
        } else {
            pattern.push_str(&regex::escape(&c.to_string()));
        }
    }
    pattern
}

/// Builds the full pattern for a tokenized template, or `None` when the
/// template carries no `{otp}` placeholder.
fn build_pattern(tokens: &[Token<'_>]) -> Option<String> {
    if !tokens
        .iter()
        .any(|t| matches!(t, Token::Placeholder(name) if name.eq_ignore_ascii_case("otp")))
    {
        return None;
    }

    let mut pattern = String::new();
    let mut otp_seen = false;
    for token in tokens {
        match token {
            Token::Literal(text) => pattern.push_str(&literal_pattern(text)),
            Token::Placeholder(name) if name.eq_ignore_ascii_case("otp") => {
                pattern.push_str(if otp_seen { OTP_GROUP } else { OTP_CAPTURE });
                otp_seen = true;
            }
            Token::Placeholder(name) if name.eq_ignore_ascii_case("random") => {
                pattern.push_str(RANDOM);
            }
            Token::Placeholder(_) => pattern.push_str(WILDCARD),
        }
    }
    Some(pattern)
}

/// A compiled matcher for one template.
#[derive(Debug, Clone)]
pub struct OtpMatcher {
    regex: Regex,
}

impl OtpMatcher {
    /// Compiles a single template; `None` when it has no `{otp}` placeholder
    /// or the built pattern fails to compile.
    pub fn compile(template: &str) -> Option<Self> {
        let normalized = normalize_single_line(template);
        let pattern = build_pattern(&tokenize(&normalized))?;

        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => Some(Self { regex }),
            Err(e) => {
                warn!(template = %template, error = %e, "skipping uncompilable template");
                None
            }
        }
    }

    /// Runs the matcher against an already-normalized message, returning the
    /// captured OTP on success.
    pub fn extract(&self, normalized: &str) -> Option<String> {
        let captures = self.regex.captures(normalized)?;
        captures
            .name("otp")
            .or_else(|| captures.get(1))
            .map(|m| m.as_str().to_string())
    }
}

/// An ordered set of matchers compiled from an order's template list.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    matchers: Vec<OtpMatcher>,
}

impl TemplateSet {
    /// Compiles a template list, preserving order and dropping templates
    /// without `{otp}`.
    pub fn compile(templates: &[String]) -> Self {
        Self {
            matchers: templates
                .iter()
                .filter_map(|t| OtpMatcher::compile(t))
                .collect(),
        }
    }

    /// Number of usable matchers
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Whether no template produced a matcher
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Normalizes the message and returns the first matcher's capture.
    pub fn extract(&self, message: &str) -> Option<String> {
        let normalized = normalize_single_line(message);
        self.matchers.iter().find_map(|m| m.extract(&normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(templates: &[&str]) -> TemplateSet {
        TemplateSet::compile(&templates.iter().map(|t| t.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_normalize_collapses_breaks_and_runs() {
        assert_eq!(
            normalize_single_line("Your  OTP\r\nis\n 1234 \t now"),
            "Your OTP is 1234 now"
        );
        assert_eq!(normalize_single_line("  trimmed  "), "trimmed");
    }

    #[test]
    fn test_template_without_otp_yields_no_matcher() {
        let set = set(&["Your code arrives at {time}", "hello world"]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_basic_capture() {
        let set = set(&["OTP is {otp}"]);
        assert_eq!(
            set.extract("Your OTP is 482991 today"),
            Some("482991".to_string())
        );
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let set = set(&["OTP is {otp}"]);
        assert_eq!(set.extract("your otp IS 4829"), Some("4829".to_string()));
    }

    #[test]
    fn test_duplicate_otp_placeholder_compiles() {
        let set = set(&["Code {otp} repeat {otp}"]);
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.extract("Code 123456 repeat 123456"),
            Some("123456".to_string())
        );
    }

    #[test]
    fn test_first_matching_template_wins() {
        let set = set(&["code: {otp}", "{otp} is your code"]);
        assert_eq!(set.extract("code: 111222"), Some("111222".to_string()));
        assert_eq!(set.extract("333444 is your code"), Some("333444".to_string()));
    }

    #[test]
    fn test_whitespace_tolerance_against_line_breaks() {
        let set = set(&["Use {otp} to log in to your account. Do not share it."]);
        let wrapped = "Use 98-4412 to log\nin to your\r\naccount. Do not\nshare it.";
        assert_eq!(set.extract(wrapped), Some("98-4412".to_string()));
    }

    #[test]
    fn test_multiline_template_matches_single_line_message() {
        let set = set(&["Your login\ncode is {otp}.\nValid for 10 minutes."]);
        assert_eq!(
            set.extract("Your login code is 777888. Valid for 10 minutes."),
            Some("777888".to_string())
        );
    }

    #[test]
    fn test_colon_tolerance() {
        let set = set(&["OTP: {otp}"]);
        assert_eq!(set.extract("OTP: 1234"), Some("1234".to_string()));
        assert_eq!(set.extract("OTP 1234"), Some("1234".to_string()));
        assert_eq!(set.extract("OTP： 1234"), Some("1234".to_string()));
    }

    #[test]
    fn test_period_acts_as_wildcard() {
        let set = set(&["Code {otp}. Thanks"]);
        assert_eq!(
            set.extract("Code 5566 -- carrier footer -- Thanks"),
            Some("5566".to_string())
        );
    }

    #[test]
    fn test_date_time_and_unknown_placeholders_are_wildcards() {
        let set = set(&["{service} code {otp} sent {datetime} expires {time} on {date}"]);
        assert_eq!(
            set.extract("AcmePay code 909090 sent 2024-05-01 10:12 expires 10:17 on 2024-05-01"),
            Some("909090".to_string())
        );
    }

    #[test]
    fn test_random_placeholder_bounds() {
        let set = set(&["ref {random} code {otp}"]);
        assert_eq!(set.extract("ref Xy91zQ code 445566"), Some("445566".to_string()));
        // A two-char run cannot satisfy {random}'s 3-15 alphanumerics
        assert_eq!(set.extract("ref ab code 445566"), None);
    }

    #[test]
    fn test_otp_length_bounds() {
        let set = set(&["pin {otp} end"]);
        assert_eq!(set.extract("pin 12 end"), None, "too short");
        assert_eq!(set.extract("pin 123 end"), Some("123".to_string()));
        assert_eq!(
            set.extract("pin ABC-123-XYZ9 end"),
            Some("ABC-123-XYZ9".to_string())
        );
    }

    #[test]
    fn test_regex_metacharacters_in_template_are_literal() {
        let set = set(&["(Acme) [alert] code {otp}"]);
        assert_eq!(
            set.extract("(Acme) [alert] code 2468"),
            Some("2468".to_string())
        );
        assert_eq!(set.extract("Acme alert code 2468"), None);
    }

    #[test]
    fn test_unterminated_brace_is_literal() {
        let set = set(&["code {otp} brace {oops"]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.extract("code 1357 brace {oops"), Some("1357".to_string()));
    }

    #[test]
    fn test_empty_placeholder_is_wildcard() {
        let set = set(&["code {otp} {}"]);
        assert_eq!(set.extract("code 8642 whatever"), Some("8642".to_string()));
    }

    #[test]
    fn test_placeholder_name_case_insensitive() {
        let set = set(&["code {OTP} at {TIME}"]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.extract("code 1199 at 10:30"), Some("1199".to_string()));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let templates = vec!["OTP is {otp}".to_string(), "no placeholder".to_string()];
        let a = TemplateSet::compile(&templates);
        let b = TemplateSet::compile(&templates);
        assert_eq!(a.len(), b.len());
        assert_eq!(a.extract("OTP is 5555"), b.extract("OTP is 5555"));
    }
}
