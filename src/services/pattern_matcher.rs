//! Glob-style URL pattern matching for the whitelist.
//!
//! `*` matches any run of characters (including none), `?` matches exactly one
//! character, everything else matches itself. Patterns are anchored at both
//! ends, so a pattern must describe the whole URL.

use regex::Regex;
use tracing::warn;

/// A compiled whitelist pattern.
#[derive(Debug, Clone)]
pub struct Matcher {
    pattern: String,
    compiled: Compiled,
}

#[derive(Debug, Clone)]
enum Compiled {
    Regex(Regex),
    /// Used when the regex engine refuses the translation (size limits only).
    Exact,
}

/// Translate a glob into an anchored regular expression source string.
///
/// Literal runs are escaped before the wildcard translations are inserted, so
/// `.`, `+`, `(` and friends in real URLs keep their literal meaning.
pub fn glob_to_regex(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("(?s)^");
    let mut literal = String::new();
    for ch in pattern.chars() {
        match ch {
            '*' | '?' => {
                source.push_str(&regex::escape(&literal));
                literal.clear();
                source.push_str(if ch == '*' { ".*" } else { "." });
            }
            _ => literal.push(ch),
        }
    }
    source.push_str(&regex::escape(&literal));
    source.push('$');
    source
}

/// Compile a glob pattern. Never fails: any string is a valid pattern.
pub fn compile(pattern: &str) -> Matcher {
    let compiled = match Regex::new(&glob_to_regex(pattern)) {
        Ok(re) => Compiled::Regex(re),
        Err(e) => {
            warn!(pattern, error = %e, "whitelist pattern too large for regex, matching it literally");
            Compiled::Exact
        }
    };
    Matcher {
        pattern: pattern.to_string(),
        compiled,
    }
}

impl Matcher {
    pub fn test(&self, url: &str) -> bool {
        match &self.compiled {
            Compiled::Regex(re) => re.is_match(url),
            Compiled::Exact => self.pattern == url,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// A set of compiled patterns. Matches a URL if any member does.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    matchers: Vec<Matcher>,
}

impl PatternSet {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            matchers: patterns.into_iter().map(|p| compile(p.as_ref())).collect(),
        }
    }

    pub fn push(&mut self, pattern: &str) {
        self.matchers.push(compile(pattern));
    }

    pub fn matches(&self, url: &str) -> bool {
        self.matchers.iter().any(|m| m.test(url))
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Patterns in the order they were added.
    pub fn patterns(&self) -> Vec<&str> {
        self.matchers.iter().map(Matcher::pattern).collect()
    }
}
