use regex::Regex;

/// Decides which cookie names a pattern operation applies to.
///
/// It is implemented for [`Regex`] and for closures taking a name:
///
/// ```rust
/// use amaretti::NameMatcher;
/// use regex::Regex;
///
/// let regex = Regex::new("^test_").unwrap();
/// assert!(regex.is_match_name("test_cookie"));
///
/// let prefix = |name: &str| name.starts_with("test_");
/// assert!(prefix.is_match_name("test_cookie"));
/// assert!(!prefix.is_match_name("other"));
/// ```
pub trait NameMatcher {
    /// Returns `true` if the cookie called `name` matches.
    fn is_match_name(&self, name: &str) -> bool;
}

impl NameMatcher for Regex {
    fn is_match_name(&self, name: &str) -> bool {
        self.is_match(name)
    }
}

impl<F> NameMatcher for F
where
    F: Fn(&str) -> bool,
{
    fn is_match_name(&self, name: &str) -> bool {
        self(name)
    }
}

/// Compiles a cookie name pattern.
pub(crate) fn compile(pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError {
        pattern: pattern.to_owned(),
        source,
    })
}

#[derive(Debug, thiserror::Error)]
#[error("`{pattern}` is not a valid cookie name pattern")]
/// The error returned when a cookie name pattern is not a valid regular expression.
pub struct PatternError {
    pattern: String,
    #[source]
    source: regex::Error,
}

impl PatternError {
    /// The pattern that failed to compile.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
