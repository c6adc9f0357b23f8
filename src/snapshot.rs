use indexmap::map::Values;
use indexmap::IndexMap;

use crate::encoding::decode;
use crate::Cookie;

#[derive(Default, Debug, Clone)]
/// All the cookies visible to the current request, keyed by name.
///
/// Names are unique within a snapshot: inserting a cookie with a name that is
/// already present replaces the previous cookie, which keeps its position.
/// Iteration follows insertion order.
///
/// # Example
///
/// ```rust
/// use amaretti::{Cookie, CookieSnapshot};
///
/// let mut cookies = CookieSnapshot::new();
/// cookies.insert(Cookie::new("first", "1"));
/// cookies.insert(Cookie::new("second", "2"));
/// cookies.insert(Cookie::new("first", "one"));
///
/// let pairs: Vec<_> = cookies.iter().map(|c| (c.name(), c.value())).collect();
/// assert_eq!(pairs, [("first", "one"), ("second", "2")]);
/// ```
pub struct CookieSnapshot {
    cookies: IndexMap<String, Cookie<'static>>,
}

impl CookieSnapshot {
    /// Creates a new, empty [`CookieSnapshot`].
    pub fn new() -> CookieSnapshot {
        Default::default()
    }

    /// Inserts a cookie, replacing any cookie with the same name.
    ///
    /// Returns the cookie that was replaced, if any.
    pub fn insert<'c, C>(&mut self, cookie: C) -> Option<Cookie<'static>>
    where
        C: Into<Cookie<'c>>,
    {
        let cookie = cookie.into().into_owned();
        self.cookies.insert(cookie.name().to_owned(), cookie)
    }

    /// Removes the cookie with the given name, returning it if it was present.
    ///
    /// The remaining cookies keep their relative order.
    pub fn remove(&mut self, name: &str) -> Option<Cookie<'static>> {
        self.cookies.shift_remove(name)
    }

    /// Get a cookie by name.
    pub fn get(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.get(name)
    }

    /// Returns `true` if a cookie with the given name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// The number of cookies in the snapshot.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` if the snapshot holds no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Removes every cookie from the snapshot.
    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Iterates over the cookies, in insertion order.
    pub fn iter(&self) -> Values<'_, String, Cookie<'static>> {
        self.cookies.values()
    }

    /// Iterates over the cookie names, in insertion order.
    pub fn names(&self) -> impl DoubleEndedIterator<Item = &str> + '_ {
        self.cookies.keys().map(String::as_str)
    }

    /// Parse a `Cookie` header value into a [`CookieSnapshot`].
    ///
    /// If `percent_decode` is `true`, names and values are percent-decoded.
    /// When the same name appears more than once, the first occurrence wins.
    ///
    /// ```rust
    /// use amaretti::CookieSnapshot;
    ///
    /// let cookies = CookieSnapshot::parse_header("name=a%20value; other=1; name=ignored", true).unwrap();
    /// assert_eq!(cookies.len(), 2);
    /// assert_eq!(cookies.get("name").unwrap().value(), "a value");
    /// ```
    pub fn parse_header(header: &str, percent_decode: bool) -> Result<CookieSnapshot, ParseError> {
        Self::parse_headers(std::iter::once(header), percent_decode)
    }

    /// Parse multiple `Cookie` header values into a [`CookieSnapshot`].
    pub fn parse_headers<'h, I>(headers: I, percent_decode: bool) -> Result<CookieSnapshot, ParseError>
    where
        I: IntoIterator<Item = &'h str>,
    {
        let mut cookies = CookieSnapshot::new();
        for header in headers {
            cookies.extend_from_header(header, percent_decode)?;
        }
        Ok(cookies)
    }

    /// Parse a `Cookie` header value and add its cookies to the existing snapshot.
    ///
    /// Cookies whose name is already present are skipped.
    pub fn extend_from_header(&mut self, header: &str, percent_decode: bool) -> Result<(), ParseError> {
        for fragment in header.split(';') {
            if fragment.chars().all(char::is_whitespace) {
                continue;
            }

            let (name, value) = match fragment.split_once('=') {
                Some((name, value)) => (name.trim(), value.trim()),
                None => {
                    return Err(ParseError::MissingPair(MissingPairError {
                        fragment: fragment.to_string(),
                    }));
                }
            };

            if name.is_empty() {
                return Err(ParseError::EmptyName(EmptyNameError {
                    value: value.to_string(),
                }));
            }

            let cookie = if percent_decode {
                let decoded_name = decode(name).map_err(|e| DecodingError {
                    raw_value: name.to_string(),
                    source: anyhow::Error::new(e).context("Failed to percent-decode the cookie name"),
                })?;
                let decoded_value = decode(value).map_err(|e| DecodingError {
                    raw_value: value.to_string(),
                    source: anyhow::Error::new(e).context(format!(
                        "Failed to percent-decode the value of the `{decoded_name}` cookie"
                    )),
                })?;
                Cookie::new(decoded_name.into_owned(), decoded_value.into_owned())
            } else {
                Cookie::new(name.to_owned(), value.to_owned())
            };

            if self.contains(cookie.name()) {
                tracing::debug!(
                    name = cookie.name(),
                    "skipping a duplicate cookie from the `Cookie` header"
                );
                continue;
            }
            self.insert(cookie);
        }
        Ok(())
    }
}

impl<'c> FromIterator<Cookie<'c>> for CookieSnapshot {
    fn from_iter<I: IntoIterator<Item = Cookie<'c>>>(iter: I) -> Self {
        let mut snapshot = CookieSnapshot::new();
        for cookie in iter {
            snapshot.insert(cookie);
        }
        snapshot
    }
}

impl<'a> IntoIterator for &'a CookieSnapshot {
    type Item = &'a Cookie<'static>;
    type IntoIter = Values<'a, String, Cookie<'static>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug)]
#[non_exhaustive]
/// The error returned by [`CookieSnapshot::parse_header()`].
pub enum ParseError {
    MissingPair(MissingPairError),
    EmptyName(EmptyNameError),
    Decoding(DecodingError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse cookies out of a header value")
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::MissingPair(e) => Some(e),
            ParseError::EmptyName(e) => Some(e),
            ParseError::Decoding(e) => Some(e),
        }
    }
}

impl From<DecodingError> for ParseError {
    fn from(value: DecodingError) -> Self {
        ParseError::Decoding(value)
    }
}

#[derive(Debug)]
/// A fragment of a `Cookie` header value without a name-value separator (`=`).
pub struct MissingPairError {
    fragment: String,
}

impl std::fmt::Display for MissingPairError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Expected a name-value pair, but no `=` was found in `{}`",
            self.fragment
        )
    }
}

impl std::error::Error for MissingPairError {}

#[derive(Debug)]
/// A fragment of a `Cookie` header value with an empty name (e.g. `=value`).
pub struct EmptyNameError {
    value: String,
}

impl std::fmt::Display for EmptyNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The name of a cookie cannot be empty, but found an empty name with `{}` as value",
            self.value
        )
    }
}

impl std::error::Error for EmptyNameError {}

#[derive(Debug, thiserror::Error)]
#[error("{source}")]
/// A percent-encoded cookie name or value that doesn't decode to valid UTF-8.
pub struct DecodingError {
    raw_value: String,
    #[source]
    source: anyhow::Error,
}

impl DecodingError {
    /// The raw name or value that failed to decode.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }
}
