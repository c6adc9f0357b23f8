use std::borrow::Cow;

use crate::{CookieAttributes, RemovalCookie};

/// A cookie visible to the current request.
///
/// A `Cookie` pairs a name and a value with the [`CookieAttributes`] the
/// host transport chose to retain. Transports that only know what the client
/// sent in its `Cookie` header (e.g. [`HeaderTransport`]) leave the attributes
/// at their defaults: do not assume they are fully populated.
///
/// ## Constructing a `Cookie`
///
/// ```rust
/// use amaretti::{Cookie, CookieAttributes};
///
/// let cookie = Cookie::new("theme", "dark");
/// assert_eq!(cookie.to_string(), "theme=dark");
///
/// let cookie = Cookie::new("theme", "dark")
///     .with_attributes(CookieAttributes::new().set_path("/app"));
/// assert_eq!(cookie.attributes().path(), Some("/app"));
/// ```
///
/// [`HeaderTransport`]: crate::transport::HeaderTransport
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cookie<'c> {
    pub(crate) name: Cow<'c, str>,
    pub(crate) value: Cow<'c, str>,
    pub(crate) attributes: CookieAttributes,
}

impl<'c> Cookie<'c> {
    /// Creates a new [`Cookie`] with the given `name` and `value` and default attributes.
    pub fn new<N, V>(name: N, value: V) -> Cookie<'c>
    where
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        Cookie {
            name: name.into(),
            value: value.into(),
            attributes: CookieAttributes::default(),
        }
    }

    /// Replaces the attributes of this cookie.
    pub fn with_attributes(mut self, attributes: CookieAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Returns the name of this cookie.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of this cookie.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the attributes retained for this cookie.
    #[inline]
    pub fn attributes(&self) -> &CookieAttributes {
        &self.attributes
    }

    /// Builds the [`RemovalCookie`] that clears this cookie from the client,
    /// using whatever scope (path, domain, secure) is known for it.
    ///
    /// ```rust
    /// use amaretti::{Cookie, CookieAttributes};
    ///
    /// let cookie = Cookie::new("id", "42")
    ///     .with_attributes(CookieAttributes::new().set_path("/app").set_secure(true));
    /// let removal = cookie.to_removal();
    /// assert_eq!(removal.name(), "id");
    /// assert_eq!(removal.path(), Some("/app"));
    /// assert_eq!(removal.domain(), None);
    /// assert!(removal.secure());
    /// ```
    pub fn to_removal(&self) -> RemovalCookie<'c> {
        let mut removal = RemovalCookie::new(self.name.clone()).set_secure(self.attributes.secure());
        if let Some(path) = self.attributes.path() {
            removal = removal.set_path(path.to_owned());
        }
        if let Some(domain) = self.attributes.domain() {
            removal = removal.set_domain(domain.to_owned());
        }
        removal
    }

    /// Converts `self` into a `Cookie` with a `'static` lifetime with as few
    /// allocations as possible.
    pub fn into_owned(self) -> Cookie<'static> {
        Cookie {
            name: Cow::Owned(self.name.into_owned()),
            value: Cow::Owned(self.value.into_owned()),
            attributes: self.attributes,
        }
    }
}

impl std::fmt::Display for Cookie<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

impl<'c, N, V> From<(N, V)> for Cookie<'c>
where
    N: Into<Cow<'c, str>>,
    V: Into<Cow<'c, str>>,
{
    fn from((name, value): (N, V)) -> Self {
        Cookie::new(name, value)
    }
}
