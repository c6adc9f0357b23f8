use crate::{CookieAttributes, Directive, DirectiveId};
use std::borrow::Cow;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Describes a cookie that should be removed from the client's machine.
///
/// A cookie is scoped by its path and domain, not by its name alone: a removal
/// only clears the client's cookie if its path, domain and `Secure` flag match
/// the ones the cookie was set with. Getting that right is up to the caller.
///
/// A `&str` converts into a removal with the default scope, which matches
/// cookies set without a path or domain:
///
/// ```rust
/// use amaretti::RemovalCookie;
///
/// let removal = RemovalCookie::from("session");
/// assert_eq!(removal.name(), "session");
/// assert_eq!(removal.path(), None);
///
/// let removal = RemovalCookie::new("session")
///     .set_path("/app")
///     .set_domain("example.com")
///     .set_secure(true);
/// assert_eq!(removal.path(), Some("/app"));
/// assert_eq!(removal.domain(), Some("example.com"));
/// assert!(removal.secure());
/// ```
pub struct RemovalCookie<'c> {
    pub(crate) name: Cow<'c, str>,
    pub(crate) domain: Option<Cow<'c, str>>,
    pub(crate) path: Option<Cow<'c, str>>,
    pub(crate) secure: bool,
}

impl<'c> RemovalCookie<'c> {
    /// Creates a new [`RemovalCookie`] with the given name and the default scope.
    pub fn new<N>(name: N) -> Self
    where
        N: Into<Cow<'c, str>>,
    {
        Self {
            name: name.into(),
            domain: None,
            path: None,
            secure: false,
        }
    }

    /// Returns the name of the cookie to be removed.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the `Path` of the cookie to be removed, if one was specified.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the `Domain` of the cookie to be removed, if one was specified.
    ///
    /// A leading `.` is stripped.
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .map(|domain| domain.strip_prefix('.').unwrap_or(domain))
    }

    /// Returns whether the removal is sent with the `Secure` flag.
    #[inline]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Returns the identifier of the directive this removal turns into.
    pub fn id(&self) -> DirectiveId<'c> {
        let mut id = DirectiveId::new(self.name.clone());
        if let Some(path) = self.path() {
            id = id.set_path(path.to_owned());
        }
        if let Some(domain) = self.domain() {
            id = id.set_domain(domain.to_owned());
        }
        id
    }
}

/// Methods to set fields in a [`RemovalCookie`].
impl<'c> RemovalCookie<'c> {
    /// Sets the path of the cookie to be removed. An empty path is ignored.
    pub fn set_path<P: Into<Cow<'c, str>>>(mut self, path: P) -> Self {
        let path = path.into();
        self.path = if path.is_empty() { None } else { Some(path) };
        self
    }

    /// Sets the domain of the cookie to be removed. An empty domain is ignored.
    pub fn set_domain<D: Into<Cow<'c, str>>>(mut self, domain: D) -> Self {
        let domain = domain.into();
        self.domain = if domain.is_empty() { None } else { Some(domain) };
        self
    }

    /// Sets whether the removal is sent with the `Secure` flag.
    pub fn set_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

impl<'c> From<&'c str> for RemovalCookie<'c> {
    fn from(name: &'c str) -> Self {
        RemovalCookie::new(name)
    }
}

impl From<String> for RemovalCookie<'static> {
    fn from(name: String) -> Self {
        RemovalCookie::new(name)
    }
}

impl<'c> From<RemovalCookie<'c>> for Directive<'c> {
    fn from(value: RemovalCookie<'c>) -> Self {
        let mut attributes = CookieAttributes::new()
            .set_secure(value.secure)
            // A date in the past to ensure the client removes the cookie.
            .set_expires(OffsetDateTime::UNIX_EPOCH);
        if let Some(path) = value.path {
            attributes = attributes.set_path(path.into_owned());
        }
        if let Some(domain) = value.domain {
            attributes = attributes.set_domain(domain.into_owned());
        }
        Directive::new(value.name, "", attributes)
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use crate::{Directive, RemovalCookie};

    #[test]
    fn removal_becomes_an_expired_directive() {
        let directive = Directive::from(RemovalCookie::new("name"));
        assert_eq!(directive.value(), "");
        assert!(directive.is_removal());
        assert_that!(directive.attributes().expiration_time(), some(eq(0)));
        assert_eq!(
            directive.to_string(),
            "name=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn removal_keeps_the_scope() {
        let directive = Directive::from(
            RemovalCookie::new("name")
                .set_path("/sub")
                .set_domain(".example.com")
                .set_secure(true),
        );
        assert_eq!(
            directive.to_string(),
            "name=; Secure; Path=/sub; Domain=example.com; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn removal_id_matches_the_directive_id() {
        let removal = RemovalCookie::new("name").set_path("/sub");
        let id = removal.id();
        assert_eq!(Directive::from(removal).id(), id);
    }
}
