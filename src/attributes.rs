use crate::{Expiration, SameSite};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

/// The path a cookie is scoped to when no `Path` was specified.
pub const ROOT_PATH: &str = "/";

/// The metadata attached to a cookie: expiration, scope and security flags.
///
/// `CookieAttributes` is a value type. Every `set_*` method consumes `self` and
/// returns a new set of attributes, so a value never changes once it has been
/// handed over to a [`CookieStore`].
///
/// Unset fields resolve to deterministic defaults:
///
/// | Attribute   | Default                                   |
/// |-------------|-------------------------------------------|
/// | `expires`   | none, i.e. a session cookie               |
/// | `path`      | none, scoped to [`ROOT_PATH`] when emitted |
/// | `domain`    | none, i.e. host-only                      |
/// | `secure`    | `false`                                   |
/// | `http_only` | `false`                                   |
/// | `same_site` | none, i.e. the browser default            |
///
/// # Example
///
/// ```rust
/// use amaretti::{CookieAttributes, SameSite};
///
/// let attributes = CookieAttributes::new()
///     .set_path("/account")
///     .set_domain("example.com")
///     .set_secure(true)
///     .set_http_only(true)
///     .set_same_site(SameSite::Lax);
///
/// assert_eq!(attributes.path(), Some("/account"));
/// assert_eq!(attributes.domain(), Some("example.com"));
/// assert!(attributes.secure());
/// assert!(attributes.http_only());
/// assert_eq!(attributes.same_site(), Some(SameSite::Lax));
/// assert_eq!(attributes.expires(), None);
/// ```
///
/// [`CookieStore`]: crate::CookieStore
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CookieAttributes {
    expires: Option<Expiration>,
    max_age: Option<Duration>,
    path: Option<String>,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
    same_site: Option<SameSite>,
}

impl CookieAttributes {
    /// Creates a set of attributes where every field has its default value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the [`Expiration`] of the cookie, if one was specified.
    #[inline]
    pub fn expires(&self) -> Option<Expiration> {
        self.expires
    }

    /// Returns the expiration date-time of the cookie.
    ///
    /// It returns `None` for session cookies and when no expiration was specified.
    #[inline]
    pub fn expires_datetime(&self) -> Option<OffsetDateTime> {
        self.expires.and_then(|e| e.datetime())
    }

    /// Returns the expiration date-time as seconds since the Unix epoch.
    ///
    /// # Example
    ///
    /// ```rust
    /// use amaretti::{CookieAttributes, Expiration};
    ///
    /// let attributes = CookieAttributes::new();
    /// assert_eq!(attributes.expiration_time(), None);
    ///
    /// let attributes = attributes.set_expires(Expiration::from_unix_timestamp(1_700_000_000).unwrap());
    /// assert_eq!(attributes.expiration_time(), Some(1_700_000_000));
    /// ```
    #[inline]
    pub fn expiration_time(&self) -> Option<i64> {
        self.expires.and_then(|e| e.unix_timestamp())
    }

    /// Returns the `Max-Age` of the cookie, if one was specified.
    #[inline]
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age
    }

    /// Returns the `Path` of the cookie, if one was specified.
    ///
    /// Use [`CookieAttributes::effective_path()`] to get the path the cookie is
    /// actually scoped to.
    #[inline]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the path the cookie is scoped to: the specified `Path`, or
    /// [`ROOT_PATH`] if there is none.
    ///
    /// ```rust
    /// use amaretti::CookieAttributes;
    ///
    /// assert_eq!(CookieAttributes::new().effective_path(), "/");
    /// assert_eq!(CookieAttributes::new().set_path("/docs").effective_path(), "/docs");
    /// ```
    #[inline]
    pub fn effective_path(&self) -> &str {
        self.path().unwrap_or(ROOT_PATH)
    }

    /// Returns the `Domain` of the cookie, if one was specified.
    ///
    /// This does not validate the domain. A leading `.` is stripped.
    ///
    /// ```rust
    /// use amaretti::CookieAttributes;
    ///
    /// let attributes = CookieAttributes::new().set_domain(".crates.io");
    /// assert_eq!(attributes.domain(), Some("crates.io"));
    /// ```
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain
            .as_deref()
            .map(|domain| domain.strip_prefix('.').unwrap_or(domain))
    }

    /// Returns `true` if the cookie is only sent back to the host that set it.
    #[inline]
    pub fn is_host_only(&self) -> bool {
        self.domain.is_none()
    }

    /// Returns whether the cookie was marked `Secure`.
    #[inline]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Returns whether the cookie was marked `HttpOnly`.
    #[inline]
    pub fn http_only(&self) -> bool {
        self.http_only
    }

    /// Returns the `SameSite` policy of the cookie, if one was specified.
    #[inline]
    pub fn same_site(&self) -> Option<SameSite> {
        self.same_site
    }
}

/// Methods to derive new attributes from existing ones.
impl CookieAttributes {
    /// Sets the expiration of the cookie.
    ///
    /// Date-times beyond the end of year 9999 are clamped, as RFC 6265 requires.
    ///
    /// ```rust
    /// use amaretti::{CookieAttributes, Expiration};
    /// use amaretti::time::macros::datetime;
    ///
    /// let attributes = CookieAttributes::new().set_expires(datetime!(2015-10-21 07:28:00 UTC));
    /// assert_eq!(attributes.expiration_time(), Some(1_445_412_480));
    ///
    /// let attributes = attributes.set_expires(None);
    /// assert_eq!(attributes.expires(), Some(Expiration::Session));
    /// ```
    pub fn set_expires<T: Into<Expiration>>(mut self, time: T) -> Self {
        static MAX_DATETIME: OffsetDateTime = datetime!(9999-12-31 23:59:59.999_999 UTC);

        self.expires = Some(time.into().map(|time| std::cmp::min(time, MAX_DATETIME)));
        self
    }

    /// Expires the cookie `duration` from now.
    ///
    /// Both `Max-Age` and the absolute `Expires` are recorded, so that clients
    /// which ignore one of them still honour the other.
    pub fn set_expires_in(self, duration: Duration) -> Self {
        self.set_max_age(duration)
            .set_expires(OffsetDateTime::now_utc().saturating_add(duration))
    }

    /// Turns the cookie back into a session cookie by dropping both `Expires` and `Max-Age`.
    pub fn unset_expires(mut self) -> Self {
        self.expires = None;
        self.max_age = None;
        self
    }

    /// Sets the `Max-Age` of the cookie. `None` removes it.
    pub fn set_max_age<D: Into<Option<Duration>>>(mut self, value: D) -> Self {
        self.max_age = value.into();
        self
    }

    /// Sets the `Path` of the cookie. An empty path leaves the cookie scoped to [`ROOT_PATH`].
    pub fn set_path<P: Into<String>>(mut self, path: P) -> Self {
        let path = path.into();
        self.path = if path.is_empty() { None } else { Some(path) };
        self
    }

    /// Removes the `Path` of the cookie.
    pub fn unset_path(mut self) -> Self {
        self.path = None;
        self
    }

    /// Sets the `Domain` of the cookie. An empty domain makes the cookie host-only.
    pub fn set_domain<D: Into<String>>(mut self, domain: D) -> Self {
        let domain = domain.into();
        self.domain = if domain.is_empty() { None } else { Some(domain) };
        self
    }

    /// Removes the `Domain` of the cookie, making it host-only.
    pub fn unset_domain(mut self) -> Self {
        self.domain = None;
        self
    }

    /// Sets whether the cookie is only sent over HTTPS.
    pub fn set_secure(mut self, value: bool) -> Self {
        self.secure = value;
        self
    }

    /// Sets whether the cookie is hidden from client-side scripts.
    pub fn set_http_only(mut self, value: bool) -> Self {
        self.http_only = value;
        self
    }

    /// Sets the `SameSite` policy of the cookie. `None` removes it.
    pub fn set_same_site<T: Into<Option<SameSite>>>(mut self, value: T) -> Self {
        self.same_site = value.into();
        self
    }
}
