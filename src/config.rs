//! Configuration types.
//!
//! - [`HeaderConfig`] tunes how [`HeaderTransport`] reads and writes header values.
//! - [`CookieOptions`] is a sparse description of cookie attributes, convenient
//!   to load from a configuration file and turn into [`CookieAttributes`].
//!
//! [`HeaderTransport`]: crate::transport::HeaderTransport
use crate::{CookieAttributes, Expiration, SameSite};

/// `HeaderConfig` specifies how [`HeaderTransport`] encodes cookies.
///
/// [`HeaderTransport`]: crate::transport::HeaderTransport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeaderConfig {
    /// If `true`, cookie names and values are:
    ///
    /// - percent-decoded, when parsing the `Cookie` header.
    /// - percent-encoded, when rendering `Set-Cookie` header values.
    ///
    /// If `false`, they are used as is.
    ///
    /// By default, this field is `true`.
    pub percent_encode: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        HeaderConfig {
            percent_encode: true,
        }
    }
}

/// Cookie attributes where every field is optional.
///
/// Converting into [`CookieAttributes`] drops every "falsy" field: a `0`
/// expiration, an empty path or domain, a `false` flag. Those fields take the
/// defaults documented on [`CookieAttributes`].
///
/// ```rust
/// use amaretti::config::CookieOptions;
/// use amaretti::{CookieAttributes, SameSite};
///
/// let options = CookieOptions {
///     expiration: Some(0),
///     path: Some(String::new()),
///     domain: Some("example.com".into()),
///     http_only: Some(true),
///     same_site: Some(SameSite::Strict),
///     ..Default::default()
/// };
/// let attributes = CookieAttributes::from(options);
/// assert_eq!(attributes.expires(), None);
/// assert_eq!(attributes.path(), None);
/// assert_eq!(attributes.domain(), Some("example.com"));
/// assert!(attributes.http_only());
/// assert_eq!(attributes.same_site(), Some(SameSite::Strict));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CookieOptions {
    /// When the cookie expires, in seconds since the Unix epoch.
    /// `0` (or nothing) makes it a session cookie.
    pub expiration: Option<i64>,
    /// The `Path` attribute. An empty string means no path.
    pub path: Option<String>,
    /// The `Domain` attribute. An empty string makes the cookie host-only.
    pub domain: Option<String>,
    /// Marks the cookie `Secure` when `true`.
    pub secure: Option<bool>,
    /// Marks the cookie `HttpOnly` when `true`.
    pub http_only: Option<bool>,
    pub same_site: Option<SameSite>,
}

impl From<CookieOptions> for CookieAttributes {
    fn from(options: CookieOptions) -> Self {
        let mut attributes = CookieAttributes::new();
        if let Some(seconds) = options.expiration.filter(|s| *s != 0) {
            match Expiration::from_unix_timestamp(seconds) {
                Ok(expiration) => attributes = attributes.set_expires(expiration),
                Err(e) => {
                    tracing::warn!(
                        expiration = seconds,
                        error = %e,
                        "ignoring an out-of-range cookie expiration"
                    );
                }
            }
        }
        if let Some(path) = options.path.filter(|p| !p.is_empty()) {
            attributes = attributes.set_path(path);
        }
        if let Some(domain) = options.domain.filter(|d| !d.is_empty()) {
            attributes = attributes.set_domain(domain);
        }
        if options.secure == Some(true) {
            attributes = attributes.set_secure(true);
        }
        if options.http_only == Some(true) {
            attributes = attributes.set_http_only(true);
        }
        if let Some(same_site) = options.same_site {
            attributes = attributes.set_same_site(same_site);
        }
        attributes
    }
}

/// Builds [`CookieAttributes`] out of optional fields, dropping the falsy ones.
///
/// It is a shorthand for converting a [`CookieOptions`].
///
/// ```rust
/// use amaretti::config::build_attributes;
///
/// let attributes = build_attributes(Some(1_700_000_000), Some("/app"), Some(""), Some(true), None, None);
/// assert_eq!(attributes.expiration_time(), Some(1_700_000_000));
/// assert_eq!(attributes.path(), Some("/app"));
/// assert!(attributes.is_host_only());
/// assert!(attributes.secure());
/// assert!(!attributes.http_only());
/// ```
pub fn build_attributes(
    expiration: Option<i64>,
    path: Option<&str>,
    domain: Option<&str>,
    secure: Option<bool>,
    http_only: Option<bool>,
    same_site: Option<SameSite>,
) -> CookieAttributes {
    CookieOptions {
        expiration,
        path: path.map(str::to_owned),
        domain: domain.map(str::to_owned),
        secure,
        http_only,
        same_site,
    }
    .into()
}
