use std::fmt;
use std::str::FromStr;

/// The `SameSite` policy attached to a cookie.
///
/// Browsers use it to decide whether a cookie travels along with cross-site requests:
///
/// - `Strict`: never sent on cross-site requests.
/// - `Lax`: sent on cross-site top-level navigations using "safe" methods.
/// - `None`: always sent; browsers ignore it unless the cookie is also `Secure`.
///
/// Leaving the policy unset (see [`CookieAttributes::same_site()`]) defers to the
/// browser's default behaviour.
///
/// A policy can be parsed from its attribute spelling, ignoring case:
///
/// ```rust
/// use amaretti::SameSite;
///
/// assert_eq!("lax".parse::<SameSite>().unwrap(), SameSite::Lax);
/// assert_eq!("Strict".parse::<SameSite>().unwrap(), SameSite::Strict);
/// assert!("sometimes".parse::<SameSite>().is_err());
/// ```
///
/// [`CookieAttributes::same_site()`]: crate::CookieAttributes::same_site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SameSite {
    #[cfg_attr(feature = "serde", serde(alias = "strict"))]
    Strict,
    #[cfg_attr(feature = "serde", serde(alias = "lax"))]
    Lax,
    #[cfg_attr(feature = "serde", serde(alias = "none"))]
    None,
}

impl SameSite {
    /// Returns `true` if `self` is `SameSite::Strict`.
    #[inline]
    pub fn is_strict(&self) -> bool {
        matches!(self, SameSite::Strict)
    }

    /// Returns `true` if `self` is `SameSite::Lax`.
    #[inline]
    pub fn is_lax(&self) -> bool {
        matches!(self, SameSite::Lax)
    }

    /// Returns `true` if `self` is `SameSite::None`.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, SameSite::None)
    }

    /// The spelling used in the `SameSite` attribute of a `Set-Cookie` header.
    pub fn as_str(&self) -> &'static str {
        match *self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SameSite {
    type Err = ParseSameSiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let policy = s.trim();
        if policy.eq_ignore_ascii_case("strict") {
            Ok(SameSite::Strict)
        } else if policy.eq_ignore_ascii_case("lax") {
            Ok(SameSite::Lax)
        } else if policy.eq_ignore_ascii_case("none") {
            Ok(SameSite::None)
        } else {
            Err(ParseSameSiteError {
                value: s.to_string(),
            })
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("`{value}` is not a valid `SameSite` policy, expected one of `Strict`, `Lax` or `None`")]
/// The error returned when parsing a [`SameSite`] policy from an unknown string.
pub struct ParseSameSiteError {
    value: String,
}
