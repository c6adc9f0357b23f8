use crate::encoding::encode;
use crate::{CookieAttributes, DirectiveId};
use std::borrow::Cow;
use std::fmt;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// An instruction for the host transport: set a cookie on the client's machine.
///
/// Deleting a cookie is expressed as a directive too: an empty value with an
/// expiration in the past. Build those from a [`RemovalCookie`].
///
/// The [`Display`] implementation renders the directive as the value of a
/// `Set-Cookie` header, without any encoding:
///
/// ```rust
/// use amaretti::{CookieAttributes, Directive, SameSite};
///
/// let directive = Directive::new(
///     "session",
///     "abc",
///     CookieAttributes::new()
///         .set_http_only(true)
///         .set_secure(true)
///         .set_same_site(SameSite::Strict),
/// );
/// assert_eq!(
///     directive.to_string(),
///     "session=abc; HttpOnly; SameSite=Strict; Secure; Path=/"
/// );
/// ```
///
/// [`RemovalCookie`]: crate::RemovalCookie
/// [`Display`]: std::fmt::Display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'c> {
    pub(crate) name: Cow<'c, str>,
    pub(crate) value: Cow<'c, str>,
    pub(crate) attributes: CookieAttributes,
}

impl<'c> Directive<'c> {
    /// Creates a new [`Directive`] setting `name` to `value` with the given attributes.
    pub fn new<N, V>(name: N, value: V, attributes: CookieAttributes) -> Self
    where
        N: Into<Cow<'c, str>>,
        V: Into<Cow<'c, str>>,
    {
        Directive {
            name: name.into(),
            value: value.into(),
            attributes,
        }
    }

    /// The name of the targeted cookie.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// The value to set. It is empty for removals.
    #[inline]
    pub fn value(&self) -> &str {
        self.value.as_ref()
    }

    /// The attributes rendered after the name-value pair.
    #[inline]
    pub fn attributes(&self) -> &CookieAttributes {
        &self.attributes
    }

    /// Returns `true` if this directive removes the cookie from the client,
    /// i.e. its value is empty and it expired at or before the Unix epoch.
    pub fn is_removal(&self) -> bool {
        self.value.is_empty()
            && self
                .attributes
                .expires_datetime()
                .is_some_and(|t| t <= OffsetDateTime::UNIX_EPOCH)
    }

    /// Returns the identifier of the client-side cookie this directive targets.
    pub fn id(&self) -> DirectiveId<'c> {
        let mut id =
            DirectiveId::new(self.name.clone()).set_path(self.attributes.effective_path().to_owned());
        if let Some(domain) = self.attributes.domain() {
            id = id.set_domain(domain.to_owned());
        }
        id
    }

    /// Renders the value of the `Set-Cookie` header for this directive.
    ///
    /// If `percent_encode` is `true`, the name and value are percent-encoded.
    ///
    /// ```rust
    /// use amaretti::{CookieAttributes, Directive};
    ///
    /// let directive = Directive::new("a name", "a value", CookieAttributes::new());
    /// assert_eq!(directive.header_value(true), "a%20name=a%20value; Path=/");
    /// assert_eq!(directive.header_value(false), "a name=a value; Path=/");
    /// ```
    pub fn header_value(&self, percent_encode: bool) -> String {
        if percent_encode {
            Directive::new(
                encode(&self.name).to_string(),
                encode(&self.value).to_string(),
                self.attributes.clone(),
            )
            .to_string()
        } else {
            self.to_string()
        }
    }

    /// Converts `self` into a `Directive` with a `'static` lifetime.
    pub fn into_owned(self) -> Directive<'static> {
        Directive {
            name: Cow::Owned(self.name.into_owned()),
            value: Cow::Owned(self.value.into_owned()),
            attributes: self.attributes,
        }
    }

    fn fmt_parameters(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let attributes = &self.attributes;

        if attributes.http_only() {
            write!(f, "; HttpOnly")?;
        }

        if let Some(same_site) = attributes.same_site() {
            write!(f, "; SameSite={}", same_site)?;
        }

        if attributes.secure() {
            write!(f, "; Secure")?;
        }

        write!(f, "; Path={}", attributes.effective_path())?;

        if let Some(domain) = attributes.domain() {
            write!(f, "; Domain={}", domain)?;
        }

        if let Some(max_age) = attributes.max_age() {
            write!(f, "; Max-Age={}", max_age.whole_seconds())?;
        }

        if let Some(time) = attributes.expires_datetime() {
            let time = time.to_offset(UtcOffset::UTC);

            // IMF-fixdate, see https://www.rfc-editor.org/rfc/rfc9110#section-5.6.7
            static IMF_FIXDATE: &[FormatItem<'_>] = format_description!(
                "[weekday repr:short], [day] [month repr:short] [year padding:none] [hour]:[minute]:[second] GMT"
            );
            write!(
                f,
                "; Expires={}",
                time.format(&IMF_FIXDATE).map_err(|_| fmt::Error)?
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for Directive<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={}", self.name(), self.value())?;
        self.fmt_parameters(f)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;
    use time::Duration;

    use crate::{CookieAttributes, Directive, DirectiveId, SameSite};

    fn directive(attributes: CookieAttributes) -> String {
        Directive::new("foo", "bar", attributes).to_string()
    }

    #[test]
    fn format() {
        let a = CookieAttributes::new;

        assert_eq!(directive(a()), "foo=bar; Path=/");
        assert_eq!(directive(a().set_http_only(true)), "foo=bar; HttpOnly; Path=/");
        assert_eq!(directive(a().set_secure(true)), "foo=bar; Secure; Path=/");
        assert_eq!(directive(a().set_path("/docs")), "foo=bar; Path=/docs");
        assert_eq!(
            directive(a().set_max_age(Duration::seconds(10))),
            "foo=bar; Path=/; Max-Age=10"
        );
        assert_eq!(
            directive(a().set_domain("www.rust-lang.org")),
            "foo=bar; Path=/; Domain=www.rust-lang.org"
        );
        assert_eq!(
            directive(a().set_domain(".rust-lang.org")),
            "foo=bar; Path=/; Domain=rust-lang.org"
        );
        assert_eq!(
            directive(a().set_expires(datetime!(2015-10-21 07:28:00 UTC))),
            "foo=bar; Path=/; Expires=Wed, 21 Oct 2015 07:28:00 GMT"
        );
        assert_eq!(
            directive(a().set_same_site(SameSite::Lax)),
            "foo=bar; SameSite=Lax; Path=/"
        );
        assert_eq!(
            directive(a().set_same_site(SameSite::None).set_secure(true)),
            "foo=bar; SameSite=None; Secure; Path=/"
        );
    }

    #[test]
    fn expiration_is_rendered_in_utc() {
        let expires = datetime!(2015-10-21 09:28:00 +2);
        assert_eq!(
            directive(CookieAttributes::new().set_expires(expires)),
            "foo=bar; Path=/; Expires=Wed, 21 Oct 2015 07:28:00 GMT"
        );
    }

    #[test]
    fn session_expiration_is_not_rendered() {
        assert_eq!(
            directive(CookieAttributes::new().set_expires(None)),
            "foo=bar; Path=/"
        );
    }

    #[test]
    fn percent_encoding_leaves_attributes_alone() {
        let d = Directive::new(
            "to be encoded",
            "a;b",
            CookieAttributes::new().set_path("/a b"),
        );
        assert_eq!(d.header_value(true), "to%20be%20encoded=a%3Bb; Path=/a b");
    }

    #[test]
    fn id_uses_the_effective_scope() {
        let d = Directive::new("foo", "bar", CookieAttributes::new().set_domain(".example.com"));
        assert_eq!(
            d.id(),
            DirectiveId::new("foo").set_path("/").set_domain("example.com")
        );
        assert!(!d.is_removal());
    }
}
