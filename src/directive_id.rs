use std::borrow::Cow;

use crate::attributes::ROOT_PATH;

/// A unique identifier for a [`Directive`].
///
/// Clients key their cookie jar by name, domain and path: two directives with
/// the same identifier target the same client-side cookie, so the later one
/// supersedes the earlier one. A missing path is the root path.
///
/// # Example
///
/// ```
/// use amaretti::DirectiveId;
///
/// let id = DirectiveId::new("name");
/// assert_eq!(id.name(), "name");
/// assert_eq!(id.domain(), None);
/// assert_eq!(id.path(), "/");
///
/// let id = DirectiveId::new("name").set_domain("rust-lang.org").set_path("/docs");
/// assert_eq!(id.domain(), Some("rust-lang.org"));
/// assert_eq!(id.path(), "/docs");
///
/// // An explicit root path and a missing path are the same scope.
/// assert_eq!(DirectiveId::new("name").set_path("/"), DirectiveId::new("name"));
/// ```
///
/// [`Directive`]: crate::Directive
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct DirectiveId<'c> {
    pub(crate) name: Cow<'c, str>,
    pub(crate) domain: Option<Cow<'c, str>>,
    pub(crate) path: Cow<'c, str>,
}

impl<'c> DirectiveId<'c> {
    /// Creates a new [`DirectiveId`] with the given name, no domain and the root path.
    pub fn new<N: Into<Cow<'c, str>>>(name: N) -> DirectiveId<'c> {
        DirectiveId {
            name: name.into(),
            domain: None,
            path: Cow::Borrowed(ROOT_PATH),
        }
    }

    /// Sets the domain of the cookie.
    pub fn set_domain<D: Into<Cow<'c, str>>>(mut self, domain: D) -> DirectiveId<'c> {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the path of the cookie. An empty path is the root path.
    pub fn set_path<P: Into<Cow<'c, str>>>(mut self, path: P) -> DirectiveId<'c> {
        let path = path.into();
        self.path = if path.is_empty() {
            Cow::Borrowed(ROOT_PATH)
        } else {
            path
        };
        self
    }

    /// Returns the name of the cookie.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the domain of the cookie, if any.
    #[inline]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// Returns the path of the cookie.
    #[inline]
    pub fn path(&self) -> &str {
        self.path.as_ref()
    }

    /// Converts `self` into a `DirectiveId` with a `'static` lifetime.
    pub fn into_owned(self) -> DirectiveId<'static> {
        DirectiveId {
            name: Cow::Owned(self.name.into_owned()),
            domain: self.domain.map(|d| Cow::Owned(d.into_owned())),
            path: Cow::Owned(self.path.into_owned()),
        }
    }
}

impl<'a> From<&'a str> for DirectiveId<'a> {
    fn from(value: &'a str) -> DirectiveId<'a> {
        DirectiveId::new(value)
    }
}
