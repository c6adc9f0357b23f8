use indexmap::IndexMap;

use crate::{Directive, DirectiveId};

#[derive(Debug, Default, Clone)]
/// The directives scheduled for the outgoing response.
///
/// Directives are keyed by their [`DirectiveId`]: scheduling a directive for
/// a cookie that already has one replaces it in place, so the last write wins.
///
/// A cookie name has at most one pending value: setting a cookie drops the
/// values scheduled for the same name in other scopes. Removals are kept,
/// one per scope.
///
/// ```rust
/// use amaretti::{CookieAttributes, Directive, Directives, RemovalCookie};
///
/// let mut directives = Directives::new();
/// directives.insert(Directive::new("a", "1", CookieAttributes::new()));
/// directives.insert(Directive::new("b", "1", CookieAttributes::new().set_path("/sub")));
/// // A removal in another scope doesn't touch the pending value.
/// directives.insert(RemovalCookie::new("b"));
/// // A new value for `a`, in another scope, supersedes the previous one.
/// directives.insert(Directive::new("a", "2", CookieAttributes::new().set_path("/docs")));
///
/// let values: Vec<_> = directives.header_values(false).collect();
/// assert_eq!(
///     values,
///     [
///         "b=1; Path=/sub",
///         "b=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
///         "a=2; Path=/docs",
///     ]
/// );
/// ```
pub struct Directives {
    directives: IndexMap<DirectiveId<'static>, Directive<'static>>,
}

impl Directives {
    /// Creates an empty set of directives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a directive.
    ///
    /// It replaces any directive with the same [`DirectiveId`], which is
    /// returned. If `directive` sets a value, pending values for the same
    /// cookie name in other scopes are discarded.
    pub fn insert<'c, D>(&mut self, directive: D) -> Option<Directive<'static>>
    where
        D: Into<Directive<'c>>,
    {
        let directive = directive.into().into_owned();
        let id = directive.id();
        if !directive.is_removal() {
            self.directives.retain(|other_id, other| {
                other_id == &id || other.is_removal() || other.name() != directive.name()
            });
        }
        self.directives.insert(id, directive)
    }

    /// Returns the directive scheduled for the given cookie, if any.
    pub fn get<'a, I>(&self, id: I) -> Option<&Directive<'static>>
    where
        I: Into<DirectiveId<'a>>,
    {
        let id = id.into().into_owned();
        self.directives.get(&id)
    }

    /// Returns the last directive, in iteration order, for a cookie named `name`, in any scope.
    pub fn latest_for(&self, name: &str) -> Option<&Directive<'static>> {
        self.directives.values().rev().find(|d| d.name() == name)
    }

    /// The number of scheduled directives.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns `true` if no directive is scheduled.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Discards every scheduled directive.
    pub fn clear(&mut self) {
        self.directives.clear();
    }

    /// Iterates over the scheduled directives, in the order they were first scheduled.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Directive<'static>> + '_ {
        self.directives.values()
    }

    /// Renders every directive as the value of a `Set-Cookie` header.
    pub fn header_values(&self, percent_encode: bool) -> impl Iterator<Item = String> + '_ {
        self.iter().map(move |d| d.header_value(percent_encode))
    }
}

#[cfg(test)]
mod tests {
    use crate::{CookieAttributes, Directive, DirectiveId, Directives, RemovalCookie};

    #[test]
    fn last_write_wins_per_scope() {
        let mut directives = Directives::new();
        assert!(directives
            .insert(Directive::new("a", "1", CookieAttributes::new()))
            .is_none());
        let previous = directives.insert(Directive::new(
            "a",
            "2",
            CookieAttributes::new().set_path("/"),
        ));
        assert_eq!(previous.unwrap().value(), "1");
        assert_eq!(directives.len(), 1);
        assert_eq!(directives.get("a").unwrap().value(), "2");
    }

    #[test]
    fn latest_for_looks_across_scopes() {
        let mut directives = Directives::new();
        directives.insert(Directive::new("a", "1", CookieAttributes::new()));
        directives.insert(RemovalCookie::new("a").set_domain("example.com"));

        let latest = directives.latest_for("a").unwrap();
        assert!(latest.is_removal());
        assert!(directives
            .get(DirectiveId::new("a").set_domain("example.com"))
            .is_some());
        assert!(directives.latest_for("b").is_none());
    }

    #[test]
    fn a_new_value_supersedes_other_scopes() {
        let mut directives = Directives::new();
        directives.insert(Directive::new("a", "1", CookieAttributes::new().set_path("/x")));
        directives.insert(RemovalCookie::new("a").set_domain("example.com"));
        directives.insert(Directive::new("b", "1", CookieAttributes::new()));

        directives.insert(Directive::new("a", "2", CookieAttributes::new()));

        let rendered: Vec<_> = directives.header_values(false).collect();
        assert_eq!(
            rendered,
            [
                "a=; Path=/; Domain=example.com; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
                "b=1; Path=/",
                "a=2; Path=/",
            ]
        );
        assert!(directives.get(DirectiveId::new("a").set_path("/x")).is_none());
    }
}
