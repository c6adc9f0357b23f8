use crate::pattern::{compile, NameMatcher, PatternError};
use crate::transport::Transport;
use crate::{Cookie, CookieAttributes, CookieSnapshot, Directive, RemovalCookie, SessionStore};

/// The name of the cookie, and of the session flag, recording the user's consent to cookies.
pub const CONSENT_KEY: &str = "cookie_consent";

/// Read and write access to the cookies of the current request.
///
/// Reads look at the request's [`CookieSnapshot`]; writes schedule a
/// [`Directive`] for the response and update the snapshot accordingly, so that
/// later reads observe them.
///
/// # Failures
///
/// The only write failure is the host transport refusing a directive, e.g.
/// because the response headers have already been sent. It is surfaced as a
/// `false` return value, and the snapshot is left untouched.
/// A cookie that does not exist is not an error: accessors return `None`,
/// `false` or the provided default.
pub trait CookieStore {
    /// Sets the cookie `name` to `value`, replacing any cookie with the same name.
    ///
    /// The last write wins in the response too: the transport keeps a single
    /// pending value per name, whatever the scope it was set with.
    ///
    /// Returns `false` if the name is empty or the transport rejects the directive.
    fn set(&mut self, name: &str, value: &str, attributes: CookieAttributes) -> bool;

    /// Deletes a cookie, both from the snapshot and from the client's machine.
    ///
    /// Deleting a cookie that isn't in the snapshot is a successful no-op.
    /// The path, domain and `Secure` flag of `removal` must match those the
    /// cookie was set with, or the client will keep it.
    ///
    /// Returns `false` if the transport rejects the directive: the cookie
    /// stays in the snapshot.
    fn delete(&mut self, removal: RemovalCookie<'_>) -> bool;

    /// Returns the value of the cookie `name`, if present.
    fn get(&self, name: &str) -> Option<&str>;

    /// Returns the value of the cookie `name`, or `default` if it's not present.
    fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Returns `true` if a cookie called `name` is present.
    fn exists(&self, name: &str) -> bool;

    /// Returns the attributes known for the cookie `name`, if present.
    fn attributes(&self, name: &str) -> Option<&CookieAttributes>;

    /// Returns `true` if the cookie `name` is present and known to be `Secure`.
    ///
    /// A missing cookie and a cookie without the flag both yield `false`:
    /// use [`CookieStore::exists()`] or [`CookieStore::attributes()`] to tell them apart.
    fn is_secure(&self, name: &str) -> bool {
        self.attributes(name).is_some_and(|a| a.secure())
    }

    /// Returns `true` if the cookie `name` is present and known to be `HttpOnly`.
    ///
    /// A missing cookie and a cookie without the flag both yield `false`:
    /// use [`CookieStore::exists()`] or [`CookieStore::attributes()`] to tell them apart.
    fn is_http_only(&self, name: &str) -> bool {
        self.attributes(name).is_some_and(|a| a.http_only())
    }

    /// Returns the expiration of the cookie `name`, in seconds since the Unix epoch.
    fn expiration_time(&self, name: &str) -> Option<i64> {
        self.attributes(name).and_then(|a| a.expiration_time())
    }

    /// Returns the domain of the cookie `name`, if known.
    fn domain(&self, name: &str) -> Option<&str> {
        self.attributes(name).and_then(|a| a.domain())
    }

    /// Returns the path of the cookie `name`, if known.
    fn path(&self, name: &str) -> Option<&str> {
        self.attributes(name).and_then(|a| a.path())
    }

    /// Returns every cookie visible to the current request.
    fn all_cookies(&self) -> &CookieSnapshot;

    /// Deletes every cookie.
    ///
    /// Deletions are best-effort: a rejected deletion doesn't stop the others,
    /// and it is not reported. The snapshot is always empty afterwards.
    fn clear_all_cookies(&mut self);

    /// Returns the values of the cookies whose name matches `matcher`, in snapshot order.
    fn cookie_values_matching(&self, matcher: &dyn NameMatcher) -> Vec<&str> {
        self.all_cookies()
            .iter()
            .filter(|c| matcher.is_match_name(c.name()))
            .map(|c| c.value())
            .collect()
    }

    /// Deletes the cookies whose name matches `matcher`.
    ///
    /// It stops at the first rejected deletion and returns `false`, leaving
    /// the remaining matches in place.
    fn delete_cookies_matching(&mut self, matcher: &dyn NameMatcher) -> bool;

    /// Returns the values of the cookies whose name matches the regular expression `pattern`.
    fn cookie_values_by_regex(&self, pattern: &str) -> Result<Vec<&str>, PatternError> {
        let regex = compile(pattern)?;
        Ok(self.cookie_values_matching(&regex))
    }

    /// Deletes the cookies whose name matches the regular expression `pattern`.
    ///
    /// See [`CookieStore::delete_cookies_matching()`] for the failure policy.
    fn delete_cookies_by_regex(&mut self, pattern: &str) -> Result<bool, PatternError> {
        let regex = compile(pattern)?;
        Ok(self.delete_cookies_matching(&regex))
    }

    /// Returns `true` if the user consented to cookies.
    ///
    /// Consent is given by a [`CONSENT_KEY`] cookie with value `"true"`, or by
    /// a [`CONSENT_KEY`] session flag set to `true`.
    fn check_cookie_consent(&self) -> bool;
}

/// The cookies of a single request, backed by a [`Transport`].
///
/// The snapshot is read from the transport when the manager is created; every
/// write goes through the transport first and reaches the snapshot only if
/// the transport accepts it. Create one manager per request.
///
/// # Example
///
/// ```rust
/// use amaretti::transport::MemoryTransport;
/// use amaretti::{CookieAttributes, CookieManager, CookieStore};
///
/// let mut cookies = CookieManager::new(MemoryTransport::new());
///
/// assert!(cookies.set("test_cookie1", "v1", CookieAttributes::new()));
/// assert!(cookies.set("test_cookie2", "v2", CookieAttributes::new().set_http_only(true)));
/// assert_eq!(cookies.get("test_cookie1"), Some("v1"));
/// assert!(cookies.is_http_only("test_cookie2"));
///
/// assert_eq!(cookies.cookie_values_by_regex("^test_").unwrap(), ["v1", "v2"]);
/// assert!(cookies.delete_cookies_by_regex("^test_cookie").unwrap());
/// assert!(cookies.all_cookies().is_empty());
/// ```
pub struct CookieManager<T> {
    transport: T,
    snapshot: CookieSnapshot,
    session: Option<Box<dyn SessionStore>>,
}

impl<T: Transport> CookieManager<T> {
    /// Creates a manager, reading the incoming cookies from `transport`.
    pub fn new(mut transport: T) -> Self {
        let snapshot = transport.read_incoming_cookies();
        CookieManager {
            transport,
            snapshot,
            session: None,
        }
    }

    /// Attaches the request-scoped session, consulted by [`CookieStore::check_cookie_consent()`].
    pub fn with_session<S>(mut self, session: S) -> Self
    where
        S: SessionStore + 'static,
    {
        self.session = Some(Box::new(session));
        self
    }

    /// The transport directives are sent to.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport, e.g. to commit the response headers.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the manager, returning its transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Empties the snapshot without scheduling any directive.
    pub fn reset(&mut self) {
        self.snapshot.clear();
    }

    fn emit(&mut self, directive: Directive<'_>) -> bool {
        let removal = directive.is_removal();
        let name = directive.name().to_owned();
        match self.transport.emit(directive) {
            Ok(()) => {
                tracing::debug!(name = %name, removal, "scheduled a cookie directive");
                true
            }
            Err(e) => {
                tracing::warn!(
                    name = %name,
                    removal,
                    error = %e,
                    "the transport rejected a cookie directive"
                );
                false
            }
        }
    }
}

impl<T: Transport> CookieStore for CookieManager<T> {
    fn set(&mut self, name: &str, value: &str, attributes: CookieAttributes) -> bool {
        if name.is_empty() {
            tracing::warn!("refusing to set a cookie with an empty name");
            return false;
        }
        let directive = Directive::new(name, value, attributes.clone());
        if !self.emit(directive) {
            return false;
        }
        self.snapshot
            .insert(Cookie::new(name, value).with_attributes(attributes));
        true
    }

    fn delete(&mut self, removal: RemovalCookie<'_>) -> bool {
        let name = removal.name().to_owned();
        if !self.snapshot.contains(&name) {
            return true;
        }
        if !self.emit(removal.into()) {
            return false;
        }
        self.snapshot.remove(&name);
        true
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.snapshot.get(name).map(|c| c.value())
    }

    fn exists(&self, name: &str) -> bool {
        self.snapshot.contains(name)
    }

    fn attributes(&self, name: &str) -> Option<&CookieAttributes> {
        self.snapshot.get(name).map(|c| c.attributes())
    }

    fn all_cookies(&self) -> &CookieSnapshot {
        &self.snapshot
    }

    fn clear_all_cookies(&mut self) {
        let removals: Vec<_> = self.snapshot.iter().map(|c| c.to_removal()).collect();
        let total = removals.len();
        let rejected = removals
            .into_iter()
            .filter(|removal| !self.delete(removal.clone()))
            .count();
        if rejected > 0 {
            tracing::warn!(
                rejected,
                total,
                "some cookie deletions were rejected while clearing all cookies"
            );
        }
        self.snapshot.clear();
    }

    fn delete_cookies_matching(&mut self, matcher: &dyn NameMatcher) -> bool {
        let removals: Vec<_> = self
            .snapshot
            .iter()
            .filter(|c| matcher.is_match_name(c.name()))
            .map(|c| c.to_removal())
            .collect();
        for removal in removals {
            if !self.delete(removal) {
                return false;
            }
        }
        true
    }

    fn check_cookie_consent(&self) -> bool {
        if self.get(CONSENT_KEY) == Some("true") {
            return true;
        }
        self.session
            .as_ref()
            .and_then(|session| session.flag(CONSENT_KEY))
            .unwrap_or(false)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for CookieManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieManager")
            .field("transport", &self.transport)
            .field("snapshot", &self.snapshot)
            .field("session", &self.session.as_ref().map(|_| "..."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use googletest::prelude::*;

    use crate::transport::{HeaderTransport, MemoryTransport};
    use crate::{
        Cookie, CookieAttributes, CookieManager, CookieStore, Expiration, HeaderConfig,
        RemovalCookie, SameSite,
    };

    fn manager() -> CookieManager<MemoryTransport> {
        CookieManager::new(MemoryTransport::new())
    }

    fn plain() -> CookieAttributes {
        CookieAttributes::new()
    }

    #[test]
    fn set_then_get() {
        let mut cookies = manager();
        assert!(cookies.set("test_cookie", "test_value", plain()));
        assert_that!(cookies.get("test_cookie"), some(eq("test_value")));
        assert!(cookies.exists("test_cookie"));
        assert_eq!(cookies.transport().emitted().len(), 1);
    }

    #[test]
    fn last_write_wins() {
        let mut cookies = manager();
        assert!(cookies.set("a", "1", plain()));
        assert!(cookies.set("a", "2", plain()));
        assert_that!(cookies.get("a"), some(eq("2")));
        assert_eq!(cookies.all_cookies().len(), 1);

        let emitted = cookies.transport().emitted();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted.get("a").unwrap().value(), "2");
    }

    #[test]
    fn last_write_wins_across_scopes() {
        let mut cookies = manager();
        assert!(cookies.set("a", "1", plain().set_path("/x")));
        assert!(cookies.set("a", "2", plain()));

        assert_eq!(cookies.all_cookies().len(), 1);
        assert_that!(cookies.path("a"), none());
        let rendered: Vec<_> = cookies.transport().emitted().header_values(false).collect();
        assert_eq!(rendered, ["a=2; Path=/"]);
    }

    #[test]
    fn empty_name_is_refused() {
        let mut cookies = manager();
        assert!(!cookies.set("", "value", plain()));
        assert!(cookies.all_cookies().is_empty());
        assert!(cookies.transport().emitted().is_empty());
    }

    #[test]
    fn rejected_set_leaves_the_snapshot_alone() {
        let mut cookies = manager();
        assert!(cookies.set("a", "1", plain()));
        cookies.transport_mut().reject_all();

        assert!(!cookies.set("a", "2", plain()));
        assert!(!cookies.set("b", "1", plain()));
        assert_that!(cookies.get("a"), some(eq("1")));
        assert!(!cookies.exists("b"));
    }

    #[test]
    fn delete_removes_the_cookie() {
        let mut cookies = manager();
        cookies.set("test_cookie", "test_value", plain());

        assert!(cookies.delete("test_cookie".into()));
        assert!(!cookies.exists("test_cookie"));
        assert_that!(cookies.get("test_cookie"), none());
        assert_eq!(cookies.get_or("test_cookie", "fallback"), "fallback");

        let directive = cookies.transport().emitted().get("test_cookie").unwrap();
        assert!(directive.is_removal());
    }

    #[test]
    fn deleting_a_missing_cookie_is_a_no_op() {
        let mut cookies = manager();
        cookies.set("other", "1", plain());
        cookies.transport_mut().clear();

        assert!(cookies.delete("missing".into()));
        assert!(cookies.transport().emitted().is_empty());
        assert_eq!(cookies.all_cookies().len(), 1);
    }

    #[test]
    fn delete_forwards_the_scope() {
        let mut cookies = manager();
        let attributes = plain()
            .set_path("/app")
            .set_domain("example.com")
            .set_secure(true);
        cookies.set("scoped", "1", attributes);

        let removal = RemovalCookie::new("scoped")
            .set_path("/app")
            .set_domain("example.com")
            .set_secure(true);
        assert!(cookies.delete(removal));
        // Same scope: the removal replaced the original directive.
        let emitted = cookies.transport().emitted();
        assert_eq!(emitted.len(), 1);
        assert_eq!(
            emitted.iter().next().unwrap().to_string(),
            "scoped=; Secure; Path=/app; Domain=example.com; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn rejected_delete_keeps_the_cookie() {
        let mut cookies = manager();
        cookies.set("a", "1", plain());
        cookies.transport_mut().reject_name("a");

        assert!(!cookies.delete("a".into()));
        assert!(cookies.exists("a"));
    }

    #[test]
    fn attribute_accessors() {
        let mut cookies = manager();
        let expiration = 1_700_000_000;
        let attributes = plain()
            .set_expires(Expiration::from_unix_timestamp(expiration).unwrap())
            .set_path("/path")
            .set_domain("example.com")
            .set_secure(true)
            .set_http_only(true)
            .set_same_site(SameSite::Strict);
        assert!(cookies.set("test_cookie", "test_value", attributes));

        assert!(cookies.is_secure("test_cookie"));
        assert!(cookies.is_http_only("test_cookie"));
        assert_that!(cookies.expiration_time("test_cookie"), some(eq(expiration)));
        assert_that!(cookies.domain("test_cookie"), some(eq("example.com")));
        assert_that!(cookies.path("test_cookie"), some(eq("/path")));
        assert_that!(
            cookies.attributes("test_cookie").and_then(|a| a.same_site()),
            some(eq(SameSite::Strict))
        );
    }

    #[test]
    fn missing_cookie_and_unset_flag_look_the_same() {
        let mut cookies = manager();
        cookies.set("plain", "1", plain());

        assert!(!cookies.is_secure("plain"));
        assert!(!cookies.is_secure("missing"));
        assert!(!cookies.is_http_only("plain"));
        assert!(!cookies.is_http_only("missing"));
        assert_that!(cookies.expiration_time("plain"), none());
        assert_that!(cookies.domain("missing"), none());
        assert_that!(cookies.path("plain"), none());

        assert!(cookies.attributes("plain").is_some());
        assert!(cookies.attributes("missing").is_none());
    }

    #[test]
    fn all_cookies_in_insertion_order() {
        let mut cookies = manager();
        cookies.set("test_cookie1", "test_value1", plain());
        cookies.set("test_cookie2", "test_value2", plain());

        let all: Vec<_> = cookies
            .all_cookies()
            .iter()
            .map(|c| (c.name(), c.value()))
            .collect();
        assert_eq!(
            all,
            [("test_cookie1", "test_value1"), ("test_cookie2", "test_value2")]
        );
    }

    #[test]
    fn clear_all_cookies_empties_the_snapshot() {
        let transport = MemoryTransport::new().with_incoming([
            Cookie::new("incoming", "1"),
            Cookie::new("scoped", "2").with_attributes(plain().set_path("/app")),
        ]);
        let mut cookies = CookieManager::new(transport);
        cookies.set("test_cookie1", "test_value1", plain());
        cookies.transport_mut().clear();

        cookies.clear_all_cookies();
        assert!(cookies.all_cookies().is_empty());

        let emitted = cookies.transport().emitted();
        assert_eq!(emitted.len(), 3);
        assert!(emitted.iter().all(|d| d.is_removal()));
        // The known scope of each cookie is used to delete it.
        assert_eq!(emitted.latest_for("scoped").unwrap().attributes().path(), Some("/app"));
    }

    #[test]
    fn clear_all_cookies_is_best_effort() {
        let mut cookies = manager();
        cookies.set("a", "1", plain());
        cookies.set("b", "2", plain());
        cookies.set("c", "3", plain());
        cookies.transport_mut().clear();
        cookies.transport_mut().reject_name("a");

        cookies.clear_all_cookies();
        assert!(cookies.all_cookies().is_empty());

        let names: Vec<_> = cookies.transport().emitted().iter().map(|d| d.name()).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn clear_all_cookies_with_every_deletion_rejected() {
        let mut cookies = manager();
        cookies.set("a", "1", plain());
        cookies.set("b", "2", plain());
        cookies.transport_mut().reject_all();

        cookies.clear_all_cookies();
        assert!(cookies.all_cookies().is_empty());
        assert!(!cookies.exists("a"));
        assert_that!(cookies.get("b"), none());
    }

    #[test]
    fn clear_all_cookies_on_an_empty_snapshot() {
        let mut cookies = manager();
        cookies.clear_all_cookies();
        assert!(cookies.all_cookies().is_empty());
        assert!(cookies.transport().emitted().is_empty());
    }

    #[test]
    fn values_by_regex_follow_snapshot_order() {
        let mut cookies = manager();
        cookies.set("test_cookie1", "test_value1", plain());
        cookies.set("unrelated", "nope", plain());
        cookies.set("test_cookie2", "test_value2", plain());

        assert_that!(
            cookies.cookie_values_by_regex("^test_cookie").unwrap(),
            elements_are![eq("test_value1"), eq("test_value2")]
        );
        assert_that!(cookies.cookie_values_by_regex("^missing$").unwrap(), empty());
        assert_that!(
            cookies.cookie_values_by_regex("[0-9]$").unwrap(),
            elements_are![eq("test_value1"), eq("test_value2")]
        );
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let mut cookies = manager();
        cookies.set("a", "1", plain());

        assert_that!(
            cookies.cookie_values_by_regex("("),
            err(displays_as(eq("`(` is not a valid cookie name pattern")))
        );
        assert!(cookies.delete_cookies_by_regex("[").is_err());
        assert!(cookies.exists("a"));
    }

    #[test]
    fn delete_by_regex_only_touches_matches() {
        let mut cookies = manager();
        cookies.set("test_cookie1", "test_value1", plain());
        cookies.set("keep_me", "kept", plain());
        cookies.set("test_cookie2", "test_value2", plain());

        assert!(cookies.delete_cookies_by_regex("^test_cookie").unwrap());
        let names: Vec<_> = cookies.all_cookies().names().collect();
        assert_eq!(names, ["keep_me"]);
    }

    #[test]
    fn delete_by_regex_removes_everything_that_matches() {
        let mut cookies = manager();
        cookies.set("test_cookie1", "test_value1", plain());
        cookies.set("test_cookie2", "test_value2", plain());

        assert!(cookies.delete_cookies_by_regex("^test_cookie").unwrap());
        assert!(cookies.all_cookies().is_empty());
    }

    #[test]
    fn delete_by_regex_stops_at_the_first_failure() {
        let mut cookies = manager();
        cookies.set("test_1", "1", plain());
        cookies.set("test_2", "2", plain());
        cookies.set("test_3", "3", plain());
        cookies.transport_mut().reject_name("test_2");

        assert!(!cookies.delete_cookies_by_regex("^test_").unwrap());
        let names: Vec<_> = cookies.all_cookies().names().collect();
        assert_eq!(names, ["test_2", "test_3"]);
    }

    #[test]
    fn delete_matching_accepts_closures() {
        let mut cookies = manager();
        cookies.set("short", "1", plain());
        cookies.set("a_longer_name", "2", plain());

        let is_long = |name: &str| name.len() > 5;
        assert_eq!(cookies.cookie_values_matching(&is_long), ["2"]);
        assert!(cookies.delete_cookies_matching(&is_long));
        assert!(cookies.exists("short"));
        assert!(!cookies.exists("a_longer_name"));
    }

    #[test]
    fn consent_from_cookie() {
        let mut cookies = manager();
        assert!(!cookies.check_cookie_consent());

        cookies.set("cookie_consent", "true", plain());
        assert!(cookies.check_cookie_consent());

        cookies.delete("cookie_consent".into());
        assert!(!cookies.check_cookie_consent());

        cookies.set("cookie_consent", "yes", plain());
        assert!(!cookies.check_cookie_consent());
    }

    #[test]
    fn consent_from_session() {
        let session = HashMap::from([("cookie_consent".to_string(), true)]);
        let cookies = manager().with_session(session);
        assert!(cookies.check_cookie_consent());

        let session = HashMap::from([("cookie_consent".to_string(), false)]);
        let cookies = manager().with_session(session);
        assert!(!cookies.check_cookie_consent());
    }

    #[test]
    fn incoming_cookies_are_visible() {
        let transport = HeaderTransport::from_headers(
            ["cookie_consent=true; theme=dark"],
            HeaderConfig::default(),
        )
        .unwrap();
        let cookies = CookieManager::new(transport);

        assert!(cookies.check_cookie_consent());
        assert_that!(cookies.get("theme"), some(eq("dark")));
        // The header transport doesn't know about attributes.
        assert_that!(cookies.path("theme"), none());
        assert!(!cookies.is_secure("theme"));
    }

    #[test]
    fn committed_headers_reject_writes() {
        let transport =
            HeaderTransport::from_headers(["theme=dark"], HeaderConfig::default()).unwrap();
        let mut cookies = CookieManager::new(transport);
        cookies.transport_mut().commit();

        assert!(!cookies.set("theme", "light", plain()));
        assert!(!cookies.delete("theme".into()));
        assert_that!(cookies.get("theme"), some(eq("dark")));
    }

    #[test]
    fn reset_discards_the_snapshot_only() {
        let mut cookies = manager();
        cookies.set("a", "1", plain());
        cookies.reset();

        assert!(cookies.all_cookies().is_empty());
        assert_eq!(cookies.transport().emitted().len(), 1);
    }

    #[test]
    fn managers_are_isolated() {
        let mut first = manager();
        let second = manager();
        first.set("a", "1", plain());
        assert!(!second.exists("a"));
    }
}
