use std::collections::HashSet;

use crate::transport::{Transport, TransportError};
use crate::{Cookie, CookieSnapshot, Directive, Directives};

/// An in-memory [`Transport`], for tests.
///
/// Unlike a transport backed by real headers, it can hand the manager inbound
/// cookies with all their attributes populated. It records every directive it
/// accepts and can be told to reject directives, to exercise failure paths.
///
/// ```rust
/// use amaretti::transport::MemoryTransport;
/// use amaretti::{Cookie, CookieAttributes, CookieManager, CookieStore};
///
/// let transport = MemoryTransport::new().with_incoming([Cookie::new("id", "7")
///     .with_attributes(CookieAttributes::new().set_secure(true))]);
/// let mut cookies = CookieManager::new(transport);
/// assert!(cookies.is_secure("id"));
///
/// cookies.transport_mut().reject_name("id");
/// assert!(!cookies.delete("id".into()));
/// assert!(cookies.exists("id"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    incoming: CookieSnapshot,
    emitted: Directives,
    rejected_names: HashSet<String>,
    reject_all: bool,
}

impl MemoryTransport {
    /// Creates a transport with no incoming cookies that accepts every directive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the cookies the transport reports for the incoming request.
    pub fn with_incoming<'c, I>(mut self, cookies: I) -> Self
    where
        I: IntoIterator<Item = Cookie<'c>>,
    {
        for cookie in cookies {
            self.incoming.insert(cookie);
        }
        self
    }

    /// Rejects every directive from now on.
    pub fn reject_all(&mut self) {
        self.reject_all = true;
    }

    /// Rejects the directives for cookies named `name` from now on.
    pub fn reject_name<N: Into<String>>(&mut self, name: N) {
        self.rejected_names.insert(name.into());
    }

    /// Accepts every directive again.
    pub fn accept_all(&mut self) {
        self.reject_all = false;
        self.rejected_names.clear();
    }

    /// The directives accepted so far.
    pub fn emitted(&self) -> &Directives {
        &self.emitted
    }

    /// Forgets every directive accepted so far.
    pub fn clear(&mut self) {
        self.emitted.clear();
    }
}

impl Transport for MemoryTransport {
    fn read_incoming_cookies(&mut self) -> CookieSnapshot {
        self.incoming.clone()
    }

    fn emit(&mut self, directive: Directive<'_>) -> Result<(), TransportError> {
        if self.reject_all || self.rejected_names.contains(directive.name()) {
            return Err(TransportError::Rejected {
                name: directive.name().to_owned(),
                reason: "rejected by the in-memory transport".to_owned(),
            });
        }
        self.emitted.insert(directive);
        Ok(())
    }
}
