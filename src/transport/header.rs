use crate::config::HeaderConfig;
use crate::errors::ParseError;
use crate::transport::{Transport, TransportError};
use crate::{CookieSnapshot, Directive, Directives};

/// A [`Transport`] working with raw header values.
///
/// It parses the `Cookie` header(s) of the incoming request and collects the
/// directives for the response, which you then render with
/// [`HeaderTransport::header_values()`] and attach as `Set-Cookie` headers.
///
/// Once the response headers have been sent, call [`HeaderTransport::commit()`]:
/// every later directive is rejected with [`TransportError::HeadersSent`].
///
/// ```rust
/// use amaretti::transport::HeaderTransport;
/// use amaretti::{CookieAttributes, CookieManager, CookieStore, HeaderConfig};
///
/// let transport =
///     HeaderTransport::from_headers(["theme=dark; lang=en"], HeaderConfig::default()).unwrap();
/// let mut cookies = CookieManager::new(transport);
/// assert_eq!(cookies.get("theme"), Some("dark"));
///
/// assert!(cookies.set("theme", "light mode", CookieAttributes::new()));
/// assert!(cookies.delete("lang".into()));
///
/// let mut transport = cookies.into_transport();
/// let values: Vec<_> = transport.header_values().collect();
/// assert_eq!(
///     values,
///     [
///         "theme=light%20mode; Path=/",
///         "lang=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
///     ]
/// );
///
/// transport.commit();
/// assert!(transport.is_committed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct HeaderTransport {
    config: HeaderConfig,
    incoming: CookieSnapshot,
    outgoing: Directives,
    committed: bool,
}

impl HeaderTransport {
    /// Creates a transport for a request that carries no cookies.
    pub fn new(config: HeaderConfig) -> Self {
        HeaderTransport {
            config,
            incoming: CookieSnapshot::new(),
            outgoing: Directives::new(),
            committed: false,
        }
    }

    /// Creates a transport from the values of the `Cookie` header(s) of the incoming request.
    pub fn from_headers<'h, I>(headers: I, config: HeaderConfig) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = &'h str>,
    {
        let incoming = CookieSnapshot::parse_headers(headers, config.percent_encode)?;
        Ok(HeaderTransport {
            incoming,
            ..HeaderTransport::new(config)
        })
    }

    /// Marks the response headers as sent. Later directives are rejected.
    pub fn commit(&mut self) {
        self.committed = true;
    }

    /// Returns `true` once [`HeaderTransport::commit()`] has been called.
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// The directives scheduled so far.
    pub fn directives(&self) -> &Directives {
        &self.outgoing
    }

    /// The `Set-Cookie` header values for the scheduled directives.
    pub fn header_values(&self) -> impl Iterator<Item = String> + '_ {
        self.outgoing.header_values(self.config.percent_encode)
    }
}

impl Transport for HeaderTransport {
    fn read_incoming_cookies(&mut self) -> CookieSnapshot {
        self.incoming.clone()
    }

    fn emit(&mut self, directive: Directive<'_>) -> Result<(), TransportError> {
        if self.committed {
            return Err(TransportError::HeadersSent);
        }
        self.outgoing.insert(directive);
        Ok(())
    }
}
