//! A crate to read and write the cookies of an HTTP request in a Rust server.
//!
//! # Overview
//!
//! `amaretti` gives your request handlers a single object to work with cookies,
//! [`CookieManager`], behind the [`CookieStore`] trait.
//!
//! It has support for:
//!
//! - Reading the cookies attached to the incoming request, with their attributes when known
//! - Setting and deleting cookies, via directives for the outgoing response
//! - Bulk operations: clearing every cookie, reading or deleting the cookies whose name matches a pattern
//! - Checking whether the user consented to cookies, via a cookie or a session flag
//!
//! In particular:
//!
//! - Writes are visible to later reads within the same request
//! - The HTTP layer is abstracted away behind [`Transport`]: use [`HeaderTransport`]
//!   to work with raw header values, or [`MemoryTransport`] in tests
//! - Cookies are percent-encoded/decoded by default (but you can opt out)
//! - A write the transport refuses (e.g. because the response headers were already sent)
//!   is reported, not silently dropped
//!
//! # Non-goals
//!
//! `amaretti` is not designed to handle cookies on the client side.
//! It doesn't sign or encrypt cookie values, nor does it check that domains or paths
//! are well-formed.
//!
//! # Quickstart
//!
//! ```rust
//! use amaretti::transport::HeaderTransport;
//! use amaretti::{CookieAttributes, CookieManager, CookieStore, HeaderConfig, SameSite};
//!
//! // Start by creating a transport out of the `Cookie` header you received from the client.
//! let transport = HeaderTransport::from_headers(
//!     ["session=abc; tracking_1=x; tracking_2=y"],
//!     HeaderConfig::default(),
//! )
//! .unwrap();
//! // A manager reads the incoming cookies once, when it is created.
//! let mut cookies = CookieManager::new(transport);
//! assert_eq!(cookies.get("session"), Some("abc"));
//! assert!(!cookies.check_cookie_consent());
//!
//! // Writes go through the transport and are visible right away.
//! let attributes = CookieAttributes::new()
//!     .set_http_only(true)
//!     .set_same_site(SameSite::Lax);
//! assert!(cookies.set("cookie_consent", "true", attributes));
//! assert!(cookies.check_cookie_consent());
//!
//! // Pattern operations use regular expressions on cookie names.
//! assert_eq!(cookies.cookie_values_by_regex("^tracking_").unwrap(), ["x", "y"]);
//! assert!(cookies.delete_cookies_by_regex("^tracking_").unwrap());
//! assert!(!cookies.exists("tracking_1"));
//!
//! // Finally, get the `Set-Cookie` header values for the response.
//! let header_values: Vec<_> = cookies.transport().header_values().collect();
//! assert_eq!(
//!     header_values,
//!     [
//!         "cookie_consent=true; HttpOnly; SameSite=Lax; Path=/",
//!         "tracking_1=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
//!         "tracking_2=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
//!     ]
//! );
//! ```
//!
//! [`Transport`]: crate::transport::Transport
//! [`HeaderTransport`]: crate::transport::HeaderTransport
//! [`MemoryTransport`]: crate::transport::MemoryTransport

pub mod config;
mod attributes;
mod cookie;
mod directive;
mod directive_id;
mod directives;
mod encoding;
mod expiration;
mod manager;
mod pattern;
mod removal;
mod same_site;
mod session;
mod snapshot;

pub mod transport;

pub use crate::expiration::*;
pub use crate::same_site::SameSite;
pub use attributes::{CookieAttributes, ROOT_PATH};
pub use config::HeaderConfig;
pub use cookie::Cookie;
pub use directive::Directive;
pub use directive_id::DirectiveId;
pub use directives::Directives;
pub use manager::{CookieManager, CookieStore, CONSENT_KEY};
pub use pattern::NameMatcher;
pub use removal::RemovalCookie;
pub use session::SessionStore;
pub use snapshot::CookieSnapshot;
pub use time;

/// Errors that can occur when using `amaretti`.
pub mod errors {
    pub use crate::pattern::PatternError;
    pub use crate::same_site::ParseSameSiteError;
    pub use crate::snapshot::{DecodingError, EmptyNameError, MissingPairError, ParseError};
    pub use crate::transport::TransportError;
}
