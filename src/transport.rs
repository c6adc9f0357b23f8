//! The seam between a [`CookieManager`] and the HTTP layer.
//!
//! A [`Transport`] provides the cookies the client sent at the start of the
//! request and receives the [`Directive`]s that must end up in the response.
//! Two implementations are provided:
//!
//! - [`HeaderTransport`], which works with raw `Cookie` and `Set-Cookie` header values.
//! - [`MemoryTransport`], an in-memory recorder meant for tests.
//!
//! [`CookieManager`]: crate::CookieManager
use crate::{CookieSnapshot, Directive};

mod header;
mod memory;

pub use header::HeaderTransport;
pub use memory::MemoryTransport;

/// The HTTP layer a [`CookieManager`] reads cookies from and writes directives to.
///
/// [`CookieManager`]: crate::CookieManager
pub trait Transport {
    /// Returns the cookies attached to the incoming request.
    ///
    /// It is called once, when the [`CookieManager`] is created.
    ///
    /// [`CookieManager`]: crate::CookieManager
    fn read_incoming_cookies(&mut self) -> CookieSnapshot;

    /// Schedules a directive for the outgoing response.
    ///
    /// Deletions are directives too, see [`Directive::is_removal()`].
    ///
    /// A directive replaces the pending one with the same [`DirectiveId`]. A
    /// directive that sets a value also supersedes the pending values for the
    /// same cookie name in other scopes: [`Directives`] implements this policy.
    ///
    /// [`DirectiveId`]: crate::DirectiveId
    /// [`Directives`]: crate::Directives
    fn emit(&mut self, directive: Directive<'_>) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read_incoming_cookies(&mut self) -> CookieSnapshot {
        (**self).read_incoming_cookies()
    }

    fn emit(&mut self, directive: Directive<'_>) -> Result<(), TransportError> {
        (**self).emit(directive)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read_incoming_cookies(&mut self) -> CookieSnapshot {
        (**self).read_incoming_cookies()
    }

    fn emit(&mut self, directive: Directive<'_>) -> Result<(), TransportError> {
        (**self).emit(directive)
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by a [`Transport`] that refuses to emit a directive.
pub enum TransportError {
    /// The response headers have already been sent, there is no room left for cookies.
    #[error("The response headers have already been sent")]
    HeadersSent,
    /// The transport refused the directive for another reason.
    #[error("The directive for the `{name}` cookie was rejected: {reason}")]
    Rejected { name: String, reason: String },
}
