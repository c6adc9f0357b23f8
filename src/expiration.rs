use time::OffsetDateTime;

/// A cookie's expiration: either a date-time or session.
///
/// An `Expiration` is constructible with `Expiration::from()` via any of:
///
///   * `None` -> `Expiration::Session`
///   * `Some(OffsetDateTime)` -> `Expiration::DateTime`
///   * `OffsetDateTime` -> `Expiration::DateTime`
///
/// ```rust
/// use amaretti::{Expiration, time::OffsetDateTime};
///
/// let expires = Expiration::from(None);
/// assert_eq!(expires, Expiration::Session);
///
/// let now = OffsetDateTime::now_utc();
/// assert_eq!(Expiration::from(now), Expiration::DateTime(now));
/// assert_eq!(Expiration::from(Some(now)), Expiration::DateTime(now));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiration {
    /// Expiration for a "permanent" cookie at a specific date-time.
    DateTime(OffsetDateTime),
    /// Expiration for a "session" cookie. Browsers decide when the "session"
    /// is over, typically (but not necessarily) when the browser is closed.
    Session,
}

impl Expiration {
    /// Builds an `Expiration::DateTime` from a number of seconds since the Unix epoch.
    ///
    /// # Example
    ///
    /// ```rust
    /// use amaretti::Expiration;
    ///
    /// let expires = Expiration::from_unix_timestamp(1_445_412_480).unwrap();
    /// assert_eq!(expires.unix_timestamp(), Some(1_445_412_480));
    /// ```
    pub fn from_unix_timestamp(seconds: i64) -> Result<Self, time::error::ComponentRange> {
        OffsetDateTime::from_unix_timestamp(seconds).map(Expiration::DateTime)
    }

    /// Returns `true` if `self` is an `Expiration::DateTime`.
    pub fn is_datetime(&self) -> bool {
        matches!(self, Expiration::DateTime(_))
    }

    /// Returns `true` if `self` is an `Expiration::Session`.
    pub fn is_session(&self) -> bool {
        matches!(self, Expiration::Session)
    }

    /// Returns the inner `OffsetDateTime` if `self` is a `DateTime`.
    pub fn datetime(self) -> Option<OffsetDateTime> {
        match self {
            Expiration::Session => None,
            Expiration::DateTime(v) => Some(v),
        }
    }

    /// Returns the expiration as seconds since the Unix epoch, if `self` is a `DateTime`.
    ///
    /// Session cookies have no timestamp:
    ///
    /// ```rust
    /// use amaretti::Expiration;
    ///
    /// assert_eq!(Expiration::Session.unix_timestamp(), None);
    /// ```
    pub fn unix_timestamp(self) -> Option<i64> {
        self.datetime().map(|t| t.unix_timestamp())
    }

    /// Applies `f` to the inner `OffsetDateTime` if `self` is a `DateTime` and
    /// returns the mapped `Expiration`.
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(OffsetDateTime) -> OffsetDateTime,
    {
        match self {
            Expiration::Session => Expiration::Session,
            Expiration::DateTime(v) => Expiration::DateTime(f(v)),
        }
    }
}

impl<T: Into<Option<OffsetDateTime>>> From<T> for Expiration {
    fn from(option: T) -> Self {
        match option.into() {
            Some(value) => Expiration::DateTime(value),
            None => Expiration::Session,
        }
    }
}
