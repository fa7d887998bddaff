/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The credential was rejected.
    Unauthorized,
    /// The model provider is rate limited.
    RateLimitExceeded,
    /// The content is moderated.
    Moderated,
    /// The request did not finish in time.
    Timeout,
    /// The provider could not be reached.
    Connection,
    /// The provider failed on its side.
    Server,
    /// The provider replied with something we cannot understand.
    InvalidResponse,
    /// Any other errors.
    Other,
}

impl ErrorKind {
    /// Returns `true` if sending the same request again may succeed.
    #[inline]
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded
                | Self::Timeout
                | Self::Connection
                | Self::Server
        )
    }
}
