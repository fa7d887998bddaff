use std::error::Error;

use crate::error::ErrorKind;
use crate::request::ModelRequest;
use crate::response::ModelResponse;

/// The error type for a model provider.
pub trait ModelProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// Something that turns a [`ModelRequest`] into a streamed reply.
///
/// A provider is expected to answer every request on its own merits, with
/// no memory of earlier ones, and may be dropped at any time. Retry and
/// timeout policies belong to the provider: callers send a request once and
/// treat any error as final.
pub trait ModelProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ModelProviderError;

    /// The response type for this provider.
    type Response: ModelResponse<Error = Self::Error>;

    /// Starts a request. The future resolves once the reply starts
    /// streaming, and does not borrow the provider.
    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static;
}
