use futures::future::BoxFuture;

use super::PostRequest;

// Definition of future types for async use
pub type PostFuture<'a, R, E> = BoxFuture<'a, Result<R, E>>;

/// Anything that can issue a single HTTP POST.
///
/// Responses and errors pass through `MessageSender` untouched, so the
/// implementor decides what a failure is (transport only, or also non-2xx).
pub trait HttpPoster {
    type Response;
    type Error;

    fn post(&self, request: PostRequest) -> PostFuture<'_, Self::Response, Self::Error>;
}
