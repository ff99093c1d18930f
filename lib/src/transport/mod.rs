mod client;
mod http;
mod request;

pub use client::{HttpPoster, PostFuture};
pub use request::{FormPart, PostBody, PostRequest};
