pub mod api;
pub mod config;
pub mod email;
mod error;
mod mime;
pub mod payload;
pub mod sender;
pub mod transport;

pub use email::OutboundMessage;
pub use error::Error;
pub use sender::MessageSender;
