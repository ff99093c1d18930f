use crate::email::OutboundMessage;
use crate::payload::{collect_attachments, Payload, ELASTIC_SEND_URL, MAXIMUM_FILE_SIZE};
use crate::transport::{HttpPoster, PostRequest};

/// Sends `OutboundMessage`s through the Elastic Email HTTP API.
///
/// Holds only immutable credentials, so one sender can be shared between
/// tasks as long as the poster allows it.
pub struct MessageSender<C> {
    client: C,
    api_key: String,
    account: String,
    endpoint: String,
    max_attachment_size: usize,
}

impl<C: HttpPoster> MessageSender<C> {
    pub fn new(client: C, api_key: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            account: account.into(),
            endpoint: ELASTIC_SEND_URL.to_string(),
            max_attachment_size: MAXIMUM_FILE_SIZE,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_max_attachment_size(mut self, size: usize) -> Self {
        self.max_attachment_size = size;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Shape the request for `message` without sending it
    pub fn request(&self, message: &OutboundMessage) -> PostRequest {
        let attachments = collect_attachments(message, self.max_attachment_size);
        let payload = Payload::build(message, &self.api_key, &self.account);

        log::debug!(
            "Mapped message \"{}\" to {} fields and {} attachments",
            message.subject,
            payload.values().count(),
            attachments.len()
        );

        PostRequest {
            url: self.endpoint.clone(),
            body: payload.into_body(attachments),
        }
    }

    /// Issue exactly one POST for `message`.
    ///
    /// The poster's response and error come back as-is: no retries and no
    /// status inspection happen here.
    pub async fn send(&self, message: &OutboundMessage) -> Result<C::Response, C::Error> {
        let request = self.request(message);
        self.client.post(request).await
    }
}
