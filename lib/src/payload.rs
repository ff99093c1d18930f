use bytes::Bytes;

use crate::email::{AddressList, OutboundMessage};
use crate::transport::{FormPart, PostBody};

/// Elastic Email v2 send endpoint
pub const ELASTIC_SEND_URL: &str = "https://api.elasticemail.com/v2/email/send";

/// Largest attachment sent, in bytes (10 MiB)
pub const MAXIMUM_FILE_SIZE: usize = 10_485_760;

/// Provider parameters that may be set through custom headers, and their
/// default when the header is missing.
pub const PARAMETERS: &[(&str, Option<&str>)] = &[
    ("channel", None),
    ("isTransactional", Some("1")),
];

/// Flat field -> value mapping submitted to the provider.
///
/// A field may be present with no value (e.g., `body_text` when the message
/// has no plain text rendering). Such fields are left out of the encoded body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload {
    fields: Vec<(&'static str, Option<String>)>,
}

/// An attachment that made it past the size policy
#[derive(Clone, Debug, PartialEq)]
pub struct AttachmentFile {
    pub filename: String,
    pub contents: Bytes,
}

/// `(address, name)` of the first entry, or `None` for an empty list
fn first_address(list: &AddressList) -> Option<(String, Option<String>)> {
    list.first()
        .map(|(addr, name)| (addr.to_string(), name.map(|n| n.to_string())))
}

impl Payload {
    pub fn new() -> Self {
        Default::default()
    }

    /// Map a message into the provider's field set.
    ///
    /// Only the first From (and Reply-To) entry is used.
    pub fn build(message: &OutboundMessage, api_key: &str, account: &str) -> Self {
        let mut payload = Self::new();

        let (from, from_name) = first_address(&message.from).unwrap_or_default();

        payload.set("api_key", Some(api_key.to_string()));
        payload.set("account", Some(account.to_string()));
        payload.set("msgTo", Some(message.to.joined()));
        payload.set("msgCC", Some(message.cc.joined()));
        payload.set("msgBcc", Some(message.bcc.joined()));
        payload.set("msgFrom", Some(from.clone()));
        payload.set("msgFromName", from_name.clone());
        payload.set("from", Some(from));
        payload.set("fromName", from_name);
        payload.set("subject", Some(message.subject.clone()));
        payload.set("body_html", Some(message.html.clone()));
        payload.set("body_text", message.plain_text().map(|t| t.to_string()));

        if let Some((reply_to, reply_to_name)) = first_address(&message.reply_to) {
            payload.set("replyTo", Some(reply_to));
            payload.set("replyToName", reply_to_name);
        }

        payload.fold_parameters(message);

        payload
    }

    /// Header value wins, then the table default. Parameters with neither
    /// are not added at all.
    fn fold_parameters(&mut self, message: &OutboundMessage) {
        for &(name, default) in PARAMETERS {
            if let Some(value) = message.headers.get(name) {
                self.set(name, Some(value.to_string()));
            } else if let Some(value) = default {
                self.set(name, Some(value.to_string()));
            }
        }
    }

    /// Set a field, keeping its original position if it already exists
    pub fn set(&mut self, name: &'static str, value: Option<String>) {
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(field) => field.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// True if the field exists, with or without a value
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(k, _)| *k == name)
    }

    /// Field names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    /// Fields that carry a value, in insertion order
    pub fn values(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.fields
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
    }

    /// Shape the request body: urlencoded form without attachments,
    /// multipart with one `file_<n>` part per attachment otherwise.
    pub fn into_body(self, attachments: Vec<AttachmentFile>) -> PostBody {
        let fields = self
            .values()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();

        if attachments.is_empty() {
            return PostBody::Form(fields);
        }

        let mut parts = fields
            .into_iter()
            .map(|(name, value)| FormPart::Text { name, value })
            .collect::<Vec<_>>();

        parts.extend(
            attachments
                .into_iter()
                .enumerate()
                .map(|(i, file)| FormPart::File {
                    name: format!("file_{}", i),
                    filename: file.filename,
                    data: file.contents,
                }),
        );

        PostBody::Multipart(parts)
    }
}

/// Collect the attachments and inline images that will be sent.
///
/// Empty parts are skipped. Parts larger than `max_size` are dropped with a
/// warning rather than failing the whole send.
pub fn collect_attachments(message: &OutboundMessage, max_size: usize) -> Vec<AttachmentFile> {
    message
        .parts
        .iter()
        .filter(|part| part.is_file())
        .filter(|part| {
            let size = part.size();

            if size == 0 {
                log::debug!("Skipping empty attachment \"{}\"", part.filename);
                false
            } else if size > max_size {
                log::warn!(
                    "Dropping attachment \"{}\": {} bytes exceeds limit of {}",
                    part.filename,
                    size,
                    max_size
                );
                false
            } else {
                true
            }
        })
        .map(|part| AttachmentFile {
            filename: part.filename.clone(),
            contents: part.data.clone(),
        })
        .collect()
}
