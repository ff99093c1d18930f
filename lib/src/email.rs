//! Generic outbound message representation.
//! Provider-specific request shapes are derived from this in `payload`.
use bytes::Bytes;

/// Ordered list of `(address, display name)` pairs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AddressList {
    entries: Vec<(String, Option<String>)>,
}

impl AddressList {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn push(&mut self, address: impl Into<String>, name: Option<&str>) {
        self.entries
            .push((address.into(), name.map(|n| n.to_string())));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(addr, name)| (addr.as_str(), name.as_deref()))
    }

    /// First entry in insertion order. Only this one is used for
    /// single-valued fields like From and Reply-To.
    pub fn first(&self) -> Option<(&str, Option<&str>)> {
        self.iter().next()
    }

    /// Addresses joined with `,`, names dropped
    pub fn joined(&self) -> String {
        self.iter()
            .map(|(addr, _)| addr)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Alternative rendering of the message body (e.g., text/plain)
#[derive(Clone, Debug, PartialEq)]
pub struct Alternative {
    pub content_type: String,
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PartKind {
    Attachment,
    InlineImage,
    Other,
}

impl Default for PartKind {
    fn default() -> Self {
        PartKind::Attachment
    }
}

/// A single non-body MIME part
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Part {
    pub kind: PartKind,

    /// MIME type of the part (e.g., image/png)
    pub content_type: String,

    /// Filename, if the part declared one
    pub filename: String,

    /// Raw (decoded) part data
    pub data: Bytes,
}

impl Part {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Attachments and inline images are the only parts sent as files
    pub fn is_file(&self) -> bool {
        match self.kind {
            PartKind::Attachment | PartKind::InlineImage => true,
            PartKind::Other => false,
        }
    }
}

/// Custom message headers. Lookups ignore ASCII case, like mail headers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets a header, replacing any existing value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutboundMessage {
    pub from: AddressList,
    pub to: AddressList,
    pub cc: AddressList,
    pub bcc: AddressList,

    /// Empty when the message has no Reply-To
    pub reply_to: AddressList,

    pub subject: String,

    /// Primary HTML body
    pub html: String,

    /// Other renderings of the body, in message order
    pub alternatives: Vec<Alternative>,

    /// Attachments, inline images, and any other non-body parts
    pub parts: Vec<Part>,

    pub headers: Headers,
}

impl OutboundMessage {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from(mut self, address: impl Into<String>, name: Option<&str>) -> Self {
        self.from.push(address, name);
        self
    }

    pub fn to(mut self, address: impl Into<String>, name: Option<&str>) -> Self {
        self.to.push(address, name);
        self
    }

    pub fn cc(mut self, address: impl Into<String>, name: Option<&str>) -> Self {
        self.cc.push(address, name);
        self
    }

    pub fn bcc(mut self, address: impl Into<String>, name: Option<&str>) -> Self {
        self.bcc.push(address, name);
        self
    }

    pub fn reply_to(mut self, address: impl Into<String>, name: Option<&str>) -> Self {
        self.reply_to.push(address, name);
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    pub fn alternative(
        mut self,
        content_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.alternatives.push(Alternative {
            content_type: content_type.into(),
            content: content.into(),
        });
        self
    }

    pub fn attachment(mut self, filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.parts.push(Part {
            kind: PartKind::Attachment,
            content_type: "application/octet-stream".to_string(),
            filename: filename.into(),
            data: data.into(),
        });
        self
    }

    pub fn inline_image(
        mut self,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(Part {
            kind: PartKind::InlineImage,
            content_type: content_type.into(),
            filename: filename.into(),
            data: data.into(),
        });
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace the From list with a single bare address
    pub fn with_sender(mut self, sender: String) -> Self {
        self.from.clear();
        self.from.push(sender, None);
        self
    }

    /// Replace the To list. An empty `recipients` keeps the existing list.
    pub fn with_recipients(mut self, recipients: Vec<String>) -> Self {
        if recipients.is_empty() {
            return self;
        }

        self.to.clear();
        for r in recipients {
            self.to.push(r, None);
        }

        self
    }

    /// Content of the first `text/plain` alternative, if any
    pub fn plain_text(&self) -> Option<&str> {
        self.alternatives
            .iter()
            .find(|a| a.content_type == "text/plain")
            .map(|a| a.content.as_str())
    }
}
