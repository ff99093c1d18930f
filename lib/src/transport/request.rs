use bytes::Bytes;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// A fully shaped POST, independent of any HTTP client
#[derive(Clone, Debug, PartialEq)]
pub struct PostRequest {
    pub url: String,
    pub body: PostBody,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PostBody {
    Form(Vec<(String, String)>),
    Multipart(Vec<FormPart>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        data: Bytes,
    },
}

impl PostBody {
    pub fn content_type(&self) -> &'static str {
        match *self {
            PostBody::Form(_) => FORM_CONTENT_TYPE,
            PostBody::Multipart(_) => MULTIPART_CONTENT_TYPE,
        }
    }

    /// Render a form body as `application/x-www-form-urlencoded`.
    /// Multipart bodies have no such rendering.
    pub fn encode_form(&self) -> Option<String> {
        match self {
            PostBody::Form(fields) => Some(form_urlencode(fields)),
            PostBody::Multipart(_) => None,
        }
    }

    /// Number of parts (or fields) in the body
    pub fn len(&self) -> usize {
        match self {
            PostBody::Form(fields) => fields.len(),
            PostBody::Multipart(parts) => parts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn form_urlencode(fields: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } => name,
            FormPart::File { name, .. } => name,
        }
    }
}
