use mailparse::{MailAddr, MailHeader, MailHeaderMap, ParsedMail};

use crate::email::{AddressList, Alternative, OutboundMessage, Part, PartKind};
use crate::Error;

/// Headers that map onto dedicated message fields and are not kept as
/// custom headers.
const MAPPED_HEADERS: &[&str] = &[
    "From",
    "To",
    "Cc",
    "Bcc",
    "Reply-To",
    "Subject",
    "Content-Type",
    "Content-Transfer-Encoding",
    "Content-Disposition",
    "MIME-Version",
];

fn addresses(headers: &[MailHeader], key: &str) -> Result<AddressList, Error> {
    let mut list = AddressList::new();

    for header in headers.iter().filter(|h| h.get_key().eq_ignore_ascii_case(key)) {
        for addr in mailparse::addrparse_header(header)?.iter() {
            match addr {
                MailAddr::Single(info) => list.push(info.addr.clone(), info.display_name.as_deref()),
                MailAddr::Group(group) => {
                    for info in group.addrs.iter() {
                        list.push(info.addr.clone(), info.display_name.as_deref());
                    }
                }
            }
        }
    }

    Ok(list)
}

/// Inspect part headers to determine if this is an attachment.
/// If it is, build the Part and return it.
fn attachment_part(part: &ParsedMail) -> Result<Option<Part>, Error> {
    let mimetype = &part.ctype.mimetype;
    let has_disposition = part.headers.get_first_value("Content-Disposition").is_some();
    let has_content_id = part.headers.get_first_value("Content-ID").is_some();

    let disposition = part.get_content_disposition();

    let kind = if has_disposition {
        match disposition.disposition {
            mailparse::DispositionType::Attachment => PartKind::Attachment,
            // Inline text is body content, not an attachment
            mailparse::DispositionType::Inline if mimetype.starts_with("text/") => return Ok(None),
            mailparse::DispositionType::Inline if mimetype.starts_with("image/") => {
                PartKind::InlineImage
            }
            mailparse::DispositionType::Inline => PartKind::Attachment,
            _ => {
                log::error!("Unsupported Content-Disposition on {} part", mimetype);
                return Ok(None);
            }
        }
    } else if has_content_id && mimetype.starts_with("image/") {
        // multipart/related images are often referenced by cid only
        PartKind::InlineImage
    } else {
        return Ok(None);
    };

    let filename = disposition
        .params
        .get("filename")
        .or_else(|| part.ctype.params.get("name"))
        .cloned()
        .unwrap_or_default();

    Ok(Some(Part {
        kind,
        content_type: mimetype.to_string(),
        filename,
        data: part.get_body_raw()?.into(),
    }))
}

impl OutboundMessage {
    /// Recursively walk the MIME parts and extract the following:
    ///
    /// 1. HTML body and other text renderings
    /// 2. Inline images
    /// 3. Regular attachments
    ///
    fn parse_recursive(&mut self, part: &ParsedMail) -> Result<(), Error> {
        let mimetype = &part.ctype.mimetype;

        // If this is an attachment, append to Vec and return
        if let Some(attachment) = attachment_part(part)? {
            self.parts.push(attachment);
            return Ok(());
        }

        // Multipart -> process each subpart recursively
        if mimetype.starts_with("multipart/") {
            for subpart in part.subparts.iter() {
                if let Err(e) = self.parse_recursive(subpart) {
                    log::warn!("Skipping unreadable {} subpart: {}", subpart.ctype.mimetype, e);
                }
            }

            return Ok(());
        }

        // Email body
        if mimetype == "text/html" && self.html.is_empty() {
            self.html = part.get_body()?;
        } else if mimetype.starts_with("text/") {
            self.alternatives.push(Alternative {
                content_type: mimetype.to_string(),
                content: part.get_body()?,
            });
        } else {
            self.parts.push(Part {
                kind: PartKind::Other,
                content_type: mimetype.to_string(),
                filename: part.ctype.params.get("name").cloned().unwrap_or_default(),
                data: part.get_body_raw()?.into(),
            });
        }

        Ok(())
    }

    /// Convert a raw MIME email into structured format
    pub fn from_mime(mime_content: &[u8]) -> Result<OutboundMessage, Error> {
        let parsed = mailparse::parse_mail(mime_content)?;
        let headers = &parsed.headers;

        let mut mail = OutboundMessage::new();

        mail.from = addresses(headers, "From")?;
        mail.to = addresses(headers, "To")?;
        mail.cc = addresses(headers, "Cc")?;
        mail.bcc = addresses(headers, "Bcc")?;
        mail.reply_to = addresses(headers, "Reply-To")?;
        mail.subject = headers.get_first_value("Subject").unwrap_or_default();

        for header in headers.iter() {
            let key = header.get_key();

            if MAPPED_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(&key)) {
                continue;
            }

            // Repeated headers: the first occurrence wins
            if !mail.headers.contains(&key) {
                mail.headers.insert(key, header.get_value());
            }
        }

        mail.parse_recursive(&parsed)?;

        Ok(mail)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::File;
    use std::io::Read;

    static SAMPLE_EMAIL_PATHS: &[&str] = &[
        // Content (multipart/alternative), Attachment, Inline image
        concat!(env!("CARGO_MANIFEST_DIR"), "/resources", "/sample_email_1.txt"),

        // Single text/plain part, group address, custom parameters
        concat!(env!("CARGO_MANIFEST_DIR"), "/resources", "/sample_email_2.txt"),
    ];

    fn get_mail(path: &str) -> OutboundMessage {
        let mut mail_file = File::open(path).unwrap();
        let mut mail_content = String::new();
        mail_file.read_to_string(&mut mail_content).unwrap();

        OutboundMessage::from_mime(mail_content.as_bytes()).unwrap()
    }

    #[test]
    fn parse_addresses() {
        let mail = get_mail(SAMPLE_EMAIL_PATHS[0]);

        assert_eq!(mail.from.first(), Some(("b@x.com", Some("Bea"))));
        assert_eq!(mail.to.joined(), "a@x.com,c@x.com");
        assert_eq!(mail.cc.joined(), "d@x.com");
        assert!(mail.bcc.is_empty());
        assert_eq!(mail.reply_to.first(), Some(("r@x.com", Some("Replies"))));
        assert_eq!(mail.subject, "Hi");
    }

    #[test]
    fn parse_body() {
        let mail = get_mail(SAMPLE_EMAIL_PATHS[0]);

        assert_eq!(mail.html.trim(), "<p>hi</p>");
        assert_eq!(mail.plain_text().map(|t| t.trim()), Some("hi"));
    }

    #[test]
    fn parse_attachments() {
        let mail = get_mail(SAMPLE_EMAIL_PATHS[0]);

        assert_eq!(mail.parts.len(), 2);
        assert_eq!(mail.parts[0].kind, PartKind::Attachment);
        assert_eq!(mail.parts[0].filename, "hello.txt");
        assert_eq!(&mail.parts[0].data[..], b"Hello there!\n");

        assert_eq!(mail.parts[1].kind, PartKind::InlineImage);
        assert_eq!(mail.parts[1].filename, "logo.gif");
        assert_eq!(&mail.parts[1].data[..], b"GIF89a");
    }

    #[test]
    fn parse_custom_headers() {
        let mail = get_mail(SAMPLE_EMAIL_PATHS[0]);

        assert_eq!(mail.headers.get("channel"), Some("weekly"));
        assert!(!mail.headers.contains("Subject"));
    }

    #[test]
    fn repeated_custom_header_keeps_first() {
        let raw = b"From: a@x.com\nTo: b@x.com\nchannel: first\nChannel: second\n\
                    Subject: x\n\nbody\n";
        let mail = OutboundMessage::from_mime(raw).unwrap();

        assert_eq!(mail.headers.get("channel"), Some("first"));
        assert_eq!(mail.headers.len(), 1);
    }

    #[test]
    fn parse_single_part() {
        let mail = get_mail(SAMPLE_EMAIL_PATHS[1]);

        assert_eq!(mail.to.joined(), "one@x.com,two@x.com");
        assert!(mail.html.is_empty());
        assert_eq!(mail.plain_text().map(|t| t.trim()), Some("Plain only."));
        assert!(mail.parts.is_empty());
        assert!(mail.reply_to.is_empty());
        assert_eq!(mail.headers.get("isTransactional"), Some("0"));
    }
}
