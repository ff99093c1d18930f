use reqwest::header::CONTENT_TYPE;
use reqwest::multipart;

use super::client::{HttpPoster, PostFuture};
use super::request::{form_urlencode, FormPart, PostBody, PostRequest, FORM_CONTENT_TYPE};

/// Plain reqwest poster. Non-2xx responses are returned as responses,
/// only transport failures become errors.
impl HttpPoster for reqwest::Client {
    type Response = reqwest::Response;
    type Error = reqwest::Error;

    fn post(&self, request: PostRequest) -> PostFuture<'_, Self::Response, Self::Error> {
        log::debug!(
            "POST {} ({}, {} parts)",
            request.url,
            request.body.content_type(),
            request.body.len()
        );

        let req = reqwest::Client::post(self, request.url.as_str());

        let req = match request.body {
            PostBody::Form(fields) => req
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(form_urlencode(&fields)),
            PostBody::Multipart(parts) => req.multipart(build_form(parts)),
        };

        Box::pin(async move { req.send().await })
    }
}

fn build_form(parts: Vec<FormPart>) -> multipart::Form {
    parts
        .into_iter()
        .fold(multipart::Form::new(), |form, part| match part {
            FormPart::Text { name, value } => form.text(name, value),
            FormPart::File {
                name,
                filename,
                data,
            } => form.part(
                name,
                multipart::Part::bytes(data.to_vec()).file_name(filename),
            ),
        })
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use crate::{MessageSender, OutboundMessage};

    const OK_RESPONSE: &str = "HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";

    /// True once the headers and the whole body have arrived
    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf).to_lowercase();

        let head_end = match text.find("\r\n\r\n") {
            Some(i) => i + 4,
            None => return false,
        };

        let length = text[..head_end]
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());

        match length {
            Some(n) => buf.len() >= head_end + n,
            None if text[..head_end].contains("transfer-encoding: chunked") => {
                text.ends_with("0\r\n\r\n")
            }
            None => true,
        }
    }

    /// Accept a single connection and hand back the raw request
    async fn capture_request() -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v2/email/send", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];

            while !request_complete(&buf) {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }

            socket.write_all(OK_RESPONSE.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&buf).into_owned()
        });

        (url, handle)
    }

    fn sample() -> OutboundMessage {
        OutboundMessage::new()
            .to("a@x.com", Some("A"))
            .from("b@x.com", Some("B"))
            .subject("Hi")
            .html("<p>hi</p>")
            .alternative("text/plain", "hi")
    }

    #[tokio::test]
    async fn test_post_form_on_the_wire() {
        let (url, handle) = capture_request().await;
        let sender = MessageSender::new(reqwest::Client::new(), "k", "a").with_endpoint(url);

        let resp = sender.send(&sample()).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let raw = handle.await.unwrap();
        let lower = raw.to_lowercase();

        assert!(raw.starts_with("POST /v2/email/send HTTP/1.1\r\n"));
        assert!(lower.contains("content-type: application/x-www-form-urlencoded\r\n"));
        assert!(raw.ends_with(
            "\r\n\r\napi_key=k&account=a&msgTo=a%40x.com&msgCC=&msgBcc=\
             &msgFrom=b%40x.com&msgFromName=B&from=b%40x.com&fromName=B\
             &subject=Hi&body_html=%3Cp%3Ehi%3C%2Fp%3E&body_text=hi&isTransactional=1"
        ));
    }

    #[tokio::test]
    async fn test_post_multipart_on_the_wire() {
        let (url, handle) = capture_request().await;
        let sender = MessageSender::new(reqwest::Client::new(), "k", "a").with_endpoint(url);
        let mail = sample()
            .attachment("r.txt", &b"report body"[..])
            .inline_image("logo.gif", "image/gif", &b"GIF89a"[..]);

        sender.send(&mail).await.unwrap();

        let raw = handle.await.unwrap();
        let lower = raw.to_lowercase();

        assert!(lower.contains("content-type: multipart/form-data; boundary="));
        assert!(raw.contains("Content-Disposition: form-data; name=\"subject\"\r\n\r\nHi\r\n"));
        assert!(raw.contains("Content-Disposition: form-data; name=\"file_0\"; filename=\"r.txt\""));
        assert!(raw.contains("report body"));
        assert!(raw.contains("Content-Disposition: form-data; name=\"file_1\"; filename=\"logo.gif\""));
        assert!(!lower.contains("application/x-www-form-urlencoded"));
    }
}
