use std::io::Read;
use std::time::Duration;

use structopt::StructOpt;

use elastic_mail::api::ApiResponse;
use elastic_mail::config::{self, Settings};
use elastic_mail::{MessageSender, OutboundMessage};

mod error;

use error::Error;

// See sysexits.h
pub const DATAERR: i32 = 65;
pub const UNAVAILABLE: i32 = 69;
pub const TEMPFAIL: i32 = 75;
pub const CONFIG: i32 = 78;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "elastic-filter",
    about = "Send a MIME message read from stdin through Elastic Email."
)]
struct Opt {
    /// Path to the TOML config file
    #[structopt(short, long)]
    config: Option<String>,

    /// Overrides the From header
    #[structopt(short, long)]
    sender: Option<String>,

    /// Overrides the To header
    #[structopt(short, long)]
    recipients: Vec<String>,
}

/// Transmit this email to Elastic Email and check the provider's verdict
async fn process(settings: Settings, mail: OutboundMessage) -> Result<ApiResponse, Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout))
        .build()?;

    let sender = MessageSender::new(client, settings.api_key, settings.account)
        .with_endpoint(settings.endpoint)
        .with_max_attachment_size(settings.max_attachment_size);

    let resp = sender.send(&mail).await?;
    let status = resp.status();
    let body = resp.bytes().await?;

    if !status.is_success() {
        log::error!("Failed to send \"{}\": HTTP {}", mail.subject, status);
        return Err(Error::Rejected(format!("HTTP {}", status)));
    }

    let result = ApiResponse::from_slice(&body)?;

    if !result.success {
        let reason = result.error.unwrap_or_else(|| "no reason given".to_string());
        return Err(Error::Rejected(reason));
    }

    Ok(result)
}

async fn run(opt: Opt) -> Result<ApiResponse, Error> {
    let settings = config::load_config(opt.config.as_deref())?;

    // Get message from stdin
    let mut content = Vec::new();
    std::io::stdin().read_to_end(&mut content)?;

    let mut mail = OutboundMessage::from_mime(&content)?.with_recipients(opt.recipients);

    if let Some(sender) = opt.sender {
        mail = mail.with_sender(sender);
    }

    log::info!(
        "Sending \"{}\" to {} ({} parts)",
        mail.subject,
        mail.to.joined(),
        mail.parts.len()
    );

    process(settings, mail).await
}

#[tokio::main]
async fn main() {
    // Init logger
    env_logger::builder().format_timestamp_micros().init();

    let opt = Opt::from_args();

    let code = match run(opt).await {
        Ok(result) => {
            log::info!(
                "Message queued, transaction {}",
                result.transaction_id().unwrap_or("unknown")
            );
            0
        }
        Err(e) => {
            log::error!("{}", e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}
