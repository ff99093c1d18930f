/// All possible library errors outside of the send path.
///
/// `MessageSender::send` never produces one of these: transport failures are
/// handed back as the poster's own error type.
#[derive(Clone, Debug)]
pub enum Error {
    Config(String),
    Parse(String),
    Json(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Config(ref msg) => write!(f, "Config: {}", msg),
            Error::Parse(ref msg) => write!(f, "Parse: {}", msg),
            Error::Json(ref msg) => write!(f, "Json: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<mailparse::MailParseError> for Error {
    fn from(err: mailparse::MailParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<serde_json::error::Error> for Error {
    fn from(err: serde_json::error::Error) -> Self {
        Self::Json(err.to_string())
    }
}
