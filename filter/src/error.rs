use super::{CONFIG, DATAERR, TEMPFAIL, UNAVAILABLE};

#[derive(Debug)]
pub enum Error {
    Config(String),
    Input(String),
    Rejected(String),
    Temporary(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::Config(ref msg) => write!(f, "Bad configuration: {}", msg),
            Error::Input(ref msg) => write!(f, "Unreadable message: {}", msg),
            Error::Rejected(ref msg) => write!(f, "Elastic Email rejected the message: {}", msg),
            Error::Temporary(ref msg) => write!(f, "Temporary failure: {}", msg),
        }
    }
}

impl Error {
    /// sysexits code reported back to the MTA.
    /// Only temporary failures ask it to retry delivery to the filter.
    pub fn exit_code(&self) -> i32 {
        match *self {
            Error::Config(_) => CONFIG,
            Error::Input(_) => DATAERR,
            Error::Rejected(_) => UNAVAILABLE,
            Error::Temporary(_) => TEMPFAIL,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Temporary(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Input(err.to_string())
    }
}

impl From<elastic_mail::Error> for Error {
    fn from(err: elastic_mail::Error) -> Self {
        match err {
            elastic_mail::Error::Config(msg) => Self::Config(msg),
            elastic_mail::Error::Parse(msg) => Self::Input(msg),
            // Provider answered with something other than its JSON envelope
            elastic_mail::Error::Json(msg) => Self::Rejected(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_errors_map_to_exit_codes() {
        let cases = vec![
            (elastic_mail::Error::Config("api_key".into()), CONFIG),
            (elastic_mail::Error::Parse("bad header".into()), DATAERR),
            (elastic_mail::Error::Json("eof".into()), UNAVAILABLE),
        ];

        for (err, code) in cases {
            assert_eq!(Error::from(err).exit_code(), code);
        }

        assert_eq!(Error::Temporary("timeout".into()).exit_code(), TEMPFAIL);
    }
}
