use std::convert::From;
use std::error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind {
    ScheduleParse,
    PlatformParse,
    StatusParse,
    ComposeParse,
    CommandParse,
    MonthRange,
    TimeParse,
    DateParse,
    ConfigParse,
    IOError(io::Error),
}

impl Error {
    pub fn new(kind: ErrorKind, msg: &str) -> Self {
        Error {
            kind,
            message: Some(msg.to_owned()),
        }
    }

    pub fn with_msg(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            kind,
            message: None,
        }
    }
}

impl From<io::ErrorKind> for Error {
    fn from(kind: io::ErrorKind) -> Error {
        Error::from(io::Error::from(kind))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(parse_error: chrono::ParseError) -> Error {
        Error::new(
            ErrorKind::TimeParse,
            format!("Could not parse timestamp: {}", parse_error).as_str(),
        )
    }
}

impl From<io::Error> for Error {
    fn from(io_error: io::Error) -> Error {
        Error::from(ErrorKind::IOError(io_error))
    }
}

impl From<toml::de::Error> for Error {
    fn from(toml_error: toml::de::Error) -> Error {
        Error::new(ErrorKind::ScheduleParse, &toml_error.to_string())
    }
}

impl From<notify::Error> for Error {
    fn from(watch_error: notify::Error) -> Error {
        let message = watch_error.to_string();
        match watch_error.kind {
            notify::ErrorKind::Io(io_error) => Error::from(io_error),
            _ => Error::from(io::Error::new(io::ErrorKind::Other, message)),
        }
    }
}

impl<E: std::fmt::Debug> From<nom::Err<E>> for Error {
    fn from(error: nom::Err<E>) -> Self {
        Error::new(
            ErrorKind::ComposeParse,
            &format!("Error while parsing: {}", error),
        )
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        if let ErrorKind::IOError(err) = err.kind {
            err
        } else {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                err.message.unwrap_or_else(|| "invalid format".to_owned()),
            )
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {}", self.kind.as_str(), msg),
            None => write!(f, "{}", self.kind.as_str()),
        }
    }
}

impl error::Error for Error {}

impl ErrorKind {
    pub fn as_str(&self) -> String {
        match self {
            ErrorKind::ScheduleParse => "invalid schedule format".to_owned(),
            ErrorKind::PlatformParse => "unknown platform".to_owned(),
            ErrorKind::StatusParse => "unknown post status".to_owned(),
            ErrorKind::ComposeParse => "invalid compose line".to_owned(),
            ErrorKind::CommandParse => "invalid command".to_owned(),
            ErrorKind::MonthRange => "month context out of range".to_owned(),
            ErrorKind::TimeParse => "invalid time format".to_owned(),
            ErrorKind::DateParse => "invalid date format".to_owned(),
            ErrorKind::ConfigParse => "invalid configuration".to_owned(),
            ErrorKind::IOError(err) => err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
