use std::fmt::{self, Debug, Display, Formatter};

/// A routing configuration error raised while a [`Router`](crate::Router)
/// is being built, e.g. for a route template with unbalanced braces.
///
/// Request-time failures never use this type; they travel as
/// [`Interrupt`](crate::Interrupt) values instead.
pub struct Error {
    msg: String,
}

impl Error {
    pub(crate) fn new<M: Into<String>>(msg: M) -> Error {
        Error { msg: msg.into() }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "restrie: {}", self.msg)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "restrie: {}", self.msg)
    }
}

impl std::error::Error for Error {}
