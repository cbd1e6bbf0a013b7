use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::{borrow::Cow, fmt};

use crate::storage::StoreError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Closed set of failure classes shared by every layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    FailedPrecondition,
    Unauthenticated,
    PermissionDenied,
    Unimplemented,
    Internal,
    Unknown,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ErrorKind::FailedPrecondition => "FAILED_PRECONDITION",
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::PermissionDenied => "PERMISSION_DENIED",
            ErrorKind::Unimplemented => "UNIMPLEMENTED",
            ErrorKind::Internal => "INTERNAL",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }

    /// Recovers the kind of an arbitrary error by walking its source chain.
    /// Errors that never passed through [`SystemError`] classify as `Unknown`.
    pub fn of(err: &(dyn std::error::Error + 'static)) -> Self {
        find_system_error(err).map_or(ErrorKind::Unknown, |system| system.kind)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::FailedPrecondition => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::Unimplemented => StatusCode::NOT_IMPLEMENTED,
            ErrorKind::Internal | ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by services: a kind, a caller-safe message and the
/// optional lower-layer cause kept for logs.
#[derive(thiserror::Error, Debug)]
#[error("code = {kind}, message = {message}")]
pub struct SystemError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    #[source]
    source: Option<BoxError>,
}

impl SystemError {
    pub fn new(kind: ErrorKind, msg: impl Into<Cow<'static, str>>) -> Self {
        let message = msg.into();
        let message = if message.is_empty() { Cow::Borrowed(kind.as_str()) } else { message };
        Self { kind, message, source: None }
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn invalid_argument(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidArgument, msg)
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }

    pub fn already_exists(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::AlreadyExists, msg)
    }

    pub fn failed_precondition(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::FailedPrecondition, msg)
    }

    pub fn unauthenticated(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthenticated, msg)
    }

    pub fn unimplemented(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unimplemented, msg)
    }

    pub fn internal(source: impl Into<BoxError>) -> Self {
        Self::new(ErrorKind::Internal, "").with_source(source)
    }
}

// Anything a store reports that the call site did not classify is internal.
impl From<StoreError> for SystemError {
    fn from(err: StoreError) -> Self {
        SystemError::internal(err)
    }
}

impl From<argon2::password_hash::Error> for SystemError {
    fn from(err: argon2::password_hash::Error) -> Self {
        SystemError::internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for SystemError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        SystemError::internal(err)
    }
}

/// The wire-facing error. Built from a [`SystemError`] exactly once; the
/// cause is logged here and dropped.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: ErrorKind,
    pub message: Cow<'static, str>,
}

impl Error {
    pub fn new(kind: ErrorKind, msg: impl Into<Cow<'static, str>>) -> Self {
        Self { kind, message: msg.into() }
    }

    pub fn invalid_argument(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidArgument, msg)
    }

    pub fn unauthenticated(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthenticated, msg)
    }

    /// Converts any error value, classifying it with [`ErrorKind::of`].
    /// Only a [`SystemError`] found in the chain contributes its message.
    pub fn from_any(err: &(dyn std::error::Error + 'static)) -> Self {
        let kind = ErrorKind::of(err);
        match kind {
            ErrorKind::Internal | ErrorKind::Unknown => log::error!("{}: {:?}", err, err),
            _ => log::debug!("{}", err),
        }

        let message = find_system_error(err)
            .map_or(Cow::Borrowed(kind.as_str()), |system| system.message.clone());
        Self::new(kind, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

fn find_system_error<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a SystemError> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(system) = e.downcast_ref::<SystemError>() {
            return Some(system);
        }
        current = e.source();
    }
    None
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code = {}, message = {}", self.kind, self.message)
    }
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        Error::from_any(&value)
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(ErrorBody { code: self.kind, message: self.message.clone() })
    }
}
