use derive_more::Display;
use kvdex_core::{
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
    store::StoreError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Record the failed call was writing, when one was assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,

    /// Indices left out of date by an `UpdateFailed` error.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_indexes: Vec<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
            record_id: None,
            failed_indexes: Vec::new(),
        }
    }

    /// Attach the identifier of the record being written, unless one is already set.
    #[must_use]
    pub(crate) fn with_record_id(mut self, id: impl std::fmt::Display) -> Self {
        if self.record_id.is_none() {
            self.record_id = Some(id.to_string());
        }
        self
    }

    pub(crate) fn not_found(type_name: &str, id: impl std::fmt::Display) -> Self {
        InternalError::record_not_found(type_name, id).into()
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::Record(RecordErrorKind::NotFound))
    }

    /// Whether re-running the failed call with the same arguments is safe and may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Index(IndexErrorKind::UpdateFailed)
                | ErrorKind::Store(StoreErrorKind::Unavailable)
        )
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match err.class {
            ErrorClass::InvalidIndexSpec => ErrorKind::Index(IndexErrorKind::InvalidSpec),
            ErrorClass::UnknownIndex => ErrorKind::Index(IndexErrorKind::Unknown),
            ErrorClass::IndexUpdate => ErrorKind::Index(IndexErrorKind::UpdateFailed),
            ErrorClass::StoreUnavailable => ErrorKind::Store(StoreErrorKind::Unavailable),
            ErrorClass::Corruption => ErrorKind::Store(StoreErrorKind::Corrupt),
            ErrorClass::NotFound => ErrorKind::Record(RecordErrorKind::NotFound),
            ErrorClass::Internal => ErrorKind::Internal,
        };

        let (record_id, failed_indexes) = match err.index_update_failure() {
            Some(failure) => (
                Some(failure.record_id.clone()),
                failure
                    .failed_indexes()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            ),
            None => (None, Vec::new()),
        };

        Self {
            record_id,
            failed_indexes,
            ..Self::new(kind, err.origin.into(), err.message)
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        InternalError::from(err).into()
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::new(
            ErrorKind::Store(StoreErrorKind::Corrupt),
            ErrorOrigin::Record,
            format!("record decode failed: {err}"),
        )
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    Index(IndexErrorKind),
    Record(RecordErrorKind),
    Store(StoreErrorKind),

    /// The caller cannot remediate this.
    Internal,
}

///
/// IndexErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum IndexErrorKind {
    /// Malformed declaration or attribute/value arity. A programming error.
    InvalidSpec,

    /// No index is declared on the requested attribute combination.
    Unknown,

    /// One or more index families were not brought up to date.
    UpdateFailed,
}

///
/// RecordErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RecordErrorKind {
    /// Target record does not exist.
    NotFound,
}

///
/// StoreErrorKind
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum StoreErrorKind {
    Unavailable,
    Corrupt,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Registry,
    Key,
    Writer,
    Resolver,
    Store,
    Record,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Registry => Self::Registry,
            CoreErrorOrigin::Key => Self::Key,
            CoreErrorOrigin::Writer => Self::Writer,
            CoreErrorOrigin::Resolver => Self::Resolver,
            CoreErrorOrigin::Store => Self::Store,
            CoreErrorOrigin::Record => Self::Record,
        }
    }
}

///
/// TESTS
///
