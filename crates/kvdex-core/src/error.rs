use crate::store::StoreError;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// The facade crate maps this onto its public error taxonomy.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Construct a malformed-declaration or arity error for a specific origin.
    pub(crate) fn invalid_spec(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidIndexSpec, origin, message)
    }

    /// Construct a registry-origin unknown-index error.
    pub(crate) fn unknown_index(type_name: &str, attribute_names: &[&str]) -> Self {
        Self::new(
            ErrorClass::UnknownIndex,
            ErrorOrigin::Registry,
            format!(
                "no index declared on {type_name}({})",
                attribute_names.join(", ")
            ),
        )
    }

    /// Construct a writer-origin aggregate index update failure.
    pub(crate) fn index_update(failure: IndexUpdateFailure) -> Self {
        Self::new(ErrorClass::IndexUpdate, ErrorOrigin::Writer, failure.to_string())
            .with_detail(ErrorDetail::IndexUpdate(failure))
    }

    /// Construct a config-origin validation error.
    pub(crate) fn config_invalid(message: impl Into<String>) -> Self {
        Self::invalid_spec(ErrorOrigin::Config, message)
    }

    /// Construct a record-origin corruption error.
    pub(crate) fn record_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Record, message)
    }

    /// Construct a record-origin not-found error.
    pub fn record_not_found(type_name: &str, id: impl fmt::Display) -> Self {
        Self::new(
            ErrorClass::NotFound,
            ErrorOrigin::Record,
            format!("record not found: {type_name} {id}"),
        )
    }

    /// Construct a record-origin internal error.
    pub fn record_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Record, message)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    /// Whether re-running the failed operation unchanged is safe and may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.class,
            ErrorClass::StoreUnavailable | ErrorClass::IndexUpdate
        )
    }

    /// Borrow the aggregate index update detail, if this is an index update failure.
    #[must_use]
    pub const fn index_update_failure(&self) -> Option<&IndexUpdateFailure> {
        match &self.detail {
            Some(ErrorDetail::IndexUpdate(failure)) => Some(failure),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<StoreError> for InternalError {
    fn from(err: StoreError) -> Self {
        let class = match err {
            StoreError::Unavailable { .. } => ErrorClass::StoreUnavailable,
            StoreError::WrongType { .. } => ErrorClass::Corruption,
        };

        Self::new(class, ErrorOrigin::Store, err.to_string()).with_detail(ErrorDetail::Store(err))
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Store(StoreError),

    #[error("{0}")]
    IndexUpdate(IndexUpdateFailure),
}

///
/// IndexUpdateFailure
///
/// Every index operation that failed during one `apply` call.
/// Families not listed here were brought up to date.
///

#[derive(Debug, ThisError)]
#[error(
    "index update failed for {type_name} {record_id}: {} of {attempted} index operations failed [{}]",
    .families.len(),
    join_families(.families)
)]
pub struct IndexUpdateFailure {
    pub type_name: String,
    pub record_id: String,
    pub attempted: usize,
    pub families: Vec<IndexFamilyFailure>,
}

impl IndexUpdateFailure {
    /// Display names of the failed index families, in declaration order.
    #[must_use]
    pub fn failed_indexes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.families.iter().map(|f| f.index.as_str()).collect();
        names.dedup();

        names
    }
}

fn join_families(families: &[IndexFamilyFailure]) -> String {
    families
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

///
/// IndexFamilyFailure
///

#[derive(Debug, ThisError)]
#[error("{index} {step} {key}: {source}")]
pub struct IndexFamilyFailure {
    pub index: String,
    pub step: IndexStep,
    pub key: String,
    pub source: StoreError,
}

///
/// IndexStep
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IndexStep {
    Remove,
    Add,
}

impl fmt::Display for IndexStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Remove => "remove",
            Self::Add => "add",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Malformed declaration or attribute/value arity. Not retried.
    InvalidIndexSpec,
    /// Query names an attribute combination with no declared index.
    UnknownIndex,
    /// One or more index families failed to update.
    IndexUpdate,
    /// Transient store failure.
    StoreUnavailable,
    Corruption,
    NotFound,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InvalidIndexSpec => "invalid_index_spec",
            Self::UnknownIndex => "unknown_index",
            Self::IndexUpdate => "index_update",
            Self::StoreUnavailable => "store_unavailable",
            Self::Corruption => "corruption",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Registry,
    Key,
    Writer,
    Resolver,
    Store,
    Record,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Registry => "registry",
            Self::Key => "key",
            Self::Writer => "writer",
            Self::Resolver => "resolver",
            Self::Store => "store",
            Self::Record => "record",
        };
        write!(f, "{label}")
    }
}
