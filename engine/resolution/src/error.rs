//! Error type shared by the resolution engine and the client facade.

use std::fmt;

use transport::TransportError;

/// Result alias for lookups.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// The public lookup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Lookup by schema id
    GetById,
    /// Lookup by exact subject and version
    GetBySubjectVersion,
    /// Lookup of a subject's latest version
    GetLatest,
    /// Listing of all subjects
    ListSubjects,
    /// Listing of a subject's versions
    ListVersions,
    /// Reverse reference lookup
    GetReferencedBy,
    /// Listing of supported schema formats
    ListSchemaTypes,
    /// Payload codec construction for a schema id
    CodecForId,
    /// Subject deletion
    DeleteSubject,
}

impl Operation {
    /// Snake-case operation name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetById => "get_by_id",
            Operation::GetBySubjectVersion => "get_by_subject_version",
            Operation::GetLatest => "get_latest",
            Operation::ListSubjects => "list_subjects",
            Operation::ListVersions => "list_versions",
            Operation::GetReferencedBy => "get_referenced_by",
            Operation::ListSchemaTypes => "list_schema_types",
            Operation::CodecForId => "codec_for_id",
            Operation::DeleteSubject => "delete_subject",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Coarse classification of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The registry has no such id, subject or version
    NotFound,
    /// Network, timeout, or non-2xx without a decodable body
    TransportFailure,
    /// The registry returned a structured error
    Registry,
    /// The registry's answers were internally inconsistent
    Resolution,
    /// A response body could not be decoded into a record
    Decode,
    /// A payload codec could not be built
    Codec,
}

/// A failed lookup, carrying the operation and the key that was attempted.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registry reported that the key does not exist.
    #[error("{operation} [{key}]: not found: {message}")]
    NotFound {
        /// Failed operation
        operation: Operation,
        /// Key attempted
        key: String,
        /// Registry message, or the HTTP status when the body was empty
        message: String,
    },

    /// The request never produced a usable registry answer.
    #[error("{operation} [{key}]: transport failure: {source}")]
    TransportFailure {
        /// Failed operation
        operation: Operation,
        /// Key attempted
        key: String,
        /// Underlying transport error
        #[source]
        source: TransportError,
    },

    /// The registry answered with a structured error object.
    #[error("{operation} [{key}]: registry error {error_code} (HTTP {status}): {message}")]
    Registry {
        /// Failed operation
        operation: Operation,
        /// Key attempted
        key: String,
        /// HTTP status
        status: u16,
        /// Registry error code
        error_code: i32,
        /// Registry message
        message: String,
    },

    /// The registry's answers could not be turned into a record for the key.
    #[error("{operation} [{key}]: resolution failed: {reason}")]
    Resolution {
        /// Failed operation
        operation: Operation,
        /// Key attempted
        key: String,
        /// What was inconsistent
        reason: String,
    },

    /// A response body was malformed.
    #[error("{operation} [{key}]: decode failed: {reason}")]
    Decode {
        /// Failed operation
        operation: Operation,
        /// Key attempted
        key: String,
        /// Decoder message
        reason: String,
    },

    /// A payload codec could not be built for the schema.
    #[error("{operation} [{key}]: codec error: {reason}")]
    Codec {
        /// Failed operation
        operation: Operation,
        /// Key attempted
        key: String,
        /// Codec message
        reason: String,
    },

    /// The client was built without codec creation.
    #[error("{operation} [{key}]: codec creation is disabled")]
    CodecDisabled {
        /// Failed operation
        operation: Operation,
        /// Key attempted
        key: String,
    },
}

impl RegistryError {
    /// Classifies a transport failure for the given operation and key.
    ///
    /// HTTP 404 and the registry's `404xx` codes become [`ErrorKind::NotFound`];
    /// other statuses with a decodable error body become
    /// [`ErrorKind::Registry`]; bodiless statuses and connection failures
    /// become [`ErrorKind::TransportFailure`]; undecodable success bodies
    /// become [`ErrorKind::Decode`].
    pub fn from_transport(operation: Operation, key: impl Into<String>, err: TransportError) -> Self {
        let key = key.into();
        match err {
            TransportError::Status { status, error_code, ref message }
                if status == 404 || error_code.is_some_and(|code| code / 100 == 404) =>
            {
                let message = message.clone().unwrap_or_else(|| format!("HTTP {}", status));
                RegistryError::NotFound { operation, key, message }
            }
            TransportError::Status { status, error_code, message }
                if error_code.is_some() || message.is_some() =>
            {
                RegistryError::Registry {
                    operation,
                    key,
                    status,
                    error_code: error_code.unwrap_or(i32::from(status)),
                    message: message.unwrap_or_default(),
                }
            }
            TransportError::Serialization(reason) => {
                RegistryError::Decode { operation, key, reason }
            }
            source => RegistryError::TransportFailure { operation, key, source },
        }
    }

    /// The error's classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::NotFound { .. } => ErrorKind::NotFound,
            RegistryError::TransportFailure { .. } => ErrorKind::TransportFailure,
            RegistryError::Registry { .. } => ErrorKind::Registry,
            RegistryError::Resolution { .. } => ErrorKind::Resolution,
            RegistryError::Decode { .. } => ErrorKind::Decode,
            RegistryError::Codec { .. } | RegistryError::CodecDisabled { .. } => ErrorKind::Codec,
        }
    }

    /// The operation that failed.
    pub fn operation(&self) -> Operation {
        match self {
            RegistryError::NotFound { operation, .. }
            | RegistryError::TransportFailure { operation, .. }
            | RegistryError::Registry { operation, .. }
            | RegistryError::Resolution { operation, .. }
            | RegistryError::Decode { operation, .. }
            | RegistryError::Codec { operation, .. }
            | RegistryError::CodecDisabled { operation, .. } => *operation,
        }
    }

    /// The key that was attempted.
    pub fn key(&self) -> &str {
        match self {
            RegistryError::NotFound { key, .. }
            | RegistryError::TransportFailure { key, .. }
            | RegistryError::Registry { key, .. }
            | RegistryError::Resolution { key, .. }
            | RegistryError::Decode { key, .. }
            | RegistryError::Codec { key, .. }
            | RegistryError::CodecDisabled { key, .. } => key,
        }
    }
}
