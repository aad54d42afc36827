//! Errors for all of the crate's operations, collected into one enum.

use crate::state::ServiceVersion;

/// The type of error embedded in a Result returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error emitted during client instantiation when the `DOCKER_HOST`
    /// environment variable, or an explicit host argument, is malformed.
    #[error("Failed to parse docker host address: {0}")]
    UrlParseError(#[from] url::ParseError),
    /// Error emitted when the docker host URI carries a scheme this client
    /// cannot speak.
    #[error("Unsupported URI scheme '{scheme}' for the docker host")]
    UnsupportedUriSchemeError {
        /// The unsupported scheme.
        scheme: String,
    },
    /// Generic I/O error, raised while reading the local socket.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error emitted by the HTTP request builder.
    #[error("Failed to build HTTP request: {0}")]
    HttpError(#[from] http::Error),
    /// Error emitted by the underlying HTTP transport.
    #[error("HTTP transport error: {0}")]
    HyperError(#[from] hyper::Error),
    /// Error emitted while establishing the connection to the daemon.
    #[error("Failed to connect to the docker daemon: {0}")]
    ConnectionError(#[from] hyper_util::client::legacy::Error),
    /// Error emitted while serializing or deserializing a JSON payload.
    #[error("Failed to serialize or deserialize JSON: {0}")]
    JsonSerdeError(#[from] serde_json::Error),
    /// Error emitted while encoding query parameters.
    #[error("Failed to encode query parameters: {0}")]
    UrlEncodedError(#[from] serde_urlencoded::ser::Error),
    /// Error emitted by the docker daemon for any non-success response that
    /// carries no more specific meaning for the reconciler.
    #[error("Docker responded with status code {status_code}: {message}")]
    DockerResponseServerError {
        /// Status code returned by the docker daemon.
        status_code: u16,
        /// Message body returned by the docker daemon.
        message: String,
    },
    /// The query listing services by name itself failed. Distinct from the
    /// service simply not existing, which is not an error.
    #[error("Failed to look up service '{name}': {source}")]
    ServiceLookupError {
        /// Name of the service that was being looked up.
        name: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },
    /// A network referenced by the service could not be matched against the
    /// networks known to the daemon.
    #[error("No docker network named '{name}'")]
    NetworkNotFoundError {
        /// The network name (or, during state read-back, the raw network id)
        /// that failed to resolve.
        name: String,
    },
    /// A live service reports a replication mode this crate does not model.
    #[error("Service reports an unknown replication mode: {mode}")]
    UnknownServiceModeError {
        /// Debug rendering of the unrecognised wire mode.
        mode: String,
    },
    /// An update presented a version token the daemon no longer accepts,
    /// because another writer moved the service on since it was fetched.
    /// Re-running the reconciliation pass is the expected recovery.
    #[error("Update of service '{name}' with version {version} was rejected as out of sequence")]
    UpdateConflictError {
        /// Name of the service whose update was rejected.
        name: String,
        /// The stale version token that was presented.
        version: ServiceVersion,
    },
    /// The service definition failed validation before any API call was made.
    #[error("Invalid service definition: {message}")]
    InvalidDefinitionError {
        /// Description of the offending field or value.
        message: String,
    },
    /// The service definition file could not be parsed.
    #[error("Failed to parse service definition: {0}")]
    DefinitionParseError(#[from] serde_yaml::Error),
}
