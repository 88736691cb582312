use thiserror::Error as ThisError;

/// Errors that abort a run before a delivery outcome can be reported.
///
/// Anything the receiving endpoint does (error statuses, timeouts, refused connections)
/// is a [`DeliveryOutcome`](crate::dispatch::DeliveryOutcome), not an `Error`.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation
    #[error(transparent)]
    Config(#[from] Box<figment::Error>),

    /// Reading an answer from the terminal failed
    #[error("Failed to read {field} from the terminal: {source}")]
    Prompt {
        field: &'static str,
        #[source]
        source: dialoguer::Error,
    },

    /// The HMAC primitive rejected the secret
    #[error("Failed to sign the test payload")]
    Signing,

    /// The test payload could not be serialized
    #[error("Failed to serialize the test payload")]
    Serialize(#[from] serde_json::Error),

    /// The HTTP client could not be constructed
    #[error("Failed to build the HTTP client")]
    HttpClient(#[source] reqwest::Error),

    /// Writing the report failed
    #[error("Failed to write output")]
    Output(#[from] std::io::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Type alias for run results
pub type Result<T> = std::result::Result<T, Error>;
