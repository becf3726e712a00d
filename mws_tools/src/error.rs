use thiserror::Error;

#[derive(Debug, Error)]
pub enum MwsApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),
    #[error("Could not sign request: {0}")]
    SigningError(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not parse the XML response: {0}")]
    XmlError(String),
    #[error("Unexpected response document: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}
