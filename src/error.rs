#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The device cloud refused the request, the transport broke, or the
    /// payload couldn't be understood.
    #[error("upstream device error: {0}")]
    UpstreamProtocol(String),
    /// Writing an accepted sample to the log failed. The sample itself
    /// stays valid.
    #[error("couldn't persist sample: {0}")]
    Persistence(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::UpstreamProtocol(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}
