#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lookup(#[from] hibp_lookup::Error),

    #[error("failed to read password: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Cannot use a password argument and --hash together")]
    InvalidArgs,

    #[error("{flag} must be a non-negative number of seconds, got {value}")]
    InvalidTimeout { flag: &'static str, value: f64 },

    #[error("header '{0}' must be written as 'Name: value'")]
    MalformedHeader(String),
}
