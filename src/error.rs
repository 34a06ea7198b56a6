use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdornError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid adornment for {predicate}: expected {expected} bindings, found {found}")]
    MalformedAdornment { predicate: String, expected: usize, found: usize },
    #[error("Invalid adornment for {predicate}: '{character}' is neither 'b' nor 'f'")]
    InvalidBinding { predicate: String, character: char },
    #[error("Malformed atom: {0}")]
    MalformedAtom(String),
    #[error("No rule at index {0}")]
    UnknownRule(usize),
    #[error("Output error: {0}")]
    Output(String),
}

pub type Result<T> = std::result::Result<T, AdornError>;

// Helper conversions
impl From<config::ConfigError> for AdornError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for AdornError {
    fn from(e: serde_json::Error) -> Self { Self::Output(e.to_string()) }
}
