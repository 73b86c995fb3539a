use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContuiError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stylesheet error: {0}")]
    Tcss(#[from] tcss::TcssError),

    #[error("A logger was already installed")]
    LoggerAlreadySet(#[from] log::SetLoggerError),
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, ContuiError>;
