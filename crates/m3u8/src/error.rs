use thiserror::Error;

#[derive(Error, Debug)]
pub enum M3u8Error {
    /// The first non-empty line is not `#EXTM3U`. Carries that line, cut to 250 characters.
    #[error("Missing #EXTM3U header, got: {0}")]
    MissingHeader(String),

    #[error(transparent)]
    IOError(#[from] std::io::Error),
}

pub type M3u8Result<T> = Result<T, M3u8Error>;
