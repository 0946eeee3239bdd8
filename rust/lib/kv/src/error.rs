use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("value under {0} is not valid UTF-8")]
    Encoding(String),
}
