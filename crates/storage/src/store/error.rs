#![forbid(unsafe_code)]

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    UnknownId,
    UnknownItem,
    NotReserved,
    ItemsStillPending { pending: usize },
    SubmitNotAcknowledged,
    PermissionDenied,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::UnknownId => write!(f, "unknown block id"),
            Self::UnknownItem => write!(f, "unknown item id"),
            Self::NotReserved => write!(f, "block is not reserved"),
            Self::ItemsStillPending { pending } => {
                write!(f, "items still pending (pending={pending})")
            }
            Self::SubmitNotAcknowledged => write!(f, "submit not acknowledged"),
            Self::PermissionDenied => write!(f, "permission denied"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}
