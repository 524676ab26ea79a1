pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    RecordNotFound(String),
}

impl Error {
    pub(crate) fn not_found(entity: &str) -> Self {
        Error::RecordNotFound(entity.to_string())
    }

    pub(crate) fn timed_out() -> Self {
        Error::DatabaseError(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "query deadline exceeded",
        )))
    }
}
