use ranking_core::RankingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unrecognized value in column {column}: {value}")]
    InvalidValue { column: String, value: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Failure while reading run inputs.
    pub fn into_fetch(self) -> RankingError {
        match self {
            StoreError::InvalidValue { .. } => RankingError::InvalidData(self.to_string()),
            StoreError::Database(_) => RankingError::UpstreamFetch(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let invalid = StoreError::InvalidValue {
            column: "market_cap_category".into(),
            value: "Mega Cap".into(),
        };
        assert!(matches!(invalid.into_fetch(), RankingError::InvalidData(_)));

        let db = StoreError::Database(sqlx::Error::RowNotFound);
        assert!(matches!(db.into_fetch(), RankingError::UpstreamFetch(_)));
    }
}
