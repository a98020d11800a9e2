use thiserror::Error;

/// Run-level failures.
///
/// Missing metrics and undersized peer groups are not errors: they resolve to
/// neutral defaults or a broader peer level and never reach the caller.
#[derive(Error, Debug)]
pub enum RankingError {
    #[error("Empty universe: no stock records to score")]
    EmptyUniverse,

    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}
