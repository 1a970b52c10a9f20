use thiserror::Error;

use crate::ingest::IngestError;
use crate::session::SessionError;
use crate::source::SourceError;
use crate::stats::StatsError;

/// Anything that can stop a category from loading or a session from starting
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("this sheet has no questions")]
    EmptyPool,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Stats(#[from] StatsError),
}
