use thiserror::Error;

/// Failures surfaced by the engine and its collaborators.
///
/// None of these are fatal: callers convert them into a fallback location,
/// a loading state, an empty calendar grid or an empty history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("location permission denied")]
    LocationPermissionDenied,

    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("failed to fetch prayer timings: {0}")]
    TimingsFetchFailed(String),

    #[error("invalid prayer timings payload: {0}")]
    InvalidTimingsPayload(String),

    #[error("failed to fetch Hijri month: {0}")]
    HijriFetchFailed(String),

    #[error("failed to read from storage: {0}")]
    StorageReadFailure(String),

    #[error("failed to write to storage: {0}")]
    StorageWriteFailure(String),

    #[error("invalid UTC offset: {0} minutes")]
    InvalidUtcOffset(i32),

    #[error("unknown prayer '{0}' (use: fajr, dhuhr, asr, maghrib, isha)")]
    UnknownPrayer(String),

    #[error("unknown dhikr '{0}'")]
    UnknownDhikr(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
