use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors the engine surfaces to callers.
///
/// Malformed data rows never produce these: bad records degrade to
/// zero/absent at the ingest boundary so one broken row cannot take down a
/// whole dashboard render. What remains are caller usage errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An open-ended tenancy was resolved without an explicit period range.
    #[error("Unbounded schedule: {0}")]
    UnboundedSchedule(String),
    /// A period or period range that cannot describe a billing cycle.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    /// A caller-constructed filter or record failed field validation.
    #[error("Validation failed: {0}")]
    Validation(String),
}
