use thiserror::Error;

/// A selection value outside the known domain. Rejected per request; the
/// loaded dataset is never involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("unknown station '{0}'")]
    UnknownStation(String),

    #[error("unknown tab label '{0}'")]
    UnknownTab(String),

    #[error("unknown analysis focus '{0}'")]
    UnknownFocus(String),

    #[error("no station available to select")]
    NoStationAvailable,
}
