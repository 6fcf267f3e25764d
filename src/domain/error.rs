//! Domain error types.

/// Top-level error type for dayscreen.
#[derive(Debug, thiserror::Error)]
pub enum DayscreenError {
    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("malformed series for {code} at bar {index}: {reason}")]
    MalformedSeries {
        code: String,
        index: usize,
        reason: String,
    },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("insufficient data for {code}: have {bars} bars, need {minimum}")]
    InsufficientData {
        code: String,
        bars: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DayscreenError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        DayscreenError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&DayscreenError> for std::process::ExitCode {
    fn from(err: &DayscreenError) -> Self {
        let code: u8 = match err {
            DayscreenError::Io(_) => 1,
            DayscreenError::ConfigParse { .. }
            | DayscreenError::ConfigMissing { .. }
            | DayscreenError::ConfigInvalid { .. } => 2,
            DayscreenError::Data { .. } | DayscreenError::MalformedSeries { .. } => 3,
            DayscreenError::NoData { .. } | DayscreenError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
