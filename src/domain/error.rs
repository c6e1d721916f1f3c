//! Domain error types.

/// Top-level error type for unitfolio.
#[derive(Debug, thiserror::Error)]
pub enum UnitfolioError {
    #[error("data format error: {reason}")]
    DataFormat { reason: String },

    #[error("no strategy selected")]
    EmptySelection,

    #[error("unknown strategy in selection: {name}")]
    UnknownStrategy { name: String },

    #[error(
        "leverage constraint violated: effective leverage {:.1}% exceeds maximum {:.1}%",
        .effective * 100.0,
        .maximum * 100.0
    )]
    LeverageExceeded { effective: f64, maximum: f64 },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&UnitfolioError> for std::process::ExitCode {
    fn from(err: &UnitfolioError) -> Self {
        let code: u8 = match err {
            UnitfolioError::Io(_) => 1,
            UnitfolioError::ConfigParse { .. }
            | UnitfolioError::ConfigMissing { .. }
            | UnitfolioError::ConfigInvalid { .. } => 2,
            UnitfolioError::DataFormat { .. } => 3,
            UnitfolioError::EmptySelection
            | UnitfolioError::UnknownStrategy { .. }
            | UnitfolioError::LeverageExceeded { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leverage_exceeded_reports_both_values() {
        let err = UnitfolioError::LeverageExceeded {
            effective: 0.60,
            maximum: 0.50,
        };
        let msg = err.to_string();
        assert!(msg.contains("60.0%"));
        assert!(msg.contains("50.0%"));
    }

    #[test]
    fn empty_selection_message() {
        assert_eq!(
            UnitfolioError::EmptySelection.to_string(),
            "no strategy selected"
        );
    }

    #[test]
    fn unknown_strategy_names_the_strategy() {
        let err = UnitfolioError::UnknownStrategy {
            name: "GAMMA CRUDE".into(),
        };
        assert!(err.to_string().contains("GAMMA CRUDE"));
    }
}
