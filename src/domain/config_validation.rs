//! Up-front validation of the analysis configuration.
//!
//! Run once at startup so a bad config fails before any workbook is read.

use crate::ports::config_port::ConfigPort;

use super::error::UnitfolioError;
use super::risk::RiskAppetite;

/// Permitted `max_leverage` settings, in percent.
pub const ALLOWED_LEVERAGE_PCT: [i64; 4] = [100, 150, 200, 300];

fn require_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, UnitfolioError> {
    config
        .get_string(section, key)
        .ok_or_else(|| UnitfolioError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}

/// Check the `[data]` and `[analysis]` sections. Returns the parsed
/// `(max_leverage fraction, risk appetite)` pair on success.
pub fn validate_analysis_config(
    config: &dyn ConfigPort,
) -> Result<(f64, RiskAppetite), UnitfolioError> {
    require_string(config, "data", "stats")?;
    require_string(config, "data", "monthly_returns")?;

    let leverage_pct = config.get_int("analysis", "max_leverage", 100);
    if !ALLOWED_LEVERAGE_PCT.contains(&leverage_pct) {
        return Err(UnitfolioError::ConfigInvalid {
            section: "analysis".to_string(),
            key: "max_leverage".to_string(),
            reason: format!(
                "{} is not one of {:?} (percent)",
                leverage_pct, ALLOWED_LEVERAGE_PCT
            ),
        });
    }

    let appetite_raw = config
        .get_string("analysis", "risk_appetite")
        .unwrap_or_else(|| "benchmark".to_string());
    let appetite: RiskAppetite =
        appetite_raw
            .parse()
            .map_err(|reason| UnitfolioError::ConfigInvalid {
                section: "analysis".to_string(),
                key: "risk_appetite".to_string(),
                reason,
            })?;

    Ok((leverage_pct as f64 / 100.0, appetite))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = "\
[data]
stats = stats.csv
monthly_returns = returns.csv

[analysis]
max_leverage = 200
risk_appetite = 10%
";

    #[test]
    fn valid_config_passes() {
        let (leverage, appetite) = validate_analysis_config(&config(VALID)).unwrap();
        assert_eq!(leverage, 2.0);
        assert_eq!(appetite, RiskAppetite::MaxDd10);
    }

    #[test]
    fn missing_data_path_is_reported() {
        let err = validate_analysis_config(&config("[data]\nstats = stats.csv\n")).unwrap_err();
        match err {
            UnitfolioError::ConfigMissing { section, key } => {
                assert_eq!(section, "data");
                assert_eq!(key, "monthly_returns");
            }
            other => panic!("expected ConfigMissing, got {other:?}"),
        }
    }

    #[test]
    fn leverage_outside_whitelist_is_rejected() {
        let content = VALID.replace("max_leverage = 200", "max_leverage = 250");
        let err = validate_analysis_config(&config(&content)).unwrap_err();
        assert!(matches!(
            err,
            UnitfolioError::ConfigInvalid { ref key, .. } if key == "max_leverage"
        ));
    }

    #[test]
    fn leverage_defaults_to_100_percent() {
        let content = "[data]\nstats = s.csv\nmonthly_returns = r.csv\n";
        let (leverage, appetite) = validate_analysis_config(&config(content)).unwrap();
        assert_eq!(leverage, 1.0);
        assert_eq!(appetite, RiskAppetite::BenchmarkLevel);
    }

    #[test]
    fn unparseable_risk_appetite_is_rejected() {
        let content = VALID.replace("risk_appetite = 10%", "risk_appetite = reckless");
        let err = validate_analysis_config(&config(&content)).unwrap_err();
        assert!(matches!(
            err,
            UnitfolioError::ConfigInvalid { ref key, .. } if key == "risk_appetite"
        ));
    }
}
