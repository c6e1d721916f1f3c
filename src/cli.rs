//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::csv_workbook_adapter::{CsvWorkbookAdapter, read_pnl_series};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::format::{fmt_count, fmt_currency, fmt_pct, fmt_ratio};
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::domain::allocation::Selection;
use crate::domain::analysis::{Analysis, AnalysisRequest, analyze};
use crate::domain::catalog::Catalog;
use crate::domain::config_validation::validate_analysis_config;
use crate::domain::error::UnitfolioError;
use crate::domain::risk::{RiskAppetite, filter_by_risk};
use crate::domain::stats::SeriesStats;
use crate::ports::catalog_port::CatalogPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::{AnalysisReport, ReportPort};

#[derive(Parser, Debug)]
#[command(name = "unitfolio", about = "Unit-based portfolio allocation analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a portfolio selection and write a report
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the [portfolio] selection, e.g. "DELTA S&P=2,VEGA CRUDE=1"
        #[arg(long)]
        units: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Report format: html or csv
        #[arg(long)]
        format: Option<String>,
        /// Validate config, workbook and selection without writing a report
        #[arg(long)]
        dry_run: bool,
    },
    /// List catalog strategies
    ListStrategies {
        #[arg(short, long)]
        config: PathBuf,
        /// Risk tier filter: 5%, 10%, 20% or benchmark
        #[arg(long)]
        risk: Option<String>,
    },
    /// Show a workbook summary
    Info {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Statistics for a single strategy's monthly P&L series
    StrategyStats {
        /// CSV with a header row and month,pnl rows
        #[arg(long)]
        pnl: PathBuf,
        #[arg(long, default_value_t = 100_000.0)]
        capital: f64,
        /// Annual risk-free rate as a fraction
        #[arg(long, default_value_t = 0.0)]
        risk_free: f64,
    },
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            units,
            output,
            format,
            dry_run,
        } => run_analyze(
            &config,
            units.as_deref(),
            output.as_ref(),
            format.as_deref(),
            dry_run,
        ),
        Command::ListStrategies { config, risk } => run_list_strategies(&config, risk.as_deref()),
        Command::Info { config } => run_info(&config),
        Command::StrategyStats {
            pnl,
            capital,
            risk_free,
        } => run_strategy_stats(&pnl, capital, risk_free),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = UnitfolioError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_catalog(config: &dyn ConfigPort) -> Result<Catalog, UnitfolioError> {
    let stats = config
        .get_string("data", "stats")
        .ok_or_else(|| UnitfolioError::ConfigMissing {
            section: "data".into(),
            key: "stats".into(),
        })?;
    let returns =
        config
            .get_string("data", "monthly_returns")
            .ok_or_else(|| UnitfolioError::ConfigMissing {
                section: "data".into(),
                key: "monthly_returns".into(),
            })?;
    let adapter = CsvWorkbookAdapter::new(PathBuf::from(stats), PathBuf::from(returns));
    adapter.load_catalog()
}

/// Selection from the `[portfolio]` section: each key is a strategy name,
/// each value a unit count.
pub fn selection_from_config(config: &dyn ConfigPort) -> Selection {
    config
        .keys("portfolio")
        .into_iter()
        .map(|name| {
            let units = config.get_int("portfolio", &name, 0).max(0) as u32;
            (name, units)
        })
        .collect()
}

/// Parse a `--units` override: comma-separated `name=count` pairs.
pub fn parse_units_override(raw: &str) -> Result<Selection, String> {
    let mut selection = Selection::new();
    for pair in raw.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }
        let (name, count) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected name=count, got '{pair}'"))?;
        let units: u32 = count
            .trim()
            .parse()
            .map_err(|_| format!("invalid unit count '{}' for {}", count.trim(), name.trim()))?;
        selection.insert(name.trim().to_string(), units);
    }
    if selection.is_empty() {
        return Err("no name=count pairs given".to_string());
    }
    Ok(selection)
}

fn print_summary(analysis: &Analysis) {
    let result = &analysis.result;
    eprintln!("\n=== Portfolio Results ===");
    eprintln!(
        "Total Allocation:  {}",
        fmt_currency(result.total_allocation)
    );
    eprintln!("Required Equity:   {}", fmt_currency(result.required_equity));
    eprintln!(
        "Effective Leverage: {}",
        fmt_pct(analysis.plan.effective_leverage())
    );
    eprintln!("Total Trades:      {}", fmt_count(result.total_trades));
    eprintln!("Win Rate:          {}", fmt_pct(result.win_rate()));
    eprintln!("Average Net:       {}", fmt_currency(result.average_net));
    eprintln!("Max Drawdown:      {}", fmt_pct(result.max_drawdown));
    eprintln!(
        "Avg Yearly Return: {}",
        fmt_pct(result.average_year_return)
    );
    eprintln!("Sharpe Ratio:      {}", fmt_ratio(result.sharpe_ratio));
    eprintln!("Sortino Ratio:     {}", fmt_ratio(result.sortino_ratio));
    eprintln!("Calmar Ratio:      {}", fmt_ratio(result.calmar_ratio));
    if analysis.risk_alert {
        eprintln!(
            "warning: max drawdown {} breaches the risk floor {}",
            fmt_pct(result.max_drawdown),
            fmt_pct(analysis.risk_floor)
        );
    }
}

fn run_analyze(
    config_path: &PathBuf,
    units_override: Option<&str>,
    output_path: Option<&PathBuf>,
    format_override: Option<&str>,
    dry_run: bool,
) -> ExitCode {
    // Stage 1: Load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let (max_leverage, risk_appetite) = match validate_analysis_config(&config) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 2: Load workbook
    eprintln!("Loading workbook...");
    let catalog = match load_catalog(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    eprintln!(
        "  {} strategies, {} months of returns",
        catalog.records.len(),
        catalog.returns.len()
    );

    // Stage 3: Resolve the selection
    let selection = match units_override {
        Some(raw) => match parse_units_override(raw) {
            Ok(s) => s,
            Err(reason) => {
                eprintln!("error: invalid --units: {reason}");
                return ExitCode::from(2);
            }
        },
        None => selection_from_config(&config),
    };

    // Stage 4: Run the analysis
    let request = AnalysisRequest {
        selection,
        max_leverage,
        risk_appetite,
    };
    let analysis = match analyze(&catalog, &request) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&analysis);

    if dry_run {
        eprintln!("\nDry run complete: configuration and selection are valid");
        return ExitCode::SUCCESS;
    }

    // Stage 5: Write the report
    let format = format_override
        .map(str::to_string)
        .or_else(|| config.get_string("report", "format"))
        .unwrap_or_else(|| "html".to_string());
    let default_name = match format.as_str() {
        "csv" => "report.csv",
        _ => "report.html",
    };
    let output = output_path
        .cloned()
        .or_else(|| config.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default_name));

    let report = AnalysisReport {
        analysis: &analysis,
        months: &catalog.returns.months,
        benchmark: catalog.returns.benchmark(),
        risk_appetite,
    };

    let written = match format.as_str() {
        "html" => HtmlReportAdapter::new().write(&report, &output.display().to_string()),
        "csv" => CsvReportAdapter::new().write(&report, &output.display().to_string()),
        other => {
            eprintln!("error: unknown report format '{other}' (expected html or csv)");
            return ExitCode::from(2);
        }
    };

    match written {
        Ok(()) => {
            eprintln!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_strategies(config_path: &PathBuf, risk: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let catalog = match load_catalog(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let records = match risk {
        Some(raw) => {
            let appetite: RiskAppetite = match raw.parse() {
                Ok(a) => a,
                Err(reason) => {
                    eprintln!("error: {reason}");
                    return ExitCode::from(2);
                }
            };
            filter_by_risk(&catalog.records, appetite, catalog.benchmark_drawdown())
        }
        None => catalog.records.clone(),
    };

    for record in &records {
        println!(
            "{}\t{}\t{}\t{}",
            record.name,
            fmt_currency(record.unit_equity),
            fmt_pct(record.max_drawdown),
            fmt_pct(record.margin_fraction),
        );
    }
    eprintln!("{} strategies", records.len());
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let catalog = match load_catalog(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("strategies: {}", catalog.records.len());
    match (
        catalog.returns.months.first(),
        catalog.returns.months.last(),
    ) {
        (Some(first), Some(last)) => {
            println!(
                "returns: {} months, {} to {}",
                catalog.returns.len(),
                first.format("%Y-%m"),
                last.format("%Y-%m")
            );
        }
        _ => println!("returns: none"),
    }
    match catalog.benchmark_drawdown() {
        Some(dd) => println!("benchmark drawdown: {}", fmt_pct(dd)),
        None => println!("benchmark drawdown: not in workbook"),
    }
    ExitCode::SUCCESS
}

fn run_strategy_stats(pnl_path: &PathBuf, capital: f64, risk_free: f64) -> ExitCode {
    eprintln!("Loading P&L series from {}", pnl_path.display());
    let series = match read_pnl_series(pnl_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let Some(stats) = SeriesStats::from_pnl(capital, &series, risk_free) else {
        let err = UnitfolioError::DataFormat {
            reason: "P&L series is empty or initial capital is not positive".into(),
        };
        eprintln!("error: {err}");
        return (&err).into();
    };

    let fmt_opt = |value: Option<f64>| match value {
        Some(v) => fmt_ratio(v),
        None => "n/a".to_string(),
    };

    println!("months: {}", stats.months);
    println!("initial capital: {}", fmt_currency(stats.initial_capital));
    println!("final equity: {}", fmt_currency(stats.final_equity));
    println!(
        "mean monthly return: {}",
        fmt_pct(stats.mean_monthly_return)
    );
    println!("cagr: {}", fmt_pct(stats.cagr));
    println!("monthly stdev: {}", fmt_pct(stats.monthly_stdev));
    println!("annual stdev: {}", fmt_pct(stats.annual_stdev));
    println!("sharpe: {}", fmt_opt(stats.sharpe_ratio));
    println!("sortino: {}", fmt_opt(stats.sortino_ratio));
    println!("calmar: {}", fmt_opt(stats.calmar_ratio));
    println!("max drawdown: {}", fmt_pct(stats.max_drawdown));
    ExitCode::SUCCESS
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, serve};
        use std::sync::Arc;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };
        let catalog = match load_catalog(&config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
        eprintln!(
            "  {} strategies, {} months of returns",
            catalog.records.len(),
            catalog.returns.len()
        );

        let listen = config
            .get_string("web", "listen")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string());

        let state = AppState {
            catalog: Arc::new(catalog),
        };

        let outcome = tokio::runtime::Runtime::new()
            .map_err(UnitfolioError::Io)
            .and_then(|rt| rt.block_on(serve(state, &listen)));
        match outcome {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                (&e).into()
            }
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
