//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReportAdapter;
use crate::domain::analysis::{run_analysis, AnalysisConfig, AnalysisResult};
use crate::domain::benchmark::{resolve_benchmark, Period, DEFAULT_BENCHMARK_SYMBOL};
use crate::domain::config_validation::{
    parse_date, validate_analysis_config, validate_data_config, SECTION,
};
use crate::domain::error::AnalyticsError;
use crate::domain::metrics::DEFAULT_RISK_FREE_RATE;
use crate::domain::price_series::PriceSeries;
use crate::domain::rolling::{RollingPoint, DEFAULT_ROLLING_WINDOW};
use crate::domain::weights::{parse_symbols, parse_weights, Weights};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "benchmark-analytics",
    about = "Portfolio versus benchmark performance analytics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Values that take precedence over the `[analysis]` section.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    /// Comma-separated portfolio symbols
    #[arg(long)]
    pub symbols: Option<String>,
    /// Benchmark name (e.g. "S&P 500") or symbol
    #[arg(long)]
    pub benchmark: Option<String>,
    /// Custom weights, e.g. AAPL:0.6,MSFT:0.4
    #[arg(long)]
    pub weights: Option<String>,
    #[arg(long)]
    pub risk_free_rate: Option<f64>,
    /// Lookback period: 1mo, 3mo, 6mo, 1y, 2y or 5y
    #[arg(long)]
    pub period: Option<String>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
    /// Rolling beta/correlation window
    #[arg(long)]
    pub window: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the portfolio versus benchmark analysis
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print rolling beta and correlation as CSV
    Rolling {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Validate an analysis configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List symbols available in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Analyze {
            config,
            overrides,
            output,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_analyze(&config, &overrides, output.as_ref())
            }
        }
        Command::Rolling { config, overrides } => run_rolling(&config, &overrides),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// A [`ConfigPort`] that consults CLI overrides before the underlying file.
pub struct LayeredConfig<'a> {
    base: &'a dyn ConfigPort,
    /// `None` masks the base value.
    overrides: BTreeMap<&'static str, Option<String>>,
}

impl<'a> LayeredConfig<'a> {
    pub fn new(base: &'a dyn ConfigPort, overrides: &Overrides) -> Self {
        let mut map = BTreeMap::new();
        let mut set = |key: &'static str, value: Option<String>| {
            if let Some(v) = value {
                map.insert(key, Some(v));
            }
        };
        set("symbols", overrides.symbols.clone());
        set("benchmark", overrides.benchmark.clone());
        set("weights", overrides.weights.clone());
        set("risk_free_rate", overrides.risk_free_rate.map(|r| r.to_string()));
        set("period", overrides.period.clone());
        set("start_date", overrides.start_date.clone());
        set("end_date", overrides.end_date.clone());
        set("rolling_window", overrides.window.map(|w| w.to_string()));

        // A period given on the command line replaces a configured start date.
        if overrides.period.is_some() && overrides.start_date.is_none() {
            map.insert("start_date", None);
        }
        Self {
            base,
            overrides: map,
        }
    }

    fn lookup(&self, section: &str, key: &str) -> Option<&Option<String>> {
        if section.eq_ignore_ascii_case(SECTION) {
            self.overrides.get(key)
        } else {
            None
        }
    }
}

impl ConfigPort for LayeredConfig<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match self.lookup(section, key) {
            Some(value) => value.clone(),
            None => self.base.get_string(section, key),
        }
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.lookup(section, key) {
            Some(Some(v)) => v.trim().parse().unwrap_or(default),
            Some(None) => default,
            None => self.base.get_int(section, key, default),
        }
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        match self.lookup(section, key) {
            Some(Some(v)) => v.trim().parse().unwrap_or(default),
            Some(None) => default,
            None => self.base.get_double(section, key, default),
        }
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.base.get_bool(section, key, default)
    }
}

/// Everything needed to load prices and run one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPlan {
    pub symbols: Vec<String>,
    pub benchmark_symbol: String,
    pub weights: Option<Weights>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Used when no start date is configured.
    pub period: Period,
    pub analysis: AnalysisConfig,
}

fn invalid(key: &str, reason: impl Into<String>) -> AnalyticsError {
    AnalyticsError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

pub fn build_analysis_plan(config: &dyn ConfigPort) -> Result<AnalysisPlan, AnalyticsError> {
    validate_analysis_config(config)?;

    let symbols_str = config
        .get_trimmed(SECTION, "symbols")
        .ok_or_else(|| AnalyticsError::ConfigMissing {
            section: SECTION.into(),
            key: "symbols".into(),
        })?;
    let symbols = parse_symbols(&symbols_str).map_err(|e| invalid("symbols", e.to_string()))?;

    let benchmark_name = config
        .get_trimmed(SECTION, "benchmark")
        .unwrap_or_else(|| DEFAULT_BENCHMARK_SYMBOL.to_string());
    let benchmark_symbol = resolve_benchmark(&benchmark_name);

    let weights = config
        .get_trimmed(SECTION, "weights")
        .map(|w| parse_weights(&w).map_err(|e| invalid("weights", e.to_string())))
        .transpose()?;

    let start_date = config
        .get_trimmed(SECTION, "start_date")
        .map(|s| parse_date(&s, "start_date"))
        .transpose()?;
    let end_date = config
        .get_trimmed(SECTION, "end_date")
        .map(|s| parse_date(&s, "end_date"))
        .transpose()?;
    let period = match config.get_trimmed(SECTION, "period") {
        Some(p) => p
            .parse::<Period>()
            .map_err(|e| invalid("period", e.to_string()))?,
        None => Period::OneYear,
    };

    let window = config.get_int(SECTION, "rolling_window", DEFAULT_ROLLING_WINDOW as i64);
    let rolling_window =
        usize::try_from(window).map_err(|_| invalid("rolling_window", "must be at least 2"))?;

    let analysis = AnalysisConfig {
        portfolio_name: config
            .get_trimmed(SECTION, "portfolio_name")
            .unwrap_or_else(|| "Portfolio".to_string()),
        benchmark_name,
        risk_free_rate: config.get_double(SECTION, "risk_free_rate", DEFAULT_RISK_FREE_RATE),
        rolling_window,
    };

    Ok(AnalysisPlan {
        symbols,
        benchmark_symbol,
        weights,
        start_date,
        end_date,
        period,
        analysis,
    })
}

/// Resolves the calendar window. Without an explicit end date the window ends
/// on the benchmark's last available date.
pub fn resolve_window(
    data_port: &dyn DataPort,
    plan: &AnalysisPlan,
) -> Result<(NaiveDate, NaiveDate), AnalyticsError> {
    let end = match plan.end_date {
        Some(end) => end,
        None => match data_port.get_data_range(&plan.benchmark_symbol)? {
            Some((_, last, _)) => last,
            None => {
                return Err(AnalyticsError::NoPriceData {
                    symbol: plan.benchmark_symbol.clone(),
                });
            }
        },
    };
    let start = plan
        .start_date
        .unwrap_or_else(|| plan.period.start_from(end));
    Ok((start, end))
}

/// Loads the benchmark and every portfolio symbol. Symbols that fail to load
/// are skipped; at least one must succeed.
pub fn load_prices(
    data_port: &dyn DataPort,
    plan: &AnalysisPlan,
) -> Result<(BTreeMap<String, PriceSeries>, PriceSeries), AnalyticsError> {
    let (start, end) = resolve_window(data_port, plan)?;
    eprintln!("Loading prices from {} to {}", start, end);

    let benchmark = data_port.fetch_closes(&plan.benchmark_symbol, start, end)?;
    debug!(symbol = %plan.benchmark_symbol, rows = benchmark.len(), "benchmark loaded");

    let mut prices = BTreeMap::new();
    let mut failed = Vec::new();
    for symbol in &plan.symbols {
        match data_port.fetch_closes(symbol, start, end) {
            Ok(series) => {
                debug!(symbol = %symbol, rows = series.len(), "symbol loaded");
                prices.insert(symbol.clone(), series);
            }
            Err(e) => {
                eprintln!("warning: skipping {} ({})", symbol, e);
                failed.push(symbol.clone());
            }
        }
    }

    if prices.is_empty() {
        return Err(AnalyticsError::NoPriceData {
            symbol: failed.join(","),
        });
    }
    Ok((prices, benchmark))
}

pub fn run_analysis_pipeline(
    data_port: &dyn DataPort,
    plan: &AnalysisPlan,
) -> Result<AnalysisResult, AnalyticsError> {
    let (prices, benchmark) = load_prices(data_port, plan)?;
    eprintln!(
        "Analyzing {} symbols against {}",
        prices.len(),
        plan.benchmark_symbol
    );
    run_analysis(&prices, &benchmark, plan.weights.as_ref(), &plan.analysis)
}

/// A validated plan together with the collaborators that serve it.
pub struct Prepared {
    pub plan: AnalysisPlan,
    pub data_port: CsvAdapter,
    pub report_output: Option<PathBuf>,
    pub report: TextReportAdapter,
}

/// Loads, layers and validates the configuration.
fn prepare(config_path: &Path, overrides: &Overrides) -> Result<Prepared, ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    let layered = LayeredConfig::new(&adapter, overrides);

    let fail = |e: AnalyticsError| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    };
    validate_data_config(&layered).map_err(fail)?;
    let plan = build_analysis_plan(&layered).map_err(fail)?;
    let data_port = data_adapter(&layered).map_err(fail)?;
    Ok(Prepared {
        plan,
        data_port,
        report_output: layered.get_trimmed("report", "output").map(PathBuf::from),
        report: TextReportAdapter {
            monthly: layered.get_bool("report", "monthly", true),
        },
    })
}

fn data_adapter(config: &dyn ConfigPort) -> Result<CsvAdapter, AnalyticsError> {
    let dir = config
        .get_trimmed("data", "csv_dir")
        .ok_or_else(|| AnalyticsError::ConfigMissing {
            section: "data".into(),
            key: "csv_dir".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

fn run_analyze(config_path: &Path, overrides: &Overrides, output: Option<&PathBuf>) -> ExitCode {
    let prepared = match prepare(config_path, overrides) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let result = match run_analysis_pipeline(&prepared.data_port, &prepared.plan) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let report = prepared.report;
    eprintln!();
    eprint!("{}", TextReportAdapter::summary_only().render(&result));

    if let Some(path) = output.cloned().or(prepared.report_output) {
        if let Err(e) = report.write(&result, &path.to_string_lossy()) {
            eprintln!("error: failed to write report: {e}");
            return (&e).into();
        }
        eprintln!("\nReport written to: {}", path.display());
    }
    ExitCode::SUCCESS
}

/// Writes `date,beta,correlation` rows with a header.
pub fn write_rolling_csv<W: io::Write>(
    points: &[RollingPoint],
    writer: W,
) -> Result<(), AnalyticsError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let to_io = |e: csv::Error| AnalyticsError::Io(e.into());

    wtr.write_record(["date", "beta", "correlation"])
        .map_err(to_io)?;
    for p in points {
        wtr.write_record([
            p.date.format("%Y-%m-%d").to_string(),
            format!("{:.6}", p.beta),
            format!("{:.6}", p.correlation),
        ])
        .map_err(to_io)?;
    }
    wtr.flush()?;
    Ok(())
}

fn run_rolling(config_path: &Path, overrides: &Overrides) -> ExitCode {
    let Prepared {
        plan, data_port, ..
    } = match prepare(config_path, overrides) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let result = match run_analysis_pipeline(&data_port, &plan) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if result.rolling().is_empty() {
        eprintln!(
            "warning: {} aligned returns do not exceed the {}-period window",
            result.aligned().len(),
            plan.analysis.rolling_window
        );
    }
    match write_rolling_csv(result.rolling(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> ExitCode {
    let prepared = match prepare(config_path, overrides) {
        Ok(p) => p,
        Err(code) => return code,
    };
    eprintln!("Config validated successfully");
    print_plan(&prepared.plan);
    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn print_plan(plan: &AnalysisPlan) {
    eprintln!("\nPortfolio: {}", plan.analysis.portfolio_name);
    eprintln!("  symbols:   {}", plan.symbols.join(", "));
    match &plan.weights {
        Some(w) => {
            let parts: Vec<String> = w.iter().map(|(s, v)| format!("{s}:{v}")).collect();
            eprintln!("  weights:   {}", parts.join(", "));
        }
        None => eprintln!("  weights:   equal"),
    }
    eprintln!(
        "  benchmark: {} ({})",
        plan.analysis.benchmark_name, plan.benchmark_symbol
    );
    match plan.start_date {
        Some(start) => eprintln!("  start:     {}", start),
        None => eprintln!("  period:    {}", plan.period),
    }
    if let Some(end) = plan.end_date {
        eprintln!("  end:       {}", end);
    }
    eprintln!("  risk-free: {}", plan.analysis.risk_free_rate);
    eprintln!("  window:    {}", plan.analysis.rolling_window);
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let plan = match validate_data_config(&adapter).and_then(|()| build_analysis_plan(&adapter)) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    print_plan(&plan);
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let adapter = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for s in &resolve_symbols(symbol, &config) {
        match adapter.get_data_range(s) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} rows, {} to {}", s, count, first, last);
            }
            Ok(None) => eprintln!("{}: no data found", s),
            Err(e) => eprintln!("error querying {}: {}", s, e),
        }
    }
    ExitCode::SUCCESS
}

/// The override symbol, or the configured portfolio symbols followed by the
/// benchmark symbol. Never empty: the benchmark falls back to SPY.
pub fn resolve_symbols(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(s) = symbol_override {
        return vec![s.trim().to_uppercase()];
    }

    let mut symbols: Vec<String> = config
        .get_string(SECTION, "symbols")
        .map(|s| {
            s.split(',')
                .map(|t| t.trim().to_uppercase())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let benchmark = resolve_benchmark(
        &config
            .get_string(SECTION, "benchmark")
            .unwrap_or_default(),
    );
    if !symbols.contains(&benchmark) {
        symbols.push(benchmark);
    }
    symbols
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let adapter = match data_adapter(&config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match adapter.list_symbols() {
        Ok(symbols) if symbols.is_empty() => {
            eprintln!("No symbols found");
            ExitCode::SUCCESS
        }
        Ok(symbols) => {
            for symbol in &symbols {
                println!("{}", symbol);
            }
            eprintln!("{} symbols found", symbols.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
