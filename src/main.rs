use analytics::stats;
use analytics::{AnalysisParams, AnalysisReport, AnalyticsEngine};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use configuration::{LogFormat, Settings};
use core_types::BackendChart;
use serde::Serialize;
use std::path::PathBuf;

/// The main entry point for the bikesim analytics tool.
fn main() -> Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut settings = configuration::load_config(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }
    let _log_guard = configuration::init_logging(&settings.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &settings),
        Commands::Describe(args) => handle_describe(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Statistical analysis of bike-sharing simulation results.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults to `bikesim.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log line format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every series of a chart payload returned by the simulation backend.
    Analyze(AnalyzeArgs),
    /// Summarize a single series given on the command line.
    Describe(DescribeArgs),
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// The chart payload (JSON, standardized or legacy shape).
    #[arg(long, short)]
    input: PathBuf,

    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Overrides `analysis.anomaly_threshold`.
    #[arg(long)]
    threshold: Option<f64>,

    /// Overrides `analysis.max_lag`.
    #[arg(long)]
    max_lag: Option<usize>,

    /// Overrides `analysis.rolling_window`.
    #[arg(long)]
    window: Option<usize>,
}

#[derive(Parser)]
struct DescribeArgs {
    /// Comma-separated samples (e.g., "3,5,0,12").
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    values: Vec<f64>,

    #[arg(long, default_value = "series")]
    label: String,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

#[derive(Serialize)]
struct AnalysisOutput<'a> {
    generated_at: DateTime<Utc>,
    chart_id: &'a str,
    params: &'a AnalysisParams,
    report: &'a AnalysisReport,
}

fn handle_analyze(args: AnalyzeArgs, settings: &Settings) -> Result<()> {
    let mut params = settings.analysis.to_params();
    if let Some(threshold) = args.threshold {
        params.anomaly_threshold = threshold;
    }
    if let Some(max_lag) = args.max_lag {
        params.max_lag = max_lag;
    }
    if let Some(window) = args.window {
        params.rolling_window = window;
    }
    let engine = AnalyticsEngine::new(params)?;

    let payload = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let chart = BackendChart::from_json(&payload)
        .with_context(|| format!("Failed to parse chart payload {}", args.input.display()))?;
    let chart_id = chart.id().to_string();
    let series = chart.into_series();
    tracing::info!(chart = %chart_id, series = series.len(), "Chart payload loaded.");

    let report = engine.analyze(&series);

    match args.format {
        OutputFormat::Json => {
            let output = AnalysisOutput {
                generated_at: Utc::now(),
                chart_id: &chart_id,
                params: engine.params(),
                report: &report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => print_report(&chart_id, &report),
    }

    Ok(())
}

fn fmt(value: f64) -> String {
    format!("{:.2}", value)
}

fn print_report(chart_id: &str, report: &AnalysisReport) {
    if !report.has_data {
        println!("Chart '{}' has no series to analyze.", chart_id);
        return;
    }
    println!("Chart '{}': {} series\n", chart_id, report.series.len());

    let mut table = Table::new();
    table.set_header(vec![
        "Station", "Min", "Max", "Mean", "Median", "Std Dev", "CV %", "Peak", "Valley", "Total",
    ]);
    for s in &report.statistics {
        table.add_row(vec![
            s.station_id.clone(),
            fmt(s.min),
            fmt(s.max),
            fmt(s.mean),
            fmt(s.median),
            fmt(s.std_dev),
            fmt(s.coefficient_of_variation),
            s.peak_index.to_string(),
            s.valley_index.to_string(),
            fmt(s.total),
        ]);
    }
    println!("Statistics\n{table}\n");

    let mut table = Table::new();
    table.set_header(vec!["Rank", "Station", "Mean", "Stability", "Capacity %"]);
    for (ranked, perf) in report.rankings.iter().filter_map(|r| {
        report
            .performance_metrics
            .iter()
            .find(|p| p.station == r.stats.station_id)
            .map(|p| (r, p))
    }) {
        table.add_row(vec![
            ranked.rank.to_string(),
            ranked.stats.station_id.clone(),
            fmt(ranked.stats.mean),
            fmt(perf.stability),
            fmt(perf.capacity),
        ]);
    }
    println!("Rankings\n{table}\n");

    let mut table = Table::new();
    table.set_header(vec![
        "Station", "Slope", "Intercept", "R²", "Skewness", "Kurtosis", "Non-zero %", "Avg Change",
    ]);
    for (((trend, shape), activity), volatility) in report
        .trends
        .iter()
        .zip(&report.shapes)
        .zip(&report.activity)
        .zip(&report.volatility)
    {
        table.add_row(vec![
            trend.station_id.clone(),
            fmt(trend.slope),
            fmt(trend.intercept),
            fmt(trend.r2),
            fmt(shape.skewness),
            fmt(shape.kurtosis),
            fmt(activity.non_zero_ratio * 100.0),
            fmt(volatility.avg_volatility),
        ]);
    }
    println!("Trend & Shape\n{table}\n");

    if !report.comparisons.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            "Station A", "Station B", "Correlation", "Mean Diff", "Max Divergence", "At", "Best Lag", "Lag Corr",
        ]);
        for (cmp, lag) in report.comparisons.iter().zip(&report.lag_comparisons) {
            table.add_row(vec![
                cmp.station_a.clone(),
                cmp.station_b.clone(),
                fmt(cmp.correlation),
                fmt(cmp.mean_difference),
                fmt(cmp.max_divergence),
                cmp.max_divergence_index.to_string(),
                lag.best_lag.to_string(),
                fmt(lag.best_correlation),
            ]);
        }
        println!("Comparisons\n{table}\n");
    }

    let flagged: Vec<_> = report
        .anomalies
        .iter()
        .flat_map(|d| d.anomalies.iter().map(move |a| (&d.station_id, a)))
        .collect();
    if flagged.is_empty() {
        println!("No anomalies detected.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Station", "Index", "Value", "Z-Score", "Kind"]);
        for (station, anomaly) in flagged {
            table.add_row(vec![
                station.clone(),
                anomaly.index.to_string(),
                fmt(anomaly.value),
                fmt(anomaly.z_score),
                anomaly.kind.to_string(),
            ]);
        }
        println!("Anomalies\n{table}");
    }
}

// ==============================================================================
// Describe Command Logic
// ==============================================================================

fn handle_describe(args: DescribeArgs) -> Result<()> {
    let label = args.label.as_str();
    let values = &args.values;

    let summary = stats::descriptive_stats(label, values);
    let fit = stats::trend(label, values);
    let moments = stats::shape(label, values);
    let activity = stats::activity(label, values);

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    let rows = [
        ("Samples", values.len().to_string()),
        ("Min", fmt(summary.min)),
        ("Max", fmt(summary.max)),
        ("Mean", fmt(summary.mean)),
        ("Median", fmt(summary.median)),
        ("Std Dev", fmt(summary.std_dev)),
        ("CV %", fmt(summary.coefficient_of_variation)),
        ("Peak Index", summary.peak_index.to_string()),
        ("Valley Index", summary.valley_index.to_string()),
        ("Slope", fmt(fit.slope)),
        ("R²", fmt(fit.r2)),
        ("Skewness", fmt(moments.skewness)),
        ("Excess Kurtosis", fmt(moments.kurtosis)),
        ("Non-zero %", fmt(activity.non_zero_ratio * 100.0)),
    ];
    for (metric, value) in rows {
        table.add_row(vec![metric.to_string(), value]);
    }
    println!("{}\n{table}", summary.station_id);

    Ok(())
}
