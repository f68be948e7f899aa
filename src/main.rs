//! Sales Analytics Dashboard CLI
//!
//! Renders dashboards from transactional sales CSV files and generates
//! synthetic sample data.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::{Path, PathBuf};

use sales_analytics_dashboard::aggregator::Bucket;
use sales_analytics_dashboard::commands::{
    display_options, display_schema, display_version, execute_generate, execute_render,
    validate_args, validate_dashboard_file, validate_generate_args, GenerateArgs, RenderArgs,
};

/// Sales Analytics Dashboard - filter, aggregate and chart sales data
#[derive(Parser, Debug)]
#[command(name = "sales-dash")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Filter and aggregate a sales CSV into a dashboard
    Render {
        /// Input CSV with sales records
        #[arg(short, long, env = "SALES_DASH_DATA", default_value = "data/sales_data.csv")]
        data: PathBuf,

        /// TOML dashboard configuration
        #[arg(short, long, env = "SALES_DASH_CONFIG")]
        config: Option<PathBuf>,

        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Keep only this category (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Keep only this region (repeatable)
        #[arg(long = "region")]
        regions: Vec<String>,

        /// Keep only this customer segment (repeatable)
        #[arg(long = "segment")]
        segments: Vec<String>,

        /// Keep only this product (repeatable)
        #[arg(long = "product")]
        products: Vec<String>,

        /// Time-series bucket: day, week, month or quarter
        #[arg(long)]
        bucket: Option<Bucket>,

        /// Number of products in the ranking
        #[arg(long)]
        top_n: Option<usize>,

        /// Output path for JSON dashboard (placed in artifacts/ by default)
        #[arg(short, long, default_value = "artifacts/dashboard.json")]
        output: PathBuf,

        /// Directory for per-chart SVG files
        #[arg(long)]
        svg_dir: Option<PathBuf>,

        /// Output path for a static HTML dashboard (placed in artifacts/ by default)
        #[arg(long, default_missing_value = "artifacts/dashboard.html", num_args = 0..=1)]
        html: Option<PathBuf>,

        /// Export the filtered records as CSV
        #[arg(long)]
        export_csv: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Fail on the first invalid CSV row instead of skipping it
        #[arg(long)]
        strict: bool,
    },

    /// Generate a synthetic sales CSV
    Generate {
        /// Number of records
        #[arg(short, long, default_value = "5000")]
        records: usize,

        /// Random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Last sale date (YYYY-MM-DD), today by default
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Output CSV path
        #[arg(short, long, default_value = "data/sales_data.csv")]
        output: PathBuf,
    },

    /// List the values available to each filter
    Options {
        /// Input CSV with sales records
        #[arg(short, long, env = "SALES_DASH_DATA", default_value = "data/sales_data.csv")]
        data: PathBuf,
    },

    /// Validate a dashboard JSON file
    Validate {
        /// Path to dashboard JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Render {
            data,
            config,
            from,
            to,
            categories,
            regions,
            segments,
            products,
            bucket,
            top_n,
            output,
            svg_dir,
            html,
            export_csv,
            summary,
            strict,
        } => {
            let args = RenderArgs {
                data_path: data,
                config_path: config,
                from,
                to,
                categories,
                regions,
                segments,
                products,
                bucket,
                top_n,
                output_json: in_artifacts(output),
                svg_dir,
                output_html: html.map(in_artifacts),
                export_csv: export_csv.map(in_artifacts),
                print_summary: summary,
                strict,
            };

            // Validate args first
            validate_args(&args)?;

            execute_render(args)?;
        }

        Commands::Generate {
            records,
            seed,
            end_date,
            output,
        } => {
            let args = GenerateArgs {
                records,
                seed,
                end_date,
                output,
            };

            validate_generate_args(&args)?;
            execute_generate(args)?;
        }

        Commands::Options { data } => {
            display_options(data)?;
        }

        Commands::Validate { file } => {
            validate_dashboard_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Place bare file names under artifacts/
fn in_artifacts(path: PathBuf) -> PathBuf {
    if path.parent().map(|p| p.as_os_str().is_empty()).unwrap_or(true) {
        Path::new("artifacts").join(path)
    } else {
        path
    }
}
