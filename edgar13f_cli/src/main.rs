mod output;

use anyhow::{Context, Result};
use clap::Parser;
use edgar13f_lib::Analyzer;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "edgar13f")]
#[command(about = "Compare an institution's two most recent SEC 13F filings")]
struct Cli {
    /// Central Index Key of the institution, e.g. 1067983 for Berkshire Hathaway
    cik: String,

    /// Write the three ranked tables to timestamped CSV files
    #[arg(long)]
    export: bool,

    /// Key holdings by full 9-character CUSIP instead of merging share classes
    #[arg(long)]
    full_cusip: bool,

    /// Echo the share-change sort flag in the report; tables rank by weight change
    #[arg(long)]
    sort_by_share_change: bool,

    /// Identifying User-Agent with a contact email; defaults to $EDGAR_USER_AGENT
    #[arg(long)]
    user_agent: Option<String>,

    /// Output format: table or json
    #[arg(long, default_value = "table")]
    output: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("edgar13f_lib=info".parse().unwrap())
                .add_directive("edgar13f_api=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let user_agent = cli
        .user_agent
        .or_else(|| std::env::var("EDGAR_USER_AGENT").ok())
        .context(
            "no User-Agent configured; pass --user-agent or set EDGAR_USER_AGENT \
             (SEC requires an identifying label with a contact email)",
        )?;

    let mut analyzer = Analyzer::new(&user_agent)?;
    if cli.full_cusip {
        analyzer = analyzer.with_full_cusip_keys();
    }

    let report = analyzer
        .analyze(&cli.cik, cli.export, cli.sort_by_share_change)
        .await?;

    match format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => output::print_report(&report),
    }

    Ok(())
}
