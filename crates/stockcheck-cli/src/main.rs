//! Terminal stock dashboard

mod render;

use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use stockcheck_quote::{
    DashboardService, FinvizClient, LookupConfig, QuoteConfig, QuoteSource, TickerLookup,
    normalize_ticker,
};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "stockcheck")]
#[command(about = "Terminal stock dashboard backed by Finviz", long_about = None)]
struct Args {
    /// Ticker symbol; skips the ticker prompt
    #[arg(short, long)]
    ticker: Option<String>,

    /// Company name; skips the company prompt
    #[arg(short, long)]
    company: Option<String>,

    /// Resolve the ticker from the company name through OpenRouter
    #[arg(short, long)]
    lookup: bool,

    /// Probe a few well-known tickers and exit
    #[arg(long)]
    test_connection: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    stockcheck_utils::init_tracing_with("warn,stockcheck_quote=info");
    stockcheck_utils::load_dotenv();

    let args = Args::parse();
    debug!(?args, "Starting stockcheck");

    let client = Arc::new(FinvizClient::new(QuoteConfig::from_env()?)?);
    let service = DashboardService::new(client.clone());

    if args.test_connection {
        println!("Testing API connection...");
        let report = service.test_api_connection().await;
        print!("{}", render::render_connection_report(&report));
        return Ok(ExitCode::SUCCESS);
    }

    println!("Welcome to Stock Dashboard!");
    println!("{}", "=".repeat(40));

    let mut input = io::stdin().lock();

    let company = match args.company {
        Some(name) => Some(name.trim().to_string()),
        None if args.ticker.is_none() => Some(ask(
            &mut input,
            "=== Stock Dashboard ===\nEnter a company name (e.g., 'Apple', 'Microsoft', 'Tesla'):",
        )?),
        None => None,
    };
    if company.as_deref() == Some("") {
        println!("Error: Company name cannot be empty");
        println!("Failed to get valid company input.");
        return Ok(ExitCode::FAILURE);
    }

    let ticker = match (args.ticker, company.as_deref()) {
        (Some(ticker), _) => ticker,
        (None, Some(name)) if args.lookup => {
            println!("Searching for ticker symbol for: {name}");
            let lookup = TickerLookup::from_config(&LookupConfig::from_env());
            let result = lookup.find_ticker(name).await;
            match result.ticker {
                Some(ticker) if result.success => {
                    println!("Found ticker: {ticker}");
                    ticker
                }
                _ => {
                    let error = result.error.unwrap_or_default();
                    println!("Error finding ticker: {error}");
                    println!("Failed to get valid company input.");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        (None, name) => {
            let name = name.unwrap_or("the company");
            println!("Searching for ticker symbol for: {name}");
            println!(
                "Note: Please enter the exact ticker symbol if known, or use a known ticker for best results"
            );
            ask(
                &mut input,
                &format!("Enter ticker symbol for {name} (e.g., AAPL, MSFT, TSLA):"),
            )?
        }
    };

    let ticker = normalize_ticker(&ticker);
    if ticker.is_empty() {
        println!("Error: Ticker symbol cannot be empty");
        println!("Failed to get valid company input.");
        return Ok(ExitCode::FAILURE);
    }

    println!("Fetching data for {ticker}...");
    let record = service
        .fetch_company_data_named(&ticker, company.as_deref())
        .await;
    let chart_url = if record.is_fallback() {
        println!("Using fallback mock data...");
        None
    } else {
        println!("✅ Data fetched successfully!");
        client.chart_url(&ticker)
    };

    print!("{}", render::render_dashboard(&record, chart_url.as_deref()));
    Ok(ExitCode::SUCCESS)
}

/// Print a question and read one trimmed line
fn ask(input: &mut impl BufRead, question: &str) -> Result<String> {
    println!("{question}");
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
