use anyhow::Result;
use clap::Parser;
use colored::*;
use std::time::Duration;

mod output;
mod scenarios;
mod sse_client;

use output::print_test_summary;

#[derive(Parser)]
#[command(name = "sse-test-client")]
#[command(about = "Smoke tests a running mce-api server")]
struct Cli {
    /// Base URL of the backend (e.g., http://localhost:8000)
    #[arg(long, default_value = "http://localhost:8000")]
    base_url: String,

    /// Test scenario to run
    #[arg(long, value_enum, default_value = "all")]
    scenario: ScenarioChoice,

    /// Service name the homepage is expected to report
    #[arg(long)]
    service_name: Option<String>,

    /// Number of tokens /stream is expected to emit
    #[arg(long)]
    expected_tokens: Option<u32>,

    /// Seconds to wait for the stream's done event
    #[arg(long, default_value_t = 30)]
    stream_timeout_secs: u64,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone)]
enum ScenarioChoice {
    /// GET /healthz and check the fixed health body
    Health,
    /// GET / and check the service identification
    Home,
    /// Consume /stream and check token order and the done count
    Stream,
    /// Run every scenario
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    println!("{}", "=== TEST PHASE ===".bright_white().bold());
    println!("{} Target: {}", "→".blue(), cli.base_url);

    let client = reqwest::Client::new();
    let stream_timeout = Duration::from_secs(cli.stream_timeout_secs);
    let service_name = cli.service_name.as_deref();

    let mut results = Vec::new();

    match cli.scenario {
        ScenarioChoice::Health => {
            results.push(scenarios::test_health(&client, &cli.base_url).await?);
        }
        ScenarioChoice::Home => {
            results.push(scenarios::test_home(&client, &cli.base_url, service_name).await?);
        }
        ScenarioChoice::Stream => {
            results.push(
                scenarios::test_stream(&cli.base_url, cli.expected_tokens, stream_timeout).await?,
            );
        }
        ScenarioChoice::All => {
            results.push(scenarios::test_health(&client, &cli.base_url).await?);
            results.push(scenarios::test_home(&client, &cli.base_url, service_name).await?);
            results.push(
                scenarios::test_stream(&cli.base_url, cli.expected_tokens, stream_timeout).await?,
            );
        }
    }

    print_test_summary(&results);

    let all_passed = results.iter().all(|r| r.passed);

    if all_passed {
        println!("\n{}", "All tests passed! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some tests failed! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}
