// src/main.rs
// =============================================================================
// Entry point of the depthcrawl CLI.
//
// What happens here:
// 1. Set up logging (tracing, to stderr) and parse arguments (clap)
// 2. Validate the start URL and build a CrawlConfig
// 3. Run the crawl engine; Ctrl-C cancels it cleanly
// 4. Write the two report files and print a summary (or JSON)
// 5. Exit: 0 = done, 1 = failed pages with --fail-on-error, 2 = error
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use depthcrawl::page::PageUrl;
use depthcrawl::{report, CrawlEngine, FinalState};

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_tracing() {
    // Logs go to stderr so --json output on stdout stays machine-readable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "depthcrawl=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let start = PageUrl::parse(&cli.start_url)
        .with_context(|| format!("cannot crawl '{}'", cli.start_url))?;

    let config = cli.to_config();
    config.validate()?;

    if !cli.json {
        println!("🔍 Crawling: {}", start);
        println!("📊 Max depth: {}", config.max_depth);
        println!("🧵 Using {} worker(s)", config.workers);
    }

    let engine = CrawlEngine::from_config(config).context("failed to set up the crawler")?;

    let cancel = engine.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, finishing in-flight pages and stopping");
            cancel.cancel();
        }
    });

    let state = engine.run(&start.to_string()).await?;

    let reports_ok = write_reports(&cli, &state);

    if cli.json {
        println!("{}", report::to_json(&state)?);
    } else {
        println!("\nCrawling finished. Visited {} unique page(s).\n", state.visited.len());
        report::print_summary(&state);
    }

    if !reports_ok {
        return Ok(2);
    }
    if cli.fail_on_error && state.total_failed() > 0 {
        return Ok(1);
    }
    Ok(0)
}

type SaveFn = fn(&FinalState, &Path) -> depthcrawl::Result<()>;

// Each report is attempted on its own; a failure is reported but does not
// stop the other one from being written.
fn write_reports(cli: &Cli, state: &FinalState) -> bool {
    let mut ok = true;

    let reports = [
        ("processed results", cli.results_file.as_path(), report::save_results as SaveFn),
        ("visited URLs", cli.visited_file.as_path(), report::save_visited as SaveFn),
    ];

    for (what, path, save) in reports {
        match save(state, path) {
            Ok(()) => {
                if !cli.json {
                    println!("💾 Saved {} to {}", what, path.display());
                }
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "could not write {}", what);
                ok = false;
            }
        }
    }

    ok
}
