// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use canonicheck::models::probe::ProbeRecord;
use canonicheck::models::settings::{ProbeSettings, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};
use canonicheck::services::input::UrlList;
use canonicheck::services::logging::init_logging;
use canonicheck::services::prober::Prober;
use canonicheck::services::report::{
    append_failure, append_to_report, write_html_report, write_text_report,
};
use canonicheck::services::results::{save_results, ResultSet};
use canonicheck::services::tester::UrlTester;
use chrono::Utc;
use clap::{ArgGroup, Parser};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Probe URLs for canonicalization consistency
#[derive(Debug, Parser)]
#[command(name = "canonicheck", version)]
#[command(group(ArgGroup::new("input").required(true).args(["urls", "file"])))]
struct Cli {
    /// URLs to test
    #[arg(short = 'u', long = "urls", num_args = 1..)]
    urls: Vec<String>,

    /// File with one URL per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// User-Agent header sent with every probe
    #[arg(long, env = "CANONICHECK_USER_AGENT")]
    user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "CANONICHECK_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Variants probed at the same time for one URL
    #[arg(long, env = "CANONICHECK_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Directory for results.json and the reports
    #[arg(long, env = "CANONICHECK_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> ProbeSettings {
        let settings = ProbeSettings::default()
            .with_timeout_secs(self.timeout_secs)
            .with_concurrency(self.concurrency)
            .with_output_dir(&self.output_dir);

        match &self.user_agent {
            Some(user_agent) => settings.with_user_agent(user_agent),
            None => settings,
        }
    }

    fn url_list(&self) -> Result<UrlList> {
        match &self.file {
            Some(path) => UrlList::from_file(path)
                .with_context(|| format!("Failed to read URLs from {}", path.display())),
            None => UrlList::from_entries(&self.urls).context("No URLs given"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose).context("Failed to initialize logging")?;

    let settings = cli.settings();
    let input = cli.url_list()?;
    for rejected in &input.rejected {
        eprintln!("Skipping input: {}", rejected);
    }

    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            settings.output_dir.display()
        )
    })?;

    let prober = Prober::new(&settings).context("Failed to build HTTP client")?;
    let tester = UrlTester::new(prober, settings.concurrency);
    let results = run_tests(&tester, &input.urls, &settings.output_dir).await;
    if results.is_empty() {
        warn!("None of the URLs could be tested");
    }

    let dir = &settings.output_dir;
    let generated_at = Utc::now();
    let results_path = save_results(dir, &results)?;
    let summary_path = write_text_report(dir, &results, generated_at)?;
    let html_path = write_html_report(dir, &results, generated_at)?;

    println!("Results written to {}", results_path.display());
    println!("Summary written to {}", summary_path.display());
    println!("HTML report written to {}", html_path.display());
    println!("All tests completed.");
    Ok(())
}

/// Append failures are logged; the run always reaches the final reports.
async fn run_tests(tester: &UrlTester, urls: &[String], dir: &Path) -> ResultSet {
    let mut results = ResultSet::new();

    for url in urls {
        match tester.test_url(url).await {
            Ok(records) => {
                for record in &records {
                    print_summary(record);
                    if let Err(e) = append_to_report(dir, record) {
                        warn!("Failed to append to report: {}", e);
                    }
                }
                results.insert(url.as_str(), records);
            }
            Err(e) => {
                eprintln!("Test for {} failed: {}", url, e);
                if let Err(report_err) = append_failure(dir, url, &e) {
                    warn!("Failed to append to report: {}", report_err);
                }
            }
        }
    }

    results
}

fn print_summary(record: &ProbeRecord) {
    let status = record
        .status_code
        .map_or_else(|| "null".to_string(), |status| status.to_string());
    let fetch = if record.successful_fetch {
        "Success"
    } else {
        "Fail"
    };
    println!(
        "Request: {}, Response Status: {}, Outcome: {} ({})",
        record.url_variation, status, fetch, record.outcome
    );
}
