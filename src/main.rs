use anyhow::{bail, Context};
use parcelscraper::core::{parse_parcel_list, Outcome};
use parcelscraper::report::{file_stem, report_lines};
use parcelscraper::{BatchRunner, ScraperConfig};

const USAGE: &str = "usage: parcelscraper <assessor-url> <parcel[,parcel...]> [--report]";

/// Warnings by default, plus this crate's info lines so the run summary shows.
fn logger_builder() -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Warn)
        .filter_module("parcelscraper", log::LevelFilter::Info)
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error);
    builder
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger_builder().parse_default_env().init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let report = args.iter().any(|a| a == "--report");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();
    let [assessor_url, parcel_input] = positional.as_slice() else {
        bail!(USAGE);
    };

    let parcels = parse_parcel_list(parcel_input);
    if assessor_url.trim().is_empty() || parcels.is_empty() {
        bail!("Assessor URL and parcel number(s) are required");
    }

    let runner = BatchRunner::new(ScraperConfig::from_env())
        .context("failed to initialize the scraper")?;
    let batch = runner.run(&parcels, assessor_url).await;
    runner.stats().print_summary();

    if report {
        println!("{}", file_stem(&batch));
        for entry in batch.iter() {
            println!("\nParcel: {}", entry.parcel);
            match &entry.outcome {
                Outcome::Found(record) => {
                    for (label, value) in
                        report_lines(record, &entry.parcel, assessor_url, runner.config())
                    {
                        println!("  {}: {}", label, value);
                    }
                }
                Outcome::Error { message, .. } => {
                    println!("  Error scraping parcel {}: {}", entry.parcel, message);
                }
            }
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&batch)?);
    }

    Ok(())
}
