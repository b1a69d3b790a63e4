//! Process command - extract rates from a single local rate sheet.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use ratewatch_core::{
    AirtableStore, BankRegistry, Credentials, ExtractionOutcome, ExtractionRequest, RatePipeline,
    RecordStore,
};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, JPG or PNG)
    #[arg(required = true)]
    input: PathBuf,

    /// Declared MIME type (default: detected from name and content)
    #[arg(long)]
    mime: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write the accepted record to the record store
    #[arg(long)]
    persist: bool,

    /// Show completeness and the strategy used
    #[arg(long)]
    show_quality: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (header row of field names, one data row)
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let credentials = Credentials::from_env();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let registry = BankRegistry::load(config.registry_path.as_deref())?;
    let pipeline = RatePipeline::new(&config, &credentials, registry)?;
    let store = if args.persist {
        Some(AirtableStore::from_config(&config.store, &credentials)?)
    } else {
        None
    };

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Reading file...");

    let bytes = fs::read(&args.input)?;
    let filename = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let mut request = ExtractionRequest::from_bytes(filename, &bytes);
    if let Some(mime) = &args.mime {
        request = request.with_mime_type(mime.clone());
    }

    pb.set_message("Extracting rates...");
    let outcome = match pipeline.run(&request).await {
        Ok(outcome) => outcome,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    let persisted = match &store {
        Some(store) => {
            pb.set_message("Saving record...");
            Some(store.upsert(&outcome.record).await?)
        }
        None => None,
    };

    pb.finish_and_clear();

    let output = format_outcome(&outcome, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(action) = &persisted {
        println!("{} Stored record {:?}", style("✓").green(), action);
    }

    if args.show_quality {
        let score = outcome.completeness;
        println!();
        println!(
            "{} Extracted {}/{} fields ({}% complete) via {}",
            style("ℹ").blue(),
            score.filled,
            score.total,
            score.percent,
            outcome.strategy
        );
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            start.elapsed().as_millis()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_outcome(outcome: &ExtractionOutcome, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&outcome.record)?),
        OutputFormat::Csv => format_csv(outcome),
        OutputFormat::Text => Ok(format_text(outcome)),
    }
}

fn format_csv(outcome: &ExtractionOutcome) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.serialize(&outcome.record)?;
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(outcome: &ExtractionOutcome) -> String {
    let fields = outcome.record.populated_fields();
    let width = fields.keys().map(|k| k.len()).max().unwrap_or(0);

    let mut output = String::new();
    for (name, value) in &fields {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        output.push_str(&format!("{name:<width$}  {value}\n"));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratewatch_core::{MimeType, RateRecord};

    fn outcome() -> ExtractionOutcome {
        let record = RateRecord {
            bank_name: Some("BBS Bank".into()),
            data_month: Some("March 2026".into()),
            savings_min: Some(1.5),
            ..Default::default()
        };
        ExtractionOutcome {
            completeness: record.completeness(),
            record,
            strategy: "regex",
            bank_id: Some("BBS".into()),
            mime: MimeType::Pdf,
        }
    }

    #[test]
    fn test_csv_has_full_header_and_one_row() {
        let csv = format_csv(&outcome()).unwrap();
        let mut lines = csv.lines();
        let header = lines.next().unwrap();
        assert_eq!(header.split(',').count(), RateRecord::FIELD_NAMES.len());
        assert!(header.starts_with("Bank Name,"));
        assert!(lines.next().unwrap().starts_with("BBS Bank,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_text_lists_populated_fields_only() {
        let text = format_text(&outcome());
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("1.5"));
    }

    #[test]
    fn test_text_follows_column_order() {
        let text = format_text(&outcome());
        let names: Vec<&str> = text
            .lines()
            .map(|line| line.split("  ").next().unwrap().trim_end())
            .collect();
        assert_eq!(names, ["Bank Name", "Data Month", "Savings Min"]);
    }
}
