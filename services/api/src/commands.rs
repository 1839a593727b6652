use crate::infra::rng_for;
use clap::Args;
use evalu8::config::{AppConfig, AuditConfig};
use evalu8::error::AppError;
use evalu8::telemetry;
use evalu8::workflows::screening::{
    run_all_models_from_source, run_model_from_source, write_csv, AuditReport, AuditSession,
    DataSource, ModelId,
};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct BatchArgs {
    /// Shortlist size (defaults to APP_TOP_K)
    #[arg(long)]
    pub(crate) k: Option<usize>,
    /// Applicant JSON export to load (defaults to APP_DATA_PATH)
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
    /// Seed for the random model (defaults to APP_RANDOM_SEED, then entropy)
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct RunArgs {
    /// Model identifier, model_1 through model_5
    #[arg(long)]
    pub(crate) model: String,
    #[command(flatten)]
    pub(crate) batch: BatchArgs,
}

#[derive(Args, Debug)]
pub(crate) struct AuditArgs {
    /// Model identifier, model_1 through model_5
    #[arg(long)]
    pub(crate) model: String,
    #[command(flatten)]
    pub(crate) batch: BatchArgs,
    /// Robustness re-runs (defaults to APP_ROBUSTNESS_RUNS)
    #[arg(long)]
    pub(crate) runs: Option<usize>,
    /// Print the full report as JSON instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
    /// Write the augmented applicant rows to this CSV file
    #[arg(long)]
    pub(crate) export_csv: Option<PathBuf>,
}

struct ResolvedBatch {
    k: usize,
    source: DataSource,
    rng: ChaCha8Rng,
}

impl BatchArgs {
    fn resolve(self, config: &AuditConfig) -> ResolvedBatch {
        ResolvedBatch {
            k: self.k.unwrap_or(config.top_k),
            source: DataSource::from_override(self.data, &config.data_path),
            rng: rng_for(self.seed.or(config.random_seed)),
        }
    }
}

fn prepare() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_single_model(args: RunArgs) -> Result<(), AppError> {
    let config = prepare()?;
    let ResolvedBatch { k, source, mut rng } = args.batch.resolve(&config.audit);

    let selected = run_model_from_source(&args.model, k, &source, &mut rng)?;
    print_json(&selected)
}

pub(crate) fn run_every_model(args: BatchArgs) -> Result<(), AppError> {
    let config = prepare()?;
    let ResolvedBatch { k, source, mut rng } = args.resolve(&config.audit);

    let results = run_all_models_from_source(k, &source, &mut rng)?;
    print_json(&results)
}

pub(crate) fn run_audit(args: AuditArgs) -> Result<(), AppError> {
    let config = prepare()?;
    let AuditArgs {
        model,
        batch,
        runs,
        json,
        export_csv,
    } = args;

    let model: ModelId = model.parse()?;
    let runs = runs.unwrap_or(config.audit.robustness_runs);
    let ResolvedBatch { k, source, mut rng } = batch.resolve(&config.audit);

    let mut session = AuditSession::from_source(&source)?;
    let report = session.audit(model, k, runs, &mut rng)?;

    if let Some(path) = export_csv {
        let file = File::create(&path)?;
        write_csv(&session.augmented_rows(), BufWriter::new(file))?;
        info!(path = %path.display(), "augmented rows exported");
    }

    if json {
        return print_json(&report);
    }

    render_summary(session.source(), &report);
    Ok(())
}

fn render_summary(source: &str, report: &AuditReport) {
    println!("Selection audit");
    println!("  Source: {source}");
    println!(
        "  Model: {} ({})",
        report.model, report.model_description
    );
    println!(
        "  Shortlist: {} of {} applicants (k = {})",
        report.selected.len(),
        report.population,
        report.k
    );

    println!("\nSelected applicants:");
    for (position, name) in report.selected.iter().enumerate() {
        println!("  {:>2}. {name}", position + 1);
    }

    println!("\nFindings:");
    for line in report.findings() {
        println!("  - {line}");
    }

    let rate_lines: Vec<String> = report
        .attributes
        .iter()
        .filter_map(|audit| {
            let rates = audit.selection_rates.as_ref()?;
            let ratio = rates
                .impact_ratio
                .map(|ratio| format!("{ratio:.2}"))
                .unwrap_or_else(|| "n/a".to_string());
            let verdict = if rates.four_fifths_compliant {
                "meets"
            } else {
                "fails"
            };
            Some(format!(
                "{}: impact ratio {ratio}, {verdict} the four-fifths rule",
                audit.disparity.attribute.label()
            ))
        })
        .collect();

    if !rate_lines.is_empty() {
        println!("\nSelection rates:");
        for line in rate_lines {
            println!("  - {line}");
        }
    }

    for note in report.attributes.iter().filter_map(|audit| audit.note) {
        println!("\nNote: {note}");
    }
}
