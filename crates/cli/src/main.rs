// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod script;

use clap::Parser;
use erp_forms_api::{ApiError, FormPage, MockSubmitter, PageConfig, SessionView};
use erp_forms_audit::{Actor, AuditEvent};
use erp_forms_domain::{
    FormKind, FormSchema, Invoice, Project, PurchaseRequisition, QualityInspection, ReferenceData,
};
use erp_forms_persistence::{SharedDraftStore, SqliteDraftStore, shared};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::script::{ScriptReport, ScriptStep, StepResult, parse_script, run_script};

/// ERP Forms - replay a scripted user session against a form wizard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Form to open: purchase-requisition, invoice, project or quality-inspection
    #[arg(short, long)]
    form: FormKind,

    /// Path to the JSON script of user inputs
    #[arg(short, long)]
    script: PathBuf,

    /// Path to a JSON file with reference data (customers, catalogue, approvers, ...)
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Path to the `SQLite` draft database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Identifier recorded as the actor on every audit event
    #[arg(short, long, default_value = "cli-user")]
    actor: String,

    /// Autosave quiet period in milliseconds (defaults to the form's own)
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Upper bound on one submission attempt, in milliseconds
    #[arg(long)]
    submit_timeout_ms: Option<u64>,

    /// How long the mock submission service takes to answer, in milliseconds
    #[arg(long, default_value_t = 1500)]
    submit_delay_ms: u64,

    /// Do not write drafts
    #[arg(long)]
    no_autosave: bool,

    /// Include the audit journal in the report
    #[arg(long)]
    journal: bool,
}

impl Args {
    fn page_config(&self) -> PageConfig {
        let mut config: PageConfig = PageConfig::for_kind(self.form);
        if let Some(millis) = self.debounce_ms {
            config = config.with_debounce(Duration::from_millis(millis));
        }
        if let Some(millis) = self.submit_timeout_ms {
            config = config.with_submit_timeout(Duration::from_millis(millis));
        }
        if self.no_autosave {
            config = config.without_autosave();
        }
        config
    }
}

fn load_reference(path: Option<&Path>) -> Result<ReferenceData, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        info!("No reference data file given; using empty lookup lists");
        return Ok(ReferenceData::default());
    };
    info!("Loading reference data from: {}", path.display());
    let text: String = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

async fn run_form<F: FormSchema>(
    args: &Args,
    reference: ReferenceData,
    store: SharedDraftStore,
    steps: Vec<ScriptStep>,
) -> Result<ScriptReport, ApiError> {
    let submitter: MockSubmitter = MockSubmitter::new(Duration::from_millis(args.submit_delay_ms));
    let actor: Actor = Actor::new(args.actor.clone(), String::from("user"));
    let mut page: FormPage<F, MockSubmitter> =
        FormPage::open(reference, store, submitter, args.page_config(), actor).await;

    let results: Vec<StepResult> = run_script(&mut page, steps).await;
    let session: SessionView = page.view()?;
    let journal: Option<Vec<AuditEvent>> = args.journal.then(|| page.journal().to_vec());
    page.close().await;

    Ok(ScriptReport {
        steps: results,
        session,
        journal,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(form = %args.form, "Initializing ERP form session");

    let reference: ReferenceData = load_reference(args.reference.as_deref())?;
    let steps: Vec<ScriptStep> = parse_script(&std::fs::read_to_string(&args.script)?)?;
    info!(steps = steps.len(), "Loaded script from: {}", args.script.display());

    // Initialize the draft store (in-memory or file-based based on CLI argument)
    let store: SharedDraftStore = if let Some(db_path) = &args.database {
        info!("Using file-based draft database at: {}", db_path);
        shared(SqliteDraftStore::new_with_file(db_path)?)
    } else {
        info!("Using in-memory draft database");
        shared(SqliteDraftStore::new_in_memory()?)
    };

    let report: ScriptReport = match args.form {
        FormKind::PurchaseRequisition => {
            run_form::<PurchaseRequisition>(&args, reference, store, steps).await?
        }
        FormKind::Invoice => run_form::<Invoice>(&args, reference, store, steps).await?,
        FormKind::Project => run_form::<Project>(&args, reference, store, steps).await?,
        FormKind::QualityInspection => {
            run_form::<QualityInspection>(&args, reference, store, steps).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
