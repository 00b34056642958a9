//! Micro Gallery CLI - JSON bridge for the site and admin tools
//!
//! Commands: facets, query, label, print
//! Outputs JSON to stdout (label without --out writes the HTML itself)
//! Logs go to stderr

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use microgallery_core::{
    hashing::{label_fingerprint, query_fingerprint},
    label::render_with,
    print::{data_url, BrowserTarget, FileTarget, LabelLayout, PaperSize, PrintError, PrintTarget},
    Catalog, FacetCatalog, GalleryConfig, QueryPipeline, QueryState, ReturnShipmentRecord,
};

#[derive(Parser)]
#[command(name = "microgallery-cli")]
#[command(about = "Micro Gallery Japan - artwork queries and return labels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Catalog JSON file (overrides config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the canonical facet vocabulary
    Facets,

    /// Run an artwork query
    Query {
        /// JSON payload (QueryState), or @path to read it from a file
        #[arg(short, long, conflicts_with = "params")]
        payload: Option<String>,

        /// URL query string, e.g. "q=tokyo&colors=red,blue&sort=price_asc&page=2"
        #[arg(long)]
        params: Option<String>,
    },

    /// Render a return shipping label
    Label {
        /// JSON payload (ReturnShipmentRecord), or @path
        #[arg(short, long)]
        payload: String,

        /// Write the HTML here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Page margin in millimetres (defaults to the paper's own)
        #[arg(long)]
        margin: Option<u32>,

        /// Print a data: URL instead of the HTML document
        #[arg(long, conflicts_with = "out")]
        data_url: bool,

        /// Generate a return ID when the payload has none
        #[arg(long)]
        assign_return_id: bool,
    },

    /// Render a label and open it in the browser for printing
    Print {
        /// JSON payload (ReturnShipmentRecord), or @path
        #[arg(short, long)]
        payload: String,

        #[arg(long, value_enum)]
        paper: Option<PaperArg>,

        /// Page margin in millimetres (defaults to the paper's own)
        #[arg(long)]
        margin: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    Label,
}

impl From<PaperArg> for PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => PaperSize::A4,
            PaperArg::Label => PaperSize::Label100x150,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match GalleryConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to load config: {}"}}"#, e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }

    init_tracing(config.log_json);

    match cli.command {
        Commands::Facets => {
            emit(&serde_json::json!(FacetCatalog::canonical()));
            ExitCode::SUCCESS
        }

        Commands::Query { payload, params } => {
            let state = match (payload, params) {
                (Some(payload), _) => match read_payload::<QueryState>(&payload) {
                    Ok(s) => s,
                    Err(e) => return fail(&format!("Invalid payload: {e}")),
                },
                (None, Some(params)) => QueryState::from_query_string(&params),
                (None, None) => QueryState::default(),
            };

            let catalog = match load_catalog(config.catalog_path.as_deref()) {
                Ok(c) => c,
                Err(e) => return fail(&e),
            };
            let pipeline = QueryPipeline::new(catalog, FacetCatalog::canonical())
                .with_page_size(config.page_size);

            let page = pipeline.run(&state);
            let fingerprint = query_fingerprint(&state, pipeline.page_size()).unwrap_or_default();
            emit(&serde_json::json!({
                "success": true,
                "fingerprint": fingerprint,
                "activeFacets": pipeline.active_facets(&state),
                "result": page,
            }));
            ExitCode::SUCCESS
        }

        Commands::Label { payload, out, paper, margin, data_url: as_data_url, assign_return_id } => {
            let mut shipment = match read_payload::<ReturnShipmentRecord>(&payload) {
                Ok(s) => s,
                Err(e) => return fail(&format!("Invalid payload: {e}")),
            };
            if assign_return_id && shipment.return_id.trim().is_empty() {
                shipment.return_id = format!("RET-{}", Uuid::new_v4().simple());
                info!(return_id = %shipment.return_id, "assigned return id");
            }

            let layout = match label_layout(paper.map_or(config.paper, PaperSize::from), margin) {
                Ok(l) => l,
                Err(e) => return fail(&e.to_string()),
            };
            let html = render_label(&shipment, &layout);

            let Some(out) = out else {
                if as_data_url {
                    println!("{}", data_url(&html));
                } else {
                    println!("{html}");
                }
                return ExitCode::SUCCESS;
            };
            match FileTarget::new(out).deliver(&html) {
                Ok(path) => {
                    emit(&serde_json::json!({
                        "success": true,
                        "path": path,
                        "returnId": shipment.return_id,
                        "fingerprint": label_fingerprint(&shipment, &layout).unwrap_or_default(),
                        "missingFields": shipment.missing_fields(),
                    }));
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e.to_string()),
            }
        }

        Commands::Print { payload, paper, margin } => {
            let shipment = match read_payload::<ReturnShipmentRecord>(&payload) {
                Ok(s) => s,
                Err(e) => return fail(&format!("Invalid payload: {e}")),
            };

            let layout = match label_layout(paper.map_or(config.paper, PaperSize::from), margin) {
                Ok(l) => l,
                Err(e) => return fail(&e.to_string()),
            };
            let html = render_label(&shipment, &layout);
            let fingerprint = label_fingerprint(&shipment, &layout).unwrap_or_default();
            let stem = format!("mgj-return-label-{}", &fingerprint[..fingerprint.len().min(12)]);

            match BrowserTarget::new(stem).deliver(&html) {
                Ok(path) => {
                    emit(&serde_json::json!({
                        "success": true,
                        "path": path,
                        "fingerprint": fingerprint,
                    }));
                    ExitCode::SUCCESS
                }
                Err(e) => fail(&e.to_string()),
            }
        }
    }
}

fn label_layout(paper: PaperSize, margin: Option<u32>) -> Result<LabelLayout, PrintError> {
    match margin {
        Some(margin_mm) => LabelLayout::from_user(paper, margin_mm),
        None => Ok(LabelLayout::for_paper(paper)),
    }
}

fn render_label(shipment: &ReturnShipmentRecord, layout: &LabelLayout) -> String {
    let missing = shipment.missing_fields();
    if !missing.is_empty() {
        warn!(missing = ?missing, "label rendered with blank fields");
    }
    render_with(shipment, layout)
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog, String> {
    match path {
        Some(path) => {
            let catalog = Catalog::load_from_file(path).map_err(|e| e.to_string())?;
            info!(path = %path.display(), artworks = catalog.len(), "catalog loaded");
            Ok(catalog)
        }
        None => Ok(Catalog::seeded()),
    }
}

/// Inline JSON, or `@path` to read the JSON from a file.
fn read_payload<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, String> {
    let content = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

fn emit(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => error!(error = %e, "failed to serialize output"),
    }
}

fn fail(message: &str) -> ExitCode {
    error!("{message}");
    let output = serde_json::json!({
        "success": false,
        "error": message,
    });
    println!("{}", output);
    ExitCode::FAILURE
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
