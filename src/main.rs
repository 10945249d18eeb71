use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use qwtt_report::config::ReportConfig;
use qwtt_report::io::{self, delimited, excel_write};
use qwtt_report::model::TableKind;
use qwtt_report::pipeline::{ReportCache, ReportInputs};
use qwtt_report::{Result, ReportError};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Workbook name used when both reports are exported to Excel.
const WORKBOOK_NAME: &str = "qwtt_reports.xlsx";

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ReportError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate(args) => execute_generate(args),
    }
}

fn execute_generate(args: GenerateArgs) -> Result<()> {
    for path in args.input_paths() {
        if !path.exists() {
            return Err(ReportError::MissingInput(path.to_path_buf()));
        }
    }

    let config = match &args.config {
        Some(path) => ReportConfig::from_json_file(path)?,
        None => ReportConfig::default(),
    };

    let inputs = ReportInputs {
        inventory: Some(io::load_table(&args.inventory, TableKind::Inventory)?),
        business_report: Some(io::load_table(&args.business, TableKind::BusinessReport)?),
        product_master: Some(io::load_table(&args.product_master, TableKind::ProductMaster)?),
        fulfillment: args
            .fulfillment
            .as_deref()
            .map(|path| io::load_table(path, TableKind::Fulfillment))
            .transpose()?,
    };

    let mut cache = ReportCache::new();
    let reports = cache.refresh(&inputs, &config)?;
    let stock_table = reports.stock.to_table();
    let cost_table = reports.cost.to_table();

    std::fs::create_dir_all(&args.output_dir)?;
    match args.format {
        OutputFormat::Csv => {
            for table in [&stock_table, &cost_table] {
                let path = args.output_dir.join(format!("{}.csv", table.sheet_name));
                delimited::write_table_file(&path, table)?;
                info!(path = %path.display(), "report written");
            }
        }
        OutputFormat::Xlsx => {
            let path = args.output_dir.join(WORKBOOK_NAME);
            excel_write::write_workbook(&path, &[stock_table, cost_table])?;
            info!(path = %path.display(), "workbook written");
        }
    }

    let summary = reports.summary;
    println!(
        "Total products: {} | Total stock: {} | Total sales QTY: {} | Sell-through: {:.1}%",
        summary.product_count, summary.total_stock, summary.total_sales, summary.sell_through_pct
    );
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Build QWTT stock and sales-with-cost reports from marketplace exports."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the inventory/sales and sales-with-cost reports.
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Inventory export containing `Asin` and `Sellable` columns.
    #[arg(long)]
    inventory: PathBuf,

    /// Business report with an ASIN and an order-items column.
    #[arg(long)]
    business: PathBuf,

    /// Product master catalog (Excel or CSV).
    #[arg(long)]
    product_master: PathBuf,

    /// Optional QWTT fulfillment order export.
    #[arg(long)]
    fulfillment: Option<PathBuf>,

    /// Directory the reports are written to.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Export format for the reports.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Optional JSON file overriding report settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl GenerateArgs {
    fn input_paths(&self) -> impl Iterator<Item = &Path> {
        [
            Some(self.inventory.as_path()),
            Some(self.business.as_path()),
            Some(self.product_master.as_path()),
            self.fulfillment.as_deref(),
            self.config.as_deref(),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Xlsx,
}
