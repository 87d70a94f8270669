//! idlreport CLI - Build report definitions from IDL column paths
//!
//! Usage:
//!   idlreport label <path> [--idl <idl.json>]
//!   idlreport describe <path> [--idl <idl.json>]
//!   idlreport from <path> [--idl <idl.json>]
//!   idlreport build [--name <name>] [--display <path[=label]>]... [--filter <path>]... [--remove <path>]...
//!   idlreport filter <code> [value]...
//!
//! Examples:
//!   idlreport label bib-copy-acp-barcode --idl fm_IDL.json
//!   idlreport build --idl fm_IDL.json --display bib-title --display "bib-copy-acp-barcode=Barcode"
//!   idlreport filter date_between 2024-01-01

use clap::{Parser, Subcommand};
use idlreport::config::Settings;
use idlreport::filter::{self, resolve_filter};
use idlreport::query::build_from_fragment;
use idlreport::{ColumnPath, Idl, ReportBuilder};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idlreport")]
#[command(about = "idlreport - Build report definitions from IDL column paths")]
#[command(version)]
struct Cli {
    /// Config file (defaults to IDLREPORT_CONFIG, ./idlreport.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// IDL JSON file (overrides the config file)
    #[arg(long, global = true)]
    idl: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the human-readable label for a path
    Label {
        /// Column path, e.g. bib-copy-acp-barcode
        path: String,
    },

    /// Print label and datatype of a path's leaf column
    Describe {
        /// Column path ending in a field
        path: String,
    },

    /// Print the from-clause fragment for a path
    From {
        /// Column path
        path: String,
    },

    /// Build a report definition and print it as JSON
    Build {
        /// Report name (defaults to the configured name)
        #[arg(short, long)]
        name: Option<String>,

        /// Display column, optionally with a label: PATH[=LABEL]
        #[arg(short, long)]
        display: Vec<String>,

        /// Filter column
        #[arg(short, long)]
        filter: Vec<String>,

        /// Display column to remove again after all additions
        #[arg(short, long)]
        remove: Vec<String>,
    },

    /// Resolve a filter operator code against input values
    Filter {
        /// Operator code, e.g. lte or year_between
        code: Option<String>,

        /// Widget input values
        values: Vec<String>,

        /// List the known operator codes
        #[arg(short, long)]
        list: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings.logging.level);

    let result = match cli.command {
        Commands::Label { path } => cmd_label(&settings, cli.idl, &path),
        Commands::Describe { path } => cmd_describe(&settings, cli.idl, &path),
        Commands::From { path } => cmd_from(&settings, cli.idl, &path),
        Commands::Build {
            name,
            display,
            filter,
            remove,
        } => cmd_build(&settings, cli.idl, name, &display, &filter, &remove),
        Commands::Filter { code, values, list } => cmd_filter(code, &values, list),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_idl(settings: &Settings, idl: Option<PathBuf>) -> Result<Idl, String> {
    let path = match idl {
        Some(path) => path,
        None => settings
            .idl_path()
            .map_err(|e| e.to_string())?
            .ok_or("no IDL given: pass --idl or set [idl] path in the config file")?,
    };

    let idl = Idl::from_file(&path).map_err(|e| e.to_string())?;
    info!(path = %path.display(), classes = idl.len(), "loaded IDL");
    Ok(idl)
}

fn parse_path(path: &str) -> Result<ColumnPath, String> {
    ColumnPath::parse(path).map_err(|e| e.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

fn cmd_label(settings: &Settings, idl: Option<PathBuf>, path: &str) -> Result<(), String> {
    let idl = load_idl(settings, idl)?;
    let label = parse_path(path)?
        .make_label(&idl)
        .map_err(|e| e.to_string())?;
    println!("{}", label);
    Ok(())
}

fn cmd_describe(settings: &Settings, idl: Option<PathBuf>, path: &str) -> Result<(), String> {
    let idl = load_idl(settings, idl)?;
    let info = parse_path(path)?
        .describe(&idl)
        .map_err(|e| e.to_string())?;
    print_json(&info)
}

fn cmd_from(settings: &Settings, idl: Option<PathBuf>, path: &str) -> Result<(), String> {
    let idl = load_idl(settings, idl)?;
    let fragment = build_from_fragment(&idl, &parse_path(path)?).map_err(|e| e.to_string())?;
    print_json(&fragment)
}

fn cmd_build(
    settings: &Settings,
    idl: Option<PathBuf>,
    name: Option<String>,
    display: &[String],
    filters: &[String],
    remove: &[String],
) -> Result<(), String> {
    let idl = load_idl(settings, idl)?;
    let name = name.unwrap_or_else(|| settings.report.name.clone());
    let mut builder = ReportBuilder::new(&idl).with_name(name);

    for item in display {
        let (path, label) = match item.split_once('=') {
            Some((path, label)) => (path, Some(label.to_string())),
            None => (item.as_str(), None),
        };
        let path = parse_path(path)?;
        let added = builder
            .add_display_item(&path, label, None)
            .map_err(|e| format!("{}: {}", path, e))?;
        if added.is_none() {
            eprintln!("Skipping duplicate display column {}", path);
        }
    }

    for item in filters {
        let path = parse_path(item)?;
        builder
            .add_filter_item(&path, None)
            .map_err(|e| format!("{}: {}", path, e))?;
    }

    if !remove.is_empty() {
        let paths = remove
            .iter()
            .map(|p| parse_path(p))
            .collect::<Result<Vec<_>, _>>()?;
        let removal = builder.remove_selected_display_items(&paths);
        info!(
            removed = removal.removed.len(),
            pruned = removal.pruned.len(),
            reset = removal.reset,
            "removed display columns"
        );
    }

    #[derive(Serialize)]
    struct BuildOutput<'a> {
        report: idlreport::query::ReportDefinition,
        display: &'a idlreport::builder::SelectorList,
        filters: &'a idlreport::builder::SelectorList,
    }

    print_json(&BuildOutput {
        report: builder.report(),
        display: builder.display_items(),
        filters: builder.filter_items(),
    })
}

fn cmd_filter(code: Option<String>, values: &[String], list: bool) -> Result<(), String> {
    if list {
        for code in filter::filter_codes() {
            println!("{}", code);
        }
        return Ok(());
    }

    let code = code.ok_or("missing operator code (use --list to see them)")?;
    let resolved = resolve_filter(&code, values).map_err(|e| e.to_string())?;
    print_json(&resolved)
}
