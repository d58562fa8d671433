use clap::{Parser, Subcommand};
use placard::{
    read_records, validate_batch, BarcodeCache, DocumentRenderer, ProfileStore, RendererConfig,
    StyleConfig,
};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Lay out product price labels and render them to PDF
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory holding assets/, outputs/, previews/, barcodes/ and perfis/
    #[arg(short, long, env = "PLACARD_BASE", default_value = ".")]
    base: PathBuf,

    /// JSON file overriding individual directories
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct StyleArgs {
    /// Style map as a JSON file
    #[arg(long, conflicts_with = "profile")]
    style: Option<PathBuf>,

    /// Name of a saved profile to take the style from
    #[arg(long)]
    profile: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every record in a table and list the problems
    Validate { file: PathBuf },
    /// Render the valid records of a table into a PDF
    Render {
        file: PathBuf,
        #[command(flatten)]
        style: StyleArgs,
        /// Only render these zero-based record indices
        #[arg(long, value_delimiter = ',')]
        select: Option<Vec<usize>>,
    },
    /// Validate one record and save a preview image of it
    Preview {
        file: PathBuf,
        #[arg(long)]
        index: usize,
        #[command(flatten)]
        style: StyleArgs,
    },
    /// Generate (or find) the cached barcode image for a 13-digit code
    Barcode { code: String },
    /// List available backgrounds and fonts
    Assets,
    /// Manage saved style profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Save a style map under a name
    Save { name: String, style: PathBuf },
    Load { name: String },
    List,
    Delete { name: String },
}

fn read_json_object(path: &Path) -> Result<Map<String, Value>, BoxError> {
    let value: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(format!("{} does not hold a JSON object", path.display()).into()),
    }
}

fn load_style(args: &StyleArgs, profiles: &ProfileStore) -> Result<StyleConfig, BoxError> {
    if let Some(path) = &args.style {
        return Ok(StyleConfig::from_map(&read_json_object(path)?));
    }
    if let Some(name) = &args.profile {
        return Ok(profiles.load(name)?.style());
    }
    Ok(StyleConfig::default())
}

fn print_json(value: &impl serde::Serialize) -> Result<(), BoxError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RendererConfig::from_json_file(path)?,
        None => RendererConfig::from_base(&args.base),
    };
    config.ensure_dirs()?;

    let profiles = ProfileStore::new(&config.profiles_dir);
    let renderer = DocumentRenderer::new(config);

    match args.command {
        Command::Validate { file } => {
            let records = read_records(&file)?;
            let rows = validate_batch(&records);
            print_json(&json!({
                "total": records.len(),
                "invalid": rows.len(),
                "rows": rows,
            }))?;
        }
        Command::Render {
            file,
            style,
            select,
        } => {
            let style = load_style(&style, &profiles)?;
            let records = read_records(&file)?;
            let (document, report) = renderer.process(&records, &style, select.as_deref())?;
            print_json(&json!({ "document": document, "report": report }))?;
        }
        Command::Preview { file, index, style } => {
            let style = load_style(&style, &profiles)?;
            let records = read_records(&file)?;
            print_json(&renderer.confirm(&records, index, &style)?)?;
        }
        Command::Barcode { code } => {
            let cache: &BarcodeCache = renderer.barcodes();
            match cache.ensure(&code)? {
                Some(path) => println!("{}", path.display()),
                None => return Err(format!("{code:?} is not a 13-digit code").into()),
            }
        }
        Command::Assets => {
            let assets = renderer.assets();
            print_json(&json!({
                "backgrounds": assets.list_backgrounds(),
                "fonts": assets.list_fonts(),
            }))?;
        }
        Command::Profile(command) => match command {
            ProfileCommand::Save { name, style } => {
                print_json(&profiles.save(&name, read_json_object(&style)?)?)?;
            }
            ProfileCommand::Load { name } => print_json(&profiles.load(&name)?)?,
            ProfileCommand::List => print_json(&profiles.list()?)?,
            ProfileCommand::Delete { name } => {
                profiles.delete(&name)?;
                println!("deleted {name}");
            }
        },
    }

    Ok(())
}
