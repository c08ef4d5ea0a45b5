//! Print the OpenAPI document as JSON or YAML.

use clap::{Parser, ValueEnum};
use color_eyre::eyre::Result;
use harvestworld::doc::ApiDoc;
use utoipa::OpenApi;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Parser)]
#[command(about = "Print the OpenAPI document")]
struct Args {
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: Format,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let doc = ApiDoc::openapi();
    match args.format {
        Format::Json => println!("{}", doc.to_json()?),
        Format::Yaml => println!("{}", doc.to_yaml()?),
    }
    Ok(())
}
