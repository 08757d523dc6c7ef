use std::path::Path;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use acuicola::{
    Config, SeedData, SeedError, logging, run_seed, seed_catalog, http_utils::ApiClient,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the Acuicola API server")]
    base_url: String,
    #[arrrg(optional, "JSON or YAML seed file (default: built-in catalog)")]
    seed_file: String,
    #[arrrg(optional, "Path to a JSON or YAML configuration file")]
    config: String,
}

async fn seed(options: Options) -> Result<acuicola::SeedReport, SeedError> {
    let config = if options.config.is_empty() {
        Config::default()
    } else {
        Config::from_file(Path::new(&options.config))
            .map_err(|e| SeedError::Io(e.to_string()))?
    };
    let base_url = if options.base_url.is_empty() {
        config.base_url.clone()
    } else {
        options.base_url
    };
    let data = if options.seed_file.is_empty() {
        SeedData::default_catalog()
    } else {
        SeedData::from_file(Path::new(&options.seed_file))?
    };
    let client = ApiClient::with_timeout(base_url, config.request_timeout());
    seed_catalog(&client, &data).await
}

#[tokio::main]
async fn main() {
    let (options, _) = Options::from_command_line("USAGE: acuicola-seed [OPTIONS]");
    if let Err(e) = logging::init("info", false) {
        eprintln!("{}", e);
    }
    std::process::exit(run_seed(seed(options)).await);
}
