use std::path::Path;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use acuicola::{
    Config,
    cli_utils::{self, OutputFormat},
    commands::{CommandContext, handle_especie_parametro_command, handle_instalacion_command},
    logging,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the Acuicola API server")]
    base_url: String,
    #[arrrg(
        optional,
        "Output format for get/list commands: json or yaml (default: json)"
    )]
    output: String,
    #[arrrg(optional, "Path to a JSON or YAML configuration file")]
    config: String,
    #[arrrg(flag, "Log requests to stderr")]
    verbose: bool,
}

const USAGE: &str = r#"Usage: acuictl [options] <command> [args...]

Options:
  --base-url <url>     Base URL of the Acuicola API server (default: http://localhost:8080)
  --output <format>    Output format for get/list commands: json or yaml (default: json)
  --config <file>      JSON or YAML configuration file
  --verbose            Log requests to stderr

Commands:
  instalacion list                                   List all facilities
  instalacion create <json-object>                   Create a facility
  especie-parametro list                             List all species parameters
  especie-parametro get <id>                         Get a species parameter by ID
  especie-parametro create <create-json>             Create a species parameter
  especie-parametro update <id> <patch-json>         Patch a species parameter
  especie-parametro deactivate <id>                  Deactivate a species parameter"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) = Options::from_command_line_relaxed("USAGE: acuictl <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error("No command specified", USAGE);
    }

    let config = if options.config.is_empty() {
        Config::default()
    } else {
        Config::from_file(Path::new(&options.config))
            .unwrap_or_else(|e| cli_utils::exit_with_error(&e.to_string()))
    };

    if options.verbose {
        logging::init("debug", true)?;
    } else {
        logging::init("warn", false)?;
    }

    let base_url = if options.base_url.is_empty() {
        config.base_url.clone()
    } else {
        options.base_url
    };

    let output_format: OutputFormat = options
        .output
        .parse()
        .unwrap_or_else(|e: String| cli_utils::exit_with_usage_error(&e, USAGE));

    let ctx = CommandContext::new(&base_url, config.request_timeout(), output_format);

    match free[0].as_str() {
        "instalacion" => {
            handle_instalacion_command(&free[1..], &ctx).await;
        }
        "especie-parametro" => {
            handle_especie_parametro_command(&free[1..], &ctx).await;
        }
        _ => {
            cli_utils::exit_with_error(&format!(
                "Unknown command '{}'. Available commands: instalacion, especie-parametro",
                free[0]
            ));
        }
    }

    Ok(())
}
