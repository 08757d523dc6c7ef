//! # Shared Command Utilities
//!
//! Argument validation, parsing and loading helpers shared by the acuictl command
//! handlers.

use std::sync::Arc;
use std::time::Duration;

use handled::Handle;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cli_utils::{self, OutputFormat};
use crate::commands::errors::{ArgumentError, UserError, format_cli_error};
use crate::http_utils::{ApiClient, HttpFetcher};
use crate::loader::{self, Collection};

/// Everything a command handler needs to talk to the API.
pub struct CommandContext {
    /// JSON client for single-record operations.
    pub client: ApiClient,
    /// Fetcher used by collection loads.
    pub fetcher: Arc<HttpFetcher>,
    /// Output format for get/list commands.
    pub output_format: OutputFormat,
}

impl CommandContext {
    /// Builds a context against `base_url`.
    pub fn new(base_url: &str, timeout: Option<Duration>, output_format: OutputFormat) -> Self {
        Self {
            client: ApiClient::with_timeout(base_url.to_string(), timeout),
            fetcher: Arc::new(HttpFetcher::with_timeout(base_url.to_string(), timeout)),
            output_format,
        }
    }
}

/// Prints a user error with its hint and exits with status 1.
pub fn exit_with_handled<E>(error: &E) -> !
where
    E: Handle<UserError> + std::fmt::Display,
{
    eprintln!("{}", format_cli_error(error));
    std::process::exit(1);
}

/// Parses a record identifier or exits with a hint.
pub fn parse_id_or_exit(id_str: &str, field: &str) -> u64 {
    id_str.parse().unwrap_or_else(|e: std::num::ParseIntError| {
        exit_with_handled(&ArgumentError {
            field: field.to_string(),
            value: id_str.to_string(),
            reason: e.to_string(),
        })
    })
}

/// Parses a JSON document argument or exits with a hint.
pub fn parse_json_or_exit(json_str: &str) -> Value {
    serde_json::from_str(json_str).unwrap_or_else(|e: serde_json::Error| exit_with_handled(&e))
}

/// Validates both minimum and maximum argument counts.
///
/// # Arguments
/// * `args` - The command arguments array
/// * `min_count` - The minimum number of arguments required (including subcommand)
/// * `max_count` - The maximum number of arguments allowed (including subcommand)
/// * `command` - The command name for error message
/// * `usage` - The usage string to display
pub fn validate_args_count_or_exit(
    args: &[String],
    min_count: usize,
    max_count: usize,
    command: &str,
    usage: &str,
) {
    if args.len() < min_count {
        cli_utils::exit_with_usage_error(
            &format!("{} command requires more arguments", command),
            usage,
        );
    }
    if args.len() > max_count {
        cli_utils::exit_with_usage_error(
            &format!("{} command has too many arguments", command),
            usage,
        );
    }
}

/// Loads a whole collection through the resource loader or exits with its message.
pub async fn load_collection_or_exit<T>(ctx: &CommandContext, collection: Collection) -> Vec<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let mut resource = loader::mount::<T, _>(Arc::clone(&ctx.fetcher), collection.clone());
    let state = match resource.settled().await {
        Ok(state) => state,
        Err(e) => cli_utils::exit_with_error(&e.to_string()),
    };
    match (state.error, state.failure) {
        (None, _) => state.items,
        (Some(_), Some(failure)) => {
            eprintln!("{}", failure.user_message(collection.error_message()));
            exit_with_handled(&failure)
        }
        (Some(message), None) => cli_utils::exit_with_error(&message),
    }
}

/// Prints a list in the requested format, or a placeholder when it is empty.
pub fn print_list_or_exit<T: Serialize>(items: &[T], output_format: OutputFormat, context: &str) {
    if items.is_empty() {
        println!("No {} found", context);
    } else {
        cli_utils::print_formatted_or_exit(&items, output_format, context);
    }
}

/// Macro to generate command dispatcher boilerplate.
macro_rules! dispatch_command {
    ($command_name:expr, $usage:expr, $args:expr, $ctx:expr, {
        $($subcommand:expr => $handler:expr),* $(,)?
    }) => {
        if $args.is_empty() {
            crate::cli_utils::exit_with_usage_error(
                &format!("{} command requires a subcommand", $command_name),
                $usage,
            );
        }

        match $args[0].as_str() {
            $(
                $subcommand => $handler($args, $ctx).await,
            )*
            _ => {
                let available_subcommands = [$($subcommand),*];
                crate::cli_utils::exit_with_error(&format!(
                    "Unknown {} subcommand '{}'. Available subcommands: {}",
                    $command_name,
                    $args[0],
                    available_subcommands.join(", ")
                ));
            }
        }
    };
}

pub(crate) use dispatch_command;
