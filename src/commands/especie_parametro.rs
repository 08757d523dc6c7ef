//! # EspecieParametro Command Handler
//!
//! Create, list, inspect, patch and soft-delete species parameter bounds. Payloads are
//! checked against the request schemas locally before anything is sent.

use crate::{
    EspecieParametro, cli_utils,
    commands::shared::{
        CommandContext, dispatch_command, exit_with_handled, load_collection_or_exit,
        parse_id_or_exit, parse_json_or_exit, print_list_or_exit, validate_args_count_or_exit,
    },
    http_utils,
    loader::Collection,
    schemas,
};

const ESPECIE_PARAMETRO_USAGE: &str =
    "Usage: acuictl especie-parametro <list|get|create|update|deactivate> [args...]";

/// Handles all species-parameter commands.
pub async fn handle_especie_parametro_command(args: &[String], ctx: &CommandContext) {
    dispatch_command!("especie-parametro", ESPECIE_PARAMETRO_USAGE, args, ctx, {
        "list" => handle_list,
        "get" => handle_get,
        "create" => handle_create,
        "update" => handle_update,
        "deactivate" => handle_deactivate,
    });
}

async fn handle_list(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(args, 1, 1, "list", "Usage: acuictl especie-parametro list");
    let records: Vec<EspecieParametro> =
        load_collection_or_exit(ctx, Collection::especie_parametros()).await;
    print_list_or_exit(&records, ctx.output_format, "especie parametros");
}

async fn handle_get(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(args, 2, 2, "get", "Usage: acuictl especie-parametro get <id>");
    let id = parse_id_or_exit(&args[1], "id_especie_parametro");
    let path = format!("especie-parametros/{}", id);

    let record: EspecieParametro = http_utils::execute_or_exit(
        || ctx.client.get(&path),
        "Failed to get especie parametro",
    )
    .await;

    cli_utils::print_formatted_or_exit(&record, ctx.output_format, "especie parametro");
}

async fn handle_create(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(
        args,
        2,
        2,
        "create",
        "Usage: acuictl especie-parametro create <create-json>",
    );
    let payload = parse_json_or_exit(&args[1]);
    let create = schemas::validate_create(&payload).unwrap_or_else(|e| exit_with_handled(&e));

    let record: EspecieParametro = http_utils::execute_or_exit(
        || ctx.client.post("especie-parametros", &create),
        "Failed to create especie parametro",
    )
    .await;

    println!(
        "Created especie parametro: {}",
        record.id_especie_parametro
    );
}

async fn handle_update(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(
        args,
        3,
        3,
        "update",
        "Usage: acuictl especie-parametro update <id> <patch-json>",
    );
    let id = parse_id_or_exit(&args[1], "id_especie_parametro");
    let payload = parse_json_or_exit(&args[2]);
    let patch = schemas::validate_update(&payload).unwrap_or_else(|e| exit_with_handled(&e));
    let path = format!("especie-parametros/{}", id);

    let record: EspecieParametro = http_utils::execute_or_exit(
        || ctx.client.patch(&path, &patch),
        "Failed to update especie parametro",
    )
    .await;

    cli_utils::print_formatted_or_exit(&record, ctx.output_format, "especie parametro");
}

async fn handle_deactivate(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(
        args,
        2,
        2,
        "deactivate",
        "Usage: acuictl especie-parametro deactivate <id>",
    );
    let id = parse_id_or_exit(&args[1], "id_especie_parametro");
    let path = format!("especie-parametros/{}", id);

    let record: EspecieParametro = http_utils::execute_or_exit(
        || ctx.client.delete(&path),
        "Failed to deactivate especie parametro",
    )
    .await;

    println!(
        "Deactivated especie parametro: {}",
        record.id_especie_parametro
    );
}
