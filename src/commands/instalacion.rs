//! # Instalacion Command Handler

use crate::{
    Instalacion,
    commands::shared::{
        CommandContext, dispatch_command, load_collection_or_exit, parse_json_or_exit,
        print_list_or_exit, validate_args_count_or_exit,
    },
    http_utils,
    loader::Collection,
};

const INSTALACION_USAGE: &str = "Usage: acuictl instalacion <list|create> [args...]";

/// Handles all facility commands.
pub async fn handle_instalacion_command(args: &[String], ctx: &CommandContext) {
    dispatch_command!("instalacion", INSTALACION_USAGE, args, ctx, {
        "list" => handle_instalacion_list,
        "create" => handle_instalacion_create,
    });
}

async fn handle_instalacion_list(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(args, 1, 1, "list", "Usage: acuictl instalacion list");
    let instalaciones: Vec<Instalacion> =
        load_collection_or_exit(ctx, Collection::instalaciones()).await;
    print_list_or_exit(&instalaciones, ctx.output_format, "instalaciones");
}

async fn handle_instalacion_create(args: &[String], ctx: &CommandContext) {
    validate_args_count_or_exit(
        args,
        2,
        2,
        "create",
        "Usage: acuictl instalacion create <record-json>",
    );
    let record = parse_json_or_exit(&args[1]);
    if !record.is_object() {
        crate::cli_utils::exit_with_error("An instalacion must be a JSON object");
    }

    let created: Instalacion = http_utils::execute_or_exit(
        || ctx.client.post("instalaciones", &record),
        "Failed to create instalacion",
    )
    .await;

    match created.id() {
        Some(id) => println!("Created instalacion: {}", id),
        None => println!("Created instalacion"),
    }
}
