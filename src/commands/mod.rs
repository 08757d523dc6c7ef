//! # Command Handlers
//!
//! Command handlers for the acuictl CLI application. Each resource is handled in a
//! dedicated submodule.
//!
//! ## Structure
//!
//! - `instalacion` - Facility commands (list, create)
//! - `especie_parametro` - Species parameter commands (list, get, create, update, deactivate)
//! - `errors` - User-facing error extraction
//! - `shared` - Shared utilities and validation functions

pub mod errors;
pub mod especie_parametro;
pub mod instalacion;
pub mod shared;

pub use especie_parametro::handle_especie_parametro_command;
pub use instalacion::handle_instalacion_command;
pub use shared::CommandContext;
