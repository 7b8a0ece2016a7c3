//! REST API module.
//!
//! Route handlers delegating to the repository. Error bodies follow the
//! `{ "message": ... }` contract.

mod auth;
mod bookings;
mod courts;
mod members;

pub use auth::*;
pub use bookings::*;
pub use courts::*;
pub use members::*;

use axum::Json;

use crate::errors::AppError;

/// Handler result carrying a JSON body or an error response.
pub type ApiResult<T> = Result<Json<T>, AppError>;
