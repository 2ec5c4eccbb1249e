//! Control configuration endpoint handlers.

use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::models::{ControlConfig, UpsertControlRequest};
use crate::services::auth::verify_api_key;
use crate::storage::Storage;
use actix_web::{HttpRequest, web};
use paperclip::actix::api_v2_operation;
use tracing::info;

/// Control upsert endpoint
///
/// Creates the control record for an endpoint or replaces its mutable
/// fields; unset groups take documented defaults. The creation timestamp
/// is never refreshed by updates.
#[api_v2_operation(
    summary = "Upsert Control Configuration",
    description = "Creates or replaces the control configuration for one endpoint.",
    tags("Control"),
    responses(
        (status = 200, description = "Upserted control configuration", body = ControlConfig),
        (status = 400, description = "Endpoint is required"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn put_control(
    req: HttpRequest,
    auth: web::Data<AuthConfig>,
    storage: web::Data<Storage>,
    payload: web::Json<UpsertControlRequest>,
) -> Result<web::Json<ControlConfig>, ApiError> {
    verify_api_key(&req, &auth)?;

    let body = payload.into_inner();
    if body.endpoint.trim().is_empty() {
        return Err(ApiError::Validation("Endpoint is required".to_string()));
    }

    let control = storage.upsert_control(
        &body.endpoint,
        &body.limit_values.unwrap_or_default(),
        &body.schedule_values.unwrap_or_default(),
        &body.toggles.unwrap_or_default(),
    )?;

    info!(endpoint = %control.endpoint, "control configuration upserted");

    Ok(web::Json(control))
}

/// Control listing endpoint
#[api_v2_operation(
    summary = "List Control Configurations",
    description = "Returns all control configurations ordered by creation time.",
    tags("Control"),
    responses(
        (status = 200, description = "All control configurations", body = Vec<ControlConfig>),
        (status = 500, description = "Store failure")
    )
)]
pub async fn get_controls(
    storage: web::Data<Storage>,
) -> Result<web::Json<Vec<ControlConfig>>, ApiError> {
    let controls = storage.all_controls()?;
    Ok(web::Json(controls))
}
