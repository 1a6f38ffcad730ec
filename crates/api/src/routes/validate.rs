use axum::Json;
use sched_core::validation_errors;
use serde::Serialize;
use types::TimetableInstance;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/v1/validate",
    request_body = TimetableInstance,
    responses(
    (status = 200, description = "Validation result", body = ValidationReport)
    )
)]
pub async fn validate_handler(Json(inst): Json<TimetableInstance>) -> Json<ValidationReport> {
    let errors = validation_errors(&inst);
    Json(ValidationReport {
        ok: errors.is_empty(),
        errors,
    })
}
