use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use jobs::JobStatus;
use types::SolveResult;

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Job status", body = JobStatus),
            (status = 404, description = "Unknown job")
        )
    )]
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobStatus>, ApiError> {
    state
        .jobs
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("job {id} not found")))
}

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}/result",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Solve result, or the job status while it is not solved", body = SolveResult),
            (status = 404, description = "Unknown job")
        )
    )]
pub async fn result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match state.jobs.get(&id) {
        Some(JobStatus::Solved { result }) => Ok(Json::<SolveResult>(result).into_response()),
        Some(JobStatus::Queued | JobStatus::Running) => {
            Ok(Json(serde_json::json!({ "status": "not_ready" })).into_response())
        }
        Some(other) => Ok(Json(other).into_response()),
        None => Err(ApiError::NotFound(format!("job {id} not found"))),
    }
}
