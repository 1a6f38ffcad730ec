use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, Json};
use sched_core::{validate, SchedError};
use solver_heur::check_portfolio;
use types::{SolveEnvelope, StartKind};
use utoipa::ToSchema;

#[derive(serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: String,
    pub status: &'static str,
}

fn enqueue(state: &AppState, env: SolveEnvelope) -> Result<Json<JobCreated>, ApiError> {
    validate(&env.instance)?;
    check_portfolio(&env.params.runs)?;
    let id = state.jobs.enqueue(env);
    tracing::info!(job = %id.0, "job enqueued");
    Ok(Json(JobCreated {
        job_id: id.0,
        status: "queued",
    }))
}

#[utoipa::path(
        post,
        path = "/v1/solve",
        request_body = SolveEnvelope,
        responses(
            (status = 200, description = "Job enqueued", body = JobCreated),
            (status = 400, description = "Malformed instance or annealing parameters")
        )
    )]
pub async fn solve(
    State(state): State<AppState>,
    Json(mut env): Json<SolveEnvelope>,
) -> Result<Json<JobCreated>, ApiError> {
    env.params.start = StartKind::Greedy;
    enqueue(&state, env)
}

#[utoipa::path(
    post,
    path = "/v1/reoptimize",
    request_body = SolveEnvelope,
    responses(
        (status = 200, description = "Job enqueued, annealing from the supplied baseline", body = JobCreated),
        (status = 400, description = "Malformed instance or no baseline")
    )
)]
pub async fn reoptimize(
    State(state): State<AppState>,
    Json(mut env): Json<SolveEnvelope>,
) -> Result<Json<JobCreated>, ApiError> {
    if env.instance.baseline.is_none() {
        return Err(SchedError::MissingBaseline.into());
    }
    env.params.start = StartKind::Baseline;
    enqueue(&state, env)
}
