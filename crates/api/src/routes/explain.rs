use crate::error::ApiError;
use axum::Json;
use sched_core::scoring::{self, attendance_pct};
use sched_core::{check_hard, Solution, TimetableData};
use serde::{Deserialize, Serialize};
use types::{Assignment, SlotPolicy, SoftWeights, TimetableInstance};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExplainIn {
    pub instance: TimetableInstance,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub weights: SoftWeights,
    #[serde(default)]
    pub slot_policy: SlotPolicy,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExplainOut {
    pub fitness: f64,
    pub covered_students: usize,
    pub total_students: usize,
    pub attendance_pct: f64,
    pub feasible: bool,
    /// First hard-constraint violation, if any.
    pub violation: Option<String>,
    /// Best cell and weighted penalties per student.
    #[schema(value_type = Vec<Object>)]
    pub students: Vec<sched_core::scoring::StudentScore>,
}

#[utoipa::path(
    post,
    path = "/v1/explain",
    request_body = ExplainIn,
    responses(
        (status = 200, description = "Score breakdown for the provided schedule", body = ExplainOut),
        (status = 400, description = "Malformed instance or assignment out of range")
    )
)]
pub async fn explain(Json(input): Json<ExplainIn>) -> Result<Json<ExplainOut>, ApiError> {
    let data = TimetableData::from_instance(&input.instance)?;
    let sol = Solution::from_assignments(&data, &input.assignments)?;
    let violation = check_hard(&sol, &data).err().map(|v| v.to_string());
    let scores = scoring::explain(&sol, &data, &input.weights, &input.slot_policy);
    let total = data.num_students();

    Ok(Json(ExplainOut {
        fitness: scores.fitness,
        covered_students: scores.covered,
        total_students: total,
        attendance_pct: attendance_pct(scores.covered, total),
        feasible: violation.is_none(),
        violation,
        students: scores.students,
    }))
}
