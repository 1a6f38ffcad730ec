use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Tensor indexed `[slot][day][entity]`.
pub type Tensor3 = Vec<Vec<Vec<u8>>>;
/// Mask indexed `[slot][day]`.
pub type Mask2 = Vec<Vec<u8>>;

/// Raw problem instance as handed over by the data-ingestion side.
///
/// Student cells: `0` free, `1` mandatory class, `2` subject-related activity.
/// Assistant cells: `0` available, `1` busy. Forbidden cells: `1` disallowed.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct TimetableInstance {
    #[schema(value_type = Vec<Vec<Vec<u8>>>)]
    pub students: Tensor3,
    #[schema(value_type = Vec<Vec<Vec<u8>>>)]
    pub assistants: Tensor3,
    #[schema(value_type = Vec<Vec<u8>>)]
    pub forbidden: Mask2,
    /// Human-made schedule, same shape as `assistants`; `1` marks a placement.
    #[serde(default)]
    #[schema(value_type = Option<Vec<Vec<Vec<u8>>>>)]
    pub baseline: Option<Tensor3>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SoftWeights {
    pub free_day: f64,
    pub slot_eve: f64,
    pub slot_day: f64,
    pub windows: f64,
    pub slot2: f64,
}

impl Default for SoftWeights {
    fn default() -> Self {
        Self {
            free_day: 0.1,
            slot_eve: 1.0,
            slot_day: 0.1,
            windows: 0.5,
            slot2: 0.7,
        }
    }
}

/// Slot indices that carry a flat time-of-day penalty.
///
/// The defaults treat `{0, 7}` as boundary slots, so slot 0 carries only the
/// boundary penalty (0.3). The older single slot penalty charged slot 0 the
/// evening rate (0.4); `eveningSlots: [0, 8, 9]` with `boundarySlots: [7]`
/// reproduces it.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SlotPolicy {
    pub evening_slots: Vec<usize>,
    pub boundary_slots: Vec<usize>,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            evening_slots: vec![8, 9],
            boundary_slots: vec![0, 7],
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum FitnessKind {
    #[default]
    Full,
    ConstraintOnly,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Default, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StartKind {
    #[default]
    Greedy,
    Baseline,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnealParams {
    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub alpha: f64,
    pub max_iterations: u64,
}

impl Default for AnnealParams {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            final_temperature: 1.0,
            alpha: 0.9,
            max_iterations: 10_000,
        }
    }
}

fn default_runs() -> Vec<AnnealParams> {
    vec![
        AnnealParams::default(),
        AnnealParams {
            initial_temperature: 10.0,
            final_temperature: 1.0,
            alpha: 0.85,
            max_iterations: 10_000,
        },
    ]
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SolveParams {
    pub runs: Vec<AnnealParams>,
    pub seed: u64,
    pub fitness: FitnessKind,
    pub weights: SoftWeights,
    pub slot_policy: SlotPolicy,
    pub start: StartKind,
}

impl Default for SolveParams {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            seed: 0,
            fitness: FitnessKind::default(),
            weights: SoftWeights::default(),
            slot_policy: SlotPolicy::default(),
            start: StartKind::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
pub struct SolveEnvelope {
    pub instance: TimetableInstance,
    #[serde(default)]
    pub params: SolveParams,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, JsonSchema, Eq, PartialEq, Hash)]
pub struct Assignment {
    pub slot: usize,
    pub day: usize,
    pub assistant: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolveResult {
    pub status: String,
    pub fitness: f64,
    pub covered_students: usize,
    pub total_students: usize,
    pub attendance_pct: f64,
    pub assignments: Vec<Assignment>,
    /// `grid[slot][day]` lists the assistants placed in that cell.
    pub grid: Vec<Vec<Vec<usize>>>,
    #[schema(value_type = Object)]
    pub stats: serde_json::Value,
}
