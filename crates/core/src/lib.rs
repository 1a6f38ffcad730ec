pub mod data;
pub mod hard;
pub mod scoring;
pub mod solution;

use thiserror::Error;

pub use data::{Occupancy, TimetableData};
pub use hard::{check_hard, HardViolation};
pub use scoring::{Evaluator, Objective};
pub use solution::Solution;
pub use types::{
    AnnealParams, Assignment, FitnessKind, SlotPolicy, SoftWeights, SolveEnvelope, SolveParams,
    SolveResult, StartKind, TimetableInstance,
};

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("invalid instance: {0}")]
    DataShape(String),
    #[error("assistant {assistant} has no available, allowed and unoccupied slot")]
    InfeasibleAssignment { assistant: usize },
    #[error("instance carries no baseline schedule")]
    MissingBaseline,
    #[error("start schedule violates hard constraints: {0}")]
    InfeasibleStart(#[from] HardViolation),
    #[error("invalid annealing parameters: {0}")]
    InvalidParams(String),
}

impl SchedError {
    /// True when no usable schedule exists, as opposed to malformed input.
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self,
            SchedError::InfeasibleAssignment { .. } | SchedError::InfeasibleStart(_)
        )
    }
}

/// Checks tensor extents and cell values, reporting every problem found.
pub fn validate(inst: &TimetableInstance) -> Result<(), SchedError> {
    let errors = validation_errors(inst);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchedError::DataShape(errors.join("; ")))
    }
}

/// Every shape or value problem in `inst`; empty when the instance is usable.
pub fn validation_errors(inst: &TimetableInstance) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    let slots = inst.forbidden.len();
    let days = inst.forbidden.first().map(|r| r.len()).unwrap_or(0);
    if slots == 0 {
        errors.push("forbidden has no slots".into());
    } else if days == 0 {
        errors.push("forbidden has no days".into());
    }
    for (s, row) in inst.forbidden.iter().enumerate() {
        if row.len() != days {
            errors.push(format!(
                "forbidden slot {s} has {} days, expected {days}",
                row.len()
            ));
        }
        if let Some((d, v)) = row.iter().enumerate().find(|(_, v)| **v > 1) {
            errors.push(format!("forbidden cell ({s},{d}) has invalid value {v}"));
        }
    }

    fn chk_tensor(
        name: &str,
        t: &[Vec<Vec<u8>>],
        slots: usize,
        days: usize,
        max: u8,
        errors: &mut Vec<String>,
    ) -> Option<usize> {
        if t.len() != slots {
            errors.push(format!("{name} has {} slots, expected {slots}", t.len()));
            return None;
        }
        let width = t.first().and_then(|r| r.first()).map(|c| c.len()).unwrap_or(0);
        let mut bad_value = false;
        let mut ok = true;
        for (s, row) in t.iter().enumerate() {
            if row.len() != days {
                errors.push(format!(
                    "{name} slot {s} has {} days, expected {days}",
                    row.len()
                ));
                ok = false;
                continue;
            }
            for (d, cell) in row.iter().enumerate() {
                if cell.len() != width {
                    errors.push(format!(
                        "{name} cell ({s},{d}) has {} entries, expected {width}",
                        cell.len()
                    ));
                    ok = false;
                    continue;
                }
                if bad_value {
                    continue;
                }
                if let Some((e, v)) = cell.iter().enumerate().find(|(_, v)| **v > max) {
                    errors.push(format!("{name} cell ({s},{d},{e}) has invalid value {v}"));
                    bad_value = true;
                    ok = false;
                }
            }
        }
        ok.then_some(width)
    }

    chk_tensor("students", &inst.students, slots, days, 2, &mut errors);
    let assistants = chk_tensor("assistants", &inst.assistants, slots, days, 1, &mut errors);
    if let Some(base) = &inst.baseline {
        let width = chk_tensor("baseline", base, slots, days, 1, &mut errors);
        if let (Some(w), Some(a)) = (width, assistants) {
            if w != a && slots > 0 && days > 0 {
                errors.push(format!("baseline has {w} assistants, expected {a}"));
            }
        }
    }

    errors
}

pub trait Solver: Send + Sync + 'static {
    fn solve(&self, env: SolveEnvelope) -> Result<SolveResult, SchedError>;
}
