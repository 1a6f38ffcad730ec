use sched_core::{SchedError, Solution, TimetableData};
use tracing::debug;

/// First-fit construction: each assistant, in index order, takes the first
/// allowed, unoccupied cell where they are available, scanning day by day.
pub fn greedy(data: &TimetableData) -> Result<Solution, SchedError> {
    let mut sol = Solution::empty(data);
    for assistant in 0..data.num_assistants() {
        let Some((slot, day)) = first_open_cell(data, &sol, assistant) else {
            return Err(SchedError::InfeasibleAssignment { assistant });
        };
        sol.assign(slot, day, assistant);
        debug_assert!(sol.assistants_assigned_day(day, assistant));
        debug!(assistant, slot, day, "greedy placement");
    }
    Ok(sol)
}

fn first_open_cell(
    data: &TimetableData,
    sol: &Solution,
    assistant: usize,
) -> Option<(usize, usize)> {
    for day in 0..data.num_days() {
        for slot in 0..data.num_slots() {
            if data.is_forbidden(slot, day) || sol.is_assigned(slot, day) {
                continue;
            }
            if data.assistant_available(slot, day, assistant) {
                return Some((slot, day));
            }
        }
    }
    None
}

/// The human-made schedule shipped with the instance, as a `Solution`.
pub fn baseline(data: &TimetableData) -> Result<Solution, SchedError> {
    if !data.has_baseline() {
        return Err(SchedError::MissingBaseline);
    }
    let mut sol = Solution::empty(data);
    for slot in 0..data.num_slots() {
        for day in 0..data.num_days() {
            for assistant in 0..data.num_assistants() {
                if data.baseline(slot, day, assistant) == Some(true) {
                    sol.assign(slot, day, assistant);
                }
            }
        }
    }
    Ok(sol)
}
