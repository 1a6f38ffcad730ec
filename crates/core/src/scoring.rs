use crate::{Occupancy, Solution, TimetableData};
use serde::Serialize;
use types::{FitnessKind, SlotPolicy, SoftWeights, SolveParams};

pub const FREE_DAY_PENALTY: f64 = 0.5;
pub const EVENING_PENALTY: f64 = 0.4;
pub const BOUNDARY_PENALTY: f64 = 0.3;
pub const ADJACENT_PENALTY: f64 = 0.5;
/// Gap length that counts as one full window penalty.
pub const WINDOW_NORM: f64 = 6.0;

/// A scalar objective over schedules; higher is better.
pub trait Objective {
    fn score(&self, sol: &Solution, data: &TimetableData) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&Solution, &TimetableData) -> f64,
{
    fn score(&self, sol: &Solution, data: &TimetableData) -> f64 {
        self(sol, data)
    }
}

/// 0.5 when the student has no mandatory class that day.
pub fn penalty_free_day(data: &TimetableData, student: usize, day: usize) -> f64 {
    let busy = (0..data.num_slots()).any(|s| data.mandatory_conflict(s, day, student));
    if busy {
        0.0
    } else {
        FREE_DAY_PENALTY
    }
}

pub fn penalty_slot_eve(policy: &SlotPolicy, slot: usize) -> f64 {
    if policy.evening_slots.contains(&slot) {
        EVENING_PENALTY
    } else {
        0.0
    }
}

pub fn penalty_slot_day(policy: &SlotPolicy, slot: usize) -> f64 {
    if policy.boundary_slots.contains(&slot) {
        BOUNDARY_PENALTY
    } else {
        0.0
    }
}

/// Idle gaps around `slot`: free slots back to the nearest earlier mandatory
/// class plus free slots forward to the nearest later one. A side with no
/// bounding class adds nothing.
pub fn penalty_windows(data: &TimetableData, slot: usize, day: usize, student: usize) -> f64 {
    let mut left = 0usize;
    let mut bounded_left = false;
    for s in 0..slot {
        if data.mandatory_conflict(s, day, student) {
            left = 0;
            bounded_left = true;
        } else {
            left += 1;
        }
    }
    let left = if bounded_left { left } else { 0 };

    let mut run = 0usize;
    let mut right = 0usize;
    for s in slot + 1..data.num_slots() {
        if data.mandatory_conflict(s, day, student) {
            right = run;
            break;
        }
        run += 1;
    }
    (left + right) as f64 / WINDOW_NORM
}

/// 0.5 when a neighbouring slot holds a subject-related activity.
pub fn penalty_slot2(data: &TimetableData, slot: usize, day: usize, student: usize) -> f64 {
    let left = slot > 0 && data.subject_adjacent(slot - 1, day, student);
    let right = slot + 1 < data.num_slots() && data.subject_adjacent(slot + 1, day, student);
    if left || right {
        ADJACENT_PENALTY
    } else {
        0.0
    }
}

/// Weighted soft penalties for one student attending one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalties {
    pub free_day: f64,
    pub slot_eve: f64,
    pub slot_day: f64,
    pub windows: f64,
    pub slot2: f64,
}

impl Penalties {
    pub fn compute(
        data: &TimetableData,
        weights: &SoftWeights,
        policy: &SlotPolicy,
        slot: usize,
        day: usize,
        student: usize,
    ) -> Self {
        Self {
            free_day: weights.free_day * penalty_free_day(data, student, day),
            slot_eve: weights.slot_eve * penalty_slot_eve(policy, slot),
            slot_day: weights.slot_day * penalty_slot_day(policy, slot),
            windows: weights.windows * penalty_windows(data, slot, day, student),
            slot2: weights.slot2 * penalty_slot2(data, slot, day, student),
        }
    }

    pub fn total(&self) -> f64 {
        self.free_day + self.slot_eve + self.slot_day + self.windows + self.slot2
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CellScore {
    pub slot: usize,
    pub day: usize,
    pub score: f64,
    pub penalties: Penalties,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StudentScore {
    pub student: usize,
    /// `None` when no free, assisted cell exists for the student.
    pub best: Option<CellScore>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub fitness: f64,
    pub covered: usize,
    pub students: Vec<StudentScore>,
}

/// Cells where the student is free and some assistant is present, day-major.
fn attendable<'a>(
    sol: &'a Solution,
    data: &'a TimetableData,
    student: usize,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    (0..data.num_days()).flat_map(move |day| {
        (0..data.num_slots()).filter_map(move |slot| {
            let free = data.student(slot, day, student) == Occupancy::Free;
            (free && sol.is_assigned(slot, day)).then_some((slot, day))
        })
    })
}

/// Best cell for one student; earlier cells win ties.
pub fn best_cell(
    sol: &Solution,
    data: &TimetableData,
    weights: &SoftWeights,
    policy: &SlotPolicy,
    student: usize,
) -> Option<CellScore> {
    let mut best: Option<CellScore> = None;
    for (slot, day) in attendable(sol, data, student) {
        let penalties = Penalties::compute(data, weights, policy, slot, day, student);
        let score = 1.0 - penalties.total();
        match best {
            Some(b) if b.score >= score => {}
            _ => {
                best = Some(CellScore {
                    slot,
                    day,
                    score,
                    penalties,
                })
            }
        }
    }
    best
}

/// Sum over students of their best cell score; students who cannot attend add 0.
pub fn fitness(
    sol: &Solution,
    data: &TimetableData,
    weights: &SoftWeights,
    policy: &SlotPolicy,
) -> f64 {
    (0..data.num_students())
        .filter_map(|l| best_cell(sol, data, weights, policy, l))
        .map(|c| c.score)
        .sum()
}

/// Number of students with at least one free, assisted cell.
pub fn coverage(sol: &Solution, data: &TimetableData) -> usize {
    (0..data.num_students())
        .filter(|&l| attendable(sol, data, l).next().is_some())
        .count()
}

/// Per-student best cell with its weighted penalties, plus the totals.
pub fn explain(
    sol: &Solution,
    data: &TimetableData,
    weights: &SoftWeights,
    policy: &SlotPolicy,
) -> Scores {
    let students: Vec<StudentScore> = (0..data.num_students())
        .map(|student| StudentScore {
            student,
            best: best_cell(sol, data, weights, policy, student),
        })
        .collect();
    let fitness: f64 = students.iter().filter_map(|s| s.best).map(|c| c.score).sum();
    let covered = students.iter().filter(|s| s.best.is_some()).count();
    Scores {
        fitness,
        covered,
        students,
    }
}

/// Percentage of students covered, two decimals; 0 without students.
pub fn attendance_pct(covered: usize, students: usize) -> f64 {
    if students == 0 {
        return 0.0;
    }
    ((covered as f64 * 100.0 / students as f64) * 100.0).round() / 100.0
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evaluator {
    pub kind: FitnessKind,
    pub weights: SoftWeights,
    pub policy: SlotPolicy,
}

impl Evaluator {
    pub fn new(kind: FitnessKind, weights: SoftWeights, policy: SlotPolicy) -> Self {
        Self {
            kind,
            weights,
            policy,
        }
    }

    pub fn from_params(params: &SolveParams) -> Self {
        Self::new(
            params.fitness,
            params.weights.clone(),
            params.slot_policy.clone(),
        )
    }
}

impl Objective for Evaluator {
    fn score(&self, sol: &Solution, data: &TimetableData) -> f64 {
        match self.kind {
            FitnessKind::Full => fitness(sol, data, &self.weights, &self.policy),
            FitnessKind::ConstraintOnly => coverage(sol, data) as f64,
        }
    }
}
