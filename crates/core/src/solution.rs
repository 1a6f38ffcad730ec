use crate::{SchedError, TimetableData};
use types::Assignment;

/// Assignment tensor `X[slot][day][assistant]` in a dense buffer.
///
/// The type does not enforce the one-assistant-per-cell rule; search code
/// checks it through [`crate::check_hard`]. `Clone` is a deep copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    slots: usize,
    days: usize,
    assistants: usize,
    x: Vec<bool>,
}

impl Solution {
    pub fn empty(data: &TimetableData) -> Self {
        Self::with_dims(data.num_slots(), data.num_days(), data.num_assistants())
    }

    pub fn with_dims(slots: usize, days: usize, assistants: usize) -> Self {
        Self {
            slots,
            days,
            assistants,
            x: vec![false; slots * days * assistants],
        }
    }

    /// Builds a solution from external triples, rejecting out-of-range ones.
    pub fn from_assignments(
        data: &TimetableData,
        assignments: &[Assignment],
    ) -> Result<Self, SchedError> {
        let mut sol = Self::empty(data);
        let mut errors = Vec::new();
        for a in assignments {
            if a.slot >= sol.slots || a.day >= sol.days || a.assistant >= sol.assistants {
                errors.push(format!(
                    "assignment (slot {}, day {}, assistant {}) is outside the {}x{}x{} timetable",
                    a.slot, a.day, a.assistant, sol.slots, sol.days, sol.assistants
                ));
                continue;
            }
            sol.assign(a.slot, a.day, a.assistant);
        }
        if errors.is_empty() {
            Ok(sol)
        } else {
            Err(SchedError::DataShape(errors.join("; ")))
        }
    }

    pub fn dims(&self) -> (usize, usize, usize) {
        (self.slots, self.days, self.assistants)
    }

    #[inline]
    fn idx(&self, slot: usize, day: usize, assistant: usize) -> usize {
        assert!(
            slot < self.slots && day < self.days && assistant < self.assistants,
            "({slot},{day},{assistant}) out of bounds for {}x{}x{} solution",
            self.slots,
            self.days,
            self.assistants
        );
        (slot * self.days + day) * self.assistants + assistant
    }

    #[inline]
    fn cell(&self, slot: usize, day: usize) -> &[bool] {
        assert!(
            slot < self.slots && day < self.days,
            "cell ({slot},{day}) out of bounds for {}x{} solution",
            self.slots,
            self.days
        );
        let start = (slot * self.days + day) * self.assistants;
        &self.x[start..start + self.assistants]
    }

    pub fn assign(&mut self, slot: usize, day: usize, assistant: usize) {
        let i = self.idx(slot, day, assistant);
        self.x[i] = true;
    }

    pub fn unassign(&mut self, slot: usize, day: usize, assistant: usize) {
        let i = self.idx(slot, day, assistant);
        self.x[i] = false;
    }

    pub fn get(&self, slot: usize, day: usize, assistant: usize) -> bool {
        self.x[self.idx(slot, day, assistant)]
    }

    pub fn is_assigned(&self, slot: usize, day: usize) -> bool {
        self.cell(slot, day).iter().any(|&v| v)
    }

    /// Assistants placed in the cell, ascending.
    pub fn assistants_in_slot(&self, slot: usize, day: usize) -> Vec<usize> {
        self.cell(slot, day)
            .iter()
            .enumerate()
            .filter_map(|(k, &v)| v.then_some(k))
            .collect()
    }

    /// True iff the assistant holds exactly one slot on `day`.
    pub fn assistants_assigned_day(&self, day: usize, assistant: usize) -> bool {
        (0..self.slots)
            .filter(|&s| self.get(s, day, assistant))
            .count()
            == 1
    }

    /// Days on which `slot` is unoccupied.
    pub fn free_slots(&self, slot: usize) -> Vec<usize> {
        (0..self.days)
            .filter(|&d| !self.is_assigned(slot, d))
            .collect()
    }

    /// Slots of `day` that are unoccupied.
    pub fn free_days(&self, day: usize) -> Vec<usize> {
        (0..self.slots)
            .filter(|&s| !self.is_assigned(s, day))
            .collect()
    }

    /// Every occupied `(slot, day, assistant)`, slot-major.
    pub fn placements(&self) -> Vec<Assignment> {
        let mut out = Vec::new();
        for slot in 0..self.slots {
            for day in 0..self.days {
                for assistant in self.assistants_in_slot(slot, day) {
                    out.push(Assignment {
                        slot,
                        day,
                        assistant,
                    });
                }
            }
        }
        out
    }

    pub fn assignment_count(&self) -> usize {
        self.x.iter().filter(|&&v| v).count()
    }

    /// `grid[slot][day]` lists the assistants in that cell.
    pub fn grid(&self) -> Vec<Vec<Vec<usize>>> {
        (0..self.slots)
            .map(|s| {
                (0..self.days)
                    .map(|d| self.assistants_in_slot(s, d))
                    .collect()
            })
            .collect()
    }
}
