use crate::{validate, SchedError};
use types::TimetableInstance;

/// What a student is doing in a given slot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Occupancy {
    Free,
    /// Required coursework unrelated to the assistantship.
    Mandatory,
    /// An activity of the assistantship's own subject.
    SubjectRelated,
}

impl Occupancy {
    pub fn from_cell(v: u8) -> Option<Self> {
        match v {
            0 => Some(Occupancy::Free),
            1 => Some(Occupancy::Mandatory),
            2 => Some(Occupancy::SubjectRelated),
            _ => None,
        }
    }
}

/// Read-only problem instance backed by dense buffers.
///
/// Every tensor is laid out slot-major: cell `(slot, day)` starts at
/// `(slot * days + day) * width`. Assistant cells are stored with the
/// polarity `true = busy`.
#[derive(Clone, Debug)]
pub struct TimetableData {
    slots: usize,
    days: usize,
    students: usize,
    assistants: usize,
    student_cells: Vec<Occupancy>,
    busy: Vec<bool>,
    forbidden: Vec<bool>,
    baseline: Option<Vec<bool>>,
}

impl TimetableData {
    pub fn from_instance(inst: &TimetableInstance) -> Result<Self, SchedError> {
        validate(inst)?;

        let slots = inst.forbidden.len();
        let days = inst.forbidden[0].len();
        let students = inst.students[0][0].len();
        let assistants = inst.assistants[0][0].len();

        let mut student_cells = Vec::with_capacity(slots * days * students);
        for v in inst.students.iter().flatten().flatten() {
            let occ = Occupancy::from_cell(*v)
                .ok_or_else(|| SchedError::DataShape(format!("invalid student cell {v}")))?;
            student_cells.push(occ);
        }
        let busy = inst
            .assistants
            .iter()
            .flatten()
            .flatten()
            .map(|v| *v == 1)
            .collect();
        let forbidden = inst.forbidden.iter().flatten().map(|v| *v == 1).collect();
        let baseline = inst
            .baseline
            .as_ref()
            .map(|b| b.iter().flatten().flatten().map(|v| *v == 1).collect());

        Ok(Self {
            slots,
            days,
            students,
            assistants,
            student_cells,
            busy,
            forbidden,
            baseline,
        })
    }

    pub fn num_slots(&self) -> usize {
        self.slots
    }

    pub fn num_days(&self) -> usize {
        self.days
    }

    pub fn num_students(&self) -> usize {
        self.students
    }

    pub fn num_assistants(&self) -> usize {
        self.assistants
    }

    #[inline]
    fn cell(&self, slot: usize, day: usize) -> usize {
        assert!(
            slot < self.slots && day < self.days,
            "cell ({slot},{day}) out of bounds for {}x{} timetable",
            self.slots,
            self.days
        );
        slot * self.days + day
    }

    #[inline]
    pub fn student(&self, slot: usize, day: usize, student: usize) -> Occupancy {
        assert!(student < self.students, "student {student} out of bounds");
        self.student_cells[self.cell(slot, day) * self.students + student]
    }

    pub fn mandatory_conflict(&self, slot: usize, day: usize, student: usize) -> bool {
        self.student(slot, day, student) == Occupancy::Mandatory
    }

    pub fn subject_adjacent(&self, slot: usize, day: usize, student: usize) -> bool {
        self.student(slot, day, student) == Occupancy::SubjectRelated
    }

    #[inline]
    pub fn assistant_busy(&self, slot: usize, day: usize, assistant: usize) -> bool {
        assert!(assistant < self.assistants, "assistant {assistant} out of bounds");
        self.busy[self.cell(slot, day) * self.assistants + assistant]
    }

    pub fn assistant_available(&self, slot: usize, day: usize, assistant: usize) -> bool {
        !self.assistant_busy(slot, day, assistant)
    }

    #[inline]
    pub fn is_forbidden(&self, slot: usize, day: usize) -> bool {
        self.forbidden[self.cell(slot, day)]
    }

    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// `None` when the instance carries no baseline schedule.
    pub fn baseline(&self, slot: usize, day: usize, assistant: usize) -> Option<bool> {
        assert!(assistant < self.assistants, "assistant {assistant} out of bounds");
        let idx = self.cell(slot, day) * self.assistants + assistant;
        self.baseline.as_ref().map(|b| b[idx])
    }
}

impl TryFrom<&TimetableInstance> for TimetableData {
    type Error = SchedError;

    fn try_from(inst: &TimetableInstance) -> Result<Self, Self::Error> {
        Self::from_instance(inst)
    }
}
