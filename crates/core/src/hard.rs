use crate::{Solution, TimetableData};
use thiserror::Error;

/// First hard rule a schedule breaks.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HardViolation {
    #[error("solution is {found:?} (slots, days, assistants), instance is {expected:?}")]
    ShapeMismatch {
        found: (usize, usize, usize),
        expected: (usize, usize, usize),
    },
    #[error("more than one assistant assigned to day {day}, slot {slot}")]
    DoubleBooked { slot: usize, day: usize, count: usize },
    #[error("assistant assigned to forbidden slot at day {day}, slot {slot}")]
    Forbidden { slot: usize, day: usize },
    #[error("assistant {assistant} assigned to a busy slot on day {day}, slot {slot}")]
    Unavailable {
        slot: usize,
        day: usize,
        assistant: usize,
    },
}

/// Scans day by day, slot by slot, and stops at the first violation.
pub fn check_hard(sol: &Solution, data: &TimetableData) -> Result<(), HardViolation> {
    let expected = (data.num_slots(), data.num_days(), data.num_assistants());
    if sol.dims() != expected {
        return Err(HardViolation::ShapeMismatch {
            found: sol.dims(),
            expected,
        });
    }
    for day in 0..data.num_days() {
        for slot in 0..data.num_slots() {
            let present = sol.assistants_in_slot(slot, day);
            if present.is_empty() {
                continue;
            }
            if present.len() > 1 {
                return Err(HardViolation::DoubleBooked {
                    slot,
                    day,
                    count: present.len(),
                });
            }
            if data.is_forbidden(slot, day) {
                return Err(HardViolation::Forbidden { slot, day });
            }
            let assistant = present[0];
            if data.assistant_busy(slot, day, assistant) {
                return Err(HardViolation::Unavailable {
                    slot,
                    day,
                    assistant,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::TimetableInstance;

    fn data() -> TimetableData {
        // 3 slots x 2 days, assistant 1 busy at (2,1), (1,0) forbidden
        let mut assistants = vec![vec![vec![0, 0]; 2]; 3];
        assistants[2][1][1] = 1;
        let mut forbidden = vec![vec![0; 2]; 3];
        forbidden[1][0] = 1;
        TimetableData::from_instance(&TimetableInstance {
            students: vec![vec![vec![0]; 2]; 3],
            assistants,
            forbidden,
            baseline: None,
        })
        .expect("valid instance")
    }

    #[test]
    fn clean_schedule_passes() {
        let d = data();
        let mut sol = Solution::empty(&d);
        sol.assign(0, 0, 0);
        sol.assign(2, 1, 0);
        assert_eq!(check_hard(&sol, &d), Ok(()));
    }

    #[test]
    fn double_booking_is_rejected() {
        let d = data();
        let mut sol = Solution::empty(&d);
        sol.assign(0, 1, 0);
        sol.assign(0, 1, 1);
        assert_eq!(
            check_hard(&sol, &d),
            Err(HardViolation::DoubleBooked {
                slot: 0,
                day: 1,
                count: 2
            })
        );
    }

    #[test]
    fn forbidden_cell_is_rejected() {
        let d = data();
        let mut sol = Solution::empty(&d);
        sol.assign(1, 0, 1);
        let err = check_hard(&sol, &d).unwrap_err();
        assert_eq!(err, HardViolation::Forbidden { slot: 1, day: 0 });
        assert_eq!(
            err.to_string(),
            "assistant assigned to forbidden slot at day 0, slot 1"
        );
    }

    #[test]
    fn busy_assistant_is_rejected() {
        let d = data();
        let mut sol = Solution::empty(&d);
        sol.assign(2, 1, 1);
        assert_eq!(
            check_hard(&sol, &d),
            Err(HardViolation::Unavailable {
                slot: 2,
                day: 1,
                assistant: 1
            })
        );
    }

    #[test]
    fn first_violation_in_day_order_wins() {
        let d = data();
        let mut sol = Solution::empty(&d);
        sol.assign(2, 1, 1);
        sol.assign(1, 0, 0);
        assert!(matches!(
            check_hard(&sol, &d),
            Err(HardViolation::Forbidden { slot: 1, day: 0 })
        ));
    }

    #[test]
    fn validation_is_idempotent() {
        let d = data();
        let mut sol = Solution::empty(&d);
        sol.assign(0, 0, 0);
        sol.assign(0, 0, 1);
        let first = check_hard(&sol, &d);
        let second = check_hard(&sol, &d);
        assert_eq!(first, second);
        assert!(first.is_err());
    }

    #[test]
    fn mismatched_shape_is_rejected() {
        let d = data();
        let sol = Solution::with_dims(3, 2, 5);
        assert!(matches!(
            check_hard(&sol, &d),
            Err(HardViolation::ShapeMismatch { .. })
        ));
    }
}
