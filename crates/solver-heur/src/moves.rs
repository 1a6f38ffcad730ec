use rand::seq::{index, SliceRandom};
use rand::Rng;
use sched_core::{Assignment, Solution};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum MoveKind {
    DayShift,
    SlotShift,
    Swap,
    /// Nothing could move; the candidate equals its parent.
    Stay,
}

impl MoveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveKind::DayShift => "day_shift",
            MoveKind::SlotShift => "slot_shift",
            MoveKind::Swap => "swap",
            MoveKind::Stay => "stay",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Move {
    pub kind: MoveKind,
    pub candidate: Solution,
}

/// Same slot, another day on which that slot is empty.
pub fn day_shift<R: Rng + ?Sized>(sol: &Solution, at: Assignment, rng: &mut R) -> Option<Solution> {
    let &day = sol.free_slots(at.slot).choose(rng)?;
    let mut next = sol.clone();
    next.unassign(at.slot, at.day, at.assistant);
    next.assign(at.slot, day, at.assistant);
    Some(next)
}

/// Same day, another slot that is empty on that day.
pub fn slot_shift<R: Rng + ?Sized>(sol: &Solution, at: Assignment, rng: &mut R) -> Option<Solution> {
    let &slot = sol.free_days(at.day).choose(rng)?;
    let mut next = sol.clone();
    next.unassign(at.slot, at.day, at.assistant);
    next.assign(slot, at.day, at.assistant);
    Some(next)
}

/// Exchanges the cells of two placements.
pub fn swap(sol: &Solution, a: Assignment, b: Assignment) -> Solution {
    let mut next = sol.clone();
    next.unassign(a.slot, a.day, a.assistant);
    next.unassign(b.slot, b.day, b.assistant);
    next.assign(a.slot, a.day, b.assistant);
    next.assign(b.slot, b.day, a.assistant);
    next
}

/// A random placement held by `assistant`.
fn held_by<R: Rng + ?Sized>(placed: &[Assignment], assistant: usize, rng: &mut R) -> Option<Assignment> {
    let own: Vec<Assignment> = placed
        .iter()
        .copied()
        .filter(|p| p.assistant == assistant)
        .collect();
    own.choose(rng).copied()
}

/// Picks a move kind uniformly, then its targets uniformly. Swap is only
/// drawn when at least two distinct assistants hold placements, and always
/// pairs cells of two different assistants. The input is never modified.
pub fn random_move<R: Rng + ?Sized>(sol: &Solution, rng: &mut R) -> Move {
    let placed = sol.placements();
    if placed.is_empty() {
        return Move {
            kind: MoveKind::Stay,
            candidate: sol.clone(),
        };
    }

    let mut holders: Vec<usize> = placed.iter().map(|p| p.assistant).collect();
    holders.sort_unstable();
    holders.dedup();

    let kinds: &[MoveKind] = if holders.len() < 2 {
        &[MoveKind::DayShift, MoveKind::SlotShift]
    } else {
        &[MoveKind::DayShift, MoveKind::SlotShift, MoveKind::Swap]
    };
    let kind = kinds[rng.gen_range(0..kinds.len())];

    let moved = match kind {
        MoveKind::Swap => {
            let picks = index::sample(rng, holders.len(), 2);
            let a = held_by(&placed, holders[picks.index(0)], rng);
            let b = held_by(&placed, holders[picks.index(1)], rng);
            a.zip(b).map(|(a, b)| swap(sol, a, b))
        }
        MoveKind::DayShift => {
            let at = placed[rng.gen_range(0..placed.len())];
            day_shift(sol, at, rng)
        }
        MoveKind::SlotShift => {
            let at = placed[rng.gen_range(0..placed.len())];
            slot_shift(sol, at, rng)
        }
        MoveKind::Stay => None,
    };

    match moved {
        Some(candidate) => Move { kind, candidate },
        None => Move {
            kind: MoveKind::Stay,
            candidate: sol.clone(),
        },
    }
}
