//! Pure accounting over the flat completion array.
//!
//! The completion array holds one flag per unit of work for the day, laid out
//! as treadmill (1 slot), every warm-up round, every main-workout round, and
//! cardio (1 slot). Nothing here mutates its inputs.

use tracing::warn;

use crate::catalog::ExerciseSpec;
use crate::session::PhaseKind;

pub const TREADMILL_NAME: &str = "Walking on a treadmill";
pub const CARDIO_NAME: &str = "The Cardio";

/// Slot offsets for one day's workout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotLayout {
    warm_up: Vec<usize>,
    main: Vec<usize>,
    cardio: usize,
}

impl SlotLayout {
    pub fn new(warm_up: &[ExerciseSpec], main: &[ExerciseSpec]) -> Self {
        // slot 0 is the treadmill
        let mut next = 1;
        let mut offsets = |exercises: &[ExerciseSpec]| {
            exercises
                .iter()
                .map(|exercise| {
                    let start = next;
                    next += exercise.rounds as usize;
                    start
                })
                .collect::<Vec<usize>>()
        };
        let warm_up = offsets(warm_up);
        let main = offsets(main);

        Self {
            warm_up,
            main,
            cardio: next,
        }
    }

    pub fn treadmill(&self) -> usize {
        0
    }

    pub fn warm_up(&self, exercise: usize, round: usize) -> Option<usize> {
        self.warm_up.get(exercise).map(|start| start + round)
    }

    pub fn main(&self, exercise: usize, round: usize) -> Option<usize> {
        self.main.get(exercise).map(|start| start + round)
    }

    pub fn cardio(&self) -> usize {
        self.cardio
    }

    pub fn total(&self) -> usize {
        self.cardio + 1
    }
}

pub fn total_slots(warm_up: &[ExerciseSpec], main: &[ExerciseSpec]) -> usize {
    let rounds = |list: &[ExerciseSpec]| list.iter().map(|e| e.rounds as usize).sum::<usize>();
    2 + rounds(warm_up) + rounds(main)
}

/// Flip one slot and return the new array.
///
/// An empty array is first sized to `total` and zero-filled. An index past the
/// end leaves the copy unchanged.
pub fn toggle_slot(array: &[bool], index: usize, total: usize) -> Vec<bool> {
    let mut next = if array.is_empty() {
        vec![false; total]
    } else {
        array.to_vec()
    };

    match next.get_mut(index) {
        Some(slot) => *slot = !*slot,
        None => warn!(index, len = next.len(), "completion slot out of range"),
    }

    next
}

pub fn is_all_completed(array: &[bool]) -> bool {
    !array.is_empty() && array.iter().all(|&done| done)
}

pub fn completed_count(array: &[bool]) -> usize {
    array.iter().filter(|&&done| done).count()
}

pub fn completion_percentage(array: &[bool]) -> f64 {
    if array.is_empty() {
        0.0
    } else {
        completed_count(array) as f64 / array.len() as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Treadmill,
    WarmUp,
    MainWorkout,
    Cardio,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Treadmill => "Treadmill",
            SectionKind::WarmUp => "Warm-up",
            SectionKind::MainWorkout => "Main Workout",
            SectionKind::Cardio => "Cardio",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseProgress {
    pub name: String,
    pub rounds: Vec<bool>,
    pub completed: bool,
}

impl ExerciseProgress {
    fn from_slots(name: &str, array: &[bool], start: usize, rounds: usize) -> Self {
        let rounds: Vec<bool> = (start..start + rounds)
            .map(|idx| array.get(idx).copied().unwrap_or(false))
            .collect();
        let completed = rounds.iter().all(|&done| done);

        Self {
            name: name.to_string(),
            rounds,
            completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub exercises: Vec<ExerciseProgress>,
}

/// Per-section, per-exercise view of the completion array. Slots missing from
/// a short array read as not done.
pub fn section_breakdown(
    array: &[bool],
    warm_up: &[ExerciseSpec],
    main: &[ExerciseSpec],
) -> Vec<Section> {
    let layout = SlotLayout::new(warm_up, main);

    let listed = |exercises: &[ExerciseSpec], offset: fn(&SlotLayout, usize, usize) -> Option<usize>| {
        exercises
            .iter()
            .enumerate()
            .map(|(idx, exercise)| {
                let start = offset(&layout, idx, 0).unwrap_or(layout.cardio());
                ExerciseProgress::from_slots(&exercise.name, array, start, exercise.rounds as usize)
            })
            .collect::<Vec<_>>()
    };

    vec![
        Section {
            kind: SectionKind::Treadmill,
            exercises: vec![ExerciseProgress::from_slots(
                TREADMILL_NAME,
                array,
                layout.treadmill(),
                1,
            )],
        },
        Section {
            kind: SectionKind::WarmUp,
            exercises: listed(warm_up, SlotLayout::warm_up),
        },
        Section {
            kind: SectionKind::MainWorkout,
            exercises: listed(main, SlotLayout::main),
        },
        Section {
            kind: SectionKind::Cardio,
            exercises: vec![ExerciseProgress::from_slots(
                CARDIO_NAME,
                array,
                layout.cardio(),
                1,
            )],
        },
    ]
}

/// Exercise-level progress through a live session as `(completed, total)`.
///
/// Treadmill and cardio count as one unit each and list exercises count once
/// regardless of their rounds.
pub fn session_progress(
    phase: PhaseKind,
    exercise_index: usize,
    warm_up_len: usize,
    main_len: usize,
) -> (usize, usize) {
    let total = warm_up_len + main_len + 2;

    let treadmill = usize::from(phase > PhaseKind::Treadmill);
    let warm_up = match phase {
        PhaseKind::Treadmill => 0,
        PhaseKind::WarmUp => exercise_index.min(warm_up_len),
        _ => warm_up_len,
    };
    let main = match phase {
        PhaseKind::Treadmill | PhaseKind::WarmUp => 0,
        PhaseKind::MainWorkout => exercise_index.min(main_len),
        _ => main_len,
    };
    let cardio = usize::from(phase == PhaseKind::Complete);

    (treadmill + warm_up + main + cardio, total)
}
