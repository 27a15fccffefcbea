//! Day/week position in the program and today's completion record.

use chrono::{Datelike, Local};
use tracing::{info, warn};

use crate::catalog::{Catalog, DayPlan, SessionPlan, Stage, DAYS_PER_WEEK};
use crate::progress;
use crate::store::{keys, KeyValueStore, StoreError};

/// Program length; the week counter wraps back to 0 after this many weeks.
pub const WEEKS_IN_PROGRAM: u32 = 18;

const DONE: &str = "Yes";
const NOT_DONE: &str = "No";

/// Day of week as stored in `dailyChange`, Sunday = 0.
pub fn today_weekday() -> u32 {
    Local::now().weekday().num_days_from_sunday()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgramProgress {
    pub day: u32,
    pub week: u32,
    pub workout_done: bool,
    pub completion: Vec<bool>,
}

impl ProgramProgress {
    /// Read progress from the store, rolling over to the next program day when
    /// `weekday` differs from the one seen last time.
    pub fn load<S: KeyValueStore>(store: &mut S, weekday: u32) -> Result<Self, StoreError> {
        let stored_day = read_number(store, keys::DAY_PROGRESS)?;
        let stored_week = read_number(store, keys::WEEK_PROGRESS)?;
        let weekday = weekday.to_string();

        if store.get(keys::DAILY_CHANGE)?.as_deref() == Some(weekday.as_str()) {
            return Ok(Self {
                day: stored_day.unwrap_or(0).min(DAYS_PER_WEEK as u32 - 1),
                week: stored_week.unwrap_or(0),
                workout_done: store.get(keys::IS_WORKOUT_DONE)?.as_deref() == Some(DONE),
                completion: read_completion(store)?,
            });
        }

        store.set(keys::DAILY_CHANGE, &weekday)?;

        let mut day = stored_day.map_or(0, |d| d + 1);
        let mut week = stored_week.unwrap_or(0);
        if day >= DAYS_PER_WEEK as u32 {
            day = 0;
            week = stored_week.map_or(0, |w| w + 1);
            if week >= WEEKS_IN_PROGRAM {
                week = 0;
            }
            store.set(keys::WEEK_PROGRESS, &week.to_string())?;
        } else if stored_week.is_none() {
            // first launch: without a stored week the first rollover would repeat week 0
            store.set(keys::WEEK_PROGRESS, "0")?;
        }
        store.set(keys::DAY_PROGRESS, &day.to_string())?;
        store.set(keys::IS_WORKOUT_DONE, NOT_DONE)?;
        // yesterday's slots describe yesterday's exercises
        store.remove(keys::WORKOUT_PROGRESS)?;

        info!(day, week, "rolled over to a new program day");

        Ok(Self {
            day,
            week,
            workout_done: false,
            completion: Vec::new(),
        })
    }

    pub fn stage(&self) -> Stage {
        Stage::for_week(self.week)
    }

    pub fn cardio_minutes(&self) -> u32 {
        self.stage().cardio_minutes()
    }

    pub fn today<'a>(&self, catalog: &'a Catalog) -> &'a DayPlan {
        catalog.day(self.stage(), self.day as usize)
    }

    pub fn session_plan(&self, catalog: &Catalog) -> SessionPlan {
        catalog.session_plan(self.stage(), self.day as usize)
    }

    pub fn total_slots(&self, catalog: &Catalog) -> usize {
        progress::total_slots(catalog.warm_up(), self.today(catalog).exercises())
    }

    pub fn is_all_completed(&self) -> bool {
        progress::is_all_completed(&self.completion)
    }

    pub fn completed_count(&self) -> usize {
        progress::completed_count(&self.completion)
    }

    pub fn completion_percentage(&self) -> f64 {
        progress::completion_percentage(&self.completion)
    }

    pub fn toggle_slot<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        index: usize,
        total: usize,
    ) -> Result<(), StoreError> {
        let next = progress::toggle_slot(&self.completion, index, total);
        write_completion(store, &next)?;
        self.completion = next;
        Ok(())
    }

    /// Mark the day done, but only once every slot is ticked off.
    pub fn finish_workout<S: KeyValueStore>(&mut self, store: &mut S) -> Result<bool, StoreError> {
        if !self.is_all_completed() {
            return Ok(false);
        }
        store.set(keys::IS_WORKOUT_DONE, DONE)?;
        self.workout_done = true;
        info!(day = self.day, week = self.week, "workout finished");
        Ok(true)
    }

    /// Record a finished guided session: every slot done and the day marked done.
    pub fn complete_session<S: KeyValueStore>(
        &mut self,
        store: &mut S,
        total: usize,
    ) -> Result<(), StoreError> {
        let completion = vec![true; total];
        write_completion(store, &completion)?;
        store.set(keys::IS_WORKOUT_DONE, DONE)?;
        self.completion = completion;
        self.workout_done = true;
        info!(day = self.day, week = self.week, slots = total, "session progress saved");
        Ok(())
    }
}

fn read_number<S: KeyValueStore>(store: &S, key: &str) -> Result<Option<u32>, StoreError> {
    Ok(store.get(key)?.and_then(|raw| match raw.trim().parse::<u32>() {
        Ok(n) => Some(n),
        Err(err) => {
            warn!(key, value = %raw, %err, "ignoring malformed stored counter");
            None
        }
    }))
}

fn read_completion<S: KeyValueStore>(store: &S) -> Result<Vec<bool>, StoreError> {
    let Some(raw) = store.get(keys::WORKOUT_PROGRESS)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str::<Vec<bool>>(&raw) {
        Ok(completion) => Ok(completion),
        Err(err) => {
            warn!(%err, "ignoring malformed stored workout progress");
            Ok(Vec::new())
        }
    }
}

fn write_completion<S: KeyValueStore>(store: &mut S, completion: &[bool]) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(completion)?;
    store.set(keys::WORKOUT_PROGRESS, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn store_with(entries: &[(&str, &str)]) -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        for (key, value) in entries {
            store.set(key, value).unwrap();
        }
        store
    }

    #[test]
    fn first_launch_starts_at_day_zero() {
        let mut store = store_with(&[]);
        let progress = ProgramProgress::load(&mut store, 3).unwrap();

        assert_eq!(progress.day, 0);
        assert_eq!(progress.week, 0);
        assert!(!progress.workout_done);
        assert_eq!(store.get(keys::DAILY_CHANGE).unwrap().as_deref(), Some("3"));
        assert_eq!(store.get(keys::IS_WORKOUT_DONE).unwrap().as_deref(), Some("No"));
        assert_eq!(store.get(keys::WEEK_PROGRESS).unwrap().as_deref(), Some("0"));
    }

    #[test]
    fn same_weekday_reads_stored_values() {
        let mut store = store_with(&[
            (keys::DAY_PROGRESS, "4"),
            (keys::WEEK_PROGRESS, "7"),
            (keys::IS_WORKOUT_DONE, "Yes"),
            (keys::DAILY_CHANGE, "2"),
            (keys::WORKOUT_PROGRESS, "[true,false,true]"),
        ]);
        let progress = ProgramProgress::load(&mut store, 2).unwrap();

        assert_eq!(progress.day, 4);
        assert_eq!(progress.week, 7);
        assert!(progress.workout_done);
        assert_eq!(progress.completion, vec![true, false, true]);
        assert_eq!(progress.stage(), Stage::Two);
    }

    #[test]
    fn new_weekday_advances_day() {
        let mut store = store_with(&[
            (keys::DAY_PROGRESS, "2"),
            (keys::WEEK_PROGRESS, "1"),
            (keys::IS_WORKOUT_DONE, "Yes"),
            (keys::DAILY_CHANGE, "2"),
            (keys::WORKOUT_PROGRESS, "[true,true]"),
        ]);
        let progress = ProgramProgress::load(&mut store, 3).unwrap();

        assert_eq!(progress.day, 3);
        assert_eq!(progress.week, 1);
        assert!(!progress.workout_done);
        assert!(progress.completion.is_empty());
        assert_eq!(store.get(keys::WORKOUT_PROGRESS).unwrap(), None);
    }

    #[test]
    fn last_day_of_week_rolls_into_next_week() {
        let mut store = store_with(&[
            (keys::DAY_PROGRESS, "6"),
            (keys::WEEK_PROGRESS, "4"),
            (keys::IS_WORKOUT_DONE, "Yes"),
            (keys::DAILY_CHANGE, "5"),
        ]);
        let progress = ProgramProgress::load(&mut store, 6).unwrap();

        assert_eq!(progress.day, 0);
        assert_eq!(progress.week, 5);
        assert!(!progress.workout_done);
        assert_eq!(store.get(keys::WEEK_PROGRESS).unwrap().as_deref(), Some("5"));
        assert_eq!(store.get(keys::DAY_PROGRESS).unwrap().as_deref(), Some("0"));
    }

    #[test]
    fn final_week_wraps_to_zero() {
        let mut store = store_with(&[
            (keys::DAY_PROGRESS, "6"),
            (keys::WEEK_PROGRESS, "17"),
            (keys::DAILY_CHANGE, "0"),
        ]);
        let progress = ProgramProgress::load(&mut store, 1).unwrap();

        assert_eq!(progress.day, 0);
        assert_eq!(progress.week, 0);
    }

    #[test]
    fn malformed_values_read_as_absent() {
        let mut store = store_with(&[
            (keys::DAY_PROGRESS, "soon"),
            (keys::WEEK_PROGRESS, "3"),
            (keys::DAILY_CHANGE, "1"),
            (keys::WORKOUT_PROGRESS, "{not json"),
        ]);
        let progress = ProgramProgress::load(&mut store, 1).unwrap();

        assert_eq!(progress.day, 0);
        assert_eq!(progress.week, 3);
        assert!(progress.completion.is_empty());
    }

    #[test]
    fn toggle_persists_completion() {
        let catalog = Catalog::builtin().unwrap();
        let mut store = store_with(&[]);
        let mut progress = ProgramProgress::load(&mut store, 0).unwrap();
        let total = progress.total_slots(&catalog);

        progress.toggle_slot(&mut store, 0, total).unwrap();

        assert_eq!(progress.completion.len(), total);
        assert_eq!(progress.completed_count(), 1);
        let reloaded = ProgramProgress::load(&mut store, 0).unwrap();
        assert_eq!(reloaded.completion, progress.completion);
    }

    #[test]
    fn finish_requires_everything_done() {
        let mut store = store_with(&[]);
        let mut progress = ProgramProgress::load(&mut store, 0).unwrap();

        progress.toggle_slot(&mut store, 0, 2).unwrap();
        assert!(!progress.finish_workout(&mut store).unwrap());
        assert!(!progress.workout_done);

        progress.toggle_slot(&mut store, 1, 2).unwrap();
        assert!(progress.finish_workout(&mut store).unwrap());
        assert!(progress.workout_done);
        assert_eq!(store.get(keys::IS_WORKOUT_DONE).unwrap().as_deref(), Some("Yes"));
    }

    #[test]
    fn complete_session_fills_every_slot() {
        let mut store = store_with(&[]);
        let mut progress = ProgramProgress::load(&mut store, 0).unwrap();

        progress.complete_session(&mut store, 9).unwrap();
        progress.complete_session(&mut store, 9).unwrap();

        assert_eq!(progress.completion, vec![true; 9]);
        assert!(progress.is_all_completed());
        assert_eq!(progress.completion_percentage(), 100.0);
        let reloaded = ProgramProgress::load(&mut store, 0).unwrap();
        assert!(reloaded.workout_done);
        assert_eq!(reloaded.completion, vec![true; 9]);
    }
}
