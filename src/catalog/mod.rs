use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

static CATALOG_DIR: Dir = include_dir!("src/catalog");

/// Days in one program week; every stage row has exactly this many entries.
pub const DAYS_PER_WEEK: usize = 7;
/// Number of stages in the program schedule.
pub const STAGE_COUNT: usize = 3;
/// Upper bound on rounds for one exercise. Every round is a checklist slot.
pub const MAX_ROUNDS: u32 = 50;

const REST_SENTINEL: &str = "Rest";

static REST_DAY: DayPlan = DayPlan::Rest;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("embedded catalog file {0} is missing")]
    MissingAsset(&'static str),
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid catalog json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid schedule: {0}")]
    Schedule(String),
}

/// One exercise as the program prescribes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseSpec {
    pub name: String,
    pub rounds: u32,
    pub counts: Option<String>,
}

impl ExerciseSpec {
    pub fn new(name: impl Into<String>, rounds: u32) -> Self {
        Self {
            name: name.into(),
            rounds: rounds.clamp(1, MAX_ROUNDS),
            counts: None,
        }
    }

    pub fn with_counts(mut self, counts: impl Into<String>) -> Self {
        self.counts = Some(counts.into());
        self
    }
}

/// The catalog json writes numbers either bare or quoted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumberOrText {
    fn as_rounds(&self) -> Option<i64> {
        match self {
            NumberOrText::Int(n) => Some(*n),
            NumberOrText::Float(f) => Some(f.trunc() as i64),
            NumberOrText::Text(s) => {
                let s = s.trim();
                let end = s
                    .char_indices()
                    .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && c == '-')))
                    .map(|(i, _)| i)
                    .unwrap_or(s.len());
                s[..end].parse().ok()
            }
        }
    }
}

impl fmt::Display for NumberOrText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOrText::Int(n) => write!(f, "{n}"),
            NumberOrText::Float(x) => write!(f, "{x}"),
            NumberOrText::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawExercise {
    name: String,
    #[serde(default)]
    rounds: Option<NumberOrText>,
    #[serde(default)]
    counts: Option<NumberOrText>,
}

impl TryFrom<RawExercise> for ExerciseSpec {
    type Error = CatalogError;

    fn try_from(raw: RawExercise) -> Result<Self, Self::Error> {
        let rounds = match raw.rounds.as_ref().and_then(NumberOrText::as_rounds) {
            Some(n) if n > i64::from(MAX_ROUNDS) => {
                return Err(CatalogError::Schedule(format!(
                    "{} has {n} rounds, at most {MAX_ROUNDS} allowed",
                    raw.name
                )))
            }
            Some(n) if n >= 1 => n as u32,
            other => {
                warn!(
                    exercise = %raw.name,
                    rounds = ?other,
                    "invalid round count in catalog, clamping to 1"
                );
                1
            }
        };

        Ok(Self {
            name: raw.name,
            rounds,
            counts: raw.counts.map(|c| c.to_string()),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawDay {
    Marker(Vec<String>),
    Exercises(Vec<RawExercise>),
}

/// What the schedule prescribes for a single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayPlan {
    Rest,
    Workout(Vec<ExerciseSpec>),
}

impl DayPlan {
    pub fn is_rest(&self) -> bool {
        matches!(self, DayPlan::Rest)
    }

    /// Main exercises for the day; empty on a rest day.
    pub fn exercises(&self) -> &[ExerciseSpec] {
        match self {
            DayPlan::Rest => &[],
            DayPlan::Workout(exercises) => exercises,
        }
    }
}

impl TryFrom<RawDay> for DayPlan {
    type Error = CatalogError;

    fn try_from(raw: RawDay) -> Result<Self, Self::Error> {
        match raw {
            RawDay::Marker(marker) => match marker.first().map(String::as_str) {
                Some(REST_SENTINEL) => Ok(DayPlan::Rest),
                None => Ok(DayPlan::Workout(Vec::new())),
                Some(other) => Err(CatalogError::Schedule(format!(
                    "unknown day marker {other:?}"
                ))),
            },
            RawDay::Exercises(exercises) => Ok(DayPlan::Workout(
                exercises
                    .into_iter()
                    .map(ExerciseSpec::try_from)
                    .collect::<Result<_, _>>()?,
            )),
        }
    }
}

/// Program stage, derived from the week counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    One,
    Two,
    Three,
}

impl Stage {
    pub fn for_week(week: u32) -> Self {
        match week {
            0..=5 => Stage::One,
            6..=11 => Stage::Two,
            _ => Stage::Three,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Stage::One => 0,
            Stage::Two => 1,
            Stage::Three => 2,
        }
    }

    /// 1-based stage number as shown to the user
    pub fn number(self) -> usize {
        self.index() + 1
    }

    pub fn cardio_minutes(self) -> u32 {
        match self {
            Stage::One => 30,
            Stage::Two => 45,
            Stage::Three => 60,
        }
    }
}

/// Everything a workout session needs, resolved before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPlan {
    pub warm_up: Vec<ExerciseSpec>,
    pub main: Vec<ExerciseSpec>,
    pub cardio_minutes: u32,
}

/// Single-file catalog override: `{ "warmUp": [...], "stages": [...] }`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    warm_up: Vec<RawExercise>,
    stages: Vec<Vec<RawDay>>,
}

/// Immutable exercise catalog: the warm-up list plus a stage x weekday schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    warm_up: Vec<ExerciseSpec>,
    stages: Vec<Vec<DayPlan>>,
}

impl Catalog {
    /// The catalog bundled into the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        let warm_up = embedded_str("warmup.json")?;
        let stages = embedded_str("stages.json")?;
        Self::from_json(warm_up, stages)
    }

    pub fn from_json(warm_up: &str, stages: &str) -> Result<Self, CatalogError> {
        let warm_up: Vec<RawExercise> = serde_json::from_str(warm_up)?;
        let stages: Vec<Vec<RawDay>> = serde_json::from_str(stages)?;
        Self::from_raw(warm_up, stages)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile = serde_json::from_slice(&bytes)?;
        debug!(path = %path.display(), "loaded catalog override");
        Self::from_raw(file.warm_up, file.stages)
    }

    fn from_raw(warm_up: Vec<RawExercise>, stages: Vec<Vec<RawDay>>) -> Result<Self, CatalogError> {
        if stages.len() != STAGE_COUNT {
            return Err(CatalogError::Schedule(format!(
                "expected {STAGE_COUNT} stages, found {}",
                stages.len()
            )));
        }

        let stages = stages
            .into_iter()
            .enumerate()
            .map(|(idx, days)| {
                if days.len() != DAYS_PER_WEEK {
                    return Err(CatalogError::Schedule(format!(
                        "stage {} has {} days, expected {DAYS_PER_WEEK}",
                        idx + 1,
                        days.len()
                    )));
                }
                days.into_iter().map(DayPlan::try_from).collect()
            })
            .collect::<Result<Vec<Vec<DayPlan>>, CatalogError>>()?;

        let warm_up = warm_up
            .into_iter()
            .map(ExerciseSpec::try_from)
            .collect::<Result<_, _>>()?;

        Ok(Self { warm_up, stages })
    }

    pub fn warm_up(&self) -> &[ExerciseSpec] {
        &self.warm_up
    }

    /// Plan for `day` (0-6) of `stage`; out-of-range days read as rest.
    pub fn day(&self, stage: Stage, day: usize) -> &DayPlan {
        self.stages
            .get(stage.index())
            .and_then(|days| days.get(day))
            .unwrap_or(&REST_DAY)
    }

    pub fn session_plan(&self, stage: Stage, day: usize) -> SessionPlan {
        SessionPlan {
            warm_up: self.warm_up.clone(),
            main: self.day(stage, day).exercises().to_vec(),
            cardio_minutes: stage.cardio_minutes(),
        }
    }
}

fn embedded_str(name: &'static str) -> Result<&'static str, CatalogError> {
    CATALOG_DIR
        .get_file(name)
        .and_then(|file| file.contents_utf8())
        .ok_or(CatalogError::MissingAsset(name))
}
