use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Recurrence rule kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Weekly,
    Biweekly,
    Monthly,
    Custom,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Custom => "custom",
        };
        f.write_str(s)
    }
}

impl FromStr for PatternKind {
    type Err = PatternKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "biweekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "custom" => Ok(Self::Custom),
            other => Err(PatternKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`PatternKind`] string.
#[derive(Debug, Clone)]
pub struct PatternKindParseError(pub String);

impl fmt::Display for PatternKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pattern kind: {:?}", self.0)
    }
}

impl std::error::Error for PatternKindParseError {}

// ---------------------------------------------------------------------------

/// Kind of linked plan content: a drill or a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Drill,
    Formation,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Drill => "drill",
            Self::Formation => "formation",
        };
        f.write_str(s)
    }
}

impl FromStr for LinkKind {
    type Err = LinkKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drill" => Ok(Self::Drill),
            "formation" => Ok(Self::Formation),
            other => Err(LinkKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`LinkKind`] string.
#[derive(Debug, Clone)]
pub struct LinkKindParseError(pub String);

impl fmt::Display for LinkKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid link kind: {:?}", self.0)
    }
}

impl std::error::Error for LinkKindParseError {}

// ---------------------------------------------------------------------------

/// Kind of season calendar marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Game,
    Tournament,
    Scrimmage,
    Break,
    Event,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Game => "game",
            Self::Tournament => "tournament",
            Self::Scrimmage => "scrimmage",
            Self::Break => "break",
            Self::Event => "event",
        };
        f.write_str(s)
    }
}

impl FromStr for MarkerKind {
    type Err = MarkerKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "game" => Ok(Self::Game),
            "tournament" => Ok(Self::Tournament),
            "scrimmage" => Ok(Self::Scrimmage),
            "break" => Ok(Self::Break),
            "event" => Ok(Self::Event),
            other => Err(MarkerKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`MarkerKind`] string.
#[derive(Debug, Clone)]
pub struct MarkerKindParseError(pub String);

impl fmt::Display for MarkerKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid marker kind: {:?}", self.0)
    }
}

impl std::error::Error for MarkerKindParseError {}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A season -- the top-level scheduling window for a team.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Season {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Plan whose content seeds every generated draft. May dangle; the
    /// union builder tolerates that.
    pub template_plan_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A named sub-period of a season contributing default plan structure.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SeasonSection {
    pub id: Uuid,
    pub season_id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub display_order: i32,
    pub overview_visible_to_members: bool,
    pub created_at: DateTime<Utc>,
}

/// A plan-section template contributed by a season section.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SectionDefault {
    pub id: Uuid,
    pub season_section_id: Uuid,
    pub section_name: String,
    /// Position in the generated plan; `None` means "append at the end".
    pub section_order: Option<i32>,
    pub goals: Vec<String>,
    pub notes: Option<String>,
}

/// A drill or formation pre-linked to a season section.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SectionLink {
    pub id: Uuid,
    pub season_section_id: Uuid,
    pub kind: LinkKind,
    pub drill_id: Option<Uuid>,
    pub formation_id: Option<Uuid>,
    pub drill_name: Option<String>,
    pub formation_name: Option<String>,
    pub default_duration_minutes: Option<i32>,
    pub order_in_section: i32,
    /// Section default this link should land in, if any.
    pub default_section_id: Option<Uuid>,
}

/// A recurrence pattern describing which dates in a range get a practice.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecurrencePattern {
    pub id: Uuid,
    pub season_id: Uuid,
    pub team_id: Uuid,
    pub pattern: PatternKind,
    /// Weekdays, 0 = Sunday .. 6 = Saturday. Used by weekly and biweekly.
    pub day_of_week: Vec<i16>,
    /// Days of month, 1..=31. Used by monthly.
    pub day_of_month: Vec<i16>,
    pub time_of_day: Option<NaiveTime>,
    pub duration_minutes: i32,
    pub template_plan_id: Option<Uuid>,
    /// Calendar dates excluded from generation even when the rule matches.
    pub skip_dates: Vec<NaiveDate>,
    /// Whether dates covered by a season marker are skipped.
    pub skip_markers: bool,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A team calendar event whose date range can suppress generation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SeasonMarker {
    pub id: Uuid,
    pub season_id: Uuid,
    pub title: String,
    pub kind: MarkerKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A scheduled practice plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PracticePlan {
    pub id: Uuid,
    pub team_id: Uuid,
    pub season_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub scheduled_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A named section within a practice plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanSection {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub name: String,
    pub section_order: i32,
    pub goals: Vec<String>,
    pub notes: Option<String>,
}

/// A drill or formation entry within a practice plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanDrill {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub kind: LinkKind,
    pub drill_id: Option<Uuid>,
    pub formation_id: Option<Uuid>,
    pub name: String,
    pub duration_minutes: i32,
    pub section_id: Option<Uuid>,
    pub section_name: Option<String>,
    pub order_in_plan: i32,
    pub parallel_group_id: Option<String>,
    pub parallel_timeline: Option<String>,
    pub group_timelines: Option<serde_json::Value>,
}

/// Audit record of one batch-generation run. Insert-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GenerationLog {
    pub id: Uuid,
    pub recurrence_id: Uuid,
    pub generated_count: i32,
    pub skipped_count: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub generated_plan_ids: Vec<Uuid>,
    /// JSON object mapping `YYYY-MM-DD` to the skip reason for that date.
    pub skip_reasons: serde_json::Value,
    pub generated_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_kind_display_roundtrip() {
        let variants = [
            PatternKind::Weekly,
            PatternKind::Biweekly,
            PatternKind::Monthly,
            PatternKind::Custom,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: PatternKind = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn pattern_kind_invalid() {
        let result = "fortnightly".parse::<PatternKind>();
        assert!(result.is_err());
    }

    #[test]
    fn link_kind_display_roundtrip() {
        let variants = [LinkKind::Drill, LinkKind::Formation];
        for v in &variants {
            let s = v.to_string();
            let parsed: LinkKind = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn link_kind_invalid() {
        let result = "play".parse::<LinkKind>();
        assert!(result.is_err());
    }

    #[test]
    fn marker_kind_display_roundtrip() {
        let variants = [
            MarkerKind::Game,
            MarkerKind::Tournament,
            MarkerKind::Scrimmage,
            MarkerKind::Break,
            MarkerKind::Event,
        ];
        for v in &variants {
            let s = v.to_string();
            let parsed: MarkerKind = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn marker_kind_invalid() {
        let result = "holiday".parse::<MarkerKind>();
        assert!(result.is_err());
    }
}
