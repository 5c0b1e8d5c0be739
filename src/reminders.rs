//! Care reminders for real plants. The schedule only records what is due and
//! which reminders want a notification; delivering them is up to the host.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareAction {
    Water,
    Substrate,
    Medicine,
    Fertilize,
}

#[derive(Debug, Clone, Copy)]
pub struct CareActionDefinition {
    pub action: CareAction,
    pub id: &'static str,
    pub label: &'static str,
}

const CARE_ACTION_TABLE: &[CareActionDefinition] = &[
    CareActionDefinition {
        action: CareAction::Water,
        id: "water",
        label: "Watering",
    },
    CareActionDefinition {
        action: CareAction::Substrate,
        id: "substrate",
        label: "Change substrate",
    },
    CareActionDefinition {
        action: CareAction::Medicine,
        id: "medicine",
        label: "Add medicine",
    },
    CareActionDefinition {
        action: CareAction::Fertilize,
        id: "fertilize",
        label: "Fertilize",
    },
];

impl CareAction {
    pub const ALL: [CareAction; 4] = [
        CareAction::Water,
        CareAction::Substrate,
        CareAction::Medicine,
        CareAction::Fertilize,
    ];

    pub fn definition(self) -> &'static CareActionDefinition {
        &CARE_ACTION_TABLE[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.definition().label
    }
}

impl fmt::Display for CareAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown care action '{0}'")]
pub struct UnknownCareAction(pub String);

impl FromStr for CareAction {
    type Err = UnknownCareAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        CARE_ACTION_TABLE
            .iter()
            .find(|def| def.id == normalized)
            .map(|def| def.action)
            .ok_or_else(|| UnknownCareAction(s.to_string()))
    }
}

const DEFAULT_BODY: &str = "Don't forget to look after your plant";

fn default_notify() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: u64,
    pub at: NaiveDateTime,
    pub action: CareAction,
    pub plant_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_notify")]
    pub notify: bool,
}

impl Reminder {
    pub fn title(&self) -> String {
        format!("{} - {}", self.action, self.plant_name)
    }

    /// The description, or a generic nudge when none was written.
    pub fn body(&self) -> &str {
        if self.description.trim().is_empty() {
            DEFAULT_BODY
        } else {
            &self.description
        }
    }
}

/// A reminder before it is placed on the schedule.
#[derive(Debug, Clone)]
pub struct ReminderDraft {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub action: CareAction,
    pub plant_name: String,
    pub description: String,
    pub notify: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("reminder codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Reminders kept newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderSchedule {
    reminders: Vec<Reminder>,
}

impl ReminderSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, ReminderError> {
        let mut schedule: Self = serde_json::from_str(text)?;
        schedule.sort();
        Ok(schedule)
    }

    pub fn to_json(&self) -> Result<String, ReminderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.reminders.iter()
    }

    /// Combines the draft's day and time, stores it and returns the new id.
    pub fn add(&mut self, draft: ReminderDraft) -> u64 {
        let id = self
            .reminders
            .iter()
            .map(|r| r.id)
            .max()
            .map_or(1, |max| max + 1);
        self.reminders.push(Reminder {
            id,
            at: draft.date.and_time(draft.time),
            action: draft.action,
            plant_name: draft.plant_name,
            description: draft.description,
            notify: draft.notify,
        });
        self.sort();
        id
    }

    pub fn remove(&mut self, id: u64) -> Option<Reminder> {
        let index = self.reminders.iter().position(|r| r.id == id)?;
        Some(self.reminders.remove(index))
    }

    /// Future reminders that asked for a notification, soonest first.
    pub fn pending_notifications(&self, now: NaiveDateTime) -> Vec<&Reminder> {
        let mut pending: Vec<&Reminder> = self
            .reminders
            .iter()
            .filter(|r| r.notify && r.at > now)
            .collect();
        pending.sort_by_key(|r| r.at);
        pending
    }

    fn sort(&mut self) {
        self.reminders.sort_by(|a, b| b.at.cmp(&a.at));
    }
}
