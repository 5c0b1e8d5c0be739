//! Gardener progress: daily login streak, points, badges and completed tasks.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DAILY_LOGIN_POINTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstStep,
    StarterKit,
    SeasonedGardener,
    CaringWeek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRule {
    Registered,
    PointsAtLeast(u32),
    StreakAtLeast(u32),
}

#[derive(Debug, Clone, Copy)]
pub struct BadgeDefinition {
    pub badge: Badge,
    pub name: &'static str,
    pub description: &'static str,
    pub rule: BadgeRule,
}

const BADGE_TABLE: &[BadgeDefinition] = &[
    BadgeDefinition {
        badge: Badge::FirstStep,
        name: "First step",
        description: "Signed up",
        rule: BadgeRule::Registered,
    },
    BadgeDefinition {
        badge: Badge::StarterKit,
        name: "Starter kit",
        description: "Earned 100 points",
        rule: BadgeRule::PointsAtLeast(100),
    },
    BadgeDefinition {
        badge: Badge::SeasonedGardener,
        name: "Seasoned gardener",
        description: "Earned 300 points",
        rule: BadgeRule::PointsAtLeast(300),
    },
    BadgeDefinition {
        badge: Badge::CaringWeek,
        name: "Week of care",
        description: "7 days in a row",
        rule: BadgeRule::StreakAtLeast(7),
    },
];

impl Badge {
    pub const ALL: [Badge; 4] = [
        Badge::FirstStep,
        Badge::StarterKit,
        Badge::SeasonedGardener,
        Badge::CaringWeek,
    ];

    pub fn definition(self) -> &'static BadgeDefinition {
        &BADGE_TABLE[self as usize]
    }

    pub fn description(self) -> &'static str {
        self.definition().description
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition().name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTask {
    pub id: u64,
    pub name: String,
    pub point_reward: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginOutcome {
    SameDay,
    StreakContinued,
    StreakReset,
}

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    #[error("progress codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    points: u32,
    streak_days: u32,
    last_login: NaiveDate,
    #[serde(default)]
    completed_tasks: BTreeSet<u64>,
    /// Award order.
    #[serde(default)]
    badges: Vec<Badge>,
}

impl UserProgress {
    /// A new gardener: streak of one, no points, the sign-up badge.
    pub fn new(today: NaiveDate) -> Self {
        let mut progress = Self {
            points: 0,
            streak_days: 1,
            last_login: today,
            completed_tasks: BTreeSet::new(),
            badges: Vec::new(),
        };
        progress.award_badges();
        progress
    }

    pub fn from_json(text: &str) -> Result<Self, ProgressError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn streak_days(&self) -> u32 {
        self.streak_days
    }

    pub fn last_login(&self) -> NaiveDate {
        self.last_login
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }

    pub fn has_completed(&self, task_id: u64) -> bool {
        self.completed_tasks.contains(&task_id)
    }

    /// Logging in the day after the last login extends the streak and pays
    /// the daily bonus. Any other gap, including a date before the last
    /// login, starts a new streak.
    pub fn check_daily_login(&mut self, today: NaiveDate) -> LoginOutcome {
        if today == self.last_login {
            return LoginOutcome::SameDay;
        }
        let outcome = if self.last_login.succ_opt() == Some(today) {
            self.streak_days += 1;
            self.add_points(DAILY_LOGIN_POINTS);
            LoginOutcome::StreakContinued
        } else {
            self.streak_days = 1;
            LoginOutcome::StreakReset
        };
        self.last_login = today;
        outcome
    }

    /// Returns the badges this award unlocked.
    pub fn add_points(&mut self, amount: u32) -> Vec<Badge> {
        self.points = self.points.saturating_add(amount);
        self.award_badges()
    }

    /// Pays a task's reward once; repeats return false.
    pub fn complete_task(&mut self, task: &DailyTask) -> bool {
        if !self.completed_tasks.insert(task.id) {
            return false;
        }
        self.add_points(task.point_reward);
        true
    }

    fn award_badges(&mut self) -> Vec<Badge> {
        let mut awarded = Vec::new();
        for def in BADGE_TABLE {
            let earned = match def.rule {
                BadgeRule::Registered => true,
                BadgeRule::PointsAtLeast(points) => self.points >= points,
                BadgeRule::StreakAtLeast(days) => self.streak_days >= days,
            };
            if earned && !self.has_badge(def.badge) {
                self.badges.push(def.badge);
                awarded.push(def.badge);
            }
        }
        awarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: u64, reward: u32) -> DailyTask {
        DailyTask {
            id,
            name: format!("task {id}"),
            point_reward: reward,
        }
    }

    #[test]
    fn new_gardener_has_sign_up_badge() {
        let progress = UserProgress::new(date(2026, 10, 15));
        assert_eq!(progress.points(), 0);
        assert_eq!(progress.streak_days(), 1);
        assert_eq!(progress.badges(), &[Badge::FirstStep]);
    }

    #[test]
    fn consecutive_login_extends_streak() {
        let mut progress = UserProgress::new(date(2026, 10, 31));
        assert_eq!(
            progress.check_daily_login(date(2026, 11, 1)),
            LoginOutcome::StreakContinued
        );
        assert_eq!(progress.streak_days(), 2);
        assert_eq!(progress.points(), DAILY_LOGIN_POINTS);

        assert_eq!(
            progress.check_daily_login(date(2026, 11, 1)),
            LoginOutcome::SameDay
        );
        assert_eq!(progress.streak_days(), 2);
        assert_eq!(progress.points(), DAILY_LOGIN_POINTS);
    }

    #[test]
    fn missed_day_resets_streak_without_bonus() {
        let mut progress = UserProgress::new(date(2026, 10, 1));
        progress.check_daily_login(date(2026, 10, 2));
        progress.check_daily_login(date(2026, 10, 3));
        assert_eq!(progress.streak_days(), 3);

        assert_eq!(
            progress.check_daily_login(date(2026, 10, 5)),
            LoginOutcome::StreakReset
        );
        assert_eq!(progress.streak_days(), 1);
        assert_eq!(progress.points(), 20);
        assert_eq!(progress.last_login(), date(2026, 10, 5));

        assert_eq!(
            progress.check_daily_login(date(2026, 9, 30)),
            LoginOutcome::StreakReset
        );
    }

    #[test]
    fn week_streak_earns_badge_once() {
        let mut progress = UserProgress::new(date(2026, 10, 1));
        for day in 2..=7 {
            progress.check_daily_login(date(2026, 10, day));
        }
        assert_eq!(progress.streak_days(), 7);
        assert!(progress.has_badge(Badge::CaringWeek));

        progress.check_daily_login(date(2026, 10, 8));
        let count = progress
            .badges()
            .iter()
            .filter(|b| **b == Badge::CaringWeek)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn point_thresholds_award_in_order() {
        let mut progress = UserProgress::new(date(2026, 10, 1));
        assert!(progress.add_points(99).is_empty());
        assert_eq!(progress.add_points(1), vec![Badge::StarterKit]);
        assert!(progress.add_points(150).is_empty());
        assert_eq!(progress.add_points(50), vec![Badge::SeasonedGardener]);
        assert!(progress.add_points(500).is_empty());
        assert_eq!(
            progress.badges(),
            &[Badge::FirstStep, Badge::StarterKit, Badge::SeasonedGardener]
        );
    }

    #[test]
    fn task_reward_is_paid_once() {
        let mut progress = UserProgress::new(date(2026, 10, 1));
        let water = task(7, 40);
        assert!(progress.complete_task(&water));
        assert!(!progress.complete_task(&water));
        assert!(progress.complete_task(&task(8, 15)));
        assert_eq!(progress.points(), 55);
        assert!(progress.has_completed(7));
        assert!(!progress.has_completed(9));
    }

    #[test]
    fn json_keeps_progress() {
        let mut progress = UserProgress::new(date(2026, 10, 1));
        progress.complete_task(&task(3, 120));
        progress.check_daily_login(date(2026, 10, 2));

        let text = progress.to_json().unwrap();
        assert!(text.contains("\"starter_kit\""));
        assert_eq!(UserProgress::from_json(&text).unwrap(), progress);
    }

    #[test]
    fn badge_table_matches_variants() {
        for badge in Badge::ALL {
            assert_eq!(badge.definition().badge, badge);
            assert!(!badge.description().is_empty());
        }
        assert_eq!(Badge::CaringWeek.to_string(), "Week of care");
    }
}
