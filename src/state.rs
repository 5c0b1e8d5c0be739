use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    config::{GardenConfig, Limits},
    species::Species,
    upgrades::{Upgrade, UpgradeLedger},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub water: f64,
    pub nutrients: f64,
    pub energy: f64,
    pub oxygen: u32,
    pub credits: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub species: Species,
    pub growth: f64,
    pub health: f64,
    pub planted_at: DateTime<Utc>,
}

impl Plant {
    pub fn new(species: Species) -> Self {
        Self {
            species,
            growth: 0.0,
            health: 100.0,
            planted_at: Utc::now(),
        }
    }

    pub fn is_ripe(&self) -> bool {
        self.growth >= 100.0
    }

    pub fn produces_oxygen(&self) -> bool {
        self.growth >= 50.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub temperature: f64,
    pub gravity: f64,
}

impl Environment {
    /// Health change applied to every plant per tick.
    pub fn temperature_effect(&self) -> f64 {
        if self.temperature < 10.0 {
            -0.5
        } else if self.temperature > 35.0 {
            -1.0
        } else {
            0.1
        }
    }

    pub fn growth_multiplier(&self) -> f64 {
        1.0 + (self.gravity - 0.3)
    }
}

/// The whole mini-game session. Scalars only change through the clamping
/// mutators below, so every bound holds after each call.
#[derive(Debug, Clone)]
pub struct GardenState {
    pub(crate) resources: Resources,
    pub(crate) plants: Vec<Plant>,
    pub(crate) environment: Environment,
    pub(crate) upgrades: UpgradeLedger,
    pub(crate) day: u32,
    pub(crate) research_points: u32,
    pub(crate) game_over: bool,
    pub(crate) oxygen_warning: bool,
    limits: Limits,
}

impl GardenState {
    pub fn from_config(config: &GardenConfig) -> Self {
        let initial = &config.initial;
        let max = config.limits.max_resource;
        Self {
            resources: Resources {
                water: initial.water.clamp(0.0, max),
                nutrients: initial.nutrients.clamp(0.0, max),
                energy: initial.energy.clamp(0.0, max),
                oxygen: initial.oxygen.min(config.limits.max_oxygen),
                credits: initial.credits,
            },
            plants: Vec::with_capacity(config.limits.slots),
            environment: Environment {
                temperature: initial.temperature,
                gravity: config.gravity,
            },
            upgrades: UpgradeLedger::new(),
            day: initial.day,
            research_points: 0,
            game_over: false,
            oxygen_warning: false,
            limits: config.limits.clone(),
        }
    }

    pub fn water(&self) -> f64 {
        self.resources.water
    }

    pub fn nutrients(&self) -> f64 {
        self.resources.nutrients
    }

    pub fn energy(&self) -> f64 {
        self.resources.energy
    }

    pub fn oxygen(&self) -> u32 {
        self.resources.oxygen
    }

    pub fn credits(&self) -> u32 {
        self.resources.credits
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }

    pub fn free_slots(&self) -> usize {
        self.limits.slots.saturating_sub(self.plants.len())
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn temperature(&self) -> f64 {
        self.environment.temperature
    }

    pub fn upgrades(&self) -> &UpgradeLedger {
        &self.upgrades
    }

    pub fn has_upgrade(&self, upgrade: Upgrade) -> bool {
        self.upgrades.is_unlocked(upgrade)
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn research_points(&self) -> u32 {
        self.research_points
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn oxygen_warning(&self) -> bool {
        self.oxygen_warning
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub(crate) fn change_water(&mut self, delta: f64) {
        self.resources.water = clamp_resource(self.resources.water + delta, self.limits.max_resource);
    }

    pub(crate) fn change_nutrients(&mut self, delta: f64) {
        self.resources.nutrients =
            clamp_resource(self.resources.nutrients + delta, self.limits.max_resource);
    }

    pub(crate) fn change_energy(&mut self, delta: f64) {
        self.resources.energy =
            clamp_resource(self.resources.energy + delta, self.limits.max_resource);
    }

    pub(crate) fn scale_water(&mut self, factor: f64) {
        self.resources.water = clamp_resource(self.resources.water * factor, self.limits.max_resource);
    }

    pub(crate) fn scale_energy(&mut self, factor: f64) {
        self.resources.energy =
            clamp_resource(self.resources.energy * factor, self.limits.max_resource);
    }

    pub(crate) fn add_oxygen(&mut self, amount: u32) {
        self.resources.oxygen = self
            .resources
            .oxygen
            .saturating_add(amount)
            .min(self.limits.max_oxygen);
    }

    pub(crate) fn add_credits(&mut self, amount: u32) {
        self.resources.credits = self.resources.credits.saturating_add(amount);
    }

    /// Debits credits only when the balance covers the amount.
    pub(crate) fn spend_credits(&mut self, amount: u32) -> bool {
        match self.resources.credits.checked_sub(amount) {
            Some(rest) => {
                self.resources.credits = rest;
                true
            }
            None => false,
        }
    }

    pub(crate) fn add_research_points(&mut self, amount: u32) {
        self.research_points = self.research_points.saturating_add(amount);
    }

    pub(crate) fn spend_research_points(&mut self, amount: u32) -> bool {
        match self.research_points.checked_sub(amount) {
            Some(rest) => {
                self.research_points = rest;
                true
            }
            None => false,
        }
    }

    pub(crate) fn change_temperature(&mut self, delta: f64) {
        self.environment.temperature += delta;
    }

    pub(crate) fn damage_plants(&mut self, amount: f64) {
        for plant in &mut self.plants {
            plant.health = (plant.health - amount).clamp(0.0, 100.0);
        }
    }
}

fn clamp_resource(value: f64, max: f64) -> f64 {
    value.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GardenState {
        GardenState::from_config(&GardenConfig::default())
    }

    #[test]
    fn starts_from_config_defaults() {
        let state = state();
        assert_eq!(state.water(), 100.0);
        assert_eq!(state.nutrients(), 100.0);
        assert_eq!(state.energy(), 100.0);
        assert_eq!(state.oxygen(), 100);
        assert_eq!(state.credits(), 200);
        assert_eq!(state.day(), 1);
        assert_eq!(state.free_slots(), 6);
        assert!(state.upgrades().none_unlocked());
    }

    #[test]
    fn initial_values_are_clamped() {
        let mut config = GardenConfig::default();
        config.initial.energy = 250.0;
        config.initial.water = -40.0;
        config.initial.nutrients = 100.5;
        config.initial.oxygen = 900;
        let state = GardenState::from_config(&config);
        assert_eq!(state.energy(), 100.0);
        assert_eq!(state.water(), 0.0);
        assert_eq!(state.nutrients(), 100.0);
        assert_eq!(state.oxygen(), 200);
    }

    #[test]
    fn mutators_clamp_into_bounds() {
        let mut state = state();
        state.change_water(50.0);
        assert_eq!(state.water(), 100.0);
        state.change_nutrients(-250.0);
        assert_eq!(state.nutrients(), 0.0);
        state.scale_energy(3.0);
        assert_eq!(state.energy(), 100.0);
        state.add_oxygen(1_000);
        assert_eq!(state.oxygen(), 200);
    }

    #[test]
    fn spending_more_than_balance_is_refused() {
        let mut state = state();
        assert!(!state.spend_credits(201));
        assert_eq!(state.credits(), 200);
        assert!(state.spend_credits(200));
        assert_eq!(state.credits(), 0);
        assert!(!state.spend_research_points(1));
    }

    #[test]
    fn temperature_effect_bands() {
        let mut env = Environment {
            temperature: 9.9,
            gravity: 0.38,
        };
        assert_eq!(env.temperature_effect(), -0.5);
        env.temperature = 35.1;
        assert_eq!(env.temperature_effect(), -1.0);
        env.temperature = 35.0;
        assert_eq!(env.temperature_effect(), 0.1);
        env.temperature = 10.0;
        assert_eq!(env.temperature_effect(), 0.1);
    }

    #[test]
    fn damage_never_goes_below_zero() {
        let mut state = state();
        state.plants.push(Plant::new(Species::NebulaRose));
        state.plants[0].health = 15.0;
        state.damage_plants(20.0);
        assert_eq!(state.plants()[0].health, 0.0);
    }
}
