use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{rng::RngExt, state::GardenState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TemperatureSwing,
    SolarFlare,
    WaterLeak,
    ScienceMission,
    SpaceDebris,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::TemperatureSwing,
        EventKind::SolarFlare,
        EventKind::WaterLeak,
        EventKind::ScienceMission,
        EventKind::SpaceDebris,
    ];

    /// Uniform pick over the event table.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Fixes any random parameters of the event.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> RandomEvent {
        match self {
            EventKind::TemperatureSwing => RandomEvent::TemperatureSwing {
                delta: if rng.random_bool(0.5) { 10.0 } else { -10.0 },
            },
            EventKind::SolarFlare => RandomEvent::SolarFlare { energy_factor: 0.7 },
            EventKind::WaterLeak => RandomEvent::WaterLeak { water_factor: 0.8 },
            EventKind::ScienceMission => RandomEvent::ScienceMission {
                research_points: 10,
            },
            EventKind::SpaceDebris => RandomEvent::SpaceDebris { damage: 20.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RandomEvent {
    TemperatureSwing { delta: f64 },
    SolarFlare { energy_factor: f64 },
    WaterLeak { water_factor: f64 },
    ScienceMission { research_points: u32 },
    SpaceDebris { damage: f64 },
}

impl RandomEvent {
    /// Rolls the daily event check; `None` when nothing happens.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> Option<Self> {
        if rng.random_bool(chance) {
            Some(EventKind::choose(rng).resolve(rng))
        } else {
            None
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            RandomEvent::TemperatureSwing { .. } => EventKind::TemperatureSwing,
            RandomEvent::SolarFlare { .. } => EventKind::SolarFlare,
            RandomEvent::WaterLeak { .. } => EventKind::WaterLeak,
            RandomEvent::ScienceMission { .. } => EventKind::ScienceMission,
            RandomEvent::SpaceDebris { .. } => EventKind::SpaceDebris,
        }
    }

    pub fn apply(&self, state: &mut GardenState) {
        match *self {
            RandomEvent::TemperatureSwing { delta } => state.change_temperature(delta),
            RandomEvent::SolarFlare { energy_factor } => state.scale_energy(energy_factor),
            RandomEvent::WaterLeak { water_factor } => state.scale_water(water_factor),
            RandomEvent::ScienceMission { research_points } => {
                state.add_research_points(research_points)
            }
            RandomEvent::SpaceDebris { damage } => state.damage_plants(damage),
        }
    }

    pub fn message(&self) -> String {
        match *self {
            RandomEvent::TemperatureSwing { delta } => {
                format!("Temperature swing! Temperature changed by {delta:+.0} degrees")
            }
            RandomEvent::SolarFlare { energy_factor } => format!(
                "Solar flare! -{:.0}% energy",
                (1.0 - energy_factor) * 100.0
            ),
            RandomEvent::WaterLeak { water_factor } => format!(
                "Water leak! Lost {:.0}% of water",
                (1.0 - water_factor) * 100.0
            ),
            RandomEvent::ScienceMission { research_points } => {
                format!("Science mission! +{research_points} research points")
            }
            RandomEvent::SpaceDebris { .. } => "Space debris! Plants damaged".to_string(),
        }
    }
}

/// Outcome of one day advancement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    pub day: u32,
    pub temperature_delta: f64,
    pub event: Option<RandomEvent>,
    pub research_gained: u32,
}

impl DayReport {
    pub fn message(&self) -> Option<String> {
        self.event.map(|event| event.message())
    }
}
