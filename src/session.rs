use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    commerce::Harvest,
    config::{ConfigError, GardenConfig},
    engine::{Engine, TickSummary},
    events::{DayReport, RandomEvent},
    rng::{RngExt, RngManager, EVENT_STREAM, WEATHER_STREAM},
    shop::ShopItem,
    snapshot::{SessionSnapshot, SnapshotWriter},
    species::Species,
    state::{GardenState, Plant},
    upgrades::Upgrade,
};

const DAILY_ENERGY: f64 = 10.0;
const DAILY_SOLAR_ENERGY: f64 = 20.0;
const DAILY_TEMPERATURE_DRIFT: f64 = 5.0;

/// A user intent relayed from the host into the session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Intent {
    BuyPlant { species: Species },
    CollectHarvest,
    RemovePlant { index: usize },
    Restock { item: ShopItem },
    Research { upgrade: Upgrade },
    AdvanceDay,
    Reset,
}

/// Owns the garden state and is the only thing that mutates it.
pub struct Session {
    config: GardenConfig,
    state: GardenState,
    engine: Engine,
    rng: RngManager,
    snapshot_writer: SnapshotWriter,
    last_event: Option<RandomEvent>,
}

impl Session {
    /// Fails when the configuration is out of range, so configs built in
    /// code get the same checks as the YAML loader.
    pub fn new(config: GardenConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GardenState::from_config(&config);
        let rng = RngManager::new(config.seed);
        let snapshot_writer = SnapshotWriter::new(&config.snapshot);
        Ok(Self {
            config,
            state,
            engine: Engine::standard(),
            rng,
            snapshot_writer,
            last_event: None,
        })
    }

    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    pub fn state(&self) -> &GardenState {
        &self.state
    }

    pub fn current_tick(&self) -> u64 {
        self.engine.current_tick()
    }

    pub fn last_event(&self) -> Option<&RandomEvent> {
        self.last_event.as_ref()
    }

    pub fn tick(&mut self) -> Result<TickSummary> {
        let summary = self.engine.tick(&mut self.state, &mut self.rng)?;
        if summary.ran {
            let snapshot = self.snapshot();
            self.snapshot_writer.maybe_write(summary.tick, &snapshot)?;
        }
        Ok(summary)
    }

    pub fn advance_day(&mut self) -> Option<DayReport> {
        if self.state.is_game_over() {
            debug!("day advance ignored, session is over");
            return None;
        }
        let temperature_delta = self
            .rng
            .stream(WEATHER_STREAM)
            .random_f64(-DAILY_TEMPERATURE_DRIFT, DAILY_TEMPERATURE_DRIFT);
        let event = RandomEvent::roll(&mut self.rng.stream(EVENT_STREAM), self.config.event_chance);
        Some(self.apply_day(temperature_delta, event))
    }

    /// Day advancement drawing everything from one caller-supplied source.
    pub fn advance_day_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<DayReport> {
        if self.state.is_game_over() {
            debug!("day advance ignored, session is over");
            return None;
        }
        let temperature_delta = rng.random_f64(-DAILY_TEMPERATURE_DRIFT, DAILY_TEMPERATURE_DRIFT);
        let event = RandomEvent::roll(rng, self.config.event_chance);
        Some(self.apply_day(temperature_delta, event))
    }

    fn apply_day(&mut self, temperature_delta: f64, event: Option<RandomEvent>) -> DayReport {
        let state = &mut self.state;
        state.day += 1;
        if state.has_upgrade(Upgrade::SolarPanels) {
            state.change_energy(DAILY_SOLAR_ENERGY);
        } else {
            state.change_energy(DAILY_ENERGY);
        }
        state.change_temperature(temperature_delta);

        if let Some(event) = event {
            event.apply(state);
            info!(day = state.day, kind = ?event.kind(), "{}", event.message());
        }
        self.last_event = event;

        let research_gained = state.plant_count() as u32;
        state.add_research_points(research_gained);

        info!(
            day = state.day,
            temperature = state.temperature(),
            research_points = state.research_points(),
            "day advanced"
        );
        DayReport {
            day: state.day,
            temperature_delta,
            event,
            research_gained,
        }
    }

    pub fn buy_plant(&mut self, species: Species) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        let applied = self.state.buy_plant(species);
        if !applied {
            debug!(%species, credits = self.state.credits(), "cannot afford plant");
        }
        applied
    }

    pub fn collect_harvest(&mut self) -> Harvest {
        if self.state.is_game_over() {
            return Harvest::default();
        }
        let harvest = self.state.collect_harvest();
        if harvest.plants > 0 {
            info!(
                plants = harvest.plants,
                credits = harvest.credits,
                oxygen = harvest.oxygen,
                "harvest collected"
            );
        }
        harvest
    }

    pub fn remove_plant(&mut self, index: usize) -> Option<Plant> {
        if self.state.is_game_over() {
            return None;
        }
        self.state.remove_plant(index)
    }

    pub fn restock(&mut self, item: ShopItem) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        let applied = self.state.restock(item);
        if !applied {
            debug!(?item, credits = self.state.credits(), "cannot afford restock");
        }
        applied
    }

    pub fn purchase_upgrade(&mut self, upgrade: Upgrade) -> bool {
        if self.state.is_game_over() {
            return false;
        }
        let applied = self.state.purchase_upgrade(upgrade);
        if applied {
            info!(%upgrade, "upgrade unlocked");
        } else {
            debug!(%upgrade, research_points = self.state.research_points(), "upgrade refused");
        }
        applied
    }

    /// Back to the configured starting point. The random streams restart
    /// too, so a reset session replays like a fresh one.
    pub fn reset(&mut self) {
        self.state = GardenState::from_config(&self.config);
        self.engine.reset();
        self.rng.reseed();
        self.last_event = None;
        info!(name = %self.config.name, "session reset");
    }

    /// Applies one intent; true when it changed the session.
    pub fn apply(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::BuyPlant { species } => self.buy_plant(species),
            Intent::CollectHarvest => self.collect_harvest().plants > 0,
            Intent::RemovePlant { index } => self.remove_plant(index).is_some(),
            Intent::Restock { item } => self.restock(item),
            Intent::Research { upgrade } => self.purchase_upgrade(upgrade),
            Intent::AdvanceDay => self.advance_day().is_some(),
            Intent::Reset => {
                self.reset();
                true
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(
            &self.config.name,
            self.engine.current_tick(),
            &self.state,
            self.last_event.as_ref(),
        )
    }
}
