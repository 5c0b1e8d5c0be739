use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::{
    rng::{RngManager, SystemRng},
    state::GardenState,
    systems::{GrowthSystem, LifeSupportSystem, RegenerationSystem, UpkeepSystem},
};

pub struct SystemContext {
    pub tick: u64,
}

pub trait System: Send {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        state: &mut GardenState,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

#[derive(Clone, Debug, Serialize)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct TickSummary {
    pub tick: u64,
    /// False when the session was already over and nothing ran.
    pub ran: bool,
    pub system_reports: Vec<SystemRunReport>,
    pub oxygen_warning: bool,
    pub game_over: bool,
}

#[derive(Default)]
pub struct EngineBuilder {
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            systems: self.systems,
            tick: 0,
        }
    }
}

/// Runs the tick systems in registration order.
pub struct Engine {
    systems: Vec<Box<dyn System>>,
    tick: u64,
}

impl Engine {
    /// Growth, upkeep, regeneration, then the oxygen check.
    pub fn standard() -> Self {
        EngineBuilder::new()
            .with_system(GrowthSystem::new())
            .with_system(UpkeepSystem::new())
            .with_system(RegenerationSystem::new())
            .with_system(LifeSupportSystem::new())
            .build()
    }

    pub fn tick(&mut self, state: &mut GardenState, rng: &mut RngManager) -> Result<TickSummary> {
        if state.is_game_over() {
            return Ok(TickSummary {
                tick: self.tick,
                ran: false,
                system_reports: Vec::new(),
                oxygen_warning: state.oxygen_warning(),
                game_over: true,
            });
        }

        self.tick += 1;
        let ctx = SystemContext { tick: self.tick };
        let mut system_reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let start = Instant::now();
            let mut stream = rng.stream(system.name());
            system
                .run(&ctx, state, &mut stream)
                .with_context(|| format!("system '{}' failed on tick {}", system.name(), ctx.tick))?;
            system_reports.push(SystemRunReport {
                name: system.name().to_string(),
                duration_ms: start.elapsed().as_secs_f64() * 1_000.0,
            });
        }

        debug!(
            tick = self.tick,
            water = state.water(),
            energy = state.energy(),
            oxygen = state.oxygen(),
            plants = state.plant_count(),
            "tick complete"
        );

        Ok(TickSummary {
            tick: self.tick,
            ran: true,
            system_reports,
            oxygen_warning: state.oxygen_warning(),
            game_over: state.is_game_over(),
        })
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn reset(&mut self) {
        self.tick = 0;
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }
}
