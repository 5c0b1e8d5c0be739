use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    state::GardenState,
};

const BASE_DRAW: f64 = 0.5;
const DRAW_PER_PLANT: f64 = 0.2;

/// Greenhouse systems draw energy every tick, more with each planted slot.
pub struct UpkeepSystem;

impl UpkeepSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UpkeepSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for UpkeepSystem {
    fn name(&self) -> &str {
        "upkeep"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        state: &mut GardenState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let draw = BASE_DRAW + DRAW_PER_PLANT * state.plant_count() as f64;
        state.change_energy(-draw);
        Ok(())
    }
}
