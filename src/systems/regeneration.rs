use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    state::GardenState,
    upgrades::Upgrade,
};

const RECYCLED_WATER: f64 = 0.3;
const SOLAR_ENERGY: f64 = 1.0;

pub struct RegenerationSystem;

impl RegenerationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RegenerationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RegenerationSystem {
    fn name(&self) -> &str {
        "regeneration"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        state: &mut GardenState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        if state.has_upgrade(Upgrade::WaterRecycler) {
            state.change_water(RECYCLED_WATER);
        }
        if state.has_upgrade(Upgrade::SolarPanels) {
            state.change_energy(SOLAR_ENERGY);
        }
        Ok(())
    }
}
