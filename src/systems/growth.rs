use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    state::GardenState,
};

/// Per-plant pass: growth, water and nutrient draw, temperature stress,
/// oxygen output. Plants are visited in registry order and each resource is
/// clamped after every plant.
pub struct GrowthSystem;

impl GrowthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrowthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GrowthSystem {
    fn name(&self) -> &str {
        "growth"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        state: &mut GardenState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let multiplier = state.environment.growth_multiplier();
        let temperature = state.environment.temperature;
        let health_delta = state.environment.temperature_effect();

        for index in 0..state.plants.len() {
            let species = state.plants[index].species;
            let def = species.definition();

            let produces_oxygen = {
                let plant = &mut state.plants[index];
                plant.growth = (plant.growth + def.growth_rate * multiplier).min(100.0);
                plant.health = (plant.health + health_delta).clamp(0.0, 100.0);
                plant.produces_oxygen()
            };

            state.change_water(-(def.water_consumption * (temperature / 20.0)));
            state.change_nutrients(-(def.water_consumption * 0.5));

            if produces_oxygen {
                state.add_oxygen(def.oxygen_production);
            }
        }
        Ok(())
    }
}
