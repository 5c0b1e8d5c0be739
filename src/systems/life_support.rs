use anyhow::Result;
use tracing::warn;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    state::GardenState,
};

/// Recomputes the low-oxygen warning and ends the session when the air runs
/// out.
pub struct LifeSupportSystem;

impl LifeSupportSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LifeSupportSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for LifeSupportSystem {
    fn name(&self) -> &str {
        "life_support"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        state: &mut GardenState,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let oxygen = state.oxygen();
        state.oxygen_warning = oxygen < state.limits().low_oxygen_threshold;
        if oxygen == 0 && !state.game_over {
            state.game_over = true;
            warn!(tick = ctx.tick, day = state.day(), "oxygen depleted, game over");
        }
        Ok(())
    }
}
