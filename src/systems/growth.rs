use anyhow::Result;
use tracing::trace;

use crate::{
    engine::{System, SystemContext},
    farm::Farm,
    rng::SystemRng,
};

pub const GROWTH_PERIOD_UNITS: u64 = 10;

/// Grows every crop by the increment for the weather in force when the tick
/// fires. The weather is read from the farm on each run, never cached.
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

    fn period(&self) -> u64 {
        GROWTH_PERIOD_UNITS
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        farm: &mut Farm,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let increment = farm.grow_crops();
        trace!(
            unit = ctx.unit,
            increment,
            crops = farm.crop_count(),
            ready = farm.ready_count(),
            "crops grew"
        );
        Ok(())
    }
}
