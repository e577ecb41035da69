use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    farm::Farm,
    rng::SystemRng,
};

pub const DAY_NIGHT_PERIOD_UNITS: u64 = 30;

pub struct DayNightSystem;

impl DayNightSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DayNightSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for DayNightSystem {
    fn name(&self) -> &str {
        "day_night"
    }

    fn period(&self) -> u64 {
        DAY_NIGHT_PERIOD_UNITS
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        farm: &mut Farm,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        farm.toggle_phase();
        Ok(())
    }
}
