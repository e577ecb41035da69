use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    farm::Farm,
    rng::SystemRng,
    weather::Weather,
};

pub const WEATHER_PERIOD_UNITS: u64 = 45;

/// Replaces the farm's weather with a fresh random reading.
pub struct WeatherSystem;

impl WeatherSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WeatherSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for WeatherSystem {
    fn name(&self) -> &str {
        "weather"
    }

    fn period(&self) -> u64 {
        WEATHER_PERIOD_UNITS
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        farm: &mut Farm,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        farm.set_weather(Weather::generate(rng));
        Ok(())
    }
}
