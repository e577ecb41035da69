use anyhow::Result;

use crate::{
    farm::{ClickOutcome, Farm, Plot},
    rng::{RngManager, SystemRng},
    snapshot::FarmSnapshot,
    systems::{DayNightSystem, GrowthSystem, WeatherSystem},
};

const PLOTS_STREAM: &str = "plots";

pub struct EngineSettings {
    pub farm_name: String,
    pub seed: u64,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    /// Weather, day/night and growth, in that order.
    pub fn standard(settings: EngineSettings) -> Self {
        Self::new(settings)
            .with_system(WeatherSystem::new())
            .with_system(DayNightSystem::new())
            .with_system(GrowthSystem::new())
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            settings: self.settings,
        }
    }
}

/// Which systems fired on one time unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSummary {
    pub unit: u64,
    pub fired: Vec<String>,
}

impl UnitSummary {
    pub fn ran(&self, name: &str) -> bool {
        self.fired.iter().any(|fired| fired == name)
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    settings: EngineSettings,
}

impl Engine {
    pub fn farm_name(&self) -> &str {
        &self.settings.farm_name
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Moves the farm clock forward by one unit and runs every system whose
    /// period divides the new elapsed count.
    pub fn step(&mut self, farm: &mut Farm) -> Result<UnitSummary> {
        let unit = farm.advance_time();
        let mut fired = Vec::new();
        for system in &mut self.systems {
            let period = system.period();
            if period == 0 || unit % period != 0 {
                continue;
            }
            let mut rng_stream = self.rng.stream(system.name());
            let ctx = SystemContext {
                unit,
                farm_name: &self.settings.farm_name,
            };
            system.run(&ctx, farm, &mut rng_stream)?;
            fired.push(system.name().to_string());
        }
        Ok(UnitSummary { unit, fired })
    }

    pub fn advance(&mut self, farm: &mut Farm, units: u64) -> Result<()> {
        self.run_with_hook(farm, units, |_| {})
    }

    pub fn run_with_hook<F>(&mut self, farm: &mut Farm, units: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(FarmSnapshot),
    {
        for _ in 0..units {
            self.step(farm)?;
            hook(farm.snapshot(&self.settings.farm_name));
        }
        Ok(())
    }

    /// Clicks draw crop kinds from their own stream so planting never shifts
    /// the weather sequence.
    pub fn click(&mut self, farm: &mut Farm, plot: Plot) -> ClickOutcome {
        let mut rng_stream = self.rng.stream(PLOTS_STREAM);
        farm.click(plot, &mut rng_stream)
    }
}

pub struct SystemContext<'a> {
    pub unit: u64,
    pub farm_name: &'a str,
}

pub trait System: Send {
    fn name(&self) -> &str;

    /// Time units between runs. Zero disables the system.
    fn period(&self) -> u64;

    fn run(
        &mut self,
        ctx: &SystemContext,
        farm: &mut Farm,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}
