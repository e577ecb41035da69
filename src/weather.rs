use std::fmt;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TEMPERATURE_RANGE_C: RangeInclusive<i32> = 20..=34;
pub const HUMIDITY_RANGE_PCT: RangeInclusive<u32> = 40..=79;
pub const WIND_SPEED_RANGE_KMH: RangeInclusive<u32> = 5..=24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Rainy,
    Cloudy,
    Storm,
}

impl WeatherCondition {
    pub const ALL: [WeatherCondition; 4] = [
        WeatherCondition::Sunny,
        WeatherCondition::Rainy,
        WeatherCondition::Cloudy,
        WeatherCondition::Storm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "Sunny",
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::Storm => "Storm",
        }
    }

    /// Growth points added to every crop on one growth tick.
    pub fn growth_increment(self) -> f64 {
        match self {
            WeatherCondition::Rainy => 2.0,
            WeatherCondition::Sunny => 1.5,
            WeatherCondition::Storm => 0.5,
            WeatherCondition::Cloudy => 1.0,
        }
    }

    pub fn effect(self) -> WeatherEffect {
        match self {
            WeatherCondition::Rainy => WeatherEffect::Boost,
            WeatherCondition::Storm => WeatherEffect::Slow,
            WeatherCondition::Sunny | WeatherCondition::Cloudy => WeatherEffect::Normal,
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherEffect {
    Boost,
    Slow,
    Normal,
}

impl WeatherEffect {
    pub fn label(self) -> &'static str {
        match self {
            WeatherEffect::Boost => "Boost",
            WeatherEffect::Slow => "Slow",
            WeatherEffect::Normal => "Normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    pub condition: WeatherCondition,
    pub temperature_c: i32,
    pub humidity_pct: u32,
    pub wind_speed_kmh: u32,
}

impl Weather {
    /// Draws a fresh reading. Every field is sampled independently and
    /// uniformly from its range.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let condition = WeatherCondition::ALL[rng.gen_range(0..WeatherCondition::ALL.len())];
        Self {
            condition,
            temperature_c: rng.gen_range(TEMPERATURE_RANGE_C),
            humidity_pct: rng.gen_range(HUMIDITY_RANGE_PCT),
            wind_speed_kmh: rng.gen_range(WIND_SPEED_RANGE_KMH),
        }
    }

    pub fn with_condition(mut self, condition: WeatherCondition) -> Self {
        self.condition = condition;
        self
    }

    pub fn growth_increment(&self) -> f64 {
        self.condition.growth_increment()
    }
}

impl Default for Weather {
    fn default() -> Self {
        Self {
            condition: WeatherCondition::Sunny,
            temperature_c: 28,
            humidity_pct: 65,
            wind_speed_kmh: 12,
        }
    }
}
