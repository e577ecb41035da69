use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    crop::{CropId, CropStage},
    farm::{Farm, Plot},
    weather::{WeatherCondition, WeatherEffect},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReadout {
    pub condition: WeatherCondition,
    pub label: String,
    pub temperature_c: i32,
    pub humidity_pct: u32,
    pub wind_speed_kmh: u32,
    pub effect: WeatherEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmStats {
    pub total: usize,
    pub ready: usize,
    pub growing: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropView {
    pub id: CropId,
    pub name: String,
    pub planted_at: DateTime<Utc>,
    pub growth_stage: f64,
    pub growth_percent: u32,
    pub harvest_ready: bool,
    pub stage: CropStage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotView {
    pub x: u32,
    pub y: u32,
    pub selected: bool,
    pub label: String,
    pub crop: Option<CropView>,
}

/// Read-only rendering of the farm at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmSnapshot {
    pub farm: String,
    pub elapsed_units: u64,
    pub weather: WeatherReadout,
    pub is_day: bool,
    pub phase: String,
    pub stats: FarmStats,
    pub selected: Option<Plot>,
    pub plots: Vec<PlotView>,
}

impl FarmSnapshot {
    pub fn capture(farm_name: &str, farm: &Farm) -> Self {
        let weather = farm.weather();
        let selected = farm.selected();
        let plots = Plot::all()
            .map(|plot| {
                let is_selected = selected == Some(plot);
                let crop = farm.crop_at(plot).map(|crop| CropView {
                    id: crop.id(),
                    name: crop.kind().label().to_string(),
                    planted_at: crop.planted_at(),
                    growth_stage: crop.growth_stage(),
                    growth_percent: crop.growth_percent(),
                    harvest_ready: crop.harvest_ready(),
                    stage: crop.stage(),
                });
                let label = match (&crop, is_selected) {
                    (Some(crop), _) => crop.name.clone(),
                    (None, true) => "Plant".to_string(),
                    (None, false) => "Empty".to_string(),
                };
                PlotView {
                    x: plot.x(),
                    y: plot.y(),
                    selected: is_selected,
                    label,
                    crop,
                }
            })
            .collect();

        Self {
            farm: farm_name.to_string(),
            elapsed_units: farm.elapsed_units(),
            weather: WeatherReadout {
                condition: weather.condition,
                label: weather.condition.label().to_string(),
                temperature_c: weather.temperature_c,
                humidity_pct: weather.humidity_pct,
                wind_speed_kmh: weather.wind_speed_kmh,
                effect: weather.condition.effect(),
            },
            is_day: farm.is_day(),
            phase: if farm.is_day() { "Day" } else { "Night" }.to_string(),
            stats: FarmStats {
                total: farm.crop_count(),
                ready: farm.ready_count(),
                growing: farm.growing_count(),
            },
            selected,
            plots,
        }
    }

    pub fn plot(&self, plot: Plot) -> &PlotView {
        &self.plots[plot.index()]
    }
}
