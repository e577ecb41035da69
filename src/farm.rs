use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    crop::{Crop, CropId, CropKind},
    error::FarmError,
    snapshot::FarmSnapshot,
    weather::Weather,
};

pub const GRID_COLUMNS: u32 = 6;
pub const GRID_ROWS: u32 = 4;
pub const PLOT_COUNT: usize = (GRID_COLUMNS * GRID_ROWS) as usize;

/// A grid coordinate known to lie inside the farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPlot")]
pub struct Plot {
    x: u32,
    y: u32,
}

#[derive(Deserialize)]
struct RawPlot {
    x: u32,
    y: u32,
}

impl TryFrom<RawPlot> for Plot {
    type Error = FarmError;

    fn try_from(raw: RawPlot) -> Result<Self, Self::Error> {
        Plot::new(raw.x, raw.y)
    }
}

impl Plot {
    pub fn new(x: u32, y: u32) -> Result<Self, FarmError> {
        if x >= GRID_COLUMNS || y >= GRID_ROWS {
            return Err(FarmError::OutOfBounds {
                x,
                y,
                columns: GRID_COLUMNS,
                rows: GRID_ROWS,
            });
        }
        Ok(Self { x, y })
    }

    pub fn x(self) -> u32 {
        self.x
    }

    pub fn y(self) -> u32 {
        self.y
    }

    /// Row-major position, matching the order plots are rendered in.
    pub fn index(self) -> usize {
        (self.y * GRID_COLUMNS + self.x) as usize
    }

    pub fn all() -> impl Iterator<Item = Plot> {
        (0..GRID_ROWS).flat_map(|y| (0..GRID_COLUMNS).map(move |x| Plot { x, y }))
    }
}

impl Ord for Plot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index().cmp(&other.index())
    }
}

impl PartialOrd for Plot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClickOutcome {
    Selected { plot: Plot },
    Planted { plot: Plot, crop: CropId, kind: CropKind },
    Harvested { plot: Plot, crop: CropId, kind: CropKind },
    Ignored { plot: Plot },
}

pub struct Farm {
    next_crop: u64,
    elapsed_units: u64,
    weather: Weather,
    is_day: bool,
    selected: Option<Plot>,
    crops: BTreeMap<Plot, Crop>,
}

impl Farm {
    pub fn new() -> Self {
        Self {
            next_crop: 0,
            elapsed_units: 0,
            weather: Weather::default(),
            is_day: true,
            selected: None,
            crops: BTreeMap::new(),
        }
    }

    pub fn elapsed_units(&self) -> u64 {
        self.elapsed_units
    }

    pub(crate) fn advance_time(&mut self) -> u64 {
        self.elapsed_units += 1;
        self.elapsed_units
    }

    pub fn weather(&self) -> &Weather {
        &self.weather
    }

    /// Replaces the reading wholesale.
    pub fn set_weather(&mut self, weather: Weather) {
        debug!(
            condition = %weather.condition,
            temperature_c = weather.temperature_c,
            humidity_pct = weather.humidity_pct,
            wind_speed_kmh = weather.wind_speed_kmh,
            "weather changed"
        );
        self.weather = weather;
    }

    pub fn is_day(&self) -> bool {
        self.is_day
    }

    pub fn toggle_phase(&mut self) -> bool {
        self.is_day = !self.is_day;
        debug!(is_day = self.is_day, "day/night phase flipped");
        self.is_day
    }

    pub fn selected(&self) -> Option<Plot> {
        self.selected
    }

    pub fn crop_at(&self, plot: Plot) -> Option<&Crop> {
        self.crops.get(&plot)
    }

    /// Crops in row-major plot order.
    pub fn crops(&self) -> impl Iterator<Item = &Crop> {
        self.crops.values()
    }

    pub fn crop_count(&self) -> usize {
        self.crops.len()
    }

    pub fn ready_count(&self) -> usize {
        self.crops.values().filter(|crop| crop.harvest_ready()).count()
    }

    pub fn growing_count(&self) -> usize {
        self.crop_count() - self.ready_count()
    }

    /// Advances every crop by the increment for the weather current right now.
    pub fn grow_crops(&mut self) -> f64 {
        let increment = self.weather.growth_increment();
        for crop in self.crops.values_mut() {
            crop.grow(increment);
        }
        increment
    }

    /// Applies one click to the plot state machine.
    ///
    /// An empty plot needs two clicks to plant: the first selects it, the
    /// second (on the same plot) confirms. Clicking another empty plot moves
    /// the selection. A ready crop is harvested by a click; a growing one
    /// ignores it.
    pub fn click<R: Rng + ?Sized>(&mut self, plot: Plot, rng: &mut R) -> ClickOutcome {
        if let Some(crop) = self.crops.get(&plot) {
            if !crop.harvest_ready() {
                return ClickOutcome::Ignored { plot };
            }
            return self.harvest(plot);
        }

        if self.selected == Some(plot) {
            self.plant(plot, CropKind::random(rng))
        } else {
            self.selected = Some(plot);
            ClickOutcome::Selected { plot }
        }
    }

    fn plant(&mut self, plot: Plot, kind: CropKind) -> ClickOutcome {
        let id = self.allocate();
        self.crops.insert(plot, Crop::new(id, kind, plot, Utc::now()));
        self.selected = None;
        info!(crop = id.raw(), kind = %kind, x = plot.x, y = plot.y, "crop planted");
        ClickOutcome::Planted {
            plot,
            crop: id,
            kind,
        }
    }

    fn harvest(&mut self, plot: Plot) -> ClickOutcome {
        match self.crops.remove(&plot) {
            Some(crop) => {
                self.selected = None;
                info!(
                    crop = crop.id().raw(),
                    kind = %crop.kind(),
                    x = plot.x,
                    y = plot.y,
                    "crop harvested"
                );
                ClickOutcome::Harvested {
                    plot,
                    crop: crop.id(),
                    kind: crop.kind(),
                }
            }
            None => ClickOutcome::Ignored { plot },
        }
    }

    pub fn snapshot(&self, farm_name: &str) -> FarmSnapshot {
        FarmSnapshot::capture(farm_name, self)
    }

    fn allocate(&mut self) -> CropId {
        self.next_crop += 1;
        CropId::new(self.next_crop)
    }
}

impl Default for Farm {
    fn default() -> Self {
        Self::new()
    }
}
