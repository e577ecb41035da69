use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::farm::Plot;

pub const MAX_GROWTH: f64 = 100.0;
const MATURING_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropId(u64);

impl CropId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crop-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropKind {
    Rice,
    Wheat,
    Millet,
    Cotton,
    Sugarcane,
}

impl CropKind {
    pub const ALL: [CropKind; 5] = [
        CropKind::Rice,
        CropKind::Wheat,
        CropKind::Millet,
        CropKind::Cotton,
        CropKind::Sugarcane,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn label(self) -> &'static str {
        match self {
            CropKind::Rice => "Rice",
            CropKind::Wheat => "Wheat",
            CropKind::Millet => "Millet",
            CropKind::Cotton => "Cotton",
            CropKind::Sugarcane => "Sugarcane",
        }
    }
}

impl fmt::Display for CropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropStage {
    Sprouting,
    Maturing,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    id: CropId,
    kind: CropKind,
    planted_at: DateTime<Utc>,
    growth_stage: f64,
    plot: Plot,
}

impl Crop {
    pub(crate) fn new(id: CropId, kind: CropKind, plot: Plot, planted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind,
            planted_at,
            growth_stage: 0.0,
            plot,
        }
    }

    pub fn id(&self) -> CropId {
        self.id
    }

    pub fn kind(&self) -> CropKind {
        self.kind
    }

    pub fn planted_at(&self) -> DateTime<Utc> {
        self.planted_at
    }

    pub fn growth_stage(&self) -> f64 {
        self.growth_stage
    }

    pub fn plot(&self) -> Plot {
        self.plot
    }

    pub fn x(&self) -> u32 {
        self.plot.x()
    }

    pub fn y(&self) -> u32 {
        self.plot.y()
    }

    /// Derived from growth on every read; there is no separate flag to drift.
    pub fn harvest_ready(&self) -> bool {
        self.growth_stage >= MAX_GROWTH
    }

    pub fn stage(&self) -> CropStage {
        if self.harvest_ready() {
            CropStage::Ready
        } else if self.growth_stage > MATURING_THRESHOLD {
            CropStage::Maturing
        } else {
            CropStage::Sprouting
        }
    }

    pub fn growth_percent(&self) -> u32 {
        self.growth_stage.round() as u32
    }

    pub(crate) fn grow(&mut self, increment: f64) {
        self.growth_stage = (self.growth_stage + increment.max(0.0)).min(MAX_GROWTH);
    }
}
