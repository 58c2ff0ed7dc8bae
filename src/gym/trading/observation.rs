use std::ops::Index;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::{
    data::{domain::Quantity, record::MarketRecord},
    gym::trading::config::ObservationScaling,
};

/// Named positions of the observation vector, in wire order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    EnumCount,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ObservationFeature {
    Open,
    High,
    Low,
    Close,
    Volume,
    MovingAverage,
    Momentum,
    Position,
}

/// Normalized 8-dimensional feature vector of the current record and account position.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation(Array1<f32>);

impl Observation {
    pub const DIM: usize = ObservationFeature::COUNT;

    /// The all-zero vector emitted once the cursor has run past the feed.
    pub fn zeros() -> Self {
        Self(Array1::zeros(Self::DIM))
    }

    pub fn from_record(
        record: &MarketRecord,
        anchor: f64,
        position: Quantity,
        scaling: &ObservationScaling,
    ) -> Self {
        let features = [
            record.open.0 / anchor,
            record.high.0 / anchor,
            record.low.0 / anchor,
            record.close.0 / anchor,
            record.volume.0 / scaling.volume,
            record.moving_average.0 / anchor,
            record.momentum.0 / scaling.momentum,
            position.0 / scaling.position,
        ];
        Self(features.iter().map(|&x| x as f32).collect())
    }

    pub fn get(&self, feature: ObservationFeature) -> f32 {
        self.0[feature as usize]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&x| x == 0.0)
    }

    pub fn as_array(&self) -> &Array1<f32> {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.0.to_vec()
    }
}

impl Index<ObservationFeature> for Observation {
    type Output = f32;

    fn index(&self, feature: ObservationFeature) -> &Self::Output {
        &self.0[feature as usize]
    }
}

impl From<Observation> for Vec<f32> {
    fn from(obs: Observation) -> Self {
        obs.0.to_vec()
    }
}
