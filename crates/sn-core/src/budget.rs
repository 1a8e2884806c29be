//! Travel budget: how far the search buffer reaches.
//!
//! The search radius is `max_cutoff_secs × speed_mps`, i.e. the farthest a
//! traveller at constant speed could get within the cutoff.

use crate::{CoreError, CoreResult};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TravelBudget {
    /// Travel-time cutoff in seconds.
    pub max_cutoff_secs: f64,
    /// Travel speed in metres per second.
    pub speed_mps: f64,
}

impl TravelBudget {
    /// Fails with [`CoreError::InvalidBudget`] unless both values are
    /// positive and finite.
    pub fn new(max_cutoff_secs: f64, speed_mps: f64) -> CoreResult<Self> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(max_cutoff_secs) && positive(speed_mps)) {
            return Err(CoreError::InvalidBudget { max_cutoff_secs, speed_mps });
        }
        Ok(Self { max_cutoff_secs, speed_mps })
    }

    /// Build a budget from user-facing units: minutes and km/h.
    pub fn from_minutes_kmh(minutes: f64, speed_kmh: f64) -> CoreResult<Self> {
        Self::new(minutes * 60.0, speed_kmh / 3.6)
    }

    /// Radius of the search buffer in metres.
    #[inline]
    pub fn search_radius_m(&self) -> f64 {
        self.max_cutoff_secs * self.speed_mps
    }
}
