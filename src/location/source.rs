use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::geo::GeoPoint;

/// Full width of the per-axis random walk step, in degrees.
/// Each axis moves by `(u - 0.5) * RANDOM_WALK_STEP_DEGREES` with `u` in [0, 1).
pub const RANDOM_WALK_STEP_DEGREES: f64 = 0.00015;

/// Position source trait
///
/// Implementations:
/// - Random walk: synthetic GPS jitter around the previous fix (seedable)
/// - Scripted: replays a fixed route (for deterministic tests and demos)
pub trait LocationSource: Send {
    /// Produce the next position given the current one
    fn next_position(&mut self, current: GeoPoint) -> GeoPoint;

    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Random-walk position simulator backed by a seedable RNG
pub struct RandomWalkSource {
    rng: StdRng,
    step_degrees: f64,
}

impl RandomWalkSource {
    /// Reproducible source: the same seed always yields the same walk
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            step_degrees: RANDOM_WALK_STEP_DEGREES,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            step_degrees: RANDOM_WALK_STEP_DEGREES,
        }
    }

    fn offset(&mut self) -> f64 {
        (self.rng.gen::<f64>() - 0.5) * self.step_degrees
    }
}

impl LocationSource for RandomWalkSource {
    fn next_position(&mut self, current: GeoPoint) -> GeoPoint {
        let latitude = current.latitude + self.offset();
        let longitude = current.longitude + self.offset();
        GeoPoint {
            latitude,
            longitude,
        }
    }

    fn name(&self) -> &str {
        "random-walk"
    }
}

/// Replays a fixed list of positions, then holds the last one
pub struct ScriptedSource {
    route: Vec<GeoPoint>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(route: Vec<GeoPoint>) -> Self {
        Self { route, cursor: 0 }
    }

    /// Number of scripted positions not yet replayed
    pub fn remaining(&self) -> usize {
        self.route.len().saturating_sub(self.cursor)
    }
}

impl LocationSource for ScriptedSource {
    fn next_position(&mut self, current: GeoPoint) -> GeoPoint {
        match self.route.get(self.cursor) {
            Some(point) => {
                self.cursor += 1;
                *point
            }
            None => {
                debug!("Scripted route exhausted, holding position");
                current
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Location source type
#[derive(Debug, Clone)]
pub enum LocationSourceKind {
    /// Seeded or entropy-backed random walk
    RandomWalk { seed: Option<u64> },
    /// Fixed route replay
    Scripted(Vec<GeoPoint>),
}

/// Location source factory
pub struct LocationSourceFactory;

impl LocationSourceFactory {
    pub fn create(kind: LocationSourceKind) -> Result<Box<dyn LocationSource>> {
        match kind {
            LocationSourceKind::RandomWalk { seed: Some(seed) } => {
                Ok(Box::new(RandomWalkSource::seeded(seed)))
            }
            LocationSourceKind::RandomWalk { seed: None } => {
                Ok(Box::new(RandomWalkSource::from_entropy()))
            }
            LocationSourceKind::Scripted(route) => {
                if route.is_empty() {
                    anyhow::bail!("Scripted location source needs at least one position");
                }
                Ok(Box::new(ScriptedSource::new(route)))
            }
        }
    }
}
