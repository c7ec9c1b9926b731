//! Perception module: tracking of moving obstacles
pub mod prediction;

use self::prediction::advance;
use crate::common::{Obstacle, TrackedObstacle};

/// Tracks moving obstacles and predicts where they will be next cycle
#[derive(Debug, Clone, Default)]
pub struct ObstacleTracker {
    tracked: Vec<TrackedObstacle>,
}

impl ObstacleTracker {
    /// Create a new tracker
    pub fn new(tracked: Vec<TrackedObstacle>) -> Self {
        ObstacleTracker { tracked }
    }

    /// Advance every tracked obstacle in place by `dt`
    pub fn predict(&mut self, dt: f64) {
        for entry in &mut self.tracked {
            entry.obstacle = advance(entry.obstacle, entry.velocity, dt);
        }
    }

    /// Current obstacle set, in tracking order
    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.tracked.iter().map(|t| t.obstacle).collect()
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }
}
