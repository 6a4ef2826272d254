//! Navigation configuration

use crate::error::{NavigationError, Result};
use serde::{Deserialize, Serialize};

/// Tuning for the behaviors built by the composer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Distance to the path end at which the agent counts as arrived
    pub arrival_tolerance: f32,

    /// Distance to the path end at which the agent starts slowing down
    pub deceleration_radius: f32,

    /// How far ahead along the path the follower aims
    pub path_offset: f32,

    /// Time over which arrive tries to reach its target velocity
    pub time_to_target: f32,

    /// Minimum output magnitude for a priority entry to win
    pub priority_epsilon: f32,

    /// Build a face-target behavior for requests without a usable path
    pub facing_enabled: bool,

    /// Angle (rad) below which the agent counts as facing its target
    pub align_tolerance: f32,

    /// Angle (rad) at which turning starts to slow down
    pub face_deceleration_radius: f32,

    /// Time over which face-target tries to reach its target rotation
    pub face_time_to_target: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            arrival_tolerance: 0.2,
            deceleration_radius: 1.0,
            path_offset: 2.0,
            time_to_target: 0.1,
            priority_epsilon: 0.0001,
            facing_enabled: true,
            align_tolerance: 0.6,
            face_deceleration_radius: 1.5,
            face_time_to_target: 0.001,
        }
    }
}

impl SteeringConfig {
    /// Facing-only requests yield no behavior
    pub fn without_facing() -> Self {
        Self {
            facing_enabled: false,
            ..Default::default()
        }
    }

    /// Set arrival tolerance
    pub fn with_arrival_tolerance(mut self, tolerance: f32) -> Self {
        self.arrival_tolerance = tolerance;
        self
    }

    /// Set deceleration radius
    pub fn with_deceleration_radius(mut self, radius: f32) -> Self {
        self.deceleration_radius = radius;
        self
    }

    /// Set path offset
    pub fn with_path_offset(mut self, offset: f32) -> Self {
        self.path_offset = offset;
        self
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<()> {
        positive("arrival_tolerance", self.arrival_tolerance)?;
        positive("deceleration_radius", self.deceleration_radius)?;
        positive("time_to_target", self.time_to_target)?;
        positive("priority_epsilon", self.priority_epsilon)?;
        positive("align_tolerance", self.align_tolerance)?;
        positive("face_deceleration_radius", self.face_deceleration_radius)?;
        positive("face_time_to_target", self.face_time_to_target)?;
        if !self.path_offset.is_finite() || self.path_offset < 0.0 {
            return Err(NavigationError::InvalidConfig(format!(
                "path_offset must be finite and non-negative, got {}",
                self.path_offset
            )));
        }
        Ok(())
    }
}

/// Kinematic limits of one agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringLimits {
    /// Maximum linear speed (units/s)
    pub max_linear_speed: f32,
    /// Maximum linear acceleration (units/s²)
    pub max_linear_acceleration: f32,
    /// Maximum angular speed (rad/s)
    pub max_angular_speed: f32,
    /// Maximum angular acceleration (rad/s²)
    pub max_angular_acceleration: f32,
}

impl Default for SteeringLimits {
    fn default() -> Self {
        Self {
            max_linear_speed: 1.5,
            max_linear_acceleration: 8.0,
            max_angular_speed: 6.0,
            max_angular_acceleration: 30.0,
        }
    }
}

impl SteeringLimits {
    /// Create limits with the given linear speed and acceleration
    pub fn new(max_linear_speed: f32, max_linear_acceleration: f32) -> Self {
        Self {
            max_linear_speed,
            max_linear_acceleration,
            ..Default::default()
        }
    }

    /// Set angular limits
    pub fn with_angular(mut self, max_speed: f32, max_acceleration: f32) -> Self {
        self.max_angular_speed = max_speed;
        self.max_angular_acceleration = max_acceleration;
        self
    }

    /// Check every limit is finite and positive
    pub fn validate(&self) -> Result<()> {
        positive("max_linear_speed", self.max_linear_speed)?;
        positive("max_linear_acceleration", self.max_linear_acceleration)?;
        positive("max_angular_speed", self.max_angular_speed)?;
        positive("max_angular_acceleration", self.max_angular_acceleration)
    }
}

/// Movement sink configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Speed below which a braking agent counts as stopped
    pub stop_threshold: f32,

    /// Keep orientation independent of the direction of travel
    pub independent_facing: bool,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            stop_threshold: 0.05,
            independent_facing: false,
        }
    }
}

impl MovementConfig {
    /// Set stop threshold
    pub fn with_stop_threshold(mut self, threshold: f32) -> Self {
        self.stop_threshold = threshold;
        self
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<()> {
        positive("stop_threshold", self.stop_threshold)
    }
}

/// Complete navigation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Width of one tile in world units
    pub tile_size: f32,
    /// Behavior tuning
    pub steering: SteeringConfig,
    /// Movement sink tuning
    pub movement: MovementConfig,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            tile_size: crate::tile::TILE_WIDTH,
            steering: SteeringConfig::default(),
            movement: MovementConfig::default(),
        }
    }
}

impl NavigationConfig {
    /// Set tile size
    pub fn with_tile_size(mut self, tile_size: f32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set steering configuration
    pub fn with_steering(mut self, steering: SteeringConfig) -> Self {
        self.steering = steering;
        self
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<()> {
        positive("tile_size", self.tile_size)?;
        self.steering.validate()?;
        self.movement.validate()
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(NavigationError::InvalidConfig(format!(
            "{} must be finite and positive, got {}",
            name, value
        )))
    }
}
