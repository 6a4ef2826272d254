//! Orientation-only steering toward a world point

use crate::config::{SteeringConfig, SteeringLimits};
use crate::steering::{AgentState, SteeringOutput};
use crate::tile::WorldPoint;
use keeper_math::consts::EPSILON;
use keeper_math::{clamp, vector_to_angle, wrap_angle};

/// Turns the agent in place until it faces `target`
#[derive(Debug, Clone, PartialEq)]
pub struct FaceTarget {
    target: WorldPoint,
    /// Angle below which the agent counts as facing the target
    pub align_tolerance: f32,
    /// Angle at which turning starts to slow down
    pub deceleration_radius: f32,
    /// Time over which the agent tries to reach its target rotation
    pub time_to_target: f32,
}

impl FaceTarget {
    /// Face-target with default tuning
    pub fn new(target: WorldPoint) -> Self {
        Self::with_config(target, &SteeringConfig::default())
    }

    /// Face-target tuned from a steering configuration
    pub fn with_config(target: WorldPoint, config: &SteeringConfig) -> Self {
        Self {
            target,
            align_tolerance: config.align_tolerance,
            deceleration_radius: config.face_deceleration_radius,
            time_to_target: config.face_time_to_target,
        }
    }

    /// The point to face
    pub fn target(&self) -> WorldPoint {
        self.target
    }

    /// Calculate steering output
    pub fn evaluate(&self, state: &AgentState, limits: &SteeringLimits) -> SteeringOutput {
        let to_target = self.target - state.position;
        if to_target.length_squared() <= EPSILON * EPSILON {
            // Standing on the target, any heading will do
            return SteeringOutput::arrived();
        }

        let rotation = wrap_angle(vector_to_angle(to_target) - state.orientation);
        let rotation_size = rotation.abs();

        if rotation_size <= self.align_tolerance {
            return SteeringOutput::arrived();
        }

        let mut target_rotation = limits.max_angular_speed;
        if rotation_size <= self.deceleration_radius {
            target_rotation *= rotation_size / self.deceleration_radius;
        }
        target_rotation *= rotation / rotation_size;

        let angular = clamp(
            (target_rotation - state.angular_velocity) / self.time_to_target,
            -limits.max_angular_acceleration,
            limits.max_angular_acceleration,
        );

        SteeringOutput::angular(angular)
    }
}
