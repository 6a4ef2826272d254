//! Path following along an open line path

use crate::config::{SteeringConfig, SteeringLimits};
use crate::line_path::LinePath;
use crate::steering::{arrive, seek, AgentState, SteeringOutput};
use crate::tile::WorldPoint;

/// Follows a line path, aiming `path_offset` ahead of the agent's projection
/// onto it, and arrives at the end instead of wrapping around.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowPath {
    path: LinePath,
    /// Distance ahead along the path to aim at
    pub path_offset: f32,
    /// Distance to the end at which the agent counts as arrived
    pub arrival_tolerance: f32,
    /// Distance to the end at which the agent starts slowing down
    pub deceleration_radius: f32,
    /// Time over which arrive tries to reach its target velocity
    pub time_to_target: f32,
}

impl FollowPath {
    /// Follower with default tuning
    pub fn new(path: LinePath) -> Self {
        Self::with_config(path, &SteeringConfig::default())
    }

    /// Follower tuned from a steering configuration
    pub fn with_config(path: LinePath, config: &SteeringConfig) -> Self {
        Self {
            path,
            path_offset: config.path_offset,
            arrival_tolerance: config.arrival_tolerance,
            deceleration_radius: config.deceleration_radius,
            time_to_target: config.time_to_target,
        }
    }

    /// The followed path
    pub fn path(&self) -> &LinePath {
        &self.path
    }

    /// Terminal point of the path
    pub fn destination(&self) -> WorldPoint {
        self.path.end()
    }

    /// Calculate steering output
    pub fn evaluate(&self, state: &AgentState, limits: &SteeringLimits) -> SteeringOutput {
        let distance = self.path.project(state.position);
        let target_distance = distance + self.path_offset;
        let target = self.path.point_at(target_distance);

        let mut output = if target_distance > self.path.length() - self.deceleration_radius {
            arrive(
                state,
                target,
                limits,
                self.arrival_tolerance,
                self.deceleration_radius,
                self.time_to_target,
            )
        } else {
            seek(state, target, limits)
        };

        output.reached_goal = state.position.distance(self.destination()) <= self.arrival_tolerance;
        output
    }
}
