//! Steering behaviors
//!
//! A [`SteeringBehavior`] is a priority-ordered list of [`SteeringElement`]s.
//! Each tick the movement sink evaluates it against the agent's current
//! kinematic state; evaluation never mutates the behavior.

use crate::config::SteeringLimits;
use crate::error::{NavigationError, Result};
use crate::face::FaceTarget;
use crate::follow_path::FollowPath;
use crate::tile::WorldPoint;
use keeper_math::consts::EPSILON;
use keeper_math::Vec2;
use serde::{Deserialize, Serialize};

/// Output of a steering behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SteeringOutput {
    /// Linear acceleration
    pub linear: Vec2,
    /// Angular acceleration (rad/s²)
    pub angular: f32,
    /// The behavior considers its goal satisfied
    pub reached_goal: bool,
}

impl SteeringOutput {
    /// Zero output
    pub fn zero() -> Self {
        Self::default()
    }

    /// Zero output for a satisfied goal
    pub fn arrived() -> Self {
        Self {
            reached_goal: true,
            ..Default::default()
        }
    }

    /// Create from linear acceleration
    pub fn linear(linear: Vec2) -> Self {
        Self {
            linear,
            angular: 0.0,
            reached_goal: false,
        }
    }

    /// Create from angular acceleration
    pub fn angular(angular: f32) -> Self {
        Self {
            linear: Vec2::ZERO,
            angular,
            reached_goal: false,
        }
    }

    /// Get magnitude of linear component
    pub fn magnitude(&self) -> f32 {
        self.linear.length()
    }

    /// Whether either component is larger than `epsilon`
    pub fn exceeds(&self, epsilon: f32) -> bool {
        self.linear.length_squared() > epsilon * epsilon || self.angular.abs() > epsilon
    }
}

/// Kinematic state of an agent, as read by the steering behaviors
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// World position
    pub position: WorldPoint,
    /// Linear velocity
    pub linear_velocity: Vec2,
    /// Orientation (rad, counter-clockwise from +X)
    pub orientation: f32,
    /// Angular velocity (rad/s)
    pub angular_velocity: f32,
}

impl AgentState {
    /// Agent at rest at `position`
    pub fn at(position: WorldPoint) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set velocity
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.linear_velocity = velocity;
        self
    }

    /// Set orientation
    pub fn with_orientation(mut self, orientation: f32) -> Self {
        self.orientation = orientation;
        self
    }

    /// Current speed
    pub fn speed(&self) -> f32 {
        self.linear_velocity.length()
    }

    /// Reject NaN or infinite components
    pub fn validate(&self) -> Result<()> {
        if self.position.is_finite()
            && self.linear_velocity.is_finite()
            && self.orientation.is_finite()
            && self.angular_velocity.is_finite()
        {
            Ok(())
        } else {
            Err(NavigationError::InvalidRequest(format!(
                "agent state must be finite, got {:?}",
                self
            )))
        }
    }
}

/// Full-acceleration push toward `target`
pub(crate) fn seek(
    state: &AgentState,
    target: WorldPoint,
    limits: &SteeringLimits,
) -> SteeringOutput {
    let to_target = target - state.position;
    if to_target.length_squared() <= EPSILON * EPSILON {
        return SteeringOutput::zero();
    }
    SteeringOutput::linear(to_target.normalize() * limits.max_linear_acceleration)
}

/// Approach `target` and slow down inside `deceleration_radius`
pub(crate) fn arrive(
    state: &AgentState,
    target: WorldPoint,
    limits: &SteeringLimits,
    arrival_tolerance: f32,
    deceleration_radius: f32,
    time_to_target: f32,
) -> SteeringOutput {
    let to_target = target - state.position;
    let distance = to_target.length();

    if distance <= arrival_tolerance {
        return SteeringOutput::zero();
    }

    let target_speed = if distance <= deceleration_radius {
        limits.max_linear_speed * (distance / deceleration_radius)
    } else {
        limits.max_linear_speed
    };

    let target_velocity = to_target * (target_speed / distance);
    let linear = ((target_velocity - state.linear_velocity) * (1.0 / time_to_target))
        .clamp_length(limits.max_linear_acceleration);

    SteeringOutput::linear(linear)
}

/// Steering element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteeringKind {
    FollowPath,
    FaceTarget,
}

/// One entry of a priority steering list
#[derive(Debug, Clone, PartialEq)]
pub enum SteeringElement {
    FollowPath(FollowPath),
    FaceTarget(FaceTarget),
}

impl SteeringElement {
    /// Which behavior this is
    pub fn kind(&self) -> SteeringKind {
        match self {
            SteeringElement::FollowPath(_) => SteeringKind::FollowPath,
            SteeringElement::FaceTarget(_) => SteeringKind::FaceTarget,
        }
    }

    /// Calculate steering output
    pub fn evaluate(&self, state: &AgentState, limits: &SteeringLimits) -> SteeringOutput {
        match self {
            SteeringElement::FollowPath(follow) => follow.evaluate(state, limits),
            SteeringElement::FaceTarget(face) => face.evaluate(state, limits),
        }
    }
}

impl From<FollowPath> for SteeringElement {
    fn from(follow: FollowPath) -> Self {
        SteeringElement::FollowPath(follow)
    }
}

impl From<FaceTarget> for SteeringElement {
    fn from(face: FaceTarget) -> Self {
        SteeringElement::FaceTarget(face)
    }
}

/// Priority steering: the first element with a non-negligible output wins
#[derive(Debug, Clone, PartialEq)]
pub struct SteeringBehavior {
    elements: Vec<SteeringElement>,
    epsilon: f32,
}

impl SteeringBehavior {
    /// Create an empty priority list
    pub fn new(epsilon: f32) -> Self {
        Self {
            elements: Vec::new(),
            epsilon,
        }
    }

    /// Append an element with lower priority than the existing ones
    ///
    /// Collision avoidance belongs ahead of path following once it exists.
    pub fn push(&mut self, element: impl Into<SteeringElement>) {
        self.elements.push(element.into());
    }

    /// Builder form of [`push`](Self::push)
    pub fn with(mut self, element: impl Into<SteeringElement>) -> Self {
        self.push(element);
        self
    }

    /// Elements in priority order
    pub fn elements(&self) -> &[SteeringElement] {
        &self.elements
    }

    /// Priority switch threshold
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Kind of the highest-priority element
    pub fn kind(&self) -> Option<SteeringKind> {
        self.elements.first().map(SteeringElement::kind)
    }

    /// Path follower, if any
    pub fn follow_path(&self) -> Option<&FollowPath> {
        self.elements.iter().find_map(|e| match e {
            SteeringElement::FollowPath(follow) => Some(follow),
            _ => None,
        })
    }

    /// Face-target element, if any
    pub fn face_target(&self) -> Option<&FaceTarget> {
        self.elements.iter().find_map(|e| match e {
            SteeringElement::FaceTarget(face) => Some(face),
            _ => None,
        })
    }

    /// Calculate steering output
    ///
    /// When no element exceeds epsilon, the output of the last one is
    /// returned as is.
    pub fn evaluate(&self, state: &AgentState, limits: &SteeringLimits) -> SteeringOutput {
        let mut output = SteeringOutput::zero();
        for element in &self.elements {
            output = element.evaluate(state, limits);
            if output.exceeds(self.epsilon) {
                return output;
            }
        }
        output
    }
}
