//! Kinematic movement sink
//!
//! Applies steering output to an [`AgentState`] with a fixed-step,
//! semi-implicit Euler integration and reports when the goal is reached.

use crate::config::{MovementConfig, SteeringLimits};
use crate::error::{NavigationError, Result};
use crate::steering::{AgentState, SteeringBehavior, SteeringOutput};
use keeper_math::{clamp, vector_to_angle, wrap_angle};

/// Result of one movement tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementReport {
    /// Steering output that was applied
    pub output: SteeringOutput,
    /// Behavior is satisfied and the agent has come to rest
    pub goal_reached: bool,
}

/// Integrates steering output into agent kinematics
#[derive(Debug, Clone, Default)]
pub struct MovementSink {
    config: MovementConfig,
}

impl MovementSink {
    /// Create a sink with a validated configuration
    pub fn new(config: MovementConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Evaluate `behavior` for the agent and integrate the result over `dt`
    pub fn apply(
        &self,
        behavior: &SteeringBehavior,
        state: &mut AgentState,
        limits: &SteeringLimits,
        dt: f32,
    ) -> Result<MovementReport> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(NavigationError::InvalidTimestep(dt));
        }
        state.validate()?;

        let output = behavior.evaluate(state, limits);
        let goal_reached = self.integrate(&output, state, limits, dt);
        Ok(MovementReport { output, goal_reached })
    }

    /// Integrate one steering output, returns whether the goal is reached
    pub fn integrate(
        &self,
        output: &SteeringOutput,
        state: &mut AgentState,
        limits: &SteeringLimits,
        dt: f32,
    ) -> bool {
        if output.reached_goal {
            // Brake to a stop at full deceleration
            let speed = (state.speed() - limits.max_linear_acceleration * dt).max(0.0);
            state.linear_velocity = state.linear_velocity.normalize() * speed;
            state.angular_velocity = 0.0;
        } else {
            state.linear_velocity = (state.linear_velocity + output.linear * dt)
                .clamp_length(limits.max_linear_speed);
            state.angular_velocity = clamp(
                state.angular_velocity + output.angular * dt,
                -limits.max_angular_speed,
                limits.max_angular_speed,
            );
        }

        state.position += state.linear_velocity * dt;

        let moving = state.speed() > self.config.stop_threshold;
        if !self.config.independent_facing && output.angular == 0.0 && moving {
            state.orientation = vector_to_angle(state.linear_velocity);
            state.angular_velocity = 0.0;
        } else {
            state.orientation = wrap_angle(state.orientation + state.angular_velocity * dt);
        }

        output.reached_goal
            && !moving
            && state.angular_velocity.abs() < self.config.stop_threshold
    }
}
