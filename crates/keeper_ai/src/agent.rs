//! Per-agent navigation state

use crate::config::SteeringLimits;
use crate::error::Result;
use crate::movement::MovementSink;
use crate::pathfinding::MovementProfile;
use crate::steering::{AgentState, SteeringBehavior, SteeringOutput};
use crate::tile::WorldPoint;
use serde::{Deserialize, Serialize};

/// Agent identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to an agent during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentTick {
    /// No active behavior, state untouched
    Idle,
    /// Behavior applied, goal not yet reached
    Moving(SteeringOutput),
    /// Goal reached, behavior discarded
    GoalReached,
}

/// Navigation component: kinematics plus the behavior currently driving them
#[derive(Debug, Clone)]
pub struct NavAgent {
    id: AgentId,
    /// Current kinematic state
    pub state: AgentState,
    /// Kinematic limits
    pub limits: SteeringLimits,
    /// Terrain the agent may cross
    pub profile: MovementProfile,
    behavior: Option<SteeringBehavior>,
}

impl NavAgent {
    /// Create a new navigation agent with no behavior
    pub fn new(id: AgentId, state: AgentState, limits: SteeringLimits) -> Self {
        Self {
            id,
            state,
            limits,
            profile: MovementProfile::default(),
            behavior: None,
        }
    }

    /// Set movement profile
    pub fn with_profile(mut self, profile: MovementProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Agent identifier
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Active behavior
    pub fn behavior(&self) -> Option<&SteeringBehavior> {
        self.behavior.as_ref()
    }

    /// Whether a behavior is driving the agent
    pub fn is_navigating(&self) -> bool {
        self.behavior.is_some()
    }

    /// Replace the active behavior, returns whether one was superseded
    ///
    /// `None` cancels navigation without touching the kinematic state.
    pub fn set_behavior(&mut self, behavior: Option<SteeringBehavior>) -> bool {
        let superseded = self.behavior.is_some();
        if superseded {
            log::debug!("Agent {} behavior superseded", self.id);
        }
        self.behavior = behavior;
        superseded
    }

    /// Drop the active behavior
    pub fn clear_behavior(&mut self) {
        self.set_behavior(None);
    }

    /// Final point of the active path, if following one
    pub fn destination(&self) -> Option<WorldPoint> {
        self.behavior
            .as_ref()
            .and_then(SteeringBehavior::follow_path)
            .map(|follow| follow.destination())
    }

    /// Straight-line distance to the active path's end
    pub fn distance_to_destination(&self) -> Option<f32> {
        self.destination().map(|dest| self.state.position.distance(dest))
    }

    /// Run one movement tick
    pub fn update(&mut self, sink: &MovementSink, dt: f32) -> Result<AgentTick> {
        let behavior = match &self.behavior {
            Some(behavior) => behavior,
            None => return Ok(AgentTick::Idle),
        };

        let report = sink.apply(behavior, &mut self.state, &self.limits, dt)?;
        if report.goal_reached {
            log::debug!("Agent {} reached its goal at {}", self.id, self.state.position);
            self.behavior = None;
            Ok(AgentTick::GoalReached)
        } else {
            Ok(AgentTick::Moving(report.output))
        }
    }
}
