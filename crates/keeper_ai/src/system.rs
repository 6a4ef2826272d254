//! Navigation system driving every registered agent

use crate::agent::{AgentId, AgentTick, NavAgent};
use crate::composer::{SteeringComposer, SteeringRequest};
use crate::config::NavigationConfig;
use crate::error::{NavigationError, Result};
use crate::movement::MovementSink;
use crate::pathfinding::TileGrid;
use crate::tile::{TileCoordinate, TileSpace};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Something that happened to an agent's navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationEvent {
    /// Agent arrived and stopped; its behavior was dropped
    GoalReached(AgentId),
    /// Pathfinder found no way to the destination
    NoPath {
        agent: AgentId,
        destination: TileCoordinate,
    },
    /// A new request replaced a running behavior
    Superseded(AgentId),
}

/// Owns the map, the agents and their behaviors
///
/// Agents are stepped one after another in ascending id order; each one
/// owns its behavior outright, so no state is shared between them.
pub struct NavigationSystem {
    grid: TileGrid,
    tile_space: TileSpace,
    composer: SteeringComposer,
    sink: MovementSink,
    agents: BTreeMap<AgentId, NavAgent>,
    events: Vec<NavigationEvent>,
}

impl NavigationSystem {
    /// Create a system for a map
    pub fn new(grid: TileGrid, config: NavigationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grid,
            tile_space: TileSpace::new(config.tile_size)?,
            composer: SteeringComposer::new(config.steering)?,
            sink: MovementSink::new(config.movement)?,
            agents: BTreeMap::new(),
            events: Vec::new(),
        })
    }

    /// The map
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Mutable map access, e.g. when a wall is dug out
    pub fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    /// Tile-to-world transform
    pub fn tile_space(&self) -> &TileSpace {
        &self.tile_space
    }

    /// Register an agent
    pub fn add_agent(&mut self, agent: NavAgent) -> Result<()> {
        agent.state.validate()?;
        agent.limits.validate()?;
        let id = agent.id();
        if self.agents.contains_key(&id) {
            return Err(NavigationError::DuplicateAgent(id));
        }
        log::debug!("Registered agent {} at {}", id, agent.state.position);
        self.agents.insert(id, agent);
        Ok(())
    }

    /// Unregister an agent
    pub fn remove_agent(&mut self, id: AgentId) -> Option<NavAgent> {
        self.agents.remove(&id)
    }

    /// Get an agent
    pub fn agent(&self, id: AgentId) -> Option<&NavAgent> {
        self.agents.get(&id)
    }

    /// Get a mutable agent
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut NavAgent> {
        self.agents.get_mut(&id)
    }

    /// All agents in id order
    pub fn agents(&self) -> impl Iterator<Item = &NavAgent> {
        self.agents.values()
    }

    /// Number of agents with an active behavior
    pub fn navigating_count(&self) -> usize {
        self.agents.values().filter(|a| a.is_navigating()).count()
    }

    /// Plan a request and install the resulting behavior on its agent
    ///
    /// Any running behavior is replaced straight away. Returns whether the
    /// agent now has something to do.
    pub fn request(&mut self, request: SteeringRequest) -> Result<bool> {
        let agent = self
            .agents
            .get_mut(&request.agent)
            .ok_or(NavigationError::UnknownAgent(request.agent))?;

        let passable = self.grid.passable_for(agent.profile);
        let plan = self.composer.navigate(
            &request,
            &agent.state,
            &self.tile_space,
            &self.grid,
            &passable,
        )?;

        if !plan.path_found() {
            self.events.push(NavigationEvent::NoPath {
                agent: request.agent,
                destination: request.destination,
            });
        }

        let active = plan.behavior.is_some();
        if agent.set_behavior(plan.behavior) {
            self.events.push(NavigationEvent::Superseded(request.agent));
        }
        Ok(active)
    }

    /// Cancel an agent's navigation
    pub fn cancel(&mut self, id: AgentId) -> Result<()> {
        self.agents
            .get_mut(&id)
            .ok_or(NavigationError::UnknownAgent(id))?
            .clear_behavior();
        Ok(())
    }

    /// Advance every agent by `dt`
    ///
    /// An agent whose update fails loses its behavior; the rest are still
    /// stepped. The first such error is returned once the tick is done.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(NavigationError::InvalidTimestep(dt));
        }

        let mut first_error = None;
        for (id, agent) in self.agents.iter_mut() {
            match agent.update(&self.sink, dt) {
                Ok(AgentTick::GoalReached) => {
                    self.events.push(NavigationEvent::GoalReached(*id));
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("Agent {} dropped its behavior: {}", id, e);
                    agent.clear_behavior();
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Take the events collected since the last call
    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SteeringLimits;
    use crate::pathfinding::{MovementProfile, TileKind};
    use crate::steering::{AgentState, SteeringKind};

    fn system(rows: &[&str]) -> NavigationSystem {
        let grid = TileGrid::from_ascii(rows).unwrap();
        NavigationSystem::new(grid, NavigationConfig::default()).unwrap()
    }

    fn spawn(system: &mut NavigationSystem, id: u32, tile: (i32, i32)) -> AgentId {
        let id = AgentId(id);
        let position = system.tile_space().to_world(tile.into());
        system
            .add_agent(NavAgent::new(id, AgentState::at(position), SteeringLimits::default()))
            .unwrap();
        id
    }

    #[test]
    fn test_duplicate_and_unknown_agents() {
        let mut system = system(&["....."]);
        let id = spawn(&mut system, 1, (0, 0));
        let again = NavAgent::new(id, AgentState::default(), SteeringLimits::default());
        assert_eq!(system.add_agent(again), Err(NavigationError::DuplicateAgent(id)));

        let request = SteeringRequest::new(AgentId(9), TileCoordinate::new(1, 0));
        assert_eq!(system.request(request), Err(NavigationError::UnknownAgent(AgentId(9))));
        assert!(system.cancel(AgentId(9)).is_err());
    }

    #[test]
    fn test_request_installs_path_following() {
        let mut system = system(&["....."]);
        let id = spawn(&mut system, 1, (0, 0));
        assert!(system.request(SteeringRequest::new(id, TileCoordinate::new(4, 0))).unwrap());
        let behavior = system.agent(id).unwrap().behavior().unwrap();
        assert_eq!(behavior.kind(), Some(SteeringKind::FollowPath));
        assert!(system.drain_events().is_empty());
    }

    #[test]
    fn test_no_path_reports_event() {
        let mut system = system(&["..#.."]);
        let id = spawn(&mut system, 1, (0, 0));
        let destination = TileCoordinate::new(4, 0);
        assert!(!system.request(SteeringRequest::new(id, destination)).unwrap());
        assert_eq!(
            system.drain_events(),
            vec![NavigationEvent::NoPath { agent: id, destination }]
        );
        assert!(!system.agent(id).unwrap().is_navigating());
    }

    #[test]
    fn test_no_path_still_faces() {
        let mut system = system(&["..#.."]);
        let id = spawn(&mut system, 1, (0, 0));
        let target = TileCoordinate::new(4, 0);
        let request = SteeringRequest::new(id, target).facing(target);
        assert!(system.request(request).unwrap());
        let behavior = system.agent(id).unwrap().behavior().unwrap();
        assert_eq!(behavior.kind(), Some(SteeringKind::FaceTarget));
    }

    #[test]
    fn test_new_request_supersedes() {
        let mut system = system(&[".....", "....."]);
        let id = spawn(&mut system, 1, (0, 0));
        system.request(SteeringRequest::new(id, TileCoordinate::new(4, 0))).unwrap();
        system.step(1.0 / 60.0).unwrap();
        system.request(SteeringRequest::new(id, TileCoordinate::new(0, 1))).unwrap();

        assert_eq!(system.drain_events(), vec![NavigationEvent::Superseded(id)]);
        let destination = system.agent(id).unwrap().destination().unwrap();
        assert_eq!(destination, system.tile_space().to_world(TileCoordinate::new(0, 1)));
    }

    #[test]
    fn test_land_creature_blocked_by_water() {
        let mut system = system(&["..~.."]);
        let id = spawn(&mut system, 1, (0, 0));
        system.agent_mut(id).unwrap().profile = MovementProfile::land_only();
        assert!(!system.request(SteeringRequest::new(id, TileCoordinate::new(4, 0))).unwrap());

        system.grid_mut().set_kind(TileCoordinate::new(2, 0), TileKind::Floor);
        assert!(system.request(SteeringRequest::new(id, TileCoordinate::new(4, 0))).unwrap());
    }

    #[test]
    fn test_faulty_agent_does_not_stall_others() {
        let mut system = system(&[".....", "....."]);
        let broken = spawn(&mut system, 1, (0, 0));
        let healthy = spawn(&mut system, 2, (0, 1));
        system.request(SteeringRequest::new(broken, TileCoordinate::new(4, 0))).unwrap();
        system.request(SteeringRequest::new(healthy, TileCoordinate::new(4, 1))).unwrap();
        system.agent_mut(broken).unwrap().state.position.x = f32::NAN;

        let start = system.agent(healthy).unwrap().state.position;
        assert!(matches!(system.step(1.0 / 60.0), Err(NavigationError::InvalidRequest(_))));
        assert!(!system.agent(broken).unwrap().is_navigating());

        for _ in 0..9 {
            system.step(1.0 / 60.0).unwrap();
        }
        let healthy = system.agent(healthy).unwrap();
        assert!(healthy.is_navigating());
        assert!(healthy.state.position.x > start.x);
    }

    #[test]
    fn test_invalid_step() {
        let mut system = system(&["."]);
        assert_eq!(system.step(0.0), Err(NavigationError::InvalidTimestep(0.0)));
    }
}
