//! Fixed-step simulation of a scenario

use crate::error::Result;
use crate::scenario::Scenario;
use keeper_ai::{
    AgentId, AgentState, NavAgent, NavigationError, NavigationEvent, NavigationSystem,
    SteeringRequest, TileGrid, WorldPoint,
};

/// Final state of one creature
#[derive(Debug, Clone, PartialEq)]
pub struct AgentOutcome {
    pub id: AgentId,
    pub position: WorldPoint,
    pub orientation: f32,
    pub arrived: bool,
    pub unreachable: bool,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct SimSummary {
    pub ticks_run: u32,
    pub outcomes: Vec<AgentOutcome>,
}

impl SimSummary {
    /// Number of creatures that reached their goal
    pub fn arrived_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.arrived).count()
    }
}

/// A navigation system populated from a scenario
pub struct Simulation {
    system: NavigationSystem,
    ticks: u32,
    dt: f32,
    arrived: Vec<AgentId>,
    unreachable: Vec<AgentId>,
}

impl Simulation {
    /// Build the map, spawn every creature and send it on its way
    pub fn new(scenario: &Scenario) -> Result<Self> {
        if !scenario.dt.is_finite() || scenario.dt <= 0.0 {
            return Err(NavigationError::InvalidTimestep(scenario.dt).into());
        }

        let grid = TileGrid::from_ascii(scenario.map.as_slice())?;
        log::info!(
            "Scenario '{}': {}x{} map, {} agents",
            scenario.name,
            grid.width(),
            grid.height(),
            scenario.agents.len()
        );

        let mut system = NavigationSystem::new(grid, scenario.navigation.clone())?;
        for spec in &scenario.agents {
            let position = system.tile_space().to_world(spec.start);
            let agent = NavAgent::new(AgentId(spec.id), AgentState::at(position), spec.limits)
                .with_profile(spec.profile);
            system.add_agent(agent)?;
        }

        let mut simulation = Self {
            system,
            ticks: scenario.ticks,
            dt: scenario.dt,
            arrived: Vec::new(),
            unreachable: Vec::new(),
        };

        for spec in &scenario.agents {
            let mut request = SteeringRequest::new(AgentId(spec.id), spec.destination);
            if let Some(facing) = spec.facing {
                request = request.facing(facing);
            }
            let active = simulation.system.request(request)?;
            log::debug!(
                "Agent #{} sent to {} ({})",
                spec.id,
                spec.destination,
                if active { "moving" } else { "idle" }
            );
        }
        simulation.collect_events();

        Ok(simulation)
    }

    /// The underlying navigation system
    pub fn system(&self) -> &NavigationSystem {
        &self.system
    }

    /// Step until every creature is idle or the tick budget runs out
    pub fn run(&mut self) -> Result<SimSummary> {
        let mut ticks_run = 0;
        while ticks_run < self.ticks && self.system.navigating_count() > 0 {
            self.system.step(self.dt)?;
            ticks_run += 1;
            self.collect_events();
        }

        if self.system.navigating_count() > 0 {
            log::warn!(
                "{} agents still navigating after {} ticks",
                self.system.navigating_count(),
                ticks_run
            );
        }

        let outcomes = self
            .system
            .agents()
            .map(|agent| AgentOutcome {
                id: agent.id(),
                position: agent.state.position,
                orientation: agent.state.orientation,
                arrived: self.arrived.contains(&agent.id()),
                unreachable: self.unreachable.contains(&agent.id()),
            })
            .collect();

        Ok(SimSummary { ticks_run, outcomes })
    }

    fn collect_events(&mut self) {
        for event in self.system.drain_events() {
            match event {
                NavigationEvent::GoalReached(id) => {
                    log::info!("Agent {} reached its goal", id);
                    self.arrived.push(id);
                }
                NavigationEvent::NoPath { agent, destination } => {
                    log::info!("Agent {} has no path to {}", agent, destination);
                    self.unreachable.push(agent);
                }
                NavigationEvent::Superseded(id) => {
                    log::debug!("Agent {} was given a new destination", id);
                }
            }
        }
    }
}
