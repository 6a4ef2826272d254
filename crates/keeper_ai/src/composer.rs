//! Builds steering behaviors for navigation requests
//!
//! ```text
//!  SteeringRequest ──► Pathfinder ──► [TileCoordinate] ──► TileSpace::translate
//!                                                               │
//!                                                             Path
//!                                                               ▼
//!                        Option<SteeringBehavior> ◄── SteeringComposer::compose
//! ```

use crate::agent::AgentId;
use crate::config::SteeringConfig;
use crate::error::{NavigationError, Result};
use crate::face::FaceTarget;
use crate::follow_path::FollowPath;
use crate::line_path::LinePath;
use crate::path::Path;
use crate::pathfinding::Pathfinder;
use crate::steering::{AgentState, SteeringBehavior};
use crate::tile::{TileCoordinate, TileSpace, WorldPoint};
use serde::{Deserialize, Serialize};

/// A single navigation intent for one agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteeringRequest {
    /// Agent to move
    pub agent: AgentId,
    /// Tile to walk to
    pub destination: TileCoordinate,
    /// Tile to face once there is nowhere to walk
    pub facing_target: Option<TileCoordinate>,
}

impl SteeringRequest {
    /// Request to walk to `destination`
    pub fn new(agent: AgentId, destination: TileCoordinate) -> Self {
        Self {
            agent,
            destination,
            facing_target: None,
        }
    }

    /// Set the tile to face
    pub fn facing(mut self, target: TileCoordinate) -> Self {
        self.facing_target = Some(target);
        self
    }
}

/// Result of planning a request
#[derive(Debug, Clone)]
pub struct NavigationPlan {
    /// Tiles returned by the pathfinder, `None` when no path exists
    pub tiles: Option<Vec<TileCoordinate>>,
    /// Behavior to run, `None` when there is nothing to do
    pub behavior: Option<SteeringBehavior>,
}

impl NavigationPlan {
    /// Whether the pathfinder found a path
    pub fn path_found(&self) -> bool {
        self.tiles.is_some()
    }
}

/// Builds priority steering from translated paths
#[derive(Debug, Clone, Default)]
pub struct SteeringComposer {
    config: SteeringConfig,
}

impl SteeringComposer {
    /// Create a composer with a validated configuration
    pub fn new(config: SteeringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &SteeringConfig {
        &self.config
    }

    /// Compose a behavior for a path and optional facing target
    ///
    /// A path with at least two distinct points yields a path follower,
    /// even when a facing target is given. Otherwise a facing target yields
    /// an orientation-only behavior (if enabled). `Ok(None)` means the agent
    /// already satisfies its goal.
    pub fn compose(
        &self,
        path: Path,
        facing_target: Option<WorldPoint>,
        state: &AgentState,
    ) -> Result<Option<SteeringBehavior>> {
        state.validate()?;
        if let Some(target) = facing_target {
            if !target.is_finite() {
                return Err(NavigationError::InvalidRequest(format!(
                    "facing target must be finite, got {:?}",
                    target
                )));
            }
        }

        if let Some(line_path) = LinePath::new(path.points()) {
            log::debug!(
                "Composed path following over {} points ({:.2} units) from {}",
                path.len(),
                line_path.length(),
                state.position
            );
            let follow = FollowPath::with_config(line_path, &self.config);
            return Ok(Some(SteeringBehavior::new(self.config.priority_epsilon).with(follow)));
        }

        match facing_target {
            Some(target) if self.config.facing_enabled => {
                log::debug!("Composed facing toward {} from {}", target, state.position);
                let face = FaceTarget::with_config(target, &self.config);
                Ok(Some(SteeringBehavior::new(self.config.priority_epsilon).with(face)))
            }
            _ => {
                log::trace!("Nothing to steer for {} point path", path.len());
                Ok(None)
            }
        }
    }

    /// Plan a request: find a tile path from the agent's tile, translate it
    /// and compose
    ///
    /// A missing path is not an error; it yields an empty path so a facing
    /// target can still apply.
    pub fn navigate<P: Pathfinder + ?Sized>(
        &self,
        request: &SteeringRequest,
        state: &AgentState,
        tile_space: &TileSpace,
        pathfinder: &P,
        passable: &dyn Fn(TileCoordinate) -> bool,
    ) -> Result<NavigationPlan> {
        state.validate()?;
        let start = tile_space.tile_at(state.position);
        let tiles = pathfinder.find_path(start, request.destination, passable);

        let path = match &tiles {
            Some(tiles) => tile_space.translate(tiles),
            None => {
                log::debug!(
                    "No path for agent {} from {} to {}",
                    request.agent,
                    start,
                    request.destination
                );
                Path::empty()
            }
        };

        let facing = request.facing_target.map(|tile| tile_space.to_world(tile));
        let behavior = self.compose(path, facing, state)?;
        Ok(NavigationPlan { tiles, behavior })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::translate;
    use crate::steering::SteeringKind;

    fn tiles(coords: &[(i32, i32)]) -> Vec<TileCoordinate> {
        coords.iter().map(|&c| c.into()).collect()
    }

    #[test]
    fn test_path_following_behavior() {
        let composer = SteeringComposer::default();
        let path = translate(&tiles(&[(2, 2), (2, 3), (2, 4)]));
        let behavior = composer
            .compose(path, None, &AgentState::at(WorldPoint::new(1.5, 1.5)))
            .unwrap()
            .unwrap();

        assert_eq!(behavior.kind(), Some(SteeringKind::FollowPath));
        assert_eq!(behavior.elements().len(), 1);
        assert_eq!(behavior.epsilon(), 0.0001);
        let follow = behavior.follow_path().unwrap();
        assert_eq!(follow.arrival_tolerance, 0.2);
        assert_eq!(follow.deceleration_radius, 1.0);
        assert_eq!(follow.destination(), WorldPoint::new(1.5, 3.5));
    }

    #[test]
    fn test_short_paths_without_facing() {
        let composer = SteeringComposer::default();
        let state = AgentState::default();
        assert!(composer.compose(Path::empty(), None, &state).unwrap().is_none());
        assert!(composer
            .compose(translate(&tiles(&[(5, 5)])), None, &state)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_coincident_points() {
        let composer = SteeringComposer::default();
        let path = Path::new(vec![WorldPoint::new(3.0, 3.0), WorldPoint::new(3.0, 3.0)]);
        assert!(composer.compose(path, None, &AgentState::default()).unwrap().is_none());
    }

    #[test]
    fn test_path_takes_precedence_over_facing() {
        let composer = SteeringComposer::default();
        let path = translate(&tiles(&[(1, 1), (2, 1)]));
        let behavior = composer
            .compose(path, Some(WorldPoint::new(9.0, 9.0)), &AgentState::default())
            .unwrap()
            .unwrap();
        assert_eq!(behavior.kind(), Some(SteeringKind::FollowPath));
        assert!(behavior.face_target().is_none());
    }

    #[test]
    fn test_facing_only() {
        let composer = SteeringComposer::default();
        let target = TileSpace::default().to_world(TileCoordinate::new(3, 3));
        let behavior = composer
            .compose(Path::empty(), Some(target), &AgentState::default())
            .unwrap()
            .unwrap();
        assert_eq!(behavior.kind(), Some(SteeringKind::FaceTarget));
        assert_eq!(behavior.face_target().unwrap().target(), WorldPoint::new(2.5, 2.5));
    }

    #[test]
    fn test_facing_disabled() {
        let composer = SteeringComposer::new(SteeringConfig::without_facing()).unwrap();
        let behavior = composer
            .compose(Path::empty(), Some(WorldPoint::new(2.5, 2.5)), &AgentState::default())
            .unwrap();
        assert!(behavior.is_none());
    }

    #[test]
    fn test_invalid_inputs_fail_fast() {
        let composer = SteeringComposer::default();
        let bad_state = AgentState::at(WorldPoint::new(f32::INFINITY, 0.0));
        assert!(matches!(
            composer.compose(Path::empty(), None, &bad_state),
            Err(NavigationError::InvalidRequest(_))
        ));
        assert!(composer
            .compose(Path::empty(), Some(WorldPoint::new(f32::NAN, 0.0)), &AgentState::default())
            .is_err());
        let bad = SteeringConfig::default().with_arrival_tolerance(-1.0);
        assert!(SteeringComposer::new(bad).is_err());
    }

    #[test]
    fn test_compose_leaves_inputs_untouched() {
        let composer = SteeringComposer::default();
        let path = translate(&tiles(&[(1, 1), (1, 2), (2, 2)]));
        let state = AgentState::at(WorldPoint::new(0.5, 0.5));
        let path_copy = path.clone();
        let state_copy = state;
        let behavior = composer.compose(path, None, &state).unwrap().unwrap();
        assert_eq!(state, state_copy);
        let end = behavior.follow_path().unwrap().path().end();
        assert_eq!(end, *path_copy.points().last().unwrap());
    }
}
