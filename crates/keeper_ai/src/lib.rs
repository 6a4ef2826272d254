//! Keeper AI - Creature Navigation
//!
//! Turns "walk to that tile" into continuous steering for dungeon creatures.
//!
//! # Features
//!
//! - Tile-to-world path translation
//! - Path following with arrival deceleration over a polyline
//! - Orientation-only facing when there is nowhere to walk
//! - Priority steering composition
//! - Reference A* pathfinder over an ASCII tile grid
//! - Kinematic movement sink and a multi-agent navigation system
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                  NavigationSystem                      │
//! │  ┌──────────┐  ┌──────────────────┐  ┌──────────────┐ │
//! │  │ TileGrid │  │ SteeringComposer │  │ MovementSink │ │
//! │  │   (A*)   │  │                  │  │              │ │
//! │  └──────────┘  └──────────────────┘  └──────────────┘ │
//! └───────────────────────────────────────────────────────┘
//!                           │
//!                  ┌────────┴────────┐
//!                  ▼                 ▼
//!             ┌─────────┐   ┌──────────────────┐
//!             │NavAgent │──►│ SteeringBehavior │
//!             └─────────┘   │ FollowPath / Face│
//!                           └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use keeper_ai::prelude::*;
//!
//! let grid = TileGrid::from_ascii(&["....", ".##.", "...."])?;
//! let mut nav = NavigationSystem::new(grid, NavigationConfig::default())?;
//!
//! let start = nav.tile_space().to_world(TileCoordinate::new(0, 0));
//! nav.add_agent(NavAgent::new(AgentId(1), AgentState::at(start), SteeringLimits::default()))?;
//! nav.request(SteeringRequest::new(AgentId(1), TileCoordinate::new(3, 2)))?;
//!
//! nav.step(1.0 / 60.0)?;
//! ```

pub mod agent;
pub mod composer;
pub mod config;
pub mod error;
pub mod face;
pub mod follow_path;
pub mod line_path;
pub mod movement;
pub mod path;
pub mod pathfinding;
pub mod steering;
pub mod system;
pub mod tile;

pub mod prelude {
    //! Common imports for creature navigation
    pub use crate::agent::{AgentId, AgentTick, NavAgent};
    pub use crate::composer::{NavigationPlan, SteeringComposer, SteeringRequest};
    pub use crate::config::{MovementConfig, NavigationConfig, SteeringConfig, SteeringLimits};
    pub use crate::error::{NavigationError, Result};
    pub use crate::face::FaceTarget;
    pub use crate::follow_path::FollowPath;
    pub use crate::line_path::LinePath;
    pub use crate::movement::{MovementReport, MovementSink};
    pub use crate::path::{translate, Path};
    pub use crate::pathfinding::{MovementProfile, Pathfinder, TileGrid, TileKind};
    pub use crate::steering::{
        AgentState, SteeringBehavior, SteeringElement, SteeringKind, SteeringOutput,
    };
    pub use crate::system::{NavigationEvent, NavigationSystem};
    pub use crate::tile::{TileCoordinate, TileSpace, WorldPoint, TILE_WIDTH};
}

pub use prelude::*;
