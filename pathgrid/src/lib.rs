//! Grid model and Dijkstra search behind the path finding visualizer.
//!
//! The pieces are plain values and functions so they can be driven without any UI:
//! [`build_grid`] and [`toggle_wall`] produce grids, [`dijkstra`] searches one and
//! [`reconstruct_path`] reads the shortest path back out. [`Visualizer`] ties them to the
//! wall painting and replay state of an interactive view.

pub mod animation;
pub mod config;
pub mod error;
pub mod find;
pub mod grid;
pub mod search;
pub mod visualizer;

pub use animation::{CancellationToken, Phase, Playback, Reveal, Timeline};
pub use config::{AnimationConfig, GridConfig};
pub use error::{GridError, Result};
pub use find::{MapStorage, MapTrait, PathFinder, PathFinderState, PathResult, SearchNode, Step};
pub use grid::{build_grid, toggle_wall, Cell, CellStorage, Grid, Point};
pub use search::{dijkstra, reconstruct_path, GridSearch};
pub use visualizer::{CellState, SearchSummary, Visualizer};
