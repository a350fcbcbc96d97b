//! Dijkstra on a [`Grid`] with uniform step cost

use crate::{
    error::{GridError, Result},
    find::{MapStorage, PathFinder, SearchNode, SearchOutcome},
    grid::{CellStorage, Grid, Point},
};

pub type GridSearch = SearchOutcome<usize, Point, CellStorage<SearchNode<usize, Point>>>;

/// Run a complete search from `start`. Every reachable cell ends up in the visited order,
/// `finish` included when it is reachable. Each call starts from fresh search state.
pub fn dijkstra(grid: &Grid, start: Point, finish: Point) -> Result<GridSearch> {
    grid.check(start)?;
    grid.check(finish)?;

    let search = PathFinder::new(grid, start, finish).finish();

    log::debug!(
        "dijkstra {} -> {}: visited {} of {} cells, finish {}",
        start,
        finish,
        search.visited_order().len(),
        grid.rows() * grid.columns(),
        match search.distance(finish) {
            Some(distance) if search.reached_goal() => format!("at distance {distance}"),
            _ => "unreachable".to_owned(),
        }
    );

    Ok(search)
}

/// The path from the start of `search` to `finish`. An unreachable `finish` yields `[finish]`.
pub fn reconstruct_path(search: &GridSearch, finish: Point) -> Result<Vec<Point>> {
    let nodes = search.nodes();
    if !nodes.is_valid(finish) {
        return Err(GridError::OutOfBounds {
            point: finish,
            rows: nodes.rows(),
            columns: nodes.columns(),
        });
    }

    Ok(search.path_to(finish))
}

impl Grid {
    /// Search from this grid's start to its finish
    pub fn solve(&self) -> GridSearch {
        PathFinder::new(self, self.start(), self.finish()).finish()
    }
}
