use std::time::Duration;

use crate::{
    animation::{CancellationToken, Phase, Playback, Timeline},
    config::GridConfig,
    error::{GridError, Result},
    find::{MapStorage, MapTrait},
    grid::{CellStorage, Grid, Point},
};

/// What the presentation layer should show for a cell besides its wall/start/finish marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    #[default]
    Unvisited,
    Visited,
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSummary {
    pub visited: usize,
    /// `None` when the finish could not be reached
    pub distance: Option<usize>,
    pub path: Option<Vec<Point>>,
}

/// All state behind one visualizer view: the grid being edited, the wall painting gesture and
/// the replay of the latest search.
pub struct Visualizer {
    config: GridConfig,
    grid: Grid,
    painting: bool,
    /// In-flight replay and the time it was started at
    playback: Option<(Duration, Playback)>,
    revealed: CellStorage<CellState>,
    summary: Option<SearchSummary>,
}

impl Visualizer {
    pub fn new(config: GridConfig) -> Result<Self> {
        let grid = Grid::from_config(&config)?;
        let revealed: CellStorage<CellState> = grid.create_storage();

        Ok(Self {
            config,
            grid,
            painting: false,
            playback: None,
            revealed,
            summary: None,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn summary(&self) -> Option<&SearchSummary> {
        self.summary.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.playback.is_some()
    }

    pub fn is_painting(&self) -> bool {
        self.painting
    }

    pub fn cell_state(&self, point: Point) -> CellState {
        if self.revealed.is_valid(point) {
            self.revealed.get(point)
        } else {
            CellState::Unvisited
        }
    }

    /// Flip the wall at `point`. The start and finish never become walls, and the grid is
    /// frozen while a replay is running.
    pub fn toggle_wall(&mut self, point: Point) -> Result<()> {
        if self.is_animating() {
            return Err(GridError::AnimationInProgress);
        }

        let cell = self.grid.get(point)?;
        if cell.is_start || cell.is_finish {
            return Err(GridError::ProtectedCell {
                point,
                marker: if cell.is_start { "start" } else { "finish" },
            });
        }

        self.grid = self.grid.toggle_wall(point)?;
        Ok(())
    }

    /// Start a painting gesture, returns true if the grid changed
    pub fn mouse_down(&mut self, point: Point) -> bool {
        self.painting = true;
        self.paint(point)
    }

    /// Continue the painting gesture into `point`, returns true if the grid changed
    pub fn mouse_enter(&mut self, point: Point) -> bool {
        self.painting && self.paint(point)
    }

    pub fn mouse_up(&mut self) {
        self.painting = false;
    }

    fn paint(&mut self, point: Point) -> bool {
        match self.toggle_wall(point) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("ignoring wall toggle: {e}");
                false
            }
        }
    }

    /// Search the current grid and start replaying it at `now`
    pub fn visualize(&mut self, now: Duration) -> Result<&SearchSummary> {
        if self.is_animating() {
            return Err(GridError::AnimationInProgress);
        }

        let search = self.grid.solve();
        let timeline = Timeline::from_search(&search, &self.config.animation);
        let path = search.shortest_path();

        log::info!(
            "visualizing {} visited cells over {:?}, {}",
            search.visited_order().len(),
            timeline.duration(),
            match &path {
                Some(path) => format!("shortest path of length {}", path.total_cost),
                None => "finish is unreachable".to_owned(),
            }
        );

        self.revealed = self.grid.create_storage();
        self.playback = Some((now, Playback::new(timeline)));
        self.painting = false;

        let summary = self.summary.insert(SearchSummary {
            visited: search.visited_order().len(),
            distance: path.as_ref().map(|path| path.total_cost),
            path: path.map(|path| path.path),
        });
        Ok(&*summary)
    }

    /// Apply every reveal that is due at `now`, returns how many cells changed
    pub fn tick(&mut self, now: Duration) -> usize {
        let Some((started, playback)) = self.playback.as_mut() else {
            return 0;
        };

        let due = playback.advance(now.saturating_sub(*started));
        for reveal in due {
            *self.revealed.get_mut(reveal.point) = match reveal.phase {
                Phase::Visited => CellState::Visited,
                Phase::ShortestPath => CellState::Path,
            };
        }
        let changed = due.len();

        if playback.is_finished() {
            log::debug!("replay finished");
            self.playback = None;
        }

        changed
    }

    /// Token that stops the running replay, if any
    pub fn cancellation_token(&self) -> Option<CancellationToken> {
        self.playback.as_ref().map(|(_, playback)| playback.token())
    }

    /// Stop the running replay, cells revealed so far stay revealed
    pub fn cancel(&mut self) {
        if let Some((_, playback)) = self.playback.take() {
            playback.cancel();
            log::debug!("replay cancelled with {} reveals left", playback.remaining());
        }
    }

    /// Forget the latest search
    pub fn clear_search(&mut self) -> Result<()> {
        if self.is_animating() {
            return Err(GridError::AnimationInProgress);
        }

        self.revealed = self.grid.create_storage();
        self.summary = None;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::AnimationConfig;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn small_visualizer() -> Visualizer {
        Visualizer::new(GridConfig {
            rows: 3,
            columns: 3,
            start: Point::new(0, 0),
            finish: Point::new(2, 2),
            animation: AnimationConfig {
                visited_step_ms: 10,
                path_step_ms: 50,
            },
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_config() {
        let config = GridConfig {
            rows: 5,
            columns: 5,
            start: Point::new(5, 0),
            finish: Point::new(0, 0),
            ..Default::default()
        };

        assert!(matches!(
            Visualizer::new(config),
            Err(GridError::Configuration { .. })
        ));
    }

    #[test]
    fn test_markers_are_protected() {
        let mut visualizer = small_visualizer();

        assert!(matches!(
            visualizer.toggle_wall(Point::new(0, 0)),
            Err(GridError::ProtectedCell { marker: "start", .. })
        ));
        assert!(matches!(
            visualizer.toggle_wall(Point::new(2, 2)),
            Err(GridError::ProtectedCell { marker: "finish", .. })
        ));
        assert!(matches!(
            visualizer.toggle_wall(Point::new(3, 3)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(visualizer.grid().walls().count(), 0);
    }

    #[test]
    fn test_painting_gesture() {
        let mut visualizer = small_visualizer();

        // entering cells without a pressed button does nothing
        assert!(!visualizer.mouse_enter(Point::new(1, 1)));

        assert!(visualizer.mouse_down(Point::new(0, 1)));
        assert!(visualizer.is_painting());
        assert!(visualizer.mouse_enter(Point::new(1, 1)));
        assert!(!visualizer.mouse_enter(Point::new(2, 2)));
        visualizer.mouse_up();
        assert!(!visualizer.mouse_enter(Point::new(1, 0)));

        assert_eq!(
            visualizer.grid().walls().collect::<Vec<_>>(),
            vec![Point::new(0, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn test_visualize_and_replay() {
        let mut visualizer = small_visualizer();

        let summary = visualizer.visualize(ms(1000)).unwrap().clone();
        assert_eq!(summary.visited, 9);
        assert_eq!(summary.distance, Some(4));
        assert_eq!(summary.path.as_ref().map(Vec::len), Some(5));
        assert!(visualizer.is_animating());

        assert_eq!(visualizer.tick(ms(1000)), 1);
        assert_eq!(visualizer.cell_state(Point::new(0, 0)), CellState::Visited);
        assert_eq!(visualizer.cell_state(Point::new(2, 2)), CellState::Unvisited);

        // 9 visited cells end at 80ms, the path takes 5 * 50ms more
        assert_eq!(visualizer.tick(ms(1080)), 8);
        assert_eq!(visualizer.cell_state(Point::new(2, 2)), CellState::Visited);
        assert_eq!(visualizer.tick(ms(2000)), 5);
        assert!(!visualizer.is_animating());

        for point in summary.path.unwrap() {
            assert_eq!(visualizer.cell_state(point), CellState::Path);
        }
    }

    #[test]
    fn test_guard_while_animating() {
        let mut visualizer = small_visualizer();

        visualizer.visualize(Duration::ZERO).unwrap();

        assert!(matches!(
            visualizer.visualize(ms(1)),
            Err(GridError::AnimationInProgress)
        ));
        assert!(matches!(
            visualizer.toggle_wall(Point::new(1, 1)),
            Err(GridError::AnimationInProgress)
        ));
        assert!(matches!(
            visualizer.clear_search(),
            Err(GridError::AnimationInProgress)
        ));
    }

    #[test]
    fn test_cancel_keeps_revealed_cells() {
        let mut visualizer = small_visualizer();
        visualizer.visualize(Duration::ZERO).unwrap();
        visualizer.tick(ms(15));

        visualizer.cancel();

        assert!(!visualizer.is_animating());
        assert_eq!(visualizer.tick(ms(10_000)), 0);
        assert_eq!(visualizer.cell_state(Point::new(0, 1)), CellState::Visited);
        assert_eq!(visualizer.cell_state(Point::new(2, 2)), CellState::Unvisited);

        // a new run is allowed again
        assert!(visualizer.visualize(ms(20_000)).is_ok());
    }

    #[test]
    fn test_external_cancellation_token() {
        let mut visualizer = small_visualizer();
        visualizer.visualize(Duration::ZERO).unwrap();
        let token = visualizer.cancellation_token().unwrap();

        token.cancel();

        assert_eq!(visualizer.tick(ms(10_000)), 0);
        assert!(!visualizer.is_animating());
        assert!(visualizer.cancellation_token().is_none());
    }

    #[test]
    fn test_clear_search() {
        let mut visualizer = small_visualizer();
        visualizer.toggle_wall(Point::new(1, 1)).unwrap();
        visualizer.visualize(Duration::ZERO).unwrap();
        visualizer.tick(ms(10_000));

        visualizer.clear_search().unwrap();

        assert!(visualizer.summary().is_none());
        assert_eq!(visualizer.cell_state(Point::new(0, 0)), CellState::Unvisited);
        // walls survive
        assert!(visualizer.grid().is_wall(Point::new(1, 1)));
    }

    #[test]
    fn test_extreme_step_config() {
        let config = GridConfig::from_json(
            r#"{
                "rows": 40,
                "columns": 40,
                "start": { "row": 0, "col": 0 },
                "finish": { "row": 39, "col": 39 },
                "animation": { "visited_step_ms": 18446744073709551615 }
            }"#,
        )
        .unwrap();
        let mut visualizer = Visualizer::new(config).unwrap();

        let summary = visualizer.visualize(Duration::ZERO).unwrap();
        assert_eq!(summary.visited, 1600);

        // only the start is due, the rest lies beyond any reachable time
        assert_eq!(visualizer.tick(ms(1_000_000)), 1);
        assert!(visualizer.is_animating());
    }

    #[test]
    fn test_unreachable_finish() {
        let mut visualizer = small_visualizer();
        visualizer.toggle_wall(Point::new(1, 2)).unwrap();
        visualizer.toggle_wall(Point::new(2, 1)).unwrap();

        let summary = visualizer.visualize(Duration::ZERO).unwrap();

        assert_eq!(summary.visited, 6);
        assert_eq!(summary.distance, None);
        assert_eq!(summary.path, None);
    }
}
