//! Timed replay of a search: first the visited cells, then the shortest path.
//!
//! Nothing here owns a clock. The caller feeds the elapsed time into [`Playback::advance`] from
//! its own frame loop and gets back the reveals that became due.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use crate::{config::AnimationConfig, grid::Point, search::GridSearch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Visited,
    ShortestPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reveal {
    /// Offset from the start of the playback
    pub at: Duration,
    pub point: Point,
    pub phase: Phase,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    reveals: Vec<Reveal>,
}

impl Timeline {
    /// Visited cell `i` is due at `i * visited_step`. The path starts once the visited phase
    /// has fully elapsed and cell `j` of it is due `j * path_step` later.
    pub fn new(visited: &[Point], path: &[Point], config: &AnimationConfig) -> Self {
        let visited_step = config.visited_step();
        let path_step = config.path_step();
        let path_start = offset(visited_step, visited.len());

        let visited = visited.iter().enumerate().map(|(i, &point)| Reveal {
            at: offset(visited_step, i),
            point,
            phase: Phase::Visited,
        });
        let path = path.iter().enumerate().map(|(i, &point)| Reveal {
            at: path_start.saturating_add(offset(path_step, i)),
            point,
            phase: Phase::ShortestPath,
        });

        Self {
            reveals: visited.chain(path).collect(),
        }
    }

    /// Replays the visited order up to and including the finish, followed by the path if there
    /// is one
    pub fn from_search(search: &GridSearch, config: &AnimationConfig) -> Self {
        let order = search.visited_order();
        let visited = match order.iter().position(|&p| p == search.goal()) {
            Some(finish) => &order[..=finish],
            None => order,
        };
        let path = search
            .shortest_path()
            .map(|result| result.path)
            .unwrap_or_default();

        Self::new(visited, &path, config)
    }

    pub fn reveals(&self) -> &[Reveal] {
        &self.reveals
    }

    pub fn len(&self) -> usize {
        self.reveals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reveals.is_empty()
    }

    /// Offset of the last reveal
    pub fn duration(&self) -> Duration {
        self.reveals.last().map_or(Duration::ZERO, |reveal| reveal.at)
    }
}

/// `n` steps into a phase, clamped to `Duration::MAX` for absurd step sizes
fn offset(step: Duration, n: usize) -> Duration {
    step.saturating_mul(u32::try_from(n).unwrap_or(u32::MAX))
}

/// Shared flag to stop a [`Playback`] from anywhere holding a clone
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug)]
pub struct Playback {
    timeline: Timeline,
    next: usize,
    token: CancellationToken,
}

impl Playback {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            next: 0,
            token: CancellationToken::default(),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The reveals that became due since the last call, in timeline order
    pub fn advance(&mut self, elapsed: Duration) -> &[Reveal] {
        if self.is_cancelled() {
            return &[];
        }

        let start = self.next;
        let due = self.timeline.reveals[start..]
            .iter()
            .take_while(|reveal| reveal.at <= elapsed)
            .count();
        self.next = start + due;

        &self.timeline.reveals[start..self.next]
    }

    pub fn remaining(&self) -> usize {
        self.timeline.len() - self.next
    }

    pub fn is_finished(&self) -> bool {
        self.is_cancelled() || self.remaining() == 0
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::Grid;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn points(n: usize) -> Vec<Point> {
        (0..n).map(|col| Point::new(0, col)).collect()
    }

    #[test]
    fn test_timeline_delays() {
        let config = AnimationConfig {
            visited_step_ms: 10,
            path_step_ms: 50,
        };

        let timeline = Timeline::new(&points(3), &points(2), &config);

        let offsets: Vec<_> = timeline
            .reveals()
            .iter()
            .map(|r| (r.at, r.phase))
            .collect();
        assert_eq!(
            offsets,
            vec![
                (ms(0), Phase::Visited),
                (ms(10), Phase::Visited),
                (ms(20), Phase::Visited),
                (ms(30), Phase::ShortestPath),
                (ms(80), Phase::ShortestPath),
            ]
        );
        assert_eq!(timeline.duration(), ms(80));
    }

    #[test]
    fn test_huge_steps_saturate() {
        let config = AnimationConfig {
            visited_step_ms: u64::MAX,
            path_step_ms: u64::MAX,
        };

        let timeline = Timeline::new(&points(40), &points(3), &config);

        assert_eq!(timeline.len(), 43);
        assert_eq!(timeline.reveals()[0].at, Duration::ZERO);
        assert_eq!(timeline.duration(), Duration::MAX);
        assert!(timeline
            .reveals()
            .windows(2)
            .all(|pair| pair[0].at <= pair[1].at));
    }

    #[test]
    fn test_from_search_stops_at_finish() {
        let grid: Grid = "
            S.F
            ...
            "
        .parse()
        .unwrap();
        let search = grid.solve();

        let timeline = Timeline::from_search(&search, &AnimationConfig::default());

        let visited: Vec<_> = timeline
            .reveals()
            .iter()
            .filter(|r| r.phase == Phase::Visited)
            .map(|r| r.point)
            .collect();
        // (1,1) is as far away as the finish but comes later in row-major order
        assert_eq!(
            visited,
            vec![
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(1, 0),
                Point::new(0, 2),
            ]
        );
        assert_eq!(timeline.len(), 4 + 3);
    }

    #[test]
    fn test_from_search_without_path() {
        let grid: Grid = "
            S#F
            .#.
            "
        .parse()
        .unwrap();

        let timeline = Timeline::from_search(&grid.solve(), &AnimationConfig::default());

        assert_eq!(timeline.len(), 2);
        assert!(timeline
            .reveals()
            .iter()
            .all(|r| r.phase == Phase::Visited));
    }

    #[test]
    fn test_playback_advances_in_order() {
        let timeline = Timeline::new(&points(4), &[], &AnimationConfig::default());
        let mut playback = Playback::new(timeline);

        assert_eq!(playback.advance(ms(0)).len(), 1);
        assert_eq!(playback.advance(ms(5)).len(), 0);

        let due: Vec<_> = playback.advance(ms(25)).iter().map(|r| r.point).collect();
        assert_eq!(due, vec![Point::new(0, 1), Point::new(0, 2)]);
        assert!(!playback.is_finished());
        assert_eq!(playback.remaining(), 1);

        assert_eq!(playback.advance(ms(1000)).len(), 1);
        assert!(playback.is_finished());
        assert!(playback.advance(ms(2000)).is_empty());
    }

    #[test]
    fn test_cancellation() {
        let timeline = Timeline::new(&points(4), &points(4), &AnimationConfig::default());
        let mut playback = Playback::new(timeline);
        let token = playback.token();

        assert_eq!(playback.advance(ms(10)).len(), 2);

        token.cancel();

        assert!(playback.is_cancelled());
        assert!(playback.is_finished());
        assert!(playback.advance(ms(10_000)).is_empty());
        assert_eq!(playback.remaining(), 6);
    }

    #[test]
    fn test_empty_timeline_is_finished() {
        let playback = Playback::new(Timeline::default());

        assert!(playback.is_finished());
        assert_eq!(playback.timeline().duration(), Duration::ZERO);
    }
}
