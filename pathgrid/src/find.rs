use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    fmt::{Debug, Display},
    marker::PhantomData,
    ops::Add,
};

/// Represents both the cost of a single move and the accumulated cost of a path
pub trait Cost: Copy + Ord + Default + Add<Output = Self> + Debug + 'static {}

impl Cost for usize {}

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Debug + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    type Cost: Cost;

    /// Check if the provided node reference is valid
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Check if the node takes part in the search at all
    fn is_passable(&self, node: Self::Reference) -> bool;

    /// Position of the node in the enumeration order of the map. Nodes with equal cost are
    /// visited in this order.
    fn order_of(&self, node: Self::Reference) -> usize;

    /// Return an iterator over the passable neighbors of the provided node and the cost required
    /// to go there
    fn neighbors_of(
        &self,
        node: Self::Reference,
    ) -> impl Iterator<Item = (Self::Reference, Self::Cost)>;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn is_valid(&self, node: Self::Reference) -> bool;
    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

/// The objects that we store in the priority queue
#[derive(Debug)]
struct ToVisit<C: Cost, R: Eq> {
    cost: C,
    order: usize,
    point: R,
}

impl<C: Cost, R: Eq> Ord for ToVisit<C, R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then(self.order.cmp(&other.order))
            .reverse() // reverse for BinaryHeap to be a min-heap
    }
}

impl<C: Cost, R: Eq> PartialOrd for ToVisit<C, R> {
    fn partial_cmp(&self, other: &ToVisit<C, R>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Cost, R: Eq> PartialEq for ToVisit<C, R> {
    fn eq(&self, other: &ToVisit<C, R>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: Cost, R: Eq> Eq for ToVisit<C, R> {}

/// Per node bookkeeping of a single search run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchNode<C, R> {
    /// Best known cost from the start, `None` while the node has not been reached
    pub distance: Option<C>,
    pub visited: bool,
    pub previous: Option<R>,
}

impl<C, R> Default for SearchNode<C, R> {
    fn default() -> Self {
        SearchNode {
            distance: None,
            visited: false,
            previous: None,
        }
    }
}

impl<C: Display, R> Display for SearchNode<C, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.distance {
            Some(distance) if self.visited => write!(f, "{:03} ", distance),
            _ => write!(f, "{:3} ", ""),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<C, R> {
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    pub total_cost: C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFinderState {
    Computing,
    Done,
}

impl PathFinderState {
    pub fn is_done(&self) -> bool {
        matches!(self, PathFinderState::Done)
    }
}

/// Outcome of a single call to [`PathFinder::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<R> {
    /// The node was finalized and appended to the visited order
    Visited(R),
    /// A queue entry that was already finalized or is not passable
    Skipped(R),
    Done,
}

pub struct PathFinder<'a, M: MapTrait> {
    map: &'a M,
    start: M::Reference,
    goal: M::Reference,
    nodes: M::Storage<SearchNode<M::Cost, M::Reference>>,
    visit_list: BinaryHeap<ToVisit<M::Cost, M::Reference>>,
    visited_order: Vec<M::Reference>,
    state: PathFinderState,
}

impl<'a, M: MapTrait> PathFinder<'a, M> {
    /// Prepare a search from `start`. If `start` is not a valid node the search is done right
    /// away without visiting anything.
    pub fn new(map: &'a M, start: M::Reference, goal: M::Reference) -> Self {
        let mut nodes: M::Storage<SearchNode<M::Cost, M::Reference>> = map.create_storage();
        let mut visit_list = BinaryHeap::new();
        let mut state = PathFinderState::Computing;

        if map.is_valid(start) {
            nodes.get_mut(start).distance = Some(M::Cost::default());
            visit_list.push(ToVisit {
                cost: M::Cost::default(),
                order: map.order_of(start),
                point: start,
            });
        } else {
            state = PathFinderState::Done;
        }

        Self {
            map,
            start,
            goal,
            nodes,
            visit_list,
            visited_order: Vec::new(),
            state,
        }
    }

    /// Run the search until every reachable node has been visited
    pub fn finish(
        mut self,
    ) -> SearchOutcome<M::Cost, M::Reference, M::Storage<SearchNode<M::Cost, M::Reference>>> {
        while self.step() != Step::Done {}

        SearchOutcome {
            start: self.start,
            goal: self.goal,
            nodes: self.nodes,
            visited_order: self.visited_order,
            _cost: PhantomData,
        }
    }

    /// Finalize the next node in (cost, enumeration order) order and relax its neighbors
    pub fn step(&mut self) -> Step<M::Reference> {
        if self.state.is_done() {
            return Step::Done;
        }

        let Some(visit) = self.visit_list.pop() else {
            // everything left over is unreachable
            self.state = PathFinderState::Done;
            log::trace!("search exhausted after {} nodes", self.visited_order.len());
            return Step::Done;
        };

        let map = self.map;

        if self.nodes.get(visit.point).visited || !map.is_passable(visit.point) {
            return Step::Skipped(visit.point);
        }

        self.nodes.get_mut(visit.point).visited = true;
        self.visited_order.push(visit.point);
        log::trace!("visited {:?} at cost {:?}", visit.point, visit.cost);

        if visit.point == self.goal {
            log::trace!("reached goal {:?} at cost {:?}", self.goal, visit.cost);
        }

        for (neighbor, move_cost) in map.neighbors_of(visit.point) {
            let node = self.nodes.get_mut(neighbor);
            if node.visited {
                continue;
            }

            let cost = visit.cost + move_cost;
            if node.distance.map_or(true, |distance| cost < distance) {
                node.distance = Some(cost);
                node.previous = Some(visit.point);
                self.visit_list.push(ToVisit {
                    cost,
                    order: map.order_of(neighbor),
                    point: neighbor,
                });
            }
        }

        Step::Visited(visit.point)
    }

    pub fn state(&self) -> PathFinderState {
        self.state
    }

    pub fn visited_order(&self) -> &[M::Reference] {
        &self.visited_order
    }

    /// Best known distance to `node` so far, `None` while it has not been reached
    pub fn distance(&self, node: M::Reference) -> Option<M::Cost> {
        if self.nodes.is_valid(node) {
            self.nodes.get(node).distance
        } else {
            None
        }
    }
}

/// Final state of a completed search
#[derive(Debug, Clone)]
pub struct SearchOutcome<C, R, S> {
    start: R,
    goal: R,
    nodes: S,
    visited_order: Vec<R>,
    _cost: PhantomData<C>,
}

impl<C, R, S> SearchOutcome<C, R, S>
where
    C: Cost,
    R: NodeReference,
    S: MapStorage<SearchNode<C, R>, Reference = R>,
{
    pub fn start(&self) -> R {
        self.start
    }

    pub fn goal(&self) -> R {
        self.goal
    }

    /// Nodes in the exact order they were finalized
    pub fn visited_order(&self) -> &[R] {
        &self.visited_order
    }

    pub fn nodes(&self) -> &S {
        &self.nodes
    }

    fn node(&self, node: R) -> SearchNode<C, R> {
        if self.nodes.is_valid(node) {
            self.nodes.get(node)
        } else {
            SearchNode::default()
        }
    }

    pub fn distance(&self, node: R) -> Option<C> {
        self.node(node).distance
    }

    pub fn previous(&self, node: R) -> Option<R> {
        self.node(node).previous
    }

    pub fn is_visited(&self, node: R) -> bool {
        self.node(node).visited
    }

    pub fn reached_goal(&self) -> bool {
        self.is_visited(self.goal)
    }

    /// Follow the back-references from `node` to the start and return them in start to `node`
    /// order. A node that was never reached yields just itself.
    pub fn path_to(&self, node: R) -> Vec<R> {
        let mut path = vec![node];
        let mut current = node;

        while let Some(previous) = self.previous(current) {
            path.push(previous);
            current = previous;
        }

        path.reverse();
        path
    }

    /// The shortest path to the goal, or `None` when the goal is unreachable
    pub fn shortest_path(&self) -> Option<PathResult<C, R>> {
        if !self.reached_goal() {
            return None;
        }

        Some(PathResult {
            path: self.path_to(self.goal),
            start: self.start,
            goal: self.goal,
            total_cost: self.distance(self.goal)?,
        })
    }
}
