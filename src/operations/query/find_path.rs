use std::cmp::Ordering;
use std::collections::BinaryHeap;

use slotmap::SecondaryMap;
use tracing::debug;

use crate::error::Result;
use crate::math::spherical::angular_distance;
use crate::math::Point3;
use crate::topology::{CellId, Grid, DEFAULT_MOVEMENT_COST};

/// An ordered route across the grid.
///
/// A path always holds at least one cell: a route from a cell to itself is
/// that single cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPath {
    cells: Vec<CellId>,
    cost: f64,
}

impl GridPath {
    /// First cell of the route.
    #[must_use]
    pub fn start(&self) -> CellId {
        self.cells[0]
    }

    /// Last cell of the route.
    #[must_use]
    pub fn goal(&self) -> CellId {
        self.cells[self.cells.len() - 1]
    }

    /// Cells in traversal order, including start and goal.
    #[must_use]
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    #[must_use]
    pub fn into_cells(self) -> Vec<CellId> {
        self.cells
    }

    /// Sum of the movement costs of every cell entered after the start.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of steps between cells (one less than the number of cells).
    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    #[must_use]
    pub fn contains(&self, cell: CellId) -> bool {
        self.cells.contains(&cell)
    }
}

/// Finds the cheapest path between two cells with A*.
///
/// The cost of a path is the sum of the movement costs of the cells it
/// enters; the start cell is free. Cells with an infinite movement cost are
/// never entered.
///
/// The heuristic is the great-circle angle to the goal divided by the grid's
/// widest neighbor step, which never exceeds the number of remaining hops.
/// It is therefore admissible, and the returned path optimal, as long as no
/// movement cost is below [`DEFAULT_MOVEMENT_COST`]. Callers that use smaller
/// costs still get a valid path, but not necessarily the cheapest one.
pub struct FindPath {
    start: CellId,
    goal: CellId,
    max_expansions: Option<usize>,
}

impl FindPath {
    /// Creates a new `FindPath` query.
    #[must_use]
    pub fn new(start: CellId, goal: CellId) -> Self {
        Self {
            start,
            goal,
            max_expansions: None,
        }
    }

    /// Gives up (returning no path) after expanding `limit` cells.
    #[must_use]
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    /// Executes the search.
    ///
    /// Returns `Ok(None)` when the goal is unreachable or the expansion
    /// budget runs out.
    ///
    /// # Errors
    ///
    /// Returns an error if the start or goal is not part of the grid.
    pub fn execute(&self, grid: &Grid) -> Result<Option<GridPath>> {
        let start = self.start;
        let goal = self.goal;
        let start_center = *grid.try_cell(start)?.center_unit();
        let goal_center = *grid.try_cell(goal)?.center_unit();

        if start == goal {
            return Ok(Some(GridPath {
                cells: vec![start],
                cost: 0.0,
            }));
        }

        let heuristic = Heuristic::new(grid, goal_center);
        let mut best_g: SecondaryMap<CellId, f64> = SecondaryMap::new();
        let mut came_from: SecondaryMap<CellId, CellId> = SecondaryMap::new();
        let mut open = BinaryHeap::new();
        let mut expansions = 0usize;

        best_g.insert(start, 0.0);
        open.push(Frontier {
            f: heuristic.estimate(&start_center),
            g: 0.0,
            cell: start,
        });

        while let Some(Frontier { g, cell, .. }) = open.pop() {
            if cell == goal {
                let cells = reconstruct(&came_from, start, goal);
                debug!(hops = cells.len() - 1, cost = g, expansions, "path found");
                return Ok(Some(GridPath { cells, cost: g }));
            }
            // Stale entry superseded by a cheaper route.
            if best_g.get(cell).is_some_and(|&best| g > best) {
                continue;
            }

            expansions += 1;
            if self.max_expansions.is_some_and(|limit| expansions > limit) {
                debug!(expansions, "path search budget exhausted");
                return Ok(None);
            }

            let Some(current) = grid.cell(cell) else {
                continue;
            };
            for &next in current.neighbors() {
                let Some(next_cell) = grid.cell(next) else {
                    continue;
                };
                let step = next_cell.movement_cost();
                if step.is_infinite() {
                    continue;
                }

                let tentative = g + step;
                if best_g.get(next).is_none_or(|&best| tentative < best) {
                    best_g.insert(next, tentative);
                    came_from.insert(next, cell);
                    open.push(Frontier {
                        f: tentative + heuristic.estimate(next_cell.center_unit()),
                        g: tentative,
                        cell: next,
                    });
                }
            }
        }

        debug!(expansions, "no path between cells");
        Ok(None)
    }
}

/// Lower bound on the remaining cost, in units of the minimum step cost.
struct Heuristic {
    goal: Point3,
    per_radian: f64,
}

impl Heuristic {
    fn new(grid: &Grid, goal: Point3) -> Self {
        let widest = grid.max_step_angle();
        let per_radian = if widest > 0.0 {
            DEFAULT_MOVEMENT_COST / widest
        } else {
            0.0
        };
        Self { goal, per_radian }
    }

    fn estimate(&self, center: &Point3) -> f64 {
        angular_distance(center, &self.goal) * self.per_radian
    }
}

/// Open-set entry.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    f: f64,
    g: f64,
    cell: CellId,
}

impl Ord for Frontier {
    // BinaryHeap is a max-heap: the greatest entry has the lowest f, then the
    // highest g (furthest along its path), then the lowest ID.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| self.g.total_cmp(&other.g))
            .then_with(|| other.cell.cmp(&self.cell))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// Walks predecessor links back from `goal` to `start`.
fn reconstruct(
    came_from: &SecondaryMap<CellId, CellId>,
    start: CellId,
    goal: CellId,
) -> Vec<CellId> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::build_grid;
    use crate::error::{ArgumentError, GridError};
    use std::collections::{HashSet, VecDeque};

    /// Hop distances from `start` by breadth-first search.
    fn bfs_hops(grid: &Grid, start: CellId) -> SecondaryMap<CellId, usize> {
        let mut dist = SecondaryMap::new();
        let mut queue = VecDeque::new();
        dist.insert(start, 0);
        queue.push_back(start);
        while let Some(cell) = queue.pop_front() {
            let d = dist[cell];
            for &n in grid.cell(cell).unwrap().neighbors() {
                if !dist.contains_key(n) {
                    dist.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }

    fn assert_contiguous(grid: &Grid, path: &GridPath) {
        for pair in path.cells().windows(2) {
            assert!(grid.cell(pair[0]).unwrap().neighbors().contains(&pair[1]));
        }
    }

    /// The cell whose center is furthest from `from`.
    fn antipode(grid: &Grid, from: CellId) -> CellId {
        let origin = *grid.cell(from).unwrap().center_unit();
        grid.cells()
            .min_by(|a, b| {
                let da = a.center_unit().coords.dot(&origin.coords);
                let db = b.center_unit().coords.dot(&origin.coords);
                da.total_cmp(&db)
            })
            .unwrap()
            .id()
    }

    /// Removes every link to and from `cell`.
    fn isolate(grid: &mut Grid, cell: CellId) {
        let neighbors = grid.cell(cell).unwrap().neighbors().to_vec();
        for n in neighbors {
            grid.cell_mut(n).unwrap().neighbors.retain(|&c| c != cell);
        }
        grid.cell_mut(cell).unwrap().neighbors.clear();
    }

    #[test]
    fn path_to_self_is_single_cell() {
        let grid = build_grid(1.0, 1).unwrap();
        for id in grid.ids() {
            let path = grid.find_path(id, id).unwrap().unwrap();
            assert_eq!(path.cells(), &[id]);
            assert_eq!(path.start(), id);
            assert_eq!(path.goal(), id);
            assert_eq!(path.hop_count(), 0);
            assert_eq!(path.cost(), 0.0);
        }
    }

    #[test]
    fn path_to_neighbor_is_one_hop() {
        let grid = build_grid(1.0, 2).unwrap();
        let cell = grid.cells().nth(20).unwrap();
        for &n in cell.neighbors() {
            let path = grid.find_path(cell.id(), n).unwrap().unwrap();
            assert_eq!(path.cells(), &[cell.id(), n]);
            assert_eq!(path.cost(), 1.0);
        }
    }

    #[test]
    fn uniform_cost_paths_match_bfs() {
        for depth in 0..=1 {
            let grid = build_grid(1.0, depth).unwrap();
            for start in grid.ids() {
                let hops = bfs_hops(&grid, start);
                for goal in grid.ids() {
                    let path = grid.find_path(start, goal).unwrap().unwrap();
                    assert_eq!(path.hop_count(), hops[goal]);
                    assert_eq!(path.start(), start);
                    assert_eq!(path.goal(), goal);
                    assert_eq!(path.cells().first(), Some(&start));
                    assert_eq!(path.cells().last(), Some(&goal));
                    assert_contiguous(&grid, &path);
                }
            }
        }
    }

    #[test]
    fn hop_count_is_symmetric() {
        let grid = build_grid(1.0, 2).unwrap();
        let ids: Vec<CellId> = grid.ids().step_by(7).collect();
        for &a in &ids {
            for &b in &ids {
                let ab = grid.find_path(a, b).unwrap().unwrap();
                let ba = grid.find_path(b, a).unwrap().unwrap();
                assert_eq!(ab.hop_count(), ba.hop_count());
            }
        }
    }

    #[test]
    fn antipodal_path_on_deeper_grid_is_optimal() {
        let grid = build_grid(1.0, 3).unwrap();
        let start = grid.ids().next().unwrap();
        let goal = antipode(&grid, start);
        let path = grid.find_path(start, goal).unwrap().unwrap();
        assert_eq!(path.hop_count(), bfs_hops(&grid, start)[goal]);
        assert_contiguous(&grid, &path);
    }

    #[test]
    fn cost_is_sum_of_entered_cells() {
        let grid = build_grid(1.0, 2).unwrap();
        for (i, cell) in grid.cells().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let cost = 1.0 + (i % 4) as f64;
            cell.set_movement_cost(cost).unwrap();
        }
        let start = grid.ids().next().unwrap();
        let goal = antipode(&grid, start);
        let path = grid.find_path(start, goal).unwrap().unwrap();
        let expected: f64 = path.cells()[1..]
            .iter()
            .map(|&c| grid.cell(c).unwrap().movement_cost())
            .sum();
        assert!((path.cost() - expected).abs() < 1e-9);
    }

    #[test]
    fn expensive_cell_is_routed_around() {
        let grid = build_grid(1.0, 1).unwrap();

        // Two cells two hops apart whose shortest route has a single middle cell.
        let (start, goal, middle) = grid
            .ids()
            .flat_map(|a| grid.ids().map(move |b| (a, b)))
            .find_map(|(a, b)| {
                let na: HashSet<CellId> =
                    grid.cell(a).unwrap().neighbors().iter().copied().collect();
                if a == b || na.contains(&b) {
                    return None;
                }
                let common: Vec<CellId> = grid
                    .cell(b)
                    .unwrap()
                    .neighbors()
                    .iter()
                    .copied()
                    .filter(|c| na.contains(c))
                    .collect();
                match common[..] {
                    [middle] => Some((a, b, middle)),
                    _ => None,
                }
            })
            .unwrap();

        let before = grid.find_path(start, goal).unwrap().unwrap();
        assert_eq!(before.cells(), &[start, middle, goal]);

        grid.set_movement_cost(middle, 1000.0).unwrap();
        let after = grid.find_path(start, goal).unwrap().unwrap();
        assert!(!after.contains(middle));
        assert!(after.hop_count() > before.hop_count());
        assert!(after.cost() < 1000.0);
        assert_contiguous(&grid, &after);
    }

    #[test]
    fn disconnected_goal_is_not_found() {
        let mut grid = build_grid(1.0, 1).unwrap();
        let start = grid.ids().next().unwrap();
        let goal = antipode(&grid, start);
        isolate(&mut grid, goal);

        assert!(grid.find_path(start, goal).unwrap().is_none());
        assert!(grid.find_path(goal, start).unwrap().is_none());
    }

    #[test]
    fn impassable_ring_blocks_path() {
        let grid = build_grid(1.0, 2).unwrap();
        let start = grid.ids().next().unwrap();
        let goal = antipode(&grid, start);
        for &n in grid.cell(goal).unwrap().neighbors() {
            grid.set_movement_cost(n, f64::INFINITY).unwrap();
        }
        assert!(grid.find_path(start, goal).unwrap().is_none());
    }

    #[test]
    fn impassable_goal_is_unreachable() {
        let grid = build_grid(1.0, 1).unwrap();
        let start = grid.ids().next().unwrap();
        let goal = grid.cell(start).unwrap().neighbors()[0];
        grid.set_movement_cost(goal, f64::INFINITY).unwrap();
        assert!(grid.find_path(start, goal).unwrap().is_none());
        // The start cell is never entered, so its cost does not matter.
        assert!(grid.find_path(goal, start).unwrap().is_some());
    }

    #[test]
    fn unknown_cell_is_an_argument_error() {
        let grid = build_grid(1.0, 1).unwrap();
        let known = grid.ids().next().unwrap();
        // Keys past the end of this grid's arena belong to no cell here.
        let other = build_grid(1.0, 2).unwrap();
        let foreign = other.ids().last().unwrap();

        assert!(matches!(
            grid.find_path(known, foreign),
            Err(GridError::Argument(ArgumentError::UnknownCell(_)))
        ));
        assert!(matches!(
            grid.find_path(foreign, known),
            Err(GridError::Argument(ArgumentError::UnknownCell(_)))
        ));
    }

    #[test]
    fn budget_exhaustion_returns_none() {
        let grid = build_grid(1.0, 3).unwrap();
        let start = grid.ids().next().unwrap();
        let goal = antipode(&grid, start);

        let limited = FindPath::new(start, goal).with_max_expansions(1).execute(&grid);
        assert!(limited.unwrap().is_none());

        let generous = FindPath::new(start, goal)
            .with_max_expansions(grid.len())
            .execute(&grid);
        assert!(generous.unwrap().is_some());
    }

    #[test]
    fn equal_f_prefers_larger_g() {
        let mut ids: slotmap::SlotMap<CellId, ()> = slotmap::SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());
        let mut heap = BinaryHeap::new();
        heap.push(Frontier { f: 3.0, g: 1.0, cell: a });
        heap.push(Frontier { f: 3.0, g: 2.0, cell: b });
        heap.push(Frontier { f: 4.0, g: 4.0, cell: a });
        assert_eq!(heap.pop().unwrap().cell, b);
        assert_eq!(heap.pop().unwrap().cell, a);
        assert_eq!(heap.pop().unwrap().f, 4.0);
    }

    #[test]
    fn concurrent_queries_share_the_grid() {
        let grid = build_grid(1.0, 2).unwrap();
        let start = grid.ids().next().unwrap();
        let goal = antipode(&grid, start);
        let expected = grid.find_path(start, goal).unwrap().unwrap().hop_count();

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    let path = grid.find_path(start, goal).unwrap().unwrap();
                    assert_eq!(path.hop_count(), expected);
                });
            }
            s.spawn(|| {
                let far = grid.ids().nth(100).unwrap();
                grid.set_movement_cost(far, 1.5).unwrap();
            });
        });
    }
}
