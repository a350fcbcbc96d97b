use std::{fmt::Display, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    config::GridConfig,
    error::{GridError, Result},
    find::{MapStorage, MapTrait, NodeReference},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True when both points share an edge
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl NodeReference for Point {}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub is_start: bool,
    pub is_finish: bool,
    pub is_wall: bool,
}

impl Cell {
    pub fn point(&self) -> Point {
        Point::new(self.row, self.col)
    }
}

/// A marker that is also a wall is written in lower case
impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match (self.is_start, self.is_finish, self.is_wall) {
            (true, _, false) => 'S',
            (true, _, true) => 's',
            (false, true, false) => 'F',
            (false, true, true) => 'f',
            (false, false, true) => '#',
            (false, false, false) => '.',
        };
        write!(f, "{}", c)
    }
}

/// A rectangular grid of cells with a fixed start and finish.
///
/// A grid is a value: [`Grid::toggle_wall`] returns a new grid and leaves the original untouched.
/// Rows are shared between the two values except for the one that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    columns: usize,
    start: Point,
    finish: Point,
    cells: Vec<Arc<Vec<Cell>>>,
}

impl Grid {
    pub fn new(rows: usize, columns: usize, start: Point, finish: Point) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(GridError::configuration(format!(
                "a {rows}x{columns} grid has no cells"
            )));
        }
        for (name, point) in [("start", start), ("finish", finish)] {
            if point.row >= rows || point.col >= columns {
                return Err(GridError::configuration(format!(
                    "{name} {point} lies outside the {rows}x{columns} grid"
                )));
            }
        }
        if start == finish {
            return Err(GridError::configuration(format!(
                "start and finish are both {start}"
            )));
        }

        let cells = (0..rows)
            .map(|row| {
                let cells = (0..columns)
                    .map(|col| Cell {
                        row,
                        col,
                        is_start: start == Point::new(row, col),
                        is_finish: finish == Point::new(row, col),
                        is_wall: false,
                    })
                    .collect();
                Arc::new(cells)
            })
            .collect();

        Ok(Self {
            rows,
            columns,
            start,
            finish,
            cells,
        })
    }

    pub fn from_config(config: &GridConfig) -> Result<Self> {
        Self::new(config.rows, config.columns, config.start, config.finish)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn finish(&self) -> Point {
        self.finish
    }

    pub fn is_valid(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    pub(crate) fn check(&self, point: Point) -> Result<()> {
        if self.is_valid(point) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds {
                point,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    pub fn get(&self, point: Point) -> Result<&Cell> {
        self.check(point)?;
        Ok(&self.cells[point.row][point.col])
    }

    /// Walls outside the grid do not exist
    pub fn is_wall(&self, point: Point) -> bool {
        self.get(point).map_or(false, |cell| cell.is_wall)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flat_map(|row| row.iter())
    }

    pub fn walls(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells()
            .filter(|cell| cell.is_wall)
            .map(|cell| cell.point())
    }

    /// Returns a copy of the grid with the wall flag of one cell flipped. The start and finish
    /// cells are not special here.
    pub fn toggle_wall(&self, point: Point) -> Result<Grid> {
        self.check(point)?;

        let mut cells = self.cells.clone();
        let row = Arc::make_mut(&mut cells[point.row]);
        row[point.col].is_wall = !row[point.col].is_wall;

        Ok(Grid {
            rows: self.rows,
            columns: self.columns,
            start: self.start,
            finish: self.finish,
            cells,
        })
    }

    /// Render the grid like [`Display`] with the cells of `path` (except start and finish)
    /// drawn as `*`
    pub fn render_path(&self, path: &[Point]) -> String {
        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for row in &self.cells {
            for cell in row.iter() {
                if !cell.is_start && !cell.is_finish && path.contains(&cell.point()) {
                    out.push('*');
                } else {
                    out.push_str(&cell.to_string());
                }
            }
            out.push('\n');
        }
        out
    }
}

pub fn build_grid(rows: usize, columns: usize, start: Point, finish: Point) -> Result<Grid> {
    Grid::new(rows, columns, start, finish)
}

pub fn toggle_wall(grid: &Grid, row: usize, col: usize) -> Result<Grid> {
    grid.toggle_wall(Point::new(row, col))
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.cells {
            for cell in row.iter() {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses the layout written by [`Display`]: `S` start, `F` finish, `#` wall, `.` open, and
/// `s`/`f` for a start or finish that is walled. Blank lines are only allowed around the layout.
impl FromStr for Grid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<&str> = s.lines().map(str::trim).collect();
        let first = lines.iter().position(|line| !line.is_empty());
        let last = lines.iter().rposition(|line| !line.is_empty());
        let lines = match (first, last) {
            (Some(first), Some(last)) => &lines[first..=last],
            _ => &[][..],
        };

        let rows = lines.len();
        let columns = lines.first().map_or(0, |line| line.chars().count());

        let mut start = None;
        let mut finish = None;
        let mut walls = Vec::new();

        for (row, line) in lines.iter().enumerate() {
            if line.chars().count() != columns {
                return Err(GridError::configuration(format!(
                    "row {row} has {} cells, expected {columns}",
                    line.chars().count()
                )));
            }

            for (col, c) in line.chars().enumerate() {
                let point = Point::new(row, col);
                if matches!(c, '#' | 's' | 'f') {
                    walls.push(point);
                }
                match c {
                    '.' | '#' => {}
                    'S' | 's' if start.is_none() => start = Some(point),
                    'F' | 'f' if finish.is_none() => finish = Some(point),
                    'S' | 's' | 'F' | 'f' => {
                        return Err(GridError::configuration(format!(
                            "second '{c}' marker at {point}"
                        )))
                    }
                    _ => {
                        return Err(GridError::configuration(format!(
                            "unknown cell '{c}' at {point}"
                        )))
                    }
                }
            }
        }

        let start = start.ok_or_else(|| GridError::configuration("layout has no start 'S'"))?;
        let finish = finish.ok_or_else(|| GridError::configuration("layout has no finish 'F'"))?;

        let mut grid = Grid::new(rows, columns, start, finish)?;
        for point in walls {
            Arc::make_mut(&mut grid.cells[point.row])[point.col].is_wall = true;
        }

        Ok(grid)
    }
}

/// A MapStorage that stores one value per cell of a rectangular grid, row-major
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    rows: usize,
    columns: usize,
    cells: Vec<T>,
}

impl<T: Default + Clone> CellStorage<T> {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![T::default(); rows * columns],
        }
    }
}

impl<T> CellStorage<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.row < self.rows && node.col < self.columns
    }

    fn get(&self, node: Self::Reference) -> T {
        self.cells[node.row * self.columns + node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.cells[node.row * self.columns + node.col]
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns.max(1)) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl MapTrait for Grid {
    type Reference = Point;
    type Storage<T: Default + Copy + Clone + 'static> = CellStorage<T>;
    type Cost = usize;

    fn is_valid(&self, node: Self::Reference) -> bool {
        Grid::is_valid(self, node)
    }

    fn is_passable(&self, node: Self::Reference) -> bool {
        self.is_valid(node) && !self.is_wall(node)
    }

    fn order_of(&self, node: Self::Reference) -> usize {
        node.row * self.columns + node.col
    }

    fn neighbors_of(
        &self,
        node: Self::Reference,
    ) -> impl Iterator<Item = (Self::Reference, Self::Cost)> {
        let mut points = Vec::with_capacity(4);

        if node.row > 0 {
            points.push(Point::new(node.row - 1, node.col));
        }
        if node.row + 1 < self.rows {
            points.push(Point::new(node.row + 1, node.col));
        }
        if node.col > 0 {
            points.push(Point::new(node.row, node.col - 1));
        }
        if node.col + 1 < self.columns {
            points.push(Point::new(node.row, node.col + 1));
        }

        // walls are not part of the graph
        points.retain(|p| !self.cells[p.row][p.col].is_wall);

        points.into_iter().map(|p| (p, 1))
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        CellStorage::new(self.rows, self.columns)
    }
}
