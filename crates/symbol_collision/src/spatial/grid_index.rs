//! Uniform grid spatial index for screen-space collision geometry
//!
//! Divides the padded viewport into square cells and records, per cell, the
//! entries whose bounds overlap it. Entries are axis-aligned boxes or
//! circles tagged with a caller-defined key. The grid only grows during a
//! frame; it is rebuilt from scratch for the next one.

use std::collections::HashSet;

/// Axis-aligned rectangle in grid pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridBox {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
}

impl GridBox {
    /// Create a box from its corners
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Check if two boxes overlap (touching edges count)
    pub fn intersects(&self, other: &GridBox) -> bool {
        self.x1 <= other.x2 && self.y1 <= other.y2 && self.x2 >= other.x1 && self.y2 >= other.y1
    }
}

/// Circle in grid pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCircle {
    /// Center X
    pub x: f32,
    /// Center Y
    pub y: f32,
    /// Radius
    pub radius: f32,
}

impl GridCircle {
    /// Create a circle
    pub const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self { x, y, radius }
    }

    /// Bounding square of the circle
    pub fn bounds(&self) -> GridBox {
        GridBox::new(
            self.x - self.radius,
            self.y - self.radius,
            self.x + self.radius,
            self.y + self.radius,
        )
    }

    /// Check if two circles overlap (touching does not count)
    pub fn intersects_circle(&self, other: &GridCircle) -> bool {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let both_radii = self.radius + other.radius;
        both_radii * both_radii > dx * dx + dy * dy
    }

    /// Check if the circle overlaps a box
    pub fn intersects_box(&self, rect: &GridBox) -> bool {
        let half_width = (rect.x2 - rect.x1) / 2.0;
        let dist_x = (self.x - (rect.x1 + half_width)).abs();
        if dist_x > half_width + self.radius {
            return false;
        }

        let half_height = (rect.y2 - rect.y1) / 2.0;
        let dist_y = (self.y - (rect.y1 + half_height)).abs();
        if dist_y > half_height + self.radius {
            return false;
        }

        if dist_x <= half_width || dist_y <= half_height {
            return true;
        }

        // Closest feature is a corner
        let dx = dist_x - half_width;
        let dy = dist_y - half_height;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// Geometry stored at a grid entry
#[derive(Debug, Clone, Copy)]
enum Shape {
    Box(GridBox),
    Circle(GridCircle),
}

impl Shape {
    fn bounds(&self) -> GridBox {
        match self {
            Shape::Box(rect) => *rect,
            Shape::Circle(circle) => circle.bounds(),
        }
    }

    fn hits_box(&self, query: &GridBox) -> bool {
        match self {
            Shape::Box(rect) => rect.intersects(query),
            Shape::Circle(circle) => circle.intersects_box(query),
        }
    }

    fn hits_circle(&self, query: &GridCircle) -> bool {
        match self {
            Shape::Box(rect) => query.intersects_box(rect),
            Shape::Circle(circle) => circle.intersects_circle(query),
        }
    }
}

/// Entry returned by [`GridIndex::query`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEntry<K> {
    /// Key the geometry was inserted under
    pub key: K,
    /// Bounding rectangle (circles report their bounding square)
    pub bounds: GridBox,
}

/// Uniform grid over `[0, width] x [0, height]`
///
/// Geometry outside the grid bounds is still accepted; it is filed under
/// the nearest border cells.
#[derive(Debug, Clone)]
pub struct GridIndex<K> {
    width: f32,
    height: f32,
    cell_size: f32,
    columns: usize,
    rows: usize,
    /// Entry indices per cell, row-major
    cells: Vec<Vec<u32>>,
    entries: Vec<(K, Shape)>,
}

impl<K: Copy> GridIndex<K> {
    /// Create an empty grid
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let columns = (width / cell_size).ceil().max(1.0) as usize;
        let rows = (height / cell_size).ceil().max(1.0) as usize;
        log::trace!(
            "GridIndex {}x{} with {}px cells ({} x {})",
            width,
            height,
            cell_size,
            columns,
            rows
        );
        Self {
            width,
            height,
            cell_size,
            columns,
            rows,
            cells: vec![Vec::new(); columns * rows],
            entries: Vec::new(),
        }
    }

    /// Grid width in pixels
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Grid height in pixels
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Number of inserted entries (boxes and circles)
    pub fn keys_len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been inserted yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an axis-aligned box
    pub fn insert(&mut self, key: K, rect: GridBox) {
        self.insert_shape(key, Shape::Box(rect));
    }

    /// Insert a circle
    pub fn insert_circle(&mut self, key: K, circle: GridCircle) {
        self.insert_shape(key, Shape::Circle(circle));
    }

    fn insert_shape(&mut self, key: K, shape: Shape) {
        let index = self.entries.len() as u32;
        let (c0, r0, c1, r1) = self.cell_range(&shape.bounds());
        for row in r0..=r1 {
            for column in c0..=c1 {
                self.cells[row * self.columns + column].push(index);
            }
        }
        self.entries.push((key, shape));
    }

    /// All entries overlapping `rect`, each reported once
    ///
    /// Order is deterministic: cells row by row, insertion order within a cell.
    pub fn query(&self, rect: &GridBox) -> Vec<GridEntry<K>> {
        let mut results = Vec::new();
        if self.misses_grid(rect) {
            return results;
        }

        if self.covers_grid(rect) {
            results.extend(
                self.entries
                    .iter()
                    .filter(|(_, shape)| shape.hits_box(rect))
                    .map(|(key, shape)| GridEntry { key: *key, bounds: shape.bounds() }),
            );
            return results;
        }

        let mut seen = HashSet::new();
        let (c0, r0, c1, r1) = self.cell_range(rect);
        for row in r0..=r1 {
            for column in c0..=c1 {
                for &index in &self.cells[row * self.columns + column] {
                    if !seen.insert(index) {
                        continue;
                    }
                    let (key, shape) = &self.entries[index as usize];
                    if shape.hits_box(rect) {
                        results.push(GridEntry { key: *key, bounds: shape.bounds() });
                    }
                }
            }
        }
        results
    }

    /// Check if `rect` overlaps any entry whose key passes `predicate`
    pub fn hit_test<P>(&self, rect: &GridBox, predicate: P) -> bool
    where
        P: Fn(&K) -> bool,
    {
        if self.misses_grid(rect) {
            return false;
        }
        self.any_in_cells(rect, |key, shape| shape.hits_box(rect) && predicate(key))
    }

    /// Check if `circle` overlaps any entry whose key passes `predicate`
    pub fn hit_test_circle<P>(&self, circle: &GridCircle, predicate: P) -> bool
    where
        P: Fn(&K) -> bool,
    {
        let bounds = circle.bounds();
        if self.misses_grid(&bounds) {
            return false;
        }
        self.any_in_cells(&bounds, |key, shape| shape.hits_circle(circle) && predicate(key))
    }

    fn any_in_cells<F>(&self, rect: &GridBox, test: F) -> bool
    where
        F: Fn(&K, &Shape) -> bool,
    {
        let (c0, r0, c1, r1) = self.cell_range(rect);
        for row in r0..=r1 {
            for column in c0..=c1 {
                let hit = self.cells[row * self.columns + column].iter().any(|&index| {
                    let (key, shape) = &self.entries[index as usize];
                    test(key, shape)
                });
                if hit {
                    return true;
                }
            }
        }
        false
    }

    fn misses_grid(&self, rect: &GridBox) -> bool {
        rect.x2 < 0.0 || rect.x1 > self.width || rect.y2 < 0.0 || rect.y1 > self.height
    }

    fn covers_grid(&self, rect: &GridBox) -> bool {
        rect.x1 <= 0.0 && rect.y1 <= 0.0 && self.width <= rect.x2 && self.height <= rect.y2
    }

    fn column(&self, x: f32) -> usize {
        ((x / self.cell_size).floor().max(0.0) as usize).min(self.columns - 1)
    }

    fn row(&self, y: f32) -> usize {
        ((y / self.cell_size).floor().max(0.0) as usize).min(self.rows - 1)
    }

    /// Clamped (first column, first row, last column, last row) covered by `rect`
    fn cell_range(&self, rect: &GridBox) -> (usize, usize, usize, usize) {
        (self.column(rect.x1), self.row(rect.y1), self.column(rect.x2), self.row(rect.y2))
    }
}
