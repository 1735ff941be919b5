//! Broad-phase collision detection using a uniform grid over the x/z plane.
//!
//! Colliders are bucketed by the cell containing their center. Queries scan a
//! footprint around each collider (the cells its bounds overlap, grown by one
//! ring) so shapes straddling a cell boundary are still paired. The grid only
//! stores [`ColliderKey`] handles; geometry is read through a
//! [`ColliderSource`] supplied by the caller.

use std::collections::{HashMap, HashSet};

use tracing::{trace, warn};

use crate::collider::{Aabb, Collider};
use crate::collision::{Collision, NarrowPhase};
use crate::error::PhysicsError;
use crate::types::{ColliderKey, EntityId};

/// Upper bound on cells along one side of the grid.
pub const MAX_CELLS_PER_SIDE: i32 = 1024;

/// Integer bucket coordinates: `row` follows world z, `col` follows world x.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    pub row: i32,
    pub col: i32,
}

/// Read access to the colliders and masses the grid indexes.
pub trait ColliderSource {
    /// # Errors
    ///
    /// Fails when the handle's entity or slot is unknown.
    fn collider(&self, key: ColliderKey) -> Result<&Collider, PhysicsError>;

    /// # Errors
    ///
    /// Fails when the entity is unknown.
    fn inverse_mass(&self, entity: EntityId) -> Result<f32, PhysicsError>;
}

/// Statistics about the spatial grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialGridStats {
    pub occupied_cells: usize,
    pub total_entries: usize,
    pub average_entries_per_cell: f32,
}

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    grid_length: f32,
    cell_half_width: f32,
    cells_per_side: i32,
    cells: Vec<Vec<ColliderKey>>,
    filed: HashMap<ColliderKey, CellCoord>,
}

impl SpatialGrid {
    /// Square grid of side `grid_length` centred on the origin, with cells of
    /// side `2 * cell_half_width`. Both values must be positive. The cell count
    /// per side is capped at [`MAX_CELLS_PER_SIDE`]; positions beyond the
    /// capped extent clamp to the border cells.
    #[must_use]
    pub fn new(grid_length: f32, cell_half_width: f32) -> Self {
        let cell_size = 2.0 * cell_half_width;
        #[allow(clippy::cast_possible_truncation)]
        let cells_per_side =
            ((grid_length / cell_size).ceil() as i32).clamp(1, MAX_CELLS_PER_SIDE);
        let cell_count = cells_per_side
            .checked_mul(cells_per_side)
            .and_then(|count| usize::try_from(count).ok())
            .unwrap_or(1);
        Self {
            grid_length,
            cell_half_width,
            cells_per_side,
            cells: vec![Vec::new(); cell_count],
            filed: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn cells_per_side(&self) -> i32 {
        self.cells_per_side
    }

    #[must_use]
    pub fn cell_size(&self) -> f32 {
        2.0 * self.cell_half_width
    }

    /// Number of colliders currently filed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filed.is_empty()
    }

    #[must_use]
    pub fn cell_of(&self, key: ColliderKey) -> Option<CellCoord> {
        self.filed.get(&key).copied()
    }

    /// Colliders filed in one cell, in insertion order.
    #[must_use]
    pub fn cell_entries(&self, cell: CellCoord) -> &[ColliderKey] {
        self.index_of(cell).map_or(&[], |index| &self.cells[index])
    }

    /// Cell a world point maps to. Points outside the grid clamp to the border cells.
    #[must_use]
    pub fn cell_for(&self, point: glam::Vec3) -> CellCoord {
        CellCoord {
            row: self.axis_cell(point.z),
            col: self.axis_cell(point.x),
        }
    }

    fn axis_cell(&self, coordinate: f32) -> i32 {
        let offset = (coordinate + self.grid_length * 0.5) / self.cell_size();
        #[allow(clippy::cast_possible_truncation)]
        let cell = offset.floor() as i32;
        cell.clamp(0, self.cells_per_side - 1)
    }

    /// Whether a world point lies inside the x/z extent covered by the cells.
    #[must_use]
    pub fn contains_point(&self, point: glam::Vec3) -> bool {
        #[allow(clippy::cast_precision_loss)]
        let span = self.cells_per_side as f32 * self.cell_size();
        let origin = -self.grid_length * 0.5;
        let inside = |coordinate: f32| coordinate >= origin && coordinate < origin + span;
        inside(point.x) && inside(point.z)
    }

    fn index_of(&self, cell: CellCoord) -> Option<usize> {
        let n = self.cells_per_side;
        if (0..n).contains(&cell.row) && (0..n).contains(&cell.col) {
            usize::try_from(cell.row * n + cell.col).ok()
        } else {
            None
        }
    }

    /// File a collider under the cell matching its center and record the cell on it.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::AlreadyInGrid`] when the key is already filed.
    pub fn insert(
        &mut self,
        key: ColliderKey,
        collider: &mut Collider,
    ) -> Result<CellCoord, PhysicsError> {
        if self.filed.contains_key(&key) {
            return Err(PhysicsError::AlreadyInGrid(key));
        }
        let cell = self.cell_for(collider.center());
        if !self.contains_point(collider.center()) {
            warn!(
                %key,
                center = ?collider.center(),
                ?cell,
                "collider outside grid extent, filed in border cell"
            );
        }
        let index = self.index_of(cell).ok_or(PhysicsError::NotInGrid(key))?;
        self.cells[index].push(key);
        self.filed.insert(key, cell);
        collider.cell = Some(cell);
        Ok(cell)
    }

    /// Unfile a collider from the cell recorded on it.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::NotInGrid`] when the collider has no recorded cell or the
    /// cell does not hold it.
    pub fn remove(
        &mut self,
        key: ColliderKey,
        collider: &mut Collider,
    ) -> Result<CellCoord, PhysicsError> {
        let cell = collider.cell.ok_or(PhysicsError::NotInGrid(key))?;
        let index = self.index_of(cell).ok_or(PhysicsError::NotInGrid(key))?;
        let bucket = &mut self.cells[index];
        let position = bucket
            .iter()
            .position(|k| *k == key)
            .ok_or(PhysicsError::NotInGrid(key))?;
        bucket.remove(position);
        self.filed.remove(&key);
        collider.cell = None;
        Ok(cell)
    }

    /// Move a collider to the cell matching its current center if it changed.
    /// Returns whether a move happened.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::NotInGrid`] when the collider was never filed.
    pub fn rebucket(
        &mut self,
        key: ColliderKey,
        collider: &mut Collider,
    ) -> Result<bool, PhysicsError> {
        let current = collider.cell.ok_or(PhysicsError::NotInGrid(key))?;
        let target = self.cell_for(collider.center());
        if current == target {
            return Ok(false);
        }
        self.remove(key, collider)?;
        self.insert(key, collider)?;
        trace!(%key, ?current, ?target, "collider changed cell");
        Ok(true)
    }

    /// Cells scanned for partners of a collider with the given bounds.
    fn footprint(&self, bounds: &Aabb) -> impl Iterator<Item = CellCoord> {
        let low = self.cell_for(bounds.min);
        let high = self.cell_for(bounds.max);
        let last = self.cells_per_side - 1;
        let rows = (low.row - 1).max(0)..=(high.row + 1).min(last);
        let cols = (low.col - 1).max(0)..=(high.col + 1).min(last);
        rows.flat_map(move |row| cols.clone().map(move |col| CellCoord { row, col }))
    }

    /// Pair every filed collider with the colliders in its footprint and run
    /// the narrow phase on each distinct pair. Pairs are ordered by key, never
    /// join two colliders of the same entity, and are reported once.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures from `source`, which mean the grid holds a
    /// handle the caller no longer knows.
    pub fn check_collisions<S>(
        &self,
        source: &S,
        narrow_phase: &NarrowPhase,
    ) -> Result<Vec<Collision>, PhysicsError>
    where
        S: ColliderSource + ?Sized,
    {
        let mut seen = HashSet::new();
        let mut collisions = Vec::new();

        for bucket in &self.cells {
            for &key_a in bucket {
                let bounds = *source.collider(key_a)?.aabb();
                for cell in self.footprint(&bounds) {
                    for &key_b in self.cell_entries(cell) {
                        if key_a.entity == key_b.entity {
                            continue;
                        }
                        let pair = if key_a < key_b { (key_a, key_b) } else { (key_b, key_a) };
                        if !seen.insert(pair) {
                            continue;
                        }
                        if let Some(collision) = Self::test_pair(source, narrow_phase, pair)? {
                            collisions.push(collision);
                        }
                    }
                }
            }
        }

        trace!(pairs = seen.len(), collisions = collisions.len(), "broad phase finished");
        Ok(collisions)
    }

    fn test_pair<S>(
        source: &S,
        narrow_phase: &NarrowPhase,
        (first_key, second_key): (ColliderKey, ColliderKey),
    ) -> Result<Option<Collision>, PhysicsError>
    where
        S: ColliderSource + ?Sized,
    {
        // Two infinite masses can never be pushed apart.
        if source.inverse_mass(first_key.entity)? <= 0.0
            && source.inverse_mass(second_key.entity)? <= 0.0
        {
            return Ok(None);
        }
        let first = source.collider(first_key)?;
        let second = source.collider(second_key)?;
        if !first.aabb().overlaps(second.aabb()) {
            return Ok(None);
        }
        Ok(narrow_phase.detect(first, second).map(|contacts| Collision {
            first: first_key.entity,
            first_collider: first_key,
            second: second_key.entity,
            second_collider: second_key,
            contacts,
        }))
    }

    /// Recompute every filed collider's cell from its center and compare it
    /// with the cell it is filed under.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::StaleBucket`] for the first mismatch found.
    pub fn verify<S>(&self, source: &S) -> Result<(), PhysicsError>
    where
        S: ColliderSource + ?Sized,
    {
        for (&key, &filed) in &self.filed {
            let collider = source.collider(key)?;
            let expected = self.cell_for(collider.center());
            let listed = self.cell_entries(filed).contains(&key);
            if expected != filed || collider.cell() != Some(filed) || !listed {
                return Err(PhysicsError::StaleBucket { key, filed, expected });
            }
        }
        Ok(())
    }

    /// Get statistics about the grid
    #[must_use]
    pub fn stats(&self) -> SpatialGridStats {
        let occupied_cells = self.cells.iter().filter(|cell| !cell.is_empty()).count();
        let total_entries: usize = self.cells.iter().map(Vec::len).sum();

        #[allow(clippy::cast_precision_loss)]
        let average_entries_per_cell = if occupied_cells > 0 {
            total_entries as f32 / occupied_cells as f32
        } else {
            0.0
        };

        SpatialGridStats {
            occupied_cells,
            total_entries,
            average_entries_per_cell,
        }
    }
}
