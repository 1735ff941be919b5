//! Construction-time tuning of the physics system.

use crate::error::PhysicsError;
use crate::grid::MAX_CELLS_PER_SIDE;

/// Restitution used when none is configured.
pub const DEFAULT_ELASTICITY: f32 = 0.1;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Side length of the square region of the x/z plane covered by the grid.
    pub grid_length: f32,
    /// Half the side length of one grid cell.
    pub cell_half_width: f32,
    /// Restitution coefficient for every contact (0 = inelastic, 1 = elastic).
    pub elasticity: f32,
    /// Planar speed a move intent sets on its entity.
    pub move_speed: f32,
    /// Capture collider edges and contacts into the step report.
    pub debug_draw: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            grid_length: 70.0,
            cell_half_width: 5.0,
            elasticity: DEFAULT_ELASTICITY,
            move_speed: 1.0,
            debug_draw: true,
        }
    }
}

impl PhysicsConfig {
    /// Check that the grid can be built and the solver constants are sane.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.cell_half_width.is_finite() && self.cell_half_width > 0.0) {
            return Err(PhysicsError::InvalidConfig("cell_half_width must be positive"));
        }
        if !(self.grid_length.is_finite() && self.grid_length >= 2.0 * self.cell_half_width) {
            return Err(PhysicsError::InvalidConfig(
                "grid_length must cover at least one cell",
            ));
        }
        let cells_per_side = (self.grid_length / (2.0 * self.cell_half_width)).ceil();
        #[allow(clippy::cast_precision_loss)]
        let limit = MAX_CELLS_PER_SIDE as f32;
        if cells_per_side > limit {
            return Err(PhysicsError::InvalidConfig(
                "grid_length / (2 * cell_half_width) exceeds the cell limit",
            ));
        }
        if !(0.0..=1.0).contains(&self.elasticity) {
            return Err(PhysicsError::InvalidConfig("elasticity must lie in [0, 1]"));
        }
        if !self.move_speed.is_finite() {
            return Err(PhysicsError::InvalidConfig("move_speed must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PhysicsConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_grid_smaller_than_a_cell() {
        let config = PhysicsConfig {
            grid_length: 4.0,
            cell_half_width: 5.0,
            ..PhysicsConfig::default()
        };
        assert!(matches!(config.validate(), Err(PhysicsError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_grid_with_too_many_cells() {
        for (grid_length, cell_half_width) in [(100_000.0, 0.5), (1e6, 0.01)] {
            let config = PhysicsConfig {
                grid_length,
                cell_half_width,
                ..PhysicsConfig::default()
            };
            assert!(matches!(config.validate(), Err(PhysicsError::InvalidConfig(_))));
        }

        let largest = PhysicsConfig {
            grid_length: 1024.0,
            cell_half_width: 0.5,
            ..PhysicsConfig::default()
        };
        assert!(largest.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_elasticity() {
        let config = PhysicsConfig {
            elasticity: 1.5,
            ..PhysicsConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
