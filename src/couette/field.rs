use super::{Grid, InitialConditions};
use crate::prelude_crate::*;

// ---------------------------------------------------------------- STRUCT: VelocityField

/// Streamwise velocity on every node of the grid, one contiguous column per `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityField {
    grid: Grid,
    values: Vec<Float>,
}

impl VelocityField {
    pub fn uniform(grid: &Grid, value: Float) -> Self {
        VelocityField {
            grid: *grid,
            values: vec![value; grid.get_number_of_nodes()],
        }
    }

    pub fn get_grid(&self) -> &Grid {
        &self.grid
    }

    pub fn get(&self, i: usize, j: usize) -> Float {
        self.values[self.grid.index(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: Float) {
        let index = self.grid.index(i, j);
        self.values[index] = value;
    }

    pub fn column(&self, i: usize) -> &[Float] {
        let ny_total = self.grid.get_ny_total();
        let start = self.grid.index(i, 0);
        &self.values[start..start + ny_total]
    }

    pub fn get_values(&self) -> &[Float] {
        &self.values
    }

    pub(crate) fn get_values_mut(&mut self) -> &mut [Float] {
        &mut self.values
    }

    /// Overwrites the wall rows of every enforced column with the wall velocities.
    pub fn enforce_walls(&mut self, initial: &InitialConditions) {
        let grid = self.grid;
        for i in grid.enforced_columns() {
            for face in WALL_FACES {
                let value = initial.wall_velocity(face);
                for j in grid.wall_rows(face) {
                    self.set(i, j, value);
                }
            }
        }
    }
}

// ---------------------------------------------------------------- STRUCT: PressureField

#[derive(Debug, Clone, PartialEq)]
pub struct PressureField {
    grid: Grid,
    values: Vec<Float>,
}

impl PressureField {
    /// Uniform streamwise gradient: `p = initial_pressure + pressure_step * (i - 1)`.
    ///
    /// # Examples
    /// ```
    /// # use couetteflow::couette::{Grid, PressureField};
    /// let grid = Grid::new(5, 2, 1, 1.0, 1.0).unwrap();
    /// let pressure = PressureField::linear(&grid, 10.0, 0.5);
    ///
    /// assert_eq!(pressure.get(0, 0), 9.5);
    /// assert_eq!(pressure.get(1, 3), 10.0);
    /// assert_eq!(pressure.get(4, 2), 11.5);
    /// ```
    pub fn linear(grid: &Grid, initial_pressure: Float, pressure_step: Float) -> Self {
        let ny_total = grid.get_ny_total();
        let values = (0..grid.get_nx())
            .flat_map(|i| {
                let p = initial_pressure + pressure_step * (i as Float - 1.0);
                std::iter::repeat(p).take(ny_total)
            })
            .collect::<Vec<Float>>();
        PressureField {
            grid: *grid,
            values,
        }
    }

    pub fn get_grid(&self) -> &Grid {
        &self.grid
    }

    pub fn get(&self, i: usize, j: usize) -> Float {
        self.values[self.grid.index(i, j)]
    }

    pub fn column(&self, i: usize) -> &[Float] {
        let ny_total = self.grid.get_ny_total();
        let start = self.grid.index(i, 0);
        &self.values[start..start + ny_total]
    }

    pub fn get_values(&self) -> &[Float] {
        &self.values
    }
}

// ----------------------------------------------------------------------------- FUNCTIONS

/// Builds the step-0 velocity field and the static pressure field.
pub fn initialize_fields(
    grid: &Grid,
    initial: &InitialConditions,
) -> (VelocityField, PressureField) {
    let velocity = VelocityField::uniform(grid, initial.initial_velocity);
    let pressure = PressureField::linear(grid, initial.initial_pressure, initial.pressure_step);
    (velocity, pressure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_initial() -> InitialConditions {
        InitialConditions {
            initial_velocity: 0.25,
            initial_pressure: 3.0,
            top_wall_velocity: 0.889,
            bottom_wall_velocity: -0.1,
            pressure_step: 0.5 / 122.0,
        }
    }

    #[test]
    fn test_initialize_fields_sets_uniform_velocity() {
        let grid = Grid::new(120, 12, 1, 8.33333e-4, 3.8462e-4).unwrap();
        let (velocity, _) = initialize_fields(&grid, &test_initial());

        assert_eq!(velocity.get_values().len(), 120 * 14);
        assert!(velocity.get_values().iter().all(|&u| u == 0.25));
    }

    #[test]
    fn test_initialize_fields_sets_linear_pressure() {
        let grid = Grid::new(120, 12, 1, 8.33333e-4, 3.8462e-4).unwrap();
        let initial = test_initial();
        let (_, pressure) = initialize_fields(&grid, &initial);
        let dp = initial.pressure_step;

        assert_eq!(pressure.get(1, 0), initial.initial_pressure);
        assert_eq!(pressure.get(0, 5), initial.initial_pressure - dp);
        for i in 0..grid.get_nx() {
            let expected = initial.initial_pressure + dp * (i as Float - 1.0);
            assert!(pressure.column(i).iter().all(|&p| p == expected));
        }
        for i in 1..grid.get_nx() {
            let slope = pressure.get(i, 3) - pressure.get(i - 1, 3);
            assert!((slope - dp).abs() < 1e-12);
        }
    }

    #[test]
    fn test_negative_step_gives_favorable_gradient() {
        let grid = Grid::new(10, 2, 1, 1.0, 1.0).unwrap();
        let pressure = PressureField::linear(&grid, 0.0, -2.0);

        assert_eq!(pressure.get(0, 0), 2.0);
        assert_eq!(pressure.get(9, 0), -16.0);
    }

    #[test]
    fn test_enforce_walls_skips_first_column() {
        let grid = Grid::new(4, 3, 1, 1.0, 1.0).unwrap();
        let initial = test_initial();
        let mut velocity = VelocityField::uniform(&grid, initial.initial_velocity);
        velocity.enforce_walls(&initial);

        assert_eq!(velocity.column(0), &[0.25; 5]);
        for i in 1..4 {
            assert_eq!(velocity.get(i, 0), -0.1);
            assert_eq!(velocity.get(i, 4), 0.889);
            assert!(velocity.column(i)[1..4].iter().all(|&u| u == 0.25));
        }
    }

    #[test]
    fn test_enforce_walls_covers_every_wall_layer() {
        let grid = Grid::new(3, 2, 2, 1.0, 1.0).unwrap();
        let initial = test_initial();
        let mut velocity = VelocityField::uniform(&grid, 0.0);
        velocity.enforce_walls(&initial);

        assert_eq!(velocity.column(1), &[-0.1, -0.1, 0.0, 0.0, 0.889, 0.889]);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_access_panics() {
        let grid = Grid::new(4, 3, 1, 1.0, 1.0).unwrap();
        let velocity = VelocityField::uniform(&grid, 0.0);
        velocity.get(4, 0);
    }
}
