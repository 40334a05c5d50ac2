use crate::prelude_crate::*;
use NodeType::*;

// ------------------------------------------------------------------------- STRUCT: Grid

/// Channel geometry: `nx` streamwise columns, each holding `ny` fluid nodes between
/// `wall_layers` wall nodes on either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    nx: usize,
    ny: usize,
    wall_layers: usize,
    dx: Float,
    dy: Float,
}

impl Grid {
    pub fn new(
        nx: usize,
        ny: usize,
        wall_layers: usize,
        dx: Float,
        dy: Float,
    ) -> Result<Self, ConfigError> {
        if nx == 0 {
            return Err(ConfigError::NonPositiveCells { name: "nx", value: nx });
        }
        if ny == 0 {
            return Err(ConfigError::NonPositiveCells { name: "ny", value: ny });
        }
        if wall_layers == 0 {
            return Err(ConfigError::NoWallLayers);
        }
        positive("dx", dx)?;
        positive("dy", dy)?;
        Ok(Grid {
            nx,
            ny,
            wall_layers,
            dx,
            dy,
        })
    }
}

impl Grid {
    pub fn get_nx(&self) -> usize {
        self.nx
    }

    pub fn get_ny(&self) -> usize {
        self.ny
    }

    pub fn get_wall_layers(&self) -> usize {
        self.wall_layers
    }

    pub fn get_dx(&self) -> Float {
        self.dx
    }

    pub fn get_dy(&self) -> Float {
        self.dy
    }

    /// # Examples
    /// ```
    /// # use couetteflow::couette::Grid;
    /// let grid = Grid::new(120, 12, 1, 8.33333e-4, 3.8462e-4).unwrap();
    ///
    /// assert_eq!(grid.get_ny_total(), 14);
    /// ```
    pub fn get_ny_total(&self) -> usize {
        self.ny + 2 * self.wall_layers
    }

    pub fn get_number_of_nodes(&self) -> usize {
        self.nx * self.get_ny_total()
    }

    /// Flat position of node `(i, j)`; columns are contiguous.
    pub fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.nx && j < self.get_ny_total(),
            "Node ({i}, {j}) is outside the {}x{} grid",
            self.nx,
            self.get_ny_total()
        );
        i * self.get_ny_total() + j
    }

    /// Wall-normal rows belonging to one wall.
    ///
    /// # Examples
    /// ```
    /// # use couetteflow::couette::Grid;
    /// # use couetteflow::WallFace;
    /// let grid = Grid::new(10, 4, 2, 1.0, 1.0).unwrap();
    ///
    /// assert_eq!(grid.wall_rows(WallFace::Bottom), 0..2);
    /// assert_eq!(grid.wall_rows(WallFace::Top), 6..8);
    /// ```
    pub fn wall_rows(&self, face: WallFace) -> std::ops::Range<usize> {
        match face {
            WallFace::Bottom => 0..self.wall_layers,
            WallFace::Top => (self.get_ny_total() - self.wall_layers)..self.get_ny_total(),
        }
    }

    /// Rows advanced by the stencil.
    pub fn interior_rows(&self) -> std::ops::Range<usize> {
        self.wall_layers..(self.get_ny_total() - self.wall_layers)
    }

    /// Columns whose wall rows are enforced each step; column 0 is left untouched.
    pub fn enforced_columns(&self) -> std::ops::Range<usize> {
        1..self.nx
    }

    /// Columns advanced by the stencil; both streamwise neighbours must exist.
    pub fn updated_columns(&self) -> std::ops::Range<usize> {
        1..self.nx.saturating_sub(1).max(1)
    }

    pub fn node_type(&self, j: usize) -> NodeType {
        if self.interior_rows().contains(&j) {
            Fluid
        } else {
            Wall
        }
    }

    /// Distance between the two innermost wall nodes.
    pub fn channel_height(&self) -> Float {
        (self.ny + 1) as Float * self.dy
    }

    /// Distance of row `j` from the innermost bottom wall node, clamped to the channel.
    ///
    /// # Examples
    /// ```
    /// # use couetteflow::couette::Grid;
    /// let grid = Grid::new(10, 3, 1, 1.0, 0.5).unwrap();
    ///
    /// assert_eq!(grid.wall_distance(0), 0.0);
    /// assert_eq!(grid.wall_distance(2), 1.0);
    /// assert_eq!(grid.wall_distance(4), grid.channel_height());
    /// ```
    pub fn wall_distance(&self, j: usize) -> Float {
        let first_wall = self.wall_layers - 1;
        let j = j.clamp(first_wall, first_wall + self.ny + 1);
        (j - first_wall) as Float * self.dy
    }

    pub fn x_coordinate(&self, i: usize) -> Float {
        i as Float * self.dx
    }

    pub fn y_coordinate(&self, j: usize) -> Float {
        j as Float * self.dy
    }
}

// ------------------------------------------------------------------- STRUCT: TimeConfig

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeConfig {
    dt: Float,
    nt: usize,
}

impl TimeConfig {
    pub fn new(dt: Float, nt: usize) -> Result<Self, ConfigError> {
        positive("dt", dt)?;
        if nt == 0 {
            return Err(ConfigError::NonPositiveSteps(nt));
        }
        Ok(TimeConfig { dt, nt })
    }

    pub fn get_dt(&self) -> Float {
        self.dt
    }

    pub fn get_nt(&self) -> usize {
        self.nt
    }

    pub fn time_at(&self, time_step: usize) -> Float {
        self.dt * time_step as Float
    }
}

// ----------------------------------------------------------- STRUCT: MaterialProperties

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    mu: Float,
    rho: Float,
    nu: Float,
}

impl MaterialProperties {
    /// # Examples
    /// ```
    /// # use couetteflow::couette::MaterialProperties;
    /// let material = MaterialProperties::new(4.15e-5, 0.35).unwrap();
    ///
    /// assert!((material.get_nu() - 1.185714e-4).abs() < 1e-9);
    /// assert!(MaterialProperties::new(0.0, 0.35).is_err());
    /// ```
    pub fn new(mu: Float, rho: Float) -> Result<Self, ConfigError> {
        positive("mu", mu)?;
        positive("rho", rho)?;
        Ok(MaterialProperties {
            mu,
            rho,
            nu: mu / rho,
        })
    }

    pub fn get_mu(&self) -> Float {
        self.mu
    }

    pub fn get_rho(&self) -> Float {
        self.rho
    }

    pub fn get_nu(&self) -> Float {
        self.nu
    }
}

// ------------------------------------------------------------ STRUCT: InitialConditions

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialConditions {
    pub initial_velocity: Float,
    pub initial_pressure: Float,
    pub top_wall_velocity: Float,
    pub bottom_wall_velocity: Float,
    pub pressure_step: Float,
}

impl InitialConditions {
    pub fn validate(self) -> Result<Self, ConfigError> {
        finite("initial_velocity", self.initial_velocity)?;
        finite("initial_pressure", self.initial_pressure)?;
        finite("top_wall_velocity", self.top_wall_velocity)?;
        finite("bottom_wall_velocity", self.bottom_wall_velocity)?;
        finite("pressure_step", self.pressure_step)?;
        Ok(self)
    }

    pub fn wall_velocity(&self, face: WallFace) -> Float {
        match face {
            WallFace::Bottom => self.bottom_wall_velocity,
            WallFace::Top => self.top_wall_velocity,
        }
    }
}

// ----------------------------------------------------------------- STRUCT: MonitorPoint

/// Only [`MonitorPoint::new`] builds one, so a stepper always monitors an updated node.
///
/// ```compile_fail
/// # use couetteflow::couette::MonitorPoint;
/// let point = MonitorPoint { i: 0, j: 0 };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorPoint {
    i: usize,
    j: usize,
}

impl MonitorPoint {
    /// The monitor has to sit on a node the stencil actually advances.
    pub fn new(grid: &Grid, i: usize, j: usize) -> Result<Self, ConfigError> {
        let columns = grid.updated_columns();
        if !columns.contains(&i) {
            return Err(ConfigError::MonitorOutOfRange {
                axis: "x",
                index: i,
                min: columns.start,
                max: columns.end,
            });
        }
        let rows = grid.interior_rows();
        if !rows.contains(&j) {
            return Err(ConfigError::MonitorOutOfRange {
                axis: "y",
                index: j,
                min: rows.start,
                max: rows.end,
            });
        }
        Ok(MonitorPoint { i, j })
    }

    pub fn get_i(&self) -> usize {
        self.i
    }

    pub fn get_j(&self) -> usize {
        self.j
    }
}

fn positive(name: &'static str, value: Float) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveValue { name, value })
    }
}

fn finite(name: &'static str, value: Float) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteValue { name, value })
    }
}
