use super::field::initialize_fields;
use super::report::{FieldsView, Reporter};
use super::{
    ConvergenceMonitor, FieldHistory, Grid, InitialConditions, MaterialProperties, Parameters,
    PressureField, Residual, Setup, StopCondition, TimeConfig, VelocityField,
};
use crate::kernel::{self, StencilCoefficients};
use crate::prelude_crate::*;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepperState {
    Uninitialized,
    Initialized,
    Stepping,
    Done,
}

use StepperState::*;

/// Outcome of a complete run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub time_steps: usize,
    pub time: Float,
    pub last_residual: Option<Residual>,
    pub stopped_early: bool,
    pub diverging: bool,
}

// ---------------------------------------------------------------------- STRUCT: Stepper

#[derive(Debug)]
pub struct Stepper {
    grid: Grid,
    time: TimeConfig,
    material: MaterialProperties,
    initial: InitialConditions,
    coefficients: StencilCoefficients,
    monitor: ConvergenceMonitor,
    stop_condition: StopCondition,
    previous: VelocityField,
    current: VelocityField,
    pressure: PressureField,
    history: Option<FieldHistory>,
    state: StepperState,
    time_step: usize,
    stopped_early: bool,
    divergence_reported: bool,
}

impl Stepper {
    pub fn new(setup: Setup) -> Self {
        let Setup {
            grid,
            time,
            material,
            initial,
            monitor_point,
            stop_condition,
            keep_history,
        } = setup;
        let coefficients = StencilCoefficients::new(
            time.get_dt(),
            material.get_nu(),
            material.get_rho(),
            grid.get_dx(),
            grid.get_dy(),
        );
        Stepper {
            grid,
            time,
            material,
            initial,
            coefficients,
            monitor: ConvergenceMonitor::new(monitor_point),
            stop_condition,
            previous: VelocityField::uniform(&grid, 0.0),
            current: VelocityField::uniform(&grid, 0.0),
            pressure: PressureField::linear(&grid, 0.0, 0.0),
            history: keep_history.then(|| FieldHistory::with_capacity(time.get_nt())),
            state: Uninitialized,
            time_step: 0,
            stopped_early: false,
            divergence_reported: false,
        }
    }

    /// Validates the parameters; nothing is allocated for an invalid case.
    pub fn from_parameters(parameters: &Parameters) -> Result<Self, ConfigError> {
        Ok(Stepper::new(parameters.setup()?))
    }
}

impl Stepper {
    pub fn get_state(&self) -> StepperState {
        self.state
    }

    pub fn get_time_step(&self) -> usize {
        self.time_step
    }

    pub fn get_time(&self) -> Float {
        self.time.time_at(self.time_step)
    }

    pub fn get_grid(&self) -> &Grid {
        &self.grid
    }

    pub fn get_time_config(&self) -> &TimeConfig {
        &self.time
    }

    pub fn get_material(&self) -> &MaterialProperties {
        &self.material
    }

    pub fn get_initial_conditions(&self) -> &InitialConditions {
        &self.initial
    }

    /// Field of the latest step.
    pub fn get_velocity(&self) -> &VelocityField {
        &self.current
    }

    /// Field of the step before the latest one, with its wall rows enforced.
    pub fn get_previous_velocity(&self) -> &VelocityField {
        &self.previous
    }

    pub fn get_pressure(&self) -> &PressureField {
        &self.pressure
    }

    pub fn get_history(&self) -> Option<&FieldHistory> {
        self.history.as_ref()
    }

    pub fn get_monitor(&self) -> &ConvergenceMonitor {
        &self.monitor
    }

    pub fn diffusion_number(&self) -> Float {
        kernel::diffusion_number(
            self.material.get_nu(),
            self.time.get_dt(),
            self.grid.get_dy(),
        )
    }

    pub fn fields_view(&self) -> FieldsView<'_> {
        FieldsView {
            grid: &self.grid,
            velocity: &self.current,
            pressure: &self.pressure,
            history: self.history.as_ref(),
            time_step: self.time_step,
            time: self.get_time(),
        }
    }

    fn is_last_step(&self) -> bool {
        self.time_step + 1 >= self.time.get_nt()
    }
}

impl Stepper {
    /// Sets every node to the initial velocity and builds the pressure field.
    pub fn initialize(&mut self) -> Result<(), StepperError> {
        if self.state != Uninitialized {
            return Err(StepperError::InvalidState {
                operation: "initialize",
                state: self.state,
            });
        }
        let (velocity, pressure) = initialize_fields(&self.grid, &self.initial);
        if let Some(history) = self.history.as_mut() {
            let mut first = velocity.clone();
            first.enforce_walls(&self.initial);
            history.record(0, &first);
        }
        self.previous = velocity.clone();
        self.current = velocity;
        self.pressure = pressure;
        self.time_step = 0;
        self.state = if self.is_last_step() { Done } else { Initialized };

        let diffusion_number = self.diffusion_number();
        log::info!(
            "Initialized {}x{} grid ({} wall layers), nu = {:.6e} m^2/s, diffusion number = {:.4}",
            self.grid.get_nx(),
            self.grid.get_ny_total(),
            self.grid.get_wall_layers(),
            self.material.get_nu(),
            diffusion_number
        );
        if diffusion_number > DIFFUSION_STABILITY_LIMIT {
            log::warn!(
                "Diffusion number {diffusion_number:.4} exceeds the explicit stability limit \
                 {DIFFUSION_STABILITY_LIMIT}; the solution is expected to diverge"
            );
        }
        Ok(())
    }

    /// Advances the field by one time step and returns the residual at the monitor point.
    pub fn step(&mut self) -> Result<Residual, StepperError> {
        if !matches!(self.state, Initialized | Stepping) {
            return Err(StepperError::InvalidState {
                operation: "step",
                state: self.state,
            });
        }
        self.state = Stepping;

        std::mem::swap(&mut self.previous, &mut self.current);
        self.enforce_boundary_conditions();
        self.update_interior();
        self.time_step += 1;
        if let Some(history) = self.history.as_mut() {
            history.record(self.time_step, &self.current);
        }

        let point = *self.monitor.get_point();
        let time = self.get_time();
        let u_previous = self.previous.get(point.get_i(), point.get_j());
        let u_current = self.current.get(point.get_i(), point.get_j());
        let residual = self
            .monitor
            .observe(self.time_step, time, u_previous, u_current);
        if !self.divergence_reported && self.monitor.is_diverging() {
            log::warn!(
                "Residual at node ({}, {}) is growing without bound (step {}, residual {:.3e})",
                point.get_i(),
                point.get_j(),
                self.time_step,
                residual.value
            );
            self.divergence_reported = true;
        }

        if self.stop_condition.is_met(&residual) {
            self.stopped_early = !self.is_last_step();
            self.state = Done;
        } else if self.is_last_step() {
            self.state = Done;
        }
        Ok(residual)
    }

    /// Initializes if needed and steps until the run is done, reporting every residual.
    pub fn run<R>(&mut self, reporter: &mut R) -> CfResult<RunSummary>
    where
        R: Reporter + ?Sized,
    {
        match self.state {
            Uninitialized => self.initialize()?,
            Initialized => {}
            state => {
                return Err(Box::new(StepperError::InvalidState {
                    operation: "run",
                    state,
                }));
            }
        }
        while self.state != Done {
            let residual = self.step()?;
            reporter.report_step(&residual)?;
        }
        if self.stopped_early {
            log::info!(
                "Residual below tolerance after {} of {} steps",
                self.time_step,
                self.time.get_nt() - 1
            );
        }
        reporter.finish(&self.fields_view())?;
        Ok(self.summary())
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            time_steps: self.time_step,
            time: self.get_time(),
            last_residual: self.monitor.get_last().copied(),
            stopped_early: self.stopped_early,
            diverging: self.monitor.is_diverging(),
        }
    }

    /// Dirichlet wall values on the step about to be read.
    fn enforce_boundary_conditions(&mut self) {
        self.previous.enforce_walls(&self.initial);
    }

    /// Writes the whole of `current` from `previous`; columns are independent.
    fn update_interior(&mut self) {
        let ny_total = self.grid.get_ny_total();
        let updated_columns = self.grid.updated_columns();
        let interior_rows = self.grid.interior_rows();
        let coefficients = &self.coefficients;
        let previous = self.previous.get_values();
        let pressure = self.pressure.get_values();
        self.current
            .get_values_mut()
            .par_chunks_mut(ny_total)
            .enumerate()
            .for_each(|(i, column)| {
                let source = &previous[i * ny_total..(i + 1) * ny_total];
                column.copy_from_slice(source);
                if !updated_columns.contains(&i) {
                    return;
                }
                let p_west = &pressure[(i - 1) * ny_total..i * ny_total];
                let p_east = &pressure[(i + 1) * ny_total..(i + 2) * ny_total];
                for j in interior_rows.clone() {
                    column[j] = kernel::explicit_update(
                        source[j - 1],
                        source[j],
                        source[j + 1],
                        p_west[j],
                        p_east[j],
                        coefficients,
                    );
                }
            });
    }
}
