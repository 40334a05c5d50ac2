// ------------------------------------------------------------------------------- MODULES

mod field;
mod grid;
mod history;
pub mod io;
mod monitor;
pub mod post;
pub mod report;
mod stepper;

// ------------------------------------------------------------------------------- IMPORTS

use crate::prelude_crate::*;
pub use field::{initialize_fields, PressureField, VelocityField};
pub use grid::{Grid, InitialConditions, MaterialProperties, MonitorPoint, TimeConfig};
pub use history::FieldHistory;
pub use monitor::{ConvergenceMonitor, Residual, StopCondition};
pub use report::{ConsoleReporter, FieldsView, MemoryReporter, Reporter};
pub use stepper::{RunSummary, Stepper, StepperState};
use std::path::Path;

// -------------------------------------------------------------------- STRUCT: Parameters

/// One Couette problem instance, in SI units.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub nx: usize,
    pub ny: usize,
    pub wall_layers: usize,
    pub delta_x: Float,
    pub delta_y: Float,
    pub delta_t: Float,
    pub time_steps: usize,
    pub dynamic_viscosity: Float,
    pub density: Float,
    pub initial_velocity: Float,
    pub initial_pressure: Float,
    pub top_wall_velocity: Float,
    pub bottom_wall_velocity: Float,
    /// Pressure difference between neighbouring columns.
    pub pressure_step: Float,
    pub monitor_x: usize,
    pub monitor_y: usize,
    pub stop_condition: StopCondition,
    pub keep_history: bool,
}

impl Default for Parameters {
    fn default() -> Self {
        let nx = 120;
        let wall_layers = 1;
        Parameters {
            nx,
            ny: 12,
            wall_layers,
            delta_x: 8.33333e-4,
            delta_y: 3.8462e-4,
            delta_t: 3.5e-4,
            time_steps: 500,
            dynamic_viscosity: 4.15e-5,
            density: 0.35,
            initial_velocity: 0.0,
            initial_pressure: 0.0,
            top_wall_velocity: 0.889,
            bottom_wall_velocity: 0.0,
            pressure_step: 0.5 / (nx + 2 * wall_layers) as Float,
            monitor_x: 60,
            monitor_y: 7,
            stop_condition: StopCondition::FixedSteps,
            keep_history: false,
        }
    }
}

impl Parameters {
    /// Small pure-shear case for quick checks.
    pub fn test_default() -> Self {
        Parameters {
            nx: 10,
            time_steps: 200,
            pressure_step: 0.0,
            monitor_x: 5,
            monitor_y: 7,
            ..Default::default()
        }
    }

    /// Builds and validates every configuration structure of the run.
    ///
    /// # Examples
    /// ```
    /// # use couetteflow::couette::Parameters;
    /// # use couetteflow::error::ConfigError;
    /// assert!(Parameters::default().setup().is_ok());
    ///
    /// let parameters = Parameters { time_steps: 0, ..Default::default() };
    /// assert_eq!(parameters.setup().unwrap_err(), ConfigError::NonPositiveSteps(0));
    /// ```
    pub fn setup(&self) -> Result<Setup, ConfigError> {
        let grid = Grid::new(
            self.nx,
            self.ny,
            self.wall_layers,
            self.delta_x,
            self.delta_y,
        )?;
        let time = TimeConfig::new(self.delta_t, self.time_steps)?;
        let material = MaterialProperties::new(self.dynamic_viscosity, self.density)?;
        let initial = InitialConditions {
            initial_velocity: self.initial_velocity,
            initial_pressure: self.initial_pressure,
            top_wall_velocity: self.top_wall_velocity,
            bottom_wall_velocity: self.bottom_wall_velocity,
            pressure_step: self.pressure_step,
        }
        .validate()?;
        let monitor_point = MonitorPoint::new(&grid, self.monitor_x, self.monitor_y)?;
        if let StopCondition::Tolerance { tolerance, .. } = self.stop_condition {
            if !(tolerance.is_finite() && tolerance >= 0.0) {
                return Err(ConfigError::NonFiniteValue {
                    name: "tolerance",
                    value: tolerance,
                });
            }
        }
        Ok(Setup {
            grid,
            time,
            material,
            initial,
            monitor_point,
            stop_condition: self.stop_condition,
            keep_history: self.keep_history,
        })
    }
}

// ------------------------------------------------------------------------- STRUCT: Setup

/// Validated, immutable configuration of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Setup {
    pub grid: Grid,
    pub time: TimeConfig,
    pub material: MaterialProperties,
    pub initial: InitialConditions,
    pub monitor_point: MonitorPoint,
    pub stop_condition: StopCondition,
    pub keep_history: bool,
}

// ----------------------------------------------------------------------------- FUNCTIONS

/// Runs a whole case and hands the finished stepper back for inspection.
pub fn simulate<R>(parameters: &Parameters, reporter: &mut R) -> CfResult<Stepper>
where
    R: Reporter + ?Sized,
{
    let mut stepper = Stepper::from_parameters(parameters)?;
    stepper.run(reporter)?;
    Ok(stepper)
}

/// Validates the case before anything under `root` is created or truncated.
pub(crate) fn run<P>(
    config: &Config,
    mut parameters: Parameters,
    root: P,
) -> CfResult<RunSummary>
where
    P: AsRef<Path>,
{
    config.apply_to(&mut parameters);
    let mut stepper = Stepper::from_parameters(&parameters)?;
    io::case_setup(&root)?;
    let mut reporters: Vec<Box<dyn Reporter>> = vec![
        Box::new(ConsoleReporter::new(config.write_data)),
        Box::new(io::CsvReporter::new(&root)?),
    ];
    let summary = stepper.run(&mut reporters)?;
    if summary.diverging {
        log::warn!(
            "Run finished with a diverging residual; reduce delta_t below {:.4e} s",
            DIFFUSION_STABILITY_LIMIT * parameters.delta_y * parameters.delta_y
                / stepper.get_material().get_nu()
        );
    }
    Ok(summary)
}

pub fn load(parameters: Parameters) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = match cli::get_args().and_then(|matches| cli::parse_matches(&matches)) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::init_global_pool(config.get_number_of_threads(), config.core_affinity) {
        eprintln!("Error while creating the thread pool: {e}");
        std::process::exit(1);
    }

    let result = match config.mode {
        Mode::Run => run(&config, parameters, Path::new(".")).map(|_| ()),
        Mode::PostProfile => {
            let mut parameters = parameters;
            config.apply_to(&mut parameters);
            post::post_profile(Path::new("."), &parameters)
        }
    };
    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_reference_case() {
        let parameters = Parameters::default();
        let setup = parameters.setup().unwrap();

        assert_eq!(setup.grid.get_ny_total(), 14);
        assert_eq!(setup.time.get_nt(), 500);
        assert_eq!(setup.monitor_point.get_i(), 60);
        assert_eq!(setup.monitor_point.get_j(), 7);
        assert_eq!(parameters.pressure_step, 0.5 / 122.0);
        assert_eq!(setup.stop_condition, StopCondition::FixedSteps);
    }

    #[test]
    fn test_setup_reports_first_invalid_value() {
        let parameters = Parameters {
            nx: 0,
            ..Default::default()
        };
        assert_eq!(
            parameters.setup(),
            Err(ConfigError::NonPositiveCells { name: "nx", value: 0 })
        );

        let parameters = Parameters {
            density: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            parameters.setup(),
            Err(ConfigError::NonPositiveValue { name: "rho", .. })
        ));

        let parameters = Parameters {
            monitor_y: 13,
            ..Default::default()
        };
        assert!(matches!(
            parameters.setup(),
            Err(ConfigError::MonitorOutOfRange { axis: "y", .. })
        ));

        let parameters = Parameters {
            stop_condition: StopCondition::Tolerance {
                tolerance: Float::NAN,
                min_steps: 1,
            },
            ..Default::default()
        };
        assert!(parameters.setup().is_err());
    }

    #[test]
    fn test_simulate_is_deterministic() {
        let parameters = Parameters {
            pressure_step: 0.002,
            ..Parameters::test_default()
        };
        let mut first = MemoryReporter::new();
        let mut second = MemoryReporter::new();
        let a = simulate(&parameters, &mut first).unwrap();
        let b = simulate(&parameters, &mut second).unwrap();

        assert_eq!(a.get_velocity(), b.get_velocity());
        assert_eq!(first.get_residuals(), second.get_residuals());
        assert_eq!(first.get_residuals().len(), 199);
    }

    #[test]
    fn test_run_leaves_previous_results_on_invalid_case() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join(crate::io::DATA_PATH);
        std::fs::create_dir_all(&data_path).unwrap();
        let residuals_path = data_path.join(crate::io::RESIDUALS_FILE);
        let previous = "time_step,time,residual\n1,1e-4,5e-2\n";
        std::fs::write(&residuals_path, previous).unwrap();

        let parameters = Parameters {
            delta_y: 0.0,
            ..Parameters::test_default()
        };
        assert!(run(&Config::default(), parameters, dir.path()).is_err());

        assert_eq!(std::fs::read_to_string(&residuals_path).unwrap(), previous);
        assert!(!dir.path().join(crate::io::POST_PROCESSING_PATH).exists());
    }

    #[test]
    fn test_run_writes_case_files() {
        let dir = tempfile::tempdir().unwrap();
        let parameters = Parameters {
            time_steps: 20,
            ..Parameters::test_default()
        };
        let summary = run(&Config::default(), parameters, dir.path()).unwrap();

        assert_eq!(summary.time_steps, 19);
        let data_path = dir.path().join(crate::io::DATA_PATH);
        let residuals =
            crate::io::read_csv_file(data_path.join(crate::io::RESIDUALS_FILE)).unwrap();
        assert_eq!(residuals.len(), 19);
        assert!(data_path.join(crate::io::VELOCITY_FILE).is_file());
    }
}
