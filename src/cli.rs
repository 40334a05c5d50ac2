use crate::couette::{Parameters, StopCondition};
use crate::prelude_crate::*;
use clap::{Arg, ArgMatches, Command};
use core_affinity::{get_core_ids, set_for_current};
use std::num::NonZeroUsize;

#[derive(Debug)]
pub(crate) struct Config {
    pub(crate) mode: Mode,
    pub(crate) number_of_threads: NonZeroUsize,
    pub(crate) core_affinity: bool,
    pub(crate) write_data: usize,
    pub(crate) tolerance: Option<Float>,
    pub(crate) min_steps: Option<usize>,
    pub(crate) keep_history: bool,
    pub(crate) overrides: Overrides,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::Run,
            number_of_threads: NonZeroUsize::MIN,
            core_affinity: false,
            write_data: 10,
            tolerance: None,
            min_steps: None,
            keep_history: false,
            overrides: Overrides::default(),
        }
    }
}

impl Config {
    pub(crate) fn get_number_of_threads(&self) -> usize {
        usize::from(self.number_of_threads)
    }

    /// Command-line values take precedence over the case parameters.
    pub(crate) fn apply_to(&self, parameters: &mut Parameters) {
        self.overrides.apply_to(parameters);
        if let Some(tolerance) = self.tolerance {
            parameters.stop_condition = match self.min_steps {
                Some(min_steps) => StopCondition::Tolerance {
                    tolerance,
                    min_steps,
                },
                None => StopCondition::tolerance(tolerance),
            };
        }
        if self.keep_history {
            parameters.keep_history = true;
        }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum Mode {
    Run,
    PostProfile,
}

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    nx: Option<usize>,
    ny: Option<usize>,
    wall_layers: Option<usize>,
    delta_x: Option<Float>,
    delta_y: Option<Float>,
    delta_t: Option<Float>,
    time_steps: Option<usize>,
    dynamic_viscosity: Option<Float>,
    density: Option<Float>,
    initial_velocity: Option<Float>,
    initial_pressure: Option<Float>,
    top_wall_velocity: Option<Float>,
    bottom_wall_velocity: Option<Float>,
    pressure_step: Option<Float>,
    monitor_x: Option<usize>,
    monitor_y: Option<usize>,
}

impl Overrides {
    fn from_matches(matches: &ArgMatches) -> Self {
        let count = |id: &str| matches.get_one::<usize>(id).copied();
        let value = |id: &str| matches.get_one::<Float>(id).copied();
        Overrides {
            nx: count("nx"),
            ny: count("ny"),
            wall_layers: count("wall_layers"),
            delta_x: value("delta_x"),
            delta_y: value("delta_y"),
            delta_t: value("delta_t"),
            time_steps: count("time_steps"),
            dynamic_viscosity: value("dynamic_viscosity"),
            density: value("density"),
            initial_velocity: value("initial_velocity"),
            initial_pressure: value("initial_pressure"),
            top_wall_velocity: value("top_wall_velocity"),
            bottom_wall_velocity: value("bottom_wall_velocity"),
            pressure_step: value("pressure_step"),
            monitor_x: count("monitor_x"),
            monitor_y: count("monitor_y"),
        }
    }

    fn apply_to(&self, parameters: &mut Parameters) {
        fn set<T: Copy>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }
        set(&mut parameters.nx, self.nx);
        set(&mut parameters.ny, self.ny);
        set(&mut parameters.wall_layers, self.wall_layers);
        set(&mut parameters.delta_x, self.delta_x);
        set(&mut parameters.delta_y, self.delta_y);
        set(&mut parameters.delta_t, self.delta_t);
        set(&mut parameters.time_steps, self.time_steps);
        set(&mut parameters.dynamic_viscosity, self.dynamic_viscosity);
        set(&mut parameters.density, self.density);
        set(&mut parameters.initial_velocity, self.initial_velocity);
        set(&mut parameters.initial_pressure, self.initial_pressure);
        set(&mut parameters.top_wall_velocity, self.top_wall_velocity);
        set(&mut parameters.bottom_wall_velocity, self.bottom_wall_velocity);
        set(&mut parameters.pressure_step, self.pressure_step);
        set(&mut parameters.monitor_x, self.monitor_x);
        set(&mut parameters.monitor_y, self.monitor_y);
    }
}

fn count_arg(id: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(long)
        .value_name("N")
        .help(help)
        .value_parser(clap::value_parser!(usize))
        .global(true)
}

fn value_arg(id: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(long)
        .value_name("VALUE")
        .help(help)
        .value_parser(clap::value_parser!(f64))
        .allow_negative_numbers(true)
        .global(true)
}

fn case_args() -> Vec<Arg> {
    vec![
        count_arg("nx", "nx", "Number of streamwise cells"),
        count_arg("ny", "ny", "Number of interior wall-normal cells"),
        count_arg("wall_layers", "wall-layers", "Number of wall nodes per side"),
        value_arg("delta_x", "dx", "Streamwise spacing (m)"),
        value_arg("delta_y", "dy", "Wall-normal spacing (m)"),
        value_arg("delta_t", "dt", "Time step (s)"),
        count_arg("time_steps", "steps", "Number of time steps, including step 0"),
        value_arg("dynamic_viscosity", "mu", "Dynamic viscosity (kg/(m s))"),
        value_arg("density", "rho", "Density (kg/m^3)"),
        value_arg("initial_velocity", "initial-velocity", "Initial velocity (m/s)"),
        value_arg("initial_pressure", "initial-pressure", "Initial gage pressure (Pa)"),
        value_arg("top_wall_velocity", "top-wall-velocity", "Top wall velocity (m/s)"),
        value_arg(
            "bottom_wall_velocity",
            "bottom-wall-velocity",
            "Bottom wall velocity (m/s)",
        ),
        value_arg(
            "pressure_step",
            "pressure-step",
            "Pressure difference between neighbouring columns (Pa)",
        ),
        count_arg("monitor_x", "monitor-x", "Streamwise index of the monitor node"),
        count_arg("monitor_y", "monitor-y", "Wall-normal index of the monitor node"),
    ]
}

pub(crate) fn command() -> Command {
    clap::command!()
        .propagate_version(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("number_of_threads")
                .short('n')
                .long("num-threads")
                .value_name("NTHREADS")
                .help("The number of threads used (min = 1)")
                .value_parser(clap::value_parser!(NonZeroUsize))
                .default_value("1")
                .global(true),
        )
        .arg(
            Arg::new("core_affinity")
                .long("affinity")
                .help("Set the core affinity")
                .action(clap::ArgAction::SetTrue)
                .global(true),
        )
        .args(case_args())
        .subcommand(
            Command::new("run")
                .about("Run the simulation")
                .arg(
                    Arg::new("write_data")
                        .short('w')
                        .long("write-data")
                        .value_name("FREQUENCY")
                        .help("The frequency which residuals are printed")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    Arg::new("tolerance")
                        .long("tolerance")
                        .value_name("TOL")
                        .help("Stop once the monitor residual falls below TOL")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("min_steps")
                        .long("min-steps")
                        .value_name("N")
                        .help("Minimum number of steps before the tolerance applies")
                        .value_parser(clap::value_parser!(usize))
                        .requires("tolerance"),
                )
                .arg(
                    Arg::new("keep_history")
                        .long("history")
                        .help("Keep and write every time step of the velocity field")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("post")
                .about("Post-process the simulation data")
                .subcommand_required(true)
                .subcommand(
                    Command::new("profile")
                        .about("Compare the monitor column with the analytic profile"),
                ),
        )
}

pub(crate) fn get_args() -> CfResult<ArgMatches> {
    Ok(command().get_matches())
}

pub(crate) fn parse_matches(matches: &ArgMatches) -> CfResult<Config> {
    let number_of_threads = *matches
        .get_one::<NonZeroUsize>("number_of_threads")
        .ok_or("missing number of threads")?;
    let core_affinity = matches.get_flag("core_affinity");
    match matches.subcommand() {
        Some(("run", sub_m)) => Ok(Config {
            mode: Mode::Run,
            number_of_threads,
            core_affinity,
            write_data: *sub_m.get_one::<usize>("write_data").unwrap_or(&10),
            tolerance: sub_m.get_one::<Float>("tolerance").copied(),
            min_steps: sub_m.get_one::<usize>("min_steps").copied(),
            keep_history: sub_m.get_flag("keep_history"),
            overrides: Overrides::from_matches(sub_m),
        }),
        Some(("post", sub_m)) => match sub_m.subcommand() {
            Some(("profile", profile_m)) => Ok(Config {
                mode: Mode::PostProfile,
                number_of_threads,
                core_affinity,
                overrides: Overrides::from_matches(profile_m),
                ..Default::default()
            }),
            _ => unreachable!("At least one subcommand is required: .subcommand_required(true)"),
        },
        _ => unreachable!("At least one subcommand is required: .subcommand_required(true)"),
    }
}

pub(crate) fn init_global_pool(num_threads: usize, pin_all_cores: bool) -> CfResult<()> {
    if pin_all_cores {
        let cores = get_core_ids().ok_or("unable to list the cores of this machine")?;
        if cores.is_empty() {
            return Err("no cores available for pinning".into());
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .start_handler(move |idx| {
                let core = cores[idx % cores.len()];
                let _ = set_for_current(core);
            })
            .build_global()?;
    } else {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()?;
    };
    Ok(())
}
