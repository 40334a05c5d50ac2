use couetteflow::couette::{post, simulate, MemoryReporter, Stepper};
use couetteflow::prelude::*;

fn final_column_deviation(stepper: &Stepper, column: usize) -> Float {
    let analytic = post::analytic_profile(
        stepper.get_grid(),
        stepper.get_material(),
        stepper.get_initial_conditions(),
    );
    post::profile_deviation(
        stepper.get_grid(),
        stepper.get_velocity().column(column),
        &analytic,
    )
}

#[test]
fn test_reference_case_approaches_couette_poiseuille_profile() {
    let parameters = Parameters::default();
    let mut reporter = MemoryReporter::new();
    let stepper = simulate(&parameters, &mut reporter).unwrap();

    let residuals = reporter.get_residuals();
    assert_eq!(residuals.len(), 499);
    assert_eq!(residuals.last().unwrap().time_step, 499);
    for pair in residuals[250..].windows(2) {
        assert!(pair[1].magnitude() <= pair[0].magnitude());
    }

    assert!(stepper.diffusion_number() < 0.5);
    assert!(!stepper.get_monitor().is_diverging());
    let deviation = final_column_deviation(&stepper, parameters.monitor_x);
    assert!(
        deviation < 1e-2 * parameters.top_wall_velocity,
        "deviation = {deviation}"
    );
}

#[test]
fn test_stable_time_step_decays() {
    let parameters = Parameters {
        time_steps: 500,
        pressure_step: 0.0,
        ..Parameters::test_default()
    };
    let mut reporter = MemoryReporter::new();
    let stepper = simulate(&parameters, &mut reporter).unwrap();
    let summary = stepper.summary();

    let largest = reporter
        .get_residuals()
        .iter()
        .map(|residual| residual.magnitude())
        .fold(0.0, Float::max);
    let last = summary.last_residual.unwrap().magnitude();
    assert!(!summary.diverging);
    assert!(last < 1e-3 * largest);
    assert!(last < 1e-5);
}

#[test]
fn test_ten_times_time_step_diverges() {
    let parameters = Parameters {
        delta_t: 3.5e-3,
        time_steps: 80,
        ..Parameters::test_default()
    };
    let mut reporter = MemoryReporter::new();
    let stepper = simulate(&parameters, &mut reporter).unwrap();
    let summary = stepper.summary();

    assert!(stepper.diffusion_number() > 2.0);
    assert!(summary.diverging);
    assert!(summary.last_residual.unwrap().magnitude() > 1e6);
}

#[test]
fn test_pure_shear_reaches_linear_profile() {
    let parameters = Parameters {
        nx: 6,
        ny: 4,
        delta_x: 1.0,
        delta_y: 1.0,
        delta_t: 0.2,
        time_steps: 600,
        dynamic_viscosity: 1.0,
        density: 1.0,
        top_wall_velocity: 1.0,
        bottom_wall_velocity: -0.5,
        pressure_step: 0.0,
        monitor_x: 2,
        monitor_y: 3,
        ..Parameters::default()
    };
    let stepper = simulate(&parameters, &mut MemoryReporter::new()).unwrap();

    let grid = stepper.get_grid();
    for i in grid.updated_columns() {
        for j in grid.interior_rows() {
            let expected = -0.5 + 1.5 * j as Float / 5.0;
            assert!((stepper.get_velocity().get(i, j) - expected).abs() < 1e-10);
        }
    }
}

#[test]
fn test_thick_walls_reach_the_same_profile() {
    let parameters = Parameters {
        nx: 6,
        ny: 5,
        wall_layers: 3,
        delta_x: 1.0,
        delta_y: 1.0,
        delta_t: 0.2,
        time_steps: 800,
        dynamic_viscosity: 1.0,
        density: 1.0,
        top_wall_velocity: 1.0,
        pressure_step: -0.1,
        monitor_x: 2,
        monitor_y: 5,
        ..Parameters::default()
    };
    let stepper = simulate(&parameters, &mut MemoryReporter::new()).unwrap();

    assert!(final_column_deviation(&stepper, 2) < 1e-9);
    let velocity = stepper.get_velocity();
    for j in stepper.get_grid().wall_rows(WallFace::Top) {
        assert_eq!(velocity.get(3, j), 1.0);
    }
}

#[test]
fn test_tolerance_stops_before_the_last_step() {
    let parameters = Parameters {
        stop_condition: StopCondition::Tolerance {
            tolerance: 1e-6,
            min_steps: 10,
        },
        time_steps: 5000,
        ..Parameters::test_default()
    };
    let mut reporter = MemoryReporter::new();
    let stepper = simulate(&parameters, &mut reporter).unwrap();
    let summary = stepper.summary();

    assert!(summary.stopped_early);
    assert!(summary.time_steps < 4999);
    assert!(summary.last_residual.unwrap().magnitude() <= 1e-6);
    assert_eq!(reporter.get_residuals().len(), summary.time_steps);
}

#[test]
fn test_runs_are_reproducible() {
    let parameters = Parameters {
        time_steps: 300,
        ..Parameters::default()
    };
    let mut first = MemoryReporter::new();
    let mut second = MemoryReporter::new();
    simulate(&parameters, &mut first).unwrap();
    simulate(&parameters, &mut second).unwrap();

    assert_eq!(first.get_residuals(), second.get_residuals());
    assert_eq!(first.get_final_velocity(), second.get_final_velocity());
}

#[test]
fn test_invalid_configuration_fails_before_stepping() {
    let parameters = Parameters {
        delta_y: 0.0,
        ..Parameters::default()
    };
    let mut reporter = MemoryReporter::new();
    let error = simulate(&parameters, &mut reporter).unwrap_err();

    assert!(error.to_string().contains("dy"));
    assert!(reporter.get_residuals().is_empty());
    assert!(reporter.get_final_velocity().is_none());
}
