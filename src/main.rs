use couetteflow::prelude::*;

fn main() {
    let nx = 120;
    let wall_layers = 1;

    let parameters = couette::Parameters {
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
    };

    couette::load(parameters);
}
