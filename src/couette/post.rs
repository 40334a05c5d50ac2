use super::io::create_script_for_profile_graph;
use super::{Grid, InitialConditions, MaterialProperties, Parameters};
use crate::io::*;
use crate::prelude_crate::*;
use colored::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Steady Couette–Poiseuille velocity at every row of the grid.
///
/// The pressure gradient is `pressure_step / dx`; rows inside the walls take the wall value.
///
/// # Examples
/// ```
/// # use couetteflow::couette::{post, Grid, InitialConditions, MaterialProperties};
/// let grid = Grid::new(10, 3, 1, 1.0, 0.25).unwrap();
/// let material = MaterialProperties::new(1.0, 1.0).unwrap();
/// let initial = InitialConditions {
///     initial_velocity: 0.0,
///     initial_pressure: 0.0,
///     top_wall_velocity: 1.0,
///     bottom_wall_velocity: 0.0,
///     pressure_step: 0.0,
/// };
/// let profile = post::analytic_profile(&grid, &material, &initial);
///
/// assert_eq!(profile, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn analytic_profile(
    grid: &Grid,
    material: &MaterialProperties,
    initial: &InitialConditions,
) -> Vec<Float> {
    let height = grid.channel_height();
    let pressure_gradient = initial.pressure_step / grid.get_dx();
    let u_bottom = initial.bottom_wall_velocity;
    let u_top = initial.top_wall_velocity;
    (0..grid.get_ny_total())
        .map(|j| {
            let y = grid.wall_distance(j);
            u_bottom
                + (u_top - u_bottom) * y / height
                + pressure_gradient / (2.0 * material.get_mu()) * (y * y - y * height)
        })
        .collect()
}

/// Largest absolute difference between a velocity column and the analytic profile,
/// over the interior rows.
pub fn profile_deviation(grid: &Grid, column: &[Float], analytic: &[Float]) -> Float {
    grid.interior_rows()
        .map(|j| (column[j] - analytic[j]).abs())
        .fold(0.0, Float::max)
}

/// Compares the exported velocity at `monitor_x` with the analytic profile and writes
/// `profile.csv` with its gnuplot script.
pub fn post_profile<P>(root: P, parameters: &Parameters) -> CfResult<()>
where
    P: AsRef<Path>,
{
    let setup = parameters.setup()?;
    let grid = setup.grid;
    let data_path = root.as_ref().join(DATA_PATH);

    let number_of_coordinates = read_csv_file(data_path.join(COORDINATES_FILE))?.len();
    if number_of_coordinates != grid.get_number_of_nodes() {
        return Err(format!(
            "{COORDINATES_FILE} holds {number_of_coordinates} nodes but the case has {}",
            grid.get_number_of_nodes()
        )
        .into());
    }
    let velocity = parse_scalar_from_string(read_csv_file(data_path.join(VELOCITY_FILE))?)?;
    if velocity.len() != grid.get_number_of_nodes() {
        return Err(format!(
            "{VELOCITY_FILE} holds {} values but the case has {} nodes",
            velocity.len(),
            grid.get_number_of_nodes()
        )
        .into());
    }

    let i = setup.monitor_point.get_i();
    let start = grid.index(i, 0);
    let column = &velocity[start..start + grid.get_ny_total()];
    let analytic = analytic_profile(&grid, &setup.material, &setup.initial);
    let deviation = profile_deviation(&grid, column, &analytic);

    let post_processing_path = root.as_ref().join(POST_PROCESSING_PATH);
    std::fs::create_dir_all(&post_processing_path)?;
    let path = post_processing_path.join(PROFILE_FILE);
    println!("Writing {}.\n", PROFILE_FILE.yellow().bold());
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "j,y,velocity,analytic,deviation")?;
    for j in 0..grid.get_ny_total() {
        writeln!(
            file,
            "{j},{:.8e},{:.8e},{:.8e},{:.8e}",
            grid.wall_distance(j),
            column[j],
            analytic[j],
            column[j] - analytic[j]
        )?;
    }
    file.flush()?;
    create_script_for_profile_graph(&post_processing_path)?;

    println!(
        "Maximum deviation from the analytic profile at column {}: {}\n",
        i.to_string().yellow().bold(),
        format!("{deviation:.6e} m/s").yellow().bold()
    );
    Ok(())
}
