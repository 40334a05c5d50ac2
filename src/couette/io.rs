// ------------------------------------------------------------------------------- IMPORTS

use super::report::{FieldsView, Reporter};
use super::{Grid, PressureField, Residual, VelocityField};
use crate::io::*;
use crate::prelude_crate::*;
use colored::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

// ------------------------------------------------------------------ STRUCT: CsvReporter

/// Appends every residual to `residuals.csv` and writes the final fields as CSV files.
#[derive(Debug)]
pub struct CsvReporter {
    data_path: PathBuf,
    residuals: BufWriter<File>,
}

impl CsvReporter {
    pub fn new<P>(root: P) -> CfResult<Self>
    where
        P: AsRef<Path>,
    {
        let data_path = root.as_ref().join(DATA_PATH);
        fs::create_dir_all(&data_path)?;
        let mut residuals = BufWriter::new(File::create(data_path.join(RESIDUALS_FILE))?);
        writeln!(residuals, "time_step,time,residual")?;
        Ok(CsvReporter {
            data_path,
            residuals,
        })
    }
}

impl Reporter for CsvReporter {
    fn report_step(&mut self, residual: &Residual) -> CfResult<()> {
        writeln!(
            self.residuals,
            "{},{:.8e},{:.8e}",
            residual.time_step, residual.time, residual.value
        )?;
        Ok(())
    }

    fn finish(&mut self, fields: &FieldsView) -> CfResult<()> {
        self.residuals.flush()?;
        write_coordinates(&self.data_path, fields.grid)?;
        write_velocity(&self.data_path, fields.velocity)?;
        write_pressure(&self.data_path, fields.pressure)?;
        if let Some(history) = fields.history {
            println!(
                "Writing {} for {} time steps.\n",
                VELOCITY_FILE.yellow().bold(),
                history.len().to_string().yellow().bold()
            );
            for (time_step, velocity) in history.iter().enumerate() {
                let step_path = self.data_path.join(time_step.to_string());
                fs::create_dir_all(&step_path)?;
                write_velocity(&step_path, velocity)?;
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------- FUNCTIONS

pub fn write_coordinates<P>(data_path: P, grid: &Grid) -> CfResult<()>
where
    P: AsRef<Path>,
{
    let path = data_path.as_ref().join(COORDINATES_FILE);
    println!("Writing {}.\n", COORDINATES_FILE.yellow().bold());
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "i,j,x,y,node_type")?;
    for i in 0..grid.get_nx() {
        for j in 0..grid.get_ny_total() {
            let node_type = match grid.node_type(j) {
                NodeType::Fluid => "fluid",
                NodeType::Wall => "wall",
            };
            writeln!(
                file,
                "{i},{j},{:.8e},{:.8e},{node_type}",
                grid.x_coordinate(i),
                grid.y_coordinate(j)
            )?;
        }
    }
    file.flush()?;
    Ok(())
}

pub fn write_velocity<P>(data_path: P, velocity: &VelocityField) -> CfResult<()>
where
    P: AsRef<Path>,
{
    let path = data_path.as_ref().join(VELOCITY_FILE);
    log::debug!("Writing {}", path.display());
    write_scalar(path, "velocity", velocity.get_values())
}

pub fn write_pressure<P>(data_path: P, pressure: &PressureField) -> CfResult<()>
where
    P: AsRef<Path>,
{
    let path = data_path.as_ref().join(PRESSURE_FILE);
    println!("Writing {}.\n", PRESSURE_FILE.yellow().bold());
    write_scalar(path, "pressure", pressure.get_values())
}

fn write_scalar(path: PathBuf, header: &str, values: &[Float]) -> CfResult<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "{header}")?;
    for value in values {
        writeln!(file, "{value:.8e}")?;
    }
    file.flush()?;
    Ok(())
}

fn create_script_for_residuals_graph<P>(post_processing_path: P) -> CfResult<()>
where
    P: AsRef<Path>,
{
    let path = post_processing_path.as_ref().join(RESIDUALS_GRAPH_FILE);
    println!(
        "Creating the residuals graph script file: {}.\n",
        path.display().to_string().yellow().bold()
    );
    let mut file = File::create(&path)?;
    writeln!(
        file,
        r#"set datafile separator comma
set title "Couette flow"
set ylabel "|residual| (m/s)"
set xlabel "Time (s)"
set grid
set logscale y
set ytics format "%L"
set mxtics 5
set terminal push
set terminal pngcairo font "courier"
set output "fig_residuals.png"
plot "../{DATA_PATH}/{RESIDUALS_FILE}" u 2:(abs($3)) t "monitor" w l
set terminal pdfcairo font "courier"
set output "fig_residuals.pdf"
replot
set terminal pop
set output"#
    )?;
    Ok(())
}

fn create_script_for_live_residuals_graph<P>(post_processing_path: P) -> CfResult<()>
where
    P: AsRef<Path>,
{
    let path = post_processing_path.as_ref().join(LIVE_RESIDUALS_GRAPH_FILE);
    println!(
        "Creating the live residuals graph script: {}.\n",
        path.display().to_string().yellow().bold()
    );
    let mut file = File::create(&path)?;
    writeln!(
        file,
        r#"set datafile separator comma
set title "Couette flow"
set ylabel "|residual| (m/s)"
set xlabel "Time (s)"
set grid
set logscale y
set ytics format "%L"
set mxtics 5
set terminal push
set terminal qt font "courier,12"
bind "q" "true=0"
true = 1
while (true) {{
plot "../{DATA_PATH}/{RESIDUALS_FILE}" u 2:(abs($3)) t "monitor" w l lw 2
pause 1
}}
set terminal pop"#
    )?;
    Ok(())
}

pub(crate) fn create_script_for_profile_graph<P>(post_processing_path: P) -> CfResult<()>
where
    P: AsRef<Path>,
{
    let path = post_processing_path.as_ref().join(PROFILE_GRAPH_FILE);
    println!(
        "Creating the profile graph script file: {}.\n",
        path.display().to_string().yellow().bold()
    );
    let mut file = File::create(&path)?;
    writeln!(
        file,
        r#"set datafile separator comma
set title "Couette flow"
set xlabel "Velocity (m/s)"
set ylabel "y (m)"
set grid
set key left top
set terminal push
set terminal pngcairo font "courier"
set output "fig_profile.png"
plot "{PROFILE_FILE}" u 3:2 t "numerical" w lp pt 7,\
"" u 4:2 t "analytic" w l
set terminal pdfcairo font "courier"
set output "fig_profile.pdf"
replot
set terminal pop
set output"#
    )?;
    Ok(())
}

pub fn case_setup<P>(root: P) -> CfResult<()>
where
    P: AsRef<Path>,
{
    create_case_directories(&root)?;
    let post_processing_path = root.as_ref().join(POST_PROCESSING_PATH);
    create_script_for_residuals_graph(&post_processing_path)?;
    create_script_for_live_residuals_graph(&post_processing_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::couette::{simulate, Parameters};

    #[test]
    fn test_csv_reporter_writes_residuals_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let parameters = Parameters {
            nx: 4,
            ny: 3,
            time_steps: 6,
            monitor_x: 1,
            monitor_y: 2,
            keep_history: true,
            ..Parameters::test_default()
        };
        let mut reporter = CsvReporter::new(dir.path()).unwrap();
        simulate(&parameters, &mut reporter).unwrap();

        let data_path = dir.path().join(DATA_PATH);
        let residuals = read_csv_file(data_path.join(RESIDUALS_FILE)).unwrap();
        assert_eq!(residuals.len(), 5);
        assert!(residuals[0].starts_with("1,"));

        let coordinates = read_csv_file(data_path.join(COORDINATES_FILE)).unwrap();
        assert_eq!(coordinates.len(), 4 * 5);
        assert!(coordinates[0].starts_with("0,0,"));
        assert!(coordinates[0].ends_with(",wall"));
        assert!(coordinates[2].ends_with(",fluid"));

        let velocity =
            parse_scalar_from_string(read_csv_file(data_path.join(VELOCITY_FILE)).unwrap())
                .unwrap();
        assert_eq!(velocity.len(), 20);
        assert_eq!(velocity[9], 0.889);

        let pressure =
            parse_scalar_from_string(read_csv_file(data_path.join(PRESSURE_FILE)).unwrap())
                .unwrap();
        assert_eq!(pressure.len(), 20);

        for time_step in 0..6 {
            assert!(data_path
                .join(time_step.to_string())
                .join(VELOCITY_FILE)
                .is_file());
        }
    }

    #[test]
    fn test_case_setup_writes_scripts() {
        let dir = tempfile::tempdir().unwrap();
        case_setup(dir.path()).unwrap();

        let post_processing_path = dir.path().join(POST_PROCESSING_PATH);
        let script = fs::read_to_string(post_processing_path.join(RESIDUALS_GRAPH_FILE)).unwrap();
        assert!(script.contains("../data/residuals.csv"));
        assert!(post_processing_path.join(LIVE_RESIDUALS_GRAPH_FILE).is_file());
    }
}
