use crate::prelude_crate::*;
use colored::*;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const DATA_PATH: &str = "data";
pub const POST_PROCESSING_PATH: &str = "post_processing";
pub const COORDINATES_FILE: &str = "coordinates.csv";
pub const VELOCITY_FILE: &str = "velocity.csv";
pub const PRESSURE_FILE: &str = "pressure.csv";
pub const RESIDUALS_FILE: &str = "residuals.csv";
pub const PROFILE_FILE: &str = "profile.csv";
pub const RESIDUALS_GRAPH_FILE: &str = "gr_residuals.gp";
pub const LIVE_RESIDUALS_GRAPH_FILE: &str = "live_residuals.gp";
pub const PROFILE_GRAPH_FILE: &str = "gr_profile.gp";

pub fn create_case_directories<P>(root: P) -> io::Result<()>
where
    P: AsRef<Path>,
{
    for path_str in [DATA_PATH, POST_PROCESSING_PATH] {
        let path = root.as_ref().join(path_str);
        if !path.exists() {
            println!("Creating the {} path.\n", path_str.yellow().bold());
            fs::create_dir_all(&path)?;
        } else {
            println!("The {} path already exists.\n", path_str.yellow().bold());
        }
    }
    Ok(())
}

/// Lines of a CSV file without its header.
pub fn read_csv_file<P>(path: P) -> io::Result<Vec<String>>
where
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    BufReader::new(file)
        .lines()
        .skip(1)
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
        .collect()
}

/// # Examples
/// ```
/// # use couetteflow::io::parse_scalar_from_string;
/// let values = parse_scalar_from_string(vec!["1.5e-1".to_string(), " -2 ".to_string()]).unwrap();
///
/// assert_eq!(values, vec![0.15, -2.0]);
/// assert!(parse_scalar_from_string(vec!["abc".to_string()]).is_err());
/// ```
pub fn parse_scalar_from_string(data: Vec<String>) -> CfResult<Vec<Float>> {
    data.iter()
        .map(|line| {
            line.trim()
                .parse::<Float>()
                .map_err(|e| -> Box<dyn std::error::Error> {
                    format!("invalid value '{line}': {e}").into()
                })
        })
        .collect()
}
