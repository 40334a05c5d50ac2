use crate::constants::Float;
use thiserror::Error;

pub type CfResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("the number of {name} cells must be positive (got {value})")]
    NonPositiveCells { name: &'static str, value: usize },

    #[error("{name} must be positive and finite (got {value})")]
    NonPositiveValue { name: &'static str, value: Float },

    #[error("the number of time steps must be positive (got {0})")]
    NonPositiveSteps(usize),

    #[error("at least one wall layer per side is required")]
    NoWallLayers,

    #[error("{name} must be finite (got {value})")]
    NonFiniteValue { name: &'static str, value: Float },

    #[error("monitor index {axis} = {index} is outside the updated interior [{min}, {max})")]
    MonitorOutOfRange {
        axis: &'static str,
        index: usize,
        min: usize,
        max: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepperError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("the stepper cannot {operation} while {state:?}")]
    InvalidState {
        operation: &'static str,
        state: crate::couette::StepperState,
    },
}
