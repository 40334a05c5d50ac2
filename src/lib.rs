mod cli;
pub mod constants;
pub mod couette;
pub mod error;
pub mod io;
mod kernel;
mod prelude_crate;

pub mod prelude {
    pub use crate::constants::Float;
    pub use crate::couette::{self, Parameters, StopCondition};
    pub use crate::error::{CfResult, ConfigError, StepperError};
    pub use crate::{NodeType, WallFace};
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WallFace {
    Bottom = 0,
    Top = 1,
}

const WALL_FACES: [WallFace; 2] = [WallFace::Bottom, WallFace::Top];

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum NodeType {
    Fluid = 0,
    Wall = 1,
}
