pub(crate) use crate::cli::{self, Config, Mode};
pub(crate) use crate::constants::*;
pub(crate) use crate::error::{CfResult, ConfigError, StepperError};
pub(crate) use crate::{NodeType, WallFace, WALL_FACES};
