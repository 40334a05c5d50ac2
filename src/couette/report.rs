use super::{FieldHistory, Grid, PressureField, Residual, VelocityField};
use crate::prelude_crate::*;
use colored::*;

/// Read access to the state of a finished run.
#[derive(Debug, Clone, Copy)]
pub struct FieldsView<'a> {
    pub grid: &'a Grid,
    pub velocity: &'a VelocityField,
    pub pressure: &'a PressureField,
    pub history: Option<&'a FieldHistory>,
    pub time_step: usize,
    pub time: Float,
}

/// Receives the residual of every step and the final fields of the run.
pub trait Reporter {
    fn report_step(&mut self, residual: &Residual) -> CfResult<()>;

    fn finish(&mut self, _fields: &FieldsView) -> CfResult<()> {
        Ok(())
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report_step(&mut self, residual: &Residual) -> CfResult<()> {
        (**self).report_step(residual)
    }

    fn finish(&mut self, fields: &FieldsView) -> CfResult<()> {
        (**self).finish(fields)
    }
}

impl<R: Reporter> Reporter for Vec<R> {
    fn report_step(&mut self, residual: &Residual) -> CfResult<()> {
        self.iter_mut()
            .try_for_each(|reporter| reporter.report_step(residual))
    }

    fn finish(&mut self, fields: &FieldsView) -> CfResult<()> {
        self.iter_mut().try_for_each(|reporter| reporter.finish(fields))
    }
}

// -------------------------------------------------------------- STRUCT: ConsoleReporter

/// Prints the residual table to stdout every `frequency` steps.
#[derive(Debug)]
pub struct ConsoleReporter {
    frequency: usize,
    lines_printed: usize,
}

impl ConsoleReporter {
    const HEADER_EVERY: usize = 40;

    pub fn new(frequency: usize) -> Self {
        ConsoleReporter {
            frequency: frequency.max(1),
            lines_printed: 0,
        }
    }

    fn print_residuals_header(&self) -> String {
        format!(
            "\n{:>10} {:>16} {:>16}",
            "time_step".cyan().bold(),
            "time".cyan().bold(),
            "residual".cyan().bold()
        )
    }

    fn print_residuals_line(&self, residual: &Residual) -> String {
        format!(
            "{:>10} {:>16.8e} {:>16.8e}",
            residual.time_step, residual.time, residual.value
        )
    }
}

impl Reporter for ConsoleReporter {
    fn report_step(&mut self, residual: &Residual) -> CfResult<()> {
        if residual.time_step % self.frequency != 0 && residual.time_step != 1 {
            return Ok(());
        }
        if self.lines_printed % Self::HEADER_EVERY == 0 {
            println!("{}", self.print_residuals_header());
        }
        println!("{}", self.print_residuals_line(residual));
        self.lines_printed += 1;
        Ok(())
    }

    fn finish(&mut self, fields: &FieldsView) -> CfResult<()> {
        println!(
            "\nFinished at time step {} (t = {} s).\n",
            fields.time_step.to_string().yellow().bold(),
            format!("{:.6}", fields.time).yellow().bold()
        );
        Ok(())
    }
}

// --------------------------------------------------------------- STRUCT: MemoryReporter

/// Keeps every residual and the final velocity field in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    residuals: Vec<Residual>,
    final_velocity: Option<VelocityField>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get_residuals(&self) -> &[Residual] {
        &self.residuals
    }

    pub fn get_final_velocity(&self) -> Option<&VelocityField> {
        self.final_velocity.as_ref()
    }
}

impl Reporter for MemoryReporter {
    fn report_step(&mut self, residual: &Residual) -> CfResult<()> {
        self.residuals.push(*residual);
        Ok(())
    }

    fn finish(&mut self, fields: &FieldsView) -> CfResult<()> {
        self.final_velocity = Some(fields.velocity.clone());
        Ok(())
    }
}
