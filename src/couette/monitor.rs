use super::MonitorPoint;
use crate::prelude_crate::*;
use std::collections::VecDeque;

// --------------------------------------------------------------------- STRUCT: Residual

/// Change of the monitored velocity over one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub time_step: usize,
    pub time: Float,
    pub value: Float,
}

impl Residual {
    pub fn new(time_step: usize, time: Float, value: Float) -> Self {
        Residual {
            time_step,
            time,
            value,
        }
    }

    pub fn magnitude(&self) -> Float {
        self.value.abs()
    }
}

// ---------------------------------------------------------------- ENUM: StopCondition

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StopCondition {
    /// Always run every configured step.
    #[default]
    FixedSteps,
    /// Stop once `|residual| <= tolerance`, but not before `min_steps` steps.
    Tolerance { tolerance: Float, min_steps: usize },
}

impl StopCondition {
    /// Tolerance stop that waits the default `MIN_ITER` steps.
    pub fn tolerance(tolerance: Float) -> Self {
        StopCondition::Tolerance {
            tolerance,
            min_steps: MIN_ITER,
        }
    }

    /// # Examples
    /// ```
    /// # use couetteflow::couette::{Residual, StopCondition};
    /// let stop = StopCondition::Tolerance { tolerance: 1e-6, min_steps: 5 };
    ///
    /// assert!(!stop.is_met(&Residual::new(3, 0.3, 0.0)));
    /// assert!(stop.is_met(&Residual::new(5, 0.5, 1e-7)));
    /// assert!(!stop.is_met(&Residual::new(6, 0.6, 1e-5)));
    /// assert!(!StopCondition::FixedSteps.is_met(&Residual::new(100, 1.0, 0.0)));
    /// ```
    pub fn is_met(&self, residual: &Residual) -> bool {
        match self {
            StopCondition::FixedSteps => false,
            StopCondition::Tolerance {
                tolerance,
                min_steps,
            } => residual.time_step >= *min_steps && residual.magnitude() <= *tolerance,
        }
    }
}

// ------------------------------------------------------- STRUCT: ConvergenceMonitor

#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    point: MonitorPoint,
    last: Option<Residual>,
    window: VecDeque<Float>,
    window_size: usize,
}

impl ConvergenceMonitor {
    pub fn new(point: MonitorPoint) -> Self {
        ConvergenceMonitor::with_window(point, DIVERGENCE_WINDOW)
    }

    pub fn with_window(point: MonitorPoint, window_size: usize) -> Self {
        ConvergenceMonitor {
            point,
            last: None,
            window: VecDeque::with_capacity(window_size + 1),
            window_size: window_size.max(2),
        }
    }

    pub fn get_point(&self) -> &MonitorPoint {
        &self.point
    }

    pub fn get_last(&self) -> Option<&Residual> {
        self.last.as_ref()
    }

    /// Records the change at the monitor point between two consecutive steps.
    pub fn observe(
        &mut self,
        time_step: usize,
        time: Float,
        previous: Float,
        current: Float,
    ) -> Residual {
        let residual = Residual::new(time_step, time, current - previous);
        self.window.push_back(residual.magnitude());
        if self.window.len() > self.window_size {
            self.window.pop_front();
        }
        self.last = Some(residual);
        residual
    }

    /// True when the residual is no longer finite or has grown on every step of a full
    /// window.
    pub fn is_diverging(&self) -> bool {
        if self.window.iter().any(|r| !r.is_finite()) {
            return true;
        }
        if self.window.len() < self.window_size {
            return false;
        }
        self.window
            .iter()
            .zip(self.window.iter().skip(1))
            .all(|(before, after)| after > before && *before > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::couette::Grid;

    fn test_monitor(window: usize) -> ConvergenceMonitor {
        let grid = Grid::new(3, 1, 1, 1.0, 1.0).unwrap();
        ConvergenceMonitor::with_window(MonitorPoint::new(&grid, 1, 1).unwrap(), window)
    }

    #[test]
    fn test_observe_returns_difference() {
        let mut monitor = test_monitor(4);
        let residual = monitor.observe(3, 0.3, 0.5, 0.75);

        assert_eq!(residual, Residual::new(3, 0.3, 0.25));
        assert_eq!(monitor.get_last(), Some(&residual));
    }

    #[test]
    fn test_decaying_residuals_are_not_diverging() {
        let mut monitor = test_monitor(4);
        let mut value = 1.0;
        for t in 1..20 {
            monitor.observe(t, t as Float, 0.0, value);
            value *= 0.9;
        }
        assert!(!monitor.is_diverging());
    }

    #[test]
    fn test_growing_residuals_are_diverging() {
        let mut monitor = test_monitor(4);
        let mut value = 1e-3;
        for t in 1..4 {
            monitor.observe(t, t as Float, 0.0, value);
            value *= -3.0;
        }
        assert!(!monitor.is_diverging());
        monitor.observe(4, 4.0, 0.0, value);
        assert!(monitor.is_diverging());
    }

    #[test]
    fn test_non_finite_residual_is_diverging() {
        let mut monitor = test_monitor(4);
        monitor.observe(1, 1.0, 0.0, Float::NAN);
        assert!(monitor.is_diverging());
    }

    #[test]
    fn test_zero_residuals_are_not_diverging() {
        let mut monitor = test_monitor(3);
        for t in 1..10 {
            monitor.observe(t, t as Float, 0.5, 0.5);
        }
        assert!(!monitor.is_diverging());
    }
}
