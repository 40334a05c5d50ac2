use super::VelocityField;

/// Every stored time step of the velocity field, kept for inspection after the run.
///
/// Slot `t` holds the field of step `t` as the stencil read it, i.e. after its wall rows
/// were enforced. The last slot is the final field.
#[derive(Debug, Clone, Default)]
pub struct FieldHistory {
    snapshots: Vec<VelocityField>,
}

impl FieldHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        FieldHistory {
            snapshots: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn record(&mut self, time_step: usize, field: &VelocityField) {
        assert_eq!(
            time_step,
            self.snapshots.len(),
            "time steps must be recorded in order"
        );
        self.snapshots.push(field.clone());
    }

    pub fn get(&self, time_step: usize) -> Option<&VelocityField> {
        self.snapshots.get(time_step)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VelocityField> {
        self.snapshots.iter()
    }
}
