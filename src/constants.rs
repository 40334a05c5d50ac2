pub type Float = f64;

pub const DIFFUSION_STABILITY_LIMIT: Float = 0.5;

pub(crate) const MIN_ITER: usize = 10;

pub(crate) const DIVERGENCE_WINDOW: usize = 10;
