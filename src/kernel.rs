use crate::prelude_crate::*;

/// Constants of the explicit update, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct StencilCoefficients {
    pub(crate) dt: Float,
    pub(crate) nu: Float,
    pub(crate) rho: Float,
    pub(crate) dx: Float,
    pub(crate) dy_2: Float,
}

impl StencilCoefficients {
    pub(crate) fn new(dt: Float, nu: Float, rho: Float, dx: Float, dy: Float) -> Self {
        StencilCoefficients {
            dt,
            nu,
            rho,
            dx,
            dy_2: dy * dy,
        }
    }
}

/// Forward-in-time, centred-in-space update of one node.
pub(crate) fn explicit_update(
    u_south: Float,
    u: Float,
    u_north: Float,
    p_west: Float,
    p_east: Float,
    coefficients: &StencilCoefficients,
) -> Float {
    let StencilCoefficients {
        dt,
        nu,
        rho,
        dx,
        dy_2,
    } = *coefficients;
    u + dt
        * (nu * (u_north - 2.0 * u + u_south) / dy_2
            - (1.0 / rho) * (p_east - p_west) / (2.0 * dx))
}

pub(crate) fn diffusion_number(nu: Float, dt: Float, dy: Float) -> Float {
    nu * dt / (dy * dy)
}
