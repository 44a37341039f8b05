use num_complex::Complex64;

pub type QubitIdx = usize;
pub type BitIdx = usize;
pub type Real = f64;
pub type Complex = Complex64;

pub mod constants {
    pub const RECP_SQRT_2: super::Real = std::f64::consts::FRAC_1_SQRT_2;
    pub const ZERO_THRESHOLD: super::Real = 1e-10;

    // number of linear transforms between two evictions of negligible amplitudes
    pub const ZERO_CYCLE_SIZE: u64 = 100;

    pub const MAX_QUBITS: usize = 64;

    pub const OUTPUT_DECIMALS: usize = 8;
}

pub fn is_real_zero(x: Real) -> bool {
    x.abs() < constants::ZERO_THRESHOLD
}

pub fn is_zero(c: Complex) -> bool {
    is_real_zero(c.re) && is_real_zero(c.im)
}

pub fn is_nonzero(c: Complex) -> bool {
    !is_zero(c)
}
