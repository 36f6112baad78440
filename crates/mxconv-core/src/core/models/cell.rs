use serde::Serialize;

/// Unit cell parameters: axis lengths in Å and angles in degrees.
///
/// The default is the degenerate all-zero cell used when the input carries
/// no crystal information.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct UnitCell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl UnitCell {
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    pub fn set(&mut self, a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) {
        *self = Self::new(a, b, c, alpha, beta, gamma);
    }

    /// False for the degenerate cell.
    pub fn is_crystal(&self) -> bool {
        self.a > 0.0 && self.b > 0.0 && self.c > 0.0
    }
}
