use nalgebra::{Matrix3, Point3, Vector3};
use serde::Serialize;

/// A non-crystallographic symmetry operator: rotation followed by
/// translation.
///
/// `given` distinguishes operators whose images are already present in the
/// deposited coordinates from those that must be generated. The expansion
/// engine flips `given` to true after applying an operator instead of
/// removing it, which makes repeated expansion a no-op. `id` is a short
/// operator code used for naming and segment tagging during expansion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NcsOp {
    pub id: String,
    pub given: bool,
    pub rot: Matrix3<f64>,
    pub tran: Vector3<f64>,
}

impl NcsOp {
    pub fn new(id: &str, given: bool, rot: Matrix3<f64>, tran: Vector3<f64>) -> Self {
        Self {
            id: id.to_string(),
            given,
            rot,
            tran,
        }
    }

    /// Applies the operator: rotation first, then translation.
    pub fn apply(&self, pos: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rot * pos.coords + self.tran)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_op_leaves_position_unchanged() {
        let op = NcsOp::new("1", false, Matrix3::identity(), Vector3::zeros());
        let p = Point3::new(1.0, -2.0, 3.5);
        assert_eq!(op.apply(&p), p);
    }

    #[test]
    fn apply_rotates_before_translating() {
        // 90-degree rotation about z, then translation along x
        let rot = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let op = NcsOp::new("2", false, rot, Vector3::new(10.0, 0.0, 0.0));
        let moved = op.apply(&Point3::new(1.0, 0.0, 0.0));
        assert!((moved - Point3::new(10.0, 1.0, 0.0)).norm() < 1e-12);
    }
}
