use super::element::Element;
use nalgebra::Point3;
use serde::Serialize;

/// Anisotropic displacement parameters: the six unique components of the
/// symmetric U tensor, in Å².
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Anisou {
    pub u11: f64,
    pub u22: f64,
    pub u33: f64,
    pub u12: f64,
    pub u13: f64,
    pub u23: f64,
}

/// A single atom site.
///
/// Optional source fields take documented defaults: occupancy 1.0,
/// isotropic B-factor 50.0, formal charge 0, no alternate location
/// (`altloc` is a space), no anisotropic parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atom {
    /// Atom name as deposited (e.g., "CA", "OXT").
    pub name: String,
    /// Chemical element of the atom.
    pub element: Element,
    /// Alternate-location indicator; a space means none.
    pub altloc: char,
    /// Formal charge in elementary charge units.
    pub charge: i32,
    /// Cartesian position in Å.
    pub pos: Point3<f64>,
    /// Occupancy.
    pub occ: f64,
    /// Isotropic displacement parameter (B-factor).
    pub b_iso: f64,
    /// Anisotropic displacement parameters, when deposited.
    pub aniso: Option<Anisou>,
}

impl Atom {
    /// Creates an atom at `pos` with all optional fields at their defaults.
    pub fn new(name: &str, element: Element, pos: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            element,
            altloc: ' ',
            charge: 0,
            pos,
            occ: 1.0,
            b_iso: 50.0,
            aniso: None,
        }
    }

    /// True if the atom has no alternate-location indicator.
    pub fn has_no_altloc(&self) -> bool {
        self.altloc == ' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_documented_defaults() {
        let atom = Atom::new("CA", Element::new("C"), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.element, Element::new("C"));
        assert_eq!(atom.altloc, ' ');
        assert!(atom.has_no_altloc());
        assert_eq!(atom.charge, 0);
        assert_eq!(atom.occ, 1.0);
        assert_eq!(atom.b_iso, 50.0);
        assert_eq!(atom.aniso, None);
        assert_eq!(atom.pos, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn altloc_marks_alternate_conformation() {
        let mut atom = Atom::new("CB", Element::new("C"), Point3::origin());
        atom.altloc = 'B';
        assert!(!atom.has_no_altloc());
    }
}
