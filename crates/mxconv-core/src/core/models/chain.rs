use super::residue::Residue;
use serde::Serialize;

/// A chain: an ordered sequence of residues under one name.
///
/// `name` is the canonical (label) identifier; `auth_name` the author
/// identifier, which PDB-derived structures share with `name`. Name
/// uniqueness within a model is deliberately not enforced: duplicate names
/// are legal in the PDB format and are produced intentionally by NCS
/// expansion under the `Dup` naming policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chain {
    pub name: String,
    pub auth_name: String,
    pub residues: Vec<Residue>,
}

impl Chain {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            auth_name: name.to_string(),
            residues: Vec::new(),
        }
    }

    /// Find-or-create helper used by both producers during row-wise
    /// construction. The lookup applies the residue identity rule
    /// ([`Residue::matches`]); on a miss a new residue is appended.
    pub fn find_or_add_residue(
        &mut self,
        seq_id: i32,
        auth_seq_id: i32,
        name: &str,
    ) -> &mut Residue {
        let idx = match self
            .residues
            .iter()
            .position(|r| r.matches(seq_id, auth_seq_id, name))
        {
            Some(idx) => idx,
            None => {
                self.residues.push(Residue::new(seq_id, auth_seq_id, name));
                self.residues.len() - 1
            }
        };
        &mut self.residues[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::UNKNOWN_ID;

    #[test]
    fn find_or_add_residue_appends_in_order() {
        let mut chain = Chain::new("A");
        chain.find_or_add_residue(1, 1, "ALA");
        chain.find_or_add_residue(2, 2, "GLY");
        assert_eq!(chain.residues.len(), 2);
        assert_eq!(chain.residues[0].name, "ALA");
        assert_eq!(chain.residues[1].name, "GLY");
    }

    #[test]
    fn find_or_add_residue_reuses_matching_residue() {
        let mut chain = Chain::new("A");
        chain.find_or_add_residue(1, 1, "ALA");
        chain.find_or_add_residue(1, 1, "ALA");
        assert_eq!(chain.residues.len(), 1);
    }

    #[test]
    fn unknown_seq_id_residues_split_on_auth_seq_id() {
        let mut chain = Chain::new("W");
        chain.find_or_add_residue(UNKNOWN_ID, 301, "HOH");
        chain.find_or_add_residue(UNKNOWN_ID, 302, "HOH");
        chain.find_or_add_residue(UNKNOWN_ID, 301, "HOH");
        assert_eq!(chain.residues.len(), 2);
    }
}
