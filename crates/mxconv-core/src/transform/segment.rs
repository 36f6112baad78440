//! Partitioning chains by residue segment tags.

use crate::core::models::chain::Chain;
use crate::core::models::structure::Structure;

/// Moves the residues of `chain` into one new chain per distinct segment
/// tag, named original name + tag.
///
/// Residues are moved, never copied; the source chain is left empty.
/// Groups form in encounter order and keep residue order, so interleaved
/// runs of the same tag land in the same destination chain without
/// re-sorting. The group for a tag is found by the segment of its first
/// residue.
pub fn split_by_segments(chain: &mut Chain) -> Vec<Chain> {
    let mut parts: Vec<Chain> = Vec::new();
    for residue in std::mem::take(&mut chain.residues) {
        let idx = match parts.iter().position(|part| {
            part.residues
                .first()
                .is_some_and(|r| r.segment == residue.segment)
        }) {
            Some(idx) => idx,
            None => {
                let mut part = Chain::new(&format!("{}{}", chain.name, residue.segment));
                part.auth_name = chain.auth_name.clone();
                parts.push(part);
                parts.len() - 1
            }
        };
        parts[idx].residues.push(residue);
    }
    parts
}

/// Applies [`split_by_segments`] to every chain of every model.
pub fn split_all_segments(st: &mut Structure) {
    for model in &mut st.models {
        let mut chains = Vec::new();
        for mut chain in std::mem::take(&mut model.chains) {
            chains.append(&mut split_by_segments(&mut chain));
        }
        model.chains = chains;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use crate::core::models::ncs::NcsOp;
    use crate::transform::ncs::{ChainNaming, expand_ncs};
    use nalgebra::{Matrix3, Point3, Vector3};

    fn chain_with_segments(tags: &[&str]) -> Chain {
        let mut chain = Chain::new("A");
        for (i, tag) in tags.iter().enumerate() {
            let seq = i as i32 + 1;
            let res = chain.find_or_add_residue(seq, seq, "ALA");
            res.segment = tag.to_string();
        }
        chain
    }

    #[test]
    fn contiguous_segments_split_into_named_chains() {
        let mut chain = chain_with_segments(&["P1", "P1", "P2"]);
        let parts = split_by_segments(&mut chain);
        assert!(chain.residues.is_empty(), "residues are moved out");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "AP1");
        assert_eq!(parts[0].residues.len(), 2);
        assert_eq!(parts[1].name, "AP2");
    }

    #[test]
    fn interleaved_segments_regroup_in_encounter_order() {
        let mut chain = chain_with_segments(&["A", "B", "A", "B"]);
        let parts = split_by_segments(&mut chain);
        assert_eq!(parts.len(), 2);
        let seqs: Vec<i32> = parts[0].residues.iter().map(|r| r.seq_id).collect();
        assert_eq!(seqs, [1, 3], "relative order survives regrouping");
        let seqs: Vec<i32> = parts[1].residues.iter().map(|r| r.seq_id).collect();
        assert_eq!(seqs, [2, 4]);
    }

    #[test]
    fn uniform_segment_yields_a_single_renamed_chain() {
        let mut chain = chain_with_segments(&["", ""]);
        let parts = split_by_segments(&mut chain);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "A");
        assert_eq!(parts[0].residues.len(), 2);
    }

    #[test]
    fn dup_expansion_then_split_recovers_the_base_copy() {
        let mut st = Structure::default();
        let model = st.find_or_add_model("1");
        for name in ["A", "B"] {
            let res = model.find_or_add_chain(name).find_or_add_residue(1, 1, "ALA");
            res.atoms.push(Atom::new(
                "CA",
                Element::new("C"),
                Point3::new(1.0, 2.0, 3.0),
            ));
        }
        let original = st.first_model().unwrap().chains.clone();
        st.ncs.push(NcsOp::new(
            "2",
            false,
            Matrix3::identity(),
            Vector3::new(10.0, 0.0, 0.0),
        ));
        expand_ncs(&mut st, ChainNaming::Dup);
        split_all_segments(&mut st);

        let model = st.first_model().unwrap();
        assert_eq!(model.chains.len(), 4);
        for base in &original {
            let split_name = format!("{}0", base.name);
            let recovered = model
                .find_chain(&split_name)
                .unwrap_or_else(|| panic!("missing chain {split_name}"));
            assert_eq!(recovered.residues.len(), base.residues.len());
            for (a, b) in recovered.residues.iter().zip(&base.residues) {
                assert_eq!(a.name, b.name);
                assert_eq!(a.atoms[0].pos, b.atoms[0].pos);
            }
        }
        let copy = model.find_chain("A2").expect("missing expanded copy");
        assert_eq!(copy.residues[0].atoms[0].pos, Point3::new(11.0, 2.0, 3.0));
    }
}
