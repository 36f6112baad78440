//! Expansion of non-crystallographic symmetry into explicit chains.

use crate::core::models::model::Model;
use crate::core::models::structure::Structure;

/// How chains generated by NCS expansion are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainNaming {
    /// Shortest unused one-character name from `A-Z a-z 0-9`.
    Short,
    /// Original name + operator id, de-collided with trailing `a`s.
    AddNum,
    /// Keep the original name and rely on segment tags to tell copies
    /// apart (for consumers that split chains by segment afterwards).
    Dup,
}

const SHORT_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

fn short_name(model: &Model) -> Option<String> {
    SHORT_ALPHABET
        .iter()
        .map(|&b| (b as char).to_string())
        .find(|name| model.find_chain(name).is_none())
}

fn add_num_name(model: &Model, base: &str, op_id: &str) -> String {
    let mut name = format!("{base}{op_id}");
    while model.find_chain(&name).is_some() {
        name.push('a');
    }
    name
}

/// Generates a copy of every pre-existing chain for every operator not
/// yet flagged `given`, transforming atom positions by the operator.
///
/// Chains added by this call are never themselves expanded (the snapshot
/// is taken per model before any copies are made). Residues with a
/// subchain label get the new chain name prefixed onto it, keeping
/// subchain identity unique across copies. On return every operator is
/// flagged `given`, so a second call is a no-op.
///
/// The `Short` policy needs one free alphabet symbol per generated chain;
/// a model whose expanded chain count would reach 63 switches to `AddNum`
/// for that model before any name is drawn, never mid-run.
pub fn expand_ncs(st: &mut Structure, naming: ChainNaming) {
    let ops: Vec<usize> = (0..st.ncs.len()).filter(|&i| !st.ncs[i].given).collect();
    if ops.is_empty() {
        return;
    }
    for model in &mut st.models {
        let orig_len = model.chains.len();
        let naming = if naming == ChainNaming::Short && orig_len * (ops.len() + 1) >= 63 {
            ChainNaming::AddNum
        } else {
            naming
        };
        if naming == ChainNaming::Dup {
            for chain in &mut model.chains {
                for residue in &mut chain.residues {
                    residue.segment = "0".to_string();
                }
            }
        }
        for ci in 0..orig_len {
            for &oi in &ops {
                let op = &st.ncs[oi];
                let base = model.chains[ci].name.clone();
                let new_name = match naming {
                    ChainNaming::Short => short_name(model)
                        .unwrap_or_else(|| add_num_name(model, &base, &op.id)),
                    ChainNaming::AddNum => add_num_name(model, &base, &op.id),
                    ChainNaming::Dup => base,
                };
                let mut chain = model.chains[ci].clone();
                chain.name = new_name.clone();
                for residue in &mut chain.residues {
                    if naming == ChainNaming::Dup {
                        residue.segment = op.id.clone();
                    }
                    if !residue.subchain.is_empty() {
                        residue.subchain = format!("{new_name}:{}", residue.subchain);
                    }
                    for atom in &mut residue.atoms {
                        atom.pos = op.apply(&atom.pos);
                    }
                }
                model.chains.push(chain);
            }
        }
    }
    for op in &mut st.ncs {
        op.given = true;
    }
}
