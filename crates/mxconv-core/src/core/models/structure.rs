use super::cell::UnitCell;
use super::model::Model;
use super::ncs::NcsOp;
use serde::Serialize;
use std::collections::HashMap;

/// Root of the entity tree.
///
/// Owns the unit cell, space-group name, free-form metadata, the NCS
/// operator list, and the ordered models. Successful parses always leave at
/// least one model; the cell defaults to the degenerate zero cell when the
/// input has no crystal information.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Structure {
    /// Structure name, usually derived from the entry id or file name.
    pub name: String,
    pub cell: UnitCell,
    /// Space-group name in Hermann-Mauguin notation, empty if unknown.
    pub space_group: String,
    /// Free-form metadata keyed by mmCIF-style tag names.
    pub info: HashMap<String, String>,
    pub ncs: Vec<NcsOp>,
    pub models: Vec<Model>,
    /// Raw REMARK lines from PDB input, kept for downstream extraction
    /// (e.g., REMARK 290 symmetry operators).
    pub raw_remarks: Vec<String>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_model(&self) -> Option<&Model> {
        self.models.first()
    }

    /// Find-or-create helper matching models by name.
    pub fn find_or_add_model(&mut self, name: &str) -> &mut Model {
        let idx = match self.models.iter().position(|m| m.name == name) {
            Some(idx) => idx,
            None => {
                self.models.push(Model::new(name));
                self.models.len() - 1
            }
        };
        &mut self.models[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_structure_is_empty_with_degenerate_cell() {
        let st = Structure::new();
        assert!(st.models.is_empty());
        assert!(st.ncs.is_empty());
        assert!(st.info.is_empty());
        assert!(!st.cell.is_crystal());
        assert!(st.space_group.is_empty());
    }

    #[test]
    fn find_or_add_model_reuses_by_name() {
        let mut st = Structure::new();
        st.find_or_add_model("1");
        st.find_or_add_model("2");
        st.find_or_add_model("1");
        assert_eq!(st.models.len(), 2);
        assert_eq!(st.first_model().unwrap().name, "1");
    }
}
