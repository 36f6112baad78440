use super::chain::Chain;
use serde::Serialize;

/// A coordinate model, identified by name.
///
/// The name is kept as a string because the source formats number models
/// heterogeneously (`MODEL     1` vs. `pdbx_PDB_model_num`). Chains keep
/// first-appearance order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    pub name: String,
    pub chains: Vec<Chain>,
}

impl Model {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            chains: Vec::new(),
        }
    }

    /// Looks up the first chain with the given name. Used by the NCS
    /// expansion engine for collision checks.
    pub fn find_chain(&self, name: &str) -> Option<&Chain> {
        self.chains.iter().find(|c| c.name == name)
    }

    /// Find-or-create helper matching chains by name.
    pub fn find_or_add_chain(&mut self, name: &str) -> &mut Chain {
        let idx = match self.chains.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.chains.push(Chain::new(name));
                self.chains.len() - 1
            }
        };
        &mut self.chains[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_or_add_chain_preserves_first_appearance_order() {
        let mut model = Model::new("1");
        model.find_or_add_chain("B");
        model.find_or_add_chain("A");
        model.find_or_add_chain("B");
        let names: Vec<&str> = model.chains.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn find_chain_returns_first_match() {
        let mut model = Model::new("1");
        model.find_or_add_chain("A");
        assert!(model.find_chain("A").is_some());
        assert!(model.find_chain("Z").is_none());
    }
}
