//! Five-Why analysis: independent causal chains, each rooted in one cause.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ChainId;
use crate::error::CaseError;
use crate::text::is_blank;

/// One causal chain. `whys[i]` answers "Why #<i+2>".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiveWhyChain {
    pub id: ChainId,
    pub initial_cause: String,
    pub whys: Vec<String>,
}

impl FiveWhyChain {
    /// Every entry of the chain: the initial cause first, then each step.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.initial_cause.as_str()).chain(self.whys.iter().map(String::as_str))
    }

    /// Text the step at `index` answers: the initial cause for step 0, else
    /// the previous step.
    #[must_use]
    pub fn predecessor(&self, index: usize) -> Option<&str> {
        match index {
            0 => Some(self.initial_cause.as_str()),
            n => self.whys.get(n - 1).map(String::as_str),
        }
    }

    /// A step is enabled only when the text it answers is filled in.
    #[must_use]
    pub fn is_step_enabled(&self, index: usize) -> bool {
        self.predecessor(index).is_some_and(|prev| !is_blank(prev))
    }

    fn check_index(&self, index: usize) -> Result<(), CaseError> {
        if index < self.whys.len() {
            Ok(())
        } else {
            Err(CaseError::WhyIndexOutOfRange {
                chain: self.id,
                index,
                len: self.whys.len(),
            })
        }
    }
}

/// Ordered collection of Five-Why chains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiveWhyAnalysis {
    chains: Vec<FiveWhyChain>,
}

impl FiveWhyAnalysis {
    #[must_use]
    pub fn chains(&self) -> &[FiveWhyChain] {
        &self.chains
    }

    #[must_use]
    pub fn get(&self, id: ChainId) -> Option<&FiveWhyChain> {
        self.chains.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: ChainId) -> Result<&mut FiveWhyChain, CaseError> {
        self.chains
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CaseError::ChainNotFound(id))
    }

    /// Append a chain with no initial cause and no steps.
    pub fn add_chain(&mut self) -> ChainId {
        let id = ChainId::next();
        self.chains.push(FiveWhyChain {
            id,
            initial_cause: String::new(),
            whys: Vec::new(),
        });
        debug!(%id, "five-why analysis added");
        id
    }

    pub fn remove_chain(&mut self, id: ChainId) -> Result<FiveWhyChain, CaseError> {
        let pos = self
            .chains
            .iter()
            .position(|c| c.id == id)
            .ok_or(CaseError::ChainNotFound(id))?;
        debug!(%id, "five-why analysis removed");
        Ok(self.chains.remove(pos))
    }

    /// Set the root of a chain and restart it.
    ///
    /// A first non-blank selection on an empty chain seeds one blank step;
    /// any other change clears all steps.
    pub fn set_initial_cause(
        &mut self,
        id: ChainId,
        cause: impl Into<String>,
    ) -> Result<(), CaseError> {
        let chain = self.get_mut(id)?;
        let cause = cause.into();
        let seed = chain.whys.is_empty() && !is_blank(&cause);
        chain.whys = if seed { vec![String::new()] } else { Vec::new() };
        chain.initial_cause = cause;
        debug!(%id, seeded = seed, "five-why root set");
        Ok(())
    }

    pub fn edit_why(
        &mut self,
        id: ChainId,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), CaseError> {
        let chain = self.get_mut(id)?;
        chain.check_index(index)?;
        chain.whys[index] = text.into();
        Ok(())
    }

    /// Append a blank step and return its index.
    pub fn add_why(&mut self, id: ChainId) -> Result<usize, CaseError> {
        let chain = self.get_mut(id)?;
        chain.whys.push(String::new());
        Ok(chain.whys.len() - 1)
    }

    /// Remove the step at `index`; later steps shift left.
    pub fn remove_why(&mut self, id: ChainId, index: usize) -> Result<String, CaseError> {
        let chain = self.get_mut(id)?;
        chain.check_index(index)?;
        Ok(chain.whys.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chain_is_empty() {
        let mut five_why = FiveWhyAnalysis::default();
        let id = five_why.add_chain();
        let chain = five_why.get(id).unwrap();
        assert_eq!(chain.initial_cause, "");
        assert!(chain.whys.is_empty());
    }

    #[test]
    fn first_selection_seeds_one_blank_step() {
        let mut five_why = FiveWhyAnalysis::default();
        let id = five_why.add_chain();
        five_why.set_initial_cause(id, "Sensor rusak").unwrap();
        assert_eq!(five_why.get(id).unwrap().whys, vec![String::new()]);
    }

    #[test]
    fn whitespace_selection_does_not_seed() {
        let mut five_why = FiveWhyAnalysis::default();
        let id = five_why.add_chain();
        five_why.set_initial_cause(id, "   ").unwrap();
        let chain = five_why.get(id).unwrap();
        assert_eq!(chain.initial_cause, "   ");
        assert!(chain.whys.is_empty());

        five_why.set_initial_cause(id, "Sensor rusak").unwrap();
        assert_eq!(five_why.get(id).unwrap().whys, vec![String::new()]);
    }

    #[test]
    fn changing_root_clears_steps() {
        let mut five_why = FiveWhyAnalysis::default();
        let id = five_why.add_chain();
        five_why.set_initial_cause(id, "Sensor rusak").unwrap();
        five_why.edit_why(id, 0, "Tidak ada jadwal kalibrasi").unwrap();
        five_why.set_initial_cause(id, "Operator baru").unwrap();
        let chain = five_why.get(id).unwrap();
        assert_eq!(chain.initial_cause, "Operator baru");
        assert!(chain.whys.is_empty());
    }

    #[test]
    fn blank_selection_on_empty_chain_does_not_seed() {
        let mut five_why = FiveWhyAnalysis::default();
        let id = five_why.add_chain();
        five_why.set_initial_cause(id, "").unwrap();
        assert!(five_why.get(id).unwrap().whys.is_empty());
    }

    #[test]
    fn remove_why_shifts_left() {
        let mut five_why = FiveWhyAnalysis::default();
        let id = five_why.add_chain();
        five_why.set_initial_cause(id, "root").unwrap();
        five_why.edit_why(id, 0, "w2").unwrap();
        let i = five_why.add_why(id).unwrap();
        five_why.edit_why(id, i, "w3").unwrap();
        let i = five_why.add_why(id).unwrap();
        five_why.edit_why(id, i, "w4").unwrap();

        assert_eq!(five_why.remove_why(id, 0).unwrap(), "w2");
        assert_eq!(five_why.get(id).unwrap().whys, vec!["w3", "w4"]);
    }

    #[test]
    fn step_enablement_follows_predecessor() {
        let mut five_why = FiveWhyAnalysis::default();
        let id = five_why.add_chain();
        five_why.set_initial_cause(id, "root").unwrap();
        five_why.add_why(id).unwrap();
        let chain = five_why.get(id).unwrap();
        assert!(chain.is_step_enabled(0));
        assert!(!chain.is_step_enabled(1));
        assert!(!chain.is_step_enabled(5));
    }

    #[test]
    fn edit_out_of_range_is_rejected() {
        let mut five_why = FiveWhyAnalysis::default();
        let id = five_why.add_chain();
        assert!(matches!(
            five_why.edit_why(id, 0, "x"),
            Err(CaseError::WhyIndexOutOfRange { index: 0, len: 0, .. })
        ));
    }

    #[test]
    fn entries_lists_root_then_steps() {
        let mut five_why = FiveWhyAnalysis::default();
        let id = five_why.add_chain();
        five_why.set_initial_cause(id, "root").unwrap();
        five_why.edit_why(id, 0, "why2").unwrap();
        let entries: Vec<_> = five_why.get(id).unwrap().entries().collect();
        assert_eq!(entries, vec!["root", "why2"]);
    }
}
