//! Fishbone (Ishikawa) analysis: candidate causes grouped under categories.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CategoryId;
use super::taxonomy::{self, CUSTOM_CATEGORY};
use crate::error::CaseError;
use crate::text::{is_blank, non_blank};

/// One category column of the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishboneCategory {
    pub id: CategoryId,
    /// Taxonomy descriptor, or [`CUSTOM_CATEGORY`].
    pub name: String,
    /// Only meaningful when `name` is [`CUSTOM_CATEGORY`].
    pub custom_name: String,
    /// May contain blank placeholder rows.
    pub causes: Vec<String>,
}

impl FishboneCategory {
    #[must_use]
    pub fn is_custom(&self) -> bool {
        self.name == CUSTOM_CATEGORY
    }

    /// Name shown in reports and option lists.
    ///
    /// The custom name for custom categories, otherwise the taxonomy label
    /// without its annotation.
    #[must_use]
    pub fn effective_name(&self) -> &str {
        if self.is_custom() {
            self.custom_name.trim()
        } else {
            taxonomy::display_label(&self.name)
        }
    }

    /// Non-blank causes in insertion order.
    pub fn filled_causes(&self) -> impl Iterator<Item = &str> {
        non_blank(&self.causes).map(|(_, cause)| cause)
    }

    fn check_index(&self, index: usize) -> Result<(), CaseError> {
        if index < self.causes.len() {
            Ok(())
        } else {
            Err(CaseError::CauseIndexOutOfRange {
                category: self.id,
                index,
                len: self.causes.len(),
            })
        }
    }
}

/// One category field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryUpdate {
    Name(String),
    CustomName(String),
}

/// Ordered collection of Fishbone categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FishboneAnalysis {
    categories: Vec<FishboneCategory>,
}

impl FishboneAnalysis {
    #[must_use]
    pub fn categories(&self) -> &[FishboneCategory] {
        &self.categories
    }

    #[must_use]
    pub fn get(&self, id: CategoryId) -> Option<&FishboneCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: CategoryId) -> Result<&mut FishboneCategory, CaseError> {
        self.categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CaseError::CategoryNotFound(id))
    }

    /// Append a category named after the taxonomy's first entry, with one
    /// empty cause row.
    pub fn add_category(&mut self) -> CategoryId {
        let id = CategoryId::next();
        self.categories.push(FishboneCategory {
            id,
            name: taxonomy::default_category().to_string(),
            custom_name: String::new(),
            causes: vec![String::new()],
        });
        debug!(%id, "fishbone category added");
        id
    }

    /// Remove a category and return it.
    pub fn remove_category(&mut self, id: CategoryId) -> Result<FishboneCategory, CaseError> {
        let pos = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(CaseError::CategoryNotFound(id))?;
        debug!(%id, "fishbone category removed");
        Ok(self.categories.remove(pos))
    }

    pub fn update_category(
        &mut self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<(), CaseError> {
        let category = self.get_mut(id)?;
        match update {
            CategoryUpdate::Name(name) => category.name = name,
            CategoryUpdate::CustomName(name) => category.custom_name = name,
        }
        Ok(())
    }

    /// Append an empty cause row and return its index.
    pub fn add_cause(&mut self, id: CategoryId) -> Result<usize, CaseError> {
        let category = self.get_mut(id)?;
        category.causes.push(String::new());
        Ok(category.causes.len() - 1)
    }

    pub fn edit_cause(
        &mut self,
        id: CategoryId,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), CaseError> {
        let category = self.get_mut(id)?;
        category.check_index(index)?;
        category.causes[index] = text.into();
        Ok(())
    }

    /// Remove the cause at `index`; later causes shift left.
    pub fn remove_cause(&mut self, id: CategoryId, index: usize) -> Result<String, CaseError> {
        let category = self.get_mut(id)?;
        category.check_index(index)?;
        debug!(%id, index, "fishbone cause removed");
        Ok(category.causes.remove(index))
    }

    /// Place a new cause: into the trailing row when it is blank, else as a
    /// new row. Returns the index written.
    pub fn fill_next_cause(
        &mut self,
        id: CategoryId,
        text: impl Into<String>,
    ) -> Result<usize, CaseError> {
        let category = self.get_mut(id)?;
        let text = text.into();
        match category.causes.last_mut() {
            Some(last) if is_blank(last) => *last = text,
            _ => category.causes.push(text),
        }
        Ok(category.causes.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_causes(causes: &[&str]) -> (FishboneAnalysis, CategoryId) {
        let mut fishbone = FishboneAnalysis::default();
        let id = fishbone.add_category();
        for (i, cause) in causes.iter().enumerate() {
            if i > 0 {
                fishbone.add_cause(id).unwrap();
            }
            fishbone.edit_cause(id, i, *cause).unwrap();
        }
        (fishbone, id)
    }

    #[test]
    fn add_category_uses_taxonomy_default_and_one_blank_cause() {
        let mut fishbone = FishboneAnalysis::default();
        let id = fishbone.add_category();
        let cat = fishbone.get(id).unwrap();
        assert_eq!(cat.name, taxonomy::default_category());
        assert_eq!(cat.causes, vec![String::new()]);
        assert_eq!(cat.effective_name(), "Manusia (Man)");
    }

    #[test]
    fn remove_cause_shifts_later_causes_left() {
        let (mut fishbone, id) = with_causes(&["a", "b", "c", "d"]);
        let removed = fishbone.remove_cause(id, 1).unwrap();
        assert_eq!(removed, "b");
        assert_eq!(fishbone.get(id).unwrap().causes, vec!["a", "c", "d"]);
    }

    #[test]
    fn out_of_range_cause_edit_is_rejected_without_mutation() {
        let (mut fishbone, id) = with_causes(&["a"]);
        let err = fishbone.edit_cause(id, 3, "x").unwrap_err();
        assert_eq!(
            err,
            CaseError::CauseIndexOutOfRange {
                category: id,
                index: 3,
                len: 1
            }
        );
        assert_eq!(fishbone.get(id).unwrap().causes, vec!["a"]);
    }

    #[test]
    fn custom_category_uses_custom_name() {
        let mut fishbone = FishboneAnalysis::default();
        let id = fishbone.add_category();
        fishbone
            .update_category(id, CategoryUpdate::Name(CUSTOM_CATEGORY.into()))
            .unwrap();
        assert_eq!(fishbone.get(id).unwrap().effective_name(), "");
        fishbone
            .update_category(id, CategoryUpdate::CustomName(" Gudang ".into()))
            .unwrap();
        assert_eq!(fishbone.get(id).unwrap().effective_name(), "Gudang");
    }

    #[test]
    fn custom_name_is_ignored_for_taxonomy_categories() {
        let mut fishbone = FishboneAnalysis::default();
        let id = fishbone.add_category();
        fishbone
            .update_category(id, CategoryUpdate::CustomName("ignored".into()))
            .unwrap();
        assert_eq!(fishbone.get(id).unwrap().effective_name(), "Manusia (Man)");
    }

    #[test]
    fn remove_unknown_category_fails() {
        let mut fishbone = FishboneAnalysis::default();
        let ghost = CategoryId::from_raw(u64::MAX);
        assert_eq!(
            fishbone.remove_category(ghost).unwrap_err(),
            CaseError::CategoryNotFound(ghost)
        );
    }

    #[test]
    fn fill_next_cause_reuses_trailing_blank() {
        let (mut fishbone, id) = with_causes(&["a", ""]);
        assert_eq!(fishbone.fill_next_cause(id, "b").unwrap(), 1);
        assert_eq!(fishbone.fill_next_cause(id, "c").unwrap(), 2);
        assert_eq!(fishbone.get(id).unwrap().causes, vec!["a", "b", "c"]);
    }

    #[test]
    fn filled_causes_skip_blanks() {
        let (fishbone, id) = with_causes(&["", "a", "  ", "b"]);
        let filled: Vec<_> = fishbone.get(id).unwrap().filled_causes().collect();
        assert_eq!(filled, vec!["a", "b"]);
    }
}
