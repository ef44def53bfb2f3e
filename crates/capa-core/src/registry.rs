//! Root-cause derivation.
//!
//! Pure functions over the current analyses. Nothing here is cached; every
//! call walks the live collections again, so the output can never go stale.

use serde::Serialize;
use std::fmt;

use crate::model::{ActionId, ActionPlan, FishboneAnalysis, FiveWhyAnalysis};
use crate::text::{is_blank, non_blank};

/// Category label used when a cause's category has no usable name.
pub const UNCATEGORIZED: &str = "Tanpa Kategori";

/// One Fishbone cause offered as the root of a Five-Why chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootCauseOption {
    pub text: String,
    pub category: String,
}

impl RootCauseOption {
    /// Selection-list rendering, `[<category>] <text>`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("[{}] {}", self.category, self.text)
    }
}

/// Flatten the Fishbone into one option per non-blank cause, categories then
/// causes in insertion order. Categories whose causes are all blank
/// contribute nothing.
#[must_use]
pub fn fishbone_root_cause_options(fishbone: &FishboneAnalysis) -> Vec<RootCauseOption> {
    fishbone
        .categories()
        .iter()
        .flat_map(|category| {
            let name = category.effective_name();
            let label = if is_blank(name) { UNCATEGORIZED } else { name };
            category.filled_causes().map(move |cause| RootCauseOption {
                text: cause.to_string(),
                category: label.to_string(),
            })
        })
        .collect()
}

/// Label for one entry of a chain: `Why #1` for the initial cause, then
/// `Why #<i+2>` for step `i`.
#[must_use]
pub fn why_label(entry_index: usize) -> String {
    format!("Why #{}", entry_index + 1)
}

/// One `[Analisis #<n>] Why #<k>: <text>` string per non-blank entry, chains
/// in order, initial cause before steps.
///
/// A blank initial cause does not suppress later steps: every non-blank entry
/// is listed on its own.
#[must_use]
pub fn identified_root_causes(five_why: &FiveWhyAnalysis) -> Vec<String> {
    let mut out = Vec::new();
    for (chain_index, chain) in five_why.chains().iter().enumerate() {
        let entries: Vec<&str> = chain.entries().collect();
        for (entry_index, text) in non_blank(&entries) {
            out.push(format!(
                "[Analisis #{}] {}: {text}",
                chain_index + 1,
                why_label(entry_index)
            ));
        }
    }
    out
}

/// Which action list a dangling reference lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionList {
    Containment,
    Preventive,
}

impl fmt::Display for ActionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Containment => "containment",
            Self::Preventive => "preventive",
        })
    }
}

/// An action item whose stored reference matches no current root cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub list: ActionList,
    pub id: ActionId,
    pub reference: String,
}

/// Action items whose non-blank reference is not among `identified`.
///
/// Informational only: the stored strings are left exactly as they are.
#[must_use]
pub fn dangling_references(plan: &ActionPlan, identified: &[String]) -> Vec<DanglingReference> {
    let known = |reference: &str| identified.iter().any(|r| r == reference);

    let containment = plan
        .containment()
        .iter()
        .map(|a| (ActionList::Containment, a.id, &a.root_cause_reference));
    let preventive = plan
        .preventive()
        .iter()
        .map(|a| (ActionList::Preventive, a.id, &a.root_cause_reference));

    containment
        .chain(preventive)
        .filter(|(_, _, reference)| !is_blank(reference) && !known(reference))
        .map(|(list, id, reference)| DanglingReference {
            list,
            id,
            reference: reference.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryUpdate, ContainmentUpdate, taxonomy::CUSTOM_CATEGORY};

    #[test]
    fn machine_scenario_yields_one_option() {
        let mut fishbone = FishboneAnalysis::default();
        let id = fishbone.add_category();
        fishbone
            .update_category(
                id,
                CategoryUpdate::Name("Mesin (Machine) → kondisi mesin".into()),
            )
            .unwrap();
        fishbone.edit_cause(id, 0, "Sensor rusak").unwrap();
        fishbone.add_cause(id).unwrap();

        assert_eq!(
            fishbone_root_cause_options(&fishbone),
            vec![RootCauseOption {
                text: "Sensor rusak".into(),
                category: "Mesin (Machine)".into(),
            }]
        );
    }

    #[test]
    fn blank_only_category_contributes_nothing_but_stays() {
        let mut fishbone = FishboneAnalysis::default();
        fishbone.add_category();
        assert!(fishbone_root_cause_options(&fishbone).is_empty());
        assert_eq!(fishbone.categories().len(), 1);
    }

    #[test]
    fn unnamed_custom_category_falls_back() {
        let mut fishbone = FishboneAnalysis::default();
        let id = fishbone.add_category();
        fishbone
            .update_category(id, CategoryUpdate::Name(CUSTOM_CATEGORY.into()))
            .unwrap();
        fishbone.edit_cause(id, 0, "Palet basah").unwrap();
        let options = fishbone_root_cause_options(&fishbone);
        assert_eq!(options[0].category, UNCATEGORIZED);
        assert_eq!(options[0].display(), "[Tanpa Kategori] Palet basah");
    }

    #[test]
    fn sensor_scenario_labels_entries() {
        let mut five_why = FiveWhyAnalysis::default();
        let id = five_why.add_chain();
        five_why.set_initial_cause(id, "Sensor rusak").unwrap();
        five_why.edit_why(id, 0, "Tidak ada jadwal kalibrasi").unwrap();

        assert_eq!(
            identified_root_causes(&five_why),
            vec![
                "[Analisis #1] Why #1: Sensor rusak",
                "[Analisis #1] Why #2: Tidak ada jadwal kalibrasi",
            ]
        );
    }

    #[test]
    fn blank_initial_cause_keeps_later_steps() {
        let mut five_why = FiveWhyAnalysis::default();
        five_why.add_chain();
        let id = five_why.add_chain();
        five_why.add_why(id).unwrap();
        five_why.add_why(id).unwrap();
        five_why.edit_why(id, 1, "orphan").unwrap();

        assert_eq!(
            identified_root_causes(&five_why),
            vec!["[Analisis #2] Why #3: orphan"]
        );
    }

    #[test]
    fn dangling_lists_only_unmatched_non_blank_references() {
        let mut plan = ActionPlan::default();
        let matched = plan.add_containment();
        let gone = plan.add_containment();
        plan.add_preventive();
        let identified = vec!["[Analisis #1] Why #1: Sensor rusak".to_string()];
        plan.update_containment(
            matched,
            ContainmentUpdate::RootCauseReference(identified[0].clone()),
        )
        .unwrap();
        plan.update_containment(
            gone,
            ContainmentUpdate::RootCauseReference("[Analisis #2] Why #1: hilang".into()),
        )
        .unwrap();

        let dangling = dangling_references(&plan, &identified);
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].id, gone);
        assert_eq!(dangling[0].list, ActionList::Containment);
        assert_eq!(dangling[0].reference, "[Analisis #2] Why #1: hilang");
    }
}
