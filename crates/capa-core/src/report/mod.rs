//! Report assembly.
//!
//! [`assemble`] takes a deep copy of the session into a [`ReportData`]
//! snapshot. The [`layout`] renderer and the [`sheets`] exporter both read
//! only that snapshot, and both go through [`rca_outline`] so they agree on
//! which root-cause entries are reportable.

pub mod layout;
pub mod sheets;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::{
    CaseDetails, ContainmentAction, FishboneCategory, FiveWhyChain, PreventiveAction,
};
use crate::session::RcaMethod;
use crate::text::{is_blank, non_blank};

pub use layout::{Document, DocumentRenderer, DrawOp, LayoutConfig, Page};
pub use sheets::{Sheet, TabularExporter, Workbook};

/// Artifact name used when the case has no reference number.
pub const DEFAULT_FALLBACK_NAME: &str = "kasus-baru";

/// Immutable snapshot of one case, owned outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportData {
    pub case_details: CaseDetails,
    pub active_method: RcaMethod,
    pub fishbone_categories: Vec<FishboneCategory>,
    pub five_why_analyses: Vec<FiveWhyChain>,
    pub containment_actions: Vec<ContainmentAction>,
    pub preventive_actions: Vec<PreventiveAction>,
}

/// Snapshot the given collections. Later session edits never reach the result.
#[must_use]
pub fn assemble(
    case_details: &CaseDetails,
    active_method: RcaMethod,
    fishbone_categories: &[FishboneCategory],
    five_why_analyses: &[FiveWhyChain],
    containment_actions: &[ContainmentAction],
    preventive_actions: &[PreventiveAction],
) -> ReportData {
    let data = ReportData {
        case_details: case_details.clone(),
        active_method,
        fishbone_categories: fishbone_categories.to_vec(),
        five_why_analyses: five_why_analyses.to_vec(),
        containment_actions: containment_actions.to_vec(),
        preventive_actions: preventive_actions.to_vec(),
    };
    info!(
        method = %active_method,
        categories = data.fishbone_categories.len(),
        analyses = data.five_why_analyses.len(),
        containment = data.containment_actions.len(),
        preventive = data.preventive_actions.len(),
        "report assembled"
    );
    data
}

/// `laporan-<reference>`, with path-unsafe characters folded to `-`.
///
/// A blank reference falls back to `laporan-<fallback>`.
#[must_use]
pub fn artifact_name(reference: &str, fallback: &str) -> String {
    let base = if is_blank(reference) {
        fallback
    } else {
        reference.trim()
    };
    let safe: String = base
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_whitespace() => '-',
            c => c,
        })
        .collect();
    format!("laporan-{safe}")
}

/// One reportable group of the root-cause block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RcaSection {
    /// A Fishbone category with a usable name and its non-blank causes.
    Category { name: String, causes: Vec<String> },
    /// A Five-Why chain; `number` is its 1-based position in the collection
    /// and each entry keeps its original index (0 = initial cause).
    Chain {
        number: usize,
        entries: Vec<(usize, String)>,
    },
}

/// Reportable root-cause groups for the active method.
///
/// Fishbone categories need a non-blank effective name and at least one
/// non-blank cause. Five-Why chains need at least one non-blank entry.
#[must_use]
pub fn rca_outline(data: &ReportData) -> Vec<RcaSection> {
    match data.active_method {
        RcaMethod::Fishbone => data
            .fishbone_categories
            .iter()
            .filter(|c| !is_blank(c.effective_name()))
            .filter_map(|c| {
                let causes: Vec<String> = c.filled_causes().map(str::to_string).collect();
                (!causes.is_empty()).then(|| RcaSection::Category {
                    name: c.effective_name().to_string(),
                    causes,
                })
            })
            .collect(),
        RcaMethod::FiveWhy => data
            .five_why_analyses
            .iter()
            .enumerate()
            .filter_map(|(i, chain)| {
                let all: Vec<&str> = chain.entries().collect();
                let entries: Vec<(usize, String)> = non_blank(&all)
                    .map(|(k, text)| (k, text.to_string()))
                    .collect();
                (!entries.is_empty()).then_some(RcaSection::Chain {
                    number: i + 1,
                    entries,
                })
            })
            .collect(),
    }
}

fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string())
}

/// Containment row in column order: reference, action, owner, due, status.
#[must_use]
pub fn containment_row(action: &ContainmentAction) -> [String; 5] {
    [
        action.root_cause_reference.clone(),
        action.action.clone(),
        action.owner.clone(),
        date_cell(action.due_date),
        action.status.label().to_string(),
    ]
}

/// Preventive row in column order: reference, action, owner, reviewer, due,
/// priority, risk.
#[must_use]
pub fn preventive_row(action: &PreventiveAction) -> [String; 7] {
    [
        action.root_cause_reference.clone(),
        action.action.clone(),
        action.owner.clone(),
        action.reviewer.clone(),
        date_cell(action.due_date),
        action.priority.label().to_string(),
        action.risk_rating.label().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CaseSession;
    use crate::model::{CaseField, CategoryUpdate, taxonomy::CUSTOM_CATEGORY};
    use chrono::NaiveDate;

    fn session() -> CaseSession {
        CaseSession::new(NaiveDate::from_ymd_opt(2025, 8, 14).unwrap())
    }

    #[test]
    fn snapshot_is_independent_of_later_edits() {
        let mut s = session();
        let id = s.fishbone_mut().add_category();
        s.fishbone_mut().edit_cause(id, 0, "Sensor rusak").unwrap();
        let snap = s.snapshot();

        s.fishbone_mut().edit_cause(id, 0, "changed").unwrap();
        s.set_field(CaseField::ReferenceNumber("X".into()));

        assert_eq!(snap.fishbone_categories[0].causes, vec!["Sensor rusak"]);
        assert_eq!(snap.case_details.reference_number, "");
    }

    #[test]
    fn artifact_name_sanitizes_and_falls_back() {
        assert_eq!(
            artifact_name("18/TCP/VIII 2025", "kasus-baru"),
            "laporan-18-TCP-VIII-2025"
        );
        assert_eq!(artifact_name("  ", DEFAULT_FALLBACK_NAME), "laporan-kasus-baru");
        assert_eq!(artifact_name("a:b*c", "x"), "laporan-a-b-c");
    }

    #[test]
    fn outline_skips_unnamed_and_empty_categories() {
        let mut s = session();
        s.fishbone_mut().add_category();
        let unnamed = s.fishbone_mut().add_category();
        let kept = s.fishbone_mut().add_category();
        s.fishbone_mut()
            .update_category(unnamed, CategoryUpdate::Name(CUSTOM_CATEGORY.into()))
            .unwrap();
        s.fishbone_mut().edit_cause(unnamed, 0, "lost").unwrap();
        s.fishbone_mut().edit_cause(kept, 0, "Sensor rusak").unwrap();

        assert_eq!(
            rca_outline(&s.snapshot()),
            vec![RcaSection::Category {
                name: "Manusia (Man)".into(),
                causes: vec!["Sensor rusak".into()],
            }]
        );
    }

    #[test]
    fn outline_numbers_chains_by_position() {
        let mut s = session();
        s.set_method(RcaMethod::FiveWhy);
        s.five_why_mut().add_chain();
        let second = s.five_why_mut().add_chain();
        s.five_why_mut().set_initial_cause(second, "root").unwrap();
        s.five_why_mut().add_why(second).unwrap();
        s.five_why_mut().edit_why(second, 1, "deeper").unwrap();

        assert_eq!(
            rca_outline(&s.snapshot()),
            vec![RcaSection::Chain {
                number: 2,
                entries: vec![(0, "root".into()), (2, "deeper".into())],
            }]
        );
    }

    #[test]
    fn rows_use_report_labels() {
        let mut s = session();
        let id = s.plan_mut().add_preventive();
        let row = preventive_row(s.plan().find_preventive(id).unwrap());
        assert_eq!(row[4], "");
        assert_eq!(row[5], "Sedang");
        assert_eq!(row[6], "Sedang");
    }
}
