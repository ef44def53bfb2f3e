//! Case files.
//!
//! A case file describes one case in TOML (or JSON, picked by extension). It
//! is input only: [`CaseInput::replay`] feeds it through the session's
//! command surface exactly as a form would, so every structural rule of the
//! model applies to file input too.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::CaseError;
use crate::model::{
    ActionStatus, CaseField, CategoryUpdate, ContainmentUpdate, Level, PreventiveUpdate, Severity,
};
use crate::session::{CaseCommand, CaseSession, RcaMethod};

/// Template written by `capa init`.
pub const TEMPLATE: &str = r#"# Corrective-action case file.
# Enum fields accept canonical names (in-progress, high) or report labels
# (Sedang Dikerjakan, Tinggi).

method = "fishbone"          # or "five-why"

[case]
reference_number = "18/TCP/VIII/2025"
date = "2025-08-14"
location = "Bagian Printing"
customer_design = "PT Contoh / DSN-0042"
sales_order_number = "SO-2025-0815"
quantity = "500 pcs"
severity = "high"
description = "Hasil cetak buram pada sebagian lot."

[[fishbone]]
name = "Mesin (Machine) → kondisi mesin, perawatan, downtime"
causes = ["Sensor rusak", ""]

[[fishbone]]
name = "Lainnya..."
custom_name = "Gudang"
causes = ["Palet lembap"]

[[five_why]]
initial_cause = "Sensor rusak"
whys = ["Tidak ada jadwal kalibrasi"]

[[containment]]
root_cause_reference = "[Analisis #1] Why #1: Sensor rusak"
action = "Karantina lot terdampak"
owner = "QC"
due_date = "2025-08-15"
status = "in-progress"

[[preventive]]
root_cause_reference = "[Analisis #1] Why #2: Tidak ada jadwal kalibrasi"
action = "Tambahkan kalibrasi sensor ke jadwal PM bulanan"
owner = "Maintenance"
reviewer = "QA Manager"
due_date = "2025-09-01"
priority = "high"
risk_rating = "medium"
"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseInput {
    pub method: Option<String>,
    pub case: CaseDetailsInput,
    pub fishbone: Vec<CategoryInput>,
    pub five_why: Vec<ChainInput>,
    pub containment: Vec<ContainmentInput>,
    pub preventive: Vec<PreventiveInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseDetailsInput {
    pub reference_number: String,
    pub date: Option<NaiveDate>,
    pub location: String,
    pub customer_design: String,
    pub sales_order_number: String,
    pub quantity: String,
    pub severity: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub custom_name: String,
    pub causes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainInput {
    pub initial_cause: String,
    pub whys: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentInput {
    pub root_cause_reference: String,
    pub action: String,
    pub owner: String,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreventiveInput {
    pub root_cause_reference: String,
    pub action: String,
    pub owner: String,
    pub reviewer: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<String>,
    pub risk_rating: Option<String>,
}

impl CaseInput {
    /// Load a case file; `.json` files are read as JSON, everything else as
    /// TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
        }
    }

    /// Build a fresh session from this input. `today` dates the case when
    /// the file gives no date.
    pub fn build_session(&self, today: NaiveDate) -> Result<CaseSession, CaseError> {
        let mut session = CaseSession::new(today);
        self.replay(&mut session)?;
        Ok(session)
    }

    /// Replay the file into `session` through its command surface.
    pub fn replay(&self, session: &mut CaseSession) -> Result<(), CaseError> {
        if let Some(method) = &self.method {
            session.apply(CaseCommand::SetMethod(method.parse::<RcaMethod>()?))?;
        }
        self.replay_details(session)?;

        for category in &self.fishbone {
            let id = session.fishbone_mut().add_category();
            if let Some(name) = &category.name {
                session.apply(CaseCommand::UpdateCategory(
                    id,
                    CategoryUpdate::Name(name.clone()),
                ))?;
            }
            session.apply(CaseCommand::UpdateCategory(
                id,
                CategoryUpdate::CustomName(category.custom_name.clone()),
            ))?;
            if category.causes.is_empty() {
                session.apply(CaseCommand::RemoveCause {
                    category: id,
                    index: 0,
                })?;
            }
            for (index, cause) in category.causes.iter().enumerate() {
                if index > 0 {
                    session.apply(CaseCommand::AddCause(id))?;
                }
                session.apply(CaseCommand::EditCause {
                    category: id,
                    index,
                    text: cause.clone(),
                })?;
            }
        }

        for chain in &self.five_why {
            let id = session.five_why_mut().add_chain();
            session.apply(CaseCommand::SetInitialCause {
                chain: id,
                cause: chain.initial_cause.clone(),
            })?;
            for (index, why) in chain.whys.iter().enumerate() {
                let len = session.five_why().get(id).map_or(0, |c| c.whys.len());
                if index >= len {
                    session.apply(CaseCommand::AddWhy(id))?;
                }
                session.apply(CaseCommand::EditWhy {
                    chain: id,
                    index,
                    text: why.clone(),
                })?;
            }
        }

        for item in &self.containment {
            let id = session.plan_mut().add_containment();
            let mut updates = vec![
                ContainmentUpdate::RootCauseReference(item.root_cause_reference.clone()),
                ContainmentUpdate::Action(item.action.clone()),
                ContainmentUpdate::Owner(item.owner.clone()),
                ContainmentUpdate::DueDate(item.due_date),
            ];
            if let Some(status) = &item.status {
                updates.push(ContainmentUpdate::Status(status.parse::<ActionStatus>()?));
            }
            for update in updates {
                session.apply(CaseCommand::UpdateContainment(id, update))?;
            }
        }

        for item in &self.preventive {
            let id = session.plan_mut().add_preventive();
            let mut updates = vec![
                PreventiveUpdate::RootCauseReference(item.root_cause_reference.clone()),
                PreventiveUpdate::Action(item.action.clone()),
                PreventiveUpdate::Owner(item.owner.clone()),
                PreventiveUpdate::Reviewer(item.reviewer.clone()),
                PreventiveUpdate::DueDate(item.due_date),
            ];
            if let Some(priority) = &item.priority {
                updates.push(PreventiveUpdate::Priority(priority.parse::<Level>()?));
            }
            if let Some(risk) = &item.risk_rating {
                updates.push(PreventiveUpdate::RiskRating(risk.parse::<Level>()?));
            }
            for update in updates {
                session.apply(CaseCommand::UpdatePreventive(id, update))?;
            }
        }

        debug!(
            categories = self.fishbone.len(),
            analyses = self.five_why.len(),
            containment = self.containment.len(),
            preventive = self.preventive.len(),
            "case file replayed"
        );
        Ok(())
    }

    fn replay_details(&self, session: &mut CaseSession) -> Result<(), CaseError> {
        let case = &self.case;
        let mut fields = vec![
            CaseField::ReferenceNumber(case.reference_number.clone()),
            CaseField::Location(case.location.clone()),
            CaseField::CustomerDesign(case.customer_design.clone()),
            CaseField::SalesOrderNumber(case.sales_order_number.clone()),
            CaseField::Quantity(case.quantity.clone()),
            CaseField::Description(case.description.clone()),
        ];
        if let Some(date) = case.date {
            fields.push(CaseField::Date(date));
        }
        if let Some(severity) = &case.severity {
            fields.push(CaseField::Severity(severity.parse::<Severity>()?));
        }
        for field in fields {
            session.apply(CaseCommand::SetField(field))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()
    }

    #[test]
    fn template_replays_into_a_full_session() {
        let input: CaseInput = toml::from_str(TEMPLATE).unwrap();
        let session = input.build_session(day()).unwrap();

        assert_eq!(session.details().reference_number, "18/TCP/VIII/2025");
        assert_eq!(session.details().date, NaiveDate::from_ymd_opt(2025, 8, 14).unwrap());
        assert_eq!(session.details().severity, Severity::High);
        assert_eq!(session.method(), RcaMethod::Fishbone);

        let categories = session.fishbone().categories();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].effective_name(), "Mesin (Machine)");
        assert_eq!(categories[0].causes, vec!["Sensor rusak", ""]);
        assert_eq!(categories[1].effective_name(), "Gudang");

        assert_eq!(
            session.identified_root_causes(),
            vec![
                "[Analisis #1] Why #1: Sensor rusak",
                "[Analisis #1] Why #2: Tidak ada jadwal kalibrasi",
            ]
        );
        assert!(session.dangling_references().is_empty());
        assert_eq!(
            session.plan().containment()[0].status,
            ActionStatus::InProgress
        );
        assert_eq!(session.plan().preventive()[0].priority, Level::High);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let input: CaseInput = toml::from_str("[case]\nreference_number = \"A-1\"\n").unwrap();
        let session = input.build_session(day()).unwrap();
        assert_eq!(session.details().date, day());
        assert_eq!(session.details().severity, Severity::Medium);
        assert!(session.fishbone().categories().is_empty());
    }

    #[test]
    fn indonesian_labels_parse() {
        let input: CaseInput = toml::from_str(
            r#"
[[containment]]
status = "Sedang Dikerjakan"

[[preventive]]
priority = "Tinggi"
risk_rating = "rendah"
"#,
        )
        .unwrap();
        let session = input.build_session(day()).unwrap();
        assert_eq!(
            session.plan().containment()[0].status,
            ActionStatus::InProgress
        );
        assert_eq!(session.plan().preventive()[0].risk_rating, Level::Low);
    }

    #[test]
    fn unknown_enum_text_is_rejected() {
        let input: CaseInput = toml::from_str("[[preventive]]\npriority = \"urgent\"\n").unwrap();
        assert_eq!(
            input.build_session(day()).unwrap_err(),
            CaseError::InvalidEnum {
                expected: "level",
                got: "urgent".into(),
            }
        );
    }

    #[test]
    fn whys_without_initial_cause_are_kept() {
        let input: CaseInput = toml::from_str(
            "method = \"5why\"\n[[five_why]]\nwhys = [\"\", \"orphan\"]\n",
        )
        .unwrap();
        let session = input.build_session(day()).unwrap();
        assert_eq!(session.five_why().chains()[0].whys, vec!["", "orphan"]);
        assert_eq!(
            session.identified_root_causes(),
            vec!["[Analisis #1] Why #3: orphan"]
        );
    }

    #[test]
    fn empty_cause_list_leaves_no_rows() {
        let input: CaseInput = toml::from_str("[[fishbone]]\ncauses = []\n").unwrap();
        let session = input.build_session(day()).unwrap();
        assert!(session.fishbone().categories()[0].causes.is_empty());
    }

    #[test]
    fn load_reads_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.json");
        std::fs::write(
            &path,
            r#"{"method":"five-why","case":{"reference_number":"J-7"},"five_why":[{"initial_cause":"x"}]}"#,
        )
        .unwrap();
        let input = CaseInput::load(&path).unwrap();
        assert_eq!(input.case.reference_number, "J-7");
        assert_eq!(input.five_why.len(), 1);
    }

    #[test]
    fn load_reports_path_on_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "method = [").unwrap();
        let err = CaseInput::load(&path).unwrap_err();
        assert!(format!("{err}").contains("broken.toml"));
    }
}
