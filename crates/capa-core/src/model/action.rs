//! Action plan: containment actions and corrective/preventive actions.
//!
//! `root_cause_reference` is stored as free text. Option lists offer the
//! current identified root causes, but nothing here checks the stored value
//! against them; a reference whose source row disappears simply dangles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::debug;

use super::{ActionId, ParseEnumError, normalize};
use crate::error::CaseError;

/// Progress of a containment action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
    Cancelled,
}

impl ActionStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    /// Label used in rendered reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Belum Mulai",
            Self::InProgress => "Sedang Dikerjakan",
            Self::Done => "Selesai",
            Self::Cancelled => "Dibatalkan",
        }
    }
}

/// Priority and risk rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

impl Level {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Label used in rendered reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Rendah",
            Self::Medium => "Sedang",
            Self::High => "Tinggi",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "not-started" | "belum-mulai" => Ok(Self::NotStarted),
            "in-progress" | "sedang-dikerjakan" => Ok(Self::InProgress),
            "done" | "selesai" => Ok(Self::Done),
            "cancelled" | "canceled" | "dibatalkan" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for Level {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" | "rendah" => Ok(Self::Low),
            "medium" | "sedang" => Ok(Self::Medium),
            "high" | "tinggi" => Ok(Self::High),
            _ => Err(ParseEnumError {
                expected: "level",
                got: s.to_string(),
            }),
        }
    }
}

/// Immediate action limiting the impact of the nonconformance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainmentAction {
    pub id: ActionId,
    pub root_cause_reference: String,
    pub action: String,
    pub owner: String,
    pub due_date: Option<NaiveDate>,
    pub status: ActionStatus,
}

/// Corrective/preventive (CAPA) action eliminating a root cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreventiveAction {
    pub id: ActionId,
    pub root_cause_reference: String,
    pub action: String,
    pub owner: String,
    pub reviewer: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Level,
    pub risk_rating: Level,
}

/// One containment field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainmentUpdate {
    RootCauseReference(String),
    Action(String),
    Owner(String),
    DueDate(Option<NaiveDate>),
    Status(ActionStatus),
}

/// One preventive-action field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreventiveUpdate {
    RootCauseReference(String),
    Action(String),
    Owner(String),
    Reviewer(String),
    DueDate(Option<NaiveDate>),
    Priority(Level),
    RiskRating(Level),
}

/// Both action lists of a case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    containment: Vec<ContainmentAction>,
    preventive: Vec<PreventiveAction>,
}

impl ActionPlan {
    #[must_use]
    pub fn containment(&self) -> &[ContainmentAction] {
        &self.containment
    }

    #[must_use]
    pub fn preventive(&self) -> &[PreventiveAction] {
        &self.preventive
    }

    pub fn add_containment(&mut self) -> ActionId {
        let id = ActionId::next();
        self.containment.push(ContainmentAction {
            id,
            root_cause_reference: String::new(),
            action: String::new(),
            owner: String::new(),
            due_date: None,
            status: ActionStatus::default(),
        });
        debug!(%id, "containment action added");
        id
    }

    pub fn add_preventive(&mut self) -> ActionId {
        let id = ActionId::next();
        self.preventive.push(PreventiveAction {
            id,
            root_cause_reference: String::new(),
            action: String::new(),
            owner: String::new(),
            reviewer: String::new(),
            due_date: None,
            priority: Level::default(),
            risk_rating: Level::default(),
        });
        debug!(%id, "preventive action added");
        id
    }

    pub fn update_containment(
        &mut self,
        id: ActionId,
        update: ContainmentUpdate,
    ) -> Result<(), CaseError> {
        let item = self
            .containment
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(CaseError::ActionNotFound(id))?;
        match update {
            ContainmentUpdate::RootCauseReference(v) => item.root_cause_reference = v,
            ContainmentUpdate::Action(v) => item.action = v,
            ContainmentUpdate::Owner(v) => item.owner = v,
            ContainmentUpdate::DueDate(v) => item.due_date = v,
            ContainmentUpdate::Status(v) => item.status = v,
        }
        Ok(())
    }

    pub fn update_preventive(
        &mut self,
        id: ActionId,
        update: PreventiveUpdate,
    ) -> Result<(), CaseError> {
        let item = self
            .preventive
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(CaseError::ActionNotFound(id))?;
        match update {
            PreventiveUpdate::RootCauseReference(v) => item.root_cause_reference = v,
            PreventiveUpdate::Action(v) => item.action = v,
            PreventiveUpdate::Owner(v) => item.owner = v,
            PreventiveUpdate::Reviewer(v) => item.reviewer = v,
            PreventiveUpdate::DueDate(v) => item.due_date = v,
            PreventiveUpdate::Priority(v) => item.priority = v,
            PreventiveUpdate::RiskRating(v) => item.risk_rating = v,
        }
        Ok(())
    }

    pub fn remove_containment(&mut self, id: ActionId) -> Result<ContainmentAction, CaseError> {
        let pos = self
            .containment
            .iter()
            .position(|a| a.id == id)
            .ok_or(CaseError::ActionNotFound(id))?;
        Ok(self.containment.remove(pos))
    }

    pub fn remove_preventive(&mut self, id: ActionId) -> Result<PreventiveAction, CaseError> {
        let pos = self
            .preventive
            .iter()
            .position(|a| a.id == id)
            .ok_or(CaseError::ActionNotFound(id))?;
        Ok(self.preventive.remove(pos))
    }

    #[must_use]
    pub fn find_containment(&self, id: ActionId) -> Option<&ContainmentAction> {
        self.containment.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn find_preventive(&self, id: ActionId) -> Option<&PreventiveAction> {
        self.preventive.iter().find(|a| a.id == id)
    }
}
