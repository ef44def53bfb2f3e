//! The live case session and its typed command surface.
//!
//! A [`CaseSession`] owns every mutable collection of one case. Input
//! collaborators drive it either through the per-collection methods or by
//! sending [`CaseCommand`]s to [`CaseSession::apply`]; both paths share the
//! same validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, info};

use crate::error::CaseError;
use crate::model::{
    ActionId, ActionPlan, CaseDetails, CaseField, CategoryId, CategoryUpdate, ChainId,
    ContainmentUpdate, FishboneAnalysis, FiveWhyAnalysis, ParseEnumError, PreventiveUpdate,
    normalize,
};
use crate::registry::{self, DanglingReference, RootCauseOption};
use crate::report::{self, ReportData};

/// Which root-cause method feeds the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RcaMethod {
    #[default]
    Fishbone,
    FiveWhy,
}

impl RcaMethod {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Fishbone => "fishbone",
            Self::FiveWhy => "five-why",
        }
    }

    /// Label used in rendered reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fishbone => "Diagram Fishbone",
            Self::FiveWhy => "5 Why",
        }
    }
}

impl fmt::Display for RcaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RcaMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fishbone" | "ishikawa" => Ok(Self::Fishbone),
            "five-why" | "5why" | "5-why" => Ok(Self::FiveWhy),
            _ => Err(ParseEnumError {
                expected: "method",
                got: s.to_string(),
            }),
        }
    }
}

/// Every mutation an input collaborator can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseCommand {
    SetField(CaseField),
    SetMethod(RcaMethod),

    AddCategory,
    RemoveCategory(CategoryId),
    UpdateCategory(CategoryId, CategoryUpdate),
    AddCause(CategoryId),
    EditCause {
        category: CategoryId,
        index: usize,
        text: String,
    },
    RemoveCause {
        category: CategoryId,
        index: usize,
    },

    AddChain,
    RemoveChain(ChainId),
    SetInitialCause {
        chain: ChainId,
        cause: String,
    },
    AddWhy(ChainId),
    EditWhy {
        chain: ChainId,
        index: usize,
        text: String,
    },
    RemoveWhy {
        chain: ChainId,
        index: usize,
    },

    AddContainment,
    UpdateContainment(ActionId, ContainmentUpdate),
    RemoveContainment(ActionId),
    AddPreventive,
    UpdatePreventive(ActionId, PreventiveUpdate),
    RemovePreventive(ActionId),
}

/// What a successfully applied command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Updated,
    AddedCategory(CategoryId),
    AddedChain(ChainId),
    AddedAction(ActionId),
    /// Index of a newly appended cause or why row.
    AddedRow(usize),
}

/// All live state of the one case being documented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSession {
    details: CaseDetails,
    method: RcaMethod,
    fishbone: FishboneAnalysis,
    five_why: FiveWhyAnalysis,
    plan: ActionPlan,
}

impl CaseSession {
    /// Fresh session for a case dated `today`.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            details: CaseDetails::new(today),
            method: RcaMethod::default(),
            fishbone: FishboneAnalysis::default(),
            five_why: FiveWhyAnalysis::default(),
            plan: ActionPlan::default(),
        }
    }

    /// Start the next case: replace every collection with fresh defaults and
    /// hand back the finished session by value.
    pub fn next_case(&mut self, today: NaiveDate) -> Self {
        info!(reference = %self.details.reference_number, "session reset for next case");
        std::mem::replace(self, Self::new(today))
    }

    #[must_use]
    pub const fn details(&self) -> &CaseDetails {
        &self.details
    }

    #[must_use]
    pub const fn method(&self) -> RcaMethod {
        self.method
    }

    #[must_use]
    pub const fn fishbone(&self) -> &FishboneAnalysis {
        &self.fishbone
    }

    pub fn fishbone_mut(&mut self) -> &mut FishboneAnalysis {
        &mut self.fishbone
    }

    #[must_use]
    pub const fn five_why(&self) -> &FiveWhyAnalysis {
        &self.five_why
    }

    pub fn five_why_mut(&mut self) -> &mut FiveWhyAnalysis {
        &mut self.five_why
    }

    #[must_use]
    pub const fn plan(&self) -> &ActionPlan {
        &self.plan
    }

    pub fn plan_mut(&mut self) -> &mut ActionPlan {
        &mut self.plan
    }

    pub fn set_field(&mut self, field: CaseField) {
        self.details.apply(field);
    }

    pub fn set_method(&mut self, method: RcaMethod) {
        debug!(%method, "rca method selected");
        self.method = method;
    }

    /// Apply one command. On error nothing changes.
    pub fn apply(&mut self, command: CaseCommand) -> Result<CommandOutcome, CaseError> {
        use CaseCommand as C;
        use CommandOutcome as O;

        let outcome = match command {
            C::SetField(field) => {
                self.set_field(field);
                O::Updated
            }
            C::SetMethod(method) => {
                self.set_method(method);
                O::Updated
            }
            C::AddCategory => O::AddedCategory(self.fishbone.add_category()),
            C::RemoveCategory(id) => {
                self.fishbone.remove_category(id)?;
                O::Updated
            }
            C::UpdateCategory(id, update) => {
                self.fishbone.update_category(id, update)?;
                O::Updated
            }
            C::AddCause(id) => O::AddedRow(self.fishbone.add_cause(id)?),
            C::EditCause {
                category,
                index,
                text,
            } => {
                self.fishbone.edit_cause(category, index, text)?;
                O::Updated
            }
            C::RemoveCause { category, index } => {
                self.fishbone.remove_cause(category, index)?;
                O::Updated
            }
            C::AddChain => O::AddedChain(self.five_why.add_chain()),
            C::RemoveChain(id) => {
                self.five_why.remove_chain(id)?;
                O::Updated
            }
            C::SetInitialCause { chain, cause } => {
                self.five_why.set_initial_cause(chain, cause)?;
                O::Updated
            }
            C::AddWhy(id) => O::AddedRow(self.five_why.add_why(id)?),
            C::EditWhy { chain, index, text } => {
                self.five_why.edit_why(chain, index, text)?;
                O::Updated
            }
            C::RemoveWhy { chain, index } => {
                self.five_why.remove_why(chain, index)?;
                O::Updated
            }
            C::AddContainment => O::AddedAction(self.plan.add_containment()),
            C::UpdateContainment(id, update) => {
                self.plan.update_containment(id, update)?;
                O::Updated
            }
            C::RemoveContainment(id) => {
                self.plan.remove_containment(id)?;
                O::Updated
            }
            C::AddPreventive => O::AddedAction(self.plan.add_preventive()),
            C::UpdatePreventive(id, update) => {
                self.plan.update_preventive(id, update)?;
                O::Updated
            }
            C::RemovePreventive(id) => {
                self.plan.remove_preventive(id)?;
                O::Updated
            }
        };
        Ok(outcome)
    }

    /// Candidate Five-Why roots from the current Fishbone state.
    #[must_use]
    pub fn fishbone_root_cause_options(&self) -> Vec<RootCauseOption> {
        registry::fishbone_root_cause_options(&self.fishbone)
    }

    /// Root-cause references selectable by action items.
    #[must_use]
    pub fn identified_root_causes(&self) -> Vec<String> {
        registry::identified_root_causes(&self.five_why)
    }

    /// Action items whose stored reference no longer matches any option.
    #[must_use]
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        registry::dangling_references(&self.plan, &self.identified_root_causes())
    }

    /// Immutable snapshot for the renderers.
    #[must_use]
    pub fn snapshot(&self) -> ReportData {
        report::assemble(
            &self.details,
            self.method,
            self.fishbone.categories(),
            self.five_why.chains(),
            self.plan.containment(),
            self.plan.preventive(),
        )
    }
}
