//! Contract with an external text assistant.
//!
//! An exchange has two phases. A request is built from a point-in-time view
//! of the session ([`CaseSession::enhance_request`],
//! [`CaseSession::suggestion_request`]); the assistant's answer is then
//! applied as one field replacement ([`CaseSession::apply_assist`]). Between
//! the two phases the session may change freely. If the targeted row is gone
//! by the time the answer arrives, the answer is dropped.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AssistError, CaseError, PreconditionError};
use crate::model::{
    ActionId, CaseField, CategoryId, ChainId, ContainmentUpdate, PreventiveUpdate,
};
use crate::registry::why_label;
use crate::session::CaseSession;
use crate::text::{is_blank, non_blank};

/// Text service that rewrites or proposes field text.
pub trait TextAssistant {
    /// Rewrite `text` into cleaner report prose.
    fn enhance(&self, text: &str, context: &str) -> Result<String, AssistError>;

    /// Propose new text from `context` alone.
    fn suggest(&self, context: &str) -> Result<String, AssistError>;
}

/// The one field an assistant answer replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "field", rename_all = "kebab-case")]
pub enum FieldTarget {
    Description,
    Cause { category: CategoryId, index: usize },
    /// The trailing blank cause of a category, or a new one.
    NextCause { category: CategoryId },
    Why { chain: ChainId, index: usize },
    ContainmentAction { id: ActionId },
    PreventiveAction { id: ActionId },
}

impl FieldTarget {
    const fn kind(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Cause { .. } => "fishbone cause",
            Self::NextCause { .. } => "next fishbone cause",
            Self::Why { .. } => "why step",
            Self::ContainmentAction { .. } => "containment action",
            Self::PreventiveAction { .. } => "preventive action",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssistMode {
    Enhance { text: String },
    Suggest,
}

/// Snapshot of everything the assistant needs for one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistRequest {
    pub target: FieldTarget,
    pub mode: AssistMode,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscardReason {
    /// The assistant answered with blank text.
    EmptyResult,
    /// The targeted row was removed while the call was pending.
    TargetGone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "kebab-case")]
pub enum ApplyOutcome {
    Applied(FieldTarget),
    Discarded(DiscardReason),
}

impl CaseSession {
    /// Build an enhancement request for a non-blank field.
    pub fn enhance_request(&self, target: FieldTarget) -> Result<AssistRequest, AssistError> {
        let (text, context) = match target {
            FieldTarget::Description => (
                self.details().description.clone(),
                "Deskripsi masalah untuk laporan tindakan korektif.".to_string(),
            ),
            FieldTarget::Cause { category, index } => {
                let cat = self
                    .fishbone()
                    .get(category)
                    .ok_or(CaseError::CategoryNotFound(category))?;
                let text = cat.causes.get(index).cloned().ok_or(
                    CaseError::CauseIndexOutOfRange {
                        category,
                        index,
                        len: cat.causes.len(),
                    },
                )?;
                let context = format!(
                    "Potensi penyebab untuk kategori '{}' dalam diagram Fishbone.",
                    cat.effective_name()
                );
                (text, context)
            }
            FieldTarget::Why { chain, index } => {
                let c = self
                    .five_why()
                    .get(chain)
                    .ok_or(CaseError::ChainNotFound(chain))?;
                let text = c.whys.get(index).cloned().ok_or(CaseError::WhyIndexOutOfRange {
                    chain,
                    index,
                    len: c.whys.len(),
                })?;
                let context = format!(
                    "Jawaban untuk pertanyaan '{}' dalam analisis 5 Why.",
                    why_label(index + 1)
                );
                (text, context)
            }
            FieldTarget::ContainmentAction { id } => {
                let action = self
                    .plan()
                    .find_containment(id)
                    .ok_or(CaseError::ActionNotFound(id))?;
                (
                    action.action.clone(),
                    "Tindakan perbaikan segera (containment action).".to_string(),
                )
            }
            FieldTarget::PreventiveAction { id } => {
                let action = self
                    .plan()
                    .find_preventive(id)
                    .ok_or(CaseError::ActionNotFound(id))?;
                (
                    action.action.clone(),
                    "Tindakan korektif dan preventif (CAPA).".to_string(),
                )
            }
            FieldTarget::NextCause { .. } => {
                return Err(PreconditionError::Unsupported {
                    operation: "enhance",
                    target: target.kind(),
                }
                .into());
            }
        };

        if is_blank(&text) {
            return Err(PreconditionError::BlankText.into());
        }
        Ok(AssistRequest {
            target,
            mode: AssistMode::Enhance { text },
            context,
        })
    }

    /// Build a suggestion request, checking upstream fields first.
    ///
    /// Checks run in order: the problem description, then the category name
    /// (Fishbone), the previous answer (Five-Why), or the selected root cause
    /// (actions).
    pub fn suggestion_request(&self, target: FieldTarget) -> Result<AssistRequest, AssistError> {
        let context = match target {
            FieldTarget::NextCause { category } => {
                let description = self.require_description()?;
                let cat = self
                    .fishbone()
                    .get(category)
                    .ok_or(CaseError::CategoryNotFound(category))?;
                let name = cat.effective_name();
                if is_blank(name) {
                    return Err(PreconditionError::MissingCategoryName(category).into());
                }
                let existing: Vec<&str> = non_blank(&cat.causes).map(|(_, c)| c).collect();
                format!(
                    "Masalah: \"{description}\". Kategori Fishbone: '{name}'. \
                     Penyebab yang sudah ada: [{}]. Sarankan satu penyebab baru.",
                    existing.join(", ")
                )
            }
            FieldTarget::Why { chain, index } => {
                let description = self.require_description()?;
                let c = self
                    .five_why()
                    .get(chain)
                    .ok_or(CaseError::ChainNotFound(chain))?;
                if index >= c.whys.len() {
                    return Err(CaseError::WhyIndexOutOfRange {
                        chain,
                        index,
                        len: c.whys.len(),
                    }
                    .into());
                }
                let previous = c.predecessor(index).unwrap_or_default();
                if is_blank(previous) {
                    return Err(PreconditionError::MissingPreviousWhy {
                        chain,
                        label: why_label(index),
                    }
                    .into());
                }
                format!(
                    "Masalah: \"{description}\". Jawaban untuk \"{}\": \"{}\". \
                     Jawab pertanyaan \"{}\".",
                    why_label(index),
                    previous.trim(),
                    why_label(index + 1)
                )
            }
            FieldTarget::ContainmentAction { id } => {
                let description = self.require_description()?;
                let action = self
                    .plan()
                    .find_containment(id)
                    .ok_or(CaseError::ActionNotFound(id))?;
                let reference = selected_reference(id, &action.root_cause_reference)?;
                format!(
                    "Masalah: \"{description}\". Akar masalah: \"{reference}\". \
                     Sarankan satu tindakan koreksi segera (containment)."
                )
            }
            FieldTarget::PreventiveAction { id } => {
                let description = self.require_description()?;
                let action = self
                    .plan()
                    .find_preventive(id)
                    .ok_or(CaseError::ActionNotFound(id))?;
                let reference = selected_reference(id, &action.root_cause_reference)?;
                format!(
                    "Masalah: \"{description}\". Akar masalah: \"{reference}\". \
                     Sarankan satu tindakan korektif dan preventif (CAPA)."
                )
            }
            FieldTarget::Description | FieldTarget::Cause { .. } => {
                return Err(PreconditionError::Unsupported {
                    operation: "suggest",
                    target: target.kind(),
                }
                .into());
            }
        };

        Ok(AssistRequest {
            target,
            mode: AssistMode::Suggest,
            context,
        })
    }

    fn require_description(&self) -> Result<&str, PreconditionError> {
        let description = self.details().description.trim();
        if description.is_empty() {
            Err(PreconditionError::MissingDescription)
        } else {
            Ok(description)
        }
    }

    /// Apply an assistant answer to the request's target.
    ///
    /// The answer is trimmed. Blank answers and answers whose target no
    /// longer exists are dropped without touching the session.
    pub fn apply_assist(&mut self, request: &AssistRequest, answer: &str) -> ApplyOutcome {
        let text = answer.trim();
        if text.is_empty() {
            debug!(field = request.target.kind(), "assistant answer was blank");
            return ApplyOutcome::Discarded(DiscardReason::EmptyResult);
        }

        let applied = match request.target {
            FieldTarget::Description => {
                self.set_field(CaseField::Description(text.to_string()));
                Ok(())
            }
            FieldTarget::Cause { category, index } => {
                self.fishbone_mut().edit_cause(category, index, text)
            }
            FieldTarget::NextCause { category } => self
                .fishbone_mut()
                .fill_next_cause(category, text)
                .map(|_| ()),
            FieldTarget::Why { chain, index } => self.five_why_mut().edit_why(chain, index, text),
            FieldTarget::ContainmentAction { id } => self
                .plan_mut()
                .update_containment(id, ContainmentUpdate::Action(text.to_string())),
            FieldTarget::PreventiveAction { id } => self
                .plan_mut()
                .update_preventive(id, PreventiveUpdate::Action(text.to_string())),
        };

        match applied {
            Ok(()) => {
                debug!(field = request.target.kind(), "assistant answer applied");
                ApplyOutcome::Applied(request.target)
            }
            Err(err) => {
                warn!(error = %err, "discarding assistant answer: target no longer exists");
                ApplyOutcome::Discarded(DiscardReason::TargetGone)
            }
        }
    }
}

fn selected_reference(id: ActionId, reference: &str) -> Result<&str, PreconditionError> {
    let reference = reference.trim();
    if reference.is_empty() {
        Err(PreconditionError::MissingRootCause(id))
    } else {
        Ok(reference)
    }
}

/// Perform one full exchange: call the assistant, then apply its answer.
///
/// A failed call returns the error and leaves the session as it was.
pub fn run(
    session: &mut CaseSession,
    assistant: &dyn TextAssistant,
    request: &AssistRequest,
) -> Result<ApplyOutcome, AssistError> {
    let answer = match &request.mode {
        AssistMode::Enhance { text } => assistant.enhance(text, &request.context),
        AssistMode::Suggest => assistant.suggest(&request.context),
    };
    match answer {
        Ok(answer) => Ok(session.apply_assist(request, &answer)),
        Err(err) => {
            warn!(error = %err, field = request.target.kind(), "text assistant call failed");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    /// Returns canned answers and records every context it saw.
    struct Scripted {
        answer: Result<String, AssistError>,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn answering(text: &str) -> Self {
            Self {
                answer: Ok(text.to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                answer: Err(AssistError::Failed("quota exceeded".into())),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextAssistant for Scripted {
        fn enhance(&self, text: &str, context: &str) -> Result<String, AssistError> {
            self.seen.borrow_mut().push(format!("{context} | {text}"));
            self.answer.clone()
        }

        fn suggest(&self, context: &str) -> Result<String, AssistError> {
            self.seen.borrow_mut().push(context.to_string());
            self.answer.clone()
        }
    }

    fn session() -> CaseSession {
        CaseSession::new(NaiveDate::from_ymd_opt(2025, 8, 14).unwrap())
    }

    fn described() -> CaseSession {
        let mut s = session();
        s.set_field(CaseField::Description("Cetakan blur pada 500 pcs".into()));
        s
    }

    #[test]
    fn enhance_requires_text() {
        let s = session();
        assert_eq!(
            s.enhance_request(FieldTarget::Description).unwrap_err(),
            AssistError::Precondition(PreconditionError::BlankText)
        );
    }

    #[test]
    fn enhance_replaces_description() {
        let mut s = described();
        let request = s.enhance_request(FieldTarget::Description).unwrap();
        let assistant = Scripted::answering("  Hasil cetak buram pada 500 pcs.  ");
        let outcome = run(&mut s, &assistant, &request).unwrap();
        assert_eq!(outcome, ApplyOutcome::Applied(FieldTarget::Description));
        assert_eq!(s.details().description, "Hasil cetak buram pada 500 pcs.");
    }

    #[test]
    fn suggestion_requires_description_first() {
        let mut s = session();
        let id = s.fishbone_mut().add_category();
        assert_eq!(
            s.suggestion_request(FieldTarget::NextCause { category: id })
                .unwrap_err(),
            AssistError::Precondition(PreconditionError::MissingDescription)
        );
    }

    #[test]
    fn next_cause_fills_trailing_blank_then_appends() {
        let mut s = described();
        let id = s.fishbone_mut().add_category();
        let request = s
            .suggestion_request(FieldTarget::NextCause { category: id })
            .unwrap();
        assert!(request.context.contains("Manusia (Man)"));

        run(&mut s, &Scripted::answering("Operator kurang terlatih"), &request).unwrap();
        run(&mut s, &Scripted::answering("Shift malam"), &request).unwrap();
        assert_eq!(
            s.fishbone().get(id).unwrap().causes,
            vec!["Operator kurang terlatih", "Shift malam"]
        );
    }

    #[test]
    fn unnamed_custom_category_blocks_suggestion() {
        let mut s = described();
        let id = s.fishbone_mut().add_category();
        s.fishbone_mut()
            .update_category(
                id,
                crate::model::CategoryUpdate::Name(
                    crate::model::taxonomy::CUSTOM_CATEGORY.into(),
                ),
            )
            .unwrap();
        assert_eq!(
            s.suggestion_request(FieldTarget::NextCause { category: id })
                .unwrap_err(),
            AssistError::Precondition(PreconditionError::MissingCategoryName(id))
        );
    }

    #[test]
    fn why_suggestion_names_the_missing_predecessor() {
        let mut s = described();
        let chain = s.five_why_mut().add_chain();
        s.five_why_mut().set_initial_cause(chain, "Sensor rusak").unwrap();
        s.five_why_mut().add_why(chain).unwrap();

        let err = s
            .suggestion_request(FieldTarget::Why { chain, index: 1 })
            .unwrap_err();
        assert_eq!(
            err,
            AssistError::Precondition(PreconditionError::MissingPreviousWhy {
                chain,
                label: "Why #2".into(),
            })
        );

        let ok = s
            .suggestion_request(FieldTarget::Why { chain, index: 0 })
            .unwrap();
        assert!(ok.context.contains("Sensor rusak"));
        assert!(ok.context.contains("Why #2"));
    }

    #[test]
    fn action_suggestion_requires_reference() {
        let mut s = described();
        let id = s.plan_mut().add_containment();
        assert_eq!(
            s.suggestion_request(FieldTarget::ContainmentAction { id })
                .unwrap_err(),
            AssistError::Precondition(PreconditionError::MissingRootCause(id))
        );

        s.plan_mut()
            .update_containment(
                id,
                ContainmentUpdate::RootCauseReference("[Analisis #1] Why #1: Sensor rusak".into()),
            )
            .unwrap();
        let request = s
            .suggestion_request(FieldTarget::ContainmentAction { id })
            .unwrap();
        let assistant = Scripted::answering("Karantina seluruh lot");
        run(&mut s, &assistant, &request).unwrap();
        assert_eq!(s.plan().find_containment(id).unwrap().action, "Karantina seluruh lot");
        assert!(assistant.seen.borrow()[0].contains("Sensor rusak"));
    }

    #[test]
    fn failure_leaves_session_untouched() {
        let mut s = described();
        let before = s.clone();
        let request = s.enhance_request(FieldTarget::Description).unwrap();
        let err = run(&mut s, &Scripted::failing(), &request).unwrap_err();
        assert_eq!(err, AssistError::Failed("quota exceeded".into()));
        assert_eq!(s, before);
    }

    #[test]
    fn answer_for_removed_row_is_discarded() {
        let mut s = described();
        let id = s.plan_mut().add_preventive();
        s.plan_mut()
            .update_preventive(id, PreventiveUpdate::Action("Revisi SOP".into()))
            .unwrap();
        let request = s
            .enhance_request(FieldTarget::PreventiveAction { id })
            .unwrap();
        s.plan_mut().remove_preventive(id).unwrap();

        let before = s.clone();
        let outcome = s.apply_assist(&request, "Revisi SOP setting mesin");
        assert_eq!(outcome, ApplyOutcome::Discarded(DiscardReason::TargetGone));
        assert_eq!(s, before);
    }

    #[test]
    fn blank_answer_is_discarded() {
        let mut s = described();
        let request = s.enhance_request(FieldTarget::Description).unwrap();
        assert_eq!(
            s.apply_assist(&request, "   "),
            ApplyOutcome::Discarded(DiscardReason::EmptyResult)
        );
        assert_eq!(s.details().description, "Cetakan blur pada 500 pcs");
    }
}
