//! Tabular export: the report flattened into named sheets.

use serde::Serialize;
use tracing::info;

use super::{RcaSection, ReportData, containment_row, preventive_row, rca_outline};
use crate::registry::why_label;
use crate::session::RcaMethod;

pub const CASE_DETAILS_SHEET: &str = "Detail Kasus";
pub const RCA_SHEET: &str = "Analisis Akar Masalah";
pub const CONTAINMENT_SHEET: &str = "Koreksi";
pub const PREVENTIVE_SHEET: &str = "Tindakan Korektif";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    fn new(name: &str, header: &[&str], rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            header: header.iter().map(|h| (*h).to_string()).collect(),
            rows,
        }
    }
}

/// Ordered sheets of one export request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workbook {
    pub name: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Flattens a [`ReportData`] snapshot into a [`Workbook`].
///
/// Case details are always exported. The root-cause sheet follows the active
/// method with the same filtering as the document; it and the two action
/// sheets are left out when they would have no rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularExporter;

impl TabularExporter {
    #[must_use]
    pub fn export(data: &ReportData, name: &str) -> Workbook {
        let mut sheets = vec![Self::case_details(data)];
        sheets.extend(Self::root_causes(data));

        if !data.containment_actions.is_empty() {
            let rows = data
                .containment_actions
                .iter()
                .map(|a| containment_row(a).to_vec())
                .collect();
            sheets.push(Sheet::new(
                CONTAINMENT_SHEET,
                &[
                    "Referensi Akar Masalah",
                    "Tindakan",
                    "PIC",
                    "Target Penyelesaian",
                    "Status",
                ],
                rows,
            ));
        }

        if !data.preventive_actions.is_empty() {
            let rows = data
                .preventive_actions
                .iter()
                .map(|a| preventive_row(a).to_vec())
                .collect();
            sheets.push(Sheet::new(
                PREVENTIVE_SHEET,
                &[
                    "Referensi Akar Masalah",
                    "Tindakan",
                    "PIC",
                    "Reviewer",
                    "Target Penyelesaian",
                    "Prioritas",
                    "Rating Risiko",
                ],
                rows,
            ));
        }

        info!(name, sheets = sheets.len(), "workbook exported");
        Workbook {
            name: name.to_string(),
            sheets,
        }
    }

    fn case_details(data: &ReportData) -> Sheet {
        let details = &data.case_details;
        let mut rows: Vec<Vec<String>> = details
            .labeled_fields()
            .into_iter()
            .map(|(label, value)| vec![label.to_string(), value])
            .collect();
        rows.push(vec![
            "Deskripsi Masalah".to_string(),
            details.description.clone(),
        ]);
        Sheet::new(CASE_DETAILS_SHEET, &["Field", "Value"], rows)
    }

    fn root_causes(data: &ReportData) -> Option<Sheet> {
        let outline = rca_outline(data);
        if outline.is_empty() {
            return None;
        }

        let mut rows = Vec::new();
        for section in outline {
            match section {
                RcaSection::Category { name, causes } => {
                    rows.extend(causes.into_iter().map(|cause| vec![name.clone(), cause]));
                }
                RcaSection::Chain { number, entries } => {
                    for (index, text) in entries {
                        let step = if index == 0 {
                            format!("{} (Initial Cause)", why_label(0))
                        } else {
                            why_label(index)
                        };
                        rows.push(vec![format!("Analisis #{number}"), step, text]);
                    }
                }
            }
        }

        let header: &[&str] = match data.active_method {
            RcaMethod::Fishbone => &["Kategori", "Potensi Penyebab"],
            RcaMethod::FiveWhy => &["Analisis", "Langkah", "Deskripsi"],
        };
        Some(Sheet::new(RCA_SHEET, header, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CaseSession;
    use crate::model::ContainmentUpdate;
    use chrono::NaiveDate;

    fn session() -> CaseSession {
        CaseSession::new(NaiveDate::from_ymd_opt(2025, 8, 14).unwrap())
    }

    fn names(book: &Workbook) -> Vec<&str> {
        book.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn empty_case_exports_only_details() {
        let book = TabularExporter::export(&session().snapshot(), "laporan-kasus-baru");
        assert_eq!(names(&book), vec![CASE_DETAILS_SHEET]);
        let details = &book.sheets[0];
        assert_eq!(details.header, vec!["Field", "Value"]);
        assert_eq!(details.rows.len(), 8);
        assert_eq!(details.rows[7][0], "Deskripsi Masalah");
    }

    #[test]
    fn containment_sheet_has_one_row_per_action() {
        let mut s = session();
        assert!(
            TabularExporter::export(&s.snapshot(), "x")
                .sheet(CONTAINMENT_SHEET)
                .is_none()
        );

        for text in ["Karantina lot", "Sortir 100%"] {
            let id = s.plan_mut().add_containment();
            s.plan_mut()
                .update_containment(id, ContainmentUpdate::Action(text.into()))
                .unwrap();
        }
        let book = TabularExporter::export(&s.snapshot(), "x");
        let sheet = book.sheet(CONTAINMENT_SHEET).unwrap();
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[1][1], "Sortir 100%");
        assert_eq!(sheet.rows[0][4], "Belum Mulai");
        assert!(book.sheet(PREVENTIVE_SHEET).is_none());
    }

    #[test]
    fn five_why_rows_label_steps() {
        let mut s = session();
        s.set_method(RcaMethod::FiveWhy);
        let id = s.five_why_mut().add_chain();
        s.five_why_mut().set_initial_cause(id, "Sensor rusak").unwrap();
        s.five_why_mut()
            .edit_why(id, 0, "Tidak ada jadwal kalibrasi")
            .unwrap();

        let book = TabularExporter::export(&s.snapshot(), "x");
        let rca = book.sheet(RCA_SHEET).unwrap();
        assert_eq!(rca.header, vec!["Analisis", "Langkah", "Deskripsi"]);
        assert_eq!(
            rca.rows,
            vec![
                vec!["Analisis #1", "Why #1 (Initial Cause)", "Sensor rusak"],
                vec!["Analisis #1", "Why #2", "Tidak ada jadwal kalibrasi"],
            ]
        );
    }

    #[test]
    fn fishbone_rows_pair_category_and_cause() {
        let mut s = session();
        let id = s.fishbone_mut().add_category();
        s.fishbone_mut().edit_cause(id, 0, "Operator baru").unwrap();
        s.fishbone_mut().add_cause(id).unwrap();

        let book = TabularExporter::export(&s.snapshot(), "x");
        let rca = book.sheet(RCA_SHEET).unwrap();
        assert_eq!(rca.header, vec!["Kategori", "Potensi Penyebab"]);
        assert_eq!(rca.rows, vec![vec!["Manusia (Man)", "Operator baru"]]);
    }
}
