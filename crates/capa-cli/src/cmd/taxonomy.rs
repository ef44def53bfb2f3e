//! `capa taxonomy`: list the Fishbone category groups.

use crate::output::{OutputMode, pretty_section, render_mode};
use anyhow::Result;
use capa_core::model::taxonomy::{CATEGORY_GROUPS, CUSTOM_CATEGORY, annotation, display_label};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct Entry {
    descriptor: &'static str,
    label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotation: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct Group {
    name: &'static str,
    sub_categories: Vec<Entry>,
}

#[derive(Debug, Serialize)]
struct TaxonomyReport {
    groups: Vec<Group>,
    custom_category: &'static str,
}

fn report() -> TaxonomyReport {
    let groups = CATEGORY_GROUPS
        .iter()
        .map(|group| Group {
            name: group.name,
            sub_categories: group
                .sub_categories
                .iter()
                .copied()
                .map(|descriptor| Entry {
                    descriptor,
                    label: display_label(descriptor),
                    annotation: annotation(descriptor),
                })
                .collect(),
        })
        .collect();
    TaxonomyReport {
        groups,
        custom_category: CUSTOM_CATEGORY,
    }
}

/// Execute `capa taxonomy`.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_taxonomy(output: OutputMode) -> Result<()> {
    render_mode(
        output,
        &report(),
        |r, w| {
            for group in &r.groups {
                for entry in &group.sub_categories {
                    writeln!(w, "{}\t{}", group.name, entry.descriptor)?;
                }
            }
            Ok(())
        },
        |r, w| {
            for group in &r.groups {
                pretty_section(w, group.name)?;
                for entry in &group.sub_categories {
                    match entry.annotation {
                        Some(note) => writeln!(w, "  {:<40} {note}", entry.label)?,
                        None => writeln!(w, "  {}", entry.label)?,
                    }
                }
                writeln!(w)?;
            }
            writeln!(w, "Custom category: {}", r.custom_category)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_splits_labels_from_annotations() {
        let report = report();
        assert_eq!(report.groups.len(), 10);
        let first = &report.groups[0].sub_categories[1];
        assert_eq!(first.label, "Mesin (Machine)");
        assert_eq!(
            first.annotation,
            Some("kondisi mesin, perawatan, downtime")
        );
    }
}
