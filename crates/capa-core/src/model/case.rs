use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::{ParseEnumError, normalize};

/// How badly the nonconformance affects the product or customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Label used in rendered reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" | "rendah" => Ok(Self::Low),
            "medium" | "sedang" => Ok(Self::Medium),
            "high" | "tinggi" => Ok(Self::High),
            "critical" | "kritis" => Ok(Self::Critical),
            _ => Err(ParseEnumError {
                expected: "severity",
                got: s.to_string(),
            }),
        }
    }
}

/// Scalar metadata of the case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseDetails {
    pub reference_number: String,
    pub date: NaiveDate,
    pub location: String,
    pub customer_design: String,
    pub sales_order_number: String,
    /// Free text: "100 pcs", "2 roll", ...
    pub quantity: String,
    pub severity: Severity,
    pub description: String,
}

impl CaseDetails {
    /// Blank details dated `date`.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            reference_number: String::new(),
            date,
            location: String::new(),
            customer_design: String::new(),
            sales_order_number: String::new(),
            quantity: String::new(),
            severity: Severity::default(),
            description: String::new(),
        }
    }

    pub fn apply(&mut self, field: CaseField) {
        match field {
            CaseField::ReferenceNumber(v) => self.reference_number = v,
            CaseField::Date(v) => self.date = v,
            CaseField::Location(v) => self.location = v,
            CaseField::CustomerDesign(v) => self.customer_design = v,
            CaseField::SalesOrderNumber(v) => self.sales_order_number = v,
            CaseField::Quantity(v) => self.quantity = v,
            CaseField::Severity(v) => self.severity = v,
            CaseField::Description(v) => self.description = v,
        }
    }

    /// Labeled scalar fields in report order, description excluded.
    #[must_use]
    pub fn labeled_fields(&self) -> [(&'static str, String); 7] {
        [
            ("No. Referensi", self.reference_number.clone()),
            ("Tanggal Kejadian", self.date.format("%Y-%m-%d").to_string()),
            ("Lokasi", self.location.clone()),
            ("Pelanggan/No. Design", self.customer_design.clone()),
            ("No. SO", self.sales_order_number.clone()),
            ("Kuantitas Terdampak", self.quantity.clone()),
            ("Tingkat Keparahan", self.severity.to_string()),
        ]
    }
}

/// One case-detail field update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseField {
    ReferenceNumber(String),
    Date(NaiveDate),
    Location(String),
    CustomerDesign(String),
    SalesOrderNumber(String),
    Quantity(String),
    Severity(Severity),
    Description(String),
}
