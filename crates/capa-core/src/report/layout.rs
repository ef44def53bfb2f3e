//! Paginated document layout.
//!
//! [`DocumentRenderer`] walks a [`ReportData`] snapshot top to bottom with a
//! single cursor `(page, y)` and emits positioned [`DrawOp`]s. Every block's
//! height is computed before it is drawn; a block that would cross the bottom
//! margin moves to a fresh page. Table rows are never split and a table
//! header always shares its page with at least one body row.
//!
//! Units are millimetres on an A4 page unless configured otherwise. Output is
//! a pure function of the snapshot and the config, so two renders of the same
//! snapshot are identical.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::info;

use super::{RcaSection, ReportData, containment_row, preventive_row, rca_outline};
use crate::registry::why_label;
use crate::text::{is_blank, wrap};

/// Page geometry and text metrics. Wrap widths are in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub line_height: f32,
    pub description_wrap: usize,
    pub cause_wrap: usize,
    pub why_wrap: usize,
    /// Average glyph width used to derive a cell's wrap width.
    pub cell_char_width: f32,
    pub cell_padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_top: 20.0,
            margin_bottom: 20.0,
            margin_left: 14.0,
            line_height: 5.0,
            description_wrap: 95,
            cause_wrap: 90,
            why_wrap: 80,
            cell_char_width: 2.0,
            cell_padding: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextStyle {
    Title,
    Heading,
    Subheading,
    Bold,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Align {
    Left,
    Center,
}

/// One positioned draw instruction for an external drawing backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
        align: Align,
    },
    Cell {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        lines: Vec<String>,
        header: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

/// A rendered report: ordered pages of ordered draw instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Page>,
}

impl Document {
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        self.pages.iter().map(|p| p.ops.len()).sum()
    }

    /// BLAKE3 fingerprint of the page sequence, hex encoded.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for page in &self.pages {
            hasher.update(&(page.number as u64).to_le_bytes());
            for op in &page.ops {
                match op {
                    DrawOp::Text {
                        x,
                        y,
                        text,
                        style,
                        align,
                    } => {
                        hasher.update(b"T");
                        hasher.update(&x.to_bits().to_le_bytes());
                        hasher.update(&y.to_bits().to_le_bytes());
                        hasher.update(&[*style as u8, *align as u8]);
                        hash_str(&mut hasher, text);
                    }
                    DrawOp::Cell {
                        x,
                        y,
                        width,
                        height,
                        lines,
                        header,
                    } => {
                        hasher.update(b"C");
                        for v in [x, y, width, height] {
                            hasher.update(&v.to_bits().to_le_bytes());
                        }
                        hasher.update(&[u8::from(*header)]);
                        hasher.update(&(lines.len() as u64).to_le_bytes());
                        for line in lines {
                            hash_str(&mut hasher, line);
                        }
                    }
                }
            }
        }
        hasher.finalize().to_hex().to_string()
    }

    /// Plain-text dump of every page, one instruction per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            let _ = writeln!(out, "=== {} · page {} ===", self.name, page.number);
            for op in &page.ops {
                match op {
                    DrawOp::Text { y, text, .. } => {
                        let _ = writeln!(out, "{y:6.1}  {text}");
                    }
                    DrawOp::Cell { y, lines, header, .. } => {
                        let marker = if *header { '#' } else { '|' };
                        let _ = writeln!(out, "{y:6.1}  {marker} {}", lines.join(" "));
                    }
                }
            }
        }
        out
    }
}

fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

const TITLE: &str = "Laporan Corrective Action";
const TITLE_GAP: f32 = 15.0;
const HEADING_GAP: f32 = 8.0;
const SUBHEADING_GAP: f32 = 7.0;
const DETAIL_ROW: f32 = 7.0;
const DETAIL_VALUE_OFFSET: f32 = 45.0;
const DETAIL_SECOND_COLUMN: f32 = 110.0;
const BLOCK_GAP: f32 = 5.0;
const CATEGORY_HEADER: f32 = 5.0;
const CATEGORY_GAP: f32 = 3.0;
const CHAIN_HEADER: f32 = 6.0;
const WHY_GAP: f32 = 2.0;
const CHAIN_GAP: f32 = 4.0;
const TABLE_GAP: f32 = 10.0;

struct TableSpec {
    caption: &'static str,
    columns: &'static [&'static str],
    widths: &'static [f32],
}

const CONTAINMENT_TABLE: TableSpec = TableSpec {
    caption: "Koreksi",
    columns: &["Referensi Akar Masalah", "Tindakan", "PIC", "Target", "Status"],
    widths: &[50.0, 62.0, 25.0, 22.0, 23.0],
};

const PREVENTIVE_TABLE: TableSpec = TableSpec {
    caption: "Tindakan Korektif",
    columns: &[
        "Referensi Akar Masalah",
        "Tindakan",
        "PIC",
        "Reviewer",
        "Target",
        "Prioritas",
        "Risiko",
    ],
    widths: &[40.0, 50.0, 18.0, 20.0, 20.0, 17.0, 17.0],
};

/// Lays a [`ReportData`] snapshot out into pages.
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    config: LayoutConfig,
}

impl DocumentRenderer {
    #[must_use]
    pub const fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Render `data` into a document called `name`.
    #[must_use]
    pub fn render(&self, data: &ReportData, name: &str) -> Document {
        let mut cursor = Cursor::new(&self.config);

        self.title(&mut cursor);
        self.case_details(&mut cursor, data);
        self.root_causes(&mut cursor, data);
        self.action_plan(&mut cursor, data);

        let document = Document {
            name: name.to_string(),
            page_width: self.config.page_width,
            page_height: self.config.page_height,
            pages: cursor.pages,
        };
        info!(
            name,
            pages = document.pages.len(),
            instructions = document.instruction_count(),
            "document rendered"
        );
        document
    }

    fn title(&self, cursor: &mut Cursor<'_>) {
        cursor.push_text(
            self.config.page_width / 2.0,
            TITLE,
            TextStyle::Title,
            Align::Center,
        );
        cursor.advance(TITLE_GAP);
    }

    fn case_details(&self, cursor: &mut Cursor<'_>, data: &ReportData) {
        let left = self.config.margin_left;
        let fields = data.case_details.labeled_fields();
        let rows = count(fields.len().div_ceil(2));

        cursor.ensure(HEADING_GAP + rows * DETAIL_ROW);
        cursor.heading(left, "1. Detail Kasus", TextStyle::Heading, HEADING_GAP);

        for pair in fields.chunks(2) {
            for (column, (label, value)) in pair.iter().enumerate() {
                let x = if column == 0 { left } else { DETAIL_SECOND_COLUMN };
                let value = if is_blank(value) { "-" } else { value.as_str() };
                cursor.push_text(x, &format!("{label}:"), TextStyle::Bold, Align::Left);
                cursor.push_text(
                    x + DETAIL_VALUE_OFFSET,
                    value,
                    TextStyle::Normal,
                    Align::Left,
                );
            }
            cursor.advance(DETAIL_ROW);
        }
        cursor.advance(BLOCK_GAP);

        let description = &data.case_details.description;
        let lines = if is_blank(description) {
            vec!["-".to_string()]
        } else {
            wrap(description, self.config.description_wrap)
        };
        let lh = self.config.line_height;
        let body = cursor.lines_height(lines.len());
        cursor.keep_together(lh + body + 2.0 * BLOCK_GAP, lh * 2.0);
        cursor.heading(left, "Deskripsi Masalah:", TextStyle::Bold, lh);
        cursor.lines(left, &lines, TextStyle::Normal);
        cursor.advance(2.0 * BLOCK_GAP);
    }

    fn root_causes(&self, cursor: &mut Cursor<'_>, data: &ReportData) {
        let left = self.config.margin_left;
        let lh = self.config.line_height;
        let outline = rca_outline(data);
        let blocks: Vec<RcaBlock> = outline.iter().map(|s| self.rca_block(s)).collect();

        let lead = blocks.first().map_or(0.0, |b| b.head);
        cursor.ensure(HEADING_GAP + SUBHEADING_GAP + lead);
        cursor.heading(
            left,
            "2. Analisis Akar Masalah",
            TextStyle::Heading,
            HEADING_GAP,
        );
        let method = format!("Metode: {}", data.active_method.label());
        cursor.heading(left, &method, TextStyle::Subheading, SUBHEADING_GAP);

        for block in &blocks {
            cursor.keep_together(block.whole, block.head);
            cursor.heading(block.x, &block.header, TextStyle::Bold, block.header_gap);
            for item in &block.items {
                cursor.keep_together(item.height, lh);
                if let Some(label) = &item.label {
                    cursor.push_text(block.x + 2.0, label, TextStyle::Bold, Align::Left);
                }
                cursor.lines(item.x, &item.lines, TextStyle::Normal);
                cursor.advance(item.gap);
            }
            cursor.advance(block.gap);
        }
        cursor.advance(BLOCK_GAP);
    }

    fn rca_block(&self, section: &RcaSection) -> RcaBlock {
        let left = self.config.margin_left;
        let lh = self.config.line_height;
        match section {
            RcaSection::Category { name, causes } => {
                let items: Vec<RcaItem> = causes
                    .iter()
                    .map(|cause| {
                        let lines = wrap(&format!("- {cause}"), self.config.cause_wrap);
                        RcaItem {
                            label: None,
                            x: left + 6.0,
                            height: lh * count(lines.len()),
                            lines,
                            gap: 0.0,
                        }
                    })
                    .collect();
                RcaBlock::new(left + 2.0, name.clone(), CATEGORY_HEADER, CATEGORY_GAP, items)
            }
            RcaSection::Chain { number, entries } => {
                let items: Vec<RcaItem> = entries
                    .iter()
                    .map(|(index, text)| {
                        let lines = wrap(text, self.config.why_wrap);
                        RcaItem {
                            label: Some(format!("{}:", why_label(*index))),
                            x: left + 24.0,
                            height: lh * count(lines.len()) + WHY_GAP,
                            lines,
                            gap: WHY_GAP,
                        }
                    })
                    .collect();
                RcaBlock::new(
                    left + 2.0,
                    format!("Alur Analisis #{number}"),
                    CHAIN_HEADER,
                    CHAIN_GAP,
                    items,
                )
            }
        }
    }

    fn action_plan(&self, cursor: &mut Cursor<'_>, data: &ReportData) {
        let containment: Vec<Vec<String>> = data
            .containment_actions
            .iter()
            .map(|a| containment_row(a).to_vec())
            .collect();
        let preventive: Vec<Vec<String>> = data
            .preventive_actions
            .iter()
            .map(|a| preventive_row(a).to_vec())
            .collect();

        let first_table = [(&CONTAINMENT_TABLE, &containment), (&PREVENTIVE_TABLE, &preventive)]
            .into_iter()
            .find(|(_, rows)| !rows.is_empty())
            .map_or(0.0, |(spec, rows)| self.table_head_height(spec, &rows[0]));

        cursor.ensure(HEADING_GAP + first_table);
        cursor.heading(
            self.config.margin_left,
            "3. Rencana Tindakan (Action Plan)",
            TextStyle::Heading,
            HEADING_GAP,
        );

        for (spec, rows) in [(&CONTAINMENT_TABLE, &containment), (&PREVENTIVE_TABLE, &preventive)] {
            if !rows.is_empty() {
                self.table(cursor, spec, rows);
            }
        }
    }

    fn cell_lines(&self, text: &str, width: f32) -> Vec<String> {
        let usable = (width - 2.0 * self.config.cell_padding) / self.config.cell_char_width;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let chars = usable.max(1.0).floor() as usize;
        wrap(text, chars)
    }

    fn row_cells(&self, spec: &TableSpec, values: &[String]) -> (Vec<Vec<String>>, f32) {
        let cells: Vec<Vec<String>> = values
            .iter()
            .zip(spec.widths)
            .map(|(v, w)| self.cell_lines(v, *w))
            .collect();
        let tallest = cells.iter().map(Vec::len).max().unwrap_or(1);
        let height = self.config.line_height * count(tallest) + 2.0 * self.config.cell_padding;
        (cells, height)
    }

    fn header_values(spec: &TableSpec) -> Vec<String> {
        spec.columns.iter().map(|c| (*c).to_string()).collect()
    }

    fn table_head_height(&self, spec: &TableSpec, first_row: &[String]) -> f32 {
        let (_, header) = self.row_cells(spec, &Self::header_values(spec));
        let (_, row) = self.row_cells(spec, first_row);
        SUBHEADING_GAP + header + row
    }

    fn table(&self, cursor: &mut Cursor<'_>, spec: &TableSpec, rows: &[Vec<String>]) {
        let left = self.config.margin_left;
        let header = self.row_cells(spec, &Self::header_values(spec));

        cursor.ensure(self.table_head_height(spec, &rows[0]));
        cursor.heading(left, spec.caption, TextStyle::Subheading, SUBHEADING_GAP);
        self.draw_row(cursor, spec, &header, true);

        for values in rows {
            let row = self.row_cells(spec, values);
            if cursor.would_overflow(row.1) {
                cursor.new_page();
                self.draw_row(cursor, spec, &header, true);
            }
            self.draw_row(cursor, spec, &row, false);
        }
        cursor.advance(TABLE_GAP);
    }

    fn draw_row(
        &self,
        cursor: &mut Cursor<'_>,
        spec: &TableSpec,
        (cells, height): &(Vec<Vec<String>>, f32),
        header: bool,
    ) {
        let mut x = self.config.margin_left;
        let y = cursor.y;
        for (lines, width) in cells.iter().zip(spec.widths) {
            cursor.push(DrawOp::Cell {
                x,
                y,
                width: *width,
                height: *height,
                lines: lines.clone(),
                header,
            });
            x += width;
        }
        cursor.advance(*height);
    }
}

struct RcaItem {
    label: Option<String>,
    x: f32,
    lines: Vec<String>,
    height: f32,
    gap: f32,
}

struct RcaBlock {
    x: f32,
    header: String,
    header_gap: f32,
    items: Vec<RcaItem>,
    gap: f32,
    /// Header plus first item.
    head: f32,
    whole: f32,
}

impl RcaBlock {
    fn new(x: f32, header: String, header_gap: f32, gap: f32, items: Vec<RcaItem>) -> Self {
        let head = header_gap + items.first().map_or(0.0, |i| i.height);
        let whole = header_gap + items.iter().map(|i| i.height).sum::<f32>() + gap;
        Self {
            x,
            header,
            header_gap,
            items,
            gap,
            head,
            whole,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
const fn count(n: usize) -> f32 {
    n as f32
}

struct Cursor<'a> {
    config: &'a LayoutConfig,
    pages: Vec<Page>,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(config: &'a LayoutConfig) -> Self {
        Self {
            config,
            pages: vec![Page {
                number: 1,
                ops: Vec::new(),
            }],
            y: config.margin_top,
        }
    }

    fn bottom(&self) -> f32 {
        self.config.page_height - self.config.margin_bottom
    }

    fn usable(&self) -> f32 {
        self.bottom() - self.config.margin_top
    }

    fn page_is_empty(&self) -> bool {
        self.pages.last().is_none_or(|p| p.ops.is_empty())
    }

    fn would_overflow(&self, height: f32) -> bool {
        self.y + height > self.bottom() && !self.page_is_empty()
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            ops: Vec::new(),
        });
        self.y = self.config.margin_top;
    }

    /// Break the page when `height` does not fit below the cursor.
    fn ensure(&mut self, height: f32) {
        if self.would_overflow(height) {
            self.new_page();
        }
    }

    /// Keep a block whole when it fits on one page; otherwise only keep its
    /// `head` together and let the rest flow.
    fn keep_together(&mut self, whole: f32, head: f32) {
        if whole <= self.usable() {
            self.ensure(whole);
        } else {
            self.ensure(head);
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn push_text(&mut self, x: f32, text: &str, style: TextStyle, align: Align) {
        self.push(DrawOp::Text {
            x,
            y: self.y,
            text: text.to_string(),
            style,
            align,
        });
    }

    fn heading(&mut self, x: f32, text: &str, style: TextStyle, gap: f32) {
        self.push_text(x, text, style, Align::Left);
        self.advance(gap);
    }

    fn lines_height(&self, n: usize) -> f32 {
        self.config.line_height * count(n)
    }

    /// Emit wrapped lines one per line height, breaking between lines only.
    fn lines(&mut self, x: f32, lines: &[String], style: TextStyle) {
        let lh = self.config.line_height;
        for line in lines {
            self.ensure(lh);
            self.push_text(x, line, style, Align::Left);
            self.advance(lh);
        }
    }
}
