//! Shopping-list aggregation and PDF rendering.
//!
//! Takes every (ingredient, unit, amount) row across the recipes in a user's
//! cart, sums amounts per distinct (ingredient, unit) pair, and renders the
//! result as a paginated PDF report.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use std::collections::BTreeMap;
use thiserror::Error;

/// Item lines on the first page; the title takes up the top of the page.
pub const FIRST_PAGE_LINES: usize = 35;
/// Item lines on every following page.
pub const LINES_PER_PAGE: usize = 38;

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_LEFT_MM: f32 = 18.0;
const TITLE_Y_MM: f32 = PAGE_HEIGHT_MM - 20.0;
const FIRST_LINE_Y_MM: f32 = PAGE_HEIGHT_MM - 34.0;
const LINE_STEP_MM: f32 = 6.5;
const TITLE_SIZE_PT: f32 = 16.0;
const BODY_SIZE_PT: f32 = 12.0;

pub const REPORT_TITLE: &str = "Shopping list";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to render PDF: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// One consolidated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

impl CartLine {
    pub fn format(&self) -> String {
        format!(
            "\u{2022} {} ({}) \u{2013} {}",
            self.name, self.measurement_unit, self.total_amount
        )
    }
}

/// Groups raw (name, unit, amount) rows by (name, unit) and sums the
/// amounts. Output is ordered by ingredient name ascending; the same name
/// under two different units yields two lines.
pub fn aggregate(rows: impl IntoIterator<Item = (String, String, i32)>) -> Vec<CartLine> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for (name, unit, amount) in rows {
        *totals.entry((name, unit)).or_insert(0) += i64::from(amount);
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| CartLine {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}

/// Splits formatted lines into pages. The first page holds fewer lines
/// because it carries the title. An empty list still produces one
/// (title-only) page.
pub fn paginate(lines: &[CartLine]) -> Vec<Vec<String>> {
    let mut pages: Vec<Vec<String>> = vec![Vec::new()];

    for line in lines {
        let cap = if pages.len() == 1 {
            FIRST_PAGE_LINES
        } else {
            LINES_PER_PAGE
        };
        if pages
            .last()
            .map(|page| page.len() >= cap)
            .unwrap_or_default()
        {
            pages.push(Vec::new());
        }
        if let Some(page) = pages.last_mut() {
            page.push(line.format());
        }
    }

    pages
}

fn draw_page(layer: &PdfLayerReference, font: &IndirectFontRef, lines: &[String], first: bool) {
    let mut y = if first {
        layer.use_text(
            REPORT_TITLE,
            TITLE_SIZE_PT,
            Mm(MARGIN_LEFT_MM),
            Mm(TITLE_Y_MM),
            font,
        );
        FIRST_LINE_Y_MM
    } else {
        TITLE_Y_MM
    };

    for line in lines {
        layer.use_text(line.as_str(), BODY_SIZE_PT, Mm(MARGIN_LEFT_MM), Mm(y), font);
        y -= LINE_STEP_MM;
    }
}

/// Renders the consolidated list as a letter-size PDF. The whole document
/// is built in memory; callers stream the returned bytes as one response so
/// a failed render never leaks a partial document.
pub fn render_pdf(lines: &[CartLine]) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        REPORT_TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "page 1",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    for (i, page_lines) in paginate(lines).iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("page {}", i + 1),
            );
            doc.get_page(page).get_layer(layer)
        };
        draw_page(&layer, &font, page_lines, i == 0);
    }

    Ok(doc.save_to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, unit: &str, amount: i32) -> (String, String, i32) {
        (name.to_string(), unit.to_string(), amount)
    }

    #[test]
    fn sums_across_recipes_and_orders_by_name() {
        // Recipe A: Flour 200 g, Sugar 50 g; Recipe B: Flour 100 g, Eggs 2 pcs
        let lines = aggregate(vec![
            row("Flour", "g", 200),
            row("Sugar", "g", 50),
            row("Flour", "g", 100),
            row("Eggs", "pcs", 2),
        ]);

        let rendered: Vec<String> = lines.iter().map(CartLine::format).collect();
        assert_eq!(
            rendered,
            vec![
                "\u{2022} Eggs (pcs) \u{2013} 2",
                "\u{2022} Flour (g) \u{2013} 300",
                "\u{2022} Sugar (g) \u{2013} 50",
            ]
        );
    }

    #[test]
    fn one_line_per_distinct_name_unit_pair() {
        let lines = aggregate(vec![
            row("Milk", "ml", 200),
            row("Milk", "l", 1),
            row("Milk", "ml", 300),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].measurement_unit, "l");
        assert_eq!(lines[0].total_amount, 1);
        assert_eq!(lines[1].measurement_unit, "ml");
        assert_eq!(lines[1].total_amount, 500);
    }

    #[test]
    fn empty_cart_aggregates_to_nothing() {
        assert!(aggregate(vec![]).is_empty());
    }

    #[test]
    fn empty_cart_still_gets_a_title_page() {
        let pages = paginate(&[]);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn long_lists_roll_over_to_new_pages() {
        let rows: Vec<_> = (0..200)
            .map(|i| row(&format!("ingredient-{i:03}"), "g", 1))
            .collect();
        let lines = aggregate(rows);
        let pages = paginate(&lines);

        assert_eq!(pages[0].len(), FIRST_PAGE_LINES);
        for page in &pages[1..pages.len() - 1] {
            assert_eq!(page.len(), LINES_PER_PAGE);
        }
        let total: usize = pages.iter().map(Vec::len).sum();
        assert_eq!(total, 200);
    }

    #[test]
    fn exactly_full_first_page_does_not_spill() {
        let rows: Vec<_> = (0..FIRST_PAGE_LINES)
            .map(|i| row(&format!("item-{i:02}"), "g", 1))
            .collect();
        let pages = paginate(&aggregate(rows));
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn renders_a_pdf_document() {
        let lines = aggregate(vec![row("Flour", "g", 300)]);
        let bytes = render_pdf(&lines).expect("render failed");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_header_only_document_for_empty_cart() {
        let bytes = render_pdf(&[]).expect("render failed");
        assert!(bytes.starts_with(b"%PDF"));
    }
}
