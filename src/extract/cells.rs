//! Table cell lookup primitives
//!
//! The legacy registration pages lay everything out in tables. Two lookups
//! cover every field we need:
//!
//! - label lookup: find the cell whose text is a label ("CRN:") and return
//!   the text of the next cell in the same row
//! - marker rows: find every cell carrying a marker class and return the
//!   cells of the row it sits in, in column order
//!
//! Keeping these narrow means markup drift on the source site only touches
//! this file.

use scraper::{ElementRef, Html, Selector};

/// Label/value lookup over the table cells of one parsed document
pub struct FieldExtractor<'a> {
    cells: Vec<ElementRef<'a>>,
}

impl<'a> FieldExtractor<'a> {
    /// Indexes the leaf `td` cells of the document
    ///
    /// Cells that wrap a nested table are layout containers, not labels, so
    /// they are left out.
    pub fn new(document: &'a Html) -> Self {
        let cells = match Selector::parse("td") {
            Ok(selector) => document
                .select(&selector)
                .filter(|cell| is_leaf_cell(cell))
                .collect(),
            Err(_) => Vec::new(),
        };

        Self { cells }
    }

    /// Returns true if some cell carries the label
    pub fn has_label(&self, label: &str) -> bool {
        self.label_cell(label).is_some()
    }

    /// Returns the raw text of the cell following the label, or "" if absent
    pub fn value(&self, label: &str) -> String {
        self.label_cell(label)
            .and_then(next_cell)
            .map(|cell| cell_text(&cell))
            .unwrap_or_default()
    }

    /// Finds the label cell: an exact (trimmed) match wins over a substring match
    fn label_cell(&self, label: &str) -> Option<ElementRef<'a>> {
        self.cells
            .iter()
            .find(|cell| cell_text(cell).trim() == label)
            .or_else(|| self.cells.iter().find(|cell| cell_text(cell).contains(label)))
            .copied()
    }
}

/// Returns the cells of every row that contains a `td.<marker_class>` cell
///
/// Each row is returned as the raw text of its `td` children, in column order.
pub fn marker_rows(document: &Html, marker_class: &str) -> Vec<Vec<String>> {
    let selector = match Selector::parse(&format!("td.{}", marker_class)) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|cell| cell.parent().and_then(ElementRef::wrap))
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "td")
                .map(|child| cell_text(&child))
                .collect()
        })
        .collect()
}

/// Concatenated text content of an element
pub fn cell_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

fn next_cell(cell: ElementRef<'_>) -> Option<ElementRef<'_>> {
    cell.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "td")
}

fn is_leaf_cell(cell: &ElementRef<'_>) -> bool {
    !cell.descendants().skip(1).any(|node| {
        node.value()
            .as_element()
            .map_or(false, |element| element.name() == "td")
    })
}
