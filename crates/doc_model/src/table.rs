//! Table helpers (`w:tbl`, `w:tr`, `w:tc`)

use crate::{Alignment, DocumentTree, NodeId, NodeType, Result};
use serde::{Deserialize, Serialize};

/// Width type for table measurements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidthType {
    #[default]
    Auto,
    /// Fiftieths of a percent
    Pct,
    /// Twentieths of a point
    Dxa,
}

impl WidthType {
    pub fn ooxml_value(&self) -> &'static str {
        match self {
            WidthType::Auto => "auto",
            WidthType::Pct => "pct",
            WidthType::Dxa => "dxa",
        }
    }
}

/// Cell or table width
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableWidth {
    pub value: u32,
    pub width_type: WidthType,
}

impl TableWidth {
    /// Width from a whole percentage, stored the way generated tables carry it
    pub fn percent(percent: u32) -> Self {
        Self {
            value: percent * 100 / 15,
            width_type: WidthType::Pct,
        }
    }
}

/// Border style for generated tables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableBorderStyle {
    #[default]
    Thick,
    None,
}

impl TableBorderStyle {
    pub fn ooxml_value(&self) -> &'static str {
        match self {
            TableBorderStyle::Thick => "thick",
            TableBorderStyle::None => "none",
        }
    }
}

const BORDER_EDGES: &[&str] = &["top", "left", "bottom", "right", "insideH", "insideV"];

impl DocumentTree {
    /// Create a table with `w:tblPr` carrying uniform borders
    pub fn create_table(&mut self, borders: TableBorderStyle) -> Result<NodeId> {
        let table = self.create_typed(NodeType::Table)?;
        let tbl_pr = self.create_typed(NodeType::TableProperties)?;
        let tbl_borders = self.create_element("w:tblBorders");
        let size = match borders {
            TableBorderStyle::Thick => "1",
            TableBorderStyle::None => "0",
        };
        for edge in BORDER_EDGES {
            let border = self.create_element_with_attributes(
                format!("w:{}", edge),
                &[("w:val", borders.ooxml_value()), ("w:sz", size)],
            );
            self.append_child(tbl_borders, border)?;
        }
        self.set_property(tbl_pr, tbl_borders)?;
        self.append_child(table, tbl_pr)?;
        Ok(table)
    }

    pub fn create_table_row(&mut self) -> Result<NodeId> {
        self.create_typed(NodeType::TableRow)
    }

    /// Create a cell, optionally carrying a width in `w:tcPr`
    pub fn create_table_cell(&mut self, width: Option<TableWidth>) -> Result<NodeId> {
        let cell = self.create_typed(NodeType::TableCell)?;
        if let Some(width) = width {
            let tc_pr = self.create_typed(NodeType::TableCellProperties)?;
            let value = width.value.to_string();
            let tc_w = self.create_element_with_attributes(
                "w:tcW",
                &[("w:w", value.as_str()), ("w:type", width.width_type.ooxml_value())],
            );
            self.append_child(tc_pr, tc_w)?;
            self.append_child(cell, tc_pr)?;
        }
        Ok(cell)
    }

    /// Replace the table grid with `columns` grid columns.
    /// The grid follows `w:tblPr` when present.
    pub fn set_table_grid(&mut self, table: NodeId, columns: usize) -> Result<()> {
        if let Some(existing) = self.first_child_of_type(table, NodeType::TableGrid) {
            self.remove(existing)?;
        }
        let grid = self.create_typed(NodeType::TableGrid)?;
        for _ in 0..columns {
            let column = self.create_element("w:gridCol");
            self.append_child(grid, column)?;
        }
        match self.first_child_of_type(table, NodeType::TableProperties) {
            Some(properties) => self.insert_after(properties, grid),
            None => self.prepend_child(table, grid),
        }
    }

    /// Create a cell holding one paragraph with a text run
    pub fn create_text_cell(&mut self, text: &str, alignment: Option<Alignment>) -> Result<NodeId> {
        let cell = self.create_table_cell(None)?;
        let paragraph = self.create_text_paragraph(text)?;
        if let Some(alignment) = alignment {
            self.set_alignment(paragraph, alignment)?;
        }
        self.append_child(cell, paragraph)?;
        Ok(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_width() {
        let width = TableWidth::percent(30);
        assert_eq!(width.value, 200);
        assert_eq!(width.width_type, WidthType::Pct);
    }

    #[test]
    fn test_table_has_bordered_properties() {
        let mut tree = DocumentTree::new();
        let table = tree.create_table(TableBorderStyle::Thick).unwrap();
        let tbl_pr = tree.first_child_of_type(table, NodeType::TableProperties).unwrap();
        let borders = tree.first_child_named(tbl_pr, "tblBorders").unwrap();
        assert_eq!(tree.children(borders).len(), 6);
        let top = tree.first_child_named(borders, "top").unwrap();
        assert_eq!(tree.attribute(top, "val"), Some("thick"));
        assert_eq!(tree.attribute(top, "sz"), Some("1"));
    }

    #[test]
    fn test_borderless_table() {
        let mut tree = DocumentTree::new();
        let table = tree.create_table(TableBorderStyle::None).unwrap();
        let borders = tree.descendants_named(table, "insideV")[0];
        assert_eq!(tree.attribute(borders, "val"), Some("none"));
    }

    #[test]
    fn test_table_grid_follows_properties() {
        let mut tree = DocumentTree::new();
        let table = tree.create_table(TableBorderStyle::Thick).unwrap();
        let row = tree.create_table_row().unwrap();
        tree.append_child(table, row).unwrap();

        tree.set_table_grid(table, 2).unwrap();
        tree.set_table_grid(table, 3).unwrap();

        let children = tree.children(table).to_vec();
        assert_eq!(children.len(), 3);
        assert!(tree.is(children[1], NodeType::TableGrid));
        assert_eq!(tree.children(children[1]).len(), 3);
    }

    #[test]
    fn test_text_cell() {
        let mut tree = DocumentTree::new();
        let cell = tree.create_text_cell("value", Some(Alignment::Right)).unwrap();
        let paragraph = tree.first_child_of_type(cell, NodeType::Paragraph).unwrap();
        assert_eq!(tree.inner_text(cell), "value");
        assert_eq!(tree.alignment(paragraph), Some(Alignment::Right));
    }
}
