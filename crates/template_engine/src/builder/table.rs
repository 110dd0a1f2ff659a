//! Table builder

use doc_model::{Alignment, NodeId, TableBorderStyle, TableWidth};

use super::inline::InlineBuilder;
use crate::document::DocxDocument;
use crate::error::Result;

/// A header column: title and optional width
#[derive(Debug, Clone)]
struct Column {
    title: String,
    width: Option<TableWidth>,
}

/// Builds one table; rows are built eagerly, the table on `finish`
pub struct TableBuilder<'d> {
    doc: &'d mut DocxDocument,
    columns: Vec<Column>,
    rows: Vec<NodeId>,
    /// Cell count of the widest row
    grid: usize,
}

impl<'d> TableBuilder<'d> {
    pub(crate) fn new(doc: &'d mut DocxDocument) -> Self {
        Self {
            doc,
            columns: Vec::new(),
            rows: Vec::new(),
            grid: 0,
        }
    }

    /// A header column sized automatically
    pub fn column(&mut self, title: &str) -> &mut Self {
        self.columns.push(Column {
            title: title.to_string(),
            width: None,
        });
        self
    }

    /// A header column taking `percent` of the table width
    pub fn column_with_width(&mut self, title: &str, percent: u32) -> &mut Self {
        self.columns.push(Column {
            title: title.to_string(),
            width: Some(TableWidth::percent(percent)),
        });
        self
    }

    /// A row of plain text cells
    pub fn row(&mut self, cells: &[&str]) -> &mut Self {
        self.row_with(|row| {
            for text in cells {
                row.cell(text);
            }
        })
    }

    /// A row whose cells are built by `fill`
    pub fn row_with<F>(&mut self, fill: F) -> &mut Self
    where
        F: FnOnce(&mut RowBuilder<'_>),
    {
        let widths: Vec<Option<TableWidth>> = self.columns.iter().map(|c| c.width).collect();
        let mut row = RowBuilder::new(&mut *self.doc, widths);
        fill(&mut row);
        let (cells, count) = (row.cells, row.count);
        let result = self.build_row(&cells);
        if let Some(row) = self.doc.record(result) {
            self.rows.push(row);
            self.grid = self.grid.max(count);
        }
        self
    }

    fn build_row(&mut self, cells: &[NodeId]) -> Result<NodeId> {
        let tree = self.doc.tree_mut();
        let row = tree.create_table_row()?;
        tree.append_children(row, cells)?;
        Ok(row)
    }

    /// Assemble the table: header row first when columns were declared
    pub(crate) fn finish(self, borders: TableBorderStyle) -> Result<NodeId> {
        let tree = self.doc.tree_mut();
        let table = tree.create_table(borders)?;
        let mut grid = self.grid;

        if !self.columns.is_empty() {
            let header = tree.create_table_row()?;
            for column in &self.columns {
                let cell = tree.create_table_cell(column.width)?;
                let paragraph = tree.create_text_paragraph(&column.title)?;
                tree.append_child(cell, paragraph)?;
                tree.append_child(header, cell)?;
            }
            tree.append_child(table, header)?;
            grid = grid.max(self.columns.len());
        }
        tree.append_children(table, &self.rows)?;
        tree.set_table_grid(table, grid)?;
        Ok(table)
    }
}

/// Builds the cells of one row
pub struct RowBuilder<'d> {
    doc: &'d mut DocxDocument,
    /// Column widths by cell index
    widths: Vec<Option<TableWidth>>,
    cells: Vec<NodeId>,
    count: usize,
    /// Alignment of the next text cell
    alignment: Option<Alignment>,
}

impl<'d> RowBuilder<'d> {
    fn new(doc: &'d mut DocxDocument, widths: Vec<Option<TableWidth>>) -> Self {
        Self {
            doc,
            widths,
            cells: Vec::new(),
            count: 0,
            alignment: None,
        }
    }

    pub fn left(&mut self) -> &mut Self {
        self.alignment = Some(Alignment::Left);
        self
    }

    pub fn center(&mut self) -> &mut Self {
        self.alignment = Some(Alignment::Center);
        self
    }

    pub fn right(&mut self) -> &mut Self {
        self.alignment = Some(Alignment::Right);
        self
    }

    pub fn both(&mut self) -> &mut Self {
        self.alignment = Some(Alignment::Justify);
        self
    }

    /// A cell holding `text`
    pub fn cell(&mut self, text: &str) -> &mut Self {
        let alignment = self.alignment.take();
        self.cell_with(|cell| {
            cell.alignment = alignment;
            cell.text(text);
        })
    }

    /// A cell whose paragraphs are built by `fill`
    pub fn cell_with<F>(&mut self, fill: F) -> &mut Self
    where
        F: FnOnce(&mut CellBuilder<'_>),
    {
        let width = self.widths.get(self.count).copied().flatten();
        let mut cell = CellBuilder::new(&mut *self.doc);
        fill(&mut cell);
        let paragraphs = cell.paragraphs;
        let result = self.build_cell(width, &paragraphs);
        if let Some(cell) = self.doc.record(result) {
            self.cells.push(cell);
            self.count += 1;
        }
        self
    }

    /// A cell must hold at least one paragraph
    fn build_cell(&mut self, width: Option<TableWidth>, paragraphs: &[NodeId]) -> Result<NodeId> {
        let tree = self.doc.tree_mut();
        let cell = tree.create_table_cell(width)?;
        if paragraphs.is_empty() {
            let empty = tree.create_paragraph()?;
            tree.append_child(cell, empty)?;
        } else {
            tree.append_children(cell, paragraphs)?;
        }
        Ok(cell)
    }
}

/// Builds the paragraphs of one cell
pub struct CellBuilder<'d> {
    doc: &'d mut DocxDocument,
    paragraphs: Vec<NodeId>,
    /// Alignment of the next paragraph
    alignment: Option<Alignment>,
}

impl<'d> CellBuilder<'d> {
    fn new(doc: &'d mut DocxDocument) -> Self {
        Self {
            doc,
            paragraphs: Vec::new(),
            alignment: None,
        }
    }

    pub fn left(&mut self) -> &mut Self {
        self.alignment = Some(Alignment::Left);
        self
    }

    pub fn center(&mut self) -> &mut Self {
        self.alignment = Some(Alignment::Center);
        self
    }

    pub fn right(&mut self) -> &mut Self {
        self.alignment = Some(Alignment::Right);
        self
    }

    pub fn both(&mut self) -> &mut Self {
        self.alignment = Some(Alignment::Justify);
        self
    }

    /// A paragraph holding `text`
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.inline(|inline| {
            inline.add_text(text);
        })
    }

    /// A paragraph whose runs are built by `fill`
    pub fn inline<F>(&mut self, fill: F) -> &mut Self
    where
        F: FnOnce(&mut InlineBuilder<'_>),
    {
        let mut inline = InlineBuilder::new(&mut *self.doc, None);
        fill(&mut inline);
        let runs = inline.finish();
        let alignment = self.alignment.take();
        let result = self.build_paragraph(alignment, &runs);
        if let Some(paragraph) = self.doc.record(result) {
            self.paragraphs.push(paragraph);
        }
        self
    }

    fn build_paragraph(&mut self, alignment: Option<Alignment>, runs: &[NodeId]) -> Result<NodeId> {
        let tree = self.doc.tree_mut();
        let paragraph = tree.create_paragraph()?;
        if let Some(alignment) = alignment {
            tree.set_alignment(paragraph, alignment)?;
        }
        tree.append_children(paragraph, runs)?;
        Ok(paragraph)
    }
}
