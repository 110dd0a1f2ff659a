//! Property containers (`w:pPr`, `w:rPr`) and their schema child order

use crate::{DocumentTree, NodeId, NodeType, Result};

/// Child sequence of `w:rPr` (CT_RPr)
pub const RUN_PROPERTY_ORDER: &[&str] = &[
    "ins", "del", "moveFrom", "moveTo", "rStyle", "rFonts", "b", "bCs", "i", "iCs", "caps",
    "smallCaps", "strike", "dstrike", "outline", "shadow", "emboss", "imprint", "noProof",
    "snapToGrid", "vanish", "webHidden", "color", "spacing", "w", "kern", "position", "sz",
    "szCs", "highlight", "u", "effect", "bdr", "shd", "fitText", "vertAlign", "rtl", "cs", "em",
    "lang", "eastAsianLayout", "specVanish", "oMath", "rPrChange",
];

/// Child sequence of `w:pPr` (CT_PPr)
pub const PARAGRAPH_PROPERTY_ORDER: &[&str] = &[
    "pStyle", "keepNext", "keepLines", "pageBreakBefore", "framePr", "widowControl", "numPr",
    "suppressLineNumbers", "pBdr", "shd", "tabs", "suppressAutoHyphens", "kinsoku", "wordWrap",
    "overflowPunct", "topLinePunct", "autoSpaceDE", "autoSpaceDN", "bidi", "adjustRightInd",
    "snapToGrid", "spacing", "ind", "contextualSpacing", "mirrorIndents", "suppressOverlap", "jc",
    "textDirection", "textAlignment", "textboxTightWrap", "outlineLvl", "divId", "cnfStyle",
    "rPr", "sectPr", "pPrChange",
];

/// Child sequence of `w:tblPr` (CT_TblPr)
pub const TABLE_PROPERTY_ORDER: &[&str] = &[
    "tblStyle", "tblpPr", "tblOverlap", "bidiVisual", "tblStyleRowBandSize",
    "tblStyleColBandSize", "tblW", "jc", "tblCellSpacing", "tblInd", "tblBorders", "shd",
    "tblLayout", "tblCellMar", "tblLook", "tblCaption", "tblDescription", "tblPrChange",
];

/// Schema order for the children of a property container, if known
pub fn property_order(container_local: &str) -> Option<&'static [&'static str]> {
    match container_local {
        "rPr" => Some(RUN_PROPERTY_ORDER),
        "pPr" => Some(PARAGRAPH_PROPERTY_ORDER),
        "tblPr" => Some(TABLE_PROPERTY_ORDER),
        _ => None,
    }
}

impl DocumentTree {
    /// Insert a property child into `container` at its schema position.
    ///
    /// An existing child with the same local name is replaced. Children the
    /// order table does not know keep their place; unknown new children are
    /// appended.
    pub fn set_property(&mut self, container: NodeId, property: NodeId) -> Result<()> {
        let Some(local) = self.local_name(property).map(str::to_owned) else {
            return self.append_child(container, property);
        };
        if let Some(existing) = self.first_child_named(container, &local) {
            self.insert_before(existing, property)?;
            return self.remove(existing);
        }
        let order = self
            .local_name(container)
            .and_then(property_order)
            .unwrap_or(&[]);
        let Some(rank) = order.iter().position(|n| *n == local) else {
            return self.append_child(container, property);
        };
        let successor = self.children(container).iter().copied().find(|c| {
            self.local_name(*c)
                .and_then(|name| order.iter().position(|n| *n == name))
                .is_some_and(|r| r > rank)
        });
        match successor {
            Some(next) => self.insert_before(next, property),
            None => self.append_child(container, property),
        }
    }

    /// Create a `<w:{local}/>` flag element and insert it in schema order
    pub fn set_flag_property(&mut self, container: NodeId, local: &str) -> Result<NodeId> {
        let flag = self.create_element(format!("w:{}", local));
        self.set_property(container, flag)?;
        Ok(flag)
    }

    /// Remove every direct child of `container` with the given local name
    pub fn remove_property(&mut self, container: NodeId, local: &str) -> Result<()> {
        let matching: Vec<NodeId> = self
            .children(container)
            .iter()
            .copied()
            .filter(|c| self.local_name(*c) == Some(local))
            .collect();
        for child in matching {
            self.remove(child)?;
        }
        Ok(())
    }

    /// True when a `w:vanish` child is present and not switched off
    pub fn has_vanish(&self, properties: NodeId) -> bool {
        self.first_child_of_type(properties, NodeType::Vanish)
            .is_some_and(|v| !is_false(self.attribute(v, "val")))
    }
}

/// ST_OnOff false values
fn is_false(value: Option<&str>) -> bool {
    matches!(value, Some("0") | Some("false") | Some("off"))
}
