//! Inline images (`w:drawing/wp:inline`)

use crate::{DocumentTree, NodeId, NodeType, Result};
use serde::{Deserialize, Serialize};

const WP_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const A_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PIC_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const LOCAL_DPI_EXT: &str = "{28A0092B-C50C-407E-A947-70E740481C1C}";

/// Extent of an inline picture in EMUs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageExtent {
    pub cx: u64,
    pub cy: u64,
}

impl Default for ImageExtent {
    fn default() -> Self {
        Self { cx: 990_000, cy: 792_000 }
    }
}

/// What the drawing points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    /// Relationship id of the image part
    pub relationship_id: String,
    /// Unique drawing object id (`wp:docPr/@id`)
    pub drawing_id: u32,
    pub name: String,
    pub extent: ImageExtent,
}

impl DocumentTree {
    /// Largest `wp:docPr/@id` under `root`
    pub fn max_drawing_id(&self, root: NodeId) -> u32 {
        self.descendants_named(root, "docPr")
            .into_iter()
            .filter_map(|id| self.attribute(id, "id"))
            .filter_map(|value| value.parse().ok())
            .max()
            .unwrap_or(0)
    }

    /// Create a run holding an inline picture.
    ///
    /// Drawing namespaces are declared on the elements that use them, so the
    /// run can be placed in any part regardless of its root declarations.
    pub fn create_image_run(&mut self, image: &InlineImage) -> Result<NodeId> {
        let cx = image.extent.cx.to_string();
        let cy = image.extent.cy.to_string();
        let drawing_id = image.drawing_id.to_string();

        let run = self.create_typed(NodeType::Run)?;
        let drawing = self.create_typed(NodeType::Drawing)?;
        let inline = self.create_element_with_attributes(
            "wp:inline",
            &[("xmlns:wp", WP_NS), ("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
        );
        let extent = self.create_element_with_attributes("wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())]);
        let effect = self.create_element_with_attributes(
            "wp:effectExtent",
            &[("l", "0"), ("t", "0"), ("r", "0"), ("b", "0")],
        );
        let doc_pr = self.create_element_with_attributes(
            "wp:docPr",
            &[("id", drawing_id.as_str()), ("name", image.name.as_str())],
        );
        let frame = self.create_element("wp:cNvGraphicFramePr");
        let locks = self.create_element_with_attributes(
            "a:graphicFrameLocks",
            &[("xmlns:a", A_NS), ("noChangeAspect", "1")],
        );
        self.append_child(frame, locks)?;

        let graphic = self.create_element_with_attributes("a:graphic", &[("xmlns:a", A_NS)]);
        let graphic_data = self.create_element_with_attributes("a:graphicData", &[("uri", PIC_NS)]);
        let pic = self.create_element_with_attributes("pic:pic", &[("xmlns:pic", PIC_NS)]);

        let nv_pic_pr = self.create_element("pic:nvPicPr");
        let c_nv_pr = self.create_element_with_attributes("pic:cNvPr", &[("id", "0"), ("name", image.name.as_str())]);
        let c_nv_pic_pr = self.create_element("pic:cNvPicPr");
        self.append_children(nv_pic_pr, &[c_nv_pr, c_nv_pic_pr])?;

        let blip_fill = self.create_element("pic:blipFill");
        let blip = self.create_element_with_attributes(
            "a:blip",
            &[("xmlns:r", R_NS), ("r:embed", image.relationship_id.as_str()), ("cstate", "print")],
        );
        let ext_lst = self.create_element("a:extLst");
        let ext = self.create_element_with_attributes("a:ext", &[("uri", LOCAL_DPI_EXT)]);
        self.append_child(ext_lst, ext)?;
        self.append_child(blip, ext_lst)?;
        let stretch = self.create_element("a:stretch");
        let fill_rect = self.create_element("a:fillRect");
        self.append_child(stretch, fill_rect)?;
        self.append_children(blip_fill, &[blip, stretch])?;

        let sp_pr = self.create_element("pic:spPr");
        let xfrm = self.create_element("a:xfrm");
        let off = self.create_element_with_attributes("a:off", &[("x", "0"), ("y", "0")]);
        let ext_size = self.create_element_with_attributes("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())]);
        self.append_children(xfrm, &[off, ext_size])?;
        let geometry = self.create_element_with_attributes("a:prstGeom", &[("prst", "rect")]);
        let av_lst = self.create_element("a:avLst");
        self.append_child(geometry, av_lst)?;
        self.append_children(sp_pr, &[xfrm, geometry])?;

        self.append_children(pic, &[nv_pic_pr, blip_fill, sp_pr])?;
        self.append_child(graphic_data, pic)?;
        self.append_child(graphic, graphic_data)?;
        self.append_children(inline, &[extent, effect, doc_pr, frame, graphic])?;
        self.append_child(drawing, inline)?;
        self.append_child(run, drawing)?;
        Ok(run)
    }
}
