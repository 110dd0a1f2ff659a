//! Core node types

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// Typed view of the WordprocessingML elements the engine works with.
///
/// Anything not listed maps to [`NodeType::Other`]; such elements are carried
/// through the tree untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Document,
    Body,
    Header,
    Footer,
    Paragraph,
    ParagraphProperties,
    Run,
    RunProperties,
    Text,
    Break,
    Tab,
    Vanish,
    Table,
    TableProperties,
    TableGrid,
    TableRow,
    TableCell,
    TableCellProperties,
    ContentControl,
    ContentControlProperties,
    ContentControlContent,
    PermissionStart,
    PermissionEnd,
    Drawing,
    SectionProperties,
    Settings,
    DocumentProtection,
    Other,
}

impl NodeType {
    /// Classify an element by its local name (the part after any prefix)
    pub fn from_local_name(local: &str) -> Self {
        match local {
            "document" => Self::Document,
            "body" => Self::Body,
            "hdr" => Self::Header,
            "ftr" => Self::Footer,
            "p" => Self::Paragraph,
            "pPr" => Self::ParagraphProperties,
            "r" => Self::Run,
            "rPr" => Self::RunProperties,
            "t" => Self::Text,
            "br" => Self::Break,
            "tab" => Self::Tab,
            "vanish" => Self::Vanish,
            "tbl" => Self::Table,
            "tblPr" => Self::TableProperties,
            "tblGrid" => Self::TableGrid,
            "tr" => Self::TableRow,
            "tc" => Self::TableCell,
            "tcPr" => Self::TableCellProperties,
            "sdt" => Self::ContentControl,
            "sdtPr" => Self::ContentControlProperties,
            "sdtContent" => Self::ContentControlContent,
            "permStart" => Self::PermissionStart,
            "permEnd" => Self::PermissionEnd,
            "drawing" => Self::Drawing,
            "sectPr" => Self::SectionProperties,
            "settings" => Self::Settings,
            "documentProtection" => Self::DocumentProtection,
            _ => Self::Other,
        }
    }

    /// Qualified name used when the engine creates an element of this type
    pub fn qualified_name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Document => "w:document",
            Self::Body => "w:body",
            Self::Header => "w:hdr",
            Self::Footer => "w:ftr",
            Self::Paragraph => "w:p",
            Self::ParagraphProperties => "w:pPr",
            Self::Run => "w:r",
            Self::RunProperties => "w:rPr",
            Self::Text => "w:t",
            Self::Break => "w:br",
            Self::Tab => "w:tab",
            Self::Vanish => "w:vanish",
            Self::Table => "w:tbl",
            Self::TableProperties => "w:tblPr",
            Self::TableGrid => "w:tblGrid",
            Self::TableRow => "w:tr",
            Self::TableCell => "w:tc",
            Self::TableCellProperties => "w:tcPr",
            Self::ContentControl => "w:sdt",
            Self::ContentControlProperties => "w:sdtPr",
            Self::ContentControlContent => "w:sdtContent",
            Self::PermissionStart => "w:permStart",
            Self::PermissionEnd => "w:permEnd",
            Self::Drawing => "w:drawing",
            Self::SectionProperties => "w:sectPr",
            Self::Settings => "w:settings",
            Self::DocumentProtection => "w:documentProtection",
            Self::Other => return None,
        };
        Some(name)
    }
}

/// A single attribute, stored with its qualified name as written in the part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Attribute name without its namespace prefix
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }
}

/// What a node holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeContent {
    Element {
        name: String,
        attributes: Vec<Attribute>,
    },
    Text(String),
    Comment(String),
}

/// A node in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) content: NodeContent,
}

impl Node {
    pub(crate) fn new(id: NodeId, content: NodeContent) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            content,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the ID of the parent node (None for detached nodes and roots)
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    /// Qualified element name, if this is an element
    pub fn name(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Element name without its namespace prefix
    pub fn local_name(&self) -> Option<&str> {
        self.name().map(local_name)
    }

    pub fn node_type(&self) -> Option<NodeType> {
        self.local_name().map(NodeType::from_local_name)
    }

    pub fn is_element(&self) -> bool {
        matches!(self.content, NodeContent::Element { .. })
    }

    pub fn attributes(&self) -> &[Attribute] {
        match &self.content {
            NodeContent::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Look up an attribute by local name
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|a| a.local_name() == local)
            .map(|a| a.value.as_str())
    }

    /// Character data of a text node
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Strip a namespace prefix from a qualified name
pub fn local_name(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map(|(_, local)| local)
        .unwrap_or(qualified)
}
