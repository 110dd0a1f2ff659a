//! In-memory DOCX package
//!
//! The content parts (main document, headers, footers, settings and custom
//! properties) are parsed into one shared [`DocumentTree`]; each part is a
//! separate root. All other parts are carried as raw bytes.

use crate::docx::content_types::{image_extension, ContentTypes};
use crate::docx::document_writer::DocumentWriter;
use crate::docx::error::{DocxError, DocxResult};
use crate::docx::parser::XmlPartParser;
use crate::docx::reader::DocxReader;
use crate::docx::relationships::{rels_path_for, resolve_target, Relationships, TargetMode};
use crate::docx::writer::DocxWriter;
use crate::docx::{relationship_types, template};
use doc_model::{validate, DocumentTree, NodeId, NodeType, ProtectionType, ValidationError};
use std::io::Cursor;
use uuid::Uuid;

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const ROOT_RELS_PART: &str = "_rels/.rels";

/// Role of a parsed part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    MainDocument,
    Header,
    Footer,
    Settings,
    CustomProperties,
}

#[derive(Debug, Clone, Copy)]
struct ParsedXml {
    kind: PartKind,
    root: NodeId,
    has_declaration: bool,
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    /// Committed bytes; refreshed from the tree by `save`
    data: Vec<u8>,
    parsed: Option<ParsedXml>,
}

/// An open Word package
#[derive(Debug, Clone)]
pub struct DocxPackage {
    tree: DocumentTree,
    parts: Vec<Part>,
    content_types: ContentTypes,
    root_rels: Relationships,
    main_part: String,
    document_rels: Relationships,
}

impl DocxPackage {
    /// Open a package from the bytes of a .docx file
    pub fn open(bytes: &[u8]) -> DocxResult<Self> {
        let mut reader = DocxReader::new(Cursor::new(bytes))?;
        if !reader.is_valid_package() {
            return Err(DocxError::NotAPackage(
                "no content types or root relationships".to_string(),
            ));
        }
        Self::from_parts(reader.read_all()?)
    }

    /// A blank document with an empty body
    pub fn blank() -> DocxResult<Self> {
        Self::from_parts(template::minimal_parts(&template::document_xml("")))
    }

    /// Build a package from `(part name, bytes)` pairs in archive order
    pub fn from_parts(parts: Vec<(String, Vec<u8>)>) -> DocxResult<Self> {
        let find = |name: &str| parts.iter().find(|(n, _)| n == name).map(|(_, data)| data);

        let content_types = match find(CONTENT_TYPES_PART) {
            Some(data) => ContentTypes::parse(&String::from_utf8(data.clone())?)?,
            None => return Err(DocxError::MissingPart(CONTENT_TYPES_PART.to_string())),
        };
        let root_rels = match find(ROOT_RELS_PART) {
            Some(data) => Relationships::parse(&String::from_utf8(data.clone())?)?,
            None => return Err(DocxError::MissingPart(ROOT_RELS_PART.to_string())),
        };
        let main_part = root_rels
            .get_by_type(relationship_types::DOCUMENT)
            .map(|rel| resolve_target("", &rel.target))
            .ok_or_else(|| DocxError::NotAPackage("no officeDocument relationship".to_string()))?;
        let document_rels_part = rels_path_for(&main_part);
        let document_rels = match find(&document_rels_part) {
            Some(data) => Relationships::parse(&String::from_utf8(data.clone())?)?,
            None => Relationships::new(),
        };

        let mut kinds: Vec<(String, PartKind)> = vec![(main_part.clone(), PartKind::MainDocument)];
        let internal_targets = |rel_type: &str| -> Vec<String> {
            document_rels
                .get_all_by_type(rel_type)
                .into_iter()
                .filter(|rel| rel.target_mode == TargetMode::Internal)
                .map(|rel| resolve_target(&main_part, &rel.target))
                .collect()
        };
        kinds.extend(internal_targets(relationship_types::HEADER).into_iter().map(|n| (n, PartKind::Header)));
        kinds.extend(internal_targets(relationship_types::FOOTER).into_iter().map(|n| (n, PartKind::Footer)));
        kinds.extend(internal_targets(relationship_types::SETTINGS).into_iter().map(|n| (n, PartKind::Settings)));
        if let Some(rel) = root_rels.get_by_type(relationship_types::CUSTOM_PROPERTIES) {
            kinds.push((resolve_target("", &rel.target), PartKind::CustomProperties));
        }

        let mut tree = DocumentTree::new();
        let mut package_parts = Vec::with_capacity(parts.len());
        for (name, data) in parts {
            if name == CONTENT_TYPES_PART || name == ROOT_RELS_PART || name == document_rels_part {
                continue;
            }
            let parsed = match kinds.iter().find(|(n, _)| *n == name) {
                Some((_, kind)) => {
                    let part = XmlPartParser::parse(&mut tree, &data)?;
                    tracing::debug!(part = %name, kind = ?kind, "parsed package part");
                    Some(ParsedXml {
                        kind: *kind,
                        root: part.root,
                        has_declaration: part.has_declaration,
                    })
                }
                None => None,
            };
            package_parts.push(Part { name, data, parsed });
        }

        for (name, kind) in &kinds {
            if !package_parts.iter().any(|p| p.name == *name) {
                if *kind == PartKind::MainDocument {
                    return Err(DocxError::MissingPart(name.clone()));
                }
                tracing::warn!(part = %name, kind = ?kind, "relationship target missing from package");
            }
        }

        Ok(Self {
            tree,
            parts: package_parts,
            content_types,
            root_rels,
            main_part,
            document_rels,
        })
    }

    // =========================================================================
    // Tree access
    // =========================================================================

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DocumentTree {
        &mut self.tree
    }

    fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    fn root_of(&self, kind: PartKind, name: &str) -> Option<NodeId> {
        self.part(name)
            .and_then(|p| p.parsed)
            .filter(|parsed| parsed.kind == kind)
            .map(|parsed| parsed.root)
    }

    fn roots_by_rel(&self, rel_type: &str, kind: PartKind) -> Vec<NodeId> {
        self.document_rels
            .get_all_by_type(rel_type)
            .into_iter()
            .filter(|rel| rel.target_mode == TargetMode::Internal)
            .filter_map(|rel| self.root_of(kind, &resolve_target(&self.main_part, &rel.target)))
            .collect()
    }

    /// Name of the main document part
    pub fn main_part_name(&self) -> &str {
        &self.main_part
    }

    /// Root element of the main document part
    pub fn main_root(&self) -> DocxResult<NodeId> {
        self.root_of(PartKind::MainDocument, &self.main_part)
            .ok_or_else(|| DocxError::MissingPart(self.main_part.clone()))
    }

    /// `w:body` of the main document
    pub fn body(&self) -> DocxResult<NodeId> {
        let root = self.main_root()?;
        self.tree
            .first_child_of_type(root, NodeType::Body)
            .ok_or_else(|| DocxError::MissingPart("w:body".to_string()))
    }

    /// Header roots in relationship order
    pub fn header_roots(&self) -> Vec<NodeId> {
        self.roots_by_rel(relationship_types::HEADER, PartKind::Header)
    }

    /// Footer roots in relationship order
    pub fn footer_roots(&self) -> Vec<NodeId> {
        self.roots_by_rel(relationship_types::FOOTER, PartKind::Footer)
    }

    /// Every content root: main document, then headers, then footers
    pub fn content_roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = self.main_root().into_iter().collect();
        roots.extend(self.header_roots());
        roots.extend(self.footer_roots());
        roots
    }

    /// Root of the settings part, if the package has one
    pub fn settings_root(&self) -> Option<NodeId> {
        self.roots_by_rel(relationship_types::SETTINGS, PartKind::Settings)
            .into_iter()
            .next()
    }

    pub(crate) fn custom_properties_root(&self) -> Option<NodeId> {
        self.parts
            .iter()
            .filter_map(|p| p.parsed)
            .find(|parsed| parsed.kind == PartKind::CustomProperties)
            .map(|parsed| parsed.root)
    }

    pub(crate) fn add_parsed_part(
        &mut self,
        name: &str,
        kind: PartKind,
        content: &[u8],
        content_type: &str,
    ) -> DocxResult<NodeId> {
        let parsed = XmlPartParser::parse(&mut self.tree, content)?;
        self.parts.push(Part {
            name: name.to_string(),
            data: content.to_vec(),
            parsed: Some(ParsedXml {
                kind,
                root: parsed.root,
                has_declaration: parsed.has_declaration,
            }),
        });
        self.content_types.add_override(name, content_type);
        Ok(parsed.root)
    }

    pub(crate) fn root_relationships_mut(&mut self) -> &mut Relationships {
        &mut self.root_rels
    }

    // =========================================================================
    // Parts
    // =========================================================================

    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    pub fn document_relationships(&self) -> &Relationships {
        &self.document_rels
    }

    /// Names of all carried parts, regenerated metadata parts excluded
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.name.as_str()).collect()
    }

    /// Committed bytes of a part (as of the last `save`)
    pub fn part_data(&self, name: &str) -> Option<&[u8]> {
        self.part(name).map(|p| p.data.as_slice())
    }

    /// Live XML of a parsed part
    pub fn part_xml(&self, name: &str) -> Option<String> {
        let parsed = self.part(name)?.parsed?;
        Some(DocumentWriter::new().write(&self.tree, parsed.root, parsed.has_declaration))
    }

    /// Live XML of the main document part
    pub fn main_document_xml(&self) -> DocxResult<String> {
        self.part_xml(&self.main_part)
            .ok_or_else(|| DocxError::MissingPart(self.main_part.clone()))
    }

    /// Add an image part and a relationship to it from the main document.
    /// Returns the relationship id.
    pub fn add_image_part(&mut self, content_type: &str, data: &[u8]) -> DocxResult<String> {
        let extension = image_extension(content_type).unwrap_or_else(|| {
            tracing::warn!(content_type, "unknown image content type, storing as .bin");
            "bin"
        });
        self.content_types.add_default(extension, content_type);

        let main_dir = self.main_part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        let prefix = if main_dir.is_empty() { String::new() } else { format!("{}/", main_dir) };
        let mut index = 1;
        let mut name = format!("{}media/image{}.{}", prefix, index, extension);
        while self.part(&name).is_some() {
            index += 1;
            name = format!("{}media/image{}.{}", prefix, index, extension);
        }

        let mut id = relationship_id();
        while self.document_rels.contains(&id) {
            id = relationship_id();
        }
        let target = name.strip_prefix(&prefix).unwrap_or(&name).to_string();
        self.document_rels
            .add_with_id(&id, relationship_types::IMAGE, &target, TargetMode::Internal)?;
        self.parts.push(Part {
            name: name.clone(),
            data: data.to_vec(),
            parsed: None,
        });
        tracing::debug!(part = %name, relationship = %id, "added image part");
        Ok(id)
    }

    // =========================================================================
    // Settings and signatures
    // =========================================================================

    /// Current document protection, or `None` without a settings part
    pub fn protection(&self) -> Option<ProtectionType> {
        self.settings_root()
            .map(|settings| self.tree.protection_type(settings))
    }

    /// Set the document's edit restriction
    pub fn set_protection(&mut self, protection: ProtectionType) -> DocxResult<()> {
        let settings = self
            .settings_root()
            .ok_or_else(|| DocxError::MissingPart("settings".to_string()))?;
        self.tree.set_protection_type(settings, protection)?;
        Ok(())
    }

    /// True when the package carries a digital signature
    pub fn has_signatures(&self) -> bool {
        self.root_rels
            .get_by_type(relationship_types::DIGITAL_SIGNATURE_ORIGIN)
            .is_some()
            && self
                .parts
                .iter()
                .any(|p| p.name.starts_with("_xmlsignatures/") && p.name.ends_with(".xml"))
    }

    /// Structural problems across all content roots
    pub fn validate(&self) -> Vec<ValidationError> {
        self.content_roots()
            .into_iter()
            .flat_map(|root| validate(&self.tree, root))
            .collect()
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Commit the tree into every parsed part's bytes
    pub fn save(&mut self) {
        for part in &mut self.parts {
            if let Some(parsed) = part.parsed {
                part.data = DocumentWriter::new()
                    .write(&self.tree, parsed.root, parsed.has_declaration)
                    .into_bytes();
            }
        }
    }

    /// Save and write the package as .docx bytes
    pub fn to_bytes(&mut self) -> DocxResult<Vec<u8>> {
        self.save();
        let mut writer = DocxWriter::in_memory();
        writer.write_file(CONTENT_TYPES_PART, self.content_types.to_xml().as_bytes())?;
        writer.write_file(ROOT_RELS_PART, self.root_rels.to_xml().as_bytes())?;
        writer.write_file(&rels_path_for(&self.main_part), self.document_rels.to_xml().as_bytes())?;
        for part in &self.parts {
            if part.parsed.is_some() || is_xml_name(&part.name) {
                writer.write_file(&part.name, &part.data)?;
            } else {
                writer.write_binary(&part.name, &part.data)?;
            }
        }
        writer.into_bytes()
    }
}

fn is_xml_name(name: &str) -> bool {
    name.ends_with(".xml") || name.ends_with(".rels")
}

/// `R` followed by 16 hex characters
fn relationship_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("R{}", &hex[..16])
}
