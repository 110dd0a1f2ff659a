//! Visibility theme configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which tags to show and which to hide when a document is written out.
///
/// The visible tag is applied first, then every hidden tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagVisibilityOptions {
    /// Tag whose content becomes visible
    pub visible_tag: Option<String>,
    /// Tags whose content becomes hidden
    pub hidden_tags: Vec<String>,
}

impl TagVisibilityOptions {
    pub fn new(visible_tag: impl Into<String>, hidden_tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            visible_tag: Some(visible_tag.into()),
            hidden_tags: hidden_tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse options from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn is_empty(&self) -> bool {
        self.visible_tag.is_none() && self.hidden_tags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_from_json() {
        let options = TagVisibilityOptions::from_json_str(
            r#"{"visible_tag": "RETAIL", "hidden_tags": ["WHOLESALE", "EXPORT"]}"#,
        )
        .unwrap();
        assert_eq!(options, TagVisibilityOptions::new("RETAIL", ["WHOLESALE", "EXPORT"]));
    }

    #[test]
    fn test_missing_fields_default() {
        let options = TagVisibilityOptions::from_json_str(r#"{"hidden_tags": ["A"]}"#).unwrap();
        assert_eq!(options.visible_tag, None);
        assert_eq!(options.hidden_tags, vec!["A"]);
        assert!(TagVisibilityOptions::from_json_str("{}").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(TagVisibilityOptions::from_json_str("{").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"visible_tag": "MAIN"}}"#).unwrap();

        let options = TagVisibilityOptions::load(file.path()).unwrap();
        assert_eq!(options.visible_tag.as_deref(), Some("MAIN"));
        assert!(options.hidden_tags.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = TagVisibilityOptions::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(crate::TemplateError::Io(_))));
    }
}
