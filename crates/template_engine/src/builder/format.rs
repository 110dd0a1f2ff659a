//! Formatting combinators
//!
//! ```ignore
//! builder.format("Total: ".bold() + "42" + " units".italic());
//! ```

use std::ops::Add;

use doc_model::RunFormatting;

use super::InlineBuilder;

const BOLD: RunFormatting = RunFormatting { bold: true, italic: false, underline: false };
const ITALIC: RunFormatting = RunFormatting { bold: false, italic: true, underline: false };
const UNDERLINE: RunFormatting = RunFormatting { bold: false, italic: false, underline: true };

/// A piece of formatted inline text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    None,
    Text(String),
    Bold(Box<Format>),
    Italic(Box<Format>),
    Underlined(Box<Format>),
    Concat(Vec<Format>),
}

impl Format {
    pub fn text(text: impl Into<String>) -> Self {
        Format::Text(text.into())
    }

    pub fn bold(self) -> Self {
        Format::Bold(Box::new(self))
    }

    pub fn italic(self) -> Self {
        Format::Italic(Box::new(self))
    }

    pub fn underlined(self) -> Self {
        Format::Underlined(Box::new(self))
    }

    /// Write this format as runs, with `formatting` inherited from the
    /// enclosing combinators
    pub(crate) fn write(&self, builder: &mut InlineBuilder<'_>, formatting: RunFormatting) {
        match self {
            Format::None => {}
            Format::Text(text) => {
                builder.formatted_text(text, formatting);
            }
            Format::Bold(inner) => inner.write(builder, formatting.merge(BOLD)),
            Format::Italic(inner) => inner.write(builder, formatting.merge(ITALIC)),
            Format::Underlined(inner) => inner.write(builder, formatting.merge(UNDERLINE)),
            Format::Concat(parts) => {
                for part in parts {
                    part.write(builder, formatting);
                }
            }
        }
    }
}

impl From<&str> for Format {
    fn from(text: &str) -> Self {
        Format::text(text)
    }
}

impl From<String> for Format {
    fn from(text: String) -> Self {
        Format::Text(text)
    }
}

impl<T: Into<Format>> Add<T> for Format {
    type Output = Format;

    fn add(self, rhs: T) -> Format {
        let rhs = rhs.into();
        match self {
            Format::None => rhs,
            Format::Concat(mut parts) => {
                parts.push(rhs);
                Format::Concat(parts)
            }
            lhs => Format::Concat(vec![lhs, rhs]),
        }
    }
}

impl Add<Format> for &str {
    type Output = Format;

    fn add(self, rhs: Format) -> Format {
        Format::from(self) + rhs
    }
}

/// Formatting shortcuts on string slices
pub trait FormatExt {
    fn bold(self) -> Format;
    fn italic(self) -> Format;
    fn underlined(self) -> Format;
}

impl FormatExt for &str {
    fn bold(self) -> Format {
        Format::from(self).bold()
    }

    fn italic(self) -> Format {
        Format::from(self).italic()
    }

    fn underlined(self) -> Format {
        Format::from(self).underlined()
    }
}
