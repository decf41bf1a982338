// SPDX-License-Identifier: MPL-2.0
//! User input for the generator: a content format and free text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of content being encoded.
///
/// The format only drives labels and placeholders; content is never
/// validated or rewritten according to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrFormat {
    #[default]
    Url,
    Text,
    Email,
    Contact,
}

impl QrFormat {
    pub const ALL: [QrFormat; 4] = [
        QrFormat::Url,
        QrFormat::Text,
        QrFormat::Email,
        QrFormat::Contact,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QrFormat::Url => "url",
            QrFormat::Text => "text",
            QrFormat::Email => "email",
            QrFormat::Contact => "contact",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            QrFormat::Url => "URL",
            QrFormat::Text => "Text",
            QrFormat::Email => "Email",
            QrFormat::Contact => "Contact",
        }
    }

    /// Example content shown in an empty input field.
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            QrFormat::Url => "https://example.com",
            QrFormat::Text => "Enter your text here...",
            QrFormat::Email => "mailto:someone@example.com",
            QrFormat::Contact => "John Doe\n+1234567890\njohn@example.com",
        }
    }

    /// Contact cards are entered one field per line.
    #[must_use]
    pub fn is_multiline(self) -> bool {
        matches!(self, QrFormat::Text | QrFormat::Contact)
    }
}

impl fmt::Display for QrFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QrFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QrFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| format!("unknown format '{s}': expected url, text, email or contact"))
    }
}

/// Current generator input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QrInput {
    format: QrFormat,
    content: String,
}

impl QrInput {
    #[must_use]
    pub fn format(&self) -> QrFormat {
        self.format
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Switches format and discards the current content.
    pub fn set_format(&mut self, format: QrFormat) {
        self.format = format;
        self.content.clear();
    }

    /// Replaces the content verbatim.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// True when there is nothing worth encoding.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
