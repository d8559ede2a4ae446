// File: retext-core/src/extension_points.rs
//! The fixed table of named extension points the host runs text through.
//!
//! Each extension point is bound to one sink kind at compile time. Host
//! integration code looks an identifier up here and calls the matching
//! transform; nothing is registered at runtime.

use serde::Serialize;
use std::fmt;

use crate::errors::RetextError;

/// How text arriving at an extension point is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// A bare string; URL-like values are left alone.
    PlainText,
    /// A markup fragment; only text nodes are rewritten.
    Html,
    /// Markup when stripping tags changes the value, plain text otherwise.
    Detect,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            SinkKind::PlainText => "plain",
            SinkKind::Html => "html",
            SinkKind::Detect => "detect",
        })
    }
}

/// A text-producing field of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionPoint {
    TranslatedString,
    TranslatedPlural,
    Title,
    DocumentTitleParts,
    NavMenuItemTitle,
    SiteInfo,
    Content,
    Excerpt,
    CommentText,
    WidgetText,
    WidgetBlockContent,
    Tags,
    Category,
    Author,
    NavMenuItems,
    PageList,
    ArchiveTitle,
    ArchiveDescription,
    CustomFieldValue,
}

/// `(host identifier, extension point, sink kind)` for every known point.
pub const EXTENSION_POINTS: &[(&str, ExtensionPoint, SinkKind)] = &[
    ("gettext", ExtensionPoint::TranslatedString, SinkKind::PlainText),
    ("ngettext", ExtensionPoint::TranslatedPlural, SinkKind::PlainText),
    ("the_title", ExtensionPoint::Title, SinkKind::PlainText),
    ("document_title_parts", ExtensionPoint::DocumentTitleParts, SinkKind::PlainText),
    ("nav_menu_item_title", ExtensionPoint::NavMenuItemTitle, SinkKind::PlainText),
    ("bloginfo", ExtensionPoint::SiteInfo, SinkKind::PlainText),
    ("the_content", ExtensionPoint::Content, SinkKind::Html),
    ("the_excerpt", ExtensionPoint::Excerpt, SinkKind::Html),
    ("comment_text", ExtensionPoint::CommentText, SinkKind::Html),
    ("widget_text", ExtensionPoint::WidgetText, SinkKind::Html),
    ("widget_block_content", ExtensionPoint::WidgetBlockContent, SinkKind::Html),
    ("the_tags", ExtensionPoint::Tags, SinkKind::Html),
    ("the_category", ExtensionPoint::Category, SinkKind::Html),
    ("the_author", ExtensionPoint::Author, SinkKind::Html),
    ("wp_nav_menu_items", ExtensionPoint::NavMenuItems, SinkKind::Html),
    ("wp_list_pages", ExtensionPoint::PageList, SinkKind::Html),
    ("the_archive_title", ExtensionPoint::ArchiveTitle, SinkKind::Html),
    ("the_archive_description", ExtensionPoint::ArchiveDescription, SinkKind::Html),
    ("acf/format_value", ExtensionPoint::CustomFieldValue, SinkKind::Detect),
];

impl ExtensionPoint {
    /// Looks an extension point up by its host identifier.
    pub fn from_identifier(identifier: &str) -> Result<Self, RetextError> {
        EXTENSION_POINTS
            .iter()
            .find(|(id, _, _)| *id == identifier)
            .map(|(_, point, _)| *point)
            .ok_or_else(|| RetextError::UnknownExtensionPoint(identifier.to_string()))
    }

    /// The host identifier for this extension point.
    pub fn identifier(self) -> &'static str {
        self.entry().0
    }

    pub fn sink(self) -> SinkKind {
        self.entry().2
    }

    fn entry(self) -> &'static (&'static str, ExtensionPoint, SinkKind) {
        EXTENSION_POINTS
            .iter()
            .find(|(_, point, _)| *point == self)
            .unwrap_or(&EXTENSION_POINTS[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_point_is_in_the_table_once() {
        for (identifier, point, sink) in EXTENSION_POINTS {
            assert_eq!(ExtensionPoint::from_identifier(identifier).unwrap(), *point);
            assert_eq!(point.identifier(), *identifier);
            assert_eq!(point.sink(), *sink);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(ExtensionPoint::Content.sink(), SinkKind::Html);
        assert_eq!(ExtensionPoint::Title.sink(), SinkKind::PlainText);
        assert_eq!(
            ExtensionPoint::from_identifier("acf/format_value").unwrap().sink(),
            SinkKind::Detect
        );
        assert!(ExtensionPoint::from_identifier("the_weather").is_err());
    }
}
