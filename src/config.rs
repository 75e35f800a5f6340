//! Report configuration
//!
//! Page geometry, spacing, font sizes and the department list used by the
//! administrative report. Every field has a default so a partial JSON file is
//! enough to override a single value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Departments listed in the Department Statistics table, in display order
pub const DEFAULT_DEPARTMENTS: [&str; 10] = [
    "Internal Medicine",
    "Pulmonology",
    "Neurology",
    "Gastroenterology",
    "Rheumatology",
    "Endocrinology",
    "Hematology",
    "Infectious Disease",
    "Thrombosis Medicine",
    "Immunology & Allergy",
];

/// Top-level report configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Product prefix used in the output file name
    pub product_name: String,
    pub departments: Vec<String>,
    pub page: PageGeometry,
    pub spacing: Spacing,
    pub fonts: FontSizes,
    /// Header row fill of every table (RGB 0-255)
    pub header_fill: (u8, u8, u8),
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            product_name: "imd-care".to_string(),
            departments: DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
            page: PageGeometry::default(),
            spacing: Spacing::default(),
            fonts: FontSizes::default(),
            header_fill: (63, 81, 181),
        }
    }
}

impl ReportConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json_str(json: &str) -> ReportResult<Self> {
        serde_json::from_str(json).map_err(ReportError::InvalidConfig)
    }

    /// Load a configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// Page canvas dimensions and margins, in millimetres
///
/// Y grows downward from the top edge of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub top_margin: f32,
    pub left_margin: f32,
    pub right_margin: f32,
    /// Lowest Y a table row may reach before continuing on a new page
    pub bottom_margin: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4 portrait
        Self {
            width: 210.0,
            height: 297.0,
            top_margin: 15.0,
            left_margin: 14.0,
            right_margin: 14.0,
            bottom_margin: 15.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - self.left_margin - self.right_margin
    }

    /// Y below which table rows must not extend
    pub fn content_bottom(&self) -> f32 {
        self.height - self.bottom_margin
    }
}

/// Vertical gaps between report elements, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    pub after_title: f32,
    pub after_generated_on: f32,
    pub after_period: f32,
    pub after_section_title: f32,
    pub after_table: f32,
    /// Free space required before the safety and urgency sections
    pub page_break_threshold: f32,
    /// Distance of the page footer above the bottom edge
    pub footer_offset: f32,
    pub cell_padding: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            after_title: 10.0,
            after_generated_on: 7.0,
            after_period: 15.0,
            after_section_title: 10.0,
            after_table: 15.0,
            page_break_threshold: 60.0,
            footer_offset: 10.0,
            cell_padding: 3.0,
        }
    }
}

/// Font sizes in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    pub title: f32,
    pub subtitle: f32,
    pub section: f32,
    pub table_header: f32,
    pub table_body: f32,
    pub footer: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            title: 20.0,
            subtitle: 12.0,
            section: 14.0,
            table_header: 10.0,
            table_body: 9.0,
            footer: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_departments_order() {
        let config = ReportConfig::default();
        assert_eq!(config.departments.len(), 10);
        assert_eq!(config.departments[0], "Internal Medicine");
        assert_eq!(config.departments[9], "Immunology & Allergy");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ReportConfig::from_json_str(
            r#"{"departments": ["Cardiology"], "spacing": {"page_break_threshold": 80.0}}"#,
        )
        .unwrap();
        assert_eq!(config.departments, vec!["Cardiology".to_string()]);
        assert_eq!(config.spacing.page_break_threshold, 80.0);
        assert_eq!(config.spacing.after_table, 15.0);
        assert_eq!(config.page, PageGeometry::default());
        assert_eq!(config.product_name, "imd-care");
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = ReportConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ReportError::InvalidConfig(_)));
    }

    #[test]
    fn test_content_area() {
        let page = PageGeometry::default();
        assert_eq!(page.content_width(), 182.0);
        assert_eq!(page.content_bottom(), 282.0);
    }
}
