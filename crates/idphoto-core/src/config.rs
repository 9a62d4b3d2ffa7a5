//! Editor configuration and derived print geometry.
//!
//! `EditorConfig` holds the physical constants (millimetres, DPI) and the
//! on-screen viewport size. `PrintLayout` is derived from it once and holds
//! every pixel dimension the editor and sheet compositor need.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MM_PER_INCH: f64 = 25.4;

/// Convert millimetres to pixels: `round(mm * dpi / 25.4)`.
pub fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    (mm * dpi as f64 / MM_PER_INCH).round().max(0.0) as u32
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Print resolution in dots per inch.
    pub dpi: u32,
    pub photo_width_mm: f64,
    pub photo_height_mm: f64,
    pub paper_width_mm: f64,
    pub paper_height_mm: f64,
    /// Gap between sheet cells in pixels.
    pub cell_gap_px: u32,
    pub grid_columns: u32,
    pub grid_rows: u32,
    /// Chin-to-crown height of the inner face guide.
    pub face_min_mm: f64,
    /// Chin-to-crown height of the outer face guide.
    pub face_max_mm: f64,
    pub face_width_mm: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Longest edge of the interactive preview.
    pub preview_max_edge: u32,
    /// Multiplier on the cover-fit scale applied at load time.
    pub fit_headroom: f64,
    pub jpeg_quality: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            photo_width_mm: 35.0,
            photo_height_mm: 45.0,
            paper_width_mm: 150.0,
            paper_height_mm: 100.0,
            cell_gap_px: 10,
            grid_columns: 3,
            grid_rows: 2,
            face_min_mm: 32.0,
            face_max_mm: 36.0,
            face_width_mm: 24.0,
            viewport_width: 600,
            viewport_height: 500,
            preview_max_edge: 1000,
            fit_headroom: 1.5,
            jpeg_quality: 95,
        }
    }
}

impl EditorConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.dpi == 0 || self.dpi > u16::MAX as u32 {
            return Err(invalid("dpi", format!("must be in 1..={}", u16::MAX)));
        }

        let lengths = [
            ("photo_width_mm", self.photo_width_mm),
            ("photo_height_mm", self.photo_height_mm),
            ("paper_width_mm", self.paper_width_mm),
            ("paper_height_mm", self.paper_height_mm),
            ("face_min_mm", self.face_min_mm),
            ("face_max_mm", self.face_max_mm),
            ("face_width_mm", self.face_width_mm),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(field, format!("must be a positive length, got {value}")));
            }
        }

        if self.face_min_mm > self.face_max_mm {
            return Err(invalid("face_min_mm", "must not exceed face_max_mm"));
        }
        if self.viewport_width == 0 || self.viewport_height == 0 {
            return Err(invalid("viewport_width", "viewport must be non-empty"));
        }
        if self.preview_max_edge == 0 {
            return Err(invalid("preview_max_edge", "must be non-zero"));
        }
        if !self.fit_headroom.is_finite() || self.fit_headroom < 1.0 {
            return Err(invalid("fit_headroom", "must be at least 1.0"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(invalid("jpeg_quality", "must be in 1..=100"));
        }
        if self.grid_columns == 0 || self.grid_rows == 0 {
            return Err(invalid("grid_columns", "grid must have at least one cell"));
        }

        let layout = PrintLayout::from_config(self);
        if layout.photo_width == 0 || layout.photo_height == 0 {
            return Err(invalid("photo_width_mm", "photo is smaller than one pixel"));
        }
        let (grid_w, grid_h) = layout.grid_size();
        if grid_w > layout.sheet_width || grid_h > layout.sheet_height {
            return Err(invalid(
                "paper_width_mm",
                format!(
                    "{}x{} grid needs {grid_w}x{grid_h}px but the sheet is {}x{}px",
                    self.grid_columns, self.grid_rows, layout.sheet_width, layout.sheet_height
                ),
            ));
        }

        Ok(())
    }
}

/// Pixel geometry derived from an `EditorConfig`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintLayout {
    pub dpi: u32,
    pub photo_width: u32,
    pub photo_height: u32,
    pub sheet_width: u32,
    pub sheet_height: u32,
    pub gap: u32,
    pub columns: u32,
    pub rows: u32,
}

impl PrintLayout {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            dpi: config.dpi,
            photo_width: mm_to_px(config.photo_width_mm, config.dpi),
            photo_height: mm_to_px(config.photo_height_mm, config.dpi),
            sheet_width: mm_to_px(config.paper_width_mm, config.dpi),
            sheet_height: mm_to_px(config.paper_height_mm, config.dpi),
            gap: config.cell_gap_px,
            columns: config.grid_columns,
            rows: config.grid_rows,
        }
    }

    /// Total size of the photo grid including inner gaps.
    pub fn grid_size(&self) -> (u32, u32) {
        let w = self.columns * self.photo_width + self.columns.saturating_sub(1) * self.gap;
        let h = self.rows * self.photo_height + self.rows.saturating_sub(1) * self.gap;
        (w, h)
    }

    /// Top-left corner of the grid when centered on the sheet.
    pub fn grid_origin(&self) -> (i64, i64) {
        let (w, h) = self.grid_size();
        (
            (self.sheet_width as i64 - w as i64).div_euclid(2),
            (self.sheet_height as i64 - h as i64).div_euclid(2),
        )
    }

    /// Top-left corner of the cell at `(row, col)`.
    pub fn cell_origin(&self, row: u32, col: u32) -> (i64, i64) {
        let (x0, y0) = self.grid_origin();
        (
            x0 + (col * (self.photo_width + self.gap)) as i64,
            y0 + (row * (self.photo_height + self.gap)) as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_px_at_300_dpi() {
        assert_eq!(mm_to_px(35.0, 300), 413);
        assert_eq!(mm_to_px(45.0, 300), 531);
        assert_eq!(mm_to_px(150.0, 300), 1772);
        assert_eq!(mm_to_px(100.0, 300), 1181);
        assert_eq!(mm_to_px(25.4, 300), 300);
        assert_eq!(mm_to_px(0.0, 300), 0);
    }

    #[test]
    fn test_default_layout() {
        let layout = PrintLayout::from_config(&EditorConfig::default());
        assert_eq!((layout.photo_width, layout.photo_height), (413, 531));
        assert_eq!((layout.sheet_width, layout.sheet_height), (1772, 1181));
        assert_eq!(layout.grid_size(), (1259, 1072));
        assert_eq!(layout.grid_origin(), (256, 54));
        assert_eq!(layout.cell_origin(0, 0), (256, 54));
        assert_eq!(layout.cell_origin(1, 2), (256 + 2 * 423, 54 + 541));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EditorConfig::from_toml_str("dpi = 600\njpeg_quality = 90\n").unwrap();
        assert_eq!(config.dpi, 600);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.photo_width_mm, 35.0);
        assert_eq!(config.viewport_width, 600);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EditorConfig {
            dpi: 350,
            cell_gap_px: 12,
            ..EditorConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(EditorConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            EditorConfig::from_toml_str("dpi = \"high\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cases = [
            EditorConfig { dpi: 0, ..Default::default() },
            EditorConfig { photo_width_mm: -1.0, ..Default::default() },
            EditorConfig { fit_headroom: 0.5, ..Default::default() },
            EditorConfig { jpeg_quality: 0, ..Default::default() },
            EditorConfig { face_min_mm: 40.0, ..Default::default() },
            EditorConfig { viewport_height: 0, ..Default::default() },
            EditorConfig { grid_columns: 5, ..Default::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid { .. })),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idphoto.toml");
        std::fs::write(&path, "viewport_width = 800\n").unwrap();

        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.viewport_width, 800);

        let missing = EditorConfig::load(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_mm_to_px_is_monotonic(a in 0.0f64..500.0, b in 0.0f64..500.0, dpi in 1u32..=1200) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(mm_to_px(lo, dpi) <= mm_to_px(hi, dpi));
        }

        #[test]
        fn prop_mm_to_px_matches_formula(mm in 0.0f64..500.0, dpi in 1u32..=1200) {
            let expected = (mm * dpi as f64 / 25.4).round() as u32;
            prop_assert_eq!(mm_to_px(mm, dpi), expected);
            prop_assert_eq!(mm_to_px(mm, dpi), mm_to_px(mm, dpi));
        }

        #[test]
        fn prop_sheet_size_depends_only_on_paper(dpi in 72u32..=600) {
            let config = EditorConfig { dpi, ..Default::default() };
            let layout = PrintLayout::from_config(&config);
            prop_assert_eq!(layout.sheet_width, (150.0 * dpi as f64 / 25.4).round() as u32);
            prop_assert_eq!(layout.sheet_height, (100.0 * dpi as f64 / 25.4).round() as u32);
        }
    }
}
