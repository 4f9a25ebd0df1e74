//! Tool style, colors and persisted editor settings

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, anyhow, bail};
use serde::{Deserialize, Serialize};

/// RGBA color with components in `0.0..=1.0`
///
/// Deserializes from a CSS color string or an `{r, g, b, a}` object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

/// Accepted serialized forms of a color
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Css(String),
    Components {
        r: f32,
        g: f32,
        b: f32,
        #[serde(default = "opaque")]
        a: f32,
    },
}

impl TryFrom<ColorRepr> for ShapeColor {
    type Error = anyhow::Error;

    fn try_from(repr: ColorRepr) -> anyhow::Result<Self> {
        match repr {
            ColorRepr::Css(css) => css.parse(),
            ColorRepr::Components { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
        }
    }
}

impl Default for ShapeColor {
    fn default() -> Self {
        Self::rgb(1.0, 0.0, 0.0)
    }
}

impl ShapeColor {
    /// Sentinel meaning "no fill"
    pub const TRANSPARENT: ShapeColor = ShapeColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    pub fn is_transparent(self) -> bool {
        self.a <= 0.0
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }
}

impl FromStr for ShapeColor {
    type Err = anyhow::Error;

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
    /// or `transparent`.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("transparent") {
            return Ok(Self::TRANSPARENT);
        }

        if let Some(hex) = s.strip_prefix('#') {
            let digit = |i: usize| {
                u8::from_str_radix(&hex[i..i + 1], 16)
                    .with_context(|| format!("invalid hex color {s:?}"))
            };
            let byte = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .with_context(|| format!("invalid hex color {s:?}"))
            };
            if !hex.is_ascii() {
                bail!("invalid hex color {s:?}");
            }
            return match hex.len() {
                3 => Ok(Self::from_rgba8(
                    digit(0)? * 17,
                    digit(1)? * 17,
                    digit(2)? * 17,
                    255,
                )),
                6 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
                8 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
                _ => Err(anyhow!("invalid hex color {s:?}")),
            };
        }

        let (args, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest, false)
        } else {
            bail!("unsupported color {s:?}");
        };
        let args = args
            .strip_suffix(')')
            .with_context(|| format!("unterminated color {s:?}"))?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != if has_alpha { 4 } else { 3 } {
            bail!("wrong number of color components in {s:?}");
        }

        let channel = |p: &str| -> anyhow::Result<f32> {
            let v: f32 = p
                .parse()
                .with_context(|| format!("invalid color component {p:?}"))?;
            Ok((v / 255.0).clamp(0.0, 1.0))
        };
        let alpha = if has_alpha {
            let a: f32 = parts[3]
                .parse()
                .with_context(|| format!("invalid alpha {:?}", parts[3]))?;
            a.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Ok(Self::rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }
}

/// Annotation tool selected for the next pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Arrow,
    Rectangle,
    Circle,
    Line,
    Text,
    Mosaic,
    Blur,
}

impl Tool {
    /// Look up a tool by its lowercase name
    pub fn from_name(name: &str) -> Option<Tool> {
        match name {
            "arrow" => Some(Tool::Arrow),
            "rectangle" => Some(Tool::Rectangle),
            "circle" => Some(Tool::Circle),
            "line" => Some(Tool::Line),
            "text" => Some(Tool::Text),
            "mosaic" => Some(Tool::Mosaic),
            "blur" => Some(Tool::Blur),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tool::Arrow => "arrow",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
            Tool::Line => "line",
            Tool::Text => "text",
            Tool::Mosaic => "mosaic",
            Tool::Blur => "blur",
        }
    }

    /// Check if this tool produces a redaction (mosaic, blur)
    pub fn is_redaction(self) -> bool {
        matches!(self, Tool::Mosaic | Tool::Blur)
    }
}

/// Style applied to newly created annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolStyle {
    pub stroke_color: ShapeColor,
    /// `ShapeColor::TRANSPARENT` disables filling
    pub fill_color: ShapeColor,
    pub line_width: f32,
    pub font_size: f32,
    pub font_family: String,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            // #FF0000
            stroke_color: ShapeColor::rgb(1.0, 0.0, 0.0),
            // rgba(255, 0, 0, 0.3)
            fill_color: ShapeColor::rgba(1.0, 0.0, 0.0, 0.3),
            line_width: 2.0,
            font_size: 16.0,
            font_family: "Arial".to_string(),
        }
    }
}

/// Partial style update; `None` leaves the current value untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleUpdate {
    pub stroke_color: Option<ShapeColor>,
    pub fill_color: Option<ShapeColor>,
    pub line_width: Option<f32>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
}

impl ToolStyle {
    pub fn apply(&mut self, update: StyleUpdate) {
        if let Some(color) = update.stroke_color {
            self.stroke_color = color;
        }
        if let Some(color) = update.fill_color {
            self.fill_color = color;
        }
        if let Some(width) = update.line_width {
            self.line_width = width;
        }
        if let Some(size) = update.font_size {
            self.font_size = size;
        }
        if let Some(family) = update.font_family {
            self.font_family = family;
        }
    }
}

/// Encoded image format for export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
            ExportFormat::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
            ExportFormat::Webp => "image/webp",
        }
    }

    /// Guess the format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ExportFormat::Png),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            "webp" => Some(ExportFormat::Webp),
            _ => None,
        }
    }
}

/// Editor configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Style for new annotations
    #[serde(default)]
    pub style: ToolStyle,
    /// Tool active when the editor opens
    #[serde(default)]
    pub default_tool: Tool,
    /// Curvature factor for curved connectors
    #[serde(default = "default_curvature")]
    pub curvature: f32,
    /// Snap distance for alignment guides
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold: f32,
    /// Grid spacing for snap-to-grid
    #[serde(default = "default_grid_size")]
    pub grid_size: f32,
    #[serde(default)]
    pub export_format: ExportFormat,
    /// Encoder quality in `0.0..=1.0` (lossy formats only)
    #[serde(default = "default_export_quality")]
    pub export_quality: f32,
}

fn default_curvature() -> f32 {
    0.5
}

fn default_snap_threshold() -> f32 {
    5.0
}

fn default_grid_size() -> f32 {
    20.0
}

fn default_export_quality() -> f32 {
    0.95
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            style: ToolStyle::default(),
            default_tool: Tool::Arrow,
            curvature: default_curvature(),
            snap_threshold: default_snap_threshold(),
            grid_size: default_grid_size(),
            export_format: ExportFormat::Png,
            export_quality: default_export_quality(),
        }
    }
}

impl EditorConfig {
    /// Application directory name under the platform config dir
    pub const ID: &'static str = "markpea";

    /// Default location of the config file
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {err:#}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {err:#}");
        }
    }

    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        let red: ShapeColor = "#FF0000".parse().unwrap();
        assert_eq!(red.to_rgba_u8(), [255, 0, 0, 255]);
        let short: ShapeColor = "#0f0".parse().unwrap();
        assert_eq!(short.to_rgba_u8(), [0, 255, 0, 255]);
        let with_alpha: ShapeColor = "#0000ff80".parse().unwrap();
        assert_eq!(with_alpha.to_rgba_u8(), [0, 0, 255, 128]);
        assert!("#12345".parse::<ShapeColor>().is_err());
        assert!("#zzzzzz".parse::<ShapeColor>().is_err());
    }

    #[test]
    fn test_parse_functional_colors() {
        let fill: ShapeColor = "rgba(255, 0, 0, 0.3)".parse().unwrap();
        assert_eq!(fill.to_rgba_u8(), [255, 0, 0, 77]);
        let gray: ShapeColor = "rgb(128,128,128)".parse().unwrap();
        assert_eq!(gray.to_rgba_u8(), [128, 128, 128, 255]);
        assert!("rgb(1, 2)".parse::<ShapeColor>().is_err());
        assert!("hsl(0, 0%, 0%)".parse::<ShapeColor>().is_err());
    }

    #[test]
    fn test_transparent_sentinel() {
        let c: ShapeColor = "transparent".parse().unwrap();
        assert!(c.is_transparent());
        assert!(!ToolStyle::default().fill_color.is_transparent());
    }

    #[test]
    fn test_tool_names_round_trip() {
        for tool in [
            Tool::Arrow,
            Tool::Rectangle,
            Tool::Circle,
            Tool::Line,
            Tool::Text,
            Tool::Mosaic,
            Tool::Blur,
        ] {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(Tool::from_name("pencil"), None);
    }

    #[test]
    fn test_style_update_is_partial() {
        let mut style = ToolStyle::default();
        style.apply(StyleUpdate {
            line_width: Some(6.0),
            font_family: Some("Mono".to_string()),
            ..Default::default()
        });
        assert_eq!(style.line_width, 6.0);
        assert_eq!(style.font_family, "Mono");
        assert_eq!(style.stroke_color, ToolStyle::default().stroke_color);
        assert_eq!(style.font_size, 16.0);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: EditorConfig = serde_json::from_str(r#"{"grid_size": 8.0}"#).unwrap();
        assert_eq!(config.grid_size, 8.0);
        assert_eq!(config.curvature, 0.5);
        assert_eq!(config.export_quality, 0.95);
        assert_eq!(config.default_tool, Tool::Arrow);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = EditorConfig::default();
        config.default_tool = Tool::Mosaic;
        config.export_format = ExportFormat::Webp;
        config.save_to(&path).unwrap();
        assert_eq!(EditorConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_config_accepts_css_colors() {
        let config: EditorConfig = serde_json::from_str(
            r##"{"style": {"stroke_color": "#00ff00", "fill_color": "transparent", "line_width": 4}}"##,
        )
        .unwrap();
        assert_eq!(config.style.stroke_color.to_rgba_u8(), [0, 255, 0, 255]);
        assert!(config.style.fill_color.is_transparent());
        assert_eq!(config.style.line_width, 4.0);
        assert_eq!(config.style.font_size, 16.0);

        let update: StyleUpdate =
            serde_json::from_str(r#"{"fill_color": "rgba(255, 0, 0, 0.3)"}"#).unwrap();
        assert_eq!(update.fill_color.unwrap().to_rgba_u8(), [255, 0, 0, 77]);

        let object: ShapeColor = serde_json::from_str(r#"{"r": 0, "g": 0, "b": 1}"#).unwrap();
        assert_eq!(object, ShapeColor::rgb(0.0, 0.0, 1.0));
        assert!(serde_json::from_str::<ShapeColor>(r#""chartreuse-ish""#).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_extension("JPG"), Some(ExportFormat::Jpeg));
        assert_eq!(ExportFormat::from_extension("webp"), Some(ExportFormat::Webp));
        assert_eq!(ExportFormat::from_extension("gif"), None);
    }
}
