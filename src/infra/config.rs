//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. CONFIG_FILE environment variable
//! 3. Default: config/dev.toml
//!
//! Every section is optional. Defaults reproduce the reference warehouse:
//! crossover lines at Y = 109, 1895, 3025, 3885 and a divisor of 12
//! (inches to feet).

use crate::domain::CategoryKey;
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal corridors used to cross between aisles, in evaluation order
    #[serde(default = "default_crossover_y")]
    pub crossover_y: Vec<f64>,
    /// Raw coordinate units per reported distance unit
    #[serde(default = "default_distance_divisor")]
    pub distance_divisor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { crossover_y: default_crossover_y(), distance_divisor: default_distance_divisor() }
    }
}

fn default_crossover_y() -> Vec<f64> {
    vec![109.0, 1895.0, 3025.0, 3885.0]
}

fn default_distance_divisor() -> f64 {
    12.0
}

/// Column names of the layout table
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutColumns {
    #[serde(default = "default_col_layout_item")]
    pub item: String,
    #[serde(default = "default_col_slot")]
    pub slot: String,
    #[serde(default = "default_col_x")]
    pub x: String,
    #[serde(default = "default_col_y")]
    pub y: String,
    #[serde(default = "default_col_pick_seq")]
    pub pick_seq: String,
}

impl Default for LayoutColumns {
    fn default() -> Self {
        Self {
            item: default_col_layout_item(),
            slot: default_col_slot(),
            x: default_col_x(),
            y: default_col_y(),
            pick_seq: default_col_pick_seq(),
        }
    }
}

fn default_col_layout_item() -> String {
    "Current_Prime_Item".to_string()
}

fn default_col_slot() -> String {
    "Slot_ID".to_string()
}

fn default_col_x() -> String {
    "X".to_string()
}

fn default_col_y() -> String {
    "Y".to_string()
}

fn default_col_pick_seq() -> String {
    "Pick_Seq".to_string()
}

/// Column names of the pick table. `trip_category` and `pick_slot` are
/// optional in the data; the others are required.
#[derive(Debug, Clone, Deserialize)]
pub struct PickColumns {
    #[serde(default = "default_col_trip")]
    pub trip: String,
    #[serde(default = "default_col_pick_item")]
    pub item: String,
    #[serde(default = "default_col_trip_type")]
    pub trip_type: String,
    #[serde(default = "default_col_whse_area")]
    pub whse_area: String,
    #[serde(default = "default_col_trip_category")]
    pub trip_category: String,
    #[serde(default = "default_col_pick_slot")]
    pub pick_slot: String,
}

impl Default for PickColumns {
    fn default() -> Self {
        Self {
            trip: default_col_trip(),
            item: default_col_pick_item(),
            trip_type: default_col_trip_type(),
            whse_area: default_col_whse_area(),
            trip_category: default_col_trip_category(),
            pick_slot: default_col_pick_slot(),
        }
    }
}

fn default_col_trip() -> String {
    "Trip".to_string()
}

fn default_col_pick_item() -> String {
    "Item".to_string()
}

fn default_col_trip_type() -> String {
    "Trip_Type".to_string()
}

fn default_col_whse_area() -> String {
    "Whse_Area".to_string()
}

fn default_col_trip_category() -> String {
    "Trip_Category".to_string()
}

fn default_col_pick_slot() -> String {
    "Pick_Slot".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ColumnsConfig {
    #[serde(default)]
    pub layout: LayoutColumns,
    #[serde(default)]
    pub picks: PickColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// Trip type excluded from analysis
    #[serde(default = "default_full_pull_label")]
    pub full_pull_label: String,
    /// Only records in this warehouse area are analyzed
    #[serde(default = "default_storage_label")]
    pub storage_label: String,
    /// Trips touching any of these pick slots are dropped entirely
    #[serde(default = "default_excluded_pick_slots")]
    pub excluded_pick_slots: Vec<String>,
    /// Trip categories dropped from reporting
    #[serde(default = "default_excluded_categories")]
    pub excluded_categories: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            full_pull_label: default_full_pull_label(),
            storage_label: default_storage_label(),
            excluded_pick_slots: default_excluded_pick_slots(),
            excluded_categories: default_excluded_categories(),
        }
    }
}

fn default_full_pull_label() -> String {
    "Full Pull".to_string()
}

fn default_storage_label() -> String {
    "Storage".to_string()
}

fn default_excluded_pick_slots() -> Vec<String> {
    vec!["PP09".to_string(), "PP10".to_string()]
}

fn default_excluded_categories() -> Vec<String> {
    vec!["Full Pull trip".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_group_by")]
    pub group_by: CategoryKey,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { output_dir: default_output_dir(), group_by: default_group_by() }
    }
}

fn default_output_dir() -> String {
    "warehouse_analysis_results".to_string()
}

fn default_group_by() -> CategoryKey {
    CategoryKey::TripCategory
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_render_enabled")]
    pub enabled: bool,
    /// Image width in pixels
    #[serde(default = "default_render_width")]
    pub width: u32,
    /// Image height in pixels
    #[serde(default = "default_render_height")]
    pub height: u32,
    /// Blank border around the drawing, in pixels
    #[serde(default = "default_render_margin")]
    pub margin: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            enabled: default_render_enabled(),
            width: default_render_width(),
            height: default_render_height(),
            margin: default_render_margin(),
        }
    }
}

fn default_render_enabled() -> bool {
    true
}

fn default_render_width() -> u32 {
    1200
}

fn default_render_height() -> u32 {
    1600
}

fn default_render_margin() -> u32 {
    40
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    layout: LayoutConfig,
    layout_columns: LayoutColumns,
    pick_columns: PickColumns,
    filter: FilterConfig,
    output_dir: String,
    group_by: CategoryKey,
    render: RenderConfig,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            layout: toml_config.layout,
            layout_columns: toml_config.columns.layout,
            pick_columns: toml_config.columns.picks,
            filter: toml_config.filter,
            output_dir: toml_config.report.output_dir,
            group_by: toml_config.report.group_by,
            render: toml_config.render,
            config_file,
        }
    }

    /// Determine config file path: explicit flag, then CONFIG_FILE, then
    /// `config/dev.toml`
    pub fn resolve_config_path(cli: Option<&str>) -> String {
        if let Some(path) = cli {
            return path.to_string();
        }

        if let Ok(path) = env::var("CONFIG_FILE") {
            return path;
        }

        "config/dev.toml".to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        anyhow::ensure!(
            toml_config.layout.distance_divisor > 0.0,
            "layout.distance_divisor must be positive in {}",
            path.display()
        );

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Load configuration - tries TOML file first, falls back to defaults
    pub fn load(cli: Option<&str>) -> Self {
        Self::load_from_path(Self::resolve_config_path(cli))
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{:#}", e), "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    pub fn crossover_y(&self) -> &[f64] {
        &self.layout.crossover_y
    }

    pub fn distance_divisor(&self) -> f64 {
        self.layout.distance_divisor
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn layout_columns(&self) -> &LayoutColumns {
        &self.layout_columns
    }

    pub fn pick_columns(&self) -> &PickColumns {
        &self.pick_columns
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn full_pull_label(&self) -> &str {
        &self.filter.full_pull_label
    }

    pub fn storage_label(&self) -> &str {
        &self.filter.storage_label
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn group_by(&self) -> CategoryKey {
        self.group_by
    }

    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method to override the output directory (CLI flag)
    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Builder method to override the category grouping (CLI flag)
    pub fn with_group_by(mut self, group_by: CategoryKey) -> Self {
        self.group_by = group_by;
        self
    }

    /// Builder method to turn route rendering off (CLI flag)
    pub fn without_render(mut self) -> Self {
        self.render.enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.crossover_y(), &[109.0, 1895.0, 3025.0, 3885.0]);
        assert_eq!(config.distance_divisor(), 12.0);
        assert_eq!(config.full_pull_label(), "Full Pull");
        assert_eq!(config.storage_label(), "Storage");
        assert_eq!(config.filter().excluded_pick_slots, vec!["PP09", "PP10"]);
        assert_eq!(config.output_dir(), "warehouse_analysis_results");
        assert_eq!(config.group_by(), CategoryKey::TripCategory);
        assert_eq!(config.config_file(), "default");
    }

    #[test]
    fn test_default_columns() {
        let config = Config::default();
        let layout = config.layout_columns();
        assert_eq!(layout.item, "Current_Prime_Item");
        assert_eq!(layout.slot, "Slot_ID");
        assert_eq!(layout.pick_seq, "Pick_Seq");
        let picks = config.pick_columns();
        assert_eq!(picks.trip, "Trip");
        assert_eq!(picks.whse_area, "Whse_Area");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
[layout]
distance_divisor = 1.0

[report]
group_by = "whse_area"
"#,
        )
        .unwrap();
        let config = Config::from_toml(toml_config, "inline".to_string());
        assert_eq!(config.distance_divisor(), 1.0);
        assert_eq!(config.crossover_y().len(), 4);
        assert_eq!(config.group_by(), CategoryKey::WhseArea);
        assert_eq!(config.render().width, 1200);
    }

    #[test]
    fn test_resolve_config_path_prefers_flag() {
        assert_eq!(Config::resolve_config_path(Some("config/site.toml")), "config/site.toml");
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_output_dir("out")
            .with_group_by(CategoryKey::WhseArea)
            .without_render();
        assert_eq!(config.output_dir(), "out");
        assert_eq!(config.group_by(), CategoryKey::WhseArea);
        assert!(!config.render().enabled);
    }
}
