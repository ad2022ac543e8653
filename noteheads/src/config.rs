//! Configuration for black head extraction.
//!
//! [`Config`] holds every tunable in scale-normalized units: linear values
//! are fractions of the staff interline, weights are fractions of the
//! interline squared. [`Parameters`] freezes them into pixels for one sheet
//! scale.

use std::path::Path;

use anyhow::Context;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::math::{rint, Aabb};

// ============================================================================
// Enums
// ============================================================================

/// Pixel connectivity used when grouping runs into regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Only horizontal and vertical neighbours touch.
    #[default]
    Four,
    /// Diagonal neighbours touch too.
    Eight,
}

/// How the shape grade and the pitch grade combine into one grade.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeFusion {
    /// `shape * pitch`.
    #[default]
    Product,
    /// `min(shape, pitch)`.
    Minimum,
    /// `shape^ws * pitch^wp` with the weights normalized to sum to one.
    WeightedGeometricMean { shape_weight: f64, pitch_weight: f64 },
}

impl GradeFusion {
    pub fn fuse(&self, shape: f64, pitch: f64) -> f64 {
        match *self {
            GradeFusion::Product => shape * pitch,
            GradeFusion::Minimum => shape.min(pitch),
            GradeFusion::WeightedGeometricMean {
                shape_weight,
                pitch_weight,
            } => {
                let total = shape_weight + pitch_weight;
                shape.powf(shape_weight / total) * pitch.powf(pitch_weight / total)
            }
        }
    }

    pub fn validate(&self) {
        if let GradeFusion::WeightedGeometricMean {
            shape_weight,
            pitch_weight,
        } = *self
        {
            assert!(
                shape_weight >= 0.0 && pitch_weight >= 0.0,
                "fusion weights must be non-negative, got {shape_weight} and {pitch_weight}"
            );
            assert!(
                shape_weight + pitch_weight > 0.0,
                "fusion weights must not both be zero"
            );
        }
    }
}

// ============================================================================
// Config
// ============================================================================

/// Tunables of the black head builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -- Weights (fractions of interline²) ----------------------------------
    /// Lightest spot still worth considering as a head.
    pub min_head_weight: f64,
    /// Weight of one typical black head, used to estimate head counts.
    pub typical_head_weight: f64,

    // -- Lengths (fractions of interline) -----------------------------------
    /// Head diameter driving the closing disk.
    pub head_diameter: f64,
    /// Lowest mean width (weight / height) of a candidate spot.
    pub min_mean_width: f64,
    /// Widest spot that may still be a stack of heads.
    pub max_spot_width: f64,
    /// Width of the canonical head template.
    pub template_width: f64,
    /// Height of the canonical head template.
    pub template_height: f64,

    // -- Ratios ---------------------------------------------------------------
    /// Largest |dx/dy| of a spot axis for slicing it into horizontal bands.
    pub max_slope_for_direct_split: f64,
    /// Pitch offset (in pitch steps) at which the pitch grade drops to zero.
    pub max_pitch_offset: f64,
    /// Lowest composite grade of an accepted head.
    pub min_grade: f64,
    /// Beam grade from which a spot is taken as a real beam.
    pub good_beam_grade: f64,
    pub grade_fusion: GradeFusion,
    pub connectivity: Connectivity,

    // -- Debug ----------------------------------------------------------------
    /// Log per-stage timings of every system.
    pub print_watch: bool,
    /// Log the frozen parameters once.
    pub print_parameters: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_head_weight: 0.75,
            typical_head_weight: 1.33,
            head_diameter: 0.75,
            min_mean_width: 1.0,
            max_spot_width: 4.0,
            template_width: 1.15,
            template_height: 1.0,
            max_slope_for_direct_split: 0.2,
            max_pitch_offset: 0.25,
            min_grade: 0.5,
            good_beam_grade: 0.5,
            grade_fusion: GradeFusion::default(),
            connectivity: Connectivity::default(),
            print_watch: false,
            print_parameters: false,
        }
    }
}

impl Config {
    /// Parses a YAML document. Missing keys keep their default value.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yml::from_str(yaml).context("invalid heads config")?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yml::to_string(self)?)
    }

    /// Validate all parameters.
    ///
    /// # Panics
    /// Panics with a descriptive message if any parameter is out of range.
    pub fn validate(&self) {
        assert!(
            self.min_head_weight > 0.0,
            "min_head_weight must be positive, got {}",
            self.min_head_weight
        );
        assert!(
            self.typical_head_weight > 0.0,
            "typical_head_weight must be positive, got {}",
            self.typical_head_weight
        );
        assert!(
            self.head_diameter > 0.0,
            "head_diameter must be positive, got {}",
            self.head_diameter
        );
        assert!(
            self.min_mean_width >= 0.0,
            "min_mean_width must be non-negative, got {}",
            self.min_mean_width
        );
        assert!(
            self.max_spot_width > 0.0,
            "max_spot_width must be positive, got {}",
            self.max_spot_width
        );
        assert!(
            self.template_width > 0.0 && self.template_height > 0.0,
            "head template must have a positive size, got {}x{}",
            self.template_width,
            self.template_height
        );
        assert!(
            self.max_slope_for_direct_split >= 0.0,
            "max_slope_for_direct_split must be non-negative, got {}",
            self.max_slope_for_direct_split
        );
        assert!(
            self.max_pitch_offset > 0.0,
            "max_pitch_offset must be positive, got {}",
            self.max_pitch_offset
        );
        assert!(
            (0.0..=1.0).contains(&self.min_grade),
            "min_grade must be in [0, 1], got {}",
            self.min_grade
        );
        assert!(
            (0.0..=1.0).contains(&self.good_beam_grade),
            "good_beam_grade must be in [0, 1], got {}",
            self.good_beam_grade
        );
        self.grade_fusion.validate();
    }
}

// ============================================================================
// Scale
// ============================================================================

/// Sheet scale: the distance in pixels between two staff lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    interline: usize,
}

impl Scale {
    pub fn new(interline: usize) -> Self {
        assert!(interline > 0, "interline must be positive");
        Self { interline }
    }

    #[inline]
    pub fn interline(&self) -> usize {
        self.interline
    }

    /// Interline fraction to (unrounded) pixels.
    #[inline]
    pub fn to_pixels_f64(&self, fraction: f64) -> f64 {
        fraction * self.interline as f64
    }

    /// Interline fraction to pixels, rounded.
    #[inline]
    pub fn to_pixels(&self, fraction: f64) -> usize {
        rint(self.to_pixels_f64(fraction)) as usize
    }

    /// Interline² fraction to a pixel count, rounded.
    #[inline]
    pub fn area_to_pixels(&self, fraction: f64) -> usize {
        let square = (self.interline * self.interline) as f64;
        rint(fraction * square) as usize
    }

    /// Pixel count to an interline² fraction.
    #[inline]
    pub fn pixels_to_area_frac(&self, pixels: f64) -> f64 {
        pixels / (self.interline * self.interline) as f64
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Canonical head size used as the anchor box of accepted heads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadTemplate {
    pub width: usize,
    pub height: usize,
}

impl HeadTemplate {
    /// Template box centred on `center`.
    pub fn bounds_at(&self, center: DVec2) -> Aabb {
        Aabb::centered_at(center, self.width, self.height)
    }
}

/// [`Config`] resolved against a [`Scale`]. Immutable for a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub interline: usize,
    /// Head diameter in (unrounded) pixels.
    pub head_diameter: f64,
    pub min_head_weight: usize,
    pub typical_head_weight: usize,
    pub min_mean_width: f64,
    pub max_spot_width: usize,
    pub max_slope_for_direct_split: f64,
    pub max_pitch_offset: f64,
    pub min_grade: f64,
    pub good_beam_grade: f64,
    pub grade_fusion: GradeFusion,
    pub connectivity: Connectivity,
    pub template: HeadTemplate,
}

impl Parameters {
    pub fn new(config: &Config, scale: &Scale) -> Self {
        config.validate();
        let typical_head_weight = scale.area_to_pixels(config.typical_head_weight);
        assert!(
            typical_head_weight > 0,
            "typical head weight rounds to zero pixels at interline {}",
            scale.interline()
        );
        Self {
            interline: scale.interline(),
            head_diameter: scale.to_pixels_f64(config.head_diameter),
            min_head_weight: scale.area_to_pixels(config.min_head_weight),
            typical_head_weight,
            min_mean_width: scale.to_pixels_f64(config.min_mean_width),
            max_spot_width: scale.to_pixels(config.max_spot_width),
            max_slope_for_direct_split: config.max_slope_for_direct_split,
            max_pitch_offset: config.max_pitch_offset,
            min_grade: config.min_grade,
            good_beam_grade: config.good_beam_grade,
            grade_fusion: config.grade_fusion,
            connectivity: config.connectivity,
            template: HeadTemplate {
                width: scale.to_pixels(config.template_width).max(1),
                height: scale.to_pixels(config.template_height).max(1),
            },
        }
    }

    /// `rint(weight / typical head weight)`, half to even.
    pub fn estimated_head_count(&self, weight: usize) -> usize {
        rint(weight as f64 / self.typical_head_weight as f64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate();
        assert_eq!(config.connectivity, Connectivity::Four);
        assert_eq!(config.grade_fusion, GradeFusion::Product);
    }

    #[test]
    fn yaml_overrides_only_given_keys() {
        let yaml = "\
min_grade: 0.6
connectivity: eight
grade_fusion:
  weighted_geometric_mean:
    shape_weight: 2.0
    pitch_weight: 1.0
";
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(config.min_grade, 0.6);
        assert_eq!(config.connectivity, Connectivity::Eight);
        assert_eq!(
            config.grade_fusion,
            GradeFusion::WeightedGeometricMean {
                shape_weight: 2.0,
                pitch_weight: 1.0
            }
        );
        assert_eq!(config.typical_head_weight, 1.33);
    }

    #[test]
    fn yaml_roundtrip() {
        let mut config = Config::default();
        config.max_spot_width = 3.5;
        config.print_watch = true;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(Config::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = Config::from_yaml_str("min_grade: [1, 2]").unwrap_err();
        assert!(err.to_string().contains("invalid heads config"));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::from_yaml_file("/nonexistent/heads.yaml").is_err());
    }

    #[test]
    #[should_panic(expected = "min_grade")]
    fn out_of_range_grade_panics() {
        let config = Config {
            min_grade: 1.5,
            ..Config::default()
        };
        config.validate();
    }

    #[test]
    fn fusion_variants() {
        assert!((GradeFusion::Product.fuse(0.9, 0.9) - 0.81).abs() < 1e-12);
        assert_eq!(GradeFusion::Minimum.fuse(0.7, 0.4), 0.4);

        let balanced = GradeFusion::WeightedGeometricMean {
            shape_weight: 1.0,
            pitch_weight: 1.0,
        };
        assert!((balanced.fuse(0.81, 0.64) - 0.72).abs() < 1e-12);

        let shape_only = GradeFusion::WeightedGeometricMean {
            shape_weight: 1.0,
            pitch_weight: 0.0,
        };
        assert!((shape_only.fuse(0.3, 0.0) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn scale_conversions() {
        let scale = Scale::new(20);
        assert_eq!(scale.to_pixels(0.75), 15);
        assert_eq!(scale.area_to_pixels(1.33), 532);
        assert_eq!(scale.area_to_pixels(0.75), 300);
        assert!((scale.pixels_to_area_frac(400.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn parameters_freeze_pixels() {
        let params = Parameters::new(&Config::default(), &Scale::new(20));
        assert_eq!(params.typical_head_weight, 532);
        assert_eq!(params.min_head_weight, 300);
        assert_eq!(params.max_spot_width, 80);
        assert_eq!(params.min_mean_width, 20.0);
        assert_eq!(params.head_diameter, 15.0);
        assert_eq!(params.template, HeadTemplate { width: 23, height: 20 });
    }

    #[test]
    fn head_count_rounds_half_to_even() {
        let config = Config {
            typical_head_weight: 0.25,
            ..Config::default()
        };
        let params = Parameters::new(&config, &Scale::new(20));
        assert_eq!(params.typical_head_weight, 100);
        assert_eq!(params.estimated_head_count(149), 1);
        assert_eq!(params.estimated_head_count(150), 2);
        assert_eq!(params.estimated_head_count(250), 2);
        assert_eq!(params.estimated_head_count(251), 3);
        assert_eq!(params.estimated_head_count(40), 0);
    }
}
