//! Page indicator configuration.
//!
//! [`IndicatorConfig`] is the raw, wire-shaped option map (`pageIndicator` on
//! the pager). [`IndicatorConfig::resolve`] validates it against the style
//! currently in effect and produces the normalized [`IndicatorStyle`] and
//! [`IndicatorMount`] the renderer consumes.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::constants::indicator as defaults;
use crate::error::ConfigError;

/// Which axis the dots are laid out along. Mirrors the `type` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// `type: 0`
    #[default]
    Horizontal,
    /// `type: 1`
    Vertical,
}

impl TryFrom<i64> for IndicatorKind {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Horizontal),
            1 => Ok(Self::Vertical),
            other => Err(ConfigError::UnknownIndicatorType(other)),
        }
    }
}

/// Dot layout strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorLayout {
    /// One evenly spaced dot per page, whatever the page count.
    Full,
    /// One dot per page up to the window size, then a sliding window
    /// centered on the current page.
    #[default]
    Condensed,
}

impl std::str::FromStr for IndicatorLayout {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "condensed" => Ok(Self::Condensed),
            _ => Err(ConfigError::UnknownLayout(s.to_string())),
        }
    }
}

/// Validated visual style for the dot indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorStyle {
    pub normal_dot_size: f32,
    pub active_dot_size: f32,
    pub min_dot_size: f32,
    pub dot_spacing: f32,
    pub inactive_color: Color,
    pub active_color: Color,
    pub layout: IndicatorLayout,
    pub window_slots: usize,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            normal_dot_size: defaults::NORMAL_DOT_SIZE,
            active_dot_size: defaults::ACTIVE_DOT_SIZE,
            min_dot_size: defaults::MIN_DOT_SIZE,
            dot_spacing: defaults::DOT_SPACING,
            inactive_color: defaults::INACTIVE_COLOR,
            active_color: defaults::ACTIVE_COLOR,
            layout: IndicatorLayout::default(),
            window_slots: defaults::WINDOW_SLOTS,
        }
    }
}

impl IndicatorStyle {
    /// Distance between the centers of two adjacent dots.
    #[inline]
    pub fn stride(&self) -> f32 {
        self.active_dot_size * 2.0 + self.dot_spacing
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("normalDotSize", self.normal_dot_size)?;
        positive("activeDotSize", self.active_dot_size)?;
        positive("minDotSize", self.min_dot_size)?;
        positive("dotSpacing", self.dot_spacing)?;
        if self.window_slots == 0 || self.window_slots % 2 == 0 {
            return Err(ConfigError::InvalidWindow(self.window_slots));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDimension { field, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAnchor {
    Left(i32),
    Right(i32),
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAnchor {
    Top(i32),
    Bottom(i32),
}

/// Where the indicator sits inside the pager's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorPlacement {
    pub horizontal: HorizontalAnchor,
    pub vertical: VerticalAnchor,
}

impl Default for IndicatorPlacement {
    fn default() -> Self {
        Self {
            horizontal: HorizontalAnchor::Center,
            vertical: VerticalAnchor::Bottom(defaults::DEFAULT_BOTTOM_MARGIN),
        }
    }
}

/// A configured indicator: what kind it is and where it goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndicatorMount {
    pub kind: IndicatorKind,
    pub placement: IndicatorPlacement,
}

/// Raw `pageIndicator` options as they arrive from the embedder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_indicator_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page_indicator_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_dot_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_dot_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_dot_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot_spacing: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<i32>,
}

impl IndicatorConfig {
    /// Parse from an untyped value. Anything that is not an object of the
    /// expected shape is rejected as malformed.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::Malformed {
                what: "pageIndicator",
                reason: format!("expected an object, got {value}"),
            });
        }
        serde_json::from_value(value).map_err(|e| ConfigError::Malformed {
            what: "pageIndicator",
            reason: e.to_string(),
        })
    }

    /// Validate against the style currently in effect.
    ///
    /// Fields left unset keep the value from `current`. Placement is always
    /// recomputed from this config alone. On error nothing is applied.
    pub fn resolve(
        &self,
        current: &IndicatorStyle,
    ) -> Result<(IndicatorStyle, IndicatorMount), ConfigError> {
        let kind = match self.kind {
            Some(raw) => IndicatorKind::try_from(raw)?,
            None => IndicatorKind::default(),
        };

        let mut style = *current;
        if let Some(raw) = &self.page_indicator_color {
            style.inactive_color = raw.parse()?;
        }
        if let Some(raw) = &self.current_page_indicator_color {
            style.active_color = raw.parse()?;
        }
        if let Some(v) = self.normal_dot_size {
            style.normal_dot_size = v;
        }
        if let Some(v) = self.active_dot_size {
            style.active_dot_size = v;
        }
        if let Some(v) = self.min_dot_size {
            style.min_dot_size = v;
        }
        if let Some(v) = self.dot_spacing {
            style.dot_spacing = v;
        }
        if let Some(raw) = &self.layout {
            style.layout = raw.parse()?;
        }
        style.validate()?;

        Ok((
            style,
            IndicatorMount {
                kind,
                placement: self.placement(),
            },
        ))
    }

    /// `left` wins over `right` and `top` over `bottom`.
    pub fn placement(&self) -> IndicatorPlacement {
        let horizontal = match (self.left, self.right) {
            (Some(m), _) => HorizontalAnchor::Left(m),
            (None, Some(m)) => HorizontalAnchor::Right(m),
            (None, None) => HorizontalAnchor::Center,
        };
        let vertical = match (self.top, self.bottom) {
            (Some(m), _) => VerticalAnchor::Top(m),
            (None, Some(m)) => VerticalAnchor::Bottom(m),
            (None, None) => {
                VerticalAnchor::Bottom(defaults::DEFAULT_BOTTOM_MARGIN)
            }
        };
        IndicatorPlacement {
            horizontal,
            vertical,
        }
    }
}
