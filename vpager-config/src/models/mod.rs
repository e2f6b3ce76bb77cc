pub mod indicator;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::constants::pager as defaults;
use crate::error::ConfigError;
use indicator::{IndicatorConfig, IndicatorMount, IndicatorStyle};

/// Raw pager options as supplied by the embedder.
///
/// `pageIndicator` is kept untyped here so that an indicator map of the
/// wrong shape can be reported and skipped instead of failing the whole
/// load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagerOptions {
    #[serde(
        default,
        deserialize_with = "deserialize_whole_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub cache_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_indicator: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_indicator_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page_indicator_color: Option<String>,
}

/// Integers pass through; floats such as `3.0` are truncated toward zero.
fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    let raw: Option<Number> = Option::deserialize(deserializer)?;
    Ok(raw.map(|number| match number {
        Number::Int(value) => value,
        Number::Float(value) => value as i64,
    }))
}

/// Non-fatal problems found while normalizing options. Each one names an
/// option that was ignored; the previous or default value stays in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub option: &'static str,
    pub message: String,
}

impl ConfigWarning {
    fn new(option: &'static str, err: &ConfigError) -> Self {
        Self {
            option,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ignored: {}", self.option, self.message)
    }
}

/// Normalized pager configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PagerSettings {
    pub cache_size: usize,
    /// Style used by the indicator. Colors set while no indicator is mounted
    /// are kept here and picked up when one is configured later.
    pub style: IndicatorStyle,
    pub indicator: Option<IndicatorMount>,
}

impl Default for PagerSettings {
    fn default() -> Self {
        Self {
            cache_size: defaults::DEFAULT_CACHE_SIZE,
            style: IndicatorStyle::default(),
            indicator: None,
        }
    }
}

/// Clamp a requested cache size to the supported minimum.
pub fn clamp_cache_size(requested: i64) -> usize {
    usize::try_from(requested)
        .unwrap_or(0)
        .max(defaults::MIN_CACHE_SIZE)
}

impl PagerOptions {
    /// Normalize on top of `base`.
    ///
    /// Options are applied in a fixed order: cache size, then the
    /// `pageIndicator` map, then the top-level colors. The top-level colors
    /// therefore win over colors given inside `pageIndicator`.
    pub fn apply_to(
        &self,
        base: PagerSettings,
    ) -> (PagerSettings, Vec<ConfigWarning>) {
        let mut settings = base;
        let mut warnings = Vec::new();

        if let Some(requested) = self.cache_size {
            settings.cache_size = clamp_cache_size(requested);
            if settings.cache_size as i64 != requested {
                log::debug!(
                    "cacheSize {} clamped to {}",
                    requested,
                    settings.cache_size
                );
            }
        }

        if let Some(raw) = &self.page_indicator {
            match IndicatorConfig::from_value(raw.clone())
                .and_then(|cfg| cfg.resolve(&settings.style))
            {
                Ok((style, mount)) => {
                    settings.style = style;
                    settings.indicator = Some(mount);
                }
                Err(err) => {
                    warnings.push(ConfigWarning::new("pageIndicator", &err))
                }
            }
        }

        apply_color(
            "pageIndicatorColor",
            self.page_indicator_color.as_deref(),
            &mut settings.style.inactive_color,
            &mut warnings,
        );
        apply_color(
            "currentPageIndicatorColor",
            self.current_page_indicator_color.as_deref(),
            &mut settings.style.active_color,
            &mut warnings,
        );

        for warning in &warnings {
            log::warn!("{warning}");
        }

        (settings, warnings)
    }

    pub fn into_settings(self) -> (PagerSettings, Vec<ConfigWarning>) {
        self.apply_to(PagerSettings::default())
    }
}

fn apply_color(
    option: &'static str,
    raw: Option<&str>,
    target: &mut Color,
    warnings: &mut Vec<ConfigWarning>,
) {
    let Some(raw) = raw else { return };
    match raw.parse::<Color>() {
        Ok(color) => *target = color,
        Err(err) => warnings.push(ConfigWarning::new(option, &err)),
    }
}
