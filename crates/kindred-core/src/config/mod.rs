//! Chart options and the JSON layering used to assemble them.
//!
//! Options are merged as plain JSON objects (defaults ← config file ← command-line flags) and
//! only then deserialized into [`ChartOptions`], so a layer may set any subset of keys.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

pub const MIN_GENERATIONS: u32 = 2;
pub const MAX_GENERATIONS: u32 = 25;
pub const DEFAULT_GENERATIONS: u32 = 4;

/// Placeholder substituted with the individual's xref in [`ChartOptions::individual_url`].
pub const XREF_PLACEHOLDER: &str = "{xref}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutDirection {
    TopBottom,
    BottomTop,
    #[default]
    LeftRight,
    RightLeft,
}

impl LayoutDirection {
    pub const ALL: [LayoutDirection; 4] = [
        LayoutDirection::TopBottom,
        LayoutDirection::BottomTop,
        LayoutDirection::LeftRight,
        LayoutDirection::RightLeft,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutDirection::TopBottom => "top-bottom",
            LayoutDirection::BottomTop => "bottom-top",
            LayoutDirection::LeftRight => "left-right",
            LayoutDirection::RightLeft => "right-left",
        }
    }
}

impl fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top-bottom" | "tb" => Ok(Self::TopBottom),
            "bottom-top" | "bt" => Ok(Self::BottomTop),
            "left-right" | "lr" => Ok(Self::LeftRight),
            "right-left" | "rl" => Ok(Self::RightLeft),
            other => Err(Error::UnknownLayout {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    /// Number of generations to show, the root individual included.
    pub generations: u32,
    pub layout: LayoutDirection,
    /// Replace every spouse by a placeholder slot (families keep their own slot).
    pub hide_spouses: bool,
    /// Honoured by the host when it assembles the name parts of each record.
    pub show_married_names: bool,
    /// Render the alternative name line; vertical layouts grow their boxes for it.
    pub show_alternative_name: bool,
    pub open_new_tab_on_click: bool,
    /// Link target for person boxes, with `{xref}` replaced by the individual's xref.
    pub individual_url: Option<String>,
    /// Right-to-left document direction (affects text anchoring only).
    pub rtl: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            generations: DEFAULT_GENERATIONS,
            layout: LayoutDirection::default(),
            hide_spouses: false,
            show_married_names: false,
            show_alternative_name: false,
            open_new_tab_on_click: false,
            individual_url: None,
            rtl: false,
        }
    }
}

impl ChartOptions {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_GENERATIONS..=MAX_GENERATIONS).contains(&self.generations) {
            return Err(Error::GenerationsOutOfRange {
                value: self.generations,
                min: MIN_GENERATIONS,
                max: MAX_GENERATIONS,
            });
        }
        if let Some(template) = &self.individual_url {
            validate_url_template(template)?;
        }
        Ok(())
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let options: Self = serde_json::from_value(value).map_err(Error::OptionsJson)?;
        options.validate()?;
        Ok(options)
    }

    /// Merges the layers over the defaults (later layers win) and validates the result.
    pub fn from_layers<'a>(layers: impl IntoIterator<Item = &'a Value>) -> Result<Self> {
        let mut merged = OptionLayers::defaults();
        for (idx, layer) in layers.into_iter().enumerate() {
            tracing::trace!(layer = idx, "merging chart option layer");
            merged.deep_merge(layer);
        }
        Self::from_value(merged.into_value())
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }

    /// Expands the link for an individual, if a URL template is configured.
    pub fn individual_href(&self, xref: &str) -> Option<String> {
        let template = self.individual_url.as_deref()?;
        if xref.is_empty() {
            return None;
        }
        Some(template.replace(XREF_PLACEHOLDER, xref))
    }
}

fn validate_url_template(template: &str) -> Result<()> {
    let invalid = |message: String| Error::InvalidUrlTemplate {
        template: template.to_string(),
        message,
    };
    if !template.contains(XREF_PLACEHOLDER) {
        return Err(invalid(format!("missing {XREF_PLACEHOLDER} placeholder")));
    }
    let sample = template.replace(XREF_PLACEHOLDER, "I1");
    match url::Url::parse(&sample) {
        Ok(_) => Ok(()),
        Err(url::ParseError::RelativeUrlWithoutBase) => url::Url::parse("http://localhost/")
            .and_then(|base| base.join(&sample))
            .map(|_| ())
            .map_err(|e| invalid(e.to_string())),
        Err(e) => Err(invalid(e.to_string())),
    }
}

/// A JSON object that option layers are merged into.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLayers(Value);

impl Default for OptionLayers {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl OptionLayers {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn defaults() -> Self {
        Self(ChartOptions::default().to_value())
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn set_value(&mut self, key: &str, value: Value) {
        // Layers can come from arbitrary JSON files; coerce non-objects so this never panics.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.0 {
            map.insert(key.to_string(), value);
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}
