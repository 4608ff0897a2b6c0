//! Health advisories derived from an AQI value.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    Bad,
    Hazardous,
    /// Negative or NaN: not a reading any band covers.
    Invalid,
}

impl AqiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for sensitive groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::Bad => "Bad",
            AqiCategory::Hazardous => "Hazardous",
            AqiCategory::Invalid => "Invalid",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            AqiCategory::Good => Color::LightGreen,
            AqiCategory::Moderate => Color::Yellow,
            AqiCategory::UnhealthyForSensitiveGroups => Color::Orange,
            AqiCategory::Unhealthy => Color::Red,
            AqiCategory::Bad => Color::Lavender,
            AqiCategory::Hazardous => Color::BurlyWood,
            AqiCategory::Invalid => Color::LightGray,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AqiCategory::Good => {
                "Air quality is good. The air pollution poses no threat. \
                 The conditions are ideal for outdoor activities."
            }
            AqiCategory::Moderate => {
                "Air quality is moderate. The air pollution poses minimal risk to exposed persons. \
                 People with respiratory diseases should limit outdoor exertion."
            }
            AqiCategory::UnhealthyForSensitiveGroups => {
                "Air quality may be unhealthy for certain groups. \
                 People with respiratory diseases should limit outdoor exertion."
            }
            AqiCategory::Unhealthy => {
                "Air quality is unhealthy. People at risk may experience health effects. \
                 Other people should limit time spent outdoors, especially when they experience \
                 symptoms such as cough or sore throat."
            }
            AqiCategory::Bad => {
                "Air quality is bad. People at risk should avoid going outside. \
                 The rest should limit outdoor activities."
            }
            AqiCategory::Hazardous => {
                "Air quality is hazardous. Those at risk should avoid going outside. \
                 Others should keep time outdoors to a minimum. \
                 All outdoor activities are discouraged."
            }
            AqiCategory::Invalid => {
                "The reported AQI value is not valid; no advisory is available."
            }
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display color tag for an advisory, named after the CSS color it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Color {
    LightGreen,
    Yellow,
    Orange,
    Red,
    Lavender,
    BurlyWood,
    LightGray,
}

impl Color {
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::LightGreen => "lightgreen",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::Red => "red",
            Color::Lavender => "lavender",
            Color::BurlyWood => "burlywood",
            Color::LightGray => "lightgray",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub category: AqiCategory,
    pub message: &'static str,
    pub color: Color,
}

impl From<AqiCategory> for Advisory {
    fn from(category: AqiCategory) -> Self {
        Self {
            category,
            message: category.message(),
            color: category.color(),
        }
    }
}

/// Map an AQI value onto its advisory band.
///
/// Bands are closed on the upper bound, so fractional values between two
/// documented integer ranges (e.g. 50.5) fall into the higher band.
pub fn classify(aqi: f64) -> Advisory {
    let category = match aqi {
        v if v.is_nan() || v < 0.0 => AqiCategory::Invalid,
        v if v <= 50.0 => AqiCategory::Good,
        v if v <= 100.0 => AqiCategory::Moderate,
        v if v <= 150.0 => AqiCategory::UnhealthyForSensitiveGroups,
        v if v <= 200.0 => AqiCategory::Unhealthy,
        v if v <= 300.0 => AqiCategory::Bad,
        _ => AqiCategory::Hazardous,
    };

    category.into()
}
