use std::fmt;

use serde::Serialize;

use crate::constants::GDD_BASE_TEMP_F;

/// Growing degree days for one day: `max(0, (max + min) / 2 - base)`
pub fn growing_degree_days(temp_max: f64, temp_min: f64, base_temp: f64) -> f64 {
    let avg_temp = (temp_max + temp_min) / 2.0;
    (avg_temp - base_temp).max(0.0)
}

/// Growing degree days against the standard 50°F base
pub fn growing_degree_days_default(temp_max: f64, temp_min: f64) -> f64 {
    growing_degree_days(temp_max, temp_min, GDD_BASE_TEMP_F)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrostRisk {
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Moderate Risk")]
    ModerateRisk,
    #[serde(rename = "Low Risk")]
    LowRisk,
}

impl FrostRisk {
    pub fn label(self) -> &'static str {
        match self {
            FrostRisk::HighRisk => "High Risk",
            FrostRisk::ModerateRisk => "Moderate Risk",
            FrostRisk::LowRisk => "Low Risk",
        }
    }
}

impl fmt::Display for FrostRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assess overnight frost risk. The high-risk check must run first.
pub fn frost_risk(temp_min: f64, humidity: f64) -> FrostRisk {
    if temp_min <= 32.0 && humidity > 80.0 {
        FrostRisk::HighRisk
    } else if temp_min <= 36.0 {
        FrostRisk::ModerateRisk
    } else {
        FrostRisk::LowRisk
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IrrigationNeed {
    Low,
    Medium,
    High,
}

impl IrrigationNeed {
    pub fn label(self) -> &'static str {
        match self {
            IrrigationNeed::Low => "Low",
            IrrigationNeed::Medium => "Medium",
            IrrigationNeed::High => "High",
        }
    }
}

impl fmt::Display for IrrigationNeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Estimate irrigation need. Recent precipitation overrides everything else.
pub fn irrigation_need(humidity: f64, precipitation: f64, temp: f64) -> IrrigationNeed {
    if precipitation > 0.5 {
        IrrigationNeed::Low
    } else if humidity < 40.0 && temp > 80.0 {
        IrrigationNeed::High
    } else if humidity < 60.0 {
        IrrigationNeed::Medium
    } else {
        IrrigationNeed::Low
    }
}
