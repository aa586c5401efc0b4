//! Patient feature record sent to the prediction endpoint, plus presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Youngest accepted patient age.
pub const MIN_AGE: u32 = 1;
/// Oldest accepted patient age.
pub const MAX_AGE: u32 = 120;

/// Patient sex as understood by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            "other" | "o" => Ok(Self::Other),
            other => Err(format!("unknown sex '{other}' (expected male, female or other)")),
        }
    }
}

/// One of the five boolean risk flags on a feature record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RiskFlag {
    ChestPain,
    HighBloodPressure,
    HighCholesterol,
    Smoking,
    Diabetes,
}

impl RiskFlag {
    pub const ALL: [RiskFlag; 5] = [
        RiskFlag::ChestPain,
        RiskFlag::HighBloodPressure,
        RiskFlag::HighCholesterol,
        RiskFlag::Smoking,
        RiskFlag::Diabetes,
    ];

    /// Wire key used by the backend.
    pub fn key(self) -> &'static str {
        match self {
            Self::ChestPain => "chest_pain",
            Self::HighBloodPressure => "high_bp",
            Self::HighCholesterol => "high_cholesterol",
            Self::Smoking => "smoking",
            Self::Diabetes => "diabetes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ChestPain => "Chest Pain",
            Self::HighBloodPressure => "High Blood Pressure",
            Self::HighCholesterol => "High Cholesterol",
            Self::Smoking => "Smoking",
            Self::Diabetes => "Diabetes",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ChestPain => "Experiencing chest pain or discomfort",
            Self::HighBloodPressure => "History of hypertension",
            Self::HighCholesterol => "Elevated cholesterol levels",
            Self::Smoking => "Current or former smoker",
            Self::Diabetes => "Diagnosed with diabetes",
        }
    }
}

/// Validated patient attributes, serialized exactly as the backend expects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub age: u32,
    pub sex: Sex,
    pub chest_pain: bool,
    pub high_bp: bool,
    pub high_cholesterol: bool,
    pub smoking: bool,
    pub diabetes: bool,
}

impl FeatureRecord {
    pub fn flag(&self, flag: RiskFlag) -> bool {
        match flag {
            RiskFlag::ChestPain => self.chest_pain,
            RiskFlag::HighBloodPressure => self.high_bp,
            RiskFlag::HighCholesterol => self.high_cholesterol,
            RiskFlag::Smoking => self.smoking,
            RiskFlag::Diabetes => self.diabetes,
        }
    }

    pub fn set_flag(&mut self, flag: RiskFlag, value: bool) {
        let slot = match flag {
            RiskFlag::ChestPain => &mut self.chest_pain,
            RiskFlag::HighBloodPressure => &mut self.high_bp,
            RiskFlag::HighCholesterol => &mut self.high_cholesterol,
            RiskFlag::Smoking => &mut self.smoking,
            RiskFlag::Diabetes => &mut self.diabetes,
        };
        *slot = value;
    }

    fn with_all_flags(age: u32, sex: Sex, value: bool) -> Self {
        Self {
            age,
            sex,
            chest_pain: value,
            high_bp: value,
            high_cholesterol: value,
            smoking: value,
            diabetes: value,
        }
    }
}

impl Default for FeatureRecord {
    /// The record the form starts from and returns to on reset.
    fn default() -> Self {
        Self::with_all_flags(45, Sex::Male, false)
    }
}

/// Canned records offered next to the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    LowRisk,
    HighRisk,
}

impl Preset {
    pub fn record(self) -> FeatureRecord {
        match self {
            Self::LowRisk => FeatureRecord::with_all_flags(25, Sex::Female, false),
            Self::HighRisk => FeatureRecord::with_all_flags(65, Sex::Male, true),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LowRisk => "Try Low Risk",
            Self::HighRisk => "Try High Risk",
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" | "low-risk" => Ok(Self::LowRisk),
            "high" | "high-risk" => Ok(Self::HighRisk),
            other => Err(format!("unknown preset '{other}' (expected low or high)")),
        }
    }
}

/// True when `age` falls in the accepted inclusive range.
pub fn age_in_range(age: u32) -> bool {
    (MIN_AGE..=MAX_AGE).contains(&age)
}
