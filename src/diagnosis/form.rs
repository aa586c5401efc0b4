//! Editable form values and the validation that turns them into a feature record.

use super::features::{FeatureRecord, MAX_AGE, MIN_AGE, Preset, RiskFlag, Sex, age_in_range};

/// Field identifiers that can carry a validation error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Age,
    Sex,
}

/// Per-field validation messages; `None` means the field is fine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub age: Option<String>,
    pub sex: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.sex.is_none()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Age => self.age.as_deref(),
            FormField::Sex => self.sex.as_deref(),
        }
    }

    fn clear(&mut self, field: FormField) {
        match field {
            FormField::Age => self.age = None,
            FormField::Sex => self.sex = None,
        }
    }
}

/// Raw form values. Unlike [`FeatureRecord`], sex may be unselected and age
/// may be out of range until validation runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormValues {
    pub age: u32,
    pub sex: Option<Sex>,
    pub chest_pain: bool,
    pub high_bp: bool,
    pub high_cholesterol: bool,
    pub smoking: bool,
    pub diabetes: bool,
}

impl From<FeatureRecord> for FormValues {
    fn from(record: FeatureRecord) -> Self {
        Self {
            age: record.age,
            sex: Some(record.sex),
            chest_pain: record.chest_pain,
            high_bp: record.high_bp,
            high_cholesterol: record.high_cholesterol,
            smoking: record.smoking,
            diabetes: record.diabetes,
        }
    }
}

impl Default for FormValues {
    fn default() -> Self {
        FeatureRecord::default().into()
    }
}

impl FormValues {
    pub fn flag(&self, flag: RiskFlag) -> bool {
        match flag {
            RiskFlag::ChestPain => self.chest_pain,
            RiskFlag::HighBloodPressure => self.high_bp,
            RiskFlag::HighCholesterol => self.high_cholesterol,
            RiskFlag::Smoking => self.smoking,
            RiskFlag::Diabetes => self.diabetes,
        }
    }

    fn flag_mut(&mut self, flag: RiskFlag) -> &mut bool {
        match flag {
            RiskFlag::ChestPain => &mut self.chest_pain,
            RiskFlag::HighBloodPressure => &mut self.high_bp,
            RiskFlag::HighCholesterol => &mut self.high_cholesterol,
            RiskFlag::Smoking => &mut self.smoking,
            RiskFlag::Diabetes => &mut self.diabetes,
        }
    }

    /// Check every field, returning the record or all field errors at once.
    pub fn validate(&self) -> Result<FeatureRecord, FieldErrors> {
        let mut errors = FieldErrors::default();
        if !age_in_range(self.age) {
            errors.age = Some(format!("Age must be between {MIN_AGE} and {MAX_AGE}"));
        }
        if self.sex.is_none() {
            errors.sex = Some("Please select a sex".to_string());
        }
        match self.sex {
            Some(sex) if errors.is_empty() => Ok(FeatureRecord {
                age: self.age,
                sex,
                chest_pain: self.chest_pain,
                high_bp: self.high_bp,
                high_cholesterol: self.high_cholesterol,
                smoking: self.smoking,
                diabetes: self.diabetes,
            }),
            _ => Err(errors),
        }
    }
}

/// Form values plus the errors from the last validation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: FormValues,
    pub errors: FieldErrors,
}

impl FormState {
    pub fn set_age(&mut self, age: u32) {
        self.values.age = age;
        self.errors.clear(FormField::Age);
    }

    pub fn set_sex(&mut self, sex: Option<Sex>) {
        self.values.sex = sex;
        self.errors.clear(FormField::Sex);
    }

    pub fn set_flag(&mut self, flag: RiskFlag, value: bool) {
        *self.values.flag_mut(flag) = value;
    }

    /// Validate and store the outcome's errors on the form.
    pub fn validate(&mut self) -> Option<FeatureRecord> {
        match self.values.validate() {
            Ok(record) => {
                self.errors = FieldErrors::default();
                Some(record)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        self.values = preset.record().into();
        self.errors = FieldErrors::default();
    }

    /// Restore the default record and drop any errors.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
