//! Shared domain types for the heart-failure pipeline and service.

use serde::{Deserialize, Serialize};

/// Number of clinical feature columns (the CSV carries these plus the label).
pub const NUM_FEATURES: usize = 12;

/// Feature column names in CSV and feature-vector order.
///
/// Every place that turns a record into a numeric row must follow this
/// ordering: the loader, the scaler, the service payload, and the ranking
/// report all index into it.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "age",
    "anaemia",
    "creatinine_phosphokinase",
    "diabetes",
    "ejection_fraction",
    "high_blood_pressure",
    "platelets",
    "serum_creatinine",
    "serum_sodium",
    "sex",
    "smoking",
    "time",
];

/// One row of the heart-failure clinical records dataset.
///
/// All fields are required; the loader rejects rows with missing values.
/// Binary flags are 0/1. Numeric ranges are not enforced (matching the
/// source data contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    /// Age in years (dataset contains fractional ages).
    pub age: f64,
    /// Anaemia: 0 = no, 1 = yes.
    pub anaemia: u8,
    /// Creatinine phosphokinase level (mcg/L).
    pub creatinine_phosphokinase: u32,
    /// Diabetes: 0 = no, 1 = yes.
    pub diabetes: u8,
    /// Ejection fraction (%).
    pub ejection_fraction: u32,
    /// High blood pressure: 0 = no, 1 = yes.
    pub high_blood_pressure: u8,
    /// Platelet count (kiloplatelets/mL).
    pub platelets: f64,
    /// Serum creatinine (mg/dL).
    pub serum_creatinine: f64,
    /// Serum sodium (mEq/L).
    pub serum_sodium: i32,
    /// Sex: 0 = female, 1 = male.
    pub sex: u8,
    /// Smoking: 0 = no, 1 = yes.
    pub smoking: u8,
    /// Follow-up period (days).
    pub time: u32,
    /// Outcome label: 1 = death during follow-up.
    #[serde(rename = "DEATH_EVENT")]
    pub death_event: u8,
}

impl ClinicalRecord {
    /// Feature vector in [`FEATURE_NAMES`] order (label excluded).
    pub fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.age,
            f64::from(self.anaemia),
            f64::from(self.creatinine_phosphokinase),
            f64::from(self.diabetes),
            f64::from(self.ejection_fraction),
            f64::from(self.high_blood_pressure),
            self.platelets,
            self.serum_creatinine,
            f64::from(self.serum_sodium),
            f64::from(self.sex),
            f64::from(self.smoking),
            f64::from(self.time),
        ]
    }

    /// Label as the integer type the classifiers train on.
    pub fn label(&self) -> i32 {
        i32::from(self.death_event)
    }
}

/// Outcome of a single prediction request. Derived per request, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class: 0 = survived, 1 = death.
    pub prediction: i32,
    /// Probability of the death class, in [0, 1].
    pub probability_death: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ClinicalRecord {
        ClinicalRecord {
            age: 65.0,
            anaemia: 0,
            creatinine_phosphokinase: 250,
            diabetes: 1,
            ejection_fraction: 35,
            high_blood_pressure: 1,
            platelets: 250_000.0,
            serum_creatinine: 1.9,
            serum_sodium: 130,
            sex: 1,
            smoking: 0,
            time: 120,
            death_event: 1,
        }
    }

    #[test]
    fn test_feature_vector_order_matches_names() {
        let rec = sample_record();
        let v = rec.feature_vector();
        assert_eq!(v.len(), NUM_FEATURES);
        assert_eq!(v[0], 65.0); // age
        assert_eq!(v[4], 35.0); // ejection_fraction
        assert_eq!(v[7], 1.9); // serum_creatinine
        assert_eq!(v[11], 120.0); // time
    }

    #[test]
    fn test_label_rename_round_trip() {
        let rec = sample_record();
        let json = serde_json::to_value(&rec).expect("serialize");
        assert_eq!(json["DEATH_EVENT"], 1);
        assert!(json.get("death_event").is_none());

        let back: ClinicalRecord = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, rec);
    }
}
