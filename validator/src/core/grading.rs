//! Score classification
//!
//! Both ladders are total over any `f64`: scores above 100 land on the top
//! rung and anything below the lowest boundary (including NaN) on the bottom.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Coarse health label for an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 95.0 {
            HealthStatus::Excellent
        } else if score >= 85.0 {
            HealthStatus::Good
        } else if score >= 70.0 {
            HealthStatus::Fair
        } else if score >= 50.0 {
            HealthStatus::Poor
        } else {
            HealthStatus::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Critical => "CRITICAL",
            HealthStatus::Poor => "POOR",
            HealthStatus::Fair => "FAIR",
            HealthStatus::Good => "GOOD",
            HealthStatus::Excellent => "EXCELLENT",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter grade, finer-grained than [`HealthStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "F")]
    F,
    #[serde(rename = "D")]
    D,
    #[serde(rename = "C-")]
    CMinus,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    BMinus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

/// Lower bound of each grade, best first
const GRADE_LADDER: [(f64, Grade); 10] = [
    (97.0, Grade::APlus),
    (93.0, Grade::A),
    (90.0, Grade::AMinus),
    (87.0, Grade::BPlus),
    (83.0, Grade::B),
    (80.0, Grade::BMinus),
    (77.0, Grade::CPlus),
    (73.0, Grade::C),
    (70.0, Grade::CMinus),
    (60.0, Grade::D),
];

impl Grade {
    pub fn from_score(score: f64) -> Self {
        GRADE_LADDER
            .iter()
            .find(|(floor, _)| score >= *floor)
            .map(|(_, grade)| *grade)
            .unwrap_or(Grade::F)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a score to its status and grade
pub fn classify(score: f64) -> (HealthStatus, Grade) {
    (HealthStatus::from_score(score), Grade::from_score(score))
}

/// Round to one decimal place, the precision every reported score uses
pub fn round_score(score: f64) -> f64 {
    (score * 10.0).round() / 10.0
}

/// `serialize_with` helper: exact in memory, one decimal on the wire
pub fn serialize_rounded<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_score(*score))
}

pub fn serialize_rounded_opt<S: Serializer>(score: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match score {
        Some(score) => serializer.serialize_some(&round_score(*score)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_boundaries() {
        assert_eq!(HealthStatus::from_score(100.0), HealthStatus::Excellent);
        assert_eq!(HealthStatus::from_score(95.0), HealthStatus::Excellent);
        assert_eq!(HealthStatus::from_score(94.99), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(85.0), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(84.99), HealthStatus::Fair);
        assert_eq!(HealthStatus::from_score(70.0), HealthStatus::Fair);
        assert_eq!(HealthStatus::from_score(69.99), HealthStatus::Poor);
        assert_eq!(HealthStatus::from_score(50.0), HealthStatus::Poor);
        assert_eq!(HealthStatus::from_score(49.99), HealthStatus::Critical);
        assert_eq!(HealthStatus::from_score(0.0), HealthStatus::Critical);
    }

    #[test]
    fn test_grade_boundaries() {
        let cases = [
            (97.0, "A+"),
            (96.9, "A"),
            (93.0, "A"),
            (90.0, "A-"),
            (87.0, "B+"),
            (83.0, "B"),
            (80.0, "B-"),
            (79.9, "C+"),
            (77.0, "C+"),
            (73.0, "C"),
            (70.0, "C-"),
            (60.0, "D"),
            (59.9, "F"),
        ];
        for (score, expected) in cases {
            assert_eq!(Grade::from_score(score).as_str(), expected, "score {score}");
        }
    }

    #[test]
    fn test_classification_is_monotonic() {
        let mut previous = classify(0.0);
        for step in 0..=1000 {
            let current = classify(step as f64 / 10.0);
            assert!(current.0 >= previous.0);
            assert!(current.1 >= previous.1);
            previous = current;
        }
        assert_eq!(previous, (HealthStatus::Excellent, Grade::APlus));
    }

    #[test]
    fn test_out_of_range_scores() {
        assert_eq!(classify(250.0), (HealthStatus::Excellent, Grade::APlus));
        assert_eq!(classify(-3.0), (HealthStatus::Critical, Grade::F));
        assert_eq!(classify(f64::NAN), (HealthStatus::Critical, Grade::F));
    }

    #[test]
    fn test_wire_labels() {
        assert_eq!(serde_json::to_value(HealthStatus::Fair).unwrap(), "FAIR");
        assert_eq!(serde_json::to_value(Grade::BMinus).unwrap(), "B-");
        assert_eq!(round_score(79.96), 80.0);
        assert_eq!(round_score(66.666), 66.7);
    }
}
