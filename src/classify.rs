use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AirQualityStatus {
    Good,
    Moderate,
    Poor,
    Severe,
}

impl AirQualityStatus {
    pub fn advice(self) -> &'static str {
        match self {
            Self::Good => "Air quality is good. Enjoy outdoor activities.",
            Self::Moderate => {
                "Air quality is acceptable. Sensitive people should limit outdoor activity."
            }
            Self::Poor => {
                "Air quality is unhealthy. People with breathing issues should stay indoors."
            }
            Self::Severe => "Hazardous air quality. Avoid going outdoors.",
        }
    }
}

impl fmt::Display for AirQualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::Severe => "Severe",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub status: AirQualityStatus,
    pub advice: String,
}

/// Maps an average onto a status band. Upper bounds are inclusive.
///
/// | Range            | Status   |
/// |------------------|----------|
/// | <= 50            | Good     |
/// | (50, 100]        | Moderate |
/// | (100, 200]       | Poor     |
/// | > 200            | Severe   |
///
/// NaN falls through every comparison and lands in `Severe`.
pub fn classify(avg: f64) -> Classification {
    let status = match avg {
        a if a <= 50.0 => AirQualityStatus::Good,
        a if a <= 100.0 => AirQualityStatus::Moderate,
        a if a <= 200.0 => AirQualityStatus::Poor,
        _ => AirQualityStatus::Severe,
    };
    Classification {
        status,
        advice: status.advice().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(-5.0).status, AirQualityStatus::Good);
        assert_eq!(classify(50.0).status, AirQualityStatus::Good);
        assert_eq!(classify(50.01).status, AirQualityStatus::Moderate);
        assert_eq!(classify(100.0).status, AirQualityStatus::Moderate);
        assert_eq!(classify(100.5).status, AirQualityStatus::Poor);
        assert_eq!(classify(200.0).status, AirQualityStatus::Poor);
        assert_eq!(classify(200.0001).status, AirQualityStatus::Severe);
        assert_eq!(classify(f64::INFINITY).status, AirQualityStatus::Severe);
    }

    #[test]
    fn advice_matches_status() {
        let c = classify(120.0);
        assert!(c.advice.contains("breathing issues should stay indoors"));
        assert!(classify(10.0).advice.contains("Enjoy outdoor activities"));
        assert!(classify(75.0).advice.contains("limit outdoor activity"));
        assert!(classify(900.0).advice.contains("Avoid going outdoors"));
        assert_eq!(AirQualityStatus::Poor.to_string(), "Poor");
    }
}
