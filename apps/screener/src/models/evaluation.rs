use serde::{Deserialize, Serialize};

/// A fit score in `1..=10`. Construction outside that range fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn band(self) -> FitBand {
        match self.0 {
            8..=10 => FitBand::Strong,
            5..=7 => FitBand::Moderate,
            _ => FitBand::Weak,
        }
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Score::MIN as i64..=Score::MAX as i64).contains(&value) {
            Ok(Score(value as u8))
        } else {
            Err(format!(
                "score {value} is outside {}..={}",
                Score::MIN,
                Score::MAX
            ))
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// Shortlist bucket shown next to a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitBand {
    Strong,
    Moderate,
    Weak,
}

impl FitBand {
    pub fn label(self) -> &'static str {
        match self {
            FitBand::Strong => "strong",
            FitBand::Moderate => "moderate",
            FitBand::Weak => "weak",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

/// The scorer's verdict for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: Score,
    pub explanation: Explanation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert!(Score::try_from(0).is_err());
        assert!(Score::try_from(11).is_err());
        assert_eq!(Score::try_from(1).unwrap().value(), 1);
        assert_eq!(Score::try_from(10).unwrap().value(), 10);
    }

    #[test]
    fn test_out_of_range_score_fails_deserialization() {
        let json = r#"{"score": 12, "explanation": {"strengths": [], "weaknesses": []}}"#;
        assert!(serde_json::from_str::<Evaluation>(json).is_err());
    }

    #[test]
    fn test_fractional_score_fails_deserialization() {
        let json = r#"{"score": 7.5, "explanation": {}}"#;
        assert!(serde_json::from_str::<Evaluation>(json).is_err());
    }

    #[test]
    fn test_score_serializes_as_plain_integer() {
        let evaluation = Evaluation {
            score: Score::try_from(8).unwrap(),
            explanation: Explanation::default(),
        };
        let value = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(value["score"], 8);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(Score::try_from(8).unwrap().band(), FitBand::Strong);
        assert_eq!(Score::try_from(7).unwrap().band(), FitBand::Moderate);
        assert_eq!(Score::try_from(5).unwrap().band(), FitBand::Moderate);
        assert_eq!(Score::try_from(4).unwrap().band(), FitBand::Weak);
    }
}
