// purge.rs
// PURGE lead qualification: Power, Urgency, Resources, Genuine interest, Expectations.

use serde::{Deserialize, Deserializer, Serialize};

pub const MAX_SUBSCORE: u8 = 5;
pub const MAX_TOTAL: u8 = MAX_SUBSCORE * 5;

fn clamp_subscore<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, MAX_SUBSCORE as i64) as u8)
}

/// Each sub-score is kept within 0..=5, including when read from JSON or BSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PurgeScore {
    #[serde(default, deserialize_with = "clamp_subscore")]
    pub poder: u8,
    #[serde(default, deserialize_with = "clamp_subscore")]
    pub urgencia: u8,
    #[serde(default, deserialize_with = "clamp_subscore")]
    pub recursos: u8,
    #[serde(default, deserialize_with = "clamp_subscore")]
    pub genuino: u8,
    #[serde(default, deserialize_with = "clamp_subscore")]
    pub expectativas: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NivelLead {
    Caliente,
    Tibio,
    Frio,
}

impl NivelLead {
    pub fn label(&self) -> &'static str {
        match self {
            NivelLead::Caliente => "Caliente",
            NivelLead::Tibio => "Tibio",
            NivelLead::Frio => "Frío",
        }
    }
}

impl PurgeScore {
    pub fn new(poder: u8, urgencia: u8, recursos: u8, genuino: u8, expectativas: u8) -> Self {
        let c = |v: u8| v.min(MAX_SUBSCORE);
        Self {
            poder: c(poder),
            urgencia: c(urgencia),
            recursos: c(recursos),
            genuino: c(genuino),
            expectativas: c(expectativas),
        }
    }

    /// Sum of the sub-scores, each read through the 0..=5 bound.
    pub fn total(&self) -> u8 {
        [
            self.poder,
            self.urgencia,
            self.recursos,
            self.genuino,
            self.expectativas,
        ]
        .into_iter()
        .map(|v| v.min(MAX_SUBSCORE))
        .sum()
    }

    pub fn nivel(&self) -> NivelLead {
        match self.total() {
            18.. => NivelLead::Caliente,
            10..=17 => NivelLead::Tibio,
            _ => NivelLead::Frio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_and_sums() {
        let score = PurgeScore::new(9, 5, 4, 3, 2);
        assert_eq!(score.poder, 5);
        assert_eq!(score.total(), 19);
        assert_eq!(score.nivel(), NivelLead::Caliente);
        assert_eq!(PurgeScore::new(5, 5, 5, 5, 5).total(), MAX_TOTAL);
    }

    #[test]
    fn literal_out_of_range_stays_bounded() {
        let score = PurgeScore {
            poder: u8::MAX,
            urgencia: u8::MAX,
            recursos: u8::MAX,
            genuino: u8::MAX,
            expectativas: u8::MAX,
        };
        assert_eq!(score.total(), MAX_TOTAL);
        assert_eq!(score.nivel(), NivelLead::Caliente);
    }

    #[test]
    fn levels() {
        assert_eq!(PurgeScore::new(2, 2, 2, 2, 2).nivel(), NivelLead::Tibio);
        assert_eq!(PurgeScore::new(1, 2, 2, 2, 2).nivel(), NivelLead::Frio);
        assert_eq!(PurgeScore::default().nivel(), NivelLead::Frio);
    }

    #[test]
    fn json_out_of_range_is_clamped() {
        let score: PurgeScore =
            serde_json::from_str(r#"{"poder": 12, "urgencia": -3, "recursos": 4}"#).unwrap();
        assert_eq!(score, PurgeScore::new(5, 0, 4, 0, 0));
    }
}
