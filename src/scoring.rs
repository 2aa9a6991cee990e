use rand::Rng;
use serde::Serialize;

pub const HEALTHY_THRESHOLD: f64 = 75.0;
pub const CONFIRMED_THRESHOLD: f64 = 80.0;
pub const CONFIRMED_AGREEMENT: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    EarlyRisk,
    DiseaseConfirmed,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionPriority {
    Low,
    Medium,
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiseaseType {
    Viral,
    Bacterial,
    Fungal,
    Unknown,
}

/// How hard very confident predictions are pulled back.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationProfile {
    pub high_reduction: (f64, f64),
    pub floor: f64,
    pub mild_reduction: (f64, f64),
}

pub const LEAF_CALIBRATION: CalibrationProfile = CalibrationProfile {
    high_reduction: (1.5, 3.5),
    floor: 85.0,
    mild_reduction: (0.5, 1.5),
};

pub const PALM_CALIBRATION: CalibrationProfile = CalibrationProfile {
    high_reduction: (2.0, 4.0),
    floor: 80.0,
    mild_reduction: (1.0, 2.0),
};

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn mean_confidence(confidences: &[f64]) -> Option<f64> {
    if confidences.is_empty() {
        return None;
    }
    let sum: f64 = confidences.iter().sum();
    Some(round_to(sum / confidences.len() as f64, 2))
}

pub fn calibrate<R: Rng>(confidence: f64, profile: &CalibrationProfile, rng: &mut R) -> f64 {
    let calibrated = if confidence > 95.0 {
        let (low, high) = profile.high_reduction;
        (confidence - rng.gen_range(low..high)).max(profile.floor)
    } else if confidence > 90.0 {
        let (low, high) = profile.mild_reduction;
        confidence - rng.gen_range(low..high)
    } else {
        confidence
    };
    round_to(calibrated, 2)
}

pub fn health_score(status: HealthStatus, confidence: f64) -> u32 {
    match status {
        HealthStatus::Healthy => ((80.0 + confidence * 0.15) as u32).min(95),
        HealthStatus::EarlyRisk => (55.0 + confidence * 0.2) as u32,
        HealthStatus::DiseaseConfirmed => (30.0 + confidence * 0.2) as u32,
        HealthStatus::Error => 50,
    }
}

/// Most frequent label and its vote count. Ties go to the label seen first.
pub fn majority<'a, I>(labels: I) -> Option<(&'a str, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }
    counts
        .into_iter()
        .fold(None, |best, (label, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        })
}

/// Agreement as a percentage with one decimal.
pub fn agreement_percent(agreement: f64) -> f64 {
    round_to(agreement * 100.0, 1)
}

pub fn disease_type(disease_name: &str) -> DiseaseType {
    fn mentions(name: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| name.contains(k))
    }

    let name = disease_name.to_lowercase();
    if mentions(&name, &["virus", "mosaic", "curl"]) {
        DiseaseType::Viral
    } else if mentions(&name, &["bacterial", "spot"]) {
        DiseaseType::Bacterial
    } else if mentions(&name, &["blight", "rot", "rust", "scab", "mold"]) {
        DiseaseType::Fungal
    } else {
        DiseaseType::Unknown
    }
}

pub fn is_confirmed(confidence: f64, agreement: f64) -> bool {
    confidence >= CONFIRMED_THRESHOLD && agreement >= CONFIRMED_AGREEMENT
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn mean_is_rounded() {
        assert_eq!(mean_confidence(&[80.0, 85.0, 90.004]), Some(85.0));
        assert_eq!(mean_confidence(&[]), None);
    }

    #[test]
    fn calibration_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let c = calibrate(99.0, &LEAF_CALIBRATION, &mut rng);
            assert!((95.5..=97.5).contains(&c), "{c}");

            let c = calibrate(92.0, &PALM_CALIBRATION, &mut rng);
            assert!((90.0..=91.0).contains(&c), "{c}");
        }
        assert_eq!(calibrate(88.123, &LEAF_CALIBRATION, &mut rng), 88.12);
    }

    #[test]
    fn calibration_respects_floor() {
        let profile = CalibrationProfile {
            high_reduction: (20.0, 21.0),
            floor: 85.0,
            mild_reduction: (0.5, 1.5),
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(calibrate(96.0, &profile, &mut rng), 85.0);
    }

    #[test]
    fn health_scores_per_tier() {
        assert_eq!(health_score(HealthStatus::Healthy, 90.0), 93);
        assert_eq!(health_score(HealthStatus::Healthy, 100.0), 95);
        assert_eq!(health_score(HealthStatus::EarlyRisk, 70.0), 69);
        assert_eq!(health_score(HealthStatus::DiseaseConfirmed, 85.5), 47);
    }

    #[test]
    fn majority_breaks_ties_by_first_seen() {
        assert_eq!(majority(["b", "a", "a", "b"]), Some(("b", 2)));
        assert_eq!(majority(["b", "a", "a"]), Some(("a", 2)));
        assert_eq!(majority(Vec::<&str>::new()), None);
    }

    #[test]
    fn disease_type_by_keyword() {
        assert_eq!(disease_type("Tomato mosaic virus"), DiseaseType::Viral);
        assert_eq!(disease_type("Tomato Yellow Leaf Curl Virus"), DiseaseType::Viral);
        assert_eq!(disease_type("Bacterial spot"), DiseaseType::Bacterial);
        assert_eq!(disease_type("Septoria leaf spot"), DiseaseType::Bacterial);
        assert_eq!(disease_type("Late blight"), DiseaseType::Fungal);
        assert_eq!(disease_type("Esca (Black Measles)"), DiseaseType::Unknown);
    }

    #[test]
    fn confirmation_needs_both_thresholds() {
        assert!(is_confirmed(80.0, 0.6));
        assert!(!is_confirmed(79.99, 1.0));
        assert!(!is_confirmed(95.0, 0.5));
    }
}
