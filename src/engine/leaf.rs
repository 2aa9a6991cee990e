use rand::Rng;
use serde::Serialize;

use super::{classify_all, UnclearImages, UploadedImage};
use crate::{
    knowledge::{
        is_empty,
        leaf::{
            crop_label_prefix, disease_profile, healthy_guidance, DiseaseProfile, KNOWN_CROPS,
            LEAF_CLASSES,
        },
        or_default, ChemicalTreatment, FertilizerGuidance, TextList, NO_TEXT,
    },
    model::Classifier,
    quality,
    scoring::{
        agreement_percent, calibrate, disease_type, health_score, is_confirmed, majority,
        mean_confidence, ActionPriority, DiseaseType, HealthStatus, HEALTHY_THRESHOLD,
        LEAF_CALIBRATION,
    },
};

const QUALITY_RECOMMENDATION: &str =
    "Please take clear photos in daylight, focusing on individual leaves";
const DEFAULT_ROUTINE_CARE: TextList = &[
    "Continue regular irrigation",
    "Apply balanced fertilizer",
    "Monitor weekly for pests",
];
const VIRAL_WARNING: &str = "⚠️ VIRAL DISEASE - NO CHEMICAL CURE";
const VIRAL_MANAGEMENT: TextList = &[
    "Remove and destroy infected plants",
    "Control insect vectors (whiteflies, aphids)",
    "Use virus-free planting material",
    "Practice strict field sanitation",
];

/// Advisory for a batch of crop leaf photos.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LeafAdvisory {
    QualityRejected(QualityRejection),
    Unclear(UnclearImages),
    CropMismatch(CropMismatch),
    Healthy(HealthyLeaf),
    DiseaseConfirmed(ConfirmedDisease),
    EarlyRisk(EarlyRisk),
}

impl LeafAdvisory {
    pub fn status(&self) -> HealthStatus {
        match self {
            LeafAdvisory::QualityRejected(a) => a.status,
            LeafAdvisory::Unclear(a) => a.status,
            LeafAdvisory::CropMismatch(a) => a.status,
            LeafAdvisory::Healthy(a) => a.status,
            LeafAdvisory::DiseaseConfirmed(a) => a.status,
            LeafAdvisory::EarlyRisk(a) => a.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QualityRejection {
    pub status: HealthStatus,
    pub message: &'static str,
    pub quality_issues: Vec<String>,
    pub recommendation: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CropMismatch {
    pub status: HealthStatus,
    pub confidence: f64,
    pub message: String,
    pub health_score: u32,
    pub action_priority: ActionPriority,
}

#[derive(Debug, Serialize)]
pub struct HealthyLeaf {
    pub status: HealthStatus,
    pub crop: String,
    pub confidence: f64,
    pub health_score: u32,
    pub action_priority: ActionPriority,
    pub message: String,
    pub current_condition: &'static str,
    pub routine_care: TextList,
    pub seasonal_advice: TextList,
    pub monitoring_schedule: TextList,
    pub preventive_measures: TextList,
    pub farmer_reassurance: &'static str,
    pub disclaimer: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ConfirmedDisease {
    pub status: HealthStatus,
    pub crop: String,
    pub disease: String,
    pub disease_type: DiseaseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pathogen_type: Option<&'static str>,
    pub confidence: f64,
    pub agreement: f64,
    pub health_score: u32,
    pub severity: &'static str,
    pub action_priority: ActionPriority,
    pub scientific_name: &'static str,
    pub common_season: TextList,
    pub identified_symptoms: TextList,
    pub possible_causes: TextList,
    pub immediate_actions: TextList,
    pub organic_treatment: TextList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chemical_treatment: Option<&'static ChemicalTreatment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fertilizer_guidance: Option<&'static FertilizerGuidance>,
    #[serde(skip_serializing_if = "is_empty")]
    pub prevention: TextList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_treatment: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_note: Option<&'static str>,
    pub monitoring_advice: &'static str,
    pub expert_contact: &'static str,
    pub economic_impact: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical_warning: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viral_disease_management: Option<TextList>,
    pub farmer_reassurance: &'static str,
    pub disclaimer: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EarlyRisk {
    pub status: HealthStatus,
    pub crop: String,
    pub possible_disease: String,
    pub disease_type: DiseaseType,
    pub confidence: f64,
    pub agreement: f64,
    pub health_score: u32,
    pub action_priority: ActionPriority,
    pub why_not_confirmed: Vec<String>,
    pub recommended_actions: TextList,
    pub organic_preventives: TextList,
    pub monitoring_schedule: TextList,
    pub when_to_consult: &'static str,
    pub contact_for_help: &'static str,
    pub farmer_reassurance: &'static str,
    pub disclaimer: &'static str,
}

/// Diagnoses apple, corn, grape, potato and tomato leaves.
pub struct LeafEngine {
    classifier: Box<dyn Classifier + Send>,
}

impl LeafEngine {
    pub fn new(classifier: Box<dyn Classifier + Send>) -> Self {
        LeafEngine { classifier }
    }

    /// `crop` is expected capitalised the way class labels spell it.
    pub fn assess<R: Rng>(
        &self,
        images: &[UploadedImage],
        crop: &str,
        rng: &mut R,
    ) -> LeafAdvisory {
        let issues = quality::quality_issues(images);
        if quality::too_many_issues(issues.len(), images.len()) {
            tracing::info!(issues = issues.len(), images = images.len(), "batch rejected on quality");
            return LeafAdvisory::QualityRejected(QualityRejection {
                status: HealthStatus::Error,
                message: "Multiple images have quality issues",
                quality_issues: issues,
                recommendation: QUALITY_RECOMMENDATION,
            });
        }

        if !KNOWN_CROPS.iter().any(|known| *known == crop) {
            tracing::debug!(crop, "crop is not covered by the leaf model");
        }

        let votes = classify_all(self.classifier.as_ref(), &LEAF_CLASSES, images);

        let Some(mean) = mean_confidence(&votes.confidences) else {
            return LeafAdvisory::Unclear(UnclearImages {
                status: HealthStatus::EarlyRisk,
                message: "Images unclear or not leaf related",
                health_score: 40,
                action_priority: ActionPriority::Medium,
                recommendations: &[
                    "Take clear photos of individual leaves",
                    "Ensure good lighting",
                    "Focus on affected areas",
                ],
                disclaimer: None,
            });
        };
        let confidence = calibrate(mean, &LEAF_CALIBRATION, rng);

        let prefix = crop_label_prefix(crop);
        let matching = votes.labels.iter().copied().filter(|l| l.starts_with(prefix));

        let Some((final_label, count)) = majority(matching) else {
            return LeafAdvisory::CropMismatch(CropMismatch {
                status: HealthStatus::EarlyRisk,
                confidence,
                message: format!("Images don't appear to be {} leaves", crop),
                health_score: health_score(HealthStatus::EarlyRisk, confidence),
                action_priority: ActionPriority::Medium,
            });
        };

        let agreement = count as f64 / votes.labels.len() as f64;
        let disease = disease_name(final_label);
        let kind = disease_type(&disease);

        tracing::info!(
            crop,
            label = final_label,
            confidence,
            agreement,
            "leaf batch classified"
        );

        if final_label.to_lowercase().contains("healthy") && confidence >= HEALTHY_THRESHOLD {
            return LeafAdvisory::Healthy(healthy(crop, confidence));
        }

        if is_confirmed(confidence, agreement) {
            return LeafAdvisory::DiseaseConfirmed(confirmed(
                crop,
                final_label,
                disease,
                kind,
                confidence,
                agreement,
            ));
        }

        LeafAdvisory::EarlyRisk(EarlyRisk {
            status: HealthStatus::EarlyRisk,
            crop: crop.to_string(),
            possible_disease: disease,
            disease_type: kind,
            confidence,
            agreement: agreement_percent(agreement),
            health_score: health_score(HealthStatus::EarlyRisk, confidence),
            action_priority: ActionPriority::Medium,
            why_not_confirmed: vec![
                format!("Prediction agreement: {}%", (agreement * 100.0) as u32),
                "Symptoms may be early-stage".to_string(),
                "Image quality may affect accuracy".to_string(),
            ],
            recommended_actions: &[
                "Take clear photos of multiple leaves",
                "Monitor plants for 2-3 days",
                "Apply organic preventative spray",
            ],
            organic_preventives: &[
                "Neem oil spray (5ml/liter)",
                "Garlic extract spray",
                "Proper field sanitation",
            ],
            monitoring_schedule: &[
                "Check daily for symptom progression",
                "Take photos every 2 days for comparison",
                "Note weather conditions",
            ],
            when_to_consult: "If symptoms worsen in 3 days or spread to other plants",
            contact_for_help: "Local Krishi Vigyan Kendra (KVK) or agriculture officer",
            farmer_reassurance:
                "Early detection gives best chance for control. Most leaf issues are manageable.",
            disclaimer:
                "Early warning advisory. Confirm with agriculture expert before major interventions.",
        })
    }
}

/// `"Tomato__Late_blight"` becomes `"Late blight"`.
fn disease_name(label: &str) -> String {
    label
        .split_once("__")
        .map_or(label, |(_, disease)| disease)
        .replace('_', " ")
}

fn healthy(crop: &str, confidence: f64) -> HealthyLeaf {
    let guidance = healthy_guidance(crop);

    HealthyLeaf {
        status: HealthStatus::Healthy,
        crop: crop.to_string(),
        confidence,
        health_score: health_score(HealthStatus::Healthy, confidence),
        action_priority: ActionPriority::Low,
        message: format!("{} leaves appear healthy", crop),
        current_condition: "Good plant health",
        routine_care: guidance.map_or(DEFAULT_ROUTINE_CARE, |g| g.routine_care),
        seasonal_advice: guidance.map_or(NO_TEXT, |g| g.seasonal_tasks),
        monitoring_schedule: &[
            "Check leaves weekly for early signs",
            "Monitor soil moisture regularly",
            "Inspect for pests during early morning",
        ],
        preventive_measures: &[
            "Maintain proper plant spacing",
            "Practice crop rotation",
            "Use disease-resistant varieties",
        ],
        farmer_reassurance:
            "Your crop is in good condition. Most diseases are preventable with proper care.",
        disclaimer: "AI-based advisory. Confirm with agriculture expert for commercial decisions.",
    }
}

fn confirmed(
    crop: &str,
    label: &str,
    disease: String,
    kind: DiseaseType,
    confidence: f64,
    agreement: f64,
) -> ConfirmedDisease {
    let profile = disease_profile(label);
    let list = |field: fn(&'static DiseaseProfile) -> TextList, fallback: TextList| {
        or_default(profile.map_or(NO_TEXT, field), fallback)
    };
    let text = |field: fn(&'static DiseaseProfile) -> Option<&'static str>| profile.and_then(field);
    let viral = kind == DiseaseType::Viral;

    ConfirmedDisease {
        status: HealthStatus::DiseaseConfirmed,
        crop: crop.to_string(),
        disease,
        disease_type: kind,
        common_name: text(|p| Some(p.disease_name)),
        pathogen_type: text(|p| Some(p.kind)),
        confidence,
        agreement: agreement_percent(agreement),
        health_score: health_score(HealthStatus::DiseaseConfirmed, confidence),
        severity: text(|p| p.severity).unwrap_or("High"),
        action_priority: ActionPriority::Immediate,
        scientific_name: text(|p| p.scientific_name).unwrap_or("Not specified"),
        common_season: list(|p| p.season, &["Various seasons"]),
        identified_symptoms: list(|p| p.symptoms, &["Leaf abnormalities detected"]),
        possible_causes: list(|p| p.causes, &["Environmental factors", "Pathogen presence"]),
        immediate_actions: list(
            |p| p.immediate_actions,
            &[
                "Remove infected leaves/plants",
                "Improve air circulation",
                "Avoid overhead watering",
            ],
        ),
        organic_treatment: list(
            |p| p.organic_treatment,
            &[
                "Neem oil spray (5ml/liter water)",
                "Baking soda solution",
                "Garlic-chili extract",
            ],
        ),
        chemical_treatment: profile
            .and_then(|p| p.chemical_treatment.as_ref())
            .filter(|_| !viral),
        fertilizer_guidance: profile.and_then(|p| p.fertilizer_guidance.as_ref()),
        prevention: list(|p| p.prevention, NO_TEXT),
        recommended_treatment: text(|p| p.treatment),
        vector: text(|p| p.vector),
        impact: text(|p| p.impact),
        warning: text(|p| p.warning),
        critical_note: text(|p| p.critical_note),
        monitoring_advice: "Check plants every 3 days for spread",
        expert_contact: text(|p| p.expert_advice).unwrap_or("Contact local agriculture officer"),
        economic_impact: text(|p| p.economic_impact).unwrap_or("Significant if untreated"),
        critical_warning: viral.then_some(VIRAL_WARNING),
        viral_disease_management: viral.then_some(VIRAL_MANAGEMENT),
        farmer_reassurance: "This disease is manageable if treated early. Most farmers successfully control it with proper measures.",
        disclaimer: "AI-based advisory. For confirmed diagnosis and commercial treatment, consult agriculture expert.",
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::Value;

    use super::*;
    use crate::{
        engine::testing::{one_hot, StubClassifier},
        quality::tests::png,
    };

    fn class(label: &str) -> usize {
        LEAF_CLASSES.iter().position(|c| *c == label).unwrap()
    }

    fn assess(crop: &str, outputs: Vec<Option<Vec<f32>>>) -> Value {
        let images: Vec<UploadedImage> = (0..outputs.len())
            .map(|i| UploadedImage::new(format!("leaf{i}.png"), png(256, 256, 120)))
            .collect();
        let engine = LeafEngine::new(Box::new(StubClassifier::new(outputs)));
        let mut rng = StdRng::seed_from_u64(3);
        serde_json::to_value(engine.assess(&images, crop, &mut rng)).unwrap()
    }

    fn votes(labels: &[&str], p: f32) -> Vec<Option<Vec<f32>>> {
        labels
            .iter()
            .map(|l| Some(one_hot(class(l), p, LEAF_CLASSES.len())))
            .collect()
    }

    #[test]
    fn unanimous_disease_is_confirmed() {
        let body = assess("Tomato", votes(&["Tomato__Late_blight"; 3], 0.875));
        assert_eq!(body["status"], "disease_confirmed");
        assert_eq!(body["disease"], "Late blight");
        assert_eq!(body["disease_type"], "Fungal");
        assert_eq!(body["severity"], "Emergency");
        assert_eq!(body["confidence"], 87.5);
        assert_eq!(body["agreement"], 100.0);
        assert_eq!(body["health_score"], 47);
        assert_eq!(body["action_priority"], "Immediate");
        assert_eq!(body["common_season"][0], "Various seasons");
        assert!(body.get("chemical_treatment").is_none());
    }

    #[test]
    fn confirmed_disease_carries_treatment_plan() {
        let body = assess("Apple", votes(&["Apple__Apple_scab"; 3], 0.875));
        assert_eq!(body["status"], "disease_confirmed");
        assert_eq!(body["common_name"], "Apple Scab");
        assert_eq!(body["pathogen_type"], "Fungal");
        assert_eq!(body["scientific_name"], "Venturia inaequalis");
        assert_eq!(
            body["chemical_treatment"]["safety_interval"],
            "14 days before harvest"
        );
        assert_eq!(body["fertilizer_guidance"]["avoid"][1], "Fresh manure near roots");
        assert_eq!(body["prevention"].as_array().unwrap().len(), 4);
        assert!(body.get("critical_warning").is_none());
    }

    #[test]
    fn viral_disease_gets_warning_instead_of_chemicals() {
        let body = assess("Tomato", votes(&["Tomato__Tomato_mosaic_virus"; 3], 0.875));
        assert_eq!(body["disease_type"], "Viral");
        assert_eq!(body["critical_warning"], VIRAL_WARNING);
        assert_eq!(body["viral_disease_management"].as_array().unwrap().len(), 4);
        assert_eq!(body["critical_note"], "NO CHEMICAL CURE - REMOVE INFECTED PLANTS");
    }

    #[test]
    fn healthy_leaves_get_crop_guidance() {
        let body = assess("Apple", votes(&["Apple__healthy"; 3], 0.875));
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["message"], "Apple leaves appear healthy");
        assert_eq!(body["health_score"], 93);
        assert_eq!(body["routine_care"][0], "Prune annually during dormancy");
        assert_eq!(body["seasonal_advice"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn corn_hint_matches_maize_labels() {
        let body = assess("Corn", votes(&["Corn_(maize)__Common_rust"; 3], 0.875));
        assert_eq!(body["status"], "disease_confirmed");
        assert_eq!(body["disease"], "Common rust");
        assert_eq!(
            body["fertilizer_guidance"]["recommended"][0],
            "Potassium-rich fertilizer to improve resistance"
        );
    }

    #[test]
    fn split_votes_stay_early_risk() {
        let body = assess(
            "Tomato",
            votes(
                &["Tomato__Early_blight", "Tomato__Leaf_Mold", "Potato__healthy"],
                0.875,
            ),
        );
        assert_eq!(body["status"], "early_risk");
        assert_eq!(body["possible_disease"], "Early blight");
        assert_eq!(body["agreement"], 33.3);
        assert_eq!(body["why_not_confirmed"][0], "Prediction agreement: 33%");
        assert_eq!(body["health_score"], 72);
    }

    #[test]
    fn other_crop_predictions_are_a_mismatch() {
        let body = assess("Potato", votes(&["Tomato__Late_blight"; 3], 0.875));
        assert_eq!(body["status"], "early_risk");
        assert_eq!(body["message"], "Images don't appear to be Potato leaves");
        assert_eq!(body["confidence"], 87.5);
    }

    #[test]
    fn no_predictions_is_unclear() {
        let body = assess("Tomato", vec![None, None, None]);
        assert_eq!(body["status"], "early_risk");
        assert_eq!(body["health_score"], 40);
        assert!(body.get("disclaimer").is_none());
    }

    #[test]
    fn poor_photos_reject_the_batch() {
        let images = vec![
            UploadedImage::new("a.png", png(256, 256, 10)),
            UploadedImage::new("b.png", png(256, 256, 250)),
            UploadedImage::new("c.png", png(256, 256, 120)),
        ];
        let engine = LeafEngine::new(Box::new(StubClassifier::new(vec![])));
        let advisory = engine.assess(&images, "Tomato", &mut StdRng::seed_from_u64(0));
        assert_eq!(advisory.status(), HealthStatus::Error);

        let body = serde_json::to_value(advisory).unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(
            body["quality_issues"][0],
            "a.png: Image too dark - take in daylight"
        );
    }

    #[test]
    fn disease_name_drops_crop_prefix() {
        assert_eq!(
            disease_name("Grape__Esca_(Black_Measles)"),
            "Esca (Black Measles)"
        );
        assert_eq!(
            disease_name("Corn_(maize)__Cercospora_leaf_spot Gray_leaf_spot"),
            "Cercospora leaf spot Gray leaf spot"
        );
    }
}
