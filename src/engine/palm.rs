use rand::Rng;
use serde::Serialize;

use super::{classify_all, UnclearImages, UploadedImage};
use crate::{
    knowledge::{
        palm::{disease_info, healthy_guidance, PalmCrop, PalmDiseaseInfo, PALM_CLASSES},
        ChemicalTreatment, FertilizerGuidance, TextList,
    },
    model::Classifier,
    scoring::{
        agreement_percent, calibrate, health_score, is_confirmed, majority, mean_confidence,
        ActionPriority, HealthStatus, HEALTHY_THRESHOLD, PALM_CALIBRATION,
    },
};

static DEFAULT_NUTRIENTS: FertilizerGuidance = FertilizerGuidance {
    recommended: &["Balanced NPK", "Organic manure", "Micronutrients"],
    avoid: &[],
    timing: None,
};

/// Advisory for a batch of arecanut or coconut palm photos.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PalmAdvisory {
    Unclear(UnclearImages),
    Healthy(HealthyPalm),
    DiseaseConfirmed(ConfirmedPalmDisease),
    EarlyRisk(PalmEarlyRisk),
}

impl PalmAdvisory {
    pub fn status(&self) -> HealthStatus {
        match self {
            PalmAdvisory::Unclear(a) => a.status,
            PalmAdvisory::Healthy(a) => a.status,
            PalmAdvisory::DiseaseConfirmed(a) => a.status,
            PalmAdvisory::EarlyRisk(a) => a.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthyPalm {
    pub status: HealthStatus,
    pub crop: &'static str,
    pub confidence: f64,
    pub health_score: u32,
    pub action_priority: ActionPriority,
    pub message: String,
    pub current_condition: &'static str,
    pub routine_care: TextList,
    pub nutrient_management: TextList,
    pub yield_optimization: TextList,
    pub economic_potential: String,
    pub preventive_measures: TextList,
    pub farmer_reassurance: &'static str,
    pub disclaimer: &'static str,
}

/// Growing conditions attached to a confirmed palm diagnosis.
#[derive(Debug, Serialize)]
pub struct CropSpecifics {
    pub ideal_spacing: &'static str,
    pub water_requirement: &'static str,
    pub intercrop_suggestions: TextList,
}

#[derive(Debug, Serialize)]
pub struct ConfirmedPalmDisease {
    pub status: HealthStatus,
    pub crop: &'static str,
    pub confidence: f64,
    pub agreement: f64,
    pub health_score: u32,
    pub severity: &'static str,
    pub action_priority: ActionPriority,
    pub common_diseases: TextList,
    pub identified_symptoms: TextList,
    pub immediate_actions: TextList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chemical_treatment: Option<&'static ChemicalTreatment>,
    pub organic_management: TextList,
    pub nutrient_management: &'static FertilizerGuidance,
    pub prevention_strategies: TextList,
    pub economic_impact: &'static str,
    pub monitoring_schedule: TextList,
    pub expert_contact: &'static str,
    pub farmer_reassurance: &'static str,
    pub disclaimer: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arecanut_specific: Option<CropSpecifics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coconut_specific: Option<CropSpecifics>,
}

#[derive(Debug, Serialize)]
pub struct PalmEarlyRisk {
    pub status: HealthStatus,
    pub crop: &'static str,
    pub possible_issue: &'static str,
    pub confidence: f64,
    pub agreement: f64,
    pub health_score: u32,
    pub action_priority: ActionPriority,
    pub why_not_confirmed: Vec<String>,
    pub recommended_actions: TextList,
    pub organic_preventives: TextList,
    pub monitoring_advice: TextList,
    pub nutrient_support: TextList,
    pub when_to_act: &'static str,
    pub contact_for_help: &'static str,
    pub economic_consideration: &'static str,
    pub farmer_reassurance: &'static str,
    pub disclaimer: &'static str,
}

/// Diagnoses arecanut and coconut palms. The crop is inferred from the votes.
pub struct PalmEngine {
    classifier: Box<dyn Classifier + Send>,
}

impl PalmEngine {
    pub fn new(classifier: Box<dyn Classifier + Send>) -> Self {
        PalmEngine { classifier }
    }

    pub fn assess<R: Rng>(&self, images: &[UploadedImage], rng: &mut R) -> PalmAdvisory {
        let votes = classify_all(self.classifier.as_ref(), &PALM_CLASSES, images);

        let (Some(mean), Some((final_label, count))) = (
            mean_confidence(&votes.confidences),
            majority(votes.labels.iter().copied()),
        ) else {
            return PalmAdvisory::Unclear(UnclearImages {
                status: HealthStatus::EarlyRisk,
                message: "Images are unclear or not leaf-related",
                health_score: 50,
                action_priority: ActionPriority::Medium,
                recommendations: &[
                    "Take clear photos of palm leaves",
                    "Focus on affected areas",
                    "Include both upper and lower leaf surfaces",
                ],
                disclaimer: Some("AI-based advisory. Confirm with agriculture expert."),
            });
        };
        let confidence = calibrate(mean, &PALM_CALIBRATION, rng);
        let agreement = count as f64 / votes.labels.len() as f64;
        let crop = PalmCrop::from_label(final_label);

        tracing::info!(
            crop = crop.name(),
            label = final_label,
            confidence,
            agreement,
            "palm batch classified"
        );

        if final_label.contains("Healthy") && confidence >= HEALTHY_THRESHOLD {
            return PalmAdvisory::Healthy(healthy(crop, confidence));
        }

        let info = disease_info(final_label);
        let list = |field: fn(&'static PalmDiseaseInfo) -> TextList, fallback: TextList| {
            info.map_or(fallback, field)
        };

        if is_confirmed(confidence, agreement) {
            return PalmAdvisory::DiseaseConfirmed(confirmed(crop, info, confidence, agreement));
        }

        PalmAdvisory::EarlyRisk(PalmEarlyRisk {
            status: HealthStatus::EarlyRisk,
            crop: crop.name(),
            possible_issue: "Early signs of palm disease",
            confidence,
            agreement: agreement_percent(agreement),
            health_score: health_score(HealthStatus::EarlyRisk, confidence),
            action_priority: ActionPriority::Medium,
            why_not_confirmed: vec![
                format!("Prediction agreement: {}%", (agreement * 100.0) as u32),
                "Symptoms may be early-stage".to_string(),
                "Environmental stress can mimic disease".to_string(),
            ],
            recommended_actions: list(
                |i| i.immediate_actions,
                &[
                    "Remove suspicious leaves",
                    "Improve drainage",
                    "Apply organic preventives",
                ],
            ),
            organic_preventives: list(
                |i| i.organic_management,
                &[
                    "Neem cake application",
                    "Trichoderma soil treatment",
                    "Proper irrigation management",
                ],
            ),
            monitoring_advice: &[
                "Monitor palms daily for 5 days",
                "Take photos of same leaves for comparison",
                "Note any weather changes",
            ],
            nutrient_support: &[
                "Apply balanced fertilizer",
                "Supplement with micronutrients",
                "Maintain soil organic matter",
            ],
            when_to_act: "If symptoms worsen within 3 days or spread to other palms",
            contact_for_help: info.map_or("Local agriculture officer", |i| i.expert_contact),
            economic_consideration: "Early intervention prevents major losses",
            farmer_reassurance: "Most palm issues are manageable with early detection. Your vigilance is key to success.",
            disclaimer: "Early warning advisory. Confirm with palm specialist before major interventions.",
        })
    }
}

fn healthy(crop: PalmCrop, confidence: f64) -> HealthyPalm {
    let guidance = healthy_guidance(crop);

    HealthyPalm {
        status: HealthStatus::Healthy,
        crop: crop.name(),
        confidence,
        health_score: health_score(HealthStatus::Healthy, confidence),
        action_priority: ActionPriority::Low,
        message: format!("{} palm appears healthy", crop.name()),
        current_condition: "Good palm health",
        routine_care: guidance.routine_care,
        nutrient_management: guidance.nutrient_management,
        yield_optimization: guidance.harvest_management,
        economic_potential: format!("Expected yield: {} specific normal range", crop.name()),
        preventive_measures: &[
            "Regular field sanitation",
            "Proper drainage maintenance",
            "Disease monitoring every 15 days",
        ],
        farmer_reassurance:
            "Your palm garden is in good health. Regular care ensures sustained productivity.",
        disclaimer: "AI-based advisory. For commercial decisions, consult palm specialist.",
    }
}

fn confirmed(
    crop: PalmCrop,
    info: Option<&'static PalmDiseaseInfo>,
    confidence: f64,
    agreement: f64,
) -> ConfirmedPalmDisease {
    let specifics = match crop {
        PalmCrop::Arecanut => CropSpecifics {
            ideal_spacing: "2.7m x 2.7m minimum",
            water_requirement: "150-200 liters/palm/week in summer",
            intercrop_suggestions: &["Banana", "Black pepper", "Cocoa"],
        },
        PalmCrop::Coconut => CropSpecifics {
            ideal_spacing: "7.5m x 7.5m minimum",
            water_requirement: "200-250 liters/palm/week",
            intercrop_suggestions: &["Pineapple", "Turmeric", "Ginger", "Banana"],
        },
    };
    let (arecanut_specific, coconut_specific) = match crop {
        PalmCrop::Arecanut => (Some(specifics), None),
        PalmCrop::Coconut => (None, Some(specifics)),
    };
    let list = |field: fn(&'static PalmDiseaseInfo) -> TextList, fallback: TextList| {
        info.map_or(fallback, field)
    };

    ConfirmedPalmDisease {
        status: HealthStatus::DiseaseConfirmed,
        crop: crop.name(),
        confidence,
        agreement: agreement_percent(agreement),
        health_score: health_score(HealthStatus::DiseaseConfirmed, confidence),
        severity: "High",
        action_priority: ActionPriority::Immediate,
        common_diseases: list(|i| i.common_diseases, &["Leaf disease detected"]),
        identified_symptoms: list(
            |i| i.symptoms,
            &[
                "Leaf discoloration",
                "Abnormal leaf drop",
                "Reduced palm vigor",
            ],
        ),
        immediate_actions: list(
            |i| i.immediate_actions,
            &[
                "Remove infected leaves/fronds",
                "Improve field drainage",
                "Maintain palm hygiene",
            ],
        ),
        chemical_treatment: info.map(|i| &i.chemical_treatment),
        organic_management: list(
            |i| i.organic_management,
            &[
                "Neem cake application",
                "Biocontrol agents",
                "Proper spacing and sanitation",
            ],
        ),
        nutrient_management: info.map_or(&DEFAULT_NUTRIENTS, |i| &i.fertilizer_guidance),
        prevention_strategies: list(
            |i| i.prevention,
            &[
                "Use disease-free planting material",
                "Maintain proper palm spacing",
                "Regular field inspection",
            ],
        ),
        economic_impact: info.map_or("Significant yield loss if untreated", |i| i.economic_impact),
        monitoring_schedule: &[
            "Inspect palms weekly during rainy season",
            "Check for new symptoms every 3 days",
            "Monitor soil moisture regularly",
        ],
        expert_contact: info.map_or("Contact State Horticulture Department", |i| i.expert_contact),
        farmer_reassurance: "Palm diseases are common and manageable. Early treatment can save your plantation.",
        disclaimer: "AI-based advisory. For confirmed diagnosis and commercial treatment, consult palm specialist.",
        arecanut_specific,
        coconut_specific,
    }
}
