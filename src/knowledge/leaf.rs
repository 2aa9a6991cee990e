use super::{ChemicalTreatment, FertilizerGuidance, TextList};

pub const KNOWN_CROPS: [&str; 5] = ["Apple", "Corn", "Grape", "Potato", "Tomato"];

/// Output order of the leaf model. Must match the training folder order.
pub const LEAF_CLASSES: [&str; 24] = [
    "Apple__Apple_scab",
    "Apple__Black_rot",
    "Apple__Cedar_apple_rust",
    "Apple__healthy",
    "Corn_(maize)__Cercospora_leaf_spot Gray_leaf_spot",
    "Corn_(maize)__Common_rust",
    "Corn_(maize)__Northern_Leaf_Blight",
    "Corn_(maize)__healthy",
    "Grape__Black_rot",
    "Grape__Esca_(Black_Measles)",
    "Grape__Leaf_blight_(Isariopsis_Leaf_Spot)",
    "Grape__healthy",
    "Potato__Early_blight",
    "Potato__Late_blight",
    "Potato__healthy",
    "Tomato__Bacterial_spot",
    "Tomato__Early_blight",
    "Tomato__Late_blight",
    "Tomato__Leaf_Mold",
    "Tomato__Septoria_leaf_spot",
    "Tomato__Target_Spot",
    "Tomato__Tomato_mosaic_virus",
    "Tomato__Tomato_Yellow_Leaf_Curl_Virus",
    "Tomato__healthy",
];

/// Class-label prefix the model uses for a crop name.
pub fn crop_label_prefix(crop: &str) -> &str {
    if crop == "Corn" {
        "Corn_(maize)"
    } else {
        crop
    }
}

#[derive(Debug)]
pub struct DiseaseProfile {
    pub disease_name: &'static str,
    pub scientific_name: Option<&'static str>,
    pub kind: &'static str,
    pub season: TextList,
    pub severity: Option<&'static str>,
    pub impact: Option<&'static str>,
    pub vector: Option<&'static str>,
    pub symptoms: TextList,
    pub causes: TextList,
    pub immediate_actions: TextList,
    pub organic_treatment: TextList,
    pub chemical_treatment: Option<ChemicalTreatment>,
    pub fertilizer_guidance: Option<FertilizerGuidance>,
    pub prevention: TextList,
    pub treatment: Option<&'static str>,
    pub expert_advice: Option<&'static str>,
    pub economic_impact: Option<&'static str>,
    pub warning: Option<&'static str>,
    pub critical_note: Option<&'static str>,
}

impl DiseaseProfile {
    const EMPTY: DiseaseProfile = DiseaseProfile {
        disease_name: "",
        scientific_name: None,
        kind: "",
        season: &[],
        severity: None,
        impact: None,
        vector: None,
        symptoms: &[],
        causes: &[],
        immediate_actions: &[],
        organic_treatment: &[],
        chemical_treatment: None,
        fertilizer_guidance: None,
        prevention: &[],
        treatment: None,
        expert_advice: None,
        economic_impact: None,
        warning: None,
        critical_note: None,
    };
}

#[derive(Debug)]
pub struct HealthyGuidance {
    pub routine_care: TextList,
    pub seasonal_tasks: TextList,
}

pub fn healthy_guidance(crop: &str) -> Option<&'static HealthyGuidance> {
    match crop {
        "Apple" => Some(&APPLE_CARE),
        "Corn" => Some(&CORN_CARE),
        "Grape" => Some(&GRAPE_CARE),
        "Potato" => Some(&POTATO_CARE),
        "Tomato" => Some(&TOMATO_CARE),
        _ => None,
    }
}

pub fn disease_profile(label: &str) -> Option<&'static DiseaseProfile> {
    let profile = match label {
        "Apple__Apple_scab" => &APPLE_SCAB,
        "Apple__Black_rot" => &APPLE_BLACK_ROT,
        "Apple__Cedar_apple_rust" => &CEDAR_APPLE_RUST,
        "Corn_(maize)__Cercospora_leaf_spot Gray_leaf_spot" => &GRAY_LEAF_SPOT,
        "Corn_(maize)__Common_rust" => &COMMON_RUST,
        "Corn_(maize)__Northern_Leaf_Blight" => &NORTHERN_LEAF_BLIGHT,
        "Grape__Black_rot" => &GRAPE_BLACK_ROT,
        "Grape__Esca_(Black_Measles)" => &ESCA,
        "Grape__Leaf_blight_(Isariopsis_Leaf_Spot)" => &GRAPE_LEAF_BLIGHT,
        "Potato__Early_blight" => &POTATO_EARLY_BLIGHT,
        "Potato__Late_blight" => &POTATO_LATE_BLIGHT,
        "Tomato__Bacterial_spot" => &TOMATO_BACTERIAL_SPOT,
        "Tomato__Early_blight" => &TOMATO_EARLY_BLIGHT,
        "Tomato__Late_blight" => &TOMATO_LATE_BLIGHT,
        "Tomato__Leaf_Mold" => &TOMATO_LEAF_MOLD,
        "Tomato__Septoria_leaf_spot" => &SEPTORIA_LEAF_SPOT,
        "Tomato__Tomato_mosaic_virus" => &TOMATO_MOSAIC_VIRUS,
        "Tomato__Tomato_Yellow_Leaf_Curl_Virus" => &YELLOW_LEAF_CURL_VIRUS,
        _ => return None,
    };
    Some(profile)
}

static APPLE_SCAB: DiseaseProfile = DiseaseProfile {
    disease_name: "Apple Scab",
    scientific_name: Some("Venturia inaequalis"),
    kind: "Fungal",
    season: &["Spring", "Early Summer"],
    symptoms: &[
        "Olive-green to black spots on leaves",
        "Velvety, rough lesions",
        "Leaves may yellow and drop early",
        "Fruit develops corky, scabby lesions",
    ],
    causes: &[
        "Wet, cool spring weather",
        "Poor air circulation in orchard",
        "Overhead irrigation",
    ],
    immediate_actions: &[
        "Remove fallen leaves from ground",
        "Prune for better air circulation",
        "Apply preventative fungicide spray",
    ],
    organic_treatment: &[
        "Sulfur spray (3g/liter) every 10-14 days",
        "Baking soda solution (5g/liter water)",
        "Neem oil spray as preventative",
    ],
    chemical_treatment: Some(ChemicalTreatment {
        fungicides: &[
            "Myclobutanil (1ml/liter)",
            "Captan (2g/liter)",
            "Mancozeb (2g/liter)",
        ],
        application: "Apply at green tip stage and continue every 10-14 days",
        safety_interval: Some("14 days before harvest"),
    }),
    fertilizer_guidance: Some(FertilizerGuidance {
        recommended: &[
            "Balanced NPK (10:10:10) - 100kg/acre",
            "Calcium nitrate for fruit quality",
            "Boron spray during flowering",
        ],
        avoid: &[
            "Excess nitrogen during growing season",
            "Fresh manure near roots",
        ],
        ..FertilizerGuidance::EMPTY
    }),
    prevention: &[
        "Plant resistant varieties",
        "Maintain 15-20 feet spacing between trees",
        "Use drip irrigation instead of overhead",
        "Remove infected debris after harvest",
    ],
    expert_advice: Some(
        "Contact State Horticulture Department for resistant variety recommendations",
    ),
    ..DiseaseProfile::EMPTY
};

static APPLE_BLACK_ROT: DiseaseProfile = DiseaseProfile {
    disease_name: "Black Rot",
    scientific_name: Some("Botryosphaeria obtusa"),
    kind: "Fungal",
    season: &["Summer", "Monsoon"],
    symptoms: &[
        "Purple spots on leaves that enlarge",
        "Frogeye pattern with concentric rings",
        "Fruit rot with black concentric circles",
    ],
    immediate_actions: &[
        "Remove mummified fruit from trees",
        "Prune infected branches 6 inches below canker",
        "Destroy infected plant material",
    ],
    ..DiseaseProfile::EMPTY
};

static CEDAR_APPLE_RUST: DiseaseProfile = DiseaseProfile {
    disease_name: "Cedar Apple Rust",
    scientific_name: Some("Gymnosporangium juniperi-virginianae"),
    kind: "Fungal",
    symptoms: &[
        "Yellow-orange spots on upper leaf surface",
        "Cup-shaped structures on lower surface",
        "Premature leaf drop",
    ],
    prevention: &[
        "Remove nearby cedar trees if possible",
        "Plant resistant apple varieties",
        "Apply fungicides during pink bud stage",
    ],
    ..DiseaseProfile::EMPTY
};

static GRAY_LEAF_SPOT: DiseaseProfile = DiseaseProfile {
    disease_name: "Gray Leaf Spot",
    scientific_name: Some("Cercospora zeae-maydis"),
    kind: "Fungal",
    severity: Some("High"),
    symptoms: &[
        "Rectangular gray lesions on leaves",
        "Lesions parallel to leaf veins",
        "Complete leaf blighting in severe cases",
    ],
    immediate_actions: &[
        "Apply fungicide at first sign",
        "Rotate crops with non-host plants",
        "Use resistant hybrids",
    ],
    ..DiseaseProfile::EMPTY
};

static COMMON_RUST: DiseaseProfile = DiseaseProfile {
    disease_name: "Common Rust",
    scientific_name: Some("Puccinia sorghi"),
    kind: "Fungal",
    symptoms: &[
        "Small, circular to elongated pustules",
        "Reddish-brown to cinnamon-brown color",
        "Pustules rupture to release spores",
    ],
    fertilizer_guidance: Some(FertilizerGuidance {
        recommended: &["Potassium-rich fertilizer to improve resistance"],
        ..FertilizerGuidance::EMPTY
    }),
    ..DiseaseProfile::EMPTY
};

static NORTHERN_LEAF_BLIGHT: DiseaseProfile = DiseaseProfile {
    disease_name: "Northern Leaf Blight",
    scientific_name: Some("Exserohilum turcicum"),
    kind: "Fungal",
    symptoms: &[
        "Elliptical, gray-green lesions",
        "Lesions enlarge to cigar-shaped",
        "Complete leaf death in severe cases",
    ],
    ..DiseaseProfile::EMPTY
};

static GRAPE_BLACK_ROT: DiseaseProfile = DiseaseProfile {
    disease_name: "Black Rot",
    scientific_name: Some("Guignardia bidwellii"),
    kind: "Fungal",
    severity: Some("Critical"),
    impact: Some("Can cause 50-80% yield loss"),
    symptoms: &[
        "Small brown spots with black pycnidia",
        "Fruit shrivels into black mummies",
        "Yellow halos around leaf lesions",
    ],
    immediate_actions: &[
        "Remove infected clusters immediately",
        "Prune for maximum air circulation",
        "Apply fungicide before and after bloom",
    ],
    organic_treatment: &[
        "Bordeaux mixture (copper sulfate + lime)",
        "Serenade (Bacillus subtilis)",
        "Sulfur dust during dry weather",
    ],
    economic_impact: Some("Untreated: ₹15,000-25,000/acre loss"),
    ..DiseaseProfile::EMPTY
};

static ESCA: DiseaseProfile = DiseaseProfile {
    disease_name: "Esca (Black Measles)",
    kind: "Fungal complex",
    symptoms: &[
        "Tiger-stripe pattern on leaves",
        "Wood decay in trunk",
        "Sudden vine collapse",
    ],
    ..DiseaseProfile::EMPTY
};

static GRAPE_LEAF_BLIGHT: DiseaseProfile = DiseaseProfile {
    disease_name: "Leaf Blight",
    scientific_name: Some("Pseudocercospora vitis"),
    kind: "Fungal",
    symptoms: &[
        "Angular brown spots on leaves",
        "Yellowing and premature defoliation",
        "Reduced fruit quality",
    ],
    ..DiseaseProfile::EMPTY
};

static POTATO_EARLY_BLIGHT: DiseaseProfile = DiseaseProfile {
    disease_name: "Early Blight",
    scientific_name: Some("Alternaria solani"),
    kind: "Fungal",
    symptoms: &[
        "Concentric rings in lesions (target spots)",
        "Yellow halos around spots",
        "Starts on lower leaves",
    ],
    immediate_actions: &[
        "Remove lower infected leaves",
        "Apply fungicide at first symptoms",
        "Mulch to prevent soil splash",
    ],
    ..DiseaseProfile::EMPTY
};

static POTATO_LATE_BLIGHT: DiseaseProfile = DiseaseProfile {
    disease_name: "Late Blight",
    scientific_name: Some("Phytophthora infestans"),
    kind: "Oomycete",
    severity: Some("Emergency"),
    symptoms: &[
        "Water-soaked lesions that turn brown",
        "White fungal growth on underside",
        "Rapid plant collapse",
    ],
    immediate_actions: &[
        "Destroy infected plants immediately",
        "Apply systemic fungicide to surrounding plants",
        "Harvest early if possible",
    ],
    warning: Some("Can destroy entire field in 5-7 days"),
    ..DiseaseProfile::EMPTY
};

static TOMATO_BACTERIAL_SPOT: DiseaseProfile = DiseaseProfile {
    disease_name: "Bacterial Spot",
    scientific_name: Some("Xanthomonas spp."),
    kind: "Bacterial",
    symptoms: &[
        "Small, dark, water-soaked spots",
        "Spots become angular with yellow halos",
        "Fruit lesions are raised and scabby",
    ],
    treatment: Some("Copper-based bactericides + mancozeb"),
    ..DiseaseProfile::EMPTY
};

static TOMATO_EARLY_BLIGHT: DiseaseProfile = DiseaseProfile {
    disease_name: "Early Blight",
    scientific_name: Some("Alternaria solani"),
    kind: "Fungal",
    symptoms: &[
        "Bull's-eye pattern lesions",
        "Yellowing of lower leaves",
        "Defoliation starting from bottom",
    ],
    ..DiseaseProfile::EMPTY
};

static TOMATO_LATE_BLIGHT: DiseaseProfile = DiseaseProfile {
    disease_name: "Late Blight",
    scientific_name: Some("Phytophthora infestans"),
    kind: "Oomycete",
    severity: Some("Emergency"),
    symptoms: &[
        "Greasy, water-soaked lesions",
        "White mold on underside in humidity",
        "Rapid plant death",
    ],
    ..DiseaseProfile::EMPTY
};

static TOMATO_LEAF_MOLD: DiseaseProfile = DiseaseProfile {
    disease_name: "Leaf Mold",
    scientific_name: Some("Fulvia fulva"),
    kind: "Fungal",
    symptoms: &[
        "Yellow upper leaf surface",
        "Purple-gray mold on underside",
        "Leaves curl and die",
    ],
    ..DiseaseProfile::EMPTY
};

static SEPTORIA_LEAF_SPOT: DiseaseProfile = DiseaseProfile {
    disease_name: "Septoria Leaf Spot",
    scientific_name: Some("Septoria lycopersici"),
    kind: "Fungal",
    symptoms: &[
        "Small, circular spots with dark margins",
        "Tiny black pycnidia in center",
        "Severe defoliation",
    ],
    ..DiseaseProfile::EMPTY
};

static TOMATO_MOSAIC_VIRUS: DiseaseProfile = DiseaseProfile {
    disease_name: "Tomato Mosaic Virus",
    scientific_name: Some("Tobamovirus"),
    kind: "Viral",
    symptoms: &[
        "Mosaic pattern on leaves",
        "Leaf distortion and curling",
        "Stunted growth",
    ],
    critical_note: Some("NO CHEMICAL CURE - REMOVE INFECTED PLANTS"),
    ..DiseaseProfile::EMPTY
};

static YELLOW_LEAF_CURL_VIRUS: DiseaseProfile = DiseaseProfile {
    disease_name: "Yellow Leaf Curl Virus",
    scientific_name: Some("Begomovirus"),
    kind: "Viral",
    vector: Some("Whiteflies"),
    symptoms: &[
        "Upward curling of leaves",
        "Yellowing of leaf margins",
        "Severe stunting",
    ],
    critical_note: Some("CONTROL WHITEFLIES - Virus has no cure"),
    ..DiseaseProfile::EMPTY
};

static APPLE_CARE: HealthyGuidance = HealthyGuidance {
    routine_care: &[
        "Prune annually during dormancy",
        "Apply balanced fertilizer in spring",
        "Monitor for pests weekly",
    ],
    seasonal_tasks: &[
        "Winter: Dormant oil spray for pests",
        "Spring: Blossom thinning for better fruit",
        "Summer: Regular irrigation",
        "Autumn: Harvest and prepare for winter",
    ],
};

static CORN_CARE: HealthyGuidance = HealthyGuidance {
    routine_care: &[
        "Ensure proper plant spacing (8-12 inches)",
        "Side-dress with nitrogen at knee-high stage",
        "Keep field weed-free",
    ],
    seasonal_tasks: &[],
};

static GRAPE_CARE: HealthyGuidance = HealthyGuidance {
    routine_care: &[
        "Prune during dormancy",
        "Train vines properly",
        "Monitor soil moisture carefully",
    ],
    seasonal_tasks: &[],
};

static POTATO_CARE: HealthyGuidance = HealthyGuidance {
    routine_care: &[
        "Hill soil around plants",
        "Monitor for Colorado potato beetle",
        "Ensure good drainage",
    ],
    seasonal_tasks: &[],
};

static TOMATO_CARE: HealthyGuidance = HealthyGuidance {
    routine_care: &[
        "Stake plants for support",
        "Remove suckers regularly",
        "Mulch to conserve moisture",
    ],
    seasonal_tasks: &[],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_disease_label_resolves_except_target_spot() {
        let missing: Vec<&str> = LEAF_CLASSES
            .iter()
            .copied()
            .filter(|label| !label.ends_with("__healthy"))
            .filter(|label| disease_profile(label).is_none())
            .collect();
        assert_eq!(missing, vec!["Tomato__Target_Spot"]);
    }

    #[test]
    fn every_class_belongs_to_a_known_crop() {
        for label in LEAF_CLASSES {
            assert!(
                KNOWN_CROPS
                    .iter()
                    .any(|crop| label.starts_with(crop_label_prefix(crop))),
                "{label}"
            );
        }
    }

    #[test]
    fn corn_maps_to_maize_prefix() {
        assert_eq!(crop_label_prefix("Corn"), "Corn_(maize)");
        assert_eq!(crop_label_prefix("Tomato"), "Tomato");
    }
}
