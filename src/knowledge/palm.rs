use super::{ChemicalTreatment, FertilizerGuidance, TextList};

/// Output order of the arecanut/coconut model.
pub const PALM_CLASSES: [&str; 4] = [
    "Arecanut_Healthy",
    "Arecanut_Disease",
    "Coconut_Healthy",
    "Coconut_Disease",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PalmCrop {
    Arecanut,
    Coconut,
}

impl PalmCrop {
    pub fn from_label(label: &str) -> Self {
        if label.contains("Arecanut") {
            PalmCrop::Arecanut
        } else {
            PalmCrop::Coconut
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PalmCrop::Arecanut => "Arecanut",
            PalmCrop::Coconut => "Coconut",
        }
    }
}

#[derive(Debug)]
pub struct PalmDiseaseInfo {
    pub common_diseases: TextList,
    pub symptoms: TextList,
    pub immediate_actions: TextList,
    pub chemical_treatment: ChemicalTreatment,
    pub organic_management: TextList,
    pub fertilizer_guidance: FertilizerGuidance,
    pub prevention: TextList,
    pub economic_impact: &'static str,
    pub expert_contact: &'static str,
}

#[derive(Debug)]
pub struct PalmGuidance {
    pub routine_care: TextList,
    pub nutrient_management: TextList,
    pub harvest_management: TextList,
}

pub fn disease_info(label: &str) -> Option<&'static PalmDiseaseInfo> {
    match label {
        "Arecanut_Disease" => Some(&ARECANUT_DISEASE),
        "Coconut_Disease" => Some(&COCONUT_DISEASE),
        _ => None,
    }
}

pub fn healthy_guidance(crop: PalmCrop) -> &'static PalmGuidance {
    match crop {
        PalmCrop::Arecanut => &ARECANUT_CARE,
        PalmCrop::Coconut => &COCONUT_CARE,
    }
}

static ARECANUT_DISEASE: PalmDiseaseInfo = PalmDiseaseInfo {
    common_diseases: &[
        "Bud Rot (Phytophthora palmivora)",
        "Foot Rot (Ganoderma lucidum)",
        "Inflorescence Dieback",
        "Yellow Leaf Disease",
    ],
    symptoms: &[
        "Yellowing and drooping of leaves",
        "Rotting of spindle leaf",
        "Premature nut drop",
        "Black lesions on stem",
    ],
    immediate_actions: &[
        "Remove and destroy infected palms",
        "Improve drainage around plants",
        "Apply Trichoderma around root zone",
        "Avoid wounding during maintenance",
    ],
    chemical_treatment: ChemicalTreatment {
        fungicides: &[
            "Metalaxyl + Mancozeb (2g/liter) for Bud Rot",
            "Carbendazim (1g/liter) for leaf spots",
            "Copper oxychloride (3g/liter) as preventive",
        ],
        application: "Spray during early morning, repeat after 15 days",
        safety_interval: None,
    },
    organic_management: &[
        "Apply neem cake (5kg/palm/year)",
        "Use Trichoderma viride powder (50g/palm)",
        "Garlic extract spray for leaf spots",
        "Proper spacing (2.7m x 2.7m minimum)",
    ],
    fertilizer_guidance: FertilizerGuidance {
        recommended: &[
            "N:P:K 40:80:80 g/palm/year",
            "Organic manure 10-15 kg/palm/year",
            "Micronutrients: Boron and Magnesium",
        ],
        avoid: &[
            "Excess nitrogen during rainy season",
            "Fresh cow dung near stem",
        ],
        timing: None,
    },
    prevention: &[
        "Plant disease-free seedlings",
        "Ensure good drainage",
        "Maintain proper plant hygiene",
        "Regular removal of diseased leaves",
    ],
    economic_impact: "Yield loss up to 60% if untreated",
    expert_contact: "State Horticulture Department - Arecanut Research Station",
};

static COCONUT_DISEASE: PalmDiseaseInfo = PalmDiseaseInfo {
    common_diseases: &[
        "Leaf Rot (Exserohilum rostratum)",
        "Stem Bleeding (Thielaviopsis paradoxa)",
        "Bud Rot (Phytophthora palmivora)",
        "Root Wilt Disease",
    ],
    symptoms: &[
        "Yellowing and wilting of leaves",
        "Lesions on leaflets",
        "Premature nut fall",
        "Oozing from stem (gummosis)",
    ],
    immediate_actions: &[
        "Remove severely infected palms",
        "Apply copper fungicide to cut surfaces",
        "Improve soil aeration",
        "Control root grubs and beetles",
    ],
    chemical_treatment: ChemicalTreatment {
        fungicides: &[
            "Mancozeb (3g/liter) for leaf spots",
            "Hexaconazole (1ml/liter) for bud rot",
            "Bordeaux paste for stem bleeding",
        ],
        application: "Spray crown and stem, repeat after 21 days",
        safety_interval: None,
    },
    organic_management: &[
        "Apply neem cake (10kg/palm/year)",
        "Use Pseudomonas fluorescens biocontrol",
        "Ash application for stem bleeding",
        "Intercrop with legumes for soil health",
    ],
    fertilizer_guidance: FertilizerGuidance {
        recommended: &[
            "N:P:K 500:320:1200 g/palm/year",
            "Organic manure 50 kg/palm/year",
            "Salt application (1-2 kg/palm/year)",
        ],
        avoid: &[],
        timing: Some("Split into 3 applications: Apr-May, Sep-Oct, Jan-Feb"),
    },
    prevention: &[
        "Select disease-resistant varieties",
        "Maintain proper spacing (7.5m x 7.5m)",
        "Practice regular pruning",
        "Avoid mechanical injuries",
    ],
    economic_impact: "Can cause 40-70% yield reduction",
    expert_contact: "Coconut Development Board / Krishi Vigyan Kendra",
};

static ARECANUT_CARE: PalmGuidance = PalmGuidance {
    routine_care: &[
        "Regular irrigation during dry periods",
        "Mulching with coconut husk or leaves",
        "Annual manure application",
        "Intercropping with banana or pepper",
    ],
    nutrient_management: &[
        "Apply 100g N, 40g P2O5, 140g K2O per palm",
        "Supplement with green manure crops",
        "Apply magnesium sulfate for yellow leaves",
    ],
    harvest_management: &[
        "Harvest mature nuts (6-8 months old)",
        "Process nuts within 24 hours of harvest",
        "Sun dry for 45-60 days",
    ],
};

static COCONUT_CARE: PalmGuidance = PalmGuidance {
    routine_care: &[
        "Ensure 150-200 liters water per palm weekly",
        "Practice basin irrigation",
        "Remove dried leaves and inflorescence",
        "Control rhinoceros beetle",
    ],
    nutrient_management: &[
        "Apply 1.3 kg urea, 2.0 kg super phosphate, 2.0 kg MOP per palm/year",
        "Apply 50 kg organic manure annually",
        "Boron spray for button shedding",
    ],
    harvest_management: &[
        "Harvest tender nuts at 7th month",
        "Harvest mature nuts at 12th month",
        "Yield: 80-100 nuts/palm/year (good management)",
    ],
};
