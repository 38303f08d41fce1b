use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable key of a catalog entry, e.g. `magnesium-glycinate`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Vitamins")]
    Vitamins,
    #[serde(rename = "Minerals")]
    Minerals,
    #[serde(rename = "Essential Fatty Acids")]
    EssentialFattyAcids,
    #[serde(rename = "Digestive Health")]
    DigestiveHealth,
    #[serde(rename = "Adaptogens")]
    Adaptogens,
    #[serde(rename = "Antioxidants")]
    Antioxidants,
    #[serde(rename = "Sleep Support")]
    SleepSupport,
    #[serde(rename = "Amino Acids")]
    AminoAcids,
    #[serde(rename = "Anti-inflammatory")]
    AntiInflammatory,
    #[serde(rename = "Skin & Joint")]
    SkinAndJoint,
    #[serde(rename = "Cognitive Support")]
    CognitiveSupport,
    #[serde(rename = "Respiratory Support")]
    RespiratorySupport,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::Vitamins => "Vitamins",
            Category::Minerals => "Minerals",
            Category::EssentialFattyAcids => "Essential Fatty Acids",
            Category::DigestiveHealth => "Digestive Health",
            Category::Adaptogens => "Adaptogens",
            Category::Antioxidants => "Antioxidants",
            Category::SleepSupport => "Sleep Support",
            Category::AminoAcids => "Amino Acids",
            Category::AntiInflammatory => "Anti-inflammatory",
            Category::SkinAndJoint => "Skin & Joint",
            Category::CognitiveSupport => "Cognitive Support",
            Category::RespiratorySupport => "Respiratory Support",
        }
    }
}

/// Immutable catalog entry describing one recommendable supplement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub description: String,
    pub benefits: Vec<String>,
    pub dosage: String,
    pub timing: String,
    pub image_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog defines item '{0}' more than once")]
    DuplicateItem(ItemId),
    #[error("{table} references unknown item '{id}'")]
    UnknownItem { table: &'static str, id: String },
}

/// Read-only table of supplements. Declaration order doubles as the tie-break order for every
/// ranking produced against it.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<Item>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_items(items: Vec<Item>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if index.insert(item.id.0.clone(), position).is_some() {
                return Err(CatalogError::DuplicateItem(item.id.clone()));
            }
        }
        Ok(Self { items, index })
    }

    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_seeds(STANDARD_ITEMS)
    }

    fn from_seeds(seeds: &[ItemSeed]) -> Result<Self, CatalogError> {
        Self::from_items(seeds.iter().map(ItemSeed::build).collect())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.position(id).map(|position| &self.items[position])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub(crate) fn item_at(&self, position: usize) -> &Item {
        &self.items[position]
    }

    /// Fails on the first id in `ids` the catalog does not define.
    pub fn ensure_known<'a, I>(&self, table: &'static str, ids: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in ids {
            if !self.contains(id) {
                return Err(CatalogError::UnknownItem {
                    table,
                    id: id.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
struct ItemSeed {
    id: &'static str,
    name: &'static str,
    category: Category,
    description: &'static str,
    benefits: &'static [&'static str],
    dosage: &'static str,
    timing: &'static str,
}

impl ItemSeed {
    fn build(&self) -> Item {
        Item {
            id: ItemId::from(self.id),
            name: self.name.to_string(),
            category: self.category,
            description: self.description.to_string(),
            benefits: self.benefits.iter().map(|b| b.to_string()).collect(),
            dosage: self.dosage.to_string(),
            timing: self.timing.to_string(),
            image_ref: format!("/images/supplements/{}.png", self.id),
        }
    }
}

const STANDARD_ITEMS: &[ItemSeed] = &[
    ItemSeed {
        id: "multivitamin",
        name: "Daily Multivitamin",
        category: Category::Vitamins,
        description: "Broad-spectrum vitamin and mineral formula covering common dietary gaps.",
        benefits: &["Fills nutritional gaps", "Supports overall wellness", "Convenient daily coverage"],
        dosage: "1 tablet daily",
        timing: "With breakfast",
    },
    ItemSeed {
        id: "vitamin-d3",
        name: "Vitamin D3",
        category: Category::Vitamins,
        description: "Cholecalciferol, the form of vitamin D the body produces from sunlight.",
        benefits: &["Supports bone health", "Supports immune function", "Supports mood"],
        dosage: "1000-2000 IU daily",
        timing: "With a meal containing fat",
    },
    ItemSeed {
        id: "omega-3",
        name: "Omega-3 Fish Oil",
        category: Category::EssentialFattyAcids,
        description: "EPA and DHA fatty acids from purified fish oil.",
        benefits: &["Supports heart health", "Supports brain function", "Reduces inflammation"],
        dosage: "1000 mg combined EPA/DHA daily",
        timing: "With meals",
    },
    ItemSeed {
        id: "vitamin-b-complex",
        name: "Vitamin B Complex",
        category: Category::Vitamins,
        description: "All eight B vitamins involved in energy metabolism.",
        benefits: &["Supports energy production", "Supports nervous system", "Reduces fatigue"],
        dosage: "1 capsule daily",
        timing: "Morning with food",
    },
    ItemSeed {
        id: "vitamin-b12",
        name: "Vitamin B12",
        category: Category::Vitamins,
        description: "Methylcobalamin for red blood cell formation and nerve health.",
        benefits: &["Supports energy levels", "Supports nerve function", "Supports red blood cells"],
        dosage: "500-1000 mcg daily",
        timing: "Morning",
    },
    ItemSeed {
        id: "vitamin-c",
        name: "Vitamin C",
        category: Category::Antioxidants,
        description: "Ascorbic acid, a water-soluble antioxidant.",
        benefits: &["Supports immune function", "Supports collagen synthesis", "Antioxidant protection"],
        dosage: "500-1000 mg daily",
        timing: "Split between morning and evening",
    },
    ItemSeed {
        id: "magnesium-glycinate",
        name: "Magnesium Glycinate",
        category: Category::Minerals,
        description: "Highly absorbable magnesium bound to glycine.",
        benefits: &["Supports restful sleep", "Supports muscle relaxation", "Supports stress response"],
        dosage: "200-400 mg daily",
        timing: "Evening, 1 hour before bed",
    },
    ItemSeed {
        id: "zinc",
        name: "Zinc Picolinate",
        category: Category::Minerals,
        description: "Well-absorbed zinc for immune and skin health.",
        benefits: &["Supports immune function", "Supports wound healing", "Supports skin health"],
        dosage: "15-30 mg daily",
        timing: "With a meal",
    },
    ItemSeed {
        id: "iron",
        name: "Iron Bisglycinate",
        category: Category::Minerals,
        description: "Gentle, non-constipating iron chelate.",
        benefits: &["Supports oxygen transport", "Reduces tiredness", "Supports healthy blood"],
        dosage: "18-25 mg daily",
        timing: "Morning on an empty stomach, with vitamin C",
    },
    ItemSeed {
        id: "calcium",
        name: "Calcium Citrate",
        category: Category::Minerals,
        description: "Calcium in a form that does not depend on stomach acid for absorption.",
        benefits: &["Supports bone density", "Supports muscle contraction", "Supports nerve signalling"],
        dosage: "500 mg twice daily",
        timing: "With meals, apart from iron",
    },
    ItemSeed {
        id: "probiotics",
        name: "Probiotic Blend",
        category: Category::DigestiveHealth,
        description: "Multi-strain Lactobacillus and Bifidobacterium blend.",
        benefits: &["Supports digestive balance", "Supports gut barrier", "Supports immune health"],
        dosage: "10-20 billion CFU daily",
        timing: "Morning on an empty stomach",
    },
    ItemSeed {
        id: "coq10",
        name: "Coenzyme Q10",
        category: Category::Antioxidants,
        description: "Ubiquinol for cellular energy production.",
        benefits: &["Supports cellular energy", "Supports heart health", "Antioxidant protection"],
        dosage: "100-200 mg daily",
        timing: "With a meal containing fat",
    },
    ItemSeed {
        id: "ashwagandha",
        name: "Ashwagandha",
        category: Category::Adaptogens,
        description: "KSM-66 root extract, a traditional adaptogenic herb.",
        benefits: &["Supports stress resilience", "Supports balanced cortisol", "Supports calm focus"],
        dosage: "300-600 mg daily",
        timing: "Evening",
    },
    ItemSeed {
        id: "l-theanine",
        name: "L-Theanine",
        category: Category::AminoAcids,
        description: "Amino acid found in green tea that promotes relaxed alertness.",
        benefits: &["Promotes relaxation", "Supports focus", "Supports sleep quality"],
        dosage: "100-200 mg daily",
        timing: "As needed, or before bed",
    },
    ItemSeed {
        id: "melatonin",
        name: "Melatonin",
        category: Category::SleepSupport,
        description: "Low-dose melatonin to support the natural sleep-wake cycle.",
        benefits: &["Supports falling asleep", "Supports circadian rhythm", "Helps with jet lag"],
        dosage: "0.5-3 mg",
        timing: "30 minutes before bed",
    },
    ItemSeed {
        id: "turmeric-curcumin",
        name: "Turmeric Curcumin",
        category: Category::AntiInflammatory,
        description: "Standardised curcuminoids with black pepper extract for absorption.",
        benefits: &["Supports joint comfort", "Supports healthy inflammatory response", "Antioxidant protection"],
        dosage: "500-1000 mg daily",
        timing: "With meals",
    },
    ItemSeed {
        id: "collagen-peptides",
        name: "Collagen Peptides",
        category: Category::SkinAndJoint,
        description: "Hydrolysed type I and III collagen.",
        benefits: &["Supports skin elasticity", "Supports joint health", "Supports hair and nails"],
        dosage: "10 g daily",
        timing: "Any time, mixed into a drink",
    },
    ItemSeed {
        id: "biotin",
        name: "Biotin",
        category: Category::Vitamins,
        description: "Vitamin B7 for keratin production.",
        benefits: &["Supports hair strength", "Supports nail health", "Supports skin"],
        dosage: "2500-5000 mcg daily",
        timing: "With breakfast",
    },
    ItemSeed {
        id: "lions-mane",
        name: "Lion's Mane Mushroom",
        category: Category::CognitiveSupport,
        description: "Hericium erinaceus fruiting body extract.",
        benefits: &["Supports memory", "Supports focus", "Supports nerve growth factor"],
        dosage: "500-1000 mg daily",
        timing: "Morning",
    },
    ItemSeed {
        id: "quercetin",
        name: "Quercetin",
        category: Category::RespiratorySupport,
        description: "Plant flavonoid that supports a balanced histamine response.",
        benefits: &["Supports seasonal comfort", "Supports immune balance", "Antioxidant protection"],
        dosage: "500 mg daily",
        timing: "With meals",
    },
    ItemSeed {
        id: "nac",
        name: "N-Acetyl Cysteine",
        category: Category::RespiratorySupport,
        description: "Precursor to glutathione that thins mucus.",
        benefits: &["Supports respiratory health", "Supports glutathione levels", "Supports detoxification"],
        dosage: "600 mg daily",
        timing: "Between meals",
    },
];
