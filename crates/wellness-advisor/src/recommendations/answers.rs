use serde::{Deserialize, Serialize};

/// Declares a closed questionnaire vocabulary. Values travel as their exact label; any other
/// string lands in `Unrecognized` and carries no signal.
macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unrecognized(String),
        }

        impl $name {
            /// Every recognized value, in declaration order.
            pub fn known() -> Vec<Self> {
                vec![$(Self::$variant),+]
            }

            pub fn from_label(label: &str) -> Self {
                match label {
                    $($label => Self::$variant,)+
                    other => Self::Unrecognized(other.to_string()),
                }
            }

            pub fn label(&self) -> &str {
                match self {
                    $(Self::$variant => $label,)+
                    Self::Unrecognized(raw) => raw.as_str(),
                }
            }

            pub fn is_recognized(&self) -> bool {
                !matches!(self, Self::Unrecognized(_))
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::from_label(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.label().to_string()
            }
        }
    };
}

vocabulary! {
    /// Outcomes the user wants from supplementation.
    Goal {
        EnergyBoost => "Energy Boost",
        ImmuneSupport => "Immune Support",
        BetterSleep => "Better Sleep",
        StressRelief => "Stress Relief",
        HeartHealth => "Heart Health",
        CognitiveFunction => "Cognitive Function",
        DigestiveHealth => "Digestive Health",
        JointSupport => "Joint Support",
        SkinHealth => "Skin Health",
        AthleticPerformance => "Athletic Performance",
        WeightManagement => "Weight Management",
        HealthyAging => "Healthy Aging",
    }
}

vocabulary! {
    Lifestyle {
        VeryActive => "Very Active",
        ModeratelyActive => "Moderately Active",
        LightlyActive => "Lightly Active",
        Sedentary => "Sedentary",
    }
}

vocabulary! {
    /// Health concerns the user reports today.
    Concern {
        Fatigue => "Fatigue",
        PoorSleep => "Poor Sleep",
        HighStress => "High Stress",
        FrequentIllness => "Frequent Illness",
        JointPain => "Joint Pain",
        DigestiveIssues => "Digestive Issues",
        BrainFog => "Brain Fog",
        LowMood => "Low Mood",
        MuscleCramps => "Muscle Cramps",
        Inflammation => "Inflammation",
    }
}

vocabulary! {
    /// Nutrient deficiencies, either diagnosed or inferred from concerns.
    Deficiency {
        VitaminD => "Vitamin D",
        VitaminB12 => "Vitamin B12",
        Iron => "Iron",
        Magnesium => "Magnesium",
        Omega3 => "Omega-3",
        Zinc => "Zinc",
        Calcium => "Calcium",
        VitaminC => "Vitamin C",
    }
}

vocabulary! {
    SleepQuality {
        Excellent => "Excellent",
        Good => "Good",
        Fair => "Fair",
        Poor => "Poor",
    }
}

vocabulary! {
    StressLevel {
        Low => "Low",
        Moderate => "Moderate",
        High => "High",
        VeryHigh => "Very High",
    }
}

vocabulary! {
    EnergyLevel {
        High => "High",
        Moderate => "Moderate",
        Low => "Low",
        VeryLow => "Very Low",
    }
}

vocabulary! {
    CognitiveGoal {
        Focus => "Focus",
        Memory => "Memory",
        MentalClarity => "Mental Clarity",
        Learning => "Learning",
    }
}

vocabulary! {
    SkinConcern {
        Dryness => "Dryness",
        Aging => "Aging",
        Acne => "Acne",
        HairAndNails => "Hair & Nails",
    }
}

vocabulary! {
    RespiratoryIssue {
        Allergies => "Allergies",
        Congestion => "Congestion",
        Asthma => "Asthma",
        FrequentColds => "Frequent Colds",
    }
}

/// Age ranges the weight tables react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBracket {
    Under30,
    Middle,
    FiftyPlus,
}

impl AgeBracket {
    pub fn from_years(years: u16) -> Self {
        match years {
            0..=29 => Self::Under30,
            30..=49 => Self::Middle,
            _ => Self::FiftyPlus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("age {age} is outside the accepted range 0-{max}")]
    AgeOutOfRange { age: u16, max: u16 },
}

/// Questionnaire answers for one assessment. Every field is optional; an empty record is valid
/// and yields the essential set only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerRecord {
    pub age_years: Option<u16>,
    pub goals: Vec<Goal>,
    pub lifestyle: Option<Lifestyle>,
    pub concerns: Vec<Concern>,
    pub deficiencies: Vec<Deficiency>,
    pub sleep_quality: Option<SleepQuality>,
    pub stress_level: Option<StressLevel>,
    pub energy_level: Option<EnergyLevel>,
    pub cognitive_goals: Vec<CognitiveGoal>,
    pub skin_concerns: Vec<SkinConcern>,
    pub respiratory_issues: Vec<RespiratoryIssue>,
}

impl AnswerRecord {
    /// Range check applied where answers enter the system.
    pub fn validate(&self, max_age: u16) -> Result<(), AnswerError> {
        match self.age_years {
            Some(age) if age > max_age => Err(AnswerError::AgeOutOfRange { age, max: max_age }),
            _ => Ok(()),
        }
    }

    pub fn age_bracket(&self) -> Option<AgeBracket> {
        self.age_years.map(AgeBracket::from_years)
    }

    pub fn is_fifty_plus(&self) -> bool {
        self.age_bracket() == Some(AgeBracket::FiftyPlus)
    }

    pub fn has_goal(&self, goal: &Goal) -> bool {
        self.goals.contains(goal)
    }

    pub fn has_concern(&self, concern: &Concern) -> bool {
        self.concerns.contains(concern)
    }

    pub fn has_deficiency(&self, deficiency: &Deficiency) -> bool {
        self.deficiencies.contains(deficiency)
    }

    pub fn lifestyle_is(&self, lifestyle: &Lifestyle) -> bool {
        self.lifestyle.as_ref() == Some(lifestyle)
    }

    pub fn sleep_is_poor(&self) -> bool {
        matches!(
            self.sleep_quality,
            Some(SleepQuality::Poor) | Some(SleepQuality::Fair)
        )
    }

    pub fn stress_is_high(&self) -> bool {
        matches!(
            self.stress_level,
            Some(StressLevel::High) | Some(StressLevel::VeryHigh)
        )
    }

    pub fn energy_is_low(&self) -> bool {
        matches!(
            self.energy_level,
            Some(EnergyLevel::Low) | Some(EnergyLevel::VeryLow)
        )
    }

    pub fn has_cognitive_goals(&self) -> bool {
        self.cognitive_goals.iter().any(CognitiveGoal::is_recognized)
    }

    pub fn has_skin_concerns(&self) -> bool {
        self.skin_concerns.iter().any(SkinConcern::is_recognized)
    }

    pub fn has_respiratory_issues(&self) -> bool {
        self.respiratory_issues
            .iter()
            .any(RespiratoryIssue::is_recognized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn labels_round_trip_and_unknown_values_are_kept_aside() {
        assert_eq!(Goal::from_label("Energy Boost"), Goal::EnergyBoost);
        assert_eq!(Goal::EnergyBoost.label(), "Energy Boost");
        assert_eq!(
            Lifestyle::from_label("Nomadic"),
            Lifestyle::Unrecognized("Nomadic".to_string())
        );
        assert!(!Lifestyle::from_label("nomadic").is_recognized());
        assert!(!Goal::from_label("energy boost").is_recognized());
    }

    #[test]
    fn deserializes_questionnaire_payload() {
        let payload = json!({
            "age_years": 41,
            "goals": ["Better Sleep", "Astral Projection"],
            "lifestyle": "Very Active",
            "concerns": ["Poor Sleep"],
            "stress_level": "Very High",
        });

        let answers: AnswerRecord = serde_json::from_value(payload).expect("answers parse");

        assert_eq!(answers.age_bracket(), Some(AgeBracket::Middle));
        assert!(answers.has_goal(&Goal::BetterSleep));
        assert_eq!(
            answers.goals[1],
            Goal::Unrecognized("Astral Projection".to_string())
        );
        assert!(answers.lifestyle_is(&Lifestyle::VeryActive));
        assert!(answers.stress_is_high());
        assert!(answers.deficiencies.is_empty());
        assert!(answers.sleep_quality.is_none());
    }

    #[test]
    fn serializes_labels_verbatim() {
        let answers = AnswerRecord {
            skin_concerns: vec![SkinConcern::HairAndNails],
            ..AnswerRecord::default()
        };
        let value = serde_json::to_value(&answers).expect("serializes");
        assert_eq!(value["skin_concerns"], json!(["Hair & Nails"]));
    }

    #[test]
    fn age_brackets_split_at_thirty_and_fifty() {
        assert_eq!(AgeBracket::from_years(0), AgeBracket::Under30);
        assert_eq!(AgeBracket::from_years(29), AgeBracket::Under30);
        assert_eq!(AgeBracket::from_years(30), AgeBracket::Middle);
        assert_eq!(AgeBracket::from_years(49), AgeBracket::Middle);
        assert_eq!(AgeBracket::from_years(50), AgeBracket::FiftyPlus);
    }

    #[test]
    fn validate_rejects_implausible_ages() {
        let answers = AnswerRecord {
            age_years: Some(430),
            ..AnswerRecord::default()
        };
        assert_eq!(
            answers.validate(120),
            Err(AnswerError::AgeOutOfRange { age: 430, max: 120 })
        );
        assert!(AnswerRecord::default().validate(120).is_ok());
    }

    #[test]
    fn negative_ages_do_not_deserialize() {
        let result = serde_json::from_value::<AnswerRecord>(json!({ "age_years": -4 }));
        assert!(result.is_err());
    }

    #[test]
    fn unrecognized_conditional_answers_do_not_count() {
        let answers = AnswerRecord {
            respiratory_issues: vec![RespiratoryIssue::from_label("Hiccups")],
            ..AnswerRecord::default()
        };
        assert!(!answers.has_respiratory_issues());
    }
}
