//! Goal-specific details form.
//!
//! Each goal carries its own schema: one category field whose `custom`
//! option requires a paired free-text field, and one level field.

use serde::Serialize;

use super::catalog::GoalKind;

/// Option value that switches a category field to free text.
pub const CUSTOM_OPTION: &str = "custom";

/// One selectable option of a details field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn opt(value: &'static str, label: &'static str) -> FieldOption {
    FieldOption { value, label }
}

/// A select field, optionally paired with a free-text field used when
/// [`CUSTOM_OPTION`] is chosen.
#[derive(Debug, Clone, Serialize)]
pub struct SelectField {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_key: Option<&'static str>,
    pub options: &'static [FieldOption],
}

impl SelectField {
    fn accepts(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// Field layout of a goal's details form.
#[derive(Debug, Clone, Serialize)]
pub struct DetailsSchema {
    pub goal: GoalKind,
    pub category: SelectField,
    pub level: SelectField,
}

pub static INTERVIEW_SCHEMA: DetailsSchema = DetailsSchema {
    goal: GoalKind::Interview,
    category: SelectField {
        key: "industry",
        label: "Target Industry",
        custom_key: Some("customIndustry"),
        options: &[
            opt("tech", "Technology"),
            opt("finance", "Finance"),
            opt("healthcare", "Healthcare"),
            opt("marketing", "Marketing"),
            opt("retail", "Retail"),
            opt("education", "Education"),
            opt("consulting", "Consulting"),
            opt(CUSTOM_OPTION, "Other (Type below)"),
        ],
    },
    level: SelectField {
        key: "roleLevel",
        label: "Role Level",
        custom_key: None,
        options: &[
            opt("intern", "Internship"),
            opt("junior", "Junior / Entry Level"),
            opt("mid", "Mid-Senior"),
            opt("manager", "Manager / Director"),
            opt("exec", "Executive"),
        ],
    },
};

pub static EXAM_SCHEMA: DetailsSchema = DetailsSchema {
    goal: GoalKind::Exam,
    category: SelectField {
        key: "subject",
        label: "Subject / Field",
        custom_key: Some("customSubject"),
        options: &[
            opt("history", "History"),
            opt("biology", "Biology"),
            opt("law", "Law"),
            opt("cs", "Computer Science"),
            opt("business", "Business"),
            opt("psychology", "Psychology"),
            opt("literature", "Literature"),
            opt("engineering", "Engineering"),
            opt(CUSTOM_OPTION, "Other (Type below)"),
        ],
    },
    level: SelectField {
        key: "examType",
        label: "Exam Type",
        custom_key: None,
        options: &[
            opt("thesis", "Thesis Defense"),
            opt("viva", "Viva Voce"),
            opt("language", "Language Proficiency"),
            opt("medical", "Medical Clinical"),
        ],
    },
};

pub static PRESENTATION_SCHEMA: DetailsSchema = DetailsSchema {
    goal: GoalKind::Presentation,
    category: SelectField {
        key: "topic",
        label: "Presentation Topic",
        custom_key: Some("customTopic"),
        options: &[
            opt("sales", "Sales Pitch"),
            opt("update", "Project Update"),
            opt("investor", "Investor Deck"),
            opt("keynote", "Keynote Speech"),
            opt("training", "Training Session"),
            opt("launch", "Product Launch"),
            opt(CUSTOM_OPTION, "Other (Type below)"),
        ],
    },
    level: SelectField {
        key: "audience",
        label: "Target Audience",
        custom_key: None,
        options: &[
            opt("investors", "Investors"),
            opt("colleagues", "Colleagues / Team"),
            opt("clients", "Clients"),
            opt("students", "Students"),
            opt("public", "General Public"),
        ],
    },
};

pub static CONVERSATION_SCHEMA: DetailsSchema = DetailsSchema {
    goal: GoalKind::Conversation,
    category: SelectField {
        key: "scenario",
        label: "Scenario",
        custom_key: Some("customScenario"),
        options: &[
            opt("casual", "Casual Chat"),
            opt("networking", "Networking Event"),
            opt("date", "First Date"),
            opt("conflict", "Conflict Resolution"),
            opt("negotiation", "Negotiation"),
            opt("travel", "Travel / Directions"),
            opt("food", "Ordering Food"),
            opt(CUSTOM_OPTION, "Other (Type below)"),
        ],
    },
    level: SelectField {
        key: "languageLevel",
        label: "Difficulty Level",
        custom_key: None,
        options: &[
            opt("beginner", "Beginner (A1-A2)"),
            opt("intermediate", "Intermediate (B1-B2)"),
            opt("advanced", "Advanced (C1-C2)"),
            opt("native", "Native / Fluent"),
        ],
    },
};

impl GoalKind {
    /// Details form layout for this goal.
    pub fn schema(&self) -> &'static DetailsSchema {
        match self {
            Self::Interview => &INTERVIEW_SCHEMA,
            Self::Exam => &EXAM_SCHEMA,
            Self::Presentation => &PRESENTATION_SCHEMA,
            Self::Conversation => &CONVERSATION_SCHEMA,
        }
    }
}

/// Answer to a category field: the selected option plus free text used
/// when the selection is [`CUSTOM_OPTION`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryAnswer {
    pub selected: String,
    pub custom: String,
}

impl CategoryAnswer {
    /// The effective value, or `None` while the field is incomplete.
    pub fn resolved(&self) -> Option<&str> {
        let value = if self.selected == CUSTOM_OPTION {
            self.custom.trim()
        } else {
            self.selected.as_str()
        };
        (!value.is_empty()).then_some(value)
    }
}

/// Details collected for the selected goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "goal", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum GoalDetails {
    Interview {
        industry: CategoryAnswer,
        role_level: String,
    },
    Exam {
        subject: CategoryAnswer,
        exam_type: String,
    },
    Presentation {
        topic: CategoryAnswer,
        audience: String,
    },
    Conversation {
        scenario: CategoryAnswer,
        language_level: String,
    },
}

impl GoalDetails {
    /// Blank details for `goal`.
    pub fn empty(goal: GoalKind) -> Self {
        match goal {
            GoalKind::Interview => Self::Interview {
                industry: CategoryAnswer::default(),
                role_level: String::new(),
            },
            GoalKind::Exam => Self::Exam {
                subject: CategoryAnswer::default(),
                exam_type: String::new(),
            },
            GoalKind::Presentation => Self::Presentation {
                topic: CategoryAnswer::default(),
                audience: String::new(),
            },
            GoalKind::Conversation => Self::Conversation {
                scenario: CategoryAnswer::default(),
                language_level: String::new(),
            },
        }
    }

    pub fn goal(&self) -> GoalKind {
        match self {
            Self::Interview { .. } => GoalKind::Interview,
            Self::Exam { .. } => GoalKind::Exam,
            Self::Presentation { .. } => GoalKind::Presentation,
            Self::Conversation { .. } => GoalKind::Conversation,
        }
    }

    pub fn schema(&self) -> &'static DetailsSchema {
        self.goal().schema()
    }

    fn parts(&self) -> (&CategoryAnswer, &String) {
        match self {
            Self::Interview { industry, role_level } => (industry, role_level),
            Self::Exam { subject, exam_type } => (subject, exam_type),
            Self::Presentation { topic, audience } => (topic, audience),
            Self::Conversation {
                scenario,
                language_level,
            } => (scenario, language_level),
        }
    }

    fn parts_mut(&mut self) -> (&mut CategoryAnswer, &mut String) {
        match self {
            Self::Interview { industry, role_level } => (industry, role_level),
            Self::Exam { subject, exam_type } => (subject, exam_type),
            Self::Presentation { topic, audience } => (topic, audience),
            Self::Conversation {
                scenario,
                language_level,
            } => (scenario, language_level),
        }
    }

    /// Set a field by its schema key.
    ///
    /// Select fields only accept values from their option list; the custom
    /// text field accepts anything. Returns `false` when the key is not part
    /// of this goal's schema or the value is not an allowed option.
    pub fn set_field(&mut self, key: &str, value: &str) -> bool {
        let schema = self.schema();
        let (category, level) = self.parts_mut();

        if key == schema.category.key {
            if !schema.category.accepts(value) {
                return false;
            }
            category.selected = value.to_string();
            true
        } else if Some(key) == schema.category.custom_key {
            category.custom = value.to_string();
            true
        } else if key == schema.level.key {
            if !schema.level.accepts(value) {
                return false;
            }
            *level = value.to_string();
            true
        } else {
            false
        }
    }

    /// Whether every required field is filled in.
    pub fn is_complete(&self) -> bool {
        let (category, level) = self.parts();
        category.resolved().is_some() && !level.is_empty()
    }
}
