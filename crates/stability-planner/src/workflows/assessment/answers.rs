use serde::{Deserialize, Serialize};

/// Current work situation reported by the person completing the questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentStatus {
    #[serde(rename = "Employed full-time")]
    EmployedFullTime,
    #[serde(rename = "Employed part-time")]
    EmployedPartTime,
    #[serde(rename = "Recently laid off")]
    RecentlyLaidOff,
    #[serde(rename = "Unemployed (3+ months)")]
    LongTermUnemployed,
    #[serde(rename = "Self-employed / gig work")]
    SelfEmployed,
    #[serde(rename = "Retired / not seeking work")]
    NotSeekingWork,
}

impl EmploymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EmployedFullTime => "Employed full-time",
            Self::EmployedPartTime => "Employed part-time",
            Self::RecentlyLaidOff => "Recently laid off",
            Self::LongTermUnemployed => "Unemployed (3+ months)",
            Self::SelfEmployed => "Self-employed / gig work",
            Self::NotSeekingWork => "Retired / not seeking work",
        }
    }

    /// True for the statuses that route to unemployment benefits and job search help.
    pub const fn is_out_of_work(self) -> bool {
        matches!(self, Self::RecentlyLaidOff | Self::LongTermUnemployed)
    }
}

/// Expense areas currently causing the most financial pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PressureArea {
    #[serde(rename = "Rent / housing")]
    Housing,
    #[serde(rename = "Utilities")]
    Utilities,
    #[serde(rename = "Food")]
    Food,
    #[serde(rename = "Transportation")]
    Transportation,
    #[serde(rename = "Debt")]
    Debt,
    #[serde(rename = "Medical")]
    Medical,
    #[serde(rename = "Childcare")]
    Childcare,
    #[serde(rename = "Insurance")]
    Insurance,
}

impl PressureArea {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Housing => "Rent / housing",
            Self::Utilities => "Utilities",
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Debt => "Debt",
            Self::Medical => "Medical",
            Self::Childcare => "Childcare",
            Self::Insurance => "Insurance",
        }
    }

    /// Basic-needs pressures that pull assistance resources into the immediate phase.
    pub const fn is_basic_need(self) -> bool {
        matches!(self, Self::Housing | Self::Food | Self::Utilities)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleAccess {
    #[serde(rename = "Yes, reliable")]
    Reliable,
    #[serde(rename = "Yes, unreliable")]
    Unreliable,
    #[serde(rename = "No")]
    None,
}

impl VehicleAccess {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reliable => "Yes, reliable",
            Self::Unreliable => "Yes, unreliable",
            Self::None => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelAbility {
    Yes,
    Limited,
    No,
}

impl TravelAbility {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::Limited => "Limited",
            Self::No => "No",
        }
    }
}

/// Fixed skill catalog; at most three may be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    #[serde(rename = "Creative / design")]
    CreativeDesign,
    #[serde(rename = "Writing / content")]
    WritingContent,
    #[serde(rename = "Tech / troubleshooting")]
    TechTroubleshooting,
    #[serde(rename = "Customer service")]
    CustomerService,
    #[serde(rename = "Trades / repair")]
    TradesRepair,
    #[serde(rename = "Cooking / food")]
    Cooking,
    #[serde(rename = "Caregiving")]
    Caregiving,
    #[serde(rename = "Tutoring / teaching")]
    Tutoring,
    #[serde(rename = "Organization / admin")]
    Administration,
    #[serde(rename = "Sales")]
    Sales,
}

impl Skill {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreativeDesign => "Creative / design",
            Self::WritingContent => "Writing / content",
            Self::TechTroubleshooting => "Tech / troubleshooting",
            Self::CustomerService => "Customer service",
            Self::TradesRepair => "Trades / repair",
            Self::Cooking => "Cooking / food",
            Self::Caregiving => "Caregiving",
            Self::Tutoring => "Tutoring / teaching",
            Self::Administration => "Organization / admin",
            Self::Sales => "Sales",
        }
    }

    /// Skills with a dedicated freelance platform bundle.
    pub const fn is_freelance_ready(self) -> bool {
        matches!(
            self,
            Self::CreativeDesign | Self::WritingContent | Self::TechTroubleshooting
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SellingComfort {
    #[serde(rename = "Yes, confidently")]
    Confident,
    #[serde(rename = "Somewhat")]
    Somewhat,
    #[serde(rename = "No")]
    No,
}

impl SellingComfort {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Confident => "Yes, confidently",
            Self::Somewhat => "Somewhat",
            Self::No => "No",
        }
    }
}

/// Item groups the person could sell; `Nothing` is the "No" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SellableItem {
    #[serde(rename = "Electronics")]
    Electronics,
    #[serde(rename = "Furniture")]
    Furniture,
    #[serde(rename = "Clothing / accessories")]
    Clothing,
    #[serde(rename = "Collectibles")]
    Collectibles,
    #[serde(rename = "Tools / equipment")]
    Tools,
    #[serde(rename = "Vehicle or parts")]
    VehicleParts,
    #[serde(rename = "No")]
    Nothing,
}

impl SellableItem {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Furniture => "Furniture",
            Self::Clothing => "Clothing / accessories",
            Self::Collectibles => "Collectibles",
            Self::Tools => "Tools / equipment",
            Self::VehicleParts => "Vehicle or parts",
            Self::Nothing => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoursPerWeek {
    #[serde(rename = "<10")]
    UnderTen,
    #[serde(rename = "10–20", alias = "10-20")]
    TenToTwenty,
    #[serde(rename = "20–40", alias = "20-40")]
    TwentyToForty,
    #[serde(rename = "40+")]
    FortyPlus,
}

impl HoursPerWeek {
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnderTen => "<10",
            Self::TenToTwenty => "10–20",
            Self::TwentyToForty => "20–40",
            Self::FortyPlus => "40+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    #[serde(rename = "Stable (2+ months runway)")]
    Stable,
    #[serde(rename = "Tight (1–2 months)", alias = "Tight (1-2 months)")]
    Tight,
    #[serde(rename = "Critical (<30 days)")]
    Critical,
}

impl Urgency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stable => "Stable (2+ months runway)",
            Self::Tight => "Tight (1–2 months)",
            Self::Critical => "Critical (<30 days)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    #[serde(rename = "Less than high school")]
    BelowHighSchool,
    #[serde(rename = "High school / GED")]
    HighSchool,
    #[serde(rename = "Some college")]
    SomeCollege,
    #[serde(rename = "Associate degree")]
    Associate,
    #[serde(rename = "Bachelor's degree")]
    Bachelor,
    #[serde(rename = "Graduate degree")]
    Graduate,
    #[serde(rename = "Trade certification")]
    TradeCertification,
}

impl EducationLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::BelowHighSchool => "Less than high school",
            Self::HighSchool => "High school / GED",
            Self::SomeCollege => "Some college",
            Self::Associate => "Associate degree",
            Self::Bachelor => "Bachelor's degree",
            Self::Graduate => "Graduate degree",
            Self::TradeCertification => "Trade certification",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternetAccess {
    #[serde(rename = "Yes, reliable")]
    Reliable,
    #[serde(rename = "Yes, limited")]
    Limited,
    #[serde(rename = "No")]
    None,
}

impl InternetAccess {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reliable => "Yes, reliable",
            Self::Limited => "Yes, limited",
            Self::None => "No",
        }
    }
}

/// Yes / Sometimes / No answers used for childcare and health questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Yes,
    Sometimes,
    No,
    #[serde(rename = "Prefer not to say")]
    Undisclosed,
}

impl Frequency {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::Sometimes => "Sometimes",
            Self::No => "No",
            Self::Undisclosed => "Prefer not to say",
        }
    }
}

/// Prior work experience; `None` is the "no experience" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorExperience {
    #[serde(rename = "Food service")]
    FoodService,
    #[serde(rename = "Retail")]
    Retail,
    #[serde(rename = "Warehouse / logistics")]
    Warehouse,
    #[serde(rename = "Office / admin")]
    Office,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Construction")]
    Construction,
    #[serde(rename = "Delivery / driving")]
    Delivery,
    #[serde(rename = "None")]
    None,
}

impl PriorExperience {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FoodService => "Food service",
            Self::Retail => "Retail",
            Self::Warehouse => "Warehouse / logistics",
            Self::Office => "Office / admin",
            Self::Healthcare => "Healthcare",
            Self::Construction => "Construction",
            Self::Delivery => "Delivery / driving",
            Self::None => "None",
        }
    }
}

pub const MAX_SKILLS: usize = 3;

/// The fifteen questionnaire answers collected before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSet {
    pub employment_status: EmploymentStatus,
    pub primary_pressure: Vec<PressureArea>,
    pub vehicle_access: VehicleAccess,
    pub has_license: YesNo,
    pub can_travel: TravelAbility,
    pub skills: Vec<Skill>,
    pub selling_comfort: SellingComfort,
    pub sellable_items: Vec<SellableItem>,
    pub hours_per_week: HoursPerWeek,
    pub urgency: Urgency,
    pub education_level: EducationLevel,
    pub internet_access: InternetAccess,
    pub childcare_needs: Frequency,
    pub health_limitations: Frequency,
    pub previous_experience: Vec<PriorExperience>,
}

impl AnswerSet {
    /// Reject answer sets the scoring engine should never see.
    ///
    /// Scalar answers are enforced by the type system; this checks the multi-select
    /// questions, which deserialize happily from an empty list.
    pub fn validate(&self) -> Result<(), AnswerSetError> {
        check_selection("primaryPressure", &self.primary_pressure, |p| p.label())?;
        check_selection("skills", &self.skills, |s| s.label())?;
        check_selection("sellableItems", &self.sellable_items, |i| i.label())?;
        check_selection("previousExperience", &self.previous_experience, |e| {
            e.label()
        })?;

        if self.skills.len() > MAX_SKILLS {
            return Err(AnswerSetError::TooManySkills {
                max: MAX_SKILLS,
                found: self.skills.len(),
            });
        }

        Ok(())
    }

    pub fn has_pressure(&self, area: PressureArea) -> bool {
        self.primary_pressure.contains(&area)
    }

    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    pub fn has_experience(&self, experience: PriorExperience) -> bool {
        self.previous_experience.contains(&experience)
    }

    /// True when at least one real item (not the "No" sentinel) was selected.
    pub fn has_sellable_items(&self) -> bool {
        self.sellable_items
            .iter()
            .any(|item| *item != SellableItem::Nothing)
    }
}

fn check_selection<T>(
    field: &'static str,
    values: &[T],
    label: impl Fn(&T) -> &'static str,
) -> Result<(), AnswerSetError>
where
    T: PartialEq,
{
    if values.is_empty() {
        return Err(AnswerSetError::MissingSelection { field });
    }

    for (index, value) in values.iter().enumerate() {
        if values[..index].contains(value) {
            return Err(AnswerSetError::DuplicateSelection {
                field,
                value: label(value),
            });
        }
    }

    Ok(())
}

/// Validation failures for incomplete or malformed questionnaires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerSetError {
    #[error("answer `{field}` requires at least one selection")]
    MissingSelection { field: &'static str },
    #[error("at most {max} skills may be selected (found {found})")]
    TooManySkills { max: usize, found: usize },
    #[error("answer `{field}` lists `{value}` more than once")]
    DuplicateSelection {
        field: &'static str,
        value: &'static str,
    },
}
