use super::super::answers::{
    AnswerSet, EmploymentStatus, InternetAccess, PressureArea, PriorExperience, SellingComfort,
    Skill, VehicleAccess,
};
use super::super::scoring::Rating;
use super::resource::{AppDestination, Resource, ResourceCategory, ResourceLink};
use serde::{Deserialize, Serialize};

/// Condition over the answers (and derived mobility) that fires a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RuleCondition {
    PressureIncludes(PressureArea),
    InternetNotReliable,
    InternetReliable,
    EmploymentIn(Vec<EmploymentStatus>),
    SkillIn(Vec<Skill>),
    OpenToSelling,
    MobileForLocalWork,
    HasSellableItems,
    ExperienceIncludes(PriorExperience),
}

impl RuleCondition {
    pub fn matches(&self, answers: &AnswerSet, mobility: Rating) -> bool {
        match self {
            RuleCondition::PressureIncludes(area) => answers.has_pressure(*area),
            RuleCondition::InternetNotReliable => {
                answers.internet_access != InternetAccess::Reliable
            }
            RuleCondition::InternetReliable => answers.internet_access == InternetAccess::Reliable,
            RuleCondition::EmploymentIn(statuses) => statuses.contains(&answers.employment_status),
            RuleCondition::SkillIn(skills) => skills.iter().any(|skill| answers.has_skill(*skill)),
            RuleCondition::OpenToSelling => answers.selling_comfort != SellingComfort::No,
            RuleCondition::MobileForLocalWork => {
                mobility == Rating::High || answers.vehicle_access == VehicleAccess::Reliable
            }
            RuleCondition::HasSellableItems => answers.has_sellable_items(),
            RuleCondition::ExperienceIncludes(experience) => answers.has_experience(*experience),
        }
    }
}

/// Title and link pair appended when a rule fires; the rule supplies the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTemplate {
    pub title: String,
    pub link: ResourceLink,
}

impl ResourceTemplate {
    fn external(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            link: ResourceLink::external(url),
        }
    }

    fn app(title: &str, destination: AppDestination) -> Self {
        Self {
            title: title.to_string(),
            link: ResourceLink::app(destination),
        }
    }

    pub fn instantiate(&self, category: ResourceCategory) -> Resource {
        Resource::new(self.title.clone(), category, self.link.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRule {
    pub category: ResourceCategory,
    pub when: RuleCondition,
    pub resources: Vec<ResourceTemplate>,
}

/// Ordered rule table; evaluation order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCatalog {
    rules: Vec<RecommendationRule>,
}

impl ResourceCatalog {
    pub fn new(rules: Vec<RecommendationRule>) -> Self {
        Self { rules }
    }

    pub fn standard() -> Self {
        Self::new(standard_rules())
    }

    pub fn rules(&self) -> &[RecommendationRule] {
        &self.rules
    }

    pub fn rules_for_category(
        &self,
        category: ResourceCategory,
    ) -> impl Iterator<Item = &RecommendationRule> {
        self.rules
            .iter()
            .filter(move |rule| rule.category == category)
    }
}

fn rule(
    category: ResourceCategory,
    when: RuleCondition,
    resources: Vec<ResourceTemplate>,
) -> RecommendationRule {
    RecommendationRule {
        category,
        when,
        resources,
    }
}

fn standard_rules() -> Vec<RecommendationRule> {
    use ResourceCategory::{Assistance, Monetization, Money, Unemployment};
    use ResourceTemplate as T;

    vec![
        rule(
            Assistance,
            RuleCondition::PressureIncludes(PressureArea::Housing),
            vec![
                T::external(
                    "Emergency Rental Assistance",
                    "https://www.consumerfinance.gov/renthelp/",
                ),
                T::external(
                    "HUD Housing Counseling",
                    "https://www.hud.gov/findacounselor",
                ),
            ],
        ),
        rule(
            Assistance,
            RuleCondition::PressureIncludes(PressureArea::Food),
            vec![
                T::external(
                    "SNAP Food Assistance",
                    "https://www.fns.usda.gov/snap/state-directory",
                ),
                T::external(
                    "Feeding America Food Bank Finder",
                    "https://www.feedingamerica.org/find-your-local-foodbank",
                ),
            ],
        ),
        rule(
            Assistance,
            RuleCondition::PressureIncludes(PressureArea::Utilities),
            vec![
                T::external(
                    "LIHEAP Energy Assistance",
                    "https://www.acf.hhs.gov/ocs/low-income-home-energy-assistance-program-liheap",
                ),
                T::external(
                    "Utility Payment Plan Help (211)",
                    "https://www.211.org/",
                ),
            ],
        ),
        rule(
            Assistance,
            RuleCondition::PressureIncludes(PressureArea::Medical),
            vec![
                T::external("Medicaid Eligibility", "https://www.medicaid.gov/"),
                T::external("HealthCare.gov Marketplace Plans", "https://www.healthcare.gov/"),
                T::external(
                    "Community Health Clinic Finder",
                    "https://findahealthcenter.hrsa.gov/",
                ),
            ],
        ),
        rule(
            Assistance,
            RuleCondition::InternetNotReliable,
            vec![
                T::external(
                    "Lifeline Phone & Internet Discount",
                    "https://www.lifelinesupport.org/",
                ),
                T::external(
                    "Low-Cost Internet Programs (EveryoneOn)",
                    "https://www.everyoneon.org/",
                ),
            ],
        ),
        rule(
            Unemployment,
            RuleCondition::EmploymentIn(vec![
                EmploymentStatus::RecentlyLaidOff,
                EmploymentStatus::LongTermUnemployed,
            ]),
            vec![
                T::app(
                    "File for State Unemployment Benefits",
                    AppDestination::Unemployment,
                ),
                T::app("Build Your Resume", AppDestination::Resume),
                T::app("Search Open Jobs", AppDestination::Jobs),
            ],
        ),
        rule(
            Monetization,
            RuleCondition::SkillIn(vec![Skill::CreativeDesign]),
            vec![
                T::external("Fiverr Creative Services", "https://www.fiverr.com/"),
                T::external("Etsy Digital Downloads", "https://www.etsy.com/sell"),
            ],
        ),
        rule(
            Monetization,
            RuleCondition::SkillIn(vec![Skill::WritingContent]),
            vec![
                T::external("Upwork Writing Projects", "https://www.upwork.com/"),
                T::external("Contently Freelance Network", "https://contently.net/"),
            ],
        ),
        rule(
            Monetization,
            RuleCondition::SkillIn(vec![Skill::TechTroubleshooting]),
            vec![
                T::external(
                    "Tech Freelance Gigs on Upwork",
                    "https://www.upwork.com/freelance-jobs/",
                ),
                T::external("TaskRabbit Tech Help", "https://www.taskrabbit.com/"),
            ],
        ),
        rule(
            Monetization,
            RuleCondition::OpenToSelling,
            vec![
                T::external("Poshmark Reselling", "https://poshmark.com/"),
                T::external("eBay Seller Hub", "https://www.ebay.com/sl/sell"),
                T::app("Monetization Toolkit", AppDestination::Monetization),
            ],
        ),
        rule(
            Money,
            RuleCondition::MobileForLocalWork,
            vec![
                T::external("DoorDash Delivery Driver", "https://dasher.doordash.com/"),
                T::external("Instacart Shopper", "https://shoppers.instacart.com/"),
                T::external("Uber Eats Delivery", "https://www.uber.com/us/en/deliver/"),
            ],
        ),
        rule(
            Money,
            RuleCondition::InternetReliable,
            vec![
                T::external("Remote Jobs on We Work Remotely", "https://weworkremotely.com/"),
                T::external(
                    "Remote Customer Support Roles",
                    "https://remote.co/remote-jobs/customer-service/",
                ),
                T::external(
                    "Paid Website Testing (UserTesting)",
                    "https://www.usertesting.com/get-paid-to-test",
                ),
            ],
        ),
        rule(
            Money,
            RuleCondition::HasSellableItems,
            vec![
                T::external(
                    "Facebook Marketplace Listings",
                    "https://www.facebook.com/marketplace/create",
                ),
                T::external("OfferUp Local Selling", "https://offerup.com/"),
                T::app("Quick Cash Ideas", AppDestination::Money),
            ],
        ),
        rule(
            Money,
            RuleCondition::ExperienceIncludes(PriorExperience::FoodService),
            vec![
                T::external("Instawork Hospitality Shifts", "https://www.instawork.com/"),
                T::external("Qwick Restaurant Shifts", "https://www.qwick.com/"),
            ],
        ),
    ]
}
