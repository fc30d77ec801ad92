use serde::Serialize;

use super::plan::FinancialPlan;
use super::recommend::{Resource, ResourceCategory, ResourceId, SuggestedResources};

/// A recommended resource annotated with its membership in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEntry {
    pub resource_id: ResourceId,
    #[serde(flatten)]
    pub resource: Resource,
    pub in_plan: bool,
    pub saved: bool,
}

/// Suggested resources as the user should see them: dismissed entries filtered out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecommendationView {
    pub assistance: Vec<RecommendationEntry>,
    pub unemployment: Vec<RecommendationEntry>,
    pub monetization: Vec<RecommendationEntry>,
    pub money: Vec<RecommendationEntry>,
}

impl RecommendationView {
    pub fn build(suggested: &SuggestedResources, plan: &FinancialPlan) -> Self {
        let entries = |category: ResourceCategory| -> Vec<RecommendationEntry> {
            suggested
                .for_category(category)
                .iter()
                .filter_map(|resource| {
                    let resource_id = resource.id();
                    if plan.is_resource_dismissed(&resource_id) {
                        return None;
                    }
                    Some(RecommendationEntry {
                        in_plan: plan.is_resource_in_plan(&resource_id),
                        saved: plan.is_resource_saved(&resource_id),
                        resource_id,
                        resource: resource.clone(),
                    })
                })
                .collect()
        };

        Self {
            assistance: entries(ResourceCategory::Assistance),
            unemployment: entries(ResourceCategory::Unemployment),
            monetization: entries(ResourceCategory::Monetization),
            money: entries(ResourceCategory::Money),
        }
    }

    pub fn for_category(&self, category: ResourceCategory) -> &[RecommendationEntry] {
        match category {
            ResourceCategory::Assistance => &self.assistance,
            ResourceCategory::Unemployment => &self.unemployment,
            ResourceCategory::Monetization => &self.monetization,
            ResourceCategory::Money => &self.money,
        }
    }

    pub fn len(&self) -> usize {
        ResourceCategory::ordered()
            .into_iter()
            .map(|category| self.for_category(category).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
