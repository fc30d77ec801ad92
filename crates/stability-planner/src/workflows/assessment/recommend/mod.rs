mod catalog;
mod resource;

pub use catalog::{RecommendationRule, ResourceCatalog, ResourceTemplate, RuleCondition};
pub use resource::{
    AppDestination, Resource, ResourceCategory, ResourceId, ResourceLink, ResourceLinkError,
    SuggestedResources,
};

use super::answers::AnswerSet;
use super::scoring::Rating;

/// Applies the rule table to a set of answers.
///
/// Every call evaluates the whole table from scratch; callers replace any previously
/// stored suggestions with the result rather than patching them.
#[derive(Debug, Clone)]
pub struct ResourceRecommender {
    catalog: ResourceCatalog,
}

impl Default for ResourceRecommender {
    fn default() -> Self {
        Self::new(ResourceCatalog::standard())
    }
}

impl ResourceRecommender {
    pub fn new(catalog: ResourceCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    pub fn recommend(&self, answers: &AnswerSet, mobility: Rating) -> SuggestedResources {
        let mut suggested = SuggestedResources::default();

        for rule in self.catalog.rules() {
            if !rule.when.matches(answers, mobility) {
                continue;
            }
            let bucket = suggested.bucket_mut(rule.category);
            bucket.extend(
                rule.resources
                    .iter()
                    .map(|template| template.instantiate(rule.category)),
            );
        }

        suggested
    }
}
