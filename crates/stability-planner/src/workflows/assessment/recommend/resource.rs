use serde::{Deserialize, Serialize};
use std::fmt;

/// The four recommendation buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Assistance,
    Unemployment,
    Monetization,
    Money,
}

impl ResourceCategory {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Assistance,
            Self::Unemployment,
            Self::Monetization,
            Self::Money,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Assistance => "assistance",
            Self::Unemployment => "unemployment",
            Self::Monetization => "monetization",
            Self::Money => "money",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Assistance => "Assistance Programs",
            Self::Unemployment => "Unemployment Support",
            Self::Monetization => "Monetize Your Skills",
            Self::Money => "Ways to Earn Now",
        }
    }
}

/// In-app destinations the presentation layer resolves into navigation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppDestination {
    Resume,
    Jobs,
    Money,
    Unemployment,
    Monetization,
}

impl AppDestination {
    pub const fn token(self) -> &'static str {
        match self {
            Self::Resume => "app-resume",
            Self::Jobs => "app-jobs",
            Self::Money => "app-money",
            Self::Unemployment => "app-unemployment",
            Self::Monetization => "app-monetization",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "app-resume" => Some(Self::Resume),
            "app-jobs" => Some(Self::Jobs),
            "app-money" => Some(Self::Money),
            "app-unemployment" => Some(Self::Unemployment),
            "app-monetization" => Some(Self::Monetization),
            _ => None,
        }
    }
}

/// Where a resource points: an external web page or an in-app cross-reference.
///
/// Serialized as the bare link string (`https://...` or an `app-*` token).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceLink {
    External(String),
    App(AppDestination),
}

impl ResourceLink {
    pub fn external(url: impl Into<String>) -> Self {
        Self::External(url.into())
    }

    pub const fn app(destination: AppDestination) -> Self {
        Self::App(destination)
    }

    pub fn is_in_app(&self) -> bool {
        matches!(self, Self::App(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::External(url) => url,
            Self::App(destination) => destination.token(),
        }
    }
}

impl fmt::Display for ResourceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ResourceLink {
    type Error = ResourceLinkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if let Some(destination) = AppDestination::from_token(trimmed) {
            return Ok(Self::App(destination));
        }
        if trimmed.starts_with("https://") || trimmed.starts_with("http://") {
            return Ok(Self::External(trimmed.to_string()));
        }
        Err(ResourceLinkError::Unrecognized(value))
    }
}

impl From<ResourceLink> for String {
    fn from(value: ResourceLink) -> Self {
        match value {
            ResourceLink::External(url) => url,
            ResourceLink::App(destination) => destination.token().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceLinkError {
    #[error("resource link `{0}` is neither an http(s) URL nor a known app destination")]
    Unrecognized(String),
}

/// Stable identity of a resource: `category + "_" + normalized title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl ResourceId {
    pub fn derive(category: ResourceCategory, title: &str) -> Self {
        Self(format!("{}_{}", category.key(), normalize_title(title)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-case and drop everything that is not an ASCII letter or digit.
pub(crate) fn normalize_title(title: &str) -> String {
    title
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A single recommended resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub category: ResourceCategory,
    pub link: ResourceLink,
}

impl Resource {
    pub fn new(title: impl Into<String>, category: ResourceCategory, link: ResourceLink) -> Self {
        Self {
            title: title.into(),
            category,
            link,
        }
    }

    pub fn id(&self) -> ResourceId {
        ResourceId::derive(self.category, &self.title)
    }
}

/// Category-bucketed recommendation output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedResources {
    pub assistance: Vec<Resource>,
    pub unemployment: Vec<Resource>,
    pub monetization: Vec<Resource>,
    pub money: Vec<Resource>,
}

impl SuggestedResources {
    pub fn for_category(&self, category: ResourceCategory) -> &[Resource] {
        match category {
            ResourceCategory::Assistance => &self.assistance,
            ResourceCategory::Unemployment => &self.unemployment,
            ResourceCategory::Monetization => &self.monetization,
            ResourceCategory::Money => &self.money,
        }
    }

    pub(crate) fn bucket_mut(&mut self, category: ResourceCategory) -> &mut Vec<Resource> {
        match category {
            ResourceCategory::Assistance => &mut self.assistance,
            ResourceCategory::Unemployment => &mut self.unemployment,
            ResourceCategory::Monetization => &mut self.monetization,
            ResourceCategory::Money => &mut self.money,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        ResourceCategory::ordered()
            .into_iter()
            .flat_map(move |category| self.for_category(category).iter())
    }

    pub fn find(&self, id: &ResourceId) -> Option<&Resource> {
        self.iter().find(|resource| &resource.id() == id)
    }

    pub fn len(&self) -> usize {
        self.assistance.len() + self.unemployment.len() + self.monetization.len() + self.money.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
