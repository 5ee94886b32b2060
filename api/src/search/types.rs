//! Types shared by the request parser and the filter compiler

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use ts_rs::TS;

/// Catalog partition a request targets
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
    TS,
)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Region {
    Ganesha,
    Jatinangor,
}

impl TryFrom<String> for Region {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Column a result list may be ordered by. The first variant is the default.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
    TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortField {
    #[default]
    Rating,
    Distance,
    Price,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Rating => "rating",
            SortField::Distance => "distance",
            SortField::Price => "price",
        }
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
    TS,
)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql_keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// The three named tag sets attached to every place
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum TagDimension {
    Category,
    Platform,
    PaymentMethod,
}

impl TagDimension {
    pub fn tag_table(&self) -> &'static str {
        match self {
            TagDimension::Category => "categories",
            TagDimension::Platform => "platforms",
            TagDimension::PaymentMethod => "payment_methods",
        }
    }

    pub fn link_table(&self) -> &'static str {
        match self {
            TagDimension::Category => "place_categories",
            TagDimension::Platform => "place_platforms",
            TagDimension::PaymentMethod => "place_payment_methods",
        }
    }
}

/// Query string of a place search exactly as the client sent it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchParams {
    pub filter_category: Option<String>,
    pub filter_price: Option<String>,
    pub filter_platform: Option<String>,
    pub filter_payment: Option<String>,
    pub search: Option<String>,
    pub sort_status: Option<String>,
    pub sort_data: Option<String>,
}

/// Validated, typed request parameters scoped to a single search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterTokens {
    pub region: Region,
    pub categories: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
    pub payment_methods: Option<Vec<String>>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub search: Option<String>,
    pub sort_field: SortField,
    pub sort_direction: Option<SortDirection>,
}

impl FilterTokens {
    /// Tokens with no filter dimension set: every place in `region`.
    pub fn for_region(region: Region) -> Self {
        Self {
            region,
            categories: None,
            platforms: None,
            payment_methods: None,
            price_min: None,
            price_max: None,
            search: None,
            sort_field: SortField::default(),
            sort_direction: None,
        }
    }
}

/// Field a free-text search term is matched against
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchTarget {
    Name,
    Description,
    CategoryTag,
}

/// Case-insensitive substring match of `term` against any of `targets`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchClause {
    pub term: String,
    pub targets: Vec<SearchTarget>,
}

/// At least one tag of `dimension` is a case-insensitive member of `names`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipClause {
    pub dimension: TagDimension,
    pub names: Vec<String>,
}

/// Inclusive price bounds; at least one side is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceClause {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderClause {
    pub field: SortField,
    pub direction: Option<SortDirection>,
}

/// Store-agnostic description of what to match and how to order it.
///
/// The region clause is always present. Every other clause is optional and
/// the present ones are conjoined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pub region: Region,
    pub search: Option<SearchClause>,
    pub categories: Option<MembershipClause>,
    pub platforms: Option<MembershipClause>,
    pub payment_methods: Option<MembershipClause>,
    pub price: Option<PriceClause>,
    pub order: OrderClause,
}

impl QuerySpec {
    pub fn membership_clauses(&self) -> impl Iterator<Item = &MembershipClause> {
        [&self.categories, &self.platforms, &self.payment_methods]
            .into_iter()
            .flatten()
    }

    /// True when only the region narrows the result set
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_none() && self.price.is_none() && self.membership_clauses().next().is_none()
    }
}
