use super::types::{
    FilterTokens, MembershipClause, OrderClause, PriceClause, QuerySpec, SearchClause,
    SearchTarget, TagDimension,
};

/// Fields a search term is matched against, in evaluation order
const SEARCH_TARGETS: &[SearchTarget] = &[
    SearchTarget::Name,
    SearchTarget::Description,
    SearchTarget::CategoryTag,
];

/// Compile validated tokens into a query specification.
///
/// Total: every token set produced by the parser compiles. Absent dimensions
/// are left out of the spec rather than compiled to an always-true or
/// always-false clause.
pub fn compile(tokens: &FilterTokens) -> QuerySpec {
    QuerySpec {
        region: tokens.region,
        search: build_search_clause(tokens.search.as_deref()),
        categories: build_membership_clause(TagDimension::Category, tokens.categories.as_deref()),
        platforms: build_membership_clause(TagDimension::Platform, tokens.platforms.as_deref()),
        payment_methods: build_membership_clause(
            TagDimension::PaymentMethod,
            tokens.payment_methods.as_deref(),
        ),
        price: build_price_clause(tokens.price_min, tokens.price_max),
        order: OrderClause {
            field: tokens.sort_field,
            direction: tokens.sort_direction,
        },
    }
}

fn build_search_clause(term: Option<&str>) -> Option<SearchClause> {
    let term = term.filter(|t| !t.is_empty())?;
    Some(SearchClause {
        term: term.to_string(),
        targets: SEARCH_TARGETS.to_vec(),
    })
}

/// Names arrive folded and de-duplicated from `split_tag_names`
fn build_membership_clause(
    dimension: TagDimension,
    names: Option<&[String]>,
) -> Option<MembershipClause> {
    let names = names.filter(|names| !names.is_empty())?;
    Some(MembershipClause {
        dimension,
        names: names.to_vec(),
    })
}

fn build_price_clause(min: Option<f64>, max: Option<f64>) -> Option<PriceClause> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some(PriceClause { min, max })
}
