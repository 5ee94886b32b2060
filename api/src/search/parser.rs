use super::error::SearchError;
use super::types::{FilterTokens, RawSearchParams, Region, SortDirection, SortField};
use strum::IntoEnumIterator;

/// Separator for every multi-valued query parameter
pub const LIST_DELIMITER: char = ';';

/// Unicode case folding shared by tag names, search terms and the stored search columns.
///
/// SQLite's `LOWER()` and `LIKE` only fold ASCII, so every comparison runs on
/// text folded here.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Split a `;`-delimited tag list into trimmed, lower-cased, distinct names.
///
/// Empty segments are dropped, so `"ayam;;Nasi ; ayam"` yields `["ayam", "nasi"]`.
pub fn split_tag_names(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for segment in raw.split(LIST_DELIMITER) {
        let name = fold_case(segment.trim());
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Decode raw request parameters into a validated token set.
///
/// The region is resolved first, so an unknown region is reported as
/// `NotFound` even when other parameters are malformed too.
pub fn parse_params(
    params: &RawSearchParams,
    route_region: &str,
) -> Result<FilterTokens, SearchError> {
    let region = parse_region(route_region)?;
    let (price_min, price_max) = parse_price_range(params.filter_price.as_deref())?;
    let sort_field = parse_sort_field(params.sort_data.as_deref())?;
    let sort_direction = parse_sort_direction(params.sort_status.as_deref())?;

    Ok(FilterTokens {
        region,
        categories: parse_tag_list(params.filter_category.as_deref()),
        platforms: parse_tag_list(params.filter_platform.as_deref()),
        payment_methods: parse_tag_list(params.filter_payment.as_deref()),
        price_min,
        price_max,
        search: parse_search(params.search.as_deref()),
        sort_field,
        sort_direction,
    })
}

fn parse_region(raw: &str) -> Result<Region, SearchError> {
    raw.parse::<Region>().map_err(|_| {
        tracing::debug!(region = %raw, "rejected unknown region");
        SearchError::NotFound(format!("Unknown region: {}", raw))
    })
}

fn parse_tag_list(raw: Option<&str>) -> Option<Vec<String>> {
    let names = split_tag_names(raw?);
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

fn parse_price_range(raw: Option<&str>) -> Result<(Option<f64>, Option<f64>), SearchError> {
    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => return Ok((None, None)),
    };

    let bounds: Vec<&str> = raw.split(LIST_DELIMITER).collect();
    if bounds.len() > 2 {
        tracing::debug!(filter_price = %raw, "rejected price range with too many bounds");
        return Err(SearchError::Validation(format!(
            "filter_price accepts at most two bounds, got {} (value: {})",
            bounds.len(),
            raw
        )));
    }

    let min = parse_price_bound(bounds[0])?;
    let max = match bounds.get(1) {
        Some(bound) => parse_price_bound(bound)?,
        None => None,
    };
    Ok((min, max))
}

fn parse_price_bound(raw: &str) -> Result<Option<f64>, SearchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = trimmed.parse::<f64>().map_err(|_| {
        tracing::debug!(bound = %raw, "rejected non-numeric price bound");
        SearchError::Validation(format!("Price bound is not a number: {}", raw))
    })?;

    if !value.is_finite() || value < 0.0 {
        tracing::debug!(bound = %raw, "rejected out-of-range price bound");
        return Err(SearchError::Validation(format!(
            "Price bound must be a non-negative number: {}",
            raw
        )));
    }

    Ok(Some(value))
}

fn parse_search(raw: Option<&str>) -> Option<String> {
    raw.filter(|term| !term.is_empty()).map(str::to_string)
}

fn parse_sort_field(raw: Option<&str>) -> Result<SortField, SearchError> {
    match raw {
        None | Some("") => Ok(SortField::default()),
        Some(value) => value.parse::<SortField>().map_err(|_| {
            tracing::debug!(sort_data = %value, "rejected sort field");
            SearchError::Validation(format!(
                "sort_data must be one of {}, got {}",
                expected_values::<SortField>(),
                value
            ))
        }),
    }
}

fn parse_sort_direction(raw: Option<&str>) -> Result<Option<SortDirection>, SearchError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => value.parse::<SortDirection>().map(Some).map_err(|_| {
            tracing::debug!(sort_status = %value, "rejected sort direction");
            SearchError::Validation(format!(
                "sort_status must be one of {}, got {}",
                expected_values::<SortDirection>(),
                value
            ))
        }),
    }
}

fn expected_values<E: IntoEnumIterator + AsRef<str>>() -> String {
    E::iter()
        .map(|variant| variant.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
