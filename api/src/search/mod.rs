mod builder;
mod error;
mod parser;
mod sql;
mod types;

pub use builder::compile;
pub use error::SearchError;
pub use parser::{fold_case, parse_params, split_tag_names};
pub use sql::{render_sql, SqlFragment, SqlValue};
pub use types::{
    FilterTokens, MembershipClause, OrderClause, PriceClause, QuerySpec, RawSearchParams, Region,
    SearchClause, SearchTarget, SortDirection, SortField, TagDimension,
};

#[cfg(test)]
mod tests;
