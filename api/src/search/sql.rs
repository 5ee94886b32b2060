use super::parser::fold_case;
use super::types::{
    MembershipClause, OrderClause, PriceClause, QuerySpec, SearchClause, SearchTarget,
    TagDimension,
};

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Real(f64),
}

/// WHERE and ORDER BY text for the `places` table plus its positional binds.
///
/// Only column and table names from closed enums are written into the SQL;
/// every client-supplied value travels as a `?` bind.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub where_clause: String,
    pub order_clause: String,
    pub binds: Vec<SqlValue>,
}

pub fn render_sql(spec: &QuerySpec) -> SqlFragment {
    let mut conditions = vec!["places.region = ?".to_string()];
    let mut binds = vec![SqlValue::Text(spec.region.to_string())];

    if let Some(search) = &spec.search {
        conditions.push(build_search_sql(search, &mut binds));
    }
    for clause in spec.membership_clauses() {
        conditions.push(build_membership_sql(clause, &mut binds));
    }
    if let Some(price) = &spec.price {
        conditions.extend(build_price_sql(price, &mut binds));
    }

    SqlFragment {
        where_clause: conditions.join(" AND "),
        order_clause: build_order_sql(&spec.order),
        binds,
    }
}

fn build_search_sql(search: &SearchClause, binds: &mut Vec<SqlValue>) -> String {
    let pattern = like_pattern(&search.term);
    let alternatives: Vec<String> = search
        .targets
        .iter()
        .map(|target| {
            binds.push(SqlValue::Text(pattern.clone()));
            match target {
                SearchTarget::Name => like_clause("places.name_search"),
                SearchTarget::Description => like_clause("places.description_search"),
                SearchTarget::CategoryTag => {
                    tag_exists(TagDimension::Category, &like_clause("tag.name"))
                }
            }
        })
        .collect();

    format!("({})", alternatives.join(" OR "))
}

fn build_membership_sql(clause: &MembershipClause, binds: &mut Vec<SqlValue>) -> String {
    let placeholders: Vec<&str> = clause
        .names
        .iter()
        .map(|name| {
            binds.push(SqlValue::Text(name.clone()));
            "?"
        })
        .collect();

    tag_exists(
        clause.dimension,
        &format!("tag.name IN ({})", placeholders.join(", ")),
    )
}

fn build_price_sql(price: &PriceClause, binds: &mut Vec<SqlValue>) -> Vec<String> {
    let mut conditions = Vec::new();
    if let Some(min) = price.min {
        binds.push(SqlValue::Real(min));
        conditions.push("places.price >= ?".to_string());
    }
    if let Some(max) = price.max {
        binds.push(SqlValue::Real(max));
        conditions.push("places.price <= ?".to_string());
    }
    conditions
}

fn build_order_sql(order: &OrderClause) -> String {
    let column = order.field.column();
    match order.direction {
        Some(direction) => format!(
            "ORDER BY places.{} {}, places.id",
            column,
            direction.sql_keyword()
        ),
        None => format!("ORDER BY places.{}, places.id", column),
    }
}

/// `column` must hold text already passed through `fold_case`
fn like_clause(column: &str) -> String {
    format!("{} LIKE ? ESCAPE '\\'", column)
}

fn tag_exists(dimension: TagDimension, predicate: &str) -> String {
    format!(
        "EXISTS (SELECT 1 FROM {} link JOIN {} tag ON tag.id = link.tag_id \
         WHERE link.place_id = places.id AND {})",
        dimension.link_table(),
        dimension.tag_table(),
        predicate
    )
}

/// Case-folded `%term%` with LIKE wildcards escaped, so the term matches literally
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in fold_case(term).chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
