use super::types::Database;
use crate::search::{
    fold_case, render_sql, split_tag_names, QuerySpec, Region, SqlValue, TagDimension,
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::IntoEnumIterator;
use ts_rs::TS;

/// Stays well below SQLite's host parameter limit
const TAG_LOOKUP_CHUNK: usize = 500;

const PLACE_COLUMNS: &str = "places.id, places.name, places.description, places.image_url, \
    places.price, places.address, places.latitude, places.longitude, places.time_open, \
    places.time_close, places.distance, places.rating, places.region, places.created_at_ns, \
    places.updated_at_ns";

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, TS)]
#[ts(export)]
pub struct Place {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: f64,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time_open: Option<String>,
    pub time_close: Option<String>,
    pub distance: f64,
    pub rating: f64,
    #[sqlx(try_from = "String")]
    pub region: Region,
    #[ts(type = "number")]
    pub created_at_ns: i64,
    #[ts(type = "number")]
    pub updated_at_ns: i64,
    #[sqlx(skip)]
    pub categories: Vec<String>,
    #[sqlx(skip)]
    pub platforms: Vec<String>,
    #[sqlx(skip)]
    pub payment_methods: Vec<String>,
}

impl Place {
    fn tags_mut(&mut self, dimension: TagDimension) -> &mut Vec<String> {
        match dimension {
            TagDimension::Category => &mut self.categories,
            TagDimension::Platform => &mut self.platforms,
            TagDimension::PaymentMethod => &mut self.payment_methods,
        }
    }
}

/// Creation payload. Tag fields are `;`-delimited lists of tag names.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlace {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: f64,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time_open: Option<String>,
    pub time_close: Option<String>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub rating: f64,
    pub region: Region,
    pub category: Option<String>,
    pub platform: Option<String>,
    pub payment_method: Option<String>,
}

impl NewPlace {
    fn tag_names(&self, dimension: TagDimension) -> Vec<String> {
        let raw = match dimension {
            TagDimension::Category => self.category.as_deref(),
            TagDimension::Platform => self.platform.as_deref(),
            TagDimension::PaymentMethod => self.payment_method.as_deref(),
        };
        raw.map(split_tag_names).unwrap_or_default()
    }
}

pub fn validate_new_place(place: &NewPlace) -> Result<()> {
    if place.name.trim().is_empty() {
        bail!("name is required");
    }
    for (field, value) in [
        ("price", place.price),
        ("distance", place.distance),
        ("rating", place.rating),
    ] {
        if !value.is_finite() || value < 0.0 {
            bail!("{} must be a non-negative number, got {}", field, value);
        }
    }
    Ok(())
}

impl Database {
    /// Run a compiled search and return matching places with their tags expanded
    pub async fn search_places(&self, spec: &QuerySpec) -> Result<Vec<Place>> {
        let fragment = render_sql(spec);
        let sql = format!(
            "SELECT {} FROM places WHERE {} {}",
            PLACE_COLUMNS, fragment.where_clause, fragment.order_clause
        );
        tracing::debug!(sql = %sql, binds = ?fragment.binds, "searching places");

        let mut query = sqlx::query_as::<_, Place>(&sql);
        for value in fragment.binds {
            query = match value {
                SqlValue::Text(text) => query.bind(text),
                SqlValue::Real(number) => query.bind(number),
            };
        }

        let mut places = query.fetch_all(&self.pool).await?;
        self.attach_tags(&mut places).await?;
        Ok(places)
    }

    pub async fn get_place(&self, id: i64) -> Result<Option<Place>> {
        let sql = format!("SELECT {} FROM places WHERE places.id = ?", PLACE_COLUMNS);
        let place = sqlx::query_as::<_, Place>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match place {
            Some(place) => {
                let mut places = vec![place];
                self.attach_tags(&mut places).await?;
                Ok(places.pop())
            }
            None => Ok(None),
        }
    }

    /// Insert a place and link its tags, creating tag names not seen before.
    /// Callers run `validate_new_place` first.
    pub async fn create_place(&self, params: NewPlace) -> Result<Place> {
        let now_ns = chrono::Utc::now().timestamp_nanos_opt().unwrap_or(0);
        let mut tx = self.pool.begin().await?;

        let place_id = sqlx::query(
            "INSERT INTO places (name, description, name_search, description_search, image_url, \
             price, address, latitude, longitude, time_open, time_close, distance, rating, \
             region, created_at_ns, updated_at_ns) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(params.name.trim())
        .bind(&params.description)
        .bind(fold_case(params.name.trim()))
        .bind(params.description.as_deref().map(fold_case))
        .bind(&params.image_url)
        .bind(params.price)
        .bind(&params.address)
        .bind(params.latitude)
        .bind(params.longitude)
        .bind(&params.time_open)
        .bind(&params.time_close)
        .bind(params.distance)
        .bind(params.rating)
        .bind(params.region.as_ref())
        .bind(now_ns)
        .bind(now_ns)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for dimension in TagDimension::iter() {
            for name in params.tag_names(dimension) {
                let tag_table = dimension.tag_table();
                sqlx::query(&format!(
                    "INSERT OR IGNORE INTO {} (name) VALUES (?)",
                    tag_table
                ))
                .bind(&name)
                .execute(&mut *tx)
                .await?;

                let tag_id: i64 =
                    sqlx::query_scalar(&format!("SELECT id FROM {} WHERE name = ?", tag_table))
                        .bind(&name)
                        .fetch_one(&mut *tx)
                        .await?;

                sqlx::query(&format!(
                    "INSERT OR IGNORE INTO {} (place_id, tag_id) VALUES (?, ?)",
                    dimension.link_table()
                ))
                .bind(place_id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        tracing::info!(place_id, name = %params.name, region = %params.region, "place created");

        self.get_place(place_id)
            .await?
            .with_context(|| format!("Place {} missing right after insert", place_id))
    }

    /// Remove a place and its tag links. Returns false when no place matched.
    pub async fn delete_place(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        for dimension in TagDimension::iter() {
            sqlx::query(&format!(
                "DELETE FROM {} WHERE place_id = ?",
                dimension.link_table()
            ))
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        let deleted = sqlx::query("DELETE FROM places WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(deleted > 0)
    }

    /// Fill the three tag lists of every place, each sorted by name
    async fn attach_tags(&self, places: &mut [Place]) -> Result<()> {
        if places.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = places.iter().map(|place| place.id).collect();
        for dimension in TagDimension::iter() {
            let mut names_by_place: HashMap<i64, Vec<String>> = HashMap::new();

            for chunk in ids.chunks(TAG_LOOKUP_CHUNK) {
                let placeholders = vec!["?"; chunk.len()].join(", ");
                let sql = format!(
                    "SELECT link.place_id, tag.name FROM {} link JOIN {} tag ON tag.id = link.tag_id \
                     WHERE link.place_id IN ({}) ORDER BY tag.name",
                    dimension.link_table(),
                    dimension.tag_table(),
                    placeholders
                );

                let mut query = sqlx::query_as::<_, (i64, String)>(&sql);
                for id in chunk {
                    query = query.bind(*id);
                }
                for (place_id, name) in query.fetch_all(&self.pool).await? {
                    names_by_place.entry(place_id).or_default().push(name);
                }
            }

            for place in places.iter_mut() {
                *place.tags_mut(dimension) = names_by_place.remove(&place.id).unwrap_or_default();
            }
        }

        Ok(())
    }
}
