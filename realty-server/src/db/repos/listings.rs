//! Property listing assembly
//!
//! A property is a house plus its details, amenities, price, image, and
//! owner. Each table is read once per request inside a read-only REPEATABLE
//! READ transaction, so every composite reflects a single snapshot, and rows
//! are matched to their house through `HashMap` indexes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};

use super::{DbError, House};

/// house_details record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct HouseDetails {
    pub house_id: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
    pub status: Option<String>,
    pub property_area: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub rooms: Option<i32>,
    pub year_build: Option<i32>,
    pub neighborhood: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub label: Option<String>,
    pub land_area: Option<f64>,
    pub garage_size: Option<i32>,
}

/// amenities record (flags stored as 0/1)
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Amenities {
    pub house_id: i32,
    pub air_condition: i16,
    pub cable_tv: i16,
    pub elevator: i16,
    pub wifi: i16,
    pub pet_friendly: i16,
    pub furnished: i16,
    pub garden: i16,
    pub swimming_pool: i16,
    pub intercom: i16,
    pub disabled_access: i16,
    pub fireplace: i16,
    pub garage: i16,
    pub heating: i16,
    pub security: i16,
    pub parking: i16,
}

/// prices record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Price {
    pub house_id: i32,
    pub price: Option<f64>,
    pub before_price_label: Option<String>,
    pub after_price_label: Option<String>,
}

/// images record
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Image {
    pub image_id: i32,
    pub house_id: i32,
    pub image_url: String,
}

/// users record (house owner)
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One house with every dependent row, for `GET /houses/{id}/details`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDetails {
    pub house: House,
    pub house_details: Option<HouseDetails>,
    pub amenities: Option<Amenities>,
    pub prices: Option<Price>,
    pub images: Option<Image>,
}

/// Listing entry for the collection endpoints, including the owner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySummary {
    pub house: House,
    pub house_details: Option<HouseDetails>,
    pub amenities: Option<Amenities>,
    pub prices: Option<Price>,
    pub images: Option<Image>,
    pub user: Option<User>,
}

/// Which houses a read covers
#[derive(Debug, Clone, Copy)]
enum Scope<'s> {
    All,
    Houses(&'s [i32]),
}

impl Scope<'_> {
    /// Bind value for `$1::int4[] IS NULL OR <key> = ANY($1)`.
    fn ids(&self) -> Option<Vec<i32>> {
        match self {
            Self::All => None,
            Self::Houses(ids) => Some(ids.to_vec()),
        }
    }
}

/// Rows fetched for one listing read, before correlation
#[derive(Debug, Default)]
pub(crate) struct ListingRows {
    pub houses: Vec<House>,
    pub details: Vec<HouseDetails>,
    pub amenities: Vec<Amenities>,
    pub prices: Vec<Price>,
    pub images: Vec<Image>,
    pub users: Vec<User>,
}

/// Index rows by key, keeping the first row seen for each key.
fn index_by<T>(rows: Vec<T>, key: impl Fn(&T) -> i32) -> HashMap<i32, T> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(key(&row)).or_insert(row);
    }
    index
}

/// Correlate fetched rows into one summary per house, in house order.
pub(crate) fn assemble(rows: ListingRows) -> Vec<PropertySummary> {
    let mut details = index_by(rows.details, |d| d.house_id);
    let mut amenities = index_by(rows.amenities, |a| a.house_id);
    let mut prices = index_by(rows.prices, |p| p.house_id);
    let mut images = index_by(rows.images, |i| i.house_id);
    let users = index_by(rows.users, |u| u.user_id);

    rows.houses
        .into_iter()
        .map(|house| {
            let id = house.house_id;
            let user = house.user_id.and_then(|uid| users.get(&uid).cloned());
            PropertySummary {
                house_details: details.remove(&id),
                amenities: amenities.remove(&id),
                prices: prices.remove(&id),
                images: images.remove(&id),
                user,
                house,
            }
        })
        .collect()
}

/// Listing repository
pub struct ListingRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ListingRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn snapshot(&self) -> Result<Transaction<'static, Postgres>, DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Get one property with all dependent rows.
    ///
    /// Missing dependents come back as `None`; a missing house is NotFound.
    pub async fn details(&self, house_id: i32) -> Result<PropertyDetails, DbError> {
        let mut tx = self.snapshot().await?;

        let house: House = sqlx::query_as(
            r#"
            SELECT house_id, title, description, full_address, country, state, zip,
                   user_id, created_at
            FROM houses
            WHERE house_id = $1
            "#,
        )
        .bind(house_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Property", house_id))?;

        let ids = [house_id];
        let scope = Scope::Houses(&ids);
        let details = fetch_details(&mut *tx, scope).await?;
        let amenities = fetch_amenities(&mut *tx, scope).await?;
        let prices = fetch_prices(&mut *tx, scope).await?;
        let images = fetch_images(&mut *tx, scope).await?;
        tx.commit().await?;

        Ok(PropertyDetails {
            house,
            house_details: details.into_iter().next(),
            amenities: amenities.into_iter().next(),
            prices: prices.into_iter().next(),
            images: images.into_iter().next(),
        })
    }

    /// Every house with its dependents and owner.
    pub async fn all(&self) -> Result<Vec<PropertySummary>, DbError> {
        let mut tx = self.snapshot().await?;

        let houses = fetch_houses(&mut *tx, Scope::All).await?;
        if houses.is_empty() {
            return Ok(Vec::new());
        }

        let rows = ListingRows {
            details: fetch_details(&mut *tx, Scope::All).await?,
            amenities: fetch_amenities(&mut *tx, Scope::All).await?,
            prices: fetch_prices(&mut *tx, Scope::All).await?,
            images: fetch_images(&mut *tx, Scope::All).await?,
            users: fetch_users(&mut *tx, &owner_ids(&houses)).await?,
            houses,
        };
        tx.commit().await?;

        Ok(assemble(rows))
    }

    /// Houses whose details have the given `type`, with dependents and owner.
    ///
    /// Returns an empty list when no details row matches.
    pub async fn by_type(&self, kind: &str) -> Result<Vec<PropertySummary>, DbError> {
        let mut tx = self.snapshot().await?;

        let details: Vec<HouseDetails> = sqlx::query_as(
            r#"
            SELECT house_id, type, status, property_area, bedrooms, bathrooms, rooms,
                   year_build, neighborhood, latitude, longitude, label, land_area, garage_size
            FROM house_details
            WHERE type = $1
            ORDER BY house_id
            "#,
        )
        .bind(kind)
        .fetch_all(&mut *tx)
        .await?;

        if details.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = details.iter().map(|d| d.house_id).collect();
        let scope = Scope::Houses(&ids);

        let houses = fetch_houses(&mut *tx, scope).await?;
        let rows = ListingRows {
            amenities: fetch_amenities(&mut *tx, scope).await?,
            prices: fetch_prices(&mut *tx, scope).await?,
            images: fetch_images(&mut *tx, scope).await?,
            users: fetch_users(&mut *tx, &owner_ids(&houses)).await?,
            houses,
            details,
        };
        tx.commit().await?;

        Ok(assemble(rows))
    }
}

fn owner_ids(houses: &[House]) -> Vec<i32> {
    let mut ids: Vec<i32> = houses.iter().filter_map(|h| h.user_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

async fn fetch_houses(conn: &mut PgConnection, scope: Scope<'_>) -> Result<Vec<House>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT house_id, title, description, full_address, country, state, zip,
               user_id, created_at
        FROM houses
        WHERE $1::int4[] IS NULL OR house_id = ANY($1)
        ORDER BY house_id
        "#,
    )
    .bind(scope.ids())
    .fetch_all(conn)
    .await
}

async fn fetch_details(
    conn: &mut PgConnection,
    scope: Scope<'_>,
) -> Result<Vec<HouseDetails>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT house_id, type, status, property_area, bedrooms, bathrooms, rooms,
               year_build, neighborhood, latitude, longitude, label, land_area, garage_size
        FROM house_details
        WHERE $1::int4[] IS NULL OR house_id = ANY($1)
        "#,
    )
    .bind(scope.ids())
    .fetch_all(conn)
    .await
}

async fn fetch_amenities(
    conn: &mut PgConnection,
    scope: Scope<'_>,
) -> Result<Vec<Amenities>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT house_id, air_condition, cable_tv, elevator, wifi, pet_friendly, furnished,
               garden, swimming_pool, intercom, disabled_access, fireplace, garage, heating,
               security, parking
        FROM amenities
        WHERE $1::int4[] IS NULL OR house_id = ANY($1)
        "#,
    )
    .bind(scope.ids())
    .fetch_all(conn)
    .await
}

async fn fetch_prices(conn: &mut PgConnection, scope: Scope<'_>) -> Result<Vec<Price>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT house_id, price, before_price_label, after_price_label
        FROM prices
        WHERE $1::int4[] IS NULL OR house_id = ANY($1)
        "#,
    )
    .bind(scope.ids())
    .fetch_all(conn)
    .await
}

/// Images ordered by image_id so the first per house is the oldest.
async fn fetch_images(conn: &mut PgConnection, scope: Scope<'_>) -> Result<Vec<Image>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT image_id, house_id, image_url
        FROM images
        WHERE $1::int4[] IS NULL OR house_id = ANY($1)
        ORDER BY image_id
        "#,
    )
    .bind(scope.ids())
    .fetch_all(conn)
    .await
}

async fn fetch_users(conn: &mut PgConnection, user_ids: &[i32]) -> Result<Vec<User>, sqlx::Error> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as(
        r#"
        SELECT user_id, full_name, email, phone, created_at
        FROM users
        WHERE user_id = ANY($1)
        "#,
    )
    .bind(user_ids.to_vec())
    .fetch_all(conn)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn house(id: i32, owner: Option<i32>) -> House {
        House {
            house_id: id,
            title: format!("House {id}"),
            description: None,
            full_address: None,
            country: None,
            state: None,
            zip: None,
            user_id: owner,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn details(id: i32, kind: &str) -> HouseDetails {
        HouseDetails {
            house_id: id,
            kind: kind.to_string(),
            status: Some("for sale".to_string()),
            property_area: Some(120.0),
            bedrooms: Some(3),
            bathrooms: Some(2),
            rooms: Some(5),
            year_build: Some(1998),
            neighborhood: None,
            latitude: None,
            longitude: None,
            label: None,
            land_area: None,
            garage_size: None,
        }
    }

    fn price(id: i32, amount: f64) -> Price {
        Price {
            house_id: id,
            price: Some(amount),
            before_price_label: None,
            after_price_label: None,
        }
    }

    fn image(image_id: i32, house_id: i32) -> Image {
        Image {
            image_id,
            house_id,
            image_url: format!("https://img.example/{image_id}.jpg"),
        }
    }

    fn user(id: i32) -> User {
        User {
            user_id: id,
            full_name: format!("Owner {id}"),
            email: format!("owner{id}@example.com"),
            phone: None,
            created_at: Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn matches_dependents_to_their_house() {
        let rows = ListingRows {
            houses: vec![house(1, Some(10)), house(2, Some(11))],
            details: vec![details(2, "villa"), details(1, "apartment")],
            prices: vec![price(2, 500_000.0), price(1, 90_000.0)],
            images: vec![image(5, 2)],
            users: vec![user(11), user(10)],
            ..ListingRows::default()
        };

        let summaries = assemble(rows);
        assert_eq!(summaries.len(), 2);

        let first = &summaries[0];
        assert_eq!(first.house.house_id, 1);
        assert_eq!(first.house_details.as_ref().unwrap().kind, "apartment");
        assert_eq!(first.prices.as_ref().unwrap().price, Some(90_000.0));
        assert!(first.images.is_none());
        assert_eq!(first.user.as_ref().unwrap().user_id, 10);

        let second = &summaries[1];
        assert_eq!(second.house_details.as_ref().unwrap().kind, "villa");
        assert_eq!(second.images.as_ref().unwrap().image_id, 5);
        assert_eq!(second.user.as_ref().unwrap().user_id, 11);
    }

    #[test]
    fn first_image_wins() {
        let rows = ListingRows {
            houses: vec![house(1, None)],
            images: vec![image(3, 1), image(8, 1)],
            ..ListingRows::default()
        };

        let summaries = assemble(rows);
        assert_eq!(summaries[0].images.as_ref().unwrap().image_id, 3);
    }

    #[test]
    fn absent_parts_are_none() {
        let rows = ListingRows {
            houses: vec![house(7, Some(42))],
            ..ListingRows::default()
        };

        let summary = &assemble(rows)[0];
        assert!(summary.house_details.is_none());
        assert!(summary.amenities.is_none());
        assert!(summary.prices.is_none());
        assert!(summary.images.is_none());
        // owner id set but no users row
        assert!(summary.user.is_none());
    }

    #[test]
    fn owners_shared_between_houses() {
        let rows = ListingRows {
            houses: vec![house(1, Some(10)), house(2, Some(10))],
            users: vec![user(10)],
            ..ListingRows::default()
        };

        let summaries = assemble(rows);
        assert!(summaries.iter().all(|s| s.user.as_ref().map(|u| u.user_id) == Some(10)));
    }

    #[test]
    fn owner_ids_are_unique() {
        let houses = vec![house(1, Some(4)), house(2, None), house(3, Some(4)), house(4, Some(2))];
        assert_eq!(owner_ids(&houses), vec![2, 4]);
    }

    #[test]
    fn serializes_nulls_and_type_key() {
        let summary = PropertyDetails {
            house: house(7, None),
            house_details: Some(details(7, "loft")),
            amenities: None,
            prices: None,
            images: None,
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["house"]["house_id"], 7);
        assert_eq!(json["house_details"]["type"], "loft");
        assert!(json["images"].is_null());
        assert!(json["amenities"].is_null());
    }

    #[test]
    fn scope_binding() {
        assert_eq!(Scope::All.ids(), None);
        assert_eq!(Scope::Houses(&[3, 4]).ids(), Some(vec![3, 4]));
    }

    #[sqlx::test(migrations = "../migrations")]
    #[ignore = "requires database"]
    async fn snapshot_is_repeatable_read_and_read_only(pool: PgPool) {
        let repo = ListingRepo::new(&pool);
        let mut tx = repo.snapshot().await.unwrap();

        let isolation: String = sqlx::query_scalar("SHOW transaction_isolation")
            .fetch_one(&mut *tx)
            .await
            .unwrap();
        let read_only: String = sqlx::query_scalar("SHOW transaction_read_only")
            .fetch_one(&mut *tx)
            .await
            .unwrap();
        assert_eq!(isolation, "repeatable read");
        assert_eq!(read_only, "on");

        let write = sqlx::query("INSERT INTO users (full_name, email) VALUES ('x', 'x@example.com')")
            .execute(&mut *tx)
            .await;
        assert!(write.is_err());
    }
}
