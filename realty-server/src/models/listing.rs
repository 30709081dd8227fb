//! House creation payload
//!
//! Clients post one flat JSON object covering the house, its details,
//! amenities, price, and an optional image. Field groups are flattened
//! back out of that object so each insert binds only its own columns.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Flat parameter bag accepted by `POST /houses`.
///
/// Missing fields are not rejected here; they bind as NULL and any NOT NULL
/// violation surfaces from the database.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewListing {
    #[serde(flatten)]
    pub house: HouseFields,
    #[serde(flatten)]
    pub details: DetailFields,
    #[serde(flatten)]
    pub amenities: AmenityFlags,
    #[serde(flatten)]
    pub price: PriceFields,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Columns of `houses`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HouseFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub full_address: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub zip: Option<String>,
    pub user_id: Option<i32>,
}

/// Columns of `house_details`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailFields {
    #[serde(rename = "type")]
    pub kind: Option<String>,
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

/// Columns of `prices`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceFields {
    pub price: Option<f64>,
    pub before_price_label: Option<String>,
    pub after_price_label: Option<String>,
}

/// The fifteen amenity switches. Any JSON value is accepted and coerced
/// with [`is_truthy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AmenityFlags {
    #[serde(default, deserialize_with = "truthy")]
    pub air_condition: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub cable_tv: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub elevator: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub wifi: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub pet_friendly: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub furnished: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub garden: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub swimming_pool: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub intercom: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub disabled_access: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub fireplace: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub garage: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub heating: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub security: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub parking: bool,
}

impl AmenityFlags {
    /// Flags in `amenities` column order, as stored (0/1).
    pub fn stored(&self) -> [i16; 15] {
        [
            self.air_condition,
            self.cable_tv,
            self.elevator,
            self.wifi,
            self.pet_friendly,
            self.furnished,
            self.garden,
            self.swimming_pool,
            self.intercom,
            self.disabled_access,
            self.fireplace,
            self.garage,
            self.heating,
            self.security,
            self.parking,
        ]
        .map(i16::from)
    }
}

/// Loose truthiness for client-supplied switches.
///
/// `null`, `false`, `0`, and `""` are false; every other value is true.
///
/// # Example
/// ```
/// use realty_server::models::listing::is_truthy;
/// use serde_json::json;
///
/// assert!(is_truthy(&json!("yes")));
/// assert!(is_truthy(&json!(1)));
/// assert!(!is_truthy(&json!(0)));
/// assert!(!is_truthy(&json!("")));
/// ```
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

/// Text column that also takes a bare number (`"zip": 10001`).
pub(crate) fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!(
            "invalid type: {}, expected a string or number",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_flat_bag_into_groups() {
        let listing: NewListing = serde_json::from_value(json!({
            "title": "Lake cabin",
            "user_id": 3,
            "type": "cabin",
            "bedrooms": 2,
            "property_area": 84,
            "wifi": true,
            "price": 125000.5,
            "after_price_label": "/month",
            "image_url": "https://img.example/1.jpg"
        }))
        .unwrap();

        assert_eq!(listing.house.title.as_deref(), Some("Lake cabin"));
        assert_eq!(listing.house.user_id, Some(3));
        assert_eq!(listing.details.kind.as_deref(), Some("cabin"));
        assert_eq!(listing.details.bedrooms, Some(2));
        assert_eq!(listing.details.property_area, Some(84.0));
        assert!(listing.amenities.wifi);
        assert_eq!(listing.price.price, Some(125000.5));
        assert_eq!(listing.price.after_price_label.as_deref(), Some("/month"));
        assert_eq!(listing.image_url.as_deref(), Some("https://img.example/1.jpg"));
    }

    #[test]
    fn missing_fields_stay_empty() {
        let listing: NewListing = serde_json::from_value(json!({})).unwrap();
        assert!(listing.house.title.is_none());
        assert!(listing.details.kind.is_none());
        assert_eq!(listing.amenities, AmenityFlags::default());
        assert!(listing.image_url.is_none());
    }

    #[test]
    fn amenity_values_are_coerced() {
        let listing: NewListing = serde_json::from_value(json!({
            "air_condition": 1,
            "cable_tv": "true",
            "elevator": "",
            "wifi": 0,
            "pet_friendly": null,
            "furnished": false,
            "garden": "no",
            "parking": [1]
        }))
        .unwrap();

        let flags = listing.amenities;
        assert!(flags.air_condition);
        assert!(flags.cable_tv);
        assert!(!flags.elevator);
        assert!(!flags.wifi);
        assert!(!flags.pet_friendly);
        assert!(!flags.furnished);
        // non-empty strings are truthy regardless of their text
        assert!(flags.garden);
        assert!(flags.parking);
        assert!(!flags.heating);
    }

    #[test]
    fn stored_flags_follow_column_order() {
        let flags = AmenityFlags {
            air_condition: true,
            parking: true,
            ..AmenityFlags::default()
        };
        let stored = flags.stored();
        assert_eq!(stored[0], 1);
        assert_eq!(stored[14], 1);
        assert_eq!(stored.iter().map(|v| *v as i32).sum::<i32>(), 2);
    }

    #[test]
    fn numeric_zip_becomes_text() {
        let listing: NewListing =
            serde_json::from_value(json!({ "title": "Loft", "zip": 10001 })).unwrap();
        assert_eq!(listing.house.zip.as_deref(), Some("10001"));

        let listing: NewListing = serde_json::from_value(json!({ "zip": "1100-001" })).unwrap();
        assert_eq!(listing.house.zip.as_deref(), Some("1100-001"));

        assert!(serde_json::from_value::<NewListing>(json!({ "zip": [1] })).is_err());
    }

    #[test]
    fn loosely_typed_counts_are_rejected() {
        assert!(serde_json::from_value::<NewListing>(json!({ "bedrooms": "3" })).is_err());
    }

    #[test]
    fn truthiness_of_numbers() {
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!(0.5)));
        assert!(!is_truthy(&json!(0.0)));
    }
}
