//! Allow-listed partial updates
//!
//! Update bodies deserialize into typed structs that reject unknown keys, so
//! only the columns named here can ever reach an `UPDATE ... SET` clause.
//!
//! Each field distinguishes an absent key (left alone) from an explicit
//! `null` (column set to NULL).

use serde::{Deserialize, Deserializer};
use sqlx::{Postgres, QueryBuilder};

use super::ValidationError;

/// A single column value to bind; `None` binds a typed NULL
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Int(Option<i32>),
}

/// Ordered, non-empty set of column assignments
#[derive(Debug, Clone, PartialEq)]
pub struct Changes {
    columns: Vec<(&'static str, FieldValue)>,
}

impl Changes {
    fn collect(
        resource: &'static str,
        columns: Vec<(&'static str, Option<FieldValue>)>,
    ) -> Result<Self, ValidationError> {
        let columns: Vec<_> = columns
            .into_iter()
            .filter_map(|(column, value)| value.map(|v| (column, v)))
            .collect();

        if columns.is_empty() {
            return Err(ValidationError::NoChanges { resource });
        }

        Ok(Self { columns })
    }

    /// Column names in assignment order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(column, _)| *column)
    }

    /// Append `col = $n, ...` to an UPDATE statement.
    pub fn push_assignments(self, builder: &mut QueryBuilder<'_, Postgres>) {
        let mut set = builder.separated(", ");
        for (column, value) in self.columns {
            set.push(column);
            set.push_unseparated(" = ");
            match value {
                FieldValue::Text(text) => set.push_bind_unseparated(text),
                FieldValue::Int(int) => set.push_bind_unseparated(int),
            };
        }
    }
}

fn text(value: Option<Option<String>>) -> Option<FieldValue> {
    value.map(FieldValue::Text)
}

fn int(value: Option<Option<i32>>) -> Option<FieldValue> {
    value.map(FieldValue::Int)
}

/// Any key that is present yields `Some`, including `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn present_loose_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    super::listing::loose_text(deserializer).map(Some)
}

/// Body of `PUT /houses/{house_id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HouseChanges {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub full_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub state: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_loose_text")]
    pub zip: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub user_id: Option<Option<i32>>,
}

impl HouseChanges {
    pub fn into_changes(self) -> Result<Changes, ValidationError> {
        Changes::collect(
            "house",
            vec![
                ("title", text(self.title)),
                ("description", text(self.description)),
                ("full_address", text(self.full_address)),
                ("country", text(self.country)),
                ("state", text(self.state)),
                ("zip", text(self.zip)),
                ("user_id", int(self.user_id)),
            ],
        )
    }
}

/// Body of `PUT /reviews/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewChanges {
    #[serde(default, deserialize_with = "present")]
    pub house_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub user_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub rating: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub comment: Option<Option<String>>,
}

impl ReviewChanges {
    pub fn into_changes(self) -> Result<Changes, ValidationError> {
        Changes::collect(
            "review",
            vec![
                ("house_id", int(self.house_id)),
                ("user_id", int(self.user_id)),
                ("rating", int(self.rating)),
                ("comment", text(self.comment)),
            ],
        )
    }
}
