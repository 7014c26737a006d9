//! Book model

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::error::{AppError, AppResult};

/// Validated fields in declaration order, with the name used in error messages
const CHECKED_FIELDS: [(&str, &str); 4] = [
    ("name", "Name"),
    ("author", "Author"),
    ("publication_date", "PublicationDate"),
    ("price", "Price"),
];

/// Book record
///
/// The same shape is read from request bodies and written in responses.
/// `id` is assigned by the store and ignored on input. A field that is
/// absent or `null` reads as its zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, Validate, ToSchema)]
pub struct Book {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "book_name", default, deserialize_with = "null_as_default")]
    #[sqlx(rename = "book_name")]
    #[validate(length(min = 1, code = "required"))]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, code = "required"))]
    pub author: String,
    /// Publication date, stored verbatim
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, code = "required"))]
    pub publication_date: String,
    /// Must be strictly positive
    #[serde(
        default,
        deserialize_with = "null_as_default",
        serialize_with = "serialize_price"
    )]
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
}

impl Book {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        publication_date: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            author: author.into(),
            publication_date: publication_date.into(),
            price,
        }
    }

    /// Check the fields required to create a book.
    ///
    /// Fails with one `field <Field> is required|invalid` entry per offending
    /// field, joined by `, `.
    pub fn validate_new(&self) -> AppResult<()> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(errors) => Err(AppError::Validation(self.describe_errors(&errors))),
        }
    }

    fn describe_errors(&self, errors: &ValidationErrors) -> String {
        let field_errors = errors.field_errors();

        CHECKED_FIELDS
            .iter()
            .filter_map(|(field, label)| {
                let errs = field_errors.get(*field)?;
                // A zero price is what an absent one decodes to.
                let missing = errs.iter().any(|e| e.code == "required")
                    || (*field == "price" && self.price == 0.0);
                Some(if missing {
                    format!("field {} is required", label)
                } else {
                    format!("field {} is invalid", label)
                })
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integral prices go out as JSON integers (`13`, not `13.0`).
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    if price.fract() == 0.0 && price.abs() <= MAX_EXACT {
        serializer.serialize_i64(*price as i64)
    } else {
        serializer.serialize_f64(*price)
    }
}

/// Body returned after a book is created
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookCreated {
    pub book_id: i64,
}

/// Body returned after a book is updated
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookUpdated {
    /// `<n> book updated`
    pub message: String,
}

impl BookUpdated {
    pub fn new(rows: u64) -> Self {
        Self {
            message: format!("{} book updated", rows),
        }
    }
}

/// Body returned after a delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BooksDeleted {
    pub rows_deleted: u64,
}
