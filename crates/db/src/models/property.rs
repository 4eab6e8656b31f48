//! Property listing entity model and DTOs.

use realcoop_core::paging::Ordering;
use realcoop_core::property::{AdvertType, PropertyFields, PropertyType};
use realcoop_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `properties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Property {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub slug: String,
    pub reference_code: String,
    pub description: String,
    pub country: String,
    pub city: String,
    pub postal_code: String,
    pub street_address: String,
    pub property_number: i32,
    pub price: Decimal,
    pub tax_rate: Decimal,
    pub plot_area: Decimal,
    pub total_floors: i32,
    pub bedrooms: i32,
    pub bathrooms: Decimal,
    #[sqlx(try_from = "String")]
    pub advert_type: AdvertType,
    #[sqlx(try_from = "String")]
    pub property_type: PropertyType,
    pub cover_photo: String,
    pub published_status: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Property {
    /// The editable part of this row.
    pub fn fields(&self) -> PropertyFields {
        PropertyFields {
            title: self.title.clone(),
            reference_code: self.reference_code.clone(),
            description: self.description.clone(),
            country: self.country.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            street_address: self.street_address.clone(),
            property_number: self.property_number,
            price: self.price,
            tax_rate: self.tax_rate,
            plot_area: self.plot_area,
            total_floors: self.total_floors,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            advert_type: self.advert_type,
            property_type: self.property_type,
            cover_photo: self.cover_photo.clone(),
            published_status: self.published_status,
        }
    }

    /// Price including tax.
    pub fn final_price(&self) -> Decimal {
        realcoop_core::property::final_price(self.price, self.tax_rate)
    }
}

/// DTO for creating a new listing.
///
/// Only `owner_id` and `title` are required. `title` is optional at the
/// type level so a missing one is reported by validation alongside any
/// other field errors. Every omitted field takes its default from
/// [`PropertyFields::with_title`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProperty {
    pub owner_id: DbId,
    pub title: Option<String>,
    pub reference_code: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub street_address: Option<String>,
    pub property_number: Option<i32>,
    pub price: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub plot_area: Option<Decimal>,
    pub total_floors: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<Decimal>,
    pub advert_type: Option<AdvertType>,
    pub property_type: Option<PropertyType>,
    pub cover_photo: Option<String>,
    pub published_status: Option<bool>,
}

impl CreateProperty {
    /// Resolve the DTO into a normalized field set, applying defaults.
    pub fn to_fields(&self) -> PropertyFields {
        let mut fields = PropertyFields::with_title(self.title.clone().unwrap_or_default());
        UpdateProperty::from(self.clone()).merge_into(&mut fields);
        fields.normalized()
    }
}

/// DTO for updating an existing listing. All fields are optional.
///
/// The slug is never accepted from callers; it is re-derived from the
/// (possibly unchanged) title on every update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProperty {
    pub title: Option<String>,
    pub reference_code: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub street_address: Option<String>,
    pub property_number: Option<i32>,
    pub price: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub plot_area: Option<Decimal>,
    pub total_floors: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<Decimal>,
    pub advert_type: Option<AdvertType>,
    pub property_type: Option<PropertyType>,
    pub cover_photo: Option<String>,
    pub published_status: Option<bool>,
}

impl UpdateProperty {
    /// Overwrite every field of `fields` that is `Some` in this DTO.
    pub fn merge_into(self, fields: &mut PropertyFields) {
        macro_rules! merge {
            ($($name:ident),+ $(,)?) => {
                $( if let Some(v) = self.$name { fields.$name = v; } )+
            };
        }
        merge!(
            title,
            reference_code,
            description,
            country,
            city,
            postal_code,
            street_address,
            property_number,
            price,
            tax_rate,
            plot_area,
            total_floors,
            bedrooms,
            bathrooms,
            advert_type,
            property_type,
            cover_photo,
            published_status,
        );
    }
}

impl From<CreateProperty> for UpdateProperty {
    fn from(c: CreateProperty) -> Self {
        Self {
            title: None,
            reference_code: c.reference_code,
            description: c.description,
            country: c.country,
            city: c.city,
            postal_code: c.postal_code,
            street_address: c.street_address,
            property_number: c.property_number,
            price: c.price,
            tax_rate: c.tax_rate,
            plot_area: c.plot_area,
            total_floors: c.total_floors,
            bedrooms: c.bedrooms,
            bathrooms: c.bathrooms,
            advert_type: c.advert_type,
            property_type: c.property_type,
            cover_photo: c.cover_photo,
            published_status: c.published_status,
        }
    }
}

/// Columns a caller may order listings by.
pub const ORDERABLE_COLUMNS: &[&str] = &["created_at", "updated_at", "price", "title"];

/// Server-side filter for listing queries. `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub published: Option<bool>,
    pub advert_type: Option<AdvertType>,
    pub property_type: Option<PropertyType>,
    pub owner_id: Option<DbId>,
    /// No ordering is promised when absent.
    pub ordering: Option<Ordering>,
    pub limit: i64,
    pub offset: i64,
}
