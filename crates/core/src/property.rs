//! Property listing schema: enumerations, defaults and validation.
//!
//! [`PropertyFields`] is the fully-resolved set of user-editable values of a
//! listing (defaults already applied, partial updates already merged). The
//! repository builds one before every insert or update and runs
//! [`PropertyFields::validate`] on it; nothing is written unless it passes.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, FieldError};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_DESCRIPTION: &str = "Default description...update me please...";
pub const DEFAULT_COUNTRY: &str = "CO";
pub const DEFAULT_CITY: &str = "Bogota";
pub const DEFAULT_POSTAL_CODE: &str = "110111";
pub const DEFAULT_STREET_ADDRESS: &str = "AV68";
pub const DEFAULT_PROPERTY_NUMBER: i32 = 112;
pub const DEFAULT_PRICE: Decimal = Decimal::from_parts(0, 0, 0, false, 2);
/// 15% property tax.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);
pub const DEFAULT_PLOT_AREA: Decimal = Decimal::from_parts(0, 0, 0, false, 2);
pub const DEFAULT_TOTAL_FLOORS: i32 = 0;
pub const DEFAULT_BEDROOMS: i32 = 1;
pub const DEFAULT_BATHROOMS: Decimal = Decimal::from_parts(100, 0, 0, false, 2);
/// Relative to the media root.
pub const DEFAULT_COVER_PHOTO: &str = "house_sample.jpg";

// ---------------------------------------------------------------------------
// Column limits
// ---------------------------------------------------------------------------

pub const TITLE_MAX_LEN: usize = 250;
pub const REFERENCE_CODE_MAX_LEN: usize = 255;
pub const CITY_MAX_LEN: usize = 180;
pub const POSTAL_CODE_MAX_LEN: usize = 100;
pub const STREET_ADDRESS_MAX_LEN: usize = 150;
pub const COVER_PHOTO_MAX_LEN: usize = 255;
pub const MIN_PROPERTY_NUMBER: i32 = 1;

/// Fixed-point column shape: `NUMERIC(max_digits, decimal_places)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSpec {
    pub max_digits: u32,
    pub decimal_places: u32,
}

pub const PRICE_SPEC: DecimalSpec = DecimalSpec {
    max_digits: 8,
    decimal_places: 2,
};
pub const TAX_RATE_SPEC: DecimalSpec = DecimalSpec {
    max_digits: 6,
    decimal_places: 2,
};
pub const PLOT_AREA_SPEC: DecimalSpec = DecimalSpec {
    max_digits: 8,
    decimal_places: 2,
};
pub const BATHROOMS_SPEC: DecimalSpec = DecimalSpec {
    max_digits: 4,
    decimal_places: 2,
};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Transaction kind of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdvertType {
    #[default]
    #[serde(rename = "For Sale")]
    ForSale,
    #[serde(rename = "For Rent")]
    ForRent,
    #[serde(rename = "Auction")]
    Auction,
}

impl AdvertType {
    pub const ALL: [Self; 3] = [Self::ForSale, Self::ForRent, Self::Auction];

    /// Stored/wire value.
    pub fn name(self) -> &'static str {
        match self {
            Self::ForSale => "For Sale",
            Self::ForRent => "For Rent",
            Self::Auction => "Auction",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| {
                CoreError::field("advert_type", format!("Unknown advert type '{name}'"))
            })
    }
}

impl fmt::Display for AdvertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for AdvertType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

/// Physical category of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyType {
    House,
    Apartment,
    Office,
    Warehouse,
    Commercial,
    #[default]
    Other,
}

impl PropertyType {
    pub const ALL: [Self; 6] = [
        Self::House,
        Self::Apartment,
        Self::Office,
        Self::Warehouse,
        Self::Commercial,
        Self::Other,
    ];

    /// Stored/wire value.
    pub fn name(self) -> &'static str {
        match self {
            Self::House => "House",
            Self::Apartment => "Apartment",
            Self::Office => "Office",
            Self::Warehouse => "Warehouse",
            Self::Commercial => "Commercial",
            Self::Other => "Other",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| {
                CoreError::field("property_type", format!("Unknown property type '{name}'"))
            })
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for PropertyType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

// ---------------------------------------------------------------------------
// Resolved field set
// ---------------------------------------------------------------------------

/// Every user-editable value of a listing, defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFields {
    pub title: String,
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
    pub advert_type: AdvertType,
    pub property_type: PropertyType,
    pub cover_photo: String,
    pub published_status: bool,
}

impl PropertyFields {
    /// A listing with the given title and every other field at its default.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reference_code: String::new(),
            description: DEFAULT_DESCRIPTION.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            city: DEFAULT_CITY.to_string(),
            postal_code: DEFAULT_POSTAL_CODE.to_string(),
            street_address: DEFAULT_STREET_ADDRESS.to_string(),
            property_number: DEFAULT_PROPERTY_NUMBER,
            price: DEFAULT_PRICE,
            tax_rate: DEFAULT_TAX_RATE,
            plot_area: DEFAULT_PLOT_AREA,
            total_floors: DEFAULT_TOTAL_FLOORS,
            bedrooms: DEFAULT_BEDROOMS,
            bathrooms: DEFAULT_BATHROOMS,
            advert_type: AdvertType::default(),
            property_type: PropertyType::default(),
            cover_photo: DEFAULT_COVER_PHOTO.to_string(),
            published_status: false,
        }
    }

    /// Canonicalize values before validation and storage.
    ///
    /// A reference code that is blank after trimming is stored as `''`,
    /// which the partial unique index treats as "no code".
    pub fn normalized(mut self) -> Self {
        let trimmed = self.reference_code.trim();
        if trimmed.len() != self.reference_code.len() {
            self.reference_code = trimmed.to_string();
        }
        self
    }

    /// Check every declared constraint, collecting all failures.
    ///
    /// Returns [`CoreError::InvalidFields`] listing each offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        check_max_len(&mut errors, "title", &self.title, TITLE_MAX_LEN);
        check_max_len(
            &mut errors,
            "reference_code",
            &self.reference_code,
            REFERENCE_CODE_MAX_LEN,
        );
        check_max_len(&mut errors, "city", &self.city, CITY_MAX_LEN);
        check_max_len(
            &mut errors,
            "postal_code",
            &self.postal_code,
            POSTAL_CODE_MAX_LEN,
        );
        check_max_len(
            &mut errors,
            "street_address",
            &self.street_address,
            STREET_ADDRESS_MAX_LEN,
        );

        if let Err(e) = validate_country(&self.country) {
            errors.push(e);
        }
        if let Err(e) = validate_cover_photo(&self.cover_photo) {
            errors.push(e);
        }

        if self.property_number < MIN_PROPERTY_NUMBER {
            errors.push(FieldError::new(
                "property_number",
                format!("Ensure this value is greater than or equal to {MIN_PROPERTY_NUMBER}"),
            ));
        }
        check_non_negative_int(&mut errors, "total_floors", self.total_floors);
        check_non_negative_int(&mut errors, "bedrooms", self.bedrooms);

        check_decimal(&mut errors, "price", self.price, PRICE_SPEC);
        check_decimal(&mut errors, "tax_rate", self.tax_rate, TAX_RATE_SPEC);
        check_decimal(&mut errors, "plot_area", self.plot_area, PLOT_AREA_SPEC);
        check_decimal(&mut errors, "bathrooms", self.bathrooms, BATHROOMS_SPEC);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidFields(errors))
        }
    }

    /// Price including tax, rounded half-up to cents.
    pub fn final_price(&self) -> Decimal {
        final_price(self.price, self.tax_rate)
    }
}

/// `price + round(price * tax_rate, 2)`.
pub fn final_price(price: Decimal, tax_rate: Decimal) -> Decimal {
    let tax = (price * tax_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let mut total = price + tax;
    total.rescale(2);
    total
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

fn check_max_len(errors: &mut Vec<FieldError>, field: &'static str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(FieldError::new(
            field,
            format!("Ensure this value has at most {max} characters"),
        ));
    }
}

fn check_non_negative_int(errors: &mut Vec<FieldError>, field: &'static str, value: i32) {
    if value < 0 {
        errors.push(FieldError::new(field, "Must not be negative"));
    }
}

/// Check that `value` is non-negative and fits `NUMERIC(max_digits, decimal_places)`.
///
/// Trailing zeros are ignored, so `1.500` is accepted for two places.
fn check_decimal(errors: &mut Vec<FieldError>, field: &'static str, value: Decimal, spec: DecimalSpec) {
    if value.is_sign_negative() && !value.is_zero() {
        errors.push(FieldError::new(field, "Must not be negative"));
        return;
    }

    let normalized = value.normalize();
    if normalized.scale() > spec.decimal_places {
        errors.push(FieldError::new(
            field,
            format!(
                "Ensure that there are no more than {} decimal places",
                spec.decimal_places
            ),
        ));
        return;
    }

    let whole_digits = spec.max_digits - spec.decimal_places;
    let limit = Decimal::from(10_i64.pow(whole_digits));
    if normalized.trunc() >= limit {
        errors.push(FieldError::new(
            field,
            format!("Ensure that there are no more than {whole_digits} digits before the decimal point"),
        ));
    }
}

/// Accepts an ISO 3166-1 alpha-2 shaped code (two upper-case ASCII letters).
pub fn validate_country(country: &str) -> Result<(), FieldError> {
    if country.len() == 2 && country.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(FieldError::new(
            "country",
            format!("'{country}' is not a two-letter country code"),
        ))
    }
}

/// Cover photos are paths relative to the media root.
pub fn validate_cover_photo(path: &str) -> Result<(), FieldError> {
    if path.chars().count() > COVER_PHOTO_MAX_LEN {
        return Err(FieldError::new(
            "cover_photo",
            format!("Ensure this value has at most {COVER_PHOTO_MAX_LEN} characters"),
        ));
    }
    if path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg == ".." || seg.is_empty())
    {
        return Err(FieldError::new(
            "cover_photo",
            "Must be a relative path inside the media root",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
