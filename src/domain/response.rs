use chrono::NaiveDate;

use crate::domain::record::Record;
use crate::domain::value::TariffCode;

/// Successful cost calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingCost {
    /// Price as returned by CDEK (string form preserved).
    pub price: String,
    pub tariff_id: TariffCode,
    pub delivery_period_min: Option<u32>,
    pub delivery_period_max: Option<u32>,
    pub delivery_date_min: NaiveDate,
    pub delivery_date_max: NaiveDate,
    pub currency: Option<String>,
    pub price_by_currency: Option<String>,
    pub services: Vec<ShippingService>,
}

impl ShippingCost {
    /// The calculation includes the heavy-cargo surcharge.
    pub fn is_heavy(&self) -> bool {
        self.services.iter().any(ShippingService::is_heavy)
    }

    /// The calculation includes the oversized-cargo surcharge.
    pub fn is_over_sized(&self) -> bool {
        self.services.iter().any(ShippingService::is_over_sized)
    }
}

/// Additional service applied by the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingService {
    pub id: u32,
    pub title: String,
    pub price: Option<String>,
    pub rate: Option<String>,
}

impl ShippingService {
    pub const HEAVY_ID: u32 = 5;
    pub const OVER_SIZED_ID: u32 = 6;

    pub fn is_heavy(&self) -> bool {
        self.id == Self::HEAVY_ID
    }

    pub fn is_over_sized(&self) -> bool {
        self.id == Self::OVER_SIZED_ID
    }
}

/// One entry of the calculator `error` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostError {
    pub code: i64,
    pub text: Option<String>,
}

/// The calculator answered with an `error` list instead of a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cost request rejected: {}", describe(.errors))]
pub struct CostRequestError {
    pub errors: Vec<CostError>,
}

impl CostRequestError {
    /// Error code meaning no tariff can deliver between the given points.
    pub const DELIVERY_UNAVAILABLE_CODE: i64 = 3;

    pub fn is_delivery_unavailable(&self) -> bool {
        self.errors
            .iter()
            .any(|error| error.code == Self::DELIVERY_UNAVAILABLE_CODE)
    }
}

fn describe(errors: &[CostError]) -> String {
    errors
        .iter()
        .map(|error| match error.text.as_deref() {
            Some(text) => format!("[{}] {text}", error.code),
            None => format!("[{}]", error.code),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Region from the location catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub prefix: Option<String>,
    pub code_ext: Option<String>,
    pub code: Option<String>,
    pub fias_guid: Option<String>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,
    /// The full object as returned by CDEK.
    pub raw: serde_json::Value,
}

/// City from the location catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub region: Option<String>,
    pub region_code: Option<String>,
    pub sub_region: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub payment_limit: Option<String>,
    /// The full object as returned by CDEK.
    pub raw: serde_json::Value,
}

/// Pickup point list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeliveryPoints {
    pub pvz: Vec<DeliveryPoint>,
}

/// Pickup point (PVZ) or parcel locker.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryPoint {
    pub code: Option<String>,
    pub name: Option<String>,
    pub point_type: Option<String>,
    pub city: Option<String>,
    pub city_code: Option<String>,
    pub address: Option<String>,
    pub full_address: Option<String>,
    pub phone: Option<String>,
    pub work_time: Option<String>,
    pub coord_x: Option<String>,
    pub coord_y: Option<String>,
    pub have_cashless: Option<bool>,
    pub allowed_cod: Option<bool>,
    /// The full object as returned by CDEK.
    pub raw: serde_json::Value,
}

/// Outcome of a print request.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintResponse {
    /// The printable document (PDF) as returned by CDEK.
    Document(Vec<u8>),
    /// CDEK answered with an XML error document instead of a PDF.
    Rejected(Record),
}

impl PrintResponse {
    pub fn document(&self) -> Option<&[u8]> {
        match self {
            Self::Document(bytes) => Some(bytes),
            Self::Rejected(_) => None,
        }
    }
}
