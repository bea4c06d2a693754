use chrono::NaiveDate;

use crate::domain::validation::ValidationError;
use crate::domain::value::TariffCode;

/// Calculator API version sent with every cost request.
pub const CALCULATOR_VERSION: &str = "1.0";

/// One parcel of a cost request: either dimensions or a volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Good {
    /// Weight in kilograms, dimensions in centimetres.
    Dimensions {
        weight: f64,
        length: u32,
        width: u32,
        height: u32,
    },
    /// Weight in kilograms, volume in cubic metres.
    Volume { weight: f64, volume: f64 },
}

/// Additional service for the cost calculator (`services[]`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceParam {
    pub id: u32,
    pub param: Option<f64>,
}

/// Sender or receiver location for the calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CityRef {
    /// City code from the CDEK city catalogue.
    Id(u32),
    PostCode(String),
}

/// Tariff selection of a cost request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TariffSelection {
    Single(TariffCode),
    /// Tariffs in priority order (first has priority 1).
    Priority(Vec<TariffCode>),
}

/// Validated shipping cost request.
#[derive(Debug, Clone)]
pub struct ShippingCostRequest {
    sender: CityRef,
    receiver: CityRef,
    goods: Vec<Good>,
    tariff: TariffSelection,
    services: Vec<ServiceParam>,
    date_execute: Option<NaiveDate>,
}

impl ShippingCostRequest {
    pub fn builder(sender: CityRef, receiver: CityRef) -> ShippingCostRequestBuilder {
        ShippingCostRequestBuilder {
            sender,
            receiver,
            goods: Vec::new(),
            tariff_id: None,
            tariffs: Vec::new(),
            services: Vec::new(),
            date_execute: None,
        }
    }

    pub fn sender(&self) -> &CityRef {
        &self.sender
    }

    pub fn receiver(&self) -> &CityRef {
        &self.receiver
    }

    pub fn goods(&self) -> &[Good] {
        &self.goods
    }

    pub fn tariff(&self) -> &TariffSelection {
        &self.tariff
    }

    pub fn services(&self) -> &[ServiceParam] {
        &self.services
    }

    /// Planned shipping date; `None` means today.
    pub fn date_execute(&self) -> Option<NaiveDate> {
        self.date_execute
    }
}

#[derive(Debug, Clone)]
pub struct ShippingCostRequestBuilder {
    sender: CityRef,
    receiver: CityRef,
    goods: Vec<Good>,
    tariff_id: Option<TariffCode>,
    tariffs: Vec<TariffCode>,
    services: Vec<ServiceParam>,
    date_execute: Option<NaiveDate>,
}

impl ShippingCostRequestBuilder {
    pub fn good(mut self, good: Good) -> Self {
        self.goods.push(good);
        self
    }

    pub fn goods(mut self, goods: impl IntoIterator<Item = Good>) -> Self {
        self.goods.extend(goods);
        self
    }

    /// Single tariff; takes precedence over [`ShippingCostRequestBuilder::tariffs`].
    pub fn tariff_id(mut self, tariff: impl Into<TariffCode>) -> Self {
        self.tariff_id = Some(tariff.into());
        self
    }

    /// Tariffs in priority order.
    pub fn tariffs<T: Into<TariffCode>>(mut self, tariffs: impl IntoIterator<Item = T>) -> Self {
        self.tariffs.extend(tariffs.into_iter().map(Into::into));
        self
    }

    pub fn service(mut self, service: ServiceParam) -> Self {
        self.services.push(service);
        self
    }

    pub fn date_execute(mut self, date: NaiveDate) -> Self {
        self.date_execute = Some(date);
        self
    }

    /// Validate the request.
    ///
    /// Errors:
    /// - [`ValidationError::TariffRequired`] when neither a tariff id nor tariffs were given,
    /// - [`ValidationError::Empty`] when no goods were given,
    /// - [`ValidationError::NonFinite`] when a weight, volume or service parameter is NaN or
    ///   infinite.
    pub fn build(self) -> Result<ShippingCostRequest, ValidationError> {
        let tariff = match (self.tariff_id, self.tariffs.is_empty()) {
            (Some(tariff), _) => TariffSelection::Single(tariff),
            (None, false) => TariffSelection::Priority(self.tariffs),
            (None, true) => return Err(ValidationError::TariffRequired),
        };
        if self.goods.is_empty() {
            return Err(ValidationError::Empty { field: "goods" });
        }
        for good in &self.goods {
            let (weight, volume) = match *good {
                Good::Dimensions { weight, .. } => (weight, None),
                Good::Volume { weight, volume } => (weight, Some(volume)),
            };
            finite("weight", weight)?;
            if let Some(volume) = volume {
                finite("volume", volume)?;
            }
        }
        for service in &self.services {
            if let Some(param) = service.param {
                finite("param", param)?;
            }
        }

        Ok(ShippingCostRequest {
            sender: self.sender,
            receiver: self.receiver,
            goods: self.goods,
            tariff,
            services: self.services,
            date_execute: self.date_execute,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { field })
    }
}

/// Filter for the region and city catalogues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    pub region_code_ext: Option<u32>,
    /// Region code in the CDEK catalogue.
    pub region_code: Option<u32>,
    pub country_code: Option<String>,
    pub page: u32,
    pub size: u32,
}

impl Default for LocationQuery {
    fn default() -> Self {
        Self {
            region_code_ext: None,
            region_code: None,
            country_code: Some("RU".to_owned()),
            page: 0,
            size: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointType {
    #[default]
    Pvz,
    Postomat,
    All,
}

impl PointType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pvz => "PVZ",
            Self::Postomat => "POSTOMAT",
            Self::All => "ALL",
        }
    }
}

/// Filter for the pickup point list. With no city, all points are returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryPointsQuery {
    pub city_post_code: Option<String>,
    pub city_id: Option<u32>,
    pub point_type: PointType,
    /// Only points with a card payment terminal.
    pub have_cashless: Option<bool>,
    /// Only points accepting cash on delivery.
    pub allowed_cod: Option<bool>,
}
