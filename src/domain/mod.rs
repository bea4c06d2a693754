//! Domain layer: strong types, request builders and parsed responses (no I/O).

mod courier;
mod delivery;
mod document;
mod element;
mod handle;
mod pre_alert;
mod record;
mod request;
mod response;
mod validation;
mod value;

pub use courier::{CallCourier, CallHandle, CallOptions, CallWindow, CourierAddress};
pub use delivery::{
    DeliveryAddress, DeliveryRequest, ItemDetails, OrderDetails, OrderHandle, OrderOptions,
    PackageHandle, PackageOptions,
};
pub use document::{
    DeleteRequest, Document, InfoRequest, OrdersPackagesPrint, OrdersPrint, StatusReport,
};
pub use element::{AttrValue, Element};
pub use pre_alert::PreAlert;
pub use record::{Field, Record};
pub use request::{
    CALCULATOR_VERSION, CityRef, DeliveryPointsQuery, Good, LocationQuery, PointType,
    ServiceParam, ShippingCostRequest, ShippingCostRequestBuilder, TariffSelection,
};
pub use response::{
    City, CostError, CostRequestError, DeliveryPoint, DeliveryPoints, PrintResponse, Region,
    ShippingCost, ShippingService,
};
pub use validation::ValidationError;
pub use value::{
    Account, ActNumber, DispatchNumber, OrderNumber, PhoneNumber, PvzCode, RawPhoneNumber,
    RecipientName, SecurePassword, TariffCode,
};
