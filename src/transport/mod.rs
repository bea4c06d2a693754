//! Transport layer: wire formats (XML documents, calculator JSON, catalogue queries).

mod clean;
mod location;
mod scalar;
mod shipping_cost;
mod xml;

pub use clean::{filter_absent, filter_absent_pairs};
pub use location::{
    decode_cities_json_response, decode_delivery_points_json_response,
    decode_regions_json_response, encode_delivery_points_query, encode_location_query,
};
pub use scalar::TransportScalar;
pub use shipping_cost::{
    CalculatorAuth, TransportError, decode_shipping_cost_json_response, encode_shipping_cost_json,
};
pub use xml::{ARRAY_TAGS, DocumentError, XmlNode, parse, parse_tree, serialize};
