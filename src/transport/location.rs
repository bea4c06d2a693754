use serde_json::{Map, Value};

use super::clean::filter_absent_pairs;
use super::shipping_cost::TransportError;
use crate::domain::{
    City, DeliveryPoint, DeliveryPoints, DeliveryPointsQuery, LocationQuery, Region,
};

/// Query pairs shared by the region and city catalogues.
pub fn encode_location_query(query: &LocationQuery) -> Vec<(&'static str, String)> {
    filter_absent_pairs([
        ("regionCodeExt", query.region_code_ext.map(|code| code.to_string())),
        ("regionCode", query.region_code.map(|code| code.to_string())),
        ("countryCode", query.country_code.clone()),
        ("page", Some(query.page.to_string())),
        ("size", Some(query.size.to_string())),
    ])
}

pub fn encode_delivery_points_query(query: &DeliveryPointsQuery) -> Vec<(&'static str, String)> {
    filter_absent_pairs([
        ("citypostcode", query.city_post_code.clone()),
        ("cityid", query.city_id.map(|id| id.to_string())),
        ("type", Some(query.point_type.as_str().to_owned())),
        ("havecashless", query.have_cashless.map(|flag| flag.to_string())),
        ("allowedcod", query.allowed_cod.map(|flag| flag.to_string())),
    ])
}

pub fn decode_regions_json_response(json: &str) -> Result<Vec<Region>, TransportError> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(json)?;

    Ok(objects
        .into_iter()
        .map(|object| Region {
            uuid: scalar(&object, "regionUuid"),
            name: scalar(&object, "regionName"),
            prefix: scalar(&object, "prefix"),
            code_ext: scalar(&object, "regionCodeExt"),
            code: scalar(&object, "regionCode"),
            fias_guid: scalar(&object, "regionFiasGuid"),
            country_name: scalar(&object, "countryName"),
            country_code: scalar(&object, "countryCode"),
            raw: Value::Object(object),
        })
        .collect())
}

pub fn decode_cities_json_response(json: &str) -> Result<Vec<City>, TransportError> {
    let objects: Vec<Map<String, Value>> = serde_json::from_str(json)?;

    Ok(objects
        .into_iter()
        .map(|object| City {
            uuid: scalar(&object, "cityUuid"),
            name: scalar(&object, "cityName"),
            code: scalar(&object, "cityCode"),
            region: scalar(&object, "region"),
            region_code: scalar(&object, "regionCode"),
            sub_region: scalar(&object, "subRegion"),
            country: scalar(&object, "country"),
            country_code: scalar(&object, "countryCode"),
            latitude: scalar(&object, "latitude"),
            longitude: scalar(&object, "longitude"),
            payment_limit: scalar(&object, "paymentLimit"),
            raw: Value::Object(object),
        })
        .collect())
}

/// Decode `{"pvz": [...]}`. A missing `pvz` key is an empty list.
pub fn decode_delivery_points_json_response(json: &str) -> Result<DeliveryPoints, TransportError> {
    #[derive(serde::Deserialize)]
    struct Envelope {
        #[serde(default)]
        pvz: Vec<Map<String, Value>>,
    }

    let envelope: Envelope = serde_json::from_str(json)?;

    Ok(DeliveryPoints {
        pvz: envelope
            .pvz
            .into_iter()
            .map(|object| DeliveryPoint {
                code: scalar(&object, "code"),
                name: scalar(&object, "name"),
                point_type: scalar(&object, "type"),
                city: scalar(&object, "city"),
                city_code: scalar(&object, "cityCode"),
                address: scalar(&object, "address"),
                full_address: scalar(&object, "fullAddress"),
                phone: scalar(&object, "phone"),
                work_time: scalar(&object, "workTime"),
                coord_x: scalar(&object, "coordX"),
                coord_y: scalar(&object, "coordY"),
                have_cashless: flag(&object, "haveCashless"),
                allowed_cod: flag(&object, "allowedCod"),
                raw: Value::Object(object),
            })
            .collect(),
    })
}

/// String or number field rendered as text; other JSON types are ignored.
fn scalar(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// `true`/`false`, `1`/`0` (any case) or a JSON number; anything else is unknown.
fn flag(object: &Map<String, Value>, key: &str) -> Option<bool> {
    match object.get(key)? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_i64().map(|value| value != 0),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
