use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::clean::filter_absent;
use super::scalar::TransportScalar;
use crate::domain::{
    CALCULATOR_VERSION, CityRef, CostError, CostRequestError, Good, ShippingCost,
    ShippingCostRequest, ShippingService, TariffCode, TariffSelection,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response has neither `result` nor `error`")]
    MissingResult,
}

/// Account login and signature attached outside of test mode.
#[derive(Debug, Clone, Copy)]
pub struct CalculatorAuth<'a> {
    pub login: &'a str,
    pub secure: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShippingCostJsonRequest<'a> {
    version: &'static str,
    date_execute: String,
    sender_city_id: Option<u32>,
    receiver_city_id: Option<u32>,
    sender_city_post_code: Option<&'a str>,
    receiver_city_post_code: Option<&'a str>,
    goods: Vec<GoodJson>,
    services: Option<Vec<ServiceJson>>,
    auth_login: Option<&'a str>,
    secure: Option<&'a str>,
    tariff_id: Option<u32>,
    tariff_list: Option<Vec<TariffPriorityJson>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GoodJson {
    Dimensions {
        weight: f64,
        length: u32,
        width: u32,
        height: u32,
    },
    Volume {
        weight: f64,
        volume: f64,
    },
}

#[derive(Debug, Serialize)]
struct ServiceJson {
    id: u32,
    param: Option<f64>,
}

#[derive(Debug, Serialize)]
struct TariffPriorityJson {
    priority: usize,
    id: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct ShippingCostJsonResponse {
    #[serde(default)]
    result: Option<ShippingCostJsonResult>,
    #[serde(default)]
    error: Option<Vec<CostJsonError>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShippingCostJsonResult {
    price: TransportScalar,
    tariff_id: u32,
    #[serde(default)]
    delivery_period_min: Option<u32>,
    #[serde(default)]
    delivery_period_max: Option<u32>,
    delivery_date_min: NaiveDate,
    delivery_date_max: NaiveDate,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    price_by_currency: Option<TransportScalar>,
    #[serde(default)]
    services: Vec<ServiceJsonResult>,
}

#[derive(Debug, Clone, Deserialize)]
struct ServiceJsonResult {
    id: u32,
    #[serde(default)]
    title: String,
    #[serde(default)]
    price: Option<TransportScalar>,
    #[serde(default)]
    rate: Option<TransportScalar>,
}

#[derive(Debug, Clone, Deserialize)]
struct CostJsonError {
    code: i64,
    #[serde(default)]
    text: Option<String>,
}

/// Build the calculator JSON body. `date_execute` is the already resolved shipping date.
pub fn encode_shipping_cost_json(
    request: &ShippingCostRequest,
    date_execute: NaiveDate,
    auth: Option<CalculatorAuth<'_>>,
) -> Value {
    let (sender_city_id, sender_city_post_code) = split_city(request.sender());
    let (receiver_city_id, receiver_city_post_code) = split_city(request.receiver());

    let (tariff_id, tariff_list) = match request.tariff() {
        TariffSelection::Single(tariff) => (Some(tariff.value()), None),
        TariffSelection::Priority(tariffs) => (
            None,
            Some(
                tariffs
                    .iter()
                    .enumerate()
                    .map(|(index, tariff)| TariffPriorityJson {
                        priority: index + 1,
                        id: tariff.value(),
                    })
                    .collect(),
            ),
        ),
    };

    let services = (!request.services().is_empty()).then(|| {
        request
            .services()
            .iter()
            .map(|service| ServiceJson {
                id: service.id,
                param: service.param,
            })
            .collect()
    });

    let body = ShippingCostJsonRequest {
        version: CALCULATOR_VERSION,
        date_execute: date_execute.format("%Y-%m-%d").to_string(),
        sender_city_id,
        receiver_city_id,
        sender_city_post_code,
        receiver_city_post_code,
        goods: request.goods().iter().map(good_json).collect(),
        services,
        auth_login: auth.map(|auth| auth.login),
        secure: auth.map(|auth| auth.secure),
        tariff_id,
        tariff_list,
    };

    // Serializing plain structs of numbers and strings cannot fail.
    filter_absent(serde_json::to_value(body).unwrap_or(Value::Null))
}

fn split_city(city: &CityRef) -> (Option<u32>, Option<&str>) {
    match city {
        CityRef::Id(id) => (Some(*id), None),
        CityRef::PostCode(code) => (None, Some(code.as_str())),
    }
}

fn good_json(good: &Good) -> GoodJson {
    match *good {
        Good::Dimensions {
            weight,
            length,
            width,
            height,
        } => GoodJson::Dimensions {
            weight,
            length,
            width,
            height,
        },
        Good::Volume { weight, volume } => GoodJson::Volume { weight, volume },
    }
}

/// Decode the calculator answer: a typed result or the structured `error` list.
pub fn decode_shipping_cost_json_response(
    json: &str,
) -> Result<Result<ShippingCost, CostRequestError>, TransportError> {
    let parsed: ShippingCostJsonResponse = serde_json::from_str(json)?;

    if let Some(errors) = parsed.error {
        return Ok(Err(CostRequestError {
            errors: errors
                .into_iter()
                .map(|error| CostError {
                    code: error.code,
                    text: error.text,
                })
                .collect(),
        }));
    }

    let result = parsed.result.ok_or(TransportError::MissingResult)?;
    Ok(Ok(ShippingCost {
        price: result.price.into_string(),
        tariff_id: TariffCode::new(result.tariff_id),
        delivery_period_min: result.delivery_period_min,
        delivery_period_max: result.delivery_period_max,
        delivery_date_min: result.delivery_date_min,
        delivery_date_max: result.delivery_date_max,
        currency: result.currency,
        price_by_currency: result.price_by_currency.map(TransportScalar::into_string),
        services: result
            .services
            .into_iter()
            .map(|service| ShippingService {
                id: service.id,
                title: service.title,
                price: service.price.map(TransportScalar::into_string),
                rate: service.rate.map(TransportScalar::into_string),
            })
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::{ServiceParam, ShippingCostRequest};

    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn request_with_tariffs() -> ShippingCostRequest {
        ShippingCostRequest::builder(CityRef::Id(270), CityRef::Id(44))
            .good(Good::Dimensions {
                weight: 0.3,
                length: 10,
                width: 7,
                height: 5,
            })
            .good(Good::Volume {
                weight: 0.1,
                volume: 0.1,
            })
            .service(ServiceParam {
                id: 2,
                param: Some(1000.0),
            })
            .tariffs([3_u32, 1])
            .build()
            .unwrap()
    }

    #[test]
    fn encode_test_mode_payload_without_auth() {
        let body = encode_shipping_cost_json(&request_with_tariffs(), date(), None);

        assert_eq!(
            body,
            json!({
                "version": "1.0",
                "dateExecute": "2024-03-15",
                "senderCityId": 270,
                "receiverCityId": 44,
                "goods": [
                    { "weight": 0.3, "length": 10, "width": 7, "height": 5 },
                    { "weight": 0.1, "volume": 0.1 },
                ],
                "services": [{ "id": 2, "param": 1000.0 }],
                "tariffList": [
                    { "priority": 1, "id": 3 },
                    { "priority": 2, "id": 1 },
                ],
            })
        );
    }

    #[test]
    fn encode_with_auth_and_single_tariff() {
        let request = ShippingCostRequest::builder(
            CityRef::PostCode("680000".to_owned()),
            CityRef::PostCode("101000".to_owned()),
        )
        .good(Good::Volume {
            weight: 1.0,
            volume: 0.2,
        })
        .tariff_id(136_u32)
        .build()
        .unwrap();

        let body = encode_shipping_cost_json(
            &request,
            date(),
            Some(CalculatorAuth {
                login: "account",
                secure: "signature",
            }),
        );

        let object = body.as_object().unwrap();
        assert_eq!(object["authLogin"], "account");
        assert_eq!(object["secure"], "signature");
        assert_eq!(object["tariffId"], 136);
        assert_eq!(object["senderCityPostCode"], "680000");
        assert!(!object.contains_key("tariffList"));
        assert!(!object.contains_key("services"));
        assert!(!object.contains_key("senderCityId"));
    }

    #[test]
    fn decode_result() {
        let json = r#"
        {
          "result": {
            "price": "1250",
            "deliveryPeriodMin": 2,
            "deliveryPeriodMax": 4,
            "deliveryDateMin": "2024-03-17",
            "deliveryDateMax": "2024-03-19",
            "tariffId": 3,
            "priceByCurrency": 1250,
            "currency": "RUB",
            "services": [
              { "id": 2, "title": "Insurance", "price": 7.5, "rate": 0.0075 },
              { "id": 5, "title": "Heavy cargo", "price": 300 }
            ]
          }
        }
        "#;

        let cost = decode_shipping_cost_json_response(json).unwrap().unwrap();
        assert_eq!(cost.price, "1250");
        assert_eq!(cost.tariff_id, TariffCode::new(3));
        assert_eq!(cost.delivery_period_max, Some(4));
        assert_eq!(
            cost.delivery_date_min,
            NaiveDate::from_ymd_opt(2024, 3, 17).unwrap()
        );
        assert_eq!(cost.price_by_currency.as_deref(), Some("1250"));
        assert_eq!(cost.services[0].price.as_deref(), Some("7.5"));
        assert!(cost.is_heavy());
        assert!(!cost.is_over_sized());
    }

    #[test]
    fn decode_error_list() {
        let json = r#"{ "error": [ { "code": 3, "text": "Невозможно осуществить доставку" } ] }"#;

        let err = decode_shipping_cost_json_response(json)
            .unwrap()
            .unwrap_err();
        assert!(err.is_delivery_unavailable());
        assert_eq!(err.errors.len(), 1);
    }

    #[test]
    fn decode_rejects_empty_object_and_bad_json() {
        assert!(matches!(
            decode_shipping_cost_json_response("{}"),
            Err(TransportError::MissingResult)
        ));
        assert!(matches!(
            decode_shipping_cost_json_response("{ nope"),
            Err(TransportError::Json(_))
        ));
    }
}
