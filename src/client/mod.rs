//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod auth;
mod config;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};

pub use auth::Credentials;
pub use config::{
    ACCOUNT_VAR, API_URL_VAR, ConfigError, DEFAULT_BASE_URL, DEFAULT_CALCULATOR_URL,
    EDUCATIONAL_BASE_URL, SECURE_PASSWORD_VAR, TEST_VAR,
};

use crate::domain::{
    CallCourier, City, CostRequestError, DeleteRequest, DeliveryPoints, DeliveryPointsQuery,
    DeliveryRequest, Document, Element, InfoRequest, LocationQuery, OrdersPackagesPrint,
    OrdersPrint, PreAlert, PrintResponse, Record, Region, ShippingCost, ShippingCostRequest,
    StatusReport, ValidationError,
};
use crate::transport::{self, CalculatorAuth, DocumentError, XmlNode};

const REGIONS_PATH: &str = "/v1/location/regions/json";
const CITIES_PATH: &str = "/v1/location/cities/json";
const DELIVERY_POINTS_PATH: &str = "/pvzlist/v1/json";
const CREATE_ORDERS_PATH: &str = "/new_orders.php";
const DELETE_ORDERS_PATH: &str = "/delete_orders.php";
const CALL_COURIER_PATH: &str = "/call_courier.php";
const PRE_ALERT_PATH: &str = "/addPreAlert";
const INFO_REPORT_PATH: &str = "/info_report.php";
const STATUS_REPORT_PATH: &str = "/status_report_h.php";
const ORDERS_PRINT_PATH: &str = "/orders_print.php";
const PACKAGES_PRINT_PATH: &str = "/ordersPackagesPrint";

const XML_REQUEST_FIELD: &str = "xml_request";
const XML_PREFIX: &[u8] = b"<?xml";

const DEFAULT_SHIPPING_COST_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq)]
enum HttpMethod {
    Get { query: Vec<(String, String)> },
    PostForm { params: Vec<(String, String)> },
    PostJson { body: serde_json::Value },
}

#[derive(Debug, Clone)]
struct HttpRequest {
    url: String,
    method: HttpMethod,
    timeout: Duration,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: Vec<u8>,
}

trait HttpTransport: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let builder = match request.method {
                HttpMethod::Get { query } => {
                    let mut url = url::Url::parse(&request.url)?;
                    if !query.is_empty() {
                        url.query_pairs_mut().extend_pairs(query);
                    }
                    self.client.get(url)
                }
                HttpMethod::PostForm { params } => self.client.post(&request.url).form(&params),
                HttpMethod::PostJson { body } => self.client.post(&request.url).json(&body),
            };

            let response = builder.timeout(request.timeout).send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`CdekClient`].
///
/// Business errors attached to individual response elements (`ErrorCode`, `Msg`) are not
/// errors here; they stay in the returned [`Record`]s.
pub enum CdekError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// A request document could not be encoded or a response document is malformed.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// JSON response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The calculator rejected the request.
    #[error(transparent)]
    CostRequest(#[from] CostRequestError),

    /// The response document lacks the expected element.
    #[error("response has no `{element}` element")]
    MissingElement {
        element: &'static str,
        response: Record,
    },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Client configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone)]
/// Builder for [`CdekClient`].
///
/// Use this when you need the educational endpoint, test mode, other timeouts or a user-agent.
pub struct CdekClientBuilder {
    credentials: Credentials,
    base_url: String,
    calculator_url: String,
    test_mode: bool,
    shipping_cost_timeout: Duration,
    request_timeout: Duration,
    user_agent: Option<String>,
}

impl CdekClientBuilder {
    /// Create a builder with the production endpoints and default timeouts.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            calculator_url: DEFAULT_CALCULATOR_URL.to_owned(),
            test_mode: false,
            shipping_cost_timeout: DEFAULT_SHIPPING_COST_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: None,
        }
    }

    /// Override the integration base URL (see [`EDUCATIONAL_BASE_URL`]).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the full cost calculator URL.
    pub fn calculator_url(mut self, calculator_url: impl Into<String>) -> Self {
        self.calculator_url = calculator_url.into();
        self
    }

    /// In test mode the calculator request is sent without `authLogin`/`secure`.
    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Timeout of the cost calculator request (default: 3 seconds).
    pub fn shipping_cost_timeout(mut self, timeout: Duration) -> Self {
        self.shipping_cost_timeout = timeout;
        self
    }

    /// Timeout of every other request (default: 60 seconds).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`CdekClient`].
    ///
    /// Errors:
    /// - [`CdekError::Config`] when the base or calculator URL is not an absolute URL,
    /// - [`CdekError::Transport`] when the HTTP client cannot be created.
    pub fn build(self) -> Result<CdekClient, CdekError> {
        config::validate_url("base_url", &self.base_url)?;
        config::validate_url("calculator_url", &self.calculator_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| CdekError::Transport(Box::new(err)))?;

        Ok(CdekClient {
            credentials: self.credentials,
            base_url: self.base_url.trim_end_matches('/').to_owned(),
            calculator_url: self.calculator_url,
            test_mode: self.test_mode,
            shipping_cost_timeout: self.shipping_cost_timeout,
            request_timeout: self.request_timeout,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level CDEK client.
///
/// One async method per remote operation. Document operations sign the request with the
/// account's secure password; catalogue lookups are unauthenticated GET requests.
pub struct CdekClient {
    credentials: Credentials,
    base_url: String,
    calculator_url: String,
    test_mode: bool,
    shipping_cost_timeout: Duration,
    request_timeout: Duration,
    http: Arc<dyn HttpTransport>,
}

impl CdekClient {
    /// Create a client for the production endpoints.
    ///
    /// For more customization, use [`CdekClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            calculator_url: DEFAULT_CALCULATOR_URL.to_owned(),
            test_mode: false,
            shipping_cost_timeout: DEFAULT_SHIPPING_COST_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> CdekClientBuilder {
        CdekClientBuilder::new(credentials)
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }

    /// Calculate the shipping cost.
    ///
    /// The request is signed over its `dateExecute` (today unless set), except in test mode.
    ///
    /// Errors:
    /// - [`CdekError::CostRequest`] when the calculator answers with an `error` list,
    /// - [`CdekError::HttpStatus`] for non-2xx HTTP responses,
    /// - [`CdekError::Parse`] when the JSON answer cannot be decoded.
    pub async fn shipping_cost(
        &self,
        request: ShippingCostRequest,
    ) -> Result<ShippingCost, CdekError> {
        let date = request.date_execute().unwrap_or_else(today);
        let secure = (!self.test_mode).then(|| self.credentials.sign(date));
        let auth = secure.as_deref().map(|secure| CalculatorAuth {
            login: self.credentials.account().as_str(),
            secure,
        });
        let body = transport::encode_shipping_cost_json(&request, date, auth);

        tracing::debug!(
            url = %self.calculator_url,
            test_mode = self.test_mode,
            "requesting shipping cost"
        );
        let response = self
            .execute(HttpRequest {
                url: self.calculator_url.clone(),
                method: HttpMethod::PostJson { body },
                timeout: self.shipping_cost_timeout,
            })
            .await?;

        let parsed = transport::decode_shipping_cost_json_response(body_text(&response.body)?)
            .map_err(|err| CdekError::Parse(Box::new(err)))?;
        parsed.map_err(|err| {
            tracing::warn!(error = %err, "shipping cost request rejected");
            CdekError::CostRequest(err)
        })
    }

    /// List regions of the location catalogue.
    pub async fn regions(&self, query: LocationQuery) -> Result<Vec<Region>, CdekError> {
        let body = self
            .get(REGIONS_PATH, transport::encode_location_query(&query))
            .await?;
        transport::decode_regions_json_response(body_text(&body)?)
            .map_err(|err| CdekError::Parse(Box::new(err)))
    }

    /// List cities of the location catalogue.
    pub async fn cities(&self, query: LocationQuery) -> Result<Vec<City>, CdekError> {
        let body = self
            .get(CITIES_PATH, transport::encode_location_query(&query))
            .await?;
        transport::decode_cities_json_response(body_text(&body)?)
            .map_err(|err| CdekError::Parse(Box::new(err)))
    }

    /// List pickup points. Without a city filter every point is returned.
    pub async fn delivery_points(
        &self,
        query: DeliveryPointsQuery,
    ) -> Result<DeliveryPoints, CdekError> {
        let body = self
            .get(
                DELIVERY_POINTS_PATH,
                transport::encode_delivery_points_query(&query),
            )
            .await?;
        transport::decode_delivery_points_json_response(body_text(&body)?)
            .map_err(|err| CdekError::Parse(Box::new(err)))
    }

    /// Register orders.
    ///
    /// Returns the top-level response elements carrying a `DispatchNumber`.
    pub async fn create_orders(&self, request: DeliveryRequest) -> Result<Vec<Record>, CdekError> {
        let body = self.post_document(CREATE_ORDERS_PATH, request.into()).await?;
        let root = transport::parse_tree(&body)?;
        warn_business_errors(&root);
        Ok(to_records(root.children_with_attribute("DispatchNumber")))
    }

    /// Delete orders from an act.
    ///
    /// Returns the top-level response elements carrying a `DispatchNumber`.
    pub async fn delete_orders(&self, request: DeleteRequest) -> Result<Vec<Record>, CdekError> {
        let body = self.post_document(DELETE_ORDERS_PATH, request.into()).await?;
        let root = transport::parse_tree(&body)?;
        warn_business_errors(&root);
        Ok(to_records(root.children_with_attribute("DispatchNumber")))
    }

    /// Request courier pickups.
    ///
    /// Errors:
    /// - [`CdekError::MissingElement`] when the response has no `Call` element.
    pub async fn call_courier(&self, request: CallCourier) -> Result<Record, CdekError> {
        let body = self.post_document(CALL_COURIER_PATH, request.into()).await?;
        let root = transport::parse_tree(&body)?;
        warn_business_errors(&root);
        match root.find("Call") {
            Some(call) => Ok(call.to_record()),
            None => Err(CdekError::MissingElement {
                element: "Call",
                response: root.to_record(),
            }),
        }
    }

    /// Register a pre-alert (handover manifest).
    pub async fn create_prealerts(&self, request: PreAlert) -> Result<Vec<Record>, CdekError> {
        self.post_order_report(PRE_ALERT_PATH, request.into()).await
    }

    /// Order details report.
    pub async fn orders_info(&self, request: InfoRequest) -> Result<Vec<Record>, CdekError> {
        self.post_order_report(INFO_REPORT_PATH, request.into()).await
    }

    /// Order status report, with status history unless disabled.
    pub async fn orders_statuses(&self, request: StatusReport) -> Result<Vec<Record>, CdekError> {
        self.post_order_report(STATUS_REPORT_PATH, request.into()).await
    }

    /// Printable order receipts (PDF).
    pub async fn orders_print(&self, request: OrdersPrint) -> Result<PrintResponse, CdekError> {
        let body = self.post_document(ORDERS_PRINT_PATH, request.into()).await?;
        print_response(body)
    }

    /// Printable package barcodes (PDF).
    pub async fn barcode_print(
        &self,
        request: OrdersPackagesPrint,
    ) -> Result<PrintResponse, CdekError> {
        let body = self
            .post_document(PACKAGES_PRINT_PATH, request.into())
            .await?;
        print_response(body)
    }

    async fn post_order_report(
        &self,
        path: &'static str,
        document: Document,
    ) -> Result<Vec<Record>, CdekError> {
        let body = self.post_document(path, document).await?;
        let root = transport::parse_tree(&body)?;
        warn_business_errors(&root);
        Ok(to_records(root.children_named("Order")))
    }

    async fn post_document(
        &self,
        path: &'static str,
        document: Document,
    ) -> Result<Vec<u8>, CdekError> {
        let tag = document.tag();
        let root = self.sign_document(document, today());
        let xml = String::from_utf8(transport::serialize(&root)?)
            .map_err(|err| DocumentError::Encoding(err.to_string()))?;

        tracing::debug!(document = tag, path, "posting document");
        let response = self
            .execute(HttpRequest {
                url: self.endpoint(path),
                method: HttpMethod::PostForm {
                    params: vec![(XML_REQUEST_FIELD.to_owned(), xml)],
                },
                timeout: self.request_timeout,
            })
            .await?;
        Ok(response.body)
    }

    async fn get(
        &self,
        path: &'static str,
        query: Vec<(&'static str, String)>,
    ) -> Result<Vec<u8>, CdekError> {
        tracing::debug!(path, "querying catalogue");
        let response = self
            .execute(HttpRequest {
                url: self.endpoint(path),
                method: HttpMethod::Get {
                    query: query
                        .into_iter()
                        .map(|(key, value)| (key.to_owned(), value))
                        .collect(),
                },
                timeout: self.request_timeout,
            })
            .await?;
        Ok(response.body)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, CdekError> {
        let url = request.url.clone();
        let response = self
            .http
            .execute(request)
            .await
            .map_err(CdekError::Transport)?;

        if !(200..=299).contains(&response.status) {
            tracing::warn!(%url, status = response.status, "unexpected HTTP status");
            let body = String::from_utf8_lossy(&response.body).into_owned();
            let body = if body.trim().is_empty() {
                None
            } else {
                Some(body)
            };
            return Err(CdekError::HttpStatus {
                status: response.status,
                body,
            });
        }

        Ok(response)
    }

    /// Stamp `Date`, `Account` and `Secure` on the document root.
    fn sign_document(&self, document: Document, date: NaiveDate) -> Element {
        let mut root = document.into_element();
        root.set_attr("Date", date);
        root.set_attr("Account", self.credentials.account().as_str());
        root.set_attr("Secure", self.credentials.sign(date));
        root
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn body_text(body: &[u8]) -> Result<&str, CdekError> {
    std::str::from_utf8(body).map_err(|err| CdekError::Parse(Box::new(err)))
}

fn to_records<'a>(nodes: impl Iterator<Item = &'a XmlNode>) -> Vec<Record> {
    nodes.map(XmlNode::to_record).collect()
}

fn warn_business_errors(root: &XmlNode) {
    for node in std::iter::once(root).chain(root.children.iter()) {
        if let Some(code) = node.attr("ErrorCode") {
            tracing::warn!(
                element = %node.name,
                error_code = code,
                message = node.attr("Msg").unwrap_or_default(),
                "CDEK reported an error"
            );
        }
    }
}

fn print_response(body: Vec<u8>) -> Result<PrintResponse, CdekError> {
    if body.starts_with(XML_PREFIX) {
        let record = transport::parse(&body)?;
        tracing::warn!(
            error_code = record.error_code().unwrap_or_default(),
            "print request rejected"
        );
        return Ok(PrintResponse::Rejected(record));
    }
    Ok(PrintResponse::Document(body))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::domain::{
        ActNumber, CallOptions, CallWindow, CityRef, DispatchNumber, Good, OrderDetails,
        OrderNumber, OrderOptions, PointType, PvzCode, RawPhoneNumber, RecipientName,
    };

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_request: Option<HttpRequest>,
        response_status: u16,
        response_body: Vec<u8>,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<Vec<u8>>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_request: None,
                    response_status,
                    response_body: response_body.into(),
                })),
            }
        }

        fn last_request(&self) -> HttpRequest {
            let state = self.state.lock().unwrap();
            state.last_request.clone().expect("no request was sent")
        }

        fn sent_document(&self) -> XmlNode {
            match self.last_request().method {
                HttpMethod::PostForm { params } => {
                    assert_eq!(params.len(), 1);
                    assert_eq!(params[0].0, "xml_request");
                    transport::parse_tree(params[0].1.as_bytes()).unwrap()
                }
                other => panic!("unexpected method: {other:?}"),
            }
        }
    }

    impl HttpTransport for FakeTransport {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let (status, body) = {
                    let mut state = self.state.lock().unwrap();
                    state.last_request = Some(request);
                    (state.response_status, state.response_body.clone())
                };
                Ok(HttpResponse { status, body })
            })
        }
    }

    fn credentials() -> Credentials {
        Credentials::from_parts("account", "secret").unwrap()
    }

    fn make_client(transport: FakeTransport, test_mode: bool) -> CdekClient {
        CdekClient {
            credentials: credentials(),
            base_url: "https://example.invalid".to_owned(),
            calculator_url: "https://calc.example.invalid/calculate".to_owned(),
            test_mode,
            shipping_cost_timeout: DEFAULT_SHIPPING_COST_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            http: Arc::new(transport),
        }
    }

    fn cost_request() -> ShippingCostRequest {
        ShippingCostRequest::builder(CityRef::Id(270), CityRef::Id(44))
            .good(Good::Volume {
                weight: 0.3,
                volume: 0.001,
            })
            .tariff_id(3_u32)
            .date_execute(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .build()
            .unwrap()
    }

    fn dispatch(value: &str) -> DispatchNumber {
        DispatchNumber::new(value).unwrap()
    }

    const COST_OK: &str = r#"
    {
      "result": {
        "price": "1250",
        "deliveryPeriodMin": 2,
        "deliveryPeriodMax": 3,
        "deliveryDateMin": "2020-01-03",
        "deliveryDateMax": "2020-01-04",
        "tariffId": 3,
        "currency": "RUB"
      }
    }
    "#;

    #[tokio::test]
    async fn shipping_cost_signs_request_outside_test_mode() {
        let transport = FakeTransport::new(200, COST_OK);
        let client = make_client(transport.clone(), false);

        let cost = client.shipping_cost(cost_request()).await.unwrap();
        assert_eq!(cost.price, "1250");
        assert_eq!(cost.tariff_id.value(), 3);

        let request = transport.last_request();
        assert_eq!(request.url, "https://calc.example.invalid/calculate");
        assert_eq!(request.timeout, Duration::from_secs(3));
        let HttpMethod::PostJson { body } = request.method else {
            panic!("expected JSON body");
        };
        assert_eq!(body["authLogin"], "account");
        assert_eq!(body["secure"], "e266bea6c4e82b6539b9a5f0ad74cce2");
        assert_eq!(body["dateExecute"], "2020-01-01");
        assert_eq!(body["tariffId"], 3);
    }

    #[tokio::test]
    async fn shipping_cost_in_test_mode_omits_auth() {
        let transport = FakeTransport::new(200, COST_OK);
        let client = make_client(transport.clone(), true);

        client.shipping_cost(cost_request()).await.unwrap();

        let HttpMethod::PostJson { body } = transport.last_request().method else {
            panic!("expected JSON body");
        };
        let object = body.as_object().unwrap();
        assert!(!object.contains_key("authLogin"));
        assert!(!object.contains_key("secure"));
    }

    #[tokio::test]
    async fn shipping_cost_maps_error_list() {
        let json = r#"{ "error": [ { "code": 3, "text": "Невозможно осуществить доставку" } ] }"#;
        let client = make_client(FakeTransport::new(200, json), false);

        let err = client.shipping_cost(cost_request()).await.unwrap_err();
        match err {
            CdekError::CostRequest(err) => assert!(err.is_delivery_unavailable()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn shipping_cost_maps_invalid_json_to_parse_error() {
        let client = make_client(FakeTransport::new(200, "{ not json }"), false);
        let err = client.shipping_cost(cost_request()).await.unwrap_err();
        assert!(matches!(err, CdekError::Parse(_)));
    }

    #[tokio::test]
    async fn non_success_status_keeps_body() {
        let client = make_client(FakeTransport::new(500, "oops"), false);
        let err = client.shipping_cost(cost_request()).await.unwrap_err();
        assert!(matches!(
            err,
            CdekError::HttpStatus {
                status: 500,
                body: Some(_)
            }
        ));

        let client = make_client(FakeTransport::new(503, "  "), false);
        let err = client
            .regions(LocationQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CdekError::HttpStatus {
                status: 503,
                body: None
            }
        ));
    }

    #[tokio::test]
    async fn regions_send_query_and_decode() {
        let json = r#"[{"regionName": "Москва", "regionCode": 81, "countryCode": "RU"}]"#;
        let transport = FakeTransport::new(200, json);
        let client = make_client(transport.clone(), false);

        let regions = client.regions(LocationQuery::default()).await.unwrap();
        assert_eq!(regions[0].code.as_deref(), Some("81"));

        let request = transport.last_request();
        assert_eq!(
            request.url,
            "https://example.invalid/v1/location/regions/json"
        );
        assert_eq!(
            request.method,
            HttpMethod::Get {
                query: vec![
                    ("countryCode".to_owned(), "RU".to_owned()),
                    ("page".to_owned(), "0".to_owned()),
                    ("size".to_owned(), "1000".to_owned()),
                ]
            }
        );
    }

    #[tokio::test]
    async fn cities_use_city_catalogue() {
        let transport = FakeTransport::new(200, r#"[{"cityName": "Хабаровск", "cityCode": 408}]"#);
        let client = make_client(transport.clone(), false);

        let cities = client.cities(LocationQuery::default()).await.unwrap();
        assert_eq!(cities[0].code.as_deref(), Some("408"));
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/v1/location/cities/json"
        );
    }

    #[tokio::test]
    async fn delivery_points_filter_by_city() {
        let json = r#"{"pvz": [{"code": "KHB1", "type": "POSTOMAT"}]}"#;
        let transport = FakeTransport::new(200, json);
        let client = make_client(transport.clone(), false);

        let points = client
            .delivery_points(DeliveryPointsQuery {
                city_id: Some(408),
                point_type: PointType::Postomat,
                ..DeliveryPointsQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(points.pvz[0].point_type.as_deref(), Some("POSTOMAT"));

        let request = transport.last_request();
        assert_eq!(request.url, "https://example.invalid/pvzlist/v1/json");
        assert_eq!(
            request.method,
            HttpMethod::Get {
                query: vec![
                    ("cityid".to_owned(), "408".to_owned()),
                    ("type".to_owned(), "POSTOMAT".to_owned()),
                ]
            }
        );
    }

    #[tokio::test]
    async fn create_orders_signs_document_and_selects_dispatched_orders() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <Order DispatchNumber="1105256" Number="test-1"/>
  <Order Number="test-2" ErrorCode="ERR_ORDER_DUBL_EXISTS" Msg="duplicate"/>
  <Order Msg="Добавлено заказов 1"/>
</response>"#;
        let transport = FakeTransport::new(200, xml);
        let client = make_client(transport.clone(), false);

        let mut request = DeliveryRequest::new(ActNumber::new("act-1").unwrap());
        request.add_order(
            OrderDetails {
                number: OrderNumber::new("test-1").unwrap(),
                tariff_type_code: 136_u32.into(),
                recipient_name: RecipientName::new("Иван Петров").unwrap(),
                phone: RawPhoneNumber::new("+79251234567").unwrap(),
            },
            OrderOptions::default(),
        );

        let orders = client.create_orders(request).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].text("DispatchNumber"), Some("1105256"));

        let request = transport.last_request();
        assert_eq!(request.url, "https://example.invalid/new_orders.php");
        assert_eq!(request.timeout, Duration::from_secs(60));

        let sent = transport.sent_document();
        assert_eq!(sent.name, "DeliveryRequest");
        assert_eq!(sent.attr("Account"), Some("account"));
        assert_eq!(sent.attr("OrderCount"), Some("1"));
        let date = NaiveDate::parse_from_str(sent.attr("Date").unwrap(), "%Y-%m-%d").unwrap();
        assert_eq!(sent.attr("Secure"), Some(credentials().sign(date).as_str()));
    }

    #[tokio::test]
    async fn delete_orders_uses_delete_endpoint() {
        let xml = r#"<response><DeleteRequest DispatchNumber="1105256"/></response>"#;
        let transport = FakeTransport::new(200, xml);
        let client = make_client(transport.clone(), false);

        let request = DeleteRequest::new(
            ActNumber::new("act-1").unwrap(),
            vec![dispatch("1105256")],
        )
        .unwrap();
        let deleted = client.delete_orders(request).await.unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/delete_orders.php"
        );
        assert_eq!(transport.sent_document().name, "DeleteRequest");
    }

    fn courier_request() -> CallCourier {
        let mut request = CallCourier::new();
        request.add_call(
            CallWindow::new(
                NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                chrono::NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            ),
            CallOptions::default(),
        );
        request
    }

    #[tokio::test]
    async fn call_courier_returns_call_element() {
        let xml = r#"<response><Call Number="42" Msg="ok"/></response>"#;
        let transport = FakeTransport::new(200, xml);
        let client = make_client(transport.clone(), false);

        let call = client.call_courier(courier_request()).await.unwrap();
        assert_eq!(call.text("Number"), Some("42"));
        assert_eq!(transport.sent_document().attr("CallCount"), Some("1"));
    }

    #[tokio::test]
    async fn call_courier_without_call_element_is_reported() {
        let xml = r#"<response><CallCourier ErrorCode="ERR_AUTH" Msg="bad auth"/></response>"#;
        let client = make_client(FakeTransport::new(200, xml), false);

        let err = client.call_courier(courier_request()).await.unwrap_err();
        match err {
            CdekError::MissingElement { element, response } => {
                assert_eq!(element, "Call");
                assert_eq!(
                    response
                        .node("CallCourier")
                        .and_then(Record::error_code),
                    Some("ERR_AUTH")
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn reports_select_order_children() {
        let xml = r#"<StatusReport>
  <Order DispatchNumber="1">
    <Status Code="4"><State Code="1"/></Status>
  </Order>
  <Order DispatchNumber="2" ErrorCode="ERR_INVALID_DISPATCHNUMBER" Msg="unknown"/>
</StatusReport>"#;
        let transport = FakeTransport::new(200, xml);
        let client = make_client(transport.clone(), false);

        let request = StatusReport::new(vec![dispatch("1"), dispatch("2")]).unwrap();
        let orders = client.orders_statuses(request).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].node("Status").unwrap().list("State").len(), 1);
        assert_eq!(orders[1].error_code(), Some("ERR_INVALID_DISPATCHNUMBER"));

        let request = transport.last_request();
        assert_eq!(request.url, "https://example.invalid/status_report_h.php");
        assert_eq!(transport.sent_document().attr("ShowHistory"), Some("true"));
    }

    #[tokio::test]
    async fn info_and_prealert_use_their_endpoints() {
        let xml = r#"<response><Order DispatchNumber="1"/></response>"#;
        let transport = FakeTransport::new(200, xml);
        let client = make_client(transport.clone(), false);

        let info = InfoRequest::new(vec![dispatch("1")]).unwrap();
        assert_eq!(client.orders_info(info).await.unwrap().len(), 1);
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/info_report.php"
        );

        let mut pre_alert = PreAlert::new(
            NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            PvzCode::new("KHB1").unwrap(),
        );
        pre_alert.add_order(dispatch("1"), None);
        assert_eq!(client.create_prealerts(pre_alert).await.unwrap().len(), 1);
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/addPreAlert"
        );
        assert_eq!(transport.sent_document().name, "PreAlert");
    }

    #[tokio::test]
    async fn orders_print_returns_raw_document() {
        let pdf = b"%PDF-1.4 binary".to_vec();
        let transport = FakeTransport::new(200, pdf.clone());
        let client = make_client(transport.clone(), false);

        let request = OrdersPrint::new(vec![dispatch("1")]).unwrap();
        let response = client.orders_print(request).await.unwrap();
        assert_eq!(response.document(), Some(pdf.as_slice()));
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/orders_print.php"
        );
        assert_eq!(transport.sent_document().attr("CopyCount"), Some("1"));
    }

    #[tokio::test]
    async fn barcode_print_maps_xml_error_to_rejected() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?><response><OrdersPackagesPrint ErrorCode="ERR_INVALID_NUMBER" Msg="no order"/></response>"#;
        let transport = FakeTransport::new(200, xml);
        let client = make_client(transport.clone(), false);

        let request = OrdersPackagesPrint::new(vec![dispatch("1")]).unwrap();
        let response = client.barcode_print(request).await.unwrap();
        match response {
            PrintResponse::Rejected(record) => assert_eq!(
                record
                    .node("OrdersPackagesPrint")
                    .and_then(Record::error_code),
                Some("ERR_INVALID_NUMBER")
            ),
            other => panic!("unexpected response: {other:?}"),
        }
        assert_eq!(
            transport.last_request().url,
            "https://example.invalid/ordersPackagesPrint"
        );
    }

    #[tokio::test]
    async fn malformed_document_response_is_reported() {
        let client = make_client(FakeTransport::new(200, "<response><Order>"), false);
        let request = InfoRequest::new(vec![dispatch("1")]).unwrap();
        let err = client.orders_info(request).await.unwrap_err();
        assert!(matches!(
            err,
            CdekError::Document(DocumentError::Malformed(_))
        ));
    }

    #[test]
    fn sign_document_stamps_root() {
        let client = make_client(FakeTransport::new(200, ""), false);
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let document = InfoRequest::new(vec![dispatch("1")]).unwrap().into();

        let root = client.sign_document(document, date);
        assert_eq!(root.attr("Date").map(|v| v.to_text()).as_deref(), Some("2020-01-01"));
        assert_eq!(root.attr("Account").map(|v| v.to_text()).as_deref(), Some("account"));
        assert_eq!(
            root.attr("Secure").map(|v| v.to_text()).as_deref(),
            Some("e266bea6c4e82b6539b9a5f0ad74cce2")
        );
    }

    #[test]
    fn builder_applies_overrides_and_validates_urls() {
        let client = CdekClient::builder(credentials())
            .base_url("http://integration.edu.cdek.ru/")
            .calculator_url("https://calc.example.invalid/calc")
            .test_mode(true)
            .shipping_cost_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.base_url, EDUCATIONAL_BASE_URL);
        assert_eq!(
            client.endpoint(CREATE_ORDERS_PATH),
            "http://integration.edu.cdek.ru/new_orders.php"
        );
        assert!(client.is_test_mode());
        assert_eq!(client.shipping_cost_timeout, Duration::from_secs(5));

        let err = CdekClient::builder(credentials())
            .base_url("integration.cdek.ru")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, CdekError::Config(ConfigError::InvalidUrl { .. })));
    }
}
