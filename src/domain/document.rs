use crate::domain::courier::CallCourier;
use crate::domain::delivery::DeliveryRequest;
use crate::domain::element::Element;
use crate::domain::pre_alert::PreAlert;
use crate::domain::validation::ValidationError;
use crate::domain::value::{ActNumber, DispatchNumber};

/// Deletes orders that belong to a transfer-acceptance act.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    act_number: ActNumber,
    dispatch_numbers: Vec<DispatchNumber>,
}

impl DeleteRequest {
    pub const TAG: &'static str = "DeleteRequest";

    pub fn new(
        act_number: ActNumber,
        dispatch_numbers: Vec<DispatchNumber>,
    ) -> Result<Self, ValidationError> {
        require_orders(&dispatch_numbers)?;
        Ok(Self {
            act_number,
            dispatch_numbers,
        })
    }

    pub fn act_number(&self) -> &ActNumber {
        &self.act_number
    }

    pub fn dispatch_numbers(&self) -> &[DispatchNumber] {
        &self.dispatch_numbers
    }

    pub fn into_element(self) -> Element {
        let root = Element::new(Self::TAG)
            .with_attr(ActNumber::FIELD, self.act_number.as_str())
            .with_attr("OrderCount", self.dispatch_numbers.len());
        with_orders(root, &self.dispatch_numbers)
    }
}

/// Requests order details.
#[derive(Debug, Clone)]
pub struct InfoRequest {
    dispatch_numbers: Vec<DispatchNumber>,
}

impl InfoRequest {
    pub const TAG: &'static str = "InfoRequest";

    pub fn new(dispatch_numbers: Vec<DispatchNumber>) -> Result<Self, ValidationError> {
        require_orders(&dispatch_numbers)?;
        Ok(Self { dispatch_numbers })
    }

    pub fn dispatch_numbers(&self) -> &[DispatchNumber] {
        &self.dispatch_numbers
    }

    pub fn into_element(self) -> Element {
        with_orders(Element::new(Self::TAG), &self.dispatch_numbers)
    }
}

/// Requests order statuses, with the status history by default.
#[derive(Debug, Clone)]
pub struct StatusReport {
    dispatch_numbers: Vec<DispatchNumber>,
    show_history: bool,
}

impl StatusReport {
    pub const TAG: &'static str = "StatusReport";

    pub fn new(dispatch_numbers: Vec<DispatchNumber>) -> Result<Self, ValidationError> {
        require_orders(&dispatch_numbers)?;
        Ok(Self {
            dispatch_numbers,
            show_history: true,
        })
    }

    pub fn show_history(mut self, show_history: bool) -> Self {
        self.show_history = show_history;
        self
    }

    pub fn dispatch_numbers(&self) -> &[DispatchNumber] {
        &self.dispatch_numbers
    }

    pub fn into_element(self) -> Element {
        let root = Element::new(Self::TAG).with_attr("ShowHistory", self.show_history);
        with_orders(root, &self.dispatch_numbers)
    }
}

/// Printable waybill (PDF) for orders.
#[derive(Debug, Clone)]
pub struct OrdersPrint {
    dispatch_numbers: Vec<DispatchNumber>,
    copy_count: u32,
}

impl OrdersPrint {
    pub const TAG: &'static str = "OrdersPrint";

    pub fn new(dispatch_numbers: Vec<DispatchNumber>) -> Result<Self, ValidationError> {
        require_orders(&dispatch_numbers)?;
        Ok(Self {
            dispatch_numbers,
            copy_count: 1,
        })
    }

    pub fn copy_count(mut self, copy_count: u32) -> Self {
        self.copy_count = copy_count;
        self
    }

    pub fn into_element(self) -> Element {
        print_element(Self::TAG, &self.dispatch_numbers, self.copy_count)
    }
}

/// Printable package barcode labels (PDF) for orders.
#[derive(Debug, Clone)]
pub struct OrdersPackagesPrint {
    dispatch_numbers: Vec<DispatchNumber>,
    copy_count: u32,
}

impl OrdersPackagesPrint {
    pub const TAG: &'static str = "OrdersPackagesPrint";

    pub fn new(dispatch_numbers: Vec<DispatchNumber>) -> Result<Self, ValidationError> {
        require_orders(&dispatch_numbers)?;
        Ok(Self {
            dispatch_numbers,
            copy_count: 1,
        })
    }

    pub fn copy_count(mut self, copy_count: u32) -> Self {
        self.copy_count = copy_count;
        self
    }

    pub fn into_element(self) -> Element {
        print_element(Self::TAG, &self.dispatch_numbers, self.copy_count)
    }
}

/// Every request document the client can send.
#[derive(Debug, Clone)]
pub enum Document {
    Delivery(DeliveryRequest),
    CallCourier(CallCourier),
    PreAlert(PreAlert),
    Delete(DeleteRequest),
    Info(InfoRequest),
    Status(StatusReport),
    OrdersPrint(OrdersPrint),
    PackagesPrint(OrdersPackagesPrint),
}

impl Document {
    /// Root tag of the document.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Delivery(_) => DeliveryRequest::TAG,
            Self::CallCourier(_) => CallCourier::TAG,
            Self::PreAlert(_) => PreAlert::TAG,
            Self::Delete(_) => DeleteRequest::TAG,
            Self::Info(_) => InfoRequest::TAG,
            Self::Status(_) => StatusReport::TAG,
            Self::OrdersPrint(_) => OrdersPrint::TAG,
            Self::PackagesPrint(_) => OrdersPackagesPrint::TAG,
        }
    }

    pub fn into_element(self) -> Element {
        match self {
            Self::Delivery(request) => request.into_element(),
            Self::CallCourier(request) => request.into_element(),
            Self::PreAlert(request) => request.into_element(),
            Self::Delete(request) => request.into_element(),
            Self::Info(request) => request.into_element(),
            Self::Status(request) => request.into_element(),
            Self::OrdersPrint(request) => request.into_element(),
            Self::PackagesPrint(request) => request.into_element(),
        }
    }
}

impl From<DeliveryRequest> for Document {
    fn from(value: DeliveryRequest) -> Self {
        Self::Delivery(value)
    }
}

impl From<CallCourier> for Document {
    fn from(value: CallCourier) -> Self {
        Self::CallCourier(value)
    }
}

impl From<PreAlert> for Document {
    fn from(value: PreAlert) -> Self {
        Self::PreAlert(value)
    }
}

impl From<DeleteRequest> for Document {
    fn from(value: DeleteRequest) -> Self {
        Self::Delete(value)
    }
}

impl From<InfoRequest> for Document {
    fn from(value: InfoRequest) -> Self {
        Self::Info(value)
    }
}

impl From<StatusReport> for Document {
    fn from(value: StatusReport) -> Self {
        Self::Status(value)
    }
}

impl From<OrdersPrint> for Document {
    fn from(value: OrdersPrint) -> Self {
        Self::OrdersPrint(value)
    }
}

impl From<OrdersPackagesPrint> for Document {
    fn from(value: OrdersPackagesPrint) -> Self {
        Self::PackagesPrint(value)
    }
}

fn require_orders(dispatch_numbers: &[DispatchNumber]) -> Result<(), ValidationError> {
    if dispatch_numbers.is_empty() {
        return Err(ValidationError::Empty {
            field: DispatchNumber::FIELD,
        });
    }
    Ok(())
}

fn with_orders(mut root: Element, dispatch_numbers: &[DispatchNumber]) -> Element {
    for dispatch_number in dispatch_numbers {
        root.push_child(
            Element::new("Order").with_attr(DispatchNumber::FIELD, dispatch_number.as_str()),
        );
    }
    root
}

fn print_element(tag: &str, dispatch_numbers: &[DispatchNumber], copy_count: u32) -> Element {
    let root = Element::new(tag)
        .with_attr("OrderCount", dispatch_numbers.len())
        .with_attr("CopyCount", copy_count);
    with_orders(root, dispatch_numbers)
}
