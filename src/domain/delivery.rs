use crate::domain::element::{AttrValue, Element};
use crate::domain::handle::BuilderId;
use crate::domain::validation::ValidationError;
use crate::domain::value::{
    ActNumber, OrderNumber, PvzCode, RawPhoneNumber, RecipientName, TariffCode,
};

/// Handle to an order added with [`DeliveryRequest::add_order`].
///
/// Only accepted by the request that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderHandle {
    owner: BuilderId,
    index: usize,
}

/// Handle to a package added with [`DeliveryRequest::add_package`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackageHandle {
    owner: BuilderId,
    order: usize,
    package: usize,
}

/// Mandatory order fields.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub number: OrderNumber,
    pub tariff_type_code: TariffCode,
    pub recipient_name: RecipientName,
    pub phone: RawPhoneNumber,
}

#[derive(Debug, Clone, Default)]
pub struct OrderOptions {
    /// Sender city code from the CDEK city catalogue.
    pub send_city_code: Option<u32>,
    pub send_city_post_code: Option<String>,
    /// Recipient city code from the CDEK city catalogue.
    pub rec_city_code: Option<u32>,
    pub rec_city_post_code: Option<String>,
    /// Extra delivery fee charged to the recipient (`DeliveryRecipientCost`).
    pub delivery_recipient_cost: Option<f64>,
    pub comment: Option<String>,
    /// Seller name printed on the waybill instead of the account holder.
    pub seller_name: Option<String>,
}

#[derive(Debug, Clone)]
pub enum DeliveryAddress {
    /// Delivery to a pickup point; only the point code is sent.
    Pickup(PvzCode),
    /// Door delivery.
    Door {
        street: Option<String>,
        house: Option<String>,
        flat: Option<String>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    /// Package number, unique within the order. Defaults to the order number.
    pub number: Option<String>,
    /// Package barcode, unique within the order. Defaults to the order number.
    pub barcode: Option<String>,
    /// Length in centimetres.
    pub size_a: Option<u32>,
    /// Width in centimetres.
    pub size_b: Option<u32>,
    /// Height in centimetres.
    pub size_c: Option<u32>,
    /// Total weight in grams.
    pub weight: Option<u32>,
}

/// One item (goods line) of a package.
#[derive(Debug, Clone)]
pub struct ItemDetails {
    pub ware_key: String,
    /// Weight per unit in grams.
    pub weight: u32,
    /// Declared cost per unit.
    pub cost: f64,
    /// Amount the recipient pays per unit on delivery.
    pub payment: f64,
    pub amount: u32,
    /// Item name, optionally with size/colour.
    pub comment: String,
}

impl ItemDetails {
    /// Create an item with zero payment, amount 1 and an empty comment.
    pub fn new(ware_key: impl Into<String>, weight: u32, cost: f64) -> Self {
        Self {
            ware_key: ware_key.into(),
            weight,
            cost,
            payment: 0.0,
            amount: 1,
            comment: String::new(),
        }
    }

    pub fn payment(mut self, payment: f64) -> Self {
        self.payment = payment;
        self
    }

    pub fn amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
}

/// `DeliveryRequest` document: one or more orders with addresses, packages, items and
/// additional services.
#[derive(Debug, Clone)]
pub struct DeliveryRequest {
    id: BuilderId,
    root: Element,
}

impl DeliveryRequest {
    pub const TAG: &'static str = "DeliveryRequest";

    /// Start a request identified by the client-side act `number`.
    pub fn new(number: ActNumber) -> Self {
        Self {
            id: BuilderId::next(),
            root: Element::new(Self::TAG).with_attr(ActNumber::FIELD, number.as_str()),
        }
    }

    pub fn number(&self) -> Option<&AttrValue> {
        self.root.attr(ActNumber::FIELD)
    }

    pub fn order_count(&self) -> usize {
        self.root.children().len()
    }

    pub fn add_order(&mut self, details: OrderDetails, options: OrderOptions) -> OrderHandle {
        let order = Element::new("Order")
            .with_attr(OrderNumber::FIELD, details.number.as_str())
            .with_opt_attr("SendCityCode", options.send_city_code)
            .with_opt_attr("SendCityPostCode", options.send_city_post_code)
            .with_opt_attr("RecCityCode", options.rec_city_code)
            .with_opt_attr("RecCityPostCode", options.rec_city_post_code)
            .with_attr(RecipientName::FIELD, details.recipient_name.as_str())
            .with_attr(TariffCode::FIELD, details.tariff_type_code.value())
            .with_opt_attr("DeliveryRecipientCost", options.delivery_recipient_cost)
            .with_attr(RawPhoneNumber::FIELD, details.phone.raw())
            .with_opt_attr("Comment", options.comment)
            .with_opt_attr("SellerName", options.seller_name);

        OrderHandle {
            owner: self.id,
            index: self.root.push_child(order),
        }
    }

    pub fn add_address(
        &mut self,
        order: OrderHandle,
        address: DeliveryAddress,
    ) -> Result<(), ValidationError> {
        let element = match address {
            DeliveryAddress::Pickup(pvz_code) => {
                Element::new("Address").with_attr(PvzCode::FIELD, pvz_code.as_str())
            }
            DeliveryAddress::Door {
                street,
                house,
                flat,
            } => Element::new("Address")
                .with_opt_attr("Street", street)
                .with_opt_attr("House", house)
                .with_opt_attr("Flat", flat),
        };

        self.order_mut(order)?.push_child(element);
        Ok(())
    }

    /// Add a package to an order.
    ///
    /// Dimensions are sent only when all three are given and non-zero; otherwise none of
    /// them is sent.
    pub fn add_package(
        &mut self,
        order: OrderHandle,
        options: PackageOptions,
    ) -> Result<PackageHandle, ValidationError> {
        let order_element = self.order_mut(order)?;
        let order_number = order_element
            .attr(OrderNumber::FIELD)
            .map(AttrValue::to_text)
            .unwrap_or_default();

        let (size_a, size_b, size_c) = match (options.size_a, options.size_b, options.size_c) {
            (Some(a), Some(b), Some(c)) if a > 0 && b > 0 && c > 0 => (Some(a), Some(b), Some(c)),
            _ => (None, None, None),
        };

        let package = Element::new("Package")
            .with_attr(
                "Number",
                options.number.unwrap_or_else(|| order_number.clone()),
            )
            .with_attr("BarCode", options.barcode.unwrap_or(order_number))
            .with_opt_attr("SizeA", size_a)
            .with_opt_attr("SizeB", size_b)
            .with_opt_attr("SizeC", size_c)
            .with_opt_attr("Weight", options.weight);

        let package = order_element.push_child(package);
        Ok(PackageHandle {
            owner: self.id,
            order: order.index,
            package,
        })
    }

    pub fn add_item(
        &mut self,
        package: PackageHandle,
        item: ItemDetails,
    ) -> Result<(), ValidationError> {
        let element = Element::new("Item")
            .with_attr("Amount", item.amount)
            .with_attr("Weight", item.weight)
            .with_attr("WareKey", item.ware_key)
            .with_attr("Cost", item.cost)
            .with_attr("Payment", item.payment)
            .with_attr("Comment", item.comment);

        let unknown = ValidationError::UnknownHandle {
            kind: "package",
            index: package.package,
        };
        if package.owner != self.id {
            return Err(unknown);
        }
        let package_element = self
            .root
            .child_mut(package.order)
            .and_then(|order| order.child_mut(package.package))
            .filter(|element| element.name() == "Package")
            .ok_or(unknown)?;
        package_element.push_child(element);
        Ok(())
    }

    /// Attach an additional service (`AddService`) to an order.
    pub fn add_service(
        &mut self,
        order: OrderHandle,
        code: u32,
        count: Option<u32>,
    ) -> Result<(), ValidationError> {
        let element = Element::new("AddService")
            .with_attr("ServiceCode", code)
            .with_opt_attr("Count", count);
        self.order_mut(order)?.push_child(element);
        Ok(())
    }

    /// Finalize the request. `OrderCount` reflects the orders actually added.
    pub fn into_element(self) -> Element {
        let count = self.order_count();
        let mut root = self.root;
        root.set_attr("OrderCount", count);
        root
    }

    fn order_mut(&mut self, order: OrderHandle) -> Result<&mut Element, ValidationError> {
        let unknown = ValidationError::UnknownHandle {
            kind: "order",
            index: order.index,
        };
        if order.owner != self.id {
            return Err(unknown);
        }
        self.root.child_mut(order.index).ok_or(unknown)
    }
}
