use chrono::NaiveDate;

use crate::domain::element::Element;
use crate::domain::value::{DispatchNumber, OrderNumber, PvzCode};

/// `PreAlert` document: the summary register of orders handed over to CDEK.
#[derive(Debug, Clone)]
pub struct PreAlert {
    root: Element,
}

impl PreAlert {
    pub const TAG: &'static str = "PreAlert";

    /// `pvz_code` is the receiving office.
    pub fn new(planned_meeting_date: NaiveDate, pvz_code: PvzCode) -> Self {
        Self {
            root: Element::new(Self::TAG)
                .with_attr("PlannedMeetingDate", planned_meeting_date)
                .with_attr(PvzCode::FIELD, pvz_code.as_str()),
        }
    }

    pub fn add_order(&mut self, dispatch_number: DispatchNumber, number: Option<OrderNumber>) {
        let order = Element::new("Order")
            .with_attr(DispatchNumber::FIELD, dispatch_number.as_str())
            .with_opt_attr(OrderNumber::FIELD, number.as_ref().map(OrderNumber::as_str));
        self.root.push_child(order);
    }

    pub fn order_count(&self) -> usize {
        self.root.children().len()
    }

    pub fn into_element(self) -> Element {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::element::AttrValue;

    use super::*;

    #[test]
    fn orders_are_appended_in_order() {
        let mut pre_alert = PreAlert::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            PvzCode::new("XAB1").unwrap(),
        );
        pre_alert.add_order(DispatchNumber::new("1001").unwrap(), None);
        pre_alert.add_order(
            DispatchNumber::new("1002").unwrap(),
            Some(OrderNumber::new("shop-2").unwrap()),
        );

        let root = pre_alert.into_element();
        assert_eq!(
            root.attr("PlannedMeetingDate").map(AttrValue::to_text).as_deref(),
            Some("2024-06-01")
        );
        assert_eq!(root.children().len(), 2);

        let first = root.child(0).unwrap();
        assert_eq!(
            first.attr("DispatchNumber").map(AttrValue::to_text).as_deref(),
            Some("1001")
        );
        assert_eq!(first.attr("Number"), None);

        let second = root.child(1).unwrap();
        assert_eq!(
            second.attr("Number").map(AttrValue::to_text).as_deref(),
            Some("shop-2")
        );
    }

    #[test]
    fn instances_do_not_share_orders() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut first = PreAlert::new(date, PvzCode::new("XAB1").unwrap());
        first.add_order(DispatchNumber::new("1001").unwrap(), None);
        let second = PreAlert::new(date, PvzCode::new("XAB1").unwrap());

        assert_eq!(first.order_count(), 1);
        assert_eq!(second.order_count(), 0);
    }
}
