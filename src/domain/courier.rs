use chrono::{NaiveDate, NaiveTime};

use crate::domain::element::Element;
use crate::domain::handle::BuilderId;
use crate::domain::validation::ValidationError;
use crate::domain::value::{DispatchNumber, RawPhoneNumber};

/// Handle to a call added with [`CallCourier::add_call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallHandle {
    owner: BuilderId,
    index: usize,
}

/// Date and time window in which the courier is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallWindow {
    pub date: NaiveDate,
    pub time_begin: NaiveTime,
    pub time_end: NaiveTime,
}

impl CallWindow {
    pub fn new(date: NaiveDate, time_begin: NaiveTime, time_end: NaiveTime) -> Self {
        Self {
            date,
            time_begin,
            time_end,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Order the pickup is bound to.
    pub dispatch_number: Option<DispatchNumber>,
    /// Sender city code from the CDEK city catalogue.
    pub sender_city_id: Option<u32>,
    pub sender_phone: Option<RawPhoneNumber>,
    pub sender_name: Option<String>,
    /// Total weight in grams.
    pub weight: Option<u32>,
    pub comment: Option<String>,
    /// Lunch break; sent only together with `lunch_end`.
    pub lunch_begin: Option<NaiveTime>,
    /// Lunch break end; sent only together with `lunch_begin`.
    pub lunch_end: Option<NaiveTime>,
    /// Skip the provider's arrival-time checks.
    pub ignore_time: bool,
}

/// Pickup address of a courier call.
#[derive(Debug, Clone)]
pub struct CourierAddress {
    pub street: String,
    pub house: String,
    pub flat: Option<String>,
}

/// `CallCourier` document: requests for a courier to collect parcels.
#[derive(Debug, Clone)]
pub struct CallCourier {
    id: BuilderId,
    root: Element,
}

impl Default for CallCourier {
    fn default() -> Self {
        Self::new()
    }
}

impl CallCourier {
    pub const TAG: &'static str = "CallCourier";

    pub fn new() -> Self {
        Self {
            id: BuilderId::next(),
            root: Element::new(Self::TAG),
        }
    }

    pub fn call_count(&self) -> usize {
        self.root.children().len()
    }

    pub fn add_call(&mut self, window: CallWindow, options: CallOptions) -> CallHandle {
        let (lunch_begin, lunch_end) = match (options.lunch_begin, options.lunch_end) {
            (Some(begin), Some(end)) => (Some(begin), Some(end)),
            _ => (None, None),
        };

        let call = Element::new("Call")
            .with_attr("Date", window.date)
            .with_attr("TimeBeg", window.time_begin)
            .with_attr("TimeEnd", window.time_end)
            .with_opt_attr(
                DispatchNumber::FIELD,
                options.dispatch_number.as_ref().map(DispatchNumber::as_str),
            )
            .with_opt_attr("SendCityCode", options.sender_city_id)
            .with_opt_attr(
                "SendPhone",
                options.sender_phone.as_ref().map(RawPhoneNumber::raw),
            )
            .with_opt_attr("SenderName", options.sender_name)
            .with_opt_attr("Weight", options.weight)
            .with_opt_attr("Comment", options.comment)
            .with_attr("IgnoreTime", options.ignore_time)
            .with_opt_attr("LunchBeg", lunch_begin)
            .with_opt_attr("LunchEnd", lunch_end);

        CallHandle {
            owner: self.id,
            index: self.root.push_child(call),
        }
    }

    pub fn add_address(
        &mut self,
        call: CallHandle,
        address: CourierAddress,
    ) -> Result<(), ValidationError> {
        let element = Element::new("Address")
            .with_attr("Street", address.street)
            .with_attr("House", address.house)
            .with_opt_attr("Flat", address.flat);

        let unknown = ValidationError::UnknownHandle {
            kind: "call",
            index: call.index,
        };
        if call.owner != self.id {
            return Err(unknown);
        }
        self.root
            .child_mut(call.index)
            .ok_or(unknown)?
            .push_child(element);
        Ok(())
    }

    /// Finalize the document. `CallCount` reflects the calls actually added.
    pub fn into_element(self) -> Element {
        let count = self.call_count();
        let mut root = self.root;
        root.set_attr("CallCount", count);
        root
    }
}
