use std::fmt;

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// CDEK integration account identifier (`Account`).
///
/// Invariant: non-empty after trimming.
pub struct Account(String);

impl Account {
    /// Attribute name used by CDEK documents (`Account`).
    pub const FIELD: &'static str = "Account";

    /// Create a validated [`Account`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated account id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// Secure password issued by CDEK for the integration account.
///
/// Invariant: must not be empty (whitespace is preserved and allowed). The value is
/// redacted from `Debug` output.
pub struct SecurePassword(String);

impl SecurePassword {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "secure_password";

    /// Create a validated [`SecurePassword`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecurePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecurePassword([REDACTED])")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Client-side order (or document) number (`Number`).
///
/// Invariant: non-empty after trimming.
pub struct OrderNumber(String);

impl OrderNumber {
    /// Attribute name used by CDEK documents (`Number`).
    pub const FIELD: &'static str = "Number";

    /// Create a validated [`OrderNumber`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Transfer-acceptance act number, used to address a batch of orders.
///
/// Invariant: non-empty after trimming.
pub struct ActNumber(String);

impl ActNumber {
    /// Attribute name used by CDEK documents (`Number`).
    pub const FIELD: &'static str = "Number";

    /// Create a validated [`ActNumber`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated act number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// CDEK-assigned order identifier (`DispatchNumber`).
///
/// Invariant: non-empty after trimming.
pub struct DispatchNumber(String);

impl DispatchNumber {
    /// Attribute name used by CDEK documents (`DispatchNumber`).
    pub const FIELD: &'static str = "DispatchNumber";

    /// Create a validated [`DispatchNumber`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated dispatch number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Full name of the order recipient (`RecipientName`).
///
/// Invariant: non-empty after trimming.
pub struct RecipientName(String);

impl RecipientName {
    /// Attribute name used by CDEK documents (`RecipientName`).
    pub const FIELD: &'static str = "RecipientName";

    /// Create a validated [`RecipientName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Pickup point code (`PvzCode`).
///
/// Invariant: non-empty after trimming.
pub struct PvzCode(String);

impl PvzCode {
    /// Attribute name used by CDEK documents (`PvzCode`).
    pub const FIELD: &'static str = "PvzCode";

    /// Create a validated [`PvzCode`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated phone number as sent to CDEK (`Phone`, `SendPhone`).
///
/// Invariant: non-empty after trimming. This type does not normalize; if you want E.164
/// normalization, parse into [`PhoneNumber`] and convert it into [`RawPhoneNumber`].
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// Attribute name used by CDEK delivery orders (`Phone`).
    pub const FIELD: &'static str = "Phone";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to CDEK.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Attribute name used by CDEK delivery orders (`Phone`).
    pub const FIELD: &'static str = "Phone";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Tariff code from the CDEK tariff catalogue (`TariffTypeCode`, `tariffId`).
pub struct TariffCode(u32);

impl TariffCode {
    /// Attribute name used by CDEK delivery orders (`TariffTypeCode`).
    pub const FIELD: &'static str = "TariffTypeCode";

    /// Wrap a tariff code (no catalogue lookup is performed).
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying code.
    pub fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for TariffCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
