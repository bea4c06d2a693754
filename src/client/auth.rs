use chrono::NaiveDate;

use crate::domain::{Account, SecurePassword, ValidationError};
use crate::signature::compute_signature;

/// Integration account and secure password issued by CDEK.
///
/// The password never appears in `Debug` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    account: Account,
    password: SecurePassword,
}

impl Credentials {
    pub fn new(account: Account, password: SecurePassword) -> Self {
        Self { account, password }
    }

    /// Validate both parts and build [`Credentials`].
    pub fn from_parts(
        account: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::new(Account::new(account)?, SecurePassword::new(password)?))
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// `Secure` value for a request dated `date`.
    pub fn sign(&self, date: NaiveDate) -> String {
        compute_signature(self.password.as_str(), date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_validates_inputs() {
        assert!(Credentials::from_parts("  ", "secret").is_err());
        assert!(Credentials::from_parts("account", "").is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let credentials = Credentials::from_parts("account", "top-secret").unwrap();
        let debug = format!("{credentials:?}");
        assert!(debug.contains("account"));
        assert!(!debug.contains("top-secret"));
    }

    #[test]
    fn sign_uses_password_and_date() {
        let credentials = Credentials::from_parts("account", "secret").unwrap();
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(credentials.sign(date), "e266bea6c4e82b6539b9a5f0ad74cce2");
    }
}
