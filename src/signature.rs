//! Request signing.

use chrono::NaiveDate;

/// `Secure` value for a request dated `date`: lowercase hex MD5 of `"YYYY-MM-DD&secret"`.
///
/// CDEK mandates MD5 here; it authenticates the request, it does not protect the secret.
pub fn compute_signature(secret: &str, date: NaiveDate) -> String {
    let input = format!("{}&{secret}", date.format("%Y-%m-%d"));
    format!("{:x}", md5::compute(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn matches_reference_digests() {
        assert_eq!(
            compute_signature("secret", date(2020, 1, 1)),
            "e266bea6c4e82b6539b9a5f0ad74cce2"
        );
        assert_eq!(
            compute_signature("w24JTCv4MnAcuRTx0oHjHLDtyt3I6IBq", date(2024, 3, 15)),
            "0b02e1287dd6a9d7e7973623f4911e46"
        );
    }

    #[test]
    fn hashes_utf8_bytes() {
        assert_eq!(
            compute_signature("пароль", date(2024, 3, 15)),
            "5b40c05b33774d7ecf844aacfd97c184"
        );
    }

    #[test]
    fn is_deterministic_and_date_sensitive() {
        let first = compute_signature("secret", date(2024, 3, 15));
        assert_eq!(first, compute_signature("secret", date(2024, 3, 15)));
        assert_ne!(first, compute_signature("secret", date(2024, 3, 16)));
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
