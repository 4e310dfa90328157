//! Entity key prechecks.
//!
//! These run before any network call. A key that fails here becomes a
//! `MalformedInput` outcome with zero requests made.

use crate::error::CoreError;

/// Longest company name accepted by the precheck.
const MAX_COMPANY_LEN: usize = 120;
/// Longest vessel name accepted by the search precheck.
const MAX_NAME_LEN: usize = 80;

/// Normalizes an IMO number.
///
/// Surrounding whitespace and an optional `IMO` prefix are stripped; the
/// remainder must be exactly seven ASCII digits. The check digit is not
/// verified.
pub fn normalize_imo(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("IMO")
        .or_else(|| trimmed.strip_prefix("imo"))
        .unwrap_or(trimmed)
        .trim_start_matches([' ', ':', '-']);

    if digits.len() == 7 && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(digits.to_string())
    } else {
        Err(CoreError::InvalidImo(raw.to_string()))
    }
}

/// Normalizes a company name or identifier.
pub fn normalize_company(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.chars().count() > MAX_COMPANY_LEN
        || trimmed.chars().any(char::is_control)
    {
        return Err(CoreError::InvalidCompany(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Normalizes a vessel name used for a name search.
pub fn normalize_vessel_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.chars().count() > MAX_NAME_LEN
        || trimmed.chars().any(char::is_control)
    {
        return Err(CoreError::InvalidName(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Splits key-file contents into keys.
///
/// One key per line; blank lines and lines starting with `#` are skipped.
pub fn parse_key_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_imo_plain() {
        assert_eq!(normalize_imo("9074729").unwrap(), "9074729");
        assert_eq!(normalize_imo("  9074729\n").unwrap(), "9074729");
    }

    #[test]
    fn test_normalize_imo_prefixed() {
        assert_eq!(normalize_imo("IMO 9321483").unwrap(), "9321483");
        assert_eq!(normalize_imo("IMO9321483").unwrap(), "9321483");
        assert_eq!(normalize_imo("imo: 9321483").unwrap(), "9321483");
    }

    #[test]
    fn test_normalize_imo_rejects_bad_shapes() {
        for bad in ["", "123456", "12345678", "90747a9", "IMO", "9 074729"] {
            assert!(normalize_imo(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_normalize_company() {
        assert_eq!(normalize_company("  MAERSK A/S ").unwrap(), "MAERSK A/S");
        assert!(normalize_company("   ").is_err());
        assert!(normalize_company("bad\u{7}name").is_err());
        assert!(normalize_company(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_normalize_vessel_name() {
        assert_eq!(normalize_vessel_name(" EMMA MAERSK ").unwrap(), "EMMA MAERSK");
        assert!(normalize_vessel_name("").is_err());
        assert!(normalize_vessel_name(&"A".repeat(81)).is_err());
    }

    #[test]
    fn test_parse_key_list_skips_comments_and_blanks() {
        let text = "# fleet\n9074729\n\n  9321483  \n# done\n";
        assert_eq!(parse_key_list(text), vec!["9074729", "9321483"]);
    }
}
