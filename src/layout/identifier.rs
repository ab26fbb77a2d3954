//! Reconciliation between the identifier schemes in circulation.
//!
//! Rack refs show up as `"R18"` (bay files), `"18"` or `18` (slot exports)
//! and `"rack-18"` (selection paths). Every comparison between a clicked id
//! and stored data goes through [`normalize_rack_ref`]; raw strings are
//! never compared directly.

const SELECTION_PREFIX: &str = "rack-";

/// Canonical rack ref: `"R18"`, `"18"`, `"rack-18"` → `"18"`.
///
/// Leading zeros of an all-digit ref are dropped (`"R01"` → `"1"`) so that
/// numeric and zero-padded sources agree.
pub fn normalize_rack_ref(raw: &str) -> String {
    let s = raw.trim();
    let s = s.strip_prefix(SELECTION_PREFIX).unwrap_or(s);
    let s = s
        .strip_prefix('R')
        .or_else(|| s.strip_prefix('r'))
        .unwrap_or(s);

    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        let trimmed = s.trim_start_matches('0');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s.to_string()
    }
}

/// Selection-path form of a rack ref: always `"rack-<normalized>"`.
pub fn to_selection_rack_id(rack_ref: &str) -> String {
    format!("{SELECTION_PREFIX}{}", normalize_rack_ref(rack_ref))
}

/// Normalized rack ref from a selection id, `None` when it is not one.
pub fn parse_selection_rack_id(rack_id: &str) -> Option<String> {
    rack_id
        .trim()
        .strip_prefix(SELECTION_PREFIX)
        .filter(|rest| !rest.is_empty())
        .map(normalize_rack_ref)
}

/// Whether two rack identifiers in any scheme name the same rack.
pub fn same_rack(a: &str, b: &str) -> bool {
    normalize_rack_ref(a) == normalize_rack_ref(b)
}

/// Canonical inventory location key.
///
/// Upper-cases, drops a trailing letter after a digit on `<digit><E|W>…`
/// codes (`3E01A1A` → `3E01A1`), and compresses a two-digit tail with a
/// leading zero (`3W34A03` → `3W34A3`).
pub fn normalize_bin_id(raw: &str) -> String {
    let mut s: Vec<char> = raw.trim().to_uppercase().chars().collect();

    let bay_coded = s.len() >= 2 && s[0].is_ascii_digit() && matches!(s[1], 'E' | 'W');
    if bay_coded && s.len() >= 4 {
        let n = s.len();
        if s[n - 1].is_ascii_uppercase() && s[n - 2].is_ascii_digit() {
            s.pop();
        }
    }

    let n = s.len();
    if n >= 3 && !s[n - 3].is_ascii_digit() && s[n - 2] == '0' && s[n - 1].is_ascii_digit() {
        s.remove(n - 2);
    }

    s.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rack_ref_forms_agree() {
        assert_eq!(normalize_rack_ref("R18"), "18");
        assert_eq!(normalize_rack_ref("18"), "18");
        assert_eq!(normalize_rack_ref("rack-18"), "18");
        assert_eq!(normalize_rack_ref(" R18 "), "18");
        assert_eq!(normalize_rack_ref("r18"), "18");
    }

    #[test]
    fn rack_ref_drops_leading_zeros() {
        assert_eq!(normalize_rack_ref("R01"), "1");
        assert_eq!(normalize_rack_ref("01"), "1");
        assert_eq!(normalize_rack_ref("rack-01"), "1");
        assert_eq!(normalize_rack_ref("0"), "0");
        assert_eq!(normalize_rack_ref("R00"), "0");
    }

    #[test]
    fn rack_ref_non_numeric_kept() {
        assert_eq!(normalize_rack_ref("R3W"), "3W");
        assert_eq!(normalize_rack_ref("MEZZ"), "MEZZ");
    }

    #[test]
    fn rack_ref_is_idempotent() {
        for raw in ["R18", "rack-07", "0", "R3W", "18"] {
            let once = normalize_rack_ref(raw);
            assert_eq!(normalize_rack_ref(&once), once);
        }
    }

    #[test]
    fn selection_id_round_trip() {
        assert_eq!(to_selection_rack_id("R18"), "rack-18");
        assert_eq!(to_selection_rack_id("rack-18"), "rack-18");
        assert_eq!(to_selection_rack_id("18"), "rack-18");
        assert_eq!(parse_selection_rack_id("rack-18").as_deref(), Some("18"));
        assert_eq!(parse_selection_rack_id("rack-R01").as_deref(), Some("1"));
        assert_eq!(parse_selection_rack_id("R18"), None);
        assert_eq!(parse_selection_rack_id("rack-"), None);
    }

    #[test]
    fn same_rack_across_schemes() {
        assert!(same_rack("R18", "rack-18"));
        assert!(same_rack("18", "R018"));
        assert!(!same_rack("R18", "R19"));
    }

    #[test]
    fn bin_ids_normalize() {
        assert_eq!(normalize_bin_id("3E01A1A"), "3E01A1");
        assert_eq!(normalize_bin_id("3W34A03"), "3W34A3");
        assert_eq!(normalize_bin_id(" 3w34a3 "), "3W34A3");
        assert_eq!(normalize_bin_id("3W34A3"), "3W34A3");
        assert_eq!(normalize_bin_id("3W34A10"), "3W34A10");
    }

    #[test]
    fn bin_ids_without_bay_code_keep_trailing_letter() {
        assert_eq!(normalize_bin_id("DOCK1A"), "DOCK1A");
    }

    #[test]
    fn bin_id_is_idempotent() {
        for raw in ["3E01A1A", "3W34A03", "DOCK1A", "3W34A10"] {
            let once = normalize_bin_id(raw);
            assert_eq!(normalize_bin_id(&once), once);
        }
    }
}
