//! Display formatting shared by every page.

use chrono::{DateTime, Utc};

use crate::catalog::service_definition;
use crate::models::{ServiceType, TxStatus};

pub const EMPTY: &str = "—";

/// Format rupees the way en-IN does: `₹1,23,456`, no fraction digits.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0".to_string();
    }
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}₹{}", group_indian(&digits))
}

/// Last three digits, then groups of two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}

/// e.g. `19 Oct 2026, 10:30 am` (UTC).
pub fn format_date_time(value: Option<DateTime<Utc>>) -> String {
    match value {
        Some(dt) => dt.format("%d %b %Y, %I:%M %P").to_string(),
        None => EMPTY.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMeta {
    pub label: &'static str,
    pub tone: &'static str,
}

pub fn status_meta(status: Option<TxStatus>) -> StatusMeta {
    match status {
        Some(TxStatus::Success) => StatusMeta { label: "Success", tone: "success" },
        Some(TxStatus::Failed) => StatusMeta { label: "Failed", tone: "failed" },
        Some(TxStatus::Pending) => StatusMeta { label: "Pending", tone: "pending" },
        None => StatusMeta { label: "Unknown", tone: "default" },
    }
}

/// `98xxxx3210`
pub fn mask_mobile_number(value: Option<&str>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return EMPTY.to_string();
    };
    let chars: Vec<char> = value.chars().collect();
    let head: String = chars.iter().take(2).collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("{head}xxxx{tail}")
}

/// Mobile-style services use the mobile mask; anything else keeps the last
/// four characters visible.
pub fn mask_identifier(value: Option<&str>, service_type: Option<ServiceType>) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return EMPTY.to_string();
    };
    if service_type.is_some_and(|s| s.is_mobile_number()) {
        return mask_mobile_number(Some(value));
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return value.to_string();
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{visible}", "*".repeat(chars.len() - 4))
}

/// `(name, icon)` for a service, with a neutral fallback.
pub fn service_display(service_type: Option<ServiceType>) -> (&'static str, &'static str) {
    match service_type {
        Some(service_type) => {
            let definition = service_definition(service_type);
            (definition.name, definition.icon)
        }
        None => ("Unknown", "✨"),
    }
}

/// Up to two uppercase initials from a display name.
pub fn initials(name: &str) -> Option<String> {
    let initials: String = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();
    (!initials.is_empty()).then_some(initials)
}

pub fn first_name(name: &str) -> Option<&str> {
    name.split_whitespace().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn inr_uses_indian_grouping() {
        assert_eq!(format_inr(199.0), "₹199");
        assert_eq!(format_inr(1999.0), "₹1,999");
        assert_eq!(format_inr(123456.0), "₹1,23,456");
        assert_eq!(format_inr(12345678.0), "₹1,23,45,678");
        assert_eq!(format_inr(0.0), "₹0");
    }

    #[test]
    fn inr_rounds_away_fraction() {
        assert_eq!(format_inr(199.5), "₹200");
        assert_eq!(format_inr(-42.2), "-₹42");
    }

    #[test]
    fn date_time_formats_or_dashes() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 19, 10, 30, 0).unwrap();
        assert_eq!(format_date_time(Some(dt)), "19 Oct 2026, 10:30 am");
        assert_eq!(format_date_time(None), "—");
    }

    #[test]
    fn masks_mobile_and_other_identifiers() {
        assert_eq!(mask_mobile_number(Some("9876543210")), "98xxxx3210");
        assert_eq!(mask_identifier(Some("9876543210"), Some(ServiceType::Data)), "98xxxx3210");
        assert_eq!(mask_identifier(Some("EB1234567"), Some(ServiceType::Bill)), "*****4567");
        assert_eq!(mask_identifier(Some("1234"), Some(ServiceType::Dth)), "1234");
        assert_eq!(mask_identifier(None, None), "—");
    }

    #[test]
    fn status_labels() {
        assert_eq!(status_meta(Some(TxStatus::Failed)).tone, "failed");
        assert_eq!(status_meta(None).label, "Unknown");
    }

    #[test]
    fn initials_and_first_name() {
        assert_eq!(initials("asha rao kumar").as_deref(), Some("AR"));
        assert_eq!(initials("   "), None);
        assert_eq!(first_name("Asha Rao"), Some("Asha"));
    }
}
