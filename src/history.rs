//! Recharge history filters and CSV export.

use chrono::NaiveDate;

use crate::format::format_date_time;
use crate::models::{Recharge, ServiceType, TxStatus};

pub const PAGE_SIZE: u32 = 10;

/// Query parameters for one history page. `None` means "all".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryFilters {
    pub status: Option<TxStatus>,
    pub service_type: Option<ServiceType>,
    pub identifier: String,
    pub mobile_number: String,
    pub transaction_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: u32,
}

impl Default for HistoryFilters {
    fn default() -> Self {
        Self {
            status: None,
            service_type: None,
            identifier: String::new(),
            mobile_number: String::new(),
            transaction_id: String::new(),
            start_date: None,
            end_date: None,
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    Status(Option<TxStatus>),
    ServiceType(Option<ServiceType>),
    Identifier(String),
    MobileNumber(String),
    TransactionId(String),
    StartDate(Option<NaiveDate>),
    EndDate(Option<NaiveDate>),
    Page(u32),
}

impl HistoryFilters {
    /// Apply one change. Anything but a page change restarts at page 1.
    pub fn apply(&mut self, change: FilterChange) {
        let mut page = 1;
        match change {
            FilterChange::Status(status) => self.status = status,
            FilterChange::ServiceType(service_type) => self.service_type = service_type,
            FilterChange::Identifier(value) => self.identifier = value,
            FilterChange::MobileNumber(value) => self.mobile_number = value,
            FilterChange::TransactionId(value) => self.transaction_id = value,
            FilterChange::StartDate(date) => self.start_date = date,
            FilterChange::EndDate(date) => self.end_date = date,
            FilterChange::Page(next) => page = next.max(1),
        }
        self.page = page;
    }

    pub fn with(mut self, change: FilterChange) -> Self {
        self.apply(change);
        self
    }

    /// Query pairs for `GET /recharge/history`; blank filters are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", self.page.to_string()), ("limit", PAGE_SIZE.to_string())];

        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(service_type) = self.service_type {
            query.push(("serviceType", service_type.as_str().to_string()));
        }
        let text_filters = [
            ("identifier", self.identifier.trim()),
            ("mobileNumber", self.mobile_number.trim()),
            ("transactionId", self.transaction_id.trim()),
        ];
        for (key, value) in text_filters {
            if !value.is_empty() {
                query.push((key, value.to_string()));
            }
        }
        if let Some(date) = self.start_date {
            query.push(("startDate", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.end_date {
            query.push(("endDate", date.format("%Y-%m-%d").to_string()));
        }

        query
    }
}

pub fn parse_status_filter(value: &str) -> Option<TxStatus> {
    TxStatus::from_str(value)
}

pub fn parse_service_filter(value: &str) -> Option<ServiceType> {
    ServiceType::from_str(value)
}

pub fn parse_date_filter(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

const CSV_HEADER: [&str; 11] = [
    "Transaction ID",
    "Service Type",
    "Identifier",
    "Mobile Number",
    "Operator",
    "Plan",
    "Amount",
    "Status",
    "Payment Method",
    "Created At",
    "Resolved At",
];

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_line<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|field| csv_field(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render already-loaded rows as CSV. `None` when there is nothing to export.
pub fn export_csv(rows: &[Recharge]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    let mut lines = vec![csv_line(CSV_HEADER)];
    lines.extend(rows.iter().map(|row| {
        csv_line([
            row.transaction_id.clone(),
            row.service_type.as_str().to_string(),
            row.identifier.clone().unwrap_or_default(),
            row.mobile_number.clone().unwrap_or_default(),
            row.operator.as_ref().map(|o| o.name.clone()).unwrap_or_default(),
            row.plan.as_ref().map(|p| p.name.clone()).unwrap_or_default(),
            row.amount.to_string(),
            row.status.as_str().to_string(),
            row.payment_method.clone().unwrap_or_default(),
            format_date_time(row.created_at),
            format_date_time(row.resolved_at),
        ])
    }));

    Some(lines.join("\n"))
}

pub fn export_file_name(now_millis: i64) -> String {
    format!("recharge-history-{now_millis}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperatorRef;

    fn row(id: &str, operator: &str) -> Recharge {
        Recharge {
            transaction_id: id.into(),
            service_type: ServiceType::Mobile,
            identifier: Some("9876543210".into()),
            mobile_number: None,
            operator: Some(OperatorRef {
                name: operator.into(),
                code: "JIO".into(),
            }),
            plan: None,
            amount: 199.0,
            payment_method: Some("UPI".into()),
            status: TxStatus::Success,
            failure_reason: None,
            created_at: None,
            resolved_at: None,
        }
    }

    #[test]
    fn non_page_change_resets_page() {
        let filters = HistoryFilters::default()
            .with(FilterChange::Page(4))
            .with(FilterChange::Status(Some(TxStatus::Failed)));
        assert_eq!(filters.page, 1);
        assert_eq!(filters.status, Some(TxStatus::Failed));

        let filters = filters
            .with(FilterChange::Page(3))
            .with(FilterChange::Identifier("EB12".into()));
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn page_change_preserves_other_filters() {
        let base = HistoryFilters::default()
            .with(FilterChange::ServiceType(Some(ServiceType::Dth)))
            .with(FilterChange::TransactionId("TX9".into()))
            .with(FilterChange::StartDate(parse_date_filter("2026-10-01")));

        let paged = base.clone().with(FilterChange::Page(2));
        assert_eq!(paged.page, 2);
        assert_eq!(HistoryFilters { page: 1, ..paged }, base);
    }

    #[test]
    fn page_never_drops_below_one() {
        assert_eq!(HistoryFilters::default().with(FilterChange::Page(0)).page, 1);
    }

    #[test]
    fn query_skips_blank_filters_and_trims() {
        let filters = HistoryFilters::default()
            .with(FilterChange::Identifier("  ".into()))
            .with(FilterChange::TransactionId(" TX1 ".into()))
            .with(FilterChange::EndDate(parse_date_filter("2026-10-19")));

        assert_eq!(
            filters.to_query(),
            vec![
                ("page", "1".to_string()),
                ("limit", "10".to_string()),
                ("transactionId", "TX1".to_string()),
                ("endDate", "2026-10-19".to_string()),
            ]
        );
    }

    #[test]
    fn all_option_parses_to_none() {
        assert_eq!(parse_status_filter("ALL"), None);
        assert_eq!(parse_service_filter("ALL"), None);
        assert_eq!(parse_service_filter("BILL"), Some(ServiceType::Bill));
    }

    #[test]
    fn export_is_noop_without_rows() {
        assert_eq!(export_csv(&[]), None);
    }

    #[test]
    fn export_quotes_every_field() {
        let csv = export_csv(&[row("TX1", "Jio \"True5G\"")]).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\"Transaction ID\",\"Service Type\""));
        assert_eq!(
            lines[1],
            "\"TX1\",\"MOBILE\",\"9876543210\",\"\",\"Jio \"\"True5G\"\"\",\"\",\"199\",\"SUCCESS\",\"UPI\",\"—\",\"—\""
        );
    }

    #[test]
    fn export_file_name_carries_timestamp() {
        assert_eq!(export_file_name(42), "recharge-history-42.csv");
    }
}
