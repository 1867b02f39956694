//! Dashboard presentation derived from the backend summary.

use crate::format::{first_name, format_date_time, format_inr, service_display, EMPTY};
use crate::models::{ServiceBreakdown, Summary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub meta: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChip {
    pub label: String,
    pub tone: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCard {
    pub icon: &'static str,
    pub name: &'static str,
    pub transactions: u64,
    pub amount: String,
    pub meta: String,
}

pub struct QuickAction {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub cta: &'static str,
    pub href: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 3] = [
    QuickAction {
        icon: "📱",
        title: "Mobile Recharge",
        description: "Browse curated plans and recharge instantly.",
        cta: "Recharge now",
        href: "/recharge",
    },
    QuickAction {
        icon: "🕒",
        title: "View History",
        description: "Analyse every recharge with detailed breakdowns.",
        cta: "Review history",
        href: "/history",
    },
    QuickAction {
        icon: "📊",
        title: "Recharge Status",
        description: "Track the live status of recent transactions.",
        cta: "Track status",
        href: "/history",
    },
];

/// `80` or `66.7`, as the backend reported it.
fn rate(value: f64) -> String {
    if value.is_finite() {
        format!("{value}")
    } else {
        "0".to_string()
    }
}

/// The three headline cards. Without a summary they show placeholders.
pub fn stat_cards(summary: Option<&Summary>) -> [StatCard; 3] {
    let Some(summary) = summary else {
        return [
            StatCard {
                label: "Recharges Done",
                value: EMPTY.to_string(),
                meta: "Start your first recharge to unlock analytics.".to_string(),
            },
            StatCard {
                label: "Total Amount Spent",
                value: format_inr(0.0),
                meta: "Track every rupee across operators.".to_string(),
            },
            StatCard {
                label: "Last Recharge",
                value: "No activity yet".to_string(),
                meta: "Complete a recharge to view details.".to_string(),
            },
        ];
    };

    let status = &summary.status;
    let (last_value, last_meta) = match &summary.last_recharge {
        Some(last) => (
            format!(
                "{} • {}",
                last.operator.as_ref().map(|o| o.name.as_str()).unwrap_or_default(),
                format_inr(last.amount)
            ),
            format_date_time(last.created_at),
        ),
        None => (
            "No activity yet".to_string(),
            "Complete a recharge to view details.".to_string(),
        ),
    };

    [
        StatCard {
            label: "Recharges Done",
            value: summary.total_recharges.to_string(),
            meta: format!(
                "{} success • {} pending • {} failed",
                status.success, status.pending, status.failed
            ),
        },
        StatCard {
            label: "Total Amount Spent",
            value: format_inr(summary.total_amount),
            meta: format!("Success rate {}%", rate(summary.success_rate)),
        },
        StatCard {
            label: "Last Recharge",
            value: last_value,
            meta: last_meta,
        },
    ]
}

pub fn status_chips(summary: &Summary) -> [StatusChip; 4] {
    let status = &summary.status;
    [
        StatusChip {
            label: format!("Success · {}", status.success),
            tone: "success",
        },
        StatusChip {
            label: format!("Pending · {}", status.pending),
            tone: "warning",
        },
        StatusChip {
            label: format!("Failed · {}", status.failed),
            tone: "danger",
        },
        StatusChip {
            label: format!("Success rate · {}%", rate(summary.success_rate)),
            tone: "default",
        },
    ]
}

/// Whole-percent share of successful transactions; 0 with no transactions.
pub fn service_success_rate(service: &ServiceBreakdown) -> u64 {
    if service.total_transactions == 0 {
        return 0;
    }
    (service.status.success as f64 / service.total_transactions as f64 * 100.0).round() as u64
}

pub fn service_cards(summary: &Summary) -> Vec<ServiceCard> {
    summary
        .services
        .iter()
        .map(|service| {
            let (name, icon) = service_display(Some(service.id));
            ServiceCard {
                icon,
                name,
                transactions: service.total_transactions,
                amount: format_inr(service.total_amount),
                meta: format!(
                    "{} success • {} failed • {} pending · Success rate {}%",
                    service.status.success,
                    service.status.failed,
                    service.status.pending,
                    service_success_rate(service)
                ),
            }
        })
        .collect()
}

pub fn greeting_name(name: Option<&str>) -> &str {
    name.and_then(first_name).unwrap_or("Explorer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OperatorRef, Recharge, ServiceType, StatusBreakdown, TxStatus};

    fn summary() -> Summary {
        Summary {
            total_recharges: 12,
            total_amount: 125_000.0,
            success_rate: 66.67,
            status: StatusBreakdown {
                success: 8,
                pending: 1,
                failed: 3,
            },
            last_recharge: Some(Recharge {
                transaction_id: "TX12".into(),
                service_type: ServiceType::Mobile,
                identifier: None,
                mobile_number: None,
                operator: Some(OperatorRef {
                    name: "Airtel".into(),
                    code: "AIRTEL".into(),
                }),
                plan: None,
                amount: 299.0,
                payment_method: None,
                status: TxStatus::Success,
                failure_reason: None,
                created_at: None,
                resolved_at: None,
            }),
            services: vec![ServiceBreakdown {
                id: ServiceType::Dth,
                total_transactions: 3,
                total_amount: 900.0,
                status: StatusBreakdown {
                    success: 2,
                    pending: 0,
                    failed: 1,
                },
            }],
            recent_recharges: Vec::new(),
        }
    }

    #[test]
    fn placeholders_without_summary() {
        let cards = stat_cards(None);
        assert_eq!(cards[0].value, "—");
        assert_eq!(cards[1].value, "₹0");
        assert_eq!(cards[2].value, "No activity yet");
    }

    #[test]
    fn cards_reflect_counters() {
        let cards = stat_cards(Some(&summary()));
        assert_eq!(cards[0].value, "12");
        assert_eq!(cards[0].meta, "8 success • 1 pending • 3 failed");
        assert_eq!(cards[1].value, "₹1,25,000");
        assert_eq!(cards[1].meta, "Success rate 66.67%");
        assert_eq!(cards[2].value, "Airtel • ₹299");
        assert_eq!(cards[2].meta, "—");
    }

    #[test]
    fn whole_rates_print_without_fraction() {
        let mut summary = summary();
        summary.success_rate = 80.0;
        assert_eq!(status_chips(&summary)[3].label, "Success rate · 80%");
    }

    #[test]
    fn service_rate_rounds_and_handles_zero() {
        let mut service = summary().services.remove(0);
        assert_eq!(service_success_rate(&service), 67);

        service.total_transactions = 0;
        assert_eq!(service_success_rate(&service), 0);
    }

    #[test]
    fn service_cards_use_catalog_names() {
        let cards = service_cards(&summary());
        assert_eq!(cards[0].name, "DTH Recharge");
        assert_eq!(cards[0].amount, "₹900");
        assert!(cards[0].meta.ends_with("Success rate 67%"));
    }

    #[test]
    fn greeting_falls_back_to_explorer() {
        assert_eq!(greeting_name(Some("Asha Rao")), "Asha");
        assert_eq!(greeting_name(Some("   ")), "Explorer");
        assert_eq!(greeting_name(None), "Explorer");
    }
}
