//! Static service catalog and operator branding.
//!
//! The backend may publish its own service list; entries it shares with the
//! local catalog are replaced by the local definition so validation rules
//! always come from here.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::dto::ServiceDto;
use crate::models::{Operator, ServiceType};

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDefinition {
    pub id: ServiceType,
    pub name: &'static str,
    pub icon: &'static str,
    pub identifier_label: &'static str,
    pub identifier_placeholder: &'static str,
    pub identifier_hint: &'static str,
    pub identifier_pattern: &'static str,
    pub case_insensitive: bool,
    pub amount_label: &'static str,
    pub plan_required: bool,
}

pub const SERVICE_CATALOG: [ServiceDefinition; 4] = [
    ServiceDefinition {
        id: ServiceType::Mobile,
        name: "Mobile Recharge",
        icon: "📱",
        identifier_label: "Mobile Number",
        identifier_placeholder: "e.g. 9876543210",
        identifier_hint: "Enter the 10-digit prepaid mobile number you want to recharge.",
        identifier_pattern: r"^[6-9]\d{9}$",
        case_insensitive: false,
        amount_label: "Plan amount",
        plan_required: true,
    },
    ServiceDefinition {
        id: ServiceType::Dth,
        name: "DTH Recharge",
        icon: "📡",
        identifier_label: "Subscriber ID",
        identifier_placeholder: "e.g. 1234567890",
        identifier_hint: "Provide the numeric subscriber ID shared by your DTH provider.",
        identifier_pattern: r"^\d{6,12}$",
        case_insensitive: false,
        amount_label: "Recharge amount",
        plan_required: false,
    },
    ServiceDefinition {
        id: ServiceType::Bill,
        name: "Bill Payments",
        icon: "🧾",
        identifier_label: "Account / Consumer Number",
        identifier_placeholder: "e.g. EB12345",
        identifier_hint: "Enter the consumer/account number exactly as it appears on your bill.",
        identifier_pattern: r"^[A-Z0-9]{6,18}$",
        case_insensitive: true,
        amount_label: "Bill amount",
        plan_required: false,
    },
    ServiceDefinition {
        id: ServiceType::Data,
        name: "Data Packs",
        icon: "📶",
        identifier_label: "Mobile Number",
        identifier_placeholder: "e.g. 9876543210",
        identifier_hint: "Recharge the prepaid number you want to boost with data.",
        identifier_pattern: r"^[6-9]\d{9}$",
        case_insensitive: false,
        amount_label: "Data pack amount",
        plan_required: true,
    },
];

static PATTERNS: LazyLock<HashMap<ServiceType, Regex>> = LazyLock::new(|| {
    SERVICE_CATALOG
        .iter()
        .filter_map(|definition| {
            RegexBuilder::new(definition.identifier_pattern)
                .case_insensitive(definition.case_insensitive)
                .build()
                .map_err(|e| tracing::error!(service = definition.id.as_str(), "bad identifier pattern: {e}"))
                .ok()
                .map(|regex| (definition.id, regex))
        })
        .collect()
});

pub fn default_service() -> &'static ServiceDefinition {
    &SERVICE_CATALOG[0]
}

pub fn service_definition(service_type: ServiceType) -> &'static ServiceDefinition {
    SERVICE_CATALOG
        .iter()
        .find(|definition| definition.id == service_type)
        .unwrap_or_else(default_service)
}

impl ServiceDefinition {
    /// Whether the trimmed identifier satisfies this service's pattern.
    /// Empty input never validates.
    pub fn validates(&self, identifier: &str) -> bool {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return false;
        }
        PATTERNS
            .get(&self.id)
            .is_some_and(|regex| regex.is_match(trimmed))
    }
}

/// Replace server entries with the local definition for the same id.
/// Unknown ids carry no validation rule and are dropped. Returns the local
/// catalog when nothing usable came back.
pub fn merge_server_services(server: &[ServiceDto]) -> Vec<ServiceDefinition> {
    let merged: Vec<ServiceDefinition> = server
        .iter()
        .filter_map(|dto| match ServiceType::from_str(&dto.id) {
            Some(service_type) => Some(service_definition(service_type).clone()),
            None => {
                tracing::warn!(id = %dto.id, "Skipping service unknown to the client catalog");
                None
            }
        })
        .collect();

    if merged.is_empty() {
        SERVICE_CATALOG.to_vec()
    } else {
        merged
    }
}

// ---------------------------------------------------------------------------
// Operator branding
// ---------------------------------------------------------------------------

struct OperatorMeta {
    code: &'static str,
    name: &'static str,
    logo: &'static str,
}

const OPERATOR_META: &[OperatorMeta] = &[
    OperatorMeta {
        code: "AIR",
        name: "Airtel",
        logo: "https://www.logo.wine/a/logo/Airtel_India/Airtel_India-Logo.wine.svg",
    },
    OperatorMeta {
        code: "JIO",
        name: "Jio",
        logo: "https://www.logo.wine/a/logo/Jio/Jio-Logo.wine.svg",
    },
    OperatorMeta {
        code: "VI",
        name: "Vi",
        logo: "https://pnghdpro.com/wp-content/themes/pnghdpro/download/social-media-and-brands/vi-vodafone-idea-app-icon.png",
    },
    OperatorMeta {
        code: "BSN",
        name: "BSNL",
        logo: "https://www.logo.wine/a/logo/Bharat_Sanchar_Nigam_Limited/Bharat_Sanchar_Nigam_Limited-Logo.wine.svg",
    },
    OperatorMeta {
        code: "TPD",
        name: "Tata Play",
        logo: "https://upload.wikimedia.org/wikipedia/commons/thumb/2/29/Tata_Play_2022_logo.svg/2560px-Tata_Play_2022_logo.svg.png",
    },
    OperatorMeta {
        code: "DST",
        name: "Dish TV",
        logo: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcS4C-NUmWTrbMaFHcHH2Gw5UCEP1Q87m-mDbg&s",
    },
    OperatorMeta {
        code: "SND",
        name: "Sun Direct",
        logo: "https://upload.wikimedia.org/wikipedia/commons/f/f2/SD-HD-Logo.svg",
    },
    OperatorMeta {
        code: "BES",
        name: "BESCOM Electricity",
        logo: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSCEC9zwlJKypLXgaI619UnlqGXY2H7uxDnyQ&s",
    },
    OperatorMeta {
        code: "BWSSB",
        name: "Bangalore Water Board",
        logo: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTn_2e8i26pGSRq1HFYWeFfd92SDPLHyz1RHw&s",
    },
    OperatorMeta {
        code: "ACTF",
        name: "ACT Fibernet",
        logo: "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQu5PMHu1uP0cpygIq7oEUyoZ3e_h6qlyYCug&s",
    },
    OperatorMeta {
        code: "JIOD",
        name: "Jio Data Booster",
        logo: "https://www.logo.wine/a/logo/Jio/Jio-Logo.wine.svg",
    },
    OperatorMeta {
        code: "AIRD",
        name: "Airtel Data Booster",
        logo: "https://www.logo.wine/a/logo/Airtel_India/Airtel_India-Logo.wine.svg",
    },
];

/// Display names the backend has used that differ from the branding table.
const NAME_ALIASES: &[(&str, &str)] = &[
    ("AIRTEL DATA BOOSTER", "AIRD"),
    ("AIRTEL", "AIR"),
    ("RELIANCE JIO", "JIO"),
    ("JIO DATA BOOSTER", "JIOD"),
    ("VODAFONE IDEA", "VI"),
    ("TATA PLAY", "TPD"),
    ("TATA PLAY DTH", "TPD"),
    ("TATA SKY", "TPD"),
    ("DISH TV", "DST"),
    ("SUN DIRECT", "SND"),
    ("BESCOM ELECTRICITY", "BES"),
    ("BESCOM", "BES"),
    ("BANGALORE WATER BOARD", "BWSSB"),
    ("BWSSB", "BWSSB"),
    ("ACT FIBERNET", "ACTF"),
];

const DEFAULT_LOGO: &str =
    "https://images.unsplash.com/photo-1504384308090-c894fdcc538d?auto=format&fit=crop&w=512&q=80";

fn service_fallback_logo(service_type: ServiceType) -> &'static str {
    match service_type {
        ServiceType::Mobile => "https://images.unsplash.com/photo-1485217988980-11786ced9454?auto=format&fit=crop&w=512&q=80",
        ServiceType::Dth => "https://images.unsplash.com/photo-1587825140708-dfaf72ae4b04?auto=format&fit=crop&w=512&q=80",
        ServiceType::Bill => "https://images.unsplash.com/photo-1589739905946-5eeaf957068d?auto=format&fit=crop&w=512&q=80",
        ServiceType::Data => "https://images.unsplash.com/photo-1516245834210-c4c142787335?auto=format&fit=crop&w=512&q=80",
    }
}

fn meta_by_code(code: &str) -> Option<&'static OperatorMeta> {
    let code = code.trim().to_ascii_uppercase();
    OPERATOR_META.iter().find(|meta| meta.code == code)
}

fn code_from_name(name: &str) -> Option<&'static str> {
    let normalized = name.trim().to_uppercase();
    if normalized.is_empty() {
        return None;
    }
    NAME_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, code)| *code)
        .or_else(|| {
            OPERATOR_META
                .iter()
                .find(|meta| meta.name.to_uppercase() == normalized)
                .map(|meta| meta.code)
        })
}

/// Resolve a logo: known code, then known name, then the server logo, then
/// a per-service image.
pub fn operator_logo(operator: &Operator, service_type: Option<ServiceType>) -> String {
    if let Some(meta) = meta_by_code(&operator.code) {
        return meta.logo.to_string();
    }
    if let Some(meta) = code_from_name(&operator.name).and_then(meta_by_code) {
        return meta.logo.to_string();
    }
    if let Some(logo) = operator.logo.as_ref().filter(|logo| !logo.trim().is_empty()) {
        return logo.clone();
    }
    service_type
        .or(operator.service_type)
        .map(service_fallback_logo)
        .unwrap_or(DEFAULT_LOGO)
        .to_string()
}

/// Operators featured on the landing page, as `(name, logo)`.
pub fn landing_operators() -> Vec<(&'static str, &'static str)> {
    ["AIR", "JIO", "VI", "BSN", "TPD", "DST"]
        .into_iter()
        .filter_map(meta_by_code)
        .map(|meta| (meta.name, meta.logo))
        .collect()
}
