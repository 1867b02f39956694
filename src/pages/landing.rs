use leptos::prelude::*;
use leptos_router::components::A;

use crate::catalog::{landing_operators, SERVICE_CATALOG};
use crate::models::ServiceType;

fn service_blurb(service: ServiceType) -> &'static str {
    match service {
        ServiceType::Mobile => "Instant prepaid recharges for all major operators with exclusive plans.",
        ServiceType::Dth => "Keep your entertainment alive with seamless DTH top-ups.",
        ServiceType::Bill => "Pay electricity, water, broadband bills in one secure platform.",
        ServiceType::Data => "Boost your mobile data with add-on packs from top providers.",
    }
}

#[component]
pub fn LandingPage() -> impl IntoView {
    let year = chrono::Utc::now().format("%Y").to_string();

    view! {
        <div class="landing">
            <section class="landing__hero">
                <div class="landing__hero-content">
                    <div class="landing__logo">"⚡ RechargeX"</div>
                    <h1 class="landing__headline">"One Platform for All Your Recharge & Bill Payments"</h1>
                    <p class="landing__subtext">"Fast, secure and seamless recharges across operators"</p>
                    <div class="landing__cta-group">
                        <A href="/login" attr:class="btn-landing btn-landing-primary">"Login"</A>
                        <A href="/signup" attr:class="btn-landing btn-landing-outline">"Sign Up"</A>
                    </div>
                </div>
            </section>

            <section class="landing__services">
                <div class="landing__section-header">
                    <h2 class="landing__section-title">"Our Services"</h2>
                    <p class="landing__section-subtitle">
                        "Everything you need for recharges and bill payments in one place"
                    </p>
                </div>
                <div class="landing__services-grid">
                    {SERVICE_CATALOG
                        .iter()
                        .map(|service| view! {
                            <div class="service-card">
                                <div class="service-card__icon">{service.icon}</div>
                                <h3 class="service-card__title">{service.name}</h3>
                                <p class="service-card__description">{service_blurb(service.id)}</p>
                            </div>
                        })
                        .collect_view()}
                </div>
            </section>

            <section class="landing__operators">
                <div class="landing__section-header">
                    <h2 class="landing__section-title">"Supported Operators"</h2>
                    <p class="landing__section-subtitle">
                        "Trusted by millions across India's leading service providers"
                    </p>
                </div>
                <div class="landing__operators-grid">
                    {landing_operators()
                        .into_iter()
                        .map(|(name, logo)| view! {
                            <div class="operator-tile">
                                <img src=logo alt=name class="operator-tile__logo" loading="lazy"/>
                            </div>
                        })
                        .collect_view()}
                </div>
            </section>

            <footer class="landing__footer">
                <div class="landing__footer-copy">{format!("© {year} RechargeX. All rights reserved.")}</div>
            </footer>
        </div>
    }
}
