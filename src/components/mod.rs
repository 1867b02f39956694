pub mod functions;
pub mod layout;
pub mod operator_card;
pub mod plan_card;
pub mod recharge_form;
pub mod status_badge;

// Re-export components
pub use layout::ProtectedLayout;
pub use operator_card::OperatorCard;
pub use plan_card::PlanCard;
pub use recharge_form::RechargePanel;
pub use status_badge::StatusBadge;
