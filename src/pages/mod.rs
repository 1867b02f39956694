pub mod auth;
pub mod dashboard;
pub mod history;
pub mod landing;
pub mod not_found;
pub mod profile;
pub mod recharge;
pub mod status;

pub use auth::{LoginPage, SignupPage};
pub use dashboard::DashboardPage;
pub use history::HistoryPage;
pub use landing::LandingPage;
pub use not_found::NotFoundPage;
pub use profile::ProfilePage;
pub use recharge::RechargePage;
pub use status::StatusPage;
