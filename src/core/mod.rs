//! Gateway clients, report aggregation, and supporting infrastructure.

pub mod aggregate;
pub mod credentials;
pub mod dashboard;
pub mod gateway;
pub mod http;
pub mod logging;
pub mod models;
pub mod window;

pub use aggregate::{Aggregate, MetricChange, MetricTotals, WindowSummary, aggregate};
pub use credentials::{
    CredentialStore, CredentialSummary, GatewayCredentials, KeyringStore, MemoryStore,
};
pub use dashboard::{DashboardReport, fetch_dashboard};
pub use gateway::{SmsClient, SmsGateway, VoiceClient, VoiceGateway};
pub use models::{CallRecord, ReportRow, RobotOutput};
pub use window::ReportWindow;
