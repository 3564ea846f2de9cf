pub use super::admin::Entity as Admin;
pub use super::bid::Entity as Bid;
pub use super::company::Entity as Company;
pub use super::contract::Entity as Contract;
pub use super::feedback::Entity as Feedback;
pub use super::invoice::Entity as Invoice;
pub use super::payment::Entity as Payment;
pub use super::provider::Entity as Provider;
pub use super::revenue_report::Entity as RevenueReport;
pub use super::shipment::Entity as Shipment;
pub use super::shipment_request::Entity as ShipmentRequest;
pub use super::wasl_user::Entity as WaslUser;
