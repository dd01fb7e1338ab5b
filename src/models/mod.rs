//! Data models for MedTrack

pub mod certificate;
pub mod department;
pub mod enums;
pub mod equipment;
pub mod maintenance;
pub mod page;
pub mod service_order;
pub mod supplier;
pub mod technician;
pub mod user;

// Re-export commonly used types
pub use certificate::{Certificate, CertificateView};
pub use department::Department;
pub use equipment::{Equipment, EquipmentShort};
pub use maintenance::{Assignee, MaintenanceRecord};
pub use page::PageQuery;
pub use service_order::ServiceOrder;
pub use supplier::Supplier;
pub use technician::{ExternalCompany, ExternalTechnician, Technician};
pub use user::{User, UserClaims};
