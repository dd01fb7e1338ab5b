//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, certificates, departments, equipment, health, maintenance, service_orders, suppliers,
    technicians, users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MedTrack API",
        version = "1.0.0",
        description = "Clinical equipment maintenance REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&BearerAuth),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::refresh,
        auth::logout,
        auth::me,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::get_history,
        equipment::generate_qr_code,
        equipment::by_department,
        equipment::by_status,
        equipment::search_equipment,
        // Maintenance
        maintenance::list_maintenance,
        maintenance::get_maintenance,
        maintenance::create_maintenance,
        maintenance::update_maintenance,
        maintenance::update_status,
        maintenance::delete_maintenance,
        maintenance::by_equipment,
        maintenance::by_technician,
        maintenance::by_period,
        // Service orders
        service_orders::list_orders,
        service_orders::get_order,
        service_orders::create_order,
        service_orders::update_order,
        service_orders::update_status,
        service_orders::rate_order,
        service_orders::delete_order,
        service_orders::by_requester,
        service_orders::by_department,
        service_orders::by_equipment,
        service_orders::by_status,
        // Departments
        departments::list_departments,
        departments::get_department,
        departments::create_department,
        departments::update_department,
        departments::delete_department,
        // Technicians and external providers
        technicians::list_technicians,
        technicians::get_technician,
        technicians::create_technician,
        technicians::update_technician,
        technicians::delete_technician,
        technicians::list_companies,
        technicians::get_company,
        technicians::create_company,
        technicians::update_company,
        technicians::delete_company,
        technicians::list_external,
        technicians::get_external,
        technicians::create_external,
        technicians::update_external,
        technicians::delete_external,
        // Suppliers
        suppliers::list_suppliers,
        suppliers::get_supplier,
        suppliers::create_supplier,
        suppliers::update_supplier,
        suppliers::delete_supplier,
        // Certificates
        certificates::list_certificates,
        certificates::expiring_certificates,
        certificates::get_certificate,
        certificates::create_certificate,
        certificates::update_certificate,
        certificates::delete_certificate,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::LoginRequest,
            crate::models::user::LoginResponse,
            crate::models::user::RefreshResponse,
            crate::api::MessageResponse,
            // Shared
            crate::api::StatusUpdateRequest,
            crate::api::StatusResponse,
            crate::models::enums::EquipmentStatus,
            crate::models::enums::Criticality,
            crate::models::enums::MaintenanceStatus,
            crate::models::enums::MaintenanceType,
            crate::models::enums::Priority,
            crate::models::enums::ServiceOrderStatus,
            crate::models::enums::ServiceType,
            crate::models::enums::Role,
            crate::models::enums::CertificateType,
            crate::models::enums::CertificateStatus,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentShort,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::MaintenanceHistoryEntry,
            crate::models::equipment::QrCodeResponse,
            // Maintenance
            crate::models::maintenance::MaintenanceRecord,
            crate::models::maintenance::MaintenanceDetails,
            crate::models::maintenance::MaintenanceShort,
            crate::models::maintenance::CreateMaintenance,
            crate::models::maintenance::UpdateMaintenance,
            // Service orders
            crate::models::service_order::ServiceOrder,
            crate::models::service_order::ServiceOrderShort,
            crate::models::service_order::ServiceOrderDetails,
            crate::models::service_order::CreateServiceOrder,
            crate::models::service_order::UpdateServiceOrder,
            crate::models::service_order::RatingRequest,
            // Supporting resources
            crate::models::department::Department,
            crate::models::department::CreateDepartment,
            crate::models::department::UpdateDepartment,
            crate::models::technician::Technician,
            crate::models::technician::CreateTechnician,
            crate::models::technician::UpdateTechnician,
            crate::models::technician::ExternalCompany,
            crate::models::technician::CreateExternalCompany,
            crate::models::technician::UpdateExternalCompany,
            crate::models::technician::ExternalTechnician,
            crate::models::technician::CreateExternalTechnician,
            crate::models::technician::UpdateExternalTechnician,
            crate::models::supplier::Supplier,
            crate::models::supplier::CreateSupplier,
            crate::models::supplier::UpdateSupplier,
            crate::models::certificate::CertificateView,
            crate::models::certificate::Certificate,
            crate::models::certificate::CreateCertificate,
            crate::models::certificate::UpdateCertificate,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "equipment", description = "Equipment registry"),
        (name = "maintenance", description = "Maintenance records"),
        (name = "service-orders", description = "Service orders"),
        (name = "departments", description = "Departments"),
        (name = "technicians", description = "Internal technicians and external providers"),
        (name = "suppliers", description = "Suppliers"),
        (name = "certificates", description = "Equipment certificates"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by secured paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_has_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/maintenance/{id}/status"));
    }
}
