//! Service orders service

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    lifecycle::{apply_service_order_status, record_satisfaction_rating, Clock},
    models::{
        enums::ServiceOrderStatus,
        page::PageQuery,
        service_order::{
            next_order_code, rating_as_integer, CreateServiceOrder, RatingRequest, ServiceOrder,
            ServiceOrderDetails, ServiceOrderShort, UpdateServiceOrder,
        },
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ServiceOrdersService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl ServiceOrdersService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn list(&self, page: &PageQuery) -> AppResult<(Vec<ServiceOrderShort>, i64)> {
        self.repository.service_orders.list(page).await
    }

    pub async fn get_details(&self, id: Uuid) -> AppResult<ServiceOrderDetails> {
        let order = self.repository.service_orders.get_by_id(id).await?;
        let names = self.repository.service_orders.names(&order).await?;
        Ok(ServiceOrderDetails {
            order,
            equipment_name: names.equipment_name,
            department_name: names.department_name,
            requester_name: names.requester_name,
        })
    }

    pub async fn create(&self, data: CreateServiceOrder) -> AppResult<ServiceOrder> {
        data.validate()?;
        self.check_references(Some(data.equipment_id), Some(data.department_id), Some(data.requester_id), None)
            .await?;

        let now = self.clock.now();
        let mut tx = self.repository.pool.begin().await?;
        let last_code = self.repository.service_orders.last_code(&mut tx).await?;

        let mut order = ServiceOrder {
            id: Uuid::new_v4(),
            code: next_order_code(last_code.as_deref())?,
            equipment_id: data.equipment_id,
            department_id: data.department_id,
            requester_id: data.requester_id,
            service_type: data.service_type,
            problem_description: data.problem_description,
            priority: data.priority.unwrap_or_default(),
            status: ServiceOrderStatus::default(),
            opened_at: now,
            assigned_at: None,
            started_at: None,
            completed_at: None,
            maintenance_id: None,
            attachment_urls: data.attachment_urls,
            notes: data.notes,
            satisfaction_rating: None,
            satisfaction_comment: None,
            created_at: now,
            updated_at: now,
        };

        if let Some(ref status) = data.status {
            apply_service_order_status(&mut order, status, now)?;
        }

        self.repository.service_orders.insert(&mut tx, &order).await?;
        tx.commit().await?;

        tracing::info!(order_id = %order.id, code = %order.code, "Service order opened");
        Ok(order)
    }

    /// Full update; status and rating go through the transition rules
    pub async fn update(&self, id: Uuid, data: UpdateServiceOrder) -> AppResult<ServiceOrder> {
        data.validate()?;
        self.check_references(data.equipment_id, data.department_id, data.requester_id, data.maintenance_id)
            .await?;

        let now = self.clock.now();
        let mut tx = self.repository.pool.begin().await?;
        let mut order = self.repository.service_orders.load(&mut tx, id).await?;

        if let Some(v) = data.equipment_id {
            order.equipment_id = v;
        }
        if let Some(v) = data.department_id {
            order.department_id = v;
        }
        if let Some(v) = data.requester_id {
            order.requester_id = v;
        }
        if let Some(v) = data.service_type {
            order.service_type = v;
        }
        if let Some(v) = data.problem_description {
            order.problem_description = v;
        }
        if let Some(v) = data.priority {
            order.priority = v;
        }
        if data.assigned_at.is_some() {
            order.assigned_at = data.assigned_at;
        }
        if data.started_at.is_some() {
            order.started_at = data.started_at;
        }
        if data.completed_at.is_some() {
            order.completed_at = data.completed_at;
        }
        if data.maintenance_id.is_some() {
            order.maintenance_id = data.maintenance_id;
        }
        if data.attachment_urls.is_some() {
            order.attachment_urls = data.attachment_urls;
        }
        if data.notes.is_some() {
            order.notes = data.notes;
        }

        if let Some(ref status) = data.status {
            apply_service_order_status(&mut order, status, now)?;
        }
        if data.satisfaction_rating.is_some() {
            let comment = data
                .satisfaction_comment
                .or_else(|| order.satisfaction_comment.clone());
            record_satisfaction_rating(
                &mut order,
                rating_as_integer(data.satisfaction_rating.as_ref()),
                comment,
            )?;
        } else if data.satisfaction_comment.is_some() {
            order.satisfaction_comment = data.satisfaction_comment;
        }

        order.updated_at = now;
        self.repository.service_orders.save(&mut tx, &order).await?;
        tx.commit().await?;

        Ok(order)
    }

    /// Status-only change
    pub async fn update_status(&self, id: Uuid, status: &str) -> AppResult<ServiceOrder> {
        let now = self.clock.now();
        let mut tx = self.repository.pool.begin().await?;

        let mut order = self.repository.service_orders.load(&mut tx, id).await?;
        let status = apply_service_order_status(&mut order, status, now)?;
        order.updated_at = now;

        self.repository.service_orders.save(&mut tx, &order).await?;
        tx.commit().await?;

        tracing::info!(order_id = %id, status = %status, "Service order status updated");
        Ok(order)
    }

    pub async fn rate(&self, id: Uuid, request: RatingRequest) -> AppResult<ServiceOrder> {
        let now = self.clock.now();
        let mut tx = self.repository.pool.begin().await?;

        let mut order = self.repository.service_orders.load(&mut tx, id).await?;
        record_satisfaction_rating(
            &mut order,
            rating_as_integer(request.rating.as_ref()),
            request.comment,
        )?;
        order.updated_at = now;

        self.repository.service_orders.save(&mut tx, &order).await?;
        tx.commit().await?;
        Ok(order)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.service_orders.delete(id).await
    }

    pub async fn by_requester(&self, requester_id: Uuid) -> AppResult<Vec<ServiceOrderShort>> {
        self.repository.service_orders.by_requester(requester_id).await
    }

    pub async fn by_department(&self, department_id: Uuid) -> AppResult<Vec<ServiceOrderShort>> {
        self.repository.service_orders.by_department(department_id).await
    }

    pub async fn by_equipment(&self, equipment_id: Uuid) -> AppResult<Vec<ServiceOrderShort>> {
        self.repository.service_orders.by_equipment(equipment_id).await
    }

    /// Orders in a status given as a case-insensitive label
    pub async fn by_status(&self, status: &str) -> AppResult<Vec<ServiceOrderShort>> {
        let status: ServiceOrderStatus = status
            .to_uppercase()
            .parse()
            .map_err(AppError::InvalidStatus)?;
        self.repository.service_orders.by_status(status).await
    }

    /// 404 for any referenced row that does not exist
    async fn check_references(
        &self,
        equipment_id: Option<Uuid>,
        department_id: Option<Uuid>,
        requester_id: Option<Uuid>,
        maintenance_id: Option<Uuid>,
    ) -> AppResult<()> {
        if let Some(id) = equipment_id {
            if !self.repository.equipment.exists(id).await? {
                return Err(AppError::NotFound(format!("Equipment {} not found", id)));
            }
        }
        if let Some(id) = department_id {
            if !self.repository.departments.exists(id).await? {
                return Err(AppError::NotFound(format!("Department {} not found", id)));
            }
        }
        if let Some(id) = requester_id {
            if !self.repository.users.exists(id).await? {
                return Err(AppError::NotFound(format!("User {} not found", id)));
            }
        }
        if let Some(id) = maintenance_id {
            if !self.repository.maintenance.exists(id).await? {
                return Err(AppError::NotFound(format!("Maintenance record {} not found", id)));
            }
        }
        Ok(())
    }
}
