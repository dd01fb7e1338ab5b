//! Maintenance records service
//!
//! Every status change loads the record and its equipment, applies the
//! transition rules and writes both back inside a single transaction.

use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    helpers::{format_brl, maintenance_total},
    lifecycle::{apply_maintenance_status, Clock},
    models::{
        enums::MaintenanceStatus,
        maintenance::{
            check_times, AssignTo, Assignee, CreateMaintenance, MaintenanceDetails,
            MaintenanceRecord, MaintenanceShort, PeriodQuery, UpdateMaintenance,
        },
        page::PageQuery,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl MaintenanceService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub async fn list(&self, page: &PageQuery) -> AppResult<(Vec<MaintenanceShort>, i64)> {
        self.repository.maintenance.list(page).await
    }

    /// Record with resolved names and formatted cost
    pub async fn get_details(&self, id: Uuid) -> AppResult<MaintenanceDetails> {
        let record = self.repository.maintenance.get_by_id(id).await?;
        let names = self.repository.maintenance.names(&record).await?;
        Ok(MaintenanceDetails {
            total_cost_display: format_brl(Some(record.total_cost)),
            equipment_name: names.equipment_name,
            technician_name: names.technician_name,
            external_company_name: names.external_company_name,
            record,
        })
    }

    pub async fn create(&self, data: CreateMaintenance) -> AppResult<MaintenanceRecord> {
        data.validate()?;
        check_costs(&[data.labor_cost, data.parts_cost, data.total_cost])?;

        let assignee = match data.assignee {
            Some(assign_to) => self.resolve_assignee(assign_to).await?,
            None => Assignee::Unassigned,
        };
        let now = self.clock.now();
        let labor_cost = data.labor_cost.unwrap_or_default();
        let parts_cost = data.parts_cost.unwrap_or_default();

        let mut record = MaintenanceRecord {
            id: Uuid::new_v4(),
            equipment_id: data.equipment_id,
            maintenance_type: data.maintenance_type,
            status: MaintenanceStatus::default(),
            priority: data.priority.unwrap_or_default(),
            description: data.description,
            scheduled_at: data.scheduled_at.unwrap_or(now),
            start_time: data.start_time,
            end_time: data.end_time,
            assignee,
            labor_cost,
            parts_cost,
            total_cost: data
                .total_cost
                .unwrap_or_else(|| maintenance_total(Some(labor_cost), Some(parts_cost))),
            downtime_minutes: data.downtime_minutes,
            notes: data.notes,
            replaced_parts: data.replaced_parts,
            attachment_urls: data.attachment_urls,
            manager_signature_url: data.manager_signature_url,
            technician_signature_url: data.technician_signature_url,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.repository.pool.begin().await?;
        let mut equipment = self
            .repository
            .equipment
            .load(&mut tx, record.equipment_id)
            .await?;

        if let Some(ref status) = data.status {
            let transition = apply_maintenance_status(&mut record, &mut equipment, status, now)?;
            if transition.equipment_changed {
                self.repository.equipment.save_status(&mut tx, &equipment).await?;
            }
        }

        self.repository.maintenance.insert(&mut tx, &record).await?;
        tx.commit().await?;

        tracing::info!(
            maintenance_id = %record.id,
            equipment_id = %record.equipment_id,
            status = %record.status,
            "Maintenance record created"
        );
        Ok(record)
    }

    /// Full update; a supplied status goes through the transition rules
    pub async fn update(&self, id: Uuid, data: UpdateMaintenance) -> AppResult<MaintenanceRecord> {
        data.validate()?;
        check_costs(&[data.labor_cost, data.parts_cost, data.total_cost])?;

        let assignee = match data.assignee {
            Some(assign_to) => Some(self.resolve_assignee(assign_to).await?),
            None => None,
        };
        let now = self.clock.now();

        let mut tx = self.repository.pool.begin().await?;
        let mut record = self.repository.maintenance.load(&mut tx, id).await?;

        if let Some(equipment_id) = data.equipment_id {
            if equipment_id != record.equipment_id {
                self.repository.equipment.load(&mut tx, equipment_id).await?;
                record.equipment_id = equipment_id;
            }
        }
        if let Some(v) = data.maintenance_type {
            record.maintenance_type = v;
        }
        if let Some(v) = data.priority {
            record.priority = v;
        }
        if let Some(v) = data.description {
            record.description = v;
        }
        if let Some(v) = data.scheduled_at {
            record.scheduled_at = v;
        }
        if data.start_time.is_some() {
            record.start_time = data.start_time;
        }
        if data.end_time.is_some() {
            record.end_time = data.end_time;
        }
        if let Some(v) = assignee {
            record.assignee = v;
        }
        if let Some(v) = data.labor_cost {
            record.labor_cost = v;
        }
        if let Some(v) = data.parts_cost {
            record.parts_cost = v;
        }
        match data.total_cost {
            Some(total) => record.total_cost = total,
            None if data.labor_cost.is_some() || data.parts_cost.is_some() => {
                record.total_cost =
                    maintenance_total(Some(record.labor_cost), Some(record.parts_cost));
            }
            None => {}
        }
        if data.downtime_minutes.is_some() {
            record.downtime_minutes = data.downtime_minutes;
        }
        if data.notes.is_some() {
            record.notes = data.notes;
        }
        if data.replaced_parts.is_some() {
            record.replaced_parts = data.replaced_parts;
        }
        if data.attachment_urls.is_some() {
            record.attachment_urls = data.attachment_urls;
        }
        if data.manager_signature_url.is_some() {
            record.manager_signature_url = data.manager_signature_url;
        }
        if data.technician_signature_url.is_some() {
            record.technician_signature_url = data.technician_signature_url;
        }

        check_times(record.start_time, record.end_time)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(ref status) = data.status {
            let mut equipment = self
                .repository
                .equipment
                .load(&mut tx, record.equipment_id)
                .await?;
            let transition = apply_maintenance_status(&mut record, &mut equipment, status, now)?;
            if transition.equipment_changed {
                self.repository.equipment.save_status(&mut tx, &equipment).await?;
            }
        }

        record.updated_at = now;
        self.repository.maintenance.save(&mut tx, &record).await?;
        tx.commit().await?;

        Ok(record)
    }

    /// Status-only change
    pub async fn update_status(&self, id: Uuid, status: &str) -> AppResult<MaintenanceRecord> {
        let now = self.clock.now();
        let mut tx = self.repository.pool.begin().await?;

        let mut record = self.repository.maintenance.load(&mut tx, id).await?;
        let mut equipment = self
            .repository
            .equipment
            .load(&mut tx, record.equipment_id)
            .await?;

        let transition = apply_maintenance_status(&mut record, &mut equipment, status, now)?;
        record.updated_at = now;

        self.repository.maintenance.save(&mut tx, &record).await?;
        if transition.equipment_changed {
            self.repository.equipment.save_status(&mut tx, &equipment).await?;
        }
        tx.commit().await?;

        tracing::info!(maintenance_id = %id, status = %transition.status, "Maintenance status updated");
        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.maintenance.delete(id).await
    }

    pub async fn by_equipment(&self, equipment_id: Uuid) -> AppResult<Vec<MaintenanceShort>> {
        if !self.repository.equipment.exists(equipment_id).await? {
            return Err(AppError::NotFound(format!("Equipment {} not found", equipment_id)));
        }
        self.repository.maintenance.by_equipment(equipment_id).await
    }

    pub async fn by_technician(&self, technician_id: Uuid) -> AppResult<Vec<MaintenanceShort>> {
        self.repository.maintenance.by_technician(technician_id).await
    }

    /// Records scheduled in a period; the end defaults to now
    pub async fn by_period(&self, query: &PeriodQuery) -> AppResult<Vec<MaintenanceShort>> {
        let start = query
            .start
            .ok_or_else(|| AppError::BadRequest("Period start is required".to_string()))?;
        let end = query.end.unwrap_or_else(|| self.clock.now());
        if end < start {
            return Err(AppError::BadRequest(
                "Period end cannot be earlier than its start".to_string(),
            ));
        }
        self.repository.maintenance.by_period(start, end).await
    }

    /// Check the technician exists and, for external ones, find their company
    async fn resolve_assignee(&self, assign_to: AssignTo) -> AppResult<Assignee> {
        match assign_to {
            AssignTo::Internal { technician_id } => {
                if !self.repository.technicians.exists(technician_id).await? {
                    return Err(AppError::NotFound(format!(
                        "Technician {} not found",
                        technician_id
                    )));
                }
                Ok(Assignee::Internal { technician_id })
            }
            AssignTo::External { technician_id } => {
                let technician = self
                    .repository
                    .external_technicians
                    .get_by_id(technician_id)
                    .await?;
                Ok(Assignee::External {
                    technician_id,
                    company_id: technician.company_id,
                })
            }
            AssignTo::Unassigned => Ok(Assignee::Unassigned),
        }
    }
}

fn check_costs(costs: &[Option<Decimal>]) -> AppResult<()> {
    if costs.iter().flatten().any(|c| c.is_sign_negative() && !c.is_zero()) {
        return Err(AppError::Validation("Costs cannot be negative".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_check_costs() {
        let ok = Decimal::from_str("10.50").unwrap();
        let neg = Decimal::from_str("-1").unwrap();
        assert!(check_costs(&[Some(ok), None, Some(Decimal::ZERO)]).is_ok());
        assert!(matches!(
            check_costs(&[Some(ok), Some(neg)]),
            Err(AppError::Validation(_))
        ));
    }
}
