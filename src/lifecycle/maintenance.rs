use chrono::{DateTime, Utc};

use super::TransitionError;
use crate::models::{
    enums::{EquipmentStatus, MaintenanceStatus},
    equipment::Equipment,
    maintenance::MaintenanceRecord,
};

/// Outcome of a maintenance status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceTransition {
    pub status: MaintenanceStatus,
    /// The owning equipment was modified and must be written back
    pub equipment_changed: bool,
}

/// Apply `new_status` to `record` and propagate the consequence onto the
/// equipment it belongs to.
///
/// Only the record being changed is considered: completing it returns the
/// equipment to ACTIVE even if other records for the same equipment are
/// still in progress.
pub fn apply_maintenance_status(
    record: &mut MaintenanceRecord,
    equipment: &mut Equipment,
    new_status: &str,
    now: DateTime<Utc>,
) -> Result<MaintenanceTransition, TransitionError> {
    let status: MaintenanceStatus = new_status
        .parse()
        .map_err(TransitionError::InvalidStatus)?;

    if record.equipment_id != equipment.id {
        return Err(TransitionError::InvalidInput(format!(
            "Maintenance record {} does not belong to equipment {}",
            record.id, equipment.id
        )));
    }

    let mut start_time = record.start_time;
    let mut end_time = record.end_time;
    let mut downtime = record.downtime_minutes;

    match status {
        MaintenanceStatus::InProgress => {
            start_time.get_or_insert(now);
        }
        MaintenanceStatus::Completed => {
            let end = *end_time.get_or_insert(now);
            if let (None, Some(start)) = (downtime, start_time) {
                downtime = Some(downtime_minutes(start, end)?);
            }
        }
        MaintenanceStatus::Scheduled | MaintenanceStatus::Canceled => {}
    }

    record.status = status;
    record.start_time = start_time;
    record.end_time = end_time;
    record.downtime_minutes = downtime;

    let previous = equipment.status;
    match status {
        MaintenanceStatus::InProgress => {
            equipment.status = EquipmentStatus::UnderMaintenance;
        }
        MaintenanceStatus::Completed if previous == EquipmentStatus::UnderMaintenance => {
            equipment.status = EquipmentStatus::Active;
            equipment.last_maintenance_date = Some(now.date_naive());
        }
        _ => {}
    }

    let equipment_changed = equipment.status != previous;
    if equipment_changed {
        tracing::info!(
            equipment_id = %equipment.id,
            maintenance_id = %record.id,
            from = %previous,
            to = %equipment.status,
            "Equipment status changed by maintenance transition"
        );
    }

    Ok(MaintenanceTransition {
        status,
        equipment_changed,
    })
}

/// Whole minutes between `start` and `end`, rounded down
fn downtime_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i32, TransitionError> {
    if end < start {
        return Err(TransitionError::InvalidInput(format!(
            "Maintenance end {} is earlier than its start {}",
            end, start
        )));
    }
    let minutes = (end - start).num_seconds().div_euclid(60);
    i32::try_from(minutes).map_err(|_| {
        TransitionError::InvalidInput(format!("Downtime of {} minutes is out of range", minutes))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{Clock, FixedClock};
    use crate::models::{
        enums::{Criticality, MaintenanceType, Priority},
        maintenance::Assignee,
    };
    use chrono::{Duration, NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 5, 14, 10, 0, 0).unwrap())
    }

    fn equipment(status: EquipmentStatus) -> Equipment {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Equipment {
            id: Uuid::new_v4(),
            code: "EQ-001".to_string(),
            name: "Infusion pump".to_string(),
            model: "P200".to_string(),
            manufacturer: "Acme".to_string(),
            serial_number: "SN-001".to_string(),
            acquired_on: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            warranty_until: None,
            acquisition_value: None,
            department_id: Uuid::new_v4(),
            location: None,
            status,
            criticality: Criticality::High,
            last_maintenance_date: None,
            next_planned_maintenance: None,
            technical_specs: None,
            documentation: None,
            image_urls: None,
            qr_code: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn record(equipment: &Equipment) -> MaintenanceRecord {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        MaintenanceRecord {
            id: Uuid::new_v4(),
            equipment_id: equipment.id,
            maintenance_type: MaintenanceType::Corrective,
            status: MaintenanceStatus::Scheduled,
            priority: Priority::Normal,
            description: "Occlusion alarm".to_string(),
            scheduled_at: at,
            start_time: None,
            end_time: None,
            assignee: Assignee::Unassigned,
            labor_cost: Decimal::ZERO,
            parts_cost: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            downtime_minutes: None,
            notes: None,
            replaced_parts: None,
            attachment_urls: None,
            manager_signature_url: None,
            technician_signature_url: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_in_progress_puts_equipment_under_maintenance() {
        for initial in EquipmentStatus::ALL {
            let mut eq = equipment(*initial);
            let mut rec = record(&eq);
            let now = clock().now();

            let t = apply_maintenance_status(&mut rec, &mut eq, "IN_PROGRESS", now).unwrap();

            assert_eq!(t.status, MaintenanceStatus::InProgress);
            assert_eq!(eq.status, EquipmentStatus::UnderMaintenance);
            assert_eq!(t.equipment_changed, *initial != EquipmentStatus::UnderMaintenance);
            assert_eq!(rec.start_time, Some(now));
        }
    }

    #[test]
    fn test_in_progress_keeps_existing_start_time() {
        let mut eq = equipment(EquipmentStatus::Active);
        let mut rec = record(&eq);
        let earlier = clock().now() - Duration::hours(3);
        rec.start_time = Some(earlier);

        apply_maintenance_status(&mut rec, &mut eq, "IN_PROGRESS", clock().now()).unwrap();
        assert_eq!(rec.start_time, Some(earlier));
    }

    #[test]
    fn test_completed_returns_equipment_to_active() {
        let mut eq = equipment(EquipmentStatus::UnderMaintenance);
        let mut rec = record(&eq);
        let now = clock().now();

        let t = apply_maintenance_status(&mut rec, &mut eq, "COMPLETED", now).unwrap();

        assert!(t.equipment_changed);
        assert_eq!(eq.status, EquipmentStatus::Active);
        assert_eq!(eq.last_maintenance_date, NaiveDate::from_ymd_opt(2024, 5, 14));
        assert_eq!(rec.end_time, Some(now));
    }

    #[test]
    fn test_completed_leaves_other_equipment_statuses_alone() {
        for initial in [
            EquipmentStatus::Active,
            EquipmentStatus::Inactive,
            EquipmentStatus::Discontinued,
        ] {
            let mut eq = equipment(initial);
            let mut rec = record(&eq);

            let t = apply_maintenance_status(&mut rec, &mut eq, "COMPLETED", clock().now()).unwrap();

            assert!(!t.equipment_changed);
            assert_eq!(eq.status, initial);
            assert_eq!(eq.last_maintenance_date, None);
        }
    }

    #[test]
    fn test_downtime_is_floored_minutes() {
        let mut eq = equipment(EquipmentStatus::UnderMaintenance);
        let mut rec = record(&eq);
        let start = clock().now();
        rec.start_time = Some(start);
        rec.end_time = Some(start + Duration::seconds(125));

        apply_maintenance_status(&mut rec, &mut eq, "COMPLETED", start + Duration::hours(1))
            .unwrap();

        assert_eq!(rec.downtime_minutes, Some(2));
        assert_eq!(rec.end_time, Some(start + Duration::seconds(125)));
    }

    #[test]
    fn test_start_after_completion_is_rejected() {
        let mut eq = equipment(EquipmentStatus::UnderMaintenance);
        let mut rec = record(&eq);
        let now = clock().now();
        rec.start_time = Some(now + Duration::seconds(30));

        let result = apply_maintenance_status(&mut rec, &mut eq, "COMPLETED", now);

        assert!(matches!(result, Err(TransitionError::InvalidInput(_))));
        assert_eq!(rec.status, MaintenanceStatus::Scheduled);
        assert_eq!(rec.end_time, None);
        assert_eq!(rec.downtime_minutes, None);
        assert_eq!(eq.status, EquipmentStatus::UnderMaintenance);
    }

    #[test]
    fn test_downtime_uses_now_when_end_unset() {
        let mut eq = equipment(EquipmentStatus::UnderMaintenance);
        let mut rec = record(&eq);
        let now = clock().now();
        rec.start_time = Some(now - Duration::minutes(90) - Duration::seconds(59));

        apply_maintenance_status(&mut rec, &mut eq, "COMPLETED", now).unwrap();
        assert_eq!(rec.downtime_minutes, Some(90));
    }

    #[test]
    fn test_explicit_downtime_is_kept() {
        let mut eq = equipment(EquipmentStatus::UnderMaintenance);
        let mut rec = record(&eq);
        rec.start_time = Some(clock().now() - Duration::hours(2));
        rec.downtime_minutes = Some(0);

        apply_maintenance_status(&mut rec, &mut eq, "COMPLETED", clock().now()).unwrap();
        assert_eq!(rec.downtime_minutes, Some(0));
    }

    #[test]
    fn test_no_downtime_without_start() {
        let mut eq = equipment(EquipmentStatus::UnderMaintenance);
        let mut rec = record(&eq);

        apply_maintenance_status(&mut rec, &mut eq, "COMPLETED", clock().now()).unwrap();
        assert_eq!(rec.downtime_minutes, None);
    }

    #[test]
    fn test_scheduled_and_canceled_do_not_propagate() {
        for status in ["SCHEDULED", "CANCELED"] {
            let mut eq = equipment(EquipmentStatus::UnderMaintenance);
            let mut rec = record(&eq);

            let t = apply_maintenance_status(&mut rec, &mut eq, status, clock().now()).unwrap();

            assert!(!t.equipment_changed);
            assert_eq!(eq.status, EquipmentStatus::UnderMaintenance);
            assert_eq!(rec.start_time, None);
            assert_eq!(rec.end_time, None);
        }
    }

    #[test]
    fn test_bogus_status_leaves_everything_unchanged() {
        let mut eq = equipment(EquipmentStatus::Active);
        let mut rec = record(&eq);
        let before_rec = rec.clone();

        let err = apply_maintenance_status(&mut rec, &mut eq, "BOGUS", clock().now()).unwrap_err();

        assert!(matches!(err, TransitionError::InvalidStatus(_)));
        assert_eq!(rec.status, before_rec.status);
        assert_eq!(rec.start_time, before_rec.start_time);
        assert_eq!(eq.status, EquipmentStatus::Active);
    }

    #[test]
    fn test_lowercase_status_is_rejected() {
        let mut eq = equipment(EquipmentStatus::Active);
        let mut rec = record(&eq);
        let err =
            apply_maintenance_status(&mut rec, &mut eq, "in_progress", clock().now()).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidStatus(_)));
    }

    #[test]
    fn test_foreign_equipment_is_rejected() {
        let eq = equipment(EquipmentStatus::Active);
        let mut other = equipment(EquipmentStatus::Active);
        let mut rec = record(&eq);

        let err =
            apply_maintenance_status(&mut rec, &mut other, "IN_PROGRESS", clock().now()).unwrap_err();

        assert!(matches!(err, TransitionError::InvalidInput(_)));
        assert_eq!(rec.status, MaintenanceStatus::Scheduled);
        assert_eq!(other.status, EquipmentStatus::Active);
    }

    #[test]
    fn test_completing_one_record_ignores_others() {
        let mut eq = equipment(EquipmentStatus::Active);
        let mut first = record(&eq);
        let mut second = record(&eq);
        let now = clock().now();

        apply_maintenance_status(&mut first, &mut eq, "IN_PROGRESS", now).unwrap();
        apply_maintenance_status(&mut second, &mut eq, "IN_PROGRESS", now).unwrap();
        apply_maintenance_status(&mut first, &mut eq, "COMPLETED", now).unwrap();

        assert_eq!(second.status, MaintenanceStatus::InProgress);
        assert_eq!(eq.status, EquipmentStatus::Active);
    }
}
