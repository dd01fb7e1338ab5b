use chrono::{DateTime, Utc};

use super::TransitionError;
use crate::models::{enums::ServiceOrderStatus, service_order::ServiceOrder};

/// Apply `new_status` to `order`, stamping the milestone timestamp the first
/// time ASSIGNED, IN_PROGRESS or COMPLETED is reached. Timestamps already set
/// are never overwritten.
pub fn apply_service_order_status(
    order: &mut ServiceOrder,
    new_status: &str,
    now: DateTime<Utc>,
) -> Result<ServiceOrderStatus, TransitionError> {
    let status: ServiceOrderStatus = new_status
        .parse()
        .map_err(TransitionError::InvalidStatus)?;

    order.status = status;
    let milestone = match status {
        ServiceOrderStatus::Assigned => Some(&mut order.assigned_at),
        ServiceOrderStatus::InProgress => Some(&mut order.started_at),
        ServiceOrderStatus::Completed => Some(&mut order.completed_at),
        _ => None,
    };
    if let Some(stamp) = milestone {
        stamp.get_or_insert(now);
    }

    Ok(status)
}

/// Record the requester's satisfaction with a completed order.
///
/// `rating` is `None` when the caller supplied no value or a non-integer one.
pub fn record_satisfaction_rating(
    order: &mut ServiceOrder,
    rating: Option<i64>,
    comment: Option<String>,
) -> Result<(), TransitionError> {
    if order.status != ServiceOrderStatus::Completed {
        return Err(TransitionError::InvalidState(
            "Only completed service orders can be rated".to_string(),
        ));
    }

    let rating = rating
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| {
            TransitionError::InvalidInput("Rating must be an integer between 1 and 5".to_string())
        })?;

    order.satisfaction_rating = Some(rating as i16);
    order.satisfaction_comment = Some(comment.unwrap_or_default());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{Clock, FixedClock};
    use crate::models::enums::{Priority, ServiceType};
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 7, 2, 14, 0, 0).unwrap())
    }

    fn order(status: ServiceOrderStatus) -> ServiceOrder {
        let at = Utc.with_ymd_and_hms(2024, 7, 1, 9, 0, 0).unwrap();
        ServiceOrder {
            id: Uuid::new_v4(),
            code: "SO-000001".to_string(),
            equipment_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            service_type: ServiceType::CorrectiveMaintenance,
            problem_description: "Display flickers".to_string(),
            priority: Priority::High,
            status,
            opened_at: at,
            assigned_at: None,
            started_at: None,
            completed_at: None,
            maintenance_id: None,
            attachment_urls: None,
            notes: None,
            satisfaction_rating: None,
            satisfaction_comment: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_milestones_are_stamped() {
        let now = clock().now();
        let mut so = order(ServiceOrderStatus::Open);

        apply_service_order_status(&mut so, "ASSIGNED", now).unwrap();
        assert_eq!(so.assigned_at, Some(now));

        apply_service_order_status(&mut so, "IN_PROGRESS", now + Duration::minutes(5)).unwrap();
        assert_eq!(so.started_at, Some(now + Duration::minutes(5)));

        apply_service_order_status(&mut so, "COMPLETED", now + Duration::hours(1)).unwrap();
        assert_eq!(so.completed_at, Some(now + Duration::hours(1)));
        assert_eq!(so.status, ServiceOrderStatus::Completed);
        assert_eq!(so.assigned_at, Some(now));
    }

    #[test]
    fn test_reapplying_status_keeps_first_timestamp() {
        let now = clock().now();
        let later = now + Duration::days(1);
        for label in ["ASSIGNED", "IN_PROGRESS", "COMPLETED"] {
            let mut so = order(ServiceOrderStatus::Open);
            apply_service_order_status(&mut so, label, now).unwrap();
            apply_service_order_status(&mut so, label, later).unwrap();

            let stamp = match label {
                "ASSIGNED" => so.assigned_at,
                "IN_PROGRESS" => so.started_at,
                _ => so.completed_at,
            };
            assert_eq!(stamp, Some(now), "{} overwritten", label);
        }
    }

    #[test]
    fn test_other_statuses_stamp_nothing() {
        let mut so = order(ServiceOrderStatus::Open);
        for label in ["OPEN", "AWAITING_PARTS", "CANCELED"] {
            apply_service_order_status(&mut so, label, clock().now()).unwrap();
        }
        assert_eq!(so.status, ServiceOrderStatus::Canceled);
        assert!(so.assigned_at.is_none());
        assert!(so.started_at.is_none());
        assert!(so.completed_at.is_none());
    }

    #[test]
    fn test_any_status_may_follow_any_other() {
        let mut so = order(ServiceOrderStatus::Completed);
        assert_eq!(
            apply_service_order_status(&mut so, "OPEN", clock().now()).unwrap(),
            ServiceOrderStatus::Open
        );
    }

    #[test]
    fn test_bogus_status_leaves_order_unchanged() {
        let mut so = order(ServiceOrderStatus::Assigned);
        let err = apply_service_order_status(&mut so, "BOGUS", clock().now()).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidStatus(_)));
        assert_eq!(so.status, ServiceOrderStatus::Assigned);
        assert!(so.assigned_at.is_none());
    }

    #[test]
    fn test_rating_requires_completed_order() {
        for rating in [None, Some(0), Some(3), Some(9)] {
            let mut so = order(ServiceOrderStatus::Open);
            let err = record_satisfaction_rating(&mut so, rating, None).unwrap_err();
            assert!(matches!(err, TransitionError::InvalidState(_)));
            assert!(so.satisfaction_rating.is_none());
        }
    }

    #[test]
    fn test_rating_bounds() {
        for bad in [Some(0), Some(6), Some(-1), None] {
            let mut so = order(ServiceOrderStatus::Completed);
            let err = record_satisfaction_rating(&mut so, bad, None).unwrap_err();
            assert!(matches!(err, TransitionError::InvalidInput(_)));
            assert!(so.satisfaction_rating.is_none());
        }

        for good in [1, 5] {
            let mut so = order(ServiceOrderStatus::Completed);
            record_satisfaction_rating(&mut so, Some(good), None).unwrap();
            assert_eq!(so.satisfaction_rating, Some(good as i16));
        }
    }

    #[test]
    fn test_rating_comment_defaults_to_empty() {
        let mut so = order(ServiceOrderStatus::Completed);
        record_satisfaction_rating(&mut so, Some(4), None).unwrap();
        assert_eq!(so.satisfaction_comment.as_deref(), Some(""));

        record_satisfaction_rating(&mut so, Some(2), Some("Slow response".to_string())).unwrap();
        assert_eq!(so.satisfaction_rating, Some(2));
        assert_eq!(so.satisfaction_comment.as_deref(), Some("Slow response"));
    }
}
