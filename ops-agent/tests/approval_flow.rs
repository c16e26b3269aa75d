//! Request/approval lifecycle, attendance gating, and SOS against the
//! in-memory store.

use ops_agent::appconfig::AppConfigService;
use ops_agent::approval::ApprovalService;
use ops_agent::attendance::AttendanceService;
use ops_agent::connectivity::ConnectivityMonitor;
use ops_agent::queue::OfflineQueue;
use ops_agent::remote::MemoryRemoteStore;
use ops_agent::sos::SosService;
use ops_agent::status::{BREAK_REQUEST_REASON, StatusService};
use ops_agent::submit::{ReportDelivery, ReportDraft, ReportService};
use shared::AppError;
use shared::models::{
    AttendanceStatus, Division, DutyStatus, Location, RequestType, Role, Shift, StaffProfile,
};
use std::sync::Arc;
use tempfile::TempDir;

const TODAY: &str = "2026-08-28";
const YESTERDAY: &str = "2026-08-27";

fn staff(id: &str, name: &str, division: Division, role: Role) -> StaffProfile {
    StaffProfile::new(id, name, division, role)
}

fn store_with(profiles: &[StaffProfile]) -> Arc<MemoryRemoteStore> {
    let store = Arc::new(MemoryRemoteStore::new());
    for p in profiles {
        store.insert_staff(p.clone());
    }
    store
}

#[tokio::test]
async fn break_request_routes_to_kasubag_umum_only() {
    let requester = staff("u1", "Budi", Division::Cleaning, Role::Staf);
    let kasubag = staff("u2", "Sari", Division::Umum, Role::KasubagUmum);
    let commander = staff("u3", "Andi", Division::Security, Role::Commander);
    let logistik = staff("u4", "Rina", Division::StafLogistik, Role::KasubagLogistik);
    let store = store_with(&[requester.clone(), kasubag.clone(), commander.clone(), logistik.clone()]);

    let status = StatusService::new(store.clone());
    status
        .request_leave(&requester, RequestType::Break, None)
        .await
        .unwrap();

    let pending = store.staff_snapshot("u1").unwrap();
    assert_eq!(pending.duty.status, DutyStatus::Pending);
    assert_eq!(pending.duty.request_reason.as_deref(), Some(BREAK_REQUEST_REASON));

    let approvals = ApprovalService::new(store.clone());
    assert_eq!(approvals.list_visible(&kasubag).await.unwrap().len(), 1);
    assert!(approvals.list_visible(&commander).await.unwrap().is_empty());
    assert!(approvals.list_visible(&logistik).await.unwrap().is_empty());
}

#[tokio::test]
async fn security_approval_puts_approver_on_substitution() {
    let requester = staff("u1", "Budi", Division::Security, Role::Staf);
    let commander = staff("u2", "Andi", Division::Security, Role::Commander);
    let store = store_with(&[requester.clone(), commander.clone()]);

    let status = StatusService::new(store.clone());
    status
        .request_leave(&requester, RequestType::Break, None)
        .await
        .unwrap();

    let pending = store.staff_snapshot("u1").unwrap();
    let approvals = ApprovalService::new(store.clone());
    let approval_time = 1_000_000;
    approvals
        .approve_at(&commander, &pending, approval_time)
        .await
        .unwrap();

    let requester = store.staff_snapshot("u1").unwrap();
    assert_eq!(requester.duty.status, DutyStatus::Break);
    assert_eq!(
        requester.duty.status_end_time,
        Some(approval_time + 40 * 60 * 1000)
    );
    assert_eq!(requester.duty.approved_by.as_deref(), Some("Andi"));

    let approver = store.staff_snapshot("u2").unwrap();
    assert_eq!(approver.duty.status, DutyStatus::Replacing);
    assert_eq!(approver.duty.replacing_who.as_deref(), Some("Budi"));
}

#[tokio::test]
async fn ending_status_restores_both_sides() {
    let requester = staff("u1", "Budi", Division::Security, Role::Staf);
    let commander = staff("u2", "Andi", Division::Security, Role::Commander);
    let store = store_with(&[requester.clone(), commander.clone()]);

    let status = StatusService::new(store.clone());
    status
        .request_leave(&requester, RequestType::Break, None)
        .await
        .unwrap();
    let approvals = ApprovalService::new(store.clone());
    approvals
        .approve_at(&commander, &store.staff_snapshot("u1").unwrap(), 0)
        .await
        .unwrap();

    // Each side ends their own status, no approver involved
    status
        .end_status(&store.staff_snapshot("u1").unwrap())
        .await
        .unwrap();
    status
        .end_status(&store.staff_snapshot("u2").unwrap())
        .await
        .unwrap();

    let requester = store.staff_snapshot("u1").unwrap();
    assert_eq!(requester.duty.status, DutyStatus::Active);
    assert!(requester.duty.status_end_time.is_none());
    assert!(requester.duty.approved_by.is_none());

    let approver = store.staff_snapshot("u2").unwrap();
    assert_eq!(approver.duty.status, DutyStatus::Active);
    assert!(approver.duty.replacing_who.is_none());
}

#[tokio::test]
async fn permit_requires_a_reason() {
    let requester = staff("u1", "Budi", Division::Cleaning, Role::Staf);
    let store = store_with(&[requester.clone()]);
    let status = StatusService::new(store);

    let err = status
        .request_leave(&requester, RequestType::Permit, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn approval_outside_routing_is_unauthorized() {
    let requester = staff("u1", "Budi", Division::Cleaning, Role::Staf);
    let commander = staff("u2", "Andi", Division::Security, Role::Commander);
    let store = store_with(&[requester.clone(), commander.clone()]);

    let status = StatusService::new(store.clone());
    status
        .request_leave(&requester, RequestType::Break, None)
        .await
        .unwrap();

    let approvals = ApprovalService::new(store.clone());
    let err = approvals
        .approve_at(&commander, &store.staff_snapshot("u1").unwrap(), 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[tokio::test]
async fn check_in_is_idempotent_per_day() {
    let member = staff("u1", "Budi", Division::Security, Role::Staf);
    let store = store_with(&[member.clone()]);
    let attendance = AttendanceService::new(store.clone());

    attendance
        .check_in_at(&member, Some(Shift::Pagi), TODAY)
        .await
        .unwrap();
    attendance
        .check_in_at(&member, Some(Shift::Malam), TODAY)
        .await
        .unwrap();

    // Same key, overwritten in place
    assert_eq!(store.attendance_count(), 1);
    assert!(attendance.has_checked_in("u1", TODAY).await.unwrap());
}

#[tokio::test]
async fn leaders_mark_only_their_own_division() {
    let commander = staff("u1", "Andi", Division::Security, Role::Commander);
    let guard = staff("u2", "Budi", Division::Security, Role::Staf);
    let cleaner = staff("u3", "Citra", Division::Cleaning, Role::Staf);
    let kasubag = staff("u4", "Sari", Division::Umum, Role::KasubagUmum);
    let store = store_with(&[commander.clone(), guard.clone(), cleaner.clone(), kasubag.clone()]);
    let attendance = AttendanceService::new(store.clone());

    attendance
        .mark_member_at(&commander, &guard, AttendanceStatus::Sakit, None, TODAY)
        .await
        .unwrap();

    let err = attendance
        .mark_member_at(&commander, &cleaner, AttendanceStatus::Hadir, None, TODAY)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    // Management crosses divisions
    attendance
        .mark_member_at(&kasubag, &cleaner, AttendanceStatus::Hadir, None, TODAY)
        .await
        .unwrap();

    let err = attendance
        .mark_member_at(&guard, &cleaner, AttendanceStatus::Hadir, None, TODAY)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

async fn security_report_at(hour: u32, shift: Shift, check_in_date: &str) -> Result<ReportDelivery, AppError> {
    let dir = TempDir::new().unwrap();
    let asset = dir.path().join("a.jpg");
    std::fs::write(&asset, b"jpeg-bytes").unwrap();

    let guard = staff("u1", "Budi", Division::Security, Role::Staf);
    let store = store_with(&[guard.clone()]);
    let attendance = AttendanceService::new(store.clone());
    attendance
        .check_in_at(&guard, Some(shift), check_in_date)
        .await
        .unwrap();

    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let service = ReportService::new(store, queue, ConnectivityMonitor::new(true));
    service
        .submit_report_at(
            &guard,
            ReportDraft {
                location: Location {
                    id: "loc-1".to_string(),
                    name: "Pos Utama".to_string(),
                },
                description: "aman terkendali".to_string(),
                local_asset_ref: asset,
            },
            TODAY,
            hour,
        )
        .await
}

#[tokio::test]
async fn day_shift_reports_inside_window_only() {
    let sent = security_report_at(10, Shift::Pagi, TODAY).await.unwrap();
    assert!(matches!(sent, ReportDelivery::Sent(_)));

    let err = security_report_at(20, Shift::Pagi, TODAY).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn night_shift_carries_over_past_midnight() {
    // Checked in yesterday evening, still on duty at 02:00
    let sent = security_report_at(2, Shift::Malam, YESTERDAY).await.unwrap();
    assert!(matches!(sent, ReportDelivery::Sent(_)));

    // A day-shift check-in from yesterday does not carry over
    let err = security_report_at(2, Shift::Pagi, YESTERDAY).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn unchecked_in_security_cannot_report() {
    let dir = TempDir::new().unwrap();
    let asset = dir.path().join("a.jpg");
    std::fs::write(&asset, b"jpeg-bytes").unwrap();

    let guard = staff("u1", "Budi", Division::Security, Role::Staf);
    let store = store_with(&[guard.clone()]);
    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let service = ReportService::new(store, queue, ConnectivityMonitor::new(true));

    let err = service
        .submit_report_at(
            &guard,
            ReportDraft {
                location: Location {
                    id: "loc-1".to_string(),
                    name: "Pos Utama".to_string(),
                },
                description: "aman".to_string(),
                local_asset_ref: asset,
            },
            TODAY,
            10,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn unreachable_shift_check_falls_back_to_queue() {
    let dir = TempDir::new().unwrap();
    let asset = dir.path().join("a.jpg");
    std::fs::write(&asset, b"jpeg-bytes").unwrap();

    let guard = staff("u1", "Budi", Division::Security, Role::Staf);
    let store = store_with(&[guard.clone()]);
    // Reachability says online but the store is actually unreachable
    store.set_offline(true);

    let queue = OfflineQueue::open(dir.path().join("queue.redb")).unwrap();
    let service = ReportService::new(store.clone(), queue.clone(), ConnectivityMonitor::new(true));

    let delivery = service
        .submit_report_at(
            &guard,
            ReportDraft {
                location: Location {
                    id: "loc-1".to_string(),
                    name: "Pos Utama".to_string(),
                },
                description: "aman".to_string(),
                local_asset_ref: asset,
            },
            TODAY,
            10,
        )
        .await
        .unwrap();

    assert!(matches!(delivery, ReportDelivery::QueuedOffline));
    assert_eq!(queue.len().unwrap(), 1);
    assert_eq!(store.report_count(), 0);
}

#[tokio::test]
async fn only_one_sos_active_at_a_time() {
    let raiser = staff("u1", "Budi", Division::Security, Role::Staf);
    let peer = staff("u2", "Andi", Division::Security, Role::Staf);
    let kasubag = staff("u3", "Sari", Division::Umum, Role::KasubagUmum);
    let store = store_with(&[raiser.clone(), peer.clone(), kasubag.clone()]);
    let sos = SosService::new(store.clone());

    sos.trigger(&raiser).await.unwrap();
    let err = sos.trigger(&peer).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // A bystander cannot stand it down
    let err = sos.resolve(&peer).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    // Management can; afterwards a new alert may be raised
    sos.resolve(&kasubag).await.unwrap();
    assert!(sos.active().await.unwrap().is_none());
    sos.trigger(&peer).await.unwrap();
}

#[tokio::test]
async fn announcement_edit_is_management_only() {
    let guard = staff("u1", "Budi", Division::Security, Role::Staf);
    let kasubag = staff("u2", "Sari", Division::Umum, Role::KasubagUmum);
    let store = store_with(&[guard.clone(), kasubag.clone()]);
    let app_config = AppConfigService::new(store.clone());

    let err = app_config
        .set_announcement(&guard, "apel pagi".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    app_config
        .set_announcement(&kasubag, "apel pagi".to_string())
        .await
        .unwrap();
    let current = app_config.announcement().await.unwrap().unwrap();
    assert_eq!(current.text, "apel pagi");
    assert_eq!(current.updated_by, "Sari");
}
