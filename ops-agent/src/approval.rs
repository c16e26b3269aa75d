//! Hierarchical approval routing
//!
//! Who may act on whose pending request is a data-driven table, not
//! scattered branching: each rule names an approver role and the
//! requester divisions and roles it covers. A requester matches a rule
//! when their division OR role appears in it; an approver with no rule
//! sees nothing.
//!
//! Approval side effects are computed as a pure value first and written
//! to the remote store second, so the mutation logic tests without any
//! store at all.

use shared::models::{
    Division, DutyState, DutyStatus, RequestType, Role, StaffProfile,
};
use shared::{AppError, AppResult};
use std::sync::Arc;

use crate::notify::PushDispatcher;
use crate::remote::RemoteStore;
use crate::status::BREAK_DURATION_MINUTES;

/// One routing rule: requests from these divisions or roles land on the
/// desk of `approver`.
pub struct RouteRule {
    pub approver: Role,
    pub divisions: &'static [Division],
    pub roles: &'static [Role],
}

/// Authoritative routing table. Order is irrelevant; eligibility is the
/// union of every matching rule.
pub const ROUTING_TABLE: &[RouteRule] = &[
    RouteRule {
        approver: Role::KabagTu,
        divisions: &[Division::StafTu, Division::StafUmum],
        roles: &[Role::KasubagUmum, Role::KasubagLogistik],
    },
    RouteRule {
        approver: Role::KasubagUmum,
        divisions: &[
            Division::Cleaning,
            Division::Driver,
            Division::Maintenance,
            Division::Pantry,
            Division::Security,
        ],
        roles: &[Role::Commander, Role::Koordinator],
    },
    RouteRule {
        approver: Role::KasubagLogistik,
        divisions: &[Division::StafLogistik, Division::StafPerkap],
        roles: &[],
    },
    RouteRule {
        approver: Role::Commander,
        divisions: &[Division::Security],
        roles: &[],
    },
    RouteRule {
        approver: Role::Koordinator,
        divisions: &[Division::Pantry],
        roles: &[],
    },
];

/// The role used for routing lookups. A plain kasubag in the umum
/// division routes as kasubag_umum.
pub fn routing_role(profile: &StaffProfile) -> Role {
    match (profile.role, profile.division) {
        (Role::Kasubag, Division::Umum) => Role::KasubagUmum,
        (role, _) => role,
    }
}

/// Whether `approver` may see and act on a request raised by `requester`.
pub fn can_view(approver: &StaffProfile, requester: &StaffProfile) -> bool {
    let approver_role = routing_role(approver);
    ROUTING_TABLE.iter().any(|rule| {
        rule.approver == approver_role
            && (rule.divisions.contains(&requester.division)
                || rule.roles.contains(&requester.role))
    })
}

/// Filter the full pending set down to what `approver` is entitled to see.
pub fn visible_requests<'a>(
    approver: &StaffProfile,
    pending: &'a [StaffProfile],
) -> Vec<&'a StaffProfile> {
    pending
        .iter()
        .filter(|requester| {
            requester.duty.status == DutyStatus::Pending && can_view(approver, requester)
        })
        .collect()
}

/// The duty mutations an approval produces.
#[derive(Debug)]
pub struct ApprovalOutcome {
    /// New duty block for the requester.
    pub requester_duty: DutyState,
    /// New duty block for the approver, when the approval puts them on a
    /// substitution post. Security-on-security only.
    pub approver_duty: Option<DutyState>,
}

/// Compute the mutations for approving `requester`'s pending request.
///
/// Pure: no store access, no eligibility check (callers gate on
/// [`can_view`] before applying). Break approvals start the 40-minute
/// timer from `now_millis`; a security approver backing a security
/// requester goes `replacing` themselves.
pub fn approval_mutations(
    approver: &StaffProfile,
    requester: &StaffProfile,
    now_millis: i64,
) -> AppResult<ApprovalOutcome> {
    if requester.duty.status != DutyStatus::Pending {
        return Err(AppError::conflict("Request is no longer pending"));
    }
    let request_type = requester
        .duty
        .request_type
        .ok_or_else(|| AppError::validation("Pending record carries no request type"))?;

    let (status, end_time) = match request_type {
        RequestType::Break => (
            DutyStatus::Break,
            Some(now_millis + BREAK_DURATION_MINUTES * 60 * 1000),
        ),
        RequestType::Permit => (DutyStatus::Permit, None),
    };

    let requester_duty = DutyState {
        status,
        request_type: Some(request_type),
        request_reason: requester.duty.request_reason.clone(),
        status_end_time: end_time,
        approved_by: Some(approver.name.clone()),
        ..DutyState::active()
    };

    let approver_duty = if requester.division == Division::Security
        && approver.division == Division::Security
    {
        Some(DutyState {
            status: DutyStatus::Replacing,
            replacing_who: Some(requester.name.clone()),
            replacing_reason: requester.duty.request_reason.clone(),
            ..DutyState::active()
        })
    } else {
        None
    };

    Ok(ApprovalOutcome {
        requester_duty,
        approver_duty,
    })
}

/// Approval operations against the remote store.
#[derive(Clone)]
pub struct ApprovalService {
    store: Arc<dyn RemoteStore>,
    push: Option<PushDispatcher>,
}

impl ApprovalService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store, push: None }
    }

    /// Notify the requester's device when their request is approved.
    pub fn with_push(mut self, push: PushDispatcher) -> Self {
        self.push = Some(push);
        self
    }

    /// Pending requests this approver is entitled to act on.
    pub async fn list_visible(&self, approver: &StaffProfile) -> AppResult<Vec<StaffProfile>> {
        let pending = self.store.list_pending_staff().await?;
        Ok(visible_requests(approver, &pending)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Approve a pending request, writing both sides of the outcome.
    pub async fn approve(
        &self,
        approver: &StaffProfile,
        requester: &StaffProfile,
    ) -> AppResult<ApprovalOutcome> {
        self.approve_at(approver, requester, shared::util::now_millis())
            .await
    }

    pub async fn approve_at(
        &self,
        approver: &StaffProfile,
        requester: &StaffProfile,
        now_millis: i64,
    ) -> AppResult<ApprovalOutcome> {
        if !can_view(approver, requester) {
            return Err(AppError::unauthorized(
                "This request is not routed to your role",
            ));
        }

        let outcome = approval_mutations(approver, requester, now_millis)?;
        self.store
            .update_duty(&requester.id, outcome.requester_duty.clone())
            .await?;
        if let Some(duty) = &outcome.approver_duty {
            self.store.update_duty(&approver.id, duty.clone()).await?;
        }

        tracing::info!(
            approver = %approver.name,
            requester = %requester.name,
            status = ?outcome.requester_duty.status,
            substitution = outcome.approver_duty.is_some(),
            "request approved"
        );

        if let Some(push) = &self.push
            && let Some(token) = &requester.expo_push_token
        {
            push.send(shared::models::PushMessage::new(
                token.clone(),
                "Permintaan Disetujui",
                format!("Disetujui oleh {}", approver.name),
            ))
            .await;
        }
        Ok(outcome)
    }
}
