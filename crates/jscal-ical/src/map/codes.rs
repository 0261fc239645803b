//! Enumerated property values and their iCalendar tokens.

use jscal_model::entity::{FreeBusyStatus, ParticipationStatus, Privacy, Progress, Status};

pub(crate) fn privacy(token: &str) -> Option<Privacy> {
    match token.to_ascii_uppercase().as_str() {
        "PUBLIC" => Some(Privacy::Public),
        "PRIVATE" => Some(Privacy::Private),
        "CONFIDENTIAL" => Some(Privacy::Secret),
        _ => None,
    }
}

pub(crate) const fn class_token(privacy: Privacy) -> &'static str {
    match privacy {
        Privacy::Public => "PUBLIC",
        Privacy::Private => "PRIVATE",
        Privacy::Secret => "CONFIDENTIAL",
    }
}

pub(crate) fn free_busy(token: &str) -> Option<FreeBusyStatus> {
    match token.to_ascii_uppercase().as_str() {
        "OPAQUE" => Some(FreeBusyStatus::Busy),
        "TRANSPARENT" => Some(FreeBusyStatus::Free),
        _ => None,
    }
}

pub(crate) const fn transp_token(status: FreeBusyStatus) -> &'static str {
    match status {
        FreeBusyStatus::Busy => "OPAQUE",
        FreeBusyStatus::Free => "TRANSPARENT",
    }
}

pub(crate) fn event_status(token: &str) -> Option<Status> {
    match token.to_ascii_uppercase().as_str() {
        "CONFIRMED" => Some(Status::Confirmed),
        "CANCELLED" => Some(Status::Cancelled),
        "TENTATIVE" => Some(Status::Tentative),
        _ => None,
    }
}

pub(crate) const fn event_status_token(status: Status) -> &'static str {
    match status {
        Status::Confirmed => "CONFIRMED",
        Status::Cancelled => "CANCELLED",
        Status::Tentative => "TENTATIVE",
    }
}

pub(crate) fn progress(token: &str) -> Option<Progress> {
    match token.to_ascii_uppercase().as_str() {
        "NEEDS-ACTION" => Some(Progress::NeedsAction),
        "IN-PROCESS" => Some(Progress::InProcess),
        "COMPLETED" => Some(Progress::Completed),
        "FAILED" => Some(Progress::Failed),
        "CANCELLED" => Some(Progress::Cancelled),
        _ => None,
    }
}

pub(crate) const fn progress_token(progress: Progress) -> &'static str {
    match progress {
        Progress::NeedsAction => "NEEDS-ACTION",
        Progress::InProcess => "IN-PROCESS",
        Progress::Completed => "COMPLETED",
        Progress::Failed => "FAILED",
        Progress::Cancelled => "CANCELLED",
    }
}

pub(crate) fn participation(token: &str) -> Option<ParticipationStatus> {
    match token.to_ascii_uppercase().as_str() {
        "NEEDS-ACTION" => Some(ParticipationStatus::NeedsAction),
        "ACCEPTED" => Some(ParticipationStatus::Accepted),
        "DECLINED" => Some(ParticipationStatus::Declined),
        "TENTATIVE" => Some(ParticipationStatus::Tentative),
        "DELEGATED" => Some(ParticipationStatus::Delegated),
        _ => None,
    }
}

pub(crate) fn partstat_token(status: ParticipationStatus) -> String {
    status.as_str().to_ascii_uppercase()
}

/// Participant roles for a ROLE token.
pub(crate) fn roles(token: &str) -> &'static [&'static str] {
    match token.to_ascii_uppercase().as_str() {
        "CHAIR" => &["attendee", "chair"],
        "OPT-PARTICIPANT" => &["attendee", "optional"],
        "NON-PARTICIPANT" => &["informational"],
        _ => &["attendee"],
    }
}

/// The ROLE token that best describes a role set.
pub(crate) fn role_token(has_role: impl Fn(&str) -> bool) -> &'static str {
    if has_role("chair") {
        "CHAIR"
    } else if has_role("optional") {
        "OPT-PARTICIPANT"
    } else if has_role("informational") && !has_role("attendee") {
        "NON-PARTICIPANT"
    } else {
        "REQ-PARTICIPANT"
    }
}

/// Participant kind for a CUTYPE token; unknown tokens are kept lowercased.
pub(crate) fn participant_kind(token: &str) -> String {
    match token.to_ascii_uppercase().as_str() {
        "ROOM" => "location".to_string(),
        _ => token.to_ascii_lowercase(),
    }
}

pub(crate) fn cutype_token(kind: &str) -> String {
    match kind {
        "location" => "ROOM".to_string(),
        other => other.to_ascii_uppercase(),
    }
}
