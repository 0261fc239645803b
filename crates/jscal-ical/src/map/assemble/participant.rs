//! Participants to ATTENDEE and ORGANIZER lines.

use std::collections::{BTreeMap, BTreeSet};

use jscal_model::entity::{Participant, Schedule};
use jscal_rfc::ical::core::{Parameter, Property, names, param_names};

use super::{Assembler, all_set, has_only};
use crate::map::codes::{cutype_token, participant_kind, partstat_token, role_token, roles};
use crate::map::extract::send_method;

const ATTENDEE_KEYS: &[&str] = &[
    "name",
    "email",
    "sendTo",
    "kind",
    "roles",
    "participationStatus",
    "expectReply",
    "delegatedTo",
    "delegatedFrom",
    "sentBy",
    "language",
];
const OWNER_KEYS: &[&str] = &["name", "email", "sendTo", "roles"];

/// The scheduling address: `imip` first, then `other`, then the email.
fn address(participant: &Participant) -> Option<String> {
    participant
        .send_to
        .get("imip")
        .or_else(|| participant.send_to.get("other"))
        .cloned()
        .or_else(|| participant.email().map(|email| format!("mailto:{email}")))
}

/// Whether `sendTo` reads back exactly from its address.
fn send_to_covered(participant: &Participant) -> bool {
    participant.send_to.len() == 1
        && participant
            .send_to
            .iter()
            .all(|(method, uri)| send_method(uri) == method)
}

/// Whether a participant takes part beyond owning the object.
fn is_attendee(participant: &Participant) -> bool {
    participant.roles.is_empty()
        || participant
            .roles
            .iter()
            .any(|(role, on)| *on && role != "owner")
}

fn roles_covered(participant: &Participant, is_owner: bool) -> bool {
    let mut expected: BTreeSet<&str> = if is_attendee(participant) {
        roles(role_token(|role| participant.has_role(role)))
            .iter()
            .copied()
            .collect()
    } else {
        BTreeSet::new()
    };
    if is_owner {
        expected.insert("owner");
    }
    all_set(&participant.roles)
        && participant.roles.keys().map(String::as_str).eq(expected)
}

/// ## Summary
/// Writes the organizer and the attendees of `schedule`.
///
/// The organizer is the `replyTo` address. The owner participant using
/// that address is named on it through `X-JSID`; owners that also attend
/// are written as attendees too. `participants`, `replyTo` and `sentBy`
/// are only covered when they read back unchanged.
pub(super) fn write(asm: &mut Assembler<'_>, schedule: &Schedule) {
    let organizer = schedule
        .reply_to
        .get("imip")
        .or_else(|| schedule.reply_to.get("other"));
    let owner_id = organizer.and_then(|address| {
        schedule
            .participants
            .iter()
            .find(|(_, p)| {
                p.has_role("owner")
                    && p.send_to.values().any(|uri| uri.eq_ignore_ascii_case(address))
            })
            .map(|(id, _)| id.as_str())
    });

    if let Some(address) = organizer {
        let mut prop = Property::cal_address(names::ORGANIZER, address.as_str())
            .with_opt_param(param_names::SENT_BY, schedule.sent_by());
        if let Some(owner) = owner_id.and_then(|id| schedule.participants.get_key_value(id)) {
            prop = prop
                .with_param(Parameter::jsid(owner.0.as_str()))
                .with_opt_param(param_names::CN, owner.1.name())
                .with_opt_param(param_names::EMAIL, owner.1.email());
        }
        asm.add(prop);
        asm.mark_if(
            "replyTo",
            schedule.reply_to.len() == 1
                && schedule
                    .reply_to
                    .iter()
                    .all(|(method, uri)| send_method(uri) == method),
        );
        asm.mark("sentBy");
    }

    let mut covered = true;
    for (id, participant) in &schedule.participants {
        let is_owner = owner_id == Some(id.as_str());
        if !is_attendee(participant) {
            covered &= is_owner
                && has_only(participant, OWNER_KEYS)
                && send_to_covered(participant)
                && roles_covered(participant, true);
            continue;
        }
        let Some(cal_address) = address(participant) else {
            tracing::warn!(%id, "Participant without address, not written as attendee");
            covered = false;
            continue;
        };

        let delegates = |targets: &BTreeMap<String, bool>| {
            targets
                .keys()
                .filter_map(|target| schedule.participants.get(target).and_then(address))
                .collect::<Vec<_>>()
        };
        let delegated_to = delegates(&participant.delegated_to);
        let delegated_from = delegates(&participant.delegated_from);

        covered &= has_only(participant, ATTENDEE_KEYS)
            && send_to_covered(participant)
            && roles_covered(participant, is_owner)
            && participant
                .kind
                .as_deref()
                .is_none_or(|kind| participant_kind(&cutype_token(kind)) == kind)
            && all_set(&participant.delegated_to)
            && all_set(&participant.delegated_from)
            && delegated_to.len() == participant.delegated_to.len()
            && delegated_from.len() == participant.delegated_from.len();

        let mut prop = Property::cal_address(names::ATTENDEE, cal_address)
            .with_param(Parameter::jsid(id.as_str()))
            .with_opt_param(param_names::CN, participant.name())
            .with_opt_param(param_names::EMAIL, participant.email())
            .with_opt_param(param_names::SENT_BY, participant.sent_by())
            .with_opt_param(param_names::CUTYPE, participant.kind.as_deref().map(cutype_token))
            .with_param(Parameter::new(
                param_names::ROLE,
                role_token(|role| participant.has_role(role)),
            ))
            .with_opt_param(
                param_names::PARTSTAT,
                participant.participation_status.map(partstat_token),
            )
            .with_opt_param(param_names::RSVP, participant.expect_reply.then_some("TRUE"))
            .with_opt_param(param_names::LANGUAGE, participant.language.as_deref());
        if !delegated_to.is_empty() {
            prop = prop.with_param(Parameter::with_values(param_names::DELEGATED_TO, delegated_to));
        }
        if !delegated_from.is_empty() {
            prop = prop.with_param(Parameter::with_values(
                param_names::DELEGATED_FROM,
                delegated_from,
            ));
        }
        asm.add(prop);
    }
    asm.mark_if("participants", covered);
}
