//! ATTENDEE and ORGANIZER lines to participants.

use std::collections::BTreeMap;

use jscal_core::util::id::{is_valid_id, sanitize_id};
use jscal_model::entity::{Participant, Schedule};
use jscal_rfc::ical::core::{Component, Property, names, param_names};

use crate::map::codes::{participant_kind, participation, roles};

/// `imip` for `mailto:` addresses, `other` for anything else.
pub(in crate::map) fn send_method(address: &str) -> &'static str {
    if address
        .get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("mailto:"))
    {
        "imip"
    } else {
        "other"
    }
}

fn participant_id(prop: &Property, address: &str) -> String {
    prop.jsid()
        .filter(|id| is_valid_id(id))
        .map_or_else(|| sanitize_id(address), str::to_string)
}

fn param_values<'a>(prop: &'a Property, name: &str) -> impl Iterator<Item = &'a str> {
    prop.get_param(name)
        .into_iter()
        .flat_map(|param| param.values.iter().map(String::as_str))
}

/// ## Summary
/// Reads attendees, then the organizer, into `schedule`.
///
/// The organizer address becomes `replyTo`. The organizer only becomes a
/// participant when it carries an `X-JSID`; an attendee with the same id
/// gains the `owner` role instead. Delegation addresses are resolved to the
/// ids of the participants that use them.
pub(super) fn read(component: &Component, schedule: &mut Schedule) {
    let mut ids_by_address = BTreeMap::new();
    let mut delegations = Vec::new();

    for prop in component.get_properties(names::ATTENDEE) {
        let Some(address) = prop.as_uri() else {
            continue;
        };
        let id = participant_id(prop, address);
        let mut participant = Participant::default();
        participant.add_send_to(send_method(address), address);
        participant.set_name(prop.get_param_value(param_names::CN));
        participant.set_email(prop.get_param_value(param_names::EMAIL));
        participant.set_sent_by(prop.get_param_value(param_names::SENT_BY));
        participant.kind = prop
            .get_param_value(param_names::CUTYPE)
            .map(participant_kind);
        for role in roles(prop.get_param_value(param_names::ROLE).unwrap_or_default()) {
            participant.add_role(*role);
        }
        participant.participation_status = prop
            .get_param_value(param_names::PARTSTAT)
            .and_then(participation);
        participant.expect_reply = prop
            .get_param_value(param_names::RSVP)
            .is_some_and(|rsvp| rsvp.eq_ignore_ascii_case("TRUE"));
        participant.language = prop
            .get_param_value(param_names::LANGUAGE)
            .map(str::to_string);

        let delegated_to: Vec<String> = param_values(prop, param_names::DELEGATED_TO)
            .map(str::to_string)
            .collect();
        let delegated_from: Vec<String> = param_values(prop, param_names::DELEGATED_FROM)
            .map(str::to_string)
            .collect();
        delegations.push((id.clone(), delegated_to, delegated_from));

        ids_by_address.insert(address.to_ascii_lowercase(), id.clone());
        schedule.participants.insert(id, participant);
    }

    let resolve = |address: &str| {
        ids_by_address
            .get(&address.to_ascii_lowercase())
            .cloned()
            .unwrap_or_else(|| sanitize_id(address))
    };
    for (id, delegated_to, delegated_from) in delegations {
        let Some(participant) = schedule.participants.get_mut(&id) else {
            continue;
        };
        for address in delegated_to {
            participant.delegated_to.insert(resolve(&address), true);
        }
        for address in delegated_from {
            participant.delegated_from.insert(resolve(&address), true);
        }
    }

    let Some(organizer) = component.get_property(names::ORGANIZER) else {
        return;
    };
    let Some(address) = organizer.as_uri() else {
        return;
    };
    schedule.add_reply_to(send_method(address), address);
    schedule.set_sent_by(organizer.get_param_value(param_names::SENT_BY));

    let Some(id) = organizer.jsid().filter(|id| is_valid_id(id)) else {
        return;
    };
    let owner = schedule
        .participants
        .entry(id.to_string())
        .or_insert_with(|| {
            let mut participant = Participant::default();
            participant.add_send_to(send_method(address), address);
            participant.set_name(organizer.get_param_value(param_names::CN));
            participant.set_email(organizer.get_param_value(param_names::EMAIL));
            participant
        });
    owner.add_role("owner");
}
