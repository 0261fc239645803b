//! LOCATION, GEO and CONFERENCE lines.

use jscal_model::entity::{Location, Schedule, VirtualLocation};
use jscal_rfc::ical::core::{Component, Property, names, param_names};

use super::object_id;

/// `lat;lon` to a `geo:` URI.
pub(in crate::map) fn geo_uri(raw: &str) -> Option<String> {
    let (lat, lon) = raw.split_once(';')?;
    let (lat, lon) = (lat.trim(), lon.trim());
    if lat.parse::<f64>().is_err() || lon.parse::<f64>().is_err() {
        return None;
    }
    Some(format!("geo:{lat},{lon}"))
}

pub(super) fn read(component: &Component, schedule: &mut Schedule) {
    for (position, prop) in component
        .get_properties(names::LOCATION)
        .into_iter()
        .enumerate()
    {
        let Some(name) = prop.as_text() else {
            continue;
        };
        schedule
            .locations
            .insert(object_id(prop, "location", position), Location::named(name));
    }

    if let Some(geo) = component.get_property(names::GEO) {
        read_geo(geo, schedule);
    }

    for (position, prop) in component
        .get_properties(names::CONFERENCE)
        .into_iter()
        .enumerate()
    {
        let Some(uri) = prop.as_uri() else {
            continue;
        };
        let mut location = VirtualLocation::new(uri);
        location.set_name(prop.get_param_value(param_names::LABEL));
        if let Some(param) = prop.get_param(param_names::FEATURE) {
            for feature in &param.values {
                location
                    .features
                    .insert(feature.to_ascii_lowercase(), true);
            }
        }
        schedule
            .virtual_locations
            .insert(object_id(prop, "conference", position), location);
    }
}

/// GEO belongs to the location naming it in `X-JSID`, else to the first one.
fn read_geo(geo: &Property, schedule: &mut Schedule) {
    let Some(coordinates) = geo_uri(&geo.raw_value) else {
        tracing::warn!(value = %geo.raw_value, "Ignoring malformed GEO");
        return;
    };
    let target = geo
        .jsid()
        .filter(|id| schedule.locations.contains_key(*id))
        .map(str::to_string)
        .or_else(|| schedule.locations.keys().next().cloned());
    if let Some(location) = target.and_then(|id| schedule.locations.get_mut(&id)) {
        location.coordinates = Some(coordinates);
    } else {
        let mut location = Location::default();
        location.coordinates = Some(coordinates);
        schedule
            .locations
            .insert(object_id(geo, "location", 0), location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_to_uri() {
        assert_eq!(geo_uri("37.386;-122.083").as_deref(), Some("geo:37.386,-122.083"));
        assert_eq!(geo_uri("north;west"), None);
        assert_eq!(geo_uri("37.386"), None);
    }
}
