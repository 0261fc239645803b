//! Locations to LOCATION, GEO and CONFERENCE lines.

use jscal_model::entity::Schedule;
use jscal_rfc::ical::core::{Parameter, Property, names, param_names};

use super::{Assembler, all_set, has_only};
use crate::map::extract::geo_uri;

/// `geo:lat,lon` to the `lat;lon` GEO value, when it reads back unchanged.
fn geo_value(coordinates: &str) -> Option<String> {
    let body = coordinates
        .get(..4)
        .filter(|scheme| scheme.eq_ignore_ascii_case("geo:"))
        .and_then(|_| coordinates.get(4..))?;
    let (lat, lon) = body.split_once(',')?;
    let value = format!("{lat};{lon}");
    (geo_uri(&value).as_deref() == Some(coordinates)).then_some(value)
}

pub(super) fn write(asm: &mut Assembler<'_>, schedule: &Schedule) {
    let mut covered = true;
    let mut geo_written = false;
    for (id, location) in &schedule.locations {
        let Some(name) = location.name() else {
            covered = false;
            continue;
        };
        asm.add(Property::text(names::LOCATION, name).with_param(Parameter::jsid(id.as_str())));
        covered &= has_only(location, &["name", "coordinates"]);

        let Some(coordinates) = &location.coordinates else {
            continue;
        };
        match geo_value(coordinates) {
            // iCalendar allows one GEO per component.
            Some(value) if !geo_written => {
                asm.add(Property::raw(names::GEO, value).with_param(Parameter::jsid(id.as_str())));
                geo_written = true;
            }
            _ => covered = false,
        }
    }
    asm.mark_if("locations", covered);

    let mut covered = true;
    for (id, location) in &schedule.virtual_locations {
        covered &= has_only(location, &["name", "uri", "features"])
            && all_set(&location.features)
            && location
                .features
                .keys()
                .all(|feature| *feature == feature.to_ascii_lowercase());
        let features: Vec<String> = location
            .features
            .keys()
            .map(|feature| feature.to_ascii_uppercase())
            .collect();
        let mut prop = Property::uri(names::CONFERENCE, location.uri.as_str())
            .with_param(Parameter::value_type("URI"))
            .with_param(Parameter::jsid(id.as_str()))
            .with_opt_param(param_names::LABEL, location.name());
        if !features.is_empty() {
            prop = prop.with_param(Parameter::with_values(param_names::FEATURE, features));
        }
        asm.add(prop);
    }
    asm.mark_if("virtualLocations", covered);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_values() {
        assert_eq!(geo_value("geo:48.2,16.37").as_deref(), Some("48.2;16.37"));
        assert_eq!(geo_value("geo:48.2,16.37;u=35"), None);
        assert_eq!(geo_value("https://example.com"), None);
    }
}
