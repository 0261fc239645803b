//! iCalendar component types (RFC 5545 §3.4-3.6).

use std::cmp::Ordering;

use super::Property;

/// Component kind for iCalendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VCALENDAR wrapper component.
    Calendar,
    /// VEVENT component.
    Event,
    /// VTODO component.
    Todo,
    /// VJOURNAL component.
    Journal,
    /// VFREEBUSY component.
    FreeBusy,
    /// VTIMEZONE component.
    Timezone,
    /// VALARM component (nested within VEVENT/VTODO).
    Alarm,
    /// STANDARD sub-component of VTIMEZONE.
    Standard,
    /// DAYLIGHT sub-component of VTIMEZONE.
    Daylight,
    /// Unknown/X-component.
    Unknown,
}

impl ComponentKind {
    /// Returns the string name for this component kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "VCALENDAR",
            Self::Event => "VEVENT",
            Self::Todo => "VTODO",
            Self::Journal => "VJOURNAL",
            Self::FreeBusy => "VFREEBUSY",
            Self::Timezone => "VTIMEZONE",
            Self::Alarm => "VALARM",
            Self::Standard => "STANDARD",
            Self::Daylight => "DAYLIGHT",
            Self::Unknown => "X-UNKNOWN",
        }
    }

    /// Parses a component kind from a string (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "VCALENDAR" => Self::Calendar,
            "VEVENT" => Self::Event,
            "VTODO" => Self::Todo,
            "VJOURNAL" => Self::Journal,
            "VFREEBUSY" => Self::FreeBusy,
            "VTIMEZONE" => Self::Timezone,
            "VALARM" => Self::Alarm,
            "STANDARD" => Self::Standard,
            "DAYLIGHT" => Self::Daylight,
            _ => Self::Unknown,
        }
    }

    /// Position of this kind in canonical child ordering.
    const fn sort_rank(self) -> u8 {
        match self {
            Self::Timezone => 0,
            Self::Event => 1,
            Self::Todo => 2,
            Self::Journal => 3,
            Self::FreeBusy => 4,
            Self::Standard => 5,
            Self::Daylight => 6,
            Self::Alarm => 7,
            Self::Calendar | Self::Unknown => 8,
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An iCalendar component.
///
/// Components hold properties and nested sub-components: a VCALENDAR
/// contains VEVENTs, which may contain VALARMs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    /// Component type/name.
    pub kind: Option<ComponentKind>,
    /// Original component name (preserved for X-components).
    pub name: String,
    /// Properties in order of appearance.
    pub properties: Vec<Property>,
    /// Nested sub-components.
    pub children: Vec<Component>,
}

impl Component {
    /// Creates a new component with the given kind.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind: Some(kind),
            name: kind.as_str().to_string(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a new component with a custom name (for X-components).
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        let name = name.into().to_ascii_uppercase();
        Self {
            kind: Some(ComponentKind::parse(&name)),
            name,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn calendar() -> Self {
        Self::new(ComponentKind::Calendar)
    }

    #[must_use]
    pub fn event() -> Self {
        Self::new(ComponentKind::Event)
    }

    #[must_use]
    pub fn todo() -> Self {
        Self::new(ComponentKind::Todo)
    }

    #[must_use]
    pub fn timezone() -> Self {
        Self::new(ComponentKind::Timezone)
    }

    #[must_use]
    pub fn alarm() -> Self {
        Self::new(ComponentKind::Alarm)
    }

    #[must_use]
    pub fn standard() -> Self {
        Self::new(ComponentKind::Standard)
    }

    #[must_use]
    pub fn daylight() -> Self {
        Self::new(ComponentKind::Daylight)
    }

    /// Returns whether this component is of the given kind.
    #[must_use]
    pub fn is(&self, kind: ComponentKind) -> bool {
        self.kind == Some(kind)
    }

    /// Adds a property to this component.
    pub fn add_property(&mut self, prop: Property) {
        self.properties.push(prop);
    }

    /// Replaces every property named like `prop` with `prop`.
    pub fn set_property(&mut self, prop: Property) {
        self.remove_properties(&prop.name);
        self.properties.push(prop);
    }

    /// Removes all properties with the given name, returning them.
    pub fn remove_properties(&mut self, name: &str) -> Vec<Property> {
        let (removed, kept) = std::mem::take(&mut self.properties)
            .into_iter()
            .partition(|p| p.name.eq_ignore_ascii_case(name));
        self.properties = kept;
        removed
    }

    /// Adds a child component.
    pub fn add_child(&mut self, child: Component) {
        self.children.push(child);
    }

    /// Returns the first property with the given name.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Returns all properties with the given name.
    #[must_use]
    pub fn get_properties(&self, name: &str) -> Vec<&Property> {
        self.properties
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name))
            .collect()
    }

    /// Returns the text value of the first property with the given name.
    #[must_use]
    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.get_property(name)?.as_text()
    }

    /// Returns the UID property value if present.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.text_of("UID")
    }

    /// Returns the SUMMARY property value if present.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.text_of("SUMMARY")
    }

    /// Returns the DESCRIPTION property value if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.text_of("DESCRIPTION")
    }

    /// Returns children of a specific kind.
    #[must_use]
    pub fn children_of_kind(&self, kind: ComponentKind) -> Vec<&Component> {
        self.children.iter().filter(|c| c.is(kind)).collect()
    }

    #[must_use]
    pub fn events(&self) -> Vec<&Component> {
        self.children_of_kind(ComponentKind::Event)
    }

    #[must_use]
    pub fn todos(&self) -> Vec<&Component> {
        self.children_of_kind(ComponentKind::Todo)
    }

    #[must_use]
    pub fn timezones(&self) -> Vec<&Component> {
        self.children_of_kind(ComponentKind::Timezone)
    }

    #[must_use]
    pub fn alarms(&self) -> Vec<&Component> {
        self.children_of_kind(ComponentKind::Alarm)
    }

    /// Sorts children canonically, recursively: time zones first, then
    /// events, to-dos and the rest; same-kind components by UID then
    /// RECURRENCE-ID. The sort is stable so unrelated children keep their
    /// relative order.
    pub fn sort_children(&mut self) {
        self.children.sort_by(cmp_canonical);
        for child in &mut self.children {
            child.sort_children();
        }
    }
}

fn cmp_canonical(a: &Component, b: &Component) -> Ordering {
    let rank = |c: &Component| c.kind.unwrap_or(ComponentKind::Unknown).sort_rank();
    rank(a).cmp(&rank(b)).then_with(|| {
        if matches!(a.kind, Some(ComponentKind::Timezone)) {
            return a.text_of("TZID").cmp(&b.text_of("TZID"));
        }
        if !matches!(
            a.kind,
            Some(ComponentKind::Event | ComponentKind::Todo | ComponentKind::Journal)
        ) {
            return Ordering::Equal;
        }
        a.uid().unwrap_or("").cmp(b.uid().unwrap_or("")).then_with(|| {
            let recur = |c: &Component| {
                c.get_property("RECURRENCE-ID")
                    .map_or(String::new(), |p| p.raw_value.clone())
            };
            recur(a).cmp(&recur(b))
        })
    })
}

/// Top-level iCalendar object.
///
/// Convenience wrapper around a VCALENDAR component.
#[derive(Debug, Clone, PartialEq)]
pub struct ICalendar {
    /// The root VCALENDAR component.
    pub root: Component,
}

impl ICalendar {
    /// Creates a new empty iCalendar with required properties.
    #[must_use]
    pub fn new(prodid: impl Into<String>) -> Self {
        let mut root = Component::calendar();
        root.add_property(Property::text("VERSION", "2.0"));
        root.add_property(Property::text("PRODID", prodid));
        Self { root }
    }

    /// Creates an iCalendar without any calendar-level property.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            root: Component::calendar(),
        }
    }

    #[must_use]
    pub fn prodid(&self) -> Option<&str> {
        self.root.text_of("PRODID")
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.root.text_of("VERSION")
    }

    /// Returns the scheduling METHOD, if any.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.root.text_of("METHOD")
    }

    /// Sets the scheduling METHOD.
    pub fn set_method(&mut self, method: impl Into<String>) {
        self.root
            .set_property(Property::text("METHOD", method.into().to_ascii_uppercase()));
    }

    /// Returns the CALSCALE value (defaults to "GREGORIAN").
    #[must_use]
    pub fn calscale(&self) -> &str {
        self.root.text_of("CALSCALE").unwrap_or("GREGORIAN")
    }

    pub fn add_event(&mut self, event: Component) {
        self.root.add_child(event);
    }

    pub fn add_todo(&mut self, todo: Component) {
        self.root.add_child(todo);
    }

    pub fn add_timezone(&mut self, tz: Component) {
        self.root.add_child(tz);
    }

    #[must_use]
    pub fn events(&self) -> Vec<&Component> {
        self.root.events()
    }

    #[must_use]
    pub fn todos(&self) -> Vec<&Component> {
        self.root.todos()
    }

    #[must_use]
    pub fn timezones(&self) -> Vec<&Component> {
        self.root.timezones()
    }

    /// Returns the VTIMEZONE with the given TZID.
    #[must_use]
    pub fn timezone(&self, tzid: &str) -> Option<&Component> {
        self.root
            .timezones()
            .into_iter()
            .find(|tz| tz.text_of("TZID") == Some(tzid))
    }

    /// Sorts the whole calendar into canonical component order.
    pub fn sort_components(&mut self) {
        self.root.sort_children();
    }

    /// Returns all unique UIDs in this calendar.
    #[must_use]
    pub fn uids(&self) -> Vec<&str> {
        let mut uids: Vec<&str> = self.root.children.iter().filter_map(Component::uid).collect();
        uids.sort_unstable();
        uids.dedup();
        uids
    }
}

impl Default for ICalendar {
    fn default() -> Self {
        Self::new("-//jscal//jscal//EN")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_kind_parse() {
        assert_eq!(ComponentKind::parse("VEVENT"), ComponentKind::Event);
        assert_eq!(ComponentKind::parse("vtodo"), ComponentKind::Todo);
        assert_eq!(ComponentKind::parse("X-CUSTOM"), ComponentKind::Unknown);
    }

    #[test]
    fn icalendar_new() {
        let ical = ICalendar::new("-//Test//Test//EN");
        assert_eq!(ical.version(), Some("2.0"));
        assert_eq!(ical.prodid(), Some("-//Test//Test//EN"));
        assert_eq!(ical.calscale(), "GREGORIAN");
        assert_eq!(ical.method(), None);
    }

    #[test]
    fn set_method_replaces() {
        let mut ical = ICalendar::default();
        ical.set_method("publish");
        ical.set_method("request");
        assert_eq!(ical.method(), Some("REQUEST"));
        assert_eq!(ical.root.get_properties("METHOD").len(), 1);
    }

    #[test]
    fn set_and_remove_properties() {
        let mut event = Component::event();
        event.add_property(Property::text("CATEGORIES", "a"));
        event.add_property(Property::text("CATEGORIES", "b"));
        event.set_property(Property::text("categories", "c"));
        assert_eq!(event.get_properties("CATEGORIES").len(), 1);
        assert_eq!(event.text_of("CATEGORIES"), Some("c"));

        let removed = event.remove_properties("CATEGORIES");
        assert_eq!(removed.len(), 1);
        assert!(event.get_property("CATEGORIES").is_none());
    }

    #[test]
    fn sort_components_puts_timezones_first() {
        let mut ical = ICalendar::default();

        let mut todo = Component::todo();
        todo.add_property(Property::text("UID", "a"));
        ical.add_todo(todo);

        let mut event2 = Component::event();
        event2.add_property(Property::text("UID", "z"));
        ical.add_event(event2);

        let mut event1 = Component::event();
        event1.add_property(Property::text("UID", "b"));
        ical.add_event(event1);

        let mut tz = Component::timezone();
        tz.add_property(Property::text("TZID", "Europe/Vienna"));
        ical.add_timezone(tz);

        ical.sort_components();

        let order: Vec<_> = ical
            .root
            .children
            .iter()
            .map(|c| (c.name.as_str(), c.uid().or_else(|| c.text_of("TZID"))))
            .collect();
        assert_eq!(
            order,
            vec![
                ("VTIMEZONE", Some("Europe/Vienna")),
                ("VEVENT", Some("b")),
                ("VEVENT", Some("z")),
                ("VTODO", Some("a")),
            ]
        );
    }

    #[test]
    fn timezone_lookup() {
        let mut ical = ICalendar::default();
        let mut tz = Component::timezone();
        tz.add_property(Property::text("TZID", "/custom"));
        ical.add_timezone(tz);

        assert!(ical.timezone("/custom").is_some());
        assert!(ical.timezone("Europe/Vienna").is_none());
    }
}
