//! Calendars shared by the mapping scenarios.

pub const WEEKLY_WITH_EXCEPTIONS: &str = "\
BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example Corp.//Calendar 1.0//EN\r
METHOD:PUBLISH\r
BEGIN:VTIMEZONE\r
TZID:America/New_York\r
BEGIN:DAYLIGHT\r
DTSTART:20070311T020000\r
TZOFFSETFROM:-0500\r
TZOFFSETTO:-0400\r
RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=2SU\r
TZNAME:EDT\r
END:DAYLIGHT\r
BEGIN:STANDARD\r
DTSTART:20071104T020000\r
TZOFFSETFROM:-0400\r
TZOFFSETTO:-0500\r
RRULE:FREQ=YEARLY;BYMONTH=11;BYDAY=1SU\r
TZNAME:EST\r
END:STANDARD\r
END:VTIMEZONE\r
BEGIN:VEVENT\r
UID:weekly@example.com\r
DTSTAMP:20260101T000000Z\r
DTSTART;TZID=America/New_York:20260105T090000\r
DURATION:PT1H\r
RRULE:FREQ=WEEKLY;BYDAY=MO;COUNT=10\r
EXDATE;TZID=America/New_York:20260112T090000,20260119T090000\r
SUMMARY:Weekly sync\r
BEGIN:VALARM\r
ACTION:DISPLAY\r
TRIGGER:-PT10M\r
DESCRIPTION:Reminder\r
END:VALARM\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:weekly@example.com\r
DTSTAMP:20260101T000000Z\r
RECURRENCE-ID;TZID=America/New_York:20260126T090000\r
DTSTART;TZID=America/New_York:20260126T100000\r
DURATION:PT1H\r
SUMMARY:Weekly sync (moved)\r
BEGIN:VALARM\r
ACTION:DISPLAY\r
TRIGGER:-PT10M\r
DESCRIPTION:Reminder\r
END:VALARM\r
END:VEVENT\r
END:VCALENDAR\r
";

pub const TODO_WITH_ATTENDEES: &str = "\
BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example Corp.//Calendar 1.0//EN\r
BEGIN:VTODO\r
UID:todo-1@example.com\r
DTSTAMP:20260101T000000Z\r
DUE;VALUE=DATE:20260301\r
SUMMARY:File taxes\r
CATEGORIES:FINANCE,PERSONAL\r
ORGANIZER;CN=Jane Doe:mailto:jane@example.com\r
ATTENDEE;CN=\"Doe, John\";ROLE=CHAIR;PARTSTAT=NEEDS-ACTION;RSVP=TRUE:mailto:john@example.com\r
ATTENDEE;CN=Ann;DELEGATED-FROM=\"mailto:john@example.com\":mailto:ann@example.com\r
PERCENT-COMPLETE:40\r
STATUS:IN-PROCESS\r
END:VTODO\r
END:VCALENDAR\r
";

pub const ALARMS: &str = "\
BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example Corp.//Calendar 1.0//EN\r
BEGIN:VEVENT\r
UID:alarms@example.com\r
DTSTAMP:20260101T000000Z\r
DTSTART:20260301T090000Z\r
DTEND:20260301T093000Z\r
BEGIN:VALARM\r
ACTION:DISPLAY\r
TRIGGER;RELATED=END:PT5M\r
DESCRIPTION:After\r
END:VALARM\r
BEGIN:VALARM\r
UID:mail\r
ACTION:EMAIL\r
TRIGGER;VALUE=DATE-TIME:20260301T080000Z\r
SUMMARY:Soon\r
DESCRIPTION:Soon\r
ACKNOWLEDGED:20260301T080100Z\r
END:VALARM\r
END:VEVENT\r
END:VCALENDAR\r
";

pub const CUSTOM_ZONE: &str = "\
BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example Corp.//Calendar 1.0//EN\r
BEGIN:VTIMEZONE\r
TZID:/example/Fixed\r
BEGIN:STANDARD\r
DTSTART:19700101T000000\r
TZOFFSETFROM:+0100\r
TZOFFSETTO:+0100\r
TZNAME:FIX\r
END:STANDARD\r
END:VTIMEZONE\r
BEGIN:VTIMEZONE\r
BEGIN:STANDARD\r
DTSTART:19700101T000000\r
TZOFFSETFROM:+0200\r
TZOFFSETTO:+0200\r
END:STANDARD\r
END:VTIMEZONE\r
BEGIN:VEVENT\r
UID:zoned@example.com\r
DTSTAMP:20260101T000000Z\r
DTSTART;TZID=/example/Fixed:20260301T090000\r
SUMMARY:Fixed offset\r
END:VEVENT\r
END:VCALENDAR\r
";

pub const ONLY_ZONES: &str = "\
BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example Corp.//Calendar 1.0//EN\r
BEGIN:VTIMEZONE\r
TZID:/example/Fixed\r
BEGIN:STANDARD\r
DTSTART:19700101T000000\r
TZOFFSETFROM:+0100\r
TZOFFSETTO:+0100\r
END:STANDARD\r
END:VTIMEZONE\r
END:VCALENDAR\r
";

pub const LINKS_AND_PLACES: &str = "\
BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Example Corp.//Calendar 1.0//EN\r
BEGIN:VEVENT\r
UID:places@example.com\r
DTSTAMP:20260101T000000Z\r
DTSTART:20260301T090000Z\r
LINK;REL=DESCRIBEDBY;LABEL=Agenda;FMTTYPE=text/html;SIZE=2048:https://example.com/agenda\r
GEO:48.2082;16.3738\r
CONFERENCE;VALUE=URI;FEATURE=AUDIO,VIDEO;LABEL=Call:https://meet.example.com/x\r
END:VEVENT\r
END:VCALENDAR\r
";
