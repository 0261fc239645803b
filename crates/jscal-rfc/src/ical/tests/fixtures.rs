//! Sample documents shared by the scenario tests.

pub const RECURRING_WITH_EXCEPTIONS: &str = "\
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
ATTENDEE;CN=\"Doe, John\";ROLE=REQ-PARTICIPANT;PARTSTAT=NEEDS-ACTION;RSVP=TRUE:mailto:john@example.com\r
PERCENT-COMPLETE:40\r
STATUS:IN-PROCESS\r
END:VTODO\r
END:VCALENDAR\r
";
