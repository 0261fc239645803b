//! VEVENT and VTODO specifics.

use jscal_model::{Duration, Event, LocalDateTime, Task};
use jscal_rfc::ical::core::{Component, ComponentKind, DateOrDateTime, Property, names};

use super::codes::{event_status, event_status_token, progress, progress_token};
use super::extract::{instant_of, integer_of, read_common, read_schedule, read_uid, with_extras};
use super::values::{self, Anchored, ical_duration, ical_time, local_in, model_duration};
use super::{Assembler, CalendarInfo, Mapped};
use crate::error::IcalResult;

fn date_property(component: &Component, name: &str) -> Option<DateOrDateTime> {
    component
        .get_property(name)
        .and_then(Property::as_date_or_datetime)
}

fn duration_property(component: &Component, name: &str) -> Option<Duration> {
    component
        .get_property(name)
        .and_then(Property::as_duration)
        .map(model_duration)
}

/// Length of DTSTART..DTEND: by wall clock when both share a zone (or
/// either floats), by instant otherwise.
fn span(start: &DateOrDateTime, end: &DateOrDateTime) -> Duration {
    let (from, to) = (Anchored::from(start), Anchored::from(end));
    let delta = match (&from.time_zone, &to.time_zone) {
        (Some(a), Some(b)) if a != b => values::instant_of(end) - values::instant_of(start),
        _ => to.local.naive() - from.local.naive(),
    };
    Duration::from_chrono(delta)
}

impl Mapped for Event {
    const KIND: ComponentKind = ComponentKind::Event;

    #[tracing::instrument(skip_all, fields(uid = component.uid()))]
    fn read(component: &Component, calendar: &CalendarInfo) -> IcalResult<Self> {
        let mut event = Self::new(read_uid(component));
        let start = date_property(component, names::DTSTART);
        if let Some(anchored) = start.as_ref().map(Anchored::from) {
            event.start = Some(anchored.local);
            event.schedule.time_zone = anchored.time_zone;
            event.schedule.show_without_time = anchored.date_only;
        }

        read_common(component, calendar, &mut event.common);
        let time_zone = event.schedule.time_zone.clone();
        read_schedule(component, time_zone.as_deref(), &mut event.schedule)?;
        event.schedule.status = component
            .text_of(names::STATUS)
            .and_then(event_status);

        event.duration = duration_property(component, names::DURATION).or_else(|| {
            let end = date_property(component, names::DTEND)?;
            Some(span(start.as_ref()?, &end))
        });
        with_extras(component, event)
    }

    fn write_own(&self, asm: &mut Assembler<'_>) -> IcalResult<()> {
        if let Some(start) = self.anchor() {
            asm.put("start", Property::date_or_datetime(names::DTSTART, start));
        }
        if let Some(duration) = &self.duration {
            match ical_duration(duration) {
                Some(exact) => asm.put("duration", Property::duration(names::DURATION, exact)),
                // Months and years only have a length once anchored.
                None => {
                    if let Some(end) = self.end() {
                        asm.add(Property::date_or_datetime(
                            names::DTEND,
                            ical_time(
                                end,
                                self.schedule.time_zone.as_deref(),
                                self.schedule.show_without_time,
                            ),
                        ));
                    }
                }
            }
        }
        if let Some(status) = self.schedule.status {
            asm.put("status", Property::text(names::STATUS, event_status_token(status)));
        }
        Ok(())
    }

    fn anchor(&self) -> Option<DateOrDateTime> {
        let start = self.start?;
        Some(ical_time(
            start,
            self.schedule.time_zone.as_deref(),
            self.schedule.show_without_time,
        ))
    }
}

impl Mapped for Task {
    const KIND: ComponentKind = ComponentKind::Todo;

    #[tracing::instrument(skip_all, fields(uid = component.uid()))]
    fn read(component: &Component, calendar: &CalendarInfo) -> IcalResult<Self> {
        let mut task = Self::new(read_uid(component));
        let start = date_property(component, names::DTSTART).map(|value| Anchored::from(&value));
        let due = date_property(component, names::DUE);

        // The zone comes from the start, or from the due date without one.
        let reference = start
            .clone()
            .or_else(|| due.as_ref().map(Anchored::from));
        if let Some(reference) = reference {
            task.schedule.time_zone = reference.time_zone;
            task.schedule.show_without_time = reference.date_only;
        }
        let time_zone = task.schedule.time_zone.clone();
        task.start = start.map(|anchored| anchored.local);
        task.due = due
            .as_ref()
            .map(|value| local_in(value, time_zone.as_deref()))
            .or_else(|| {
                let length = duration_property(component, names::DURATION)?;
                length.add_to(task.start?.naive()).map(LocalDateTime::new)
            });

        task.estimated_duration = duration_property(component, names::ESTIMATED_DURATION);
        task.percent_complete = integer_of(component, names::PERCENT_COMPLETE);
        task.progress_updated = instant_of(component, names::COMPLETED);
        task.progress = component.text_of(names::STATUS).and_then(progress);

        read_common(component, calendar, &mut task.common);
        read_schedule(component, time_zone.as_deref(), &mut task.schedule)?;
        with_extras(component, task)
    }

    fn write_own(&self, asm: &mut Assembler<'_>) -> IcalResult<()> {
        let time_zone = self.schedule.time_zone.as_deref();
        let date_only = self.schedule.show_without_time;
        if let Some(start) = self.start {
            asm.put(
                "start",
                Property::date_or_datetime(names::DTSTART, ical_time(start, time_zone, date_only)),
            );
        }
        if let Some(due) = self.due {
            asm.put(
                "due",
                Property::date_or_datetime(names::DUE, ical_time(due, time_zone, date_only)),
            );
        }
        if let Some(exact) = self.estimated_duration.as_ref().and_then(ical_duration) {
            asm.put(
                "estimatedDuration",
                Property::duration(names::ESTIMATED_DURATION, exact),
            );
        }
        if let Some(percent) = self.percent_complete {
            asm.put(
                "percentComplete",
                Property::integer(names::PERCENT_COMPLETE, i32::from(percent)),
            );
        }
        if let Some(completed) = &self.progress_updated {
            asm.put_instant("progressUpdated", names::COMPLETED, completed);
        }
        if let Some(progress) = self.progress {
            asm.put("progress", Property::text(names::STATUS, progress_token(progress)));
        }
        Ok(())
    }

    fn anchor(&self) -> Option<DateOrDateTime> {
        let anchor = self.start.or(self.due)?;
        Some(ical_time(
            anchor,
            self.schedule.time_zone.as_deref(),
            self.schedule.show_without_time,
        ))
    }
}
