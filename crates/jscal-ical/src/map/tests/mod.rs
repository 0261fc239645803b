mod fixtures;

use jscal_model::{Event, JsEntity, Task};

use crate::{ParseOptions, from_ics};

fn read(text: &str) -> JsEntity {
    from_ics(text, &ParseOptions::default()).unwrap()
}

fn read_event(text: &str) -> Event {
    match read(text) {
        JsEntity::Event(event) => event,
        other => panic!("expected an event, got {other:?}"),
    }
}

fn read_task(text: &str) -> Task {
    match read(text) {
        JsEntity::Task(task) => task,
        other => panic!("expected a task, got {other:?}"),
    }
}
