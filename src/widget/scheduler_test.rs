use super::*;

use std::cell::RefCell;
use std::rc::Rc;

fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let make = move |label: &'static str| -> Task {
        let sink = Rc::clone(&sink);
        Box::new(move || sink.borrow_mut().push(label))
    };
    (log, make)
}

#[test]
fn task_does_not_run_before_deadline() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    let _handle = scheduler.schedule(Duration::from_millis(1000), task("a"));

    assert_eq!(scheduler.advance(Duration::from_millis(999)), 0);
    assert!(log.borrow().is_empty());
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn task_runs_once_at_deadline() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    let _handle = scheduler.schedule(Duration::from_millis(1000), task("a"));

    assert_eq!(scheduler.advance(Duration::from_millis(1000)), 1);
    assert_eq!(scheduler.advance(Duration::from_millis(5000)), 0);
    assert_eq!(*log.borrow(), vec!["a"]);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn tasks_run_in_deadline_then_submission_order() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    let _late = scheduler.schedule(Duration::from_millis(30), task("late"));
    let _first = scheduler.schedule(Duration::from_millis(10), task("first"));
    let _second = scheduler.schedule(Duration::from_millis(10), task("second"));

    assert_eq!(scheduler.advance(Duration::from_millis(100)), 3);
    assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
}

#[test]
fn advance_moves_clock_to_target() {
    let scheduler = ManualScheduler::new();
    scheduler.advance(Duration::from_millis(250));
    scheduler.advance(Duration::from_millis(250));
    assert_eq!(scheduler.now(), Duration::from_millis(500));
}

#[test]
fn delay_is_relative_to_current_time() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    scheduler.advance(Duration::from_millis(400));
    let _handle = scheduler.schedule(Duration::from_millis(100), task("a"));

    assert_eq!(scheduler.advance(Duration::from_millis(99)), 0);
    assert_eq!(scheduler.advance(Duration::from_millis(1)), 1);
    assert_eq!(*log.borrow(), vec!["a"]);
}

#[test]
fn advance_saturates_instead_of_overflowing() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    scheduler.advance(Duration::from_millis(10));
    let _handle = scheduler.schedule(Duration::MAX, task("far"));

    assert_eq!(scheduler.advance(Duration::MAX), 1);
    assert_eq!(scheduler.now(), Duration::MAX);
    assert_eq!(scheduler.advance(Duration::from_millis(1)), 0);
    assert_eq!(*log.borrow(), vec!["far"]);
}

#[test]
fn cancelled_task_never_runs() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    let handle = scheduler.schedule(Duration::from_millis(10), task("a"));
    handle.cancel();

    assert_eq!(scheduler.pending(), 0);
    assert_eq!(scheduler.advance(Duration::from_millis(10)), 0);
    assert!(log.borrow().is_empty());
}

#[test]
fn detached_task_still_runs() {
    let scheduler = ManualScheduler::new();
    let (log, task) = recorder();
    scheduler.schedule(Duration::from_millis(10), task("a")).detach();

    scheduler.advance(Duration::from_millis(10));
    assert_eq!(*log.borrow(), vec!["a"]);
}

#[test]
fn cancel_after_run_is_noop() {
    let scheduler = ManualScheduler::new();
    let (_log, task) = recorder();
    let handle = scheduler.schedule(Duration::ZERO, task("a"));
    scheduler.advance(Duration::ZERO);
    handle.cancel();
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn task_scheduled_while_advancing_runs_if_due() {
    let scheduler = ManualScheduler::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let inner_scheduler = scheduler.clone();
    let inner_log = Rc::clone(&log);
    scheduler
        .schedule(
            Duration::from_millis(10),
            Box::new(move || {
                inner_log.borrow_mut().push("outer");
                let nested_log = Rc::clone(&inner_log);
                inner_scheduler
                    .schedule(Duration::from_millis(10), Box::new(move || nested_log.borrow_mut().push("nested")))
                    .detach();
            }),
        )
        .detach();

    assert_eq!(scheduler.advance(Duration::from_millis(20)), 2);
    assert_eq!(*log.borrow(), vec!["outer", "nested"]);
}
