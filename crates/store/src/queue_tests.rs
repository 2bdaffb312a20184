// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fsq_core::test_support::{FixedHostInfo, TaskBuilder};
use fsq_core::FakeClock;
use std::collections::BTreeMap;
use tempfile::tempdir;

fn data(n: i64) -> TaskValue {
    let mut m = BTreeMap::new();
    m.insert("n".to_string(), TaskValue::Integer(n));
    TaskValue::Mapping(m)
}

fn open_queue(root: &Path, seconds: f64) -> Queue {
    Queue::with_clock_and_host(
        root,
        Arc::new(FakeClock::new(seconds)),
        Arc::new(FixedHostInfo::default()),
    )
    .unwrap_or_else(|e| panic!("open: {e}"))
}

#[test]
fn put_then_get_round_trips_task_data() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let mut queue = open_queue(dir.path(), 1_700_000_000.0);

    let result = queue
        .put(data(1), None, None)
        .unwrap_or_else(|e| panic!("put: {e}"));
    assert_eq!(result.state, State::Waiting);

    let task = queue.get().unwrap_or_else(|e| panic!("get: {e}"));
    assert_eq!(task.task_data, data(1));
}

#[test]
fn get_on_empty_queue_reports_empty() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let mut queue = open_queue(dir.path(), 1_700_000_000.0);

    let err = queue.get().unwrap_err();
    assert!(matches!(err, QueueError::Empty));
}

#[test]
fn get_while_holding_current_task_reports_current_task_unfinished() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let mut queue = open_queue(dir.path(), 1_700_000_000.0);
    queue.put(data(1), None, None).unwrap_or_else(|e| panic!("put: {e}"));
    queue.get().unwrap_or_else(|e| panic!("get: {e}"));

    let err = queue.get().unwrap_err();
    assert!(matches!(err, QueueError::CurrentTaskUnfinished));
}

#[test]
fn task_done_without_a_current_task_reports_no_current_task() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let mut queue = open_queue(dir.path(), 1_700_000_000.0);

    let err = queue.task_done().unwrap_err();
    assert!(matches!(err, QueueError::NoCurrentTask));
}

#[test]
fn task_done_moves_task_to_done_directory() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let mut queue = open_queue(dir.path(), 1_700_000_000.0);
    queue.put(data(1), None, None).unwrap_or_else(|e| panic!("put: {e}"));
    let task = queue.get().unwrap_or_else(|e| panic!("get: {e}"));
    let name = task.instance_filename();

    queue.task_done().unwrap_or_else(|e| panic!("task_done: {e}"));

    assert!(queue.layout().state_dir(State::Done).join(&name).exists());
    assert!(!queue.layout().state_dir(State::Running).join(&name).exists());
}

#[test]
fn task_failed_lets_caller_record_execution_info() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let mut queue = open_queue(dir.path(), 1_700_000_000.0);
    queue.put(data(1), None, None).unwrap_or_else(|e| panic!("put: {e}"));
    queue.get().unwrap_or_else(|e| panic!("get: {e}"));

    queue
        .task_failed(|task| {
            task.execution_info = Some(TaskValue::String("boom".to_string()));
        })
        .unwrap_or_else(|e| panic!("task_failed: {e}"));

    let names = list_names_by_ctime_desc(queue.layout(), State::Failed)
        .unwrap_or_else(|e| panic!("list: {e}"));
    assert_eq!(names.len(), 1);
    let stored = read_task(queue.layout(), State::Failed, &names[0])
        .unwrap_or_else(|e| panic!("read: {e}"));
    assert_eq!(
        stored.execution_info,
        Some(TaskValue::String("boom".to_string()))
    );
}

#[test]
fn task_locked_moves_current_task_to_locked_with_new_dependencies() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let mut queue = open_queue(dir.path(), 1_700_000_000.0);
    queue.put(data(1), None, None).unwrap_or_else(|e| panic!("put: {e}"));
    queue.get().unwrap_or_else(|e| panic!("get: {e}"));

    queue
        .task_locked(vec![data(2)])
        .unwrap_or_else(|e| panic!("task_locked: {e}"));

    let names = list_names_by_ctime_desc(queue.layout(), State::Locked)
        .unwrap_or_else(|e| panic!("list: {e}"));
    assert_eq!(names.len(), 1);
}

#[test]
fn put_with_dependencies_routes_to_locked() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let queue = open_queue(dir.path(), 1_700_000_000.0);

    let result = queue
        .put(data(1), None, Some(vec![data(2)]))
        .unwrap_or_else(|e| panic!("put: {e}"));
    assert_eq!(result.state, State::Locked);
}

#[test]
fn put_with_empty_dependency_list_still_routes_to_locked() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let mut queue = open_queue(dir.path(), 1_700_000_000.0);

    // Only `depends_on: None` goes straight to waiting/; an explicit empty
    // list is still "a dependency list" and lands in locked/ first, same as
    // the original `put`. It leaves locked/ on the very next unlock scan
    // since it has nothing to wait on.
    let result = queue
        .put(data(1), None, Some(Vec::new()))
        .unwrap_or_else(|e| panic!("put: {e}"));
    assert_eq!(result.state, State::Locked);

    let task = queue.get().unwrap_or_else(|e| panic!("get: {e}"));
    assert_eq!(task.task_data, data(1));
}

#[test]
fn duplicate_put_returns_existing_waiting_instance() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let queue = open_queue(dir.path(), 1_700_000_000.0);

    let first = queue.put(data(1), None, None).unwrap_or_else(|e| panic!("put: {e}"));
    let second = queue.put(data(1), None, None).unwrap_or_else(|e| panic!("put: {e}"));

    assert_eq!(first.path, second.path);
    assert_eq!(second.state, State::Waiting);
}

#[test]
fn duplicate_put_of_a_locked_task_gives_it_one_unlock_attempt() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let mut queue = open_queue(dir.path(), 1_700_000_000.0);

    // The dependency is submitted but not yet done, so it is genuinely
    // pending rather than merely absent.
    queue.put(data(2), None, None).unwrap_or_else(|e| panic!("dep put: {e}"));
    queue
        .put(data(1), None, Some(vec![data(2)]))
        .unwrap_or_else(|e| panic!("first put: {e}"));

    let retried = queue
        .put(data(1), None, Some(vec![data(2)]))
        .unwrap_or_else(|e| panic!("second put: {e}"));
    assert_eq!(retried.state, State::Locked);

    // Resolve the dependency and retry: this time it should unlock.
    let dep_task = queue.get().unwrap_or_else(|e| panic!("dep get: {e}"));
    assert_eq!(dep_task.task_data, data(2));
    queue.task_done().unwrap_or_else(|e| panic!("dep done: {e}"));

    let third = queue
        .put(data(1), None, Some(vec![data(2)]))
        .unwrap_or_else(|e| panic!("third put: {e}"));
    assert_eq!(third.state, State::Waiting);
}

#[test]
fn get_unlocks_locked_tasks_before_reporting_empty() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let mut queue = open_queue(dir.path(), 1_700_000_000.0);

    queue
        .put(data(2), None, None)
        .unwrap_or_else(|e| panic!("dep put: {e}"));
    let dep_task = queue.get().unwrap_or_else(|e| panic!("dep get: {e}"));
    queue.task_done().unwrap_or_else(|e| panic!("dep done: {e}"));
    let _ = dep_task;

    queue
        .put(data(1), None, Some(vec![data(2)]))
        .unwrap_or_else(|e| panic!("locked put: {e}"));

    let task = queue.get().unwrap_or_else(|e| panic!("get: {e}"));
    assert_eq!(task.task_data, data(1));
}

#[test]
fn get_newest_waiting_task_first() {
    let dir = tempdir().unwrap_or_else(|_| panic!("tempdir"));
    let queue = open_queue(dir.path(), 1_700_000_000.0);
    queue.put(data(1), None, None).unwrap_or_else(|e| panic!("put: {e}"));

    // Force distinct ctimes: write the second task slightly later.
    std::thread::sleep(std::time::Duration::from_millis(10));
    let queue2 = open_queue(dir.path(), 1_700_000_100.0);
    queue2.put(data(2), None, None).unwrap_or_else(|e| panic!("put: {e}"));

    let mut reader = open_queue(dir.path(), 1_700_000_200.0);
    let task = reader.get().unwrap_or_else(|e| panic!("get: {e}"));
    assert_eq!(task.task_data, data(2));
}
