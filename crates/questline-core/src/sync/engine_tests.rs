use chrono::{DateTime, Duration, Utc};
use std::cell::RefCell;
use std::collections::HashMap;

use super::engine::{merge_collection, merge_profiles, merge_snapshots, SyncEngine};
use super::queue::SyncQueue;
use super::remote::RemoteStore;
use super::types::{DispatchMode, Domain, Snapshot, SyncEnvelope, SyncError};
use crate::config::ScoringConfig;
use crate::events::PullAction;
use crate::model::{Category, Task, Workout};
use crate::profile::Profile;
use crate::store::{LocalStore, NewTask, NewWorkout};

/// In-memory remote with one envelope slot per domain.
#[derive(Default)]
struct FakeRemote {
    slots: RefCell<HashMap<Domain, SyncEnvelope>>,
    publishes: RefCell<Vec<Snapshot>>,
    beacons: RefCell<Vec<Domain>>,
    fail_publish: RefCell<bool>,
}

impl FakeRemote {
    fn seed(&self, snapshot: Snapshot, updated_at: DateTime<Utc>) {
        self.slots.borrow_mut().insert(
            snapshot.domain,
            SyncEnvelope {
                data: snapshot,
                updated_at,
            },
        );
    }

    fn publish_count(&self) -> usize {
        self.publishes.borrow().len()
    }
}

impl RemoteStore for FakeRemote {
    fn fetch(&self, domain: Domain) -> Result<SyncEnvelope, SyncError> {
        self.slots
            .borrow()
            .get(&domain)
            .cloned()
            .ok_or(SyncError::RemoteStatus { status: 404 })
    }

    fn publish(&self, domain: Domain, snapshot: &Snapshot) -> Result<DateTime<Utc>, SyncError> {
        if *self.fail_publish.borrow() {
            return Err(SyncError::RemoteStatus { status: 503 });
        }
        let server_ts = Utc::now();
        self.publishes.borrow_mut().push(snapshot.clone());
        self.slots.borrow_mut().insert(
            domain,
            SyncEnvelope {
                data: snapshot.clone(),
                updated_at: server_ts,
            },
        );
        Ok(server_ts)
    }

    fn send_beacon(&self, domain: Domain, _snapshot: &Snapshot) {
        self.beacons.borrow_mut().push(domain);
    }
}

fn store() -> LocalStore {
    LocalStore::new(ScoringConfig::default())
}

fn task_at(id: &str, completed: bool, updated_at: DateTime<Utc>) -> Task {
    let mut task = Task::new(id, id, updated_at - Duration::days(1));
    task.completed = completed;
    task.updated_at = updated_at;
    task
}

fn workout_at(id: &str, updated_at: DateTime<Utc>) -> Workout {
    let mut workout = Workout::new(id, id, updated_at - Duration::days(1));
    workout.updated_at = updated_at;
    workout
}

#[test]
fn push_publishes_and_clears_pending() {
    let remote = FakeRemote::default();
    let engine = SyncEngine::new(remote, 10);
    let mut local = store();
    local.create_task(
        NewTask {
            title: "Task".to_string(),
            ..Default::default()
        },
        Utc::now(),
    );
    assert!(local.pending_sync(Domain::Tasks));

    engine.push(&mut local, Domain::Tasks).unwrap();
    assert!(!local.pending_sync(Domain::Tasks));
    assert!(local.last_synced_at(Domain::Tasks).is_some());
}

#[test]
fn failed_push_leaves_local_state_untouched() {
    let remote = FakeRemote::default();
    *remote.fail_publish.borrow_mut() = true;
    let engine = SyncEngine::new(remote, 10);
    let mut local = store();
    local.create_task(
        NewTask {
            title: "Task".to_string(),
            ..Default::default()
        },
        Utc::now(),
    );

    assert!(engine.push(&mut local, Domain::Tasks).is_err());
    assert!(local.pending_sync(Domain::Tasks));
    assert!(local.last_synced_at(Domain::Tasks).is_none());
    assert_eq!(local.tasks().len(), 1);
}

#[test]
fn first_pull_replaces_local_state() {
    let remote = FakeRemote::default();
    let now = Utc::now();
    let mut snapshot = Snapshot::empty(Domain::Tasks);
    snapshot.tasks.push(task_at("task-remote", false, now));
    remote.seed(snapshot, now);

    let engine = SyncEngine::new(remote, 10);
    let mut local = store();
    local.create_task(
        NewTask {
            title: "Will be replaced".to_string(),
            ..Default::default()
        },
        now,
    );

    let action = engine.pull(&mut local, Domain::Tasks, false).unwrap();
    assert_eq!(action, PullAction::Replaced);
    assert!(local.task("task-remote").is_some());
    assert_eq!(local.tasks().len(), 1);
    assert_eq!(local.last_synced_at(Domain::Tasks), Some(now));
}

#[test]
fn force_refresh_replaces_even_when_synced() {
    let remote = FakeRemote::default();
    let now = Utc::now();
    let mut snapshot = Snapshot::empty(Domain::Tasks);
    snapshot.tasks.push(task_at("task-remote", false, now));
    remote.seed(snapshot, now - Duration::hours(1));

    let engine = SyncEngine::new(remote, 10);
    let mut local = store();
    local.mark_synced(Domain::Tasks, now);

    let action = engine.pull(&mut local, Domain::Tasks, true).unwrap();
    assert_eq!(action, PullAction::Replaced);
    assert!(local.task("task-remote").is_some());
}

#[test]
fn remote_newer_and_clean_replaces() {
    let remote = FakeRemote::default();
    let now = Utc::now();
    let mut snapshot = Snapshot::empty(Domain::Tasks);
    snapshot.tasks.push(task_at("task-remote", false, now));
    remote.seed(snapshot, now);

    let engine = SyncEngine::new(remote, 10);
    let mut local = store();
    local.mark_synced(Domain::Tasks, now - Duration::hours(1));

    let action = engine.pull(&mut local, Domain::Tasks, false).unwrap();
    assert_eq!(action, PullAction::Replaced);
}

#[test]
fn remote_not_newer_is_noop() {
    let remote = FakeRemote::default();
    let now = Utc::now();
    remote.seed(Snapshot::empty(Domain::Tasks), now - Duration::hours(1));

    let engine = SyncEngine::new(remote, 10);
    let mut local = store();
    local.create_task(
        NewTask {
            title: "Kept".to_string(),
            ..Default::default()
        },
        now,
    );
    local.mark_synced(Domain::Tasks, now);
    local.mark_dirty(Domain::Tasks);

    let action = engine.pull(&mut local, Domain::Tasks, false).unwrap();
    assert_eq!(action, PullAction::NoOp);
    assert_eq!(local.tasks().len(), 1);
    // Pending changes still awaiting their push.
    assert!(local.pending_sync(Domain::Tasks));
}

#[test]
fn remote_newer_and_dirty_merges_then_pushes_back() {
    let remote = FakeRemote::default();
    let now = Utc::now();

    // Remote carries T updated at t-10 (not completed) plus its own task.
    let mut snapshot = Snapshot::empty(Domain::Tasks);
    snapshot
        .tasks
        .push(task_at("task-shared", false, now - Duration::seconds(10)));
    snapshot.tasks.push(task_at("task-remote-only", false, now));
    remote.seed(snapshot, now);

    let engine = SyncEngine::new(remote, 10);
    let mut local = store();
    // Local copy of T is newer and completed.
    let mut shared = task_at("task-shared", true, now);
    shared.awarded_xp = 10;
    let mut local_snapshot = Snapshot::empty(Domain::Tasks);
    local_snapshot.tasks.push(shared);
    local.apply_snapshot(local_snapshot);
    local.mark_synced(Domain::Tasks, now - Duration::hours(1));
    local.mark_dirty(Domain::Tasks);

    let action = engine.pull(&mut local, Domain::Tasks, false).unwrap();
    assert_eq!(action, PullAction::Merged);

    // Local-newer completion won; remote-only entity was kept.
    assert!(local.task("task-shared").unwrap().completed);
    assert!(local.task("task-remote-only").is_some());

    // The merged result was pushed so both sides converge.
    assert!(!engine.status(&local, &SyncQueue::new(3)).tasks.pending_sync);
    assert_eq!(engine.remote().publish_count(), 1);
    let published = engine.remote().publishes.borrow();
    assert!(published[0]
        .tasks
        .iter()
        .any(|t| t.id == "task-shared" && t.completed));
}

#[test]
fn sync_due_pushes_ready_domains_and_requeues_failures() {
    let remote = FakeRemote::default();
    let engine = SyncEngine::new(remote, 10);
    let mut local = store();
    let mut queue = SyncQueue::new(3);
    let now = Utc::now();

    local.create_task(
        NewTask {
            title: "Task".to_string(),
            ..Default::default()
        },
        now,
    );
    queue.schedule(Domain::Tasks, DispatchMode::Immediate, now);

    *engine.remote().fail_publish.borrow_mut() = true;
    engine.sync_due(&mut local, &mut queue, now);
    assert!(local.pending_sync(Domain::Tasks));
    assert_eq!(queue.len(), 1);
    // Requeued with the retry delay, not immediately ready.
    assert!(queue.drain_ready(now).is_empty());
    queue.requeue_after(Domain::Tasks, 0, now);

    *engine.remote().fail_publish.borrow_mut() = false;
    engine.sync_due(&mut local, &mut queue, now);
    assert!(!local.pending_sync(Domain::Tasks));
    assert!(queue.is_empty());
}

#[test]
fn flush_on_unload_beacons_only_dirty_domains() {
    let remote = FakeRemote::default();
    let engine = SyncEngine::new(remote, 10);
    let mut local = store();

    // Clean store: nothing to send.
    engine.flush_on_unload(&local);
    assert!(engine.remote().beacons.borrow().is_empty());

    local.create_task(
        NewTask {
            title: "Task".to_string(),
            ..Default::default()
        },
        Utc::now(),
    );
    engine.flush_on_unload(&local);
    assert_eq!(*engine.remote().beacons.borrow(), vec![Domain::Tasks]);
}

#[test]
fn tasks_push_leaves_unpushed_fitness_edits_pending() {
    let remote = FakeRemote::default();
    let engine = SyncEngine::new(remote, 10);
    let mut local = store();
    let now = Utc::now();
    local.create_task(
        NewTask {
            title: "Task".to_string(),
            ..Default::default()
        },
        now,
    );
    local.log_workout(
        NewWorkout {
            title: "Bench".to_string(),
            ..Default::default()
        },
        now,
    );

    engine.push(&mut local, Domain::Tasks).unwrap();
    assert!(!local.pending_sync(Domain::Tasks));
    assert!(local.pending_sync(Domain::Fitness));
    assert!(local.last_synced_at(Domain::Fitness).is_none());

    // The never-published workout still goes out with the page.
    engine.flush_on_unload(&local);
    assert_eq!(*engine.remote().beacons.borrow(), vec![Domain::Fitness]);
}

#[test]
fn fitness_pull_ignores_the_tasks_sync_watermark() {
    let remote = FakeRemote::default();
    let now = Utc::now();
    // Remote fitness state predates the tasks push this client is about to
    // make, but this client has never pulled fitness at all.
    let mut snapshot = Snapshot::empty(Domain::Fitness);
    snapshot
        .workouts
        .push(workout_at("workout-remote", now - Duration::minutes(1)));
    remote.seed(snapshot, now - Duration::minutes(1));

    let engine = SyncEngine::new(remote, 10);
    let mut local = store();
    local.create_task(
        NewTask {
            title: "Task".to_string(),
            ..Default::default()
        },
        now,
    );
    engine.push(&mut local, Domain::Tasks).unwrap();

    let action = engine.pull(&mut local, Domain::Fitness, false).unwrap();
    assert_eq!(action, PullAction::Replaced);
    assert!(local.workout("workout-remote").is_some());
}

// --- merge unit tests ---

#[test]
fn newer_local_entity_wins_merge() {
    let now = Utc::now();
    let local = vec![task_at("task-t", true, now)];
    let remote = vec![task_at("task-t", false, now - Duration::seconds(10))];

    let merged = merge_collection(&local, &remote);
    assert_eq!(merged.len(), 1);
    assert!(merged[0].completed);
}

#[test]
fn newer_remote_entity_wins_merge() {
    let now = Utc::now();
    let local = vec![task_at("task-t", false, now - Duration::seconds(10))];
    let remote = vec![task_at("task-t", true, now)];

    let merged = merge_collection(&local, &remote);
    assert!(merged[0].completed);
}

#[test]
fn equal_timestamps_keep_local() {
    let now = Utc::now();
    let local = vec![task_at("task-t", true, now)];
    let remote = vec![task_at("task-t", false, now)];

    let merged = merge_collection(&local, &remote);
    assert!(merged[0].completed);
}

#[test]
fn local_only_entity_is_treated_as_not_yet_pushed() {
    let now = Utc::now();
    let local = vec![task_at("task-local", false, now)];
    let remote = vec![task_at("task-remote", false, now)];

    let merged = merge_collection(&local, &remote);
    assert_eq!(merged.len(), 2);
}

#[test]
fn categories_resolve_to_local() {
    let local = vec![Category {
        id: "cat-1".to_string(),
        name: "Local name".to_string(),
    }];
    let remote = vec![Category {
        id: "cat-1".to_string(),
        name: "Remote name".to_string(),
    }];

    let merged = merge_collection(&local, &remote);
    assert_eq!(merged[0].name, "Local name");
}

#[test]
fn profile_with_more_completions_wins() {
    let mut local = Profile::default();
    local.lifetime_completed = 5;
    let mut remote = Profile::default();
    remote.lifetime_completed = 9;

    assert_eq!(merge_profiles(&local, &remote).lifetime_completed, 9);
    // Ties keep local.
    remote.lifetime_completed = 5;
    remote.xp = 999;
    assert_eq!(merge_profiles(&local, &remote).xp, 0);
}

#[test]
fn merge_converges_regardless_of_direction() {
    let now = Utc::now();
    let mut a = Snapshot::empty(Domain::Tasks);
    a.tasks.push(task_at("task-1", true, now));
    a.tasks.push(task_at("task-a-only", false, now));

    let mut b = Snapshot::empty(Domain::Tasks);
    b.tasks
        .push(task_at("task-1", false, now - Duration::seconds(30)));
    b.tasks.push(task_at("task-b-only", false, now));

    let ab = merge_snapshots(a.clone(), b.clone());
    let ba = merge_snapshots(b, a);

    let ids = |s: &Snapshot| s.tasks.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&ab), ids(&ba));
    // Entities with distinct timestamps resolve identically either way.
    let completed = |s: &Snapshot| s.tasks.iter().find(|t| t.id == "task-1").unwrap().completed;
    assert_eq!(completed(&ab), completed(&ba));
    assert!(completed(&ab));
}
