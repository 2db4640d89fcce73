use std::cell::RefCell;
use std::rc::Rc;

use chrono::{Local, TimeZone};
use workout_tracker::{Exercise, Set, StoreEvent, Workout, WorkoutError, WorkoutStore};

fn workout(name: &str, reps: u32, weight: f64) -> Workout {
    let set = Set::new(reps, weight).unwrap();
    Workout::new(vec![Exercise::new(name, vec![set]).unwrap()])
}

fn store_with(names: &[&str]) -> WorkoutStore {
    let mut store = WorkoutStore::new();
    for name in names {
        store.add_workout(workout(name, 5, 100.0));
    }
    store
}

fn first_exercise(store: &WorkoutStore, index: usize) -> String {
    store.list_workouts()[index].exercises()[0].name().to_string()
}

#[test]
fn bench_press_scenario() {
    let mut store = WorkoutStore::new();
    assert!(store.is_empty());

    let set = Set::parse("10", "135.0").unwrap();
    let exercise = Exercise::new("Bench Press", vec![set]).unwrap();
    store.add_workout(Workout::new(vec![exercise]));

    let workouts = store.list_workouts();
    assert_eq!(workouts.len(), 1);
    let exercises = workouts[0].exercises();
    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0].name(), "Bench Press");
    assert_eq!(exercises[0].sets().len(), 1);
    assert_eq!(exercises[0].sets()[0].reps(), 10);
    assert_eq!(exercises[0].sets()[0].weight(), 135.0);
}

#[test]
fn add_appends_at_end() {
    let mut store = store_with(&["Squat", "Row"]);
    let extra = workout("Deadlift", 3, 315.0);
    let id = extra.id();

    store.add_workout(extra);
    assert_eq!(store.len(), 3);
    assert_eq!(store.list_workouts()[2].id(), id);
    assert_eq!(first_exercise(&store, 0), "Squat");
    assert_eq!(first_exercise(&store, 1), "Row");
}

#[test]
fn re_adding_same_id_keeps_ids_unique() {
    let mut store = WorkoutStore::new();
    let original = workout("Squat", 5, 185.0);
    store.add_workout(original.clone());
    store.add_workout(original);
    assert_eq!(store.len(), 1);
}

#[test]
fn delete_at_middle_preserves_order() {
    let mut store = store_with(&["A", "B", "C"]);
    let removed = store.delete_workout_at(1).unwrap();

    assert_eq!(removed.exercises()[0].name(), "B");
    assert_eq!(store.len(), 2);
    assert_eq!(first_exercise(&store, 0), "A");
    assert_eq!(first_exercise(&store, 1), "C");
}

#[test]
fn delete_at_out_of_range_leaves_store_unchanged() {
    let mut store = store_with(&["A", "B", "C"]);
    let before = store.list_workouts().to_vec();

    let err = store.delete_workout_at(3).unwrap_err();
    assert_eq!(err, WorkoutError::IndexOutOfRange { index: 3, len: 3 });
    assert!(store.delete_workout_at(usize::MAX).is_err());
    assert_eq!(store.list_workouts(), before.as_slice());

    let mut empty = WorkoutStore::new();
    assert!(matches!(
        empty.delete_workout_at(0),
        Err(WorkoutError::IndexOutOfRange { index: 0, len: 0 })
    ));
}

#[test]
fn delete_by_workout_matches_id() {
    let mut store = store_with(&["A", "B"]);
    let target = store.list_workouts()[0].clone();

    let removed = store.delete_workout(&target).unwrap();
    assert_eq!(removed.id(), target.id());
    assert_eq!(store.len(), 1);
    assert_eq!(first_exercise(&store, 0), "B");

    assert!(store.delete_workout(&target).is_none());
    assert_eq!(store.len(), 1);
}

#[test]
fn invalid_input_never_reaches_store() {
    let mut store = WorkoutStore::new();
    let events = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&events);
    store.subscribe(move |_| *counter.borrow_mut() += 1);

    let result = Set::parse("abc", "10");
    assert!(matches!(
        result,
        Err(WorkoutError::InvalidInput { field: "Reps", .. })
    ));
    assert!(store.is_empty());
    assert_eq!(*events.borrow(), 0);
}

#[test]
fn replace_keeps_position() {
    let mut store = store_with(&["A", "B", "C"]);
    let id = store.list_workouts()[1].id();
    let date = store.list_workouts()[1].date();

    let mut draft = workout_tracker::WorkoutDraft::from_workout(&store.list_workouts()[1]);
    draft.add_set("Curl", Set::new(12, 30.0).unwrap()).unwrap();
    store.replace_workout(draft.finish().unwrap()).unwrap();

    assert_eq!(store.len(), 3);
    let edited = &store.list_workouts()[1];
    assert_eq!(edited.id(), id);
    assert_eq!(edited.date(), date);
    assert_eq!(edited.exercises().len(), 2);
    assert_eq!(store.position(id), Some(1));
}

#[test]
fn replace_unknown_workout_fails() {
    let mut store = store_with(&["A"]);
    let stranger = workout("B", 1, 1.0);
    assert!(matches!(
        store.replace_workout(stranger),
        Err(WorkoutError::InvalidInput { .. })
    ));
    assert_eq!(first_exercise(&store, 0), "A");
}

#[test]
fn observers_see_every_mutation_until_unsubscribed() {
    let mut store = WorkoutStore::new();
    let seen: Rc<RefCell<Vec<StoreEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = store.subscribe(move |event| sink.borrow_mut().push(*event));

    let first = workout("A", 1, 1.0);
    let first_id = first.id();
    store.add_workout(first);
    let second = workout("B", 2, 2.0);
    let second_id = second.id();
    store.add_workout(second);
    store.delete_workout_at(0).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            StoreEvent::Added {
                id: first_id,
                index: 0
            },
            StoreEvent::Added {
                id: second_id,
                index: 1
            },
            StoreEvent::Deleted {
                id: first_id,
                index: 0
            },
        ]
    );

    assert!(store.delete_workout_by_id(first_id).is_none());
    assert_eq!(seen.borrow().len(), 4);
    assert_eq!(seen.borrow()[3], StoreEvent::Unchanged { id: first_id });

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    store.add_workout(workout("C", 3, 3.0));
    assert_eq!(seen.borrow().len(), 4);
}

#[test]
fn workout_date_defaults_to_now_and_can_be_set() {
    let before = Local::now();
    let fresh = workout("A", 1, 1.0);
    assert!(fresh.date() >= before);

    let date = Local.with_ymd_and_hms(2024, 9, 6, 7, 30, 0).unwrap();
    let dated = Workout::with_date(vec![], date);
    assert_eq!(dated.date_label(), "Sep 6, 2024");
    assert_eq!(dated.to_string(), "Sep 6, 2024");
}

#[test]
fn deleting_unknown_workout_still_notifies() {
    let mut store = store_with(&["A", "B"]);
    let seen: Rc<RefCell<Vec<StoreEvent>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |event| sink.borrow_mut().push(*event));

    let stranger = workout("Z", 1, 1.0);
    assert!(store.delete_workout(&stranger).is_none());

    assert_eq!(store.len(), 2);
    assert_eq!(
        *seen.borrow(),
        vec![StoreEvent::Unchanged { id: stranger.id() }]
    );
    assert_eq!(seen.borrow()[0].id(), stranger.id());
}

#[test]
fn empty_workouts_and_exercises_are_accepted() {
    let mut store = WorkoutStore::new();
    store.add_workout(Workout::new(vec![]));
    store.add_workout(Workout::new(vec![Exercise::new("Plank", vec![]).unwrap()]));

    assert_eq!(store.len(), 2);
    assert_eq!(store.list_workouts()[0].total_sets(), 0);
    assert!(store.list_workouts()[1].exercises()[0].sets().is_empty());
    assert!(store.list_workouts()[1].summary().ends_with("1 exercise, 0 sets"));
}
