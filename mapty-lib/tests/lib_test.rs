use anyhow::Result;
use mapty_lib::{
    AlertQueue, App, AppEvent, ConfiguredGeolocator, Coords, FormField, HeadlessMap,
    KeyValueStorage, MemoryStorage, SqliteStorage, TileLayer, WorkoutKind, WorkoutStore,
    STORAGE_KEY,
};

type TestApp<S> = App<S, HeadlessMap, AlertQueue>;

const HOME: Coords = Coords::new(51.5, -0.1);

// Helper function to create a controller over in-memory storage with a loaded map
fn create_test_app() -> TestApp<MemoryStorage> {
    create_test_app_with(MemoryStorage::new())
}

fn create_test_app_with<S: KeyValueStorage>(storage: S) -> TestApp<S> {
    let mut app = App::new(storage, AlertQueue::new(), 13);
    let loaded = app.load_map(
        HeadlessMap::default(),
        &ConfiguredGeolocator::new(Some(HOME)),
        &TileLayer::default(),
    );
    assert!(loaded);
    app
}

fn fill_form<S: KeyValueStorage>(
    app: &mut TestApp<S>,
    kind: WorkoutKind,
    distance: &str,
    duration: &str,
    metric: &str,
) {
    let form = app.form_mut();
    form.set_kind(kind);
    form.set_field(FormField::Distance, distance);
    form.set_field(FormField::Duration, duration);
    form.set_field(form.metric_field(), metric);
}

fn markers<S: KeyValueStorage>(app: &TestApp<S>) -> usize {
    app.map().map_or(0, |m| m.backend().markers.len())
}

#[test]
fn test_submit_running_workout() -> Result<()> {
    let mut app = create_test_app();
    app.handle_event(AppEvent::MapClicked(Coords::new(51.51, -0.12)));
    assert!(app.form().is_visible());

    fill_form(&mut app, WorkoutKind::Running, "5", "25", "180");
    let id = app.submit_form().expect("workout should be created");

    let workout = app.store().find_by_id(&id).unwrap();
    assert_eq!(workout.pace(), Some(5.0));
    assert_eq!(workout.coords(), Coords::new(51.51, -0.12));
    assert!(workout.describe().starts_with("Running on "));

    // Form closes and its numbers are cleared
    assert!(!app.form().is_visible());
    assert!(app.form().distance_input.is_empty());

    // Home marker + workout marker
    assert_eq!(markers(&app), 2);
    let marker = &app.map().unwrap().backend().markers[1];
    assert_eq!(marker.popup.class_name, "running-popup");
    assert_eq!(marker.label, format!("🏃 {}", workout.describe()));

    // Persisted straight away
    let raw = app.store().storage().get_item(STORAGE_KEY)?.unwrap();
    assert!(raw.contains(&id));
    assert!(app.notifier().is_empty());
    Ok(())
}

#[test]
fn test_submit_cycling_workout() -> Result<()> {
    let mut app = create_test_app();
    app.handle_event(AppEvent::MapClicked(HOME));
    app.handle_event(AppEvent::ToggleType);
    fill_form(&mut app, WorkoutKind::Cycling, "20", "60", "150");
    app.handle_event(AppEvent::Submit);

    assert_eq!(app.workouts().len(), 1);
    assert_eq!(app.workouts()[0].speed(), Some(20.0));
    assert_eq!(
        app.map().unwrap().backend().markers[1].popup.class_name,
        "cycling-popup"
    );
    // The type survives hiding the form
    assert_eq!(app.form().kind(), WorkoutKind::Cycling);
    Ok(())
}

#[test]
fn test_invalid_input_is_rejected_with_alert() -> Result<()> {
    let mut app = create_test_app();
    app.handle_event(AppEvent::MapClicked(HOME));

    fill_form(&mut app, WorkoutKind::Running, "0", "25", "180");
    assert!(app.submit_form().is_none());
    assert_eq!(
        app.notifier_mut().pop().as_deref(),
        Some("0 must be a positive number")
    );

    fill_form(&mut app, WorkoutKind::Cycling, "10", "-5", "100");
    assert!(app.submit_form().is_none());
    assert_eq!(
        app.notifier_mut().pop().as_deref(),
        Some("-5 must be a positive number")
    );

    fill_form(&mut app, WorkoutKind::Cycling, "10", "30", "lots");
    assert!(app.submit_form().is_none());
    assert_eq!(
        app.notifier_mut().pop().as_deref(),
        Some("NaN is not a finite number")
    );

    // Nothing was created or saved, and the form is still open for corrections
    assert!(app.workouts().is_empty());
    assert_eq!(markers(&app), 1);
    assert!(app.form().is_visible());
    assert_eq!(app.store().storage().get_item(STORAGE_KEY)?, None);
    Ok(())
}

#[test]
fn test_submit_without_map_click_does_nothing() -> Result<()> {
    let mut app = create_test_app();
    fill_form(&mut app, WorkoutKind::Running, "5", "25", "180");
    assert!(app.submit_form().is_none());
    assert!(app.workouts().is_empty());
    assert!(app.notifier().is_empty());
    Ok(())
}

#[test]
fn test_cancel_hides_form_and_clears_inputs() -> Result<()> {
    let mut app = create_test_app();
    app.handle_event(AppEvent::MapClicked(HOME));
    fill_form(&mut app, WorkoutKind::Running, "5", "25", "180");
    app.handle_event(AppEvent::Cancel);

    assert!(!app.form().is_visible());
    assert!(app.form().cadence_input.is_empty());
    assert!(app.workouts().is_empty());
    Ok(())
}

#[test]
fn test_sidebar_click_pans_and_counts_once() -> Result<()> {
    let mut app = create_test_app();
    let spot = Coords::new(40.0, -3.7);
    app.handle_event(AppEvent::MapClicked(spot));
    fill_form(&mut app, WorkoutKind::Running, "10", "50", "170");
    let id = app.submit_form().unwrap();

    app.handle_event(AppEvent::SidebarClicked(id.clone()));

    let workout = app.store().find_by_id(&id).unwrap();
    assert_eq!(workout.clicks(), 1);
    let backend = app.map().unwrap().backend();
    assert_eq!(backend.view, Some((spot, 13)));
    assert_eq!(backend.animated_moves, 1);

    // The counter is saved with the workout
    let mut restored = WorkoutStore::new(app.store().storage().clone());
    restored.restore();
    assert_eq!(restored.find_by_id(&id).unwrap().clicks(), 1);

    // Unknown ids are ignored
    assert!(!app.select_workout("0000000000"));
    assert_eq!(app.map().unwrap().backend().animated_moves, 1);
    Ok(())
}

#[test]
fn test_workouts_survive_restart() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("storage.db");

    let before = {
        let mut app = create_test_app_with(SqliteStorage::open(&path)?);
        for (lat, distance) in [(1.0, "3"), (2.0, "6"), (3.0, "9")] {
            app.handle_event(AppEvent::MapClicked(Coords::new(lat, 0.0)));
            fill_form(&mut app, WorkoutKind::Running, distance, "30", "160");
            app.submit_form().unwrap();
        }
        app.workouts().to_vec()
    };

    // Ids stay unique even when created within the same millisecond
    let mut ids: Vec<_> = before.iter().map(|w| w.id().to_string()).collect();
    ids.dedup();
    assert_eq!(ids.len(), 3);

    let app: TestApp<SqliteStorage> = App::new(SqliteStorage::open(&path)?, AlertQueue::new(), 13);
    assert_eq!(app.workouts(), before.as_slice());
    for workout in app.workouts() {
        let expected = workout.duration() / workout.distance();
        assert!((workout.metric().value() - expected).abs() < 1e-9);
        assert_eq!(workout.metric().unit(), "min/km");
    }

    // Sidebar lists the newest first
    let rows = app.rows();
    assert_eq!(rows[0].id, before[2].id());
    assert_eq!(rows[2].id, before[0].id());
    Ok(())
}

#[test]
fn test_restore_renders_markers_once_map_loads() -> Result<()> {
    let mut app = create_test_app();
    app.handle_event(AppEvent::MapClicked(Coords::new(10.0, 10.0)));
    fill_form(&mut app, WorkoutKind::Running, "5", "25", "180");
    app.submit_form().unwrap();
    let storage = app.store().storage().clone();

    let mut reopened: TestApp<MemoryStorage> = App::new(storage, AlertQueue::new(), 13);
    assert_eq!(reopened.workouts().len(), 1);
    assert_eq!(reopened.rows().len(), 1);
    assert!(reopened.map().is_none());

    reopened.load_map(
        HeadlessMap::default(),
        &ConfiguredGeolocator::new(Some(HOME)),
        &TileLayer::default(),
    );
    assert_eq!(markers(&reopened), 2);
    Ok(())
}

#[test]
fn test_missing_position_alerts_and_degrades() -> Result<()> {
    let mut app: TestApp<MemoryStorage> = App::new(MemoryStorage::new(), AlertQueue::new(), 13);
    let loaded = app.load_map(
        HeadlessMap::default(),
        &ConfiguredGeolocator::denied(),
        &TileLayer::default(),
    );
    assert!(!loaded);
    assert!(app.map().is_none());
    assert_eq!(
        app.notifier_mut().pop().as_deref(),
        Some("Could not get your position! Permission denied.")
    );

    // Workouts can still be recorded; they just have no marker
    app.handle_event(AppEvent::MapClicked(HOME));
    fill_form(&mut app, WorkoutKind::Cycling, "15", "45", "0");
    let id = app.submit_form().unwrap();
    assert!(app.select_workout(&id));
    assert_eq!(app.store().find_by_id(&id).unwrap().clicks(), 1);
    Ok(())
}

#[test]
fn test_reset_clears_everything() -> Result<()> {
    let mut app = create_test_app();
    app.handle_event(AppEvent::MapClicked(HOME));
    fill_form(&mut app, WorkoutKind::Cycling, "20", "60", "150");
    app.submit_form().unwrap();
    app.handle_event(AppEvent::MapClicked(HOME));

    app.handle_event(AppEvent::Reset);

    assert!(app.workouts().is_empty());
    assert!(app.map().is_none());
    assert!(!app.form().is_visible());
    assert_eq!(app.form().kind(), WorkoutKind::Running);
    assert_eq!(app.store().storage().get_item(STORAGE_KEY)?, None);

    let mut store = WorkoutStore::new(app.store().storage().clone());
    store.restore();
    assert!(store.is_empty());
    Ok(())
}
