use std::cell::RefCell;
use std::rc::Rc;

use pixelaw_canvas::api::CameraPersistence;
use pixelaw_canvas::core::{CameraState, CanvasSize};
use pixelaw_canvas::render::NullRenderDriver;
use pixelaw_canvas::{CanvasEngine, CanvasEngineConfig};

#[derive(Default)]
struct Storage {
    stored: Option<CameraState>,
    saves: Vec<CameraState>,
}

struct SharedStorage(Rc<RefCell<Storage>>);

impl CameraPersistence for SharedStorage {
    fn load_camera(&mut self) -> Option<CameraState> {
        self.0.borrow().stored
    }

    fn save_camera(&mut self, camera: CameraState) {
        let mut storage = self.0.borrow_mut();
        storage.stored = Some(camera);
        storage.saves.push(camera);
    }
}

fn engine() -> CanvasEngine<NullRenderDriver> {
    let config = CanvasEngineConfig::new(CanvasSize::new(800, 600));
    CanvasEngine::new(NullRenderDriver::default(), config).expect("engine init")
}

fn storage(stored: Option<CameraState>) -> Rc<RefCell<Storage>> {
    Rc::new(RefCell::new(Storage {
        stored,
        saves: Vec::new(),
    }))
}

#[test]
fn stored_camera_is_restored_and_clamped() {
    let mut engine = engine();
    let storage = storage(Some(CameraState::new(500.0, -20.0, 8.0)));

    engine.set_camera_persistence(Box::new(SharedStorage(Rc::clone(&storage))));

    assert_eq!(engine.camera(), CameraState::new(500.0, 0.0, 2.0));
    engine.tick(0.0).expect("tick");
    engine.tick(10_000.0).expect("tick");
    assert!(storage.borrow().saves.is_empty(), "restoring is not a change to save");
}

#[test]
fn non_finite_stored_camera_is_ignored() {
    let mut engine = engine();
    let storage = storage(Some(CameraState::new(f64::NAN, 0.0, 1.0)));

    engine.set_camera_persistence(Box::new(SharedStorage(Rc::clone(&storage))));

    assert_eq!(engine.camera(), CameraState::default());
    assert!(engine.has_camera_persistence());
}

#[test]
fn camera_saves_are_debounced() {
    let mut engine = engine();
    let storage = storage(None);
    engine.set_camera_persistence(Box::new(SharedStorage(Rc::clone(&storage))));

    engine.pan(-100.0, 0.0).expect("pan");
    engine.tick(0.0).expect("tick");
    engine.pan(-100.0, 0.0).expect("pan");
    engine.tick(300.0).expect("tick");
    engine.tick(700.0).expect("tick");
    assert!(storage.borrow().saves.is_empty());

    engine.tick(800.0).expect("tick");
    assert_eq!(
        storage.borrow().saves,
        vec![CameraState::new(200.0, 0.0, 1.0)]
    );

    engine.tick(5_000.0).expect("tick");
    assert_eq!(storage.borrow().saves.len(), 1);
}

#[test]
fn shutdown_flushes_pending_save() {
    let mut engine = engine();
    let storage = storage(None);
    engine.set_camera_persistence(Box::new(SharedStorage(Rc::clone(&storage))));

    engine.pan(-64.0, -32.0).expect("pan");
    engine.shutdown();

    assert_eq!(
        storage.borrow().saves,
        vec![CameraState::new(64.0, 32.0, 1.0)]
    );
}

#[test]
fn detached_persistence_stops_saving() {
    let mut engine = engine();
    let storage = storage(None);
    engine.set_camera_persistence(Box::new(SharedStorage(Rc::clone(&storage))));

    assert!(engine.clear_camera_persistence().is_some());
    engine.pan(-64.0, 0.0).expect("pan");
    engine.tick(0.0).expect("tick");
    engine.tick(1_000.0).expect("tick");

    assert!(storage.borrow().saves.is_empty());
}
