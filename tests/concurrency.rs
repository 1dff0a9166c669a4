use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use eframe_notes::command::{DeleteElements, InsertElements};
use eframe_notes::element::{Element, factory};
use eframe_notes::{Document, EditorEvent, EventBus, LayerController, Page, Settings, SharedDocument, UndoRedoHandler};
use egui::{Color32, Pos2};

fn setup() -> (SharedDocument, EventBus) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut doc = Document::new();
    doc.add_page(Page::with_layer(100.0, 100.0));
    doc.add_page(Page::with_layer(100.0, 100.0));
    (SharedDocument::new(doc), EventBus::new())
}

#[test]
fn test_render_thread_never_sees_duplicate_elements() {
    let (document, events) = setup();
    let mut undo = UndoRedoHandler::new(document.clone(), events);
    let (page, layer) = {
        let doc = document.lock();
        let page = doc.page(0).unwrap();
        (page.id(), page.layers()[0].id())
    };

    let done = AtomicBool::new(false);
    thread::scope(|scope| {
        let reader = scope.spawn(|| {
            let mut passes = 0;
            while !done.load(Ordering::Acquire) {
                let doc = document.lock();
                for page in doc.pages() {
                    let mut seen = Vec::new();
                    for layer in page.layers() {
                        for element in layer.elements() {
                            assert!(!seen.contains(&element.id()), "element owned twice");
                            seen.push(element.id());
                        }
                    }
                }
                passes += 1;
            }
            passes
        });

        for i in 0..200 {
            let x = i as f32;
            let stroke = factory::create_stroke(vec![Pos2::new(x, 0.0), Pos2::new(x, 10.0)], 1.0, Color32::BLACK);
            let id = stroke.id();
            undo.apply(InsertElements::single(page, layer, stroke, 0)).unwrap();
            if i % 3 == 0 {
                undo.apply(DeleteElements::new(page, layer, vec![id])).unwrap();
            }
            if i % 5 == 0 {
                undo.undo().unwrap();
            }
        }
        while undo.can_undo() {
            undo.undo().unwrap();
        }
        done.store(true, Ordering::Release);
        assert!(reader.join().unwrap() > 0);
    });

    assert_eq!(document.lock().page(0).unwrap().element_count(), 0);
}

#[test]
fn test_listener_can_lock_while_handling_events() {
    let (document, events) = setup();
    let rx = events.subscribe();
    let mut layers = LayerController::new(document.clone(), events.clone(), Settings::default());
    let mut undo = UndoRedoHandler::new(document.clone(), events);
    layers.page_selected(0);
    layers.add_new_layer(&mut undo);

    // A render worker that re-reads the page on every notification
    let worker_doc = document.clone();
    let worker = thread::spawn(move || {
        let mut layer_counts = Vec::new();
        while let Ok(event) = rx.recv_timeout(Duration::from_secs(5)) {
            if let Some(index) = event.page() {
                let doc = worker_doc.lock();
                layer_counts.push(doc.page(index).map(|p| p.layer_count()));
            }
            if event == EditorEvent::UndoRedoChanged && layer_counts.len() >= 3 {
                break;
            }
        }
        layer_counts
    });

    layers.merge_current_layer_down(&mut undo);
    undo.undo().unwrap();

    let counts = worker.join().unwrap();
    assert_eq!(counts.len(), 3);
    assert_eq!(counts.last(), Some(&Some(2)));
}
