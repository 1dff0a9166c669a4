use eframe_notes::command::{ChangePageBackground, ChangePageSize, DeletePage, InsertElements, InsertPage, MovePage, RenameLayer};
use eframe_notes::element::{Element, factory};
use eframe_notes::page::{BackgroundKind, PageBackground};
use eframe_notes::{CommandError, Document, EditorEvent, EventBus, Page, PageId, Settings, SharedDocument, UndoRedoHandler};
use egui::{Color32, Pos2};

fn setup() -> (UndoRedoHandler, PageId) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut doc = Document::new();
    let page = Page::with_layer(595.28, 841.89);
    let page_id = page.id();
    doc.add_page(page);
    (UndoRedoHandler::new(SharedDocument::new(doc), EventBus::new()), page_id)
}

fn rename(page: PageId, name: &str) -> RenameLayer {
    RenameLayer::new(page, None, Some(name.to_owned()))
}

fn background_name(undo: &UndoRedoHandler) -> String {
    undo.document().lock().page(0).unwrap().background_name().to_owned()
}

#[test]
fn test_lifo_undo_and_redo() {
    let (mut undo, page) = setup();
    let initial = undo.document().snapshot().unwrap();

    undo.apply(rename(page, "a")).unwrap();
    undo.apply(ChangePageSize::new(page, 100.0, 100.0)).unwrap();
    let after_b = undo.document().snapshot().unwrap();

    undo.undo().unwrap();
    undo.undo().unwrap();
    assert_eq!(undo.document().snapshot().unwrap(), initial);
    assert_eq!(undo.redo_len(), 2);
    // Top of the redo stack is the last command undone
    assert_eq!(undo.redo_description(), "Redo: Rename layer");

    undo.redo().unwrap();
    assert_eq!(background_name(&undo), "a");
    undo.redo().unwrap();
    assert_eq!(undo.document().snapshot().unwrap(), after_b);
    assert!(!undo.can_redo());
}

#[test]
fn test_new_command_discards_redo_future() {
    let (mut undo, page) = setup();
    undo.apply(rename(page, "a")).unwrap();
    undo.undo().unwrap();
    assert!(undo.can_redo());

    undo.apply(rename(page, "c")).unwrap();
    assert!(!undo.can_redo());
    assert_eq!(undo.redo_len(), 0);
    assert_eq!(undo.undo_len(), 1);
}

#[test]
fn test_redo_stack_is_cleared_before_listeners_hear() {
    let (mut undo, page) = setup();
    undo.apply(rename(page, "a")).unwrap();
    undo.undo().unwrap();

    let rx = undo.events().subscribe();
    undo.apply(rename(page, "b")).unwrap();

    let events: Vec<EditorEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            EditorEvent::RebuildLayerMenu,
            EditorEvent::PageChanged(0),
            EditorEvent::UndoRedoChanged,
        ]
    );
    assert!(!undo.can_redo());
}

#[test]
fn test_empty_stacks_are_no_ops() {
    let (mut undo, _) = setup();
    let before = undo.document().snapshot().unwrap();
    undo.undo().unwrap();
    undo.redo().unwrap();
    assert_eq!(undo.document().snapshot().unwrap(), before);
    assert_eq!(undo.undo_description(), "Undo");
}

#[test]
fn test_dirty_flag_tracks_save_point() {
    let (mut undo, page) = setup();
    undo.document_saved();
    assert!(!undo.is_changed());

    undo.apply(rename(page, "a")).unwrap();
    assert!(undo.is_changed());

    undo.document_saved();
    assert!(!undo.is_changed());

    undo.apply(rename(page, "b")).unwrap();
    assert!(undo.is_changed());

    undo.undo().unwrap();
    assert!(!undo.is_changed());

    // Redoing the same command lands on the same identity again
    undo.redo().unwrap();
    assert!(undo.is_changed());
    undo.undo().unwrap();

    // A new command with equal effect is a different identity
    undo.undo().unwrap();
    undo.apply(rename(page, "a")).unwrap();
    assert!(undo.is_changed());
}

#[test]
fn test_autosave_marker_is_independent() {
    let (mut undo, page) = setup();
    undo.apply(rename(page, "a")).unwrap();
    undo.document_autosaved();
    assert!(!undo.is_changed_for_autosave());
    assert!(undo.is_changed());

    undo.clear();
    assert!(!undo.is_changed());
    assert!(!undo.is_changed_for_autosave());
    assert!(!undo.can_undo());
}

#[test]
fn test_record_does_not_rerun_the_change() {
    let (mut undo, page) = setup();
    let stroke = factory::create_stroke(vec![Pos2::ZERO, Pos2::new(5.0, 5.0)], 1.0, Color32::BLACK);
    let id = stroke.id();
    let layer = {
        let mut doc = undo.document().lock();
        let layer = doc.page_mut(0).unwrap().layer_mut(1).unwrap();
        layer.add_top(stroke).unwrap();
        layer.id()
    };

    undo.record(InsertElements::applied(page, layer, vec![(0, id)]));
    assert_eq!(undo.document().lock().page(0).unwrap().element_count(), 1);

    undo.undo().unwrap();
    assert_eq!(undo.document().lock().page(0).unwrap().element_count(), 0);
    undo.redo().unwrap();
    assert!(undo.document().lock().page(0).unwrap().contains_element(id));
}

#[test]
fn test_failed_undo_still_transfers() {
    let (mut undo, page) = setup();
    undo.apply(rename(page, "a")).unwrap();

    // The page goes away behind the handler's back
    undo.document().lock().clear();

    let rx = undo.events().subscribe();
    let err = undo.undo().unwrap_err();
    assert_eq!(err, CommandError::PageNotFound(page));
    assert_eq!(undo.undo_len(), 0);
    assert_eq!(undo.redo_len(), 1);

    let failed = rx
        .try_iter()
        .find_map(|e| match e {
            EditorEvent::CommandFailed { message } => Some(message),
            _ => None,
        })
        .unwrap();
    assert!(failed.starts_with("Could not undo \"Rename layer\""));
}

#[test]
fn test_failed_apply_is_still_recorded() {
    let (mut undo, _) = setup();
    let missing = PageId::new();
    let err = undo.apply(ChangePageSize::new(missing, 1.0, 1.0)).unwrap_err();
    assert_eq!(err, CommandError::PageNotFound(missing));
    assert_eq!(undo.undo_len(), 1);
}

#[test]
fn test_page_commands_round_trip() {
    let (mut undo, page) = setup();
    let initial = undo.document().snapshot().unwrap();

    let second = Settings::default().new_page();
    let second_id = second.id();
    undo.apply(InsertPage::new(second, 0)).unwrap();
    assert_eq!(undo.document().lock().index_of(second_id), Some(0));

    undo.apply(MovePage::new(second_id, 0, 1)).unwrap();
    assert_eq!(undo.document().lock().index_of(second_id), Some(1));

    undo.apply(ChangePageBackground::new(
        page,
        PageBackground {
            kind: BackgroundKind::Graph,
            color: Color32::LIGHT_BLUE,
        },
    ))
    .unwrap();
    undo.apply(DeletePage::new(page)).unwrap();
    assert_eq!(undo.document().lock().page_count(), 1);

    for _ in 0..4 {
        undo.undo().unwrap();
    }
    assert_eq!(undo.document().snapshot().unwrap(), initial);
}

#[test]
fn test_deleted_page_keeps_older_commands_valid() {
    let (mut undo, page) = setup();
    undo.apply(rename(page, "kept")).unwrap();
    undo.apply(DeletePage::new(page)).unwrap();
    assert_eq!(undo.document().lock().page_count(), 0);

    undo.undo().unwrap();
    undo.undo().unwrap();
    assert_eq!(background_name(&undo), "Background");
    undo.redo().unwrap();
    assert_eq!(background_name(&undo), "kept");
}

#[test]
fn test_page_events() {
    let (mut undo, _) = setup();
    let rx = undo.events().subscribe();
    undo.apply(InsertPage::new(Page::new(10.0, 10.0), 1)).unwrap();
    let events: Vec<EditorEvent> = rx.try_iter().collect();
    assert!(events.contains(&EditorEvent::PageInserted(1)));
    assert_eq!(events.last(), Some(&EditorEvent::UndoRedoChanged));

    undo.undo().unwrap();
    let events: Vec<EditorEvent> = rx.try_iter().collect();
    assert!(events.contains(&EditorEvent::PageDeleted(1)));
}

#[test]
fn test_trace_setting_does_not_change_behavior() {
    let settings = Settings::from_json(r#"{ "undo_trace": true }"#).unwrap();
    let (plain, page) = setup();
    let mut undo = UndoRedoHandler::new(plain.document().clone(), plain.events().clone()).with_settings(&settings);

    undo.apply(rename(page, "traced")).unwrap();
    undo.undo().unwrap();
    undo.redo().unwrap();
    assert_eq!(background_name(&undo), "traced");
    assert_eq!(undo.undo_len(), 1);
}
