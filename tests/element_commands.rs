use eframe_notes::command::{
    Command, DeleteElements, EditText, Group, InsertElements, MoveElements, ReflectElements, RotateElements,
    ScaleElements, SetColor, SetFill, SetFont, SetLineStyle, SetStrokeWidth,
};
use eframe_notes::element::{Axis, Element, ElementType, Font, LineStyle, factory};
use eframe_notes::{CommandError, Document, EventBus, Layer, LayerId, Page, PageId, SharedDocument, UndoRedoHandler};
use egui::{Color32, Pos2, Rect, Vec2};

struct Fixture {
    undo: UndoRedoHandler,
    page: PageId,
    layer: LayerId,
    stroke: eframe_notes::ElementId,
    text: eframe_notes::ElementId,
    image: eframe_notes::ElementId,
    tex: eframe_notes::ElementId,
}

impl Fixture {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let stroke = factory::create_stroke(
            vec![Pos2::new(0.0, 0.0), Pos2::new(10.0, 5.0), Pos2::new(20.0, 0.0)],
            2.0,
            Color32::RED,
        );
        let text = factory::create_text("hello", Font::default(), Color32::BLACK, Pos2::new(30.0, 30.0));
        let image = factory::create_image(vec![7; 16], Vec2::new(40.0, 20.0), Pos2::new(50.0, 60.0));
        let tex = factory::create_tex_image(
            "a^2+b^2",
            vec![1, 2, 3],
            Rect::from_min_size(Pos2::new(5.0, 80.0), Vec2::new(30.0, 10.0)),
        );
        let ids = (stroke.id(), text.id(), image.id(), tex.id());

        let mut layer = Layer::new();
        for element in [stroke, text, image, tex] {
            layer.add_top(element).unwrap();
        }
        let layer_id = layer.id();

        let mut page = Page::new(200.0, 200.0);
        page.add_layer(layer);
        let page_id = page.id();

        let mut doc = Document::new();
        doc.add_page(page);

        Self {
            undo: UndoRedoHandler::new(SharedDocument::new(doc), EventBus::new()),
            page: page_id,
            layer: layer_id,
            stroke: ids.0,
            text: ids.1,
            image: ids.2,
            tex: ids.3,
        }
    }

    fn all(&self) -> Vec<eframe_notes::ElementId> {
        vec![self.stroke, self.text, self.image, self.tex]
    }

    fn snapshot(&self) -> String {
        self.undo.document().snapshot().unwrap()
    }

    /// Applies `command`, checks that undo restores the exact prior document and
    /// that redo reproduces the exact applied one.
    fn assert_round_trip(&mut self, command: impl Into<Command>) {
        let before = self.snapshot();
        self.undo.apply(command).unwrap();
        let after = self.snapshot();
        assert_ne!(before, after, "command had no effect");

        self.undo.undo().unwrap();
        assert_eq!(self.snapshot(), before);

        self.undo.redo().unwrap();
        assert_eq!(self.snapshot(), after);

        self.undo.undo().unwrap();
        assert_eq!(self.snapshot(), before);
    }

    fn order(&self) -> Vec<eframe_notes::ElementId> {
        let doc = self.undo.document().lock();
        doc.page(0).unwrap().layer(1).unwrap().elements().iter().map(|e| e.id()).collect()
    }
}

#[test]
fn test_insert_and_delete_round_trip() {
    let mut f = Fixture::new();
    let dot = factory::create_stroke(vec![Pos2::new(1.0, 1.0), Pos2::new(1.0, 1.0)], 1.0, Color32::GREEN);
    let dot_id = dot.id();
    f.assert_round_trip(InsertElements::single(f.page, f.layer, dot, 2));

    f.undo.redo().unwrap();
    assert_eq!(f.order()[2], dot_id);

    f.assert_round_trip(DeleteElements::new(f.page, f.layer, vec![f.text, f.tex]));
}

#[test]
fn test_batch_delete_restores_interleaving() {
    let mut f = Fixture::new();
    let original = f.order();

    f.undo.apply(DeleteElements::new(f.page, f.layer, vec![f.tex, f.stroke, f.image])).unwrap();
    assert_eq!(f.order(), vec![f.text]);

    f.undo.undo().unwrap();
    assert_eq!(f.order(), original);
}

#[test]
fn test_transforms_round_trip_exactly() {
    let mut f = Fixture::new();
    let all = f.all();

    f.assert_round_trip(MoveElements::new(f.page, f.layer, all.clone(), Vec2::new(3.3, -1.7)));
    f.assert_round_trip(
        ScaleElements::new(f.page, f.layer, all.clone(), Pos2::new(7.0, 3.0), 1.37, 0.61).with_line_width(true),
    );
    f.assert_round_trip(RotateElements::new(f.page, f.layer, all.clone(), Pos2::new(50.0, 50.0), 0.3));
    f.assert_round_trip(ReflectElements::new(f.page, f.layer, all.clone(), Axis::Vertical, 12.5));
    f.assert_round_trip(ReflectElements::new(f.page, f.layer, all, Axis::Horizontal, 40.0));
}

#[test]
fn test_property_changes_round_trip() {
    let mut f = Fixture::new();
    let all = f.all();

    f.assert_round_trip(SetColor::new(f.page, f.layer, all.clone(), Color32::YELLOW));
    f.assert_round_trip(SetFill::new(f.page, f.layer, all.clone(), Some(128)));
    f.assert_round_trip(SetLineStyle::new(f.page, f.layer, all.clone(), LineStyle::Dashed));
    f.assert_round_trip(SetStrokeWidth::new(f.page, f.layer, all.clone(), 7.5));
    f.assert_round_trip(SetFont::new(
        f.page,
        f.layer,
        all,
        Font {
            name: "Serif".to_owned(),
            size: 20.0,
        },
    ));
}

#[test]
fn test_property_change_skips_elements_without_the_property() {
    let mut f = Fixture::new();
    f.undo
        .apply(SetStrokeWidth::new(f.page, f.layer, vec![f.stroke, f.text], 9.0))
        .unwrap();

    let doc = f.undo.document().lock();
    let layer = doc.page(0).unwrap().layer(1).unwrap();
    assert_eq!(layer.get(f.stroke).unwrap().as_stroke().unwrap().width(), 9.0);
    assert_eq!(layer.get(f.text).unwrap().as_text().unwrap().font().size, 12.0);
}

#[test]
fn test_edit_text_round_trip() {
    let mut f = Fixture::new();
    f.assert_round_trip(EditText::new(f.page, f.layer, f.text, "goodbye"));
    f.assert_round_trip(EditText::new(f.page, f.layer, f.tex, "\\sqrt{2}"));

    let err = f.undo.apply(EditText::new(f.page, f.layer, f.image, "nope")).unwrap_err();
    assert!(matches!(err, CommandError::StructuralMismatch(_)));
}

#[test]
fn test_edit_equation_keeps_old_rendering_for_undo() {
    let mut f = Fixture::new();
    f.undo.apply(EditText::new(f.page, f.layer, f.tex, "x")).unwrap();
    {
        let doc = f.undo.document().lock();
        let layer = doc.page(0).unwrap().layer(1).unwrap();
        let ElementType::TexImage(tex) = layer.get(f.tex).unwrap() else {
            panic!("expected an equation");
        };
        assert_eq!(tex.source(), "x");
        assert!(tex.rendered().is_empty());
    }

    f.undo.undo().unwrap();
    let doc = f.undo.document().lock();
    let ElementType::TexImage(tex) = doc.page(0).unwrap().layer(1).unwrap().get(f.tex).unwrap() else {
        panic!("expected an equation");
    };
    assert_eq!(tex.rendered(), &[1, 2, 3]);
}

#[test]
fn test_move_to_other_layer_transfers_ownership() {
    let mut f = Fixture::new();
    let target = Layer::with_name("Top");
    let target_id = target.id();
    f.undo.document().lock().page_mut(0).unwrap().add_layer(target);
    let before = f.snapshot();

    f.undo
        .apply(MoveElements::new(f.page, f.layer, vec![f.text, f.image], Vec2::new(1.0, 1.0)).to_layer(f.page, target_id))
        .unwrap();
    {
        let doc = f.undo.document().lock();
        let page = doc.page(0).unwrap();
        assert_eq!(page.layer_of(f.text), Some(target_id));
        assert_eq!(page.layer_of(f.image), Some(target_id));
        assert_eq!(page.layer(1).unwrap().len(), 2);
        assert_eq!(page.element_count(), 4);
    }

    f.undo.undo().unwrap();
    assert_eq!(f.snapshot(), before);
}

#[test]
fn test_move_to_other_page() {
    let mut f = Fixture::new();
    let other = Page::with_layer(100.0, 100.0);
    let (other_page, other_layer) = (other.id(), other.layers()[0].id());
    f.undo.document().lock().add_page(other);
    let before = f.snapshot();

    let cmd = MoveElements::new(f.page, f.layer, vec![f.stroke], Vec2::ZERO).to_layer(other_page, other_layer);
    assert_eq!(Command::from(cmd).affected_pages(), vec![f.page, other_page]);

    let cmd = MoveElements::new(f.page, f.layer, vec![f.stroke], Vec2::ZERO).to_layer(other_page, other_layer);
    f.undo.apply(cmd).unwrap();
    assert!(f.undo.document().lock().page(1).unwrap().contains_element(f.stroke));
    assert!(!f.undo.document().lock().page(0).unwrap().contains_element(f.stroke));

    f.undo.undo().unwrap();
    assert_eq!(f.snapshot(), before);
}

#[test]
fn test_group_applies_all_or_nothing() {
    let mut f = Fixture::new();
    let before = f.snapshot();

    let missing = eframe_notes::ElementId::new();
    let group = Group::new(
        "Cleanup",
        vec![
            SetColor::new(f.page, f.layer, vec![f.stroke], Color32::BLUE).into(),
            DeleteElements::new(f.page, f.layer, vec![f.text]).into(),
            DeleteElements::new(f.page, f.layer, vec![missing]).into(),
        ],
    );
    let err = f.undo.apply(group).unwrap_err();
    assert_eq!(err, CommandError::ElementNotFound(missing));
    assert_eq!(f.snapshot(), before);
    // Still recorded, as a no-op
    assert_eq!(f.undo.undo_len(), 1);
}

#[test]
fn test_group_undoes_in_reverse_order() {
    let mut f = Fixture::new();
    let before = f.snapshot();
    let dot = factory::create_stroke(vec![Pos2::ZERO, Pos2::new(1.0, 0.0)], 1.0, Color32::BLACK);
    let dot_id = dot.id();

    // The second step depends on the first, so undo must run them backwards
    let group = Group::new(
        "Paste",
        vec![
            InsertElements::single(f.page, f.layer, dot, 0).into(),
            MoveElements::new(f.page, f.layer, vec![dot_id], Vec2::new(4.0, 4.0)).into(),
        ],
    );
    assert_eq!(group.affected_pages(), vec![f.page]);
    f.undo.apply(group).unwrap();
    assert_eq!(f.undo.undo_description(), "Undo: Paste");

    f.undo.undo().unwrap();
    assert_eq!(f.snapshot(), before);
}

#[test]
fn test_command_on_missing_element_changes_nothing() {
    let mut f = Fixture::new();
    let before = f.snapshot();
    let missing = eframe_notes::ElementId::new();

    let err = f
        .undo
        .apply(MoveElements::new(f.page, f.layer, vec![f.stroke, missing], Vec2::new(5.0, 5.0)))
        .unwrap_err();
    assert_eq!(err, CommandError::ElementNotFound(missing));
    assert_eq!(f.snapshot(), before);
}

#[test]
fn test_repeated_ids_are_rejected_without_changes() {
    let mut f = Fixture::new();
    let before = f.snapshot();
    let twice = vec![f.stroke, f.stroke];

    let err = f
        .undo
        .apply(RotateElements::new(f.page, f.layer, twice.clone(), Pos2::ZERO, 1.0))
        .unwrap_err();
    assert!(matches!(err, CommandError::StructuralMismatch(_)));
    let err = f
        .undo
        .apply(MoveElements::new(f.page, f.layer, twice.clone(), Vec2::new(2.0, 2.0)))
        .unwrap_err();
    assert!(matches!(err, CommandError::StructuralMismatch(_)));
    let err = f
        .undo
        .apply(SetColor::new(f.page, f.layer, twice, Color32::BLACK))
        .unwrap_err();
    assert!(matches!(err, CommandError::StructuralMismatch(_)));
    assert_eq!(f.snapshot(), before);

    // Recorded as no-ops, so undoing them leaves the document as it was
    while f.undo.can_undo() {
        f.undo.undo().unwrap_err();
    }
    assert_eq!(f.snapshot(), before);
}
