use eframe_notes::element::{Axis, Element, ElementType, Font, factory};
use eframe_notes::element::ElementTag;
use egui::{Color32, Pos2, Rect, Vec2};

fn create_test_stroke() -> ElementType {
    let points = vec![Pos2::new(10.0, 10.0), Pos2::new(20.0, 20.0)];
    factory::create_stroke(points, 2.0, Color32::RED)
}

fn create_test_image() -> ElementType {
    let data = vec![0u8; 100]; // Dummy data
    let size = Vec2::new(100.0, 50.0);
    let position = Pos2::new(10.0, 20.0);
    factory::create_image(data, size, position)
}

#[test]
fn test_element_creation() {
    let stroke = create_test_stroke();
    assert_eq!(stroke.element_type(), ElementTag::Stroke);
    assert_eq!(stroke.element_type().as_str(), "stroke");

    let image = create_test_image();
    assert_eq!(image.element_type(), ElementTag::Image);
    assert_ne!(stroke.id(), image.id());

    let text = factory::create_text("hello", Font::default(), Color32::BLACK, Pos2::ZERO);
    assert_eq!(text.element_type(), ElementTag::Text);

    let tex = factory::create_tex_image("x^2", vec![1, 2, 3], Rect::from_min_size(Pos2::ZERO, Vec2::splat(10.0)));
    assert_eq!(tex.element_type().as_str(), "teximage");
}

#[test]
fn test_element_rect() {
    let stroke = create_test_stroke();
    let rect = stroke.rect();

    // Rectangle should contain all points
    assert!(rect.contains(Pos2::new(10.0, 10.0)));
    assert!(rect.contains(Pos2::new(20.0, 20.0)));

    let image = create_test_image();
    let rect = image.rect();
    assert_eq!(rect.min, Pos2::new(10.0, 20.0));
    assert_eq!(rect.size(), Vec2::new(100.0, 50.0));
}

#[test]
fn test_element_translate() {
    let mut stroke = create_test_stroke();
    let before = stroke.rect();
    stroke.translate(Vec2::new(5.0, -5.0));
    let after = stroke.rect();
    assert!((after.min.x - before.min.x - 5.0).abs() < 1e-4);
    assert!((after.min.y - before.min.y + 5.0).abs() < 1e-4);

    let mut image = create_test_image();
    image.translate(Vec2::new(1.0, 2.0));
    assert_eq!(image.rect().min, Pos2::new(11.0, 22.0));
}

#[test]
fn test_hit_test() {
    let stroke = create_test_stroke();
    assert!(stroke.hit_test(Pos2::new(15.0, 15.0), 1.0));
    assert!(!stroke.hit_test(Pos2::new(50.0, 15.0), 1.0));

    let image = create_test_image();
    assert!(image.hit_test(Pos2::new(50.0, 40.0), 0.0));
    assert!(!image.hit_test(Pos2::new(0.0, 0.0), 1.0));
}

#[test]
fn test_reflect_twice_is_identity_for_frames() {
    let mut image = create_test_image();
    let before = image.rect();
    image.reflect(Axis::Vertical, 200.0);
    assert!(image.rect().min.x > 200.0);
    image.reflect(Axis::Vertical, 200.0);
    let after = image.rect();
    assert!((after.min.x - before.min.x).abs() < 1e-3);
    assert!((after.max.x - before.max.x).abs() < 1e-3);
}

#[test]
fn test_duplicate_gets_fresh_identity() {
    let stroke = create_test_stroke();
    let copy = stroke.duplicate();
    assert_ne!(copy.id(), stroke.id());
    assert_eq!(copy.rect(), stroke.rect());
    assert_eq!(copy.color(), Some(Color32::RED));
}

#[test]
fn test_geometry_snapshot_restores_every_kind() {
    let mut elements = vec![
        create_test_stroke(),
        create_test_image(),
        factory::create_text("note", Font::default(), Color32::BLUE, Pos2::new(3.0, 4.0)),
        factory::create_tex_image("\\frac{1}{2}", vec![9], Rect::from_min_max(Pos2::ZERO, Pos2::new(8.0, 6.0))),
    ];

    for element in &mut elements {
        let before = element.geometry();
        element.scale(Pos2::new(1.0, 1.0), 1.3, 0.7, true);
        element.rotate(Pos2::new(5.0, 5.0), 0.25);
        element.reflect(Axis::Horizontal, 2.0);
        assert!(element.restore_geometry(before.clone()));
        assert_eq!(element.geometry(), before);
    }
}

#[test]
fn test_restore_rejects_foreign_geometry() {
    let mut stroke = create_test_stroke();
    let image_geometry = create_test_image().geometry();
    assert!(!stroke.restore_geometry(image_geometry));
}
