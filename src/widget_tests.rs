use std::cell::RefCell;
use std::rc::Rc;

use egui::{
    CentralPanel, Context, Event, Id, Key, LayerId, Modifiers, Order, PointerButton, Pos2,
    RawInput, Rect, Sense, Ui, Vec2,
};

use crate::{
    DragDropBox, DragDropOptions, DragDropState, DragTarget, DragTargetInfo as _, DragTargetState,
    DragType, DropTarget, DropTargetState,
};

fn pass(ctx: &Context, time: f64, events: Vec<Event>, add_contents: impl FnOnce(&mut Ui)) {
    let screen_rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0));
    let raw = RawInput {
        screen_rect: Some(screen_rect),
        time: Some(time),
        events,
        ..Default::default()
    };

    ctx.begin_pass(raw);
    CentralPanel::default().show(ctx, add_contents);
    let _ = ctx.end_pass();
}

fn button(pos: Pos2, pressed: bool) -> Event {
    Event::PointerButton {
        pos,
        button: PointerButton::Primary,
        pressed,
        modifiers: Modifiers::NONE,
    }
}

fn square(ui: &mut Ui) {
    ui.allocate_exact_size(Vec2::splat(80.0), Sense::hover());
}

fn strip(ui: &mut Ui) {
    ui.allocate_exact_size(Vec2::new(80.0, 40.0), Sense::hover());
}

fn immediate() -> DragDropOptions {
    DragDropOptions {
        default_drag_type: DragType::Immediate,
        ..Default::default()
    }
}

struct Scene {
    state: DragDropState,
    steak: DragTargetState<String>,
    cat: DropTargetState<String>,
    dropped: Rc<RefCell<Vec<Option<String>>>>,
    show_steak: bool,
    cat_enabled: bool,
    steak_rect: Rect,
    cat_rect: Rect,
}

impl Scene {
    fn new() -> Self {
        Self::with_options(immediate())
    }

    fn with_options(options: DragDropOptions) -> Self {
        let dropped = Rc::new(RefCell::new(Vec::new()));
        let cat = DropTargetState::new(Id::new("cat"), {
            let dropped = Rc::clone(&dropped);
            move |value| dropped.borrow_mut().push(value)
        });
        Self {
            state: DragDropState::new(options),
            steak: DragTargetState::from_value(Id::new("steak"), "steak".to_owned()),
            cat,
            dropped,
            show_steak: true,
            cat_enabled: true,
            steak_rect: Rect::NOTHING,
            cat_rect: Rect::NOTHING,
        }
    }

    fn show(&mut self, ui: &mut Ui) {
        let Self {
            state,
            steak,
            cat,
            show_steak,
            cat_enabled,
            steak_rect,
            cat_rect,
            ..
        } = self;

        DragDropBox::new(state).show(ui, |ui, state| {
            if *show_steak {
                *steak_rect = DragTarget::new(steak).show(ui, state, square).rect;
            } else {
                ui.add_space(80.0);
            }
            ui.add_space(100.0);
            *cat_rect = DropTarget::new(cat)
                .enabled(*cat_enabled)
                .show(ui, state, |ui, _state, _hovered, _data| square(ui))
                .response
                .rect;
        });
    }

    fn frame(&mut self, ctx: &Context, time: f64, events: Vec<Event>) {
        pass(ctx, time, events, |ui| self.show(ui));
    }

    /// Press on the steak and move onto the cat.
    fn drag_steak_onto_cat(&mut self, ctx: &Context) {
        self.frame(ctx, 0.0, vec![]);
        let grab = self.steak_rect.center();
        let hover = self.cat_rect.center();
        self.frame(ctx, 0.1, vec![Event::PointerMoved(grab), button(grab, true)]);
        self.frame(ctx, 0.2, vec![Event::PointerMoved(hover)]);
    }
}

#[test]
fn widgets_register_with_container_local_bounds() {
    let ctx = Context::default();
    let mut scene = Scene::new();
    scene.frame(&ctx, 0.0, vec![]);

    assert_eq!(scene.state.drag_target_count(), 1);
    assert_eq!(scene.state.drop_target_count(), 1);

    let container = scene.state.container_rect().expect("attached by the box");
    let steak = scene.steak.bound_in_box();
    assert_eq!(steak.size(), Vec2::splat(80.0));
    assert_eq!(steak.min, scene.steak_rect.min - container.min.to_vec2());
    assert_eq!(scene.cat.bound_in_box().size(), Vec2::splat(80.0));
}

#[test]
fn pointer_drag_drops_the_steak_on_the_cat() {
    let ctx = Context::default();
    let mut scene = Scene::new();
    scene.drag_steak_onto_cat(&ctx);

    assert!(scene.state.is_dragging());
    assert!(scene.steak.is_dragging());
    assert!(scene.cat.is_in_bound());
    assert_eq!(scene.cat.hovered_data(), Some("steak".to_owned()));

    let overlay = scene.state.overlay_rect();
    assert!((overlay.center() - scene.cat_rect.center()).length() < 0.5);

    let release = scene.cat_rect.center();
    scene.frame(&ctx, 0.3, vec![button(release, false)]);

    assert!(!scene.state.is_dragging());
    assert!(!scene.steak.is_dragging());
    assert!(!scene.cat.is_in_bound());
    assert_eq!(*scene.dropped.borrow(), vec![Some("steak".to_owned())]);
}

#[test]
fn escape_cancels_the_drag() {
    let ctx = Context::default();
    let mut scene = Scene::new();
    scene.drag_steak_onto_cat(&ctx);
    assert!(scene.cat.is_in_bound());

    let escape = Event::Key {
        key: Key::Escape,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: Modifiers::NONE,
    };
    scene.frame(&ctx, 0.3, vec![escape]);
    assert!(!scene.state.is_dragging());
    assert!(!scene.cat.is_in_bound());

    let release = scene.cat_rect.center();
    scene.frame(&ctx, 0.4, vec![button(release, false)]);
    assert!(scene.dropped.borrow().is_empty());
}

#[test]
fn targets_that_stop_showing_are_dropped() {
    let ctx = Context::default();
    let mut scene = Scene::new();
    scene.frame(&ctx, 0.0, vec![]);

    scene.show_steak = false;
    scene.cat_enabled = false;
    scene.frame(&ctx, 0.1, vec![]);

    assert_eq!(scene.state.drag_target_count(), 0);
    assert_eq!(scene.state.drop_target_count(), 0);
}

#[test]
fn press_outside_every_target_does_not_drag() {
    let ctx = Context::default();
    let mut scene = Scene::new();
    scene.frame(&ctx, 0.0, vec![]);

    let empty = Pos2::new(600.0, 500.0);
    scene.frame(&ctx, 0.1, vec![Event::PointerMoved(empty), button(empty, true)]);
    let hover = scene.cat_rect.center();
    scene.frame(&ctx, 0.2, vec![Event::PointerMoved(hover)]);

    assert!(!scene.state.is_dragging());
    assert!(!scene.cat.is_in_bound());
}

#[test]
fn huge_long_press_timeout_never_fires() {
    let ctx = Context::default();
    let mut scene = Scene::with_options(DragDropOptions {
        long_press_timeout: 1e30,
        ..Default::default()
    });
    scene.frame(&ctx, 0.0, vec![]);

    let grab = scene.steak_rect.center();
    scene.frame(&ctx, 0.1, vec![Event::PointerMoved(grab), button(grab, true)]);
    scene.frame(&ctx, 5.0, vec![]);

    assert!(scene.state.long_press_deadline().is_some());
    assert!(!scene.state.is_dragging());
    scene.frame(&ctx, 5.1, vec![button(grab, false)]);
    assert!(scene.state.long_press_deadline().is_none());
}

#[test]
fn overlay_does_not_take_the_pointer() {
    let ctx = Context::default();
    let mut scene = Scene::new();
    scene.drag_steak_onto_cat(&ctx);
    assert!(scene.state.is_dragging());

    let tooltip_layers: Vec<LayerId> = ctx.memory(|mem| {
        mem.layer_ids()
            .filter(|layer| layer.order == Order::Tooltip)
            .collect()
    });
    assert_eq!(tooltip_layers.len(), 1, "the overlay is painted in its own area");

    // The overlay now floats over the cat, right under the pointer.
    let hover = scene.cat_rect.center();
    assert_ne!(ctx.layer_id_at(hover), Some(tooltip_layers[0]));
}

/// A steak outside, and an outer zone holding an inner zone and a draggable bone.
struct NestedScene {
    state: DragDropState,
    steak: DragTargetState<String>,
    bone: DragTargetState<String>,
    outer: DropTargetState<String>,
    inner: DropTargetState<String>,
    dropped_inside: Rc<RefCell<Vec<Option<String>>>>,
    steak_rect: Rect,
    bone_rect: Rect,
    outer_rect: Rect,
    inner_rect: Rect,
}

impl NestedScene {
    fn new() -> Self {
        let dropped_inside = Rc::new(RefCell::new(Vec::new()));
        let inner = DropTargetState::new(Id::new("inner"), {
            let dropped = Rc::clone(&dropped_inside);
            move |value| dropped.borrow_mut().push(value)
        });
        Self {
            state: DragDropState::new(immediate()),
            steak: DragTargetState::from_value(Id::new("steak"), "steak".to_owned()),
            bone: DragTargetState::from_value(Id::new("bone"), "bone".to_owned()),
            outer: DropTargetState::without_callback(Id::new("outer")),
            inner,
            dropped_inside,
            steak_rect: Rect::NOTHING,
            bone_rect: Rect::NOTHING,
            outer_rect: Rect::NOTHING,
            inner_rect: Rect::NOTHING,
        }
    }

    fn frame(&mut self, ctx: &Context, time: f64, events: Vec<Event>) {
        let Self {
            state,
            steak,
            bone,
            outer,
            inner,
            steak_rect,
            bone_rect,
            outer_rect,
            inner_rect,
            ..
        } = self;

        pass(ctx, time, events, |ui| {
            DragDropBox::new(state).show(ui, |ui, state| {
                *steak_rect = DragTarget::new(steak).show(ui, state, square).rect;
                ui.add_space(40.0);
                *outer_rect = DropTarget::new(outer)
                    .show(ui, state, |ui, state, _hovered, _data| {
                        strip(ui);
                        *inner_rect = DropTarget::new(inner)
                            .show(ui, state, |ui, _state, _hovered, _data| square(ui))
                            .response
                            .rect;
                        strip(ui);
                        *bone_rect = DragTarget::new(bone).show(ui, state, square).rect;
                    })
                    .response
                    .rect;
            });
        });
    }

    fn drag(&mut self, ctx: &Context, from: Pos2, to: Pos2) {
        self.frame(ctx, 0.1, vec![Event::PointerMoved(from), button(from, true)]);
        self.frame(ctx, 0.2, vec![Event::PointerMoved(to)]);
    }
}

#[test]
fn nested_zone_is_entered_instead_of_its_parent() {
    let ctx = Context::default();
    let mut scene = NestedScene::new();
    scene.frame(&ctx, 0.0, vec![]);
    assert!(scene.outer_rect.contains_rect(scene.inner_rect));

    let (grab, hover) = (scene.steak_rect.center(), scene.inner_rect.center());
    scene.drag(&ctx, grab, hover);

    assert!(scene.steak.is_dragging());
    assert!(scene.inner.is_in_bound());
    assert!(!scene.outer.is_in_bound());
    assert_eq!(scene.inner.hovered_data(), Some("steak".to_owned()));

    scene.frame(&ctx, 0.3, vec![button(hover, false)]);
    assert_eq!(*scene.dropped_inside.borrow(), vec![Some("steak".to_owned())]);
    assert!(!scene.inner.is_in_bound());
}

#[test]
fn drag_targets_inside_a_zone_can_be_picked_up() {
    let ctx = Context::default();
    let mut scene = NestedScene::new();
    scene.frame(&ctx, 0.0, vec![]);
    assert_eq!(scene.state.drag_target_count(), 2);
    assert_eq!(scene.state.drop_target_count(), 2);

    // The strip above the inner zone belongs to the outer zone only.
    let grab = scene.bone_rect.center();
    let hover = scene.outer_rect.min + Vec2::new(40.0, 20.0);
    assert!(!scene.inner_rect.contains(hover));
    scene.drag(&ctx, grab, hover);

    assert!(scene.bone.is_dragging());
    assert!(!scene.steak.is_dragging());
    assert!(scene.outer.is_in_bound());
    assert!(!scene.inner.is_in_bound());
    assert_eq!(scene.outer.hovered_data(), Some("bone".to_owned()));
}
