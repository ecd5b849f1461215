#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui;
use egui_dragdrop::{
    DataToDrop, DragDropBox, DragDropOptions, DragDropState, DragTarget, DragTargetState, DragType,
    DropTarget, DropTargetState,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Food {
    Steak,
    Fish,
    Bone,
    Carrot,
}

impl Food {
    const ALL: [Self; 4] = [Self::Steak, Self::Fish, Self::Bone, Self::Carrot];

    fn name(self) -> &'static str {
        match self {
            Self::Steak => "Steak",
            Self::Fish => "Fish",
            Self::Bone => "Bone",
            Self::Carrot => "Carrot",
        }
    }

    fn color(self) -> egui::Color32 {
        match self {
            Self::Steak => egui::Color32::from_rgb(190, 60, 60),
            Self::Fish => egui::Color32::from_rgb(70, 130, 200),
            Self::Bone => egui::Color32::from_rgb(220, 215, 190),
            Self::Carrot => egui::Color32::from_rgb(240, 140, 40),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Animal {
    Cat,
    Dog,
    Rabbit,
}

impl Animal {
    const ALL: [Self; 3] = [Self::Cat, Self::Dog, Self::Rabbit];

    fn name(self) -> &'static str {
        match self {
            Self::Cat => "Cat",
            Self::Dog => "Dog",
            Self::Rabbit => "Rabbit",
        }
    }

    fn eats(self, food: Food) -> bool {
        matches!(
            (self, food),
            (Self::Cat, Food::Fish | Food::Steak)
                | (Self::Dog, Food::Bone | Food::Steak)
                | (Self::Rabbit, Food::Carrot)
        )
    }
}

type Log = Rc<RefCell<Vec<String>>>;

struct App {
    state: DragDropState,
    animated: bool,
    drag_type: DragType,
    hide_source: bool,

    foods: Vec<(Food, DragTargetState<Food>)>,
    animals: Vec<(Animal, DropTargetState<Food>)>,
    trash: DropTargetState<String>,
    log: Log,
}

impl Default for App {
    fn default() -> Self {
        let log = Log::default();

        let foods = Food::ALL
            .into_iter()
            .map(|food| {
                // Anything edible can also be thrown away by name.
                let data = DataToDrop::from_value(food)
                    .accepting_as(|food: Food| food.name().to_owned());
                (food, DragTargetState::new(egui::Id::new(food.name()), data))
            })
            .collect();

        let animals = Animal::ALL
            .into_iter()
            .map(|animal| {
                let log = Rc::clone(&log);
                let zone = DropTargetState::new(
                    egui::Id::new(animal.name()),
                    move |food: Option<Food>| {
                        let Some(food) = food else { return };
                        let verdict = if animal.eats(food) { "loves" } else { "ignores" };
                        log.borrow_mut()
                            .push(format!("{} {verdict} the {}", animal.name(), food.name()));
                    },
                );
                (animal, zone)
            })
            .collect();

        let trash = DropTargetState::new(egui::Id::new("trash"), {
            let log = Rc::clone(&log);
            move |name: Option<String>| {
                if let Some(name) = name {
                    log.borrow_mut().push(format!("{name} went in the trash"));
                }
            }
        });

        let mut app = Self {
            state: DragDropState::default(),
            animated: true,
            drag_type: DragType::LongPress,
            hide_source: false,
            foods,
            animals,
            trash,
            log,
        };
        app.rebuild_state();
        app
    }
}

impl App {
    fn rebuild_state(&mut self) {
        let mut options = if self.animated {
            DragDropOptions::animated()
        } else {
            DragDropOptions::default()
        };
        options.default_drag_type = self.drag_type;
        options.debug_event_log = true;

        self.state.dispose();
        self.state = DragDropState::new(options);
    }

    fn settings_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut changed = ui.checkbox(&mut self.animated, "Animated").changed();
            changed |= ui
                .radio_value(&mut self.drag_type, DragType::LongPress, "Long press")
                .changed();
            changed |= ui
                .radio_value(&mut self.drag_type, DragType::Immediate, "Immediate")
                .changed();
            if changed {
                self.rebuild_state();
            }
            ui.checkbox(&mut self.hide_source, "Hide source while dragging");
        });
    }
}

fn tile(ui: &mut egui::Ui, label: &str, fill: egui::Color32, highlighted: bool) {
    let stroke = if highlighted {
        egui::Stroke::new(3.0, ui.visuals().selection.stroke.color)
    } else {
        egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
    };
    egui::Frame::new()
        .fill(fill)
        .stroke(stroke)
        .corner_radius(8.0)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_min_size(egui::vec2(96.0, 48.0));
            ui.centered_and_justified(|ui| {
                ui.strong(label);
            });
        });
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("settings").show(ctx, |ui| self.settings_ui(ui));

        egui::SidePanel::right("events")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Meals");
                for line in self.log.borrow().iter().rev().take(12) {
                    ui.label(line);
                }
                ui.separator();
                ui.heading("Session");
                ui.monospace(self.state.debug_summary());
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for line in self.state.debug_log() {
                        ui.monospace(line);
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Self {
                state,
                hide_source,
                foods,
                animals,
                trash,
                ..
            } = self;

            DragDropBox::new(state).show(ui, |ui, state| {
                ui.heading("Food");
                ui.horizontal_wrapped(|ui| {
                    for (food, target) in &*foods {
                        let food = *food;
                        DragTarget::new(target)
                            .hidden_while_dragging(*hide_source)
                            .show(ui, state, move |ui| {
                                tile(ui, food.name(), food.color(), false);
                            });
                    }
                });

                ui.add_space(48.0);
                ui.heading("Animals");
                ui.horizontal_wrapped(|ui| {
                    for (animal, zone) in &*animals {
                        DropTarget::new(zone).show(
                            ui,
                            state,
                            |ui, _state, hovered, food| {
                                let label = match food {
                                    Some(food) => format!("{} ← {}", animal.name(), food.name()),
                                    None => animal.name().to_owned(),
                                };
                                let fill = ui.visuals().faint_bg_color;
                                tile(ui, &label, fill, hovered);
                            },
                        );
                    }
                });

                ui.add_space(48.0);
                DropTarget::new(trash).show(ui, state, |ui, _state, hovered, _| {
                    let fill = ui.visuals().extreme_bg_color;
                    tile(ui, "Trash", fill, hovered);
                });
            });
        });
    }
}

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_title("egui_dragdrop: animals"),
        ..Default::default()
    };
    eframe::run_native(
        "egui_dragdrop: animals",
        options,
        Box::new(|_cc| Ok(Box::<App>::default())),
    )
}
