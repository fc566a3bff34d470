//! Borderless windows showing one snapshot each

use gtk4 as gtk;
use log::{debug, info};

use gtk::gdk_pixbuf::Pixbuf;
use gtk::prelude::*;
use gtk::{gdk, gio, glib, Align, DrawingArea, GestureClick, GestureDrag};
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

use crate::app::{AppState, BorderColor, Snapshot, SnapshotId};
use crate::capture::{Point, Raster};
use crate::editor::{ClipboardManager, CompareMode, Frame, WindowDrag};
use crate::ui::dialogs::{choose_border_color, save_snapshot, show_error};
use crate::ui::drawing::{draw_snapshot, raster_to_pixbuf};
use crate::ui::{flush_before_capture, UiContext};

/// Widgets and view state of an open snapshot window
#[derive(Clone)]
pub struct SnapshotView {
    pub id: SnapshotId,
    pub window: gtk::Window,
    pub id_label: gtk::Label,
    drawing_area: DrawingArea,
    pixbuf: Rc<RefCell<Pixbuf>>,
    frame: Rc<RefCell<Frame>>,
    drag: Rc<RefCell<WindowDrag>>,
}

impl SnapshotView {
    fn resize(&self) {
        let pixbuf = self.pixbuf.borrow();
        let (width, height) = self
            .frame
            .borrow()
            .window_size(pixbuf.width() as u32, pixbuf.height() as u32);
        self.drawing_area.set_content_width(width as i32);
        self.drawing_area.set_content_height(height as i32);
        self.window.set_default_size(width as i32, height as i32);
        self.drawing_area.queue_draw();
    }

    fn set_raster(&self, raster: &Raster) {
        *self.pixbuf.borrow_mut() = raster_to_pixbuf(raster);
        self.resize();
    }

    fn set_border_color(&self, color: BorderColor) {
        self.frame.borrow_mut().color = color;
        self.drawing_area.queue_draw();
    }

    /// GTK4 cannot request keep-above, so raising is all that is left
    pub fn set_on_top(&self, on_top: bool) {
        if on_top && self.window.is_visible() {
            self.window.present();
        }
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.window.set_visible(!hidden);
    }
}

/// Register `snapshot` and show it in a new window over the region it came from
pub fn open(ctx: &UiContext, snapshot: Snapshot) -> SnapshotId {
    let pixbuf = raster_to_pixbuf(snapshot.raster());
    let (id, frame, position, show_ids) = {
        let mut s = ctx.state.borrow_mut();
        let frame = Frame::new(s.border_color());
        let position = frame.window_position(snapshot.rectangle().origin());
        let id = s.registry.register(snapshot, position);
        (id, frame, position, s.show_ids)
    };

    let drawing_area = DrawingArea::new();
    let id_label = gtk::Label::builder()
        .label(id.to_string())
        .halign(Align::Start)
        .valign(Align::Start)
        .margin_top(4)
        .margin_start(4)
        .visible(show_ids)
        .build();
    id_label.add_css_class("osd");

    let overlay = gtk::Overlay::builder().child(&drawing_area).build();
    overlay.add_overlay(&id_label);

    let window = gtk::Window::builder()
        .application(&ctx.app)
        .title(format!("Snapshot {}", id))
        .decorated(false)
        .resizable(false)
        .child(&overlay)
        .build();

    let view = SnapshotView {
        id,
        window: window.clone(),
        id_label,
        drawing_area: drawing_area.clone(),
        pixbuf: Rc::new(RefCell::new(pixbuf)),
        frame: Rc::new(RefCell::new(frame)),
        drag: Rc::new(RefCell::new(WindowDrag::new(position))),
    };

    drawing_area.set_draw_func({
        let pixbuf = view.pixbuf.clone();
        let frame = view.frame.clone();
        move |_, cr, _, _| {
            draw_snapshot(cr, &pixbuf.borrow(), &frame.borrow());
        }
    });
    view.resize();

    connect_move_handlers(ctx, &view);
    let popover = create_context_menu(&view);
    window.insert_action_group("snap", Some(&create_actions(ctx, &view)));

    window.connect_close_request({
        let ctx = ctx.clone();
        move |_| {
            ctx.views.borrow_mut().remove(&id);
            ctx.state.borrow_mut().registry.remove(id);
            popover.unparent();
            ctx.refresh_status();
            glib::Propagation::Proceed
        }
    });

    ctx.views.borrow_mut().insert(id, view);
    ctx.refresh_status();
    window.present();
    id
}

fn connect_move_handlers(ctx: &UiContext, view: &SnapshotView) {
    let drag = GestureDrag::new();
    drag.set_button(gdk::BUTTON_PRIMARY);

    drag.connect_drag_begin({
        let view = view.clone();
        move |_, x, y| {
            view.drag
                .borrow_mut()
                .press(Point::new(x.round() as i32, y.round() as i32));
        }
    });

    // the compositor owns window placement; past the drag threshold the move
    // is handed over to it and the gesture sees no further motion
    drag.connect_drag_update({
        let view = view.clone();
        move |gesture, offset_x, offset_y| {
            let Some((start_x, start_y)) = gesture.start_point() else {
                return;
            };
            if !view.drawing_area.drag_check_threshold(
                start_x as i32,
                start_y as i32,
                (start_x + offset_x) as i32,
                (start_y + offset_y) as i32,
            ) {
                return;
            }
            let toplevel = view
                .window
                .surface()
                .and_then(|surface| surface.dynamic_cast::<gdk::Toplevel>().ok());
            let (Some(toplevel), Some(device)) = (toplevel, gesture.device()) else {
                return;
            };
            let Some(anchor) = view.drag.borrow_mut().hand_off() else {
                return;
            };

            debug!("Snapshot {} moved by the window manager", view.id);
            toplevel.begin_move(
                &device,
                gesture.current_button() as i32,
                anchor.x as f64,
                anchor.y as f64,
                gesture.current_event_time(),
            );
        }
    });

    drag.connect_drag_end({
        let ctx = ctx.clone();
        let view = view.clone();
        move |_, _, _| finish_move(&ctx, &view)
    });

    // a window manager move usually cancels the gesture instead of ending it
    drag.connect_cancel({
        let ctx = ctx.clone();
        let view = view.clone();
        move |_, _| finish_move(&ctx, &view)
    });

    view.drawing_area.add_controller(drag);
}

fn finish_move(ctx: &UiContext, view: &SnapshotView) {
    let moved = view.drag.borrow_mut().release();
    if let Some(placement) = moved {
        ctx.state
            .borrow_mut()
            .registry
            .set_placement(view.id, placement);
    }
}

fn create_context_menu(view: &SnapshotView) -> gtk::PopoverMenu {
    let menu = gio::Menu::new();

    let border_section = gio::Menu::new();
    border_section.append(Some("Border"), Some("snap.border"));
    border_section.append(Some("Black Border"), Some("snap.black"));
    border_section.append(Some("Red Border"), Some("snap.red"));
    border_section.append(Some("Border Color..."), Some("snap.color"));
    menu.append_section(None, &border_section);

    let file_section = gio::Menu::new();
    file_section.append(Some("Save..."), Some("snap.save"));
    file_section.append(Some("Copy"), Some("snap.copy"));
    menu.append_section(None, &file_section);

    let capture_section = gio::Menu::new();
    capture_section.append(Some("Recapture"), Some("snap.recapture"));
    capture_section.append(Some("Clone"), Some("snap.clone"));
    let compare_menu = gio::Menu::new();
    for mode in CompareMode::all() {
        let item = gio::MenuItem::new(Some(mode.label()), None);
        item.set_action_and_target_value(Some("snap.compare"), Some(&mode.key().to_variant()));
        compare_menu.append_item(&item);
    }
    capture_section.append_submenu(Some("Compare"), &compare_menu);
    menu.append_section(None, &capture_section);

    let close_section = gio::Menu::new();
    close_section.append(Some("Close"), Some("snap.close"));
    menu.append_section(None, &close_section);

    let popover = gtk::PopoverMenu::from_model(Some(&menu));
    popover.set_has_arrow(false);
    popover.set_parent(&view.drawing_area);

    let click = GestureClick::new();
    click.set_button(gdk::BUTTON_SECONDARY);
    click.connect_pressed({
        let popover = popover.clone();
        move |_, _, x, y| {
            let rect = gdk::Rectangle::new(x as i32, y as i32, 1, 1);
            popover.set_pointing_to(Some(&rect));
            popover.popup();
        }
    });
    view.drawing_area.add_controller(click);

    popover
}

fn create_actions(ctx: &UiContext, view: &SnapshotView) -> gio::SimpleActionGroup {
    let group = gio::SimpleActionGroup::new();

    let border = gio::SimpleAction::new_stateful("border", None, &true.to_variant());
    border.connect_activate({
        let ctx = ctx.clone();
        let view = view.clone();
        move |action, _| {
            let visible = !action
                .state()
                .and_then(|state| state.get::<bool>())
                .unwrap_or(true);
            action.set_state(&visible.to_variant());

            let placement = view
                .drag
                .borrow()
                .placement()
                .map(|p| view.frame.borrow_mut().set_visible(visible, p));
            view.drag.borrow_mut().set_placement(placement);
            ctx.state
                .borrow_mut()
                .registry
                .set_placement(view.id, placement);
            debug!("Snapshot {} border {}", view.id, if visible { "on" } else { "off" });
            view.resize();
        }
    });
    group.add_action(&border);

    for (name, color) in [("black", BorderColor::BLACK), ("red", BorderColor::RED)] {
        let action = gio::SimpleAction::new(name, None);
        action.connect_activate({
            let view = view.clone();
            move |_, _| view.set_border_color(color)
        });
        group.add_action(&action);
    }

    let color = gio::SimpleAction::new("color", None);
    color.connect_activate({
        let view = view.clone();
        move |_, _| {
            let current = view.frame.borrow().color;
            let target = view.clone();
            choose_border_color(&view.window, current, move |chosen| {
                target.set_border_color(chosen)
            });
        }
    });
    group.add_action(&color);

    let save = gio::SimpleAction::new("save", None);
    save.connect_activate({
        let ctx = ctx.clone();
        let view = view.clone();
        move |_, _| save_snapshot(&ctx, view.id, &view.window)
    });
    group.add_action(&save);

    let copy = gio::SimpleAction::new("copy", None);
    copy.connect_activate({
        let ctx = ctx.clone();
        let view = view.clone();
        move |_, _| copy_snapshot(&ctx, &view)
    });
    group.add_action(&copy);

    let recapture = gio::SimpleAction::new("recapture", None);
    recapture.connect_activate({
        let ctx = ctx.clone();
        let view = view.clone();
        move |_, _| recapture_snapshot(&ctx, &view)
    });
    group.add_action(&recapture);

    let clone = gio::SimpleAction::new("clone", None);
    clone.connect_activate({
        let ctx = ctx.clone();
        let view = view.clone();
        move |_, _| derive_snapshot(&ctx, &view, None)
    });
    group.add_action(&clone);

    let compare = gio::SimpleAction::new("compare", Some(glib::VariantTy::STRING));
    compare.connect_activate({
        let ctx = ctx.clone();
        let view = view.clone();
        move |_, parameter| {
            let key = parameter
                .and_then(|p| p.get::<String>())
                .unwrap_or_default();
            match CompareMode::from_str(&key) {
                Ok(mode) => derive_snapshot(&ctx, &view, Some(mode)),
                Err(e) => show_error(&view.window, "Compare failed", &e.to_string()),
            }
        }
    });
    group.add_action(&compare);

    let close = gio::SimpleAction::new("close", None);
    close.connect_activate({
        let window = view.window.clone();
        move |_, _| window.close()
    });
    group.add_action(&close);

    group
}

fn copy_snapshot(ctx: &UiContext, view: &SnapshotView) {
    let s = ctx.state.borrow();
    let Some(entry) = s.registry.get(view.id) else {
        return;
    };
    let clipboard = ClipboardManager::from_widget(&view.window);
    match clipboard.copy_image(entry.snapshot.raster()) {
        Ok(()) => info!("Snapshot {} copied to clipboard", view.id),
        Err(e) => show_error(&view.window, "Copy failed", &e.to_string()),
    }
}

/// Grab the region again in place; the window closes if that fails
fn recapture_snapshot(ctx: &UiContext, view: &SnapshotView) {
    view.window.set_visible(false);
    flush_before_capture();

    let result = {
        let mut s = ctx.state.borrow_mut();
        let AppState {
            registry, source, ..
        } = &mut *s;
        registry.get_mut(view.id).map(|entry| {
            entry
                .snapshot
                .recapture(source.as_ref())
                .map(|()| entry.snapshot.raster().clone())
        })
    };

    match result {
        Some(Ok(raster)) => {
            view.set_raster(&raster);
            view.window.set_visible(true);
        }
        Some(Err(e)) => {
            view.window.close();
            show_error(&ctx.controller, "Recapture failed", &e.to_string());
        }
        None => view.window.set_visible(true),
    }
}

/// Clone the snapshot from a fresh capture, comparing the clone against it
/// when a mode is given, and open the result in its own window
fn derive_snapshot(ctx: &UiContext, view: &SnapshotView, mode: Option<CompareMode>) {
    view.window.set_visible(false);
    flush_before_capture();

    let result = {
        let s = ctx.state.borrow();
        s.registry.get(view.id).map(|entry| match mode {
            Some(mode) => entry
                .snapshot
                .compare_with_screen(s.source.as_ref(), view.id, mode),
            None => entry.snapshot.clone_from_screen(s.source.as_ref(), view.id),
        })
    };
    view.window.set_visible(true);

    let operation = match mode {
        Some(_) => "Compare failed",
        None => "Clone failed",
    };
    match result {
        Some(Ok(derived)) => {
            let derived_id = open(ctx, derived);
            info!("Snapshot {} derived from {}", derived_id, view.id);
        }
        Some(Err(e)) => show_error(&view.window, operation, &e.to_string()),
        None => {}
    }
}
