//! Full-screen selection windows, one per display, forming a snip session

use gtk4 as gtk;
use log::{debug, info, warn};

use gtk::prelude::*;
use gtk::{gdk, glib, DrawingArea, EventControllerKey, GestureClick, GestureDrag};
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::{Action, SnipDelay, Snapshot};
use crate::capture::{capture_all_devices, CaptureResult, DisplayDevice, Point, Rectangle};
use crate::editor::ClipboardManager;
use crate::selection::RegionSelector;
use crate::ui::dialogs::show_error;
use crate::ui::drawing::{draw_selection, fit_scale, raster_to_pixbuf};
use crate::ui::{flush_before_capture, snapshot_window, UiContext};

/// Selection windows of the running session and a pending delayed start
#[derive(Default)]
pub struct SnipSession {
    windows: Vec<gtk::Window>,
    pending: Option<glib::SourceId>,
}

impl SnipSession {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Start a snip now or after `delay`, replacing any session in progress
pub fn request_snip(ctx: &UiContext, delay: SnipDelay) {
    close_session(ctx);

    let Some(duration) = delay.duration() else {
        start_session(ctx);
        return;
    };

    info!("Snip in {} seconds", duration.as_secs());
    ctx.status.set_description(Some(&format!(
        "Snipping in {} seconds...",
        duration.as_secs()
    )));

    let source_id = glib::timeout_add_local_once(duration, {
        let ctx = ctx.clone();
        move || {
            // the source is gone once it fired
            ctx.session.borrow_mut().pending = None;
            start_session(&ctx);
        }
    });
    ctx.session.borrow_mut().pending = Some(source_id);
}

/// Close every selection window and cancel a pending delayed snip
pub fn close_session(ctx: &UiContext) {
    let (windows, pending) = {
        let mut session = ctx.session.borrow_mut();
        (std::mem::take(&mut session.windows), session.pending.take())
    };

    if let Some(source_id) = pending {
        debug!("Cancelling delayed snip");
        source_id.remove();
    }

    if !windows.is_empty() {
        debug!("Closing {} selection windows", windows.len());
        for window in windows {
            window.close();
        }
    }
    ctx.controller.set_visible(true);
    ctx.refresh_status();
}

fn start_session(ctx: &UiContext) {
    ctx.controller.set_visible(false);
    flush_before_capture();

    let captured = {
        let s = ctx.state.borrow();
        capture_all_devices(s.source.as_ref())
    };

    let captures = match captured {
        Ok((captures, failures)) if captures.is_empty() => {
            ctx.controller.set_visible(true);
            let cause = failures
                .first()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "No displays found".to_string());
            show_error(&ctx.controller, "Snip failed", &cause);
            ctx.refresh_status();
            return;
        }
        Ok((captures, _)) => captures,
        Err(e) => {
            ctx.controller.set_visible(true);
            show_error(&ctx.controller, "Snip failed", &e.to_string());
            ctx.refresh_status();
            return;
        }
    };

    info!("Snip session on {} displays", captures.len());
    let display = ctx.controller.display();
    let windows: Vec<gtk::Window> = captures
        .into_iter()
        .enumerate()
        .map(|(index, capture)| {
            let monitor = monitor_for(&display, &capture.device, index);
            create_selection_window(ctx, capture, monitor)
        })
        .collect();

    ctx.session.borrow_mut().windows = windows.clone();
    for window in &windows {
        window.present();
    }
}

/// The GDK monitor showing `device`, matched by origin, falling back to the
/// enumeration order
fn monitor_for(display: &gdk::Display, device: &DisplayDevice, index: usize) -> Option<gdk::Monitor> {
    let list = display.monitors();
    let monitors: Vec<gdk::Monitor> = (0..list.n_items())
        .filter_map(|i| list.item(i))
        .filter_map(|obj| obj.downcast::<gdk::Monitor>().ok())
        .collect();

    let scale = device.scale_factor.max(1.0);
    let physical = (device.bounds.x, device.bounds.y);
    let logical = (
        (device.bounds.x as f32 / scale) as i32,
        (device.bounds.y as f32 / scale) as i32,
    );

    monitors
        .iter()
        .find(|m| {
            let g = m.geometry();
            (g.x(), g.y()) == physical || (g.x(), g.y()) == logical
        })
        .or_else(|| monitors.get(index))
        .cloned()
}

fn create_selection_window(
    ctx: &UiContext,
    capture: CaptureResult,
    monitor: Option<gdk::Monitor>,
) -> gtk::Window {
    let pixbuf = raster_to_pixbuf(&capture.raster);
    let selector = Rc::new(RefCell::new(RegionSelector::new(capture.device.bounds)));
    let capture = Rc::new(capture);

    let drawing_area = DrawingArea::builder().hexpand(true).vexpand(true).build();
    drawing_area.set_cursor_from_name(Some("crosshair"));

    drawing_area.set_draw_func({
        let selector = selector.clone();
        let pixbuf = pixbuf.clone();
        move |_, cr, width, height| {
            let scale = fit_scale(width, height, pixbuf.width(), pixbuf.height());
            draw_selection(cr, &pixbuf, &selector.borrow(), scale);
        }
    });

    let window = gtk::Window::builder()
        .application(&ctx.app)
        .title(format!("Snip {}", capture.device.name))
        .decorated(false)
        .child(&drawing_area)
        .build();

    // widget coordinates to raster pixels
    let to_raster = {
        let drawing_area = drawing_area.clone();
        let pixbuf = pixbuf.clone();
        move |x: f64, y: f64| {
            let scale = fit_scale(
                drawing_area.width(),
                drawing_area.height(),
                pixbuf.width(),
                pixbuf.height(),
            );
            Point::new((x / scale).round() as i32, (y / scale).round() as i32)
        }
    };

    let drag = GestureDrag::new();
    drag.set_button(gdk::BUTTON_PRIMARY);

    drag.connect_drag_begin({
        let selector = selector.clone();
        let drawing_area = drawing_area.clone();
        let to_raster = to_raster.clone();
        move |_, x, y| {
            selector.borrow_mut().press(to_raster(x, y));
            drawing_area.queue_draw();
        }
    });

    drag.connect_drag_update({
        let selector = selector.clone();
        let drawing_area = drawing_area.clone();
        let to_raster = to_raster.clone();
        move |gesture, offset_x, offset_y| {
            if let Some((start_x, start_y)) = gesture.start_point() {
                selector
                    .borrow_mut()
                    .drag(to_raster(start_x + offset_x, start_y + offset_y));
                drawing_area.queue_draw();
            }
        }
    });

    drag.connect_drag_end({
        let selector = selector.clone();
        let drawing_area = drawing_area.clone();
        move |gesture, offset_x, offset_y| {
            if let Some((start_x, start_y)) = gesture.start_point() {
                selector
                    .borrow_mut()
                    .release(to_raster(start_x + offset_x, start_y + offset_y));
                drawing_area.queue_draw();
            }
        }
    });
    drawing_area.add_controller(drag);

    let click = GestureClick::new();
    click.set_button(gdk::BUTTON_SECONDARY);
    click.connect_pressed({
        let ctx = ctx.clone();
        let selector = selector.clone();
        let capture = capture.clone();
        move |_, _, _, _| {
            let committed = selector.borrow_mut().commit();
            finish_session(&ctx, &capture, committed);
        }
    });
    drawing_area.add_controller(click);

    let keys = EventControllerKey::new();
    keys.connect_key_pressed({
        let ctx = ctx.clone();
        move |_, key, _, modifiers| {
            let action = ctx.state.borrow().shortcuts.get_action(key, modifiers);
            if action == Some(Action::Cancel) {
                info!("Snip cancelled");
                close_session(&ctx);
                glib::Propagation::Stop
            } else {
                glib::Propagation::Proceed
            }
        }
    });
    window.add_controller(keys);

    window.connect_close_request({
        let ctx = ctx.clone();
        move |window| {
            let owned = {
                let mut session = ctx.session.borrow_mut();
                let before = session.windows.len();
                session.windows.retain(|w| w != window);
                session.windows.len() != before
            };
            // closed from outside: abandon the rest of the session
            if owned {
                close_session(&ctx);
            }
            glib::Propagation::Proceed
        }
    });

    match monitor {
        Some(monitor) => window.fullscreen_on_monitor(&monitor),
        None => {
            warn!("No monitor found for {}", capture.device.label());
            window.fullscreen();
        }
    }

    window
}

/// End the session; a committed rectangle becomes a snapshot window and is
/// copied to the clipboard right away
fn finish_session(ctx: &UiContext, capture: &CaptureResult, committed: Option<Rectangle>) {
    close_session(ctx);

    let Some(rect) = committed else {
        return;
    };

    let snapshot = match Snapshot::from_capture(capture, &rect) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            show_error(&ctx.controller, "Snip failed", &e.to_string());
            return;
        }
    };

    let clipboard = ClipboardManager::from_widget(&ctx.controller);
    if let Err(e) = clipboard.copy_image(snapshot.raster()) {
        warn!("Failed to copy snapshot: {}", e);
    }

    snapshot_window::open(ctx, snapshot);
}
