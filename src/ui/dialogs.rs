use gtk4 as gtk;
use libadwaita as adw;
use log::{error, info};

use adw::prelude::*;
use gtk::{gio, glib, Align, Orientation};
use image::ImageFormat;
use std::path::Path;

use crate::app::{Action, BorderColor, ReportRow, SnapshotId};
use crate::capture::Raster;
use crate::editor::save::{extension, format_for_extension};
use crate::editor::{
    resolve_target, save_raster, unconfirmed_overwrite, SaveError, SAVE_FORMATS,
};
use crate::ui::header::border_rgba;
use crate::ui::UiContext;

const USAGE: &str = "\
Snip: every display is shown dimmed. Press and drag the primary button to \
span a region. Further presses move the edge nearest to the pointer. Click \
the secondary button to take the snapshot, press Escape to cancel.

Hold Ctrl while pressing Snip to wait 3 seconds, Ctrl+Shift to wait 10.

Snapshots can be dragged around. Their context menu (secondary button) \
toggles the border, changes its color, saves, copies, recaptures the same \
region, clones it, or compares a fresh capture against it.";

/// Modal error notification naming the operation and its cause
pub fn show_error(parent: &impl IsA<gtk::Widget>, operation: &str, cause: &str) {
    show_error_then(parent, operation, cause, || {});
}

/// Like `show_error`, running `after` once the dialog is dismissed
pub fn show_error_then(
    parent: &impl IsA<gtk::Widget>,
    operation: &str,
    cause: &str,
    after: impl Fn() + 'static,
) {
    error!("{}: {}", operation, cause);
    let dialog = adw::AlertDialog::new(Some(operation), Some(cause));
    dialog.add_response("close", "_Close");
    dialog.set_default_response(Some("close"));
    dialog.set_close_response("close");
    dialog.connect_response(None, move |_, _| after());
    dialog.present(Some(parent));
}

/// Ask before a destructive bulk operation
pub fn confirm(
    parent: &impl IsA<gtk::Widget>,
    heading: &str,
    body: &str,
    confirm_label: &str,
    on_confirm: impl Fn() + 'static,
) {
    let dialog = adw::AlertDialog::new(Some(heading), Some(body));
    dialog.add_responses(&[("cancel", "_Cancel"), ("confirm", confirm_label)]);
    dialog.set_response_appearance("confirm", adw::ResponseAppearance::Destructive);
    dialog.set_default_response(Some("cancel"));
    dialog.set_close_response("cancel");
    dialog.connect_response(None, move |_, response| {
        if response == "confirm" {
            on_confirm();
        }
    });
    dialog.present(Some(parent));
}

/// Usage text, the session report and the keyboard shortcuts
///
/// While the window is open every snapshot shows its id.
pub fn show_help(ctx: &UiContext) {
    let window = gtk::Window::builder()
        .title("Snipper Help")
        .transient_for(&ctx.controller)
        .default_width(720)
        .default_height(560)
        .build();

    let vbox = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .spacing(18)
        .margin_top(12)
        .margin_bottom(12)
        .margin_start(12)
        .margin_end(12)
        .build();

    let usage = gtk::Label::builder()
        .label(USAGE)
        .wrap(true)
        .xalign(0.0)
        .build();
    vbox.append(&usage);

    let rows = ctx.state.borrow().registry.report();
    vbox.append(&report_grid(&rows));
    vbox.append(&shortcuts_group(ctx));

    let scrolled_window = gtk::ScrolledWindow::builder()
        .child(&vbox)
        .vexpand(true)
        .build();
    window.set_child(Some(&scrolled_window));

    set_ids_visible(ctx, true);
    window.connect_close_request({
        let ctx = ctx.clone();
        move |_| {
            set_ids_visible(&ctx, false);
            glib::Propagation::Proceed
        }
    });

    window.present();
}

fn set_ids_visible(ctx: &UiContext, visible: bool) {
    ctx.state.borrow_mut().show_ids = visible;
    for view in ctx.all_views() {
        view.id_label.set_visible(visible);
    }
}

fn report_grid(rows: &[ReportRow]) -> gtk::Widget {
    if rows.is_empty() {
        let label = gtk::Label::builder()
            .label("No snapshots open")
            .halign(Align::Start)
            .build();
        label.add_css_class("dim-label");
        return label.upcast();
    }

    let grid = gtk::Grid::builder()
        .column_spacing(18)
        .row_spacing(6)
        .build();

    for (column, title) in ReportRow::HEADERS.iter().enumerate() {
        let label = gtk::Label::builder().label(*title).halign(Align::Start).build();
        label.add_css_class("heading");
        grid.attach(&label, column as i32, 0, 1, 1);
    }

    for (row, report) in rows.iter().enumerate() {
        for (column, cell) in report.cells().iter().enumerate() {
            let label = gtk::Label::builder()
                .label(cell.as_str())
                .halign(Align::Start)
                .selectable(true)
                .build();
            grid.attach(&label, column as i32, row as i32 + 1, 1, 1);
        }
    }

    grid.upcast()
}

fn shortcuts_group(ctx: &UiContext) -> adw::PreferencesGroup {
    let group = adw::PreferencesGroup::builder()
        .title("Keyboard Shortcuts")
        .build();

    let s = ctx.state.borrow();
    for action in [
        Action::Copy,
        Action::Save,
        Action::Recapture,
        Action::Clone,
        Action::Close,
        Action::Cancel,
    ] {
        let shortcut_label = s.shortcuts.get_shortcut_label(action);
        let row = adw::ActionRow::builder().title(action.label()).build();
        let accel = gtk::ShortcutLabel::builder()
            .accelerator(shortcut_label.as_str())
            .valign(Align::Center)
            .build();
        row.add_suffix(&accel);
        group.add(&row);
    }

    group
}

fn file_filters() -> gio::ListStore {
    let store = gio::ListStore::new::<gtk::FileFilter>();
    for format in SAVE_FORMATS {
        let filter = gtk::FileFilter::new();
        filter.set_name(Some(&extension(*format).to_uppercase()));
        for ext in format.extensions_str() {
            filter.add_suffix(ext);
        }
        store.append(&filter);
    }
    store
}

/// Save a snapshot through the file dialog
///
/// The dialog comes back after a failed save so another name can be tried.
pub fn save_snapshot(ctx: &UiContext, id: SnapshotId, parent: &gtk::Window) {
    let (raster, save_dir, save_format) = {
        let s = ctx.state.borrow();
        let Some(entry) = s.registry.get(id) else {
            return;
        };
        (
            entry.snapshot.raster().clone(),
            s.preferences.save_dir.clone(),
            s.preferences.save_format.clone(),
        )
    };

    let dialog = gtk::FileDialog::builder()
        .title("Save Snapshot")
        .modal(true)
        .initial_name(format!("snapshot-{}.{}", id, save_format))
        .filters(&file_filters())
        .build();
    if let Some(dir) = save_dir {
        dialog.set_initial_folder(Some(&gio::File::for_path(dir)));
    }

    let ctx = ctx.clone();
    let parent = parent.clone();
    glib::spawn_future_local(async move {
        let file = match dialog.save_future(Some(&parent)).await {
            Ok(file) => file,
            Err(_) => return,
        };
        let Some(path) = file.path() else {
            return;
        };

        let fallback = format_for_extension(&ctx.state.borrow().preferences.save_format);
        let (target, format) = match resolve_target(&path, fallback) {
            Ok(resolved) => resolved,
            Err(e) => {
                report_save_error(&ctx, id, &parent, &path, e);
                return;
            }
        };

        if unconfirmed_overwrite(&path, &target) {
            let body = format!("{} already exists. Replace it?", target.display());
            confirm(&parent, "Overwrite?", &body, "_Replace", {
                let ctx = ctx.clone();
                let parent = parent.clone();
                move || finish_save(&ctx, id, &raster, &parent, &target, format)
            });
        } else {
            finish_save(&ctx, id, &raster, &parent, &target, format);
        }
    });
}

fn finish_save(
    ctx: &UiContext,
    id: SnapshotId,
    raster: &Raster,
    parent: &gtk::Window,
    target: &Path,
    format: ImageFormat,
) {
    match write_snapshot(ctx, id, raster, target, format) {
        Ok(()) => info!("Snapshot {} saved to {:?}", id, target),
        Err(e) => report_save_error(ctx, id, parent, target, e),
    }
}

/// Show the failure, then offer the save dialog again
fn report_save_error(
    ctx: &UiContext,
    id: SnapshotId,
    parent: &gtk::Window,
    path: &Path,
    e: SaveError,
) {
    let message = format!("{} (writing {})", e, path.display());
    show_error_then(parent, "Save failed", &message, {
        let ctx = ctx.clone();
        let parent = parent.clone();
        move || save_snapshot(&ctx, id, &parent)
    });
}

fn write_snapshot(
    ctx: &UiContext,
    id: SnapshotId,
    raster: &Raster,
    target: &Path,
    format: ImageFormat,
) -> Result<(), SaveError> {
    save_raster(raster, target, format)?;

    let mut s = ctx.state.borrow_mut();
    s.registry.set_saved_path(id, target.to_path_buf());
    s.preferences.save_dir = target.parent().map(Path::to_path_buf);
    s.preferences.save_format = extension(format).to_string();
    s.persist();
    Ok(())
}

/// Pick an arbitrary border color; `on_chosen` only runs on confirmation
pub fn choose_border_color(
    parent: &gtk::Window,
    initial: BorderColor,
    on_chosen: impl Fn(BorderColor) + 'static,
) {
    let dialog = gtk::ColorDialog::builder()
        .title("Border Color")
        .with_alpha(false)
        .build();
    let parent = parent.clone();
    glib::spawn_future_local(async move {
        let initial = border_rgba(initial);
        if let Ok(rgba) = dialog.choose_rgba_future(Some(&parent), Some(&initial)).await {
            on_chosen(BorderColor::from_rgb_f32(rgba.red(), rgba.green(), rgba.blue()));
        }
    });
}
