use gtk4 as gtk;
use libadwaita as adw;
use log::{debug, info};

use adw::prelude::*;
use gtk::{gio, glib};

use crate::app::{BorderColor, SnipDelay};
use crate::ui::dialogs::{confirm, show_help};
use crate::ui::header::{border_rgba, delay_from_keyboard, HeaderComponents};
use crate::ui::selection_window::{close_session, request_snip};
use crate::ui::UiContext;

pub fn connect_snip_handlers(ctx: &UiContext, header: &HeaderComponents) {
    header.snip_btn.connect_clicked({
        let ctx = ctx.clone();
        move |btn| {
            let delay = delay_from_keyboard(btn);
            debug!("Snip requested ({:?})", delay);
            request_snip(&ctx, delay);
        }
    });

    for (name, delay) in [("snip-short", SnipDelay::Short), ("snip-long", SnipDelay::Long)] {
        let action = gio::SimpleAction::new(name, None);
        action.connect_activate({
            let ctx = ctx.clone();
            move |_, _| request_snip(&ctx, delay)
        });
        ctx.app.add_action(&action);
    }
}

pub fn connect_toggle_handlers(ctx: &UiContext, header: &HeaderComponents) {
    header.on_top_btn.connect_toggled({
        let ctx = ctx.clone();
        move |btn| {
            let on_top = btn.is_active();
            let ids = ctx.state.borrow_mut().set_always_on_top(on_top);
            info!("Snapshots on top: {}", on_top);
            for view in ids.into_iter().filter_map(|id| ctx.view(id)) {
                view.set_on_top(on_top);
            }
        }
    });

    header.hide_btn.connect_toggled({
        let ctx = ctx.clone();
        move |btn| {
            let hidden = btn.is_active();
            let ids = ctx.state.borrow_mut().registry.set_hidden(hidden);
            for view in ids.into_iter().filter_map(|id| ctx.view(id)) {
                view.set_hidden(hidden);
            }
            ctx.refresh_status();
        }
    });
}

/// Close every snapshot window after confirmation
pub fn connect_clear_handler(ctx: &UiContext, header: &HeaderComponents) {
    header.clear_btn.connect_clicked({
        let ctx = ctx.clone();
        move |_| {
            let count = ctx.state.borrow().registry.len();
            if count == 0 {
                return;
            }
            let body = format!("Close all {} snapshots?", count);
            confirm(&ctx.controller, "Clear Snapshots", &body, "_Close All", {
                let ctx = ctx.clone();
                move || clear_all(&ctx)
            });
        }
    });
}

fn clear_all(ctx: &UiContext) {
    let ids = ctx.state.borrow_mut().registry.clear();
    let views: Vec<_> = {
        let mut views = ctx.views.borrow_mut();
        ids.iter().filter_map(|id| views.remove(id)).collect()
    };
    for view in views {
        view.window.close();
    }
    ctx.refresh_status();
}

pub fn connect_border_handlers(ctx: &UiContext, header: &HeaderComponents) {
    header.color_btn.connect_rgba_notify({
        let ctx = ctx.clone();
        move |btn| {
            let rgba = btn.rgba();
            let color = BorderColor::from_rgb_f32(rgba.red(), rgba.green(), rgba.blue());
            if ctx.state.borrow().border_color() != color {
                debug!("Default border color {}", color.to_hex());
                ctx.state.borrow_mut().set_border_color(color);
            }
        }
    });

    for (name, color) in [("border-black", BorderColor::BLACK), ("border-red", BorderColor::RED)] {
        let action = gio::SimpleAction::new(name, None);
        action.connect_activate({
            let color_btn = header.color_btn.clone();
            // the notify handler above stores it
            move |_, _| color_btn.set_rgba(&border_rgba(color))
        });
        ctx.app.add_action(&action);
    }
}

pub fn connect_app_handlers(ctx: &UiContext) {
    let help = gio::SimpleAction::new("help", None);
    help.connect_activate({
        let ctx = ctx.clone();
        move |_, _| show_help(&ctx)
    });
    ctx.app.add_action(&help);

    let quit = gio::SimpleAction::new("quit", None);
    quit.connect_activate({
        let ctx = ctx.clone();
        move |_, _| request_quit(&ctx)
    });
    ctx.app.add_action(&quit);

    ctx.controller.connect_close_request({
        let ctx = ctx.clone();
        move |_| {
            request_quit(&ctx);
            glib::Propagation::Stop
        }
    });
}

/// Quit, asking first when snapshots are still open
fn request_quit(ctx: &UiContext) {
    let count = ctx.state.borrow().registry.len();
    if count == 0 {
        quit(ctx);
        return;
    }
    let body = format!("{} snapshots are still open.", count);
    confirm(&ctx.controller, "Quit Snipper?", &body, "_Quit", {
        let ctx = ctx.clone();
        move || quit(&ctx)
    });
}

fn quit(ctx: &UiContext) {
    info!("Quitting");
    close_session(ctx);
    ctx.state.borrow().persist();
    ctx.app.quit();
}

pub fn connect_all_handlers(ctx: &UiContext, header: &HeaderComponents) {
    debug!("Initializing UI handlers");
    connect_snip_handlers(ctx, header);
    connect_toggle_handlers(ctx, header);
    connect_clear_handler(ctx, header);
    connect_border_handlers(ctx, header);
    connect_app_handlers(ctx);
}
