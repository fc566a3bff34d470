pub mod dialogs;
pub mod drawing;
pub mod handlers;
pub mod header;
pub mod selection_window;
pub mod snapshot_window;

use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use gtk::Orientation;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use crate::app::{AppState, SnapshotId};
use selection_window::SnipSession;
use snapshot_window::SnapshotView;

/// Handles shared by every window of the application
#[derive(Clone)]
pub struct UiContext {
    pub app: adw::Application,
    pub controller: adw::ApplicationWindow,
    pub status: adw::StatusPage,
    pub state: Rc<RefCell<AppState>>,
    pub views: Rc<RefCell<HashMap<SnapshotId, SnapshotView>>>,
    pub session: Rc<RefCell<SnipSession>>,
}

impl UiContext {
    pub fn view(&self, id: SnapshotId) -> Option<SnapshotView> {
        self.views.borrow().get(&id).cloned()
    }

    pub fn all_views(&self) -> Vec<SnapshotView> {
        self.views.borrow().values().cloned().collect()
    }

    /// Refresh the controller's summary of the session
    pub fn refresh_status(&self) {
        if self.session.borrow().is_pending() {
            return;
        }
        let s = self.state.borrow();
        let count = s.registry.len();
        let description = match count {
            0 => "No snapshots open".to_string(),
            1 => "1 snapshot open".to_string(),
            n => format!("{} snapshots open", n),
        };
        let hidden = if s.registry.is_hidden() { " (hidden)" } else { "" };
        self.status
            .set_description(Some(&format!("{}{}", description, hidden)));
    }
}

/// Let pending redraws and unmaps reach the screen before grabbing it
pub fn flush_before_capture() {
    let context = gtk::glib::MainContext::default();
    while context.pending() {
        context.iteration(false);
    }
    std::thread::sleep(Duration::from_millis(200));
}

pub fn build_ui(app: &adw::Application) {
    let state = Rc::new(RefCell::new(AppState::new()));

    let accels = state.borrow().shortcuts.accelerators();
    for (action, accel) in &accels {
        debug!("Binding {} to {}", accel, action);
        app.set_accels_for_action(action, &[accel.as_str()]);
    }

    let header = header::create_header_bar(&state);

    let status = adw::StatusPage::builder()
        .icon_name("applets-screenshooter-symbolic")
        .title("Snipper")
        .vexpand(true)
        .build();

    let content = gtk::Box::builder()
        .orientation(Orientation::Vertical)
        .build();
    content.append(&header.header_bar);
    content.append(&status);

    let controller = adw::ApplicationWindow::builder()
        .application(app)
        .title("Snipper")
        .content(&content)
        .default_width(560)
        .default_height(320)
        .build();

    let ctx = UiContext {
        app: app.clone(),
        controller: controller.clone(),
        status,
        state,
        views: Rc::new(RefCell::new(HashMap::new())),
        session: Rc::new(RefCell::new(SnipSession::default())),
    };

    handlers::connect_all_handlers(&ctx, &header);
    ctx.refresh_status();

    controller.present();
}
