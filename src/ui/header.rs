use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use gtk::{gdk, gio, Orientation};
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::{AppState, BorderColor, SnipDelay};

pub struct HeaderComponents {
    pub header_bar: adw::HeaderBar,
    pub snip_btn: adw::SplitButton,
    pub on_top_btn: gtk::ToggleButton,
    pub hide_btn: gtk::ToggleButton,
    pub clear_btn: gtk::Button,
    pub color_btn: gtk::ColorDialogButton,
}

pub fn create_header_bar(state: &Rc<RefCell<AppState>>) -> HeaderComponents {
    let s = state.borrow();

    let delay_menu = gio::Menu::new();
    delay_menu.append(Some(SnipDelay::Short.label()), Some("app.snip-short"));
    delay_menu.append(Some(SnipDelay::Long.label()), Some("app.snip-long"));

    let snip_btn = adw::SplitButton::builder()
        .label(SnipDelay::Immediate.label())
        .tooltip_text("Snip a region (Ctrl: in 3 seconds, Ctrl+Shift: in 10 seconds)")
        .menu_model(&delay_menu)
        .build();
    snip_btn.add_css_class("suggested-action");

    let on_top_btn = gtk::ToggleButton::builder()
        .icon_name("go-top-symbolic")
        .tooltip_text("Keep snapshots on top")
        .active(s.registry.always_on_top())
        .build();

    let hide_btn = gtk::ToggleButton::builder()
        .icon_name("view-conceal-symbolic")
        .tooltip_text("Hide all snapshots")
        .build();

    let clear_btn = gtk::Button::builder()
        .icon_name("edit-clear-all-symbolic")
        .tooltip_text("Close all snapshots")
        .build();

    let toggles = gtk::Box::builder()
        .orientation(Orientation::Horizontal)
        .build();
    toggles.add_css_class("linked");
    toggles.append(&on_top_btn);
    toggles.append(&hide_btn);

    let color_btn = gtk::ColorDialogButton::builder()
        .dialog(
            &gtk::ColorDialog::builder()
                .title("Border Color")
                .with_alpha(false)
                .build(),
        )
        .rgba(&border_rgba(s.border_color()))
        .tooltip_text("Border color of new snapshots")
        .build();

    let menu = gio::Menu::new();
    let border_section = gio::Menu::new();
    border_section.append(Some("Black Border"), Some("app.border-black"));
    border_section.append(Some("Red Border"), Some("app.border-red"));
    menu.append_section(None, &border_section);
    let app_section = gio::Menu::new();
    app_section.append(Some("Help"), Some("app.help"));
    app_section.append(Some("Quit"), Some("app.quit"));
    menu.append_section(None, &app_section);

    let menu_btn = gtk::MenuButton::builder()
        .icon_name("open-menu-symbolic")
        .menu_model(&menu)
        .build();

    let end_box = gtk::Box::builder()
        .orientation(Orientation::Horizontal)
        .spacing(6)
        .build();
    end_box.append(&color_btn);
    end_box.append(&menu_btn);

    let start_box = gtk::Box::builder()
        .orientation(Orientation::Horizontal)
        .spacing(6)
        .build();
    start_box.append(&snip_btn);
    start_box.append(&toggles);
    start_box.append(&clear_btn);

    let header_bar = adw::HeaderBar::new();
    header_bar.pack_start(&start_box);
    header_bar.pack_end(&end_box);

    HeaderComponents {
        header_bar,
        snip_btn,
        on_top_btn,
        hide_btn,
        clear_btn,
        color_btn,
    }
}

/// The RGBA shown by the color button for a border color
pub fn border_rgba(color: BorderColor) -> gdk::RGBA {
    let (r, g, b) = color.to_rgb_f64();
    gdk::RGBA::new(r as f32, g as f32, b as f32, 1.0)
}

/// Delay requested by the modifiers currently held on the keyboard
pub fn delay_from_keyboard(widget: &impl IsA<gtk::Widget>) -> SnipDelay {
    let modifiers = widget
        .display()
        .default_seat()
        .and_then(|seat| seat.keyboard())
        .map(|keyboard| keyboard.modifier_state())
        .unwrap_or_else(gdk::ModifierType::empty);
    SnipDelay::from_modifiers(modifiers)
}
