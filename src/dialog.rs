// src/dialog.rs

use crate::controller::{AutoUpdateController, UpdateChoice};
use crate::model::UpdateInfo;
use crate::preferences::AutoUpdatePreference;
use gtk::prelude::*;
use gtk::{
    Box as GtkBox, Button, CheckButton, Dialog, HeaderBar, Label, Orientation, ResponseType,
    Window,
};
#[cfg(not(feature = "web-notes"))]
use gtk::{ScrolledWindow, TextBuffer, TextView};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type ChoiceHandler = Box<dyn Fn(UpdateChoice)>;

/// Modal dialog showing release notes and the auto-update toggle.
pub struct AutoUpdateDialog {
    dialog: Dialog,
    controller: Rc<AutoUpdateController>,
    auto_check: CheckButton,
    #[cfg(not(feature = "web-notes"))]
    text_view: TextView,
    #[cfg(feature = "web-notes")]
    web_view: webkit6::WebView,
    handlers: Rc<RefCell<Vec<ChoiceHandler>>>,
}

impl AutoUpdateDialog {
    pub fn new(
        parent: Option<&impl IsA<Window>>,
        info: &Rc<UpdateInfo>,
        prefs: Rc<dyn AutoUpdatePreference>,
    ) -> Self {
        let controller = Rc::new(AutoUpdateController::new(info, prefs));

        let dialog = Dialog::builder()
            .modal(true)
            .title("Software Update")
            .default_width(640)
            .default_height(480)
            .resizable(true)
            .build();
        if let Some(parent) = parent {
            dialog.set_transient_for(Some(parent));
        }

        let header_bar = HeaderBar::new();
        header_bar.set_title_widget(Some(&Label::new(Some("Software Update"))));
        dialog.set_titlebar(Some(&header_bar));

        let main_vbox = GtkBox::new(Orientation::Vertical, 12);
        main_vbox.set_margin_top(16);
        main_vbox.set_margin_bottom(8);
        main_vbox.set_margin_start(16);
        main_vbox.set_margin_end(16);

        let heading = Label::new(None);
        heading.set_markup(&format!(
            "<span size='large' weight='bold'>{}</span>",
            glib::markup_escape_text(&controller.info().heading())
        ));
        heading.set_halign(gtk::Align::Start);
        heading.set_wrap(true);
        main_vbox.append(&heading);

        let mut summary = format!("Version {}", controller.info().version);
        let channel = controller.info().channel();
        if !channel.is_empty() {
            summary.push_str(&format!(" ({} channel)", channel));
        }
        let summary_label = Label::new(Some(&summary));
        summary_label.set_halign(gtk::Align::Start);
        summary_label.set_ellipsize(pango::EllipsizeMode::End);
        summary_label.add_css_class("dim-label");
        main_vbox.append(&summary_label);

        let content = controller.content();

        #[cfg(not(feature = "web-notes"))]
        let text_view = {
            let text_buffer = TextBuffer::new(None::<&gtk::TextTagTable>);
            text_buffer.set_text(content.as_str());

            let text_view = TextView::with_buffer(&text_buffer);
            text_view.set_editable(false);
            text_view.set_cursor_visible(false);
            text_view.set_wrap_mode(gtk::WrapMode::Word);
            text_view.set_left_margin(8);
            text_view.set_right_margin(8);
            text_view.set_top_margin(8);
            text_view.set_bottom_margin(8);

            let scrolled_window = ScrolledWindow::builder()
                .vexpand(true)
                .hexpand(true)
                .min_content_height(240)
                .build();
            scrolled_window.set_child(Some(&text_view));
            main_vbox.append(&scrolled_window);
            text_view
        };

        #[cfg(feature = "web-notes")]
        let web_view = {
            use webkit6::prelude::*;

            let web_view = webkit6::WebView::new();
            web_view.set_vexpand(true);
            web_view.set_hexpand(true);
            web_view.set_size_request(-1, 240);
            web_view.load_html(content.as_str(), None);
            main_vbox.append(&web_view);
            web_view
        };

        if let Some(url) = controller.info().download_url.clone() {
            let link_button = Button::with_label("Release page");
            link_button.set_has_frame(false);
            link_button.set_halign(gtk::Align::Start);
            link_button.add_css_class("link");
            link_button.connect_clicked(move |_| {
                if let Err(e) = open::that(&url) {
                    tracing::warn!(%url, "The link could not be opened: {}", e);
                }
            });
            main_vbox.append(&link_button);
        }

        let auto_check = CheckButton::with_label("Automatically check for updates");
        auto_check.set_active(controller.auto_update());
        {
            // weak so dropping the dialog releases the controller and its info
            let controller = Rc::downgrade(&controller);
            auto_check.connect_toggled(move |check| {
                if let Some(controller) = controller.upgrade() {
                    controller.on_auto_toggled(check.is_active());
                }
            });
        }
        main_vbox.append(&auto_check);

        dialog.content_area().append(&main_vbox);

        for choice in [UpdateChoice::Skip, UpdateChoice::Later, UpdateChoice::Install] {
            let button = dialog.add_button(choice.label(), choice.response_type());
            if choice == UpdateChoice::Install {
                button.add_css_class("suggested-action");
            }
        }
        dialog.set_default_response(ResponseType::Accept);

        let handlers: Rc<RefCell<Vec<ChoiceHandler>>> = Rc::new(RefCell::new(Vec::new()));
        let answered = Rc::new(Cell::new(false));
        {
            let handlers = handlers.clone();
            dialog.connect_response(move |dialog, response| {
                // closing after a button answer emits DeleteEvent again
                if answered.replace(true) {
                    return;
                }
                let choice = UpdateChoice::from_response(response);
                tracing::debug!(?choice, "Update dialog answered");
                for handler in handlers.borrow().iter() {
                    handler(choice);
                }
                if response != ResponseType::DeleteEvent {
                    dialog.close();
                }
            });
        }

        Self {
            dialog,
            controller,
            auto_check,
            #[cfg(not(feature = "web-notes"))]
            text_view,
            #[cfg(feature = "web-notes")]
            web_view,
            handlers,
        }
    }

    pub fn present(&self) {
        self.dialog.present();
    }

    pub fn close(&self) {
        self.dialog.close();
    }

    pub fn widget(&self) -> &Dialog {
        &self.dialog
    }

    pub fn info(&self) -> &UpdateInfo {
        self.controller.info()
    }

    pub fn auto_update(&self) -> bool {
        self.auto_check.is_active()
    }

    #[cfg(not(feature = "web-notes"))]
    pub fn notes_view(&self) -> &TextView {
        &self.text_view
    }

    #[cfg(feature = "web-notes")]
    pub fn notes_view(&self) -> &webkit6::WebView {
        &self.web_view
    }

    /// Called once with the user's answer, before the dialog closes.
    pub fn connect_choice<F: Fn(UpdateChoice) + 'static>(&self, f: F) {
        self.handlers.borrow_mut().push(Box::new(f));
    }
}

impl Drop for AutoUpdateDialog {
    fn drop(&mut self) {
        if let Ok(mut handlers) = self.handlers.try_borrow_mut() {
            handlers.clear();
        }
        self.dialog.destroy();
    }
}
