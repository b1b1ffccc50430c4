use anyhow::Result;
use autoupdater::dialog::AutoUpdateDialog;
use autoupdater::model::UpdateInfo;
use autoupdater::news::News;
use autoupdater::preferences::{AutoUpdatePreference, TomlPreferenceStore};
use autoupdater::UpdateChoice;
use clap::Parser;
use gtk::prelude::*;
use gtk::{gdk::Display, Application, CssProvider};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const APP_ID: &str = "io.github.autoupdater.AutoUpdater";

#[derive(Parser, Debug)]
#[command(name = "autoupdater", version, about = "Shows an available update and its release notes")]
struct Args {
    /// Release news file (JSON)
    #[arg(long, default_value = "news.json")]
    news: PathBuf,

    /// Version currently installed
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    current: String,

    /// Show the dialog even when automatic updates are off or the version was skipped
    #[arg(long)]
    force: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_data(
        "
        .link {
            color: #1976d2;
            text-decoration: underline;
        }
        .link:hover {
            color: #1565c0;
            background-color: rgba(25, 118, 210, 0.1);
        }
        ",
    );

    match Display::default() {
        Some(display) => gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => tracing::warn!("No display, skipping custom CSS"),
    }
}

fn build_ui(app: &Application, info: &Rc<UpdateInfo>, store: Rc<TomlPreferenceStore>) {
    load_css();

    let dialog = AutoUpdateDialog::new(None::<&gtk::Window>, info, store.clone());
    dialog.widget().set_application(Some(app));

    // dropping the dialog destroys its window, so it lives here until answered
    let slot: Rc<RefCell<Option<AutoUpdateDialog>>> = Rc::new(RefCell::new(None));

    let download_url = info.download_url.clone();
    let version = info.version.clone();
    dialog.connect_choice(move |choice| match choice {
        UpdateChoice::Install => match &download_url {
            Some(url) => {
                if let Err(e) = open::that(url) {
                    tracing::error!(%url, "Could not open download page: {}", e);
                }
            }
            None => tracing::warn!(%version, "No download location for this update"),
        },
        UpdateChoice::Skip => {
            if let Err(e) = store.skip_version(&version) {
                tracing::error!("Could not remember skipped version: {:#}", e);
            }
        }
        UpdateChoice::Later => {}
    });

    {
        let slot = slot.clone();
        dialog.connect_choice(move |_| {
            let slot = slot.clone();
            glib::idle_add_local_once(move || {
                let answered = slot.borrow_mut().take();
                drop(answered);
            });
        });
    }

    dialog.present();
    *slot.borrow_mut() = Some(dialog);
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let news = News::load(&args.news)?;
    let info = match news.update_since(&args.current)? {
        Some(info) => info,
        None => {
            tracing::info!(current = %args.current, "Already up to date");
            return Ok(());
        }
    };

    let store = Rc::new(TomlPreferenceStore::open_default()?);
    if !args.force {
        if store.skipped_version().as_deref() == Some(info.version.as_str()) {
            tracing::info!(version = %info.version, "Update was skipped by the user");
            return Ok(());
        }
        if !store.auto_update_enabled() {
            tracing::info!("Automatic updates are disabled");
            return Ok(());
        }
    }

    let info = Rc::new(info);
    let app = Application::builder()
        .application_id(APP_ID)
        .flags(gio::ApplicationFlags::NON_UNIQUE)
        .build();
    app.connect_activate(move |app| build_ui(app, &info, store.clone()));

    // clap already consumed the command line
    app.run_with_args::<&str>(&[]);
    Ok(())
}
