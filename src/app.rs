//! comicview application
//!
//! Single-window viewer: type a comic number, fetch its metadata from the
//! xkcd endpoint, show title, image, and alt text. The last shown comic is
//! saved and redisplayed at the next startup without a network call.
//!
//! All UI runs on one thread. Fetch and image download each run on a worker
//! thread and deliver their completion over an mpsc channel that update()
//! drains every frame, so completions are serialized onto the UI thread.
//! Nothing is cancelled: if two fetches overlap, the later completion to
//! arrive wins both the display and the saved record.

use crate::fetch::{self, ComicRecord};
use crate::loader;
use crate::store::{ComicStore, JsonStore};
use egui::{Context, Key, TextureHandle, TextureOptions, Vec2};
use std::sync::mpsc::{channel, Receiver, Sender};

pub struct ComicViewApp {
    /// Comic number input field contents
    input: String,
    /// Currently displayed record, seeded from the store at startup
    current: Option<ComicRecord>,
    /// Texture for the current comic image; kept until a replacement arrives
    texture: Option<TextureHandle>,
    /// A fetch is outstanding
    loading: bool,
    /// One-line status notification shown in the bottom bar
    status: Option<String>,
    /// Image URL waiting to be handed to the loader on the next frame
    pending_image: Option<String>,
    store: Box<dyn ComicStore>,
    fetch_tx: Sender<Result<ComicRecord, String>>,
    fetch_rx: Receiver<Result<ComicRecord, String>>,
    image_tx: Sender<egui::ColorImage>,
    image_rx: Receiver<egui::ColorImage>,
    show_about: bool,
}

impl ComicViewApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_store(Box::new(JsonStore::new()))
    }

    /// Build the app around any store; tests inject an in-memory one.
    pub fn with_store(store: Box<dyn ComicStore>) -> Self {
        let (fetch_tx, fetch_rx) = channel();
        let (image_tx, image_rx) = channel();

        let saved = store.load();
        let (current, pending_image, status) = match saved {
            Some(record) => {
                let url = record.image_url.clone();
                (Some(record), Some(url), None)
            }
            None => (None, None, Some("no saved comic found".to_string())),
        };

        Self {
            input: String::new(),
            current,
            texture: None,
            loading: false,
            status,
            pending_image,
            store,
            fetch_tx,
            fetch_rx,
            image_tx,
            image_rx,
            show_about: false,
        }
    }

    /// Handle a submit of the input field. Returns the id a fetch should be
    /// started for, or `None` when the input was empty (status is set and
    /// nothing else changes).
    fn submit(&mut self) -> Option<String> {
        let id = self.input.trim().to_string();
        if id.is_empty() {
            self.status = Some("please enter a comic number".to_string());
            return None;
        }
        self.loading = true;
        self.status = Some(format!("fetching comic {}...", id));
        Some(id)
    }

    /// Drain completed fetches. On success the record is displayed and saved
    /// and its image queued for loading; on failure only the status changes,
    /// so whatever was displayed before stays up.
    fn drain_fetch_results(&mut self) {
        while let Ok(result) = self.fetch_rx.try_recv() {
            self.loading = false;
            match result {
                Ok(record) => {
                    self.store.save(&record);
                    self.pending_image = Some(record.image_url.clone());
                    self.current = Some(record);
                    self.status = Some("comic saved".to_string());
                }
                Err(message) => {
                    self.status = Some(format!("error fetching comic: {}", message));
                }
            }
        }
    }

    fn render_input_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("comic number:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .desired_width(80.0)
                    .hint_text("614"),
            );
            let entered =
                response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            let clicked = ui.button("show comic").clicked();
            if entered || clicked {
                if let Some(id) = self.submit() {
                    fetch::spawn_fetch(id, self.fetch_tx.clone(), ui.ctx().clone());
                }
            }
            if self.loading {
                ui.spinner();
            }
        });
    }

    fn render_comic(&mut self, ui: &mut egui::Ui) {
        let rect = ui.available_rect_before_wrap();

        let Some(record) = self.current.clone() else {
            // Nothing loaded yet — show welcome
            ui.vertical_centered(|ui| {
                ui.add_space(rect.height() / 3.0);
                ui.label("comicview");
                ui.add_space(10.0);
                ui.label("enter a comic number above and press show comic");
            });
            return;
        };

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.heading(&record.title);
                ui.add_space(8.0);

                if let Some(ref tex) = self.texture {
                    let tex_size = tex.size_vec2();
                    let fit_x = (rect.width() - 16.0) / tex_size.x;
                    let scale = fit_x.min(1.0);
                    let display_size = Vec2::new(tex_size.x * scale, tex_size.y * scale);
                    ui.image((tex.id(), display_size));
                } else {
                    ui.add_space(40.0);
                    ui.label("loading image...");
                    ui.add_space(40.0);
                }

                ui.add_space(10.0);
                ui.label(egui::RichText::new(&record.caption).italics());
                ui.add_space(8.0);
            });
        });
    }

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("help", |ui| {
                if ui.button("about comicview").clicked() {
                    self.show_about = true;
                    ui.close_menu();
                }
            });
        });
    }

    fn render_about(&mut self, ctx: &Context) {
        egui::Window::new("about comicview")
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("comicview");
                    ui.label("version 0.1.0");
                    ui.add_space(8.0);
                    ui.label("xkcd comic viewer");
                });
                ui.add_space(8.0);
                ui.separator();
                ui.add_space(4.0);
                ui.label("comics are fetched from xkcd.com;");
                ui.label("the last shown comic is kept for the next start.");
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("ok").clicked() {
                        self.show_about = false;
                    }
                });
            });
    }
}

impl eframe::App for ComicViewApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.drain_fetch_results();

        // Kick off any queued image download (from startup or a fresh fetch)
        if let Some(url) = self.pending_image.take() {
            loader::spawn_load(url, self.image_tx.clone(), ctx.clone());
        }

        // A finished download replaces the texture; until then the prior
        // image stays up (a failed download never reaches this channel)
        while let Ok(img) = self.image_rx.try_recv() {
            self.texture = Some(ctx.load_texture("comic_image", img, TextureOptions::LINEAR));
        }

        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            self.render_menu_bar(ui);
        });

        egui::TopBottomPanel::top("input").show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_input_row(ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let text = match (&self.status, &self.current) {
                (Some(status), _) => status.clone(),
                (None, Some(record)) => record.title.clone(),
                (None, None) => "no comic loaded".to_string(),
            };
            ui.label(text);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_comic(ui);
        });

        if self.show_about {
            self.render_about(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn sample() -> ComicRecord {
        ComicRecord {
            title: "Woodpecker".into(),
            caption: "If you don't have an extension cord I can get that from the church basement.".into(),
            image_url: "https://imgs.xkcd.com/comics/woodpecker.png".into(),
        }
    }

    #[test]
    fn test_startup_empty_store_notifies_and_loads_nothing() {
        let (store, _cell) = MemStore::new();
        let app = ComicViewApp::with_store(Box::new(store));
        assert_eq!(app.status.as_deref(), Some("no saved comic found"));
        assert!(app.current.is_none());
        assert!(app.pending_image.is_none());
    }

    #[test]
    fn test_startup_with_saved_comic_displays_it() {
        let (store, cell) = MemStore::new();
        *cell.lock().unwrap() = Some(sample());
        let app = ComicViewApp::with_store(Box::new(store));
        assert_eq!(app.current.as_ref().unwrap().title, "Woodpecker");
        assert_eq!(app.pending_image.as_deref(), Some(sample().image_url.as_str()));
        assert!(app.status.is_none());
    }

    #[test]
    fn test_submit_empty_input_starts_no_fetch() {
        let (store, _cell) = MemStore::new();
        let mut app = ComicViewApp::with_store(Box::new(store));
        app.input = "   ".into();
        assert_eq!(app.submit(), None);
        assert_eq!(app.status.as_deref(), Some("please enter a comic number"));
        assert!(!app.loading);
        assert!(app.current.is_none());
    }

    #[test]
    fn test_submit_trims_and_passes_id_verbatim() {
        let (store, _cell) = MemStore::new();
        let mut app = ComicViewApp::with_store(Box::new(store));
        app.input = " 614 ".into();
        assert_eq!(app.submit(), Some("614".to_string()));
        assert!(app.loading);
        // No numeric validation: odd ids go through as typed.
        app.input = "not-a-number".into();
        assert_eq!(app.submit(), Some("not-a-number".to_string()));
    }

    #[test]
    fn test_fetch_success_displays_saves_and_queues_image() {
        let (store, cell) = MemStore::new();
        let mut app = ComicViewApp::with_store(Box::new(store));
        app.input = "614".into();
        app.submit();

        app.fetch_tx.send(Ok(sample())).unwrap();
        app.drain_fetch_results();

        assert!(!app.loading);
        assert_eq!(app.current.as_ref().unwrap().title, "Woodpecker");
        assert_eq!(app.status.as_deref(), Some("comic saved"));
        assert_eq!(app.pending_image.as_deref(), Some(sample().image_url.as_str()));
        assert_eq!(*cell.lock().unwrap(), Some(sample()));
    }

    #[test]
    fn test_fetch_failure_keeps_prior_comic() {
        let (store, cell) = MemStore::new();
        *cell.lock().unwrap() = Some(sample());
        let mut app = ComicViewApp::with_store(Box::new(store));
        app.input = "99999".into();
        app.submit();

        app.fetch_tx
            .send(Err("network error: connection refused".to_string()))
            .unwrap();
        app.drain_fetch_results();

        assert!(!app.loading);
        assert_eq!(
            app.status.as_deref(),
            Some("error fetching comic: network error: connection refused")
        );
        // The previously displayed comic is untouched.
        assert_eq!(app.current, Some(sample()));
        assert_eq!(*cell.lock().unwrap(), Some(sample()));
    }

    #[test]
    fn test_overlapping_fetches_later_completion_wins() {
        let (store, cell) = MemStore::new();
        let mut app = ComicViewApp::with_store(Box::new(store));
        let second = ComicRecord {
            title: "Python".into(),
            caption: "I wrote 20 short programs in Python yesterday.".into(),
            image_url: "https://imgs.xkcd.com/comics/python.png".into(),
        };

        app.fetch_tx.send(Ok(sample())).unwrap();
        app.fetch_tx.send(Ok(second.clone())).unwrap();
        app.drain_fetch_results();

        assert_eq!(app.current, Some(second.clone()));
        assert_eq!(*cell.lock().unwrap(), Some(second));
    }
}
