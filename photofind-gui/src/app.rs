//! Main PhotoFind window

use std::time::Duration;

use eframe::egui;
use log::{error, info};
use photofind_core::{execute, FetchError, FetchOutcome, FetchRequest, Image, SearchSession, UnsplashClient};
use poll_promise::Promise;

const THUMBNAIL_SIZE: f32 = 180.0;

type PendingFetch = Promise<(FetchRequest, Result<FetchOutcome, FetchError>)>;

/// What the user asked for during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    LoadMore,
    Random,
}

pub struct PhotoFindApp {
    client: UnsplashClient,
    session: SearchSession,
    /// Contents of the search box
    query_input: String,
    /// Requests running on worker threads
    in_flight: Vec<PendingFetch>,
    /// `images_revision` the grid last scrolled for
    scrolled_revision: u64,
}

impl PhotoFindApp {
    pub fn new(cc: &eframe::CreationContext<'_>, client: UnsplashClient) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        Self::with_client(client)
    }

    fn with_client(client: UnsplashClient) -> Self {
        Self {
            client,
            session: SearchSession::new(),
            query_input: String::new(),
            in_flight: Vec::new(),
            scrolled_revision: 0,
        }
    }

    fn perform(&mut self, ctx: &egui::Context, action: Action) {
        let request = match action {
            Action::Search => self.session.submit_search(&self.query_input),
            Action::LoadMore => self.session.load_more(),
            Action::Random => Some(self.session.fetch_random()),
        };

        if let Some(request) = request {
            self.dispatch(ctx, request);
        }
    }

    /// Runs `request` on a worker thread. The result is picked up by
    /// [`Self::poll_requests`] on a later frame.
    fn dispatch(&mut self, ctx: &egui::Context, request: FetchRequest) {
        info!("Dispatching {} request #{}", request.flow(), request.seq);
        let client = self.client.clone();
        let ctx = ctx.clone();
        let promise = Promise::spawn_thread("photofind-fetch", move || {
            let result = execute(&client, &request);
            ctx.request_repaint();
            (request, result)
        });
        self.in_flight.push(promise);
    }

    fn poll_requests(&mut self) {
        for promise in std::mem::take(&mut self.in_flight) {
            match promise.try_take() {
                Ok((request, result)) => {
                    self.session.complete(&request, result);
                }
                Err(promise) => self.in_flight.push(promise),
            }
        }
    }

    fn render_search_bar(&mut self, ui: &mut egui::Ui) -> Option<Action> {
        let mut action = None;

        ui.heading("Find Image");

        let state = self.session.state();
        if state.has_error() {
            ui.colored_label(egui::Color32::from_rgb(220, 60, 60), state.error_message.as_str());
        }
        let loading = state.loading;

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.query_input)
                    .hint_text("Type something to search...")
                    .desired_width(320.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if ui.button("Search").clicked() || submitted {
                action = Some(Action::Search);
            }
            if ui.button("Random Image").clicked() {
                action = Some(Action::Random);
            }
            if loading {
                ui.spinner();
            }
        });
        ui.add_space(4.0);

        action
    }

    fn render_images(&mut self, ui: &mut egui::Ui) -> Option<Action> {
        let mut action = None;
        let state = self.session.state();
        let revision = state.images_revision;
        let scroll_to_bottom = revision != self.scrolled_revision;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for image in &state.images {
                        render_thumbnail(ui, image);
                    }
                });

                if state.can_load_more() {
                    ui.add_space(8.0);
                    ui.vertical_centered(|ui| {
                        if ui.add_enabled(!state.loading, egui::Button::new("Load More")).clicked() {
                            action = Some(Action::LoadMore);
                        }
                    });
                }

                if scroll_to_bottom {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });

        self.scrolled_revision = revision;
        action
    }
}

fn render_thumbnail(ui: &mut egui::Ui, image: &Image) {
    let widget = egui::Image::from_uri(image.thumbnail_url().to_owned())
        .max_width(THUMBNAIL_SIZE)
        .max_height(THUMBNAIL_SIZE)
        .sense(egui::Sense::click());

    let mut response = ui.add(widget);
    let alt = image.alt_text();
    if !alt.is_empty() {
        response = response.on_hover_text(alt);
    }

    if response.clicked() {
        if let Some(url) = image.page_url() {
            if let Err(e) = open::that(url) {
                error!("Failed to open {}: {}", url, e);
            }
        }
    }
}

impl eframe::App for PhotoFindApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_requests();

        let top = egui::TopBottomPanel::top("search_bar")
            .show(ctx, |ui| self.render_search_bar(ui))
            .inner;
        let central = egui::CentralPanel::default()
            .show(ctx, |ui| self.render_images(ui))
            .inner;

        if let Some(action) = top.or(central) {
            self.perform(ctx, action);
        }

        if !self.in_flight.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
