use anyhow::{anyhow, Result};
use eframe::{egui, App, Frame, NativeOptions};
use tracing::info;

use super::{image_tab, text_tab};
use crate::session::Session;
use crate::state::AppState;

pub struct TranslatorGui {
    session: Session,
    tab: Tab,
    language_names: Vec<String>,
    preview: image_tab::PreviewTexture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Text,
    Image,
}

impl TranslatorGui {
    pub fn run(state: AppState) -> Result<()> {
        let system = state.config.system_config.clone();
        let options = NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(system.window_title.clone())
                .with_inner_size([system.window_width, system.window_height])
                .with_resizable(true),
            ..Default::default()
        };

        eframe::run_native(
            &system.window_title,
            options,
            Box::new(move |cc| {
                let ctx = cc.egui_ctx.clone();
                let session = state.session(move || ctx.request_repaint());
                Box::new(TranslatorGui::new(session))
            }),
        )
        .map_err(|err| anyhow!("failed to launch translator GUI: {err}"))?;
        Ok(())
    }

    fn new(session: Session) -> Self {
        let language_names = session.registry().names().map(str::to_string).collect();
        Self {
            session,
            tab: Tab::Text,
            language_names,
            preview: image_tab::PreviewTexture::default(),
        }
    }

    fn take_dropped_image(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped {
            info!("Image dropped: {}", path.display());
            self.tab = Tab::Image;
            self.session.load_image(path);
        }
    }
}

impl App for TranslatorGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.session.pump();
        self.take_dropped_image(ctx);

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Text, "Text Translation");
                ui.selectable_value(&mut self.tab, Tab::Image, "Image Translation");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.tab {
                Tab::Text => text_tab::show(ui, &mut self.session, &self.language_names),
                Tab::Image => image_tab::show(
                    ui,
                    &mut self.session,
                    &self.language_names,
                    &mut self.preview,
                ),
            });
        });
    }
}
