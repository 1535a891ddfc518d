use eframe::egui;
use tracing::debug;

use super::widgets::language_combo;
use crate::session::Session;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"];

/// GPU copy of the session's preview, tagged with the generation it was built from.
#[derive(Default)]
pub(super) struct PreviewTexture {
    current: Option<(u64, egui::TextureHandle)>,
}

impl PreviewTexture {
    fn sync(&mut self, ctx: &egui::Context, session: &Session) -> Option<&egui::TextureHandle> {
        let generation = session.image.preview_generation;
        let stale = self.current.as_ref().map(|(g, _)| *g) != Some(generation);
        if stale {
            self.current = session.image.preview.as_ref().map(|preview| {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [preview.width, preview.height],
                    &preview.rgba,
                );
                let texture = ctx.load_texture("uploaded-image", image, egui::TextureOptions::LINEAR);
                (generation, texture)
            });
        }
        self.current.as_ref().map(|(_, texture)| texture)
    }
}

pub(super) fn show(
    ui: &mut egui::Ui,
    session: &mut Session,
    names: &[String],
    preview: &mut PreviewTexture,
) {
    let mut languages_changed = false;
    egui::Grid::new("image-languages")
        .num_columns(2)
        .spacing([10.0, 10.0])
        .show(ui, |ui| {
            ui.label("Source Language:");
            languages_changed |=
                language_combo(ui, "image-source", names, &mut session.image.languages.source);
            ui.end_row();

            ui.label("Target Language:");
            languages_changed |=
                language_combo(ui, "image-target", names, &mut session.image.languages.target);
            ui.end_row();
        });
    if languages_changed {
        session.translate_image_text();
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("Upload Image").clicked() {
            pick_image(session);
        }
        if ui.button("Clear").clicked() {
            session.clear_image_text();
        }
    });

    ui.horizontal(|ui| {
        ui.label(session.image.image_label.as_str());
        if session.image.is_extracting() {
            ui.spinner();
        }
    });

    if let Some(texture) = preview.sync(ui.ctx(), session) {
        ui.add(
            egui::Image::new(egui::load::SizedTexture::from_handle(texture))
                .max_height(200.0)
                .maintain_aspect_ratio(true),
        );
    }

    ui.add_space(8.0);
    ui.add(
        egui::TextEdit::multiline(&mut session.image.image_text)
            .desired_rows(10)
            .desired_width(f32::INFINITY),
    );

    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
        if ui.button("Translate").clicked() {
            session.translate_image_text();
        }
    });
}

fn pick_image(session: &mut Session) {
    let picked = rfd::FileDialog::new()
        .set_title("Upload Image")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .add_filter("All files", &["*"])
        .pick_file();

    match picked {
        Some(path) => session.load_image(path),
        None => debug!("Image selection cancelled"),
    }
}
