use eframe::egui;

use super::widgets::language_combo;
use crate::session::Session;

pub(super) fn show(ui: &mut egui::Ui, session: &mut Session, names: &[String]) {
    egui::Grid::new("text-languages")
        .num_columns(3)
        .spacing([10.0, 10.0])
        .show(ui, |ui| {
            ui.label("Source Language:");
            language_combo(ui, "text-source", names, &mut session.text.languages.source);
            if ui
                .button("⇄ Swap")
                .on_hover_text("Swap languages and translate the output back")
                .clicked()
            {
                session.swap_text_languages();
            }
            ui.end_row();

            ui.label("Target Language:");
            language_combo(ui, "text-target", names, &mut session.text.languages.target);
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label("Input Text:");
        if ui.button("Clear").clicked() {
            session.clear_text();
        }
    });
    let input = ui.add(
        egui::TextEdit::multiline(&mut session.text.input)
            .desired_rows(10)
            .desired_width(f32::INFINITY),
    );
    if input.changed() {
        session.on_input_changed();
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label("Translated Text:");
        if ui.button("Translate").clicked() {
            session.translate_text();
        }
        if ui.button("Copy").clicked() {
            let text = session.text.output.clone();
            ui.output_mut(|o| o.copied_text = text);
        }
        if session.is_debouncing() {
            ui.spinner();
        }
    });
    ui.add(
        egui::TextEdit::multiline(&mut session.text.output)
            .desired_rows(10)
            .desired_width(f32::INFINITY),
    );

    if let Some(at) = session.text.last_translated_at {
        ui.small(format!("Last translated at {}", at.format("%H:%M:%S")));
    }
}
