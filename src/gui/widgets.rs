use eframe::egui;

/// Language drop-down. Returns true when the selection changed.
pub(super) fn language_combo(
    ui: &mut egui::Ui,
    id: &str,
    names: &[String],
    selected: &mut String,
) -> bool {
    let before = selected.clone();
    egui::ComboBox::from_id_source(id)
        .selected_text(selected.clone())
        .width(180.0)
        .show_ui(ui, |ui| {
            for name in names {
                ui.selectable_value(selected, name.clone(), name.as_str());
            }
        });
    *selected != before
}
