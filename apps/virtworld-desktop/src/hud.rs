use crate::viewer::ViewerState;
use egui::Context as EguiContext;
use virtworld_render::WorldDrawMode;

/// Frame statistics, block count and a few view toggles.
pub fn draw_hud(ctx: &EguiContext, state: &mut ViewerState, pending_textures: usize) {
    if !state.show_hud {
        return;
    }

    egui::Window::new("VirtWorld")
        .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
        .resizable(false)
        .collapsible(true)
        .show(ctx, |ui| {
            for line in state.hud_lines() {
                ui.label(line);
            }
            if pending_textures > 0 {
                ui.label(format!("Textures loading: {pending_textures}"));
            }
            ui.separator();

            let mut naive = state.scene.options().draw_mode == WorldDrawMode::Naive;
            if ui.checkbox(&mut naive, "One draw per block").changed() {
                let mode = if naive {
                    WorldDrawMode::Naive
                } else {
                    WorldDrawMode::Instanced
                };
                tracing::info!("world draw mode: {mode:?}");
                state.set_draw_mode(mode);
            }

            let mut debug_uvs = state.scene.options().debug_uvs;
            if ui.checkbox(&mut debug_uvs, "Show UVs").changed() {
                state.scene.set_debug_uvs(debug_uvs);
            }

            ui.separator();
            let hint = if state.pointer_locked() {
                "Esc: release pointer"
            } else {
                "Click: look around"
            };
            ui.small(hint);
            ui.small("W/A/S/D: move | Q/E: turn | LMB: remove | RMB: add | F1: HUD");
        });
}
