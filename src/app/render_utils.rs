use eframe::egui::Color32;

/// Cyclic palette size; bodies carry `design_index = item index % DESIGN_COUNT`.
pub(super) const DESIGN_COUNT: usize = 5;

pub(super) struct BubbleDesign {
    pub core: Color32,
    pub halo: Color32,
    pub border: Color32,
}

pub(super) const DESIGNS: [BubbleDesign; DESIGN_COUNT] = [
    BubbleDesign {
        core: Color32::from_rgb(0, 50, 40),
        halo: Color32::from_rgb(0, 100, 80),
        border: Color32::from_rgb(0, 245, 204),
    },
    BubbleDesign {
        core: Color32::from_rgb(50, 0, 40),
        halo: Color32::from_rgb(100, 0, 80),
        border: Color32::from_rgb(245, 0, 204),
    },
    BubbleDesign {
        core: Color32::from_rgb(40, 30, 0),
        halo: Color32::from_rgb(80, 60, 0),
        border: Color32::from_rgb(255, 204, 0),
    },
    BubbleDesign {
        core: Color32::from_rgb(0, 30, 50),
        halo: Color32::from_rgb(0, 60, 100),
        border: Color32::from_rgb(0, 153, 255),
    },
    BubbleDesign {
        core: Color32::from_rgb(30, 0, 50),
        halo: Color32::from_rgb(60, 0, 100),
        border: Color32::from_rgb(153, 0, 255),
    },
];

pub(super) fn design(index: usize) -> &'static BubbleDesign {
    &DESIGNS[index % DESIGN_COUNT]
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}
