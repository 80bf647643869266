//! Demo window: feeds a handful of signals into the global store every frame.

use std::time::{Duration, Instant};

use eframe::egui;
use livegraph::{GraphPanel, Quaternion, Vector3};

/// Small xorshift generator for jittery demo values.
struct Noise(u32);

impl Noise {
    fn next(&mut self) -> f32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x as f32) / (u32::MAX as f32)
    }
}

struct DemoApp {
    panel: GraphPanel,
    start: Instant,
    noise: Noise,
    paused: bool,
}

impl DemoApp {
    fn new() -> Self {
        let mut store = livegraph::global();

        store
            .add_vector3("Vec3Test", Vector3::default())
            .into_iter()
            .for_each(|s| {
                s.set_line_width(2.0)
                    .set_graph_height(120.0)
                    .set_step_size(0.25)
                    .set_limits(-2.0, 2.0);
            });

        store.add("Empty graph test", 0.0);

        // c1 and c2 share one chart
        store.get("c1").set_group("GroupC");
        store.get("c2").set_group("GroupC");

        Self {
            panel: GraphPanel::new(&store),
            start: Instant::now(),
            noise: Noise(0x9E37_79B9),
            paused: false,
        }
    }

    fn feed(&mut self) {
        let t = self.start.elapsed().as_secs_f32();
        let mut store = livegraph::global();

        store.add("A", self.noise.next());
        store.add("B", self.noise.next());

        store.add_vector3(
            "Vec3Test",
            ((t / 10.0).sin(), (1.0 / t.max(0.1)).tan(), (t / 10.0).cos()),
        );

        let half = t * 0.5;
        let (s, c) = half.sin_cos();
        store.add_quaternion("Rotation", Quaternion::new(0.0, s, 0.0, c));

        store.add("c1", (1.0 / t.max(0.1)).sin());
        store.add_with_color("c2", (t * 2.0).sin(), egui::Color32::from_rgb(255, 165, 0));
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.paused {
            self.feed();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.paused, "Pause input");
                if ui.button("Clear GroupC").clicked() {
                    livegraph::global().clear("GroupC");
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut store = livegraph::global();
            self.panel.ui(ui, &mut store);
        });

        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

fn main() -> eframe::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let app = DemoApp::new();
    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 720.0]),
        ..Default::default()
    };
    let result = eframe::run_native("LiveGraph demo", opts, Box::new(|_cc| Ok(Box::new(app))));
    livegraph::teardown();
    result
}
