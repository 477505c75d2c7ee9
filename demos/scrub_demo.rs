//! Example driving a scroll section with simulated scroll and resize events.
//!
//! This example shows:
//! - Mounting a section below a 500px header
//! - Frames following the scroll offset
//! - Re-measuring after a viewport resize
//! - Teardown stopping all renderer calls
//!
//! To run: RUST_LOG=debug cargo run --example scrub_demo

use scrollscrub::prelude::*;
use serde_json::json;

/// Prints every call instead of drawing.
struct ConsoleRenderer;

struct ConsoleInstance {
    name: String,
}

impl AnimationInstance for ConsoleInstance {
    fn go_to_and_stop(&mut self, frame: f32) {
        println!("[{}] frame {:.1}", self.name, frame);
    }

    fn destroy(&mut self) {
        println!("[{}] destroyed", self.name);
    }
}

impl AnimationRenderer for ConsoleRenderer {
    fn load_animation(
        &mut self,
        config: LoadConfig,
    ) -> std::result::Result<Box<dyn AnimationInstance>, RendererError> {
        println!("load {}", config.to_json());
        let name = config
            .options
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("animation")
            .to_string();
        Ok(Box::new(ConsoleInstance { name }))
    }
}

fn main() -> scrollscrub::Result<()> {
    env_logger::init();

    let document = Document::new(Viewport::new(1280.0, 800.0));
    let main = document.mutate_layout(|tree| {
        let root = tree.root();
        let header = tree.create_node(500.0);
        let main = tree.create_node(2400.0);
        tree.append_child(root, header);
        tree.append_child(root, main);
        tree.stack_children(root);
        main
    });

    let animation = AnimationSource::from_json_str(
        &json!({ "v": "5.7.4", "fr": 30, "ip": 0, "op": 120, "layers": [] }).to_string(),
    )?;

    let mut renderer = ConsoleRenderer;
    let mut section = scroll_section(2400.0)
        .frames([0.0, 100.0])
        .animation(animation)
        .animation_position(HorizontalAlignment::Center)
        .renderer_option("name", "hero")
        .debug_mode(true)
        .mount(&document, main, &mut renderer)?;

    println!("section style: {:?}", section.section_style());
    println!("bounds: {:?}", section.bounds());

    for offset in (0..=2400).step_by(200) {
        document.viewport().scroll_to(offset as f32);
    }

    document.viewport().resize(800.0, 1280.0);
    println!("bounds after rotate: {:?}", section.bounds());
    document.viewport().scroll_to(1000.0);

    section.unmount();
    document.viewport().scroll_to(0.0);
    println!("after unmount: current frame {:?}", section.current_frame());

    Ok(())
}
