//! Drive a scripted canvas session without a UI runtime and print the
//! deltas a sync transport would ship.
//!
//! Run with `RUST_LOG=debug cargo run --example headless_session`.

use collabcanvas_core::{
    Canvas, ConnectionState, MouseButton, Participant, PointerEvent, SerializableColor,
    SyncConfig, SyncGateway, ToolKind,
};
use kurbo::{Point, Vec2};

fn main() {
    env_logger::init();

    match SyncConfig::from_env() {
        Ok(config) => log::info!("sync configured for room {:?}", config.room),
        Err(err) => log::warn!("running offline: {err}"),
    }

    let mut canvas = Canvas::new();
    let mut gateway = SyncGateway::new();
    gateway.set_state(ConnectionState::Connected);
    gateway.peer_joined(Participant {
        user_id: "guest-1".to_string(),
        display_name: "Guest".to_string(),
        color: SerializableColor::from_hex("#F97316"),
    });

    // Place a rectangle, then a circle
    canvas.set_tool(ToolKind::Rectangle);
    canvas.handle_pointer(PointerEvent::Down {
        position: Point::new(140.0, 80.0),
        button: MouseButton::Left,
    });
    canvas.set_tool(ToolKind::Circle);
    canvas.handle_pointer(PointerEvent::Down {
        position: Point::new(320.0, 220.0),
        button: MouseButton::Left,
    });

    // Drag the circle a bit
    canvas.handle_pointer(PointerEvent::Down {
        position: Point::new(320.0, 220.0),
        button: MouseButton::Left,
    });
    canvas.handle_pointer(PointerEvent::Move {
        position: Point::new(360.0, 260.0),
    });
    canvas.handle_pointer(PointerEvent::Up {
        position: Point::new(360.0, 260.0),
        button: MouseButton::Left,
    });

    // Zoom out two ticks and pan
    for _ in 0..2 {
        canvas.handle_pointer(PointerEvent::Scroll {
            position: Point::ZERO,
            delta: Vec2::new(0.0, 120.0),
        });
    }
    canvas.handle_pointer(PointerEvent::Down {
        position: Point::new(600.0, 400.0),
        button: MouseButton::Left,
    });
    canvas.handle_pointer(PointerEvent::Move {
        position: Point::new(560.0, 380.0),
    });
    canvas.handle_pointer(PointerEvent::Up {
        position: Point::new(560.0, 380.0),
        button: MouseButton::Left,
    });

    gateway.publish(canvas.drain_deltas());
    for delta in gateway.drain_outgoing() {
        match serde_json::to_string(&delta) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("failed to encode delta: {err}"),
        }
    }

    println!(
        "session: {} shape(s), scale {:.3}, offset ({:.1}, {:.1}), {} peer(s)",
        canvas.store.len(),
        canvas.camera.scale,
        canvas.camera.offset.x,
        canvas.camera.offset.y,
        gateway.participants().len(),
    );
}
