use macroquad::prelude::*;
use macroquad_tilemap::{
    DirAssets, MacroquadBackend, PhysicsWorld, TileMap, TileMapConfig, TileSetManager,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn window_conf() -> Conf {
    Conf {
        window_title: "Basic Map".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

async fn run() -> anyhow::Result<()> {
    let config = TileMapConfig::from_file("assets/demo.config.json")?;

    let mut backend = MacroquadBackend::new("assets");
    let mut manager = TileSetManager::new(DirAssets::new("assets"));
    let mut map = TileMap::with_config("level1", config);
    map.load(&mut manager, &mut backend)?;

    let player = map.create_actor("player");
    if let Some(tile) = map.tile(6).cloned() {
        if let Some(actor) = map.actor_mut(player) {
            actor.add_named_tile("idle", tile, true);
        }
    }

    loop {
        clear_background(BLACK);

        let mut vx = 0.0;
        if is_key_down(KeyCode::Left) {
            vx -= 3.0;
        }
        if is_key_down(KeyCode::Right) {
            vx += 3.0;
        }
        let body = map.actor(player).and_then(|a| a.body);
        if let Some(v) = body.and_then(|b| map.physics().linear_velocity(b)) {
            let vy = if is_key_pressed(KeyCode::Space) { -6.0 } else { v.y };
            map.set_actor_velocity(player, vec2(vx, vy));
        }

        map.draw(&mut backend);

        // Draw the frame rate in the top-left corner
        draw_text(
            &format!("FPS: {}", get_fps()),
            screen_width() - 135.0,
            55.0,
            30.0,
            RED,
        );

        next_frame().await;
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        error!("{e:#}");
    }
}
