use catch_core::entity::Sprite;
use catch_core::World;
use catch_render::{QuadSpec, SpriteBatch};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Rebuild the frame's quads: background, then player, then target on top.
/// Each sprite is drawn centred on its position.
pub fn build_batch(world: &World, batch: &mut SpriteBatch) {
    batch.clear();
    for sprite in [
        &world.background.sprite,
        &world.player.sprite,
        &world.target.sprite,
    ] {
        push_sprite(batch, sprite);
    }
}

fn push_sprite(batch: &mut SpriteBatch, sprite: &Sprite) {
    batch.push_quad(QuadSpec {
        texture_key: &sprite.texture.key,
        center: sprite.position,
        size: sprite.size(),
        mirrored: sprite.is_mirrored(),
        color: WHITE,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use catch_core::{AssetCatalog, Collaborators, GameConfig, GameSession};
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> GameSession<StdRng> {
        let mut catalog = AssetCatalog::new();
        catalog.insert("player", 100, 100);
        catalog.insert("target", 100, 100);
        catalog.insert("background", 800, 600);
        GameSession::new(
            &GameConfig::default(),
            &catalog,
            Collaborators::silent(),
            Vec2::new(800.0, 600.0),
            StdRng::seed_from_u64(11),
        )
        .expect("session builds")
    }

    #[test]
    fn batch_layers_background_player_target() {
        let session = session();
        let mut batch = SpriteBatch::new();
        build_batch(session.world(), &mut batch);
        assert_eq!(batch.quad_count(), 3);
        let keys: Vec<&str> = batch.draw_calls.iter().map(|d| &*d.texture_key).collect();
        assert_eq!(keys, vec!["background", "player", "target"]);
        // Background covers the whole viewport.
        assert_eq!(batch.vertices[0].position, [0.0, 0.0]);
        assert_eq!(batch.vertices[2].position, [800.0, 600.0]);
    }

    #[test]
    fn player_facing_left_is_drawn_mirrored() {
        let mut session = session();
        session.key_down("KeyA");
        session.tick(Vec2::new(800.0, 600.0));
        let mut batch = SpriteBatch::new();
        build_batch(session.world(), &mut batch);
        let player_first_vertex = batch.vertices[4];
        assert_eq!(player_first_vertex.tex_coords, [1.0, 0.0]);
    }

    #[test]
    fn rebuilding_replaces_previous_frame() {
        let session = session();
        let mut batch = SpriteBatch::new();
        build_batch(session.world(), &mut batch);
        build_batch(session.world(), &mut batch);
        assert_eq!(batch.quad_count(), 3);
    }
}
