//! Fixed-step simulation tick
//!
//! `tick` is the whole of the game rules: a pure function of the state, the
//! held keys and the [`SimConfig`]. The phases run in a fixed order because
//! later ones read what earlier ones wrote in the same tick.

use super::input::{InputState, keys};
use super::state::{GameEvent, GameState, SimConfig};
use crate::consts::*;
use crate::{aabb_overlap, clampf};

/// Advance the game state by one frame, returning what happened
pub fn tick(state: &mut GameState, input: &InputState, config: &SimConfig) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // 1. Difficulty follows score immediately
    state.difficulty = 1.0 + state.score as f32 / SCORE_PER_DIFFICULTY;

    // 2. Optional retune of everything already on screen
    if config.retune_existing_entities {
        retune_existing_entities(state);
    }

    // 3. Player movement
    if !state.game_over {
        if input.is_down(keys::UP) || input.is_down(keys::W) {
            state.player_pos.y -= PLAYER_SPEED;
        }
        if input.is_down(keys::DOWN) || input.is_down(keys::S) {
            state.player_pos.y += PLAYER_SPEED;
        }
    }
    state.player_pos.y = clampf(
        state.player_pos.y,
        PLAYER_MARGIN,
        FIELD_HEIGHT - PLAYER_MARGIN - state.player_size.y,
    );

    // 4. Shooting
    state.shoot_cooldown = state.shoot_cooldown.saturating_sub(1);
    if !state.game_over && input.is_down(keys::SPACE) && state.shoot_cooldown == 0 {
        if let Some(slot) = state.fire_bullet() {
            events.push(GameEvent::BulletFired { slot });
        }
        state.shoot_cooldown = FIRE_COOLDOWN_FRAMES;
    }

    // 5. Enemy spawning
    if !state.game_over {
        state.enemy_spawn_timer = state.enemy_spawn_timer.saturating_sub(1);
        if state.enemy_spawn_timer == 0 {
            if let Some(slot) = state.spawn_enemy() {
                events.push(GameEvent::EnemySpawned { slot });
            }
            state.enemy_spawn_timer = next_spawn_interval(state.difficulty);
        }
    }

    // 6-7. Integrate positions; escaped enemies cost a life
    integrate_bullets(state);
    integrate_enemies(state, &mut events);

    // 8. Bullets vs enemies
    resolve_bullet_hits(state, &mut events);

    // 9. Enemies vs player
    if !state.game_over {
        resolve_player_hits(state, &mut events);
    }

    // 10. Juice decay
    state.shake *= 0.90;
    if state.shake < 0.05 {
        state.shake = 0.0;
    }
    state.flash *= 0.86;
    if state.flash < 0.01 {
        state.flash = 0.0;
    }

    events
}

/// Frames until the next spawn at the given difficulty
pub fn next_spawn_interval(difficulty: f32) -> u32 {
    clampf(
        ENEMY_SPAWN_BASE_MAX - difficulty * 4.0,
        ENEMY_SPAWN_BASE_MIN,
        ENEMY_SPAWN_BASE_MAX,
    ) as u32
}

fn retune_existing_entities(state: &mut GameState) {
    let bullet_speed = state.bullet_speed();
    for bullet in state.bullets.iter_alive_mut() {
        bullet.vel_x = bullet_speed;
        bullet.size.x = BULLET_WIDTH;
        bullet.size.y = BULLET_HEIGHT;
    }

    // Direction is always leftward; only the magnitude is retuned
    let enemy_speed = state.enemy_speed().max(1.0);
    for enemy in state.enemies.iter_alive_mut() {
        enemy.vel_x = -enemy_speed;
    }
}

fn integrate_bullets(state: &mut GameState) {
    for bullet in state.bullets.iter_alive_mut() {
        bullet.pos.x += bullet.vel_x;
        if bullet.pos.x > FIELD_WIDTH + BULLET_EXIT_MARGIN {
            bullet.alive = false;
        }
    }
}

fn integrate_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for slot in 0..MAX_ENEMIES {
        // Game over can start partway through this loop; enemies after that freeze.
        let game_over = state.game_over;
        let Some(enemy) = state.enemies.get_mut(slot) else {
            break;
        };
        if !enemy.alive {
            continue;
        }

        if !game_over {
            enemy.pos.y += state.rng.uniform_float(-0.7, 0.7);
            enemy.pos.y = clampf(enemy.pos.y, ENEMY_MARGIN, FIELD_HEIGHT - ENEMY_MARGIN);
            enemy.pos.x += enemy.vel_x;
        }

        if enemy.pos.x < ENEMY_ESCAPE_X {
            enemy.alive = false;
            if !game_over {
                events.push(GameEvent::EnemyEscaped { slot });
                state.shake = 5.0;
                state.flash = 1.0;
                if state.lose_life() {
                    events.push(GameEvent::GameOver { score: state.score });
                }
            }
        }
    }
}

fn resolve_bullet_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    for bullet_slot in 0..MAX_BULLETS {
        let Some(bullet) = state.bullets.get_mut(bullet_slot) else {
            break;
        };
        if !bullet.alive {
            continue;
        }

        // First live enemy in array order wins
        let hit = state.enemies.iter().position(|enemy| {
            let (epos, esize) = enemy.bounds();
            enemy.alive && aabb_overlap(bullet.pos, bullet.size, epos, esize)
        });
        let Some(enemy_slot) = hit else {
            continue;
        };

        bullet.alive = false;
        state.shake = state.shake.max(2.5);
        state.flash = state.flash.max(0.4);

        let Some(enemy) = state.enemies.get_mut(enemy_slot) else {
            continue;
        };
        enemy.hp -= 1;
        if enemy.hp <= 0 {
            enemy.alive = false;
            state.score = state.score.saturating_add(SCORE_KILL);
            events.push(GameEvent::EnemyDestroyed {
                slot: enemy_slot,
                score: SCORE_KILL,
            });
        } else {
            state.score = state.score.saturating_add(SCORE_HIT);
            events.push(GameEvent::EnemyHit {
                slot: enemy_slot,
                score: SCORE_HIT,
            });
        }
    }
}

fn resolve_player_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let (ppos, psize) = (state.player_pos, state.player_size);
    for slot in 0..MAX_ENEMIES {
        let Some(enemy) = state.enemies.get_mut(slot) else {
            break;
        };
        if !enemy.alive {
            continue;
        }
        let (epos, esize) = enemy.bounds();
        if !aabb_overlap(ppos, psize, epos, esize) {
            continue;
        }

        enemy.alive = false;
        state.shake = 6.0;
        state.flash = 1.0;
        let ended = state.lose_life();
        events.push(GameEvent::PlayerHit { lives: state.lives });
        if ended {
            events.push(GameEvent::GameOver { score: state.score });
        } else if !state.game_over {
            log::debug!("Hit! Lives: {}", state.lives);
        }
    }
}
