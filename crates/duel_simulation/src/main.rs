//! Headless дуэль
//!
//! Игрок по фиксированному сценарию против одного врага. Печатает статус
//! каждые 60 тиков. Первый аргумент — путь к JSON `SimulationConfig` (опционально).

use bevy::prelude::*;
use duel_simulation::profile::{CombatProfileRef, PlayerProfileRef};
use duel_simulation::*;

const TICKS: usize = 1800;

fn load_config() -> SimulationConfig {
    let Some(path) = std::env::args().nth(1) else {
        return SimulationConfig::default();
    };

    match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| SimulationConfig::from_json(&text).map_err(|e| e.to_string()))
    {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Config {} ignored: {}", path, error);
            SimulationConfig::default()
        }
    }
}

fn scripted_action(tick: usize) -> Option<PlayerAction> {
    match tick % 240 {
        0 => Some(PlayerAction::Move { axis: 1.0 }),
        30 => Some(PlayerAction::Move { axis: 0.0 }),
        40 | 80 => Some(PlayerAction::LightAttack),
        120 => Some(PlayerAction::HeavyAttack),
        170 => Some(PlayerAction::CastSpikes),
        200 => Some(PlayerAction::RaiseBarrier),
        230 => Some(PlayerAction::LowerBarrier),
        _ => None,
    }
}

fn main() {
    let config = load_config();
    let dt = config.tick_seconds();
    println!("Starting headless duel (seed: {})", config.seed);

    let mut app = create_app_with_config(config);
    let world = app.world_mut();

    spawn_floor(world, Vec2::new(0.0, -0.5), Vec2::new(50.0, 0.5));
    spawn_wall(world, Vec2::new(-20.5, 3.0), Vec2::new(0.5, 3.0));
    spawn_wall(world, Vec2::new(20.5, 3.0), Vec2::new(0.5, 3.0));

    let (player_profile, enemy_profile) = match (
        PlayerProfileRef::new(PlayerProfile::default()),
        CombatProfileRef::new(CombatProfile::default()),
    ) {
        (Ok(player), Ok(enemy)) => (player, enemy),
        (Err(error), _) | (_, Err(error)) => {
            eprintln!("Default profile invalid: {}", error);
            return;
        }
    };

    let player = spawn_player(world, Vec2::new(-4.0, 0.5), player_profile);
    let enemy = spawn_enemy(
        world,
        Vec2::new(4.0, 0.5),
        player,
        enemy_profile,
        AIConfig::default(),
    );

    for tick in 0..TICKS {
        if let Some(action) = scripted_action(tick) {
            app.world_mut().send_event(PlayerCommand { player, action });
        }
        step_simulation(&mut app, dt);

        if tick % 60 == 0 {
            let world = app.world();
            let player_hp = world.get::<Health>(player).map(|h| h.current);
            let enemy_status = world
                .get::<Health>(enemy)
                .zip(world.get::<Stamina>(enemy))
                .zip(world.get::<AIState>(enemy));

            match (player_hp, enemy_status) {
                (Some(player_hp), Some(((hp, stamina), state))) => println!(
                    "Tick {}: player HP {:.1} | enemy HP {:.1}, stamina {:.1}, {:?}",
                    tick, player_hp, hp.current, stamina.current, state
                ),
                _ => {
                    println!("Tick {}: duel over", tick);
                    break;
                }
            }
        }
    }

    println!("Simulation complete!");
}
