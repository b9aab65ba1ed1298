//! Player systems: command intake, strikes, abilities, movement, regeneration.

use bevy::prelude::*;
use bevy_rapier2d::prelude::ReadRapierContext;

use super::components::{
    ActionRefused, ActiveHazards, Barrier, Hazard, HealthRegen, PlayerOffense, SpikeCast,
    SpikeTick,
};
use super::{PlayerAction, PlayerCommand};
use crate::combat::{
    ActionGate, Bleed, CombatCue, ComboAttack, DamageRequest, DamageSource, Dead, StunRequest,
};
use crate::components::{Enemy, Facing, Health, MoveAxis, Player};
use crate::physics::{Body2d, CollisionLayers, SpatialQuery};
use crate::profile::{CombatDisabled, PlayerProfileRef};

type ActivePlayer = (With<Player>, Without<CombatDisabled>, Without<Dead>);

/// System: обработка PlayerCommand событий
#[allow(clippy::too_many_arguments)]
pub fn read_player_commands(
    time: Res<Time<Fixed>>,
    rapier: ReadRapierContext,
    mut commands: EventReader<PlayerCommand>,
    mut players: Query<
        (
            &mut PlayerOffense,
            &mut MoveAxis,
            &mut SpikeCast,
            &mut Barrier,
            &PlayerProfileRef,
            &Body2d,
            &ActionGate,
        ),
        ActivePlayer,
    >,
    enemies: Query<(Entity, &Body2d, &ComboAttack), (With<Enemy>, Without<Dead>)>,
    mut stuns: EventWriter<StunRequest>,
    mut cues: EventWriter<CombatCue>,
) {
    let now = time.elapsed_secs();
    let context = rapier.single().ok();

    for command in commands.read() {
        let Ok((mut offense, mut axis, mut spikes, mut barrier, profile, body, gate)) =
            players.get_mut(command.player)
        else {
            continue;
        };

        if !gate.enabled {
            axis.0 = 0.0;
            continue;
        }

        let result = match command.action {
            PlayerAction::Move { axis: value } => {
                axis.0 = value.clamp(-1.0, 1.0);
                Ok(())
            }
            PlayerAction::LightAttack => offense.strike_light(&profile.light, now).map(|index| {
                cues.write(CombatCue::AttackStep {
                    entity: command.player,
                    step: index,
                });
            }),
            PlayerAction::HeavyAttack => offense.strike_heavy(&profile.heavy, now).map(|index| {
                cues.write(CombatCue::AttackStep {
                    entity: command.player,
                    step: index,
                });
            }),
            PlayerAction::CastSpikes => enemies
                .iter()
                .min_by(|a, b| {
                    a.1.position
                        .distance(body.position)
                        .total_cmp(&b.1.position.distance(body.position))
                })
                .ok_or(ActionRefused::NoTarget)
                .and_then(|(target, target_body, _)| {
                    spikes.begin(target, target_body.position, now)
                }),
            PlayerAction::RaiseBarrier => barrier.raise(now).map(|()| {
                cues.write(CombatCue::BarrierRaised {
                    entity: command.player,
                });

                let in_area = context
                    .as_ref()
                    .map(|context| {
                        context.overlap_circle(
                            body.position,
                            profile.barrier.stun_radius,
                            CollisionLayers::ENEMY,
                        )
                    })
                    .unwrap_or_default();

                // Прерывает только тех, кто сейчас в комбо
                for enemy in in_area {
                    if enemies
                        .get(enemy)
                        .is_ok_and(|(_, _, combo)| combo.is_attacking())
                    {
                        stuns.write(StunRequest {
                            target: enemy,
                            duration: profile.barrier.stun_duration,
                            source: Some(command.player),
                        });
                    }
                }
            }),
            PlayerAction::LowerBarrier => {
                if let Some((held, cooldown)) = barrier.lower(&profile.barrier, now) {
                    cues.write(CombatCue::BarrierLowered {
                        entity: command.player,
                        held,
                        cooldown,
                    });
                }
                Ok(())
            }
        };

        if let Err(refused) = result {
            crate::logger::log(&format!(
                "🎮 {:?}: {:?} refused ({})",
                command.player, command.action, refused
            ));
        }
    }
}

/// System: удары игрока (hit at damage_delay, finisher на ближайшего врага)
pub fn advance_player_strikes(
    time: Res<Time<Fixed>>,
    rapier: ReadRapierContext,
    mut players: Query<(Entity, &mut PlayerOffense, &PlayerProfileRef, &Body2d, &Facing), ActivePlayer>,
    enemies: Query<(Entity, &Body2d), (With<Enemy>, Without<Dead>)>,
    mut damage: EventWriter<DamageRequest>,
) {
    let now = time.elapsed_secs();
    let Ok(context) = rapier.single() else {
        return;
    };

    for (player, mut offense, profile, body, facing) in players.iter_mut() {
        let light = offense.light.tick(&profile.light, now);
        if let Some(strike) = light.hit {
            let anchor = facing.anchor(body.position, profile.attack_anchor_offset);
            let targets = context.overlap_circle(anchor, profile.attack_range, CollisionLayers::ENEMY);
            hit_all(
                &mut damage,
                player,
                &targets,
                profile.light.damage(strike),
                DamageSource::LightStrike { index: strike },
            );
        }

        let heavy = offense.heavy.tick(&profile.heavy, now);
        if let Some(strike) = heavy.hit {
            let targets = if strike == 2 {
                // Финишер: удар по ближайшему врагу в радиусе
                enemies
                    .iter()
                    .map(|(enemy, enemy_body)| (enemy, enemy_body.position.distance(body.position)))
                    .filter(|(_, distance)| *distance <= profile.heavy_finisher_reach)
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .and_then(|(enemy, _)| enemies.get(enemy).ok())
                    .map(|(_, enemy_body)| {
                        context.overlap_circle(
                            enemy_body.position,
                            profile.attack_range,
                            CollisionLayers::ENEMY,
                        )
                    })
                    .unwrap_or_default()
            } else {
                let anchor = facing.anchor(body.position, profile.attack_anchor_offset);
                context.overlap_circle(anchor, profile.attack_range, CollisionLayers::ENEMY)
            };
            hit_all(
                &mut damage,
                player,
                &targets,
                profile.heavy.damage(strike),
                DamageSource::HeavyStrike { index: strike },
            );
        }
    }
}

fn hit_all(
    damage: &mut EventWriter<DamageRequest>,
    attacker: Entity,
    targets: &[Entity],
    amount: f32,
    source: DamageSource,
) {
    if targets.is_empty() {
        crate::logger::log(&format!("🗡️ {:?}: {:?} missed", attacker, source));
    }
    for &target in targets {
        damage.write(DamageRequest {
            attacker: Some(attacker),
            target,
            amount,
            source,
        });
    }
}

/// System: способность шипов (tracking → warning → eruption), публикует зоны
#[allow(clippy::too_many_arguments)]
pub fn advance_spike_casts(
    time: Res<Time<Fixed>>,
    rapier: ReadRapierContext,
    mut hazards: ResMut<ActiveHazards>,
    mut players: Query<(Entity, &mut SpikeCast, &PlayerProfileRef), ActivePlayer>,
    mut enemies: Query<(&Body2d, &mut Bleed), (With<Enemy>, Without<Dead>)>,
    mut damage: EventWriter<DamageRequest>,
    mut cues: EventWriter<CombatCue>,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();
    hazards.zones.clear();
    let Ok(context) = rapier.single() else {
        return;
    };

    for (caster, mut spikes, profile) in players.iter_mut() {
        let target_x = spikes
            .tracked_target()
            .and_then(|target| enemies.get(target).ok())
            .map(|(body, _)| body.position.x);

        match spikes.advance(&profile.spikes, target_x, dt, now) {
            SpikeTick::Idle => {}
            SpikeTick::Zone(position) => hazards.zones.push(Hazard {
                owner: caster,
                position,
                radius: profile.spikes.radius,
            }),
            SpikeTick::Erupted(position) => {
                cues.write(CombatCue::HazardErupted { caster, position });
                let targets =
                    context.overlap_circle(position, profile.spikes.radius, CollisionLayers::ENEMY);
                crate::logger::log_info(&format!(
                    "🔥 Spikes erupted at {:.2} ({} hit)",
                    position.x,
                    targets.len()
                ));

                for target in targets {
                    let Ok((_, mut bleed)) = enemies.get_mut(target) else {
                        continue;
                    };
                    bleed.apply(
                        profile.spikes.bleed_duration,
                        profile.spikes.bleed_damage_per_dodge,
                        now,
                    );
                    damage.write(DamageRequest {
                        attacker: Some(caster),
                        target,
                        amount: profile.spikes.damage,
                        source: DamageSource::Spikes,
                    });
                }
            }
        }
    }
}

/// System: авто-опускание барьера по истечении max_duration
pub fn advance_barriers(
    time: Res<Time<Fixed>>,
    mut players: Query<(Entity, &mut Barrier, &PlayerProfileRef), ActivePlayer>,
    mut cues: EventWriter<CombatCue>,
) {
    let now = time.elapsed_secs();

    for (entity, mut barrier, profile) in players.iter_mut() {
        if !barrier.expired(&profile.barrier, now) {
            continue;
        }
        if let Some((held, cooldown)) = barrier.lower(&profile.barrier, now) {
            cues.write(CombatCue::BarrierLowered {
                entity,
                held,
                cooldown,
            });
        }
    }
}

/// System: MoveAxis → горизонтальная скорость, разворот по направлению
pub fn move_player(
    mut players: Query<
        (Entity, &MoveAxis, &PlayerProfileRef, &mut Body2d, &mut Facing, &PlayerOffense),
        ActivePlayer,
    >,
    mut cues: EventWriter<CombatCue>,
) {
    for (entity, axis, profile, mut body, mut facing, offense) in players.iter_mut() {
        body.velocity.x = axis.0 * profile.move_speed;

        // Во время удара не разворачиваемся
        if axis.0 != 0.0 && !offense.is_attacking() {
            let turned = Facing(axis.0.signum());
            if turned != *facing {
                *facing = turned;
                cues.write(CombatCue::FacingChanged {
                    entity,
                    facing: turned.0,
                });
            }
        }
    }
}

/// System: регенерация здоровья игрока после паузы без урона
pub fn regenerate_player_health(
    time: Res<Time<Fixed>>,
    mut players: Query<(&mut Health, &HealthRegen, &PlayerProfileRef), Without<Dead>>,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();

    for (mut health, regen, profile) in players.iter_mut() {
        if health.current < health.max && regen.ready(profile.health_regen_delay, now) {
            health.heal(profile.health_regen_rate * dt);
        }
    }
}
