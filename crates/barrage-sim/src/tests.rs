//! Tests for damage resolution, neighbour queries, flight and the tick pipeline.

use hecs::{Entity, World};

use barrage_core::commands::{CombatCommand, FireOrder};
use barrage_core::components::*;
use barrage_core::constants::*;
use barrage_core::enums::*;
use barrage_core::events::{CombatEvent, EffectEvent, ExplosionKind};
use barrage_core::state::TickReport;
use barrage_core::stats::{CombatTables, DamageModifiers, WeaponId, WeaponStats};
use barrage_core::types::{ObjectId, Position};
use barrage_terrain::TileMap;

use crate::battlefield::Battlefield;
use crate::damage::{apply_damage, calc_damage, Hit};
use crate::engine::{CombatEngine, SimConfig};
use crate::error::SpawnError;
use crate::neighbours::{insert_neighbour, Neighbour, NeighbourCache, SpatialIndex};
use crate::projectile::{FlightPath, Projectile};
use crate::registry::ProjectileId;
use crate::systems::burn::charge;
use crate::systems::hits::{direct_hit_for, hit_for};
use crate::systems::impact::{self, in_blast};
use crate::visibility::gfx_visible;
use crate::world_setup::{self, footprint_contains, StructureSpec, UnitSpec};

// ---- Helpers ----

fn cannon(name: &str) -> WeaponStats {
    WeaponStats {
        name: name.into(),
        class: WeaponClass::Kinetic,
        subclass: WeaponSubClass::Cannon,
        effect: WeaponEffect::AntiTank,
        movement: MovementModel::Direct,
        surface_to_air: SurfaceToAir::GroundOnly,
        damage: 40,
        flight_speed: 1000,
        min_range: 0,
        long_range: 1500,
        radius: 0,
        radius_damage: 0,
        radius_hit: 100,
        radius_life: 0,
        incen_radius: 0,
        incen_time: 0,
        incen_damage: 0,
        penetrate: false,
        fire_sound: None,
        impact_sound: None,
    }
}

fn engine_with(config: SimConfig, weapons: Vec<WeaponStats>) -> (CombatEngine, Vec<WeaponId>) {
    let mut tables = CombatTables::new();
    let ids = weapons
        .into_iter()
        .map(|w| tables.add_weapon(w).unwrap())
        .collect();
    (
        CombatEngine::new(config, tables, TileMap::flat(32, 32, 0)),
        ids,
    )
}

fn unit_at(engine: &mut CombatEngine, player: u8, x: i32, y: i32) -> Entity {
    engine.spawn_unit(UnitSpec {
        player,
        position: Position::new(x, y, 0),
        ..Default::default()
    })
}

fn order(
    weapon: WeaponId,
    player: u8,
    firer: Option<Entity>,
    target: Option<Entity>,
    point: Position,
) -> FireOrder {
    FireOrder {
        weapon,
        firer: firer.map(ObjectId::from),
        player,
        target_point: point,
        target: target.map(ObjectId::from),
        visible: false,
        muzzle: None,
    }
}

fn body_of(engine: &CombatEngine, entity: Entity) -> Option<u32> {
    engine
        .world()
        .get::<&TargetBody>(entity)
        .ok()
        .map(|b| b.body())
}

fn run(engine: &mut CombatEngine, ticks: usize) -> Vec<TickReport> {
    (0..ticks).map(|_| engine.tick()).collect()
}

fn damage_events(reports: &[TickReport]) -> usize {
    reports
        .iter()
        .flat_map(|r| &r.combat)
        .filter(|e| matches!(e, CombatEvent::DamageDealt { .. }))
        .count()
}

fn unit_body(armour: Armour, experience: u32) -> TargetBody {
    TargetBody::Unit(UnitBody {
        kind: UnitKind::Vehicle,
        propulsion: PropulsionType::Tracked,
        body: 200,
        original_body: 200,
        armour,
        experience,
        resistance: None,
        base_resistance: 100,
        flying: false,
        last_hit: None,
    })
}

fn hit(damage: u32, subclass: WeaponSubClass) -> Hit {
    Hit {
        damage,
        effect: WeaponEffect::AntiTank,
        class: WeaponClass::Kinetic,
        subclass,
        side: HitSide::Front,
        modified: true,
    }
}

/// Heavy plating on one side against one class, bare everywhere else.
fn plated(side: HitSide, class: WeaponClass, value: u32) -> Armour {
    let mut armour = Armour::default();
    armour.values[side.index()][class.index()] = value;
    armour
}

fn battlefield_with(weapons: Vec<WeaponStats>) -> (Battlefield, Vec<WeaponId>) {
    let mut tables = CombatTables::new();
    let ids = weapons
        .into_iter()
        .map(|w| tables.add_weapon(w).unwrap())
        .collect();
    (
        Battlefield::new(SimConfig::default(), tables, TileMap::flat(32, 32, 0)),
        ids,
    )
}

fn body_in(world: &World, entity: Entity) -> u32 {
    world.get::<&TargetBody>(entity).unwrap().body()
}

fn bare_projectile(player: u8, source: Option<Entity>, target: Option<Entity>) -> Projectile {
    Projectile {
        state: ProjectileState::InFlight,
        weapon: WeaponId(0),
        player,
        source,
        target,
        last_damaged: None,
        carried_hit: None,
        pos: Position::default(),
        start: Position::default(),
        dest: Position::default(),
        aim_offset: 0,
        path: FlightPath::Direct { homing: false },
        pitch: 0,
        born: 0,
        visible: false,
        target_radius: 0,
        air_target: false,
    }
}

// ---- Damage ----

#[test]
fn test_calc_damage_never_rounds_to_zero() {
    assert_eq!(calc_damage(1, 50), 1);
    assert_eq!(calc_damage(0, 50), 0);
    assert_eq!(calc_damage(40, 150), 60);
}

#[test]
fn test_armour_subtracts_then_veterans_reduce() {
    let modifiers = DamageModifiers::default();

    let mut rookie = unit_body(Armour::uniform(30, 30), 0);
    let outcome = apply_damage(&mut rookie, &hit(40, WeaponSubClass::Cannon), &modifiers, 0);
    assert_eq!(outcome.dealt, 10);
    assert_eq!(rookie.body(), 190);

    // Eight kills puts a unit on level 2: 12% off.
    let mut veteran = unit_body(Armour::uniform(30, 30), 8 * EXPERIENCE_PER_KILL);
    let outcome = apply_damage(&mut veteran, &hit(40, WeaponSubClass::Cannon), &modifiers, 0);
    assert_eq!(outcome.dealt, 8);
}

#[test]
fn test_damage_below_armour_still_scratches() {
    let modifiers = DamageModifiers::default();
    let mut body = unit_body(Armour::uniform(50, 50), 0);
    let outcome = apply_damage(&mut body, &hit(20, WeaponSubClass::Cannon), &modifiers, 0);
    assert_eq!(outcome.dealt, 1);
}

#[test]
fn test_veteran_can_shrug_off_a_hit_that_barely_penetrates() {
    let modifiers = DamageModifiers::default();
    // One point past armour, 12% off on level 2, rounds down to nothing.
    let mut veteran = unit_body(Armour::uniform(30, 30), 8 * EXPERIENCE_PER_KILL);
    let outcome = apply_damage(&mut veteran, &hit(31, WeaponSubClass::Cannon), &modifiers, 0);
    assert_eq!(outcome.dealt, 0);
    assert!(!outcome.destroyed);
    assert_eq!(veteran.body(), 200);

    // A rookie takes the point.
    let mut rookie = unit_body(Armour::uniform(30, 30), 0);
    let outcome = apply_damage(&mut rookie, &hit(31, WeaponSubClass::Cannon), &modifiers, 0);
    assert_eq!(outcome.dealt, 1);
}

#[test]
fn test_body_never_increases_for_any_combination() {
    let modifiers = DamageModifiers::default();
    for damage in [0, 1, 5, 40, 200, 5000] {
        for armour in [0, 10, 50, 300] {
            for experience in [0, 8 * EXPERIENCE_PER_KILL, 512 * EXPERIENCE_PER_KILL] {
                let mut body = unit_body(Armour::uniform(armour, armour), experience);
                let before = body.body();
                apply_damage(&mut body, &hit(damage, WeaponSubClass::Cannon), &modifiers, 0);
                assert!(
                    body.body() <= before,
                    "damage {damage} armour {armour} exp {experience} healed"
                );
                if damage <= armour {
                    assert_eq!(body.body(), before - 1);
                }
            }
        }
    }
}

#[test]
fn test_destroying_hit_reports_full_relative_damage() {
    let modifiers = DamageModifiers::default();
    let mut body = unit_body(Armour::default(), 0);
    let outcome = apply_damage(&mut body, &hit(500, WeaponSubClass::Cannon), &modifiers, 0);
    assert!(outcome.destroyed);
    assert_eq!(outcome.dealt, 200);
    assert_eq!(outcome.relative, EXPERIENCE_PER_KILL);
    assert_eq!(body.body(), 0);
}

#[test]
fn test_modifier_table_scales_direct_hits() {
    let mut modifiers = DamageModifiers::default();
    modifiers.set_propulsion(WeaponEffect::AntiTank, PropulsionType::Tracked, 50);
    let mut body = unit_body(Armour::default(), 0);
    let outcome = apply_damage(&mut body, &hit(40, WeaponSubClass::Cannon), &modifiers, 0);
    assert_eq!(outcome.dealt, 20);

    // Unmodified hits bypass the table.
    let mut body = unit_body(Armour::default(), 0);
    let raw = Hit {
        modified: false,
        ..hit(40, WeaponSubClass::Cannon)
    };
    assert_eq!(apply_damage(&mut body, &raw, &modifiers, 0).dealt, 40);
}

#[test]
fn test_electronic_drains_resistance_not_body() {
    let modifiers = DamageModifiers::default();
    let mut body = unit_body(Armour::default(), 0);

    let first = apply_damage(&mut body, &hit(60, WeaponSubClass::Electronic), &modifiers, 0);
    assert!(!first.captured);
    assert_eq!(first.dealt, 0);
    assert_eq!(body.body(), 200);
    match &body {
        TargetBody::Unit(unit) => assert_eq!(unit.resistance, Some(40)),
        _ => unreachable!(),
    }

    let second = apply_damage(&mut body, &hit(60, WeaponSubClass::Electronic), &modifiers, 0);
    assert!(second.captured);
    assert_eq!(body.body(), 200);
    match &body {
        // Back to full resistance for the new owner.
        TargetBody::Unit(unit) => assert_eq!(unit.resistance, None),
        _ => unreachable!(),
    }
}

#[test]
fn test_structure_resistance() {
    let modifiers = DamageModifiers::default();
    let structure = |resistance| {
        TargetBody::Structure(StructureBody {
            strength: StructureStrength::Medium,
            body: 500,
            original_body: 500,
            armour: Armour::default(),
            resistance,
            footprint: (1, 1),
            last_hit: None,
        })
    };
    let jam = hit(60, WeaponSubClass::Electronic);

    let mut immune = structure(None);
    assert!(!apply_damage(&mut immune, &jam, &modifiers, 0).captured);

    let mut sturdy = structure(Some(100));
    assert!(!apply_damage(&mut sturdy, &jam, &modifiers, 0).captured);
    assert!(apply_damage(&mut sturdy, &jam, &modifiers, 0).captured);
    assert_eq!(sturdy.body(), 500);

    // Once taken, further jamming changes nothing.
    assert!(!apply_damage(&mut sturdy, &jam, &modifiers, 0).captured);
    assert_eq!(sturdy.body(), 500);
}

#[test]
fn test_emp_deals_no_damage_and_stays_on_record() {
    let modifiers = DamageModifiers::default();
    let mut body = unit_body(Armour::default(), 0);
    let outcome = apply_damage(&mut body, &hit(100, WeaponSubClass::Emp), &modifiers, 500);
    assert_eq!(outcome.dealt, 0);
    assert_eq!(body.body(), 200);

    apply_damage(&mut body, &hit(10, WeaponSubClass::Cannon), &modifiers, 600);
    match &body {
        TargetBody::Unit(unit) => {
            let last = unit.last_hit.unwrap();
            assert_eq!(last.subclass, WeaponSubClass::Emp);
            assert_eq!(last.time, 500);
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_grounded_vtol_takes_triple_damage() {
    let modifiers = DamageModifiers::default();
    let vtol = |flying| {
        TargetBody::Unit(UnitBody {
            kind: UnitKind::Vehicle,
            propulsion: PropulsionType::Lift,
            body: 200,
            original_body: 200,
            armour: Armour::default(),
            experience: 0,
            resistance: None,
            base_resistance: 100,
            flying,
            last_hit: None,
        })
    };
    let mut landed = vtol(false);
    let mut airborne = vtol(true);
    let shot = hit(10, WeaponSubClass::Cannon);
    assert_eq!(apply_damage(&mut landed, &shot, &modifiers, 0).dealt, 30);
    assert_eq!(apply_damage(&mut airborne, &shot, &modifiers, 0).dealt, 10);
}

#[test]
fn test_indestructible_feature_ignores_hits() {
    let modifiers = DamageModifiers::default();
    let mut oil = TargetBody::Feature(FeatureBody {
        damageable: false,
        body: 100,
        original_body: 100,
        armour: Armour::default(),
        footprint: (1, 1),
        last_hit: None,
    });
    let outcome = apply_damage(&mut oil, &hit(500, WeaponSubClass::Cannon), &modifiers, 0);
    assert_eq!(outcome.dealt, 0);
    assert_eq!(oil.body(), 100);
}

// ---- Neighbours ----

#[test]
fn test_insert_neighbour_sorted_and_capped() {
    let mut world = World::new();
    let a = world.spawn(());
    let b = world.spawn(());
    let c = world.spawn(());
    let mut list = Vec::new();
    insert_neighbour(&mut list, Neighbour { entity: a, dist_sq: 50 }, 2);
    insert_neighbour(&mut list, Neighbour { entity: b, dist_sq: 10 }, 2);
    insert_neighbour(&mut list, Neighbour { entity: c, dist_sq: 90 }, 2);
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].entity, b);
    assert_eq!(list[1].entity, a);
}

#[test]
fn test_full_neighbour_list_drops_late_arrivals() {
    let mut world = World::new();
    let a = world.spawn(());
    let b = world.spawn(());
    let c = world.spawn(());
    let mut list = Vec::new();
    insert_neighbour(&mut list, Neighbour { entity: a, dist_sq: 50 }, 2);
    insert_neighbour(&mut list, Neighbour { entity: b, dist_sq: 90 }, 2);
    // Closer than both, but too late.
    insert_neighbour(&mut list, Neighbour { entity: c, dist_sq: 10 }, 2);
    let dists: Vec<i64> = list.iter().map(|n| n.dist_sq).collect();
    assert_eq!(dists, vec![50, 90]);
    assert_eq!(list[0].entity, a);
    assert_eq!(list[1].entity, b);
}

#[test]
fn test_neighbour_ties_keep_spawn_order() {
    let mut world = World::new();
    let mut counter = 0;
    let right = world_setup::spawn_unit(
        &mut world,
        &mut counter,
        UnitSpec {
            position: Position::new(1300, 1200, 0),
            ..Default::default()
        },
    );
    let left = world_setup::spawn_unit(
        &mut world,
        &mut counter,
        UnitSpec {
            position: Position::new(1100, 1200, 0),
            ..Default::default()
        },
    );
    let mut index = SpatialIndex::default();
    index.rebuild(&world, (4096, 4096));

    let found = index.query(&Position::new(1200, 1200, 0), PROJ_NEIGHBOUR_RANGE, MAX_NEIGHBOURS);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].dist_sq, found[1].dist_sq);
    assert_eq!(found[0].entity, right);
    assert_eq!(found[1].entity, left);
}

#[test]
fn test_neighbour_query_radius_inclusive() {
    let mut world = World::new();
    let mut counter = 0;
    let edge = world_setup::spawn_unit(
        &mut world,
        &mut counter,
        UnitSpec {
            position: Position::new(1000 + PROJ_NEIGHBOUR_RANGE, 1000, 0),
            ..Default::default()
        },
    );
    world_setup::spawn_unit(
        &mut world,
        &mut counter,
        UnitSpec {
            position: Position::new(1000 + PROJ_NEIGHBOUR_RANGE + 1, 1000, 0),
            ..Default::default()
        },
    );
    let mut index = SpatialIndex::default();
    index.rebuild(&world, (4096, 4096));

    let found = index.query(&Position::new(1000, 1000, 0), PROJ_NEIGHBOUR_RANGE, MAX_NEIGHBOURS);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].entity, edge);
}

#[test]
fn test_destroyed_objects_not_indexed() {
    let mut world = World::new();
    let mut counter = 0;
    let gone = world_setup::spawn_unit(
        &mut world,
        &mut counter,
        UnitSpec {
            position: Position::new(1000, 1000, 0),
            ..Default::default()
        },
    );
    world.insert_one(gone, Destroyed).unwrap();
    let mut index = SpatialIndex::default();
    index.rebuild(&world, (4096, 4096));
    assert!(index
        .query(&Position::new(1000, 1000, 0), 512, MAX_NEIGHBOURS)
        .is_empty());
}

#[test]
fn test_neighbour_cache_idempotent_within_tick() {
    let mut world = World::new();
    let mut counter = 0;
    world_setup::spawn_unit(
        &mut world,
        &mut counter,
        UnitSpec {
            position: Position::new(1000, 1000, 0),
            ..Default::default()
        },
    );
    let mut index = SpatialIndex::default();
    index.rebuild(&world, (4096, 4096));
    let mut cache = NeighbourCache::default();
    let subject = ProjectileId::new(0, 0);
    let here = Position::new(1050, 1000, 0);

    let first = cache.neighbours(&index, subject, 7, &here, 512);
    // A different position within the same tick still answers from cache.
    let second = cache.neighbours(&index, subject, 7, &Position::new(3000, 3000, 0), 512);
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(cache.len(), 1);

    let fresh = cache.neighbours(&index, subject, 8, &Position::new(3000, 3000, 0), 512);
    assert!(fresh.is_empty());
    assert_eq!(cache.len(), 1);
}

// ---- Area and burn ----

#[test]
fn test_blast_boundary_is_outside() {
    assert!(in_blast(0, 128));
    assert!(in_blast(128 * 128 - 1, 128));
    assert!(!in_blast(128 * 128, 128));
}

#[test]
fn test_footprint_contains() {
    let centre = Position::new(1000, 1000, 0);
    assert!(footprint_contains(&centre, (2, 2), &Position::new(1100, 900, 0)));
    assert!(footprint_contains(&centre, (2, 2), &Position::new(872, 872, 0)));
    assert!(!footprint_contains(&centre, (2, 2), &Position::new(1128, 1000, 0)));
}

#[test]
fn test_burn_charge_totals_rate_times_exposure() {
    let mut state = None;
    let mut total = 0;
    for tick in 1..=30u64 {
        let now = tick as u32 * TICK_MS;
        let (next, owed) = charge(state, now, tick, 37);
        state = Some(next);
        total += owed;
    }
    // Exposure ran from 100 ms to 3000 ms.
    assert_eq!(total, 2900 * 37 / 1000);
}

#[test]
fn test_burn_charge_restarts_after_gap() {
    let (state, _) = charge(None, 100, 1, 50);
    let (state, owed) = charge(Some(state), 600, 6, 50);
    assert_eq!(owed, 0);
    assert_eq!(state.start, 600);
    assert_eq!(state.applied, 0);
}

// ---- Visibility ----

#[test]
fn test_visibility_follows_seen_objects() {
    let mut world = World::new();
    let mut counter = 0;
    let seen = world_setup::spawn_unit(
        &mut world,
        &mut counter,
        UnitSpec {
            player: 0,
            seen_by: 1 << 1,
            ..Default::default()
        },
    );
    let hidden = world_setup::spawn_unit(
        &mut world,
        &mut counter,
        UnitSpec {
            player: 2,
            ..Default::default()
        },
    );

    assert!(gfx_visible(&world, &bare_projectile(1, None, None), 1));
    assert!(gfx_visible(&world, &bare_projectile(0, Some(seen), Some(hidden)), 1));
    assert!(!gfx_visible(&world, &bare_projectile(2, Some(hidden), None), 1));
}

#[test]
fn test_enemy_structure_fire_hidden_without_seen_target() {
    let mut world = World::new();
    let mut counter = 0;
    let tower = world_setup::spawn_structure(
        &mut world,
        &mut counter,
        StructureSpec {
            player: 0,
            seen_by: 1 << 1,
            ..Default::default()
        },
    );
    let victim = world_setup::spawn_unit(
        &mut world,
        &mut counter,
        UnitSpec {
            player: 2,
            ..Default::default()
        },
    );
    assert!(!gfx_visible(&world, &bare_projectile(0, Some(tower), Some(victim)), 1));

    world.get::<&mut Visibility>(victim).unwrap().seen_by = 1 << 1;
    assert!(gfx_visible(&world, &bare_projectile(0, Some(tower), Some(victim)), 1));
}

// ---- Launch ----

#[test]
fn test_spawn_rejects_bad_orders() {
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![cannon("cannon")]);
    let point = Position::new(1000, 1000, 0);

    let err = engine.spawn(&order(WeaponId(9), 0, None, None, point)).unwrap_err();
    assert_eq!(err, SpawnError::UnknownWeapon(WeaponId(9)));

    let err = engine.spawn(&order(ids[0], 9, None, None, point)).unwrap_err();
    assert_eq!(err, SpawnError::InvalidPlayer(9));

    let dead = unit_at(&mut engine, 1, 1000, 1000);
    engine.world_mut().despawn(dead).unwrap();
    let err = engine
        .spawn(&order(ids[0], 0, None, Some(dead), point))
        .unwrap_err();
    assert_eq!(err, SpawnError::DeadTarget(ObjectId::from(dead)));

    assert_eq!(engine.projectile_count(), 0);
}

#[test]
fn test_queued_fire_order_launches_on_tick() {
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![cannon("cannon")]);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    engine.queue_command(CombatCommand::Fire(order(
        ids[0],
        0,
        Some(firer),
        None,
        Position::new(1500, 1000, 0),
    )));
    assert_eq!(engine.projectile_count(), 0);

    let report = engine.tick();
    assert_eq!(report.projectiles.len(), 1);
    assert!(report.combat.iter().any(|e| matches!(
        e,
        CombatEvent::ShotFired { player: 0, on_target: false, .. }
    )));
}

#[test]
fn test_destroy_ignores_stale_handle() {
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![cannon("cannon")]);
    let id = engine
        .spawn(&order(ids[0], 0, None, None, Position::new(1000, 1000, 0)))
        .unwrap();
    assert!(engine.destroy(id));
    assert!(!engine.destroy(id));
    assert!(engine.projectile(id).is_none());
}

#[test]
fn test_indirect_inside_min_range_fires_direct() {
    let mortar = WeaponStats {
        subclass: WeaponSubClass::Mortar,
        movement: MovementModel::Indirect,
        min_range: 1000,
        flight_speed: 500,
        ..cannon("mortar")
    };
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![mortar]);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    let id = engine
        .spawn(&order(ids[0], 0, Some(firer), None, Position::new(1000, 1000, 0)))
        .unwrap();
    assert_eq!(
        engine.projectile(id).unwrap().path,
        FlightPath::Direct { homing: false }
    );
}

// ---- Flight ----

#[test]
fn test_direct_round_impacts_after_range_over_speed() {
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![cannon("cannon")]);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    let target = unit_at(&mut engine, 1, 1500, 1000);
    let id = engine
        .spawn(&order(
            ids[0],
            0,
            Some(firer),
            Some(target),
            Position::new(1500, 1000, 0),
        ))
        .unwrap();

    // 1000 units at 1000 units/s: ten 100 ms ticks.
    run(&mut engine, 9);
    assert_eq!(engine.projectile(id).unwrap().state, ProjectileState::InFlight);
    engine.tick();
    let proj = engine.projectile(id).unwrap();
    assert_eq!(proj.state, ProjectileState::Impact);
    assert_eq!(proj.target, Some(target));

    let report = engine.tick();
    assert_eq!(engine.projectile_count(), 0);
    assert_eq!(body_of(&engine, target), Some(60));
    assert!(report.combat.iter().any(|e| matches!(
        e,
        CombatEvent::DamageDealt { attacker: 0, amount: 40, .. }
    )));
    assert!(report.effects.iter().any(|e| matches!(
        e,
        EffectEvent::Explosion { kind: ExplosionKind::Hit, .. }
    )));
}

#[test]
fn test_indirect_round_lands_near_target() {
    let howitzer = WeaponStats {
        subclass: WeaponSubClass::Howitzer,
        movement: MovementModel::Indirect,
        flight_speed: 500,
        ..cannon("howitzer")
    };
    let config = SimConfig {
        gravity: 100,
        ..Default::default()
    };
    let (mut engine, ids) = engine_with(config, vec![howitzer]);
    let firer = unit_at(&mut engine, 0, 500, 2000);
    let id = engine
        .spawn(&order(ids[0], 0, Some(firer), None, Position::new(2500, 2000, 0)))
        .unwrap();

    // The flatter of the two solutions is picked.
    assert_eq!(engine.projectile(id).unwrap().pitch, 26);
    assert_eq!(engine.world().get::<&Turret>(firer).unwrap().pitch, 26);

    let mut landed = None;
    for tick in 1..=60 {
        engine.tick();
        let proj = engine.projectile(id).unwrap();
        if proj.state == ProjectileState::Impact {
            landed = Some((tick, proj.pos));
            break;
        }
    }
    let (tick, pos) = landed.expect("shell never landed");
    assert!((40..50).contains(&tick), "landed on tick {tick}");
    assert!((pos.x - 2500).abs() <= 100, "landed at {pos:?}");
    assert_eq!(pos.z, IMPACT_HEIGHT_ABOVE_GROUND);
}

#[test]
fn test_penetrating_round_hits_each_unit_once() {
    let gauss = WeaponStats {
        subclass: WeaponSubClass::Gauss,
        damage: 30,
        penetrate: true,
        ..cannon("gauss")
    };
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![gauss]);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    let first = unit_at(&mut engine, 1, 1000, 1000);
    let second = unit_at(&mut engine, 1, 1300, 1000);
    engine
        .spawn(&order(ids[0], 0, Some(firer), None, Position::new(1500, 1000, 0)))
        .unwrap();

    let reports = run(&mut engine, 40);
    assert_eq!(body_of(&engine, first), Some(70));
    assert_eq!(body_of(&engine, second), Some(70));
    assert_eq!(damage_events(&reports), 2);
    assert_eq!(engine.projectile_count(), 0);
}

#[test]
fn test_round_leaving_map_becomes_a_miss() {
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![cannon("cannon")]);
    let mut fire = order(ids[0], 0, None, None, Position::new(4090, 1000, 0));
    fire.muzzle = Some(Position::new(4000, 1000, 0));
    let id = engine.spawn(&fire).unwrap();

    engine.tick();
    let proj = engine.projectile(id).unwrap();
    assert_eq!(proj.state, ProjectileState::Impact);
    assert_eq!(proj.pos.x, 4000);
    assert_eq!(proj.target, None);

    let report = engine.tick();
    assert_eq!(engine.projectile_count(), 0);
    assert!(report.effects.iter().any(|e| matches!(
        e,
        EffectEvent::Explosion { kind: ExplosionKind::Miss, .. }
    )));
}

#[test]
fn test_target_dying_mid_flight_is_dropped() {
    let missile = WeaponStats {
        subclass: WeaponSubClass::Missile,
        movement: MovementModel::HomingDirect,
        ..cannon("missile")
    };
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![missile]);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    let target = unit_at(&mut engine, 1, 2500, 1000);
    let id = engine
        .spawn(&order(
            ids[0],
            0,
            Some(firer),
            Some(target),
            Position::new(2500, 1000, 0),
        ))
        .unwrap();

    run(&mut engine, 3);
    engine.world_mut().despawn(target).unwrap();
    engine.tick();
    let proj = engine.projectile(id).unwrap();
    assert_eq!(proj.target, None);
    assert_eq!(proj.state, ProjectileState::InFlight);

    let reports = run(&mut engine, 40);
    assert_eq!(engine.projectile_count(), 0);
    assert_eq!(damage_events(&reports), 0);
}

#[test]
fn test_las_sat_waits_in_multiplayer() {
    let las_sat = WeaponStats {
        subclass: WeaponSubClass::LasSat,
        damage: 50,
        ..cannon("lassat")
    };
    let config = SimConfig {
        multiplayer: true,
        ..Default::default()
    };
    let (mut engine, ids) = engine_with(config, vec![las_sat]);
    let target = unit_at(&mut engine, 1, 2000, 2000);
    let id = engine
        .spawn(&order(ids[0], 0, None, Some(target), Position::new(2000, 2000, 0)))
        .unwrap();

    run(&mut engine, 79);
    assert_eq!(engine.projectile(id).unwrap().state, ProjectileState::InFlight);
    engine.tick();
    assert_eq!(engine.projectile(id).unwrap().state, ProjectileState::Impact);
    engine.tick();
    assert_eq!(body_of(&engine, target), Some(50));
}

// ---- Impact ----

#[test]
fn test_blast_spares_objects_on_the_boundary() {
    let shell = WeaponStats {
        radius: 128,
        radius_damage: 20,
        ..cannon("shell")
    };
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![shell]);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    let target = unit_at(&mut engine, 1, 1500, 1000);
    let inside = unit_at(&mut engine, 1, 1500, 1100);
    let boundary = unit_at(&mut engine, 1, 1500, 1128);
    engine
        .spawn(&order(
            ids[0],
            0,
            Some(firer),
            Some(target),
            Position::new(1500, 1000, 0),
        ))
        .unwrap();

    run(&mut engine, 12);
    // The direct target takes the direct hit only.
    assert_eq!(body_of(&engine, target), Some(60));
    assert_eq!(body_of(&engine, inside), Some(80));
    assert_eq!(body_of(&engine, boundary), Some(100));
}

#[test]
fn test_fire_burns_for_its_duration() {
    let flamer = WeaponStats {
        subclass: WeaponSubClass::Flame,
        class: WeaponClass::Heat,
        damage: 10,
        incen_radius: 128,
        incen_time: 2000,
        incen_damage: 50,
        ..cannon("incendiary")
    };
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![flamer]);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    let target = engine.spawn_unit(UnitSpec {
        player: 1,
        position: Position::new(1500, 1000, 0),
        body: 1000,
        ..Default::default()
    });
    let friendly = unit_at(&mut engine, 0, 1550, 1000);
    engine
        .spawn(&order(
            ids[0],
            0,
            Some(firer),
            Some(target),
            Position::new(1500, 1000, 0),
        ))
        .unwrap();

    run(&mut engine, 40);
    assert_eq!(engine.projectile_count(), 0);
    // Direct 10, then 50/s from 1200 ms to 3100 ms.
    assert_eq!(body_of(&engine, target), Some(1000 - 10 - 95));
    assert_eq!(body_of(&engine, friendly), Some(100));
}

#[test]
fn test_fire_burns_the_front_with_the_weapon_class() {
    let incendiary = WeaponStats {
        subclass: WeaponSubClass::Flame,
        damage: 10,
        incen_radius: 128,
        incen_time: 2000,
        incen_damage: 50,
        ..cannon("incendiary shell")
    };
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![incendiary]);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    // Proof against the sides and the underside, bare at the front.
    let mut armour = Armour::uniform(500, 500);
    armour.values[HitSide::Front.index()][WeaponClass::Kinetic.index()] = 0;
    let target = engine.spawn_unit(UnitSpec {
        player: 1,
        position: Position::new(1500, 1000, 0),
        body: 1000,
        armour,
        ..Default::default()
    });
    engine
        .spawn(&order(
            ids[0],
            0,
            Some(firer),
            Some(target),
            Position::new(1500, 1000, 0),
        ))
        .unwrap();

    run(&mut engine, 40);
    // The direct hit lands on a plated flank for one point; the fire
    // burns the bare front for its full 95.
    assert_eq!(body_of(&engine, target), Some(1000 - 1 - 95));
}

#[test]
fn test_shell_hits_the_roof_but_splash_hits_the_flank() {
    let shell = WeaponStats {
        subclass: WeaponSubClass::Howitzer,
        movement: MovementModel::Indirect,
        radius: 256,
        radius_damage: 20,
        radius_life: 300,
        ..cannon("shell")
    };
    let (mut bf, ids) = battlefield_with(vec![shell.clone()]);
    let roof = plated(HitSide::Top, WeaponClass::Kinetic, 500);
    let struck = world_setup::spawn_unit(
        &mut bf.world,
        &mut bf.next_spawn_order,
        UnitSpec {
            player: 1,
            position: Position::new(1500, 1000, 0),
            armour: roof,
            ..Default::default()
        },
    );
    let nearby = world_setup::spawn_unit(
        &mut bf.world,
        &mut bf.next_spawn_order,
        UnitSpec {
            player: 1,
            position: Position::new(1500, 1100, 0),
            armour: roof,
            ..Default::default()
        },
    );

    let mut proj = bare_projectile(0, None, Some(struck));
    proj.weapon = ids[0];
    proj.path = FlightPath::Ballistic {
        range: 1000,
        v_xy: 450,
        v_z: 220,
    };
    proj.start = Position::new(500, 1000, 0);
    proj.dest = Position::new(1500, 1000, 0);
    proj.pos = Position::new(1500, 1000, IMPACT_HEIGHT_ABOVE_GROUND);

    assert_eq!(direct_hit_for(&bf, &proj, &shell, struck, 40).side, HitSide::Top);
    assert_ne!(hit_for(&bf, &proj, &shell, nearby, 20).side, HitSide::Top);

    impact::run(&mut bf, ProjectileId::new(0, 0), &mut proj);
    assert_eq!(body_in(&bf.world, struck), 99);
    assert_eq!(body_in(&bf.world, nearby), 80);
}

#[test]
fn test_footprint_splash_only_outside_the_blast_box() {
    let shell = WeaponStats {
        radius: 128,
        radius_damage: 20,
        radius_life: 300,
        ..cannon("shell")
    };
    let (mut bf, ids) = battlefield_with(vec![shell]);
    let structure_at = |bf: &mut Battlefield, x: i32, y: i32, footprint: (i32, i32)| {
        world_setup::spawn_structure(
            &mut bf.world,
            &mut bf.next_spawn_order,
            StructureSpec {
                player: 1,
                position: Position::new(x, y, 0),
                footprint,
                ..Default::default()
            },
        )
    };
    // Centre inside the blast circle.
    let close = structure_at(&mut bf, 1550, 1000, (1, 1));
    // Inside the box, outside the circle, over the impact point.
    let cornered = structure_at(&mut bf, 1600, 1100, (3, 3));
    // Outside the box, over the impact point.
    let sprawling = structure_at(&mut bf, 1700, 1000, (4, 4));

    let mut proj = bare_projectile(0, None, None);
    proj.weapon = ids[0];
    proj.start = Position::new(500, 1000, 0);
    proj.dest = Position::new(1500, 1000, 0);
    proj.pos = Position::new(1500, 1000, 0);

    impact::run(&mut bf, ProjectileId::new(0, 0), &mut proj);
    assert_eq!(body_in(&bf.world, close), 480);
    assert_eq!(body_in(&bf.world, cornered), 500);
    assert_eq!(body_in(&bf.world, sprawling), 500 - NOMINAL_DAMAGE);
}

#[test]
fn test_kill_credits_firer() {
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![cannon("cannon")]);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    let target = engine.spawn_unit(UnitSpec {
        player: 1,
        position: Position::new(1500, 1000, 0),
        body: 40,
        ..Default::default()
    });
    engine
        .spawn(&order(
            ids[0],
            0,
            Some(firer),
            Some(target),
            Position::new(1500, 1000, 0),
        ))
        .unwrap();

    let reports = run(&mut engine, 11);
    let kill = reports
        .iter()
        .flat_map(|r| &r.combat)
        .find_map(|e| match e {
            CombatEvent::Kill {
                attacker,
                firer,
                victim,
                victim_kind,
            } => Some((*attacker, *firer, *victim, *victim_kind)),
            _ => None,
        })
        .expect("no kill reported");
    assert_eq!(
        kill,
        (0, Some(ObjectId::from(firer)), ObjectId::from(target), ObjectKind::Unit)
    );
    assert!(!engine.world().contains(target));

    match &*engine.world().get::<&TargetBody>(firer).unwrap() {
        TargetBody::Unit(unit) => assert_eq!(unit.experience, EXPERIENCE_PER_KILL),
        _ => unreachable!(),
    };
}

#[test]
fn test_electronic_round_captures() {
    let jammer = WeaponStats {
        subclass: WeaponSubClass::Electronic,
        damage: 60,
        ..cannon("jammer")
    };
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![jammer]);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    let target = engine.spawn_unit(UnitSpec {
        player: 1,
        position: Position::new(1500, 1000, 0),
        base_resistance: 50,
        ..Default::default()
    });
    engine
        .spawn(&order(
            ids[0],
            0,
            Some(firer),
            Some(target),
            Position::new(1500, 1000, 0),
        ))
        .unwrap();

    let reports = run(&mut engine, 12);
    assert_eq!(engine.world().get::<&Owner>(target).unwrap().player, 0);
    assert_eq!(body_of(&engine, target), Some(100));
    assert!(reports.iter().flat_map(|r| &r.combat).any(|e| matches!(
        e,
        CombatEvent::Captured { from: 1, to: 0, .. }
    )));
    assert_eq!(damage_events(&reports), 0);
}

#[test]
fn test_captured_structure_stays_with_first_jammer() {
    let jammer = WeaponStats {
        subclass: WeaponSubClass::Electronic,
        damage: 60,
        ..cannon("jammer")
    };
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![jammer]);
    let tower = engine.spawn_structure(StructureSpec {
        player: 1,
        position: Position::new(1500, 1000, 0),
        resistance: Some(50),
        ..Default::default()
    });
    let first = unit_at(&mut engine, 0, 500, 1000);
    let rival = unit_at(&mut engine, 2, 1500, 0);
    let point = Position::new(1500, 1000, 0);

    engine
        .spawn(&order(ids[0], 0, Some(first), Some(tower), point))
        .unwrap();
    let reports = run(&mut engine, 15);
    assert_eq!(engine.world().get::<&Owner>(tower).unwrap().player, 0);
    assert!(reports.iter().flat_map(|r| &r.combat).any(|e| matches!(
        e,
        CombatEvent::Captured { from: 1, to: 0, .. }
    )));

    engine
        .spawn(&order(ids[0], 2, Some(rival), Some(tower), point))
        .unwrap();
    let reports = run(&mut engine, 15);
    assert_eq!(engine.world().get::<&Owner>(tower).unwrap().player, 0);
    assert!(!reports
        .iter()
        .flat_map(|r| &r.combat)
        .any(|e| matches!(e, CombatEvent::Captured { .. })));
    assert_eq!(body_of(&engine, tower), Some(500));
}

// ---- Alliances ----

fn shoot_past_bystander(allied: bool) -> (Option<u32>, Option<u32>) {
    let (mut engine, ids) = engine_with(SimConfig::default(), vec![cannon("cannon")]);
    engine.set_alliance(0, 1, allied);
    let firer = unit_at(&mut engine, 0, 500, 1000);
    let bystander = unit_at(&mut engine, 1, 1000, 1000);
    let enemy = unit_at(&mut engine, 2, 1500, 1000);
    engine
        .spawn(&order(
            ids[0],
            0,
            Some(firer),
            Some(enemy),
            Position::new(1500, 1000, 0),
        ))
        .unwrap();
    run(&mut engine, 15);
    (body_of(&engine, bystander), body_of(&engine, enemy))
}

#[test]
fn test_rounds_pass_through_allies() {
    assert_eq!(shoot_past_bystander(true), (Some(100), Some(60)));
    assert_eq!(shoot_past_bystander(false), (Some(60), Some(100)));
}

// ---- Determinism ----

fn barrage(seed: u64) -> Vec<String> {
    let mortar = WeaponStats {
        subclass: WeaponSubClass::Mortar,
        movement: MovementModel::Indirect,
        flight_speed: 800,
        radius: 256,
        radius_damage: 15,
        radius_hit: 50,
        radius_life: 300,
        ..cannon("mortar")
    };
    let config = SimConfig {
        seed,
        gravity: 200,
        ..Default::default()
    };
    let (mut engine, ids) = engine_with(config, vec![mortar]);
    let firer = unit_at(&mut engine, 0, 400, 2000);
    for i in 0..6 {
        unit_at(&mut engine, 1, 2000 + i * 40, 2000 + (i % 3) * 60);
    }
    for i in 0..4 {
        engine.queue_command(CombatCommand::Fire(order(
            ids[0],
            0,
            Some(firer),
            None,
            Position::new(2050 + i * 30, 2050, 0),
        )));
    }
    run(&mut engine, 80)
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect()
}

#[test]
fn test_determinism_same_seed() {
    assert_eq!(barrage(12345), barrage(12345));
}
