//! Assembly world: dense parallel tables for every entity archetype
//!
//! Structure-of-arrays layout throughout; an id is an index into its
//! archetype's tables. The parent/child graph (chassis -> turret/track ->
//! slot -> filler) lives in fixed-capacity child lists and back-references,
//! never pointers. A single handle map resolves physics bodies back to the
//! owning entity for contact processing.

use ahash::AHashMap;
use glam::Vec2;

use crate::assembly::slots::{ChildList, SlotSpec};
use crate::core::types::{
    BulletId, EngineClass, FillerId, GunId, PartKind, SlotId, Team, TrackId, TrackSide, TurretId,
    VehicleClass, VehicleId, WheelId,
};
use crate::physics::binding::JointBinding;
use crate::physics::host::BodyHandle;

/// Which entity a physics body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyOwner {
    Chassis(VehicleId),
    Turret(TurretId),
    Track(TrackId),
    Wheel(WheelId),
    Filler(FillerId),
    Bullet(BulletId),
}

/// Which body a slot is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotParent {
    Chassis(VehicleId),
    Turret(TurretId),
    Track(TrackId),
}

/// Structure of Arrays for vehicles
pub struct VehicleArchetype {
    pub classes: Vec<VehicleClass>,
    pub engines: Vec<EngineClass>,
    pub teams: Vec<Team>,
    pub bodies: Vec<BodyHandle>,
    pub turrets: Vec<Option<TurretId>>,
    pub slot_children: Vec<ChildList>,
    /// Filled chassis+turret slot count recorded at spawn; health divides
    /// by this, so it never changes afterwards
    pub initial_parts: Vec<u32>,
    pub alive: Vec<bool>,
}

impl VehicleArchetype {
    fn new() -> Self {
        Self {
            classes: Vec::new(),
            engines: Vec::new(),
            teams: Vec::new(),
            bodies: Vec::new(),
            turrets: Vec::new(),
            slot_children: Vec::new(),
            initial_parts: Vec::new(),
            alive: Vec::new(),
        }
    }

    pub fn spawn(
        &mut self,
        class: VehicleClass,
        engine: EngineClass,
        team: Team,
        body: BodyHandle,
        max_children: usize,
    ) -> VehicleId {
        let id = VehicleId(self.classes.len() as u32);
        self.classes.push(class);
        self.engines.push(engine);
        self.teams.push(team);
        self.bodies.push(body);
        self.turrets.push(None);
        self.slot_children.push(ChildList::new(max_children));
        self.initial_parts.push(0);
        self.alive.push(true);
        id
    }

    pub fn count(&self) -> usize {
        self.classes.len()
    }

    pub fn iter_live(&self) -> impl Iterator<Item = VehicleId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(i, _)| VehicleId(i as u32))
    }
}

/// Structure of Arrays for turrets
pub struct TurretArchetype {
    pub vehicles: Vec<VehicleId>,
    pub bodies: Vec<BodyHandle>,
    pub joints: Vec<JointBinding>,
    pub guns: Vec<Option<GunId>>,
    pub slot_children: Vec<ChildList>,
    /// Commanded rotation direction in {-1, 0, +1}, written by input/AI
    pub commanded: Vec<f32>,
    /// Shoot intent, written by input/AI, consumed by the gun system
    pub shoot: Vec<bool>,
    /// Motor target computed this tick, not yet pushed to the host
    pub pending_target: Vec<Option<f32>>,
    /// Motor target last pushed to the host
    pub applied_target: Vec<Option<f32>>,
}

impl TurretArchetype {
    fn new() -> Self {
        Self {
            vehicles: Vec::new(),
            bodies: Vec::new(),
            joints: Vec::new(),
            guns: Vec::new(),
            slot_children: Vec::new(),
            commanded: Vec::new(),
            shoot: Vec::new(),
            pending_target: Vec::new(),
            applied_target: Vec::new(),
        }
    }

    pub fn spawn(
        &mut self,
        vehicle: VehicleId,
        body: BodyHandle,
        joint: JointBinding,
        max_children: usize,
    ) -> TurretId {
        let id = TurretId(self.vehicles.len() as u32);
        self.vehicles.push(vehicle);
        self.bodies.push(body);
        self.joints.push(joint);
        self.guns.push(None);
        self.slot_children.push(ChildList::new(max_children));
        self.commanded.push(0.0);
        self.shoot.push(false);
        self.pending_target.push(None);
        self.applied_target.push(None);
        id
    }

    pub fn count(&self) -> usize {
        self.vehicles.len()
    }
}

/// Structure of Arrays for tracks
pub struct TrackArchetype {
    pub vehicles: Vec<VehicleId>,
    pub bodies: Vec<BodyHandle>,
    pub joints: Vec<JointBinding>,
    pub sides: Vec<TrackSide>,
    /// Nominal closed-loop length; anchors wrap at half of this
    pub lengths: Vec<f32>,
    pub slot_children: Vec<ChildList>,
}

impl TrackArchetype {
    fn new() -> Self {
        Self {
            vehicles: Vec::new(),
            bodies: Vec::new(),
            joints: Vec::new(),
            sides: Vec::new(),
            lengths: Vec::new(),
            slot_children: Vec::new(),
        }
    }

    pub fn spawn(
        &mut self,
        vehicle: VehicleId,
        body: BodyHandle,
        joint: JointBinding,
        side: TrackSide,
        length: f32,
        max_children: usize,
    ) -> TrackId {
        let id = TrackId(self.vehicles.len() as u32);
        self.vehicles.push(vehicle);
        self.bodies.push(body);
        self.joints.push(joint);
        self.sides.push(side);
        self.lengths.push(length);
        self.slot_children.push(ChildList::new(max_children));
        id
    }

    pub fn count(&self) -> usize {
        self.vehicles.len()
    }
}

/// Structure of Arrays for wheels
pub struct WheelArchetype {
    pub vehicles: Vec<VehicleId>,
    pub bodies: Vec<BodyHandle>,
    pub joints: Vec<JointBinding>,
    pub steerable: Vec<bool>,
    pub driven: Vec<bool>,
    /// Commanded steer direction in {-1, 0, +1}; only steerable wheels read it
    pub commanded: Vec<f32>,
    pub pending_target: Vec<Option<f32>>,
    pub applied_target: Vec<Option<f32>>,
}

impl WheelArchetype {
    fn new() -> Self {
        Self {
            vehicles: Vec::new(),
            bodies: Vec::new(),
            joints: Vec::new(),
            steerable: Vec::new(),
            driven: Vec::new(),
            commanded: Vec::new(),
            pending_target: Vec::new(),
            applied_target: Vec::new(),
        }
    }

    pub fn spawn(
        &mut self,
        vehicle: VehicleId,
        body: BodyHandle,
        joint: JointBinding,
        steerable: bool,
        driven: bool,
    ) -> WheelId {
        let id = WheelId(self.vehicles.len() as u32);
        self.vehicles.push(vehicle);
        self.bodies.push(body);
        self.joints.push(joint);
        self.steerable.push(steerable);
        self.driven.push(driven);
        self.commanded.push(0.0);
        self.pending_target.push(None);
        self.applied_target.push(None);
        id
    }

    pub fn count(&self) -> usize {
        self.vehicles.len()
    }
}

/// Structure of Arrays for slots
pub struct SlotArchetype {
    pub parents: Vec<SlotParent>,
    /// Anchor in the parent's local frame; x is longitudinal for track slots
    pub anchors: Vec<Vec2>,
    pub half_extents: Vec<Vec2>,
    pub kinds: Vec<PartKind>,
    /// At most one filler child; the slot is "filled" iff this is Some
    pub fillers: Vec<Option<FillerId>>,
}

impl SlotArchetype {
    fn new() -> Self {
        Self {
            parents: Vec::new(),
            anchors: Vec::new(),
            half_extents: Vec::new(),
            kinds: Vec::new(),
            fillers: Vec::new(),
        }
    }

    pub fn spawn(&mut self, parent: SlotParent, spec: &SlotSpec) -> SlotId {
        let id = SlotId(self.parents.len() as u32);
        self.parents.push(parent);
        self.anchors.push(spec.anchor());
        self.half_extents.push(spec.half_extents());
        self.kinds.push(spec.kind);
        self.fillers.push(None);
        id
    }

    pub fn count(&self) -> usize {
        self.parents.len()
    }

    pub fn is_filled(&self, slot: SlotId) -> bool {
        self.fillers[slot.0 as usize].is_some()
    }
}

/// Structure of Arrays for fillers (the parts occupying slots)
pub struct FillerArchetype {
    pub slots: Vec<SlotId>,
    pub bodies: Vec<BodyHandle>,
    pub teams: Vec<Option<Team>>,
    pub owners: Vec<Option<VehicleId>>,
    /// Damage capacity; exceeding it tears the part off
    pub toughness: Vec<f32>,
    pub damage: Vec<f32>,
    pub joints: Vec<JointBinding>,
    /// Set for track links so the animator can find them
    pub tracks: Vec<Option<TrackId>>,
    pub colors: Vec<[f32; 4]>,
    /// Team behind the most recent qualifying hit, for score attribution
    pub last_instigator: Vec<Option<Team>>,
}

impl FillerArchetype {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            bodies: Vec::new(),
            teams: Vec::new(),
            owners: Vec::new(),
            toughness: Vec::new(),
            damage: Vec::new(),
            joints: Vec::new(),
            tracks: Vec::new(),
            colors: Vec::new(),
            last_instigator: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        &mut self,
        slot: SlotId,
        body: BodyHandle,
        team: Option<Team>,
        owner: Option<VehicleId>,
        toughness: f32,
        joint: JointBinding,
        track: Option<TrackId>,
        color: [f32; 4],
    ) -> FillerId {
        let id = FillerId(self.slots.len() as u32);
        self.slots.push(slot);
        self.bodies.push(body);
        self.teams.push(team);
        self.owners.push(owner);
        self.toughness.push(toughness);
        self.damage.push(0.0);
        self.joints.push(joint);
        self.tracks.push(track);
        self.colors.push(color);
        self.last_instigator.push(None);
        id
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }
}

/// Structure of Arrays for guns
pub struct GunArchetype {
    pub turrets: Vec<TurretId>,
    pub calibers: Vec<f32>,
    /// Muzzle offset in the turret's local frame
    pub muzzles: Vec<Vec2>,
    /// Milliseconds since the last shot; starts past any cooldown
    pub since_fire_ms: Vec<f32>,
}

impl GunArchetype {
    fn new() -> Self {
        Self {
            turrets: Vec::new(),
            calibers: Vec::new(),
            muzzles: Vec::new(),
            since_fire_ms: Vec::new(),
        }
    }

    pub fn spawn(&mut self, turret: TurretId, caliber: f32, muzzle: Vec2) -> GunId {
        let id = GunId(self.turrets.len() as u32);
        self.turrets.push(turret);
        self.calibers.push(caliber);
        self.muzzles.push(muzzle);
        self.since_fire_ms.push(f32::MAX);
        id
    }
}

/// Structure of Arrays for bullets
pub struct BulletArchetype {
    pub bodies: Vec<BodyHandle>,
    pub teams: Vec<Team>,
    pub owners: Vec<VehicleId>,
    pub calibers: Vec<f32>,
    pub alive: Vec<bool>,
}

impl BulletArchetype {
    fn new() -> Self {
        Self {
            bodies: Vec::new(),
            teams: Vec::new(),
            owners: Vec::new(),
            calibers: Vec::new(),
            alive: Vec::new(),
        }
    }

    pub fn spawn(
        &mut self,
        body: BodyHandle,
        team: Team,
        owner: VehicleId,
        caliber: f32,
    ) -> BulletId {
        let id = BulletId(self.bodies.len() as u32);
        self.bodies.push(body);
        self.teams.push(team);
        self.owners.push(owner);
        self.calibers.push(caliber);
        self.alive.push(true);
        id
    }

    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|a| **a).count()
    }
}

/// Per-team running score, mutated only by the detachment pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreBoard {
    pub red: u32,
    pub blue: u32,
}

impl ScoreBoard {
    pub fn award(&mut self, team: Team, points: u32) {
        match team {
            Team::Red => self.red += points,
            Team::Blue => self.blue += points,
        }
    }

    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Red => self.red,
            Team::Blue => self.blue,
        }
    }
}

/// The assembly world holding every archetype table
pub struct AssemblyWorld {
    pub vehicles: VehicleArchetype,
    pub turrets: TurretArchetype,
    pub tracks: TrackArchetype,
    pub wheels: WheelArchetype,
    pub slots: SlotArchetype,
    pub fillers: FillerArchetype,
    pub guns: GunArchetype,
    pub bullets: BulletArchetype,
    pub body_owners: AHashMap<BodyHandle, BodyOwner>,
    pub score: ScoreBoard,
    /// Child-list capacity handed to every new parent
    pub max_children: usize,
}

impl AssemblyWorld {
    pub fn new(max_children: usize) -> Self {
        Self {
            vehicles: VehicleArchetype::new(),
            turrets: TurretArchetype::new(),
            tracks: TrackArchetype::new(),
            wheels: WheelArchetype::new(),
            slots: SlotArchetype::new(),
            fillers: FillerArchetype::new(),
            guns: GunArchetype::new(),
            bullets: BulletArchetype::new(),
            body_owners: AHashMap::new(),
            score: ScoreBoard::default(),
            max_children,
        }
    }

    /// The rigid body a slot parent is anchored to
    pub fn parent_body(&self, parent: SlotParent) -> BodyHandle {
        match parent {
            SlotParent::Chassis(v) => self.vehicles.bodies[v.0 as usize],
            SlotParent::Turret(t) => self.turrets.bodies[t.0 as usize],
            SlotParent::Track(t) => self.tracks.bodies[t.0 as usize],
        }
    }

    /// The vehicle a slot parent ultimately belongs to
    pub fn parent_vehicle(&self, parent: SlotParent) -> VehicleId {
        match parent {
            SlotParent::Chassis(v) => v,
            SlotParent::Turret(t) => self.turrets.vehicles[t.0 as usize],
            SlotParent::Track(t) => self.tracks.vehicles[t.0 as usize],
        }
    }

    /// The track behind a slot parent, if it is one
    pub fn parent_track(&self, parent: SlotParent) -> Option<TrackId> {
        match parent {
            SlotParent::Track(t) => Some(t),
            _ => None,
        }
    }

    pub fn child_list(&self, parent: SlotParent) -> &ChildList {
        match parent {
            SlotParent::Chassis(v) => &self.vehicles.slot_children[v.0 as usize],
            SlotParent::Turret(t) => &self.turrets.slot_children[t.0 as usize],
            SlotParent::Track(t) => &self.tracks.slot_children[t.0 as usize],
        }
    }

    pub fn child_list_mut(&mut self, parent: SlotParent) -> &mut ChildList {
        match parent {
            SlotParent::Chassis(v) => &mut self.vehicles.slot_children[v.0 as usize],
            SlotParent::Turret(t) => &mut self.turrets.slot_children[t.0 as usize],
            SlotParent::Track(t) => &mut self.tracks.slot_children[t.0 as usize],
        }
    }

    /// Filled slots across chassis and turret, the basis of derived health
    pub fn attached_part_count(&self, vehicle: VehicleId) -> u32 {
        let mut count = self.vehicles.slot_children[vehicle.0 as usize]
            .iter()
            .filter(|s| self.slots.is_filled(*s))
            .count() as u32;
        if let Some(turret) = self.vehicles.turrets[vehicle.0 as usize] {
            count += self.turrets.slot_children[turret.0 as usize]
                .iter()
                .filter(|s| self.slots.is_filled(*s))
                .count() as u32;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_vehicle_row() {
        let mut world = AssemblyWorld::new(8);
        let v = world.vehicles.spawn(
            VehicleClass::LightTank,
            EngineClass::Piston,
            Team::Red,
            BodyHandle(0),
            8,
        );
        assert_eq!(v, VehicleId(0));
        assert_eq!(world.vehicles.count(), 1);
        assert!(world.vehicles.alive[0]);
        assert_eq!(world.vehicles.initial_parts[0], 0);
    }

    #[test]
    fn test_scoreboard_awards_per_team() {
        let mut score = ScoreBoard::default();
        score.award(Team::Red, 100);
        score.award(Team::Red, 50);
        score.award(Team::Blue, 25);
        assert_eq!(score.get(Team::Red), 150);
        assert_eq!(score.get(Team::Blue), 25);
    }

    #[test]
    fn test_attached_count_empty_vehicle_is_zero() {
        let mut world = AssemblyWorld::new(8);
        let v = world.vehicles.spawn(
            VehicleClass::MeleeCar,
            EngineClass::Electric,
            Team::Blue,
            BodyHandle(0),
            8,
        );
        assert_eq!(world.attached_part_count(v), 0);
    }
}
