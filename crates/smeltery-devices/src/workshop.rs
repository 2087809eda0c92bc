//! The workshop: a host that owns devices and the heat links between them.
//!
//! # Step order
//!
//! Each call to [`Workshop::step`] advances every device by one tick:
//!
//! 1. **Sources** -- heat sources (forges) burn fuel and update temperature.
//! 2. **Links** -- every warm source offers its temperature to its linked
//!    consumers.
//! 3. **Consumers** -- consumers (crucibles) move towards their new target.
//! 4. **Bookkeeping** -- the tick counter advances.
//!
//! Devices never reach into each other; all cross-device interaction happens
//! in phase 2.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use smeltery_core::Ticks;
use smeltery_core::snapshot::{self, RestoreError, SnapshotError, SnapshotHeader};
use smeltery_heat::{Environment, HeatEvent};

use crate::crucible::Crucible;
use crate::device::Device;
use crate::error::DeviceError;
use crate::forge::Forge;
use crate::id::DeviceId;

/// A directed heat link from a source to a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatLink {
    pub source: DeviceId,
    pub consumer: DeviceId,
}

/// A heat event tagged with the device and tick it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceEvent {
    pub device: DeviceId,
    pub event: HeatEvent,
    pub tick: Ticks,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workshop {
    devices: SlotMap<DeviceId, Device>,
    links: Vec<HeatLink>,
    tick: Ticks,
}

impl Workshop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> Ticks {
        self.tick
    }

    // -----------------------------------------------------------------------
    // Devices
    // -----------------------------------------------------------------------

    pub fn add_device(&mut self, device: impl Into<Device>) -> DeviceId {
        self.devices.insert(device.into())
    }

    /// Remove a device and every link touching it.
    pub fn remove_device(&mut self, id: DeviceId) -> Option<Device> {
        let removed = self.devices.remove(id)?;
        self.links
            .retain(|link| link.source != id && link.consumer != id);
        Some(removed)
    }

    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.devices.get(id)
    }

    pub fn device_mut(&mut self, id: DeviceId) -> Option<&mut Device> {
        self.devices.get_mut(id)
    }

    pub fn devices(&self) -> impl Iterator<Item = (DeviceId, &Device)> {
        self.devices.iter()
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    pub fn forge(&self, id: DeviceId) -> Result<&Forge, DeviceError> {
        self.devices
            .get(id)
            .ok_or(DeviceError::NotFound(id))?
            .as_forge()
            .ok_or(DeviceError::WrongKind(id, "forge"))
    }

    pub fn forge_mut(&mut self, id: DeviceId) -> Result<&mut Forge, DeviceError> {
        self.devices
            .get_mut(id)
            .ok_or(DeviceError::NotFound(id))?
            .as_forge_mut()
            .ok_or(DeviceError::WrongKind(id, "forge"))
    }

    pub fn crucible(&self, id: DeviceId) -> Result<&Crucible, DeviceError> {
        self.devices
            .get(id)
            .ok_or(DeviceError::NotFound(id))?
            .as_crucible()
            .ok_or(DeviceError::WrongKind(id, "crucible"))
    }

    pub fn crucible_mut(&mut self, id: DeviceId) -> Result<&mut Crucible, DeviceError> {
        self.devices
            .get_mut(id)
            .ok_or(DeviceError::NotFound(id))?
            .as_crucible_mut()
            .ok_or(DeviceError::WrongKind(id, "crucible"))
    }

    // -----------------------------------------------------------------------
    // Links
    // -----------------------------------------------------------------------

    /// Link a heat source to a consumer. Linking twice is a no-op.
    pub fn link(&mut self, source: DeviceId, consumer: DeviceId) -> Result<(), DeviceError> {
        let link = HeatLink { source, consumer };
        validate_link(&self.devices, &link)?;
        if !self.links.contains(&link) {
            debug!("linked {source:?} -> {consumer:?}");
            self.links.push(link);
        }
        Ok(())
    }

    /// Remove a link. Returns `true` if it existed.
    pub fn unlink(&mut self, source: DeviceId, consumer: DeviceId) -> bool {
        let before = self.links.len();
        self.links
            .retain(|link| !(link.source == source && link.consumer == consumer));
        self.links.len() != before
    }

    pub fn links(&self) -> &[HeatLink] {
        &self.links
    }

    // -----------------------------------------------------------------------
    // Step
    // -----------------------------------------------------------------------

    /// Advance every device by one tick. Returns the transitions that
    /// happened during the tick.
    pub fn step(&mut self, env: Environment) -> Vec<DeviceEvent> {
        let tick = self.tick;
        let mut events = Vec::new();

        // Phase 1: sources.
        for (id, device) in self.devices.iter_mut() {
            if device.is_heat_source() {
                push_events(&mut events, id, tick, device.tick(env));
            }
        }

        // Phase 2: heat transfer over links.
        for link in &self.links {
            let Some(temperature) = self.devices.get(link.source).map(Device::temperature) else {
                continue;
            };
            if temperature <= 0.0 {
                continue;
            }
            if let Some(consumer) = self
                .devices
                .get_mut(link.consumer)
                .and_then(|device| device.as_consumer_mut())
            {
                consumer.receive_heat(temperature);
            }
        }

        // Phase 3: consumers.
        for (id, device) in self.devices.iter_mut() {
            if !device.is_heat_source() {
                push_events(&mut events, id, tick, device.tick(env));
            }
        }

        // Phase 4: bookkeeping.
        self.tick += 1;
        events
    }

    /// Advance `n` ticks under the same weather, collecting all events.
    pub fn run(&mut self, n: Ticks, env: Environment) -> Vec<DeviceEvent> {
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(self.step(env));
        }
        events
    }

    /// Skip `ticks` at once: sources burn through their fuel, consumers cool
    /// with no heat supplied.
    pub fn catch_up(&mut self, ticks: Ticks) -> Vec<DeviceEvent> {
        let tick = self.tick;
        let mut events = Vec::new();
        for (id, device) in self.devices.iter_mut() {
            push_events(&mut events, id, tick, device.catch_up(ticks));
        }
        self.tick += ticks;
        events
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        snapshot::encode(self.tick, self)
    }

    /// Restore a workshop from [`snapshot`](Self::snapshot) output. Links that
    /// do not connect a live source to a live consumer reject the snapshot.
    pub fn restore(data: &[u8]) -> Result<Self, RestoreError> {
        let (header, workshop): (SnapshotHeader, Workshop) = snapshot::decode(data)?;
        for link in &workshop.links {
            if let Err(e) = validate_link(&workshop.devices, link) {
                warn!("rejecting workshop snapshot: {e}");
                return Err(RestoreError::Inconsistent(e.to_string()));
            }
        }
        if header.tick != workshop.tick {
            warn!(
                "rejecting workshop snapshot: header tick {} != state tick {}",
                header.tick, workshop.tick
            );
            return Err(RestoreError::Inconsistent(format!(
                "header tick {} does not match state tick {}",
                header.tick, workshop.tick
            )));
        }
        Ok(workshop)
    }
}

fn push_events(out: &mut Vec<DeviceEvent>, device: DeviceId, tick: Ticks, events: Vec<HeatEvent>) {
    out.extend(
        events
            .into_iter()
            .map(|event| DeviceEvent { device, event, tick }),
    );
}

fn validate_link(devices: &SlotMap<DeviceId, Device>, link: &HeatLink) -> Result<(), DeviceError> {
    if link.source == link.consumer {
        return Err(DeviceError::InvalidLink(
            "a device cannot heat itself".to_string(),
        ));
    }
    let source = devices
        .get(link.source)
        .ok_or(DeviceError::NotFound(link.source))?;
    let consumer = devices
        .get(link.consumer)
        .ok_or(DeviceError::NotFound(link.consumer))?;
    if !source.is_heat_source() {
        return Err(DeviceError::InvalidLink(format!(
            "{} is not a heat source",
            source.kind()
        )));
    }
    if consumer.is_heat_source() {
        return Err(DeviceError::InvalidLink(format!(
            "{} is not a heat consumer",
            consumer.kind()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CrucibleConfig, ForgeConfig};
    use smeltery_heat::FuelCharge;

    fn forge() -> Forge {
        let mut f = Forge::new(&ForgeConfig::default()).unwrap();
        f.add_fuel(FuelCharge::new(1800, 1350.0)).unwrap();
        f
    }

    fn crucible() -> Crucible {
        Crucible::new(&CrucibleConfig::default()).unwrap()
    }

    #[test]
    fn add_and_remove_devices() {
        let mut w = Workshop::new();
        let f = w.add_device(forge());
        let c = w.add_device(crucible());
        w.link(f, c).unwrap();
        assert_eq!(w.device_count(), 2);

        assert!(w.remove_device(f).is_some());
        assert!(w.links().is_empty());
        assert!(w.device(f).is_none());
        assert!(w.remove_device(f).is_none());
    }

    #[test]
    fn typed_access() {
        let mut w = Workshop::new();
        let f = w.add_device(forge());
        assert!(w.forge(f).is_ok());
        assert_eq!(w.crucible(f).unwrap_err(), DeviceError::WrongKind(f, "crucible"));
        w.remove_device(f);
        assert_eq!(w.forge_mut(f).unwrap_err(), DeviceError::NotFound(f));
    }

    #[test]
    fn link_validation() {
        let mut w = Workshop::new();
        let f = w.add_device(forge());
        let c = w.add_device(crucible());
        assert!(matches!(w.link(c, f), Err(DeviceError::InvalidLink(_))));
        assert!(matches!(w.link(f, f), Err(DeviceError::InvalidLink(_))));
        w.link(f, c).unwrap();
        w.link(f, c).unwrap();
        assert_eq!(w.links().len(), 1);
        assert!(w.unlink(f, c));
        assert!(!w.unlink(f, c));
    }

    #[test]
    fn linked_crucible_follows_forge() {
        let mut w = Workshop::new();
        let f = w.add_device(forge());
        let c = w.add_device(crucible());
        w.link(f, c).unwrap();
        w.forge_mut(f).unwrap().ignite();

        w.run(100, Environment::clear());
        assert_eq!(w.tick(), 100);
        assert_eq!(w.forge(f).unwrap().temperature(), 100.0);
        // Heat moves within the same tick, so both rise together.
        assert_eq!(w.device(c).unwrap().temperature(), 100.0);
        assert_eq!(w.crucible(c).unwrap().target_temperature(), 100.0);
    }

    #[test]
    fn unlinked_crucible_stays_cold() {
        let mut w = Workshop::new();
        let f = w.add_device(forge());
        let c = w.add_device(crucible());
        w.forge_mut(f).unwrap().ignite();
        w.run(50, Environment::clear());
        assert_eq!(w.device(c).unwrap().temperature(), 0.0);
    }

    #[test]
    fn events_are_tagged_with_device_and_tick() {
        let mut w = Workshop::new();
        let mut short = Forge::new(&ForgeConfig::default()).unwrap();
        short.add_fuel(FuelCharge::new(3, 800.0)).unwrap();
        let f = w.add_device(short);
        w.forge_mut(f).unwrap().ignite();

        let events = w.run(10, Environment::clear());
        assert_eq!(
            events[0],
            DeviceEvent {
                device: f,
                event: HeatEvent::Extinguished,
                tick: 2,
            }
        );
    }

    #[test]
    fn snapshot_round_trip() {
        let mut w = Workshop::new();
        let f = w.add_device(forge());
        let c = w.add_device(crucible());
        w.link(f, c).unwrap();
        w.forge_mut(f).unwrap().ignite();
        w.run(25, Environment::clear());

        let data = w.snapshot().unwrap();
        let mut restored = Workshop::restore(&data).unwrap();
        assert_eq!(restored.tick(), 25);
        assert_eq!(restored.device(f), w.device(f));
        assert_eq!(restored.device(c), w.device(c));

        // Both continue identically.
        w.run(10, Environment::clear());
        restored.run(10, Environment::clear());
        assert_eq!(restored.device(c), w.device(c));
    }

    #[test]
    fn catch_up_advances_tick() {
        let mut w = Workshop::new();
        let f = w.add_device(forge());
        w.forge_mut(f).unwrap().ignite();
        w.catch_up(500);
        assert_eq!(w.tick(), 500);
        assert_eq!(w.forge(f).unwrap().burner().remaining_ticks(), 1300);
    }
}
