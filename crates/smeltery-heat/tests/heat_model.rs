//! Tests of the combined burner / boost / controller loop, driven the way a
//! fuel-fired device drives it.

use std::collections::VecDeque;

use proptest::prelude::*;
use smeltery_heat::heat::target_device_temperature;
use smeltery_heat::{Boost, FuelBurner, FuelCharge, HeatEvent, TemperatureController};

/// One device tick: burn, decay air, adjust temperature.
fn run_tick(
    burner: &mut FuelBurner,
    fuel: &mut VecDeque<FuelCharge>,
    boost: &mut Boost,
    controller: &mut TemperatureController,
    raining: bool,
) -> Option<HeatEvent> {
    let rate = if boost.is_active() || raining { 2 } else { 1 };
    let event = burner.tick(rate, fuel);
    boost.decay();
    let target = target_device_temperature(burner.burn_temperature(), boost.air_ticks(), raining);
    controller.tick(target, boost.is_active());
    event
}

#[test]
fn fuel_exhaustion_cools_to_zero_and_stays() {
    let mut fuel: VecDeque<FuelCharge> = VecDeque::from(vec![FuelCharge::new(30, 200.0)]);
    let mut burner = FuelBurner::new();
    let mut boost = Boost::default();
    let mut controller = TemperatureController::new(5.0, 5.0, 1600.0);

    burner.ignite(&mut fuel);
    let mut events = Vec::new();
    for _ in 0..200 {
        if let Some(e) = run_tick(&mut burner, &mut fuel, &mut boost, &mut controller, false) {
            events.push(e);
        }
        assert!(controller.current() >= 0.0);
    }

    assert_eq!(events, vec![HeatEvent::Extinguished]);
    assert!(!burner.is_lit());
    assert_eq!(controller.current(), 0.0);
}

#[test]
fn boosted_forge_runs_hotter_and_burns_faster() {
    let mut plain_fuel = VecDeque::from(vec![FuelCharge::new(1000, 1000.0)]);
    let mut plain_burner = FuelBurner::new();
    let mut plain_boost = Boost::default();
    let mut plain = TemperatureController::new(1.0, 1.0, 1600.0);
    plain_burner.ignite(&mut plain_fuel);

    let mut fuel = VecDeque::from(vec![FuelCharge::new(1000, 1000.0)]);
    let mut burner = FuelBurner::new();
    let mut boost = Boost::default();
    let mut boosted = TemperatureController::new(1.0, 1.0, 1600.0);
    burner.ignite(&mut fuel);

    for _ in 0..100 {
        boost.pump(10);
        run_tick(&mut burner, &mut fuel, &mut boost, &mut boosted, false);
        run_tick(&mut plain_burner, &mut plain_fuel, &mut plain_boost, &mut plain, false);
    }

    assert!(boosted.current() > plain.current());
    assert_eq!(plain.current(), 100.0);
    assert_eq!(boosted.current(), 200.0);
    assert_eq!(plain_burner.remaining_ticks(), 900);
    assert_eq!(burner.remaining_ticks(), 800);
}

#[test]
fn rain_burns_faster_and_lowers_target() {
    let mut fuel = VecDeque::from(vec![FuelCharge::new(100, 350.0)]);
    let mut burner = FuelBurner::new();
    let mut boost = Boost::default();
    let mut controller = TemperatureController::new(10.0, 10.0, 1600.0);
    burner.ignite(&mut fuel);

    for _ in 0..20 {
        run_tick(&mut burner, &mut fuel, &mut boost, &mut controller, true);
    }
    assert_eq!(burner.remaining_ticks(), 60);
    // 350 - 300 rain penalty.
    assert_eq!(controller.current(), 50.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever the fuel queue and pumping pattern, the temperature stays in
    /// range and the burner goes out only once its queue is empty.
    #[test]
    fn temperature_stays_in_range(
        charges in proptest::collection::vec((1u64..200, 100.0..1500.0f64), 0..6),
        pumps in proptest::collection::vec(0u32..40, 1..400),
        raining in any::<bool>(),
        ceiling in 200.0..1600.0f64,
    ) {
        let mut fuel: VecDeque<FuelCharge> =
            charges.iter().map(|&(t, temp)| FuelCharge::new(t, temp)).collect();
        let mut burner = FuelBurner::new();
        let mut boost = Boost::default();
        let mut controller = TemperatureController::new(3.0, 2.0, ceiling);
        burner.ignite(&mut fuel);

        for &pump in &pumps {
            boost.pump(pump);
            let event = run_tick(&mut burner, &mut fuel, &mut boost, &mut controller, raining);
            prop_assert!(controller.current() >= 0.0);
            prop_assert!(controller.current() <= ceiling);
            if event == Some(HeatEvent::Extinguished) {
                prop_assert!(fuel.is_empty());
            }
        }
    }
}
