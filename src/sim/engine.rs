//! Simulation engine: turns inputs, weather, and draws into a result snapshot.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Timelike;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::devices::{Battery, Device, DeviceContext, Homes, Hospital, School, SolarPlant};
use crate::weather::{self, Location, WeatherProvider, WeatherSnapshot};

use super::advisor::{self, Alert, Assessment};
use super::allocation::{ClassDemand, allocate};
use super::types::{Distribution, Draws, SimulationInput, SimulationResult, round2};

/// Computes one microgrid snapshot.
///
/// Pure: the weather and the random draws are supplied by the caller.
///
/// # Arguments
///
/// * `input` - Time of day, home count, battery capacity, weather mode
/// * `weather` - Resolved cloud cover and daylight bounds
/// * `draws` - Per-home draw and battery level
/// * `panel_capacity_kw` - Clear-sky solar capacity
pub fn simulate(
    input: &SimulationInput,
    weather: &WeatherSnapshot,
    draws: Draws,
    panel_capacity_kw: f64,
) -> SimulationResult {
    let ctx = DeviceContext::from_time(input.now);

    let solar = SolarPlant::new(panel_capacity_kw, weather);
    let battery = Battery::new(input.battery_capacity_kwh, draws.battery_level_percent);
    let homes = Homes::new(input.homes, draws.per_home_kw);

    let solar_power_kw = solar.power_kw(&ctx);
    let battery_support_kw = battery.power_kw(&ctx);
    let total_supply_kw = solar_power_kw + battery_support_kw;

    let demand = ClassDemand {
        hospital_kw: Hospital.power_kw(&ctx),
        school_kw: School.power_kw(&ctx),
        homes_kw: homes.power_kw(&ctx),
    };
    let total_demand_kw = demand.total_kw();

    for device in [&solar as &dyn Device, &battery, &Hospital, &School, &homes] {
        debug!(
            device = device.device_type(),
            power_kw = device.power_kw(&ctx),
            "device reading"
        );
    }

    let allocation = allocate(total_supply_kw, &demand);

    let suggestions = advisor::suggestions(&Assessment {
        is_daylight: solar.is_daylight(ctx.decimal_hour),
        solar_power_kw,
        cloud_cover_percent: weather.cloud_cover_percent,
        total_supply_kw,
        total_demand_kw,
        battery_is_low: battery.is_low(),
    });

    SimulationResult {
        current_time: input.now.format("%H:%M:%S").to_string(),
        hour: ctx.hour,
        weather: input.weather.to_string(),
        cloud_cover_percent: weather.cloud_cover_percent,
        sunrise_time: weather.sunrise_time.clone(),
        sunset_time: weather.sunset_time.clone(),
        homes: input.homes,
        battery_capacity_kwh: round2(input.battery_capacity_kwh),
        solar_power_kw: round2(solar_power_kw),
        battery_level_percent: draws.battery_level_percent,
        battery_support_kw: round2(battery_support_kw),
        total_demand_kw: round2(total_demand_kw),
        total_supply_kw: round2(total_supply_kw),
        distribution: Distribution {
            hospital_kw: round2(allocation.hospital_kw),
            school_kw: round2(allocation.school_kw),
            homes_kw: round2(allocation.homes_kw),
        },
        alert: Alert::from_balance(total_supply_kw, total_demand_kw),
        suggestions,
    }
}

/// Runs simulations end to end: weather resolution, sampling, and [`simulate`].
///
/// Owns the weather provider and the random source. The random source sits
/// behind a mutex that is never held across an `.await`.
pub struct Simulator {
    provider: Arc<dyn WeatherProvider>,
    rng: Mutex<StdRng>,
    panel_capacity_kw: f64,
    site: Location,
}

impl Simulator {
    /// Creates a simulator.
    ///
    /// # Arguments
    ///
    /// * `provider` - Live weather source for the `auto` mode
    /// * `panel_capacity_kw` - Clear-sky solar capacity
    /// * `site` - Location used when an input carries none
    /// * `seed` - Pins the random draws; `None` seeds from the OS
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        panel_capacity_kw: f64,
        site: Location,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            provider,
            rng: Mutex::new(rng),
            panel_capacity_kw,
            site,
        }
    }

    /// Resolves the weather, samples the draws, and simulates.
    ///
    /// Weather provider failures degrade to fallback values and never fail
    /// the simulation.
    pub async fn run(&self, input: &SimulationInput) -> SimulationResult {
        let location = input.location.unwrap_or(self.site);
        let resolution = weather::resolve(&input.weather, location, self.provider.as_ref()).await;
        let draws = self.sample(input.now.hour());

        let result = simulate(input, resolution.snapshot(), draws, self.panel_capacity_kw);

        info!(
            weather = %result.weather,
            fallback = resolution.is_fallback(),
            homes = result.homes,
            supply_kw = result.total_supply_kw,
            demand_kw = result.total_demand_kw,
            alert = ?result.alert,
            "simulated"
        );
        result
    }

    fn sample(&self, hour: u32) -> Draws {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Draws::sample(&mut *rng, hour)
    }
}
