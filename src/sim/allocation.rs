//! Priority allocation of the supply pool across load classes.

/// Demand of each load class for one instant (kW).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDemand {
    pub hospital_kw: f64,
    pub school_kw: f64,
    pub homes_kw: f64,
}

impl ClassDemand {
    /// Sum of all classes.
    pub fn total_kw(&self) -> f64 {
        self.hospital_kw + self.school_kw + self.homes_kw
    }
}

/// Power granted to each class, plus whatever the pool had left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Allocation {
    pub hospital_kw: f64,
    pub school_kw: f64,
    pub homes_kw: f64,
    /// Supply left after homes; not delivered anywhere.
    pub surplus_kw: f64,
}

/// Greedily serves hospital, then school, then homes from `supply_kw`.
///
/// Each class receives `min(demand, remaining)`, so a class is only served
/// once every higher-priority class is fully served. Inputs are not clamped:
/// a negative pool hands out negative grants, matching the raw arithmetic.
///
/// # Arguments
///
/// * `supply_kw` - Total supply pool (solar + battery support)
/// * `demand` - Per-class demand
pub fn allocate(supply_kw: f64, demand: &ClassDemand) -> Allocation {
    let mut remaining = supply_kw;

    let hospital_kw = demand.hospital_kw.min(remaining);
    remaining -= hospital_kw;

    let school_kw = demand.school_kw.min(remaining);
    remaining -= school_kw;

    let homes_kw = demand.homes_kw.min(remaining);
    remaining -= homes_kw;

    Allocation {
        hospital_kw,
        school_kw,
        homes_kw,
        surplus_kw: remaining,
    }
}
