//! Job allocation across cities for a field engineer

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::CityDemand;
use crate::types::City;

/// Visual emphasis for a job card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Band for a position in the ranked list.
    ///
    /// Position 0 is always the engineer's own city. The next two entries are
    /// medium whatever the size of the city set.
    pub fn for_position(position: usize) -> Self {
        match position {
            0 => Priority::High,
            1 | 2 => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

/// Distance label shown on a job card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistanceMarker {
    CurrentLocation,
    Away { km: u32 },
}

impl std::fmt::Display for DistanceMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceMarker::CurrentLocation => write!(f, "Your current location"),
            DistanceMarker::Away { km } => write!(f, "{} km away", km),
        }
    }
}

/// Source of the distance shown for cities other than the engineer's own
pub trait DistanceEstimator: Send + Sync {
    fn estimate_km(&self, from: City, to: City) -> u32;
}

impl<T: DistanceEstimator + ?Sized> DistanceEstimator for Box<T> {
    fn estimate_km(&self, from: City, to: City) -> u32 {
        (**self).estimate_km(from, to)
    }
}

/// Same distance for every city
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDistance(pub u32);

impl FixedDistance {
    pub const DEFAULT_KM: u32 = 35;
}

impl Default for FixedDistance {
    fn default() -> Self {
        Self(Self::DEFAULT_KM)
    }
}

impl DistanceEstimator for FixedDistance {
    fn estimate_km(&self, _from: City, _to: City) -> u32 {
        self.0
    }
}

/// Great-circle distance between city centres
#[derive(Debug, Clone, Copy, Default)]
pub struct GeodesicDistance;

impl GeodesicDistance {
    const EARTH_RADIUS_KM: f64 = 6371.0;
}

impl DistanceEstimator for GeodesicDistance {
    fn estimate_km(&self, from: City, to: City) -> u32 {
        let (a, b) = (from.location(), to.location());
        let (lat1, lat2) = (a.latitude.to_radians(), b.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (b.longitude - a.longitude).to_radians();

        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let km = 2.0 * Self::EARTH_RADIUS_KM * h.sqrt().asin();
        km.round() as u32
    }
}

/// One prioritized entry in the engineer's job list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobEntry {
    pub city: City,
    pub demand: u32,
    pub priority: Priority,
    pub is_current_location: bool,
    pub distance: DistanceMarker,
}

/// Ranks cities for an engineer: own city first, then by pending demand
#[derive(Debug, Clone)]
pub struct AllocationRanker<D = FixedDistance> {
    cities: Vec<City>,
    distance: D,
}

impl AllocationRanker<FixedDistance> {
    /// Ranker over every enumerated city with a fixed distance label
    pub fn new() -> Self {
        Self {
            cities: City::ALL.to_vec(),
            distance: FixedDistance::default(),
        }
    }
}

impl Default for AllocationRanker<FixedDistance> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DistanceEstimator> AllocationRanker<D> {
    /// Restrict ranking to a subset of cities, in the order given.
    /// Repeated cities are kept once.
    pub fn with_cities(mut self, cities: impl IntoIterator<Item = City>) -> Self {
        let mut unique = Vec::new();
        for city in cities {
            if !unique.contains(&city) {
                unique.push(city);
            }
        }
        self.cities = unique;
        self
    }

    pub fn with_distance<E: DistanceEstimator>(self, distance: E) -> AllocationRanker<E> {
        AllocationRanker {
            cities: self.cities,
            distance,
        }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Order the city set for an engineer at `current_location`.
    ///
    /// The current location always comes first and is the only high-priority
    /// entry, even when another ordering by demand would place it lower. The
    /// remaining cities follow by descending demand; ties keep the city-set
    /// order.
    pub fn rank(&self, demand: &CityDemand, current_location: &str) -> CoreResult<Vec<JobEntry>> {
        let location: City = current_location.parse()?;
        if !self.cities.contains(&location) {
            return Err(CoreError::InvalidCity(current_location.to_string()));
        }

        let missing = demand.missing(&self.cities);
        if !missing.is_empty() {
            return Err(CoreError::IncompleteDemand { missing });
        }

        let own_demand = demand
            .get(location)
            .ok_or_else(|| CoreError::IncompleteDemand {
                missing: vec![location],
            })?;

        let mut others: Vec<(City, u32)> = self
            .cities
            .iter()
            .copied()
            .filter(|city| *city != location)
            .filter_map(|city| demand.get(city).map(|pending| (city, pending)))
            .collect();
        // stable: equal demand keeps city-set order
        others.sort_by(|a, b| b.1.cmp(&a.1));

        let jobs = std::iter::once((location, own_demand))
            .chain(others)
            .enumerate()
            .map(|(position, (city, pending))| {
                let is_current_location = city == location;
                JobEntry {
                    city,
                    demand: pending,
                    priority: Priority::for_position(position),
                    is_current_location,
                    distance: if is_current_location {
                        DistanceMarker::CurrentLocation
                    } else {
                        DistanceMarker::Away {
                            km: self.distance.estimate_km(location, city),
                        }
                    },
                }
            })
            .collect();

        Ok(jobs)
    }
}

/// Rank every enumerated city with the default distance label
pub fn rank(demand: &CityDemand, current_location: &str) -> CoreResult<Vec<JobEntry>> {
    AllocationRanker::new().rank(demand, current_location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_demand(counts: [u32; 6]) -> CityDemand {
        City::ALL.iter().copied().zip(counts).collect()
    }

    fn order(jobs: &[JobEntry]) -> Vec<(City, Priority)> {
        jobs.iter().map(|job| (job.city, job.priority)).collect()
    }

    #[test]
    fn test_three_city_scenario() {
        let demand: CityDemand = [(City::Sydney, 10), (City::Melbourne, 50), (City::Brisbane, 5)]
            .into_iter()
            .collect();
        let ranker =
            AllocationRanker::new().with_cities([City::Sydney, City::Melbourne, City::Brisbane]);

        let jobs = ranker.rank(&demand, "Brisbane").unwrap();
        assert_eq!(
            order(&jobs),
            vec![
                (City::Brisbane, Priority::High),
                (City::Melbourne, Priority::Medium),
                (City::Sydney, Priority::Medium),
            ]
        );
        assert!(jobs[0].is_current_location);
        assert_eq!(jobs[0].distance, DistanceMarker::CurrentLocation);
    }

    #[test]
    fn test_lowest_demand_location_still_first() {
        let demand = full_demand([1, 40, 30, 20, 10, 50]);
        let jobs = rank(&demand, "Sydney").unwrap();

        assert_eq!(
            order(&jobs),
            vec![
                (City::Sydney, Priority::High),
                (City::Canberra, Priority::Medium),
                (City::Melbourne, Priority::Medium),
                (City::Brisbane, Priority::Low),
                (City::Perth, Priority::Low),
                (City::Adelaide, Priority::Low),
            ]
        );
    }

    #[test]
    fn test_busy_location_does_not_take_medium_slot() {
        let demand = full_demand([100, 10, 90, 80, 5, 1]);
        let jobs = rank(&demand, "Sydney").unwrap();

        assert_eq!(jobs[0].city, City::Sydney);
        assert_eq!(jobs[1].city, City::Brisbane);
        assert_eq!(jobs[2].city, City::Perth);
        assert_eq!(jobs[2].priority, Priority::Medium);
        assert_eq!(jobs[3].priority, Priority::Low);
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        let demand = full_demand([7, 7, 7, 7, 7, 7]);
        let jobs = rank(&demand, "Perth").unwrap();
        let cities: Vec<_> = jobs.iter().map(|job| job.city).collect();
        assert_eq!(
            cities,
            vec![
                City::Perth,
                City::Sydney,
                City::Melbourne,
                City::Brisbane,
                City::Adelaide,
                City::Canberra,
            ]
        );
    }

    #[test]
    fn test_unknown_location() {
        let demand = full_demand([1, 2, 3, 4, 5, 6]);
        assert_eq!(
            rank(&demand, "Atlantis"),
            Err(CoreError::InvalidCity("Atlantis".to_string()))
        );
    }

    #[test]
    fn test_location_outside_ranker_cities() {
        let demand = full_demand([1, 2, 3, 4, 5, 6]);
        let ranker = AllocationRanker::new().with_cities([City::Sydney, City::Melbourne]);
        assert!(matches!(
            ranker.rank(&demand, "Perth"),
            Err(CoreError::InvalidCity(_))
        ));
    }

    #[test]
    fn test_missing_city_demand() {
        let demand: CityDemand = City::ALL
            .iter()
            .copied()
            .filter(|city| *city != City::Perth)
            .map(|city| (city, 3))
            .collect();

        assert_eq!(
            rank(&demand, "Sydney"),
            Err(CoreError::IncompleteDemand {
                missing: vec![City::Perth]
            })
        );
    }

    #[test]
    fn test_invalid_city_checked_before_demand() {
        assert!(matches!(
            rank(&CityDemand::new(), "Atlantis"),
            Err(CoreError::InvalidCity(_))
        ));
    }

    #[test]
    fn test_default_distance_is_fixed() {
        let demand = full_demand([1, 2, 3, 4, 5, 6]);
        let jobs = rank(&demand, "Adelaide").unwrap();
        for job in &jobs[1..] {
            assert_eq!(
                job.distance,
                DistanceMarker::Away {
                    km: FixedDistance::DEFAULT_KM
                }
            );
        }
    }

    #[test]
    fn test_injected_distance() {
        struct ByIndex;
        impl DistanceEstimator for ByIndex {
            fn estimate_km(&self, _from: City, to: City) -> u32 {
                to as u32 * 100
            }
        }

        let demand = full_demand([0, 0, 0, 0, 0, 9]);
        let jobs = AllocationRanker::new()
            .with_distance(ByIndex)
            .rank(&demand, "Sydney")
            .unwrap();
        assert_eq!(jobs[1].city, City::Canberra);
        assert_eq!(jobs[1].distance, DistanceMarker::Away { km: 500 });
    }

    #[test]
    fn test_geodesic_distance() {
        let km = GeodesicDistance.estimate_km(City::Sydney, City::Melbourne);
        assert!((700..=730).contains(&km), "got {}", km);
        assert_eq!(GeodesicDistance.estimate_km(City::Perth, City::Perth), 0);
        assert_eq!(
            GeodesicDistance.estimate_km(City::Brisbane, City::Adelaide),
            GeodesicDistance.estimate_km(City::Adelaide, City::Brisbane)
        );
    }

    #[test]
    fn test_boxed_estimator() {
        let boxed: Box<dyn DistanceEstimator> = Box::new(FixedDistance(12));
        assert_eq!(boxed.estimate_km(City::Sydney, City::Perth), 12);
    }

    #[test]
    fn test_job_entry_json() {
        let demand = full_demand([4, 3, 2, 1, 0, 0]);
        let jobs = rank(&demand, "Melbourne").unwrap();
        let json = serde_json::to_value(&jobs[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "city": "Melbourne",
                "demand": 3,
                "priority": "HIGH",
                "is_current_location": true,
                "distance": {"kind": "current_location"}
            })
        );
        assert_eq!(jobs[1].distance.to_string(), "35 km away");
    }
}
