//! Synthetic chefs, drivers and geography assigned to new orders.

use crate::model::{Chef, Driver, GeoPoint, OrderCast, OrderLocation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CHEFS: [(&str, &str); 5] = [
    ("Maria Rossi", "Handmade pasta"),
    ("Kenji Watanabe", "Ramen"),
    ("Amara Okafor", "West African stews"),
    ("Lucia Fernandez", "Tapas"),
    ("Priya Raman", "South Indian thali"),
];

const DRIVERS: [(&str, &str); 4] = [
    ("Sam Carter", "E-bike"),
    ("Lena Novak", "Scooter"),
    ("Diego Alvarez", "Hatchback"),
    ("Noor Haddad", "Bicycle"),
];

/// Kitchens the simulation hands out, around a single city centre.
const KITCHENS: [(f64, f64); 4] = [
    (40.7128, -74.0060),
    (40.7211, -73.9970),
    (40.7306, -74.0021),
    (40.7075, -74.0113),
];

/// Picks a cast for each new order. Seeded for reproducible runs.
pub struct Roster {
    rng: StdRng,
}

impl Roster {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn assign(&mut self) -> OrderCast {
        let (chef_name, specialty) = CHEFS[self.rng.gen_range(0..CHEFS.len())];
        let (driver_name, vehicle) = DRIVERS[self.rng.gen_range(0..DRIVERS.len())];
        let (lat, lng) = KITCHENS[self.rng.gen_range(0..KITCHENS.len())];

        // Customers live 1 to 3 km away in any direction.
        let d_lat = self.rng.gen_range(0.009..0.027) * self.sign();
        let d_lng = self.rng.gen_range(0.009..0.027) * self.sign();

        OrderCast {
            chef: Chef {
                name: chef_name.to_string(),
                avatar: avatar_url(chef_name),
                rating: self.rating(),
                specialty: specialty.to_string(),
            },
            driver: Driver {
                name: driver_name.to_string(),
                avatar: avatar_url(driver_name),
                rating: self.rating(),
                vehicle: vehicle.to_string(),
            },
            location: OrderLocation {
                restaurant: GeoPoint::new(lat, lng),
                customer: GeoPoint::new(lat + d_lat, lng + d_lng),
            },
        }
    }

    fn sign(&mut self) -> f64 {
        if self.rng.gen_bool(0.5) {
            1.0
        } else {
            -1.0
        }
    }

    fn rating(&mut self) -> f32 {
        // One decimal place between 4.5 and 5.0.
        f32::from(self.rng.gen_range(45u8..=50)) / 10.0
    }
}

fn avatar_url(name: &str) -> String {
    let slug: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .to_lowercase()
        .replace(' ', "-");
    format!("https://avatars.example.com/{slug}.png")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_cast() {
        let mut a = Roster::new(Some(42));
        let mut b = Roster::new(Some(42));
        for _ in 0..5 {
            let (x, y) = (a.assign(), b.assign());
            assert_eq!(x.chef, y.chef);
            assert_eq!(x.driver, y.driver);
            assert_eq!(x.location, y.location);
        }
    }

    #[test]
    fn test_customer_differs_from_restaurant() {
        let mut roster = Roster::new(Some(7));
        for _ in 0..20 {
            let cast = roster.assign();
            assert_ne!(cast.location.restaurant, cast.location.customer);
            assert!((4.5..=5.0).contains(&cast.chef.rating));
        }
    }
}
