use crate::model::INTERVALS_PER_DAY;

pub const DEFAULT_LOCATION: u8 = 1;

// Retail prices in cents per kWh, one table per location, one entry per
// half-hour interval. Tables are written as runs of (count, cents).
const LOCATION_1: &[(usize, f64)] = &[(12, 24.7), (20, 36.8), (10, 59.7), (6, 36.8)];
const LOCATION_2: &[(usize, f64)] = &[(32, 31.6), (10, 60.3), (6, 31.6)];
const LOCATION_3: &[(usize, f64)] = &[(12, 27.9), (20, 39.3), (10, 47.6), (6, 39.3)];
const LOCATION_4: &[(usize, f64)] =
    &[(12, 31.72222222), (20, 35.32222222), (10, 62.32222222), (6, 35.32222222)];
const LOCATION_5: &[(usize, f64)] = &[(48, 40.4)];
const LOCATION_6: &[(usize, f64)] =
    &[(12, 8.384777778), (18, 12.09077778), (10, 24.25577778), (8, 8.384777778)];
const LOCATION_7: &[(usize, f64)] = &[(26, 9.375933333), (12, 26.10743333), (10, 9.375933333)];

const LOCATIONS: [&[(usize, f64)]; 7] = [
    LOCATION_1, LOCATION_2, LOCATION_3, LOCATION_4, LOCATION_5, LOCATION_6, LOCATION_7,
];

fn table(location: u8) -> &'static [(usize, f64)] {
    match location {
        1..=7 => LOCATIONS[location as usize - 1],
        _ => LOCATIONS[DEFAULT_LOCATION as usize - 1],
    }
}

/// Cents per kWh for each interval; unknown locations use location 1.
pub fn location_cents(location: u8) -> Vec<f64> {
    table(location)
        .iter()
        .flat_map(|&(count, cents)| std::iter::repeat(cents).take(count))
        .collect()
}

/// Dollars per kWh for each interval, rounded to four decimals.
pub fn location_prices(location: u8) -> Vec<f64> {
    location_cents(location)
        .into_iter()
        .map(|cents| (cents / 100.0 * 10_000.0).round() / 10_000.0)
        .collect()
}

pub fn is_known_location(location: u8) -> bool {
    (1..=LOCATIONS.len() as u8).contains(&location)
}

// Every table must cover a full day.
const _: () = {
    let mut l = 0;
    while l < LOCATIONS.len() {
        let mut total = 0;
        let mut r = 0;
        while r < LOCATIONS[l].len() {
            total += LOCATIONS[l][r].0;
            r += 1;
        }
        assert!(total == INTERVALS_PER_DAY);
        l += 1;
    }
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_location_has_a_full_day() {
        for location in 1..=7 {
            assert_eq!(location_prices(location).len(), 48);
        }
    }

    #[test]
    fn peak_windows() {
        let l1 = location_cents(1);
        assert_eq!(l1[11], 24.7);
        assert_eq!(l1[12], 36.8);
        assert_eq!(l1[32], 59.7);
        assert_eq!(l1[41], 59.7);
        assert_eq!(l1[42], 36.8);

        let l6 = location_cents(6);
        assert_eq!(l6[29], 12.09077778);
        assert_eq!(l6[30], 24.25577778);
        assert_eq!(l6[40], 8.384777778);

        let l7 = location_cents(7);
        assert_eq!(l7[25], 9.375933333);
        assert_eq!(l7[26], 26.10743333);
        assert_eq!(l7[38], 9.375933333);
    }

    #[test]
    fn converted_to_dollars() {
        let p = location_prices(1);
        assert_eq!(p[0], 0.247);
        assert_eq!(p[40], 0.597);
        assert_eq!(location_prices(6)[0], 0.0838);
        assert_eq!(location_prices(4)[0], 0.3172);
    }

    #[test]
    fn unknown_location_falls_back() {
        assert_eq!(location_prices(0), location_prices(1));
        assert_eq!(location_prices(42), location_prices(1));
        assert!(!is_known_location(8));
        assert!(is_known_location(7));
    }
}
