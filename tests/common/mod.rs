//! Synthetic OnStar dump fixtures shared by the integration tests

#![allow(dead_code)]

/// 42.3456789 degrees
pub const LAT_1_HEX: &str = "00000015703DB941";
/// -83.7654321 degrees
pub const LON_1_HEX: &str = "00008098CBF6C8C1";
/// 40.1234567 degrees
pub const LAT_2_HEX: &str = "000000875AEAB741";
/// -74.9876543 degrees
pub const LON_2_HEX: &str = "0000809F1A59C6C1";
/// 91.0 degrees
pub const LAT_OUT_OF_RANGE_HEX: &str = "000000C0BF1ECB41";

/// Deterministic binary filler covering every byte value except ASCII
/// letters, digits and `=`, so it can never form or extend a GPS field.
pub fn noise(len: usize) -> Vec<u8> {
    (0u8..=255)
        .filter(|b| !b.is_ascii_alphanumeric() && *b != b'=')
        .cycle()
        .take(len)
        .collect()
}

/// One GPS sample as it appears in a dump, with NUL separators between fields
pub fn gps_fragment(lat_hex: &str, lon_hex: &str, week: i64, tow: i64) -> Vec<u8> {
    format!("\0gps_tow={tow}\0gps_week={week}\0lat={lat_hex}\0lon={lon_hex}\0").into_bytes()
}

/// Sample carrying explicit calendar fields instead of GPS time
pub fn utc_fragment(lat_hex: &str, lon_hex: &str, year: i64) -> Vec<u8> {
    format!(
        "\0utc_year = {year}\0utc_month=11\0utc_day=2\0utc_hour=23\0utc_min=59\0lat={lat_hex}\0lon={lon_hex}\0"
    )
    .into_bytes()
}

/// Build a dump from fragments separated by enough filler to keep them in
/// separate blocks
pub fn dump(fragments: &[Vec<u8>]) -> Vec<u8> {
    let mut data = noise(512);
    for fragment in fragments {
        data.extend_from_slice(fragment);
        data.extend(noise(1500));
    }
    data
}

/// Two valid samples: 2022-03-06 01:02:03.456 and 2023-02-20 00:00:00.000
pub fn two_sample_dump() -> Vec<u8> {
    dump(&[
        gps_fragment(LAT_1_HEX, LON_1_HEX, 2200, 3_723_456),
        gps_fragment(LAT_2_HEX, LON_2_HEX, 2250, 86_400_000),
    ])
}
