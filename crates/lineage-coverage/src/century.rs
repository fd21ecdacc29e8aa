//! Century arithmetic on the astronomical year axis

/// Century index of a year
///
/// Year 0 is its own bucket; positive years map to `ceil(y / 100)` and
/// negative years to `-ceil(|y| / 100)`.
///
/// # Examples
///
/// ```
/// use lineage_coverage::century_index;
///
/// assert_eq!(century_index(1815), 19);
/// assert_eq!(century_index(100), 1);
/// assert_eq!(century_index(0), 0);
/// assert_eq!(century_index(-150), -2);
/// ```
pub fn century_index(year: i32) -> i32 {
    let magnitude = i64::from(year).abs();
    let century = ((magnitude + 99) / 100) as i32;
    if year < 0 {
        -century
    } else {
        century
    }
}

/// Inclusive year range covered by a century index
///
/// # Examples
///
/// ```
/// use lineage_coverage::bucket_range;
///
/// assert_eq!(bucket_range(19), (1801, 1900));
/// assert_eq!(bucket_range(0), (0, 0));
/// assert_eq!(bucket_range(-2), (-200, -101));
/// ```
pub fn bucket_range(century: i32) -> (i32, i32) {
    match century {
        0 => (0, 0),
        c if c > 0 => (c.saturating_sub(1).saturating_mul(100).saturating_add(1), c.saturating_mul(100)),
        c => (c.saturating_mul(100), c.saturating_add(1).saturating_mul(100).saturating_sub(1)),
    }
}
