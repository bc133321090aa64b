use readout_mag::{
    sharded_magnetization, total_magnetization, CountsHistogram, MagnetizationPartial,
};

fn histogram_from(bit_length: u32, entries: &[(&str, u64)]) -> CountsHistogram {
    let mut histogram = CountsHistogram::new(bit_length).unwrap();
    for &(bitstring, count) in entries {
        histogram.record(bitstring, count).unwrap();
    }
    histogram
}

#[test]
fn empty_histogram_reads_zero() {
    let histogram = CountsHistogram::new(4).unwrap();
    assert_eq!(total_magnetization(&histogram), 0.0);
    assert_eq!(sharded_magnetization(&histogram), 0.0);
}

#[test]
fn degenerate_zero_length_histogram_reads_zero() {
    let histogram = CountsHistogram::new(0).unwrap();
    assert_eq!(total_magnetization(&histogram), 0.0);
}

#[test]
fn all_zeros_and_all_ones_hit_the_extremes() {
    let down = histogram_from(3, &[("000", 1)]);
    assert_eq!(total_magnetization(&down), -3.0);

    let up = histogram_from(3, &[("111", 1)]);
    assert_eq!(total_magnetization(&up), 3.0);
}

#[test]
fn balanced_shots_cancel() {
    let histogram = histogram_from(1, &[("0", 1), ("1", 1)]);
    assert_eq!(total_magnetization(&histogram), 0.0);
}

#[test]
fn weighted_four_bit_fixture() {
    let histogram = histogram_from(4, &[("0000", 12), ("0101", 3), ("0110", 5)]);

    // (12 * -4 + 3 * 0 + 5 * 0) / 20
    let mean = total_magnetization(&histogram);
    assert!((mean - (-2.4)).abs() < 1e-12);
    assert_eq!(sharded_magnetization(&histogram), mean);
}

#[test]
fn mixed_two_bit_fixture() {
    let histogram = histogram_from(2, &[("00", 2), ("01", 1), ("11", 3)]);

    let mean = total_magnetization(&histogram);
    assert!((mean - 1.0 / 3.0).abs() < 1e-15);
}

#[test]
fn partials_merge_exactly() {
    let mut left = MagnetizationPartial::default();
    left.observe(0b0000, 12, 4);

    let mut right = MagnetizationPartial::default();
    right.observe(0b0101, 3, 4);
    right.observe(0b0110, 5, 4);

    let mut merged = left;
    merged.merge(&right);

    let mut whole = MagnetizationPartial::default();
    whole.observe(0b0000, 12, 4);
    whole.observe(0b0101, 3, 4);
    whole.observe(0b0110, 5, 4);

    assert_eq!(merged, whole);
    assert_eq!(merged.weighted, -48);
    assert_eq!(merged.total, 20);
}

#[test]
fn empty_partial_mean_is_soft_zero() {
    let partial = MagnetizationPartial::default();
    assert_eq!(partial.mean(), 0.0);
}
