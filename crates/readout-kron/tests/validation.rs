use nalgebra::{DMatrix, DVector};
use readout_core::errors::ReadoutError;
use readout_core::rng::RngHandle;
use readout_kron::{
    apply_tensor_power, confusion_operator, decompose_length, random_operator, random_state,
    tensor_power_matrix,
};

#[test]
fn rectangular_operator_is_rejected_before_any_work() {
    let op = DMatrix::<f64>::zeros(2, 3);
    let state = DVector::from_vec(vec![1.0, 0.0, 0.0, 0.0]);

    let err = apply_tensor_power(&op, &state).unwrap_err();

    assert!(matches!(err, ReadoutError::DimensionMismatch(_)));
    assert_eq!(err.info().code, "operator-not-square");
}

#[test]
fn empty_operator_is_rejected() {
    let op = DMatrix::<f64>::zeros(0, 0);
    let state = DVector::from_vec(vec![1.0, 0.0]);

    let err = apply_tensor_power(&op, &state).unwrap_err();

    assert!(matches!(err, ReadoutError::DimensionMismatch(_)));
    assert_eq!(err.info().code, "empty-operator");
}

#[test]
fn non_power_length_is_rejected_with_context() {
    let op = DMatrix::<f64>::identity(2, 2);
    let state = DVector::from_element(12, 1.0);

    let err = apply_tensor_power(&op, &state).unwrap_err();

    assert!(matches!(err, ReadoutError::NonPowerLength(_)));
    assert_eq!(err.info().context.get("length"), Some(&"12".to_string()));
    assert_eq!(err.info().context.get("dim"), Some(&"2".to_string()));
}

#[test]
fn zero_length_state_is_rejected() {
    let op = DMatrix::<f64>::identity(2, 2);
    let state = DVector::<f64>::zeros(0);

    let err = apply_tensor_power(&op, &state).unwrap_err();

    assert_eq!(err.info().code, "empty-state");
}

#[test]
fn one_by_one_operator_only_accepts_singleton_states() {
    let op = DMatrix::from_element(1, 1, 3.0);

    let singleton = DVector::from_vec(vec![2.0]);
    let untouched = apply_tensor_power(&op, &singleton).unwrap();
    assert_eq!(untouched.as_slice(), &[2.0]);

    let longer = DVector::from_element(4, 1.0);
    let err = apply_tensor_power(&op, &longer).unwrap_err();
    assert!(matches!(err, ReadoutError::NonPowerLength(_)));
}

#[test]
fn length_decomposition_recovers_axis_counts() {
    assert_eq!(decompose_length(2, 1).unwrap(), 0);
    assert_eq!(decompose_length(2, 1024).unwrap(), 10);
    assert_eq!(decompose_length(3, 81).unwrap(), 4);
    assert_eq!(decompose_length(10, 1000).unwrap(), 3);
    assert_eq!(decompose_length(7, 7).unwrap(), 1);

    assert!(decompose_length(2, 12).is_err());
    assert!(decompose_length(3, 8).is_err());
    assert!(decompose_length(2, 0).is_err());
}

#[test]
fn oracle_refuses_to_materialise_past_the_cap() {
    let op = DMatrix::<f64>::identity(2, 2);

    let err = tensor_power_matrix(&op, 20, 1 << 10).unwrap_err();

    assert_eq!(err.info().code, "oracle-cap");

    let dense = tensor_power_matrix(&op, 10, 1 << 10).unwrap();
    assert_eq!(dense.nrows(), 1 << 10);
}

#[test]
fn confusion_operator_reproduces_the_two_outcome_matrix() {
    let op = confusion_operator(&[0.9, 0.8]).unwrap();

    let expected = [[0.9, 0.1], [0.2, 0.8]];
    for i in 0..2 {
        for j in 0..2 {
            assert!((op[(i, j)] - expected[i][j]).abs() < 1e-12);
        }
    }
}

#[test]
fn confusion_operator_rows_sum_to_one() {
    let op = confusion_operator(&[0.95, 0.7, 0.8]).unwrap();

    for i in 0..3 {
        let row_sum: f64 = (0..3).map(|j| op[(i, j)]).sum();
        assert!((row_sum - 1.0).abs() < 1e-12);
    }
}

#[test]
fn confusion_operator_rejects_bad_inputs() {
    assert!(confusion_operator(&[]).is_err());
    assert!(confusion_operator(&[0.9]).is_err());

    let err = confusion_operator(&[1.2, 0.8]).unwrap_err();
    assert!(matches!(err, ReadoutError::Generator(_)));
    assert_eq!(err.info().code, "fidelity-range");
}

#[test]
fn generators_reject_zero_dimensions() {
    let mut rng = RngHandle::from_seed(5);
    assert!(random_operator(0, &mut rng).is_err());
    assert!(random_state(0, 3, &mut rng).is_err());
}

#[test]
fn random_states_are_normalised_and_reproducible() {
    let mut rng_a = RngHandle::from_seed(404);
    let mut rng_b = RngHandle::from_seed(404);

    let state_a = random_state(2, 10, &mut rng_a).unwrap();
    let state_b = random_state(2, 10, &mut rng_b).unwrap();

    assert_eq!(state_a.len(), 1024);
    assert_eq!(state_a, state_b);
    assert!((state_a.sum() - 1.0).abs() < 1e-9);
    assert!(state_a.iter().all(|value| *value >= 0.0));

    let mut rng_c = RngHandle::substream(404, 1);
    let state_c = random_state(2, 10, &mut rng_c).unwrap();
    assert_ne!(state_a, state_c);
}
