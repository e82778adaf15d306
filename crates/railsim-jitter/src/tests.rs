use super::*;

#[test]
fn no_jitter_always_zero() {
    let mut rng = SimRng::new(1);
    let j = NoJitter;
    for _ in 0..10 {
        assert_eq!(j.sample(&mut rng), 0.0);
    }
}

#[test]
fn uniform_jitter_within_bounds() {
    let mut rng = SimRng::new(7);
    let j = UniformJitter::new(-5, 5).unwrap();
    for _ in 0..500 {
        let v = j.sample(&mut rng);
        assert!((-5.0..=5.0).contains(&v), "got {v}");
    }
}

#[test]
fn uniform_jitter_rejects_inverted_range() {
    assert!(UniformJitter::new(5, -5).is_err());
}

#[test]
fn gaussian_jitter_rejects_non_positive_std_dev() {
    assert!(GaussianJitter::new(0.0, 0.0).is_err());
    assert!(GaussianJitter::new(0.0, -1.0).is_err());
}

#[test]
fn gaussian_jitter_centers_near_mean() {
    let mut rng = SimRng::new(42);
    let j = GaussianJitter::new(10.0, 1.0).unwrap();
    let sum: f64 = (0..2000).map(|_| j.sample(&mut rng)).sum();
    let mean = sum / 2000.0;
    assert!((mean - 10.0).abs() < 0.3, "got mean {mean}");
}

#[test]
fn lognormal_jitter_is_nonnegative() {
    let mut rng = SimRng::new(3);
    let j = LognormalJitter::new(0.0, 0.5).unwrap();
    for _ in 0..500 {
        assert!(j.sample(&mut rng) >= 0.0);
    }
}

#[test]
fn lognormal_jitter_rejects_non_positive_sigma() {
    assert!(LognormalJitter::new(0.0, 0.0).is_err());
}

#[test]
fn disruption_jitter_rejects_bad_probability() {
    assert!(DisruptionJitter::new(-0.1, 10.0).is_err());
    assert!(DisruptionJitter::new(1.1, 10.0).is_err());
}

#[test]
fn disruption_jitter_extremes() {
    let mut rng = SimRng::new(9);
    let never = DisruptionJitter::new(0.0, 100.0).unwrap();
    let always = DisruptionJitter::new(1.0, 100.0).unwrap();
    for _ in 0..20 {
        assert_eq!(never.sample(&mut rng), 0.0);
        assert_eq!(always.sample(&mut rng), 100.0);
    }
}
