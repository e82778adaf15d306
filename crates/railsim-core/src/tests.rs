//! Unit tests for railsim-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, ComponentId, RouteId};

    #[test]
    fn index_roundtrip() {
        let id = ComponentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ComponentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(RouteId(100) > RouteId(99));
    }

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(AgentId::default(), AgentId::INVALID);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn ordering() {
        assert!(Tick(0) < Tick(1));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.uniform01(), r2.uniform01());
        }
    }

    #[test]
    fn uniform01_in_bounds() {
        let mut rng = SimRng::new(1);
        for _ in 0..1000 {
            let v = rng.uniform01();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}

#[cfg(test)]
mod error {
    use crate::RailError;

    #[test]
    fn not_positive_message() {
        let e = RailError::not_positive("traversal_time", -1.0);
        assert!(e.to_string().contains("traversal_time"));
    }

    #[test]
    fn not_a_probability_message() {
        let e = RailError::not_a_probability("p", 1.5);
        assert!(e.to_string().contains("probability"));
    }
}
