// tests/cf_properties.rs
//
// Property checks for the feature CF mapping and the CF algebra.

use proptest::prelude::*;

use photo_quality_cf::certainty::combine_pair;
use photo_quality_cf::features::{CF_CEILING, CF_FLOOR};
use photo_quality_cf::{assess, combine, score_feature, FeatureVector};

proptest! {
    #[test]
    fn feature_cf_stays_between_floor_and_ceiling(
        v in 0.0f64..=1.0,
        t in 0.0f64..=1.0,
        i in 0.001f64..10.0,
    ) {
        let cf = score_feature(v, t, i);
        prop_assert!((CF_FLOOR..=CF_CEILING).contains(&cf), "cf {}", cf);
    }

    #[test]
    fn feature_cf_grows_with_distance(
        t in 0.0f64..=1.0,
        a in 0.0f64..=1.0,
        b in 0.0f64..=1.0,
        i in 0.001f64..5.0,
    ) {
        prop_assume!((a - t).abs() <= (b - t).abs());
        prop_assert!(score_feature(a, t, i) <= score_feature(b, t, i));
    }

    #[test]
    fn feature_cf_grows_with_importance(
        v in 0.0f64..=1.0,
        t in 0.0f64..=1.0,
        i in 0.001f64..5.0,
        extra in 0.0f64..5.0,
    ) {
        prop_assert!(score_feature(v, t, i) <= score_feature(v, t, i + extra));
    }

    #[test]
    fn positive_pair_dominates_and_stays_below_one(
        a in 0.0f64..0.999,
        b in 0.0f64..0.999,
    ) {
        let c = combine(&[a, b]).unwrap();
        prop_assert!(c >= a.max(b) - 1e-12, "{} {} -> {}", a, b, c);
        prop_assert!(c < 1.0);
    }

    #[test]
    fn negative_pair_mirrors_positive_pair(
        a in 0.001f64..0.999,
        b in 0.001f64..0.999,
    ) {
        let pos = combine_pair(a, b).unwrap();
        let neg = combine_pair(-a, -b).unwrap();
        prop_assert_eq!(pos.to_bits(), (-neg).to_bits());
        prop_assert!(neg > -1.0);
    }

    #[test]
    fn single_element_is_identity(x in -1.0f64..=1.0) {
        prop_assert_eq!(combine(&[x]).unwrap().to_bits(), x.to_bits());
    }

    #[test]
    fn mixed_sign_inside_open_interval_never_degenerates(
        a in 0.0f64..0.999,
        b in 0.0f64..0.999,
    ) {
        let c = combine_pair(a, -b).unwrap();
        prop_assert!(c.is_finite());
        prop_assert!(c.abs() <= 1.0);
    }

    #[test]
    fn assess_is_deterministic_and_consistent(
        b in 0.0f64..=1.0,
        c in 0.0f64..=1.0,
        s in 0.0f64..=1.0,
        n in 0.0f64..=1.0,
        cb in 0.0f64..=1.0,
    ) {
        let fv = FeatureVector::new(b, c, s, n, cb);
        let r1 = assess(&fv).unwrap();
        let r2 = assess(&fv).unwrap();
        prop_assert_eq!(r1, r2);
        prop_assert!((0.0..=1.0).contains(&r1.score));
        prop_assert!(r1.certainty_factor < 1.0);
        let refold = combine(&r1.feature_cfs.to_array()).unwrap();
        prop_assert_eq!(refold.to_bits(), r1.certainty_factor.to_bits());
    }
}
